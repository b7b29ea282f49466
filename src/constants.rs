pub const DEFAULT_API_BASE: &str = "http://localhost:4000";
pub const CATALOG_PATH: &str = "/api/pivot/catalogo";
pub const QUERY_PATH: &str = "/api/pivot/consulta";
pub const DIMENSIONS_PATH: &str = "/api/pivot/dimensiones";
pub const DIMENSION_VALUES_LIMIT: u32 = 200;
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

pub const REPORT_COLUMN_WIDTH_PX: u32 = 120;
pub const REPORT_MIN_WIDTH_PX: u32 = 800;
pub const REPORT_MAX_WIDTH_PX: u32 = 1_100;

pub const EXPORT_FILE_PREFIX: &str = "tabla_dinamica";
pub const UNKNOWN_API_ERROR: &str = "Error desconocido al consultar el pivot";
