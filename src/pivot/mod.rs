//! Pivot API wire types, HTTP client and result tables.

pub mod client;
pub mod table;
pub mod types;

pub use client::{ApiError, PivotClient};
pub use table::PivotTable;
pub use types::{
    Aggregation, PivotCatalog, PivotFilter, PivotQueryPayload, PivotQueryResult,
    PivotValueRequest, QueryResponse,
};
