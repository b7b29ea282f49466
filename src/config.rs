use std::time::Duration;

use crate::constants::{DEFAULT_API_BASE, DIMENSION_VALUES_LIMIT, REQUEST_TIMEOUT_SECS};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base: String,
    pub timeout: Duration,
    pub values_limit: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            values_limit: DIMENSION_VALUES_LIMIT,
        }
    }
}

/// Trim the base URL and drop trailing slashes; an empty base falls back to the default API.
pub fn normalize_base(base: &str) -> String {
    let trimmed = base.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        DEFAULT_API_BASE.to_string()
    } else {
        trimmed.to_string()
    }
}
