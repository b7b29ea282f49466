use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use serde_json::{json, Value};

static SILENT: AtomicBool = AtomicBool::new(false);

/// Suppress all log output (benchmarks, tests).
pub fn set_silent(silent: bool) {
    SILENT.store(silent, Ordering::Relaxed);
}

#[derive(Serialize)]
struct LogEvent<'a> {
    level: &'a str,
    event: &'a str,
    message: &'a str,
    timestamp_ms: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<Value>,
}

// Log lines go to stderr; stdout carries command output (labels, tables).
fn emit(level: &str, event: &str, message: &str, metadata: Option<Value>) {
    if SILENT.load(Ordering::Relaxed) {
        return;
    }

    let entry = LogEvent {
        level,
        event,
        message,
        timestamp_ms: chrono::Utc::now().timestamp_millis(),
        metadata,
    };

    match serde_json::to_string(&entry) {
        Ok(payload) => eprintln!("{payload}"),
        Err(err) => eprintln!(
            "{{\"level\":\"error\",\"event\":\"logging_failure\",\"message\":\"failed to serialise log\",\"error\":\"{err}\"}}"
        ),
    }
}

pub fn info(event: &str, message: &str, metadata: Value) {
    emit("info", event, message, Some(metadata));
}

pub fn warn(event: &str, message: &str, metadata: Value) {
    emit("warn", event, message, Some(metadata));
}

pub fn error(event: &str, message: &str, metadata: Value) {
    emit("error", event, message, Some(metadata));
}

pub fn info_simple(event: &str, message: &str) {
    emit("info", event, message, None);
}

pub fn metadata_from_pairs(pairs: &[(&str, Value)]) -> Value {
    let mut obj = serde_json::Map::with_capacity(pairs.len());
    for (key, value) in pairs {
        obj.insert((*key).to_string(), value.clone());
    }
    Value::Object(obj)
}

pub fn metadata_object() -> Value {
    json!({})
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_pairs_keep_insertion_order() {
        let metadata = metadata_from_pairs(&[("path", json!("/api")), ("status", json!(200))]);
        assert_eq!(metadata.to_string(), r#"{"path":"/api","status":200}"#);
    }

    #[test]
    fn empty_metadata_is_an_object() {
        assert_eq!(metadata_object(), json!({}));
    }
}
