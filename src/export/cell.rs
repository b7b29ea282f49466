use serde_json::Value;

/// Placeholder shown for missing or empty cells.
pub const EMPTY_CELL: &str = "-";

/// Render a result cell for tables and exports.
pub fn format_cell(value: &Value) -> String {
    match value {
        Value::Null => EMPTY_CELL.to_string(),
        Value::String(text) if text.is_empty() => EMPTY_CELL.to_string(),
        Value::String(text) => text.clone(),
        Value::Number(number) => number
            .as_f64()
            .map(format_number)
            .unwrap_or_else(|| number.to_string()),
        other => other.to_string(),
    }
}

/// Honduran number style: `,` groups thousands, `.` separates at most two
/// decimals, trailing zeros are dropped and halves round away from zero.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞" } else { "-∞" }.to_string();
    }

    let cents = (value.abs() * 100.0).round() as u128;
    let integer = cents / 100;
    let fraction = cents % 100;

    let mut formatted = String::new();
    if value < 0.0 && cents > 0 {
        formatted.push('-');
    }
    formatted.push_str(&group_thousands(integer));
    if fraction > 0 {
        let decimals = format!("{fraction:02}");
        formatted.push('.');
        formatted.push_str(decimals.trim_end_matches('0'));
    }
    formatted
}

fn group_thousands(integer: u128) -> String {
    let digits = integer.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}
