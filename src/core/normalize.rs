use serde_json::Value;

/// Stringifies a property value for use as a join key.
///
/// Postcodes arrive as JSON numbers in some boundary files and as text in the
/// pricing table. Both sides end up in the same form: strings go through
/// [`normalize_text`], and numbers are written the way that function writes
/// float text (`5000.0` and `5e3` both become `"5000"`).
pub fn normalize_key(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => normalize_text(s),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                n.as_f64().map(format_float).unwrap_or_else(|| n.to_string())
            }
        }
        other => other.to_string(),
    }
}

/// Trims a text cell and rewrites float syntax (`5000.0`, `5e3`) in canonical
/// form. Plain digit runs are kept verbatim so `0800` keeps its leading zero.
pub fn normalize_text(raw: &str) -> String {
    let trimmed = raw.trim();
    if !trimmed.contains(['.', 'e', 'E']) {
        return trimmed.to_string();
    }
    match trimmed.parse::<f64>() {
        Ok(f) if f.is_finite() => format_float(f),
        _ => trimmed.to_string(),
    }
}

fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}
