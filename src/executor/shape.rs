use serde_json::Value;

/// Preview length for bodies that are neither list- nor object-shaped
pub const PREVIEW_LIMIT: usize = 100;

/// Preview length for error response bodies
pub const ERROR_BODY_LIMIT: usize = 150;

/// What a successful response body looks like, as far as the report cares
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadShape {
    Records(usize),
    ObjectData,
    Preview(String),
}

impl PayloadShape {
    pub fn summary(&self) -> String {
        match self {
            PayloadShape::Records(count) => format!("Retrieved {} records.", count),
            PayloadShape::ObjectData => "Retrieved Object Data.".to_string(),
            PayloadShape::Preview(text) => format!("Retrieved: {}", text),
        }
    }
}

/// Classify a decoded body.
///
/// A `data` envelope takes priority over the wrapping object. Missing, null
/// or falsy scalar `data` falls back to the object itself.
pub fn classify(body: &Value) -> PayloadShape {
    match body {
        Value::Object(map) => match map.get("data") {
            Some(Value::Array(items)) => PayloadShape::Records(items.len()),
            Some(Value::Object(_)) => PayloadShape::ObjectData,
            Some(scalar) if is_truthy(scalar) => PayloadShape::Preview(preview(scalar)),
            _ => PayloadShape::ObjectData,
        },
        Value::Array(items) => PayloadShape::Records(items.len()),
        other => PayloadShape::Preview(preview(other)),
    }
}

fn preview(value: &Value) -> String {
    let text = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    truncate_chars(&text, PREVIEW_LIMIT).to_string()
}

/// First `max` characters of `text`, never splitting a code point
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// JSON truthiness: false, null, 0, "" and empty containers are falsy
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
