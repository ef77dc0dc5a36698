//! JSON formatting

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value as JsonValue;

/// JSON formatting options
#[derive(Debug, Clone)]
pub struct JsonFormatterOptions {
    /// Indentation (default: 2 spaces)
    pub indent: usize,
    /// Sort keys alphabetically
    pub sort_keys: bool,
}

impl Default for JsonFormatterOptions {
    fn default() -> Self {
        Self {
            indent: 2,
            sort_keys: false,
        }
    }
}

/// Parse a single JSON document and pretty print it
pub fn format_json(json_str: &str, options: &JsonFormatterOptions) -> Result<String, String> {
    let value: JsonValue =
        serde_json::from_str(json_str).map_err(|e| format!("Invalid JSON: {}", e))?;

    if options.sort_keys {
        format_value(&sort_json_keys(&value), options.indent)
    } else {
        format_value(&value, options.indent)
    }
}

/// Format a JSON value with indentation
fn format_value(value: &JsonValue, indent: usize) -> Result<String, String> {
    let indent = vec![b' '; indent];
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(&indent));

    value
        .serialize(&mut serializer)
        .map_err(|e| format!("JSON formatting error: {}", e))?;

    String::from_utf8(buf).map_err(|e| format!("UTF-8 error: {}", e))
}

/// Maximum recursion depth for JSON key sorting to prevent stack overflow
const MAX_JSON_DEPTH: usize = 128;

/// Sort JSON object keys recursively with depth limit
fn sort_json_keys(value: &JsonValue) -> JsonValue {
    sort_json_keys_with_depth(value, 0)
}

fn sort_json_keys_with_depth(value: &JsonValue, depth: usize) -> JsonValue {
    if depth >= MAX_JSON_DEPTH {
        return value.clone();
    }

    match value {
        JsonValue::Object(map) => {
            let mut sorted: Vec<_> = map.iter().collect();
            sorted.sort_by(|a, b| a.0.cmp(b.0));

            JsonValue::Object(
                sorted
                    .into_iter()
                    .map(|(k, v)| (k.clone(), sort_json_keys_with_depth(v, depth + 1)))
                    .collect(),
            )
        }
        JsonValue::Array(arr) => {
            JsonValue::Array(arr.iter().map(|v| sort_json_keys_with_depth(v, depth + 1)).collect())
        }
        _ => value.clone(),
    }
}
