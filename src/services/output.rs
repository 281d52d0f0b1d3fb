use serde_json::Value;

use crate::error::{AppError, AppResult};

/// Extracts the JSON object from a model reply
///
/// Accepts a bare object, an object inside a Markdown code fence, or an
/// object embedded in surrounding prose (first balanced `{...}` wins).
pub fn extract_json(raw: &str) -> AppResult<Value> {
    let text = strip_fences(raw);

    if let Ok(value) = serde_json::from_str::<Value>(&text) {
        return Ok(value);
    }

    let fragment = first_json_object(&text).ok_or_else(|| {
        AppError::Upstream("Agent reply did not contain a JSON object".to_string())
    })?;

    serde_json::from_str(fragment)
        .map_err(|e| AppError::Upstream(format!("Agent reply contained invalid JSON: {e}")))
}

fn strip_fences(raw: &str) -> String {
    let trimmed = raw.trim();
    if !(trimmed.starts_with("```") && trimmed.ends_with("```")) {
        return trimmed.to_string();
    }

    let mut out = String::new();
    for line in trimmed.lines().skip(1) {
        if line.trim() == "```" {
            break;
        }
        out.push_str(line);
        out.push('\n');
    }
    out.trim().to_string()
}

fn first_json_object(raw: &str) -> Option<&str> {
    let mut start = None;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, ch) in raw.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string => escaped = true,
            // Quotes in prose before the object are not JSON strings
            '"' if depth > 0 => in_string = !in_string,
            _ if in_string => {}
            '{' => {
                if depth == 0 {
                    start = Some(idx);
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    return start.map(|begin| &raw[begin..=idx]);
                }
            }
            _ => {}
        }
    }
    None
}
