//! Recovering JSON from model replies that wrap it in prose or fences.

use serde_json::Value;

/// Best-effort JSON extraction, tried in order:
/// 1. the whole string
/// 2. the first fenced ```` ```json ```` (or bare ```` ``` ````) block
/// 3. the first balanced `{...}` or `[...]` fragment
///
/// Returns `None` when the text is unstructured.
#[must_use]
pub fn extract_json(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if let Ok(value) = serde_json::from_str(trimmed) {
        return Some(value);
    }
    if let Some(value) = fenced_block(trimmed).and_then(|b| serde_json::from_str(b).ok()) {
        return Some(value);
    }
    balanced_fragment(trimmed).and_then(|f| serde_json::from_str(f).ok())
}

fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find("```")?;
    let rest = &text[start + 3..];
    // Skip the info string (`json`, `JSON`, or nothing) up to the newline.
    let body_start = rest.find('\n')? + 1;
    let body = &rest[body_start..];
    let end = body.find("```")?;
    Some(body[..end].trim())
}

/// First `{`/`[` and its matching close, ignoring brackets inside strings.
fn balanced_fragment(text: &str) -> Option<&str> {
    let start = text.find(['{', '['])?;
    let mut depth = 0_usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' | '[' => depth += 1,
            '}' | ']' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }
    None
}
