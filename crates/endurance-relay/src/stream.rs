//! Server-Sent Events accumulation for event-stream replies.
//!
//! The agent service streams its answer as `data: ` lines. Each payload is
//! usually a JSON object carrying one text fragment, under whichever key the
//! backend happens to use; plain-text payloads are kept as they are.

use serde_json::Value;

/// Keys checked, in order, for a text fragment.
const TEXT_KEYS: [&str; 4] = ["response", "content", "token", "message"];

/// One parsed SSE line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseLine {
    /// A text fragment to append.
    Fragment(String),
    /// `data: [DONE]`
    Done,
    /// Blank line, comment, other field, or a payload with no text.
    Skip,
}

/// Parse a single SSE line.
#[must_use]
pub fn parse_sse_line(line: &str) -> SseLine {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() || line.starts_with(':') {
        return SseLine::Skip;
    }
    let Some(data) = line.strip_prefix("data:") else {
        return SseLine::Skip;
    };
    let data = data.strip_prefix(' ').unwrap_or(data);
    if data.trim() == "[DONE]" {
        return SseLine::Done;
    }

    match serde_json::from_str::<Value>(data) {
        Ok(value @ Value::Object(_)) => fragment(&value).map_or(SseLine::Skip, SseLine::Fragment),
        Ok(Value::String(s)) => SseLine::Fragment(s),
        _ => SseLine::Fragment(data.to_string()),
    }
}

/// Concatenate every fragment in an event-stream body.
///
/// A body with no `data:` lines at all is treated as a single reply: a JSON
/// object yields its text field, anything else is returned as is.
#[must_use]
pub fn accumulate(body: &str) -> String {
    let mut out = String::new();
    let mut saw_data = false;
    for line in body.lines() {
        if line.starts_with("data:") {
            saw_data = true;
        }
        match parse_sse_line(line) {
            SseLine::Fragment(text) => out.push_str(&text),
            SseLine::Done => break,
            SseLine::Skip => {}
        }
    }
    if saw_data {
        return out;
    }

    match serde_json::from_str::<Value>(body) {
        Ok(value) => fragment(&value).unwrap_or_default(),
        Err(_) => body.to_string(),
    }
}

/// First text fragment carried by a JSON payload.
fn fragment(value: &Value) -> Option<String> {
    for key in TEXT_KEYS {
        if let Some(s) = value.get(key).and_then(Value::as_str) {
            return Some(s.to_string());
        }
    }
    value
        .pointer("/choices/0/delta/content")
        .or_else(|| value.pointer("/choices/0/message/content"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn concatenates_response_fragments() {
        let body = "data: {\"response\":\"A\"}\n\ndata: {\"response\":\"B\"}\n\n";
        assert_eq!(accumulate(body), "AB");
    }

    #[test]
    fn stops_at_done_and_skips_comments() {
        let body = ": keep-alive\n\
                    event: message\n\
                    data: {\"token\":\"Hel\"}\n\
                    data: {\"content\":\"lo\"}\n\
                    data: [DONE]\n\
                    data: {\"token\":\"ignored\"}\n";
        assert_eq!(accumulate(body), "Hello");
    }

    #[test]
    fn openai_style_deltas() {
        let body = "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n\
                    data: {\"choices\":[{\"delta\":{\"content\":\"Hi \"}}]}\n\
                    data: {\"choices\":[{\"delta\":{\"content\":\"there\"}}]}\n\
                    data: [DONE]\n";
        assert_eq!(accumulate(body), "Hi there");
    }

    #[test]
    fn plain_text_payloads_are_kept() {
        let body = "data: first \r\ndata: second\r\n";
        assert_eq!(accumulate(body), "first second");
    }

    #[test]
    fn body_without_data_lines() {
        assert_eq!(accumulate("{\"response\":\"whole\"}"), "whole");
        assert_eq!(accumulate("just text"), "just text");
    }

    #[rstest]
    #[case("", SseLine::Skip)]
    #[case(": ping", SseLine::Skip)]
    #[case("id: 7", SseLine::Skip)]
    #[case("data: [DONE]", SseLine::Done)]
    #[case("data: {\"message\":\"m\"}", SseLine::Fragment("m".into()))]
    #[case("data:{\"response\":\"tight\"}", SseLine::Fragment("tight".into()))]
    #[case("data: {\"other\":1}", SseLine::Skip)]
    #[case("data: \"quoted\"", SseLine::Fragment("quoted".into()))]
    fn lines(#[case] line: &str, #[case] expected: SseLine) {
        assert_eq!(parse_sse_line(line), expected);
    }
}
