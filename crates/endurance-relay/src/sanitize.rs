//! Cleanup of model output before it reaches the dashboard.
//!
//! Two artifacts are removed:
//! - a leading model tag such as `*[gpt-4o-mini]*`
//! - reasoning blocks `<think>...</think>`, including one left open at the end

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

fn model_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*\*\[[^\]\n]*\]\*").expect("valid regex"))
}

fn think_block() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<think>.*?(</think>|\z)").expect("valid regex"))
}

/// Strip model artifacts and surrounding whitespace.
#[must_use]
pub fn sanitize(text: &str) -> String {
    let without_think = think_block().replace_all(text, "");
    let without_tag = model_tag().replace(&without_think, "");
    without_tag.trim().to_string()
}

/// Apply [`sanitize`] to every string inside `value`.
pub fn sanitize_value(value: &mut Value) {
    match value {
        Value::String(text) => *text = sanitize(text),
        Value::Array(items) => items.iter_mut().for_each(sanitize_value),
        Value::Object(map) => map.values_mut().for_each(sanitize_value),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("*[gpt-4o-mini]* Hello world", "Hello world")]
    #[case("  *[llama-3.1-8b]*\n\nAnswer", "Answer")]
    #[case("<think>plan the reply</think>Final", "Final")]
    #[case("A <think>x</think>B<think>y</think> C", "A B C")]
    #[case("Done.\n<think>still going", "Done.")]
    #[case("*[m]* <think>\nreasoning\n</think>\nHi", "Hi")]
    #[case("Use *[brackets]* mid-sentence", "Use *[brackets]* mid-sentence")]
    #[case("", "")]
    fn strips_artifacts(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(sanitize(input), expected);
    }

    #[test]
    fn cleans_nested_strings() {
        let mut value = serde_json::json!({
            "analysis": "*[gpt-4o-mini]* <think>x</think>Deploys are steady",
            "risks": [{"title": "<think>hmm</think> Single owner"}],
            "score": 3,
        });
        sanitize_value(&mut value);
        assert_eq!(
            value,
            serde_json::json!({
                "analysis": "Deploys are steady",
                "risks": [{"title": "Single owner"}],
                "score": 3,
            })
        );
    }
}
