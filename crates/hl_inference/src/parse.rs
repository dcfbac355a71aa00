//! Turns the rewrite service's free-form text into positional `Rewrite`s.
//!
//! Text generators like to wrap JSON in markdown fences or prepend a
//! `<think>` block, so the text is cleaned before it is parsed. Anything that
//! is still not an array of complete objects, one per article, is rejected.

use hl_core::Rewrite;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("rewrite output was empty")]
    Empty,

    #[error("failed to parse rewrite output as JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("rewrite output is not a JSON array")]
    NotAnArray,

    #[error("rewrite output has {actual} entries for {expected} articles")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("rewrite entry {index} is missing '{field}'")]
    MissingField { index: usize, field: &'static str },
}

/// Drops a leading `<think>...</think>` reasoning block.
pub fn strip_reasoning(raw: &str) -> &str {
    let trimmed = raw.trim_start();
    match (trimmed.strip_prefix("<think>"), trimmed.find("</think>")) {
        (Some(_), Some(end)) => &trimmed[end + "</think>".len()..],
        _ => raw,
    }
}

/// Takes the body of the first code fence, including its info string
/// (```json), wherever the fence starts.
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(start) = trimmed.find("```") else {
        return trimmed;
    };
    let rest = &trimmed[start + 3..];

    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
    };
    match body.find("```") {
        Some(end) => body[..end].trim(),
        None => body.trim(),
    }
}

/// Narrows prose-wrapped output down to the outermost `[...]`.
fn locate_array(text: &str) -> &str {
    if text.starts_with(['[', '{']) {
        return text;
    }
    match (text.find('['), text.rfind(']')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    }
}

pub fn parse_rewrites(raw: &str, expected: usize) -> Result<Vec<Rewrite>, ParseError> {
    let text = locate_array(strip_code_fence(strip_reasoning(raw)));
    if text.is_empty() {
        return Err(ParseError::Empty);
    }

    let Value::Array(entries) = serde_json::from_str::<Value>(text)? else {
        return Err(ParseError::NotAnArray);
    };

    if entries.len() != expected {
        return Err(ParseError::LengthMismatch {
            expected,
            actual: entries.len(),
        });
    }

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let object = entry
                .as_object()
                .ok_or(ParseError::MissingField { index, field: "title" })?;
            Ok(Rewrite {
                title: required(object, index, "title", &["title"])?,
                summary: required(object, index, "summary", &["summary"])?,
                commentary: required(object, index, "commentary", &["commentary", "comment"])?,
                category: required(object, index, "category", &["category"])?,
            })
        })
        .collect()
}

fn required(
    object: &Map<String, Value>,
    index: usize,
    field: &'static str,
    keys: &[&str],
) -> Result<String, ParseError> {
    keys.iter()
        .filter_map(|key| object.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or(ParseError::MissingField { index, field })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO: &str = r#"[
        {"title": "标题一", "summary": "摘要一", "commentary": "点评一", "category": "银行"},
        {"title": "标题二", "summary": "摘要二", "commentary": "点评二", "category": "科技"}
    ]"#;

    #[test]
    fn parses_a_plain_array() {
        let rewrites = parse_rewrites(TWO, 2).unwrap();
        assert_eq!(rewrites.len(), 2);
        assert_eq!(rewrites[0].title, "标题一");
        assert_eq!(rewrites[1].category, "科技");
    }

    #[test]
    fn strips_fences_with_and_without_info_string() {
        let fenced = format!("```json\n{TWO}\n```");
        assert_eq!(parse_rewrites(&fenced, 2).unwrap().len(), 2);

        let bare = format!("```\n{TWO}\n```\n");
        assert_eq!(parse_rewrites(&bare, 2).unwrap().len(), 2);

        assert_eq!(strip_code_fence("```json[1]```"), "[1]");
        assert_eq!(strip_code_fence("  [1]  "), "[1]");
    }

    #[test]
    fn finds_fences_and_arrays_after_a_preamble() {
        let fenced = format!("Here you go:\n```json\n{TWO}\n```\nEnjoy.");
        assert_eq!(parse_rewrites(&fenced, 2).unwrap().len(), 2);

        let inline = format!("Sure! {TWO} Let me know if you need more.");
        assert_eq!(parse_rewrites(&inline, 2).unwrap()[1].title, "标题二");
    }

    #[test]
    fn strips_reasoning_blocks() {
        let raw = format!("<think>weighing the banks first</think>\n```json\n{TWO}\n```");
        assert_eq!(parse_rewrites(&raw, 2).unwrap().len(), 2);
    }

    #[test]
    fn rejects_non_json() {
        let err = parse_rewrites("Sorry, I cannot help with that.", 2).unwrap_err();
        assert!(matches!(err, ParseError::Json(_)));
        assert!(err.to_string().contains("failed to parse"));
    }

    #[test]
    fn rejects_objects_and_empty_output() {
        assert!(matches!(
            parse_rewrites(r#"{"title": "x"}"#, 1),
            Err(ParseError::NotAnArray)
        ));
        assert!(matches!(parse_rewrites("```json\n```", 1), Err(ParseError::Empty)));
    }

    #[test]
    fn rejects_length_mismatch_instead_of_truncating() {
        let err = parse_rewrites(TWO, 3).unwrap_err();
        assert!(matches!(
            err,
            ParseError::LengthMismatch { expected: 3, actual: 2 }
        ));
    }

    #[test]
    fn rejects_missing_fields() {
        let raw = r#"[{"title": "t", "summary": "s", "category": "c"}]"#;
        assert!(matches!(
            parse_rewrites(raw, 1),
            Err(ParseError::MissingField { index: 0, field: "commentary" })
        ));

        let raw = r#"[{"title": "  ", "summary": "s", "commentary": "x", "category": "c"}]"#;
        assert!(matches!(
            parse_rewrites(raw, 1),
            Err(ParseError::MissingField { index: 0, field: "title" })
        ));
    }

    #[test]
    fn accepts_comment_as_commentary() {
        let raw = r#"[{"title": "t", "summary": "s", "comment": "x", "category": "c"}]"#;
        assert_eq!(parse_rewrites(raw, 1).unwrap()[0].commentary, "x");
    }
}
