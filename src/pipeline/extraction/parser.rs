use serde_json::Value;

use super::ExtractionError;

/// Recover exactly one JSON object from a model's free-form reply.
///
/// Ordered fallback, first success wins:
/// 1. a fenced block labeled `json`,
/// 2. any fenced block,
/// 3. bracket-depth scan over every `{` in the text, keeping the largest
///    substring that parses (a larger valid object is more likely the full
///    record than a nested fragment).
///
/// Stateless and deterministic; fails with `NoJsonRecovered` when the text is
/// empty or no candidate parses.
pub fn extract_json(text: &str) -> Result<Value, ExtractionError> {
    if text.trim().is_empty() {
        return Err(ExtractionError::NoJsonRecovered("empty model reply".into()));
    }

    let blocks = fenced_blocks(text);

    for (label, body) in &blocks {
        if label.eq_ignore_ascii_case("json") {
            if let Some(value) = parse_object(body) {
                return Ok(value);
            }
        }
    }

    for (_, body) in &blocks {
        if let Some(value) = parse_object(body) {
            return Ok(value);
        }
    }

    let mut best: Option<(usize, Value)> = None;
    for span in balanced_spans(text) {
        if let Some(value) = parse_object(span) {
            if best.as_ref().map_or(true, |(len, _)| span.len() > *len) {
                best = Some((span.len(), value));
            }
        }
    }
    if let Some((_, value)) = best {
        return Ok(value);
    }

    Err(ExtractionError::NoJsonRecovered(
        "no parseable JSON object in model reply".into(),
    ))
}

fn parse_object(candidate: &str) -> Option<Value> {
    let value: Value = serde_json::from_str(candidate.trim()).ok()?;
    value.is_object().then_some(value)
}

/// Collect all fenced code blocks as (label, body) pairs.
/// The label is whatever follows the opening fence on the same line.
fn fenced_blocks(text: &str) -> Vec<(String, String)> {
    let mut blocks = Vec::new();
    let mut rest = text;

    while let Some(open) = rest.find("```") {
        let after = &rest[open + 3..];
        let Some(newline) = after.find('\n') else {
            break;
        };
        let label = after[..newline].trim().to_string();
        let body = &after[newline + 1..];
        let Some(close) = body.find("```") else {
            break;
        };
        blocks.push((label, body[..close].trim().to_string()));
        rest = &body[close + 3..];
    }

    blocks
}

/// Find every balanced `{...}` span via a streaming bracket-depth scan.
///
/// String-aware: braces inside JSON string literals do not affect depth.
/// Byte scanning is UTF-8 safe because braces, quotes and backslashes are
/// ASCII and never occur as continuation bytes.
fn balanced_spans(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut spans = Vec::new();

    for start in 0..bytes.len() {
        if bytes[start] != b'{' {
            continue;
        }
        let mut depth = 0usize;
        let mut in_string = false;
        let mut escaped = false;
        for (offset, &b) in bytes[start..].iter().enumerate() {
            if in_string {
                if escaped {
                    escaped = false;
                } else if b == b'\\' {
                    escaped = true;
                } else if b == b'"' {
                    in_string = false;
                }
                continue;
            }
            match b {
                b'"' => in_string = true,
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        spans.push(&text[start..=start + offset]);
                        break;
                    }
                }
                _ => {}
            }
        }
    }

    spans
}
