//! Recovering the content object from raw model output.
//!
//! Models wrap their JSON in prose or markdown fences more often than not.
//! Extraction is one-shot over the final buffered text: a fenced ```json
//! block is preferred when present, otherwise the first balanced `{...}`
//! object is located with a scanner that respects JSON string and escape
//! rules (braces inside string literals do not count).

use crate::content::GeneratedContent;
use crate::error::GenAiError;

/// Find the JSON object in raw model output, if any.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let region = fenced_block(text).unwrap_or(text);
    balanced_object(region)
}

/// Contents of the first ```json (or bare ```) fence, when one exists.
fn fenced_block(text: &str) -> Option<&str> {
    let open = text.find("```")?;
    let after_marker = &text[open + 3..];
    // Skip an optional language tag on the fence line.
    let body_start = after_marker.find('\n')? + 1;
    let body = &after_marker[body_start..];
    let close = body.find("```")?;
    Some(&body[..close])
}

#[derive(Clone, Copy, PartialEq)]
enum ScanState {
    Normal,
    InString,
    Escaped,
}

/// First balanced top-level `{...}` slice of `text`.
fn balanced_object(text: &str) -> Option<&str> {
    let mut state = ScanState::Normal;
    let mut depth = 0usize;
    let mut start = None;

    for (idx, ch) in text.char_indices() {
        match state {
            ScanState::Escaped => state = ScanState::InString,
            ScanState::InString => match ch {
                '\\' => state = ScanState::Escaped,
                '"' => state = ScanState::Normal,
                _ => {}
            },
            ScanState::Normal => match ch {
                '"' if depth > 0 => state = ScanState::InString,
                '{' => {
                    if depth == 0 {
                        start = Some(idx);
                    }
                    depth += 1;
                }
                '}' if depth > 0 => {
                    depth -= 1;
                    if depth == 0 {
                        let begin = start?;
                        return Some(&text[begin..idx + ch.len_utf8()]);
                    }
                }
                _ => {}
            },
        }
    }
    None
}

/// Extract, parse, and validate the content object from model output.
pub fn parse_generated_content(text: &str) -> Result<GeneratedContent, GenAiError> {
    let raw = extract_json_object(text).ok_or_else(|| {
        GenAiError::MalformedModelOutput("no JSON object found in model output".to_string())
    })?;

    let content: GeneratedContent = serde_json::from_str(raw).map_err(|err| {
        if err.classify() == serde_json::error::Category::Data {
            GenAiError::SchemaValidation(err.to_string())
        } else {
            GenAiError::MalformedModelOutput(err.to_string())
        }
    })?;

    content.validate()?;
    Ok(content)
}
