//! Literal command re-indexing.
//!
//! This is a substring heuristic, not a JSON parser: every `"op"` in the
//! minified text is taken as an operation marker, including one that appears
//! inside a string value.

use super::SequenceCounter;
use serde_json::value::RawValue;
use std::borrow::Cow;

const OP_MARKER: &str = "\"op\"";

/// Command text of a literal entry. A JSON string holding the command is
/// unwrapped; anything else is used as written.
pub fn command_text(raw: &RawValue) -> Cow<'_, str> {
    let text = raw.get();
    if text.trim_start().starts_with('"') {
        if let Ok(inner) = serde_json::from_str::<String>(text) {
            return Cow::Owned(inner);
        }
    }
    Cow::Borrowed(text)
}

/// Drop spaces, newlines, tabs and carriage returns everywhere, string
/// contents included.
pub fn strip_whitespace(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, ' ' | '\n' | '\t' | '\r'))
        .collect()
}

/// Minify `raw` and insert `"id": <n>, ` before each `"op"` marker, taking
/// ids from `seq` in order of appearance.
pub fn reindex_literal(raw: &str, seq: &mut SequenceCounter) -> String {
    let compact = strip_whitespace(raw);
    let mut out = String::with_capacity(compact.len() + 16);
    let mut rest = compact.as_str();

    while let Some(pos) = rest.find(OP_MARKER) {
        out.push_str(&rest[..pos]);
        out.push_str(&format!("\"id\": {}, ", seq.advance()));
        out.push_str(OP_MARKER);
        rest = &rest[pos + OP_MARKER.len()..];
    }
    out.push_str(rest);

    out
}
