use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;

/// Text left in place of a marker nobody supplied a value for.
pub const NO_DATA: &str = "[SIN DATO]";

/// Longest label or id suggested from a text selection.
const SUGGESTION_LEN: usize = 30;

/// A `[[identifier]]` occurrence inside a body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    /// Byte range of the whole token, brackets included.
    pub span: Range<usize>,
    pub identifier: String,
}

// Shortest match between a `[[` and the next `]]`. Nested or malformed
// brackets resolve to whatever this pattern picks.
fn marker_regex() -> &'static Regex {
    static MARKER_RE: OnceLock<Regex> = OnceLock::new();
    MARKER_RE.get_or_init(|| Regex::new(r"\[\[(.*?)\]\]").expect("marker pattern is valid"))
}

pub fn marker_for(id: &str) -> String {
    format!("[[{}]]", id)
}

pub fn find_markers(text: &str) -> Vec<Marker> {
    marker_regex()
        .captures_iter(text)
        .filter_map(|cap| {
            let whole = cap.get(0)?;
            Some(Marker {
                span: whole.range(),
                identifier: cap[1].to_string(),
            })
        })
        .collect()
}

/// Replaces every literal `[[identifier]]` in `text`.
pub fn replace_all(text: &str, identifier: &str, value: &str) -> String {
    text.replace(&marker_for(identifier), value)
}

/// Replaces every marker-shaped span still present in `text`.
pub fn replace_unmatched(text: &str, replacement: &str) -> String {
    marker_regex()
        .replace_all(text, regex::NoExpand(replacement))
        .into_owned()
}

/// Display name offered for a field created from `selection`.
pub fn suggest_name(selection: &str) -> String {
    selection.trim().chars().take(SUGGESTION_LEN).collect()
}

/// Field id offered for a field created from `selection`.
pub fn suggest_id(selection: &str) -> String {
    suggest_name(selection)
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}
