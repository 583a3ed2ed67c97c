/// Maximum characters of copied text reported in an event.
pub const SNIPPET_LIMIT: usize = 100;
pub const ELLIPSIS: &str = "...";

/// Builds the reported snippet for a copy action.
///
/// Returns `None` for an empty selection. The selection is reported as-is,
/// whitespace included. Truncation counts characters, not bytes.
pub fn copy_snippet(selection: &str) -> Option<String> {
    if selection.is_empty() {
        return None;
    }

    match selection.char_indices().nth(SNIPPET_LIMIT) {
        Some((cut, _)) => Some(format!("{}{ELLIPSIS}", &selection[..cut])),
        None => Some(selection.to_string()),
    }
}
