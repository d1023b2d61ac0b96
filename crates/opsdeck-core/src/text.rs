//! Lossy text bounding.

/// Marker appended to text cut by [`truncate_with_marker`].
pub const TRUNCATION_MARKER: &str = "...(truncated)";

/// Keep at most `max_chars` characters of `text`, appending `marker` if
/// anything was cut. Counts Unicode scalar values, so multi-byte text is
/// never split inside a character.
///
/// ```rust
/// use opsdeck_core::text::truncate_with_marker;
///
/// assert_eq!(truncate_with_marker("hello", 10, "..."), "hello");
/// assert_eq!(truncate_with_marker("hello world", 5, "..."), "hello...");
/// ```
pub fn truncate_with_marker(text: &str, max_chars: usize, marker: &str) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => {
            let mut out = String::with_capacity(byte_idx + marker.len());
            out.push_str(&text[..byte_idx]);
            out.push_str(marker);
            out
        }
        None => text.to_string(),
    }
}

/// [`truncate_with_marker`] with the standard `...(truncated)` marker.
pub fn truncate(text: &str, max_chars: usize) -> String {
    truncate_with_marker(text, max_chars, TRUNCATION_MARKER)
}
