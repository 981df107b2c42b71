/// Collapses a comment onto a single line: every `\n` becomes a space, then
/// surrounding whitespace is trimmed.
///
/// ```
/// use commentsense::normalize_comment;
///
/// assert_eq!(normalize_comment("  Great\nproduct \n"), "Great product");
/// assert_eq!(normalize_comment("\n\n"), "");
/// ```
pub fn normalize_comment(comment: &str) -> String {
    comment.replace('\n', " ").trim().to_string()
}
