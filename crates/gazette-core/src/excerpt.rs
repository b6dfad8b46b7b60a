//! Excerpt generation - markup-stripped content previews.

/// Default excerpt length in characters.
pub const DEFAULT_EXCERPT_LENGTH: usize = 150;

/// Remove `<...>` markup tags in a single pass.
pub fn strip_tags(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut in_tag = false;
    for c in content.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

/// Build an excerpt of at most `length` characters.
///
/// Content at or under the limit is returned unchanged (tags stripped).
/// Longer content is cut at `length` characters, backtracked to the last
/// space inside the cut when one exists, and suffixed with `...`.
/// Counts characters, not bytes.
pub fn excerpt(content: &str, length: usize) -> String {
    let text = strip_tags(content);
    if text.chars().count() <= length {
        return text;
    }

    let truncated: String = text.chars().take(length).collect();
    match truncated.rfind(' ') {
        Some(idx) => format!("{}...", &truncated[..idx]),
        None => format!("{truncated}..."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("<p>Hello <b>world</b></p>"), "Hello world");
        assert_eq!(strip_tags("no markup here"), "no markup here");
        assert_eq!(
            strip_tags("<img src=\"x.png\" alt=\"y\">caption"),
            "caption"
        );
    }

    #[test]
    fn test_short_content_unchanged() {
        let content = "a".repeat(100);
        assert_eq!(excerpt(&content, 150), content);
    }

    #[test]
    fn test_exact_length_unchanged() {
        let content = "b".repeat(150);
        assert_eq!(excerpt(&content, 150), content);
    }

    #[test]
    fn test_long_content_truncated_at_word_boundary() {
        let content = "word ".repeat(40); // 200 chars
        let result = excerpt(&content, 150);

        assert!(result.ends_with("..."));
        let body = result.trim_end_matches("...");
        assert!(body.chars().count() <= 150);
        // Cut lands between words, never inside one.
        assert!(body.ends_with("word"));
    }

    #[test]
    fn test_no_space_in_window() {
        let content = "x".repeat(200);
        let result = excerpt(&content, 150);
        assert_eq!(result, format!("{}...", "x".repeat(150)));
    }

    #[test]
    fn test_markup_stripped_before_measuring() {
        let content = format!("<p>{}</p>", "a".repeat(120));
        assert_eq!(excerpt(&content, 150), "a".repeat(120));
    }
}
