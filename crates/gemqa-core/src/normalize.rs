//! Question normalization

/// Normalize a raw question before it is placed in the prompt
///
/// Lowercases, drops everything except ASCII letters, digits and whitespace,
/// then collapses whitespace runs into single spaces.
///
/// ```
/// use gemqa_core::normalize;
///
/// assert_eq!(
///     normalize("What is Rust's ownership model?"),
///     "what is rusts ownership model"
/// );
/// assert_eq!(normalize("   "), "");
/// ```
pub fn normalize(raw: &str) -> String {
    let kept: String = raw
        .to_lowercase()
        .chars()
        .filter(|&c| c.is_ascii_lowercase() || c.is_ascii_digit() || is_separator(c))
        .collect();

    kept.split(is_separator)
        .filter(|token| !token.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Unicode whitespace plus the ASCII information separators (U+001C..=U+001F)
fn is_separator(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}
