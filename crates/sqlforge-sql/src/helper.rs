//! Shared utility functions

/// Formats string arguments as CSV, skipping empty entries.
///
/// # Example
///
/// ```
/// use sqlforge_sql::helper::csv;
///
/// assert_eq!(csv(&["a", "b", "c"], ", "), "a, b, c");
/// assert_eq!(csv(&["a", "", "c"], ", "), "a, c");
/// ```
pub fn csv(args: &[&str], sep: &str) -> String {
    args.iter()
        .filter(|s| !s.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(sep)
}

/// Whether `name` can be emitted without quoting: a leading lowercase letter
/// or underscore followed by lowercase letters, digits, and underscores.
///
/// # Example
///
/// ```
/// use sqlforge_sql::helper::is_safe_identifier;
///
/// assert!(is_safe_identifier("user_id"));
/// assert!(!is_safe_identifier("User"));
/// assert!(!is_safe_identifier("col name"));
/// assert!(!is_safe_identifier(""));
/// ```
pub fn is_safe_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_lowercase() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}
