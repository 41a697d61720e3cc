//! Text helpers for filenames and route segments.

use std::sync::OnceLock;

use regex::Regex;

/// Converts a display name to a URL-safe slug.
///
/// Lower-cases the input, strips characters that are neither word
/// characters, whitespace, nor hyphens, and collapses runs of whitespace
/// and hyphens into a single hyphen.
///
/// # Examples
///
/// ```
/// use exportable_admin::text::slugify;
///
/// assert_eq!(slugify("Order Item"), "order-item");
/// assert_eq!(slugify("Tab Delimited"), "tab-delimited");
/// assert_eq!(slugify("CSV"), "csv");
/// ```
pub fn slugify(name: &str) -> String {
    static STRIP: OnceLock<Regex> = OnceLock::new();
    static JOIN: OnceLock<Regex> = OnceLock::new();

    let strip = STRIP.get_or_init(|| Regex::new(r"[^\w\s-]").unwrap());
    let join = JOIN.get_or_init(|| Regex::new(r"[-\s]+").unwrap());

    let lowered = name.to_lowercase();
    let stripped = strip.replace_all(&lowered, "");
    let joined = join.replace_all(&stripped, "-");
    joined.trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_simple() {
        assert_eq!(slugify("item"), "item");
        assert_eq!(slugify("Order Item"), "order-item");
    }

    #[test]
    fn test_slugify_strips_punctuation() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("100% Pure"), "100-pure");
    }

    #[test]
    fn test_slugify_collapses_separators() {
        assert_eq!(slugify("  Spaced   Out  "), "spaced-out");
        assert_eq!(slugify("already-slugged"), "already-slugged");
        assert_eq!(slugify("a - b"), "a-b");
    }

    #[test]
    fn test_slugify_empty() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!!"), "");
    }
}
