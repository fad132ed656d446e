//! Query normalization

/// Trim surrounding whitespace from raw input.
pub fn normalize(raw: &str) -> String {
    raw.trim().to_string()
}

/// Whether a normalized query may reach the network.
///
/// `min_len` counts characters, not bytes. A `min_len` of 0 behaves like 1:
/// a blank query is never searchable.
pub fn is_searchable(normalized: &str, min_len: usize) -> bool {
    !normalized.is_empty() && normalized.chars().count() >= min_len
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Harry "), "Harry");
        assert_eq!(normalize("\tHarry Potter\n"), "Harry Potter");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize(""), "");
        // Inner whitespace is preserved
        assert_eq!(normalize(" a  b "), "a  b");
    }

    #[test]
    fn test_is_searchable() {
        assert!(is_searchable("H", 1));
        assert!(is_searchable("H", 0));
        assert!(!is_searchable("", 0));
        assert!(!is_searchable("", 1));
        assert!(!is_searchable("Ha", 3));
        assert!(is_searchable("Har", 3));
        // Multi-byte characters count once
        assert!(is_searchable("日本", 2));
        assert!(!is_searchable("é", 2));
    }
}
