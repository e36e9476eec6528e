//! Shared helpers: process execution, MIME lookup, path handling.

pub mod exec;
pub mod mime;
pub mod path;

/// `"s"` unless `n` is exactly one.
#[inline]
pub fn plural_s(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// `3 diagrams`, `1 diagram`, `0 diagrams`.
#[inline]
pub fn plural_count(count: usize, noun: &str) -> String {
    format!("{count} {noun}{}", plural_s(count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plural_count() {
        assert_eq!(plural_count(0, "frame"), "0 frames");
        assert_eq!(plural_count(1, "frame"), "1 frame");
        assert_eq!(plural_count(110, "author"), "110 authors");
        assert_eq!(plural_s(2), "s");
    }
}
