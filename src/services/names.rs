use regex::Regex;
use std::sync::OnceLock;

fn color_open() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)<c=[^>]*>").expect("static pattern"))
}

fn color_close() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)</c>").expect("static pattern"))
}

/// Normalizes a decoration display name for catalog matching:
/// strips `<c=...>`/`</c>` color wrappers, truncates at the first line
/// break, collapses whitespace runs to single spaces, and trims. Two names
/// differing only in such decoration clean to the same string.
pub fn clean(raw: &str) -> String {
    let stripped = color_open().replace_all(raw, "");
    let stripped = color_close().replace_all(&stripped, "");
    let first_line = stripped.split(['\r', '\n']).next().unwrap_or("");
    first_line.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Case-insensitive lookup key for a cleaned name.
pub fn lookup_key(cleaned: &str) -> String {
    cleaned.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_color_wrappers() {
        assert_eq!(clean("<c=@flavor>Lantern</c>"), "Lantern");
        assert_eq!(clean("<C=#ffaa00>Lantern</C>"), "Lantern");
    }

    #[test]
    fn truncates_at_first_line_break() {
        assert_eq!(clean("Lantern\nA warm glow"), "Lantern");
        assert_eq!(clean("Lantern\r\nA warm glow"), "Lantern");
    }

    #[test]
    fn collapses_and_trims_whitespace() {
        assert_eq!(clean("  Basic   Bench \t "), "Basic Bench");
        assert_eq!(clean("Basic Bench"), clean("Basic  Bench  "));
    }

    #[test]
    fn handles_nested_and_unclosed_markup() {
        assert_eq!(clean("<c=@a><c=@b>Lantern</c></c>"), "Lantern");
        assert_eq!(clean("Lantern</c>"), "Lantern");
        // an unterminated wrapper is not a wrapper; left as-is
        assert_eq!(clean("<c=@aLantern"), "<c=@aLantern");
    }

    #[test]
    fn empty_and_markup_only_names_clean_to_empty() {
        assert_eq!(clean(""), "");
        assert_eq!(clean("<c=@flavor></c>"), "");
        assert_eq!(clean("\n\n"), "");
    }

    #[test]
    fn lookup_key_is_case_insensitive() {
        assert_eq!(lookup_key("Basic Lantern"), lookup_key("BASIC lantern"));
    }
}
