// src/normalize.rs
//! Text cleanup for raw feed fields.

use once_cell::sync::OnceCell;
use regex::Regex;

/// Strip markup and collapse whitespace from one raw entry field.
///
/// HTML entities are decoded, tags removed, whitespace runs (including
/// newlines) collapsed to single spaces, and runs of three or more
/// periods collapsed to a literal `...`. Empty input yields an empty
/// string, never an error.
pub fn clean_text(s: &str) -> String {
    if s.is_empty() {
        return String::new();
    }

    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    static RE_TAGS: OnceCell<Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, "").to_string();

    // 3) Collapse whitespace
    static RE_WS: OnceCell<Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").to_string();

    // 4) Collapse ellipsis runs
    static RE_DOTS: OnceCell<Regex> = OnceCell::new();
    let re_dots = RE_DOTS.get_or_init(|| Regex::new(r"\.{3,}").unwrap());
    out = re_dots.replace_all(&out, "...").to_string();

    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_tags_and_collapses_ws_and_dots() {
        assert_eq!(clean_text("<p>Hello   world</p>...."), "Hello world...");
    }

    #[test]
    fn decodes_entities() {
        assert_eq!(clean_text("Rates &amp; markets"), "Rates & markets");
    }

    #[test]
    fn newlines_collapse_to_single_spaces() {
        assert_eq!(clean_text("line one\n\n\tline two  "), "line one line two");
    }

    #[test]
    fn empty_input_is_empty_output() {
        assert_eq!(clean_text(""), "");
        assert_eq!(clean_text("   \n "), "");
    }

    #[test]
    fn markup_only_input_is_empty() {
        assert_eq!(clean_text("<div><br/></div>"), "");
    }
}
