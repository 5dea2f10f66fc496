// src/language.rs
//! Best-effort language tagging over title+summary text.

/// Sentinel for text too short or too ambiguous to classify.
pub const UNKNOWN_LANGUAGE: &str = "unknown";

/// Text at or below this many chars is not worth running detection on.
const MIN_DETECT_LEN: usize = 10;

/// Detect the language of combined title+summary text.
///
/// Returns an ISO-639-3 code, or `"unknown"` for short or undecidable
/// input. Classification failure never propagates to the caller.
pub fn detect_language(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= MIN_DETECT_LEN {
        return UNKNOWN_LANGUAGE.to_string();
    }
    match whatlang::detect(trimmed) {
        Some(info) => info.lang().code().to_string(),
        None => UNKNOWN_LANGUAGE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_text_is_tagged_eng() {
        let tag = detect_language("The central bank kept interest rates unchanged on Tuesday.");
        assert_eq!(tag, "eng");
    }

    #[test]
    fn short_text_is_unknown() {
        assert_eq!(detect_language("Hi there"), UNKNOWN_LANGUAGE);
        assert_eq!(detect_language("          "), UNKNOWN_LANGUAGE);
        assert_eq!(detect_language(""), UNKNOWN_LANGUAGE);
    }

    #[test]
    fn threshold_is_strictly_more_than_ten_chars() {
        // exactly 10 chars after trim -> unknown
        assert_eq!(detect_language("abcdefghij"), UNKNOWN_LANGUAGE);
    }
}
