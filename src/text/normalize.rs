//! Deterministic text cleanup applied before embedding and lexical
//! comparison.

/// Normalize raw extracted text: lower-case, drop digits and punctuation
/// (keeping word characters and whitespace across any script, since content
/// may be multilingual), collapse whitespace runs to single spaces.
///
/// Pure and idempotent: `normalize(normalize(s)) == normalize(s)`. Whitespace
/// is collapsed last so stripping never reintroduces double spaces.
pub fn normalize(text: &str) -> String {
    let stripped: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphabetic() || *c == '_' || c.is_whitespace())
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_collapses() {
        assert_eq!(normalize("Hello   WORLD"), "hello world");
    }

    #[test]
    fn test_strips_digits_and_punctuation() {
        assert_eq!(normalize("Chapter 12: Intro!"), "chapter intro");
    }

    #[test]
    fn test_multilingual_kept() {
        assert_eq!(normalize("Équations différentielles"), "équations différentielles");
        assert_eq!(normalize("سورة البقرة 2"), "سورة البقرة");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "  Mixed   CASE 42 text!?",
            "déjà-vu, 3 fois",
            "",
            "a 1 b",
            "tabs\tand\nnewlines",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn test_empty_and_symbol_only() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("1234 !!! ..."), "");
    }
}
