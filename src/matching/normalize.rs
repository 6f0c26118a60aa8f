use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Keep letters, digits, whitespace and the email characters @ and .
    static ref STRIP: Regex = Regex::new(r"[^\p{L}\p{N}\s@.]").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Normalize a raw field value before comparison: lowercase, strip
/// punctuation, collapse runs of whitespace.
pub fn normalize_field(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    let stripped = STRIP.replace_all(&lowered, "");
    WHITESPACE.replace_all(stripped.trim(), " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::normalize_field;

    #[test]
    fn lowercases_and_trims() {
        assert_eq!(normalize_field("  Julia "), "julia");
    }

    #[test]
    fn strips_punctuation_but_keeps_email_characters() {
        assert_eq!(normalize_field("O'Brien"), "obrien");
        assert_eq!(
            normalize_field("J.Smith@Example.com"),
            "j.smith@example.com"
        );
    }

    #[test]
    fn collapses_internal_whitespace() {
        assert_eq!(normalize_field("mary   ann"), "mary ann");
    }
}
