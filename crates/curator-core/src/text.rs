//! Text normalization applied to labels and model responses before
//! scoring and ledger storage.

/// Strip non-alphabetic characters (keeping spaces), then collapse
/// double spaces with a single pass.
///
/// Responses arrive with punctuation, digits, and markdown debris that
/// only add noise to embedding comparisons against short labels.
pub fn normalize(text: &str) -> String {
    let filtered: String = text
        .chars()
        .filter(|c| c.is_alphabetic() || *c == ' ')
        .collect();
    filtered.replace("  ", " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_punctuation_and_digits() {
        assert_eq!(normalize("A cat, sitting on 2 mats!"), "A cat sitting on mats");
    }

    #[test]
    fn test_normalize_keeps_plain_text() {
        assert_eq!(normalize("golden retriever"), "golden retriever");
    }

    #[test]
    fn test_normalize_collapses_double_spaces() {
        assert_eq!(normalize("a  b"), "a b");
    }

    #[test]
    fn test_normalize_unicode_alphabetic_kept() {
        assert_eq!(normalize("Schloss Neuschwanstein"), "Schloss Neuschwanstein");
        assert_eq!(normalize("café №5"), "café ");
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("123!?"), "");
    }
}
