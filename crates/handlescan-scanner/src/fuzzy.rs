//! Permissive text matching for ambiguous profile pages.

/// Suffixes and prefixes commonly attached to a handle on profile pages.
const SUFFIXES: [&str; 3] = ["_official", "_real", "official"];
const PREFIXES: [&str; 1] = ["the"];

/// The handle plus the decorated forms a profile page may show instead.
///
/// Includes each digit 0-9 appended and prepended.
pub fn handle_variations(handle: &str) -> Vec<String> {
    let mut variations = Vec::with_capacity(1 + SUFFIXES.len() + PREFIXES.len() + 20);
    variations.push(handle.to_string());
    variations.extend(SUFFIXES.iter().map(|suffix| format!("{handle}{suffix}")));
    variations.extend(PREFIXES.iter().map(|prefix| format!("{prefix}{handle}")));

    for digit in 0..=9 {
        variations.push(format!("{handle}{digit}"));
        variations.push(format!("{digit}{handle}"));
    }

    variations
}

/// Whether `text` mentions `handle` or one of its variations, ignoring case.
pub fn looks_like_match(text: &str, handle: &str) -> bool {
    if text.is_empty() || handle.is_empty() {
        return false;
    }

    let text = text.to_lowercase();
    handle_variations(&handle.to_lowercase())
        .iter()
        .any(|variation| text.contains(variation.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variation_count() {
        let variations = handle_variations("alice");
        assert_eq!(variations.len(), 25);
        assert_eq!(variations[0], "alice");
        assert!(variations.contains(&"alice_official".to_string()));
        assert!(variations.contains(&"thealice".to_string()));
        assert!(variations.contains(&"7alice".to_string()));
        assert!(variations.contains(&"alice0".to_string()));
    }

    #[test]
    fn test_verbatim_match_ignores_case() {
        assert!(looks_like_match("<h1>Alice123</h1>", "alice123"));
        assert!(looks_like_match("profile of ALICE123", "Alice123"));
    }

    #[test]
    fn test_decorated_match() {
        assert!(looks_like_match("follow @TheAlice for updates", "alice"));
    }

    #[test]
    fn test_no_match() {
        assert!(!looks_like_match("Sorry, user not found", "alice123"));
    }

    #[test]
    fn test_empty_text_never_matches() {
        assert!(!looks_like_match("", "alice"));
    }
}
