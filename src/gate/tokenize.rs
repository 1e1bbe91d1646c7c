//! Text normalization shared by every gate stage.
//!
//! A token is a maximal run of lowercase ASCII letters after the text has
//! been lowercased and every character outside `[a-z]` and whitespace has
//! been replaced with a space.

/// Split `text` into normalized tokens. Empty tokens never appear.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();

    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() {
            current.push(c);
        } else if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_splits_on_whitespace() {
        assert_eq!(tokenize("Sharp Pain\tin my\nKNEE"), vec!["sharp", "pain", "in", "my", "knee"]);
    }

    #[test]
    fn punctuation_and_digits_become_separators() {
        assert_eq!(
            tokenize("fever, 39.5C since mon-day!"),
            vec!["fever", "c", "since", "mon", "day"]
        );
    }

    #[test]
    fn apostrophes_split_contractions() {
        assert_eq!(tokenize("I can't sleep"), vec!["i", "can", "t", "sleep"]);
    }

    #[test]
    fn non_ascii_letters_are_separators() {
        assert_eq!(tokenize("douleur à l'épaule"), vec!["douleur", "l", "paule"]);
    }

    #[test]
    fn empty_and_symbol_only_input_yield_no_tokens() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   ").is_empty());
        assert!(tokenize("123 !!! ???").is_empty());
    }
}
