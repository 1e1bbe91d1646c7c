use super::vocabulary::Vocabulary;

/// Whether at least `min_matches` tokens belong to the vocabulary.
///
/// Every matching occurrence counts once, however many category sets the
/// token belongs to. The scan stops as soon as the threshold is reached.
pub fn has_domain_signal<S: AsRef<str>>(tokens: &[S], vocab: &Vocabulary, min_matches: usize) -> bool {
    if min_matches == 0 {
        return true;
    }

    let mut matches = 0;
    for token in tokens {
        if vocab.contains(token.as_ref()) {
            matches += 1;
            if matches >= min_matches {
                return true;
            }
        }
    }
    false
}

/// Number of vocabulary hits in `tokens` (full pass, for logging).
pub fn count_matches<S: AsRef<str>>(tokens: &[S], vocab: &Vocabulary) -> usize {
    tokens.iter().filter(|t| vocab.contains(t.as_ref())).count()
}
