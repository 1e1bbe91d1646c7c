use super::types::Category;
use super::vocabulary::Vocabulary;

/// Categories represented by at least one token, in `Category::ALL` order.
pub fn categories_present<S: AsRef<str>>(tokens: &[S], vocab: &Vocabulary) -> Vec<Category> {
    Category::ALL
        .into_iter()
        .filter(|category| tokens.iter().any(|t| vocab.belongs_to(t.as_ref(), *category)))
        .collect()
}

/// Whether the matched terms span at least `min_categories` distinct categories.
///
/// A text naming one category many times ("pain pain pain") is a keyword
/// mention, not a symptom report.
pub fn is_structurally_complete<S: AsRef<str>>(
    tokens: &[S],
    vocab: &Vocabulary,
    min_categories: usize,
) -> bool {
    categories_present(tokens, vocab).len() >= min_categories
}
