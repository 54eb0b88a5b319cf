//! Suggestions and the exhaustive single-edit candidate generators.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::spelling::alphabet::{Alphabet, END_SYMBOL, START_SYMBOL, without_bounds};
use crate::spelling::selection::Selector;

/// A scored correction candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// The suggested word.
    pub word: String,
    /// Noisy-channel score (higher is better).
    pub score: f64,
    /// Edit distance from the original word.
    pub distance: usize,
}

impl Suggestion {
    pub fn new(word: String, score: f64, distance: usize) -> Self {
        Suggestion {
            word,
            score,
            distance,
        }
    }
}

impl Eq for Suggestion {}

impl Ord for Suggestion {
    fn cmp(&self, other: &Self) -> Ordering {
        // Higher scores come first
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| self.word.cmp(&other.word))
    }
}

impl PartialOrd for Suggestion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Every known word one insertion, deletion or substitution away from the
/// bounded `word`, never touching its boundaries.
///
/// Substituting a letter with itself is allowed, so a known `word` is
/// included.
pub fn single_edit_candidates(
    word: &str,
    alphabet: &Alphabet,
    known_words: &AHashSet<String>,
) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    let mut candidates = BTreeSet::new();
    let mut keep = |fixed: String| {
        if known_words.contains(&fixed) {
            candidates.insert(fixed);
        }
    };

    if chars.len() < 2 {
        return Vec::new();
    }

    for i in 1..chars.len() {
        // Insertions before position i
        for &c in alphabet.letters() {
            let mut fixed: String = chars[..i].iter().collect();
            fixed.push(c);
            fixed.extend(&chars[i..]);
            keep(fixed);
        }

        if i == chars.len() - 1 {
            break;
        }

        // Deletion of position i
        let mut fixed: String = chars[..i].iter().collect();
        fixed.extend(&chars[i + 1..]);
        keep(fixed);

        // Replacements of position i
        for &c in alphabet.letters() {
            let mut fixed: String = chars[..i].iter().collect();
            fixed.push(c);
            fixed.extend(&chars[i + 1..]);
            keep(fixed);
        }
    }

    candidates.into_iter().collect()
}

/// Best single-edit correction of a bounded word.
pub fn fix_with_single_edits(
    word: &str,
    selector: &Selector<'_>,
    alphabet: &Alphabet,
    known_words: &AHashSet<String>,
) -> Option<Suggestion> {
    let candidates = single_edit_candidates(word, alphabet, known_words);
    selector.choose(word, &candidates, false)
}

/// Candidates obtained by reading the bounded `query` as two words glued by
/// one character.
///
/// For every split offset the left and right halves are corrected on their
/// own; both must score at least `threshold`. The corrected halves are joined
/// back with the split character and the result must itself pass the
/// selector's filters.
pub fn split_candidates(
    query: &str,
    selector: &Selector<'_>,
    alphabet: &Alphabet,
    known_words: &AHashSet<String>,
    threshold: f64,
    margin: usize,
) -> Vec<String> {
    let chars: Vec<char> = query.chars().collect();
    let mut result = Vec::new();

    for i in margin..chars.len().saturating_sub(margin) {
        let mut first: String = chars[..i].iter().collect();
        first.push(END_SYMBOL);
        let mut second = String::from(START_SYMBOL);
        second.extend(&chars[i + 1..]);

        let Some(left) = fix_with_single_edits(&first, selector, alphabet, known_words) else {
            continue;
        };
        if left.score < threshold {
            continue;
        }
        let Some(right) = fix_with_single_edits(&second, selector, alphabet, known_words) else {
            continue;
        };
        if right.score < threshold {
            continue;
        }

        let joined = format!(
            "{START_SYMBOL}{}{}{}{END_SYMBOL}",
            without_bounds(&left.word),
            chars[i],
            without_bounds(&right.word)
        );
        if selector.admissible(query, &joined).is_some() && !result.contains(&joined) {
            result.push(joined);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spelling::alphabet::with_bounds;
    use crate::spelling::dictionary::{SpellingDictionary, WordPriors};
    use crate::spelling::error_model::{Correction, ErrorModel};
    use crate::spelling::selection::SelectionLimits;

    fn known(words: &[&str]) -> AHashSet<String> {
        words.iter().map(|w| with_bounds(w)).collect()
    }

    #[test]
    fn test_suggestion_ordering() {
        let mut suggestions = vec![
            Suggestion::new("#A$".to_string(), -3.0, 1),
            Suggestion::new("#B$".to_string(), -1.0, 1),
            Suggestion::new("#C$".to_string(), -2.0, 0),
        ];
        suggestions.sort();
        let words: Vec<&str> = suggestions.iter().map(|s| s.word.as_str()).collect();
        assert_eq!(words, vec!["#B$", "#C$", "#A$"]);
    }

    #[test]
    fn test_single_edit_candidates() {
        let alphabet = Alphabet::new("ABCDEFGHIJKLMNOPQRSTUVWXYZ");
        let known = known(&["CAT", "CART", "AT", "COT", "DOG"]);

        let candidates = single_edit_candidates("#CAT$", &alphabet, &known);
        assert_eq!(
            candidates,
            vec![
                "#AT$".to_string(),
                "#CART$".to_string(),
                "#CAT$".to_string(),
                "#COT$".to_string()
            ]
        );

        // Boundaries are never edited.
        let candidates = single_edit_candidates("#XDOG$", &alphabet, &known);
        assert_eq!(candidates, vec!["#DOG$".to_string()]);

        assert!(single_edit_candidates("#$", &alphabet, &known).is_empty());
    }

    #[test]
    fn test_split_candidates_rejoin_halves() {
        let mut dictionary = SpellingDictionary::new();
        for (word, freq) in [
            ("SUN", 50.0),
            ("FLOWER", 50.0),
            ("SUNAFLOWER", 40.0),
            ("MOON", 10.0),
        ] {
            dictionary.add_word(word, freq);
        }
        let priors = WordPriors::from_dictionary(&dictionary).unwrap();
        let known_words = known(&["SUN", "FLOWER", "SUNAFLOWER", "MOON"]);

        let mut model = ErrorModel::new();
        model
            .train(&[
                Correction::new("#SUM$", "#SUN$", 1.0),
                Correction::new("#FLOWR$", "#FLOWER$", 1.0),
            ])
            .unwrap();

        let limits = SelectionLimits {
            prior_accept_ratio: 0.0,
            max_correction_distance: 1,
        };
        let selector = Selector::new(&model, &priors, &known_words, limits);
        let alphabet = Alphabet::latin_uppercase();

        // "#SUNAFLOWEP$" splits at 'A' into "#SUN$" and "#FLOWEP$".
        let candidates = split_candidates(
            "#SUNAFLOWEP$",
            &selector,
            &alphabet,
            &known_words,
            f64::NEG_INFINITY,
            3,
        );
        assert_eq!(candidates, vec!["#SUNAFLOWER$".to_string()]);

        let none = split_candidates(
            "#SUNAFLOWEP$",
            &selector,
            &alphabet,
            &known_words,
            f64::INFINITY,
            3,
        );
        assert!(none.is_empty());
    }
}
