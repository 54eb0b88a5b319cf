//! Word frequencies and the normalized word priors derived from them.

use ahash::AHashMap;

use crate::error::{Result, SpellError};
use crate::spelling::alphabet::with_bounds;

/// A dictionary that stores plain words and their frequencies.
#[derive(Debug, Clone, Default)]
pub struct SpellingDictionary {
    /// Words and their frequencies
    words: AHashMap<String, f64>,
    /// Sum of all frequencies
    total_count: f64,
}

impl SpellingDictionary {
    /// Create a new empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the frequency of a word, replacing any previous value.
    pub fn add_word<S: Into<String>>(&mut self, word: S, frequency: f64) {
        let word = word.into();
        let old_freq = self.words.insert(word, frequency).unwrap_or(0.0);
        self.total_count += frequency - old_freq;
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains_key(word)
    }

    /// Get the frequency of a word, zero if absent.
    pub fn frequency(&self, word: &str) -> f64 {
        self.words.get(word).copied().unwrap_or(0.0)
    }

    pub fn words(&self) -> &AHashMap<String, f64> {
        &self.words
    }

    /// Iterate words in a stable order.
    pub fn sorted_words(&self) -> Vec<(&str, f64)> {
        let mut words: Vec<(&str, f64)> = self
            .words
            .iter()
            .map(|(word, freq)| (word.as_str(), *freq))
            .collect();
        words.sort_by(|a, b| a.0.cmp(b.0));
        words
    }

    /// Get the total number of unique words.
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Get the total frequency count.
    pub fn total_frequency(&self) -> f64 {
        self.total_count
    }
}

impl FromIterator<(String, f64)> for SpellingDictionary {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        let mut dictionary = SpellingDictionary::new();
        for (word, frequency) in iter {
            dictionary.add_word(word, frequency);
        }
        dictionary
    }
}

/// Normalized prior probabilities of bounded words and their affixes.
///
/// Besides every word, the prefixes and suffixes obtained by splitting a
/// bounded word at an inner position receive the word's frequency, so that
/// fragments of long words can be scored when a query is split.
#[derive(Debug, Clone)]
pub struct WordPriors {
    priors: AHashMap<String, f64>,
    average: f64,
    floor: f64,
}

impl WordPriors {
    /// Number of boundary-side characters never split off.
    const SPLIT_MARGIN: usize = 3;

    pub fn from_dictionary(dictionary: &SpellingDictionary) -> Result<Self> {
        let total = dictionary.total_frequency();
        if total <= 0.0 || !total.is_finite() {
            return Err(SpellError::dictionary(format!(
                "total frequency must be positive, got {total}"
            )));
        }

        let mut priors: AHashMap<String, f64> = AHashMap::with_capacity(dictionary.word_count());
        for (word, frequency) in dictionary.sorted_words() {
            let bounded = with_bounds(word);
            *priors.entry(bounded.clone()).or_insert(0.0) += frequency;

            let chars: Vec<char> = bounded.chars().collect();
            let upper = chars.len().saturating_sub(Self::SPLIT_MARGIN);
            for split in Self::SPLIT_MARGIN..upper {
                let prefix: String = chars[..split].iter().collect();
                let suffix: String = chars[split..].iter().collect();
                *priors.entry(prefix).or_insert(0.0) += frequency;
                *priors.entry(suffix).or_insert(0.0) += frequency;
            }
        }

        for prior in priors.values_mut() {
            *prior /= total;
        }
        let mut entries: Vec<(&String, &f64)> = priors.iter().collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        let average = entries.iter().map(|&(_, &prior)| prior).sum::<f64>() / entries.len() as f64;

        log::debug!(
            "computed {} priors from {} words, average {:.3e}",
            priors.len(),
            dictionary.word_count(),
            average
        );

        Ok(WordPriors {
            priors,
            average,
            floor: 1.0 / total,
        })
    }

    /// Prior of a bounded word or affix.
    pub fn prior(&self, word: &str) -> Option<f64> {
        self.priors.get(word).copied()
    }

    /// Prior of a bounded word, or the floor if it is unknown.
    pub fn prior_or_floor(&self, word: &str) -> f64 {
        self.prior(word).unwrap_or(self.floor)
    }

    /// Mean prior over all entries.
    pub fn average(&self) -> f64 {
        self.average
    }

    /// Probability assigned to unknown words.
    pub fn floor(&self) -> f64 {
        self.floor
    }

    pub fn len(&self) -> usize {
        self.priors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.priors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dictionary_basic_operations() {
        let mut dict = SpellingDictionary::new();

        assert!(!dict.contains("КОТ"));
        assert_eq!(dict.frequency("КОТ"), 0.0);
        assert_eq!(dict.word_count(), 0);

        dict.add_word("КОТ", 5.0);
        assert!(dict.contains("КОТ"));
        assert_eq!(dict.frequency("КОТ"), 5.0);
        assert_eq!(dict.total_frequency(), 5.0);

        dict.add_word("КОТ", 2.0);
        assert_eq!(dict.frequency("КОТ"), 2.0);
        assert_eq!(dict.total_frequency(), 2.0);

        dict.add_word("ПЁС", 3.0);
        assert_eq!(dict.word_count(), 2);
        assert_eq!(dict.total_frequency(), 5.0);
        assert!(!dict.contains("кот"));
    }

    #[test]
    fn test_priors_normalized_with_affixes() {
        let dict: SpellingDictionary = vec![
            ("КОРОВА".to_string(), 3.0),
            ("КОТ".to_string(), 1.0),
        ]
        .into_iter()
        .collect();
        let priors = WordPriors::from_dictionary(&dict).unwrap();

        assert!((priors.prior("#КОРОВА$").unwrap() - 0.75).abs() < 1e-12);
        assert!((priors.prior("#КОТ$").unwrap() - 0.25).abs() < 1e-12);
        // "#КОРОВА$" has 8 characters: splits at 3 and 4.
        assert!((priors.prior("#КО").unwrap() - 0.75).abs() < 1e-12);
        assert!((priors.prior("ОВА$").unwrap() - 0.75).abs() < 1e-12);
        assert!((priors.prior("#КОР").unwrap() - 0.75).abs() < 1e-12);
        assert!(priors.prior("#К").is_none());
        // "#КОТ$" is too short to be split.
        assert_eq!(priors.len(), 6);

        assert_eq!(priors.floor(), 0.25);
        assert_eq!(priors.prior_or_floor("#ЛЕС$"), 0.25);
        let expected_average = (0.75 * 5.0 + 0.25) / 6.0;
        assert!((priors.average() - expected_average).abs() < 1e-12);
    }

    #[test]
    fn test_priors_independent_of_insertion_order() {
        let words = [
            ("МОЛИТВЫ", 40.0),
            ("КОРОВА", 30.0),
            ("РАДИО", 20.0),
            ("БОЛЕЗНЕННЫЕ", 7.0),
            ("КОТ", 10.0),
        ];
        let forward: SpellingDictionary =
            words.iter().map(|(w, f)| (w.to_string(), *f)).collect();
        let backward: SpellingDictionary =
            words.iter().rev().map(|(w, f)| (w.to_string(), *f)).collect();

        let a = WordPriors::from_dictionary(&forward).unwrap();
        let b = WordPriors::from_dictionary(&backward).unwrap();
        assert_eq!(a.average().to_bits(), b.average().to_bits());
        assert_eq!(a.len(), b.len());
    }

    #[test]
    fn test_priors_reject_empty_dictionary() {
        let dict = SpellingDictionary::new();
        assert!(matches!(
            WordPriors::from_dictionary(&dict),
            Err(SpellError::Dictionary(_))
        ));
    }
}
