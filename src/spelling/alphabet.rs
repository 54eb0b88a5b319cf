//! Bounded word representation and the alphabet predicate.
//!
//! Internally every word is wrapped in explicit start/end sentinels so that
//! the transitions at the word boundary are themselves scoreable edits.

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SpellError};

/// Marks the beginning of a bounded word.
pub const START_SYMBOL: char = '#';
/// Marks the end of a bounded word; trie nodes reached through it are leaves.
pub const END_SYMBOL: char = '$';
/// Placeholder for "no character" in edit contexts and statistic keys.
pub const NONE_SYMBOL: char = 'ø';

/// Upper-case Russian letters, the alphabet used by default.
pub const RUSSIAN_LETTERS: &str = "ЙЦУКЕНГШЩЗХЪФЫВАПРОЛДЖЭЁЯЧСМИТЬБЮ";

/// Returns true if the character is one of the reserved sentinels.
pub fn is_reserved(ch: char) -> bool {
    ch == START_SYMBOL || ch == END_SYMBOL || ch == NONE_SYMBOL
}

/// Wrap a plain word in boundary sentinels.
pub fn with_bounds(word: &str) -> String {
    let mut bounded = String::with_capacity(word.len() + 2);
    bounded.push(START_SYMBOL);
    bounded.push_str(word);
    bounded.push(END_SYMBOL);
    bounded
}

/// Strip the boundary sentinels from a word, if present.
pub fn without_bounds(word: &str) -> &str {
    let word = word.strip_prefix(START_SYMBOL).unwrap_or(word);
    word.strip_suffix(END_SYMBOL).unwrap_or(word)
}

/// Reject plain words that contain reserved characters.
pub fn validate_word(word: &str) -> Result<()> {
    if word.chars().any(is_reserved) {
        return Err(SpellError::invalid_word(format!(
            "'{word}' contains a reserved boundary character"
        )));
    }
    Ok(())
}

/// The set of letters a query must consist of to be considered for correction.
///
/// The order of letters is kept, so candidate generation that enumerates the
/// alphabet is deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Alphabet {
    letters: Vec<char>,
    set: AHashSet<char>,
}

impl Alphabet {
    /// Create an alphabet from a string of letters. Duplicates and reserved
    /// sentinels are ignored.
    pub fn new(letters: &str) -> Self {
        let mut set = AHashSet::new();
        let letters = letters
            .chars()
            .filter(|&c| !is_reserved(c) && set.insert(c))
            .collect();
        Alphabet { letters, set }
    }

    /// Upper-case Russian letters.
    pub fn russian() -> Self {
        Self::new(RUSSIAN_LETTERS)
    }

    /// Upper-case Latin letters.
    pub fn latin_uppercase() -> Self {
        Self::new("ABCDEFGHIJKLMNOPQRSTUVWXYZ")
    }

    /// Check membership of a single character.
    pub fn contains(&self, ch: char) -> bool {
        self.set.contains(&ch)
    }

    /// Check that every character of a plain word belongs to the alphabet.
    pub fn accepts(&self, word: &str) -> bool {
        word.chars().all(|c| self.contains(c))
    }

    /// Letters in their declared order.
    pub fn letters(&self) -> &[char] {
        &self.letters
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::russian()
    }
}

impl From<String> for Alphabet {
    fn from(letters: String) -> Self {
        Alphabet::new(&letters)
    }
}

impl From<Alphabet> for String {
    fn from(alphabet: Alphabet) -> Self {
        alphabet.letters.into_iter().collect()
    }
}
