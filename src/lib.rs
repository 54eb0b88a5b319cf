//! # spelltrie
//!
//! A statistical spelling corrector for single words.
//!
//! ## Features
//!
//! - Character-level error model learned from observed misspellings
//! - Frequency-weighted prefix trie over the dictionary
//! - Best-first search with pruning and a calibrated acceptance threshold
//! - Parallel batch correction
//!
//! ```
//! use spelltrie::spelling::{Correction, SpellConfig, SpellingCorrector, SpellingDictionary};
//!
//! let mut dictionary = SpellingDictionary::new();
//! dictionary.add_word("КОРОВА", 30.0);
//! let training = vec![Correction::new("КАРОВА", "КОРОВА", 1.0)];
//!
//! let corrector = SpellingCorrector::build(&dictionary, &training, SpellConfig::default()).unwrap();
//! assert_eq!(corrector.fix("КАРОВА"), "КОРОВА");
//! ```

pub mod cli;
pub mod dataset;
pub mod error;
pub mod spelling;

pub mod prelude {
    pub use crate::error::{Result, SpellError};
    pub use crate::spelling::{
        Alphabet, Correction, CorrectionOutcome, CorrectionResult, SpellConfig,
        SpellingCorrector, SpellingDictionary,
    };
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
