//! Statistical spelling correction over a frequency-weighted trie.
//!
//! Words are corrected with a noisy-channel model: an [`error_model`] learned
//! from observed misspellings scores the edits, word priors derived from the
//! [`dictionary`] score the result, and a best-first [`search`] over the
//! [`trie`] proposes candidates that the [`corrector`] accepts or rejects.

pub mod alphabet;
pub mod config;
pub mod corrector;
pub mod dictionary;
pub mod edit_script;
pub mod error_model;
pub mod search;
pub mod selection;
pub mod suggest;
pub mod trie;

// Re-export commonly used types
pub use alphabet::{Alphabet, END_SYMBOL, NONE_SYMBOL, START_SYMBOL};
pub use config::SpellConfig;
pub use corrector::{
    CorrectionOutcome, CorrectionResult, CorrectorConfig, CorrectorStats, SpellingCorrector,
};
pub use dictionary::{SpellingDictionary, WordPriors};
pub use edit_script::{Edit, OperationType, align, edit_distance};
pub use error_model::{Correction, ErrorModel, ErrorModelConfig};
pub use search::{BeamSearch, SearchConfig, SearchOutcome, Termination};
pub use suggest::Suggestion;
pub use trie::{NodeId, Trie};
