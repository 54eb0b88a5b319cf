//! Main spelling corrector that ties the trie, the error model and the word
//! priors together.

use std::sync::Arc;

use ahash::{AHashMap, AHashSet};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SpellError};
use crate::spelling::alphabet::{Alphabet, validate_word, with_bounds, without_bounds};
use crate::spelling::config::SpellConfig;
use crate::spelling::dictionary::{SpellingDictionary, WordPriors};
use crate::spelling::error_model::{Correction, ErrorModel};
use crate::spelling::search::{BeamSearch, SearchState};
use crate::spelling::selection::{SelectionLimits, Selector};
use crate::spelling::suggest::{Suggestion, split_candidates};
use crate::spelling::trie::Trie;

/// Configuration for the spelling corrector.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrectorConfig {
    /// Letters a query must consist of to be corrected.
    pub alphabet: Alphabet,
    /// Queries with fewer letters are left alone.
    pub min_word_len: usize,
    /// Queries whose prior exceeds this multiple of the average are left alone.
    pub known_prior_ratio: f64,
    /// Candidates need a prior of at least this multiple of the average.
    pub prior_accept_ratio: f64,
    /// Maximum edit distance between a query and its correction.
    pub max_correction_distance: usize,
    /// Multiplier applied to the mean training score to get the threshold.
    pub threshold_ratio: f64,
    /// Try reading long queries as two glued words when the search fails.
    pub precision_mode: bool,
    /// Minimum number of letters for the split heuristic.
    pub split_min_len: usize,
    /// Upper bound (exclusive) on letters for the split heuristic.
    pub split_max_len: usize,
    /// Characters kept on each side of a split.
    pub split_margin: usize,
    /// Also try candidates with recorded endings grafted on.
    pub morphological_completion: bool,
    /// Index only dictionary words that appear as training targets.
    pub restrict_lexicon_to_targets: bool,
    /// Train the error model on the rayon pool.
    pub parallel_training: bool,
    /// Worker threads for batch correction; all cores when unset.
    pub threads: Option<usize>,
}

impl Default for CorrectorConfig {
    fn default() -> Self {
        CorrectorConfig {
            alphabet: Alphabet::default(),
            min_word_len: 5,
            known_prior_ratio: 0.25,
            prior_accept_ratio: 8.0,
            max_correction_distance: 1,
            threshold_ratio: 4.0,
            precision_mode: false,
            split_min_len: 10,
            split_max_len: 16,
            split_margin: 3,
            morphological_completion: false,
            restrict_lexicon_to_targets: false,
            parallel_training: false,
            threads: None,
        }
    }
}

impl CorrectorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.alphabet.is_empty() {
            return Err(SpellError::invalid_config("alphabet must not be empty"));
        }
        for (name, value) in [
            ("known_prior_ratio", self.known_prior_ratio),
            ("prior_accept_ratio", self.prior_accept_ratio),
            ("threshold_ratio", self.threshold_ratio),
        ] {
            if !value.is_finite() {
                return Err(SpellError::invalid_config(format!(
                    "{name} must be finite, got {value}"
                )));
            }
        }
        if self.split_min_len > self.split_max_len {
            return Err(SpellError::invalid_config(format!(
                "split_min_len ({}) exceeds split_max_len ({})",
                self.split_min_len, self.split_max_len
            )));
        }
        if self.threads == Some(0) {
            return Err(SpellError::invalid_config("threads must be positive"));
        }
        Ok(())
    }

    fn selection_limits(&self) -> SelectionLimits {
        SelectionLimits {
            prior_accept_ratio: self.prior_accept_ratio,
            max_correction_distance: self.max_correction_distance,
        }
    }
}

/// How a query was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrectionOutcome {
    /// The query is a known word.
    KnownWord,
    /// The query was seen verbatim as a training misspelling.
    TrainingLookup,
    /// The query is a number.
    Numeric,
    /// The query has characters outside the alphabet.
    ForeignAlphabet,
    /// The query is frequent enough to be trusted.
    FrequentEnough,
    /// The query is too short to be corrected reliably.
    TooShort,
    /// A beam-search candidate was accepted.
    BeamSearch,
    /// The query was read as two glued words.
    SplitWord,
    /// Nothing qualified; the query is returned unchanged.
    NoCandidate,
}

/// Result of correcting one query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrectionResult {
    /// Original query.
    pub original: String,
    /// Corrected word, equal to the original when nothing changed.
    pub corrected: String,
    /// Score of the accepted candidate, if one was scored.
    pub score: Option<f64>,
    pub outcome: CorrectionOutcome,
}

impl CorrectionResult {
    fn unchanged(query: &str, outcome: CorrectionOutcome) -> Self {
        CorrectionResult {
            original: query.to_string(),
            corrected: query.to_string(),
            score: None,
            outcome,
        }
    }

    fn accepted(query: &str, suggestion: Suggestion, outcome: CorrectionOutcome) -> Self {
        CorrectionResult {
            original: query.to_string(),
            corrected: without_bounds(&suggestion.word).to_string(),
            score: Some(suggestion.score),
            outcome,
        }
    }

    /// Whether the corrected word differs from the query.
    pub fn is_changed(&self) -> bool {
        self.original != self.corrected
    }
}

/// Statistics about the spelling corrector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrectorStats {
    /// Number of dictionary words indexed in the trie.
    pub lexicon_words: usize,
    /// Number of words treated as correct.
    pub known_words: usize,
    /// Number of distinct training misspellings.
    pub training_pairs: usize,
    pub trie_nodes: usize,
    pub prior_entries: usize,
    pub average_prior: f64,
    pub average_training_score: f64,
    pub threshold: f64,
    /// Learned endings, excluding the empty one.
    pub endings: usize,
    /// Recorded edit weight per statistics level.
    pub edit_totals: [f64; 3],
}

/// Main spelling corrector. Immutable once built and safe to share between
/// threads.
pub struct SpellingCorrector {
    trie: Trie,
    model: ErrorModel,
    priors: WordPriors,
    known_words: AHashSet<String>,
    training: AHashMap<String, String>,
    lexicon_words: usize,
    average_training_score: f64,
    threshold: f64,
    config: SpellConfig,
    /// Workers for batch correction.
    thread_pool: Arc<ThreadPool>,
}

impl SpellingCorrector {
    /// Train a corrector from a dictionary and plain-word training pairs.
    pub fn build(
        dictionary: &SpellingDictionary,
        corrections: &[Correction],
        config: SpellConfig,
    ) -> Result<Self> {
        config.validate()?;

        let mut usable = SpellingDictionary::new();
        for (word, frequency) in dictionary.sorted_words() {
            validate_word(word)?;
            if !frequency.is_finite() || frequency <= 0.0 {
                log::warn!("skipping dictionary word '{word}' with frequency {frequency}");
                continue;
            }
            usable.add_word(word, frequency);
        }
        if usable.is_empty() {
            return Err(SpellError::dictionary("no word with a positive frequency"));
        }

        let mut training: AHashMap<String, String> = AHashMap::with_capacity(corrections.len());
        let mut bounded = Vec::with_capacity(corrections.len());
        for correction in corrections {
            validate_word(&correction.source)?;
            validate_word(&correction.target)?;
            let source = with_bounds(&correction.source);
            let target = with_bounds(&correction.target);
            training.insert(source.clone(), target.clone());
            bounded.push(Correction::new(source, target, correction.weight));
        }

        let mut model = ErrorModel::with_config(config.model.clone());
        if config.corrector.parallel_training {
            model.train_parallel(&bounded)?;
        } else {
            model.train(&bounded)?;
        }

        let targets: AHashSet<&str> = training.values().map(String::as_str).collect();
        let mut trie = Trie::new();
        let mut known_words: AHashSet<String> = AHashSet::new();
        for (word, frequency) in usable.sorted_words() {
            if !config.corrector.alphabet.accepts(word) {
                continue;
            }
            let bounded_word = with_bounds(word);
            if config.corrector.restrict_lexicon_to_targets
                && !targets.contains(bounded_word.as_str())
            {
                continue;
            }
            trie.insert(&bounded_word, frequency);
            known_words.insert(bounded_word);
        }
        let lexicon_words = known_words.len();
        known_words.extend(targets.iter().map(|t| t.to_string()));

        let priors = WordPriors::from_dictionary(&usable)?;

        let threads = config.corrector.threads.unwrap_or_else(num_cpus::get);
        let thread_pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("spelltrie-worker-{i}"))
            .build()
            .map_err(|e| SpellError::other(format!("failed to start worker pool: {e}")))?;

        let mut corrector = SpellingCorrector {
            trie,
            model,
            priors,
            known_words,
            training,
            lexicon_words,
            average_training_score: 0.0,
            threshold: 0.0,
            config,
            thread_pool: Arc::new(thread_pool),
        };
        corrector.calibrate()?;

        log::info!(
            "built corrector: {} lexicon words, {} known words, {} endings, threshold {:.3}",
            corrector.lexicon_words,
            corrector.known_words.len(),
            corrector.model.endings().len(),
            corrector.threshold
        );
        Ok(corrector)
    }

    /// Average score of the distinct training pairs that change the word,
    /// scaled by the threshold ratio.
    fn calibrate(&mut self) -> Result<()> {
        let selector = self.selector();
        let mut pairs: Vec<(&String, &String)> = self
            .training
            .iter()
            .filter(|(from, to)| from != to)
            .collect();
        // Sum in key order so the threshold does not depend on hash seeds.
        pairs.sort_unstable_by(|a, b| a.0.cmp(b.0));
        let scores: Vec<f64> = pairs
            .into_iter()
            .map(|(from, to)| selector.score(from, to))
            .collect();

        if scores.is_empty() {
            return Err(SpellError::calibration(
                "training data has no pair that changes the word",
            ));
        }

        let average = scores.iter().sum::<f64>() / scores.len() as f64;
        self.average_training_score = average;
        self.threshold = average * self.config.corrector.threshold_ratio;
        Ok(())
    }

    fn selector(&self) -> Selector<'_> {
        Selector::new(
            &self.model,
            &self.priors,
            &self.known_words,
            self.config.corrector.selection_limits(),
        )
    }

    /// Correct a single word, returning just the corrected word.
    pub fn fix(&self, query: &str) -> String {
        self.correct(query).corrected
    }

    /// Correct a single word.
    pub fn correct(&self, query: &str) -> CorrectionResult {
        let mut state = SearchState::new();
        self.correct_with_state(query, &mut state)
    }

    fn correct_with_state(&self, query: &str, state: &mut SearchState) -> CorrectionResult {
        let result = self.decide(query, state);
        log::debug!(
            "'{}' -> '{}' ({:?})",
            result.original,
            result.corrected,
            result.outcome
        );
        result
    }

    fn decide(&self, query: &str, state: &mut SearchState) -> CorrectionResult {
        let config = &self.config.corrector;
        let bounded = with_bounds(query);

        if self.known_words.contains(&bounded) {
            return CorrectionResult::unchanged(query, CorrectionOutcome::KnownWord);
        }
        if let Some(target) = self.training.get(&bounded) {
            return CorrectionResult {
                original: query.to_string(),
                corrected: without_bounds(target).to_string(),
                score: None,
                outcome: CorrectionOutcome::TrainingLookup,
            };
        }
        if query.parse::<i64>().is_ok() {
            return CorrectionResult::unchanged(query, CorrectionOutcome::Numeric);
        }
        if !config.alphabet.accepts(query) {
            return CorrectionResult::unchanged(query, CorrectionOutcome::ForeignAlphabet);
        }
        let prior = self.priors.prior(&bounded).unwrap_or(0.0);
        if prior > config.known_prior_ratio * self.priors.average() {
            return CorrectionResult::unchanged(query, CorrectionOutcome::FrequentEnough);
        }
        let letters = query.chars().count();
        if letters < config.min_word_len {
            return CorrectionResult::unchanged(query, CorrectionOutcome::TooShort);
        }

        let selector = self.selector();
        let search = BeamSearch::new(&self.trie, &self.model, &self.config.search);
        let outcome =
            search.candidates_with_state(&bounded, self.config.search.candidate_count, state);
        if let Some(best) =
            selector.choose(&bounded, &outcome.candidates, config.morphological_completion)
        {
            return CorrectionResult::accepted(query, best, CorrectionOutcome::BeamSearch);
        }

        if config.precision_mode && (config.split_min_len..config.split_max_len).contains(&letters)
        {
            let candidates = split_candidates(
                &bounded,
                &selector,
                &config.alphabet,
                &self.known_words,
                self.threshold,
                config.split_margin,
            );
            if let Some(best) = selector.choose(&bounded, &candidates, false) {
                return CorrectionResult::accepted(query, best, CorrectionOutcome::SplitWord);
            }
        }

        CorrectionResult::unchanged(query, CorrectionOutcome::NoCandidate)
    }

    /// Correct independent queries in parallel, preserving their order.
    pub fn correct_batch<S: AsRef<str> + Sync>(&self, queries: &[S]) -> Vec<CorrectionResult> {
        let results = self.thread_pool.install(|| {
            queries
                .par_iter()
                .map_init(SearchState::new, |state, query| {
                    self.correct_with_state(query.as_ref(), state)
                })
                .collect::<Vec<_>>()
        });

        let changed = results.iter().filter(|r| r.is_changed()).count();
        log::info!(
            "corrected {changed} of {} queries on {} threads",
            results.len(),
            self.thread_pool.current_num_threads()
        );
        results
    }

    /// Number of workers used by [`SpellingCorrector::correct_batch`].
    pub fn worker_threads(&self) -> usize {
        self.thread_pool.current_num_threads()
    }

    /// Whether a plain word is treated as correct.
    pub fn is_known(&self, word: &str) -> bool {
        self.known_words.contains(&with_bounds(word))
    }

    /// Acceptance threshold calibrated from the training pairs.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn average_training_score(&self) -> f64 {
        self.average_training_score
    }

    pub fn config(&self) -> &SpellConfig {
        &self.config
    }

    pub fn model(&self) -> &ErrorModel {
        &self.model
    }

    pub fn trie(&self) -> &Trie {
        &self.trie
    }

    pub fn priors(&self) -> &WordPriors {
        &self.priors
    }

    /// Get statistics about the corrector.
    pub fn stats(&self) -> CorrectorStats {
        CorrectorStats {
            lexicon_words: self.lexicon_words,
            known_words: self.known_words.len(),
            training_pairs: self.training.len(),
            trie_nodes: self.trie.node_count(),
            prior_entries: self.priors.len(),
            average_prior: self.priors.average(),
            average_training_score: self.average_training_score,
            threshold: self.threshold,
            endings: self.model.endings().len(),
            edit_totals: self.model.statistics().totals(),
        }
    }
}
