//! Character-level noisy-channel error model.
//!
//! Edit statistics are accumulated at three levels of specificity (operation
//! type; type and character pair; type, pair and preceding character) and
//! interpolated when estimating the probability of a single edit.

use ahash::AHashMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SpellError};
use crate::spelling::alphabet::END_SYMBOL;
use crate::spelling::dictionary::WordPriors;
use crate::spelling::edit_script::{Edit, OperationType, align, count_changes};

/// A weighted (misspelling, correction) training example.
///
/// Words are expected in bounded form when handed to the model directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Correction {
    pub source: String,
    pub target: String,
    pub weight: f64,
}

impl Correction {
    pub fn new<S: Into<String>, T: Into<String>>(source: S, target: T, weight: f64) -> Self {
        Correction {
            source: source.into(),
            target: target.into(),
            weight,
        }
    }
}

/// Configuration for the error model and the correction score.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorModelConfig {
    /// Weight of the operation-type level.
    pub alpha: f64,
    /// Weight of the character-pair level.
    pub beta: f64,
    /// Weight of the pair-in-context level.
    pub gamma: f64,
    /// Lower bound for a single edit probability.
    pub min_edit_probability: f64,
    /// Multiplier of the log prior of the target word.
    pub word_importance: f64,
    /// Penalty per change beyond the free allowance.
    pub change_penalty: f64,
    /// Number of changes that are not penalized.
    pub free_changes: usize,
    /// Asymptotic bonus for dictionary words (malus for unknown ones).
    pub dictionary_bonus: f64,
    /// Bonus for targets ending with a recorded ending.
    pub ending_bonus: f64,
    /// Maximum number of learned endings kept after a batch.
    pub max_endings: usize,
    /// Minimum number of letters of a target for its ending to be recorded.
    pub ending_min_word_len: usize,
}

impl Default for ErrorModelConfig {
    fn default() -> Self {
        ErrorModelConfig {
            alpha: 1.0 / 3.0,
            beta: 1.0 / 3.0,
            gamma: 1.0 / 3.0,
            min_edit_probability: 1e-9,
            word_importance: 2.0,
            change_penalty: 60.0,
            free_changes: 1,
            dictionary_bonus: 15.0,
            ending_bonus: 10.0,
            max_endings: 20,
            ending_min_word_len: 4,
        }
    }
}

impl ErrorModelConfig {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("alpha", self.alpha),
            ("beta", self.beta),
            ("gamma", self.gamma),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SpellError::invalid_config(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        if self.alpha + self.beta + self.gamma <= 0.0 {
            return Err(SpellError::invalid_config(
                "at least one interpolation weight must be positive",
            ));
        }
        if !(self.min_edit_probability > 0.0 && self.min_edit_probability <= 1.0) {
            return Err(SpellError::invalid_config(
                "min_edit_probability must be in (0, 1]",
            ));
        }
        if self.ending_min_word_len < 2 {
            return Err(SpellError::invalid_config(format!(
                "ending_min_word_len must be at least 2, got {}",
                self.ending_min_word_len
            )));
        }
        Ok(())
    }
}

/// Accumulated edit weights at the three specificity levels.
#[derive(Debug, Clone, Default)]
pub struct EditStatistics {
    level0: [f64; 4],
    level1: AHashMap<(OperationType, char, char), f64>,
    level2: AHashMap<(OperationType, char, char, char), f64>,
    totals: [f64; 3],
}

impl EditStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `weight` for one edit at every level.
    pub fn record(&mut self, edit: &Edit, weight: f64) {
        let op = edit.operation();
        let (new, cur) = edit.pair();

        self.level0[op.index()] += weight;
        *self.level1.entry((op, new, cur)).or_insert(0.0) += weight;
        *self.level2.entry((op, new, cur, edit.prev())).or_insert(0.0) += weight;

        for total in &mut self.totals {
            *total += weight;
        }
    }

    /// Add all counts of another table into this one.
    pub fn merge(&mut self, other: &EditStatistics) {
        for (mine, theirs) in self.level0.iter_mut().zip(other.level0) {
            *mine += theirs;
        }
        for (key, value) in &other.level1 {
            *self.level1.entry(*key).or_insert(0.0) += value;
        }
        for (key, value) in &other.level2 {
            *self.level2.entry(*key).or_insert(0.0) += value;
        }
        for (mine, theirs) in self.totals.iter_mut().zip(other.totals) {
            *mine += theirs;
        }
    }

    /// Counts of an edit at levels 0, 1 and 2.
    pub fn counts(&self, edit: &Edit) -> [f64; 3] {
        let op = edit.operation();
        let (new, cur) = edit.pair();
        [
            self.level0[op.index()],
            self.level1.get(&(op, new, cur)).copied().unwrap_or(0.0),
            self.level2
                .get(&(op, new, cur, edit.prev()))
                .copied()
                .unwrap_or(0.0),
        ]
    }

    /// Grand totals of levels 0, 1 and 2.
    pub fn totals(&self) -> [f64; 3] {
        self.totals
    }

    /// Total weight recorded for one operation type at level 0.
    pub fn type_total(&self, op: OperationType) -> f64 {
        self.level0[op.index()]
    }

    /// Total weight recorded for one operation type at level 1.
    pub fn pair_total(&self, op: OperationType) -> f64 {
        self.level1
            .iter()
            .filter(|((kind, _, _), _)| *kind == op)
            .map(|(_, value)| value)
            .sum()
    }

    /// Largest single level-2 cell for one operation type.
    pub fn max_context_cell(&self, op: OperationType) -> f64 {
        self.level2
            .iter()
            .filter(|((kind, _, _, _), _)| *kind == op)
            .map(|(_, value)| *value)
            .fold(0.0, f64::max)
    }
}

/// Frequent word endings learned from correction targets.
///
/// The empty ending is a sentinel: it is always present, never evicted and
/// not counted against the capacity.
#[derive(Debug, Clone)]
pub struct EndingTable {
    scores: AHashMap<String, f64>,
    capacity: usize,
}

impl EndingTable {
    pub fn new(capacity: usize) -> Self {
        let mut scores = AHashMap::new();
        scores.insert(String::new(), f64::INFINITY);
        EndingTable { scores, capacity }
    }

    /// Add to the score of an ending.
    pub fn record(&mut self, ending: &str, score: f64) {
        if ending.is_empty() {
            return;
        }
        *self.scores.entry(ending.to_string()).or_insert(0.0) += score;
    }

    pub fn merge(&mut self, other: &EndingTable) {
        for (ending, score) in &other.scores {
            self.record(ending, *score);
        }
    }

    /// Evict the lowest-scoring learned endings until the capacity holds,
    /// then make sure the sentinel is present.
    pub fn prune(&mut self) {
        let excess = self.len().saturating_sub(self.capacity);
        if excess > 0 {
            let mut learned: Vec<(String, f64)> = self
                .scores
                .iter()
                .filter(|(ending, _)| !ending.is_empty())
                .map(|(ending, score)| (ending.clone(), *score))
                .collect();
            learned.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| b.0.cmp(&a.0)));
            for (ending, _) in learned.into_iter().take(excess) {
                self.scores.remove(&ending);
            }
        }
        self.scores.insert(String::new(), f64::INFINITY);
    }

    /// Number of learned endings, excluding the sentinel.
    pub fn len(&self) -> usize {
        self.scores.keys().filter(|e| !e.is_empty()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, ending: &str) -> bool {
        self.scores.contains_key(ending)
    }

    pub fn score(&self, ending: &str) -> Option<f64> {
        self.scores.get(ending).copied()
    }

    /// All endings including the sentinel, best first, ties by key.
    pub fn patterns(&self) -> Vec<&str> {
        let mut patterns: Vec<(&str, f64)> = self
            .scores
            .iter()
            .map(|(ending, score)| (ending.as_str(), *score))
            .collect();
        patterns.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        patterns.into_iter().map(|(ending, _)| ending).collect()
    }

    /// Whether a bounded word ends with `ending` followed by the end boundary.
    pub fn word_has_ending(word: &str, ending: &str) -> bool {
        word.strip_suffix(END_SYMBOL)
            .is_some_and(|stem| stem.ends_with(ending))
    }

    /// Whether the bounded word ends with any recorded ending.
    pub fn matches_any(&self, word: &str) -> bool {
        self.scores
            .keys()
            .any(|ending| Self::word_has_ending(word, ending))
    }

    /// True if `source` carries a recorded ending that `target` drops.
    pub fn violates(&self, source: &str, target: &str) -> bool {
        self.scores.keys().any(|ending| {
            Self::word_has_ending(source, ending) && !Self::word_has_ending(target, ending)
        })
    }
}

/// The trained error model.
#[derive(Debug, Clone)]
pub struct ErrorModel {
    config: ErrorModelConfig,
    statistics: EditStatistics,
    endings: EndingTable,
}

impl ErrorModel {
    pub fn new() -> Self {
        Self::with_config(ErrorModelConfig::default())
    }

    pub fn with_config(config: ErrorModelConfig) -> Self {
        let endings = EndingTable::new(config.max_endings);
        ErrorModel {
            config,
            statistics: EditStatistics::new(),
            endings,
        }
    }

    pub fn config(&self) -> &ErrorModelConfig {
        &self.config
    }

    pub fn statistics(&self) -> &EditStatistics {
        &self.statistics
    }

    pub fn endings(&self) -> &EndingTable {
        &self.endings
    }

    fn check_weight(example: &Correction) -> Result<()> {
        if !example.weight.is_finite() || example.weight < 0.0 {
            return Err(SpellError::training(format!(
                "weight of '{}' -> '{}' must be a non-negative number, got {}",
                example.source, example.target, example.weight
            )));
        }
        Ok(())
    }

    fn accumulate(
        &self,
        example: &Correction,
        statistics: &mut EditStatistics,
        endings: &mut EndingTable,
    ) {
        for edit in align(&example.source, &example.target) {
            statistics.record(&edit, example.weight);
        }

        let target: Vec<char> = example.target.chars().collect();
        if target.len() >= self.config.ending_min_word_len + 2 {
            let end = target.len() - 1;
            for len in 2..=3 {
                // Endings never reach into the start boundary.
                let Some(start) = end.checked_sub(len).filter(|&start| start >= 1) else {
                    continue;
                };
                let ending: String = target[start..end].iter().collect();
                endings.record(&ending, len as f64);
            }
        }
    }

    /// Train on one batch of bounded examples.
    pub fn train(&mut self, examples: &[Correction]) -> Result<()> {
        for example in examples {
            Self::check_weight(example)?;
        }

        let mut statistics = std::mem::take(&mut self.statistics);
        let mut endings = std::mem::replace(&mut self.endings, EndingTable::new(0));
        for example in examples {
            self.accumulate(example, &mut statistics, &mut endings);
        }
        self.statistics = statistics;
        self.endings = endings;
        self.endings.prune();

        log::debug!(
            "trained error model on {} examples, {} endings kept",
            examples.len(),
            self.endings.len()
        );
        Ok(())
    }

    /// Train on one batch with sharded accumulation on the rayon pool.
    ///
    /// Each worker fills private tables which are merged afterwards.
    pub fn train_parallel(&mut self, examples: &[Correction]) -> Result<()> {
        for example in examples {
            Self::check_weight(example)?;
        }

        let capacity = self.config.max_endings;
        let (statistics, endings) = examples
            .par_iter()
            .fold(
                || (EditStatistics::new(), EndingTable::new(capacity)),
                |(mut statistics, mut endings), example| {
                    self.accumulate(example, &mut statistics, &mut endings);
                    (statistics, endings)
                },
            )
            .reduce(
                || (EditStatistics::new(), EndingTable::new(capacity)),
                |(mut left_stats, mut left_endings), (right_stats, right_endings)| {
                    left_stats.merge(&right_stats);
                    left_endings.merge(&right_endings);
                    (left_stats, left_endings)
                },
            );

        self.statistics.merge(&statistics);
        self.endings.merge(&endings);
        self.endings.prune();
        Ok(())
    }

    /// Merge the statistics of an independently trained model.
    pub fn merge(&mut self, other: &ErrorModel) {
        self.statistics.merge(&other.statistics);
        self.endings.merge(&other.endings);
        self.endings.prune();
    }

    /// Interpolated probability of a single edit, in (0, 1].
    pub fn probability(&self, edit: &Edit) -> f64 {
        let counts = self.statistics.counts(edit);
        let totals = self.statistics.totals();
        let weights = [self.config.alpha, self.config.beta, self.config.gamma];

        let p: f64 = (0..3)
            .map(|level| {
                if totals[level] > 0.0 {
                    weights[level] * counts[level] / totals[level]
                } else {
                    0.0
                }
            })
            .sum();

        p.clamp(self.config.min_edit_probability, 1.0)
    }

    pub fn log_probability(&self, edit: &Edit) -> f64 {
        self.probability(edit).ln()
    }

    /// Penalty for the number of changes beyond the free allowance.
    pub fn change_penalty(&self, changes: usize) -> f64 {
        -self.config.change_penalty * changes.saturating_sub(self.config.free_changes) as f64
    }

    /// Bonus growing with word length toward `dictionary_bonus`.
    pub fn dictionary_bonus(&self, len: usize) -> f64 {
        if len == 0 {
            return 0.0;
        }
        self.config.dictionary_bonus * (1.0 - (len as f64).powf(-1.2))
    }

    /// Full noisy-channel score of correcting bounded `source` to `target`.
    pub fn correction_score(
        &self,
        source: &str,
        target: &str,
        priors: &WordPriors,
        in_dictionary: bool,
    ) -> f64 {
        let edits = align(source, target);
        self.score_edits(&edits, target, priors, in_dictionary)
    }

    /// Same as [`ErrorModel::correction_score`] for an already computed script.
    pub fn score_edits(
        &self,
        edits: &[Edit],
        target: &str,
        priors: &WordPriors,
        in_dictionary: bool,
    ) -> f64 {
        let prior = self.config.word_importance * priors.prior_or_floor(target).ln();

        let channel: f64 = edits.iter().map(|e| self.log_probability(e)).sum();

        let change = self.change_penalty(count_changes(edits));

        let len = target.chars().count().saturating_sub(1);
        let sign = if in_dictionary { 1.0 } else { -1.0 };
        let dictionary = sign * self.dictionary_bonus(len);

        let ending = if self.endings.matches_any(target) {
            self.config.ending_bonus
        } else {
            0.0
        };

        prior + channel + change + dictionary + ending
    }
}

impl Default for ErrorModel {
    fn default() -> Self {
        Self::new()
    }
}
