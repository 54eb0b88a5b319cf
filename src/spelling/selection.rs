//! Final choice among whole-word candidates.

use ahash::AHashSet;

use crate::spelling::alphabet::END_SYMBOL;
use crate::spelling::dictionary::WordPriors;
use crate::spelling::edit_script::bounded_distance;
use crate::spelling::error_model::ErrorModel;
use crate::spelling::suggest::Suggestion;

/// Acceptance filters applied to every candidate.
#[derive(Debug, Clone, Copy)]
pub struct SelectionLimits {
    /// Candidates need a prior of at least this multiple of the average.
    pub prior_accept_ratio: f64,
    /// Maximum edit distance between the query and a candidate.
    pub max_correction_distance: usize,
}

/// Scores candidates against the error model and picks the best admissible
/// one.
pub struct Selector<'a> {
    model: &'a ErrorModel,
    priors: &'a WordPriors,
    known_words: &'a AHashSet<String>,
    limits: SelectionLimits,
}

impl<'a> Selector<'a> {
    pub fn new(
        model: &'a ErrorModel,
        priors: &'a WordPriors,
        known_words: &'a AHashSet<String>,
        limits: SelectionLimits,
    ) -> Self {
        Selector {
            model,
            priors,
            known_words,
            limits,
        }
    }

    /// Noisy-channel score of correcting bounded `from` into bounded `to`.
    pub fn score(&self, from: &str, to: &str) -> f64 {
        self.model
            .correction_score(from, to, self.priors, self.known_words.contains(to))
    }

    /// Whether `to` passes the prior, distance and ending filters.
    pub fn admissible(&self, from: &str, to: &str) -> Option<usize> {
        let prior = self.priors.prior(to).unwrap_or(0.0);
        if prior < self.limits.prior_accept_ratio * self.priors.average() {
            return None;
        }
        if self.model.endings().violates(from, to) {
            return None;
        }
        bounded_distance(from, to, self.limits.max_correction_distance)
    }

    /// Candidate with every recorded ending grafted onto its stem.
    ///
    /// An ending replaces the tail of the stem when its first character
    /// coincides with the stem's last one; the empty ending keeps the word.
    pub fn ending_variants(&self, candidate: &str) -> Vec<String> {
        let stem = candidate.strip_suffix(END_SYMBOL).unwrap_or(candidate);
        let mut variants: Vec<String> = Vec::new();

        for ending in self.model.endings().patterns() {
            let mut chars = ending.chars();
            let variant = match chars.next() {
                None => format!("{stem}{END_SYMBOL}"),
                Some(first) if stem.ends_with(first) => {
                    format!("{stem}{}{END_SYMBOL}", chars.as_str())
                }
                Some(_) => continue,
            };
            if !variants.contains(&variant) {
                variants.push(variant);
            }
        }
        variants
    }

    /// Best admissible candidate for `from`, or `None` if all are filtered.
    ///
    /// Ties keep the candidate seen first.
    pub fn choose<S: AsRef<str>>(
        &self,
        from: &str,
        candidates: &[S],
        with_endings: bool,
    ) -> Option<Suggestion> {
        let mut best: Option<Suggestion> = None;

        for candidate in candidates {
            let candidate = candidate.as_ref();
            let variants = if with_endings {
                self.ending_variants(candidate)
            } else {
                vec![candidate.to_string()]
            };

            for to in variants {
                let Some(distance) = self.admissible(from, &to) else {
                    continue;
                };
                let score = self.score(from, &to);
                if best.as_ref().is_none_or(|b| score > b.score) {
                    best = Some(Suggestion::new(to, score, distance));
                }
            }
        }

        best
    }
}
