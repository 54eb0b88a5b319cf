//! Best-first search over (query position, trie node) states.
//!
//! Each path consumes the query left to right while walking the trie, paying
//! for every edit with its error-model log-probability and for every trie
//! step with the conditional frequency of the chosen branch.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SpellError};
use crate::spelling::alphabet::NONE_SYMBOL;
use crate::spelling::edit_script::Edit;
use crate::spelling::error_model::ErrorModel;
use crate::spelling::trie::{NodeId, Trie};

/// Limits and pruning ratios of the beam search.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Fraction of the mean sibling frequency a branch needs to be explored.
    pub branch_ratio: f64,
    /// Maximum number of changes relative to the bounded query length.
    pub max_edit_ratio: f64,
    /// Maximum number of successors kept per expansion.
    pub frontier_cap: usize,
    /// Queue size at which the search gives up.
    pub queue_limit: usize,
    /// Number of whole-word candidates requested per query.
    pub candidate_count: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            branch_ratio: 0.7,
            max_edit_ratio: 0.4,
            frontier_cap: 10,
            queue_limit: 300_000,
            candidate_count: 10,
        }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.branch_ratio.is_finite() || self.branch_ratio < 0.0 {
            return Err(SpellError::invalid_config(format!(
                "branch_ratio must be a non-negative number, got {}",
                self.branch_ratio
            )));
        }
        if !self.max_edit_ratio.is_finite() || self.max_edit_ratio < 0.0 {
            return Err(SpellError::invalid_config(format!(
                "max_edit_ratio must be a non-negative number, got {}",
                self.max_edit_ratio
            )));
        }
        if self.frontier_cap == 0 {
            return Err(SpellError::invalid_config("frontier_cap must be positive"));
        }
        if self.queue_limit == 0 {
            return Err(SpellError::invalid_config("queue_limit must be positive"));
        }
        Ok(())
    }
}

/// A partial correction: the query prefix consumed so far mapped onto a trie
/// prefix.
#[derive(Debug, Clone)]
pub struct SearchPath {
    pub position: usize,
    pub node: NodeId,
    /// Cumulative log-probability of the edits.
    pub log_prob: f64,
    /// Cumulative objective used for ordering.
    pub score: f64,
    /// Number of non-match edits.
    pub changes: usize,
    seq: u64,
}

impl SearchPath {
    fn start() -> Self {
        SearchPath {
            position: 0,
            node: Trie::ROOT,
            log_prob: 0.0,
            score: 0.0,
            changes: 0,
            seq: 0,
        }
    }
}

impl PartialEq for SearchPath {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SearchPath {}

impl Ord for SearchPath {
    fn cmp(&self, other: &Self) -> Ordering {
        // Higher score first; among equals the path queued earlier wins.
        self.score
            .total_cmp(&other.score)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for SearchPath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Why a search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The requested number of candidates was found.
    Satisfied,
    /// Every admissible path was expanded.
    Exhausted,
    /// The queue reached its size limit.
    QueueLimit,
}

/// Candidates produced for one query.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Bounded words in the order they were reached.
    pub candidates: Vec<String>,
    /// Number of paths popped from the queue.
    pub expanded: usize,
    pub termination: Termination,
}

/// Mutable state owned by a single query.
#[derive(Debug, Default)]
pub struct SearchState {
    queue: BinaryHeap<SearchPath>,
    best: AHashMap<(NodeId, usize), f64>,
    next_seq: u64,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
        self.best.clear();
        self.next_seq = 0;
    }

    fn push(&mut self, mut path: SearchPath) {
        path.seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(path);
    }

    /// Record the path's score for its state if it improves on the best
    /// seen so far.
    fn admit(&mut self, path: &SearchPath) -> bool {
        let key = (path.node, path.position);
        match self.best.get(&key) {
            Some(&best) if best >= path.score => false,
            _ => {
                self.best.insert(key, path.score);
                true
            }
        }
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }
}

/// Beam search over a trie guided by an error model.
pub struct BeamSearch<'a> {
    trie: &'a Trie,
    model: &'a ErrorModel,
    config: &'a SearchConfig,
}

impl<'a> BeamSearch<'a> {
    pub fn new(trie: &'a Trie, model: &'a ErrorModel, config: &'a SearchConfig) -> Self {
        BeamSearch {
            trie,
            model,
            config,
        }
    }

    /// Find up to `k` dictionary words reachable from the bounded `query`.
    pub fn candidates(&self, query: &str, k: usize) -> SearchOutcome {
        let mut state = SearchState::new();
        self.candidates_with_state(query, k, &mut state)
    }

    /// Same as [`BeamSearch::candidates`], reusing the allocations of `state`.
    pub fn candidates_with_state(
        &self,
        query: &str,
        k: usize,
        state: &mut SearchState,
    ) -> SearchOutcome {
        state.clear();
        let q: Vec<char> = query.chars().collect();
        let mut candidates: Vec<String> = Vec::new();
        let mut expanded = 0;

        if k == 0 {
            return SearchOutcome {
                candidates,
                expanded,
                termination: Termination::Satisfied,
            };
        }

        state.push(SearchPath::start());

        let termination = loop {
            if state.queue.len() >= self.config.queue_limit {
                break Termination::QueueLimit;
            }
            let Some(path) = state.queue.pop() else {
                break Termination::Exhausted;
            };
            expanded += 1;

            let edits = if path.position < q.len() {
                self.transformations(&path, &q)
            } else if self.trie.is_leaf(path.node) {
                let word = self.trie.prefix(path.node);
                if !candidates.iter().any(|c| c == word) {
                    candidates.push(word.to_string());
                    if candidates.len() >= k {
                        break Termination::Satisfied;
                    }
                }
                continue;
            } else {
                self.extensions(&path, &q)
            };

            for successor in self.successors(&path, &edits, &q) {
                if state.admit(&successor) {
                    state.push(successor);
                }
            }
        };

        log::debug!(
            "search for '{query}' stopped ({termination:?}) after {expanded} expansions with {} candidates",
            candidates.len()
        );

        SearchOutcome {
            candidates,
            expanded,
            termination,
        }
    }

    fn context(q: &[char], position: usize) -> char {
        if position == 0 {
            NONE_SYMBOL
        } else {
            q[position - 1]
        }
    }

    /// Edits applicable while query characters remain.
    fn transformations(&self, path: &SearchPath, q: &[char]) -> Vec<Edit> {
        let current = q[path.position];
        let prev = Self::context(q, path.position);
        let bound = self.config.branch_ratio * self.trie.average_child_frequency(path.node);

        let mut edits = Vec::new();
        if self.trie.child(path.node, current).is_some() {
            edits.push(Edit::Match { ch: current, prev });
        }
        for (ch, child) in self.trie.children(path.node) {
            if self.trie.frequency(child) < bound {
                continue;
            }
            edits.push(Edit::Insert { ch, prev });
            if ch != current {
                edits.push(Edit::Substitute {
                    new: ch,
                    old: current,
                    prev,
                });
            }
        }
        edits.push(Edit::Delete { ch: current, prev });
        edits
    }

    /// Insert-only completions once the whole query is consumed.
    fn extensions(&self, path: &SearchPath, q: &[char]) -> Vec<Edit> {
        let prev = Self::context(q, path.position);
        let bound = self.config.branch_ratio * self.trie.frequency(path.node);

        self.trie
            .children(path.node)
            .filter(|&(_, child)| self.trie.frequency(child) >= bound)
            .map(|(ch, _)| Edit::Insert { ch, prev })
            .collect()
    }

    /// Apply edits to a path, keeping the best `frontier_cap` admissible
    /// successors in descending score order.
    fn successors(&self, path: &SearchPath, edits: &[Edit], q: &[char]) -> Vec<SearchPath> {
        let max_changes = self.config.max_edit_ratio * q.len() as f64;
        let node_frequency = self.trie.frequency(path.node);

        let mut result: Vec<SearchPath> = Vec::with_capacity(edits.len());
        for edit in edits {
            let next = match *edit {
                Edit::Match { ch, .. } | Edit::Insert { ch, .. } => self.trie.child(path.node, ch),
                Edit::Substitute { new, .. } => self.trie.child(path.node, new),
                Edit::Delete { .. } => Some(path.node),
            };
            let Some(next) = next else {
                continue;
            };

            let changes = path.changes + usize::from(edit.is_change());
            if changes as f64 > max_changes {
                continue;
            }

            let branch = if next == path.node || node_frequency <= 0.0 {
                0.0
            } else {
                (self.trie.frequency(next) / node_frequency).ln()
            };
            let log_prob = path.log_prob + self.model.log_probability(edit);
            let position = match edit {
                Edit::Insert { .. } => path.position,
                _ => path.position + 1,
            };

            result.push(SearchPath {
                position,
                node: next,
                log_prob,
                score: path.score + branch + log_prob,
                changes,
                seq: 0,
            });
        }

        result.sort_by(|a, b| b.score.total_cmp(&a.score));
        result.truncate(self.config.frontier_cap);
        result
    }
}
