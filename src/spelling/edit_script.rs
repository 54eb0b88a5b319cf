//! Minimum edit scripts between two strings.
//!
//! The alignment is used both to attribute observed corrections to edit
//! operations while training and to score candidate corrections.

use std::cmp::min;

use serde::{Deserialize, Serialize};

use crate::spelling::alphabet::NONE_SYMBOL;

/// The four kinds of edit operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OperationType {
    Match,
    Insert,
    Delete,
    Substitute,
}

impl OperationType {
    /// All operation types in table order.
    pub const ALL: [OperationType; 4] = [
        OperationType::Match,
        OperationType::Insert,
        OperationType::Delete,
        OperationType::Substitute,
    ];

    /// Position of this type in per-type arrays.
    pub fn index(self) -> usize {
        match self {
            OperationType::Match => 0,
            OperationType::Insert => 1,
            OperationType::Delete => 2,
            OperationType::Substitute => 3,
        }
    }
}

/// A single edit operation together with its left context.
///
/// `prev` is the source character immediately preceding the edit position,
/// or [`NONE_SYMBOL`] at the very start of the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edit {
    /// The source character is kept.
    Match { ch: char, prev: char },
    /// A character absent from the source is inserted.
    Insert { ch: char, prev: char },
    /// A source character is dropped.
    Delete { ch: char, prev: char },
    /// A source character is replaced by another one.
    Substitute { new: char, old: char, prev: char },
}

impl Edit {
    pub fn operation(&self) -> OperationType {
        match self {
            Edit::Match { .. } => OperationType::Match,
            Edit::Insert { .. } => OperationType::Insert,
            Edit::Delete { .. } => OperationType::Delete,
            Edit::Substitute { .. } => OperationType::Substitute,
        }
    }

    /// The (resulting, original) character pair used as statistics key.
    pub fn pair(&self) -> (char, char) {
        match *self {
            Edit::Match { ch, .. } => (ch, ch),
            Edit::Insert { ch, .. } => (ch, NONE_SYMBOL),
            Edit::Delete { ch, .. } => (NONE_SYMBOL, ch),
            Edit::Substitute { new, old, .. } => (new, old),
        }
    }

    pub fn prev(&self) -> char {
        match *self {
            Edit::Match { prev, .. }
            | Edit::Insert { prev, .. }
            | Edit::Delete { prev, .. }
            | Edit::Substitute { prev, .. } => prev,
        }
    }

    /// Whether this edit changes the string (anything but a match).
    pub fn is_change(&self) -> bool {
        !matches!(self, Edit::Match { .. })
    }
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Start,
    Delete,
    Insert,
    Diagonal,
}

fn char_before(chars: &[char], i: usize) -> char {
    if i == 0 { NONE_SYMBOL } else { chars[i - 1] }
}

/// Compute a minimum edit script transforming `source` into `target`.
///
/// When several operations reach the minimum, Delete wins over Insert, which
/// wins over Match/Substitute. The edits are returned in source order.
pub fn align(source: &str, target: &str) -> Vec<Edit> {
    let s: Vec<char> = source.chars().collect();
    let t: Vec<char> = target.chars().collect();
    let (n, m) = (s.len(), t.len());
    let width = m + 1;

    let mut cost = vec![0usize; (n + 1) * width];
    let mut steps = vec![Step::Start; (n + 1) * width];

    for j in 1..=m {
        cost[j] = j;
        steps[j] = Step::Insert;
    }
    for i in 1..=n {
        cost[i * width] = i;
        steps[i * width] = Step::Delete;
    }

    for i in 1..=n {
        for j in 1..=m {
            let delete = cost[(i - 1) * width + j] + 1;
            let insert = cost[i * width + j - 1] + 1;
            let diagonal = cost[(i - 1) * width + j - 1] + usize::from(s[i - 1] != t[j - 1]);

            let (value, step) = if delete <= min(insert, diagonal) {
                (delete, Step::Delete)
            } else if insert <= min(delete, diagonal) {
                (insert, Step::Insert)
            } else {
                (diagonal, Step::Diagonal)
            };
            cost[i * width + j] = value;
            steps[i * width + j] = step;
        }
    }

    let mut edits = Vec::with_capacity(n.max(m));
    let (mut i, mut j) = (n, m);
    while i > 0 || j > 0 {
        match steps[i * width + j] {
            Step::Delete => {
                edits.push(Edit::Delete {
                    ch: s[i - 1],
                    prev: char_before(&s, i - 1),
                });
                i -= 1;
            }
            Step::Insert => {
                edits.push(Edit::Insert {
                    ch: t[j - 1],
                    prev: char_before(&s, i),
                });
                j -= 1;
            }
            Step::Diagonal => {
                let prev = char_before(&s, i - 1);
                if s[i - 1] == t[j - 1] {
                    edits.push(Edit::Match { ch: s[i - 1], prev });
                } else {
                    edits.push(Edit::Substitute {
                        new: t[j - 1],
                        old: s[i - 1],
                        prev,
                    });
                }
                i -= 1;
                j -= 1;
            }
            Step::Start => break,
        }
    }

    edits.reverse();
    edits
}

/// Number of non-match edits in the script from `source` to `target`.
pub fn edit_distance(source: &str, target: &str) -> usize {
    count_changes(&align(source, target))
}

/// Number of non-match edits in an already computed script.
pub fn count_changes(edits: &[Edit]) -> usize {
    edits.iter().filter(|e| e.is_change()).count()
}

/// Edit distance between `source` and `target` if it is at most `limit`.
///
/// Keeps a single row of the cost table and gives up as soon as every cell
/// of a row exceeds `limit`, so distant pairs are rejected early.
pub fn bounded_distance(source: &str, target: &str, limit: usize) -> Option<usize> {
    let source: Vec<char> = source.chars().collect();
    let target: Vec<char> = target.chars().collect();
    if source.len().abs_diff(target.len()) > limit {
        return None;
    }

    let mut row: Vec<usize> = (0..=target.len()).collect();
    for (i, &s) in source.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        let mut best = row[0];
        for (j, &t) in target.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = (above + 1)
                .min(row[j] + 1)
                .min(diagonal + usize::from(s != t));
            diagonal = above;
            best = best.min(row[j + 1]);
        }
        if best > limit {
            return None;
        }
    }

    row.last().copied().filter(|&distance| distance <= limit)
}
