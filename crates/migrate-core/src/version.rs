//! A point in a [`crate::pattern::Pattern`]'s space: a cursor per segment.

use crate::pattern::Pattern;
use std::cmp::Ordering;
use std::sync::Arc;

/// Errors raised while constructing or comparing a [`Version`].
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum Error {
    /// The id string did not fully parse under the given pattern.
    #[error("{id:?} is not a valid version id under the given pattern")]
    Unparseable { id: String },
    /// `compare` was called on versions built from different patterns.
    #[error("cannot compare versions parsed from different patterns")]
    IncomparablePatterns,
}

/// `(pattern, cursors[0..k))` with `0 <= cursors[i] < pattern.segment(i).length()`.
///
/// Immutable except for [`Version::next`], which mutates the cursor tuple in
/// place. The rendered id is rebuilt on every mutation rather than cached
/// incrementally, since patterns are expected to be small (a handful of
/// segments).
#[derive(Debug, Clone)]
pub struct Version {
    pattern: Arc<Pattern>,
    cursors: Vec<u64>,
    rendered: String,
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.pattern, &other.pattern) && self.cursors == other.cursors
    }
}
impl Eq for Version {}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.rendered)
    }
}

impl Version {
    /// Parse `id` under `pattern`. Returns `Error::Unparseable` if the
    /// pattern cannot consume the entire string.
    pub fn parse(pattern: Arc<Pattern>, id: &str) -> Result<Self, Error> {
        let cursors = pattern.cursors_for(id).ok_or_else(|| Error::Unparseable {
            id: id.to_string(),
        })?;
        Ok(Self {
            pattern,
            cursors,
            rendered: id.to_string(),
        })
    }

    /// The version whose cursors are all zero.
    #[must_use]
    pub fn first(pattern: Arc<Pattern>) -> Self {
        let cursors = pattern.first_cursors();
        let rendered = pattern.render(&cursors);
        Self {
            pattern,
            cursors,
            rendered,
        }
    }

    #[must_use]
    pub fn pattern(&self) -> &Arc<Pattern> {
        &self.pattern
    }

    #[must_use]
    pub fn cursors(&self) -> &[u64] {
        &self.cursors
    }

    /// The rendered version-id string, as originally parsed or last rendered
    /// after a mutation.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.rendered
    }

    /// Increment the least-significant cursor; on overflow reset to 0 and
    /// carry left. At the terminal state (all cursors at their maxima) this
    /// wraps to all-zero — unreachable under normal updater gating (the
    /// updater only steps while `current <= defaults`), but defined here so
    /// the behavior is total rather than undefined.
    pub fn next(&mut self) {
        let mut i = self.cursors.len();
        loop {
            if i == 0 {
                // wrapped past the most-significant segment: reset to all zero
                for c in &mut self.cursors {
                    *c = 0;
                }
                break;
            }
            i -= 1;
            let max = self.pattern.segment(i).length();
            self.cursors[i] += 1;
            if self.cursors[i] < max {
                break;
            }
            self.cursors[i] = 0;
            // carry into the next more-significant segment
        }
        self.rendered = self.pattern.render(&self.cursors);
    }

    /// Lexicographic comparison of cursor tuples, most-significant first.
    ///
    /// # Errors
    /// Returns `Error::IncomparablePatterns` if `self` and `other` were
    /// parsed from different patterns — this is a programmer error, not a
    /// recoverable data condition.
    pub fn compare(&self, other: &Self) -> Result<Ordering, Error> {
        if !Arc::ptr_eq(&self.pattern, &other.pattern) {
            return Err(Error::IncomparablePatterns);
        }
        Ok(self.cursors.cmp(&other.cursors))
    }
}
