//! Ordered tuple of [`Segment`]s defining a version-id grammar.

use crate::segment::Segment;
use std::sync::Arc;

/// Errors raised when constructing a [`Pattern`].
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("pattern must contain at least one segment")]
    Empty,
}

/// Non-empty ordered tuple of segments, most-significant first.
///
/// Parsing is left-to-right under each segment's shortest-match rule (see
/// [`Segment::parse_candidates`]), backtracking into a segment's longer
/// candidates when its shortest match leaves the rest of the pattern
/// unparseable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    segments: Vec<Segment>,
}

impl Pattern {
    /// Build a pattern from its ordered, most-significant-first segments.
    pub fn new(segments: Vec<Segment>) -> Result<Self, Error> {
        if segments.is_empty() {
            return Err(Error::Empty);
        }
        Ok(Self { segments })
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[must_use]
    pub fn segment(&self, i: usize) -> &Segment {
        &self.segments[i]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Share ownership of this pattern so [`crate::version::Version`]s built
    /// from it can be compared without re-parsing.
    #[must_use]
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Parse `id` in full against this pattern's segments, left-to-right
    /// with backtracking. Returns `None` (not an error) if the string is
    /// unparseable by this grammar, or if the segments only ever match a
    /// prefix of `id` — the pattern must consume the entire string — see
    /// `UnparseableVersionID` at the [`crate::versioning`] layer for how
    /// callers turn this into a typed failure.
    ///
    /// Each segment's shortest match is tried first (per-segment
    /// shortest-match semantics), but a segment that admits more than one
    /// valid digit-prefix length only commits to the shortest once the rest
    /// of the pattern can actually parse what follows it; otherwise parsing
    /// backtracks into that segment's next-longer candidate. Without this,
    /// a multi-digit range segment followed by more pattern would wrongly
    /// stop at the first in-range single digit and fail the remainder.
    #[must_use]
    pub fn cursors_for(&self, id: &str) -> Option<Vec<u64>> {
        Self::parse_segments(&self.segments, id, 0)
    }

    fn parse_segments(segments: &[Segment], id: &str, index: usize) -> Option<Vec<u64>> {
        let Some((segment, rest)) = segments.split_first() else {
            return (index == id.len()).then(Vec::new);
        };
        for (cursor, consumed) in segment.parse_candidates(id, index) {
            if let Some(mut tail) = Self::parse_segments(rest, id, index + consumed) {
                let mut cursors = Vec::with_capacity(1 + tail.len());
                cursors.push(cursor);
                cursors.append(&mut tail);
                return Some(cursors);
            }
        }
        None
    }

    /// The all-zero cursor tuple: the pattern's first version.
    #[must_use]
    pub fn first_cursors(&self) -> Vec<u64> {
        vec![0; self.segments.len()]
    }

    /// Render a cursor tuple back into its version-id string.
    #[must_use]
    pub fn render(&self, cursors: &[u64]) -> String {
        self.segments
            .iter()
            .zip(cursors)
            .map(|(segment, &i)| segment.element(i))
            .collect()
    }
}
