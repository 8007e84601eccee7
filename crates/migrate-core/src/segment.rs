//! One grammar atom of a [`crate::pattern::Pattern`]: a literal alternation
//! or an arithmetic integer range.

/// Errors raised at segment construction time. Constructors validate their
/// invariants eagerly and fail fast rather than producing a segment that can
/// never successfully parse or render.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("literal segment must have at least one alternative")]
    EmptyLiteral,
    #[error("range step must not be zero")]
    ZeroStep,
    #[error("range start must not equal end")]
    StartEqualsEnd,
    #[error("range step sign must match sign(end - start)")]
    StepSignMismatch,
    #[error("range would generate a negative value")]
    NegativeValue,
    #[error("value {value} requires more than `fill` ({fill}) digits")]
    ExceedsFill { value: i64, fill: u8 },
}

/// One grammar element of a version-id [`crate::pattern::Pattern`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A finite ordered list of string alternatives, most specific match first.
    Literal(Vec<String>),
    /// Integers `start + step * i` for `i` in `[0, length)`, optionally
    /// zero-padded to `fill` digits.
    Range {
        start: i64,
        step: i64,
        length: u64,
        fill: u8,
    },
}

impl Segment {
    /// Construct a literal segment from its ordered alternatives.
    pub fn literal<I, S>(alternatives: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let alternatives: Vec<String> = alternatives.into_iter().map(Into::into).collect();
        if alternatives.is_empty() {
            return Err(Error::EmptyLiteral);
        }
        Ok(Self::Literal(alternatives))
    }

    /// Construct a range segment `start + step*i` for `i` in `[0, length)`.
    ///
    /// `fill == 0` means unpadded rendering; `fill > 0` requires every
    /// generated value's decimal digit count to be `<= fill`.
    pub fn range(start: i64, end: i64, step: i64, fill: u8) -> Result<Self, Error> {
        if step == 0 {
            return Err(Error::ZeroStep);
        }
        if start == end {
            return Err(Error::StartEqualsEnd);
        }
        let diff = end - start;
        if diff.signum() != step.signum() {
            return Err(Error::StepSignMismatch);
        }
        let length = diff.unsigned_abs() / step.unsigned_abs()
            + u64::from(diff.unsigned_abs() % step.unsigned_abs() != 0);

        if start < 0 {
            return Err(Error::NegativeValue);
        }
        let last_value = start + step * (length as i64 - 1);
        if last_value < 0 {
            return Err(Error::NegativeValue);
        }

        if fill > 0 {
            for i in 0..length {
                let value = start + step * i as i64;
                let digits = digit_count(value);
                if digits > u64::from(fill) {
                    return Err(Error::ExceedsFill { value, fill });
                }
            }
        }

        Ok(Self::Range {
            start,
            step,
            length,
            fill,
        })
    }

    /// Number of elements this segment can produce.
    #[must_use]
    pub fn length(&self) -> u64 {
        match self {
            Self::Literal(alts) => alts.len() as u64,
            Self::Range { length, .. } => *length,
        }
    }

    /// Render the `i`-th element.
    #[must_use]
    pub fn element(&self, i: u64) -> String {
        match self {
            Self::Literal(alts) => alts[i as usize].clone(),
            Self::Range {
                start, step, fill, ..
            } => {
                let value = start + step * i as i64;
                if *fill > 0 {
                    format!("{value:0width$}", width = *fill as usize)
                } else {
                    value.to_string()
                }
            }
        }
    }

    /// Length in characters of the `i`-th element as it would be rendered.
    #[must_use]
    pub fn element_length(&self, i: u64) -> usize {
        self.element(i).chars().count()
    }

    /// Parse a value out of `id` starting at `index`, returning the matched
    /// cursor or `-1` (`None`) if nothing matched. Never panics on
    /// unparseable input. Where more than one cursor could match (a range
    /// segment with more than one valid digit-prefix length), this returns
    /// the shortest; see [`Segment::parse_candidates`] for every match in
    /// priority order, which a caller needing to disambiguate against the
    /// rest of a pattern should use instead.
    #[must_use]
    pub fn parse(&self, id: &str, index: usize) -> Option<u64> {
        self.parse_candidates(id, index).first().map(|&(i, _)| i)
    }

    /// Every `(cursor, chars consumed)` pair `id[index..]` could match,
    /// ordered by priority: for a literal, declared-alternative order; for a
    /// range, shortest digit-prefix first. A caller parsing a full
    /// [`crate::pattern::Pattern`] must try these in order and backtrack to
    /// the next candidate when a shorter/earlier match leaves the remaining
    /// segments unparseable — a single greedy pick per segment is not
    /// sufficient shortest-match-with-disambiguation parsing.
    #[must_use]
    pub fn parse_candidates(&self, id: &str, index: usize) -> Vec<(u64, usize)> {
        match self {
            Self::Literal(alts) => parse_literal_candidates(alts, id, index),
            Self::Range {
                start,
                step,
                length,
                fill,
            } => parse_range_candidates(*start, *step, *length, *fill, id, index),
        }
    }
}

fn digit_count(value: i64) -> u64 {
    value.to_string().len() as u64
}

fn parse_literal_candidates(alternatives: &[String], id: &str, index: usize) -> Vec<(u64, usize)> {
    let Some(rest) = id.get(index..) else {
        return Vec::new();
    };
    alternatives
        .iter()
        .enumerate()
        .filter(|(_, alt)| rest.starts_with(alt.as_str()))
        .map(|(i, alt)| (i as u64, alt.chars().count()))
        .collect()
}

/// Every decimal-prefix-length match of `id[index..]`, shortest prefix
/// first; with `fill > 0` exactly `fill` digits are consumed (at most one
/// candidate).
fn parse_range_candidates(
    start: i64,
    step: i64,
    length: u64,
    fill: u8,
    id: &str,
    index: usize,
) -> Vec<(u64, usize)> {
    let Some(rest) = id.get(index..) else {
        return Vec::new();
    };
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return Vec::new();
    }

    if fill > 0 {
        if digits.len() < fill as usize {
            return Vec::new();
        }
        let candidate = &digits[..fill as usize];
        return candidate
            .parse::<i64>()
            .ok()
            .and_then(|value| cursor_for_value(start, step, length, value))
            .map(|i| vec![(i, fill as usize)])
            .unwrap_or_default();
    }

    // Walk digit counts shortest-first. A candidate that starts with '0' and
    // is not yet the full available digit run is ambiguous (it could be the
    // head of a longer zero-padded numeral), so it is skipped rather than
    // tested; the pathological "0d..." case is only refused mid-scan, not
    // at the final length. Every in-range length is returned, not just the
    // first, so a caller parsing a full pattern can backtrack into a longer
    // match when the shortest one leaves the remaining segments unparseable.
    let max_len = digits.len();
    let mut candidates = Vec::new();
    for take in 1..=max_len {
        let candidate = &digits[..take];
        let is_last = take == max_len;
        let ambiguous_leading_zero = candidate.starts_with('0') && !is_last;
        if ambiguous_leading_zero {
            continue;
        }
        let Ok(value) = candidate.parse::<i64>() else {
            continue;
        };
        if let Some(i) = cursor_for_value(start, step, length, value) {
            candidates.push((i, take));
        }
    }
    candidates
}

fn cursor_for_value(start: i64, step: i64, length: u64, value: i64) -> Option<u64> {
    let diff = value - start;
    if diff % step != 0 {
        return None;
    }
    let i = diff / step;
    if i < 0 || i as u64 >= length {
        return None;
    }
    Some(i as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_round_trip_no_fill() {
        // Range(0,12,2,0) has length 6.
        let seg = Segment::range(0, 12, 2, 0).unwrap();
        assert_eq!(seg.length(), 6);
        assert_eq!(seg.element(0), "0");
        assert_eq!(seg.element(1), "2");
        assert_eq!(seg.element(2), "4");
        assert_eq!(seg.element(3), "6");
        assert_eq!(seg.element(4), "8");
        assert_eq!(seg.element(5), "10");

        assert_eq!(seg.parse("4", 0), Some(2));
        assert_eq!(seg.parse("1", 0), None);
        assert_eq!(seg.parse("02", 0), Some(1));
        assert_eq!(seg.parse("4a", 0), Some(2));
    }

    #[test]
    fn range_candidates_are_shortest_first_but_include_longer_matches() {
        // Range(1,100,1,0): "12" is in range both as "1" (cursor 0) and as
        // "12" (cursor 11); a caller backtracking past the shortest match
        // needs the longer one too.
        let seg = Segment::range(1, 100, 1, 0).unwrap();
        assert_eq!(
            seg.parse_candidates("12.9", 0),
            vec![(0, 1), (11, 2)],
            "shortest candidate first, longer candidates follow"
        );
    }

    #[test]
    fn range_with_fill() {
        // Range(0,5,2,2): element(0..2) = "00","02","04".
        let seg = Segment::range(0, 5, 2, 2).unwrap();
        assert_eq!(seg.element(0), "00");
        assert_eq!(seg.element(1), "02");
        assert_eq!(seg.element(2), "04");

        assert_eq!(seg.parse("01", 0), None);
        assert_eq!(seg.parse("04", 0), Some(2));
        assert_eq!(seg.parse("4", 0), None);
    }

    #[test]
    fn literal_parse_and_element() {
        let seg = Segment::literal(["alpha", "beta", "al"]).unwrap();
        assert_eq!(seg.parse("alpha-next", 0), Some(0));
        assert_eq!(seg.parse("beta", 0), Some(1));
        assert_eq!(seg.parse("gamma", 0), None);
    }

    #[test]
    fn segment_parse_determinism() {
        // s.parse(s.element(i) ++ suffix, 0) == i whenever no shorter
        // element of s is a prefix of s.element(i).
        let seg = Segment::literal(["zz", "yy"]).unwrap();
        for i in 0..seg.length() {
            let with_suffix = format!("{}_tail", seg.element(i));
            assert_eq!(seg.parse(&with_suffix, 0), Some(i));
        }
    }

    #[test]
    fn invalid_ranges_are_rejected_at_construction() {
        assert_eq!(Segment::range(0, 0, 1, 0), Err(Error::StartEqualsEnd));
        assert_eq!(Segment::range(0, 10, 0, 0), Err(Error::ZeroStep));
        assert_eq!(Segment::range(0, 10, -1, 0), Err(Error::StepSignMismatch));
        assert_eq!(Segment::range(-1, 10, 1, 0), Err(Error::NegativeValue));
    }

    #[test]
    fn fill_rejects_values_needing_more_digits() {
        assert_eq!(
            Segment::range(0, 1000, 1, 2),
            Err(Error::ExceedsFill { value: 100, fill: 2 })
        );
    }
}
