//! Parses a caller-supplied version-id grammar from a compact CLI string
//! into a [`migrate_core::pattern::Pattern`].
//!
//! The version-id grammar is entirely caller-declared, with no fixed
//! format; this module is the CLI's concrete notation for declaring one
//! without writing Rust. Segments are separated by `/`:
//!
//! - `lit:a,b,c` — a literal alternation, most specific alternative first.
//! - `range:start:end:step` or `range:start:end:step:fill` — an integer
//!   range, with an optional zero-pad width.
//!
//! Example: `range:1:100:1/lit:./range:0:10:1` matches ids like `"2.4"`.

use color_eyre::eyre::{self, WrapErr};
use migrate_core::pattern::Pattern;
use migrate_core::segment::Segment;

pub fn parse(spec: &str) -> eyre::Result<Pattern> {
    let segments = spec
        .split('/')
        .map(parse_segment)
        .collect::<eyre::Result<Vec<_>>>()?;
    Pattern::new(segments).wrap_err("invalid pattern")
}

fn parse_segment(spec: &str) -> eyre::Result<Segment> {
    let (kind, rest) = spec
        .split_once(':')
        .ok_or_else(|| eyre::eyre!("segment {spec:?} is missing a `kind:` prefix"))?;

    match kind {
        "lit" => {
            let alternatives: Vec<&str> = rest.split(',').collect();
            Segment::literal(alternatives).wrap_err_with(|| format!("segment {spec:?}"))
        }
        "range" => {
            let parts: Vec<&str> = rest.split(':').collect();
            let (start, end, step, fill) = match parts.as_slice() {
                [start, end, step] => (*start, *end, *step, "0"),
                [start, end, step, fill] => (*start, *end, *step, *fill),
                _ => eyre::bail!("segment {spec:?} must be `range:start:end:step[:fill]`"),
            };
            let start: i64 = start.parse().wrap_err_with(|| format!("segment {spec:?}"))?;
            let end: i64 = end.parse().wrap_err_with(|| format!("segment {spec:?}"))?;
            let step: i64 = step.parse().wrap_err_with(|| format!("segment {spec:?}"))?;
            let fill: u8 = fill.parse().wrap_err_with(|| format!("segment {spec:?}"))?;
            Segment::range(start, end, step, fill).wrap_err_with(|| format!("segment {spec:?}"))
        }
        other => eyre::bail!("unknown segment kind {other:?} in {spec:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_spec_example_pattern() {
        let pattern = parse("range:1:100:1/lit:./range:0:10:1").unwrap();
        assert_eq!(pattern.cursors_for("2.4"), Some(vec![1, 0, 4]));
    }

    #[test]
    fn parses_a_filled_range() {
        let pattern = parse("range:0:5:2:2").unwrap();
        assert_eq!(pattern.cursors_for("04"), Some(vec![2]));
    }

    #[test]
    fn rejects_unknown_segment_kind() {
        assert!(parse("bogus:1:2:3").is_err());
    }
}
