//! Ordering over signed-magnitude AQI differences (`"+3"`, `"-1"`, `"0"`).
//!
//! Magnitude dominates: `"+2"` ranks above `"-1"`. On equal magnitude `-`
//! ranks below `+`. A missing value ranks below everything and a zero
//! difference ranks below every signed one.
//!
//! `compare_diff` keeps two left-operand rules (see `MISSING_ALWAYS_WINS` and
//! `ZERO_ALWAYS_WINS`), so it is not a total order. Sorting goes through
//! `DiffRank`, which is.

use crate::models::SummaryRow;
use std::cmp::{Ordering, Reverse};

/// A missing operand on either side compares as `Less`: a missing left
/// operand sorts before any value, and any left operand sorts before a missing
/// right one. `compare_diff(None, None)` is therefore `Less` too.
pub const MISSING_ALWAYS_WINS: bool = true;

/// A zero-difference left operand always compares as `Less`, even against
/// another zero. This makes `compare_diff("0", "0")` return `Less`, which is
/// not reflexive; callers sorting slices use `DiffRank` instead.
pub const ZERO_ALWAYS_WINS: bool = true;

/// Sign of a non-zero difference. `Minus` orders before `Plus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Sign {
    /// Measured worse than forecast.
    Minus,
    /// Forecast worse than measured.
    Plus,
}

/// Total-order key for a difference string.
///
/// Variant order, then magnitude, then sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DiffRank {
    Missing,
    NoDeviation,
    Deviation { magnitude: u32, sign: Sign },
}

impl DiffRank {
    /// Parses a difference string.
    ///
    /// A leading `'0'` (or an empty string) means no deviation. Without an
    /// explicit sign the value counts as `+`; unparseable digits count as `0`.
    pub fn of(value: Option<&str>) -> Self {
        let Some(value) = value else {
            return DiffRank::Missing;
        };
        let (sign, digits) = match value.chars().next() {
            None | Some('0') => return DiffRank::NoDeviation,
            Some('-') => (Sign::Minus, &value[1..]),
            Some('+') => (Sign::Plus, &value[1..]),
            Some(_) => (Sign::Plus, value),
        };
        DiffRank::Deviation {
            magnitude: digits.trim().parse().unwrap_or(0),
            sign,
        }
    }
}

/// Compares two difference strings.
///
/// Missing operands are checked first, then the zero rule, then magnitude and sign.
pub fn compare_diff(a: Option<&str>, b: Option<&str>) -> Ordering {
    if MISSING_ALWAYS_WINS && (a.is_none() || b.is_none()) {
        return Ordering::Less;
    }
    let (a, b) = (DiffRank::of(a), DiffRank::of(b));
    if ZERO_ALWAYS_WINS && a == DiffRank::NoDeviation {
        return Ordering::Less;
    }
    a.cmp(&b)
}

/// Stable sort of summary rows by difference.
///
/// `descending` puts the most divergent rows first and rows without a
/// difference last.
pub fn rank_rows(rows: &mut [SummaryRow], descending: bool) {
    if descending {
        rows.sort_by_key(|row| Reverse(DiffRank::of(row.aqi_difference.as_deref())));
    } else {
        rows.sort_by_key(|row| DiffRank::of(row.aqi_difference.as_deref()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ForecastSummary;
    use rstest::rstest;
    use std::collections::BTreeMap;

    #[rstest]
    #[case(Some("+2"), Some("-1"), Ordering::Greater)]
    #[case(Some("-3"), Some("+2"), Ordering::Greater)]
    #[case(Some("-2"), Some("+2"), Ordering::Less)]
    #[case(Some("+2"), Some("-2"), Ordering::Greater)]
    #[case(Some("+2"), Some("+2"), Ordering::Equal)]
    #[case(Some("-4"), Some("-4"), Ordering::Equal)]
    #[case(Some("0"), Some("-1"), Ordering::Less)]
    #[case(Some("+1"), Some("0"), Ordering::Greater)]
    #[case(None, Some("0"), Ordering::Less)]
    #[case(Some("0"), None, Ordering::Less)]
    #[case(None, Some("+5"), Ordering::Less)]
    #[case(Some("-1"), None, Ordering::Less)]
    #[case(Some("+5"), None, Ordering::Less)]
    fn test_compare_diff(
        #[case] a: Option<&str>,
        #[case] b: Option<&str>,
        #[case] expected: Ordering,
    ) {
        assert_eq!(compare_diff(a, b), expected);
    }

    #[test]
    fn test_zero_self_comparison_is_less() {
        assert_eq!(compare_diff(Some("0"), Some("0")), Ordering::Less);
    }

    #[test]
    fn test_missing_self_comparison_is_less() {
        assert_eq!(compare_diff(None, None), Ordering::Less);
    }

    #[test]
    fn test_missing_operand_always_compares_less() {
        for value in [Some("0"), Some("-3"), Some("+6")] {
            assert_eq!(compare_diff(None, value), Ordering::Less);
            assert_eq!(compare_diff(value, None), Ordering::Less);
        }
    }

    #[test]
    fn test_rank_places_missing_below_present() {
        assert!(DiffRank::of(None) < DiffRank::of(Some("0")));
        assert!(DiffRank::of(None) < DiffRank::of(Some("-1")));
    }

    #[test]
    fn test_rank_agrees_with_compare_diff_on_distinct_values() {
        let values = [Some("0"), Some("-1"), Some("+1"), Some("-2"), Some("+2"), Some("+5")];
        for a in values {
            for b in values {
                let (ra, rb) = (DiffRank::of(a), DiffRank::of(b));
                if ra != rb {
                    assert_eq!(ra.cmp(&rb), compare_diff(a, b), "{:?} vs {:?}", a, b);
                }
            }
        }
    }

    #[test]
    fn test_unsigned_value_counts_as_plus() {
        assert_eq!(
            DiffRank::of(Some("3")),
            DiffRank::Deviation { magnitude: 3, sign: Sign::Plus }
        );
        assert_eq!(DiffRank::of(Some("")), DiffRank::NoDeviation);
    }

    fn row(name: &str, diff: Option<&str>) -> SummaryRow {
        SummaryRow {
            location_name: name.to_string(),
            forecast: ForecastSummary {
                aqi_level: 1,
                per_pollutant: BTreeMap::new(),
            },
            measurements: None,
            aqi_difference: diff.map(str::to_string),
        }
    }

    fn names(rows: &[SummaryRow]) -> Vec<&str> {
        rows.iter().map(|r| r.location_name.as_str()).collect()
    }

    #[test]
    fn test_rank_rows_descending() {
        let mut rows = vec![
            row("a", Some("0")),
            row("b", None),
            row("c", Some("-2")),
            row("d", Some("+1")),
            row("e", Some("+2")),
            row("f", Some("0")),
        ];
        rank_rows(&mut rows, true);
        assert_eq!(names(&rows), vec!["e", "c", "d", "a", "f", "b"]);
    }

    #[test]
    fn test_rank_rows_ascending() {
        let mut rows = vec![
            row("a", Some("+3")),
            row("b", Some("0")),
            row("c", None),
            row("d", Some("-3")),
        ];
        rank_rows(&mut rows, false);
        assert_eq!(names(&rows), vec!["c", "b", "d", "a"]);
    }
}
