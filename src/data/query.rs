//! Query operations over a loaded [`Dataset`].
//!
//! Every operation borrows rows and returns a new derived sequence; the
//! dataset itself is never touched. [`QuerySpec`] bundles the operations a
//! view needs and applies them in a fixed order:
//!
//! ```text
//!   positivity → substring → ordering → top-N
//! ```

use std::cmp::{Ordering, Reverse};

use super::error::QueryError;
use super::model::{Dataset, Row};

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Rows whose `field` contains `needle`, ignoring case on both sides.
/// An empty needle keeps every row.
pub fn filter_contains<'a>(rows: &[&'a Row], field: &str, needle: &str) -> Vec<&'a Row> {
    if needle.is_empty() {
        return rows.to_vec();
    }
    let needle = needle.to_lowercase();
    rows.iter()
        .copied()
        .filter(|row| row.display(field).to_lowercase().contains(&needle))
        .collect()
}

/// Rows whose numeric `field` is strictly greater than zero. `NaN` fails.
pub fn filter_positive<'a>(rows: &[&'a Row], field: &str) -> Vec<&'a Row> {
    rows.iter()
        .copied()
        .filter(|row| row.number(field) > 0.0)
        .collect()
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

/// Sort direction for a numeric field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    Ascending,
    #[default]
    Descending,
}

/// Compare two numbers in `direction`, always placing `NaN` last.
fn compare_numbers(a: f64, b: f64, direction: Direction) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => match direction {
            Direction::Ascending => a.total_cmp(&b),
            Direction::Descending => b.total_cmp(&a),
        },
    }
}

/// Stable sort by a numeric field.
pub fn sort_by_number<'a>(rows: &[&'a Row], field: &str, direction: Direction) -> Vec<&'a Row> {
    let mut sorted = rows.to_vec();
    // `sort_by` is a stable merge sort: ties keep their input order.
    sorted.sort_by(|a, b| compare_numbers(a.number(field), b.number(field), direction));
    sorted
}

/// Stable sort, highest value first.
pub fn sort_descending<'a>(rows: &[&'a Row], field: &str) -> Vec<&'a Row> {
    sort_by_number(rows, field, Direction::Descending)
}

/// Lower bound of an age band label such as `"40-49"`.
pub fn band_lower_bound(label: &str) -> Result<i64, QueryError> {
    let malformed = || QueryError::MalformedBand(label.to_string());
    let (low, _) = label.split_once('-').ok_or_else(malformed)?;
    low.trim().parse::<i64>().map_err(|_| malformed())
}

/// Order rows by the lower bound of their band label, oldest band first.
///
/// Fails on the first malformed label instead of producing a partial order.
pub fn order_by_band_descending<'a>(
    rows: &[&'a Row],
    field: &str,
) -> Result<Vec<&'a Row>, QueryError> {
    let mut keyed = rows
        .iter()
        .map(|row| band_lower_bound(row.text(field)).map(|low| (Reverse(low), *row)))
        .collect::<Result<Vec<_>, _>>()?;
    keyed.sort_by_key(|(key, _)| *key);
    Ok(keyed.into_iter().map(|(_, row)| row).collect())
}

// ---------------------------------------------------------------------------
// Top-N
// ---------------------------------------------------------------------------

/// A truncation count, always at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TopN(usize);

impl TopN {
    pub const MIN: TopN = TopN(1);

    /// Clamp any integer to a valid count.
    pub fn new(n: i64) -> Self {
        TopN(usize::try_from(n.max(1)).unwrap_or(usize::MAX))
    }

    /// Strict parse of user input. Fractions truncate toward zero; positive
    /// infinity and values too large to count mean "every row".
    pub fn parse(input: &str) -> Result<Self, QueryError> {
        let invalid = || QueryError::InvalidParameter {
            name: "top-N",
            value: input.to_string(),
        };
        let trimmed = input.trim();
        if let Ok(n) = trimmed.parse::<i64>() {
            return Ok(TopN::new(n));
        }
        if trimmed.chars().any(|c| c.is_ascii_alphabetic() && !matches!(c, 'e' | 'E')) {
            return match trimmed {
                "Infinity" | "+Infinity" => Ok(TopN(usize::MAX)),
                "-Infinity" => Ok(TopN::MIN),
                _ => Err(invalid()),
            };
        }
        match trimmed.parse::<f64>() {
            Ok(f) if f.is_nan() => Err(invalid()),
            Ok(f) if f >= usize::MAX as f64 => Ok(TopN(usize::MAX)),
            Ok(f) if f < 1.0 => Ok(TopN::MIN),
            Ok(f) => Ok(TopN(f.trunc() as usize)),
            Err(_) => Err(invalid()),
        }
    }

    /// Lenient parse for UI input: anything invalid clamps to [`TopN::MIN`].
    pub fn from_input(input: &str) -> Self {
        TopN::parse(input).unwrap_or_else(|err| {
            log::warn!("{err}, using {}", TopN::MIN.get());
            TopN::MIN
        })
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for TopN {
    fn default() -> Self {
        TopN(10)
    }
}

/// First `n` rows (clamped to at least one) of an ordered sequence.
pub fn top_n<'a>(rows: &[&'a Row], n: i64) -> Vec<&'a Row> {
    take(rows, TopN::new(n))
}

fn take<'a>(rows: &[&'a Row], n: TopN) -> Vec<&'a Row> {
    rows[..n.get().min(rows.len())].to_vec()
}

// ---------------------------------------------------------------------------
// QuerySpec
// ---------------------------------------------------------------------------

/// Custom, non-numeric orderings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomOrder {
    /// `"<low>-<high>"` labels by `low`, highest first.
    BandDescending { field: String },
}

/// Declarative description of how to derive a display sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuerySpec {
    pub contains: Option<(String, String)>,
    pub positive: Option<String>,
    pub sort: Option<(String, Direction)>,
    pub custom: Option<CustomOrder>,
    pub top_n: Option<TopN>,
}

impl QuerySpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(mut self, field: &str, needle: &str) -> Self {
        self.contains = Some((field.to_string(), needle.to_string()));
        self
    }

    pub fn positive(mut self, field: &str) -> Self {
        self.positive = Some(field.to_string());
        self
    }

    pub fn sort(mut self, field: &str, direction: Direction) -> Self {
        self.sort = Some((field.to_string(), direction));
        self
    }

    pub fn custom(mut self, order: CustomOrder) -> Self {
        self.custom = Some(order);
        self
    }

    pub fn top_n(mut self, n: TopN) -> Self {
        self.top_n = Some(n);
        self
    }

    /// Derive a new sequence from `dataset`. The dataset is left untouched.
    pub fn apply<'a>(&self, dataset: &'a Dataset) -> Result<Vec<&'a Row>, QueryError> {
        self.apply_rows(&dataset.view())
    }

    pub fn apply_rows<'a>(&self, rows: &[&'a Row]) -> Result<Vec<&'a Row>, QueryError> {
        let mut out = rows.to_vec();
        if let Some(field) = &self.positive {
            out = filter_positive(&out, field);
        }
        if let Some((field, needle)) = &self.contains {
            out = filter_contains(&out, field, needle);
        }
        match (&self.custom, &self.sort) {
            (Some(CustomOrder::BandDescending { field }), _) => {
                out = order_by_band_descending(&out, field)?;
            }
            (None, Some((field, direction))) => {
                out = sort_by_number(&out, field, *direction);
            }
            (None, None) => {}
        }
        if let Some(n) = self.top_n {
            out = take(&out, n);
        }
        Ok(out)
    }
}
