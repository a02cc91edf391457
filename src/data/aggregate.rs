//! Aggregations that turn raw per-declarant and per-mandate rows, and raw
//! declaration documents, into the summary datasets the dashboard reads, plus
//! a CSV writer for them.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;

use super::model::{Dataset, FieldType, Row, Schema, Value};
use super::query::{sort_by_number, Direction};

// ---------------------------------------------------------------------------
// Age banding
// ---------------------------------------------------------------------------

/// Fixed-width, left-closed age bands: `[start, start + width)`, ...
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeBands {
    pub start: u32,
    pub end: u32,
    pub width: u32,
}

impl Default for AgeBands {
    fn default() -> Self {
        AgeBands {
            start: 20,
            end: 100,
            width: 10,
        }
    }
}

impl AgeBands {
    /// Labels in ascending order, e.g. `"20-29"`.
    pub fn labels(&self) -> Vec<String> {
        let width = self.width.max(1);
        (self.start..self.end)
            .step_by(width as usize)
            .map(|low| format!("{low}-{}", low + width - 1))
            .collect()
    }

    /// Label of the band containing `age`, or `None` outside the range.
    pub fn label_for(&self, age: f64) -> Option<String> {
        if !age.is_finite() || age < self.start as f64 || age >= self.end as f64 {
            return None;
        }
        let width = self.width.max(1);
        let low = self.start + ((age as u32 - self.start) / width) * width;
        Some(format!("{low}-{}", low + width - 1))
    }
}

// ---------------------------------------------------------------------------
// Counting and grouping
// ---------------------------------------------------------------------------

/// Count occurrences of each distinct display value of `field`, most
/// frequent first. Ties keep first-appearance order. Empty values are skipped.
pub fn value_counts(rows: &[&Row], field: &str) -> Vec<(String, usize)> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for row in rows {
        let key = row.display(field);
        if key.is_empty() {
            continue;
        }
        let slot = counts.entry(key.clone()).or_insert_with(|| {
            order.push(key);
            0
        });
        *slot += 1;
    }
    let mut out: Vec<(String, usize)> = order
        .into_iter()
        .map(|k| {
            let n = counts[&k];
            (k, n)
        })
        .collect();
    out.sort_by(|a, b| b.1.cmp(&a.1));
    out
}

/// Median of a slice, `None` when no finite values are present.
pub fn median(values: &[f64]) -> Option<f64> {
    let mut finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return None;
    }
    finite.sort_by(f64::total_cmp);
    let mid = finite.len() / 2;
    if finite.len() % 2 == 0 {
        Some((finite[mid - 1] + finite[mid]) / 2.0)
    } else {
        Some(finite[mid])
    }
}

// ---------------------------------------------------------------------------
// Summary datasets
// ---------------------------------------------------------------------------

/// `age_band,count` for every band (including empty ones), youngest first.
pub fn age_band_counts(rows: &[&Row], age_field: &str, bands: &AgeBands) -> Dataset {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for row in rows {
        if let Some(label) = bands.label_for(row.number(age_field)) {
            *counts.entry(label).or_default() += 1;
        }
    }
    let out = bands
        .labels()
        .into_iter()
        .map(|label| {
            let n = counts.get(&label).copied().unwrap_or(0);
            Row::new().with("age_band", label).with("count", n as f64)
        })
        .collect();

    let schema = Schema::new([("age_band", FieldType::Text), ("count", FieldType::Number)]);
    Dataset::new("age_band_counts.csv", schema, out)
}

/// `gender,count`, most frequent first.
pub fn gender_counts(rows: &[&Row], gender_field: &str) -> Dataset {
    let out = value_counts(rows, gender_field)
        .into_iter()
        .map(|(gender, n)| Row::new().with("gender", gender).with("count", n as f64))
        .collect();

    let schema = Schema::new([("gender", FieldType::Text), ("count", FieldType::Number)]);
    Dataset::new("gender_counts.csv", schema, out)
}

/// `age_band,male,female` with male counts stored negated, oldest band first.
/// Missing combinations are zero.
pub fn age_pyramid(rows: &[&Row], age_field: &str, gender_field: &str, bands: &AgeBands) -> Dataset {
    let mut cells: BTreeMap<(String, String), usize> = BTreeMap::new();
    for row in rows {
        if let Some(label) = bands.label_for(row.number(age_field)) {
            let gender = row.text(gender_field).to_lowercase();
            *cells.entry((label, gender)).or_default() += 1;
        }
    }
    let count = |label: &str, gender: &str| {
        cells
            .get(&(label.to_string(), gender.to_string()))
            .copied()
            .unwrap_or(0) as f64
    };
    let out = bands
        .labels()
        .into_iter()
        .rev()
        .map(|label| {
            // 0.0 - x keeps empty cells at +0 rather than -0
            let male = 0.0 - count(&label, "male");
            let female = count(&label, "female");
            Row::new()
                .with("age_band", label)
                .with("male", male)
                .with("female", female)
        })
        .collect();

    let schema = Schema::new([
        ("age_band", FieldType::Text),
        ("male", FieldType::Number),
        ("female", FieldType::Number),
    ]);
    Dataset::new("age_pyramid.csv", schema, out)
}

/// Median of `value_field` per `group_field`, highest median first.
pub fn median_by(
    rows: &[&Row],
    group_field: &str,
    value_field: &str,
    name: &str,
) -> Dataset {
    let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for row in rows {
        groups
            .entry(row.display(group_field))
            .or_default()
            .push(row.number(value_field));
    }
    let medians: Vec<Row> = groups
        .into_iter()
        .filter_map(|(group, values)| {
            median(&values).map(|m| Row::new().with(group_field, group).with(value_field, m))
        })
        .collect();
    let view: Vec<&Row> = medians.iter().collect();
    let sorted = sort_by_number(&view, value_field, Direction::Descending)
        .into_iter()
        .cloned()
        .collect();

    let schema = Schema::new([(group_field, FieldType::Text), (value_field, FieldType::Number)]);
    Dataset::new(name, schema, sorted)
}

/// For each name, the number of distinct document ids whose text contains it.
/// Matching is a case-sensitive substring test; results follow `names` order
/// and unmentioned names count zero.
pub fn mention_counts(documents: &[(String, String)], names: &[&str]) -> Vec<(String, usize)> {
    names
        .iter()
        .map(|&name| {
            let ids: BTreeSet<&str> = documents
                .iter()
                .filter(|(_, text)| text.contains(name))
                .map(|(id, _)| id.as_str())
                .collect();
            (name.to_string(), ids.len())
        })
        .collect()
}

/// `organization,mentions` from counted pairs, most mentioned first.
pub fn organization_mentions(counts: &[(String, usize)]) -> Dataset {
    let rows: Vec<Row> = counts
        .iter()
        .map(|(org, n)| Row::new().with("organization", org.as_str()).with("mentions", *n as f64))
        .collect();
    let view: Vec<&Row> = rows.iter().collect();
    let sorted = sort_by_number(&view, "mentions", Direction::Descending)
        .into_iter()
        .cloned()
        .collect();

    let schema = Schema::new([
        ("organization", FieldType::Text),
        ("mentions", FieldType::Number),
    ]);
    Dataset::new("organization_mentions.csv", schema, sorted)
}

// ---------------------------------------------------------------------------
// CSV output
// ---------------------------------------------------------------------------

/// Write a dataset as CSV with its schema as the header.
pub fn write_csv<W: Write>(dataset: &Dataset, writer: W) -> Result<(), csv::Error> {
    let mut out = csv::Writer::from_writer(writer);
    let header: Vec<&str> = dataset.schema().field_names().collect();
    out.write_record(&header)?;
    for row in dataset.rows() {
        out.write_record(header.iter().map(|field| match row.get(field) {
            Some(Value::Text(s)) => s.clone(),
            Some(v) => v.to_string(),
            None => String::new(),
        }))?;
    }
    out.flush()?;
    Ok(())
}
