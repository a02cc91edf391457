//! Sign convention for diverging (pyramid) layouts.
//!
//! The left series is always drawn below zero and the right series above,
//! whatever sign the resource stores. Magnitudes are what labels show.

use crate::data::Row;

/// One category split into a left (≤ 0) and right (≥ 0) magnitude.
#[derive(Debug, Clone, PartialEq)]
pub struct DivergingBar {
    pub label: String,
    pub left: f64,
    pub right: f64,
}

impl DivergingBar {
    pub fn total(&self) -> f64 {
        self.left.abs() + self.right.abs()
    }
}

/// Build bars in row order, normalizing signs to `left = -|l|`, `right = |r|`.
pub fn diverging_bars(rows: &[&Row], label: &str, left: &str, right: &str) -> Vec<DivergingBar> {
    rows.iter()
        .map(|row| DivergingBar {
            label: row.display(label),
            left: -row.number(left).abs(),
            right: row.number(right).abs(),
        })
        .collect()
}

/// Largest magnitude on either side, for a symmetric axis.
pub fn max_extent(bars: &[DivergingBar]) -> f64 {
    bars.iter()
        .flat_map(|b| [b.left.abs(), b.right.abs()])
        .filter(|v| v.is_finite())
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn band(label: &str, male: f64, female: f64) -> Row {
        Row::new()
            .with("age_band", label)
            .with("male", male)
            .with("female", female)
    }

    #[test]
    fn test_sign_is_normalized_either_way() {
        let rows = [band("40-49", -120.0, 40.0), band("50-59", 90.0, -30.0)];
        let view: Vec<&Row> = rows.iter().collect();
        let bars = diverging_bars(&view, "age_band", "male", "female");

        assert_eq!(bars[0].left, -120.0);
        assert_eq!(bars[0].right, 40.0);
        assert_eq!(bars[1].left, -90.0);
        assert_eq!(bars[1].right, 30.0);
        assert_eq!(bars[1].total(), 120.0);
    }

    #[test]
    fn test_max_extent() {
        let rows = [band("40-49", -120.0, 40.0), band("50-59", 90.0, 150.0)];
        let view: Vec<&Row> = rows.iter().collect();
        let bars = diverging_bars(&view, "age_band", "male", "female");
        assert_eq!(max_extent(&bars), 150.0);
        assert_eq!(max_extent(&[]), 0.0);
    }
}
