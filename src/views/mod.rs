//! View adapters.
//!
//! Each dashboard view is the same pipeline configured differently: a
//! resource name, a declared schema, the query applied to the loaded rows and
//! the kind of chart the result feeds. [`ViewKind`] carries that
//! configuration so the UI only ever drives one generic code path.

pub mod diverging;

use crate::data::{CustomOrder, Dataset, Direction, FieldType, QueryError, QuerySpec, Row, Schema, TopN};

/// How the derived rows are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    /// Vertical bars, one per category.
    Bar,
    /// Pie slices, one per category.
    Pie,
    /// Horizontal bars on both sides of a zero baseline.
    Diverging,
}

/// Which fields the chart reads from each row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub category: &'static str,
    pub values: &'static [&'static str],
}

/// User-controlled query inputs. Only views that expose the matching control
/// read them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewParams {
    pub search: String,
    pub top_n: TopN,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ViewKind {
    OrganizationMentions,
    AgeDistribution,
    AgePyramid,
    GenderDistribution,
    MandateDelay,
}

impl ViewKind {
    pub const ALL: [ViewKind; 5] = [
        ViewKind::OrganizationMentions,
        ViewKind::AgeDistribution,
        ViewKind::AgePyramid,
        ViewKind::GenderDistribution,
        ViewKind::MandateDelay,
    ];

    pub fn title(self) -> &'static str {
        match self {
            ViewKind::OrganizationMentions => "Top Organization Mentions",
            ViewKind::AgeDistribution => "Declarant Age Distribution",
            ViewKind::AgePyramid => "Age Pyramid by Gender",
            ViewKind::GenderDistribution => "Gender Distribution",
            ViewKind::MandateDelay => "Median Publication Delay by Mandate",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ViewKind::OrganizationMentions => {
                "Organizations most frequently referenced in declarations."
            }
            ViewKind::AgeDistribution => "Age bands among declarants.",
            ViewKind::AgePyramid => "Age distribution split by gender (men left, women right).",
            ViewKind::GenderDistribution => "Gender identities among declarants.",
            ViewKind::MandateDelay => "Median days between deposit and publication.",
        }
    }

    /// File name of the backing CSV inside the data directory.
    pub fn resource(self) -> &'static str {
        match self {
            ViewKind::OrganizationMentions => "organization_mentions.csv",
            ViewKind::AgeDistribution => "age_band_counts.csv",
            ViewKind::AgePyramid => "age_pyramid.csv",
            ViewKind::GenderDistribution => "gender_counts.csv",
            ViewKind::MandateDelay => "mandate_delay_median.csv",
        }
    }

    pub fn schema(self) -> Schema {
        use FieldType::{Number, Text};
        match self {
            ViewKind::OrganizationMentions => {
                Schema::new([("organization", Text), ("mentions", Number)])
            }
            ViewKind::AgeDistribution => Schema::new([("age_band", Text), ("count", Number)]),
            ViewKind::AgePyramid => {
                Schema::new([("age_band", Text), ("male", Number), ("female", Number)])
            }
            ViewKind::GenderDistribution => Schema::new([("gender", Text), ("count", Number)]),
            ViewKind::MandateDelay => {
                Schema::new([("mandate_type", Text), ("delay_days", Number)])
            }
        }
    }

    pub fn chart(self) -> ChartSpec {
        match self {
            ViewKind::OrganizationMentions => ChartSpec {
                kind: ChartKind::Bar,
                category: "organization",
                values: &["mentions"],
            },
            ViewKind::AgeDistribution => ChartSpec {
                kind: ChartKind::Bar,
                category: "age_band",
                values: &["count"],
            },
            ViewKind::AgePyramid => ChartSpec {
                kind: ChartKind::Diverging,
                category: "age_band",
                values: &["male", "female"],
            },
            ViewKind::GenderDistribution => ChartSpec {
                kind: ChartKind::Pie,
                category: "gender",
                values: &["count"],
            },
            ViewKind::MandateDelay => ChartSpec {
                kind: ChartKind::Bar,
                category: "mandate_type",
                values: &["delay_days"],
            },
        }
    }

    /// Whether the view exposes the search box and top-N input.
    pub fn is_searchable(self) -> bool {
        matches!(self, ViewKind::OrganizationMentions)
    }

    /// Query applied to this view's dataset for the given inputs.
    pub fn query(self, params: &ViewParams) -> QuerySpec {
        match self {
            ViewKind::OrganizationMentions => QuerySpec::new()
                .positive("mentions")
                .contains("organization", &params.search)
                .sort("mentions", Direction::Descending)
                .top_n(params.top_n),
            ViewKind::AgePyramid => QuerySpec::new().custom(CustomOrder::BandDescending {
                field: "age_band".into(),
            }),
            ViewKind::AgeDistribution | ViewKind::GenderDistribution | ViewKind::MandateDelay => {
                QuerySpec::new()
            }
        }
    }

    /// Run this view's query over a loaded dataset.
    pub fn derive<'a>(
        self,
        dataset: &'a Dataset,
        params: &ViewParams,
    ) -> Result<Vec<&'a Row>, QueryError> {
        self.query(params).apply(dataset)
    }
}

/// `(label, value)` pairs for single-series charts.
pub fn category_values(rows: &[&Row], category: &str, value: &str) -> Vec<(String, f64)> {
    rows.iter()
        .map(|row| (row.display(category), row.number(value)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mentions() -> Dataset {
        let rows = [("A", 5.0), ("B", 0.0), ("C", 12.0), ("Cnrs", 3.0)]
            .into_iter()
            .map(|(o, m)| Row::new().with("organization", o).with("mentions", m))
            .collect();
        Dataset::new(
            "organization_mentions.csv",
            ViewKind::OrganizationMentions.schema(),
            rows,
        )
    }

    #[test]
    fn test_every_view_has_distinct_resource() {
        let mut resources: Vec<&str> = ViewKind::ALL.iter().map(|v| v.resource()).collect();
        resources.sort_unstable();
        resources.dedup();
        assert_eq!(resources.len(), ViewKind::ALL.len());
    }

    #[test]
    fn test_chart_fields_are_declared() {
        for view in ViewKind::ALL {
            let schema = view.schema();
            let chart = view.chart();
            assert_eq!(schema.field_type(chart.category), Some(FieldType::Text));
            for value in chart.values {
                assert_eq!(schema.field_type(value), Some(FieldType::Number), "{view:?}");
            }
        }
    }

    #[test]
    fn test_organization_view_ranks_and_truncates() {
        let ds = mentions();
        let params = ViewParams {
            search: String::new(),
            top_n: TopN::new(2),
        };
        let out = ViewKind::OrganizationMentions.derive(&ds, &params).unwrap();
        let names: Vec<&str> = out.iter().map(|r| r.text("organization")).collect();
        assert_eq!(names, ["C", "A"]);
    }

    #[test]
    fn test_organization_view_search() {
        let ds = mentions();
        let params = ViewParams {
            search: "c".into(),
            top_n: TopN::new(10),
        };
        let out = ViewKind::OrganizationMentions.derive(&ds, &params).unwrap();
        let names: Vec<&str> = out.iter().map(|r| r.text("organization")).collect();
        assert_eq!(names, ["C", "Cnrs"]);
    }

    #[test]
    fn test_plain_views_keep_file_order() {
        let rows = vec![
            Row::new().with("gender", "male").with("count", 2.0),
            Row::new().with("gender", "female").with("count", 5.0),
        ];
        let ds = Dataset::new("gender_counts.csv", ViewKind::GenderDistribution.schema(), rows);
        let out = ViewKind::GenderDistribution
            .derive(&ds, &ViewParams::default())
            .unwrap();
        assert_eq!(category_values(&out, "gender", "count"), [
            ("male".to_string(), 2.0),
            ("female".to_string(), 5.0)
        ]);
    }
}
