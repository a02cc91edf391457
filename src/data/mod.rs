/// Data layer: typed rows, loading, querying and aggregation.
///
/// Architecture:
/// ```text
///  organization_mentions.csv / age_pyramid.csv / ...
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse CSV, type fields per Schema → Dataset
///   └──────────┘     (run off the UI thread by task::LoadTask)
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset   │  immutable Arc<[Row]> + Schema
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  query    │  QuerySpec: positive → contains → order → top-N
///   └──────────┘
/// ```
///
/// `aggregate` goes the other way: it builds the summary CSVs from raw rows,
/// and `sample` feeds it seeded synthetic declarations.

pub mod aggregate;
pub mod error;
pub mod loader;
pub mod model;
pub mod query;
pub mod sample;
pub mod task;

pub use error::{LoadError, ParseError, QueryError};
pub use model::{Dataset, FieldType, Row, Schema, Value};
pub use query::{CustomOrder, Direction, QuerySpec, TopN};
