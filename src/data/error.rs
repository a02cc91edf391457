use std::path::PathBuf;

use thiserror::Error;

/// Failure to obtain a dataset. Terminal for the view that requested it.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV in {resource}: {source}")]
    Csv {
        resource: String,
        #[source]
        source: csv::Error,
    },

    #[error("{resource}: {source}")]
    Parse {
        resource: String,
        #[source]
        source: ParseError,
    },
}

/// A record could not be typed against the declared schema.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("header has no '{field}' column")]
    MissingColumn { field: String },

    #[error("row {row}: missing field '{field}'")]
    MissingField { row: usize, field: String },
}

/// Errors raised by query operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("age band '{0}' is not of the form <low>-<high>")]
    MalformedBand(String),

    #[error("invalid {name}: '{value}'")]
    InvalidParameter { name: &'static str, value: String },
}
