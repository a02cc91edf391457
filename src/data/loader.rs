use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::StringRecord;

use super::error::{LoadError, ParseError};
use super::model::{Dataset, FieldType, Row, Schema, Value};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a CSV resource and type every record against `schema`.
pub fn load_file(path: &Path, schema: &Schema) -> Result<Dataset, LoadError> {
    load_with(path, schema, |raw| type_record(schema, raw))
}

/// Load a CSV resource with a caller-supplied typing function.
///
/// The header must contain every field declared by `schema`; the typing
/// function then turns each raw record into a [`Row`].
pub fn load_with<F>(path: &Path, schema: &Schema, typer: F) -> Result<Dataset, LoadError>
where
    F: FnMut(&RawRecord<'_>) -> Result<Row, ParseError>,
{
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();

    read_dataset(&name, BufReader::new(file), schema, typer)
}

/// Parse delimited text from any reader. `name` is used in errors and kept on
/// the resulting [`Dataset`].
pub fn read_dataset<R, F>(
    name: &str,
    reader: R,
    schema: &Schema,
    mut typer: F,
) -> Result<Dataset, LoadError>
where
    R: Read,
    F: FnMut(&RawRecord<'_>) -> Result<Row, ParseError>,
{
    let csv_err = |source: csv::Error| LoadError::Csv {
        resource: name.to_string(),
        source,
    };
    let parse_err = |source: ParseError| LoadError::Parse {
        resource: name.to_string(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);
    let headers = reader.headers().map_err(csv_err)?.clone();

    for field in schema.field_names() {
        if !headers.iter().any(|h| h == field) {
            return Err(parse_err(ParseError::MissingColumn {
                field: field.to_string(),
            }));
        }
    }

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result.map_err(csv_err)?;
        let raw = RawRecord {
            row: idx + 1,
            headers: &headers,
            record: &record,
        };
        rows.push(typer(&raw).map_err(parse_err)?);
    }

    Ok(Dataset::new(name, schema.clone(), rows))
}

// ---------------------------------------------------------------------------
// Raw records and typing
// ---------------------------------------------------------------------------

/// A string-keyed view over one CSV record.
#[derive(Debug)]
pub struct RawRecord<'a> {
    row: usize,
    headers: &'a StringRecord,
    record: &'a StringRecord,
}

impl<'a> RawRecord<'a> {
    /// 1-based data row number (the header is row 0).
    pub fn row(&self) -> usize {
        self.row
    }

    pub fn get(&self, field: &str) -> Option<&'a str> {
        let idx = self.headers.iter().position(|h| h == field)?;
        self.record.get(idx)
    }

    pub fn require(&self, field: &str) -> Result<&'a str, ParseError> {
        self.get(field).ok_or_else(|| ParseError::MissingField {
            row: self.row,
            field: field.to_string(),
        })
    }
}

/// Type a raw record using the declared schema. Extra columns are dropped.
pub fn type_record(schema: &Schema, raw: &RawRecord<'_>) -> Result<Row, ParseError> {
    let mut row = Row::new();
    for (field, ty) in schema.fields() {
        let text = raw.require(field)?;
        let value = match ty {
            FieldType::Text => Value::Text(text.to_string()),
            FieldType::Number => {
                let n = coerce_number(text);
                if n.is_nan() {
                    log::debug!("row {}: '{field}' = {text:?} is not numeric", raw.row());
                }
                Value::Number(n)
            }
        };
        row.insert(field, value);
    }
    Ok(row)
}

/// Permissive numeric coercion: trimmed text, empty is `0`, junk is `NaN`.
///
/// Accepts decimal and exponent notation, `Infinity`, and unsigned `0x`, `0o`
/// and `0b` integer literals.
pub fn coerce_number(text: &str) -> f64 {
    let text = text.trim();
    if text.is_empty() {
        return 0.0;
    }
    if let Some(n) = radix_literal(text) {
        return n;
    }
    match text {
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        // Rust accepts "inf"/"nan" spellings that are not numbers here.
        t if t.chars().any(|c| c.is_ascii_alphabetic() && !matches!(c, 'e' | 'E')) => f64::NAN,
        t => t.parse::<f64>().unwrap_or(f64::NAN),
    }
}

/// `0x1F`, `0o17`, `0b101`. A prefix with bad or missing digits is `NaN`.
fn radix_literal(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    if bytes.len() < 2 || bytes[0] != b'0' {
        return None;
    }
    let radix = match bytes[1] {
        b'x' | b'X' => 16,
        b'o' | b'O' => 8,
        b'b' | b'B' => 2,
        _ => return None,
    };
    let digits = &text[2..];
    if digits.is_empty() {
        return Some(f64::NAN);
    }
    let value = digits.chars().try_fold(0.0, |acc: f64, c| {
        c.to_digit(radix).map(|d| acc * radix as f64 + d as f64)
    });
    Some(value.unwrap_or(f64::NAN))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mentions_schema() -> Schema {
        Schema::new([
            ("organization", FieldType::Text),
            ("mentions", FieldType::Number),
        ])
    }

    #[test]
    fn test_coerce_number() {
        assert_eq!(coerce_number("12"), 12.0);
        assert_eq!(coerce_number(" 4.5 "), 4.5);
        assert_eq!(coerce_number("-17.0"), -17.0);
        assert_eq!(coerce_number("1e3"), 1000.0);
        assert_eq!(coerce_number(""), 0.0);
        assert_eq!(coerce_number("Infinity"), f64::INFINITY);
        assert!(coerce_number("twelve").is_nan());
        assert!(coerce_number("inf").is_nan());
        assert!(coerce_number("NaN").is_nan());
        assert!(coerce_number("12abc").is_nan());
    }

    #[test]
    fn test_coerce_radix_literals() {
        assert_eq!(coerce_number("0x1F"), 31.0);
        assert_eq!(coerce_number(" 0X1f "), 31.0);
        assert_eq!(coerce_number("0o17"), 15.0);
        assert_eq!(coerce_number("0b101"), 5.0);
        assert!(coerce_number("0x").is_nan());
        assert!(coerce_number("0b102").is_nan());
        assert!(coerce_number("-0x1F").is_nan());
        assert!(coerce_number("0x+1").is_nan());
        assert_eq!(coerce_number("0.5"), 0.5);
        assert_eq!(coerce_number("0e2"), 0.0);
    }

    #[test]
    fn test_read_dataset_types_fields() {
        let csv = "organization,mentions,extra\nAirbus,5,x\nSNCF,abc,y\nEDF,,z\n";
        let schema = mentions_schema();
        let ds = read_dataset("mentions.csv", csv.as_bytes(), &schema, |raw| {
            type_record(&schema, raw)
        })
        .unwrap();

        assert_eq!(ds.name(), "mentions.csv");
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.rows()[0].text("organization"), "Airbus");
        assert_eq!(ds.rows()[0].number("mentions"), 5.0);
        assert!(ds.rows()[1].number("mentions").is_nan());
        assert_eq!(ds.rows()[2].number("mentions"), 0.0);
        assert!(ds.rows()[0].get("extra").is_none());
    }

    #[test]
    fn test_missing_column_is_parse_error() {
        let csv = "organization,count\nAirbus,5\n";
        let schema = mentions_schema();
        let err = read_dataset("m.csv", csv.as_bytes(), &schema, |raw| {
            type_record(&schema, raw)
        })
        .unwrap_err();

        match err {
            LoadError::Parse { source, .. } => assert_eq!(
                source,
                ParseError::MissingColumn {
                    field: "mentions".into()
                }
            ),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_ragged_row_is_csv_error() {
        let csv = "organization,mentions\nAirbus,5\nSNCF\n";
        let schema = mentions_schema();
        let err = read_dataset("m.csv", csv.as_bytes(), &schema, |raw| {
            type_record(&schema, raw)
        })
        .unwrap_err();
        assert!(matches!(err, LoadError::Csv { .. }));
    }

    #[test]
    fn test_custom_typer_sees_row_numbers() {
        let csv = "organization,mentions\nA,1\nB,2\n";
        let schema = mentions_schema();
        let mut seen = Vec::new();
        read_dataset("m.csv", csv.as_bytes(), &schema, |raw| {
            seen.push(raw.row());
            type_record(&schema, raw)
        })
        .unwrap();
        assert_eq!(seen, [1, 2]);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_file(Path::new("/nonexistent/organization_mentions.csv"), &mentions_schema())
            .unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
