//! Labeled tabular datasets.
//!
//! Plain delimited text, one sample per line, no header. Every column but the
//! last is a numeric feature; the last column is the integral class id.
//! Commas, semicolons, tabs and spaces all separate fields. Blank lines and
//! lines starting with `#` are skipped.
//!
//! ```text
//! 5.1,3.5,1.4,0.2,0
//! 7.0,3.2,4.7,1.4,1
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{Error, Result};
use crate::matrix::{FeatureMatrix, Label, LabelVector};

/// Features plus ground-truth labels.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// Feature rows.
    pub features: FeatureMatrix,
    /// One class id per row.
    pub labels: LabelVector,
}

impl Dataset {
    /// Pair features with labels, checking that the counts agree.
    pub fn new(features: FeatureMatrix, labels: LabelVector) -> Result<Self> {
        if features.n_samples() != labels.len() {
            return Err(Error::LabelCountMismatch {
                n_samples: features.n_samples(),
                n_labels: labels.len(),
            });
        }
        Ok(Self { features, labels })
    }

    /// Read a dataset file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(BufReader::new(file))
    }

    /// Parse a dataset from any buffered reader.
    pub fn from_reader(reader: impl BufRead) -> Result<Self> {
        let mut rows = Vec::new();
        let mut labels = Vec::new();
        let mut width: Option<usize> = None;

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let lineno = idx + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let fields: Vec<&str> = trimmed
                .split(|c: char| c == ',' || c == ';' || c.is_whitespace())
                .filter(|f| !f.is_empty())
                .collect();
            let Some((last, feats)) = fields.split_last() else {
                continue;
            };
            if feats.is_empty() {
                return Err(Error::Malformed {
                    line: lineno,
                    message: "need at least one feature and a label".to_string(),
                });
            }
            match width {
                None => width = Some(fields.len()),
                Some(w) if w != fields.len() => {
                    return Err(Error::Malformed {
                        line: lineno,
                        message: format!("expected {w} fields, found {}", fields.len()),
                    });
                }
                Some(_) => {}
            }

            let row = feats
                .iter()
                .map(|f| parse_feature(f, lineno))
                .collect::<Result<Vec<f64>>>()?;
            rows.push(row);
            labels.push(parse_label(last, lineno)?);
        }

        let features = FeatureMatrix::new(rows)?;
        tracing::debug!(
            samples = features.n_samples(),
            features = features.n_features(),
            "dataset loaded"
        );
        Self::new(features, labels)
    }
}

fn parse_feature(field: &str, line: usize) -> Result<f64> {
    match field.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        Ok(_) => Err(Error::Malformed {
            line,
            message: format!("non-finite feature value {field:?}"),
        }),
        Err(_) => Err(Error::Malformed {
            line,
            message: format!("invalid feature value {field:?}"),
        }),
    }
}

/// Accepts integers and integral floats such as `2.0`.
fn parse_label(field: &str, line: usize) -> Result<Label> {
    if let Ok(v) = field.parse::<Label>() {
        return Ok(v);
    }
    match field.parse::<f64>() {
        Ok(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < 9.0e15 => Ok(v as Label),
        _ => Err(Error::Malformed {
            line,
            message: format!("class id {field:?} is not an integer"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parses_rows_and_labels() {
        let text = "# comment\n1.0,2.0,0\n\n3.5, 4.5, 1\n-1e-1;2;2.0\n";
        let ds = Dataset::from_reader(Cursor::new(text)).unwrap();
        assert_eq!(ds.features.n_samples(), 3);
        assert_eq!(ds.features.n_features(), 2);
        assert_eq!(ds.features.rows()[2], vec![-0.1, 2.0]);
        assert_eq!(ds.labels, vec![0, 1, 2]);
    }

    #[test]
    fn ragged_row_is_malformed() {
        let text = "1,2,0\n1,0\n";
        let err = Dataset::from_reader(Cursor::new(text)).unwrap_err();
        assert!(matches!(err, Error::Malformed { line: 2, .. }));
    }

    #[test]
    fn bad_values_are_malformed() {
        assert!(matches!(
            Dataset::from_reader(Cursor::new("1,x,0\n")),
            Err(Error::Malformed { line: 1, .. })
        ));
        assert!(matches!(
            Dataset::from_reader(Cursor::new("1,2,0.5\n")),
            Err(Error::Malformed { line: 1, .. })
        ));
        assert!(matches!(
            Dataset::from_reader(Cursor::new("1,NaN,0\n")),
            Err(Error::Malformed { line: 1, .. })
        ));
        assert!(matches!(
            Dataset::from_reader(Cursor::new("3\n")),
            Err(Error::Malformed { line: 1, .. })
        ));
    }

    #[test]
    fn empty_file_is_empty_input() {
        assert!(matches!(
            Dataset::from_reader(Cursor::new("\n# nothing\n")),
            Err(Error::EmptyInput)
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            Dataset::from_path("/definitely/not/here.csv"),
            Err(Error::Io(_))
        ));
    }
}
