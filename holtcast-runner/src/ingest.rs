//! Monthly history ingestion from CSV.
//!
//! Layout: a `code` column followed by twelve month columns, oldest first.
//! Rows are kept as raw text until [`HistoryRow::to_series`] so that one bad
//! row does not stop a batch from reading the others.

use std::io::Read;
use std::path::Path;

use holtcast_core::{ForecastError, TimeSeries, HISTORY_LEN};
use thiserror::Error;

use crate::catalog::{decode_sheet, normalize_header, sniff_delimiter};

/// Errors from reading a history file or converting one of its rows.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read history file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("history CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("history file has no 'code' column")]
    MissingCodeColumn,
    #[error("history for '{code}' has {len} month(s), expected {expected}")]
    WrongLength {
        code: String,
        len: usize,
        expected: usize,
    },
    #[error("history for '{code}': {source}")]
    Series {
        code: String,
        #[source]
        source: ForecastError,
    },
    #[error("no history for code '{0}'")]
    UnknownCode(String),
    #[error("history list has {len} value(s), expected {expected}")]
    ListLength { len: usize, expected: usize },
    #[error("history list: {0}")]
    List(#[source] ForecastError),
}

/// One product's raw monthly cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRow {
    pub code: String,
    pub cells: Vec<String>,
}

impl HistoryRow {
    /// Validate the row into a twelve-month series.
    pub fn to_series(&self) -> Result<TimeSeries, IngestError> {
        if self.cells.len() != HISTORY_LEN {
            return Err(IngestError::WrongLength {
                code: self.code.clone(),
                len: self.cells.len(),
                expected: HISTORY_LEN,
            });
        }
        let cells: Vec<Option<&str>> = self.cells.iter().map(|c| Some(c.as_str())).collect();
        TimeSeries::from_cells(&cells).map_err(|source| IngestError::Series {
            code: self.code.clone(),
            source,
        })
    }
}

/// All rows of a history file, in file order.
#[derive(Debug, Clone, Default)]
pub struct HistoryFile {
    pub month_headers: Vec<String>,
    pub rows: Vec<HistoryRow>,
}

impl HistoryFile {
    pub fn from_file(path: &Path) -> Result<Self, IngestError> {
        let bytes = std::fs::read(path).map_err(|source| IngestError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_bytes(&bytes)
    }

    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, IngestError> {
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(|source| IngestError::Read {
                path: "<reader>".into(),
                source,
            })?;
        Self::from_bytes(&bytes)
    }

    /// Parse UTF-8 or Windows-1252 CSV bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, IngestError> {
        let content = decode_sheet(bytes);
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(sniff_delimiter(&content))
            .flexible(true)
            .from_reader(content.as_bytes());

        let headers: Vec<String> = rdr.headers()?.iter().map(normalize_header).collect();
        let code_col = headers
            .iter()
            .position(|h| h == "code" || h == "code ean uvc")
            .ok_or(IngestError::MissingCodeColumn)?;
        let month_headers = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != code_col)
            .map(|(_, h)| h.clone())
            .collect();

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            let code = record.get(code_col).unwrap_or("").trim().to_string();
            if code.is_empty() {
                continue;
            }
            let mut cells: Vec<String> = record
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != code_col)
                .map(|(_, c)| c.trim().to_string())
                .collect();
            // Trailing empty cells from a trailing delimiter are not months.
            while cells.len() > HISTORY_LEN && cells.last().is_some_and(|c| c.is_empty()) {
                cells.pop();
            }
            rows.push(HistoryRow { code, cells });
        }

        tracing::debug!(rows = rows.len(), "history file loaded");
        Ok(Self {
            month_headers,
            rows,
        })
    }

    /// The first row with this code.
    pub fn row(&self, code: &str) -> Result<&HistoryRow, IngestError> {
        let code = code.trim();
        self.rows
            .iter()
            .find(|r| r.code == code)
            .ok_or_else(|| IngestError::UnknownCode(code.to_string()))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Parse a typed-in history: twelve values, oldest first, separated by
/// commas, or by semicolons when the values use decimal commas.
pub fn parse_history_list(raw: &str) -> Result<TimeSeries, IngestError> {
    let sep = if raw.contains(';') { ';' } else { ',' };
    let cells: Vec<Option<&str>> = raw.split(sep).map(Some).collect();
    if cells.len() != HISTORY_LEN {
        return Err(IngestError::ListLength {
            len: cells.len(),
            expected: HISTORY_LEN,
        });
    }
    TimeSeries::from_cells(&cells).map_err(IngestError::List)
}

#[cfg(test)]
mod tests {
    use super::*;
    use holtcast_core::SeriesDefect;

    const HISTORY: &str = "code;jan;feb;mar;apr;may;jun;jul;aug;sep;oct;nov;dec\n\
A1;100;110;120;130;140;150;160;170;180;190;200;210\n\
B2;5;5;5;5;5;5;5;5;5;5;5\n\
C3;1;2;;4;5;6;7;8;9;10;11;12\n";

    #[test]
    fn reads_rows_in_order() {
        let file = HistoryFile::from_reader(HISTORY.as_bytes()).unwrap();
        assert_eq!(file.len(), 3);
        assert_eq!(file.month_headers.len(), 12);
        assert_eq!(file.month_headers[0], "jan");
        let codes: Vec<&str> = file.rows.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["A1", "B2", "C3"]);
    }

    #[test]
    fn valid_row_becomes_series() {
        let file = HistoryFile::from_reader(HISTORY.as_bytes()).unwrap();
        let series = file.row("A1").unwrap().to_series().unwrap();
        assert_eq!(series.len(), 12);
        assert_eq!(series.last(), 210.0);
    }

    #[test]
    fn short_row_rejected() {
        let file = HistoryFile::from_reader(HISTORY.as_bytes()).unwrap();
        let err = file.row("B2").unwrap().to_series().unwrap_err();
        assert!(matches!(err, IngestError::WrongLength { len: 11, expected: 12, .. }));
    }

    #[test]
    fn gap_surfaces_core_error() {
        let file = HistoryFile::from_reader(HISTORY.as_bytes()).unwrap();
        let err = file.row("C3").unwrap().to_series().unwrap_err();
        match err {
            IngestError::Series { code, source } => {
                assert_eq!(code, "C3");
                assert_eq!(
                    source,
                    ForecastError::InvalidSeries(SeriesDefect::Missing { index: 2 })
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn trailing_delimiter_tolerated() {
        let csv = "code,m1,m2,m3,m4,m5,m6,m7,m8,m9,m10,m11,m12\nX,1,2,3,4,5,6,7,8,9,10,11,12,\n";
        let file = HistoryFile::from_reader(csv.as_bytes()).unwrap();
        assert!(file.row("X").unwrap().to_series().is_ok());
    }

    #[test]
    fn unknown_code_and_missing_column() {
        let file = HistoryFile::from_reader(HISTORY.as_bytes()).unwrap();
        assert!(matches!(file.row("ZZ"), Err(IngestError::UnknownCode(_))));
        let err = HistoryFile::from_reader("sku,m1\nX,1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, IngestError::MissingCodeColumn));
    }

    #[test]
    fn command_line_list() {
        let s = parse_history_list("1,2,3,4,5,6,7,8,9,10,11,12").unwrap();
        assert_eq!(s.len(), 12);
        assert_eq!(s.last(), 12.0);
        let s = parse_history_list("1,5;2,5;3;4;5;6;7;8;9;10;11;12").unwrap();
        assert_eq!(&s.values()[..3], &[1.5, 2.5, 3.0]);
        assert!(matches!(
            parse_history_list("1,2,3,4,5,6,7,8,9,10,,12"),
            Err(IngestError::List(ForecastError::InvalidSeries(SeriesDefect::Missing {
                index: 10
            })))
        ));
    }

    #[test]
    fn command_line_list_needs_twelve_months() {
        assert!(matches!(
            parse_history_list("1,2,3"),
            Err(IngestError::ListLength { len: 3, expected: 12 })
        ));
        let thirteen = vec!["1"; 13].join(",");
        assert!(matches!(
            parse_history_list(&thirteen),
            Err(IngestError::ListLength { len: 13, expected: 12 })
        ));
    }

    #[test]
    fn windows_1252_month_headers_decoded() {
        let mut csv = b"code;janv;f".to_vec();
        csv.push(0xE9); // é
        csv.extend_from_slice(b"vr;mars;avr;mai;juin;juil;ao");
        csv.push(0xFB); // û
        csv.extend_from_slice(b"t;sept;oct;nov;d");
        csv.push(0xE9);
        csv.extend_from_slice(b"c\nA1;1;2;3;4;5;6;7;8;9;10;11;12\n");

        let file = HistoryFile::from_bytes(&csv).unwrap();
        assert_eq!(file.month_headers[1], "févr");
        assert_eq!(file.month_headers[7], "août");
        assert!(file.row("A1").unwrap().to_series().is_ok());
    }

    #[test]
    fn missing_file_error_names_the_path() {
        let err = HistoryFile::from_file(Path::new("/nonexistent/history.csv")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/history.csv"));
    }
}
