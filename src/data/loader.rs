//! Tolerant File Loader Module
//! Parses a department file of unknown encoding/delimiter/format into a
//! DataFrame by walking an ordered list of parse strategies.

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use polars::prelude::*;
use std::io::Cursor;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("could not parse '{name}': every strategy failed (last error: {last})")]
    Exhausted { name: String, last: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TextEncoding {
    Utf8,
    Latin1,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DelimiterMode {
    Comma,
    Sniffed,
}

/// One parse attempt descriptor. Input files come from heterogeneous export
/// pipelines, so the loader degrades through increasingly permissive rules
/// instead of requiring pre-cleaned files.
#[derive(Clone, Copy, Debug)]
enum Strategy {
    Csv {
        encoding: TextEncoding,
        delimiter: DelimiterMode,
    },
    Spreadsheet,
}

const STRATEGIES: [Strategy; 5] = [
    Strategy::Csv {
        encoding: TextEncoding::Utf8,
        delimiter: DelimiterMode::Comma,
    },
    Strategy::Csv {
        encoding: TextEncoding::Latin1,
        delimiter: DelimiterMode::Comma,
    },
    Strategy::Csv {
        encoding: TextEncoding::Utf8,
        delimiter: DelimiterMode::Sniffed,
    },
    Strategy::Csv {
        encoding: TextEncoding::Latin1,
        delimiter: DelimiterMode::Sniffed,
    },
    Strategy::Spreadsheet,
];

/// Load a tabular file from its raw bytes.
///
/// Strategies run in fixed order against a fresh view of the bytes, so a
/// failed attempt can never poison the next one. The first success wins; if
/// all five fail the error carries the last underlying failure.
pub fn load_table(name: &str, bytes: &[u8]) -> Result<DataFrame, LoadError> {
    let mut last = String::from("empty input");

    for strategy in STRATEGIES {
        match attempt(strategy, bytes) {
            Ok(df) => {
                debug!(
                    ?strategy,
                    rows = df.height(),
                    cols = df.width(),
                    file = name,
                    "parse succeeded"
                );
                return Ok(df);
            }
            Err(err) => {
                debug!(?strategy, error = %err, file = name, "parse attempt failed");
                last = err.to_string();
            }
        }
    }

    Err(LoadError::Exhausted {
        name: name.to_string(),
        last,
    })
}

/// Run a single strategy against the full input.
fn attempt(strategy: Strategy, bytes: &[u8]) -> anyhow::Result<DataFrame> {
    let df = match strategy {
        Strategy::Csv {
            encoding,
            delimiter,
        } => {
            let text = decode(encoding, bytes)?;
            let separator = match delimiter {
                DelimiterMode::Comma => b',',
                DelimiterMode::Sniffed => sniff_delimiter(&text),
            };
            // The sniffed strategies also tolerate ragged rows, mirroring the
            // strict-then-permissive escalation of the strategy table.
            let permissive = delimiter == DelimiterMode::Sniffed;

            CsvReadOptions::default()
                .with_has_header(true)
                .with_infer_schema_length(Some(1000))
                .map_parse_options(|opts| {
                    opts.with_separator(separator)
                        .with_truncate_ragged_lines(permissive)
                })
                .into_reader_with_file_handle(Cursor::new(text.into_bytes()))
                .finish()?
        }
        Strategy::Spreadsheet => read_spreadsheet(bytes)?,
    };

    // A single-column result means the delimiter was wrong for this table;
    // treat it as a failure so a later strategy gets its chance.
    if df.width() < 2 {
        anyhow::bail!("parsed to a single column");
    }
    if df.height() == 0 {
        anyhow::bail!("no data rows");
    }

    Ok(df)
}

fn decode(encoding: TextEncoding, bytes: &[u8]) -> anyhow::Result<String> {
    match encoding {
        TextEncoding::Utf8 => Ok(std::str::from_utf8(bytes)?.to_owned()),
        TextEncoding::Latin1 => Ok(encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned()),
    }
}

/// Pick the candidate byte that occurs most often in the header line.
fn sniff_delimiter(text: &str) -> u8 {
    const CANDIDATES: [u8; 4] = [b';', b'\t', b'|', b','];

    let Some(header) = text.lines().find(|l| !l.trim().is_empty()) else {
        return b',';
    };

    let mut best = b',';
    let mut best_count = 0usize;
    for candidate in CANDIDATES {
        let count = header.bytes().filter(|&b| b == candidate).count();
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }
    best
}

/// Last-resort spreadsheet parse: first sheet, first row as header, every
/// cell stringified (numeric coercion happens downstream in the merger).
fn read_spreadsheet(bytes: &[u8]) -> anyhow::Result<DataFrame> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| anyhow::anyhow!("workbook has no worksheet"))??;

    let mut rows = range.rows();
    let header: Vec<String> = rows
        .next()
        .ok_or_else(|| anyhow::anyhow!("worksheet has no header row"))?
        .iter()
        .map(cell_to_string)
        .collect();

    let mut columns: Vec<Vec<String>> = vec![Vec::new(); header.len()];
    for row in rows {
        for (j, slot) in columns.iter_mut().enumerate() {
            slot.push(row.get(j).map(cell_to_string).unwrap_or_default());
        }
    }

    let cols: Vec<Column> = header
        .into_iter()
        .zip(columns)
        .map(|(name, values)| Column::new(name.into(), values))
        .collect();

    Ok(DataFrame::new(cols)?)
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}
