//! # Results Reporting
//!
//! Accumulates one row per trained model and writes the table as CSV.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::error::{PosTagError, Result};

const HEADER: [&str; 5] = ["Model", "Language", "Training time", "Train F1", "Test F1"];

/// Outcome of training and evaluating one model on one language.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub model: String,
    pub language: String,
    /// Wall-clock training time in seconds.
    pub training_time: f64,
    pub train_f1: f64,
    pub test_f1: f64,
}

impl ResultRow {
    fn fields(&self) -> [String; 5] {
        [
            self.model.clone(),
            self.language.clone(),
            self.training_time.to_string(),
            self.train_f1.to_string(),
            self.test_f1.to_string(),
        ]
    }
}

/// Rows in insertion order.
#[derive(Debug, Clone, Default)]
pub struct ResultsTable {
    rows: Vec<ResultRow>,
}

impl ResultsTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: ResultRow) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Overwrite `path` with the header and every row. Parent directories
    /// are created as needed.
    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| PosTagError::io(parent, e))?;
        }
        let file = File::create(path).map_err(|e| PosTagError::io(path, e))?;
        let mut out = BufWriter::new(file);

        let io = |e| PosTagError::io(path, e);
        write_record(&mut out, &HEADER).map_err(io)?;
        for row in &self.rows {
            write_record(&mut out, &row.fields()).map_err(io)?;
        }
        out.flush().map_err(io)?;

        info!(path = %path.display(), rows = self.rows.len(), "wrote results table");
        Ok(())
    }
}

fn write_record<W: Write, S: AsRef<str>>(out: &mut W, fields: &[S]) -> std::io::Result<()> {
    let line: Vec<String> = fields.iter().map(|f| quote(f.as_ref())).collect();
    writeln!(out, "{}", line.join(","))
}

/// Quote a field when it holds a comma, quote or line break; embedded
/// quotes are doubled.
fn quote(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
