//! In-memory source table and the CSV loader that fills it.
//!
//! The loader is strict about plot identifiers: a row whose identifier does
//! not parse is rejected, counted in `bad_rows`, and reported with its line
//! number in the quality report. Everything that loads is well formed, so
//! the filter core never sees a short identifier.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::{DashError, DashResult};
use crate::plot::PlotId;

/// Column that holds the structured identifier.
pub const PLOT_COLUMN: &str = "plot";

/// A single typed cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Num(f64),
    Text(String),
    Missing,
}

impl Value {
    /// Type a raw CSV cell. Empty cells and the markers `NA`/`NaN` are
    /// missing; finite numbers are numeric; anything else is text.
    pub fn parse_cell(cell: &str) -> Value {
        let t = cell.trim();
        if t.is_empty() || t.eq_ignore_ascii_case("na") || t.eq_ignore_ascii_case("nan") {
            return Value::Missing;
        }
        match t.parse::<f64>() {
            Ok(n) if n.is_finite() => Value::Num(n),
            Ok(_) => Value::Missing,
            Err(_) => Value::Text(t.to_string()),
        }
    }

    pub fn as_num(&self) -> Option<f64> {
        match self {
            Value::Num(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }
}

/// One accepted row: the parsed identifier plus cells parallel to the
/// table's columns (`push` enforces the width).
#[derive(Debug, Clone)]
pub struct Row {
    pub plot: PlotId,
    pub cells: Vec<Value>,
}

#[derive(Debug, Clone)]
pub struct Table {
    columns: Vec<String>,
    plot_col: usize,
    rows: Vec<Row>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> DashResult<Self> {
        let plot_col = columns
            .iter()
            .position(|c| c == PLOT_COLUMN)
            .ok_or(DashError::MissingColumn { name: PLOT_COLUMN })?;
        Ok(Self {
            columns,
            plot_col,
            rows: Vec::new(),
        })
    }

    /// Append one raw record. Fails on width mismatch or a malformed
    /// identifier without modifying the table.
    pub fn push(&mut self, cells: &[&str]) -> DashResult<()> {
        if cells.len() != self.columns.len() {
            return Err(DashError::RaggedRow {
                expected: self.columns.len(),
                got: cells.len(),
            });
        }
        let plot = PlotId::parse(cells[self.plot_col])?;
        let cells = cells.iter().map(|c| Value::parse_cell(c)).collect();
        self.rows.push(Row { plot, cells });
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableManifest {
    pub path: String,
    pub hash_sha256: String,
    pub row_count: u64,
    pub bad_rows: u64,
    pub columns: Vec<String>,
    pub warnings: Vec<String>,
    pub generated_at_epoch: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableQualityReport {
    pub rows: u64,
    pub bad_rows: u64,
    pub ok: bool,
    pub warnings: Vec<String>,
}

/// Load a CSV table, hashing the file and collecting a quality report.
/// Per-row faults never fail the load; they are counted and reported.
/// A header without a `plot` column is a load error.
pub fn load_csv(path: &Path) -> DashResult<(Table, TableManifest, TableQualityReport)> {
    let display = path.display().to_string();
    let hash = file_sha256(path)?;
    let file = File::open(path).map_err(|e| DashError::Io {
        path: display.clone(),
        source: e,
    })?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);
    let headers: Vec<String> = rdr
        .headers()
        .map_err(|e| DashError::Csv {
            path: display.clone(),
            source: e,
        })?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut table = Table::new(headers.clone())?;
    let mut bad_rows = 0u64;
    let mut warnings = Vec::new();
    for (idx, record) in rdr.records().enumerate() {
        // header occupies line 1
        let line = idx + 2;
        match record {
            Ok(rec) => {
                let cells: Vec<&str> = rec.iter().collect();
                if let Err(err) = table.push(&cells) {
                    bad_rows += 1;
                    warnings.push(format!("line {}: {}", line, err));
                }
            }
            Err(err) => {
                bad_rows += 1;
                warnings.push(format!("line {}: {}", line, err));
            }
        }
    }

    let row_count = table.row_count() as u64;
    let manifest = TableManifest {
        path: display,
        hash_sha256: hash,
        row_count,
        bad_rows,
        columns: headers,
        warnings: warnings.clone(),
        generated_at_epoch: chrono::Utc::now().timestamp() as u64,
    };
    let report = TableQualityReport {
        rows: row_count,
        bad_rows,
        ok: bad_rows == 0,
        warnings,
    };
    Ok((table, manifest, report))
}

pub fn file_sha256(path: &Path) -> DashResult<String> {
    let wrap = |e| DashError::Io {
        path: path.display().to_string(),
        source: e,
    };
    let mut file = File::open(path).map_err(wrap)?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf).map_err(wrap)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

pub fn default_manifest_path(table_path: &Path) -> PathBuf {
    let mut p = table_path.to_path_buf();
    let fname = table_path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("trials.csv");
    p.set_file_name(format!("{}.manifest.json", fname));
    p
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trial_table() -> Table {
        let mut t = Table::new(vec![
            "plot".to_string(),
            "yield".to_string(),
            "protein".to_string(),
        ])
        .unwrap();
        t.push(&["HART_S1_P1_R1", "3.2", "11.5"]).unwrap();
        t.push(&["HART_S2_P1_R1", "2.9", "NA"]).unwrap();
        t
    }

    // ===== cell typing =====

    #[test]
    fn test_cell_numeric() {
        assert_eq!(Value::parse_cell("3.25"), Value::Num(3.25));
        assert_eq!(Value::parse_cell(" -1e3 "), Value::Num(-1000.0));
    }

    #[test]
    fn test_cell_missing_markers() {
        assert!(Value::parse_cell("").is_missing());
        assert!(Value::parse_cell("NA").is_missing());
        assert!(Value::parse_cell("na").is_missing());
        assert!(Value::parse_cell("NaN").is_missing());
        assert!(Value::parse_cell("inf").is_missing());
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(
            Value::parse_cell("wheat"),
            Value::Text("wheat".to_string())
        );
    }

    // ===== table construction =====

    #[test]
    fn test_new_requires_plot_column() {
        let err = Table::new(vec!["yield".to_string()]).unwrap_err();
        assert!(matches!(err, DashError::MissingColumn { .. }));
    }

    #[test]
    fn test_push_and_lookup() {
        let t = trial_table();
        assert_eq!(t.row_count(), 2);
        assert_eq!(t.column_index("protein"), Some(2));
        assert_eq!(t.column_index("moisture"), None);
        assert_eq!(t.rows()[0].plot.site(), "HART");
        assert!(t.rows()[1].cells[2].is_missing());
    }

    #[test]
    fn test_push_rejects_malformed_identifier() {
        let mut t = trial_table();
        let err = t.push(&["HART_S1", "1.0", "2.0"]).unwrap_err();
        assert!(matches!(err, DashError::MalformedIdentifier { .. }));
        assert_eq!(t.row_count(), 2);
    }

    #[test]
    fn test_push_rejects_ragged_row() {
        let mut t = trial_table();
        let err = t.push(&["HART_S1_P1_R2", "1.0"]).unwrap_err();
        assert!(matches!(
            err,
            DashError::RaggedRow {
                expected: 3,
                got: 2
            }
        ));
    }

    #[test]
    fn test_manifest_path() {
        let p = default_manifest_path(Path::new("data/trials.csv"));
        assert_eq!(p, PathBuf::from("data/trials.csv.manifest.json"));
    }
}
