//! Analyze a trial CSV and write its manifest next to it.
//!
//! Usage: `table_report [path]` (default `data/trials.csv`). Writes
//! `<path>.manifest.json` with the manifest and quality report, prints a
//! summary, and exits nonzero when the load fails or the data is dirty.

use std::env;
use std::fs;
use std::path::PathBuf;

use serde_json::json;

use trialdash::table::{default_manifest_path, load_csv};

fn main() {
    let path = PathBuf::from(
        env::args()
            .nth(1)
            .unwrap_or_else(|| "data/trials.csv".to_string()),
    );

    let (table, manifest, report) = match load_csv(&path) {
        Ok(out) => out,
        Err(err) => {
            eprintln!("load failed: {}", err);
            std::process::exit(1);
        }
    };

    let out_path = default_manifest_path(&path);
    let payload = json!({
        "manifest": manifest,
        "report": report,
    });
    let body = serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string());
    if let Err(err) = fs::write(&out_path, body) {
        eprintln!("failed to write {}: {}", out_path.display(), err);
        std::process::exit(2);
    }

    println!(
        "{}: {} rows, {} columns, {} bad rows -> {}",
        path.display(),
        table.row_count(),
        table.columns().len(),
        report.bad_rows,
        out_path.display()
    );
    for warning in &report.warnings {
        eprintln!("  {}", warning);
    }
    if !report.ok {
        std::process::exit(3);
    }
}
