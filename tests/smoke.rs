//! Smoke tests: end-to-end walk from a CSV on disk to the JSON payload
//! shapes the dashboard consumes. Each stage exercises one layer on top of
//! the ones below it.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;

use trialdash::facets::{distinct_phases, distinct_sites, distinct_systems, distinct_variables};
use trialdash::groups::{build_groups, ComparisonType};
use trialdash::plot::PlotId;
use trialdash::project::project;
use trialdash::provider::{CsvTableProvider, StaticTableProvider, TableProvider};
use trialdash::select::select_plot_ids;
use trialdash::series::build_series;
use trialdash::server::{router, AppState};
use trialdash::table::{load_csv, Table};

const TRIAL_CSV: &str = "\
plot,yield,protein,moisture
HART_S1_P1_R1,3.2,11.5,12.0
HART_S1_P1_R2,3.4,11.1,12.3
HART_S1_P2_R1,2.8,NA,11.8
HART_S2_P1_R1,2.9,12.1,12.5
BROOKSTEAD_S1_P1_R1,2.1,9.8,13.0
BROOKSTEAD_S3_P4_R2,2.4,10.2,NA
";

fn write_trials(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("trials.csv");
    fs::write(&path, TRIAL_CSV).unwrap();
    path
}

fn strs(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// ---------------------------------------------------------------------------
// S01: the CSV loads cleanly and every row is well formed
// ---------------------------------------------------------------------------
#[test]
fn s01_load_clean_csv() {
    let dir = TempDir::new().unwrap();
    let (table, manifest, report) = load_csv(&write_trials(&dir)).unwrap();
    assert_eq!(table.row_count(), 6);
    assert!(report.ok);
    assert_eq!(manifest.bad_rows, 0);
    assert_eq!(manifest.columns, strs(&["plot", "yield", "protein", "moisture"]));
    assert_eq!(manifest.hash_sha256.len(), 64);
}

// ---------------------------------------------------------------------------
// S02: facet cascade populates every dropdown
// ---------------------------------------------------------------------------
#[test]
fn s02_facet_cascade() {
    let dir = TempDir::new().unwrap();
    let (table, _, _) = load_csv(&write_trials(&dir)).unwrap();

    assert_eq!(distinct_sites(&table), strs(&["BROOKSTEAD", "HART"]));
    assert_eq!(distinct_systems(&table, Some("HART")), strs(&["S1", "S2"]));
    assert_eq!(
        distinct_phases(&table, Some("HART"), Some("S1")).unwrap(),
        strs(&["P1", "P2"])
    );
    assert_eq!(
        distinct_variables(&table),
        strs(&["yield", "protein", "moisture"])
    );

    // every facet of every identifier is reachable through the cascade
    for row in table.rows() {
        let id = &row.plot;
        assert!(distinct_sites(&table).contains(&id.site().to_string()));
        assert!(distinct_systems(&table, Some(id.site())).contains(&id.system().to_string()));
        assert!(distinct_phases(&table, Some(id.site()), Some(id.system()))
            .unwrap()
            .contains(&id.phase().to_string()));
    }
}

// ---------------------------------------------------------------------------
// S03: selection and projection feed each other
// ---------------------------------------------------------------------------
#[test]
fn s03_select_then_project() {
    let dir = TempDir::new().unwrap();
    let (table, _, _) = load_csv(&write_trials(&dir)).unwrap();

    let all = select_plot_ids(&table, None, None, None).unwrap();
    assert_eq!(all.len(), 6);

    let ids = select_plot_ids(&table, Some("HART"), Some("S1"), Some("P1")).unwrap();
    assert_eq!(ids.len(), 2);
    let projected = project(&table, &ids, "yield").unwrap();
    assert_eq!(projected.len(), 2);
    assert_eq!(projected[0].1.as_num(), Some(3.2));
    assert_eq!(projected[1].1.as_num(), Some(3.4));
}

// ---------------------------------------------------------------------------
// S04: flat series across all sites
// ---------------------------------------------------------------------------
#[test]
fn s04_series_all_sites() {
    let dir = TempDir::new().unwrap();
    let (table, _, _) = load_csv(&write_trials(&dir)).unwrap();

    let recs = build_series(&table, "yield", &[], None, None).unwrap();
    assert_eq!(recs.len(), 6);
    // sorted site order: BROOKSTEAD first
    assert_eq!(recs[0].site, "BROOKSTEAD");
    assert_eq!(recs[0].value, 2.1);
    assert_eq!(recs[2].site, "HART");

    // protein has one NA row, which never surfaces
    let protein = build_series(&table, "protein", &[], None, None).unwrap();
    assert_eq!(protein.len(), 5);
    assert!(protein.iter().all(|r| r.plot != "HART_S1_P2_R1"));
}

// ---------------------------------------------------------------------------
// S05: grouped comparison for box plots
// ---------------------------------------------------------------------------
#[test]
fn s05_grouped_comparison() {
    let dir = TempDir::new().unwrap();
    let (table, _, _) = load_csv(&write_trials(&dir)).unwrap();

    let out = build_groups(&table, "yield", Some("HART"), &strs(&["S1", "S2"]), &[]).unwrap();
    assert_eq!(out.comparison_type, ComparisonType::Systems);
    assert_eq!(out.groups.get("S1").unwrap().len(), 3);
    assert_eq!(out.groups.get("S2").unwrap().len(), 1);

    let json = serde_json::to_value(&out).unwrap();
    assert_eq!(json["comparisonType"], "systems");
    assert_eq!(json["groups"]["S1"].as_array().unwrap().len(), 3);
    assert_eq!(json["groups"]["S1"][0]["plot"], "HART_S1_P1_R1");
}

// ---------------------------------------------------------------------------
// S06: provider snapshot flows into the router state
// ---------------------------------------------------------------------------
#[test]
fn s06_provider_and_router() {
    let dir = TempDir::new().unwrap();
    let provider = CsvTableProvider::new(write_trials(&dir), 0);
    let snapshot = provider.snapshot().unwrap();
    assert_eq!(snapshot.row_count(), 6);

    let state = AppState {
        provider: Arc::new(provider),
    };
    let _app = router(state, None);
}

// ---------------------------------------------------------------------------
// S07: partial failure never crosses site boundaries
// ---------------------------------------------------------------------------
#[test]
fn s07_partial_failure_isolated() {
    let dir = TempDir::new().unwrap();
    let (table, _, _) = load_csv(&write_trials(&dir)).unwrap();

    // S2 exists only at HART: BROOKSTEAD contributes nothing, no error
    let sites = strs(&["BROOKSTEAD", "HART"]);
    let recs = build_series(&table, "yield", &sites, Some("S2"), None).unwrap();
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].plot, "HART_S2_P1_R1");
}

// ---------------------------------------------------------------------------
// S08: the same walk works off an in-memory table, no disk involved
// ---------------------------------------------------------------------------
#[test]
fn s08_static_table_walk() {
    let mut t = Table::new(strs(&["plot", "yield"])).unwrap();
    for (id, y) in [("A_S1_P1_R1", "10"), ("A_S1_P2_R1", "20"), ("A_S2_P1_R1", "15")] {
        t.push(&[id, y]).unwrap();
    }
    let provider = StaticTableProvider::new(t);
    let table = provider.snapshot().unwrap();

    let out = build_groups(&table, "yield", Some("A"), &strs(&["S1", "S2"]), &[]).unwrap();
    let s1: Vec<f64> = out.groups.get("S1").unwrap().iter().map(|e| e.value).collect();
    assert_eq!(s1, vec![10.0, 20.0]);
    assert_eq!(out.groups.get("S2").unwrap()[0].value, 15.0);

    // identifiers round-trip through the parsed type
    let id = PlotId::parse("A_S1_P1_R1").unwrap();
    assert_eq!(id.to_string(), "A_S1_P1_R1");
}
