use std::sync::Arc;

use anyhow::Result;
use serde_json::json;

use trialdash::config::Config;
use trialdash::logging::{log, obj, v_str, Domain, Level};
use trialdash::provider::{CsvTableProvider, TableProvider};
use trialdash::server::{run_server, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::from_env();
    log(
        Level::Info,
        Domain::Server,
        "startup",
        obj(&[
            ("data_path", v_str(&cfg.data_path)),
            ("table_ttl_secs", json!(cfg.table_ttl_secs)),
            ("static_dir", json!(cfg.static_dir)),
        ]),
    );

    let provider = CsvTableProvider::new(&cfg.data_path, cfg.table_ttl_secs);
    // load eagerly so a bad data path fails at startup, not on first request
    let table = provider.snapshot()?;
    log(
        Level::Info,
        Domain::Server,
        "table_ready",
        obj(&[("rows", json!(table.row_count()))]),
    );
    drop(table);

    let state = AppState {
        provider: Arc::new(provider),
    };
    run_server(&cfg, state).await
}
