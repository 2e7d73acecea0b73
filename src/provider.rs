//! Table providers: where request handlers get their table snapshot.
//!
//! The core computes pure functions over an immutable snapshot; the
//! provider owns the load and cache policy. Handlers take one snapshot per
//! request, so a reload mid-request can never tear a computation.

use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use serde_json::json;

use crate::error::DashResult;
use crate::logging::{self, obj, v_str, Domain, Level};
use crate::table::{load_csv, Table};

pub trait TableProvider: Send + Sync {
    fn snapshot(&self) -> DashResult<Arc<Table>>;
}

/// Loads a CSV file and caches the parsed table. A TTL of zero means load
/// once and keep the snapshot for the life of the process.
pub struct CsvTableProvider {
    path: PathBuf,
    ttl: Duration,
    cache: RwLock<Option<CachedTable>>,
}

struct CachedTable {
    loaded_at: Instant,
    table: Arc<Table>,
}

impl CsvTableProvider {
    pub fn new(path: impl Into<PathBuf>, ttl_secs: u64) -> Self {
        Self {
            path: path.into(),
            ttl: Duration::from_secs(ttl_secs),
            cache: RwLock::new(None),
        }
    }

    fn fresh(&self, cached: &CachedTable) -> bool {
        self.ttl.is_zero() || cached.loaded_at.elapsed() < self.ttl
    }

    fn load(&self) -> DashResult<Arc<Table>> {
        let (table, manifest, report) = load_csv(&self.path)?;
        logging::log_table_load(
            &manifest.path,
            &manifest.hash_sha256,
            manifest.row_count,
            manifest.bad_rows,
        );
        if !report.ok {
            logging::log(
                Level::Warn,
                Domain::Data,
                "bad_rows",
                obj(&[
                    ("path", v_str(&manifest.path)),
                    ("bad_rows", json!(report.bad_rows)),
                    ("warnings", json!(report.warnings)),
                ]),
            );
        }
        Ok(Arc::new(table))
    }
}

impl TableProvider for CsvTableProvider {
    fn snapshot(&self) -> DashResult<Arc<Table>> {
        if let Ok(guard) = self.cache.read() {
            if let Some(cached) = guard.as_ref() {
                if self.fresh(cached) {
                    return Ok(cached.table.clone());
                }
            }
        }

        let mut guard = match self.cache.write() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        // another request may have reloaded while we waited for the lock
        if let Some(cached) = guard.as_ref() {
            if self.fresh(cached) {
                return Ok(cached.table.clone());
            }
        }
        let table = self.load()?;
        *guard = Some(CachedTable {
            loaded_at: Instant::now(),
            table: table.clone(),
        });
        Ok(table)
    }
}

/// A fixed in-memory table. Used by tests and demos.
pub struct StaticTableProvider {
    table: Arc<Table>,
}

impl StaticTableProvider {
    pub fn new(table: Table) -> Self {
        Self {
            table: Arc::new(table),
        }
    }
}

impl TableProvider for StaticTableProvider {
    fn snapshot(&self) -> DashResult<Arc<Table>> {
        Ok(self.table.clone())
    }
}
