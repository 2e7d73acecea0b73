//! Flat series assembly for line and scatter charts.

use serde::Serialize;

use crate::error::{DashError, DashResult};
use crate::facets::distinct_sites;
use crate::project::project;
use crate::select::select_plot_ids;
use crate::table::Table;

/// One charted observation. `value` is always a concrete number; rows with
/// a missing or non-numeric cell for the requested variable are excluded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesRecord {
    pub site: String,
    pub system: String,
    pub phase: String,
    pub plot: String,
    pub value: f64,
}

/// Assemble a single-variable series across one or more sites.
///
/// An empty `sites` list means every site in the table. Each site is
/// processed independently: a site with no matching plots, no matching
/// rows, or an unknown variable contributes nothing, and the remaining
/// sites are unaffected. A phase scope without a system scope is a request
/// error and fails before any site is processed.
///
/// Output order is site processing order, then source row order within a
/// site.
pub fn build_series(
    table: &Table,
    variable: &str,
    sites: &[String],
    system: Option<&str>,
    phase: Option<&str>,
) -> DashResult<Vec<SeriesRecord>> {
    if phase.is_some() && system.is_none() {
        return Err(DashError::InvalidScope {
            what: "a phase scope requires a system",
        });
    }

    let site_list: Vec<String> = if sites.is_empty() {
        distinct_sites(table)
    } else {
        sites.to_vec()
    };

    let mut out = Vec::new();
    for site in &site_list {
        let plot_ids = select_plot_ids(table, Some(site), system, phase)?;
        if plot_ids.is_empty() {
            continue;
        }
        let projected = match project(table, &plot_ids, variable) {
            Ok(rows) => rows,
            // this site contributes nothing; the request carries on
            Err(DashError::NoMatchingData) | Err(DashError::UnknownVariable { .. }) => continue,
            Err(err) => return Err(err),
        };
        for (plot, value) in projected {
            let Some(v) = value.as_num() else {
                continue;
            };
            out.push(SeriesRecord {
                site: plot.site().to_string(),
                system: plot.system().to_string(),
                phase: plot.phase().to_string(),
                plot: plot.as_str().to_string(),
                value: v,
            });
        }
    }
    Ok(out)
}
