//! Plot selection under the hierarchical constraint rule.

use std::collections::HashSet;

use crate::error::{DashError, DashResult};
use crate::plot::PlotId;
use crate::table::Table;

/// Distinct plot identifiers matching the given facet scope, in first-seen
/// source order.
///
/// The hierarchy is enforced before any filtering: a system or phase may
/// only be given when every coarser facet is also given.
pub fn select_plot_ids(
    table: &Table,
    site: Option<&str>,
    system: Option<&str>,
    phase: Option<&str>,
) -> DashResult<Vec<PlotId>> {
    if (system.is_some() || phase.is_some()) && site.is_none() {
        return Err(DashError::InvalidScope {
            what: "a system or phase scope requires a site",
        });
    }
    if phase.is_some() && system.is_none() {
        return Err(DashError::InvalidScope {
            what: "a phase scope requires a system",
        });
    }

    let mut seen: HashSet<&str> = HashSet::new();
    let mut out = Vec::new();
    for row in table.rows() {
        let id = &row.plot;
        if let Some(s) = site {
            if id.site() != s {
                continue;
            }
        }
        if let Some(y) = system {
            if id.system() != y {
                continue;
            }
        }
        if let Some(p) = phase {
            if id.phase() != p {
                continue;
            }
        }
        if seen.insert(id.as_str()) {
            out.push(id.clone());
        }
    }
    Ok(out)
}
