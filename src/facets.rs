//! Distinct facet values for the cascading dropdowns.
//!
//! Site/system/phase lists are sorted ascending so dropdown ordering is
//! stable across requests. Variables keep the table's native column order.

use std::collections::BTreeSet;

use crate::error::{DashError, DashResult};
use crate::table::{Table, PLOT_COLUMN};

pub fn distinct_sites(table: &Table) -> Vec<String> {
    let set: BTreeSet<&str> = table.rows().iter().map(|r| r.plot.site()).collect();
    set.into_iter().map(String::from).collect()
}

/// Distinct systems, optionally scoped to one site.
pub fn distinct_systems(table: &Table, site: Option<&str>) -> Vec<String> {
    let set: BTreeSet<&str> = table
        .rows()
        .iter()
        .filter(|r| site.map_or(true, |s| r.plot.site() == s))
        .map(|r| r.plot.system())
        .collect();
    set.into_iter().map(String::from).collect()
}

/// Distinct phases, progressively scoped. A system scope without a site
/// scope is rejected.
pub fn distinct_phases(
    table: &Table,
    site: Option<&str>,
    system: Option<&str>,
) -> DashResult<Vec<String>> {
    if system.is_some() && site.is_none() {
        return Err(DashError::InvalidScope {
            what: "a system scope requires a site",
        });
    }
    let set: BTreeSet<&str> = table
        .rows()
        .iter()
        .filter(|r| site.map_or(true, |s| r.plot.site() == s))
        .filter(|r| system.map_or(true, |y| r.plot.system() == y))
        .map(|r| r.plot.phase())
        .collect();
    Ok(set.into_iter().map(String::from).collect())
}

/// Every column except the identifier column, in header order.
pub fn distinct_variables(table: &Table) -> Vec<String> {
    table
        .columns()
        .iter()
        .filter(|c| c.as_str() != PLOT_COLUMN)
        .cloned()
        .collect()
}
