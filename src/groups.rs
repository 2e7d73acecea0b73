//! Grouped value collections for box-plot comparisons.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::error::{DashError, DashResult};
use crate::facets::distinct_systems;
use crate::project::project;
use crate::select::select_plot_ids;
use crate::table::Table;

/// Which facet the groups compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonType {
    Systems,
    Phases,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupEntry {
    pub plot: String,
    pub value: f64,
}

/// Group collections keyed by system, phase, or `"{system}_{phase}"`,
/// kept in construction order and serialized as a JSON object in that
/// order.
#[derive(Debug, Clone, Default)]
pub struct Groups(Vec<(String, Vec<GroupEntry>)>);

impl Groups {
    fn insert(&mut self, key: String, entries: Vec<GroupEntry>) {
        if let Some(slot) = self.0.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = entries;
        } else {
            self.0.push((key, entries));
        }
    }

    pub fn get(&self, key: &str) -> Option<&[GroupEntry]> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_slice())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Groups {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, entries) in &self.0 {
            map.serialize_entry(key, entries)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupedComparison {
    pub groups: Groups,
    #[serde(rename = "comparisonType")]
    pub comparison_type: ComparisonType,
}

/// Assemble box-plot groups for one site.
///
/// A site is mandatory. At least two systems or two phases must be given;
/// systems take precedence when both qualify. Group keys follow the
/// comparison shape:
/// - systems alone: one group per system;
/// - systems with phases: one group per pair, keyed `"{system}_{phase}"`
///   when more than one phase is given, else by system;
/// - phases with a system: one group per pair, keyed `"{system}_{phase}"`
///   when more than one system is given, else by phase;
/// - phases alone: one group per phase, pooling every system present at
///   the site.
///
/// A key whose scope matches no plots is omitted, as is a key whose
/// projection fails; one empty comparison cell never aborts the request.
pub fn build_groups(
    table: &Table,
    variable: &str,
    site: Option<&str>,
    systems: &[String],
    phases: &[String],
) -> DashResult<GroupedComparison> {
    let site = site.ok_or(DashError::MissingSite)?;

    let comparison_type = if systems.len() >= 2 {
        ComparisonType::Systems
    } else if phases.len() >= 2 {
        ComparisonType::Phases
    } else {
        return Err(DashError::InsufficientComparisonItems);
    };

    let mut groups = Groups::default();
    match comparison_type {
        ComparisonType::Systems => {
            if phases.is_empty() {
                for system in systems {
                    if let Some(entries) = collect_entries(table, variable, site, system, None)? {
                        groups.insert(system.clone(), entries);
                    }
                }
            } else {
                for system in systems {
                    for phase in phases {
                        let key = if phases.len() > 1 {
                            format!("{}_{}", system, phase)
                        } else {
                            system.clone()
                        };
                        if let Some(entries) =
                            collect_entries(table, variable, site, system, Some(phase))?
                        {
                            groups.insert(key, entries);
                        }
                    }
                }
            }
        }
        ComparisonType::Phases => {
            if systems.is_empty() {
                let site_systems = distinct_systems(table, Some(site));
                for phase in phases {
                    let mut pooled = Vec::new();
                    let mut matched = false;
                    for system in &site_systems {
                        if let Some(mut entries) =
                            collect_entries(table, variable, site, system, Some(phase))?
                        {
                            matched = true;
                            pooled.append(&mut entries);
                        }
                    }
                    if matched {
                        groups.insert(phase.clone(), pooled);
                    }
                }
            } else {
                for phase in phases {
                    for system in systems {
                        let key = if systems.len() > 1 {
                            format!("{}_{}", system, phase)
                        } else {
                            phase.clone()
                        };
                        if let Some(entries) =
                            collect_entries(table, variable, site, system, Some(phase))?
                        {
                            groups.insert(key, entries);
                        }
                    }
                }
            }
        }
    }

    Ok(GroupedComparison {
        groups,
        comparison_type,
    })
}

/// One comparison cell. `None` means the cell has no data: no plots match
/// the scope, or the projection failed for this key.
fn collect_entries(
    table: &Table,
    variable: &str,
    site: &str,
    system: &str,
    phase: Option<&str>,
) -> DashResult<Option<Vec<GroupEntry>>> {
    let plot_ids = select_plot_ids(table, Some(site), Some(system), phase)?;
    if plot_ids.is_empty() {
        return Ok(None);
    }
    let projected = match project(table, &plot_ids, variable) {
        Ok(rows) => rows,
        Err(DashError::NoMatchingData) | Err(DashError::UnknownVariable { .. }) => return Ok(None),
        Err(err) => return Err(err),
    };
    let entries = projected
        .into_iter()
        .filter_map(|(plot, value)| {
            value.as_num().map(|v| GroupEntry {
                plot: plot.as_str().to_string(),
                value: v,
            })
        })
        .collect();
    Ok(Some(entries))
}
