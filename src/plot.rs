use std::fmt;

use crate::error::{DashError, DashResult};

/// Number of underscore-separated tokens in a well-formed identifier.
pub const TOKEN_COUNT: usize = 4;

/// A parsed plot identifier: `site_system_phase_replicate`.
///
/// Example: `STREATHAM_S11_P0000_R7` — the STREATHAM field site, system
/// treatment S11, crop-phase ordering P0000, replicate R7. The constructor
/// rejects anything that does not split into exactly four non-empty tokens,
/// so downstream code can read any facet without bounds checks.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlotId {
    raw: String,
    site: String,
    system: String,
    phase: String,
    replicate: String,
}

impl PlotId {
    pub fn parse(raw: &str) -> DashResult<Self> {
        let raw = raw.trim();
        let parts: Vec<&str> = raw.split('_').collect();
        if parts.len() != TOKEN_COUNT {
            return Err(DashError::MalformedIdentifier {
                raw: raw.to_string(),
                what: "expected four underscore-separated tokens",
            });
        }
        if parts.iter().any(|p| p.is_empty()) {
            return Err(DashError::MalformedIdentifier {
                raw: raw.to_string(),
                what: "empty token",
            });
        }
        Ok(Self {
            raw: raw.to_string(),
            site: parts[0].to_string(),
            system: parts[1].to_string(),
            phase: parts[2].to_string(),
            replicate: parts[3].to_string(),
        })
    }

    pub fn site(&self) -> &str {
        &self.site
    }

    pub fn system(&self) -> &str {
        &self.system
    }

    pub fn phase(&self) -> &str {
        &self.phase
    }

    pub fn replicate(&self) -> &str {
        &self.replicate
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for PlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
