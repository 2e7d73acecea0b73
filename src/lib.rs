//! Field-trial dashboard core: plot-identifier parsing, cascading facet
//! filters, and the series/group assemblers that shape chart payloads,
//! plus the CSV loader, table provider, and commodity price samplers.

pub mod config;
pub mod error;
pub mod facets;
pub mod groups;
pub mod logging;
pub mod plot;
pub mod prices;
pub mod project;
pub mod provider;
pub mod select;
pub mod series;
pub mod server;
pub mod table;
