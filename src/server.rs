//! HTTP surface: JSON endpoints for the dashboard plus an embedded shell
//! page. Handlers are thin; all filtering rules live in the core modules.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::services::ServeDir;

use crate::config::Config;
use crate::error::DashError;
use crate::facets::{distinct_phases, distinct_sites, distinct_systems, distinct_variables};
use crate::groups::{build_groups, GroupedComparison};
use crate::logging::{self, obj, v_str, Domain, Level};
use crate::provider::TableProvider;
use crate::series::build_series;

#[derive(Debug)]
struct ServerError {
    status: StatusCode,
    message: String,
}

impl ServerError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<DashError> for ServerError {
    fn from(err: DashError) -> Self {
        let status = match &err {
            DashError::InvalidScope { .. }
            | DashError::MissingSite
            | DashError::InsufficientComparisonItems
            | DashError::MalformedIdentifier { .. }
            | DashError::RaggedRow { .. } => StatusCode::BAD_REQUEST,
            DashError::NoMatchingData | DashError::UnknownVariable { .. } => StatusCode::NOT_FOUND,
            DashError::MissingColumn { .. } | DashError::Io { .. } | DashError::Csv { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        logging::log_query_error(self.status.as_u16(), &self.message);
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn TableProvider>,
}

#[derive(Deserialize)]
struct SystemsParams {
    site: Option<String>,
}

#[derive(Deserialize)]
struct PhasesParams {
    site: Option<String>,
    system: Option<String>,
}

#[derive(Deserialize)]
struct SeriesParams {
    variable: Option<String>,
    sites: Option<String>,
    system: Option<String>,
    phase: Option<String>,
}

#[derive(Deserialize)]
struct GroupsParams {
    variable: Option<String>,
    site: Option<String>,
    systems: Option<String>,
    phases: Option<String>,
}

/// Comma-separated list → trimmed, non-empty, first-seen distinct items.
fn parse_list(raw: Option<&str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    if let Some(raw) = raw {
        for item in raw.split(',') {
            let item = item.trim();
            if item.is_empty() || out.iter().any(|x| x == item) {
                continue;
            }
            out.push(item.to_string());
        }
    }
    out
}

fn non_empty(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

async fn health(State(state): State<AppState>) -> Result<Json<Value>, ServerError> {
    let table = state.provider.snapshot()?;
    Ok(Json(json!({ "status": "ok", "rows": table.row_count() })))
}

async fn sites(State(state): State<AppState>) -> Result<Json<Value>, ServerError> {
    let table = state.provider.snapshot()?;
    let sites = distinct_sites(&table);
    logging::log_query("/api/sites", &[], sites.len());
    Ok(Json(json!({ "sites": sites })))
}

async fn systems(
    State(state): State<AppState>,
    Query(params): Query<SystemsParams>,
) -> Result<Json<Value>, ServerError> {
    let site = non_empty(params.site).ok_or_else(|| ServerError::bad_request("site is required"))?;
    let table = state.provider.snapshot()?;
    let systems = distinct_systems(&table, Some(&site));
    logging::log_query("/api/systems", &[("site", v_str(&site))], systems.len());
    Ok(Json(json!({ "systems": systems })))
}

async fn phases(
    State(state): State<AppState>,
    Query(params): Query<PhasesParams>,
) -> Result<Json<Value>, ServerError> {
    let site = non_empty(params.site).ok_or_else(|| ServerError::bad_request("site is required"))?;
    let system =
        non_empty(params.system).ok_or_else(|| ServerError::bad_request("system is required"))?;
    let table = state.provider.snapshot()?;
    let phases = distinct_phases(&table, Some(&site), Some(&system))?;
    logging::log_query(
        "/api/phases",
        &[("site", v_str(&site)), ("system", v_str(&system))],
        phases.len(),
    );
    Ok(Json(json!({ "phases": phases })))
}

async fn variables(State(state): State<AppState>) -> Result<Json<Value>, ServerError> {
    let table = state.provider.snapshot()?;
    let variables = distinct_variables(&table);
    logging::log_query("/api/variables", &[], variables.len());
    Ok(Json(json!({ "variables": variables })))
}

async fn plot_data(
    State(state): State<AppState>,
    Query(params): Query<SeriesParams>,
) -> Result<Json<Value>, ServerError> {
    let variable =
        non_empty(params.variable).ok_or_else(|| ServerError::bad_request("variable is required"))?;
    let sites = parse_list(params.sites.as_deref());
    let system = non_empty(params.system);
    let phase = non_empty(params.phase);
    let table = state.provider.snapshot()?;
    let records = build_series(
        &table,
        &variable,
        &sites,
        system.as_deref(),
        phase.as_deref(),
    )?;
    logging::log_query(
        "/api/plot-data",
        &[
            ("variable", v_str(&variable)),
            ("sites", json!(sites)),
        ],
        records.len(),
    );
    Ok(Json(json!({ "data": records })))
}

async fn plot_data_grouped(
    State(state): State<AppState>,
    Query(params): Query<GroupsParams>,
) -> Result<Json<GroupedComparison>, ServerError> {
    let variable =
        non_empty(params.variable).ok_or_else(|| ServerError::bad_request("variable is required"))?;
    let site = non_empty(params.site);
    let systems = parse_list(params.systems.as_deref());
    let phases = parse_list(params.phases.as_deref());
    let table = state.provider.snapshot()?;
    let result = build_groups(&table, &variable, site.as_deref(), &systems, &phases)?;
    logging::log_query(
        "/api/plot-data-grouped",
        &[
            ("variable", v_str(&variable)),
            ("site", json!(site)),
            ("systems", json!(systems)),
            ("phases", json!(phases)),
        ],
        result.groups.len(),
    );
    Ok(Json(result))
}

async fn dashboard() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}

pub fn router(state: AppState, static_dir: Option<&str>) -> Router {
    let mut app = Router::new()
        .route("/", get(dashboard))
        .route("/api/health", get(health))
        .route("/api/sites", get(sites))
        .route("/api/systems", get(systems))
        .route("/api/phases", get(phases))
        .route("/api/variables", get(variables))
        .route("/api/plot-data", get(plot_data))
        .route("/api/plot-data-grouped", get(plot_data_grouped))
        .with_state(state);
    if let Some(dir) = static_dir {
        app = app.nest_service("/static", ServeDir::new(dir));
    }
    app
}

pub async fn run_server(config: &Config, state: AppState) -> anyhow::Result<()> {
    let app = router(state, config.static_dir.as_deref());
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    logging::log(
        Level::Info,
        Domain::Server,
        "listening",
        obj(&[("addr", v_str(&addr))]),
    );
    axum::serve(listener, app).await?;
    Ok(())
}

const DASHBOARD_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Field Trial Dashboard</title>
<style>
  body { font-family: -apple-system, BlinkMacSystemFont, sans-serif; margin: 2rem; background: #fafafa; color: #222; }
  h1 { font-size: 1.3rem; }
  .controls { display: flex; gap: 1rem; flex-wrap: wrap; margin-bottom: 1rem; align-items: flex-end; }
  label { display: block; font-size: 0.75rem; text-transform: uppercase; color: #666; margin-bottom: 0.25rem; }
  select, button { padding: 0.4rem; font-size: 0.9rem; }
  table { border-collapse: collapse; margin-top: 1rem; }
  th, td { border: 1px solid #ddd; padding: 0.3rem 0.6rem; font-size: 0.85rem; }
  th { background: #f0f0f0; text-align: left; }
  pre { background: #1a1a1a; color: #9fdf9f; padding: 1rem; overflow-x: auto; font-size: 0.8rem; }
</style>
</head>
<body>
<h1>Field Trial Dashboard</h1>
<div class="controls">
  <div><label for="site">Site</label><select id="site"><option value="">All</option></select></div>
  <div><label for="system">System</label><select id="system"><option value="">All</option></select></div>
  <div><label for="phase">Phase</label><select id="phase"><option value="">All</option></select></div>
  <div><label for="variable">Variable</label><select id="variable"></select></div>
  <div><button id="load">Load series</button></div>
</div>
<table id="results">
  <thead><tr><th>Plot</th><th>Site</th><th>System</th><th>Phase</th><th>Value</th></tr></thead>
  <tbody></tbody>
</table>
<pre id="raw"></pre>
<script>
const siteSel = document.getElementById('site');
const systemSel = document.getElementById('system');
const phaseSel = document.getElementById('phase');
const variableSel = document.getElementById('variable');

async function getJson(url) {
  const resp = await fetch(url);
  return resp.json();
}

function fill(select, items, withAll) {
  select.innerHTML = withAll ? '<option value="">All</option>' : '';
  for (const item of items) {
    const opt = document.createElement('option');
    opt.value = item;
    opt.textContent = item;
    select.appendChild(opt);
  }
}

async function init() {
  const sites = await getJson('/api/sites');
  fill(siteSel, sites.sites, true);
  const vars = await getJson('/api/variables');
  fill(variableSel, vars.variables, false);
}

siteSel.addEventListener('change', async () => {
  fill(systemSel, [], true);
  fill(phaseSel, [], true);
  if (!siteSel.value) return;
  const systems = await getJson('/api/systems?site=' + encodeURIComponent(siteSel.value));
  fill(systemSel, systems.systems, true);
});

systemSel.addEventListener('change', async () => {
  fill(phaseSel, [], true);
  if (!siteSel.value || !systemSel.value) return;
  const phases = await getJson('/api/phases?site=' + encodeURIComponent(siteSel.value)
    + '&system=' + encodeURIComponent(systemSel.value));
  fill(phaseSel, phases.phases, true);
});

document.getElementById('load').addEventListener('click', async () => {
  const params = new URLSearchParams();
  params.set('variable', variableSel.value);
  if (siteSel.value) params.set('sites', siteSel.value);
  if (systemSel.value) params.set('system', systemSel.value);
  if (phaseSel.value) params.set('phase', phaseSel.value);
  const payload = await getJson('/api/plot-data?' + params.toString());
  const tbody = document.querySelector('#results tbody');
  tbody.innerHTML = '';
  for (const rec of payload.data || []) {
    const tr = document.createElement('tr');
    for (const field of [rec.plot, rec.site, rec.system, rec.phase, rec.value]) {
      const td = document.createElement('td');
      td.textContent = field;
      tr.appendChild(td);
    }
    tbody.appendChild(tr);
  }
  document.getElementById('raw').textContent = JSON.stringify(payload, null, 2);
});

init();
</script>
</body>
</html>
"#;
