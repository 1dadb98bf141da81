//! REST API endpoint handlers.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Minimal HTML status page |
//! | `GET` | `/api/state` | Full world snapshot |
//! | `POST` | `/api/report` | Submit a citizen hotspot report |
//! | `GET` | `/api/nearest-bin` | Nearest bin with room (`?lat=&lng=`) |

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse};
use chrono::Utc;
use cleantrack_core::query::Report;
use cleantrack_types::{Hotspot, NearestBin, WorldSnapshot};

use crate::error::ApiError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response bodies
// ---------------------------------------------------------------------------

/// A coordinate as the browser sends it: a JSON number or a numeric string.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(untagged)]
pub enum CoordinateInput {
    /// `12.97`
    Number(f64),
    /// `"12.97"`
    Text(String),
}

impl CoordinateInput {
    fn parse(&self, field: &str) -> Result<f64, ApiError> {
        let value = match self {
            Self::Number(v) => *v,
            Self::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|e| ApiError::InvalidRequest(format!("{field} is not a number: {e}")))?,
        };
        if value.is_finite() {
            Ok(value)
        } else {
            Err(ApiError::InvalidRequest(format!("{field} must be finite")))
        }
    }
}

/// Body of `POST /api/report`.
#[derive(Debug, serde::Deserialize)]
pub struct ReportRequest {
    /// Latitude (required).
    pub lat: Option<CoordinateInput>,
    /// Longitude (required).
    pub lng: Option<CoordinateInput>,
    /// Issue category, defaults to `overflow`.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Free text, defaults to `Reported issue`.
    pub description: Option<String>,
}

/// Response of `POST /api/report`.
#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    /// Always `true`; failures use an error status instead.
    pub success: bool,
    /// Points granted for this report.
    pub eco_points: u64,
    /// The created hotspot.
    pub hotspot: Hotspot,
}

/// Query parameters for `GET /api/nearest-bin`.
#[derive(Debug, serde::Deserialize)]
pub struct NearestBinQuery {
    /// Latitude of the user.
    pub lat: Option<String>,
    /// Longitude of the user.
    pub lng: Option<String>,
}

fn required(value: Option<&CoordinateInput>, field: &str) -> Result<f64, ApiError> {
    value
        .ok_or_else(|| ApiError::InvalidRequest(format!("{field} is required")))?
        .parse(field)
}

// ---------------------------------------------------------------------------
// GET /api/state
// ---------------------------------------------------------------------------

/// Return the full world snapshot, stats recomputed first.
pub async fn get_state(State(state): State<Arc<AppState>>) -> Json<WorldSnapshot> {
    Json(state.live.snapshot().await)
}

// ---------------------------------------------------------------------------
// POST /api/report
// ---------------------------------------------------------------------------

/// Accept a citizen report.
///
/// Missing or non-numeric coordinates yield `400 Bad Request` and leave the
/// world untouched. On success every subscriber receives `hotspotReported`
/// followed by `statsUpdate`.
pub async fn submit_report(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ReportRequest>, JsonRejection>,
) -> Result<Json<ReportResponse>, ApiError> {
    let Json(request) = payload?;
    let lat = required(request.lat.as_ref(), "lat")?;
    let lng = required(request.lng.as_ref(), "lng")?;
    let report = Report::new(lat, lng, request.kind, request.description)?;

    let receipt = state.live.submit_report(report).await;

    Ok(Json(ReportResponse {
        success: true,
        eco_points: receipt.reward,
        hotspot: receipt.hotspot,
    }))
}

// ---------------------------------------------------------------------------
// GET /api/nearest-bin
// ---------------------------------------------------------------------------

/// Find the nearest bin with room. Responds with `null` when none
/// qualifies.
pub async fn nearest_bin(
    State(state): State<Arc<AppState>>,
    query: Result<Query<NearestBinQuery>, QueryRejection>,
) -> Result<Json<Option<NearestBin>>, ApiError> {
    let Query(query) = query?;
    let lat = required(query.lat.map(CoordinateInput::Text).as_ref(), "lat")?;
    let lng = required(query.lng.map(CoordinateInput::Text).as_ref(), "lng")?;
    Ok(Json(state.live.nearest_available_bin(lat, lng).await))
}

// ---------------------------------------------------------------------------
// GET / -- minimal HTML status page
// ---------------------------------------------------------------------------

/// Serve a minimal HTML page showing live counters and API links.
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.live.snapshot().await;
    let subscribers = state.live.subscriber_count().await;
    let uptime = Utc::now()
        .signed_duration_since(state.started_at)
        .num_seconds();
    let tick = snapshot.tick;
    let stats = snapshot.stats;
    let bins = stats.total_bins;
    let full_bins = stats.full_bins;
    let trucks = stats.active_trucks;
    let hotspots = stats.total_hotspots;
    let eco_points = stats.eco_points;

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>CleanTrack Live</title>
    <style>
        body {{
            background: #f4f9f4;
            color: #1b3a1b;
            font-family: system-ui, sans-serif;
            padding: 2rem;
            max-width: 800px;
            margin: 0 auto;
        }}
        h1 {{ color: #2e7d32; margin-bottom: 0.25rem; }}
        .subtitle {{ color: #5f7f5f; margin-top: 0; }}
        .metric {{
            display: inline-block;
            background: #fff;
            border: 1px solid #c8e6c9;
            border-radius: 6px;
            padding: 1rem 1.5rem;
            margin: 0.5rem 0.5rem 0.5rem 0;
            min-width: 120px;
        }}
        .metric .label {{ color: #5f7f5f; font-size: 0.85rem; }}
        .metric .value {{ color: #2e7d32; font-size: 1.5rem; font-weight: bold; }}
        a {{ color: #2e7d32; }}
        ul {{ list-style: none; padding: 0; }}
        li {{ padding: 0.3rem 0; }}
        code {{ background: #e8f5e9; padding: 0 0.25rem; }}
    </style>
</head>
<body>
    <h1>CleanTrack Live</h1>
    <p class="subtitle">Waste-collection simulation server, up {uptime}s</p>

    <div>
        <div class="metric"><div class="label">Tick</div><div class="value">{tick}</div></div>
        <div class="metric"><div class="label">Bins</div><div class="value">{bins}</div></div>
        <div class="metric"><div class="label">Full bins</div><div class="value">{full_bins}</div></div>
        <div class="metric"><div class="label">Trucks</div><div class="value">{trucks}</div></div>
        <div class="metric"><div class="label">Hotspots</div><div class="value">{hotspots}</div></div>
        <div class="metric"><div class="label">Eco points</div><div class="value">{eco_points}</div></div>
        <div class="metric"><div class="label">Live clients</div><div class="value">{subscribers}</div></div>
    </div>

    <h2>API</h2>
    <ul>
        <li><code>GET</code> <a href="/api/state">/api/state</a> -- full world snapshot</li>
        <li><code>GET</code> <code>/api/nearest-bin?lat=&amp;lng=</code> -- nearest bin with room</li>
        <li><code>POST</code> <code>/api/report</code> -- report a hotspot</li>
        <li><code>GET</code> <code>ws://host:port/ws</code> -- live event stream</li>
    </ul>
</body>
</html>"#
    ))
}
