//! HTTP surface of the dashboard: the page itself plus the static overview
//! image. Everything renders server-side; the only client-side work is the
//! plotly.js call embedded in the page.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use chrono::NaiveDate;
use log::{error, info, warn};
use serde::Deserialize;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::error::StormboardError;
use crate::render::assets::{animation_data_url, read_image};
use crate::render::page::{error_page, render_page};
use crate::stormboard::Stormboard;
use crate::warehouse::WarehouseError;

#[derive(Clone)]
pub struct AppState {
    board: Arc<Stormboard>,
}

impl AppState {
    pub fn new(board: Arc<Stormboard>) -> Self {
        Self { board }
    }
}

/// Builds the application router with tracing, compression and a request
/// timeout.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(dashboard))
        .route("/assets/overview.png", get(overview_image))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30))),
        )
        .with_state(state)
}

/// Binds the listener and serves the dashboard until shutdown.
pub async fn serve(state: AppState, bind_addr: &str) -> Result<(), StormboardError> {
    let app = router(state);
    let listener = TcpListener::bind(bind_addr)
        .await
        .map_err(|e| StormboardError::Bind(bind_addr.to_string(), e))?;
    info!("Dashboard listening on http://{}", bind_addr);
    axum::serve(listener, app)
        .await
        .map_err(StormboardError::Serve)
}

#[derive(Debug, Deserialize)]
struct DashboardParams {
    date: Option<String>,
}

async fn dashboard(
    State(state): State<AppState>,
    Query(params): Query<DashboardParams>,
) -> Result<Html<String>, PageError> {
    let board = &state.board;
    let config = board.config();

    let picked = parse_picked(params.date.as_deref());
    let effective = picked.unwrap_or(config.window.default_date);

    // In range mode the fetch ignores the picked date and the run-date filter
    // narrows the window; in single-run mode the query already pinned the run
    // and the filter is a no-op.
    let forecast = board.forecast().maybe_date(picked).call().await?;
    let rows = forecast.for_run_date(effective)?.collect_rows()?;

    let animation = match animation_data_url(&config.assets.animation_path).await {
        Ok(url) => Some(url),
        Err(e) => {
            warn!("Animation asset unavailable: {}", e);
            None
        }
    };
    let overview_available = tokio::fs::try_exists(&config.assets.overview_image_path)
        .await
        .unwrap_or(false);

    Ok(Html(render_page(
        config,
        effective,
        &rows,
        animation.as_deref(),
        overview_available,
    )))
}

async fn overview_image(State(state): State<AppState>) -> Response {
    let path = &state.board.config().assets.overview_image_path;
    match read_image(path).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, "image/png")], bytes).into_response(),
        Err(e) => {
            warn!("Overview image unavailable: {}", e);
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

/// A date picked on the page. Blank or unparseable input falls back to the
/// configured default rather than failing the request.
fn parse_picked(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            warn!("Ignoring unparseable date parameter '{}'", raw);
            None
        }
    }
}

/// Fatal pipeline errors surfaced by the page handler.
///
/// Credential and query failures end up here; an empty forecast window does
/// not, since it renders as a regular page.
struct PageError(StormboardError);

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        error!("Dashboard request failed: {}", self.0);
        let status = match &self.0 {
            StormboardError::Warehouse(WarehouseError::Api { .. }) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Html(error_page(&self.0.to_string()))).into_response()
    }
}

impl<E> From<E> for PageError
where
    StormboardError: From<E>,
{
    fn from(err: E) -> Self {
        PageError(StormboardError::from(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;
    use crate::warehouse::QueryRunner;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use polars::df;
    use polars::prelude::DataFrame;
    use tower::ServiceExt;

    fn config_toml(asset_dir: &str) -> String {
        format!(
            r##"
[warehouse]
endpoint = "https://bigquery.googleapis.com/bigquery/v2"
project_id = "acme-weather"
table = "acme-weather.weathernext.59572747_4_0"
credential_env = "STORMBOARD_WAREHOUSE_TOKEN"
timeout_secs = 30

[region]
name = "Houston"
time_zone = "America/Chicago"
vertices = [
    [-95.2481, 29.8767],
    [-95.2810, 30.2825],
    [-95.4601, 29.7765],
    [-95.2481, 29.8767],
]

[window]
mode = "single-run"
default_date = "2024-07-07"

[chart]
title = "Temperature, Wind Speed, Precipitation in Houston"
x_label = "Time"
wind_label = "Wind Speed (m/s)"
temperature_label = "Temp (F)"
precipitation_label = "Precipitation (m)"
wind_color = "#1f77b4"
temperature_color = "#d62728"
precipitation_color = "#9467bd"
tick_format = "%Y-%m-%d %H:%M"
tick_interval_days = 2
height = 600

[page]
heading = "Storm Preparation and Opportunity"
author = "Stormboard"
intro = ["What is the estimated impact of an approaching storm?"]
subheading = "Beryl 2024 Houston - WeatherNext Forecast"
date_label = "Enter date:"
table_caption = "Temperature, Wind, Precipitation in Houston:"

[assets]
animation_path = "{dir}/beryl.gif"
animation_link = "https://www.nhc.noaa.gov/archive/2024/BERYL.shtml"
overview_image_path = "{dir}/houston_beryl.png"

[server]
host = "127.0.0.1"
port = 8080
"##,
            dir = asset_dir
        )
    }

    struct CannedRunner {
        result: Result<DataFrame, WarehouseError>,
    }

    #[async_trait]
    impl QueryRunner for CannedRunner {
        async fn run_query(&self, _sql: &str) -> Result<DataFrame, WarehouseError> {
            match &self.result {
                Ok(frame) => Ok(frame.clone()),
                Err(WarehouseError::Api { status, message }) => Err(WarehouseError::Api {
                    status: *status,
                    message: message.clone(),
                }),
                Err(_) => Err(WarehouseError::JobIncomplete),
            }
        }
    }

    fn raw_frame() -> DataFrame {
        let times = vec![NaiveDate::from_ymd_opt(2024, 7, 5)
            .unwrap()
            .and_hms_opt(6, 0, 0)
            .unwrap()];
        df!(
            "time_CT" => &times,
            "temperature_K" => &[300.15],
            "wind_u_m_s" => &[3.0],
            "wind_v_m_s" => &[4.0],
            "precipitation_m" => &[0.01],
        )
        .unwrap()
    }

    fn app(asset_dir: &str, result: Result<DataFrame, WarehouseError>) -> Router {
        let config: DashboardConfig = toml::from_str(&config_toml(asset_dir)).unwrap();
        let board =
            Stormboard::with_runner(config, Arc::new(CannedRunner { result })).unwrap();
        router(AppState::new(Arc::new(board)))
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn dashboard_renders_page_with_table_and_chart() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path().to_str().unwrap(), Ok(raw_frame()));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("Storm Preparation and Opportunity"));
        assert!(body.contains("forecast-chart"));
        assert!(body.contains("<td>80.60</td>"));
        // Assets are absent in this setup; the page degrades to placeholders.
        assert!(!body.contains("data:image/gif"));
        assert!(body.contains("Storm track animation unavailable."));
        assert!(body.contains("Region overview image unavailable."));
    }

    #[tokio::test]
    async fn dashboard_echoes_picked_date() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path().to_str().unwrap(), Ok(raw_frame()));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/?date=2024-07-05")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let body = body_text(response).await;
        assert!(body.contains("Date selected: 2024-07-05"));
    }

    #[tokio::test]
    async fn failed_query_surfaces_as_error_page() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(
            dir.path().to_str().unwrap(),
            Err(WarehouseError::Api {
                status: StatusCode::UNAUTHORIZED,
                message: "Invalid credentials".to_string(),
            }),
        );

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_text(response).await;
        assert!(body.contains("Dashboard unavailable"));
    }

    #[tokio::test]
    async fn overview_image_serves_bytes_when_present() {
        let dir = tempfile::tempdir().unwrap();
        let image_path = dir.path().join("houston_beryl.png");
        std::fs::write(&image_path, [137, 80, 78, 71]).unwrap();

        let app = app(dir.path().to_str().unwrap(), Ok(raw_frame()));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/assets/overview.png")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "image/png"
        );
    }

    #[tokio::test]
    async fn missing_overview_image_is_isolated_to_404() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path().to_str().unwrap(), Ok(raw_frame()));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/assets/overview.png")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn picked_date_parsing_tolerates_bad_input() {
        assert_eq!(parse_picked(None), None);
        assert_eq!(parse_picked(Some("")), None);
        assert_eq!(parse_picked(Some("not-a-date")), None);
        assert_eq!(
            parse_picked(Some("2024-07-05")),
            NaiveDate::from_ymd_opt(2024, 7, 5)
        );
    }
}
