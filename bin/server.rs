// Transaction Network - Web Server
// Scene API with Axum

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use transaction_network::{
    render_event, InteractionKind, NetworkConfig, NetworkPipeline, ScenePayload, YearRange,
};

/// Shared application state (read-only)
#[derive(Clone)]
struct AppState {
    config: Arc<NetworkConfig>,
    pipeline: Arc<NetworkPipeline>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn err(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

/// Query string of /api/scene; anything missing falls back to the config
#[derive(Debug, Deserialize)]
struct SceneQuery {
    start: Option<i32>,
    end: Option<i32>,
    account: Option<String>,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/config - Effective configuration
async fn get_config(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::ok((*state.config).clone()))
}

/// GET /api/scene - Scene for a year range and account
async fn get_scene(
    State(state): State<AppState>,
    Query(query): Query<SceneQuery>,
) -> impl IntoResponse {
    let defaults = state.config.default_years;
    let years = match YearRange::new(
        query.start.unwrap_or(defaults.start),
        query.end.unwrap_or(defaults.end),
    ) {
        Ok(years) => years,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::<ScenePayload>::err(e.to_string())),
            )
                .into_response()
        }
    };
    let account = query
        .account
        .unwrap_or_else(|| state.config.default_account.clone());

    scene_response(&state, years, &account).await
}

/// GET /api/scene/:account - Scene for one account over the default years
async fn get_account_scene(
    State(state): State<AppState>,
    Path(account): Path<String>,
) -> impl IntoResponse {
    // `Path` has already percent-decoded the segment
    let years = state.config.default_years;
    scene_response(&state, years, &account).await
}

async fn scene_response(state: &AppState, years: YearRange, account: &str) -> axum::response::Response {
    let pipeline = Arc::clone(&state.pipeline);
    let account = account.to_string();

    // CSV loading and layout are blocking work
    let result = tokio::task::spawn_blocking(move || pipeline.compute_scene(years, &account)).await;

    match result {
        Ok(Ok(scene)) => (StatusCode::OK, Json(ApiResponse::ok(scene))).into_response(),
        Ok(Err(e)) => {
            log::error!("Error computing scene: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<ScenePayload>::err(format!("{:#}", e))),
            )
                .into_response()
        }
        Err(e) => {
            log::error!("Scene task failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<ScenePayload>::err(e.to_string())),
            )
                .into_response()
        }
    }
}

/// POST /api/events/hover - Echo hover data
async fn post_hover(body: Option<Json<serde_json::Value>>) -> impl IntoResponse {
    event_response(InteractionKind::Hover, body)
}

/// POST /api/events/click - Echo click data
async fn post_click(body: Option<Json<serde_json::Value>>) -> impl IntoResponse {
    event_response(InteractionKind::Click, body)
}

#[derive(Serialize)]
struct EventResponse {
    kind: InteractionKind,
    label: &'static str,
    rendered: String,
}

fn event_response(
    kind: InteractionKind,
    body: Option<Json<serde_json::Value>>,
) -> axum::response::Response {
    let payload = body.map(|Json(value)| value);
    match render_event(payload.as_ref()) {
        Ok(rendered) => (
            StatusCode::OK,
            Json(ApiResponse::ok(EventResponse {
                kind,
                label: kind.label(),
                rendered,
            })),
        )
            .into_response(),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<EventResponse>::err(e.to_string())),
        )
            .into_response(),
    }
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("🌐 Transaction Network - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let config = match std::env::var("NETWORK_CONFIG") {
        Ok(path) => NetworkConfig::from_file(std::path::Path::new(&path))?,
        Err(_) => NetworkConfig::default(),
    };

    if !config.edges_path.exists() {
        eprintln!("❌ Edge table not found at {:?}", config.edges_path);
        eprintln!("   Set NETWORK_CONFIG to a config file with edges_path / nodes_path.");
        std::process::exit(1);
    }
    println!("✓ Edges: {:?}", config.edges_path);
    println!("✓ Nodes: {:?}", config.nodes_path);

    // Create shared state
    let state = AppState {
        pipeline: Arc::new(NetworkPipeline::from_config(&config)),
        config: Arc::new(config),
    };

    // Build API routes
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/config", get(get_config))
        .route("/scene", get(get_scene))
        .route("/scene/:account", get(get_account_scene))
        .route("/events/hover", post(post_hover))
        .route("/events/click", post(post_click))
        .with_state(state);

    let app = Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive());

    // Start server
    let addr = std::env::var("NETWORK_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    println!("\n🚀 Server running on http://{}", addr);
    println!("   API: http://{}/api/scene?start=2010&end=2019&account=A0001", addr);
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app).await?;

    Ok(())
}
