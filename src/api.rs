//! REST API server for the finance agent
//!
//! Exposes the agent over HTTP for the dashboard frontend.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use uuid::Uuid;

use crate::agent::{Agent, AgentSetup};
use crate::config::ALLOWED_ORIGINS;
use crate::models::{ChatRequest, ChatResponse, ErrorResponse, HealthResponse, RootResponse, ServiceInfo};

/// =============================
/// API State
/// =============================

#[derive(Clone)]
pub struct AppState {
    pub agent: Arc<dyn Agent>,
    pub info: Arc<ServiceInfo>,
}

impl AppState {
    pub fn new(agent: Arc<dyn Agent>, info: ServiceInfo) -> Self {
        Self {
            agent,
            info: Arc::new(info),
        }
    }
}

impl From<AgentSetup> for AppState {
    fn from(setup: AgentSetup) -> Self {
        Self::new(setup.agent, setup.info)
    }
}

/// =============================
/// Error Responses
/// =============================

#[derive(Debug)]
pub enum ApiError {
    /// Request body failed to parse into the expected shape
    Validation(String),
    /// The agent failed while answering
    Agent(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::Validation(detail) => (StatusCode::UNPROCESSABLE_ENTITY, detail),
            ApiError::Agent(detail) => (StatusCode::INTERNAL_SERVER_ERROR, detail),
        };

        (status, Json(ErrorResponse { detail })).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

/// =============================
/// Handlers
/// =============================

async fn root(State(state): State<AppState>) -> Json<RootResponse> {
    Json(RootResponse {
        message: state.info.root_message.clone(),
    })
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(state.info.health())
}

async fn chat_with_agent(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(request) = payload?;
    let request_id = Uuid::new_v4();

    info!(
        %request_id,
        agent = %state.agent.name(),
        chars = request.message.len(),
        "Received chat request"
    );

    match state.agent.run(&request.message).await {
        Ok(output) => {
            info!(%request_id, "Chat request answered");
            Ok(Json(ChatResponse {
                response: output.into_text(),
            }))
        }
        Err(e) => {
            error!(%request_id, "Agent processing failed: {}", e);
            Err(ApiError::Agent(format!("Agent processing error: {}", e)))
        }
    }
}

/// =============================
/// Router
/// =============================

/// CORS for the given browser origins; any method or header, with credentials
pub fn cors_layer(origins: &[&str]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    // Credentialed CORS forbids wildcards, so echo the request instead.
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/chat", post(chat_with_agent))
        .with_state(state)
        .layer(cors_layer(&ALLOWED_ORIGINS))
        .layer(TraceLayer::new_for_http())
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(state: AppState, addr: &str) -> crate::Result<()> {
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("API Server listening on http://{}", addr);

    axum::serve(listener, router).await?;

    Ok(())
}
