use std::any::Any;
use std::future::Future;
use std::sync::Arc;

use axum::{
    extract::{Json, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use bytes::Bytes;
use serde::Serialize;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::{Result, RobotError};
use crate::services::callback::{CallbackQuery, CallbackService};

pub const CALLBACK_PATH: &str = "/wechat/robot/callback";
pub const INTERNAL_ERROR_BODY: &str = "internal server error";

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<CallbackService>,
}

impl AppState {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            service: Arc::new(CallbackService::from_config(config)?),
        })
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(CALLBACK_PATH, get(verify_url).post(handle_robot_message))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// The one place errors become HTTP statuses.
pub fn status_for(err: &RobotError) -> StatusCode {
    match err {
        RobotError::SignatureInvalid | RobotError::MalformedRequest(_) | RobotError::Parse(_) => {
            StatusCode::BAD_REQUEST
        }
        RobotError::Decrypt { .. }
        | RobotError::Encrypt { .. }
        | RobotError::Config(_)
        | RobotError::Runtime(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

async fn verify_url(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Response {
    match state.service.verify_url(&query) {
        Ok(echo) => {
            info!("url verification succeeded");
            text_response(StatusCode::OK, echo)
        }
        Err(err) => {
            let status = log_failure("url verification", &err);
            let body = if status.is_server_error() {
                format!("verification failed: {err}")
            } else {
                err.to_string()
            };
            text_response(status, body)
        }
    }
}

async fn handle_robot_message(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
    body: Bytes,
) -> Response {
    match state.service.handle_message(&query, &body) {
        Ok(encrypted) => text_response(StatusCode::OK, encrypted),
        Err(err) => {
            let status = log_failure("message handling", &err);
            let body = if status.is_server_error() {
                INTERNAL_ERROR_BODY.to_string()
            } else {
                err.to_string()
            };
            text_response(status, body)
        }
    }
}

fn log_failure(flow: &str, err: &RobotError) -> StatusCode {
    let status = status_for(err);
    if status.is_server_error() {
        error!(flow, status = status.as_u16(), crypto_status = ?err.crypto_status(), "{err}");
    } else {
        warn!(flow, status = status.as_u16(), "{err}");
    }
    status
}

fn text_response(status: StatusCode, body: String) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        body,
    )
        .into_response()
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    error!(detail = %detail, "handler panicked");
    text_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        INTERNAL_ERROR_BODY.to_string(),
    )
}

pub async fn run_with_shutdown<F>(host: &str, port: u16, config: &Config, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let state = AppState::from_config(config)?;
    let app = build_router(state);

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| RobotError::Runtime(e.to_string()))?;
    info!(%addr, path = CALLBACK_PATH, "robot callback listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| RobotError::Runtime(e.to_string()))?;

    Ok(())
}
