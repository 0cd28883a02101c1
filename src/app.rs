use crate::auth::AuthState;
use crate::error::{AppError, AppResult};
use crate::upstream;
use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use std::sync::Arc;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

#[derive(Debug, Clone)]
pub struct AppState {
    pub runtime: Arc<RuntimeConfig>,
    pub auth: AuthState,
    pub http: reqwest::Client,
}

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub listen: String,
    pub upstream_url: String,
    pub upstream_tokens: Vec<String>,
    pub auth_tokens: Vec<String>,
}

impl RuntimeConfig {
    pub fn from_env() -> Self {
        let listen = env_or("DRIVERGATE_LISTEN", "0.0.0.0:8000");
        let upstream_url = env_or("DRIVERGATE_UPSTREAM_URL", upstream::DEFAULT_UPSTREAM_URL);
        let upstream_tokens = env_list("DRIVERGATE_UPSTREAM_TOKENS");
        let mut auth_tokens = env_list("DRIVERGATE_AUTH_TOKENS");
        if auth_tokens.is_empty() {
            auth_tokens = vec!["sk-yourauthtoken".to_string()];
        }
        Self {
            listen,
            upstream_url,
            upstream_tokens,
            auth_tokens,
        }
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_list(name: &str) -> Vec<String> {
    std::env::var(name)
        .ok()
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

pub async fn load_state() -> AppResult<AppState> {
    load_state_with_runtime(RuntimeConfig::from_env()).await
}

pub async fn load_state_with_runtime(runtime: RuntimeConfig) -> AppResult<AppState> {
    // An empty credential pool can never serve a request; reject at startup
    // instead of failing on the first call.
    if runtime.upstream_tokens.is_empty() {
        return Err(AppError::new(
            StatusCode::BAD_REQUEST,
            "no upstream credentials configured (set DRIVERGATE_UPSTREAM_TOKENS)",
        ));
    }

    let http = reqwest::Client::builder()
        .build()
        .map_err(|err| AppError::new(StatusCode::BAD_REQUEST, err.to_string()))?;
    let auth = AuthState::new(runtime.auth_tokens.clone());

    Ok(AppState {
        runtime: Arc::new(runtime),
        auth,
        http,
    })
}

pub fn build_app(state: AppState) -> Router {
    // Method mismatches fall through to the same not-found handler as
    // unknown paths, so every non-route answers 404 after the auth check.
    Router::new()
        .route(
            "/v1/models",
            get(crate::handlers::list_models).fallback(crate::handlers::not_found),
        )
        .route(
            "/v1/chat/completions",
            post(crate::handlers::create_chat_completions).fallback(crate::handlers::not_found),
        )
        .fallback(crate::handlers::not_found)
        .with_state(state)
        .layer(SetRequestIdLayer::new(
            axum::http::header::HeaderName::from_static("x-request-id"),
            MakeRequestUuid,
        ))
        .layer(PropagateRequestIdLayer::new(
            axum::http::header::HeaderName::from_static("x-request-id"),
        ))
        .layer(TraceLayer::new_for_http())
}
