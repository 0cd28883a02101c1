use crate::app::AppState;
use crate::completion;
use crate::error::{AppError, AppResult};
use crate::models::{self, Driver};
use crate::stream;
use crate::upstream::{self, UpstreamCallError, UpstreamErrorKind};
use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::sse::Event;
use axum::response::{IntoResponse, Response, Sse};
use futures_util::StreamExt;
use serde_json::{Value, json};
use tokio::sync::mpsc;

pub async fn list_models(State(state): State<AppState>, headers: HeaderMap) -> AppResult<Response> {
    state.auth.authorize(&headers)?;
    let data: Vec<Value> = models::all_models()
        .into_iter()
        .map(|entry| {
            json!({
                "id": entry.id,
                "object": "model",
                "created": models::MODEL_CREATED,
                "owned_by": entry.owned_by
            })
        })
        .collect();
    Ok(Json(json!({ "object": "list", "data": data })).into_response())
}

pub async fn create_chat_completions(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Response> {
    state.auth.authorize(&headers)?;
    let body: Value =
        serde_json::from_slice(&body).map_err(|err| AppError::internal(err.to_string()))?;

    let model = body
        .get("model")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    let messages = body.get("messages").cloned().unwrap_or_else(|| json!([]));
    let stream_requested = body.get("stream").and_then(|v| v.as_bool()).unwrap_or(false);

    let driver = Driver::resolve(&model);
    tracing::debug!(%model, driver = driver.as_str(), stream = stream_requested, "forwarding chat request");

    let envelope = upstream::build_envelope(&messages, &model, stream_requested, driver);
    let upstream_resp = upstream::call_drivers(
        &state.http,
        &state.runtime.upstream_url,
        &state.runtime.upstream_tokens,
        &envelope,
    )
    .await
    .map_err(map_upstream_error)?;

    if stream_requested {
        let (tx, rx) = mpsc::channel::<Event>(64);
        tokio::spawn(async move {
            stream::pump_chat_stream(model, upstream_resp, tx).await;
        });
        let events = tokio_stream::wrappers::ReceiverStream::new(rx)
            .map(Ok::<_, std::convert::Infallible>);
        return Ok(Sse::new(events).into_response());
    }

    let upstream_body: Value = upstream_resp
        .json()
        .await
        .map_err(|err| AppError::internal(err.to_string()))?;
    Ok(Json(completion::completion_from_upstream(driver, &upstream_body)).into_response())
}

pub async fn not_found(State(state): State<AppState>, headers: HeaderMap) -> AppResult<Response> {
    state.auth.authorize(&headers)?;
    Err(AppError::new(StatusCode::NOT_FOUND, "Not found"))
}

fn map_upstream_error(err: UpstreamCallError) -> AppError {
    tracing::warn!("upstream call failed: {}", err.message);
    match (err.kind, err.status) {
        (UpstreamErrorKind::Http, Some(status)) => AppError::upstream(status),
        _ => AppError::internal(err.message),
    }
}
