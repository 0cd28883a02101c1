use crate::models::Driver;
use axum::http::StatusCode;
use serde_json::{Value, json};

/// Fixed header set the backend expects from its own web client.
const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:142.0) Gecko/20100101 Firefox/142.0";
const ORIGIN: &str = "https://docs.puter.com";
const REFERER: &str = "https://docs.puter.com/";
const IDEMPOTENCY_KEY: &str = "\"4900243693008804770\"";

pub const DEFAULT_UPSTREAM_URL: &str = "https://api.puter.com/drivers/call";

#[derive(Debug, Clone)]
pub enum UpstreamErrorKind {
    Network,
    Http,
}

#[derive(Debug, Clone)]
pub struct UpstreamCallError {
    pub kind: UpstreamErrorKind,
    pub status: Option<StatusCode>,
    pub message: String,
}

impl UpstreamCallError {
    pub fn new(kind: UpstreamErrorKind, status: Option<StatusCode>, message: String) -> Self {
        Self {
            kind,
            status,
            message,
        }
    }
}

/// Build the driver-call envelope for one chat request.
pub fn build_envelope(messages: &Value, model: &str, stream: bool, driver: Driver) -> Value {
    json!({
        "interface": "puter-chat-completion",
        "driver": driver.as_str(),
        "test_mode": false,
        "method": "complete",
        "args": {
            "messages": messages,
            "model": model,
            "stream": stream
        }
    })
}

/// POST the envelope to the drivers endpoint with one credential picked
/// uniformly at random from the pool. The response body is returned
/// unbuffered so streaming responses can be consumed incrementally.
pub async fn call_drivers(
    client: &reqwest::Client,
    url: &str,
    tokens: &[String],
    envelope: &Value,
) -> Result<reqwest::Response, UpstreamCallError> {
    let token = pick_token(tokens).ok_or_else(|| {
        UpstreamCallError::new(
            UpstreamErrorKind::Http,
            None,
            "upstream token pool is empty".to_string(),
        )
    })?;

    let resp = client
        .post(url)
        .bearer_auth(token)
        .header("User-Agent", USER_AGENT)
        .header("Accept", "*/*")
        .header("Accept-Language", "ru-RU,ru;q=0.8,en-US;q=0.5,en;q=0.3")
        .header("Content-Type", "application/json;charset=UTF-8")
        .header("Origin", ORIGIN)
        .header("Referer", REFERER)
        .header("DNT", "1")
        .header("Sec-GPC", "1")
        .header("Idempotency-Key", IDEMPOTENCY_KEY)
        .json(envelope)
        .send()
        .await
        .map_err(|err| UpstreamCallError::new(UpstreamErrorKind::Network, None, err.to_string()))?;

    let status = resp.status();
    if !status.is_success() {
        return Err(UpstreamCallError::new(
            UpstreamErrorKind::Http,
            Some(status),
            format!("upstream status {}", status),
        ));
    }
    Ok(resp)
}

fn pick_token(tokens: &[String]) -> Option<&String> {
    if tokens.is_empty() {
        return None;
    }
    let idx = rand::random::<u64>() as usize % tokens.len();
    tokens.get(idx)
}
