use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{Map, Value, json};

#[derive(Debug, Clone)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
    pub upstream_status: Option<u16>,
    pub details: Option<String>,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            upstream_status: None,
            details: None,
        }
    }

    /// Non-2xx upstream responses keep their original status code.
    pub fn upstream(status: StatusCode) -> Self {
        Self {
            status,
            message: "Upstream API error".to_string(),
            upstream_status: Some(status.as_u16()),
            details: None,
        }
    }

    pub fn internal(details: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Internal server error".to_string(),
            upstream_status: None,
            details: Some(details.into()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut body = Map::new();
        body.insert("error".to_string(), Value::String(self.message));
        if let Some(status) = self.upstream_status {
            body.insert("status".to_string(), json!(status));
        }
        if let Some(details) = self.details {
            body.insert("details".to_string(), Value::String(details));
        }
        (self.status, axum::Json(Value::Object(body))).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
