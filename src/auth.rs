use crate::error::{AppError, AppResult};
use axum::http::{HeaderMap, StatusCode, header};
use std::sync::Arc;

/// Bearer-token allow-list check. The token set is fixed at startup and
/// shared read-only across requests.
#[derive(Debug, Clone)]
pub struct AuthState {
    tokens: Arc<Vec<String>>,
}

impl AuthState {
    pub fn new(tokens: Vec<String>) -> Self {
        Self {
            tokens: Arc::new(tokens),
        }
    }

    pub fn authorize(&self, headers: &HeaderMap) -> AppResult<()> {
        let auth_header = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                AppError::new(StatusCode::UNAUTHORIZED, "Authorization header missing")
            })?;
        let token = auth_header.strip_prefix("Bearer ").unwrap_or(auth_header);
        if !self.tokens.iter().any(|t| t == token) {
            return Err(AppError::new(
                StatusCode::FORBIDDEN,
                "Invalid authorization token",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AuthState {
        AuthState::new(vec!["sk-test".to_string(), "sk-other".to_string()])
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, value.parse().unwrap());
        headers
    }

    #[test]
    fn missing_header_is_unauthorized() {
        let err = state().authorize(&HeaderMap::new()).unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.message, "Authorization header missing");
    }

    #[test]
    fn unknown_token_is_forbidden() {
        let err = state()
            .authorize(&headers_with("Bearer sk-wrong"))
            .unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
        assert_eq!(err.message, "Invalid authorization token");
    }

    #[test]
    fn bearer_prefix_is_optional() {
        state().authorize(&headers_with("Bearer sk-test")).unwrap();
        state().authorize(&headers_with("sk-other")).unwrap();
    }
}
