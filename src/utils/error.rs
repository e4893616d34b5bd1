use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    StorageError(String),
    ConfigError(String),
    UpstreamError { message: String, details: String },
    NotFound(String),
    InvalidRequest(String),
    Unauthorized(String),
    Forbidden(String),
}

impl AppError {
    /// Message sent to the browser. Details of storage failures stay in the logs.
    pub fn public_message(&self) -> &str {
        match self {
            AppError::StorageError(_) => "Storage failure",
            AppError::ConfigError(_) => "Server misconfigured",
            AppError::UpstreamError { message, .. } => message,
            AppError::NotFound(msg)
            | AppError::InvalidRequest(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg) => msg,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::StorageError(msg) => write!(f, "Storage error: {}", msg),
            AppError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            AppError::UpstreamError { message, details } => write!(f, "{}: {}", message, details),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::StorageError(_) | AppError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::UpstreamError { .. } => StatusCode::BAD_GATEWAY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            log::error!("❌ {}", self);
        }

        let body = match self {
            AppError::UpstreamError { message, details } => serde_json::json!({
                "error": message,
                "details": details
            }),
            other => serde_json::json!({ "error": other.public_message() }),
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::StorageError(e.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::StorageError(format!("JSON encoding failed: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_web::test]
    async fn test_not_found_body_carries_message() {
        let resp = AppError::NotFound("Feed not found".into()).error_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Feed not found");
    }

    #[actix_web::test]
    async fn test_storage_error_hides_details() {
        let resp = AppError::StorageError("/srv/data/feed_data.json: permission denied".into())
            .error_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Storage failure");
    }

    #[actix_web::test]
    async fn test_upstream_error_includes_details() {
        let resp = AppError::UpstreamError {
            message: "Failed to download image".into(),
            details: "HTTP 404".into(),
        }
        .error_response();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["details"], "HTTP 404");
    }
}
