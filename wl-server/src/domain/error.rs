use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("post not found: {0}")]
    PostNotFound(i64),
    #[error("malformed row stream: {0}")]
    MalformedRows(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("simulation failed: {0}")]
    Simulation(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::Internal(format!("database error: {}", err))
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl ResponseError for DomainError {
    fn status_code(&self) -> StatusCode {
        match self {
            DomainError::PostNotFound(_) => StatusCode::NOT_FOUND,
            DomainError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            DomainError::Simulation(_) => StatusCode::BAD_GATEWAY,
            DomainError::MalformedRows(_) | DomainError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        // internal details stay in the logs
        let message = match self {
            DomainError::MalformedRows(_) | DomainError::Internal(_) => {
                "internal error".to_string()
            }
            _ => self.to_string(),
        };
        let details = match self {
            DomainError::PostNotFound(id) => Some(json!({ "resource": id })),
            _ => None,
        };
        let body = ErrorBody {
            error: message.as_str(),
            details,
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn maps_errors_to_status_codes() {
        assert_eq!(
            DomainError::PostNotFound(3).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            DomainError::InvalidRequest("page".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            DomainError::Simulation("timeout".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            DomainError::MalformedRows("no id".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[actix_web::test]
    async fn not_found_body_names_the_resource() {
        let response = DomainError::PostNotFound(42).error_response();
        let bytes = to_bytes(response.into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "post not found: 42");
        assert_eq!(body["details"]["resource"], 42);
    }

    #[actix_web::test]
    async fn internal_body_hides_details() {
        let response = DomainError::Internal("disk on fire".into()).error_response();
        let bytes = to_bytes(response.into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "internal error");
        assert!(body.get("details").is_none());
    }
}
