use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error as ThisError;

/// Request-level failures, rendered as problem-details JSON.
#[derive(ThisError, Debug)]
pub enum ApiError {
    #[error("{detail}")]
    InvalidInput {
        title: &'static str,
        detail: String,
    },
    #[error("{detail}")]
    NotFound {
        title: &'static str,
        detail: String,
    },
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let (title, detail) = match self {
            ApiError::InvalidInput { title, detail } => (title, detail),
            ApiError::NotFound { title, detail } => (title, detail),
        };

        HttpResponse::build(self.status_code()).json(json!({
            "title": title,
            "detail": detail,
            "status": self.status_code().as_u16(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_maps_to_bad_request() {
        let error = ApiError::InvalidInput {
            title: "Invalid symbol",
            detail: "A non-empty symbol is required.".to_string(),
        };

        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_maps_to_not_found() {
        let error = ApiError::NotFound {
            title: "Symbols not found",
            detail: "None of the requested symbols exist in the store.".to_string(),
        };

        assert_eq!(error.status_code(), StatusCode::NOT_FOUND);
    }
}
