use axum::{
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;

use crate::api::headers;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_key: Option<String>,
}

impl ErrorResponse {
    pub fn new(message: &str) -> Self {
        Self {
            error: message.to_string(),
            message: None,
            entity_name: None,
            error_key: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A client-side validation failure tied to an entity, reported with the
    /// failure alert headers.
    #[error("{message}")]
    BadRequestAlert {
        application_name: String,
        message: String,
        entity_name: String,
        error_key: String,
    },
    #[error("{0}")]
    BadRequest(String),
    #[error("Not found")]
    NotFound,
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn bad_request_alert(
        application_name: &str,
        message: &str,
        entity_name: &str,
        error_key: &str,
    ) -> Self {
        ApiError::BadRequestAlert {
            application_name: application_name.to_string(),
            message: message.to_string(),
            entity_name: entity_name.to_string(),
            error_key: error_key.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequestAlert { .. } | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ApiError::BadRequestAlert {
                application_name,
                message,
                entity_name,
                error_key,
            } => {
                let headers: HeaderMap =
                    headers::failure_alert(&application_name, &entity_name, &error_key);
                let body = ErrorResponse {
                    error: message,
                    message: Some(format!("error.{}", error_key)),
                    entity_name: Some(entity_name),
                    error_key: Some(error_key),
                };
                (status, headers, Json(body)).into_response()
            }
            ApiError::Internal(e) => {
                log::error!("Request failed: {:#}", e);
                (status, Json(ErrorResponse::new(&e.to_string()))).into_response()
            }
            other => (status, Json(ErrorResponse::new(&other.to_string()))).into_response(),
        }
    }
}
