// src/errors.rs
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0} is not set")]
    MissingSecret(&'static str),

    #[error("Unauthorized: Invalid API Key")]
    InvalidApiKey,

    #[error("Unauthorized: Invalid webhook signature")]
    InvalidSignature,

    #[error("{0}")]
    NotFound(String),

    #[error("{message}")]
    Relworx {
        message: String,
        details: Option<serde_json::Value>,
    },

    #[error("{0}")]
    Store(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::MissingSecret(_) => StatusCode::UNAUTHORIZED,
            AppError::InvalidApiKey | AppError::InvalidSignature => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Relworx { .. } | AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let mut body = json!({
            "success": false,
            "error": self.to_string(),
        });

        // The frontend surfaces whatever the processor said went wrong.
        if let AppError::Relworx { details, .. } = &self {
            body["details"] = details
                .clone()
                .unwrap_or_else(|| json!("No additional details"));
        }

        (status, Json(body)).into_response()
    }
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    pub fn store(msg: impl Into<String>) -> Self {
        AppError::Store(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
