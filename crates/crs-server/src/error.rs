//! Error taxonomy for the HTTP surface: wraps every subsystem error the
//! server touches (session, store) into one response type.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use crs_session::SessionError;
use crs_store::StoreError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{0}")]
    BadRequest(String),

    #[error("session {0} is already processing a request")]
    Busy(crs_types::SessionId),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServerError::Session(SessionError::NotFound(_)) => StatusCode::NOT_FOUND,
            ServerError::Session(e) if e.is_recoverable() => StatusCode::BAD_REQUEST,
            ServerError::Session(_) => StatusCode::CONFLICT,
            ServerError::Store(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Busy(_) => StatusCode::CONFLICT,
        };
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}
