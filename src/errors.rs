use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Niepoprawne żądanie: {0}")]
    BadRequest(String),

    #[error("Nieprawidłowe dane wejściowe: {0}")]
    UnprocessableEntity(String),

    #[error("Wewnętrzny błąd serwera: {0}")]
    InternalServerError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            AppError::UnprocessableEntity(message) => (StatusCode::UNPROCESSABLE_ENTITY, message),
            AppError::InternalServerError(message) => {
                tracing::error!("Wewnętrzny błąd serwera: {}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        tracing::error!("Błąd przetwarzania Multipart: {:?}", err);
        AppError::UnprocessableEntity(format!("Błąd przetwarzania danych formularza: {}", err))
    }
}

/// Błąd wysyłki produktu do backendu.
///
/// Operator widzi zawsze ten sam komunikat; warianty służą tylko do logów.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("Błąd sieci podczas wysyłania produktu: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Backend odrzucił produkt: status={status}, treść={body}")]
    Rejected {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Nie można zbudować danych formularza: {0}")]
    Payload(String),
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Zmienna środowiskowa {0} musi być ustawiona")]
    Missing(&'static str),

    #[error("Zmienna środowiskowa {name} ma nieprawidłową wartość: {value}")]
    Invalid { name: &'static str, value: String },
}
