//! HTTP error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use congrego_store::StoreError;

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> Response {
    (
        status,
        Json(serde_json::json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// Uniform `401`. Deliberately carries no detail: missing header, malformed
/// token, bad signature, expiry, unknown email, bad password and revoked
/// subject must all look identical from outside.
pub fn unauthorized() -> Response {
    json_error(StatusCode::UNAUTHORIZED, "unauthorized", "unauthorized")
}

/// Uniform `403`. Never names the role or tenant that was required.
pub fn forbidden() -> Response {
    json_error(StatusCode::FORBIDDEN, "forbidden", "forbidden")
}

pub fn store_error(err: StoreError) -> Response {
    match err {
        StoreError::EmailTaken => {
            json_error(StatusCode::CONFLICT, "conflict", "email already in use")
        }
        StoreError::TenantNotFound => {
            json_error(StatusCode::NOT_FOUND, "not_found", "tenant not found")
        }
        StoreError::UserNotFound => {
            json_error(StatusCode::NOT_FOUND, "not_found", "user not found")
        }
        StoreError::MemberNotFound => {
            json_error(StatusCode::NOT_FOUND, "not_found", "member not found")
        }
    }
}
