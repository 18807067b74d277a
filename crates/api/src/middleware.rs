//! Authentication stage (axum middleware).

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use congrego_auth::{Principal, TokenCodec};
use congrego_store::CredentialStore;

#[derive(Clone)]
pub struct AuthState {
    pub codec: Arc<TokenCodec>,
    pub store: Arc<dyn CredentialStore>,
}

/// Establish a [`Principal`] for the request or fail with `401`.
///
/// Invalid tokens and revoked subjects collapse to the same observable
/// outcome; the distinction is logged internally but must never be
/// distinguishable by an external caller.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = extract_bearer(req.headers())?;

    let claims = state.codec.verify(token).map_err(|e| {
        tracing::debug!(error = %e, "token verification failed");
        StatusCode::UNAUTHORIZED
    })?;

    // Revocation check: the token may be cryptographically valid while the
    // underlying account no longer exists. Existence only; the principal
    // is built from the verified claims, not from the store row.
    state.store.find_user_by_id(claims.sub).await.map_err(|_| {
        tracing::debug!(user_id = %claims.sub, "token subject no longer exists");
        StatusCode::UNAUTHORIZED
    })?;

    req.extensions_mut().insert(Principal::from_claims(claims));

    Ok(next.run(req).await)
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, StatusCode> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let header = header.to_str().map_err(|_| StatusCode::UNAUTHORIZED)?;

    let header = header
        .strip_prefix("Bearer ")
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = header.trim();
    if token.is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(token)
}
