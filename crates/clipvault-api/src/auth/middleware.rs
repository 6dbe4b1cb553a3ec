use crate::auth::jwt::{AuthError, JwtService};
use crate::auth::models::AuthenticatedUser;
use crate::error::HttpAppError;
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use clipvault_core::AppError;
use std::sync::Arc;

const BEARER_PREFIX: &str = "Bearer ";

fn reject(err: AuthError) -> Response {
    tracing::debug!(reason = %err, "Authentication failed");
    HttpAppError(AppError::from(err)).into_response()
}

/// Require a valid bearer token and record the caller for downstream extractors.
pub async fn auth_middleware(
    State(jwt): State<Arc<JwtService>>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = match request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    {
        Some(h) => h,
        None => return reject(AuthError::MissingHeader),
    };

    let token = match auth_header.strip_prefix(BEARER_PREFIX) {
        Some(token) if !token.trim().is_empty() => token.trim(),
        _ => return reject(AuthError::InvalidScheme),
    };

    match jwt.authenticate(token) {
        Ok(caller) => {
            tracing::debug!(user_id = %caller.user_id, "Authenticated request");
            request.extensions_mut().insert(AuthenticatedUser(caller));
            next.run(request).await
        }
        Err(e) => reject(e),
    }
}
