use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::auth::{decode_jwt, CurrentUser};
use crate::database::UserStore;
use crate::error::ApiError;

/// What the authentication layer needs: where users live and how tokens are signed
#[derive(Clone)]
pub struct AuthState {
    pub users: Arc<dyn UserStore>,
    pub jwt_secret: Arc<str>,
}

/// Resolve the bearer token to an active user and inject it as `CurrentUser`
pub async fn jwt_auth_middleware(
    State(auth): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // Extract JWT from Authorization header
    let token = extract_jwt_from_headers(request.headers()).map_err(|msg| {
        tracing::debug!("Rejected request without credentials: {}", msg);
        ApiError::unauthorized("Not authenticated")
    })?;

    // Validate and decode JWT
    let user_id = decode_jwt(&token, &auth.jwt_secret)
        .and_then(|claims| claims.user_id())
        .map_err(|e| {
            tracing::warn!("JWT validation failed: {}", e);
            ApiError::forbidden("Could not validate credentials")
        })?;

    let user = auth
        .users
        .find_user(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    if !user.is_active {
        tracing::warn!("User validation failed: user {} is inactive", user.id);
        return Err(ApiError::bad_request("Inactive user"));
    }

    tracing::debug!("Authenticated user {} ({})", user.id, user.email);
    request.extensions_mut().insert(CurrentUser::from(&user));

    Ok(next.run(request).await)
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get("authorization")
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty JWT token".to_string());
        }
        Ok(token.trim().to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}
