use axum::{extract::State, middleware, response::Json, routing::get, Extension, Router};

use crate::auth::CurrentUser;
use crate::database::models::user::UserPublic;
use crate::error::ApiError;
use crate::middleware::{jwt_auth_middleware, AuthState};

pub fn routes(auth: AuthState) -> Router {
    Router::new()
        .route("/api/v1/users/me", get(me))
        .route_layer(middleware::from_fn_with_state(auth.clone(), jwt_auth_middleware))
        .with_state(auth)
}

/// GET /api/v1/users/me - the caller's public profile
pub async fn me(
    State(auth): State<AuthState>,
    Extension(actor): Extension<CurrentUser>,
) -> Result<Json<UserPublic>, ApiError> {
    let user = auth
        .users
        .find_user(actor.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(UserPublic::from(user)))
}
