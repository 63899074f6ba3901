// handlers/resource.rs - generic CRUD handlers shared by every owned entity
//
//   POST   {base}         create, owner forced to the caller
//   GET    {base}/list    public listing filtered by ?user_id
//   GET    {base}/:id     read
//   PUT    {base}/:id     partial update
//   DELETE {base}/:id     hard delete
//
// Everything except /list sits behind the JWT layer, and read/update/delete all pass
// through the same ownership gate.

use axum::{
    extract::State,
    middleware,
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::auth::{authorize, CurrentUser};
use crate::database::{Record, RecordStore, Resource};
use crate::error::ApiError;
use crate::middleware::{jwt_auth_middleware, AuthState, ValidatedJson, ValidatedPath, ValidatedQuery};

pub struct ResourceState<R: Resource> {
    store: Arc<dyn RecordStore<R>>,
    max_list_limit: Option<i64>,
}

impl<R: Resource> Clone for ResourceState<R> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            max_list_limit: self.max_list_limit,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Owner to list for. 0 matches nobody, so an unscoped call returns nothing.
    #[serde(default)]
    pub user_id: i32,
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}

impl ListQuery {
    /// Offset and limit, clamped to be non-negative and to the configured cap
    pub fn window(&self, max_limit: Option<i64>) -> (i64, i64) {
        let skip = self.skip.max(0);
        let limit = self.limit.max(0);
        let limit = max_limit.map_or(limit, |max| limit.min(max));
        (skip, limit)
    }
}

/// The `:id` segment of record routes
#[derive(Debug, Deserialize)]
pub struct RecordPath {
    pub id: i32,
}

#[derive(Debug, Serialize)]
pub struct Message {
    pub message: String,
}

/// Build the router for one resource mounted at `base` (e.g. `/api/v1/educations`)
pub fn routes<R: Resource>(
    base: &str,
    store: Arc<dyn RecordStore<R>>,
    auth: AuthState,
    max_list_limit: Option<i64>,
) -> Router {
    let state = ResourceState { store, max_list_limit };

    Router::new()
        .route(base, post(create::<R>))
        .route(&format!("{}/", base), post(create::<R>))
        .route(
            &format!("{}/:id", base),
            get(read::<R>).put(update::<R>).delete(delete::<R>),
        )
        .route_layer(middleware::from_fn_with_state(auth, jwt_auth_middleware))
        // Public: mounted after route_layer so it bypasses authentication
        .route(&format!("{}/list", base), get(list::<R>))
        .with_state(state)
}

/// Fetch by id or fail with the shared not-found error, then apply the ownership gate
async fn load_owned<R: Resource>(
    state: &ResourceState<R>,
    actor: &CurrentUser,
    id: i32,
) -> Result<Record<R>, ApiError> {
    let record = state
        .store
        .find(id)
        .await?
        .ok_or_else(ApiError::record_not_found)?;
    authorize(actor, record.owner_id)?;
    Ok(record)
}

/// POST {base} - create a record owned by the caller
pub async fn create<R: Resource>(
    State(state): State<ResourceState<R>>,
    Extension(actor): Extension<CurrentUser>,
    ValidatedJson(fields): ValidatedJson<R>,
) -> Result<Json<Record<R>>, ApiError> {
    let record = state.store.insert(actor.id, fields).await?;
    info!(resource = R::TABLE, id = record.id, owner = actor.id, "record created");
    Ok(Json(record))
}

/// GET {base}/list - records of one owner, without authentication
pub async fn list<R: Resource>(
    State(state): State<ResourceState<R>>,
    ValidatedQuery(query): ValidatedQuery<ListQuery>,
) -> Result<Json<Vec<R::Listing>>, ApiError> {
    let (skip, limit) = query.window(state.max_list_limit);
    let records = state.store.list_by_owner(query.user_id, skip, limit).await?;
    Ok(Json(records.into_iter().map(R::listing).collect()))
}

/// GET {base}/:id
pub async fn read<R: Resource>(
    State(state): State<ResourceState<R>>,
    Extension(actor): Extension<CurrentUser>,
    ValidatedPath(RecordPath { id }): ValidatedPath<RecordPath>,
) -> Result<Json<Record<R>>, ApiError> {
    let record = load_owned(&state, &actor, id).await?;
    Ok(Json(record))
}

/// PUT {base}/:id - apply only the fields present in the body
pub async fn update<R: Resource>(
    State(state): State<ResourceState<R>>,
    Extension(actor): Extension<CurrentUser>,
    ValidatedPath(RecordPath { id }): ValidatedPath<RecordPath>,
    ValidatedJson(patch): ValidatedJson<R::Patch>,
) -> Result<Json<Record<R>>, ApiError> {
    let mut record = load_owned(&state, &actor, id).await?;
    record.fields.apply(patch);

    let updated = state.store.update(&record).await?;
    info!(resource = R::TABLE, id, actor = actor.id, "record updated");
    Ok(Json(updated))
}

/// DELETE {base}/:id
pub async fn delete<R: Resource>(
    State(state): State<ResourceState<R>>,
    Extension(actor): Extension<CurrentUser>,
    ValidatedPath(RecordPath { id }): ValidatedPath<RecordPath>,
) -> Result<Json<Message>, ApiError> {
    let record = load_owned(&state, &actor, id).await?;
    state.store.delete(record.id).await?;
    info!(resource = R::TABLE, id, actor = actor.id, "record deleted");

    Ok(Json(Message {
        message: format!("{} deleted successfully", R::LABEL),
    }))
}
