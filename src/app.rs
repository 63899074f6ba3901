use axum::{
    extract::{DefaultBodyLimit, State},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde_json::{json, Value};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{AppConfig, SecurityConfig};
use crate::database::models::{Education, Experience, Item, Skill, Tag};
use crate::database::{MemoryRepository, MemoryUserStore, PgUserStore, RecordStore, Repository, UserStore};
use crate::handlers::{resource, users};
use crate::middleware::AuthState;

/// One store per table
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub items: Arc<dyn RecordStore<Item>>,
    pub educations: Arc<dyn RecordStore<Education>>,
    pub experiences: Arc<dyn RecordStore<Experience>>,
    pub skills: Arc<dyn RecordStore<Skill>>,
    pub tags: Arc<dyn RecordStore<Tag>>,
}

impl Stores {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PgUserStore::new(pool.clone())),
            items: Arc::new(Repository::<Item>::new(pool.clone())),
            educations: Arc::new(Repository::<Education>::new(pool.clone())),
            experiences: Arc::new(Repository::<Experience>::new(pool.clone())),
            skills: Arc::new(Repository::<Skill>::new(pool.clone())),
            tags: Arc::new(Repository::<Tag>::new(pool)),
        }
    }

    /// Empty tables around a caller-provided user directory
    pub fn in_memory(users: Arc<MemoryUserStore>) -> Self {
        Self {
            users,
            items: Arc::new(MemoryRepository::<Item>::new()),
            educations: Arc::new(MemoryRepository::<Education>::new()),
            experiences: Arc::new(MemoryRepository::<Experience>::new()),
            skills: Arc::new(MemoryRepository::<Skill>::new()),
            tags: Arc::new(MemoryRepository::<Tag>::new()),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub stores: Stores,
    pub jwt_secret: Arc<str>,
    pub max_list_limit: Option<i64>,
}

impl AppState {
    pub fn new(stores: Stores, config: &AppConfig) -> Self {
        Self {
            stores,
            jwt_secret: Arc::from(config.security.jwt_secret.as_str()),
            max_list_limit: config.api.max_list_limit,
        }
    }
}

/// All routes, without the outer HTTP layers
pub fn router(state: AppState) -> Router {
    let auth = AuthState {
        users: Arc::clone(&state.stores.users),
        jwt_secret: Arc::clone(&state.jwt_secret),
    };
    let limit = state.max_list_limit;
    let stores = &state.stores;

    Router::new()
        .route("/", get(root))
        .route("/health", get(health).with_state(Arc::clone(&stores.users)))
        .merge(users::routes(auth.clone()))
        .merge(resource::routes("/api/v1/items", Arc::clone(&stores.items), auth.clone(), limit))
        .merge(resource::routes("/api/v1/educations", Arc::clone(&stores.educations), auth.clone(), limit))
        .merge(resource::routes("/api/v1/experiences", Arc::clone(&stores.experiences), auth.clone(), limit))
        .merge(resource::routes("/api/v1/skills", Arc::clone(&stores.skills), auth.clone(), limit))
        .merge(resource::routes("/api/v1/tags", Arc::clone(&stores.tags), auth, limit))
}

/// Body limit, CORS and request tracing as configured
pub fn with_layers(app: Router, config: &AppConfig) -> Router {
    let mut app = app.layer(DefaultBodyLimit::max(config.api.max_request_size_bytes));
    if config.security.enable_cors {
        app = app.layer(cors_layer(&config.security));
    }
    if config.api.enable_request_logging {
        app = app.layer(TraceLayer::new_for_http());
    }
    app
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if security.cors_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn root() -> Json<Value> {
    Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/health",
            "users": "/api/v1/users/me (protected)",
            "items": "/api/v1/items[/:id] (protected), /api/v1/items/list (public)",
            "educations": "/api/v1/educations[/:id] (protected), /api/v1/educations/list (public)",
            "experiences": "/api/v1/experiences[/:id] (protected), /api/v1/experiences/list (public)",
            "skills": "/api/v1/skills[/:id] (protected), /api/v1/skills/list (public)",
            "tags": "/api/v1/tags[/:id] (protected), /api/v1/tags/list (public)",
        }
    }))
}

async fn health(State(users): State<Arc<dyn UserStore>>) -> impl IntoResponse {
    match users.ping().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "ok" }))),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "degraded", "database": "unavailable" })),
            )
        }
    }
}
