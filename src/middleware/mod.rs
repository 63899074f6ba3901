pub mod auth;
pub mod json;
pub mod params;

pub use auth::{jwt_auth_middleware, AuthState};
pub use json::ValidatedJson;
pub use params::{ValidatedPath, ValidatedQuery};
