use serde::Serialize;
use sqlx::FromRow;

/// Row of the `user` table. Never serialized directly: `hashed_password` stays server-side.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub hashed_password: String,
    pub is_active: bool,
    pub is_superuser: bool,
    pub full_name: Option<String>,
}

/// Public projection of a user
#[derive(Debug, Clone, Serialize)]
pub struct UserPublic {
    pub id: i32,
    pub email: String,
    pub is_active: bool,
    pub is_superuser: bool,
    pub full_name: Option<String>,
}

impl From<User> for UserPublic {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            is_active: user.is_active,
            is_superuser: user.is_superuser,
            full_name: user.full_name,
        }
    }
}
