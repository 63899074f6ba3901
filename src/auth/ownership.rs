use super::CurrentUser;
use crate::error::ApiError;

/// Superusers see everything; everyone else only what they own
pub fn can_access(actor: &CurrentUser, owner_id: i32) -> bool {
    actor.is_superuser || actor.id == owner_id
}

pub fn authorize(actor: &CurrentUser, owner_id: i32) -> Result<(), ApiError> {
    if can_access(actor, owner_id) {
        Ok(())
    } else {
        tracing::warn!(actor = actor.id, owner = owner_id, "access denied to foreign record");
        Err(ApiError::permission_denied())
    }
}
