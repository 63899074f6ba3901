use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::record::{assign, Record, Resource};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Skill {
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SkillUpdate {
    pub name: Option<String>,
}

/// Public listing shape. Skills carry a `tags` slot, but no skill-to-tag link is stored,
/// so it is always null.
#[derive(Debug, Clone, Serialize)]
pub struct SkillOpen {
    pub name: String,
    pub tags: Option<Vec<String>>,
}

impl Resource for Skill {
    type Patch = SkillUpdate;
    type Listing = SkillOpen;

    const TABLE: &'static str = "skill";
    const LABEL: &'static str = "Skill";

    fn apply(&mut self, patch: SkillUpdate) {
        assign(&mut self.name, patch.name);
    }

    fn listing(record: Record<Self>) -> Self::Listing {
        SkillOpen {
            name: record.fields.name,
            tags: None,
        }
    }
}
