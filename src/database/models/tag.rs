use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::record::{assign, Record, Resource};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Tag {
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TagUpdate {
    pub name: Option<String>,
}

impl Resource for Tag {
    type Patch = TagUpdate;
    type Listing = Record<Tag>;

    // Renamed from `tags` by migration 20240403012607
    const TABLE: &'static str = "tag";
    const LABEL: &'static str = "Tag";

    fn apply(&mut self, patch: TagUpdate) {
        assign(&mut self.name, patch.name);
    }

    fn listing(record: Record<Self>) -> Self::Listing {
        record
    }
}
