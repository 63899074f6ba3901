use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::record::{assign, nullable, Record, Resource};

/// A simple note record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Item {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ItemUpdate {
    pub title: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
}

impl Resource for Item {
    type Patch = ItemUpdate;
    type Listing = Record<Item>;

    const TABLE: &'static str = "item";
    const LABEL: &'static str = "Item";

    fn apply(&mut self, patch: ItemUpdate) {
        assign(&mut self.title, patch.title);
        assign(&mut self.description, patch.description);
    }

    fn listing(record: Record<Self>) -> Self::Listing {
        record
    }
}
