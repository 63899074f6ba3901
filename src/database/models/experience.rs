use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::record::{assign, nullable, Record, Resource};

/// Work experience entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Experience {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub location: String,
    pub company: String,
    pub month_start: i32,
    pub year_start: i32,
    pub month_end: i32,
    pub year_end: i32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ExperienceUpdate {
    pub title: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    pub location: Option<String>,
    pub company: Option<String>,
    pub month_start: Option<i32>,
    pub year_start: Option<i32>,
    pub month_end: Option<i32>,
    pub year_end: Option<i32>,
}

impl Resource for Experience {
    type Patch = ExperienceUpdate;
    type Listing = Experience;

    const TABLE: &'static str = "experience";
    const LABEL: &'static str = "Experience";

    fn apply(&mut self, patch: ExperienceUpdate) {
        assign(&mut self.title, patch.title);
        assign(&mut self.description, patch.description);
        assign(&mut self.location, patch.location);
        assign(&mut self.company, patch.company);
        assign(&mut self.month_start, patch.month_start);
        assign(&mut self.year_start, patch.year_start);
        assign(&mut self.month_end, patch.month_end);
        assign(&mut self.year_end, patch.year_end);
    }

    fn listing(record: Record<Self>) -> Self::Listing {
        record.fields
    }
}
