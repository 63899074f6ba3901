use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::record::{assign, nullable, Record, Resource};

/// Educational background entry. The four date parts are independent integers and are
/// not checked against each other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Education {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub location: String,
    pub school: String,
    pub month_start: i32,
    pub year_start: i32,
    pub month_end: i32,
    pub year_end: i32,
    pub percentage: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EducationUpdate {
    pub title: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    pub location: Option<String>,
    pub school: Option<String>,
    pub month_start: Option<i32>,
    pub year_start: Option<i32>,
    pub month_end: Option<i32>,
    pub year_end: Option<i32>,
    pub percentage: Option<f64>,
}

impl Resource for Education {
    type Patch = EducationUpdate;
    // The public listing is the bare field set, without id or owner
    type Listing = Education;

    const TABLE: &'static str = "education";
    const LABEL: &'static str = "Education";

    fn apply(&mut self, patch: EducationUpdate) {
        assign(&mut self.title, patch.title);
        assign(&mut self.description, patch.description);
        assign(&mut self.location, patch.location);
        assign(&mut self.school, patch.school);
        assign(&mut self.month_start, patch.month_start);
        assign(&mut self.year_start, patch.year_start);
        assign(&mut self.month_end, patch.month_end);
        assign(&mut self.year_end, patch.year_end);
        assign(&mut self.percentage, patch.percentage);
    }

    fn listing(record: Record<Self>) -> Self::Listing {
        record.fields
    }
}
