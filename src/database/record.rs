use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use sqlx::{postgres::PgRow, FromRow, Row};

/// An owned entity family.
///
/// The implementing struct is the canonical set of writable fields. It doubles as the
/// create payload: `id` and `owner_id` are not part of it, so a client cannot set them.
/// `Patch` is the partial-update payload and `Listing` is what the public list endpoint
/// exposes for each row.
pub trait Resource:
    Clone + Serialize + DeserializeOwned + for<'r> FromRow<'r, PgRow> + Send + Sync + Unpin + 'static
{
    type Patch: DeserializeOwned + Send + 'static;
    type Listing: Serialize + Send + 'static;

    /// SQL table name
    const TABLE: &'static str;
    /// Human-readable name used in confirmation messages
    const LABEL: &'static str;

    /// Copy every field present in `patch` onto `self`, leaving the rest untouched
    fn apply(&mut self, patch: Self::Patch);

    fn listing(record: Record<Self>) -> Self::Listing;
}

/// A persisted row: server-assigned id, owner, and the entity fields flattened beside them
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record<R> {
    pub id: i32,
    pub owner_id: i32,
    #[serde(flatten)]
    pub fields: R,
}

impl<'r, R> FromRow<'r, PgRow> for Record<R>
where
    R: FromRow<'r, PgRow>,
{
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            owner_id: row.try_get("owner_id")?,
            fields: R::from_row(row)?,
        })
    }
}

/// Overwrite `slot` when the patch carried a value
pub fn assign<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

/// Deserialize a nullable patch field so that an explicit `null` becomes `Some(None)`.
/// Combined with `#[serde(default)]`, a missing key stays `None`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct Probe {
        #[serde(deserialize_with = "nullable")]
        note: Option<Option<String>>,
    }

    #[test]
    fn nullable_distinguishes_absent_from_null() {
        let absent: Probe = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.note, None);

        let cleared: Probe = serde_json::from_str(r#"{"note": null}"#).unwrap();
        assert_eq!(cleared.note, Some(None));

        let set: Probe = serde_json::from_str(r#"{"note": "x"}"#).unwrap();
        assert_eq!(set.note, Some(Some("x".to_string())));
    }

    #[test]
    fn assign_only_overwrites_present_values() {
        let mut title = "old".to_string();
        assign(&mut title, None);
        assert_eq!(title, "old");
        assign(&mut title, Some("new".to_string()));
        assert_eq!(title, "new");
    }
}
