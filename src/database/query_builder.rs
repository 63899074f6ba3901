use serde::Serialize;
use serde_json::Value;
use sqlx::{self, postgres::PgArguments, FromRow};

use crate::database::manager::DatabaseError;

/// Column/value pairs taken from a serialized entity, in a stable order
#[derive(Debug, Clone)]
pub struct ColumnValues {
    pub columns: Vec<String>,
    pub values: Vec<Value>,
}

impl ColumnValues {
    /// Flatten an entity into scalar columns. Nested objects and arrays are rejected
    /// because no owned table stores them.
    pub fn from_entity<T: Serialize>(entity: &T) -> Result<Self, DatabaseError> {
        let value = serde_json::to_value(entity)
            .map_err(|e| DatabaseError::QueryError(format!("failed to serialize entity: {}", e)))?;

        let Value::Object(map) = value else {
            return Err(DatabaseError::QueryError("entity must serialize to an object".to_string()));
        };

        let mut columns = Vec::with_capacity(map.len());
        let mut values = Vec::with_capacity(map.len());
        for (column, value) in map {
            validate_identifier(&column)?;
            if value.is_array() || value.is_object() {
                return Err(DatabaseError::QueryError(format!("column '{}' is not a scalar", column)));
            }
            columns.push(column);
            values.push(value);
        }

        Ok(Self { columns, values })
    }
}

/// SQL text for the fixed set of statements an owned table needs
pub struct QueryBuilder {
    table_name: String,
}

impl QueryBuilder {
    pub fn new(table_name: impl Into<String>) -> Result<Self, DatabaseError> {
        let table_name = table_name.into();
        validate_identifier(&table_name)?;
        Ok(Self { table_name })
    }

    /// `$1` is the owner id, entity columns follow from `$2`
    pub fn insert(&self, columns: &[String]) -> String {
        let names = std::iter::once("\"owner_id\"".to_string())
            .chain(columns.iter().map(|c| quote_identifier(c)))
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = (1..=columns.len() + 1)
            .map(|i| format!("${}", i))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING *",
            quote_identifier(&self.table_name),
            names,
            placeholders
        )
    }

    pub fn select_by_id(&self) -> String {
        format!("SELECT * FROM {} WHERE \"id\" = $1", quote_identifier(&self.table_name))
    }

    /// `$1` owner id, `$2` offset, `$3` limit
    pub fn select_by_owner(&self) -> String {
        format!(
            "SELECT * FROM {} WHERE \"owner_id\" = $1 ORDER BY \"id\" OFFSET $2 LIMIT $3",
            quote_identifier(&self.table_name)
        )
    }

    /// `$1` is the row id, entity columns follow from `$2`
    pub fn update_by_id(&self, columns: &[String]) -> String {
        let assignments = columns
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{} = ${}", quote_identifier(c), i + 2))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "UPDATE {} SET {} WHERE \"id\" = $1 RETURNING *",
            quote_identifier(&self.table_name),
            assignments
        )
    }

    pub fn delete_by_id(&self) -> String {
        format!("DELETE FROM {} WHERE \"id\" = $1", quote_identifier(&self.table_name))
    }
}

/// Quote SQL identifier to prevent injection
fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn validate_identifier(name: &str) -> Result<(), DatabaseError> {
    let valid = !name.is_empty()
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !name.starts_with(|c: char| c.is_ascii_digit());
    if valid {
        Ok(())
    } else {
        Err(DatabaseError::QueryError(format!("invalid identifier '{}'", name)))
    }
}

pub fn bind_param_query_as<'q, O>(
    q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>,
    v: &'q Value,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, sqlx::postgres::PgRow>,
{
    match v {
        Value::Null => {
            // Only text columns are nullable
            let none: Option<String> = None;
            q.bind(none)
        }
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(u) = n.as_u64() {
                // Postgres doesn't have u64; cast down if safe
                q.bind(u as i64)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s),
        // Rejected by ColumnValues::from_entity
        Value::Array(_) | Value::Object(_) => q,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn insert_numbers_owner_first() {
        let qb = QueryBuilder::new("education").unwrap();
        let sql = qb.insert(&["title".to_string(), "school".to_string()]);
        assert_eq!(
            sql,
            "INSERT INTO \"education\" (\"owner_id\", \"title\", \"school\") VALUES ($1, $2, $3) RETURNING *"
        );
    }

    #[test]
    fn update_starts_columns_at_two() {
        let qb = QueryBuilder::new("tag").unwrap();
        let sql = qb.update_by_id(&["name".to_string()]);
        assert_eq!(sql, "UPDATE \"tag\" SET \"name\" = $2 WHERE \"id\" = $1 RETURNING *");
    }

    #[test]
    fn user_table_is_quoted() {
        let qb = QueryBuilder::new("user").unwrap();
        assert_eq!(qb.select_by_id(), "SELECT * FROM \"user\" WHERE \"id\" = $1");
    }

    #[test]
    fn rejects_bad_identifiers() {
        assert!(QueryBuilder::new("item; DROP TABLE user").is_err());
        assert!(QueryBuilder::new("").is_err());
        assert!(QueryBuilder::new("1item").is_err());
    }

    #[test]
    fn column_values_reject_nested_data() {
        let err = ColumnValues::from_entity(&json!({ "name": "x", "tags": ["a"] }));
        assert!(err.is_err());

        let ok = ColumnValues::from_entity(&json!({ "name": "x", "description": null })).unwrap();
        assert_eq!(ok.columns.len(), 2);
        assert_eq!(ok.columns.len(), ok.values.len());
    }
}
