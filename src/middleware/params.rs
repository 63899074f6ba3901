use axum::{
    async_trait,
    extract::{
        path::ErrorKind,
        rejection::{PathRejection, QueryRejection},
        FromRequestParts, Path, Query,
    },
    http::{request::Parts, Uri},
};
use serde::de::DeserializeOwned;
use std::collections::HashMap;

use crate::error::ApiError;

const QUERY_PREFIX: &str = "Failed to deserialize query string: ";

/// `Path<T>` whose rejections come back as `ApiError` naming the bad segment
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedPath<T>(pub T);

/// `Query<T>` whose rejections come back as `ApiError` naming the bad parameter
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ValidatedPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(Self(value)),
            Err(rejection) => Err(path_rejection_to_error(rejection)),
        }
    }
}

#[async_trait]
impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::try_from_uri(&parts.uri) {
            Ok(Query(value)) => Ok(Self(value)),
            Err(QueryRejection::FailedToDeserializeQueryString(err)) => {
                let text = err.body_text();
                let problem = text.strip_prefix(QUERY_PREFIX).unwrap_or(&text).to_string();
                let field = offending_parameter::<T>(&parts.uri).unwrap_or_else(|| "query".to_string());
                Err(unprocessable(field, problem))
            }
            Err(other) => Err(ApiError::bad_request(other.body_text())),
        }
    }
}

fn path_rejection_to_error(rejection: PathRejection) -> ApiError {
    match rejection {
        PathRejection::FailedToDeserializePathParams(err) => {
            let (field, problem) = match err.kind() {
                ErrorKind::ParseErrorAtKey { key, value, expected_type } => {
                    (key.clone(), format!("cannot parse `{}` as {}", value, expected_type))
                }
                ErrorKind::InvalidUtf8InPathParam { key } => (key.clone(), "invalid UTF-8".to_string()),
                _ => ("path".to_string(), err.body_text()),
            };
            unprocessable(field, problem)
        }
        other => {
            tracing::error!("Path extraction failed: {}", other.body_text());
            ApiError::internal_server_error("An error occurred while processing your request")
        }
    }
}

/// The first `key=value` pair that fails to deserialize on its own.
///
/// The urlencoded deserializer does not report which key was bad, so each pair is retried alone.
/// Works for query types whose fields all have defaults.
fn offending_parameter<T: DeserializeOwned>(uri: &Uri) -> Option<String> {
    uri.query()?.split('&').find_map(|pair| {
        let single: Uri = format!("/?{}", pair).parse().ok()?;
        match Query::<T>::try_from_uri(&single) {
            Ok(_) => None,
            Err(_) => Some(pair.split('=').next().unwrap_or(pair).to_string()),
        }
    })
}

fn unprocessable(field: String, problem: String) -> ApiError {
    let mut field_errors = HashMap::new();
    field_errors.insert(field, problem);
    ApiError::unprocessable_entity("Validation failed", field_errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Paging {
        #[serde(default)]
        user_id: i32,
        #[serde(default)]
        limit: i64,
    }

    #[test]
    fn finds_the_bad_parameter() {
        let uri: Uri = "/list?limit=10&user_id=abc".parse().unwrap();
        assert_eq!(offending_parameter::<Paging>(&uri).as_deref(), Some("user_id"));
    }

    #[test]
    fn overflow_is_blamed_on_its_key() {
        let uri: Uri = "/list?user_id=99999999999".parse().unwrap();
        assert_eq!(offending_parameter::<Paging>(&uri).as_deref(), Some("user_id"));
    }

    #[test]
    fn valid_query_blames_nothing() {
        let uri: Uri = "/list?user_id=1&limit=5".parse().unwrap();
        assert_eq!(offending_parameter::<Paging>(&uri), None);
    }

    #[tokio::test]
    async fn query_errors_are_unprocessable() {
        let request = axum::http::Request::builder()
            .uri("/list?user_id=abc")
            .body(())
            .unwrap();
        let (mut parts, _) = request.into_parts();

        let err = ValidatedQuery::<Paging>::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert_eq!(err.status_code(), 422);
        assert!(err.to_json()["field_errors"]["user_id"].is_string());
    }
}
