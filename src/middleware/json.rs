use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use std::collections::HashMap;

use crate::error::ApiError;

const BODY_PREFIX: &str = "Failed to deserialize the JSON body into the target type: ";

/// `Json<T>` whose rejections come back as `ApiError` with per-field detail
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(rejection_to_error(rejection)),
        }
    }
}

fn rejection_to_error(rejection: JsonRejection) -> ApiError {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            let text = err.body_text();
            let (field, problem) = field_error(&text);
            let mut field_errors = HashMap::new();
            field_errors.insert(field, problem);
            ApiError::unprocessable_entity("Validation failed", field_errors)
        }
        JsonRejection::JsonSyntaxError(err) => ApiError::invalid_json(err.body_text()),
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::bad_request("Expected request with `Content-Type: application/json`")
        }
        other => ApiError::bad_request(other.body_text()),
    }
}

/// Pull the offending field out of a deserialization message.
///
/// Messages look like `missing field `title` at line 1 column 2` or
/// `month_start: invalid type: string "x", expected i32 at line 1 column 20`.
fn field_error(body_text: &str) -> (String, String) {
    let detail = body_text.strip_prefix(BODY_PREFIX).unwrap_or(body_text);

    if let Some(rest) = detail.strip_prefix("missing field `") {
        if let Some(end) = rest.find('`') {
            return (rest[..end].to_string(), "field required".to_string());
        }
    }

    if let Some((path, problem)) = detail.split_once(": ") {
        // A leading index means the body itself was an array, not a field inside it
        if !path.is_empty() && !path.contains(' ') && !path.starts_with('[') {
            return (path.to_string(), strip_position(problem));
        }
    }

    ("body".to_string(), strip_position(detail))
}

fn strip_position(message: &str) -> String {
    match message.rfind(" at line ") {
        Some(idx) => message[..idx].to_string(),
        None => message.to_string(),
    }
}
