//! JSON body extraction with declarative `garde` validation.

use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::error::AppError;

/// JSON body that has passed its `garde` rules.
///
/// Malformed bodies become `AppError::BadRequest`; rule violations become
/// `AppError::Validation` with one `{field, error}` entry per violation.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + garde::Validate,
    T::Context: Default,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::bad_request(rejection.body_text()))?;

        value.validate().map_err(|report| report_to_error(&report))?;

        Ok(Self(value))
    }
}

fn report_to_error(report: &garde::Report) -> AppError {
    let details = report
        .iter()
        .map(|(path, error)| {
            let field = path.to_string();
            json!({
                "field": if field.is_empty() { "value".to_string() } else { field },
                "error": error.message(),
            })
        })
        .collect();

    AppError::validation(details, "request validation failed")
}

/// Rejects an empty or whitespace-only string.
///
/// Pair with `#[serde(default)]` so a missing field fails here too.
pub fn not_blank(value: &str, _ctx: &()) -> garde::Result {
    if value.trim().is_empty() {
        return Err(garde::Error::new("must not be blank"));
    }
    Ok(())
}
