use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde_json::Value;

use crate::{
    error::AppError,
    models::{SchemaViolation, Shape},
};

/// JSON body validated by the schema layer
///
/// Unlike `axum::Json`, every failure (unreadable body, invalid JSON, shape
/// mismatch) is reported as `AppError::InvalidRequest` naming the field.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: Shape + Send + 'static,
{
    type Rejection = AppError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(request, state).await.map_err(|e| {
            AppError::InvalidRequest(SchemaViolation::new("$", format!("readable body ({e})")))
        })?;

        let value: Value = serde_json::from_slice(&bytes).map_err(|e| {
            AppError::InvalidRequest(SchemaViolation::new("$", format!("JSON object ({e})")))
        })?;

        T::from_value(&value)
            .map(ValidatedJson)
            .map_err(AppError::InvalidRequest)
    }
}
