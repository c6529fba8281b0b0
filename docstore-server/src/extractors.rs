use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;

use crate::errors::ApiError;
use docstore_core::CoreError;

/// A `Json<T>` extractor whose every rejection (missing/invalid
/// `Content-Type`, malformed JSON) becomes `invalid_body`/400. Plain
/// `axum::Json` would instead surface a 415 for a missing content type,
/// which callers shouldn't have to distinguish from a malformed body.
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ValidJson(value)),
            Err(_) => Err(ApiError(CoreError::InvalidBody)),
        }
    }
}
