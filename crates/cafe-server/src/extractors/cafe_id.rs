//! Cafe id extractor for `/{id}` routes

use crate::error::ApiError;
use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

/// Numeric cafe id taken from the path.
///
/// A segment that is not an integer can never name a stored cafe, so it is
/// rejected as not found rather than as a bad request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CafeId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for CafeId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::CafeNotFound)?;

        parse_cafe_id(&raw).ok_or(ApiError::CafeNotFound)
    }
}

fn parse_cafe_id(raw: &str) -> Option<CafeId> {
    // Unsigned digits only, like a route's <int:id> converter
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok().map(CafeId)
}
