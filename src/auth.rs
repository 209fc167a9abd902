//! Viewer identity. The identity layer issues an opaque user id which
//! clients send as `Authorization: Bearer <uuid>`.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;
use uuid::Uuid;

use crate::error::AppError;

async fn bearer_user<S: Send + Sync>(parts: &mut Parts, state: &S) -> Option<Uuid> {
    let TypedHeader(Authorization(bearer)) =
        TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
            .await
            .ok()?;
    bearer.token().parse().ok()
}

/// An authenticated viewer; rejects the request with 401 otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewer(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for Viewer
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        bearer_user(parts, state)
            .await
            .map(Viewer)
            .ok_or(AppError::Unauthorized("Authentication required"))
    }
}

/// The viewer when the request carries a valid identity, `None` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaybeViewer(pub Option<Uuid>);

#[async_trait]
impl<S> FromRequestParts<S> for MaybeViewer
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeViewer(bearer_user(parts, state).await))
    }
}
