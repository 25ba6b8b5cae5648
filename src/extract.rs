use async_trait::async_trait;
use axum::{
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::error::AppError;

/// `{tripId}` path segment, parsed before the body is touched.
#[derive(Debug, Clone, Copy)]
pub struct TripId(pub Uuid);

/// `{participantId}` path segment.
#[derive(Debug, Clone, Copy)]
pub struct ParticipantId(pub Uuid);

async fn parse_path_id<S>(parts: &mut Parts, state: &S, what: &str) -> Result<Uuid, AppError>
where
    S: Send + Sync,
{
    let invalid = || AppError::BadRequest(format!("invalid {what} id"));
    let Path(raw) = Path::<String>::from_request_parts(parts, state)
        .await
        .map_err(|_| invalid())?;
    Uuid::parse_str(&raw).map_err(|_| invalid())
}

#[async_trait]
impl<S> FromRequestParts<S> for TripId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        parse_path_id(parts, state, "trip").await.map(Self)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ParticipantId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        parse_path_id(parts, state, "participant").await.map(Self)
    }
}

/// JSON body whose decoding failures answer with the API's error shape.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(value) = axum::Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| {
                AppError::BadRequest(format!("invalid json: {}", rejection.body_text()))
            })?;
        Ok(Self(value))
    }
}
