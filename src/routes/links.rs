use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    error::AppError,
    extract::{JsonBody, TripId},
    models::{Link, NewLink},
    state::AppState,
    validation,
};

use super::load_trip;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/trips/:trip_id/links",
        get(list_links).post(create_link),
    )
}

#[derive(Debug, Deserialize)]
pub struct CreateLinkRequest {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateLinkResponse {
    pub link_id: Uuid,
}

#[instrument(skip_all, fields(trip_id = %trip_id.0))]
async fn create_link(
    State(state): State<AppState>,
    trip_id: TripId,
    JsonBody(body): JsonBody<CreateLinkRequest>,
) -> Result<(StatusCode, Json<CreateLinkResponse>), AppError> {
    let title = validation::required_text("title", &body.title)?;
    let url = validation::http_url("url", &body.url)?;
    let trip = load_trip(&state, trip_id.0).await?;

    let link_id = state
        .store
        .create_trip_link(&NewLink {
            trip_id: trip.id,
            title,
            url,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(CreateLinkResponse { link_id })))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LinkItem {
    pub id: Uuid,
    pub title: String,
    pub url: String,
}

impl From<Link> for LinkItem {
    fn from(link: Link) -> Self {
        Self {
            id: link.id,
            title: link.title,
            url: link.url,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LinksResponse {
    pub links: Vec<LinkItem>,
}

#[instrument(skip_all, fields(trip_id = %trip_id.0))]
async fn list_links(
    State(state): State<AppState>,
    trip_id: TripId,
) -> Result<Json<LinksResponse>, AppError> {
    let trip = load_trip(&state, trip_id.0).await?;
    let links = state.store.get_trip_links(trip.id).await?;
    Ok(Json(LinksResponse {
        links: links.into_iter().map(Into::into).collect(),
    }))
}
