use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    error::{AppError, StoreResultExt},
    extract::{JsonBody, TripId},
    models::{NewTrip, Trip, TripStatus, TripUpdate},
    state::AppState,
    validation,
};

use super::{load_trip, TRIP_NOT_FOUND};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/trips", post(create_trip))
        .route("/trips/:trip_id", get(get_trip).put(update_trip))
        .route("/trips/:trip_id/confirm", get(confirm_trip))
}

#[derive(Debug, Deserialize)]
pub struct CreateTripRequest {
    pub destination: String,
    pub owner_name: String,
    pub owner_email: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    #[serde(default)]
    pub emails_to_invite: Vec<String>,
}

impl CreateTripRequest {
    fn validate(self) -> Result<NewTrip, AppError> {
        validation::date_range(self.starts_at, self.ends_at)?;
        Ok(NewTrip {
            destination: validation::required_text("destination", &self.destination)?,
            owner_name: validation::required_text("owner_name", &self.owner_name)?,
            owner_email: validation::email("owner_email", &self.owner_email)?,
            starts_at: self.starts_at,
            ends_at: self.ends_at,
            emails_to_invite: validation::distinct_emails("emails_to_invite", &self.emails_to_invite)?,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateTripResponse {
    pub trip_id: Uuid,
}

#[instrument(skip_all)]
async fn create_trip(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateTripRequest>,
) -> Result<(StatusCode, Json<CreateTripResponse>), AppError> {
    let trip = body.validate()?;
    let trip_id = state.store.create_trip(&trip).await?;
    info!(trip_id = %trip_id, invited = trip.emails_to_invite.len(), "trip created");

    state.notifier.confirm_trip_to_owner(trip_id);

    Ok((StatusCode::CREATED, Json(CreateTripResponse { trip_id })))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TripDetail {
    pub id: Uuid,
    pub destination: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub is_confirmed: bool,
}

impl From<Trip> for TripDetail {
    fn from(trip: Trip) -> Self {
        Self {
            id: trip.id,
            destination: trip.destination,
            starts_at: trip.starts_at,
            ends_at: trip.ends_at,
            is_confirmed: trip.is_confirmed,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TripDetailResponse {
    pub trip: TripDetail,
}

#[instrument(skip_all, fields(trip_id = %trip_id.0))]
async fn get_trip(
    State(state): State<AppState>,
    trip_id: TripId,
) -> Result<Json<TripDetailResponse>, AppError> {
    let trip = load_trip(&state, trip_id.0).await?;
    Ok(Json(TripDetailResponse { trip: trip.into() }))
}

#[derive(Debug, Deserialize)]
pub struct UpdateTripRequest {
    pub destination: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

impl UpdateTripRequest {
    fn validate(self) -> Result<TripUpdate, AppError> {
        validation::date_range(self.starts_at, self.ends_at)?;
        Ok(TripUpdate {
            destination: validation::required_text("destination", &self.destination)?,
            starts_at: self.starts_at,
            ends_at: self.ends_at,
        })
    }
}

#[instrument(skip_all, fields(trip_id = %trip_id.0))]
async fn update_trip(
    State(state): State<AppState>,
    trip_id: TripId,
    JsonBody(body): JsonBody<UpdateTripRequest>,
) -> Result<StatusCode, AppError> {
    let update = body.validate()?;
    load_trip(&state, trip_id.0).await?;
    state
        .store
        .update_trip(trip_id.0, &update)
        .await
        .or_not_found(TRIP_NOT_FOUND)?;
    Ok(StatusCode::NO_CONTENT)
}

// Participants are not emailed on confirmation yet; only the owner gets mail,
// at creation time.
#[instrument(skip_all, fields(trip_id = %trip_id.0))]
async fn confirm_trip(
    State(state): State<AppState>,
    trip_id: TripId,
) -> Result<StatusCode, AppError> {
    let trip = load_trip(&state, trip_id.0).await?;
    if trip.status() == TripStatus::Confirmed {
        return Err(AppError::Conflict("trip already confirmed".into()));
    }
    state.store.confirm_trip(trip.id).await?;
    info!("trip confirmed");
    Ok(StatusCode::NO_CONTENT)
}
