use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    error::{AppError, StoreResultExt},
    extract::{JsonBody, ParticipantId, TripId},
    models::{Participant, ParticipantStatus},
    state::AppState,
    validation,
};

use super::{load_trip, PARTICIPANT_NOT_FOUND};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/trips/:trip_id/invites", post(invite_participant))
        .route("/trips/:trip_id/participants", get(list_participants))
        .route(
            "/participants/:participant_id/confirm",
            patch(confirm_participant),
        )
}

#[derive(Debug, Deserialize)]
pub struct InviteParticipantRequest {
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InviteParticipantResponse {
    pub participant_id: Uuid,
}

#[instrument(skip_all, fields(trip_id = %trip_id.0))]
async fn invite_participant(
    State(state): State<AppState>,
    trip_id: TripId,
    JsonBody(body): JsonBody<InviteParticipantRequest>,
) -> Result<(StatusCode, Json<InviteParticipantResponse>), AppError> {
    let email = validation::email("email", &body.email)?;
    let trip = load_trip(&state, trip_id.0).await?;

    let participant_id = state
        .store
        .invite_participant_to_trip(trip.id, &email)
        .await
        .or_conflict("participant already invited")?;
    info!(participant_id = %participant_id, "participant invited");

    Ok((
        StatusCode::CREATED,
        Json(InviteParticipantResponse { participant_id }),
    ))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ParticipantItem {
    pub id: Uuid,
    pub email: String,
    pub is_confirmed: bool,
}

impl From<Participant> for ParticipantItem {
    fn from(participant: Participant) -> Self {
        Self {
            id: participant.id,
            email: participant.email,
            is_confirmed: participant.is_confirmed,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ParticipantsResponse {
    pub participants: Vec<ParticipantItem>,
}

#[instrument(skip_all, fields(trip_id = %trip_id.0))]
async fn list_participants(
    State(state): State<AppState>,
    trip_id: TripId,
) -> Result<Json<ParticipantsResponse>, AppError> {
    let trip = load_trip(&state, trip_id.0).await?;
    let participants = state.store.get_participants(trip.id).await?;
    Ok(Json(ParticipantsResponse {
        participants: participants.into_iter().map(Into::into).collect(),
    }))
}

#[instrument(skip_all, fields(participant_id = %participant_id.0))]
async fn confirm_participant(
    State(state): State<AppState>,
    participant_id: ParticipantId,
) -> Result<StatusCode, AppError> {
    let participant = state
        .store
        .get_participant(participant_id.0)
        .await
        .or_not_found(PARTICIPANT_NOT_FOUND)?;
    if participant.status() == ParticipantStatus::Confirmed {
        return Err(AppError::Conflict("participant already confirmed".into()));
    }
    state.store.confirm_participant(participant.id).await?;
    info!("participant confirmed");
    Ok(StatusCode::NO_CONTENT)
}
