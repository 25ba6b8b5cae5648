use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    error::AppError,
    extract::{JsonBody, TripId},
    models::{group_by_date, Activity, ActivityDay, NewActivity},
    state::AppState,
    validation,
};

use super::load_trip;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/trips/:trip_id/activities",
        get(list_activities).post(create_activity),
    )
}

#[derive(Debug, Deserialize)]
pub struct CreateActivityRequest {
    pub title: String,
    pub occurs_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateActivityResponse {
    pub activity_id: Uuid,
}

#[instrument(skip_all, fields(trip_id = %trip_id.0))]
async fn create_activity(
    State(state): State<AppState>,
    trip_id: TripId,
    JsonBody(body): JsonBody<CreateActivityRequest>,
) -> Result<(StatusCode, Json<CreateActivityResponse>), AppError> {
    let title = validation::required_text("title", &body.title)?;
    let trip = load_trip(&state, trip_id.0).await?;
    if !trip.covers_date(body.occurs_at.date_naive()) {
        return Err(AppError::invalid_input(
            "occurs_at: must fall within the trip dates",
        ));
    }

    let activity_id = state
        .store
        .create_activity(&NewActivity {
            trip_id: trip.id,
            title,
            occurs_at: body.occurs_at,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateActivityResponse { activity_id }),
    ))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ActivityItem {
    pub id: Uuid,
    pub title: String,
    pub occurs_at: DateTime<Utc>,
}

impl From<Activity> for ActivityItem {
    fn from(activity: Activity) -> Self {
        Self {
            id: activity.id,
            title: activity.title,
            occurs_at: activity.occurs_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ActivityDayItem {
    /// Midnight UTC of the day the activities fall on.
    pub date: DateTime<Utc>,
    pub activities: Vec<ActivityItem>,
}

impl From<ActivityDay> for ActivityDayItem {
    fn from(day: ActivityDay) -> Self {
        Self {
            date: day.date.and_time(NaiveTime::MIN).and_utc(),
            activities: day.activities.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ActivitiesResponse {
    pub activities: Vec<ActivityDayItem>,
}

#[instrument(skip_all, fields(trip_id = %trip_id.0))]
async fn list_activities(
    State(state): State<AppState>,
    trip_id: TripId,
) -> Result<Json<ActivitiesResponse>, AppError> {
    let trip = load_trip(&state, trip_id.0).await?;
    let activities = state.store.get_trip_activities(trip.id).await?;
    Ok(Json(ActivitiesResponse {
        activities: group_by_date(activities)
            .into_iter()
            .map(Into::into)
            .collect(),
    }))
}
