pub mod activities;
pub mod links;
pub mod participants;
pub mod trips;


use axum::Router;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::{
    error::{AppError, StoreResultExt},
    models::Trip,
    state::AppState,
};

pub const TRIP_NOT_FOUND: &str = "trip not found";
pub const PARTICIPANT_NOT_FOUND: &str = "participant not found";

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(trips::router())
        .merge(participants::router())
        .merge(activities::router())
        .merge(links::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Every trip-scoped endpoint goes through here before touching children.
async fn load_trip(state: &AppState, trip_id: Uuid) -> Result<Trip, AppError> {
    state.store.get_trip(trip_id).await.or_not_found(TRIP_NOT_FOUND)
}
