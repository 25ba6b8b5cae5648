use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Participant {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub email: String,
    pub is_confirmed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticipantStatus {
    Invited,
    Confirmed,
}

impl Participant {
    pub fn status(&self) -> ParticipantStatus {
        if self.is_confirmed {
            ParticipantStatus::Confirmed
        } else {
            ParticipantStatus::Invited
        }
    }
}
