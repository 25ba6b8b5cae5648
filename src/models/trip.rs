use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Trip {
    pub id: Uuid,
    pub destination: String,
    pub owner_name: String,
    pub owner_email: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub is_confirmed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripStatus {
    Draft,
    Confirmed,
}

impl Trip {
    pub fn status(&self) -> TripStatus {
        if self.is_confirmed {
            TripStatus::Confirmed
        } else {
            TripStatus::Draft
        }
    }

    /// Whether `date` lies within the trip's calendar days, both ends included.
    pub fn covers_date(&self, date: NaiveDate) -> bool {
        self.starts_at.date_naive() <= date && date <= self.ends_at.date_naive()
    }
}

/// A trip together with the people invited at creation time.
#[derive(Debug, Clone)]
pub struct NewTrip {
    pub destination: String,
    pub owner_name: String,
    pub owner_email: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub emails_to_invite: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct TripUpdate {
    pub destination: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}
