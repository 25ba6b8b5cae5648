use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    error::StoreError,
    models::{Activity, Link, NewActivity, NewLink, NewTrip, Participant, Trip, TripUpdate},
};

/// Persistence capability consumed by the request handlers and the mailer.
///
/// Reads of a single row report [`StoreError::NotFound`] when nothing
/// matches. Confirmation writes are unconditional; the "already confirmed"
/// guard belongs to the caller.
#[async_trait]
pub trait Store: Send + Sync {
    /// Inserts the trip and one participant per invited email atomically.
    async fn create_trip(&self, trip: &NewTrip) -> Result<Uuid, StoreError>;
    async fn get_trip(&self, id: Uuid) -> Result<Trip, StoreError>;
    async fn update_trip(&self, id: Uuid, update: &TripUpdate) -> Result<(), StoreError>;
    async fn confirm_trip(&self, id: Uuid) -> Result<(), StoreError>;

    async fn confirm_participant(&self, id: Uuid) -> Result<(), StoreError>;
    async fn invite_participant_to_trip(
        &self,
        trip_id: Uuid,
        email: &str,
    ) -> Result<Uuid, StoreError>;
    async fn get_participant(&self, id: Uuid) -> Result<Participant, StoreError>;
    async fn get_participants(&self, trip_id: Uuid) -> Result<Vec<Participant>, StoreError>;

    async fn create_activity(&self, activity: &NewActivity) -> Result<Uuid, StoreError>;
    async fn get_trip_activities(&self, trip_id: Uuid) -> Result<Vec<Activity>, StoreError>;

    async fn create_trip_link(&self, link: &NewLink) -> Result<Uuid, StoreError>;
    async fn get_trip_links(&self, trip_id: Uuid) -> Result<Vec<Link>, StoreError>;
}

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn create_trip(&self, trip: &NewTrip) -> Result<Uuid, StoreError> {
        let trip_id = Uuid::new_v4();
        // Dropping `tx` before commit rolls everything back.
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO trips (id, destination, owner_name, owner_email, starts_at, ends_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(trip_id)
        .bind(&trip.destination)
        .bind(&trip.owner_name)
        .bind(&trip.owner_email)
        .bind(trip.starts_at)
        .bind(trip.ends_at)
        .execute(&mut *tx)
        .await?;

        for email in &trip.emails_to_invite {
            sqlx::query("INSERT INTO participants (id, trip_id, email) VALUES (?1, ?2, ?3)")
                .bind(Uuid::new_v4())
                .bind(trip_id)
                .bind(email)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(trip_id)
    }

    async fn get_trip(&self, id: Uuid) -> Result<Trip, StoreError> {
        let trip = sqlx::query_as::<_, Trip>(
            "SELECT id, destination, owner_name, owner_email, starts_at, ends_at, is_confirmed \
             FROM trips WHERE id = ?1",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(trip)
    }

    async fn update_trip(&self, id: Uuid, update: &TripUpdate) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE trips SET destination = ?1, starts_at = ?2, ends_at = ?3 WHERE id = ?4",
        )
        .bind(&update.destination)
        .bind(update.starts_at)
        .bind(update.ends_at)
        .bind(id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn confirm_trip(&self, id: Uuid) -> Result<(), StoreError> {
        sqlx::query("UPDATE trips SET is_confirmed = TRUE WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn confirm_participant(&self, id: Uuid) -> Result<(), StoreError> {
        sqlx::query("UPDATE participants SET is_confirmed = TRUE WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn invite_participant_to_trip(
        &self,
        trip_id: Uuid,
        email: &str,
    ) -> Result<Uuid, StoreError> {
        let id = Uuid::new_v4();
        sqlx::query("INSERT INTO participants (id, trip_id, email) VALUES (?1, ?2, ?3)")
            .bind(id)
            .bind(trip_id)
            .bind(email)
            .execute(&self.pool)
            .await?;
        Ok(id)
    }

    async fn get_participant(&self, id: Uuid) -> Result<Participant, StoreError> {
        let participant = sqlx::query_as::<_, Participant>(
            "SELECT id, trip_id, email, is_confirmed FROM participants WHERE id = ?1",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(participant)
    }

    async fn get_participants(&self, trip_id: Uuid) -> Result<Vec<Participant>, StoreError> {
        let participants = sqlx::query_as::<_, Participant>(
            "SELECT id, trip_id, email, is_confirmed FROM participants \
             WHERE trip_id = ?1 ORDER BY email",
        )
        .bind(trip_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(participants)
    }

    async fn create_activity(&self, activity: &NewActivity) -> Result<Uuid, StoreError> {
        let id = Uuid::new_v4();
        sqlx::query("INSERT INTO activities (id, trip_id, title, occurs_at) VALUES (?1, ?2, ?3, ?4)")
            .bind(id)
            .bind(activity.trip_id)
            .bind(&activity.title)
            .bind(activity.occurs_at)
            .execute(&self.pool)
            .await?;
        Ok(id)
    }

    async fn get_trip_activities(&self, trip_id: Uuid) -> Result<Vec<Activity>, StoreError> {
        let activities = sqlx::query_as::<_, Activity>(
            "SELECT id, trip_id, title, occurs_at FROM activities \
             WHERE trip_id = ?1 ORDER BY occurs_at",
        )
        .bind(trip_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(activities)
    }

    async fn create_trip_link(&self, link: &NewLink) -> Result<Uuid, StoreError> {
        let id = Uuid::new_v4();
        sqlx::query("INSERT INTO links (id, trip_id, title, url) VALUES (?1, ?2, ?3, ?4)")
            .bind(id)
            .bind(link.trip_id)
            .bind(&link.title)
            .bind(&link.url)
            .execute(&self.pool)
            .await?;
        Ok(id)
    }

    async fn get_trip_links(&self, trip_id: Uuid) -> Result<Vec<Link>, StoreError> {
        let links = sqlx::query_as::<_, Link>(
            "SELECT id, trip_id, title, url FROM links WHERE trip_id = ?1 ORDER BY title",
        )
        .bind(trip_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(links)
    }
}
