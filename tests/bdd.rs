use std::{fmt, fs::File, sync::Arc};

use anyhow::Context;
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use cucumber::{given, then, when, World as _};
use journey::{
    db::{init_pool, migrate, DbPool},
    error::MailError,
    routes::create_router,
    services::{mailer::Mailer, notifier::Notifier, store::SqliteStore},
    state::AppState,
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

#[derive(Debug, cucumber::World, Default)]
struct TripWorld {
    state: Option<TestState>,
    trip_id: Option<String>,
    response: Option<(StatusCode, Value)>,
}

impl TripWorld {
    fn state(&self) -> &TestState {
        self.state.as_ref().expect("state must be initialised first")
    }

    fn trip_id(&self) -> &str {
        self.trip_id.as_deref().expect("a trip must be created first")
    }

    fn response(&self) -> &(StatusCode, Value) {
        self.response.as_ref().expect("a request must be sent first")
    }

    async fn send(&mut self, method: Method, uri: &str, body: Option<Value>) -> &(StatusCode, Value) {
        let response = self.state().send(method, uri, body).await;
        self.response.insert(response)
    }

    async fn participant_id(&self, email: &str) -> String {
        let uri = format!("/trips/{}/participants", self.trip_id());
        let (_, body) = self.state().send(Method::GET, &uri, None).await;
        body["participants"]
            .as_array()
            .expect("participants list")
            .iter()
            .find(|p| p["email"] == email)
            .and_then(|p| p["id"].as_str())
            .expect("participant must exist")
            .to_string()
    }
}

/// Accepts every delivery without sending anything.
struct NullMailer;

#[async_trait]
impl Mailer for NullMailer {
    async fn send_confirm_trip_email_to_trip_owner(&self, _trip_id: Uuid) -> Result<(), MailError> {
        Ok(())
    }
}

struct TestState {
    app: Router,
    db: DbPool,
    _root: TempDir,
}

impl fmt::Debug for TestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestState").finish()
    }
}

impl TestState {
    async fn new() -> anyhow::Result<Self> {
        let root = TempDir::new().context("create temp dir for bdd world")?;
        let db_path = root.path().join("bdd.sqlite");
        File::create(&db_path)?;

        let database_url = format!("sqlite://{}", db_path.to_string_lossy());
        let db = init_pool(&database_url).await?;
        migrate(&db).await?;

        let store = Arc::new(SqliteStore::new(db.clone()));
        let notifier = Notifier::spawn(Arc::new(NullMailer));
        let app = create_router(AppState::new(store, notifier));
        Ok(Self {
            app,
            db,
            _root: root,
        })
    }

    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");
        let response = self.app.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, value)
    }

    async fn count(&self, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.db)
            .await
            .expect("count rows")
    }
}

fn trip_payload(destination: &str, starts_at: &str, ends_at: &str, invitees: &str) -> Value {
    let emails: Vec<&str> = invitees
        .split(',')
        .map(str::trim)
        .filter(|email| !email.is_empty())
        .collect();
    json!({
        "destination": destination,
        "owner_name": "Ana",
        "owner_email": "ana@x.com",
        "starts_at": starts_at,
        "ends_at": ends_at,
        "emails_to_invite": emails,
    })
}

#[given("a fresh application state")]
async fn given_fresh_state(world: &mut TripWorld) {
    world.state = Some(TestState::new().await.expect("state"));
    world.trip_id = None;
    world.response = None;
}

#[given(regex = r#"^a trip to \"([^\"]+)\" inviting \"([^\"]*)\"$"#)]
async fn given_trip(world: &mut TripWorld, destination: String, invitees: String) {
    create_trip(
        world,
        trip_payload(&destination, "2025-01-10T00:00:00Z", "2025-01-15T00:00:00Z", &invitees),
    )
    .await;
    assert_eq!(world.response().0, StatusCode::CREATED);
}

#[when(
    regex = r#"^I create a trip to \"([^\"]+)\" from \"([^\"]+)\" to \"([^\"]+)\" inviting \"([^\"]*)\"$"#
)]
async fn when_create_trip(
    world: &mut TripWorld,
    destination: String,
    starts_at: String,
    ends_at: String,
    invitees: String,
) {
    create_trip(world, trip_payload(&destination, &starts_at, &ends_at, &invitees)).await;
}

#[when("I confirm the trip")]
async fn when_confirm_trip(world: &mut TripWorld) {
    let uri = format!("/trips/{}/confirm", world.trip_id());
    world.send(Method::GET, &uri, None).await;
}

#[when(regex = r#"^participant \"([^\"]+)\" confirms$"#)]
async fn when_participant_confirms(world: &mut TripWorld, email: String) {
    let participant_id = world.participant_id(&email).await;
    let uri = format!("/participants/{participant_id}/confirm");
    world.send(Method::PATCH, &uri, None).await;
}

#[when("an unknown participant confirms")]
async fn when_unknown_participant_confirms(world: &mut TripWorld) {
    let uri = format!("/participants/{}/confirm", Uuid::new_v4());
    world.send(Method::PATCH, &uri, None).await;
}

#[when(regex = r#"^I invite \"([^\"]+)\"$"#)]
async fn when_invite(world: &mut TripWorld, email: String) {
    let uri = format!("/trips/{}/invites", world.trip_id());
    world
        .send(Method::POST, &uri, Some(json!({ "email": email })))
        .await;
}

#[when(regex = r#"^I add the activity \"([^\"]+)\" at \"([^\"]+)\"$"#)]
async fn when_add_activity(world: &mut TripWorld, title: String, occurs_at: String) {
    let uri = format!("/trips/{}/activities", world.trip_id());
    let (status, _) = world
        .send(
            Method::POST,
            &uri,
            Some(json!({ "title": title, "occurs_at": occurs_at })),
        )
        .await;
    assert_eq!(*status, StatusCode::CREATED);
}

#[then(regex = r"^the response status is (\d+)$")]
async fn then_status(world: &mut TripWorld, status: u16) {
    assert_eq!(world.response().0.as_u16(), status, "{}", world.response().1);
}

#[then(regex = r#"^the response message is \"([^\"]+)\"$"#)]
async fn then_message(world: &mut TripWorld, message: String) {
    assert_eq!(world.response().1["message"], message.as_str());
}

#[then(regex = r"^the trip has (\d+) participants?$")]
async fn then_participant_count(world: &mut TripWorld, expected: usize) {
    let uri = format!("/trips/{}/participants", world.trip_id());
    let (status, body) = world.state().send(Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["participants"].as_array().expect("list").len(), expected);
}

#[then(regex = r#"^participant \"([^\"]+)\" is (confirmed|pending)$"#)]
async fn then_participant_confirmed(world: &mut TripWorld, email: String, state: String) {
    let uri = format!("/trips/{}/participants", world.trip_id());
    let (_, body) = world.state().send(Method::GET, &uri, None).await;
    let participant = body["participants"]
        .as_array()
        .expect("list")
        .iter()
        .find(|p| p["email"] == email.as_str())
        .cloned()
        .expect("participant must exist");
    assert_eq!(participant["is_confirmed"], state == "confirmed");
}

#[then(regex = r"^the trip is (confirmed|a draft)$")]
async fn then_trip_confirmed(world: &mut TripWorld, state: String) {
    let uri = format!("/trips/{}", world.trip_id());
    let (_, body) = world.state().send(Method::GET, &uri, None).await;
    assert_eq!(body["trip"]["is_confirmed"], state == "confirmed");
}

#[then(regex = r"^(\d+) trips? (?:is|are) stored$")]
async fn then_trip_rows(world: &mut TripWorld, expected: i64) {
    assert_eq!(world.state().count("trips").await, expected);
}

#[then(regex = r"^the activities are grouped into (\d+) days?$")]
async fn then_activity_days(world: &mut TripWorld, expected: usize) {
    let uri = format!("/trips/{}/activities", world.trip_id());
    let (status, body) = world.send(Method::GET, &uri, None).await;
    assert_eq!(*status, StatusCode::OK);
    assert_eq!(body["activities"].as_array().expect("days").len(), expected);
}

#[then(regex = r#"^the day \"([^\"]+)\" has (\d+) activit(?:y|ies)$"#)]
async fn then_day_size(world: &mut TripWorld, date: String, expected: usize) {
    let (_, body) = world.response();
    let day = body["activities"]
        .as_array()
        .expect("days")
        .iter()
        .find(|day| {
            day["date"]
                .as_str()
                .is_some_and(|value| value.starts_with(&date))
        })
        .expect("day must be listed");
    assert_eq!(day["activities"].as_array().expect("items").len(), expected);
}

async fn create_trip(world: &mut TripWorld, payload: Value) {
    let (status, body) = world.send(Method::POST, "/trips", Some(payload)).await;
    if *status == StatusCode::CREATED {
        let trip_id = body["trip_id"].as_str().expect("trip id").to_string();
        world.trip_id = Some(trip_id);
    }
}

#[tokio::main]
async fn main() {
    TripWorld::cucumber()
        .fail_on_skipped()
        .with_default_cli()
        .run("tests/features")
        .await;
}
