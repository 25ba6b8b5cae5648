use std::sync::Arc;

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::info;
use uuid::Uuid;

use crate::{
    config::MailConfig,
    error::{AppError, MailError},
    models::Trip,
    services::store::Store,
};

pub const CONFIRM_TRIP_SUBJECT: &str = "Confirm your trip";

/// Outbound mail capability consumed by the notifier.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Loads the trip and asks its owner to confirm it. One attempt only.
    async fn send_confirm_trip_email_to_trip_owner(&self, trip_id: Uuid) -> Result<(), MailError>;
}

/// Delivers mail through an unencrypted SMTP relay.
#[derive(Clone)]
pub struct SmtpMailer {
    store: Arc<dyn Store>,
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(store: Arc<dyn Store>, config: &MailConfig) -> Result<Self, AppError> {
        let from: Mailbox = config
            .from
            .parse()
            .map_err(|err| AppError::Config(format!("invalid MAIL_FROM: {err}")))?;
        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(config.host.as_str())
            .port(config.port)
            .build();
        Ok(Self {
            store,
            transport,
            from,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_confirm_trip_email_to_trip_owner(&self, trip_id: Uuid) -> Result<(), MailError> {
        let trip = self.store.get_trip(trip_id).await?;
        let message = confirm_trip_message(&self.from, &trip)?;
        self.transport.send(message).await?;
        info!(trip_id = %trip_id, to = %trip.owner_email, "confirmation email sent");
        Ok(())
    }
}

pub fn confirm_trip_message(from: &Mailbox, trip: &Trip) -> Result<Message, MailError> {
    let to = Mailbox::new(Some(trip.owner_name.clone()), trip.owner_email.parse::<Address>()?);
    let message = Message::builder()
        .from(from.clone())
        .to(to)
        .subject(CONFIRM_TRIP_SUBJECT)
        .header(ContentType::TEXT_PLAIN)
        .body(render_confirm_trip_body(trip))?;
    Ok(message)
}

pub fn render_confirm_trip_body(trip: &Trip) -> String {
    format!(
        "Hello, {owner}!\n\n\
         Your trip to {destination} starting on {starts_on} needs to be confirmed.\n\
         Please confirm it so your companions can be notified.\n",
        owner = trip.owner_name,
        destination = trip.destination,
        starts_on = trip.starts_at.format("%Y-%m-%d"),
    )
}
