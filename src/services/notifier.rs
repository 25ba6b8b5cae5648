use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{error, warn};
use uuid::Uuid;

use crate::services::mailer::Mailer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    ConfirmTripToOwner { trip_id: Uuid },
}

/// Handle for queueing best-effort notifications.
///
/// Enqueueing never waits on delivery. A background worker takes jobs off
/// the queue and runs each one on its own task; a failed delivery is logged
/// and dropped.
#[derive(Clone)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl Notifier {
    /// Starts the delivery worker on the current tokio runtime.
    pub fn spawn(mailer: Arc<dyn Mailer>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_worker(mailer, rx));
        Self { tx }
    }

    pub fn confirm_trip_to_owner(&self, trip_id: Uuid) {
        self.enqueue(Notification::ConfirmTripToOwner { trip_id });
    }

    fn enqueue(&self, notification: Notification) {
        if let Err(err) = self.tx.send(notification) {
            warn!(notification = ?err.0, "notification queue closed, dropping job");
        }
    }
}

async fn run_worker(mailer: Arc<dyn Mailer>, mut rx: mpsc::UnboundedReceiver<Notification>) {
    while let Some(notification) = rx.recv().await {
        let mailer = Arc::clone(&mailer);
        tokio::spawn(async move { deliver(mailer.as_ref(), notification).await });
    }
}

async fn deliver(mailer: &dyn Mailer, notification: Notification) {
    match notification {
        Notification::ConfirmTripToOwner { trip_id } => {
            if let Err(err) = mailer.send_confirm_trip_email_to_trip_owner(trip_id).await {
                error!(trip_id = %trip_id, error = %err, "failed to send trip confirmation email");
            }
        }
    }
}
