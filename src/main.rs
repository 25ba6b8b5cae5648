use std::sync::Arc;

use anyhow::Context;
use journey::config::AppConfig;
use journey::db::{init_pool, migrate};
use journey::error::AppError;
use journey::routes::create_router;
use journey::services::{mailer::SmtpMailer, notifier::Notifier, store::SqliteStore};
use journey::state::AppState;
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_logging();

    let config = AppConfig::from_env()?;
    let db = init_pool(&config.database_url).await?;

    if let Err(err) = migrate(&db).await {
        error!("migration failed: {err:?}");
        return Err(err);
    }

    let store = Arc::new(SqliteStore::new(db));
    let mailer = SmtpMailer::new(store.clone(), &config.mail)?;
    let notifier = Notifier::spawn(Arc::new(mailer));

    let state = AppState::new(store, notifier);
    let app = create_router(state);

    let listener = TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app.into_make_service())
        .await
        .context("server terminated")?;

    Ok(())
}

fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);
    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,journey=debug,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
