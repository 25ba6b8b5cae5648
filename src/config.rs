use std::{env, net::SocketAddr};

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub listen_addr: SocketAddr,
    pub mail: MailConfig,
}

/// Outbound SMTP relay. The relay is reached without transport encryption.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub host: String,
    pub port: u16,
    pub from: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            host: "localhost".into(),
            port: 1025,
            from: "mailpit@journey.com".into(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://journey.db".to_string());
        let listen_addr: SocketAddr = env::var("APP_LISTEN_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .map_err(|err| AppError::Config(format!("invalid APP_LISTEN_ADDR: {err}")))?;

        let defaults = MailConfig::default();
        let host = env::var("MAILPIT_HOST").unwrap_or(defaults.host);
        let port = match env::var("MAILPIT_PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|err| AppError::Config(format!("invalid MAILPIT_PORT: {err}")))?,
            Err(_) => defaults.port,
        };
        let from = env::var("MAIL_FROM").unwrap_or(defaults.from);

        Ok(Self {
            database_url,
            listen_addr,
            mail: MailConfig { host, port, from },
        })
    }
}
