//! Homework Watcher - review status polling and notification service
//!
//! Polls the Practicum homework status API, turns status changes into chat
//! messages and relays them through a Telegram bot.

pub mod config;
pub mod credentials;
pub mod engine;
pub mod error;
pub mod io;
pub mod notifier;
pub mod practicum;
pub mod response;
pub mod status;
pub mod telegram;

pub use config::{load_config, Config};
pub use credentials::Credentials;
pub use error::{Result, WatcherError};

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::engine::{current_epoch_secs, Engine, EngineSettings};
use crate::io::{HttpClient, ReqwestHttpClient};
use crate::notifier::Notifier;
use crate::practicum::{HomeworkApi, PracticumClient};
use crate::telegram::TelegramNotifier;

/// Assembles a [`Watcher`] from configuration, with optional injected parts
pub struct WatcherBuilder {
    config: Config,
    credentials: Credentials,
    http: Option<Arc<dyn HttpClient>>,
    api: Option<Arc<dyn HomeworkApi>>,
    notifier: Option<Arc<dyn Notifier>>,
    cancel: Option<CancellationToken>,
    initial_cursor: Option<i64>,
}

impl WatcherBuilder {
    pub fn new(config: Config, credentials: Credentials) -> Self {
        Self {
            config,
            credentials,
            http: None,
            api: None,
            notifier: None,
            cancel: None,
            initial_cursor: None,
        }
    }

    /// Use this HTTP client for both the grading API and Telegram
    pub fn with_http_client(mut self, http: Arc<dyn HttpClient>) -> Self {
        self.http = Some(http);
        self
    }

    pub fn with_api(mut self, api: Arc<dyn HomeworkApi>) -> Self {
        self.api = Some(api);
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn with_cancellation_token(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Start polling from this UNIX timestamp instead of now
    pub fn with_initial_cursor(mut self, from_date: i64) -> Self {
        self.initial_cursor = Some(from_date);
        self
    }

    pub fn build(self) -> Result<Watcher> {
        self.config.validate()?;

        let http: Arc<dyn HttpClient> = match self.http {
            Some(http) => http,
            None => Arc::new(ReqwestHttpClient::with_timeout(Duration::from_secs(
                self.config.http.timeout_seconds,
            ))?),
        };

        let api: Arc<dyn HomeworkApi> = match self.api {
            Some(api) => api,
            None => Arc::new(PracticumClient::new(
                &self.config.api.endpoint,
                &self.credentials.practicum_token,
                Arc::clone(&http),
            )),
        };

        let notifier: Arc<dyn Notifier> = match self.notifier {
            Some(notifier) => notifier,
            None => Arc::new(TelegramNotifier::new(
                &self.config.telegram.api_base_url,
                &self.credentials.telegram_token,
                &self.credentials.telegram_chat_id,
                Arc::clone(&http),
            )),
        };

        let cancel = self.cancel.unwrap_or_default();
        let initial_cursor = self.initial_cursor.unwrap_or_else(current_epoch_secs);

        let engine = Engine::new(
            api,
            notifier,
            EngineSettings::from_config(&self.config),
            initial_cursor,
            cancel.clone(),
        );

        Ok(Watcher { engine, cancel })
    }
}

/// A fully assembled watcher, ready to poll
#[derive(Debug)]
pub struct Watcher {
    engine: Engine,
    cancel: CancellationToken,
}

impl Watcher {
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run until Ctrl-C or until the cancellation token is triggered
    pub async fn start(mut self) -> Result<()> {
        let cancel_for_signal = self.cancel.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!("Failed to listen for ctrl-c: {}", e);
                return;
            }
            tracing::info!("Shutdown signal received");
            cancel_for_signal.cancel();
        });

        tracing::info!("Homework watcher started");
        self.engine.run().await;
        tracing::info!("Homework watcher stopped");

        Ok(())
    }
}
