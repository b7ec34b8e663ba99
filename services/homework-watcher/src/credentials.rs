//! Secrets required to talk to the grading API and the Telegram bot

use std::fmt;

use crate::error::WatcherError;

pub const PRACTICUM_TOKEN: &str = "PRACTICUM_TOKEN";
pub const TELEGRAM_TOKEN: &str = "TELEGRAM_TOKEN";
pub const TELEGRAM_CHAT_ID: &str = "TELEGRAM_CHAT_ID";

/// The three credentials, all guaranteed non-empty once constructed
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub practicum_token: String,
    pub telegram_token: String,
    pub telegram_chat_id: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("practicum_token", &"<redacted>")
            .field("telegram_token", &"<redacted>")
            .field("telegram_chat_id", &self.telegram_chat_id)
            .finish()
    }
}

impl Credentials {
    /// Read credentials from the process environment
    pub fn from_env() -> crate::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read credentials through an arbitrary lookup.
    ///
    /// Fails with [`WatcherError::MissingCredentials`] naming every variable that
    /// is unset or empty, in declaration order.
    pub fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.is_empty());

        let practicum_token = read(PRACTICUM_TOKEN);
        let telegram_token = read(TELEGRAM_TOKEN);
        let telegram_chat_id = read(TELEGRAM_CHAT_ID);

        match (practicum_token, telegram_token, telegram_chat_id) {
            (Some(practicum_token), Some(telegram_token), Some(telegram_chat_id)) => {
                tracing::debug!("All required credentials are present");
                Ok(Self {
                    practicum_token,
                    telegram_token,
                    telegram_chat_id,
                })
            }
            (practicum_token, telegram_token, telegram_chat_id) => {
                let missing: Vec<&'static str> = [
                    (PRACTICUM_TOKEN, practicum_token.is_none()),
                    (TELEGRAM_TOKEN, telegram_token.is_none()),
                    (TELEGRAM_CHAT_ID, telegram_chat_id.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, is_missing)| is_missing.then_some(name))
                .collect();

                tracing::error!(
                    "Missing required environment variables: {}",
                    missing.join(", ")
                );
                Err(WatcherError::MissingCredentials(missing))
            }
        }
    }
}
