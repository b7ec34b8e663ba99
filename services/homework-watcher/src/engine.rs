//! Engine: the polling loop that fetches statuses and relays them

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio_util::sync::CancellationToken;

use crate::config::{Config, HomeworkSelection};
use crate::error::{ErrorKind, WatcherError};
use crate::notifier::Notifier;
use crate::practicum::HomeworkApi;
use crate::response::{check_response, current_date};
use crate::status::parse_status;

/// Prefix of the message sent to the chat when a cycle fails
pub const ERROR_MESSAGE_PREFIX: &str = "Сбой в работе программы";

/// Where the engine is within a polling cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Fetching,
    Validating,
    Processing,
    Sleeping,
}

/// Result of a single polling cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The response carried no homework records
    NoUpdates,
    /// Records were formatted; `sent` were delivered, `suppressed` repeated the last one
    Processed { sent: usize, suppressed: usize },
    /// The cycle was aborted by an error of the given kind
    Failed(ErrorKind),
}

/// State carried from one cycle to the next
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollState {
    /// Lower bound (UNIX seconds) for the next request
    pub cursor: i64,
    /// Last status message delivered to the chat
    pub last_message: Option<String>,
    /// Last error text notified to the chat
    pub last_error: Option<String>,
}

impl PollState {
    pub fn new(cursor: i64) -> Self {
        Self {
            cursor,
            last_message: None,
            last_error: None,
        }
    }
}

/// Loop tunables derived from [`Config`]
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub retry_period: Duration,
    pub require_current_date: bool,
    pub homeworks: HomeworkSelection,
}

impl EngineSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            retry_period: Duration::from_secs(config.polling.retry_period_seconds),
            require_current_date: config.api.require_current_date,
            homeworks: config.polling.homeworks,
        }
    }
}

/// The engine orchestrates fetching, validation, formatting and notification
pub struct Engine {
    api: Arc<dyn HomeworkApi>,
    notifier: Arc<dyn Notifier>,
    settings: EngineSettings,
    state: PollState,
    phase: Phase,
    cancel: CancellationToken,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("notifier", &self.notifier)
            .field("settings", &self.settings)
            .field("state", &self.state)
            .field("phase", &self.phase)
            .finish()
    }
}

impl Engine {
    pub fn new(
        api: Arc<dyn HomeworkApi>,
        notifier: Arc<dyn Notifier>,
        settings: EngineSettings,
        initial_cursor: i64,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            api,
            notifier,
            settings,
            state: PollState::new(initial_cursor),
            phase: Phase::Idle,
            cancel,
        }
    }

    pub fn state(&self) -> &PollState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Poll until the cancellation token is triggered.
    ///
    /// Every cycle, whatever its outcome, is followed by the retry period.
    pub async fn run(&mut self) {
        tracing::info!(
            "Polling every {:?} starting from {}",
            self.settings.retry_period,
            self.state.cursor
        );

        loop {
            let outcome = self.run_cycle().await;
            tracing::debug!("Cycle finished: {:?}", outcome);

            self.enter(Phase::Sleeping);
            tokio::select! {
                _ = tokio::time::sleep(self.settings.retry_period) => {}
                _ = self.cancel.cancelled() => {
                    tracing::debug!("Polling loop cancelled");
                    break;
                }
            }
        }

        self.enter(Phase::Idle);
    }

    /// Run one fetch-validate-process cycle and absorb any failure
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        match self.process().await {
            Ok(outcome) => outcome,
            Err(error) => {
                let kind = error.kind();
                self.handle_error(error).await;
                CycleOutcome::Failed(kind)
            }
        }
    }

    async fn process(&mut self) -> crate::Result<CycleOutcome> {
        self.enter(Phase::Fetching);
        let response = self.api.get_api_answer(self.state.cursor).await?;

        self.enter(Phase::Validating);
        let homeworks = check_response(&response, self.settings.require_current_date)?;

        let outcome = if homeworks.is_empty() {
            tracing::debug!("No new homework statuses in the response");
            CycleOutcome::NoUpdates
        } else {
            self.enter(Phase::Processing);
            let selected = match self.settings.homeworks {
                HomeworkSelection::All => &homeworks[..],
                HomeworkSelection::Latest => &homeworks[..1],
            };

            // Format the whole batch first so a bad record sends nothing
            let messages = selected
                .iter()
                .map(parse_status)
                .collect::<crate::Result<Vec<_>>>()?;

            let mut sent = 0;
            let mut suppressed = 0;
            for message in messages {
                if self.state.last_message.as_deref() == Some(message.as_str()) {
                    tracing::debug!("Suppressing repeated message: \"{}\"", message);
                    suppressed += 1;
                    continue;
                }
                self.notifier.send(&message).await?;
                tracing::info!("Status update sent via {}", self.notifier.type_name());
                self.state.last_message = Some(message);
                sent += 1;
            }
            CycleOutcome::Processed { sent, suppressed }
        };

        if let Some(date) = current_date(&response) {
            self.advance_cursor(date);
        }

        Ok(outcome)
    }

    fn advance_cursor(&mut self, date: i64) {
        if date > self.state.cursor {
            tracing::debug!("Advancing cursor {} -> {}", self.state.cursor, date);
            self.state.cursor = date;
        } else if date < self.state.cursor {
            tracing::warn!(
                "Ignoring current_date {} older than cursor {}",
                date,
                self.state.cursor
            );
        }
    }

    async fn handle_error(&mut self, error: WatcherError) {
        if error.kind() == ErrorKind::Delivery {
            // Reporting a failed delivery through the same channel would cascade
            tracing::error!("Failed to deliver message: {}", error);
            return;
        }

        let message = format!("{}: {}", ERROR_MESSAGE_PREFIX, error);
        tracing::error!("{}", message);

        if self.state.last_error.as_deref() == Some(message.as_str()) {
            tracing::debug!("Error already reported, not notifying again");
            return;
        }

        if let Err(e) = self.notifier.send(&message).await {
            tracing::warn!(
                "Failed to report error via {}: {}",
                self.notifier.type_name(),
                e
            );
        }
        self.state.last_error = Some(message);
    }

    fn enter(&mut self, phase: Phase) {
        tracing::trace!("{:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }
}

/// Current UNIX time in seconds
pub fn current_epoch_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
