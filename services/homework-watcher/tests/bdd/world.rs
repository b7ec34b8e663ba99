//! BDD test world for the homework watcher

use std::collections::HashMap;
use std::sync::Arc;

use cucumber::World;
use homework_watcher::config::HomeworkSelection;
use homework_watcher::engine::{CycleOutcome, Engine};
use homework_watcher::telegram::TelegramNotifier;
use homework_watcher::{Credentials, Watcher};
use tokio_util::sync::CancellationToken;

use crate::steps::doubles::{RecordingHttpClient, RecordingNotifier, ScriptedApi};

#[derive(Debug, Default, World)]
pub struct WatcherWorld {
    // Polling loop
    pub api: Option<Arc<ScriptedApi>>,
    pub notifier: Option<Arc<RecordingNotifier>>,
    pub initial_cursor: Option<i64>,
    pub selection: HomeworkSelection,
    pub require_current_date: bool,
    pub engine: Option<Engine>,
    pub outcomes: Vec<CycleOutcome>,

    // Credentials
    pub env: HashMap<String, String>,
    pub credentials_result: Option<homework_watcher::Result<Credentials>>,

    // Telegram delivery
    pub telegram_http: Option<Arc<RecordingHttpClient>>,
    pub telegram: Option<TelegramNotifier>,
    pub telegram_result: Option<homework_watcher::Result<()>>,

    // Assembly and lifecycle
    pub lifecycle_http: Option<Arc<RecordingHttpClient>>,
    pub lifecycle_cancel: Option<CancellationToken>,
    pub lifecycle_inject_doubles: bool,
    pub watcher: Option<Watcher>,
}

impl WatcherWorld {
    pub fn api(&mut self) -> Arc<ScriptedApi> {
        Arc::clone(self.api.get_or_insert_with(Default::default))
    }

    pub fn notifier(&mut self) -> Arc<RecordingNotifier> {
        Arc::clone(self.notifier.get_or_insert_with(Default::default))
    }
}
