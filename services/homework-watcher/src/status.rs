//! Homework review statuses and the messages announcing them

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::error::{json_type_name, ShapeError, WatcherError};

pub const HOMEWORK_NAME: &str = "homework_name";
pub const STATUS: &str = "status";

/// Review status of a submitted homework
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeworkStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl HomeworkStatus {
    /// Human-readable verdict sent to the chat
    pub fn verdict(self) -> &'static str {
        match self {
            HomeworkStatus::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            HomeworkStatus::Reviewing => "Работа взята на проверку ревьюером.",
            HomeworkStatus::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HomeworkStatus::Approved => "approved",
            HomeworkStatus::Reviewing => "reviewing",
            HomeworkStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for HomeworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HomeworkStatus {
    type Err = WatcherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approved" => Ok(HomeworkStatus::Approved),
            "reviewing" => Ok(HomeworkStatus::Reviewing),
            "rejected" => Ok(HomeworkStatus::Rejected),
            other => Err(WatcherError::UnknownStatus(other.to_string())),
        }
    }
}

/// Build the chat message for one homework record
pub fn parse_status(homework: &Value) -> crate::Result<String> {
    tracing::debug!("Extracting homework status");

    let record = homework.as_object().ok_or(ShapeError::NotAnObject {
        found: json_type_name(homework),
    })?;

    let missing: Vec<String> = [HOMEWORK_NAME, STATUS]
        .into_iter()
        .filter(|key| !record.contains_key(*key))
        .map(str::to_string)
        .collect();
    if !missing.is_empty() {
        return Err(ShapeError::MissingKeys { keys: missing }.into());
    }

    let status: HomeworkStatus = match &record[STATUS] {
        Value::String(s) => s.parse()?,
        other => return Err(WatcherError::UnknownStatus(other.to_string())),
    };

    let homework_name = match &record[HOMEWORK_NAME] {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };

    tracing::debug!("Homework '{}' has status {}", homework_name, status);
    Ok(format_message(&homework_name, status))
}

pub fn format_message(homework_name: &str, status: HomeworkStatus) -> String {
    format!(
        "Изменился статус проверки работы \"{}\". {}",
        homework_name,
        status.verdict()
    )
}
