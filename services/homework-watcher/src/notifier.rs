//! Notifier trait for relaying messages to the user

use async_trait::async_trait;

/// Trait for delivering a plain-text message
#[async_trait]
pub trait Notifier: Send + Sync + std::fmt::Debug {
    /// Get the notifier type name (e.g. "telegram")
    fn type_name(&self) -> &str;

    /// Deliver a message, failing with [`crate::WatcherError::Delivery`]
    async fn send(&self, message: &str) -> crate::Result<()>;
}
