//! Notification port
//!
//! Fire-and-forget messages sent when a drafter or editor completes.
//! The channel is best-effort: implementations report errors, but the
//! orchestrator only logs them and moves on.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Notification failed: {0}")]
    Failed(String),
}

/// Outbound notification channel.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, text: &str) -> Result<(), NotifyError>;
}

/// No-op notifier for when no channel is configured.
pub struct NoNotifier;

#[async_trait]
impl Notifier for NoNotifier {
    async fn notify(&self, _text: &str) -> Result<(), NotifyError> {
        Ok(())
    }
}
