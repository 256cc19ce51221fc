//! Infrastructure layer for biodraft
//!
//! External adapters: HTTP provider clients, the provider catalog,
//! configuration loading, and the Telegram notifier.

pub mod catalog;
pub mod config;
pub mod notify;
pub mod providers;

pub use catalog::ProviderCatalog;
pub use config::{ConfigLoader, FileConfig};
pub use notify::TelegramNotifier;
pub use providers::HttpProviderGateway;
