//! Outbound notification adapters

pub mod telegram;

pub use telegram::TelegramNotifier;
