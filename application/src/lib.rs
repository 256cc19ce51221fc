//! Application layer for biodraft
//!
//! Use cases and ports. The batch orchestrator lives here; the concrete
//! provider adapters, notifier, and progress displays are injected
//! through the ports by the outer layers.

pub mod ports;
pub mod use_cases;

pub use ports::{
    BatchProgress, BatchStage, NoNotifier, NoProgress, Notifier, NotifyError, ProviderError,
    ProviderGateway, ProviderReply, StepOutcome,
};
pub use use_cases::{RunBatchError, RunBatchInput, RunBatchUseCase};
