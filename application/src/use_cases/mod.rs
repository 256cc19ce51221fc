//! Use cases orchestrating the domain through the ports

pub mod run_batch;

pub use run_batch::{RunBatchError, RunBatchInput, RunBatchUseCase};
