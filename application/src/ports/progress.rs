//! Progress notification port
//!
//! Defines the interface for reporting progress during batch execution.

/// Which half of the batch a step belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStage {
    Drafting,
    Synthesis,
}

impl BatchStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            BatchStage::Drafting => "Drafting",
            BatchStage::Synthesis => "Synthesis",
        }
    }
}

/// How one provider step ended.
///
/// Every selected provider produces exactly one outcome, skipped
/// providers included, so progress accounting stays exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Success,
    Failed,
    Skipped,
}

/// Callback for progress updates during batch execution.
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console bar, plain text, ...).
pub trait BatchProgress: Send + Sync {
    /// Called once before the first step with the planned step count.
    fn on_batch_start(&self, total_steps: usize);

    /// Called when a provider invocation begins.
    fn on_provider_start(&self, stage: &BatchStage, provider: &str);

    /// Called exactly once per processed provider, skips included.
    fn on_step_complete(&self, stage: &BatchStage, provider: &str, outcome: StepOutcome);

    /// Called when the synthesis stage is skipped because too few
    /// drafts succeeded. The planned editor steps will never complete.
    fn on_synthesis_skipped(&self, _successful_drafts: usize) {}

    /// Called after the last step.
    fn on_batch_complete(&self);
}

/// No-op progress notifier for when progress reporting is not needed.
pub struct NoProgress;

impl BatchProgress for NoProgress {
    fn on_batch_start(&self, _total_steps: usize) {}
    fn on_provider_start(&self, _stage: &BatchStage, _provider: &str) {}
    fn on_step_complete(&self, _stage: &BatchStage, _provider: &str, _outcome: StepOutcome) {}
    fn on_batch_complete(&self) {}
}
