//! Run Batch use case
//!
//! Orchestrates one full generation batch: every selected drafter in
//! turn, then, when at least two drafts succeeded, every selected
//! editor against the synthesis prompt.
//!
//! Providers are invoked strictly sequentially; one call is in flight
//! at a time and there is no mid-batch cancellation. Failure of one
//! provider never aborts or delays the others: each iteration converts
//! its own errors into an `Error`-status result and continues.

use crate::ports::notifier::{NoNotifier, Notifier};
use crate::ports::progress::{BatchProgress, BatchStage, NoProgress, StepOutcome};
use crate::ports::provider_gateway::ProviderGateway;
use biodraft_domain::{
    BatchRun, BiographyPrompt, ConflictNotePolicy, DraftResult, ProviderSpec, SkipNotice, Subject,
    SynthesisPromptBuilder, SynthesisResult, MAX_DRAFTERS,
};
use biodraft_domain::util::preview;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur before batch execution starts.
///
/// Once the loop is running, provider failures are contained as
/// `Error`-status results and never surface here.
#[derive(Error, Debug)]
pub enum RunBatchError {
    #[error("No drafters selected")]
    NoDrafters,

    #[error("Too many drafters selected: {0} (maximum is {MAX_DRAFTERS})")]
    TooManyDrafters(usize),

    #[error("At least one editor is required when more than one drafter is selected")]
    MissingEditors,
}

/// Input for the RunBatch use case
#[derive(Debug, Clone)]
pub struct RunBatchInput {
    /// The person to draft a CV for.
    pub subject: Subject,
    /// Selected drafters, in selection order (1-5).
    pub drafters: Vec<ProviderSpec>,
    /// Selected editors, in selection order. Ignored when only one
    /// drafter is selected.
    pub editors: Vec<ProviderSpec>,
    /// Conflict-note policy baked into the synthesis prompt.
    pub policy: ConflictNotePolicy,
    /// Reference date for age arithmetic, e.g. "May 2025".
    pub reference_date: String,
}

impl RunBatchInput {
    pub fn new(
        subject: impl Into<Subject>,
        drafters: Vec<ProviderSpec>,
        reference_date: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            drafters,
            editors: Vec::new(),
            policy: ConflictNotePolicy::default(),
            reference_date: reference_date.into(),
        }
    }

    pub fn with_editors(mut self, editors: Vec<ProviderSpec>) -> Self {
        self.editors = editors;
        self
    }

    pub fn with_policy(mut self, policy: ConflictNotePolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// Use case for running one generation batch
pub struct RunBatchUseCase<G: ProviderGateway + 'static> {
    gateway: Arc<G>,
    notifier: Arc<dyn Notifier>,
}

impl<G: ProviderGateway + 'static> RunBatchUseCase<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            notifier: Arc::new(NoNotifier),
        }
    }

    /// Attach an outbound notification channel.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Execute the batch with default (no-op) progress
    pub async fn execute(&self, input: RunBatchInput) -> Result<BatchRun, RunBatchError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the batch with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunBatchInput,
        progress: &dyn BatchProgress,
    ) -> Result<BatchRun, RunBatchError> {
        if input.drafters.is_empty() {
            return Err(RunBatchError::NoDrafters);
        }
        if input.drafters.len() > MAX_DRAFTERS {
            return Err(RunBatchError::TooManyDrafters(input.drafters.len()));
        }
        if input.drafters.len() > 1 && input.editors.is_empty() {
            return Err(RunBatchError::MissingEditors);
        }

        info!(
            "Starting batch for {} with {} drafter(s)",
            preview(input.subject.name(), 80),
            input.drafters.len()
        );

        // Editors only count toward the plan when synthesis is reachable.
        let synthesis_planned = input.drafters.len() > 1 && !input.editors.is_empty();
        let total_steps = input.drafters.len()
            + if synthesis_planned {
                input.editors.len()
            } else {
                0
            };
        progress.on_batch_start(total_steps);

        let batch_started = Instant::now();
        let mut skipped = Vec::new();

        let drafts = self
            .draft_stage(&input, progress, &mut skipped)
            .await;

        let syntheses = if synthesis_planned {
            self.synthesis_stage(&input, &drafts, progress, &mut skipped)
                .await
        } else {
            debug!("Synthesis not planned: single drafter or no editors selected");
            Vec::new()
        };

        progress.on_batch_complete();

        Ok(BatchRun::new(
            input.subject,
            input.drafters.iter().map(|s| s.name.clone()).collect(),
            input.editors.iter().map(|s| s.name.clone()).collect(),
            drafts,
            syntheses,
            skipped,
            batch_started.elapsed().as_millis() as u64,
        ))
    }

    /// Stage 1: invoke every selected drafter in order.
    async fn draft_stage(
        &self,
        input: &RunBatchInput,
        progress: &dyn BatchProgress,
        skipped: &mut Vec<SkipNotice>,
    ) -> Vec<DraftResult> {
        let prompt = BiographyPrompt::render(&input.subject, &input.reference_date);
        let mut drafts = Vec::with_capacity(input.drafters.len());

        for spec in &input.drafters {
            if !self.gateway.is_configured(spec) {
                warn!("{} is unavailable (client not configured), skipping", spec.name);
                skipped.push(SkipNotice::unconfigured(&spec.name));
                progress.on_step_complete(&BatchStage::Drafting, &spec.name, StepOutcome::Skipped);
                continue;
            }

            progress.on_provider_start(&BatchStage::Drafting, &spec.name);
            let started = Instant::now();

            let result = match self.gateway.draft(spec, &prompt).await {
                Ok(reply) => {
                    let duration_ms = started.elapsed().as_millis() as u64;
                    info!("{} finished drafting in {}ms", spec.name, duration_ms);
                    if reply.fallback {
                        DraftResult::fallback(&spec.name, reply.text, duration_ms)
                    } else {
                        DraftResult::success(&spec.name, reply.text, reply.sources, duration_ms)
                    }
                }
                Err(e) => {
                    let duration_ms = started.elapsed().as_millis() as u64;
                    warn!("{} failed: {}", spec.name, e);
                    DraftResult::failure(&spec.name, e.to_string(), duration_ms)
                }
            };

            let outcome = if result.is_success() {
                self.notify(&format!(
                    "biodraft: {} finished drafting CV for {}",
                    spec.name, input.subject
                ))
                .await;
                StepOutcome::Success
            } else {
                StepOutcome::Failed
            };
            progress.on_step_complete(&BatchStage::Drafting, &spec.name, outcome);
            drafts.push(result);
        }

        drafts
    }

    /// Stage 2: reconcile the successful drafts through every editor.
    ///
    /// Gated on at least two successful drafts; reconciliation across
    /// a single source is meaningless, so the whole stage is skipped
    /// with an informational callback instead.
    async fn synthesis_stage(
        &self,
        input: &RunBatchInput,
        drafts: &[DraftResult],
        progress: &dyn BatchProgress,
        skipped: &mut Vec<SkipNotice>,
    ) -> Vec<SynthesisResult> {
        let successful: Vec<&DraftResult> = drafts.iter().filter(|d| d.is_success()).collect();
        if successful.len() <= 1 {
            info!(
                "Skipping synthesis: {} successful draft(s)",
                successful.len()
            );
            progress.on_synthesis_skipped(successful.len());
            return Vec::new();
        }

        let builder = SynthesisPromptBuilder::new(input.policy);
        let synthesis_prompt = builder.build(&input.subject, &successful);
        debug!(
            "Synthesis prompt built from {} drafts ({} bytes)",
            successful.len(),
            synthesis_prompt.len()
        );

        let mut syntheses = Vec::with_capacity(input.editors.len());

        for spec in &input.editors {
            if !self.gateway.is_configured(spec) {
                warn!("{} is unavailable (client not configured), skipping", spec.name);
                skipped.push(SkipNotice::unconfigured(&spec.name));
                progress.on_step_complete(&BatchStage::Synthesis, &spec.name, StepOutcome::Skipped);
                continue;
            }

            progress.on_provider_start(&BatchStage::Synthesis, &spec.name);
            let started = Instant::now();

            let result = match self.gateway.synthesize(spec, &synthesis_prompt).await {
                Ok(text) => {
                    let duration_ms = started.elapsed().as_millis() as u64;
                    info!("{} finished synthesizing in {}ms", spec.name, duration_ms);
                    SynthesisResult::success(&spec.name, text, duration_ms)
                }
                Err(e) => {
                    let duration_ms = started.elapsed().as_millis() as u64;
                    warn!("{} synthesis failed: {}", spec.name, e);
                    SynthesisResult::failure(&spec.name, e.to_string(), duration_ms)
                }
            };

            let outcome = if result.is_success() {
                self.notify(&format!(
                    "biodraft: {} finished synthesizing CV for {}",
                    spec.name, input.subject
                ))
                .await;
                StepOutcome::Success
            } else {
                StepOutcome::Failed
            };
            progress.on_step_complete(&BatchStage::Synthesis, &spec.name, outcome);
            syntheses.push(result);
        }

        syntheses
    }

    /// Best-effort notification; failures are logged, never raised.
    async fn notify(&self, text: &str) {
        if let Err(e) = self.notifier.notify(text).await {
            warn!("Notification failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::notifier::NotifyError;
    use crate::ports::provider_gateway::{ProviderError, ProviderReply};
    use async_trait::async_trait;
    use biodraft_domain::{DrafterId, EditorId, SourceAttribution};
    use std::collections::HashSet;
    use std::sync::Mutex;

    // ==================== Test Mocks ====================

    #[derive(Default)]
    struct MockGateway {
        unconfigured: HashSet<String>,
        failing: HashSet<String>,
        fallback: HashSet<String>,
        draft_calls: Mutex<Vec<String>>,
        synth_calls: Mutex<Vec<String>>,
    }

    impl MockGateway {
        fn new() -> Self {
            Self::default()
        }

        fn unconfigured(mut self, name: &str) -> Self {
            self.unconfigured.insert(name.to_string());
            self
        }

        fn failing(mut self, name: &str) -> Self {
            self.failing.insert(name.to_string());
            self
        }

        fn falling_back(mut self, name: &str) -> Self {
            self.fallback.insert(name.to_string());
            self
        }

        fn draft_calls(&self) -> Vec<String> {
            self.draft_calls.lock().unwrap().clone()
        }

        fn synth_calls(&self) -> Vec<String> {
            self.synth_calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ProviderGateway for MockGateway {
        fn is_configured(&self, spec: &ProviderSpec) -> bool {
            !self.unconfigured.contains(&spec.name)
        }

        async fn draft(
            &self,
            spec: &ProviderSpec,
            _prompt: &str,
        ) -> Result<ProviderReply, ProviderError> {
            self.draft_calls.lock().unwrap().push(spec.name.clone());
            if self.failing.contains(&spec.name) {
                return Err(ProviderError::RequestFailed("boom".to_string()));
            }
            if self.fallback.contains(&spec.name) {
                return Ok(ProviderReply::from_fallback(format!("Fallback CV by {}", spec.name)));
            }
            Ok(ProviderReply::new(
                format!("CV by {}", spec.name),
                SourceAttribution::cited(vec![biodraft_domain::Source::new(
                    format!("{} bio", spec.name),
                    format!("https://example.org/{}", spec.name.to_lowercase()),
                )]),
            ))
        }

        async fn synthesize(
            &self,
            spec: &ProviderSpec,
            prompt: &str,
        ) -> Result<String, ProviderError> {
            self.synth_calls.lock().unwrap().push(spec.name.clone());
            if self.failing.contains(&spec.name) {
                return Err(ProviderError::RateLimited("slow down".to_string()));
            }
            assert!(prompt.contains("Refreshed CV"), "editor got a non-synthesis prompt");
            Ok(format!("Refreshed CV by {}", spec.name))
        }
    }

    #[derive(Default)]
    struct RecordingProgress {
        total: Mutex<Option<usize>>,
        steps: Mutex<Vec<(String, StepOutcome)>>,
        synthesis_skips: Mutex<Vec<usize>>,
        completed: Mutex<bool>,
    }

    impl BatchProgress for RecordingProgress {
        fn on_batch_start(&self, total_steps: usize) {
            *self.total.lock().unwrap() = Some(total_steps);
        }

        fn on_provider_start(&self, _stage: &BatchStage, _provider: &str) {}

        fn on_step_complete(&self, _stage: &BatchStage, provider: &str, outcome: StepOutcome) {
            self.steps
                .lock()
                .unwrap()
                .push((provider.to_string(), outcome));
        }

        fn on_synthesis_skipped(&self, successful_drafts: usize) {
            self.synthesis_skips.lock().unwrap().push(successful_drafts);
        }

        fn on_batch_complete(&self) {
            *self.completed.lock().unwrap() = true;
        }
    }

    struct FailingNotifier {
        attempts: Mutex<usize>,
    }

    #[async_trait]
    impl Notifier for FailingNotifier {
        async fn notify(&self, _text: &str) -> Result<(), NotifyError> {
            *self.attempts.lock().unwrap() += 1;
            Err(NotifyError::Failed("channel down".to_string()))
        }
    }

    // ==================== Helpers ====================

    fn drafter(id: DrafterId) -> ProviderSpec {
        ProviderSpec::for_drafter(id, true)
    }

    fn editor(id: EditorId) -> ProviderSpec {
        ProviderSpec::for_editor(id, true)
    }

    fn input_with_editors(drafters: Vec<ProviderSpec>) -> RunBatchInput {
        RunBatchInput::new("Jane Doe", drafters, "May 2025")
            .with_editors(vec![editor(EditorId::Graham)])
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn test_all_drafters_succeed_in_selection_order() {
        // Scenario A: 3 drafters, all configured, all succeed.
        let gateway = Arc::new(MockGateway::new());
        let use_case = RunBatchUseCase::new(Arc::clone(&gateway));

        let input = input_with_editors(vec![
            drafter(DrafterId::Sonar),
            drafter(DrafterId::Gemini),
            drafter(DrafterId::Claude),
        ]);
        let run = use_case.execute(input).await.unwrap();

        assert_eq!(run.drafts.len(), 3);
        assert!(run.drafts.iter().all(|d| d.is_success()));
        assert_eq!(
            run.drafts.iter().map(|d| d.drafter.as_str()).collect::<Vec<_>>(),
            vec!["Sonar", "Gemini", "Claude"]
        );
        assert!(run.synthesis_attempted());

        let export = run.combined_export();
        let positions: Vec<usize> = ["Sonar", "Gemini", "Claude"]
            .iter()
            .map(|n| export.find(&format!("<answer_{}>", n)).unwrap())
            .collect();
        assert!(positions[0] < positions[1] && positions[1] < positions[2]);
    }

    #[tokio::test]
    async fn test_unconfigured_drafter_is_skipped_not_invoked() {
        // Scenario B: 2 selected, one unconfigured -> 1 invocation,
        // 1 skip notice, synthesis skipped (only 1 success).
        let gateway = Arc::new(MockGateway::new().unconfigured("Gemini"));
        let use_case = RunBatchUseCase::new(Arc::clone(&gateway));
        let progress = RecordingProgress::default();

        let input = input_with_editors(vec![
            drafter(DrafterId::Sonar),
            drafter(DrafterId::Gemini),
        ]);
        let run = use_case
            .execute_with_progress(input, &progress)
            .await
            .unwrap();

        assert_eq!(gateway.draft_calls(), vec!["Sonar"]);
        assert_eq!(run.drafts.len(), 1);
        assert_eq!(run.skipped.len(), 1);
        assert_eq!(run.skipped[0].provider, "Gemini");
        assert!(!run.synthesis_attempted());
        assert!(gateway.synth_calls().is_empty());
        assert_eq!(*progress.synthesis_skips.lock().unwrap(), vec![1]);

        // One progress increment per processed drafter, skip included.
        let steps = progress.steps.lock().unwrap();
        assert_eq!(
            *steps,
            vec![
                ("Sonar".to_string(), StepOutcome::Success),
                ("Gemini".to_string(), StepOutcome::Skipped),
            ]
        );
    }

    #[tokio::test]
    async fn test_single_drafter_never_triggers_synthesis() {
        // Scenario C: 1 drafter -> synthesis never attempted even
        // though an editor is configured and selected.
        let gateway = Arc::new(MockGateway::new());
        let use_case = RunBatchUseCase::new(Arc::clone(&gateway));
        let progress = RecordingProgress::default();

        let input = RunBatchInput::new("John Roe", vec![drafter(DrafterId::Sonar)], "May 2025")
            .with_editors(vec![editor(EditorId::Graham)]);
        let run = use_case
            .execute_with_progress(input, &progress)
            .await
            .unwrap();

        assert!(!run.synthesis_attempted());
        assert!(gateway.synth_calls().is_empty());
        // Editors are not part of the plan for a single-drafter batch.
        assert_eq!(*progress.total.lock().unwrap(), Some(1));
    }

    #[tokio::test]
    async fn test_one_failure_never_aborts_the_batch() {
        let gateway = Arc::new(MockGateway::new().failing("Gemini"));
        let use_case = RunBatchUseCase::new(Arc::clone(&gateway));

        let input = input_with_editors(vec![
            drafter(DrafterId::Sonar),
            drafter(DrafterId::Gemini),
            drafter(DrafterId::Claude),
        ]);
        let run = use_case.execute(input).await.unwrap();

        assert_eq!(run.drafts.len(), 3);
        assert!(run.drafts[0].is_success());
        assert!(!run.drafts[1].is_success());
        assert!(run.drafts[2].is_success());
        assert!(run.drafts[1].error_detail.as_deref().unwrap().contains("boom"));
        // Two successes remain, so synthesis still runs.
        assert!(run.synthesis_attempted());
    }

    #[tokio::test]
    async fn test_all_failures_is_terminal_but_complete() {
        let gateway = Arc::new(MockGateway::new().failing("Sonar").failing("Gemini"));
        let use_case = RunBatchUseCase::new(Arc::clone(&gateway));
        let progress = RecordingProgress::default();

        let input = input_with_editors(vec![
            drafter(DrafterId::Sonar),
            drafter(DrafterId::Gemini),
        ]);
        let run = use_case
            .execute_with_progress(input, &progress)
            .await
            .unwrap();

        assert!(run.is_terminal_failure());
        assert_eq!(run.drafts.len(), 2);
        assert!(!run.synthesis_attempted());
        assert_eq!(*progress.synthesis_skips.lock().unwrap(), vec![0]);
        assert!(*progress.completed.lock().unwrap());
    }

    #[tokio::test]
    async fn test_progress_counts_with_mixed_configuration() {
        // K=4 selected, J=2 unconfigured: K-J invocations, K increments.
        let gateway = Arc::new(
            MockGateway::new()
                .unconfigured("Deepseek")
                .unconfigured("Optima"),
        );
        let use_case = RunBatchUseCase::new(Arc::clone(&gateway));
        let progress = RecordingProgress::default();

        let input = input_with_editors(vec![
            drafter(DrafterId::Sonar),
            drafter(DrafterId::Deepseek),
            drafter(DrafterId::Optima),
            drafter(DrafterId::Claude),
        ]);
        use_case
            .execute_with_progress(input, &progress)
            .await
            .unwrap();

        assert_eq!(gateway.draft_calls(), vec!["Sonar", "Claude"]);
        let steps = progress.steps.lock().unwrap();
        let drafting_steps: Vec<&str> = steps.iter().map(|(n, _)| n.as_str()).take(4).collect();
        assert_eq!(drafting_steps, vec!["Sonar", "Deepseek", "Optima", "Claude"]);
    }

    #[tokio::test]
    async fn test_editor_failure_is_isolated() {
        let gateway = Arc::new(MockGateway::new().failing("Oscar"));
        let use_case = RunBatchUseCase::new(Arc::clone(&gateway));

        let input = RunBatchInput::new(
            "Jane Doe",
            vec![drafter(DrafterId::Sonar), drafter(DrafterId::Gemini)],
            "May 2025",
        )
        .with_editors(vec![editor(EditorId::Oscar), editor(EditorId::Graham)]);
        let run = use_case.execute(input).await.unwrap();

        assert_eq!(run.syntheses.len(), 2);
        assert!(!run.syntheses[0].is_success());
        assert!(run.syntheses[1].is_success());
        assert_eq!(run.syntheses[1].text, "Refreshed CV by Graham");
    }

    #[tokio::test]
    async fn test_notifier_failure_is_swallowed() {
        let gateway = Arc::new(MockGateway::new());
        let notifier = Arc::new(FailingNotifier {
            attempts: Mutex::new(0),
        });
        let use_case =
            RunBatchUseCase::new(Arc::clone(&gateway)).with_notifier(Arc::clone(&notifier) as _);

        let input = input_with_editors(vec![
            drafter(DrafterId::Sonar),
            drafter(DrafterId::Gemini),
        ]);
        let run = use_case.execute(input).await.unwrap();

        // Two draft notifications plus one synthesis notification were
        // attempted; all failed, none escalated.
        assert_eq!(*notifier.attempts.lock().unwrap(), 3);
        assert!(run.drafts.iter().all(|d| d.is_success()));
        assert!(run.syntheses.iter().all(|s| s.is_success()));
    }

    #[tokio::test]
    async fn test_fallback_reply_is_labeled() {
        let gateway = Arc::new(MockGateway::new().falling_back("Optima"));
        let use_case = RunBatchUseCase::new(Arc::clone(&gateway));

        let input = input_with_editors(vec![
            drafter(DrafterId::Optima),
            drafter(DrafterId::Sonar),
        ]);
        let run = use_case.execute(input).await.unwrap();

        let optima = &run.drafts[0];
        assert!(optima.is_success());
        assert!(optima.fallback);
        assert_eq!(optima.sources, SourceAttribution::FallbackTrainingData);
    }

    #[tokio::test]
    async fn test_selection_validation() {
        let gateway = Arc::new(MockGateway::new());
        let use_case = RunBatchUseCase::new(Arc::clone(&gateway));

        let empty = RunBatchInput::new("Jane Doe", vec![], "May 2025");
        assert!(matches!(
            use_case.execute(empty).await,
            Err(RunBatchError::NoDrafters)
        ));

        let too_many = RunBatchInput::new(
            "Jane Doe",
            vec![
                drafter(DrafterId::Sonar),
                drafter(DrafterId::Deepseek),
                drafter(DrafterId::Gemini),
                drafter(DrafterId::Optima),
                drafter(DrafterId::Claude),
                ProviderSpec::for_drafter(DrafterId::Sonar, true),
            ],
            "May 2025",
        );
        assert!(matches!(
            use_case.execute(too_many).await,
            Err(RunBatchError::TooManyDrafters(6))
        ));

        let no_editors = RunBatchInput::new(
            "Jane Doe",
            vec![drafter(DrafterId::Sonar), drafter(DrafterId::Gemini)],
            "May 2025",
        );
        assert!(matches!(
            use_case.execute(no_editors).await,
            Err(RunBatchError::MissingEditors)
        ));
    }

    #[tokio::test]
    async fn test_unconfigured_editor_is_skipped() {
        let gateway = Arc::new(MockGateway::new().unconfigured("Oscar"));
        let use_case = RunBatchUseCase::new(Arc::clone(&gateway));

        let input = RunBatchInput::new(
            "Jane Doe",
            vec![drafter(DrafterId::Sonar), drafter(DrafterId::Gemini)],
            "May 2025",
        )
        .with_editors(vec![editor(EditorId::Oscar), editor(EditorId::Graham)]);
        let run = use_case.execute(input).await.unwrap();

        assert_eq!(gateway.synth_calls(), vec!["Graham"]);
        assert_eq!(run.syntheses.len(), 1);
        assert_eq!(run.skipped.len(), 1);
        assert_eq!(run.skipped[0].provider, "Oscar");
    }
}
