//! Progress reporting for batch execution

use biodraft_application::ports::progress::{BatchProgress, BatchStage, StepOutcome};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;

/// Reports batch progress with a single bar over all planned steps
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("=>-")
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchProgress for ProgressReporter {
    fn on_batch_start(&self, total_steps: usize) {
        let pb = ProgressBar::new(total_steps as u64);
        pb.set_style(Self::bar_style());
        pb.set_prefix("Generating");
        pb.set_message("Starting...");
        *self.bar.lock().unwrap() = Some(pb);
    }

    fn on_provider_start(&self, stage: &BatchStage, provider: &str) {
        if let Some(pb) = self.bar.lock().unwrap().as_ref() {
            let verb = match stage {
                BatchStage::Drafting => "drafting",
                BatchStage::Synthesis => "synthesizing",
            };
            pb.set_message(format!("{} is {}...", provider, verb));
        }
    }

    fn on_step_complete(&self, _stage: &BatchStage, provider: &str, outcome: StepOutcome) {
        if let Some(pb) = self.bar.lock().unwrap().as_ref() {
            let status = match outcome {
                StepOutcome::Success => format!("{} {}", "v".green(), provider),
                StepOutcome::Failed => format!("{} {}", "x".red(), provider),
                StepOutcome::Skipped => format!("{} {} (skipped)", "-".yellow(), provider),
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_synthesis_skipped(&self, successful_drafts: usize) {
        if let Some(pb) = self.bar.lock().unwrap().as_ref() {
            pb.set_message(format!(
                "synthesis skipped ({} successful draft(s))",
                successful_drafts
            ));
        }
    }

    fn on_batch_complete(&self) {
        if let Some(pb) = self.bar.lock().unwrap().take() {
            pb.finish_with_message(format!("{}", "batch complete".green()));
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl BatchProgress for SimpleProgress {
    fn on_batch_start(&self, total_steps: usize) {
        println!("{} {} step(s) planned", "->".cyan(), total_steps);
    }

    fn on_provider_start(&self, stage: &BatchStage, provider: &str) {
        println!("  {} {} ({})", "*".cyan(), provider, stage.as_str());
    }

    fn on_step_complete(&self, _stage: &BatchStage, provider: &str, outcome: StepOutcome) {
        match outcome {
            StepOutcome::Success => println!("  {} {}", "v".green(), provider),
            StepOutcome::Failed => println!("  {} {} (failed)", "x".red(), provider),
            StepOutcome::Skipped => println!("  {} {} (skipped)", "-".yellow(), provider),
        }
    }

    fn on_synthesis_skipped(&self, successful_drafts: usize) {
        println!(
            "  {} synthesis skipped ({} successful draft(s))",
            "-".yellow(),
            successful_drafts
        );
    }

    fn on_batch_complete(&self) {
        println!();
    }
}
