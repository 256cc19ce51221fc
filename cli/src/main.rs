//! CLI entrypoint for biodraft
//!
//! Wires together all layers using dependency injection.

use anyhow::{bail, Context, Result};
use biodraft_application::ports::notifier::{NoNotifier, Notifier};
use biodraft_application::{RunBatchInput, RunBatchUseCase};
use biodraft_domain::{ConflictNotePolicy, DrafterId, EditorId, Subject, MAX_DRAFTERS};
use biodraft_infrastructure::{
    ConfigLoader, HttpProviderGateway, ProviderCatalog, TelegramNotifier,
};
use biodraft_presentation::{
    Cli, ConflictNotes, ConsoleFormatter, OutputFormat, ProgressReporter,
};
use clap::Parser;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?
    };

    let subject = match cli.subject.as_deref().and_then(Subject::try_new) {
        Some(s) => s,
        None => bail!("Please enter the name of the individual."),
    };

    // === Startup configuration resolution ===
    let catalog = ProviderCatalog::from_config(&config);
    if !catalog.any_drafter_configured() {
        bail!(
            "No CV generation models are available. Set at least one of \
             PERPLEXITY_API_KEY, OPENAI_API_KEY, GOOGLE_API_KEY or \
             ANTHROPIC_API_KEY in the environment."
        );
    }

    // Drafter selection: explicit ids, or every configured drafter.
    let drafter_ids: Vec<DrafterId> = if cli.drafter.is_empty() {
        catalog.configured_drafters()
    } else {
        cli.drafter
            .iter()
            .map(|s| s.parse())
            .collect::<Result<_, _>>()
            .context("Invalid drafter selection")?
    };
    if drafter_ids.is_empty() {
        bail!("Please select at least one CV generation model.");
    }
    if drafter_ids.len() > MAX_DRAFTERS {
        bail!(
            "Too many drafters selected: {} (maximum is {}).",
            drafter_ids.len(),
            MAX_DRAFTERS
        );
    }

    // Editor selection only matters when synthesis is reachable.
    let editor_ids: Vec<EditorId> = if drafter_ids.len() > 1 {
        let ids: Vec<EditorId> = if cli.editor.is_empty() {
            catalog.default_editor().into_iter().collect()
        } else {
            cli.editor
                .iter()
                .map(|s| s.parse())
                .collect::<Result<_, _>>()
                .context("Invalid editor selection")?
        };
        if ids.is_empty() {
            bail!("Please select at least one editor model when synthesizing multiple CVs.");
        }
        ids
    } else {
        Vec::new()
    };

    let policy = match cli.conflict_notes {
        Some(ConflictNotes::Named) => ConflictNotePolicy::NameDrafters,
        Some(ConflictNotes::Generic) => ConflictNotePolicy::Generic,
        None => config
            .synthesis
            .conflict_notes
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))
            .context("Invalid [synthesis] conflict_notes value")?,
    };

    // The reference date is resolved here, at the boundary, so the
    // prompt factory itself never reads the clock.
    let reference_date = cli
        .date
        .clone()
        .unwrap_or_else(|| chrono::Local::now().format("%B %Y").to_string());

    // === Dependency Injection ===
    let gateway = Arc::new(HttpProviderGateway::from_config(&config));
    let notifier: Arc<dyn Notifier> = match TelegramNotifier::from_config(&config.notify) {
        Some(t) => Arc::new(t),
        None => {
            warn!("Telegram bot token or recipient chat id not found; notifications disabled");
            Arc::new(NoNotifier)
        }
    };

    info!(
        "Running batch: {} drafter(s), {} editor(s)",
        drafter_ids.len(),
        editor_ids.len()
    );

    if !cli.quiet {
        println!();
        println!("biodraft - drafting CVs for {}", subject);
        println!("Drafters:");
        for id in &drafter_ids {
            let spec = catalog.drafter(*id);
            let availability = if spec.configured {
                spec.description.as_str()
            } else {
                "unavailable (API key missing)"
            };
            println!("  {:<9} {}", spec.name, availability);
        }
        if !editor_ids.is_empty() {
            println!("Editors:");
            for id in &editor_ids {
                let spec = catalog.editor(*id);
                println!("  {:<9} {}", spec.name, spec.description);
            }
        }
        println!();
    }

    let input = RunBatchInput::new(
        subject,
        drafter_ids
            .iter()
            .map(|id| catalog.drafter(*id).clone())
            .collect(),
        reference_date,
    )
    .with_editors(
        editor_ids
            .iter()
            .map(|id| catalog.editor(*id).clone())
            .collect(),
    )
    .with_policy(policy);

    let use_case = RunBatchUseCase::new(gateway).with_notifier(notifier);

    let run = if cli.quiet {
        use_case.execute(input).await?
    } else {
        let progress = ProgressReporter::new();
        use_case.execute_with_progress(input, &progress).await?
    };

    let output = match cli.output {
        OutputFormat::Full => ConsoleFormatter::format(&run),
        OutputFormat::Drafts => ConsoleFormatter::format_drafts_only(&run),
        OutputFormat::Synthesis => ConsoleFormatter::format_synthesis_only(&run),
        OutputFormat::Json => ConsoleFormatter::format_json(&run),
    };

    println!("{}", output);

    if run.is_terminal_failure() {
        std::process::exit(1);
    }

    Ok(())
}
