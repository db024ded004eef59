//! docsmith - generate documentation for a codebase with an LLM agent.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::mpsc;

use docsmith::config::AgentConfig;
use docsmith::services::events::{AgentEvent, EventEmitter};
use docsmith::utils::logging::init_tracing;
use docsmith::AgentCoordinator;
use docsmith_llm::{OpenAIProvider, ProviderType};

/// Maximum characters of a thought or observation echoed to the terminal.
const PREVIEW_CHARS: usize = 120;

#[derive(Parser)]
#[command(
    name = "docsmith",
    version,
    about = "Generate documentation for a codebase with an LLM agent",
    long_about = "Plans an exploration of the target directory, explores it step by step with \
                  read-only tools, reflects on what is still missing, and writes a Markdown \
                  documentation site."
)]
struct Cli {
    /// Directory to document
    #[arg(default_value = ".")]
    target: PathBuf,

    /// Output directory (default: <target>/docs)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Configuration file (default: <target>/docsmith.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Model name
    #[arg(long)]
    model: Option<String>,

    /// LLM provider: openai, deepseek, qwen, glm, ollama
    #[arg(long)]
    provider: Option<ProviderType>,

    /// Language of the generated documentation
    #[arg(long)]
    language: Option<String>,

    /// Maximum coordinator phases per run
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Debug logging and full error chains
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let verbose = cli.verbose;

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        if verbose {
            for cause in e.chain().skip(1) {
                eprintln!("  caused by: {cause}");
            }
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    init_tracing(cli.verbose)?;

    let target = cli
        .target
        .canonicalize()
        .with_context(|| format!("cannot access {}", cli.target.display()))?;

    let mut config = AgentConfig::load(cli.config.as_deref(), &target)?;
    config.apply_env();
    if let Some(provider) = cli.provider {
        config.llm.provider = provider;
    }
    if let Some(model) = cli.model {
        config.llm.model = Some(model);
    }
    if let Some(language) = cli.language {
        config.language = Some(language);
    }
    if let Some(max) = cli.max_iterations {
        config.max_iterations = max;
    }
    if let Some(output) = cli.output {
        // Relative to the working directory, unlike paths from the config file
        config.output_dir = std::env::current_dir()?.join(output);
    }
    config.resolve_dirs(&target);
    config.validate()?;

    let provider = OpenAIProvider::new(config.llm.to_provider_config())
        .context("failed to create LLM provider")?;
    println!(
        "Documenting {} with {} ({})",
        target.display(),
        config.llm.provider,
        config.llm.to_provider_config().model
    );

    let output_dir = config.output_dir.clone();
    let (tx, rx) = mpsc::unbounded_channel();
    let printer = tokio::spawn(print_events(rx));

    let report = AgentCoordinator::new(Arc::new(provider), config, &target)
        .with_events(EventEmitter::new(tx))
        .run()
        .await;
    // The coordinator (and its sender) is gone, so the printer drains and exits
    let _ = printer.await;
    let report = report?;

    println!(
        "\nDone in {} phase(s){}: {} section(s), {} file(s) analyzed, {} insight(s).",
        report.iterations,
        if report.forced_termination {
            " (iteration limit reached)"
        } else {
            ""
        },
        report.memory.sections().len(),
        report.memory.analyzed_file_count(),
        report.memory.insights().len()
    );
    println!("Documentation written to {}", output_dir.display());
    Ok(())
}

fn preview(text: &str) -> String {
    let line = text.lines().find(|l| !l.trim().is_empty()).unwrap_or("").trim();
    if line.chars().count() > PREVIEW_CHARS {
        format!("{}...", line.chars().take(PREVIEW_CHARS).collect::<String>())
    } else {
        line.to_string()
    }
}

async fn print_events(mut rx: mpsc::UnboundedReceiver<AgentEvent>) {
    while let Some(event) = rx.recv().await {
        match event {
            AgentEvent::PhaseChanged { phase, iteration } => {
                println!("\n== [{}] {} ==", iteration, phase);
            }
            AgentEvent::PlanCreated { overview, steps } => {
                println!("Plan with {} step(s): {}", steps, preview(&overview));
            }
            AgentEvent::StepStarted {
                step_id,
                action,
                target,
            } => {
                println!("\nStep {}: {} ({})", step_id, action, target);
            }
            AgentEvent::Thought { content, .. } => {
                println!("  thought: {}", preview(&content));
            }
            AgentEvent::ToolCall { tool_name, .. } => {
                println!("  -> {}", tool_name);
            }
            AgentEvent::Observation {
                success: false,
                content,
                ..
            } => {
                println!("  !! {}", preview(&content));
            }
            AgentEvent::Observation { .. } => {}
            AgentEvent::StepCompleted {
                step_id,
                iterations,
                clean_stop,
            } => {
                let note = if clean_stop { "" } else { ", turn limit reached" };
                println!("Step {} done ({} turn(s){})", step_id, iterations, note);
            }
            AgentEvent::Reflection {
                completeness,
                should_continue,
                missing_areas,
                ..
            } => {
                println!(
                    "Completeness {}%{}",
                    completeness,
                    if should_continue && !missing_areas.is_empty() {
                        format!(", missing: {}", missing_areas.join(", "))
                    } else {
                        String::new()
                    }
                );
            }
            AgentEvent::PlanAdjusted { added_steps } => {
                println!("Added {} step(s) to the plan", added_steps);
            }
            AgentEvent::ForcedTermination { iterations } => {
                println!("Iteration limit reached after {} phase(s)", iterations);
            }
            AgentEvent::Finished { .. } => {}
        }
    }
}
