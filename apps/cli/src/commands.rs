//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use landeval_core::{
    BridgeEngine, EvaluationConfig, EvaluationResult, ProgressReporter, evaluate, replay,
};
use landeval_dataset::{FixedSelection, PromptSelection, SelectionStrategy};
use landeval_shared::{AppConfig, EngineCommand, init_config, load_config};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// landeval — evaluate land-listing opportunities.
#[derive(Parser)]
#[command(
    name = "landeval",
    version,
    about = "Evaluate land-listing records through a multi-agent analysis pipeline.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Run the evaluation on a selected listing.
    Run {
        /// Listing identifier (stock number). Prompts interactively if omitted.
        #[arg(long)]
        id: Option<String>,

        /// Master dataset path (overrides config).
        #[arg(long)]
        master: Option<String>,

        /// Report output directory (overrides config).
        #[arg(short, long)]
        out: Option<String>,
    },

    /// Train the engine for n iterations, saving results to a file.
    Train {
        /// Number of training iterations.
        iterations: u32,

        /// File the engine saves training results to.
        file: PathBuf,

        /// Listing identifier. Prompts interactively if omitted.
        #[arg(long)]
        id: Option<String>,
    },

    /// Replay engine execution from a specific task.
    Replay {
        /// Task identifier to replay from.
        task_id: String,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "landeval=info",
        1 => "landeval=debug",
        _ => "landeval=trace",
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Run { id, master, out } => {
            cmd_evaluate(id.as_deref(), master.as_deref(), out.as_deref(), EngineCommand::Run)
        }
        Command::Train {
            iterations,
            file,
            id,
        } => cmd_evaluate(
            id.as_deref(),
            None,
            None,
            EngineCommand::Train {
                iterations,
                save_path: file,
            },
        ),
        Command::Replay { task_id } => cmd_replay(&task_id),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn build_config(
    app: &AppConfig,
    master: Option<&str>,
    out: Option<&str>,
    command: EngineCommand,
) -> EvaluationConfig {
    EvaluationConfig {
        master_path: PathBuf::from(master.unwrap_or(&app.data.master_path)),
        staging_dir: PathBuf::from(&app.data.staging_dir),
        reports_dir: PathBuf::from(out.unwrap_or(&app.reports.output_dir)),
        identifier_field: app.data.identifier_field.clone(),
        command,
    }
}

fn cmd_evaluate(
    id: Option<&str>,
    master: Option<&str>,
    out: Option<&str>,
    command: EngineCommand,
) -> Result<()> {
    let app = load_config()?;
    let config = build_config(&app, master, out, command);

    let selector: Box<dyn SelectionStrategy> = match id {
        Some(id) => Box::new(FixedSelection(id.to_string())),
        None => Box::new(PromptSelection),
    };

    let engine = BridgeEngine::new(app.engine.clone());

    info!(
        master = %config.master_path.display(),
        reports = %config.reports_dir.display(),
        "starting evaluation"
    );

    let reporter = CliProgress::new();
    let result = evaluate(&config, &engine, selector.as_ref(), &reporter)?;

    println!();
    println!("  Evaluation complete!");
    println!("  Listing:  {}", result.listing_id);
    println!("  Extracts: {}", result.extract_count);
    if result.warning_count > 0 {
        println!("  Warnings: {} (partial segment coverage)", result.warning_count);
    }
    println!("  Report:   {}", result.report.path.display());
    println!("  Time:     {:.1}s", result.elapsed.as_secs_f64());
    println!();

    Ok(())
}

fn cmd_replay(task_id: &str) -> Result<()> {
    let app = load_config()?;
    let engine = BridgeEngine::new(app.engine.clone());

    info!(task_id, "replaying engine execution");
    let report = replay(PathBuf::from(&app.reports.output_dir).as_path(), &engine, task_id)?;

    println!();
    println!("  Replay complete!");
    println!("  Report: {}", report.path.display());
    println!();

    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config file created at {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config = load_config()?;
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn done(&self, _result: &EvaluationResult) {
        self.spinner.finish_and_clear();
    }
}
