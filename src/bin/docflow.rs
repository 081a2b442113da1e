//! CLI binary for docflow.
//!
//! A thin shim over the library crate that maps CLI flags to a
//! `ProcessingSession` and renders its progress.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use docflow::{
    cancel_pair, catalog, ArtifactStore, CompressionLevel, HttpRemoteClient, NoShareSurface,
    Observer, PageNumberFormat, PagePosition, Phase, ProcessingSession, ProcessingState,
    ServiceConfig, SessionObserver, ToolOptions,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress observer using indicatif ────────────────────────────────────

/// Terminal observer: one bar that follows the session phases. The
/// percentage during the upload phase is the library's timed sweep, not a
/// byte count.
struct CliObserver {
    bar: ProgressBar,
}

impl CliObserver {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(100);
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>3}%  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(style);
        bar.set_prefix("Preparing");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl SessionObserver for CliObserver {
    fn on_state_change(&self, state: &ProcessingState) {
        let prefix = match state.phase {
            Phase::Idle => "Idle",
            Phase::Validating => "Checking",
            Phase::Uploading => "Uploading",
            Phase::Persisting => "Saving",
            Phase::Succeeded => "Done",
            Phase::Failed => "Failed",
        };
        self.bar.set_prefix(prefix);
        self.bar.set_message(state.message.clone());
        self.bar.set_position(state.progress_percent as u64);
    }

    fn on_progress(&self, percent: u8) {
        self.bar.set_position(percent as u64);
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # List the available tools
  docflow list

  # Merge three PDFs (output order = argument order)
  docflow run merge-pdf a.pdf b.pdf c.pdf

  # Split pages 1-3 and page 5 into a ZIP of PDFs
  docflow run split-pdf report.pdf --ranges 1-3,5

  # Reorder pages, rotating them a quarter turn
  docflow run organize-pdf report.pdf --page-order 3,1,2 --rotate 90

  # Stamp page numbers bottom-center, starting at page 2
  docflow run add-page-numbers report.pdf --start-page 2

  # Bundle photos into one PDF
  docflow run image-to-pdf img1.jpg img2.png

  # Convert a Word document against a self-hosted backend
  docflow run word-to-pdf notes.docx --base-url http://localhost:3000

ENVIRONMENT VARIABLES:
  DOCFLOW_BASE_URL       Service origin (default: hosted DocFlow backend)
  DOCFLOW_DOCUMENTS_DIR  Where artifacts are saved (default: ./documents)

NOTES:
  The progress bar animates on a timer while the upload is in flight; the
  service reports no transfer progress, so the percentage is cosmetic.
  Failed conversions are never retried automatically — rerun when ready.
"#;

/// Run DocFlow conversion tools from the command line.
#[derive(Parser, Debug)]
#[command(
    name = "docflow",
    version,
    about = "Process documents with the DocFlow conversion service",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "DOCFLOW_VERBOSE", global = true)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "DOCFLOW_QUIET", global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every available tool.
    List,
    /// Run a tool against one or more files.
    Run(RunArgs),
}

#[derive(clap::Args, Debug)]
struct RunArgs {
    /// Tool id, e.g. merge-pdf (see `docflow list`).
    tool: String,

    /// Input files, uploaded in the order given.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Service origin.
    #[arg(long, env = "DOCFLOW_BASE_URL")]
    base_url: Option<String>,

    /// Directory to save the result into.
    #[arg(long, env = "DOCFLOW_DOCUMENTS_DIR")]
    output_dir: Option<PathBuf>,

    /// Whole-request timeout in seconds.
    #[arg(long, env = "DOCFLOW_TIMEOUT", default_value_t = 120)]
    timeout: u64,

    /// split-pdf: page ranges, comma-separated tokens like 1-3,5.
    #[arg(long)]
    ranges: Option<String>,

    /// organize-pdf: new page order, e.g. 3,1,2.
    #[arg(long)]
    page_order: Option<String>,

    /// organize-pdf: rotate pages by 90, 180 or 270 degrees.
    #[arg(long)]
    rotate: Option<String>,

    /// compress-pdf: compression strength.
    #[arg(long, value_enum, default_value = "medium")]
    level: LevelArg,

    /// add-page-numbers: stamp position.
    #[arg(long, value_enum, default_value = "bottom-center")]
    position: PositionArg,

    /// add-page-numbers: first page to stamp (1-based).
    #[arg(long, default_value = "1")]
    start_page: String,

    /// add-page-numbers: number printed on that first page.
    #[arg(long, default_value = "1")]
    start_number: String,

    /// add-page-numbers: label style.
    #[arg(long, value_enum, default_value = "number-only")]
    number_format: FormatArg,

    /// Print the outcome as JSON instead of a summary line.
    #[arg(long)]
    json: bool,

    /// Disable the progress bar.
    #[arg(long)]
    no_progress: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum LevelArg {
    Low,
    Medium,
    High,
}

impl From<LevelArg> for CompressionLevel {
    fn from(v: LevelArg) -> Self {
        match v {
            LevelArg::Low => CompressionLevel::Low,
            LevelArg::Medium => CompressionLevel::Medium,
            LevelArg::High => CompressionLevel::High,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum PositionArg {
    TopLeft,
    TopCenter,
    TopRight,
    MiddleLeft,
    MiddleCenter,
    MiddleRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl From<PositionArg> for PagePosition {
    fn from(v: PositionArg) -> Self {
        match v {
            PositionArg::TopLeft => PagePosition::TopLeft,
            PositionArg::TopCenter => PagePosition::TopCenter,
            PositionArg::TopRight => PagePosition::TopRight,
            PositionArg::MiddleLeft => PagePosition::MiddleLeft,
            PositionArg::MiddleCenter => PagePosition::MiddleCenter,
            PositionArg::MiddleRight => PagePosition::MiddleRight,
            PositionArg::BottomLeft => PagePosition::BottomLeft,
            PositionArg::BottomCenter => PagePosition::BottomCenter,
            PositionArg::BottomRight => PagePosition::BottomRight,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    NumberOnly,
    PageOfTotal,
}

impl From<FormatArg> for PageNumberFormat {
    fn from(v: FormatArg) -> Self {
        match v {
            FormatArg::NumberOnly => PageNumberFormat::NumberOnly,
            FormatArg::PageOfTotal => PageNumberFormat::PageOfTotal,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // INFO-level library logs would fight the progress bar for the
    // terminal; keep them at error unless --verbose asks for more.
    let filter = if cli.verbose { "debug" } else { "error" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Command::List => {
            list_tools();
            Ok(())
        }
        Command::Run(args) => run_tool(args, cli.quiet).await,
    }
}

fn list_tools() {
    let mut current_category = None;
    for tool in catalog::all() {
        if current_category != Some(tool.category) {
            current_category = Some(tool.category);
            println!("\n{}", bold(&format!("{:?} tools", tool.category)));
        }
        println!("  {:<20} {}", tool.id, dim(tool.description));
    }
    println!();
}

async fn run_tool(args: RunArgs, quiet: bool) -> Result<()> {
    let mut config_builder = ServiceConfig::builder()
        .request_timeout(Duration::from_secs(args.timeout));
    if let Some(ref url) = args.base_url {
        config_builder = config_builder.base_url(url.clone());
    }
    if let Some(ref dir) = args.output_dir {
        config_builder = config_builder.documents_dir(dir.clone());
    }
    let config = config_builder.build();

    let remote = HttpRemoteClient::new(config.clone())
        .context("Failed to initialise the HTTP client")?;
    let store = ArtifactStore::new(&config.documents_dir);

    let mut session = ProcessingSession::new(&args.tool, config)
        .with_context(|| format!("No such tool: '{}'. Try `docflow list`.", args.tool))?;

    session.add_files(
        docflow::pick_paths(&args.files).context("Could not read the selected files")?,
    );

    if let Some(options) = build_options(&args, &session) {
        session.set_options(options);
    }

    // Surface the gate's verdict before submitting so the error reads like
    // the disabled-submit state the app shows.
    if let Err(reason) = session.validation() {
        anyhow::bail!("{reason}");
    }

    // Ctrl-C cancels the in-flight request instead of killing the process.
    let (cancel_handle, cancel_token) = cancel_pair();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_handle.cancel();
        }
    });

    let show_progress = !quiet && !args.no_progress && !args.json;
    let observer: Option<Arc<CliObserver>> = show_progress.then(CliObserver::new);
    let dyn_observer: Observer = match &observer {
        Some(obs) => Arc::clone(obs) as Observer,
        None => Arc::new(docflow::NoopObserver),
    };

    let outcome = session
        .process_with(&remote, &store, &NoShareSurface, dyn_observer, cancel_token)
        .await;

    if let Some(obs) = &observer {
        obs.finish();
    }

    match outcome {
        Ok(outcome) => {
            if args.json {
                println!(
                    "{}",
                    serde_json::json!({
                        "tool": args.tool,
                        "state": session.state(),
                        "artifact": outcome.artifact_path,
                        "notice": outcome.notice,
                    })
                );
            } else if !quiet {
                eprintln!(
                    "{} {}  {}",
                    green("✔"),
                    bold(session.descriptor().display_name),
                    dim(&outcome.notice),
                );
            }
            Ok(())
        }
        Err(err) => {
            if args.json {
                println!(
                    "{}",
                    serde_json::json!({
                        "tool": args.tool,
                        "state": session.state(),
                    })
                );
            } else {
                eprintln!("{} {}", red("✘"), err);
            }
            std::process::exit(1);
        }
    }
}

/// Map option flags onto the tool's option family; `None` keeps the
/// session's defaults (tools without options, or defaults untouched).
fn build_options(args: &RunArgs, session: &ProcessingSession) -> Option<ToolOptions> {
    use docflow::OptionSchema;

    match session.tool_config().options {
        OptionSchema::None => None,
        OptionSchema::Split => {
            let ranges = args
                .ranges
                .as_deref()
                .unwrap_or("")
                .split(',')
                .map(str::to_string)
                .collect();
            Some(ToolOptions::Split { ranges })
        }
        OptionSchema::Compress => Some(ToolOptions::Compress {
            level: args.level.into(),
        }),
        OptionSchema::Organize => Some(ToolOptions::Organize {
            page_order: args.page_order.clone().unwrap_or_default(),
            rotate_angle: args.rotate.clone(),
        }),
        OptionSchema::PageNumbers => Some(ToolOptions::PageNumbers {
            position: args.position.into(),
            start_page: args.start_page.clone(),
            start_number: args.start_number.clone(),
            format: args.number_format.into(),
        }),
    }
}
