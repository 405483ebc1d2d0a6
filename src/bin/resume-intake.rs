//! CLI binary for resume-intake.
//!
//! A thin shim over the library crate: maps CLI flags to `IntakeConfig`,
//! drives one `UploadSession` through select → submit and prints the status.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use resume_intake::{
    ExtractionResult, FileHandle, IntakeConfig, IntakeProgressCallback, Phase, ProgressCallback,
    Selection, SessionSnapshot, StatusLevel, UploadSession, ValidationError,
};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
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

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal spinner that follows the session through reading and extraction.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("Preparing");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

impl IntakeProgressCallback for CliProgressCallback {
    fn on_file_selected(&self, selection: &Selection) {
        self.bar.set_prefix("Reading");
        self.bar
            .set_message(format!("{}  {}", selection.name, dim(&selection.size_label())));
    }

    fn on_validation_failed(&self, _selection: &Selection, _error: &ValidationError) {
        self.bar.finish_and_clear();
    }

    fn on_payload_ready(&self, name: &str, len: usize) {
        self.bar.println(format!(
            "  {} {}  {}",
            green("✓"),
            name,
            dim(&format!("{len} bytes read"))
        ));
    }

    fn on_extraction_start(&self, name: &str) {
        self.bar.set_prefix("Uploading");
        self.bar.set_message(name.to_string());
    }

    fn on_extraction_complete(&self, _result: &ExtractionResult) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Submit to an extraction service
  resume-intake --endpoint https://extract.example.com/resume cv.pdf

  # Extract skills with an LLM (provider auto-detected from API keys)
  resume-intake cv.pdf

  # Only validate and read the file
  resume-intake --check-only cv.pdf

  # Harden the type check with a %PDF signature test
  resume-intake --verify-signature --check-only upload.bin --mime application/pdf

  # Machine-readable session snapshot
  resume-intake --json cv.pdf

ENVIRONMENT VARIABLES:
  OPENAI_API_KEY          OpenAI API key
  ANTHROPIC_API_KEY       Anthropic API key
  GEMINI_API_KEY          Google Gemini API key
  EDGEQUAKE_LLM_PROVIDER  Override provider (openai, anthropic, gemini, ollama)
  EDGEQUAKE_MODEL         Override model ID
  PDFIUM_LIB_PATH         Path to libpdfium (LLM extraction renders pages with it)
"#;

/// Validate a resume PDF and submit it for skill extraction.
#[derive(Parser, Debug)]
#[command(
    name = "resume-intake",
    version,
    about = "Validate a resume PDF and submit it for skill extraction",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Path to the resume file.
    input: PathBuf,

    /// Declared MIME type (default: guessed from the extension).
    #[arg(long, env = "RESUME_INTAKE_MIME")]
    mime: Option<String>,

    /// Size limit in MiB.
    #[arg(long, env = "RESUME_INTAKE_MAX_SIZE_MB", default_value_t = 10,
          value_parser = clap::value_parser!(u64).range(1..=1024))]
    max_size_mb: u64,

    /// Reject files whose content does not start with %PDF.
    #[arg(long, env = "RESUME_INTAKE_VERIFY_SIGNATURE")]
    verify_signature: bool,

    /// HTTP endpoint of an extraction service.
    #[arg(long, env = "RESUME_INTAKE_ENDPOINT")]
    endpoint: Option<String>,

    /// LLM provider: openai, anthropic, gemini, ollama, azure.
    #[arg(long, env = "EDGEQUAKE_PROVIDER")]
    provider: Option<String>,

    /// LLM model ID (default: gpt-4.1-nano).
    #[arg(long, env = "EDGEQUAKE_MODEL")]
    model: Option<String>,

    /// Extraction timeout in seconds.
    #[arg(long, env = "RESUME_INTAKE_TIMEOUT", default_value_t = 60)]
    timeout: u64,

    /// Validate and read the file without submitting it.
    #[arg(long)]
    check_only: bool,

    /// Print the final session snapshot as JSON.
    #[arg(long, env = "RESUME_INTAKE_JSON")]
    json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "RESUME_INTAKE_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "RESUME_INTAKE_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let show_progress = !cli.quiet && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config and session ─────────────────────────────────────────
    let spinner = (show_progress && !cli.verbose).then(CliProgressCallback::new);
    let progress_cb: Option<ProgressCallback> = spinner
        .clone()
        .map(|cb| cb as Arc<dyn IntakeProgressCallback>);
    let config = build_config(&cli, progress_cb)?;

    let outcome = run(&cli, config).await;
    if let Some(ref cb) = spinner {
        cb.bar.finish_and_clear();
    }
    let snapshot = outcome?;
    finish(&cli, &snapshot)
}

/// Drive one session through select and (unless `--check-only`) submit.
async fn run(cli: &Cli, config: IntakeConfig) -> Result<SessionSnapshot> {
    let session = if cli.check_only {
        UploadSession::new(config, Arc::new(NeverSubmitted))
    } else {
        UploadSession::from_config(config).context("Failed to set up extraction")?
    };

    // ── Select ───────────────────────────────────────────────────────────
    let mut handle = FileHandle::from_path(&cli.input)
        .await
        .with_context(|| format!("Cannot open {}", cli.input.display()))?;
    if let Some(ref mime) = cli.mime {
        handle = handle.with_mime_type(mime.clone());
    }

    let snapshot = session.select_file(handle).await;
    if snapshot.phase != Phase::Ready || cli.check_only {
        return Ok(snapshot);
    }

    // ── Submit ───────────────────────────────────────────────────────────
    session.submit().await.context("Submission failed")?;
    Ok(session.snapshot())
}

/// Print the outcome and map it to an exit code.
fn finish(cli: &Cli, snapshot: &SessionSnapshot) -> Result<ExitCode> {
    let ok = snapshot.error.is_none()
        && snapshot.result.as_ref().is_none_or(|r| r.succeeded)
        && matches!(snapshot.phase, Phase::Ready | Phase::Done);

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(snapshot).context("Failed to serialise snapshot")?
        );
    } else if !cli.quiet || !ok {
        if let Some(ref sel) = snapshot.selection {
            eprintln!("{}  {}", bold(&sel.name), dim(&format!("{} • {}", sel.size_label(), sel.mime_type)));
        }
        match snapshot.status() {
            Some(status) => {
                let line = format!("{}: {}", status.title(), status.message);
                match status.level {
                    StatusLevel::Success => println!("{} {}", green("✔"), line),
                    StatusLevel::Error => eprintln!("{} {}", red("✘"), red(&line)),
                }
            }
            None => eprintln!("{} ready to submit ({} bytes)", green("✔"), snapshot.payload_len.unwrap_or(0)),
        }
    }

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Map CLI args to `IntakeConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<IntakeConfig> {
    let mut builder = IntakeConfig::builder()
        .max_size_bytes(cli.max_size_mb * 1024 * 1024)
        .verify_signature(cli.verify_signature)
        .extract_timeout_secs(cli.timeout);

    if let Some(ref endpoint) = cli.endpoint {
        builder = builder.endpoint(endpoint.clone());
    }
    if let Some(ref provider) = cli.provider {
        builder = builder.provider_name(provider.clone());
    }
    if let Some(ref model) = cli.model {
        builder = builder.model(model.clone());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// Stand-in collaborator for `--check-only`, where `submit` is never called.
struct NeverSubmitted;

#[async_trait::async_trait]
impl resume_intake::Extractor for NeverSubmitted {
    async fn extract(
        &self,
        _payload: &resume_intake::BinaryPayload,
    ) -> Result<ExtractionResult, resume_intake::ExtractorError> {
        Ok(ExtractionResult::failure("Submission disabled by --check-only"))
    }
}
