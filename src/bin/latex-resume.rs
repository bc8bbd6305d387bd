//! CLI binary for latex-resume-client.
//!
//! A thin shim over the library crate: maps CLI flags to `ClientConfig`,
//! drives a `FormSession` and prints what its `FormView` says to show.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use latex_resume_client::view::{self, FormView};
use latex_resume_client::{
    Clipboard, ClientConfig, ClientError, Endpoint, FormSession, HttpService, SelectedFile,
    SessionError, ValidationError,
};
use std::future::Future;
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader, Lines, Stdin};
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
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── System clipboard ─────────────────────────────────────────────────────────

/// How long copied text has to stay available after `set_text` returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Retention {
    /// The clipboard handle lives as long as the interactive session.
    Session,
    /// The process exits right after copying. On Linux the selection is served
    /// by this process, so `set_text` blocks until another program owns it.
    UntilReplaced,
}

impl Retention {
    fn for_cli(cli: &Cli) -> Self {
        if cli.interactive {
            Retention::Session
        } else {
            Retention::UntilReplaced
        }
    }
}

struct SystemClipboard {
    inner: arboard::Clipboard,
    #[cfg_attr(not(target_os = "linux"), allow(dead_code))]
    retention: Retention,
}

impl SystemClipboard {
    fn open(retention: Retention) -> Result<Self, ClientError> {
        arboard::Clipboard::new()
            .map(|inner| Self { inner, retention })
            .map_err(clipboard_error)
    }
}

impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClientError> {
        #[cfg(target_os = "linux")]
        if self.retention == Retention::UntilReplaced {
            use arboard::SetExtLinux;
            let inner = &mut self.inner;
            return tokio::task::block_in_place(|| inner.set().wait().text(text))
                .map_err(clipboard_error);
        }
        self.inner.set_text(text).map_err(clipboard_error)
    }
}

fn clipboard_error(e: arboard::Error) -> ClientError {
    ClientError::Clipboard(e.to_string())
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Tailor a LaTeX résumé to the CV in cv.pdf (result on stdout)
  latex-resume cv.pdf --template resume.tex

  # Template from stdin (needs --follow-up, stdin is no longer free to prompt)
  cat resume.tex | latex-resume cv.pdf --template - -f "none" -o tailored.tex

  # Answer the service's follow-up question up front
  latex-resume cv.pdf -t resume.tex --follow-up "GitHub: https://github.com/jane"

  # Full response record as JSON
  latex-resume cv.pdf -t resume.tex --json > response.json

  # Interactive form (file / template / upload / followup / send / copy / log)
  latex-resume --interactive

  # Point at a local instance of the service
  latex-resume --endpoint http://127.0.0.1:5000 cv.pdf -t resume.tex

NOTES:
  The service usually takes 2-5 minutes per request. No timeout is applied
  unless --timeout is given, and a running request cannot be aborted other
  than by exiting.

  With --copy on Linux the process keeps serving the clipboard until another
  program (usually a clipboard manager) takes it over.

ENVIRONMENT VARIABLES:
  LATEX_RESUME_ENDPOINT   Base URL of the transformation service
  LATEX_RESUME_TIMEOUT    Request timeout in seconds
  RUST_LOG                tracing filter (overrides --verbose / --quiet)
"#;

/// Tailor a LaTeX template to a PDF using the remote transformation service.
#[derive(Parser, Debug)]
#[command(
    name = "latex-resume",
    version,
    about = "Tailor a LaTeX template to a PDF using a remote transformation service",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// PDF to upload (required unless --interactive).
    #[arg(required_unless_present = "interactive")]
    pdf: Option<PathBuf>,

    /// Template file, or `-` to read it from stdin (then --follow-up is required).
    #[arg(short, long, required_unless_present = "interactive")]
    template: Option<String>,

    /// Answer to send if the service asks for more details.
    #[arg(short, long, required_if_eq("template", "-"))]
    follow_up: Option<String>,

    /// Write the result to this file instead of stdout.
    #[arg(short, long, env = "LATEX_RESUME_OUTPUT")]
    output: Option<PathBuf>,

    /// Copy the result to the system clipboard.
    #[arg(long)]
    copy: bool,

    /// Output the full response record as JSON.
    #[arg(long)]
    json: bool,

    /// Run the line-oriented interactive form.
    #[arg(short, long)]
    interactive: bool,

    /// Base URL of the transformation service.
    #[arg(long, env = "LATEX_RESUME_ENDPOINT", default_value = latex_resume_client::DEFAULT_BASE_URL)]
    endpoint: String,

    /// Request timeout in seconds (default: wait indefinitely).
    #[arg(long, env = "LATEX_RESUME_TIMEOUT")]
    timeout: Option<u64>,

    /// Disable the spinner.
    #[arg(long, env = "LATEX_RESUME_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "LATEX_RESUME_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "LATEX_RESUME_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let show_progress = !cli.quiet && !cli.no_progress && io::stderr().is_terminal();
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

    // ── Build client ─────────────────────────────────────────────────────
    let mut builder = ClientConfig::builder().base_url(&cli.endpoint);
    if let Some(secs) = cli.timeout {
        builder = builder.request_timeout_secs(secs);
    }
    let config = builder.build().context("Invalid configuration")?;
    let service = HttpService::new(config).context("Failed to initialise HTTP client")?;
    let mut session = FormSession::new(service);

    if cli.interactive {
        return run_interactive(&mut session, show_progress).await;
    }
    run_once(&cli, &mut session, show_progress).await
}

// ── One-shot mode ────────────────────────────────────────────────────────────

async fn run_once(cli: &Cli, session: &mut FormSession<HttpService>, progress: bool) -> Result<()> {
    let pdf = cli.pdf.as_deref().context("A PDF path is required")?;
    let template = cli.template.as_deref().context("--template is required")?;

    session.select_file(
        SelectedFile::from_path(pdf)
            .await
            .context("Failed to load PDF")?,
    );
    session.set_template(read_template(template).await?);

    let follow_up = with_spinner(progress, Endpoint::Upload, session.submit_upload())
        .await
        .map_err(report)?;

    if follow_up {
        let question = session.state().result().unwrap_or_default().to_string();
        if !cli.quiet {
            eprintln!("{} {}", cyan("?"), bold(view::FOLLOW_UP_HEADING));
            eprintln!("{}", dim(view::FOLLOW_UP_EXPLANATION));
            eprintln!("\n{question}\n");
        }

        let mut stdin = BufReader::new(tokio::io::stdin()).lines();
        let mut preset = cli.follow_up.clone();
        loop {
            let answer = match preset.take() {
                Some(answer) => answer,
                None => prompt_block(&mut stdin, view::FOLLOW_UP_PLACEHOLDER)
                    .await?
                    .context("No follow-up answer provided")?,
            };
            session.set_follow_up(answer);
            match with_spinner(progress, Endpoint::FollowUp, session.submit_follow_up()).await {
                Ok(()) => break,
                Err(SessionError::Validation(ValidationError::BlankFollowUp))
                    if io::stdin().is_terminal() =>
                {
                    eprintln!("{}", red(&ValidationError::BlankFollowUp.to_string()));
                }
                Err(e) => return Err(report(e)),
            }
        }
    }

    emit_result(cli, session)
}

fn emit_result(cli: &Cli, session: &FormSession<HttpService>) -> Result<()> {
    let state = session.state();

    if cli.json {
        let json = serde_json::to_string_pretty(&state.extracted())
            .context("Failed to serialise response")?;
        println!("{json}");
    } else if let Some(result) = state.result() {
        if let Some(ref path) = cli.output {
            std::fs::write(path, result)
                .with_context(|| format!("Failed to write result to {}", path.display()))?;
            if !cli.quiet {
                eprintln!("{}  {}", green("✔"), bold(&path.display().to_string()));
            }
        } else {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(result.as_bytes())
                .context("Failed to write to stdout")?;
            if !result.ends_with('\n') {
                handle.write_all(b"\n").ok();
            }
        }
    } else if !cli.quiet {
        eprintln!("{}", dim("The service returned no result."));
    }

    if cli.copy {
        let mut clipboard = SystemClipboard::open(Retention::for_cli(cli))?;
        if session.copy_result(&mut clipboard)? && !cli.quiet {
            eprintln!("{} {}", green("✔"), view::COPY_NOTICE);
        }
    }

    Ok(())
}

// ── Interactive mode ─────────────────────────────────────────────────────────

const INTERACTIVE_HELP: &str = "\
commands:
  file <path>         select the PDF
  template <path>     load the template from a file
  edit                type the template (end with a line containing only '.')
  followup [text]     set the follow-up answer (multi-line if no text given)
  upload              submit PDF + template
  send                submit the follow-up answer
  copy                copy the result to the clipboard
  log                 list previously used templates
  show                redraw the form
  help                this text
  quit                exit";

async fn run_interactive(session: &mut FormSession<HttpService>, progress: bool) -> Result<()> {
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    let mut clipboard: Option<SystemClipboard> = None;

    eprintln!("{}", bold(view::TITLE));
    eprintln!("{}", dim(INTERACTIVE_HELP));

    loop {
        eprint!("{} ", cyan("›"));
        io::stderr().flush().ok();
        let Some(line) = stdin.next_line().await.context("Failed to read stdin")? else {
            break;
        };
        let line = line.trim();
        let (command, arg) = line.split_once(' ').unwrap_or((line, ""));
        let arg = arg.trim();

        match command {
            "" => continue,
            "file" => match SelectedFile::from_path(arg).await {
                Ok(file) => session.select_files([file]),
                Err(e) => eprintln!("{}", red(&e.to_string())),
            },
            "template" => match tokio::fs::read_to_string(arg).await {
                Ok(text) => session.set_template(text),
                Err(e) => eprintln!("{}", red(&format!("Failed to read '{arg}': {e}"))),
            },
            "edit" => {
                let text = prompt_block(&mut stdin, view::TEMPLATE_PLACEHOLDER)
                    .await?
                    .unwrap_or_default();
                session.set_template(text);
            }
            "followup" => {
                let text = if arg.is_empty() {
                    prompt_block(&mut stdin, view::FOLLOW_UP_PLACEHOLDER)
                        .await?
                        .unwrap_or_default()
                } else {
                    arg.to_string()
                };
                session.set_follow_up(text);
            }
            "upload" => {
                let _ = with_spinner(progress, Endpoint::Upload, session.submit_upload()).await;
            }
            "send" => {
                if let Err(SessionError::FollowUpNotRequested) =
                    with_spinner(progress, Endpoint::FollowUp, session.submit_follow_up()).await
                {
                    eprintln!("{}", dim("The service has not asked for additional details."));
                }
            }
            "copy" => {
                if clipboard.is_none() {
                    match SystemClipboard::open(Retention::Session) {
                        Ok(cb) => clipboard = Some(cb),
                        Err(e) => {
                            eprintln!("{}", red(&e.to_string()));
                            continue;
                        }
                    }
                }
                if let Some(cb) = clipboard.as_mut() {
                    match session.copy_result(cb) {
                        Ok(true) => eprintln!("{} {}", green("✔"), view::COPY_NOTICE),
                        Ok(false) => {}
                        Err(e) => eprintln!("{}", red(&e.to_string())),
                    }
                }
                continue;
            }
            "log" => {
                let log = session.state().template_log();
                if log.is_empty() {
                    eprintln!("{}", dim("No templates submitted yet."));
                }
                for (i, template) in log.iter().enumerate() {
                    eprintln!("{} {}", bold(&format!("[{}]", i + 1)), first_line(template));
                }
                continue;
            }
            "show" => {}
            "help" => {
                eprintln!("{}", dim(INTERACTIVE_HELP));
                continue;
            }
            "quit" | "exit" => break,
            other => {
                eprintln!("{}", red(&format!("Unknown command '{other}' (try 'help')")));
                continue;
            }
        }

        render(&FormView::from_session(session));
    }

    Ok(())
}

fn render(view: &FormView<'_>) {
    eprintln!();
    eprintln!(
        "{} {}",
        dim("PDF:"),
        view.file_name.map(str::to_string).unwrap_or_else(|| dim("(none)"))
    );
    eprintln!(
        "{} {}",
        dim("Template:"),
        if view.template.is_empty() {
            dim("(empty)")
        } else {
            format!("{} chars, starts {:?}", view.template.len(), first_line(view.template))
        }
    );
    if let Some(error) = view.error {
        eprintln!("{}", red(&bold(error)));
    }
    if let Some(ref panel) = view.follow_up {
        eprintln!("\n{}", bold(&cyan(panel.heading)));
        eprintln!("{}", dim(panel.explanation));
        if !panel.input.is_empty() {
            eprintln!("{} {}", dim("answer:"), panel.input);
        }
        eprintln!("{}", dim("→ followup <text>, then send"));
    }
    if let Some(ref panel) = view.result {
        eprintln!("\n{}", bold(&cyan(panel.heading)));
        eprintln!("{}", panel.text);
        eprintln!("{}", dim("→ copy"));
    }
    if let Some(ref panel) = view.template_log {
        eprintln!("\n{} {}", bold(panel.heading), dim(&format!("({})", panel.entries.len())));
    }
    eprintln!();
}

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Await a controller future behind a spinner showing the wait note.
async fn with_spinner<T>(
    enabled: bool,
    endpoint: Endpoint,
    fut: impl Future<Output = Result<T, SessionError>>,
) -> Result<T, SessionError> {
    let bar = enabled.then(|| {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  ⏱ {elapsed}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        bar.set_prefix(endpoint.to_string());
        bar.set_message(view::WAIT_NOTE);
        bar.enable_steady_tick(Duration::from_millis(80));
        bar
    });

    // Errors are left to the caller: the form view in interactive mode, the
    // process error in one-shot mode.
    let outcome = fut.await;
    if let Some(bar) = bar {
        bar.finish_and_clear();
    }
    if enabled && outcome.is_ok() {
        eprintln!("{} {}", green("✔"), dim(&format!("{endpoint} done")));
    }
    outcome
}

/// Turn a controller error into the process error: the user-facing message on
/// top, the cause chain below it.
fn report(e: SessionError) -> anyhow::Error {
    match e {
        SessionError::Upload(_) | SessionError::FollowUp(_) => {
            let message = e.user_message();
            anyhow::Error::new(e).context(message)
        }
        // Already the user-facing text.
        other => anyhow::Error::new(other),
    }
}

/// Read a template from `path`, or all of stdin when `path` is `-`.
async fn read_template(path: &str) -> Result<String> {
    if path == "-" {
        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .context("Failed to read template from stdin")?;
        return Ok(text);
    }
    tokio::fs::read_to_string(Path::new(path))
        .await
        .with_context(|| format!("Failed to read template from {path:?}"))
}

/// Read lines until a line containing only `.`. `None` means stdin hit EOF
/// before anything was entered.
async fn prompt_block(
    stdin: &mut Lines<BufReader<Stdin>>,
    placeholder: &str,
) -> Result<Option<String>> {
    eprintln!("{}", dim(&format!("{placeholder} (finish with a single '.')")));
    let mut lines = Vec::new();
    loop {
        match stdin.next_line().await.context("Failed to read stdin")? {
            Some(line) if line == "." => break,
            Some(line) => lines.push(line),
            None if lines.is_empty() => return Ok(None),
            None => break,
        }
    }
    Ok(Some(lines.join("\n")))
}

fn first_line(text: &str) -> &str {
    text.lines().find(|l| !l.trim().is_empty()).unwrap_or("").trim()
}
