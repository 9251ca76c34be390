use std::collections::HashMap;
use std::io::{self, BufRead, Write};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use mermaid_studio::page::{MemoryPage, PageSnapshot, PromptInput};
use mermaid_studio::session::Dispatched;
use mermaid_studio::{Control, EventKind, StudioConfig, UiEvent};
use tracing_subscriber::EnvFilter;

/// Drive a studio page from the terminal.
///
/// Each input line is typed into the prompt field and submitted, unless it is
/// one of the `:` commands (`:zoom-in`, `:zoom-out`, `:history`,
/// `:click-history`, `:state`, `:quit`).
#[derive(Parser, Debug)]
#[command(name = "mermaid-studio", version)]
struct Args {
    /// Backend endpoint the prompt is POSTed to
    #[arg(long, default_value = mermaid_studio::DEFAULT_ENDPOINT)]
    endpoint: String,
    /// Path prefix generated artifacts are served under
    #[arg(long, default_value = mermaid_studio::DEFAULT_ARTIFACT_PREFIX)]
    artifact_prefix: String,
    /// Request timeout in milliseconds (0 => none)
    #[arg(long, default_value_t = 0)]
    timeout_ms: u64,
    /// Extra request header, `Name: value` (repeatable)
    #[arg(long = "header")]
    headers: Vec<String>,
    /// Continue the backend session returned by each successful update
    #[arg(long)]
    follow_session: bool,
    /// Resume an existing backend session
    #[arg(long)]
    session_id: Option<String>,
    /// Start with the history list visible
    #[arg(long)]
    show_history: bool,
}

impl Args {
    fn into_config(self) -> Result<StudioConfig> {
        let mut headers = HashMap::new();
        for raw in &self.headers {
            let (name, value) = raw
                .split_once(':')
                .ok_or_else(|| anyhow!("header {:?} is not `Name: value`", raw))?;
            headers.insert(name.trim().to_string(), value.trim().to_string());
        }
        Ok(StudioConfig {
            endpoint: self.endpoint,
            artifact_prefix: self.artifact_prefix,
            timeout_ms: self.timeout_ms,
            headers,
            history_hidden: !self.show_history,
            follow_session: self.follow_session || self.session_id.is_some(),
            session_id: self.session_id,
            ..Default::default()
        })
    }
}

#[derive(Debug, PartialEq)]
enum Input {
    Event(UiEvent),
    Prompt(String),
    State,
    Quit,
}

fn parse_line(line: &str) -> Input {
    match line.trim() {
        ":zoom-in" => Input::Event(UiEvent::new(Control::ZoomInButton, EventKind::Click)),
        ":zoom-out" => Input::Event(UiEvent::new(Control::ZoomOutButton, EventKind::Click)),
        ":history" => Input::Event(UiEvent::new(Control::HistoryToggle, EventKind::PointerEnter)),
        ":click-history" => Input::Event(UiEvent::new(Control::HistoryToggle, EventKind::Click)),
        ":state" => Input::State,
        ":quit" | ":q" => Input::Quit,
        _ => Input::Prompt(line.to_string()),
    }
}

fn print_snapshot(out: &mut impl Write, snap: &PageSnapshot) -> io::Result<()> {
    writeln!(out, "  status : {}", snap.status)?;
    writeln!(
        out,
        "  image  : {} {}",
        snap.image_source.as_deref().unwrap_or("(none)"),
        snap.image_transform.as_deref().unwrap_or("")
    )?;
    if snap.history_hidden {
        writeln!(out, "  history: ({} hidden)", snap.history.len())?;
    } else {
        writeln!(out, "  history:")?;
        for entry in &snap.history {
            writeln!(out, "    - {}", entry)?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let config = Args::parse().into_config()?;
    let page = MemoryPage::new();
    let mut session =
        mermaid_studio::new_session(config, &page).context("failed to start studio session")?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for line in stdin.lock().lines() {
        let line = line?;
        let result = match parse_line(&line) {
            Input::Quit => break,
            Input::State => Dispatched::Ignored,
            Input::Event(event) => session.dispatch(event),
            Input::Prompt(text) => {
                page.input().set_value(&text);
                session.dispatch(UiEvent::new(Control::UpdateButton, EventKind::Click))
            }
        };
        for alert in page.alerts().take() {
            writeln!(out, "! {}", alert)?;
        }
        if let Dispatched::Zoomed { level } = result {
            writeln!(out, "  zoom   : {}", level)?;
        }
        print_snapshot(&mut out, &session.snapshot())?;
        out.flush()?;
    }
    Ok(())
}
