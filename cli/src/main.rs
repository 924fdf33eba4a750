//! veriscope - verify one document and print its verification gutter.
//!
//! ```text
//! main() -> VerifierClient::start -> open_document -> watch() -> render
//!                                                       |
//!                                                       v
//!                         drain events -> VerificationView -> TerminalSurface
//! ```
//!
//! The view is driven exactly as an editor would drive it: verifier
//! notifications go in as they arrive and a fixed frame tick polls its
//! timers. Once the document settles the surface is printed to stdout.
//! Logs go to stderr.

mod surface;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use veriscope_config::VeriscopeConfig;
use veriscope_lsp::{VerifierClient, VerifierEvent};
use veriscope_render::{StatusBar, StatusRanges, VerificationView};
use veriscope_types::LineStatus;

use crate::surface::TerminalSurface;

const FRAME_DURATION: Duration = Duration::from_millis(50);

const EVENT_BUDGET: usize = 64;

#[derive(Parser)]
#[command(name = "veriscope")]
#[command(about = "Verify a document and print its per-line verification status")]
struct Cli {
    /// Config file (default: ~/.veriscope/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Give up after this many seconds
    #[arg(long, default_value_t = 120)]
    timeout: u64,
    /// Place the cursor on this line (1-based) to show related ranges
    #[arg(long)]
    line: Option<u32>,
    /// Print counterexamples when verification fails
    #[arg(long)]
    counterexamples: bool,
    /// Document to verify
    file: PathBuf,
}

/// How watching the document ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WatchOutcome {
    Settled,
    Completed { verified: bool },
    TimedOut,
    ServerStopped,
}

fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

/// Settled and past the initial all-unknown snapshot.
fn is_final(ranges: &StatusRanges) -> bool {
    ranges.is_settled()
        && ranges
            .iter()
            .any(|(status, bucket)| status != LineStatus::Unknown && !bucket.is_empty())
}

/// The view, the surface it paints and the status line for one document.
struct Gutter<'a> {
    view: &'a mut VerificationView,
    surface: &'a mut TerminalSurface,
    status: StatusBar,
    uri: &'a str,
    language_id: &'a str,
}

impl Gutter<'_> {
    /// Feed one drained batch into the view, then run due timer work.
    ///
    /// The whole batch is applied even when an event in it ends the watch.
    fn handle_batch(
        &mut self,
        events: Vec<VerifierEvent>,
        now: Instant,
    ) -> Option<WatchOutcome> {
        let mut finished = None;
        for event in events {
            if let Some(outcome) = self.handle_event(event, now) {
                finished = finished.or(Some(outcome));
            }
        }
        self.view.poll(&mut *self.surface, now);
        finished
    }

    fn handle_event(&mut self, event: VerifierEvent, now: Instant) -> Option<WatchOutcome> {
        let mut finished = None;
        match event {
            VerifierEvent::VerificationDiagnostics(update) => {
                let outcome = self.view.on_verification_diagnostics(&update, &mut *self.surface, now);
                tracing::debug!(uri = %update.uri, ?outcome, "Verification diagnostics");
            }
            VerifierEvent::VerificationCompleted { uri, verified } if uri == self.uri => {
                tracing::info!(verified, "Verification completed");
                finished = Some(WatchOutcome::Completed { verified });
            }
            VerifierEvent::ServerVersion(version) => {
                tracing::info!(version = %version.trim(), "Verifier version");
                self.status.set_version(version);
            }
            VerifierEvent::ActiveDocument(uri) => self.status.set_active_document(uri),
            VerifierEvent::ErrorCount(errors) => self.status.set_error_count(errors),
            VerifierEvent::ServerStopped(reason) => {
                tracing::warn!(?reason, "Verifier stopped before the document settled");
                finished = Some(WatchOutcome::ServerStopped);
            }
            other => tracing::trace!(event = ?other, "Unhandled verifier event"),
        }
        self.status.update(&mut *self.surface, self.language_id);
        finished
    }

    /// Final data is shown and no held update or animation is pending.
    fn is_settled(&self) -> bool {
        self.view
            .store()
            .get(self.uri)
            .is_some_and(|data| is_final(data.ranges()))
            && self.view.next_deadline().is_none()
    }
}

struct Session<'a> {
    client: &'a mut VerifierClient,
    gutter: Gutter<'a>,
}

impl Session<'_> {
    /// Feed verifier events into the view until the document settles.
    async fn watch(&mut self, timeout: Duration) -> WatchOutcome {
        let deadline = Instant::now() + timeout;
        let mut frames = tokio::time::interval(FRAME_DURATION);
        frames.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            frames.tick().await;
            let now = Instant::now();

            let events = self.client.drain_events(EVENT_BUDGET);
            if let Some(outcome) = self.gutter.handle_batch(events, now) {
                return outcome;
            }
            if self.gutter.is_settled() {
                return WatchOutcome::Settled;
            }
            if now >= deadline {
                tracing::warn!("Timed out after {}s", timeout.as_secs());
                return WatchOutcome::TimedOut;
            }
        }
    }

    async fn print_counter_examples(&mut self) {
        match self.client.counter_examples(self.gutter.uri).await {
            Ok(items) if items.is_empty() => println!("No counterexamples."),
            Ok(items) => {
                for item in items {
                    let values: Vec<String> = item
                        .variables
                        .iter()
                        .map(|(name, value)| format!("{name} = {value}"))
                        .collect();
                    println!(
                        "line {}: {}",
                        item.position.line + 1,
                        values.join(", ")
                    );
                }
            }
            Err(e) => tracing::warn!("Counterexample request failed: {e:#}"),
        }
    }
}

fn workspace_root(path: &Path) -> PathBuf {
    path.parent().map_or_else(|| PathBuf::from("/"), Path::to_path_buf)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();

    let config = VeriscopeConfig::load(cli.config.as_deref())?;
    let path = std::path::absolute(&cli.file)
        .with_context(|| format!("resolving {}", cli.file.display()))?;
    let text =
        fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
    let language_id = config.display.language_id.clone();

    let mut client =
        VerifierClient::start(&config.verifier, &language_id, &workspace_root(&path)).await?;
    let uri = client.open_document(&path, &text).await?;
    tracing::info!(uri = %uri, "Opened document");

    let mut surface = TerminalSurface::new(uri.clone(), language_id.clone(), text);
    let mut view = VerificationView::new(&config.display.render_settings(), &mut surface);

    let mut session = Session {
        client: &mut client,
        gutter: Gutter {
            view: &mut view,
            surface: &mut surface,
            status: StatusBar::new(),
            uri: &uri,
            language_id: &language_id,
        },
    };
    let outcome = session.watch(Duration::from_secs(cli.timeout)).await;
    let errors = session.gutter.status.error_count();

    let gutter = &mut session.gutter;
    if let Some(line) = cli.line {
        gutter.surface.move_cursor(line.saturating_sub(1));
        gutter.view.on_selection_changed(&mut *gutter.surface);
    }
    print!("{}", gutter.surface.render());

    let failed = match outcome {
        WatchOutcome::Completed { verified } => !verified,
        WatchOutcome::Settled => errors > 0,
        WatchOutcome::TimedOut | WatchOutcome::ServerStopped => true,
    };
    if failed && cli.counterexamples && session.client.is_running() {
        session.print_counter_examples().await;
    }

    view.on_document_closed(&uri);
    if client.is_running()
        && let Err(e) = client.close_document(&uri).await
    {
        tracing::warn!("Failed to close {uri}: {e:#}");
    }
    client.shutdown().await;
    view.dispose(&mut surface);

    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
