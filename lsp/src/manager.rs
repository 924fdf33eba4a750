//! `VerifierClient` facade: the only type hosts talk to.
//!
//! Construction is startup. A client whose server died stays usable for
//! draining the remaining events, but document operations fail.

use std::path::Path;

use anyhow::{Result, bail};
use tokio::sync::mpsc;

use crate::protocol;
use crate::server::RunningServer;
use crate::types::{CounterExampleItem, ServerStopReason, VerifierConfig, VerifierEvent};

const EVENT_CHANNEL_CAPACITY: usize = 256;

pub struct VerifierClient {
    server: Option<RunningServer>,
    event_rx: mpsc::Receiver<VerifierEvent>,
}

impl VerifierClient {
    /// Spawn the verifier and complete the initialize handshake.
    pub async fn start(
        config: &VerifierConfig,
        language_id: &str,
        workspace_root: &Path,
    ) -> Result<Self> {
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        tracing::info!("Starting verifier ({})...", config.command);
        let server = RunningServer::start(config, language_id, workspace_root, event_tx).await?;
        tracing::info!("Verifier started");

        Ok(Self {
            server: Some(server),
            event_rx,
        })
    }

    fn server(&mut self) -> Result<&mut RunningServer> {
        match self.server.as_mut() {
            Some(server) => Ok(server),
            None => bail!("verifier is not running"),
        }
    }

    /// Open `path` with `text`. Returns the document URI used on the wire.
    pub async fn open_document(&mut self, path: &Path, text: &str) -> Result<String> {
        let uri = protocol::path_to_file_uri(path)?.to_string();
        self.server()?.sync_document(&uri, text).await?;
        Ok(uri)
    }

    /// Replace the full text of an open document.
    pub async fn change_document(&mut self, uri: &str, text: &str) -> Result<()> {
        self.server()?.sync_document(uri, text).await
    }

    pub async fn close_document(&mut self, uri: &str) -> Result<()> {
        self.server()?.close_document(uri).await
    }

    /// Ask for counterexamples of the last failed verification of `uri`.
    pub async fn counter_examples(&mut self, uri: &str) -> Result<Vec<CounterExampleItem>> {
        self.server()?.counter_examples(uri).await
    }

    /// Take up to `budget` pending events without blocking.
    ///
    /// A `ServerStopped` event also marks the client as no longer running.
    pub fn drain_events(&mut self, budget: usize) -> Vec<VerifierEvent> {
        let mut events = Vec::new();
        while events.len() < budget {
            let Ok(event) = self.event_rx.try_recv() else {
                break;
            };
            if let VerifierEvent::ServerStopped(reason) = &event {
                match reason {
                    ServerStopReason::Exited => tracing::info!("Verifier exited"),
                    ServerStopReason::Failed(error) => {
                        tracing::warn!(error = %error, "Verifier failed");
                    }
                }
                self.server = None;
            }
            events.push(event);
        }
        events
    }

    /// Wait for the next event. `None` once the server tasks are gone and
    /// every queued event has been taken.
    pub async fn next_event(&mut self) -> Option<VerifierEvent> {
        let event = self.event_rx.recv().await?;
        if matches!(event, VerifierEvent::ServerStopped(_)) {
            self.server = None;
        }
        Some(event)
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.server.is_some()
    }

    pub async fn shutdown(&mut self) {
        if let Some(server) = self.server.take() {
            tracing::info!("Shutting down verifier...");
            server.shutdown().await;
        }
    }

    #[cfg(test)]
    fn detached() -> (Self, mpsc::Sender<VerifierEvent>) {
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let client = Self {
            server: None,
            event_rx,
        };
        (client, event_tx)
    }
}
