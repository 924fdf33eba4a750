//! Running verifier process: spawn, JSON-RPC plumbing, document sync.

use std::collections::HashMap;
use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use tokio::process::{Child, Command};
use tokio::sync::{Mutex, mpsc, oneshot};

use crate::codec::{FrameReader, FrameWriter};
use crate::protocol::{self, Notification, Request};
use crate::types::{CounterExampleItem, ServerStopReason, VerifierConfig, VerifierEvent};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(2);

const WRITER_CHANNEL_CAPACITY: usize = 64;

const METHOD_NOT_FOUND: i64 = -32601;

type PendingMap = Arc<Mutex<HashMap<u64, oneshot::Sender<serde_json::Value>>>>;

enum WriterCommand {
    Send(serde_json::Value),
    Shutdown,
}

enum IncomingFrame {
    Response {
        id: u64,
        body: serde_json::Value,
    },
    ServerRequest {
        id: serde_json::Value,
        method: String,
    },
    Notification {
        method: String,
        params: Option<serde_json::Value>,
    },
}

fn parse_incoming(frame: &serde_json::Value) -> Option<IncomingFrame> {
    let id = frame.get("id");
    let method = frame.get("method").and_then(|m| m.as_str()).map(String::from);
    let is_response = frame.get("result").is_some() || frame.get("error").is_some();

    match (id, method) {
        (Some(id), None) if is_response => Some(IncomingFrame::Response {
            id: id.as_u64()?,
            body: frame.clone(),
        }),
        (Some(id), Some(method)) => Some(IncomingFrame::ServerRequest {
            id: id.clone(),
            method,
        }),
        (None, Some(method)) => Some(IncomingFrame::Notification {
            method,
            params: frame.get("params").cloned(),
        }),
        _ => None,
    }
}

fn response_error(response: &serde_json::Value) -> Option<&str> {
    response
        .get("error")
        .map(|error| error["message"].as_str().unwrap_or("unknown error"))
}

pub(crate) struct RunningServer {
    language_id: String,
    child: Child,
    writer_tx: mpsc::Sender<WriterCommand>,
    next_id: u64,
    pending: PendingMap,
    /// Last version sent per open document.
    versions: HashMap<String, i32>,
    #[allow(dead_code)]
    reader_handle: tokio::task::JoinHandle<()>,
    #[allow(dead_code)]
    writer_handle: tokio::task::JoinHandle<()>,
}

impl RunningServer {
    pub async fn start(
        config: &VerifierConfig,
        language_id: &str,
        workspace_root: &Path,
        event_tx: mpsc::Sender<VerifierEvent>,
    ) -> Result<Self> {
        let program = which::which(&config.command)
            .with_context(|| format!("{} not found in PATH", config.command))?;
        let args = config.launch_args();
        tracing::debug!(program = %program.display(), ?args, "Spawning verifier");

        let mut child = Command::new(&program)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("spawning {}", program.display()))?;

        let stdout = child.stdout.take().context("no stdout from verifier")?;
        let stdin = child.stdin.take().context("no stdin from verifier")?;

        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));

        let (writer_tx, mut writer_rx) = mpsc::channel::<WriterCommand>(WRITER_CHANNEL_CAPACITY);
        let writer_handle = tokio::spawn(async move {
            let mut writer = FrameWriter::new(stdin);
            while let Some(command) = writer_rx.recv().await {
                match command {
                    WriterCommand::Send(frame) => {
                        if let Err(e) = writer.write_frame(&frame).await {
                            tracing::warn!("Verifier write error: {e}");
                            break;
                        }
                    }
                    WriterCommand::Shutdown => break,
                }
            }
        });

        let reader_pending = pending.clone();
        let reader_writer_tx = writer_tx.clone();
        let reader_handle = tokio::spawn(async move {
            let mut reader = FrameReader::new(stdout);
            let reason = loop {
                match reader.read_frame().await {
                    Ok(Some(frame)) => {
                        Self::dispatch_frame(&frame, &reader_pending, &event_tx, &reader_writer_tx)
                            .await;
                    }
                    Ok(None) => {
                        tracing::info!("Verifier closed its output");
                        break ServerStopReason::Exited;
                    }
                    Err(e) => {
                        tracing::warn!("Verifier read error: {e}");
                        break ServerStopReason::Failed(e.to_string());
                    }
                }
            };
            let _ = event_tx.send(VerifierEvent::ServerStopped(reason)).await;
        });

        let mut server = Self {
            language_id: language_id.to_string(),
            child,
            writer_tx,
            next_id: 1,
            pending,
            versions: HashMap::new(),
            reader_handle,
            writer_handle,
        };
        server.initialize(workspace_root).await?;
        Ok(server)
    }

    async fn dispatch_frame(
        frame: &serde_json::Value,
        pending: &Mutex<HashMap<u64, oneshot::Sender<serde_json::Value>>>,
        event_tx: &mpsc::Sender<VerifierEvent>,
        writer_tx: &mpsc::Sender<WriterCommand>,
    ) {
        let Some(incoming) = parse_incoming(frame) else {
            tracing::trace!("Ignoring malformed JSON-RPC frame");
            return;
        };

        match incoming {
            IncomingFrame::Response { id, body } => {
                if let Some(tx) = pending.lock().await.remove(&id) {
                    let _ = tx.send(body);
                }
            }
            IncomingFrame::ServerRequest { id, method } => {
                tracing::debug!("Verifier sent request {method}; replying method not found");
                let response = serde_json::json!({
                    "jsonrpc": "2.0",
                    "id": id,
                    "error": {
                        "code": METHOD_NOT_FOUND,
                        "message": format!("Method not found: {method}")
                    }
                });
                let _ = writer_tx.send(WriterCommand::Send(response)).await;
            }
            IncomingFrame::Notification { method, params } => {
                if let Some(event) = protocol::decode_notification(&method, params) {
                    let _ = event_tx.send(event).await;
                }
            }
        }
    }

    async fn initialize(&mut self, workspace_root: &Path) -> Result<()> {
        let root_uri = protocol::path_to_file_uri(workspace_root)?;
        let response = self
            .send_request(
                protocol::INITIALIZE,
                Some(protocol::initialize_params(root_uri.as_str())),
            )
            .await?;
        if let Some(message) = response_error(&response) {
            bail!("verifier initialize failed: {message}");
        }
        self.send_notification(protocol::INITIALIZED, Some(serde_json::json!({})))
            .await
    }

    async fn send_request(
        &mut self,
        method: &'static str,
        params: Option<serde_json::Value>,
    ) -> Result<serde_json::Value> {
        let id = self.next_id;
        self.next_id += 1;

        let (tx, rx) = oneshot::channel();
        self.pending.lock().await.insert(id, tx);

        let frame = serde_json::to_value(Request::new(id, method, params))
            .context("serializing request")?;
        if self.writer_tx.send(WriterCommand::Send(frame)).await.is_err() {
            self.pending.lock().await.remove(&id);
            bail!("writer channel closed");
        }

        match tokio::time::timeout(REQUEST_TIMEOUT, rx).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(_)) => {
                self.pending.lock().await.remove(&id);
                bail!("{method}: response channel dropped")
            }
            Err(_) => {
                self.pending.lock().await.remove(&id);
                bail!("{method}: request timed out")
            }
        }
    }

    async fn send_notification(
        &self,
        method: &'static str,
        params: Option<serde_json::Value>,
    ) -> Result<()> {
        let frame = serde_json::to_value(Notification::new(method, params))
            .context("serializing notification")?;
        self.writer_tx
            .send(WriterCommand::Send(frame))
            .await
            .map_err(|_| anyhow!("writer channel closed"))
    }

    /// Send the full text of a document, opening it on first sight.
    pub async fn sync_document(&mut self, uri: &str, text: &str) -> Result<()> {
        if let Some(version) = self.versions.get_mut(uri) {
            *version += 1;
            let params = protocol::did_change_params(uri, *version, text);
            return self.send_notification(protocol::DID_CHANGE, Some(params)).await;
        }

        self.versions.insert(uri.to_string(), 1);
        let params = protocol::did_open_params(uri, &self.language_id, 1, text);
        self.send_notification(protocol::DID_OPEN, Some(params)).await
    }

    /// Close a document. Closing one that was never opened is a no-op.
    pub async fn close_document(&mut self, uri: &str) -> Result<()> {
        if self.versions.remove(uri).is_none() {
            return Ok(());
        }
        self.send_notification(protocol::DID_CLOSE, Some(protocol::did_close_params(uri)))
            .await
    }

    pub async fn counter_examples(&mut self, uri: &str) -> Result<Vec<CounterExampleItem>> {
        let response = self
            .send_request(
                protocol::COUNTER_EXAMPLE,
                Some(protocol::counter_example_params(uri)),
            )
            .await?;
        if let Some(message) = response_error(&response) {
            bail!("counterexample request failed: {message}");
        }
        let result = response.get("result").cloned().unwrap_or_default();
        if result.is_null() {
            return Ok(Vec::new());
        }
        serde_json::from_value(result).context("decoding counterexamples")
    }

    /// Shut the server down politely, killing it if it lingers.
    pub async fn shutdown(mut self) {
        if let Ok(response) = self.send_request(protocol::SHUTDOWN, None).await
            && response.get("error").is_none()
        {
            let _ = self.send_notification(protocol::EXIT, None).await;
        }
        let _ = self.writer_tx.send(WriterCommand::Shutdown).await;

        if tokio::time::timeout(SHUTDOWN_TIMEOUT, self.child.wait())
            .await
            .is_err()
        {
            tracing::debug!("Verifier didn't exit in time, killing");
            let _ = self.child.kill().await;
        }
    }
}
