//! JSON-RPC message shapes and verifier notification decoding.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use veriscope_types::{
    Diagnostic, LineStatus, RelatedLocation, TextRange, VerificationDiagnostics,
};

use crate::types::{CompilationStatus, VerifierEvent};

pub(crate) const INITIALIZE: &str = "initialize";
pub(crate) const INITIALIZED: &str = "initialized";
pub(crate) const SHUTDOWN: &str = "shutdown";
pub(crate) const EXIT: &str = "exit";
pub(crate) const DID_OPEN: &str = "textDocument/didOpen";
pub(crate) const DID_CHANGE: &str = "textDocument/didChange";
pub(crate) const DID_CLOSE: &str = "textDocument/didClose";
pub(crate) const COUNTER_EXAMPLE: &str = "dafny/counterExample";

const VERIFICATION_DIAGNOSTICS: &str = "dafny/verification/diagnostics";
const VERIFICATION_STARTED: &str = "dafny/verification/started";
const VERIFICATION_COMPLETED: &str = "dafny/verification/completed";
const COMPILATION_STATUS: &str = "dafny/compilation/status";
const GHOST_DIAGNOSTICS: &str = "dafny/ghost/diagnostics";
const SERVER_VERSION: &str = "dafnyLanguageServerVersionReceived";
const ACTIVE_DOCUMENT: &str = "activeVerifiyingDocument";
const ERROR_COUNT: &str = "updateStatusbar";

#[derive(Debug, thiserror::Error)]
#[error("cannot express {} as a file URI", path.display())]
pub struct UriError {
    path: PathBuf,
}

#[derive(Debug, Serialize)]
pub(crate) struct Request {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
}

impl Request {
    pub fn new(id: u64, method: &'static str, params: Option<serde_json::Value>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            method,
            params,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct Notification {
    pub jsonrpc: &'static str,
    pub method: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
}

impl Notification {
    pub fn new(method: &'static str, params: Option<serde_json::Value>) -> Self {
        Self {
            jsonrpc: "2.0",
            method,
            params,
        }
    }
}

pub(crate) fn initialize_params(root_uri: &str) -> serde_json::Value {
    serde_json::json!({
        "processId": std::process::id(),
        "clientInfo": { "name": "veriscope" },
        "rootUri": root_uri,
        "capabilities": {
            "textDocument": {
                "synchronization": {
                    "dynamicRegistration": false,
                    "didSave": false
                },
                "publishDiagnostics": {
                    "relatedInformation": true
                }
            }
        },
        "workspaceFolders": [{ "uri": root_uri, "name": "workspace" }]
    })
}

pub(crate) fn did_open_params(
    uri: &str,
    language_id: &str,
    version: i32,
    text: &str,
) -> serde_json::Value {
    serde_json::json!({
        "textDocument": {
            "uri": uri,
            "languageId": language_id,
            "version": version,
            "text": text
        }
    })
}

pub(crate) fn did_change_params(uri: &str, version: i32, text: &str) -> serde_json::Value {
    serde_json::json!({
        "textDocument": { "uri": uri, "version": version },
        "contentChanges": [{ "text": text }]
    })
}

pub(crate) fn did_close_params(uri: &str) -> serde_json::Value {
    serde_json::json!({ "textDocument": { "uri": uri } })
}

pub(crate) fn counter_example_params(uri: &str) -> serde_json::Value {
    serde_json::json!({ "textDocument": { "uri": uri } })
}

// ── Wire shapes ──

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VerificationDiagnosticsParams {
    uri: String,
    version: Option<i32>,
    #[serde(default)]
    per_line_diagnostic: Vec<serde_json::Value>,
    #[serde(default)]
    diagnostics: Vec<WireDiagnostic>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireDiagnostic {
    range: TextRange,
    #[serde(default)]
    message: String,
    /// Kept loose so one malformed entry does not sink the diagnostic.
    /// Servers send `null` as well as omitting the field.
    #[serde(default)]
    related_information: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct WireRelated {
    location: WireLocation,
}

#[derive(Debug, Deserialize)]
struct WireLocation {
    uri: String,
    range: TextRange,
}

#[derive(Debug, Deserialize)]
struct DocumentParams {
    uri: String,
}

#[derive(Debug, Deserialize)]
struct VerificationCompletedParams {
    uri: String,
    #[serde(default)]
    verified: bool,
}

#[derive(Debug, Deserialize)]
struct CompilationStatusParams {
    uri: String,
    status: CompilationStatus,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GhostDiagnosticsParams {
    uri: String,
    #[serde(default)]
    diagnostics: Vec<WireRange>,
}

#[derive(Debug, Deserialize)]
struct WireRange {
    range: TextRange,
}

impl WireDiagnostic {
    fn into_diagnostic(self) -> Diagnostic {
        let related = self
            .related_information
            .unwrap_or_default()
            .into_iter()
            .filter_map(|entry| match serde_json::from_value::<WireRelated>(entry) {
                Ok(WireRelated { location }) => Some(RelatedLocation {
                    uri: normalize_uri(&location.uri),
                    range: location.range,
                }),
                Err(e) => {
                    tracing::trace!("Skipping malformed related location: {e}");
                    None
                }
            })
            .collect();
        Diagnostic::new(self.range, self.message, related)
    }
}

impl VerificationDiagnosticsParams {
    fn into_update(self) -> VerificationDiagnostics {
        let per_line = self
            .per_line_diagnostic
            .iter()
            .map(|code| {
                code.as_u64()
                    .and_then(LineStatus::from_code)
                    .unwrap_or_default()
            })
            .collect();
        VerificationDiagnostics {
            uri: normalize_uri(&self.uri),
            version: self.version,
            per_line,
            diagnostics: self
                .diagnostics
                .into_iter()
                .map(WireDiagnostic::into_diagnostic)
                .collect(),
        }
    }
}

/// Decode a server notification into an event.
///
/// Returns `None` for methods the client does not consume and for payloads
/// that do not have the expected shape.
pub(crate) fn decode_notification(
    method: &str,
    params: Option<serde_json::Value>,
) -> Option<VerifierEvent> {
    let params = params.unwrap_or(serde_json::Value::Null);
    let decoded = match method {
        VERIFICATION_DIAGNOSTICS => serde_json::from_value::<VerificationDiagnosticsParams>(params)
            .map(|p| VerifierEvent::VerificationDiagnostics(p.into_update())),
        VERIFICATION_STARTED => {
            serde_json::from_value::<DocumentParams>(params).map(|p| {
                VerifierEvent::VerificationStarted {
                    uri: normalize_uri(&p.uri),
                }
            })
        }
        VERIFICATION_COMPLETED => serde_json::from_value::<VerificationCompletedParams>(params)
            .map(|p| VerifierEvent::VerificationCompleted {
                uri: normalize_uri(&p.uri),
                verified: p.verified,
            }),
        COMPILATION_STATUS => serde_json::from_value::<CompilationStatusParams>(params).map(|p| {
            VerifierEvent::CompilationStatus {
                uri: normalize_uri(&p.uri),
                status: p.status,
                message: p.message,
            }
        }),
        GHOST_DIAGNOSTICS => serde_json::from_value::<GhostDiagnosticsParams>(params).map(|p| {
            VerifierEvent::GhostDiagnostics {
                uri: normalize_uri(&p.uri),
                ranges: p.diagnostics.into_iter().map(|d| d.range).collect(),
            }
        }),
        SERVER_VERSION => serde_json::from_value::<String>(params).map(VerifierEvent::ServerVersion),
        ACTIVE_DOCUMENT => serde_json::from_value::<String>(params)
            .map(|uri| VerifierEvent::ActiveDocument(normalize_uri(&uri))),
        ERROR_COUNT => serde_json::from_value::<usize>(params).map(VerifierEvent::ErrorCount),
        _ => {
            tracing::trace!("Ignoring notification: {method}");
            return None;
        }
    };

    match decoded {
        Ok(event) => Some(event),
        Err(e) => {
            tracing::debug!("Failed to decode {method}: {e}");
            None
        }
    }
}

/// Canonical form of a document URI, so URIs from different sources compare equal.
///
/// Strings that do not parse as URIs are kept as they are.
#[must_use]
pub fn normalize_uri(uri: &str) -> String {
    url::Url::parse(uri).map_or_else(|_| uri.to_string(), String::from)
}

pub fn path_to_file_uri(path: &Path) -> Result<url::Url, UriError> {
    url::Url::from_file_path(path).map_err(|()| UriError {
        path: path.to_path_buf(),
    })
}
