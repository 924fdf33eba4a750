//! Public types of the verifier client.
//!
//! The host builds a [`VerifierConfig`], starts a client with it, and
//! receives [`VerifierEvent`]s decoded from the server's notifications.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use veriscope_types::{Position, TextRange, VerificationDiagnostics};

/// When the server verifies a document on its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutomaticVerification {
    Never,
    #[default]
    OnChange,
    OnSave,
}

impl AutomaticVerification {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Never => "never",
            Self::OnChange => "onchange",
            Self::OnSave => "onsave",
        }
    }
}

/// How to launch the verification server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct VerifierConfig {
    /// Executable, resolved through `PATH`.
    pub command: String,
    /// Server assembly passed as the first argument, if the command needs one.
    pub server_path: Option<PathBuf>,
    pub automatic_verification: AutomaticVerification,
    /// Per-assertion-batch time limit in seconds.
    pub time_limit: u32,
    pub virtual_cores: u32,
    pub mark_ghost_statements: bool,
    /// Appended after the generated arguments.
    pub args: Vec<String>,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            command: "dotnet".to_string(),
            server_path: None,
            automatic_verification: AutomaticVerification::default(),
            time_limit: 10,
            virtual_cores: 1,
            mark_ghost_statements: false,
            args: Vec::new(),
        }
    }
}

impl VerifierConfig {
    /// Full argument list for the server process.
    #[must_use]
    pub fn launch_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(5 + self.args.len());
        if let Some(server) = &self.server_path {
            args.push(server.display().to_string());
        }
        args.push(format!(
            "--documents:verify={}",
            self.automatic_verification.as_str()
        ));
        args.push(format!("--verifier:timelimit={}", self.time_limit));
        args.push(format!("--verifier:vcscores={}", self.virtual_cores));
        args.push(format!(
            "--ghost:markStatements={}",
            self.mark_ghost_statements
        ));
        args.extend(self.args.iter().cloned());
        args
    }
}

/// Compilation pipeline stage reported by `dafny/compilation/status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum CompilationStatus {
    Parsing,
    ParsingFailed,
    ResolutionStarted,
    ResolutionFailed,
    CompilationSucceeded,
    PreparingVerification,
    VerificationStarted,
    VerificationFailed,
    VerificationSucceeded,
    #[serde(other)]
    Unknown,
}

/// One counterexample state: variable values at a position.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CounterExampleItem {
    pub position: Position,
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
}

/// Why the server went away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerStopReason {
    Exited,
    Failed(String),
}

/// Something the server told us.
#[derive(Debug, Clone, PartialEq)]
pub enum VerifierEvent {
    /// Per-line status and diagnostics snapshot for a document.
    VerificationDiagnostics(VerificationDiagnostics),
    VerificationStarted {
        uri: String,
    },
    VerificationCompleted {
        uri: String,
        verified: bool,
    },
    CompilationStatus {
        uri: String,
        status: CompilationStatus,
        message: Option<String>,
    },
    /// Ranges of ghost statements.
    GhostDiagnostics {
        uri: String,
        ranges: Vec<TextRange>,
    },
    ServerVersion(String),
    /// Document the server is currently verifying.
    ActiveDocument(String),
    /// Total error count for the status bar.
    ErrorCount(usize),
    ServerStopped(ServerStopReason),
}
