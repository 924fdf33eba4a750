//! Client for a verification language server.
//!
//! Spawns the server, speaks JSON-RPC over its stdio, and decodes its
//! verification notifications into [`VerifierEvent`]s.

pub mod codec;
pub mod types;

pub(crate) mod protocol;
pub(crate) mod server;

mod manager;

pub use codec::CodecError;
pub use manager::VerifierClient;
pub use protocol::{UriError, normalize_uri, path_to_file_uri};
pub use types::{
    AutomaticVerification, CompilationStatus, CounterExampleItem, ServerStopReason,
    VerifierConfig, VerifierEvent,
};
