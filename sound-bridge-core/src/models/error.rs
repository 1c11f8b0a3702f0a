use thiserror::Error;

use super::codec::Codec;

/// Failures reported by the method-channel transport.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ChannelError {
    #[error("{method} failed: {message}")]
    MethodFailed { method: String, message: String },

    #[error("unexpected reply to {method}: expected {expected}, got {got}")]
    UnexpectedReply {
        method: String,
        expected: &'static str,
        got: String,
    },

    #[error("channel disconnected")]
    Disconnected,
}

/// Errors surfaced by a sound session.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BridgeError {
    #[error("recorder running: {0}")]
    RecorderRunning(String),

    #[error("recorder stopped: {0}")]
    RecorderStopped(String),

    #[error("player running: {0}")]
    PlayerRunning(String),

    #[error("player stopped: {0}")]
    PlayerStopped(String),

    #[error("codec not supported on this platform: {0:?}")]
    UnsupportedCodec(Codec),

    #[error("player not initialized: {0}")]
    NotInitialized(String),

    #[error("unknown event: {0}")]
    UnknownEvent(String),

    #[error("unrecognized value for {field}: {value}")]
    UnrecognizedWireValue { field: String, value: String },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Channel(#[from] ChannelError),
}

impl BridgeError {
    /// Wrong state for the requested transition.
    pub fn is_precondition_violation(&self) -> bool {
        matches!(
            self,
            Self::RecorderRunning(_) | Self::RecorderStopped(_) | Self::PlayerRunning(_) | Self::PlayerStopped(_)
        )
    }

    pub(crate) fn not_initialized(context: &str, source: BridgeError) -> Self {
        Self::NotInitialized(format!("{}: {}", context, source))
    }
}
