use async_trait::async_trait;

use crate::models::error::ChannelError;
use crate::models::wire::{ArgumentBag, WireValue};

/// Transport to the native audio module.
///
/// Invokes a named remote operation with a flat argument bag and resolves
/// with its single reply. Implemented by:
/// - the host framework's platform channel
/// - `SimulatedHost` (sound-bridge-sim)
///
/// Timeouts, if any, belong to the implementation; callers are suspended
/// until the reply arrives.
#[async_trait]
pub trait MethodChannel: Send + Sync {
    async fn invoke(&self, method: &str, args: ArgumentBag) -> Result<WireValue, ChannelError>;
}

/// Reply decoding helpers shared by the session.
pub(crate) fn expect_bool(method: &str, reply: WireValue) -> Result<bool, ChannelError> {
    reply.as_bool().ok_or_else(|| ChannelError::UnexpectedReply {
        method: method.to_string(),
        expected: "bool",
        got: reply.kind().to_string(),
    })
}

/// Platforms answer some calls with a string and others with nothing.
pub(crate) fn reply_string(reply: WireValue) -> String {
    match reply {
        WireValue::String(s) => s,
        WireValue::Null => String::new(),
        other => other.to_string(),
    }
}
