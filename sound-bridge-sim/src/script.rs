//! Builders for the callbacks the native modules push.
//!
//! Payloads use the same encodings as the platform modules: progress as a
//! JSON string with string-encoded numbers, peak level as a raw float,
//! playback state as a bare ordinal.

use serde_json::json;
use thiserror::Error;

use sound_bridge_core::{EventKind, InboundMessage, InboundSender, WireValue};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScriptError {
    #[error("event pump is gone")]
    PumpClosed,
}

pub fn recorder_progress(position_ms: f64) -> InboundMessage {
    let body = json!({ "current_position": position_ms.to_string() });
    message(EventKind::RecorderProgress, WireValue::String(body.to_string()))
}

pub fn db_peak(level: f64) -> InboundMessage {
    message(EventKind::DbPeakProgress, WireValue::Float(level))
}

pub fn player_progress(duration_ms: f64, position_ms: f64) -> InboundMessage {
    message(EventKind::PlayerProgress, play_status(duration_ms, position_ms))
}

pub fn finished(duration_ms: f64, position_ms: f64) -> InboundMessage {
    message(EventKind::PlayerFinished, play_status(duration_ms, position_ms))
}

pub fn playback_state(ordinal: i64) -> InboundMessage {
    message(EventKind::PlaybackStateChanged, WireValue::Int(ordinal))
}

pub fn skip_forward() -> InboundMessage {
    message(EventKind::SkipForward, WireValue::Null)
}

pub fn skip_backward() -> InboundMessage {
    message(EventKind::SkipBackward, WireValue::Null)
}

fn play_status(duration_ms: f64, position_ms: f64) -> WireValue {
    let body = json!({
        "duration": duration_ms.to_string(),
        "current_position": position_ms.to_string(),
    });
    WireValue::String(body.to_string())
}

fn message(kind: EventKind, payload: WireValue) -> InboundMessage {
    InboundMessage::new(kind.method(), payload)
}

/// Pushes native callbacks into a session's event pump.
#[derive(Clone)]
pub struct EventScript {
    sender: InboundSender,
}

impl EventScript {
    pub fn new(sender: InboundSender) -> Self {
        Self { sender }
    }

    pub fn push(&self, message: InboundMessage) -> Result<(), ScriptError> {
        log::trace!("native callback {}", message.method);
        self.sender.send(message).map_err(|_| ScriptError::PumpClosed)
    }

    /// Push an arbitrary, possibly malformed, callback.
    pub fn raw(&self, method: &str, payload: WireValue) -> Result<(), ScriptError> {
        self.push(InboundMessage::new(method, payload))
    }

    pub fn recorder_progress(&self, position_ms: f64) -> Result<(), ScriptError> {
        self.push(recorder_progress(position_ms))
    }

    pub fn db_peak(&self, level: f64) -> Result<(), ScriptError> {
        self.push(db_peak(level))
    }

    pub fn player_progress(&self, duration_ms: f64, position_ms: f64) -> Result<(), ScriptError> {
        self.push(player_progress(duration_ms, position_ms))
    }

    pub fn finished(&self, duration_ms: f64, position_ms: f64) -> Result<(), ScriptError> {
        self.push(finished(duration_ms, position_ms))
    }

    pub fn playback_state(&self, ordinal: i64) -> Result<(), ScriptError> {
        self.push(playback_state(ordinal))
    }

    pub fn skip_forward(&self) -> Result<(), ScriptError> {
        self.push(skip_forward())
    }

    pub fn skip_backward(&self) -> Result<(), ScriptError> {
        self.push(skip_backward())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use sound_bridge_core::NativeEvent;

    #[test]
    fn payloads_decode_as_native_events() {
        let msg = recorder_progress(1250.5);
        match NativeEvent::decode(&msg.method, &msg.payload).unwrap() {
            NativeEvent::RecorderProgress(status) => assert_relative_eq!(status.current_position, 1250.5),
            other => panic!("unexpected {:?}", other),
        }

        let msg = finished(900.0, 880.0);
        match NativeEvent::decode(&msg.method, &msg.payload).unwrap() {
            NativeEvent::PlayerFinished(status) => assert_relative_eq!(status.current_position, 900.0),
            other => panic!("unexpected {:?}", other),
        }

        let msg = playback_state(1);
        assert_eq!(msg.method, "updatePlaybackState");
        assert_eq!(msg.payload, WireValue::Int(1));
    }

    #[test]
    fn push_after_pump_dropped_fails() {
        let (sender, receiver) = tokio::sync::mpsc::unbounded_channel();
        let script = EventScript::new(sender);
        script.db_peak(10.0).unwrap();
        drop(receiver);
        assert_eq!(script.skip_forward(), Err(ScriptError::PumpClosed));
    }
}
