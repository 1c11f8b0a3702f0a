use crate::models::error::BridgeError;
use crate::models::state::PlaybackState;
use crate::models::status::{PlayStatus, RecordStatus};
use crate::models::wire::WireValue;

/// Every callback name the native modules push, as a closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    RecorderProgress,
    DbPeakProgress,
    PlayerProgress,
    PlayerFinished,
    PlaybackStateChanged,
    SkipForward,
    SkipBackward,
}

impl EventKind {
    pub const RECORDER: [EventKind; 2] = [EventKind::RecorderProgress, EventKind::DbPeakProgress];

    pub const PLAYER: [EventKind; 5] = [
        EventKind::PlayerProgress,
        EventKind::PlayerFinished,
        EventKind::PlaybackStateChanged,
        EventKind::SkipForward,
        EventKind::SkipBackward,
    ];

    pub fn from_method(method: &str) -> Option<Self> {
        let kind = match method {
            "updateRecorderProgress" => Self::RecorderProgress,
            "updateDbPeakProgress" => Self::DbPeakProgress,
            "updateProgress" => Self::PlayerProgress,
            "audioPlayerDidFinishPlaying" => Self::PlayerFinished,
            "updatePlaybackState" => Self::PlaybackStateChanged,
            "skipForward" => Self::SkipForward,
            "skipBackward" => Self::SkipBackward,
            _ => return None,
        };
        Some(kind)
    }

    pub fn method(self) -> &'static str {
        match self {
            Self::RecorderProgress => "updateRecorderProgress",
            Self::DbPeakProgress => "updateDbPeakProgress",
            Self::PlayerProgress => "updateProgress",
            Self::PlayerFinished => "audioPlayerDidFinishPlaying",
            Self::PlaybackStateChanged => "updatePlaybackState",
            Self::SkipForward => "skipForward",
            Self::SkipBackward => "skipBackward",
        }
    }
}

/// A decoded callback from the native side.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeEvent {
    RecorderProgress(RecordStatus),
    DbPeakProgress(f64),
    PlayerProgress(PlayStatus),
    /// Already clamped: `current_position == duration`.
    PlayerFinished(PlayStatus),
    PlaybackStateChanged(PlaybackState),
    SkipForward,
    SkipBackward,
}

/// A raw inbound message, as delivered by the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundMessage {
    pub method: String,
    pub payload: WireValue,
}

impl InboundMessage {
    pub fn new(method: impl Into<String>, payload: WireValue) -> Self {
        Self {
            method: method.into(),
            payload,
        }
    }
}

impl NativeEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::RecorderProgress(_) => EventKind::RecorderProgress,
            Self::DbPeakProgress(_) => EventKind::DbPeakProgress,
            Self::PlayerProgress(_) => EventKind::PlayerProgress,
            Self::PlayerFinished(_) => EventKind::PlayerFinished,
            Self::PlaybackStateChanged(_) => EventKind::PlaybackStateChanged,
            Self::SkipForward => EventKind::SkipForward,
            Self::SkipBackward => EventKind::SkipBackward,
        }
    }

    /// Decode a named callback and its payload.
    pub fn decode(method: &str, payload: &WireValue) -> Result<Self, BridgeError> {
        let kind = EventKind::from_method(method).ok_or_else(|| BridgeError::UnknownEvent(method.to_string()))?;
        Self::decode_kind(kind, payload)
    }

    pub fn decode_kind(kind: EventKind, payload: &WireValue) -> Result<Self, BridgeError> {
        let event = match kind {
            EventKind::RecorderProgress => Self::RecorderProgress(RecordStatus::from_json(json_text(kind, payload)?)?),
            EventKind::DbPeakProgress => Self::DbPeakProgress(payload.as_f64().ok_or_else(|| mismatch(kind, payload))?),
            EventKind::PlayerProgress => Self::PlayerProgress(PlayStatus::from_json(json_text(kind, payload)?)?),
            EventKind::PlayerFinished => {
                Self::PlayerFinished(PlayStatus::from_json(json_text(kind, payload)?)?.finished())
            }
            EventKind::PlaybackStateChanged => {
                let ordinal = payload.as_i64().ok_or_else(|| mismatch(kind, payload))?;
                Self::PlaybackStateChanged(PlaybackState::from_wire(ordinal)?)
            }
            EventKind::SkipForward => Self::SkipForward,
            EventKind::SkipBackward => Self::SkipBackward,
        };
        Ok(event)
    }
}

fn json_text(kind: EventKind, payload: &WireValue) -> Result<&str, BridgeError> {
    payload.as_str().ok_or_else(|| mismatch(kind, payload))
}

fn mismatch(kind: EventKind, payload: &WireValue) -> BridgeError {
    BridgeError::InvalidArgument(format!("{}: unexpected {} payload", kind.method(), payload.kind()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn method_names_round_trip() {
        for kind in EventKind::RECORDER.iter().chain(EventKind::PLAYER.iter()) {
            assert_eq!(EventKind::from_method(kind.method()), Some(*kind));
        }
        assert_eq!(EventKind::from_method("updateVolume"), None);
    }

    #[test]
    fn unknown_method_is_unknown_event() {
        let err = NativeEvent::decode("updateVolume", &WireValue::Null).unwrap_err();
        assert_eq!(err, BridgeError::UnknownEvent("updateVolume".into()));
    }

    #[test]
    fn decodes_recorder_progress() {
        let payload = WireValue::from(r#"{"current_position":"250.0"}"#);
        match NativeEvent::decode("updateRecorderProgress", &payload).unwrap() {
            NativeEvent::RecorderProgress(status) => assert_relative_eq!(status.current_position, 250.0),
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn decodes_db_peak_from_raw_float() {
        let event = NativeEvent::decode("updateDbPeakProgress", &WireValue::Float(87.5)).unwrap();
        assert_eq!(event, NativeEvent::DbPeakProgress(87.5));
    }

    #[test]
    fn finished_event_is_clamped() {
        let payload = WireValue::from(r#"{"duration":"3000","current_position":"2950"}"#);
        match NativeEvent::decode("audioPlayerDidFinishPlaying", &payload).unwrap() {
            NativeEvent::PlayerFinished(status) => {
                assert_relative_eq!(status.current_position, 3000.0);
                assert_relative_eq!(status.duration, 3000.0);
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn playback_state_ordinal_out_of_range() {
        let err = NativeEvent::decode("updatePlaybackState", &WireValue::Int(3)).unwrap_err();
        assert!(matches!(err, BridgeError::UnrecognizedWireValue { .. }));
    }

    #[test]
    fn payload_type_mismatch() {
        let err = NativeEvent::decode("updateProgress", &WireValue::Int(1)).unwrap_err();
        assert!(matches!(err, BridgeError::InvalidArgument(_)));
    }
}
