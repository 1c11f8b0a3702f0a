use serde::{Deserialize, Deserializer};

use super::error::BridgeError;

/// Recorder progress snapshot, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct RecordStatus {
    #[serde(deserialize_with = "lenient_f64")]
    pub current_position: f64,
}

impl RecordStatus {
    pub fn from_json(json: &str) -> Result<Self, BridgeError> {
        parse_json(json, "recorder status")
    }
}

/// Player progress snapshot, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PlayStatus {
    #[serde(deserialize_with = "lenient_f64")]
    pub duration: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub current_position: f64,
}

impl PlayStatus {
    pub fn from_json(json: &str) -> Result<Self, BridgeError> {
        parse_json(json, "player status")
    }

    /// Status reported when playback ran to the end: the position is pinned
    /// to the duration whatever the native side last sampled.
    pub fn finished(self) -> Self {
        Self {
            duration: self.duration,
            current_position: self.duration,
        }
    }
}

fn parse_json<'a, T: Deserialize<'a>>(json: &'a str, what: &str) -> Result<T, BridgeError> {
    serde_json::from_str(json).map_err(|e| BridgeError::InvalidArgument(format!("malformed {}: {}", what, e)))
}

/// Native modules send positions either as JSON numbers or as strings.
fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        String(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::String(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("not a number: {:?}", s))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn record_status_from_string_position() {
        let status = RecordStatus::from_json(r#"{"current_position":"1530.0"}"#).unwrap();
        assert_relative_eq!(status.current_position, 1530.0);
    }

    #[test]
    fn play_status_accepts_numbers_and_strings() {
        let status = PlayStatus::from_json(r#"{"duration":"5000","current_position":1200.5}"#).unwrap();
        assert_relative_eq!(status.duration, 5000.0);
        assert_relative_eq!(status.current_position, 1200.5);
    }

    #[test]
    fn finished_clamps_position_to_duration() {
        let status = PlayStatus {
            duration: 4000.0,
            current_position: 3870.0,
        }
        .finished();
        assert_relative_eq!(status.current_position, 4000.0);
        assert_relative_eq!(status.duration, 4000.0);
    }

    #[test]
    fn malformed_json_is_invalid_argument() {
        assert!(matches!(
            RecordStatus::from_json("{"),
            Err(BridgeError::InvalidArgument(_))
        ));
        assert!(matches!(
            PlayStatus::from_json(r#"{"duration":"abc","current_position":"1"}"#),
            Err(BridgeError::InvalidArgument(_))
        ));
    }
}
