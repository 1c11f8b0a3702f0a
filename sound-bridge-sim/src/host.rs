use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use sound_bridge_core::{ArgumentBag, ChannelError, Codec, MethodChannel, Platform, WireValue};

use crate::capabilities::CodecCapabilities;

/// One outbound call as seen by the simulated native side.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: String,
    pub args: ArgumentBag,
}

#[derive(Default)]
struct HostState {
    calls: Vec<RecordedCall>,
    failures: HashMap<String, String>,
    replies: HashMap<String, WireValue>,
}

/// In-process stand-in for the native recorder and player modules.
///
/// Answers every operation of the bridge protocol, logs each call (so tests
/// can count them), and can be scripted to fail or reply differently per
/// method name.
pub struct SimulatedHost {
    platform: Platform,
    capabilities: CodecCapabilities,
    state: Mutex<HostState>,
}

impl SimulatedHost {
    pub fn new(platform: Platform) -> Self {
        Self::with_capabilities(platform, CodecCapabilities::for_platform(platform))
    }

    pub fn with_capabilities(platform: Platform, capabilities: CodecCapabilities) -> Self {
        Self {
            platform,
            capabilities,
            state: Mutex::new(HostState::default()),
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Make every later call to `method` fail with `message`.
    pub fn fail_method(&self, method: &str, message: &str) {
        self.state.lock().failures.insert(method.to_string(), message.to_string());
    }

    pub fn clear_failure(&self, method: &str) {
        self.state.lock().failures.remove(method);
    }

    /// Override the reply to `method`.
    pub fn set_reply(&self, method: &str, reply: WireValue) {
        self.state.lock().replies.insert(method.to_string(), reply);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().calls.clone()
    }

    pub fn methods(&self) -> Vec<String> {
        self.state.lock().calls.iter().map(|c| c.method.clone()).collect()
    }

    pub fn call_count(&self) -> usize {
        self.state.lock().calls.len()
    }

    pub fn count_of(&self, method: &str) -> usize {
        self.state.lock().calls.iter().filter(|c| c.method == method).count()
    }

    pub fn last_call(&self, method: &str) -> Option<RecordedCall> {
        self.state.lock().calls.iter().rev().find(|c| c.method == method).cloned()
    }

    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    fn answer(&self, method: &str, args: &ArgumentBag) -> Result<WireValue, ChannelError> {
        match method {
            "isEncoderSupported" => Ok(WireValue::Bool(self.capabilities.encoder(codec_arg(method, args)?))),
            "isDecoderSupported" => Ok(WireValue::Bool(self.capabilities.decoder(codec_arg(method, args)?))),
            "startRecorder" => {
                let path = match args.get("path").and_then(WireValue::as_str) {
                    Some(path) => path.to_string(),
                    None => default_recording_path(codec_arg(method, args)?),
                };
                Ok(WireValue::String(path))
            }
            "stopRecorder" | "startPlayer" | "stopPlayer" | "pausePlayer" | "resumePlayer" | "seekToPlayer"
            | "setVolume" | "setSubscriptionDuration" | "setDbPeakLevelUpdate" | "setDbLevelEnabled"
            | "initializeMediaPlayer" | "releaseMediaPlayer" => Ok(WireValue::String(format!("{} done", method))),
            other => Err(ChannelError::MethodFailed {
                method: other.to_string(),
                message: "not implemented".into(),
            }),
        }
    }
}

#[async_trait]
impl MethodChannel for SimulatedHost {
    async fn invoke(&self, method: &str, args: ArgumentBag) -> Result<WireValue, ChannelError> {
        log::debug!("native {:?}: {} {}", self.platform, method, WireValue::Map(args.clone()));

        let (failure, reply) = {
            let mut s = self.state.lock();
            s.calls.push(RecordedCall {
                method: method.to_string(),
                args: args.clone(),
            });
            (s.failures.get(method).cloned(), s.replies.get(method).cloned())
        };

        if let Some(message) = failure {
            return Err(ChannelError::MethodFailed {
                method: method.to_string(),
                message,
            });
        }
        match reply {
            Some(reply) => Ok(reply),
            None => self.answer(method, &args),
        }
    }
}

fn codec_arg(method: &str, args: &ArgumentBag) -> Result<Codec, ChannelError> {
    args.get("codec")
        .and_then(WireValue::as_i64)
        .and_then(Codec::from_ordinal)
        .ok_or_else(|| ChannelError::MethodFailed {
            method: method.to_string(),
            message: "missing or unknown codec".into(),
        })
}

fn default_recording_path(codec: Codec) -> String {
    let ext = match codec {
        Codec::Default | Codec::Aac => "aac",
        Codec::Opus => "opus",
        Codec::CafOpus => "caf",
        Codec::Mp3 => "mp3",
        Codec::Vorbis => "ogg",
        Codec::Pcm => "pcm",
    };
    format!("/tmp/sound.{}", ext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sound_bridge_core::args;

    #[tokio::test]
    async fn answers_capability_queries_from_table() {
        let host = SimulatedHost::new(Platform::Ios);
        let reply = host.invoke("isEncoderSupported", args! { "codec" => 3i64 }).await.unwrap();
        assert_eq!(reply, WireValue::Bool(true));
        let reply = host.invoke("isEncoderSupported", args! { "codec" => 4i64 }).await.unwrap();
        assert_eq!(reply, WireValue::Bool(false));
        assert_eq!(host.count_of("isEncoderSupported"), 2);
    }

    #[tokio::test]
    async fn unknown_codec_is_a_method_failure() {
        let host = SimulatedHost::new(Platform::Android);
        let err = host.invoke("isDecoderSupported", args! { "codec" => 42i64 }).await.unwrap_err();
        assert!(matches!(err, ChannelError::MethodFailed { .. }));
    }

    #[tokio::test]
    async fn start_recorder_picks_path_when_none_given() {
        let host = SimulatedHost::new(Platform::Android);
        let reply = host
            .invoke("startRecorder", args! { "path" => WireValue::Null, "codec" => 2i64 })
            .await
            .unwrap();
        assert_eq!(reply, WireValue::from("/tmp/sound.opus"));
    }

    #[tokio::test]
    async fn scripted_failures_and_replies() {
        let host = SimulatedHost::new(Platform::Android);
        host.fail_method("stopPlayer", "device lost");
        host.set_reply("pausePlayer", WireValue::from("paused"));

        let err = host.invoke("stopPlayer", args! {}).await.unwrap_err();
        assert_eq!(err.to_string(), "stopPlayer failed: device lost");
        assert_eq!(host.invoke("pausePlayer", args! {}).await.unwrap(), WireValue::from("paused"));

        host.clear_failure("stopPlayer");
        assert!(host.invoke("stopPlayer", args! {}).await.is_ok());
        assert_eq!(host.methods(), vec!["stopPlayer", "pausePlayer", "stopPlayer"]);

        host.clear_calls();
        assert_eq!(host.call_count(), 0);
    }

    #[tokio::test]
    async fn unknown_method_fails() {
        let host = SimulatedHost::new(Platform::Other);
        assert!(host.invoke("rewind", args! {}).await.is_err());
        assert_eq!(host.last_call("rewind").map(|c| c.method), Some("rewind".to_string()));
    }
}
