use std::fmt;
use std::sync::Arc;

use super::codec::{AndroidAudioSource, AndroidEncoder, AndroidOutputFormat, Codec, IosQuality};

/// Platform the native module runs on. Decides a few wire formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Ios,
    Android,
    Other,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "ios") {
            Self::Ios
        } else if cfg!(target_os = "android") {
            Self::Android
        } else {
            Self::Other
        }
    }
}

/// Configuration for a sound session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Platform of the native side (default: the compilation target).
    pub platform: Platform,

    /// Progress callback period applied on initialize, in seconds.
    pub subscription_duration_secs: Option<f64>,

    /// Peak-level callback period applied on initialize, in seconds.
    pub db_peak_interval_secs: Option<f64>,

    /// Ask the native recorder to meter levels (default: false).
    pub db_level_enabled: bool,

    /// Buffered items per event stream before slow subscribers lag.
    pub stream_capacity: usize,
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.stream_capacity == 0 {
            return Err("stream capacity must be positive".into());
        }
        if let Some(secs) = self.subscription_duration_secs {
            if secs.is_nan() || secs <= 0.0 {
                return Err(format!("subscription duration must be positive: {}", secs));
            }
        }
        if let Some(secs) = self.db_peak_interval_secs {
            if secs.is_nan() || secs <= 0.0 {
                return Err(format!("db peak interval must be positive: {}", secs));
            }
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            platform: Platform::current(),
            subscription_duration_secs: None,
            db_peak_interval_secs: None,
            db_level_enabled: false,
            stream_capacity: 64,
        }
    }
}

/// Arguments of `startRecorder`.
#[derive(Debug, Clone, PartialEq)]
pub struct RecorderConfig {
    /// Output file path; the native side picks one when `None`.
    pub path: Option<String>,
    pub sample_rate: u32,
    pub num_channels: u16,
    pub bit_rate: u32,
    pub codec: Codec,
    pub android_encoder: AndroidEncoder,
    pub android_audio_source: AndroidAudioSource,
    pub android_output_format: AndroidOutputFormat,
    pub ios_quality: IosQuality,
}

impl RecorderConfig {
    pub fn new(path: impl Into<String>, codec: Codec) -> Self {
        Self {
            path: Some(path.into()),
            codec,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.sample_rate == 0 {
            return Err("sample rate must be positive".into());
        }
        if ![1, 2].contains(&self.num_channels) {
            return Err(format!("unsupported channel count: {}", self.num_channels));
        }
        if self.bit_rate == 0 {
            return Err("bit rate must be positive".into());
        }
        if matches!(&self.path, Some(p) if p.is_empty()) {
            return Err("recording path is empty".into());
        }
        Ok(())
    }
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            path: None,
            sample_rate: 44100,
            num_channels: 2,
            bit_rate: 128000,
            codec: Codec::Default,
            android_encoder: AndroidEncoder::Aac,
            android_audio_source: AndroidAudioSource::Mic,
            android_output_format: AndroidOutputFormat::Default,
            ios_quality: IosQuality::Low,
        }
    }
}

/// Callback fired when the user presses a skip button on the native
/// now-playing controls.
pub type SkipHandler = Arc<dyn Fn() + Send + Sync + 'static>;

/// Options for `startPlayer`.
#[derive(Clone, Default)]
pub struct PlayerOptions {
    pub on_skip_forward: Option<SkipHandler>,
    pub on_skip_backward: Option<SkipHandler>,
}

impl PlayerOptions {
    pub fn on_skip_forward(mut self, handler: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_skip_forward = Some(Arc::new(handler));
        self
    }

    pub fn on_skip_backward(mut self, handler: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_skip_backward = Some(Arc::new(handler));
        self
    }
}

impl fmt::Debug for PlayerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlayerOptions")
            .field("can_skip_forward", &self.on_skip_forward.is_some())
            .field("can_skip_backward", &self.on_skip_backward.is_some())
            .finish()
    }
}
