use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, MutexGuard};
use uuid::Uuid;

use crate::args;
use crate::events::inbound::{EventKind, NativeEvent};
use crate::events::registry::EventRegistry;
use crate::events::stream::{EventStreams, Subscription};
use crate::models::codec::Codec;
use crate::models::config::{Platform, PlayerOptions, RecorderConfig, SessionConfig, SkipHandler};
use crate::models::error::BridgeError;
use crate::models::state::{PlaybackState, RecordingState, Side, StateTracker};
use crate::models::status::{PlayStatus, RecordStatus};
use crate::models::track::Track;
use crate::models::wire::{ArgumentBag, WireValue};
use crate::traits::method_channel::{expect_bool, reply_string, MethodChannel};

/// Internal mutable session state, protected by `parking_lot::Mutex`.
///
/// The lock is never held across an `.await`.
struct SessionState {
    tracker: StateTracker,
    streams: EventStreams,
    registry: EventRegistry,
    skip_forward: Option<SkipHandler>,
    skip_backward: Option<SkipHandler>,
    initialized: bool,
}

impl SessionState {
    fn new(stream_capacity: usize) -> Self {
        Self {
            tracker: StateTracker::default(),
            streams: EventStreams::new(stream_capacity),
            registry: EventRegistry::default(),
            skip_forward: None,
            skip_backward: None,
            initialized: false,
        }
    }

    fn set_playback(&mut self, state: PlaybackState) {
        self.tracker.set_playback(state);
        self.streams.playback_state.publish(state);
    }

    fn set_recording(&mut self, state: RecordingState) {
        self.tracker.set_recording(state);
        self.streams.recording_state.publish(state);
    }

    fn is_recording(&self) -> bool {
        self.tracker.recording() == Some(RecordingState::Recording)
    }

    fn is_player_active(&self) -> bool {
        self.tracker.playback().is_some_and(PlaybackState::is_active)
    }

    fn teardown_player(&mut self) {
        self.skip_forward = None;
        self.skip_backward = None;
        self.streams.close_player();
    }
}

/// A command admitted by the state checks whose native reply is still
/// outstanding. Dropping it unsettled (error path or cancelled future)
/// releases the side again.
struct Pending<'a> {
    state: &'a Mutex<SessionState>,
    side: Side,
    settled: bool,
}

impl<'a> Pending<'a> {
    /// Release the side and hand back the lock, so the reply is applied
    /// against the state as it is now.
    fn settle(mut self) -> MutexGuard<'a, SessionState> {
        self.settled = true;
        let state = self.state;
        let mut s = state.lock();
        s.tracker.settle(self.side);
        s
    }
}

impl Drop for Pending<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.state.lock().tracker.settle(self.side);
        }
    }
}

/// Recorder and player bridge to the native audio module.
///
/// Every command checks the local state first, so calls made in the wrong
/// state fail without reaching the channel. Native callbacks come back
/// through [`handle_native_event`](Self::handle_native_event) and are
/// republished on typed streams.
///
/// ```text
/// caller ── start_player ──> [state check] ──> MethodChannel::invoke ──> native
/// native ── updateProgress ──> handle_native_event ──> player stream ──> subscribers
/// ```
pub struct SoundSession {
    id: Uuid,
    channel: Arc<dyn MethodChannel>,
    config: SessionConfig,
    session_state: Mutex<SessionState>,
}

impl SoundSession {
    pub fn new(channel: Arc<dyn MethodChannel>, config: SessionConfig) -> Result<Self, BridgeError> {
        config.validate().map_err(BridgeError::InvalidArgument)?;
        let id = Uuid::new_v4();
        log::debug!("session {} created for {:?}", id, config.platform);
        Ok(Self {
            id,
            channel,
            session_state: Mutex::new(SessionState::new(config.stream_capacity)),
            config,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn platform(&self) -> Platform {
        self.config.platform
    }

    pub fn playback_state(&self) -> Option<PlaybackState> {
        self.session_state.lock().tracker.playback()
    }

    pub fn recording_state(&self) -> Option<RecordingState> {
        self.session_state.lock().tracker.recording()
    }

    pub fn is_playing(&self) -> bool {
        self.playback_state() == Some(PlaybackState::Playing)
    }

    pub fn is_paused(&self) -> bool {
        self.playback_state() == Some(PlaybackState::Paused)
    }

    pub fn is_recording(&self) -> bool {
        self.recording_state() == Some(RecordingState::Recording)
    }

    pub fn is_initialized(&self) -> bool {
        self.session_state.lock().initialized
    }

    // --- Subscriptions ---

    pub fn recorder_progress(&self) -> Subscription<RecordStatus> {
        self.session_state.lock().streams.recorder.subscribe()
    }

    pub fn db_peak_progress(&self) -> Subscription<f64> {
        self.session_state.lock().streams.db_peak.subscribe()
    }

    pub fn player_progress(&self) -> Subscription<PlayStatus> {
        self.session_state.lock().streams.player.subscribe()
    }

    pub fn playback_state_changes(&self) -> Subscription<PlaybackState> {
        self.session_state.lock().streams.playback_state.subscribe()
    }

    pub fn recording_state_changes(&self) -> Subscription<RecordingState> {
        self.session_state.lock().streams.recording_state.subscribe()
    }

    // --- Capability queries and settings ---

    pub async fn is_encoder_supported(&self, codec: Codec) -> Result<bool, BridgeError> {
        let reply = self.invoke("isEncoderSupported", args! { "codec" => codec.ordinal() }).await?;
        Ok(expect_bool("isEncoderSupported", reply)?)
    }

    pub async fn is_decoder_supported(&self, codec: Codec) -> Result<bool, BridgeError> {
        let reply = self.invoke("isDecoderSupported", args! { "codec" => codec.ordinal() }).await?;
        Ok(expect_bool("isDecoderSupported", reply)?)
    }

    /// Period of the recorder and player progress callbacks.
    pub async fn set_subscription_duration(&self, secs: f64) -> Result<String, BridgeError> {
        require_positive("subscription duration", secs)?;
        let reply = self.invoke("setSubscriptionDuration", args! { "sec" => secs }).await?;
        Ok(reply_string(reply))
    }

    pub async fn set_db_peak_level_update(&self, interval_secs: f64) -> Result<String, BridgeError> {
        require_positive("db peak interval", interval_secs)?;
        let reply = self
            .invoke("setDbPeakLevelUpdate", args! { "intervalInSecs" => interval_secs })
            .await?;
        Ok(reply_string(reply))
    }

    pub async fn set_db_level_enabled(&self, enabled: bool) -> Result<String, BridgeError> {
        let reply = self.invoke("setDbLevelEnabled", args! { "enabled" => enabled }).await?;
        Ok(reply_string(reply))
    }

    // --- Recorder ---

    /// Start recording. Transitions: none/stopped → recording.
    ///
    /// Returns the path reported by the native recorder.
    pub async fn start_recorder(&self, config: RecorderConfig) -> Result<String, BridgeError> {
        let pending = self.reserve(Side::Recorder, StateTracker::check_start_recorder)?;
        config.validate().map_err(BridgeError::InvalidArgument)?;

        if !self.is_encoder_supported(config.codec).await? {
            return Err(BridgeError::UnsupportedCodec(config.codec));
        }

        let reply = self
            .invoke(
                "startRecorder",
                args! {
                    "path" => config.path.clone(),
                    "sampleRate" => config.sample_rate,
                    "numChannels" => config.num_channels as u32,
                    "bitRate" => config.bit_rate,
                    "codec" => config.codec.ordinal(),
                    "androidEncoder" => config.android_encoder.ordinal(),
                    "androidAudioSource" => config.android_audio_source.ordinal(),
                    "androidOutputFormat" => config.android_output_format.ordinal(),
                    "iosQuality" => config.ios_quality.ordinal(),
                },
            )
            .await?;

        {
            let mut s = pending.settle();
            s.streams.open_recorder();
            s.registry.register(&EventKind::RECORDER);
            s.set_recording(RecordingState::Recording);
        }
        log::debug!("session {}: recording ({:?})", self.id, config.codec);
        Ok(reply_string(reply))
    }

    /// Stop recording. Transitions: recording → stopped.
    pub async fn stop_recorder(&self) -> Result<String, BridgeError> {
        let pending = self.reserve(Side::Recorder, StateTracker::check_stop_recorder)?;

        let reply = self.invoke("stopRecorder", args! {}).await?;

        {
            let mut s = pending.settle();
            s.set_recording(RecordingState::Stopped);
            s.streams.close_recorder();
        }
        log::debug!("session {}: recorder stopped", self.id);
        Ok(reply_string(reply))
    }

    // --- Player ---

    /// Start playing `track`. Transitions: none/stopped/completed → playing.
    pub async fn start_player(&self, track: Track, options: PlayerOptions) -> Result<String, BridgeError> {
        let pending = self.reserve(Side::Player, StateTracker::check_start_player)?;

        if track.is_buffered() && !self.is_decoder_supported(track.codec).await? {
            return Err(BridgeError::UnsupportedCodec(track.codec));
        }

        let reply = self
            .invoke(
                "startPlayer",
                args! {
                    "track" => track.to_wire(),
                    "canSkipForward" => options.on_skip_forward.is_some(),
                    "canSkipBackward" => options.on_skip_backward.is_some(),
                },
            )
            .await?;

        {
            let mut s = pending.settle();
            s.streams.open_player();
            s.registry.register(&EventKind::PLAYER);
            s.skip_forward = options.on_skip_forward;
            s.skip_backward = options.on_skip_backward;
            s.set_playback(PlaybackState::Playing);
        }
        log::debug!("session {}: playing {:?}", self.id, track.source);
        Ok(reply_string(reply))
    }

    pub async fn start_player_from_path(&self, path: impl Into<String>, codec: Codec) -> Result<String, BridgeError> {
        self.start_player(Track::from_path(path, codec), PlayerOptions::default()).await
    }

    pub async fn start_player_from_buffer(&self, buffer: Vec<u8>, codec: Codec) -> Result<String, BridgeError> {
        self.start_player(Track::from_buffer(buffer, codec), PlayerOptions::default()).await
    }

    /// Stop playback. Transitions: playing/paused → stopped.
    ///
    /// A completion reported while the stop was in flight is kept.
    pub async fn stop_player(&self) -> Result<String, BridgeError> {
        let pending = self.reserve(Side::Player, StateTracker::check_stop_player)?;

        let reply = self.invoke("stopPlayer", args! {}).await?;

        {
            let mut s = pending.settle();
            if s.is_player_active() {
                s.set_playback(PlaybackState::Stopped);
            }
            s.teardown_player();
        }
        log::debug!("session {}: player stopped", self.id);
        Ok(reply_string(reply))
    }

    /// Transitions: playing → paused.
    pub async fn pause_player(&self) -> Result<String, BridgeError> {
        let pending = self.reserve(Side::Player, StateTracker::check_pause_player)?;
        let reply = self.invoke("pausePlayer", args! {}).await?;
        self.settle_playback(pending, PlaybackState::Playing, PlaybackState::Paused);
        Ok(reply_string(reply))
    }

    /// Transitions: paused → playing.
    pub async fn resume_player(&self) -> Result<String, BridgeError> {
        let pending = self.reserve(Side::Player, StateTracker::check_resume_player)?;
        let reply = self.invoke("resumePlayer", args! {}).await?;
        self.settle_playback(pending, PlaybackState::Paused, PlaybackState::Playing);
        Ok(reply_string(reply))
    }

    /// Apply `from → to` unless a native callback moved the player while
    /// the command was in flight.
    fn settle_playback(&self, pending: Pending<'_>, from: PlaybackState, to: PlaybackState) {
        let mut s = pending.settle();
        match s.tracker.playback() {
            Some(state) if state == from => s.set_playback(to),
            current => log::debug!(
                "session {}: player moved to {:?} while going {:?} → {:?}",
                self.id,
                current,
                from,
                to
            ),
        }
    }

    /// The native modules read the `sec` key as whole milliseconds.
    pub async fn seek_to_player(&self, position: Duration) -> Result<String, BridgeError> {
        let millis = i64::try_from(position.as_millis())
            .map_err(|_| BridgeError::InvalidArgument(format!("seek position too large: {:?}", position)))?;
        let reply = self.invoke("seekToPlayer", args! { "sec" => millis }).await?;
        Ok(reply_string(reply))
    }

    /// Set the output volume, `0.0..=1.0`.
    pub async fn set_volume(&self, volume: f64) -> Result<String, BridgeError> {
        if !(0.0..=1.0).contains(&volume) {
            return Err(BridgeError::InvalidArgument(format!(
                "volume must be within 0.0..=1.0, got {}",
                volume
            )));
        }
        let wire_volume = volume_for_platform(self.config.platform, volume);
        let reply = self.invoke("setVolume", args! { "volume" => wire_volume }).await?;
        Ok(reply_string(reply))
    }

    /// Initialize the native media player and start accepting its callbacks.
    ///
    /// Re-initializing resets the accepted callbacks before registering
    /// them again. Failures are reported as [`BridgeError::NotInitialized`].
    pub async fn initialize(&self) -> Result<(), BridgeError> {
        match self.initialize_inner().await {
            Ok(()) => Ok(()),
            Err(e) => {
                self.session_state.lock().initialized = false;
                Err(BridgeError::not_initialized("initialize failed", e))
            }
        }
    }

    async fn initialize_inner(&self) -> Result<(), BridgeError> {
        self.invoke("initializeMediaPlayer", args! {}).await?;

        if let Some(secs) = self.config.subscription_duration_secs {
            self.set_subscription_duration(secs).await?;
        }
        if let Some(secs) = self.config.db_peak_interval_secs {
            self.set_db_peak_level_update(secs).await?;
        }
        if self.config.db_level_enabled {
            self.set_db_level_enabled(true).await?;
        }

        {
            let mut s = self.session_state.lock();
            s.registry.reset();
            s.registry.register(&EventKind::PLAYER);
            if s.is_recording() {
                s.registry.register(&EventKind::RECORDER);
            }
            s.streams.open_player();
            s.initialized = true;
        }

        log::debug!("session {}: media player initialized", self.id);
        Ok(())
    }

    /// Stop playback if needed, release the native media player and tear
    /// down the player streams. Failures are reported as
    /// [`BridgeError::NotInitialized`].
    pub async fn release_media_player(&self) -> Result<(), BridgeError> {
        self.release_inner()
            .await
            .map_err(|e| BridgeError::not_initialized("release failed", e))
    }

    async fn release_inner(&self) -> Result<(), BridgeError> {
        let active = self.session_state.lock().is_player_active();
        if active {
            self.stop_player().await?;
        }

        self.invoke("releaseMediaPlayer", args! {}).await?;

        {
            let mut s = self.session_state.lock();
            s.streams.close_player();
            s.initialized = false;
        }
        log::debug!("session {}: media player released", self.id);
        Ok(())
    }

    // --- Inbound callbacks ---

    /// Dispatch one callback pushed by the native side.
    ///
    /// Fails with [`BridgeError::UnknownEvent`] for names outside the
    /// protocol and for kinds nothing has registered yet; neither touches a
    /// stream.
    pub fn handle_native_event(&self, method: &str, payload: WireValue) -> Result<(), BridgeError> {
        let kind = EventKind::from_method(method).ok_or_else(|| BridgeError::UnknownEvent(method.to_string()))?;
        if !self.session_state.lock().registry.is_registered(kind) {
            return Err(BridgeError::UnknownEvent(format!("{} (no handler registered)", method)));
        }
        let event = NativeEvent::decode_kind(kind, &payload)?;
        self.dispatch(event);
        Ok(())
    }

    fn dispatch(&self, event: NativeEvent) {
        let skip_handler = {
            let mut s = self.session_state.lock();
            match event {
                // Progress that trails a stop is dropped, even if a later
                // subscription reopened the stream.
                NativeEvent::RecorderProgress(status) => {
                    if s.is_recording() {
                        s.streams.recorder.publish(status);
                    } else {
                        log::trace!("session {}: recorder idle, dropping progress", self.id);
                    }
                    None
                }
                NativeEvent::DbPeakProgress(level) => {
                    if s.is_recording() {
                        s.streams.db_peak.publish(level);
                    } else {
                        log::trace!("session {}: recorder idle, dropping peak level", self.id);
                    }
                    None
                }
                NativeEvent::PlayerProgress(status) => {
                    if s.is_player_active() {
                        s.streams.player.publish(status);
                    } else {
                        log::trace!("session {}: player idle, dropping progress", self.id);
                    }
                    None
                }
                NativeEvent::PlayerFinished(status) => {
                    if s.is_player_active() {
                        s.streams.player.publish(status);
                    }
                    s.set_playback(PlaybackState::Completed);
                    log::debug!("session {}: playback completed", self.id);
                    None
                }
                NativeEvent::PlaybackStateChanged(state) => {
                    s.set_playback(state);
                    if state == PlaybackState::Stopped {
                        s.teardown_player();
                    }
                    None
                }
                NativeEvent::SkipForward => Some(("forward", s.skip_forward.clone())),
                NativeEvent::SkipBackward => Some(("backward", s.skip_backward.clone())),
            }
        };

        // Skip handlers run outside the lock; they may call back into the session.
        match skip_handler {
            Some((_, Some(handler))) => handler(),
            Some((direction, None)) => {
                log::warn!("session {}: skip {} pressed with no handler", self.id, direction)
            }
            None => {}
        }
    }

    /// Run `check` and mark `side` pending under one lock.
    fn reserve(
        &self,
        side: Side,
        check: fn(&StateTracker) -> Result<(), BridgeError>,
    ) -> Result<Pending<'_>, BridgeError> {
        let mut s = self.session_state.lock();
        check(&s.tracker)?;
        s.tracker.begin(side);
        Ok(Pending {
            state: &self.session_state,
            side,
            settled: false,
        })
    }

    async fn invoke(&self, method: &str, args: ArgumentBag) -> Result<WireValue, BridgeError> {
        log::debug!("session {}: -> {} {}", self.id, method, WireValue::Map(args.clone()));
        let reply = self.channel.invoke(method, args).await?;
        log::trace!("session {}: <- {} {}", self.id, method, reply);
        Ok(reply)
    }
}

/// The iOS module takes volume as a percentage.
pub fn volume_for_platform(platform: Platform, volume: f64) -> f64 {
    match platform {
        Platform::Ios => volume * 100.0,
        Platform::Android | Platform::Other => volume,
    }
}

fn require_positive(what: &str, secs: f64) -> Result<(), BridgeError> {
    if secs.is_finite() && secs > 0.0 {
        Ok(())
    } else {
        Err(BridgeError::InvalidArgument(format!("{} must be positive, got {}", what, secs)))
    }
}
