use super::error::BridgeError;

/// Player state machine.
///
/// ```text
/// none / stopped / completed --start--> playing --pause--> paused
///                                          ^                  |
///                                          +-----resume-------+
/// playing / paused --stop--> stopped
/// playing --native finish--> completed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Playing,
    Paused,
    Stopped,
    Completed,
}

impl PlaybackState {
    /// Decode the ordinal carried by `updatePlaybackState`.
    ///
    /// Only 0 (playing), 1 (paused) and 2 (stopped) are valid on the wire;
    /// completion is signalled by its own event.
    pub fn from_wire(ordinal: i64) -> Result<Self, BridgeError> {
        match ordinal {
            0 => Ok(Self::Playing),
            1 => Ok(Self::Paused),
            2 => Ok(Self::Stopped),
            other => Err(BridgeError::UnrecognizedWireValue {
                field: "playbackState".into(),
                value: other.to_string(),
            }),
        }
    }

    pub fn is_active(self) -> bool {
        matches!(self, Self::Playing | Self::Paused)
    }
}

/// Recorder state machine: none / stopped --start--> recording --stop--> stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingState {
    Recording,
    Stopped,
}

/// Which of the two state machines a command drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Recorder,
    Player,
}

/// Both state enums, as tracked by a session.
///
/// A command admitted by one of the checks marks its side as pending until
/// the native reply settles it; further commands on that side are refused
/// in the meantime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StateTracker {
    playback: Option<PlaybackState>,
    recording: Option<RecordingState>,
    recorder_pending: bool,
    player_pending: bool,
}

impl StateTracker {
    pub fn playback(&self) -> Option<PlaybackState> {
        self.playback
    }

    pub fn recording(&self) -> Option<RecordingState> {
        self.recording
    }

    pub fn is_pending(&self, side: Side) -> bool {
        match side {
            Side::Recorder => self.recorder_pending,
            Side::Player => self.player_pending,
        }
    }

    pub(crate) fn begin(&mut self, side: Side) {
        self.set_pending(side, true);
    }

    pub(crate) fn settle(&mut self, side: Side) {
        self.set_pending(side, false);
    }

    fn set_pending(&mut self, side: Side, pending: bool) {
        match side {
            Side::Recorder => self.recorder_pending = pending,
            Side::Player => self.player_pending = pending,
        }
    }

    pub(crate) fn set_playback(&mut self, state: PlaybackState) {
        self.playback = Some(state);
    }

    pub(crate) fn set_recording(&mut self, state: RecordingState) {
        self.recording = Some(state);
    }

    pub fn check_start_recorder(&self) -> Result<(), BridgeError> {
        match self.recording {
            Some(RecordingState::Recording) => {
                Err(BridgeError::RecorderRunning("recorder is already recording".into()))
            }
            _ if self.recorder_pending => Err(BridgeError::RecorderRunning("recorder is starting".into())),
            None | Some(RecordingState::Stopped) => Ok(()),
        }
    }

    pub fn check_stop_recorder(&self) -> Result<(), BridgeError> {
        match self.recording {
            Some(RecordingState::Recording) if self.recorder_pending => {
                Err(BridgeError::RecorderStopped("recorder is already stopping".into()))
            }
            Some(RecordingState::Recording) => Ok(()),
            _ => Err(BridgeError::RecorderStopped("recorder is not recording".into())),
        }
    }

    pub fn check_start_player(&self) -> Result<(), BridgeError> {
        match self.playback {
            Some(state) if state.is_active() => Err(BridgeError::PlayerRunning(format!(
                "player is already started ({:?})",
                state
            ))),
            _ if self.player_pending => Err(BridgeError::PlayerRunning(PLAYER_BUSY.into())),
            _ => Ok(()),
        }
    }

    pub fn check_stop_player(&self) -> Result<(), BridgeError> {
        match self.playback {
            Some(state) if state.is_active() => self.player_idle(BridgeError::PlayerStopped),
            _ => Err(BridgeError::PlayerStopped("player is already stopped".into())),
        }
    }

    pub fn check_pause_player(&self) -> Result<(), BridgeError> {
        match self.playback {
            Some(PlaybackState::Playing) => self.player_idle(BridgeError::PlayerStopped),
            _ => Err(BridgeError::PlayerStopped("player is not playing".into())),
        }
    }

    pub fn check_resume_player(&self) -> Result<(), BridgeError> {
        match self.playback {
            Some(PlaybackState::Paused) => self.player_idle(BridgeError::PlayerRunning),
            _ => Err(BridgeError::PlayerRunning("player is not paused".into())),
        }
    }

    fn player_idle(&self, err: fn(String) -> BridgeError) -> Result<(), BridgeError> {
        if self.player_pending {
            Err(err(PLAYER_BUSY.into()))
        } else {
            Ok(())
        }
    }
}

const PLAYER_BUSY: &str = "another player command is in flight";

#[cfg(test)]
mod tests {
    use super::*;

    fn with_playback(state: Option<PlaybackState>) -> StateTracker {
        StateTracker {
            playback: state,
            ..Default::default()
        }
    }

    #[test]
    fn start_player_allowed_from_idle_states() {
        for state in [None, Some(PlaybackState::Stopped), Some(PlaybackState::Completed)] {
            assert!(with_playback(state).check_start_player().is_ok(), "{:?}", state);
        }
        for state in [PlaybackState::Playing, PlaybackState::Paused] {
            assert!(matches!(
                with_playback(Some(state)).check_start_player(),
                Err(BridgeError::PlayerRunning(_))
            ));
        }
    }

    #[test]
    fn stop_player_requires_started_player() {
        assert!(with_playback(Some(PlaybackState::Playing)).check_stop_player().is_ok());
        assert!(with_playback(Some(PlaybackState::Paused)).check_stop_player().is_ok());
        for state in [None, Some(PlaybackState::Stopped), Some(PlaybackState::Completed)] {
            assert!(matches!(
                with_playback(state).check_stop_player(),
                Err(BridgeError::PlayerStopped(_))
            ));
        }
    }

    #[test]
    fn pause_and_resume_preconditions() {
        assert!(with_playback(Some(PlaybackState::Playing)).check_pause_player().is_ok());
        assert!(matches!(
            with_playback(Some(PlaybackState::Paused)).check_pause_player(),
            Err(BridgeError::PlayerStopped(_))
        ));
        assert!(with_playback(Some(PlaybackState::Paused)).check_resume_player().is_ok());
        assert!(matches!(
            with_playback(Some(PlaybackState::Playing)).check_resume_player(),
            Err(BridgeError::PlayerRunning(_))
        ));
    }

    #[test]
    fn recorder_preconditions() {
        let mut tracker = StateTracker::default();
        assert!(tracker.check_start_recorder().is_ok());
        assert!(matches!(tracker.check_stop_recorder(), Err(BridgeError::RecorderStopped(_))));

        tracker.set_recording(RecordingState::Recording);
        assert!(matches!(tracker.check_start_recorder(), Err(BridgeError::RecorderRunning(_))));
        assert!(tracker.check_stop_recorder().is_ok());

        tracker.set_recording(RecordingState::Stopped);
        assert!(tracker.check_start_recorder().is_ok());
    }

    #[test]
    fn pending_side_refuses_further_commands() {
        let mut tracker = with_playback(Some(PlaybackState::Playing));
        tracker.begin(Side::Player);
        assert!(tracker.is_pending(Side::Player));
        assert!(!tracker.is_pending(Side::Recorder));
        assert!(matches!(tracker.check_pause_player(), Err(BridgeError::PlayerStopped(_))));
        assert!(matches!(tracker.check_stop_player(), Err(BridgeError::PlayerStopped(_))));
        assert!(tracker.check_start_recorder().is_ok());

        tracker.settle(Side::Player);
        assert!(tracker.check_pause_player().is_ok());

        let mut tracker = StateTracker::default();
        tracker.begin(Side::Recorder);
        assert!(matches!(tracker.check_start_recorder(), Err(BridgeError::RecorderRunning(_))));
        tracker.set_recording(RecordingState::Recording);
        assert!(matches!(tracker.check_stop_recorder(), Err(BridgeError::RecorderStopped(_))));
        tracker.settle(Side::Recorder);
        assert!(tracker.check_stop_recorder().is_ok());
    }

    #[test]
    fn playback_state_from_wire() {
        assert_eq!(PlaybackState::from_wire(0).unwrap(), PlaybackState::Playing);
        assert_eq!(PlaybackState::from_wire(1).unwrap(), PlaybackState::Paused);
        assert_eq!(PlaybackState::from_wire(2).unwrap(), PlaybackState::Stopped);
        assert!(matches!(
            PlaybackState::from_wire(3),
            Err(BridgeError::UnrecognizedWireValue { .. })
        ));
    }
}
