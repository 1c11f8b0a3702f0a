//! # sound-bridge-core
//!
//! Platform-agnostic recorder/player bridge to a native audio module.
//!
//! Commands are validated against locally tracked recorder and player state,
//! then forwarded over a `MethodChannel`. Callbacks pushed by the native side
//! are decoded into a closed set of events and republished on typed streams.
//!
//! ## Architecture
//!
//! ```text
//! sound-bridge-core (this crate)
//! ├── traits/       ← MethodChannel
//! ├── models/       ← BridgeError, PlaybackState, RecordingState, Track, Codec, WireValue, configs
//! ├── events/       ← NativeEvent decoding, EventRegistry, EventStream/Subscription
//! └── session/      ← SoundSession (command bridge), EventPump
//! ```

pub mod events;
pub mod models;
pub mod session;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use events::inbound::{EventKind, InboundMessage, NativeEvent};
pub use events::stream::{EventStream, Subscription};
pub use models::codec::{AndroidAudioSource, AndroidEncoder, AndroidOutputFormat, Codec, IosQuality};
pub use models::config::{Platform, PlayerOptions, RecorderConfig, SessionConfig, SkipHandler};
pub use models::error::{BridgeError, ChannelError};
pub use models::state::{PlaybackState, RecordingState, Side, StateTracker};
pub use models::status::{PlayStatus, RecordStatus};
pub use models::track::{Track, TrackSource};
pub use models::wire::{ArgumentBag, WireValue};
pub use session::pump::{EventPump, InboundSender, PumpStats};
pub use session::sound_session::SoundSession;
pub use traits::method_channel::MethodChannel;
