//! # sound-bridge-sim
//!
//! Simulated native audio host for sound-bridge.
//!
//! Provides:
//! - `SimulatedHost`: `MethodChannel` implementation answering the whole
//!   recorder/player protocol, with a call log and scripted failures
//! - `CodecCapabilities`: per-platform encoder/decoder support tables
//! - `script`: builders for the callbacks native modules push, and
//!   `EventScript` to feed them into an `EventPump`
//!
//! ## Usage
//! ```ignore
//! use std::sync::Arc;
//! use sound_bridge_core::{EventPump, Platform, SessionConfig, SoundSession};
//! use sound_bridge_sim::{EventScript, SimulatedHost};
//!
//! let host = Arc::new(SimulatedHost::new(Platform::Android));
//! let session = Arc::new(SoundSession::new(host.clone(), SessionConfig::default())?);
//! let (sender, pump) = EventPump::new(session.clone());
//! tokio::spawn(pump.run());
//! let script = EventScript::new(sender);
//! ```

pub mod capabilities;
pub mod host;
pub mod script;

pub use capabilities::CodecCapabilities;
pub use host::{RecordedCall, SimulatedHost};
pub use script::{EventScript, ScriptError};
