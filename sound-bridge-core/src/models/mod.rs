pub mod codec;
pub mod config;
pub mod error;
pub mod state;
pub mod status;
pub mod track;
pub mod wire;
