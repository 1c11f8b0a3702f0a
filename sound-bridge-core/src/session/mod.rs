pub mod pump;
pub mod sound_session;
