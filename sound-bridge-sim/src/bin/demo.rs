//! Records a short memo and plays it back against the simulated host.
//!
//! Run with `RUST_LOG=debug` to see every channel call.

use std::error::Error;
use std::sync::Arc;

use sound_bridge_core::{
    Codec, EventPump, Platform, PlayerOptions, RecorderConfig, SessionConfig, SoundSession, Track,
};
use sound_bridge_sim::{EventScript, SimulatedHost};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let platform = Platform::Android;
    let host = Arc::new(SimulatedHost::new(platform));
    let config = SessionConfig {
        platform,
        subscription_duration_secs: Some(0.1),
        ..Default::default()
    };
    let session = Arc::new(SoundSession::new(host.clone(), config)?);
    let (sender, pump) = EventPump::new(session.clone());
    let pump = tokio::spawn(pump.run());
    let script = EventScript::new(sender);

    session.initialize().await?;

    let mut recorder = session.recorder_progress();
    let path = session
        .start_recorder(RecorderConfig::new("/tmp/memo.aac", Codec::Aac))
        .await?;
    log::info!("recording to {}", path);

    for position in [100.0, 200.0, 300.0] {
        script.recorder_progress(position)?;
    }
    for _ in 0..3 {
        if let Some(status) = recorder.recv().await {
            log::info!("recorded {:.0} ms", status.current_position);
        }
    }
    session.stop_recorder().await?;

    let mut progress = session.player_progress();
    let options = PlayerOptions::default().on_skip_forward(|| log::info!("skip forward pressed"));
    session
        .start_player(Track::from_path(path, Codec::Aac).with_title("Memo"), options)
        .await?;

    script.player_progress(300.0, 150.0)?;
    script.skip_forward()?;
    script.finished(300.0, 290.0)?;
    for _ in 0..2 {
        if let Some(status) = progress.recv().await {
            log::info!("played {:.0} / {:.0} ms", status.current_position, status.duration);
        }
    }
    log::info!("player state: {:?}", session.playback_state());

    session.release_media_player().await?;

    drop(script);
    let stats = pump.await?;
    log::info!(
        "{} native calls, {} callbacks delivered, {} rejected",
        host.call_count(),
        stats.delivered,
        stats.rejected
    );
    Ok(())
}
