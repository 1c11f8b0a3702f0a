use std::sync::Arc;

use tokio::sync::mpsc;

use crate::events::inbound::InboundMessage;
use crate::session::sound_session::SoundSession;

/// Sending half handed to the transport for native callbacks.
pub type InboundSender = mpsc::UnboundedSender<InboundMessage>;

/// Counters for a finished pump run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PumpStats {
    pub delivered: u64,
    pub rejected: u64,
}

/// Delivers native callbacks to a session one at a time, in arrival order.
pub struct EventPump {
    session: Arc<SoundSession>,
    receiver: mpsc::UnboundedReceiver<InboundMessage>,
}

impl EventPump {
    /// Create a pump and the sender the transport pushes callbacks into.
    pub fn new(session: Arc<SoundSession>) -> (InboundSender, Self) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (sender, Self { session, receiver })
    }

    /// Run until every sender has been dropped.
    ///
    /// A callback that fails to dispatch is logged and skipped.
    pub async fn run(mut self) -> PumpStats {
        let mut stats = PumpStats::default();
        while let Some(message) = self.receiver.recv().await {
            match self.session.handle_native_event(&message.method, message.payload) {
                Ok(()) => stats.delivered += 1,
                Err(e) => {
                    log::error!("session {}: dropped {} callback: {}", self.session.id(), message.method, e);
                    stats.rejected += 1;
                }
            }
        }
        log::debug!(
            "session {}: event pump finished ({} delivered, {} rejected)",
            self.session.id(),
            stats.delivered,
            stats.rejected
        );
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;

    use crate::models::codec::Codec;
    use crate::models::config::SessionConfig;
    use crate::models::error::ChannelError;
    use crate::models::wire::{ArgumentBag, WireValue};
    use crate::traits::method_channel::MethodChannel;

    struct NullChannel;

    #[async_trait]
    impl MethodChannel for NullChannel {
        async fn invoke(&self, _method: &str, _args: ArgumentBag) -> Result<WireValue, ChannelError> {
            Ok(WireValue::Null)
        }
    }

    #[tokio::test]
    async fn delivers_in_order_and_counts_rejections() {
        let session = Arc::new(SoundSession::new(Arc::new(NullChannel), SessionConfig::default()).unwrap());
        session.initialize().await.unwrap();
        session.start_player_from_path("/tmp/a.aac", Codec::Aac).await.unwrap();
        let mut progress = session.player_progress();

        let (sender, pump) = EventPump::new(session.clone());
        for position in ["1", "2", "3"] {
            let json = format!(r#"{{"duration":"10","current_position":"{}"}}"#, position);
            sender.send(InboundMessage::new("updateProgress", WireValue::from(json))).unwrap();
        }
        sender.send(InboundMessage::new("noSuchEvent", WireValue::Null)).unwrap();
        drop(sender);

        let stats = pump.run().await;
        assert_eq!(stats, PumpStats { delivered: 3, rejected: 1 });

        let positions: Vec<f64> = [
            progress.try_recv().unwrap(),
            progress.try_recv().unwrap(),
            progress.try_recv().unwrap(),
        ]
        .iter()
        .map(|s| s.current_position)
        .collect();
        assert_eq!(positions, vec![1.0, 2.0, 3.0]);
    }
}
