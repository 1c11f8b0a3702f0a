use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};

use crate::models::state::{PlaybackState, RecordingState};
use crate::models::status::{PlayStatus, RecordStatus};

/// A lazily created broadcast channel of typed events.
///
/// Items travel as `Some(item)`; teardown publishes a terminal `None` and
/// drops the sender. Publishing while torn down is a no-op.
pub struct EventStream<T> {
    name: &'static str,
    capacity: usize,
    sender: Option<broadcast::Sender<Option<T>>>,
}

impl<T: Clone> EventStream<T> {
    pub fn new(name: &'static str, capacity: usize) -> Self {
        Self {
            name,
            capacity: capacity.max(1),
            sender: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_open(&self) -> bool {
        self.sender.is_some()
    }

    /// Create the channel if it does not exist yet.
    pub fn open(&mut self) {
        self.sender();
    }

    pub fn subscribe(&mut self) -> Subscription<T> {
        let receiver = self.sender().subscribe();
        Subscription {
            name: self.name,
            receiver,
            terminated: false,
        }
    }

    fn sender(&mut self) -> &broadcast::Sender<Option<T>> {
        let (name, capacity) = (self.name, self.capacity);
        self.sender.get_or_insert_with(|| {
            log::debug!("opened {} stream", name);
            broadcast::channel(capacity).0
        })
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.as_ref().map_or(0, broadcast::Sender::receiver_count)
    }

    pub fn publish(&self, item: T) {
        let Some(sender) = &self.sender else {
            log::trace!("{} stream closed, dropping item", self.name);
            return;
        };
        if sender.send(Some(item)).is_err() {
            log::trace!("{} stream has no subscribers", self.name);
        }
    }

    /// Publish the terminal marker and drop the channel.
    ///
    /// Returns false when the stream was already closed.
    pub fn close(&mut self) -> bool {
        match self.sender.take() {
            Some(sender) => {
                let _ = sender.send(None);
                log::debug!("closed {} stream", self.name);
                true
            }
            None => false,
        }
    }
}

/// Receiving end of an [`EventStream`].
pub struct Subscription<T> {
    name: &'static str,
    receiver: broadcast::Receiver<Option<T>>,
    terminated: bool,
}

impl<T: Clone> Subscription<T> {
    /// Next item, or `None` once the stream has been torn down.
    pub async fn recv(&mut self) -> Option<T> {
        while !self.terminated {
            match self.receiver.recv().await {
                Ok(Some(item)) => return Some(item),
                Ok(None) | Err(RecvError::Closed) => self.terminated = true,
                Err(RecvError::Lagged(missed)) => {
                    log::warn!("{} subscriber lagged, skipped {} items", self.name, missed);
                }
            }
        }
        None
    }

    /// Non-blocking variant of [`recv`](Self::recv).
    pub fn try_recv(&mut self) -> Option<T> {
        while !self.terminated {
            match self.receiver.try_recv() {
                Ok(Some(item)) => return Some(item),
                Ok(None) | Err(TryRecvError::Closed) => self.terminated = true,
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Lagged(missed)) => {
                    log::warn!("{} subscriber lagged, skipped {} items", self.name, missed);
                }
            }
        }
        None
    }

    /// Whether the terminal marker (or closure) has been observed.
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }
}

/// The five per-category streams owned by a session.
pub struct EventStreams {
    pub recorder: EventStream<RecordStatus>,
    pub db_peak: EventStream<f64>,
    pub player: EventStream<PlayStatus>,
    pub playback_state: EventStream<PlaybackState>,
    pub recording_state: EventStream<RecordingState>,
}

impl EventStreams {
    pub fn new(capacity: usize) -> Self {
        Self {
            recorder: EventStream::new("recorder", capacity),
            db_peak: EventStream::new("db-peak", capacity),
            player: EventStream::new("player", capacity),
            playback_state: EventStream::new("playback-state", capacity),
            recording_state: EventStream::new("recording-state", capacity),
        }
    }

    pub fn open_recorder(&mut self) {
        self.recorder.open();
        self.db_peak.open();
        self.recording_state.open();
    }

    pub fn close_recorder(&mut self) {
        self.recorder.close();
        self.db_peak.close();
        self.recording_state.close();
    }

    pub fn open_player(&mut self) {
        self.player.open();
        self.playback_state.open();
    }

    pub fn close_player(&mut self) {
        self.player.close();
        self.playback_state.close();
    }
}
