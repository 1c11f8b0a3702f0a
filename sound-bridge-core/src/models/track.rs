use std::collections::BTreeMap;
use std::fmt;

use super::codec::Codec;
use super::error::BridgeError;
use super::wire::WireValue;

/// Where the audio of a [`Track`] comes from.
#[derive(Clone, PartialEq)]
pub enum TrackSource {
    Path(String),
    Buffer(Vec<u8>),
}

impl fmt::Debug for TrackSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(p) => f.debug_tuple("Path").field(p).finish(),
            Self::Buffer(b) => write!(f, "Buffer(<{} bytes>)", b.len()),
        }
    }
}

/// A playable item plus the display metadata shown by the native
/// now-playing controls.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub source: TrackSource,
    pub codec: Codec,
    pub title: Option<String>,
    pub author: Option<String>,
    /// URL of the cover art.
    pub album_art: Option<String>,
}

impl Track {
    /// Build a track from an optional path and an optional buffer.
    ///
    /// Exactly one of the two must be given.
    pub fn new(path: Option<String>, buffer: Option<Vec<u8>>, codec: Codec) -> Result<Self, BridgeError> {
        let source = match (path, buffer) {
            (Some(path), None) => TrackSource::Path(path),
            (None, Some(buffer)) => TrackSource::Buffer(buffer),
            (Some(_), Some(_)) => {
                return Err(BridgeError::InvalidArgument(
                    "track cannot have both a path and a data buffer".into(),
                ))
            }
            (None, None) => {
                return Err(BridgeError::InvalidArgument(
                    "track needs either a path or a data buffer".into(),
                ))
            }
        };
        Ok(Self::with_source(source, codec))
    }

    pub fn from_path(path: impl Into<String>, codec: Codec) -> Self {
        Self::with_source(TrackSource::Path(path.into()), codec)
    }

    pub fn from_buffer(buffer: Vec<u8>, codec: Codec) -> Self {
        Self::with_source(TrackSource::Buffer(buffer), codec)
    }

    fn with_source(source: TrackSource, codec: Codec) -> Self {
        Self {
            source,
            codec,
            title: None,
            author: None,
            album_art: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_album_art(mut self, url: impl Into<String>) -> Self {
        self.album_art = Some(url.into());
        self
    }

    pub fn path(&self) -> Option<&str> {
        match &self.source {
            TrackSource::Path(p) => Some(p),
            TrackSource::Buffer(_) => None,
        }
    }

    pub fn data_buffer(&self) -> Option<&[u8]> {
        match &self.source {
            TrackSource::Buffer(b) => Some(b),
            TrackSource::Path(_) => None,
        }
    }

    pub fn is_buffered(&self) -> bool {
        matches!(self.source, TrackSource::Buffer(_))
    }

    /// Wire form sent as the `track` argument of `startPlayer`.
    ///
    /// ```text
    /// { path, dataBuffer, title, author, albumArt, bufferCodecIndex }
    /// ```
    pub fn to_wire(&self) -> WireValue {
        let mut map = BTreeMap::new();
        map.insert("path".to_string(), WireValue::from(self.path()));
        map.insert(
            "dataBuffer".to_string(),
            WireValue::from(self.data_buffer().map(<[u8]>::to_vec)),
        );
        map.insert("title".to_string(), WireValue::from(self.title.clone()));
        map.insert("author".to_string(), WireValue::from(self.author.clone()));
        map.insert("albumArt".to_string(), WireValue::from(self.album_art.clone()));
        map.insert("bufferCodecIndex".to_string(), WireValue::Int(self.codec.ordinal()));
        WireValue::Map(map)
    }
}
