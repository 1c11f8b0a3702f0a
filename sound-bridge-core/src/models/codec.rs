/// Audio codecs known to the native recorder and player.
///
/// The discriminant is the wire representation. Native modules index their
/// own tables with it, so variants are only ever appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i32)]
pub enum Codec {
    #[default]
    Default = 0,
    Aac = 1,
    Opus = 2,
    /// Opus in a Core Audio container (iOS only).
    CafOpus = 3,
    Mp3 = 4,
    Vorbis = 5,
    Pcm = 6,
}

impl Codec {
    pub const ALL: [Codec; 7] = [
        Codec::Default,
        Codec::Aac,
        Codec::Opus,
        Codec::CafOpus,
        Codec::Mp3,
        Codec::Vorbis,
        Codec::Pcm,
    ];

    pub fn ordinal(self) -> i64 {
        self as i64
    }

    pub fn from_ordinal(ordinal: i64) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.ordinal() == ordinal)
    }
}

/// `MediaRecorder.AudioEncoder` constants on Android.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i32)]
pub enum AndroidEncoder {
    Default = 0,
    AmrNb = 1,
    AmrWb = 2,
    #[default]
    Aac = 3,
    HeAac = 4,
    AacEld = 5,
    Vorbis = 6,
    Opus = 7,
}

/// `MediaRecorder.AudioSource` constants on Android.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i32)]
pub enum AndroidAudioSource {
    Default = 0,
    #[default]
    Mic = 1,
    VoiceUplink = 2,
    VoiceDownlink = 3,
    Camcorder = 4,
    VoiceRecognition = 5,
    VoiceCommunication = 6,
    RemoteSubmix = 8,
    Unprocessed = 9,
}

/// `MediaRecorder.OutputFormat` constants on Android.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i32)]
pub enum AndroidOutputFormat {
    #[default]
    Default = 0,
    ThreeGpp = 1,
    Mpeg4 = 2,
    AmrNb = 3,
    AmrWb = 4,
    AacAdts = 6,
    Mpeg2Ts = 8,
    Webm = 9,
    Ogg = 11,
}

/// `AVAudioQuality` constants on iOS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i32)]
pub enum IosQuality {
    Min = 0,
    #[default]
    Low = 0x20,
    Medium = 0x40,
    High = 0x60,
    Max = 0x7F,
}

macro_rules! wire_ordinal {
    ($($ty:ty),*) => {
        $(impl $ty {
            pub fn ordinal(self) -> i64 {
                self as i64
            }
        })*
    };
}

wire_ordinal!(AndroidEncoder, AndroidAudioSource, AndroidOutputFormat, IosQuality);
