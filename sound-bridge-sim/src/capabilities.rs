//! Codec support tables of the native audio modules.
//!
//! Mirrors what the recorder and player modules answer to
//! `isEncoderSupported` / `isDecoderSupported`, indexed by codec ordinal.

use sound_bridge_core::{Codec, Platform};

/// Encoder and decoder support, one flag per codec ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecCapabilities {
    encoders: [bool; 7],
    decoders: [bool; 7],
}

impl CodecCapabilities {
    pub fn for_platform(platform: Platform) -> Self {
        // Order: Default, Aac, Opus, CafOpus, Mp3, Vorbis, Pcm
        match platform {
            Platform::Ios => Self {
                encoders: [true, true, false, true, false, false, true],
                decoders: [true, true, false, true, true, false, true],
            },
            // Opus encoding assumes API level 29 or later.
            Platform::Android => Self {
                encoders: [true, true, true, false, false, false, false],
                decoders: [true, true, true, false, true, true, true],
            },
            Platform::Other => Self {
                encoders: [true, true, false, false, false, false, true],
                decoders: [true, true, false, false, true, false, true],
            },
        }
    }

    /// Everything supported; useful when a test only cares about state.
    pub fn all() -> Self {
        Self {
            encoders: [true; 7],
            decoders: [true; 7],
        }
    }

    pub fn none() -> Self {
        Self {
            encoders: [false; 7],
            decoders: [false; 7],
        }
    }

    pub fn encoder(&self, codec: Codec) -> bool {
        self.encoders[codec.ordinal() as usize]
    }

    pub fn decoder(&self, codec: Codec) -> bool {
        self.decoders[codec.ordinal() as usize]
    }

    pub fn supported_encoders(&self) -> Vec<Codec> {
        Codec::ALL.into_iter().filter(|c| self.encoder(*c)).collect()
    }

    pub fn supported_decoders(&self) -> Vec<Codec> {
        Codec::ALL.into_iter().filter(|c| self.decoder(*c)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ios_records_caf_opus_but_not_mp3() {
        let caps = CodecCapabilities::for_platform(Platform::Ios);
        assert!(caps.encoder(Codec::CafOpus));
        assert!(!caps.encoder(Codec::Mp3));
        assert!(caps.decoder(Codec::Mp3));
        assert!(!caps.decoder(Codec::Opus));
    }

    #[test]
    fn android_has_no_caf_container() {
        let caps = CodecCapabilities::for_platform(Platform::Android);
        assert!(!caps.encoder(Codec::CafOpus));
        assert!(!caps.decoder(Codec::CafOpus));
        assert_eq!(
            caps.supported_encoders(),
            vec![Codec::Default, Codec::Aac, Codec::Opus]
        );
    }

    #[test]
    fn all_and_none() {
        assert_eq!(CodecCapabilities::all().supported_decoders().len(), 7);
        assert!(CodecCapabilities::none().supported_encoders().is_empty());
    }
}
