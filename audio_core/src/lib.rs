//! Audio container framing and handle management for synthesized speech.
//!
//! The speech endpoint returns headerless 16-bit PCM. [`wav::encode_wav`]
//! frames it as a standard RIFF/WAVE file and [`store::AudioStore`] keeps the
//! result addressable until the client releases it.

pub mod store;
pub mod wav;

pub use store::{AudioHandle, AudioStore, ScopedAudioHandle};
pub use wav::{
    encode_pcm_base64, encode_wav, AudioContainer, AudioFormat, WavError, DEFAULT_CHANNELS,
    DEFAULT_SAMPLE_RATE, HEADER_LEN,
};
