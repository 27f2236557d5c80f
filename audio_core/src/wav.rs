use base64::{engine::general_purpose, Engine as _};
use serde::Serialize;
use thiserror::Error;

/// Size of the canonical RIFF/WAVE header written in front of the PCM data.
pub const HEADER_LEN: usize = 44;
/// Sample rate of the speech payloads returned by the synthesis endpoint.
pub const DEFAULT_SAMPLE_RATE: u32 = 24_000;
pub const DEFAULT_CHANNELS: u16 = 1;
pub const BITS_PER_SAMPLE: u16 = 16;
pub const MEDIA_TYPE: &str = "audio/wav";

#[derive(Debug, Error)]
pub enum WavError {
    #[error("PCM payload of {0} bytes does not fit a RIFF container")]
    PayloadTooLarge(usize),

    #[error("PCM payload is not valid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
}

/// A playable WAV file: 44-byte header followed by the untouched PCM payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioContainer {
    bytes: Vec<u8>,
    sample_rate: u32,
    channels: u16,
}

/// Format summary exposed to callers that only need metadata.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct AudioFormat {
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
}

/// Frame raw little-endian 16-bit PCM as a RIFF/WAVE container.
///
/// The payload is copied verbatim after the header. Odd-length payloads are
/// framed as-is; players tolerate the dangling byte.
pub fn encode_wav(payload: &[u8], sample_rate: u32, channels: u16) -> Result<AudioContainer, WavError> {
    let data_size = u32::try_from(payload.len())
        .ok()
        .filter(|len| len.checked_add(36).is_some())
        .ok_or(WavError::PayloadTooLarge(payload.len()))?;

    let bytes_per_sample = BITS_PER_SAMPLE / 8;
    let byte_rate: u32 = sample_rate
        .wrapping_mul(channels as u32)
        .wrapping_mul(bytes_per_sample as u32);
    let block_align: u16 = channels.wrapping_mul(bytes_per_sample);
    let riff_size: u32 = 36 + data_size;

    let mut out = Vec::<u8>::with_capacity(HEADER_LEN + payload.len());

    // RIFF header
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&riff_size.to_le_bytes());
    out.extend_from_slice(b"WAVE");

    // fmt chunk
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes()); // fmt chunk size
    out.extend_from_slice(&1u16.to_le_bytes()); // PCM
    out.extend_from_slice(&channels.to_le_bytes());
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());

    // data chunk
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_size.to_le_bytes());
    out.extend_from_slice(payload);

    debug_assert_eq!(out.len(), HEADER_LEN + payload.len());

    Ok(AudioContainer {
        bytes: out,
        sample_rate,
        channels,
    })
}

/// Decode a base64 PCM payload and frame it with the speech defaults (24 kHz mono).
pub fn encode_pcm_base64(data: &str) -> Result<AudioContainer, WavError> {
    let pcm = general_purpose::STANDARD.decode(data.trim())?;
    encode_wav(&pcm, DEFAULT_SAMPLE_RATE, DEFAULT_CHANNELS)
}

impl AudioContainer {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The PCM bytes that follow the header.
    pub fn payload(&self) -> &[u8] {
        &self.bytes[HEADER_LEN..]
    }

    pub fn media_type(&self) -> &'static str {
        MEDIA_TYPE
    }

    pub fn format(&self) -> AudioFormat {
        AudioFormat {
            sample_rate: self.sample_rate,
            channels: self.channels,
            bits_per_sample: BITS_PER_SAMPLE,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Playback length derived from the payload size.
    pub fn duration_ms(&self) -> u64 {
        let bytes_per_second =
            self.sample_rate as u64 * self.channels as u64 * (BITS_PER_SAMPLE / 8) as u64;
        if bytes_per_second == 0 {
            return 0;
        }
        self.payload().len() as u64 * 1000 / bytes_per_second
    }

    pub fn to_base64(&self) -> String {
        general_purpose::STANDARD.encode(&self.bytes)
    }

    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", MEDIA_TYPE, self.to_base64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn read_u32(buf: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes(buf[offset..offset + 4].try_into().unwrap())
    }

    fn read_u16(buf: &[u8], offset: usize) -> u16 {
        u16::from_le_bytes(buf[offset..offset + 2].try_into().unwrap())
    }

    #[test]
    fn test_header_layout() {
        let payload: Vec<u8> = (0..=255u8).cycle().take(1000).collect();
        let wav = encode_wav(&payload, DEFAULT_SAMPLE_RATE, DEFAULT_CHANNELS).unwrap();
        let buf = wav.as_bytes();

        assert_eq!(buf.len(), HEADER_LEN + payload.len());
        assert_eq!(&buf[0..4], b"RIFF");
        assert_eq!(read_u32(buf, 4), 36 + 1000);
        assert_eq!(&buf[8..12], b"WAVE");
        assert_eq!(&buf[12..16], b"fmt ");
        assert_eq!(read_u32(buf, 16), 16);
        assert_eq!(read_u16(buf, 20), 1);
        assert_eq!(read_u16(buf, 22), 1);
        assert_eq!(read_u32(buf, 24), 24_000);
        assert_eq!(read_u32(buf, 28), 48_000);
        assert_eq!(read_u16(buf, 32), 2);
        assert_eq!(read_u16(buf, 34), 16);
        assert_eq!(&buf[36..40], b"data");
        assert_eq!(read_u32(buf, 40), 1000);
        assert_eq!(&buf[44..], payload.as_slice());
        assert_eq!(wav.payload(), payload.as_slice());
    }

    #[test]
    fn test_stereo_fields() {
        let wav = encode_wav(&[0u8; 8], 44_100, 2).unwrap();
        let buf = wav.as_bytes();
        assert_eq!(read_u16(buf, 22), 2);
        assert_eq!(read_u32(buf, 24), 44_100);
        assert_eq!(read_u32(buf, 28), 44_100 * 4);
        assert_eq!(read_u16(buf, 32), 4);
    }

    #[test]
    fn test_empty_payload() {
        let wav = encode_wav(&[], DEFAULT_SAMPLE_RATE, DEFAULT_CHANNELS).unwrap();
        assert_eq!(wav.len(), HEADER_LEN);
        assert_eq!(read_u32(wav.as_bytes(), 4), 36);
        assert_eq!(read_u32(wav.as_bytes(), 40), 0);
        assert!(wav.payload().is_empty());
        assert_eq!(wav.duration_ms(), 0);
    }

    #[test]
    fn test_odd_length_is_framed_verbatim() {
        let payload = [1u8, 2, 3];
        let wav = encode_wav(&payload, DEFAULT_SAMPLE_RATE, DEFAULT_CHANNELS).unwrap();
        assert_eq!(wav.len(), 47);
        assert_eq!(read_u32(wav.as_bytes(), 40), 3);
        assert_eq!(wav.payload(), &payload);
    }

    #[test]
    fn test_deterministic() {
        let payload = vec![7u8; 480];
        let a = encode_wav(&payload, DEFAULT_SAMPLE_RATE, DEFAULT_CHANNELS).unwrap();
        let b = encode_wav(&payload, DEFAULT_SAMPLE_RATE, DEFAULT_CHANNELS).unwrap();
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_readable_by_hound() {
        let samples: Vec<i16> = vec![0, 1000, -1000, i16::MAX, i16::MIN, 42];
        let pcm: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
        let wav = encode_wav(&pcm, DEFAULT_SAMPLE_RATE, DEFAULT_CHANNELS).unwrap();

        let mut reader = hound::WavReader::new(Cursor::new(wav.into_bytes())).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 24_000);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(spec.sample_format, hound::SampleFormat::Int);

        let decoded: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(decoded, samples);
    }

    #[test]
    fn test_duration() {
        // one second of 24 kHz mono 16-bit audio
        let wav = encode_wav(&vec![0u8; 48_000], DEFAULT_SAMPLE_RATE, DEFAULT_CHANNELS).unwrap();
        assert_eq!(wav.duration_ms(), 1000);
    }

    #[test]
    fn test_encode_pcm_base64() {
        let pcm = [0x10u8, 0x00, 0xf0, 0xff];
        let encoded = general_purpose::STANDARD.encode(pcm);
        let wav = encode_pcm_base64(&encoded).unwrap();
        assert_eq!(wav.payload(), &pcm);
        assert_eq!(wav.sample_rate(), DEFAULT_SAMPLE_RATE);
        assert_eq!(wav.channels(), DEFAULT_CHANNELS);

        assert!(matches!(
            encode_pcm_base64("not base64!!"),
            Err(WavError::InvalidBase64(_))
        ));
    }

    #[test]
    fn test_data_uri() {
        let wav = encode_wav(&[0u8; 2], DEFAULT_SAMPLE_RATE, DEFAULT_CHANNELS).unwrap();
        let uri = wav.to_data_uri();
        assert!(uri.starts_with("data:audio/wav;base64,UklGR"));
    }
}
