use crate::{Result, RetakeError};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::path::Path;
use tracing::{debug, info};

/// Size of a RIFF/WAVE header for 16-bit mono PCM.
pub const HEADER_LEN: usize = 44;

/// Bytes per encoded sample (16-bit PCM).
pub const BYTES_PER_SAMPLE: usize = 2;

/// Build a 44-byte RIFF/WAVE header for a mono 16-bit PCM payload.
///
/// Size fields are little-endian, chunk tags are the literal ASCII bytes.
pub fn header(payload_len: u32, sample_rate: u32) -> Vec<u8> {
    let byte_rate = sample_rate * BYTES_PER_SAMPLE as u32;

    let mut buf = Vec::with_capacity(HEADER_LEN);

    // RIFF chunk
    buf.extend_from_slice(b"RIFF");
    buf.extend_from_slice(&(36 + payload_len).to_le_bytes());
    buf.extend_from_slice(b"WAVE");

    // fmt sub-chunk
    buf.extend_from_slice(b"fmt ");
    buf.extend_from_slice(&16u32.to_le_bytes());
    buf.extend_from_slice(&1u16.to_le_bytes()); // PCM format
    buf.extend_from_slice(&1u16.to_le_bytes()); // channel count
    buf.extend_from_slice(&sample_rate.to_le_bytes());
    buf.extend_from_slice(&byte_rate.to_le_bytes());
    buf.extend_from_slice(&(BYTES_PER_SAMPLE as u16).to_le_bytes()); // block align
    buf.extend_from_slice(&16u16.to_le_bytes()); // bits per sample

    // data sub-chunk
    buf.extend_from_slice(b"data");
    buf.extend_from_slice(&payload_len.to_le_bytes());

    buf
}

/// Convert f32 samples to little-endian 16-bit PCM bytes.
///
/// Input is clamped to [-1, 1] and scaled by 32768; the float-to-int
/// cast saturates at the i16 boundary, so +1.0 encodes as 32767.
pub fn encode_pcm(samples: &[f32]) -> Vec<u8> {
    let mut data = Vec::with_capacity(samples.len() * BYTES_PER_SAMPLE);

    for &sample in samples {
        let scaled = sample.clamp(-1.0, 1.0) * 32768.0;
        data.extend_from_slice(&(scaled as i16).to_le_bytes());
    }

    data
}

/// Read the duration in seconds declared by a WAV buffer's own header.
///
/// Returns `None` if the buffer is too short, carries no RIFF/WAVE tags,
/// or declares a zero sample rate.
pub fn duration_seconds(wav: &[u8]) -> Option<f64> {
    if wav.len() < HEADER_LEN || &wav[0..4] != b"RIFF" || &wav[8..12] != b"WAVE" {
        return None;
    }

    let sample_rate = u32::from_le_bytes(wav[24..28].try_into().ok()?);
    let data_len = u32::from_le_bytes(wav[40..44].try_into().ok()?);

    if sample_rate == 0 {
        return None;
    }

    Some(data_len as f64 / (sample_rate as f64 * BYTES_PER_SAMPLE as f64))
}

/// Write mono f32 samples to a WAV file as 16-bit PCM.
pub fn write_wav<P: AsRef<Path>>(path: P, samples: &[f32], sample_rate: u32) -> Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path.as_ref(), spec)
        .map_err(|e| RetakeError::IOError(format!("Failed to create WAV writer: {}", e)))?;

    for &sample in samples {
        let scaled = (sample.clamp(-1.0, 1.0) * 32768.0) as i16;
        writer
            .write_sample(scaled)
            .map_err(|e| RetakeError::IOError(format!("Failed to write sample: {}", e)))?;
    }

    writer
        .finalize()
        .map_err(|e| RetakeError::IOError(format!("Failed to finalize WAV file: {}", e)))?;

    info!("Wrote {} samples to WAV file: {:?}", samples.len(), path.as_ref());
    Ok(())
}

/// Read a mono WAV file back into f32 samples.
///
/// Returns the samples and the file's sample rate.
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<(Vec<f32>, u32)> {
    let mut reader = WavReader::open(path.as_ref())
        .map_err(|e| RetakeError::IOError(format!("Failed to open WAV file: {}", e)))?;

    let spec = reader.spec();

    debug!(
        "Reading WAV file: {} Hz, {} channels, {} bits",
        spec.sample_rate, spec.channels, spec.bits_per_sample
    );

    let samples: Result<Vec<f32>> = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Float, _) => reader
            .samples::<f32>()
            .map(|s| s.map_err(|e| RetakeError::IOError(format!("Failed to read sample: {}", e))))
            .collect(),
        (SampleFormat::Int, 16) => reader
            .samples::<i16>()
            .map(|s| {
                s.map(|sample| sample as f32 / 32768.0)
                    .map_err(|e| RetakeError::IOError(format!("Failed to read sample: {}", e)))
            })
            .collect(),
        (SampleFormat::Int, bits) => {
            return Err(RetakeError::IOError(format!(
                "Unsupported bit depth: {}",
                bits
            )));
        }
    };

    Ok((samples?, spec.sample_rate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_header_field_layout() {
        let buf = header(8192, 44100);

        assert_eq!(buf.len(), HEADER_LEN);
        assert_eq!(&buf[0..4], b"RIFF");
        assert_eq!(u32::from_le_bytes(buf[4..8].try_into().unwrap()), 36 + 8192);
        assert_eq!(&buf[8..12], b"WAVE");
        assert_eq!(&buf[12..16], b"fmt ");
        assert_eq!(u32::from_le_bytes(buf[16..20].try_into().unwrap()), 16);
        assert_eq!(u16::from_le_bytes(buf[20..22].try_into().unwrap()), 1);
        assert_eq!(u16::from_le_bytes(buf[22..24].try_into().unwrap()), 1);
        assert_eq!(u32::from_le_bytes(buf[24..28].try_into().unwrap()), 44100);
        assert_eq!(
            u32::from_le_bytes(buf[28..32].try_into().unwrap()),
            44100 * 2
        );
        assert_eq!(u16::from_le_bytes(buf[32..34].try_into().unwrap()), 2);
        assert_eq!(u16::from_le_bytes(buf[34..36].try_into().unwrap()), 16);
        assert_eq!(&buf[36..40], b"data");
        assert_eq!(u32::from_le_bytes(buf[40..44].try_into().unwrap()), 8192);
    }

    #[test]
    fn test_encode_pcm_clamps_out_of_range() {
        let data = encode_pcm(&[2.0, -2.0]);

        assert_eq!(i16::from_le_bytes([data[0], data[1]]), 32767);
        assert_eq!(i16::from_le_bytes([data[2], data[3]]), -32768);
    }

    #[test]
    fn test_encode_pcm_scales_by_32768() {
        let data = encode_pcm(&[0.0, 0.5, -0.5]);

        assert_eq!(data.len(), 6);
        assert_eq!(i16::from_le_bytes([data[0], data[1]]), 0);
        assert_eq!(i16::from_le_bytes([data[2], data[3]]), 16384);
        assert_eq!(i16::from_le_bytes([data[4], data[5]]), -16384);
    }

    #[test]
    fn test_duration_from_header() {
        let buf = header(88200, 44100);
        let duration = duration_seconds(&buf).unwrap();
        assert!((duration - 1.0).abs() < 1e-9);

        assert_eq!(duration_seconds(&[0u8; 10]), None);
        assert_eq!(duration_seconds(&[0u8; HEADER_LEN]), None);
    }

    #[test]
    fn test_write_read_wav() {
        let path = std::env::temp_dir().join("retake_wav_test.wav");

        // One second of 440 Hz sine
        let sample_rate = 16000;
        let samples: Vec<f32> = (0..sample_rate as usize)
            .map(|i| (2.0 * PI * 440.0 * i as f32 / sample_rate as f32).sin() * 0.5)
            .collect();

        write_wav(&path, &samples, sample_rate).unwrap();
        let (read_samples, read_rate) = read_wav(&path).unwrap();

        assert_eq!(read_rate, sample_rate);
        assert_eq!(read_samples.len(), samples.len());
        for (original, read) in samples.iter().zip(read_samples.iter()) {
            assert!((original - read).abs() < 0.001);
        }

        let _ = std::fs::remove_file(&path);
    }
}
