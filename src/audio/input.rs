use crate::{Result, RetakeError};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Stream, StreamConfig};
use tracing::{error, info, warn};

/// Check whether the host exposes a default capture device.
///
/// Callers should check this before constructing a recorder.
pub fn is_capture_supported() -> bool {
    cpal::default_host().default_input_device().is_some()
}

/// Microphone capture through the default input device.
///
/// The device and its config are picked at construction; the stream itself
/// is opened lazily and at most once until `close()`. Multichannel input is
/// downmixed to mono before reaching the sample callback.
pub struct AudioInput {
    device: Device,
    config: StreamConfig,
    stream: Option<Stream>,
    acquisitions: u32,
}

impl AudioInput {
    /// Create a new audio input with the default input device.
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();

        let device = host
            .default_input_device()
            .ok_or_else(|| RetakeError::AudioDeviceError("No input device available".into()))?;

        info!(
            "Using input device: {}",
            device.name().unwrap_or_else(|_| "Unknown".to_string())
        );

        let config = device
            .default_input_config()
            .map_err(|e| {
                RetakeError::AudioDeviceError(format!("Failed to get input config: {}", e))
            })?
            .into();

        Ok(Self {
            device,
            config,
            stream: None,
            acquisitions: 0,
        })
    }

    /// Get the sample rate of the input device
    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    /// Get the number of channels
    pub fn channels(&self) -> u16 {
        self.config.channels
    }

    /// Check if the capture stream is currently open
    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    /// Number of times a capture stream has been opened.
    pub fn acquisitions(&self) -> u32 {
        self.acquisitions
    }

    /// Open the capture stream and deliver mono f32 samples to `on_samples`.
    ///
    /// No-op if the stream is already open; one open stream per session.
    pub fn open<F>(&mut self, mut on_samples: F) -> Result<()>
    where
        F: FnMut(&[f32]) + Send + 'static,
    {
        if self.stream.is_some() {
            warn!("Capture stream already open");
            return Ok(());
        }

        let channels = self.config.channels as usize;

        let err_fn = |err| {
            error!("Audio input stream error: {}", err);
        };

        let stream = self
            .device
            .build_input_stream(
                &self.config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if channels == 1 {
                        on_samples(data);
                    } else {
                        // Average all channels to create mono
                        let mono: Vec<f32> = data
                            .chunks(channels)
                            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
                            .collect();
                        on_samples(&mono);
                    }
                },
                err_fn,
                None,
            )
            .map_err(|e| {
                RetakeError::AudioDeviceError(format!("Failed to build input stream: {}", e))
            })?;

        stream.play().map_err(|e| {
            RetakeError::AudioDeviceError(format!("Failed to start input stream: {}", e))
        })?;

        self.stream = Some(stream);
        self.acquisitions += 1;

        info!(
            sample_rate = self.sample_rate(),
            channels = self.config.channels,
            "Capture stream opened"
        );
        Ok(())
    }

    /// Close the capture stream and release the device.
    pub fn close(&mut self) {
        if let Some(stream) = self.stream.take() {
            drop(stream);
            info!("Capture stream closed");
        }
    }
}

impl Drop for AudioInput {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_input_creation() {
        // This test might fail in CI environments without audio devices
        if let Ok(input) = AudioInput::new() {
            assert!(input.sample_rate() > 0);
            assert!(input.channels() > 0);
            assert!(!input.is_open());
            assert_eq!(input.acquisitions(), 0);
        }
    }

    #[test]
    fn test_open_counts_one_acquisition() {
        if let Ok(mut input) = AudioInput::new() {
            if input.open(|_| {}).is_ok() {
                assert!(input.is_open());
                assert_eq!(input.acquisitions(), 1);

                // Second open is a no-op, not a re-acquisition
                assert!(input.open(|_| {}).is_ok());
                assert_eq!(input.acquisitions(), 1);

                input.close();
                assert!(!input.is_open());
            }
        }
    }
}
