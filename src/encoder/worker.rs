//! Streaming WAV encoder running on a dedicated worker thread.
//!
//! The worker owns its [`TakeBuffer`] exclusively and is reachable only
//! through channels: commands in, events out. Commands from one sender are
//! processed strictly in arrival order, so an `Encode` issued before a
//! `Dump` is always part of that dump.

use crate::encoder::TakeBuffer;
use crate::{Result, RetakeError};
use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use std::thread::{self, JoinHandle};
use tracing::{debug, info};

/// Commands accepted by the encoder worker.
#[derive(Debug)]
pub enum EncoderCommand {
    /// Append a chunk of f32 samples, converted to 16-bit PCM.
    Encode(Vec<f32>),

    /// Serialize the accumulated take into a WAV buffer at the given rate.
    Dump(u32),

    /// Discard pending chunks and prior audio.
    Clear,

    /// Seed the prior buffer from an existing WAV take.
    SetRecordedBuffer(Vec<u8>),

    /// Shutdown the worker.
    Shutdown,
}

/// Events emitted by the encoder worker.
#[derive(Clone, Debug)]
pub enum EncoderEvent {
    /// A complete WAV buffer produced by a dump.
    Audio(Vec<u8>),

    /// Worker has shut down.
    Shutdown,
}

/// Handle for driving the encoder worker.
///
/// Construction sets up the channels but not the thread; call
/// [`EncoderWorker::start`] on the returned worker, or use
/// [`WavEncoder::spawn`] for both at once. Commands never fail observably on
/// the worker side; the only error surface here is a disconnected channel.
pub struct WavEncoder {
    command_tx: Sender<EncoderCommand>,
    event_rx: Receiver<EncoderEvent>,
}

impl WavEncoder {
    /// Create an encoder handle and its worker.
    ///
    /// The command channel is unbounded so the capture path never blocks;
    /// `event_capacity` bounds the dump result channel.
    pub fn new(event_capacity: usize) -> (Self, EncoderWorker) {
        let (command_tx, command_rx) = unbounded();
        let (event_tx, event_rx) = bounded(event_capacity);

        let handle = Self {
            command_tx,
            event_rx,
        };
        let worker = EncoderWorker {
            command_rx,
            event_tx,
        };

        (handle, worker)
    }

    /// Create an encoder and start its worker thread.
    pub fn spawn(event_capacity: usize) -> (Self, JoinHandle<()>) {
        let (handle, worker) = Self::new(event_capacity);
        let join = worker.start();
        (handle, join)
    }

    /// Get a sender for commands
    pub fn command_sender(&self) -> Sender<EncoderCommand> {
        self.command_tx.clone()
    }

    /// Get a receiver for events
    pub fn event_receiver(&self) -> Receiver<EncoderEvent> {
        self.event_rx.clone()
    }

    /// Queue a chunk of samples for encoding.
    pub fn encode(&self, samples: Vec<f32>) -> Result<()> {
        self.send(EncoderCommand::Encode(samples))
    }

    /// Request serialization of the accumulated take.
    pub fn dump(&self, sample_rate: u32) -> Result<()> {
        self.send(EncoderCommand::Dump(sample_rate))
    }

    /// Discard all accumulated audio.
    pub fn clear(&self) -> Result<()> {
        self.send(EncoderCommand::Clear)
    }

    /// Seed the take from a previously dumped WAV buffer.
    pub fn set_recorded_buffer(&self, buffer: Vec<u8>) -> Result<()> {
        self.send(EncoderCommand::SetRecordedBuffer(buffer))
    }

    /// Request shutdown
    pub fn shutdown(&self) -> Result<()> {
        self.send(EncoderCommand::Shutdown)
    }

    /// Try to receive an event (non-blocking)
    pub fn try_recv_event(&self) -> Option<EncoderEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Receive an event (blocking)
    pub fn recv_event(&self) -> Result<EncoderEvent> {
        self.event_rx
            .recv()
            .map_err(|e| RetakeError::ChannelError(format!("Failed to receive event: {}", e)))
    }

    fn send(&self, command: EncoderCommand) -> Result<()> {
        self.command_tx
            .send(command)
            .map_err(|e| RetakeError::ChannelError(format!("Failed to send command: {}", e)))
    }
}

/// Worker that runs WAV encoding in a dedicated thread
pub struct EncoderWorker {
    command_rx: Receiver<EncoderCommand>,
    event_tx: Sender<EncoderEvent>,
}

impl EncoderWorker {
    /// Start the worker thread
    pub fn start(self) -> JoinHandle<()> {
        thread::spawn(move || self.run())
    }

    /// Main worker loop
    fn run(self) {
        info!("Encoder worker starting");

        let mut take = TakeBuffer::new();

        loop {
            match self.command_rx.recv() {
                Ok(EncoderCommand::Encode(samples)) => {
                    take.encode(&samples);
                }
                Ok(EncoderCommand::Dump(sample_rate)) => {
                    let wav = take.dump(sample_rate);
                    debug!(bytes = wav.len(), sample_rate, "Dump complete");
                    if self.event_tx.send(EncoderEvent::Audio(wav)).is_err() {
                        debug!("Event channel disconnected");
                        break;
                    }
                }
                Ok(EncoderCommand::Clear) => {
                    debug!("Take cleared");
                    take.clear();
                }
                Ok(EncoderCommand::SetRecordedBuffer(buffer)) => {
                    debug!(bytes = buffer.len(), "Take seeded from prior buffer");
                    take.seed(buffer);
                }
                Ok(EncoderCommand::Shutdown) => {
                    info!("Encoder worker received shutdown command");
                    let _ = self.event_tx.send(EncoderEvent::Shutdown);
                    break;
                }
                Err(_) => {
                    debug!("Command channel disconnected");
                    break;
                }
            }
        }

        info!("Encoder worker stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::wav::HEADER_LEN;

    #[test]
    fn test_encode_then_dump_emits_audio() {
        let (encoder, join) = WavEncoder::spawn(8);

        encoder.encode(vec![0.5; 256]).unwrap();
        encoder.encode(vec![-0.5; 256]).unwrap();
        encoder.dump(16000).unwrap();

        match encoder.recv_event().unwrap() {
            EncoderEvent::Audio(wav) => {
                assert_eq!(wav.len(), HEADER_LEN + 2 * 512);
            }
            other => panic!("Expected audio event, got {:?}", other),
        }

        encoder.shutdown().unwrap();
        join.join().unwrap();
    }

    #[test]
    fn test_double_dump_without_encode_matches() {
        let (encoder, join) = WavEncoder::spawn(8);

        encoder.encode(vec![0.3; 100]).unwrap();
        encoder.dump(44100).unwrap();
        encoder.dump(44100).unwrap();

        let first = match encoder.recv_event().unwrap() {
            EncoderEvent::Audio(wav) => wav,
            other => panic!("Expected audio event, got {:?}", other),
        };
        let second = match encoder.recv_event().unwrap() {
            EncoderEvent::Audio(wav) => wav,
            other => panic!("Expected audio event, got {:?}", other),
        };
        assert_eq!(first, second);

        encoder.shutdown().unwrap();
        join.join().unwrap();
    }

    #[test]
    fn test_clear_resets_to_header_only_dump() {
        let (encoder, join) = WavEncoder::spawn(8);

        encoder.encode(vec![0.9; 2048]).unwrap();
        encoder.clear().unwrap();
        encoder.dump(44100).unwrap();

        match encoder.recv_event().unwrap() {
            EncoderEvent::Audio(wav) => {
                assert_eq!(wav.len(), HEADER_LEN);
                assert_eq!(u32::from_le_bytes(wav[40..44].try_into().unwrap()), 0);
            }
            other => panic!("Expected audio event, got {:?}", other),
        }

        encoder.shutdown().unwrap();
        join.join().unwrap();
    }

    #[test]
    fn test_shutdown_acknowledges_and_joins() {
        let (encoder, join) = WavEncoder::spawn(8);

        encoder.shutdown().unwrap();
        assert!(matches!(
            encoder.recv_event().unwrap(),
            EncoderEvent::Shutdown
        ));
        join.join().unwrap();
    }
}
