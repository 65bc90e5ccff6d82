pub mod audio;
pub mod encoder;
pub mod recorder;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum RetakeError {
    #[error("Audio device error: {0}")]
    AudioDeviceError(String),

    #[error("Channel error: {0}")]
    ChannelError(String),

    #[error("IO error: {0}")]
    IOError(String),
}

impl From<std::io::Error> for RetakeError {
    fn from(e: std::io::Error) -> Self {
        RetakeError::IOError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RetakeError>;
