pub mod take;
pub mod worker;

pub use take::TakeBuffer;
pub use worker::{EncoderCommand, EncoderEvent, EncoderWorker, WavEncoder};
