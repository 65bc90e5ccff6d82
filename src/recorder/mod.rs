pub mod config;
#[cfg(feature = "audio-io")]
pub mod controller;
pub mod events;
pub mod state;

pub use config::{RecorderConfig, ResumedTake};
#[cfg(feature = "audio-io")]
pub use controller::Recorder;
pub use events::{EventBus, RecorderEvent, SubscriptionId};
pub use state::RecorderState;
