//! Shake-to-reveal engine.
//!
//! A Motion Sampler turns raw acceleration readings (or fallback taps) into
//! debounced shake events; a Progress Controller accumulates them into a
//! bounded charge and reveals one random message from a fixed catalog when
//! the charge saturates.
//!
//! Zero I/O. Clocks, randomness, haptics and share targets are all supplied
//! by the host.

pub mod catalog;
pub mod constants;
pub mod error;
pub mod haptics;
pub mod permission;
pub mod progress;
pub mod sample;
pub mod sampler;
pub mod session;
pub mod share;
pub mod snapshot;
pub mod time;
pub mod wobble;

pub use catalog::{DEFAULT_MESSAGES, PredictionCatalog};
pub use constants::{
    DEBOUNCE_WINDOW_MS, INTENSITY_DECAY_MS, PROGRESS_INCREMENT, PROGRESS_MAX, SHAKE_THRESHOLD,
    TAP_INTENSITY,
};
pub use error::{CoreError, Result};
pub use haptics::{HapticPattern, Haptics, NoHaptics, RecordingHaptics};
pub use permission::{InputMode, MotionCapability, PermissionOutcome, PromptAnswer};
pub use progress::{ProgressController, ProgressState, ProgressUpdate, RevealState, RoundPhase};
pub use sample::AccelerationSample;
pub use sampler::{
    MotionSampler, Rejection, SampleOutcome, SamplerState, ShakeEvent, ShakeSource,
    intensity_for_delta,
};
pub use session::{IgnoreReason, SessionConfig, SessionUpdate, ShakeSession};
pub use share::{
    NoShare, ShareError, ShareOutcome, ShareRequest, ShareTarget, ShareTemplate,
    share_with_fallback,
};
pub use snapshot::{SNAPSHOT_VERSION, SessionSnapshot, export_snapshot};
pub use time::{Clock, ManualClock, MonotonicClock};
pub use wobble::Wobble;
