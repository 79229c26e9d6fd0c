/// L1 acceleration delta a sample must exceed to count as a shake (m/s²)
pub const SHAKE_THRESHOLD: f64 = 15.0;

/// Minimum spacing between accepted shake events (ms)
pub const DEBOUNCE_WINDOW_MS: u64 = 100;

/// Progress added per accepted shake event, independent of intensity
pub const PROGRESS_INCREMENT: u8 = 8;

/// Saturation point of the progress counter
pub const PROGRESS_MAX: u8 = 100;

/// Upper bound of shake intensity
pub const INTENSITY_MAX: f64 = 100.0;

/// Intensity at exactly one threshold of delta. Two thresholds saturate.
pub const INTENSITY_SCALE: f64 = 50.0;

/// Fixed intensity synthesized for a fallback tap
pub const TAP_INTENSITY: f64 = 80.0;

/// Delay before the display intensity falls back to zero (ms)
pub const INTENSITY_DECAY_MS: u64 = 200;

/// Consecutive all-zero samples before the sensor is reported as suspect
pub const ZERO_STREAK_SUSPECT: u32 = 10;

/// Haptic pulse for an accepted motion shake (ms)
pub const SHAKE_PULSE_MS: u32 = 10;

/// Haptic pulse for a fallback tap (ms)
pub const TAP_PULSE_MS: u32 = 15;

/// Reveal pattern: vibrate, pause, vibrate, pause, vibrate (ms)
pub const REVEAL_PATTERN_MS: [u32; 5] = [100, 50, 100, 50, 200];

/// Maximum wobble translation at full intensity, in either direction (px)
pub const WOBBLE_MAX_OFFSET: f64 = 10.0;

/// Maximum wobble rotation at full intensity, in either direction (degrees)
pub const WOBBLE_MAX_ROTATE: f64 = 7.5;
