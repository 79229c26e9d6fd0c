use serde::Serialize;

use crate::constants::{REVEAL_PATTERN_MS, SHAKE_PULSE_MS, TAP_PULSE_MS};
use crate::sampler::ShakeSource;

/// A vibration request. Patterns alternate vibrate and pause durations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HapticPattern {
    Pulse(u32),
    Pattern(Vec<u32>),
}

impl HapticPattern {
    pub fn for_shake(source: ShakeSource) -> Self {
        match source {
            ShakeSource::Motion => HapticPattern::Pulse(SHAKE_PULSE_MS),
            ShakeSource::Tap => HapticPattern::Pulse(TAP_PULSE_MS),
        }
    }

    pub fn reveal() -> Self {
        HapticPattern::Pattern(REVEAL_PATTERN_MS.to_vec())
    }

    /// Total wall time the pattern occupies, pauses included.
    pub fn total_ms(&self) -> u32 {
        match self {
            HapticPattern::Pulse(ms) => *ms,
            HapticPattern::Pattern(steps) => steps.iter().sum(),
        }
    }
}

/// Fire-and-forget vibration. Implementations must not block and must
/// swallow their own failures.
pub trait Haptics {
    fn vibrate(&mut self, pattern: &HapticPattern);
}

/// Platform without a vibration motor.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoHaptics;

impl Haptics for NoHaptics {
    fn vibrate(&mut self, _pattern: &HapticPattern) {}
}

/// Records every request. Used by hosts that replay sessions and by tests.
#[derive(Clone, Debug, Default)]
pub struct RecordingHaptics {
    pub requests: Vec<HapticPattern>,
}

impl Haptics for RecordingHaptics {
    fn vibrate(&mut self, pattern: &HapticPattern) {
        self.requests.push(pattern.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patterns() {
        assert_eq!(
            HapticPattern::for_shake(ShakeSource::Motion),
            HapticPattern::Pulse(10)
        );
        assert_eq!(
            HapticPattern::for_shake(ShakeSource::Tap),
            HapticPattern::Pulse(15)
        );
        assert_eq!(
            HapticPattern::reveal(),
            HapticPattern::Pattern(vec![100, 50, 100, 50, 200])
        );
        assert_eq!(HapticPattern::reveal().total_ms(), 500);
    }

    #[test]
    fn test_recording() {
        let mut h = RecordingHaptics::default();
        h.vibrate(&HapticPattern::Pulse(10));
        h.vibrate(&HapticPattern::reveal());
        assert_eq!(h.requests.len(), 2);
    }
}
