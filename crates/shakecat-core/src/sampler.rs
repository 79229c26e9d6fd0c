//! Motion Sampler: turns a noisy acceleration stream into debounced shake events.
//!
//! Every sensor reading goes through three gates, in order:
//!
//! 1. all-zero readings are dropped as sensor noise,
//! 2. readings within [`DEBOUNCE_WINDOW_MS`] of the last accepted event are dropped,
//! 3. the L1 delta against the previous reading must exceed [`SHAKE_THRESHOLD`].
//!
//! Readings that pass gate 2 always become the new reference sample, whether
//! or not they clear the threshold. Fallback taps skip gates 1 and 3.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEBOUNCE_WINDOW_MS, INTENSITY_MAX, INTENSITY_SCALE, SHAKE_THRESHOLD, TAP_INTENSITY,
    ZERO_STREAK_SUSPECT,
};
use crate::sample::AccelerationSample;

/// Where a shake event came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShakeSource {
    Motion,
    Tap,
}

/// A discrete, debounced shake. Intensity is in `[0, 100]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShakeEvent {
    pub intensity: f64,
    pub source: ShakeSource,
    pub at_ms: u64,
}

/// Why an input produced no event.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Rejection {
    ZeroSample,
    Debounced { since_last_ms: u64 },
    BelowThreshold { delta: f64 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SampleOutcome {
    Shake(ShakeEvent),
    Rejected(Rejection),
}

impl SampleOutcome {
    pub fn event(self) -> Option<ShakeEvent> {
        match self {
            SampleOutcome::Shake(event) => Some(event),
            SampleOutcome::Rejected(_) => None,
        }
    }
}

/// Mutable sampler memory. Only the sampler writes it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SamplerState {
    pub last_sample: AccelerationSample,
    /// Monotonic ms of the last accepted event. `None` until the first one,
    /// so the first event of a session or round is never debounced.
    pub last_event_ms: Option<u64>,
    /// Consecutive all-zero readings. Not cleared by a round reset.
    pub zero_streak: u32,
}

/// Map an L1 delta onto `[0, 100]`. Twice the threshold saturates.
pub fn intensity_for_delta(delta: f64) -> f64 {
    ((delta / SHAKE_THRESHOLD) * INTENSITY_SCALE).min(INTENSITY_MAX)
}

#[derive(Clone, Debug)]
pub struct MotionSampler {
    state: SamplerState,
    debounce_taps: bool,
}

impl Default for MotionSampler {
    fn default() -> Self {
        Self::new(true)
    }
}

impl MotionSampler {
    /// `debounce_taps` applies the motion debounce window to fallback taps too.
    pub fn new(debounce_taps: bool) -> Self {
        Self {
            state: SamplerState::default(),
            debounce_taps,
        }
    }

    pub fn state(&self) -> &SamplerState {
        &self.state
    }

    pub fn debounces_taps(&self) -> bool {
        self.debounce_taps
    }

    /// True once enough consecutive all-zero readings arrived to suggest the
    /// platform has no working motion sensor.
    pub fn sensor_suspect(&self) -> bool {
        self.state.zero_streak >= ZERO_STREAK_SUSPECT
    }

    /// Run one sensor reading through the gates.
    pub fn classify(&mut self, sample: AccelerationSample, now_ms: u64) -> SampleOutcome {
        if sample.is_zero() {
            self.state.zero_streak = self.state.zero_streak.saturating_add(1);
            return SampleOutcome::Rejected(Rejection::ZeroSample);
        }
        self.state.zero_streak = 0;

        if let Some(since_last_ms) = self.within_debounce(now_ms) {
            return SampleOutcome::Rejected(Rejection::Debounced { since_last_ms });
        }

        let delta = sample.l1_distance(&self.state.last_sample);
        self.state.last_sample = sample;

        if delta <= SHAKE_THRESHOLD {
            return SampleOutcome::Rejected(Rejection::BelowThreshold { delta });
        }

        self.state.last_event_ms = Some(now_ms);
        SampleOutcome::Shake(ShakeEvent {
            intensity: intensity_for_delta(delta),
            source: ShakeSource::Motion,
            at_ms: now_ms,
        })
    }

    /// Sensor entry point: the event, if the reading produced one.
    pub fn on_sample(&mut self, sample: AccelerationSample, now_ms: u64) -> Option<ShakeEvent> {
        self.classify(sample, now_ms).event()
    }

    /// Fallback entry point: a tap synthesizes a fixed-intensity event.
    pub fn on_tap(&mut self, now_ms: u64) -> SampleOutcome {
        if self.debounce_taps
            && let Some(since_last_ms) = self.within_debounce(now_ms)
        {
            return SampleOutcome::Rejected(Rejection::Debounced { since_last_ms });
        }
        self.state.last_event_ms = Some(now_ms);
        SampleOutcome::Shake(ShakeEvent {
            intensity: TAP_INTENSITY,
            source: ShakeSource::Tap,
            at_ms: now_ms,
        })
    }

    /// Forget the reference sample and the debounce clock for a new round.
    pub fn reset(&mut self) {
        self.state.last_sample = AccelerationSample::ZERO;
        self.state.last_event_ms = None;
    }

    fn within_debounce(&self, now_ms: u64) -> Option<u64> {
        let last = self.state.last_event_ms?;
        let since = now_ms.saturating_sub(last);
        (since < DEBOUNCE_WINDOW_MS).then_some(since)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(x: f64, y: f64, z: f64) -> AccelerationSample {
        AccelerationSample::new(x, y, z)
    }

    #[test]
    fn test_zero_sample_rejected_without_touching_reference() {
        let mut s = MotionSampler::default();
        s.classify(sample(1.0, 1.0, 1.0), 0);
        let out = s.classify(AccelerationSample::ZERO, 500);
        assert_eq!(out, SampleOutcome::Rejected(Rejection::ZeroSample));
        assert_eq!(s.state().last_sample, sample(1.0, 1.0, 1.0));
        assert_eq!(s.state().zero_streak, 1);
    }

    #[test]
    fn test_small_motion_updates_reference_only() {
        let mut s = MotionSampler::default();
        let out = s.classify(sample(5.0, 5.0, 5.0), 1000);
        assert!(matches!(
            out,
            SampleOutcome::Rejected(Rejection::BelowThreshold { delta }) if (delta - 15.0).abs() < 1e-12
        ));
        assert_eq!(s.state().last_sample, sample(5.0, 5.0, 5.0));
        assert_eq!(s.state().last_event_ms, None);
    }

    #[test]
    fn test_sharp_motion_fires_event() {
        let mut s = MotionSampler::default();
        let event = s.on_sample(sample(10.0, 10.0, 0.0), 1000).unwrap();
        assert_eq!(event.source, ShakeSource::Motion);
        assert_eq!(event.at_ms, 1000);
        // delta 20 → 20/15*50
        assert!((event.intensity - 200.0 / 3.0).abs() < 1e-9);
        assert_eq!(s.state().last_event_ms, Some(1000));
    }

    #[test]
    fn test_debounce_window() {
        let mut s = MotionSampler::default();
        assert!(s.on_sample(sample(20.0, 0.0, 0.0), 1000).is_some());

        let out = s.classify(sample(-20.0, 0.0, 0.0), 1099);
        assert_eq!(
            out,
            SampleOutcome::Rejected(Rejection::Debounced { since_last_ms: 99 })
        );
        // debounced readings do not become the reference
        assert_eq!(s.state().last_sample, sample(20.0, 0.0, 0.0));

        assert!(s.on_sample(sample(-20.0, 0.0, 0.0), 1100).is_some());
    }

    #[test]
    fn test_first_event_not_debounced_near_epoch() {
        let mut s = MotionSampler::default();
        assert!(s.on_sample(sample(20.0, 0.0, 0.0), 5).is_some());
    }

    #[test]
    fn test_intensity_boundaries() {
        assert_eq!(intensity_for_delta(30.0), 100.0);
        assert_eq!(intensity_for_delta(90.0), 100.0);
        let just_over = intensity_for_delta(15.0001);
        assert!(just_over > 50.0 && just_over < 50.01, "got {just_over}");
    }

    #[test]
    fn test_tap_fixed_intensity_and_debounce() {
        let mut s = MotionSampler::new(true);
        let event = s.on_tap(0).event().unwrap();
        assert_eq!(event.intensity, TAP_INTENSITY);
        assert_eq!(event.source, ShakeSource::Tap);
        assert!(matches!(
            s.on_tap(40),
            SampleOutcome::Rejected(Rejection::Debounced { since_last_ms: 40 })
        ));
        assert!(s.on_tap(100).event().is_some());
    }

    #[test]
    fn test_undebounced_taps() {
        let mut s = MotionSampler::new(false);
        assert!(s.on_tap(0).event().is_some());
        assert!(s.on_tap(1).event().is_some());
        assert!(s.on_tap(1).event().is_some());
    }

    #[test]
    fn test_zero_streak_marks_sensor_suspect() {
        let mut s = MotionSampler::default();
        for i in 0..ZERO_STREAK_SUSPECT {
            assert!(!s.sensor_suspect());
            s.classify(AccelerationSample::ZERO, i as u64);
        }
        assert!(s.sensor_suspect());
        s.classify(sample(0.0, 0.0, 9.8), 100);
        assert!(!s.sensor_suspect());
    }

    #[test]
    fn test_reset_clears_reference_and_clock() {
        let mut s = MotionSampler::default();
        s.on_sample(sample(20.0, 0.0, 0.0), 1000);
        s.reset();
        assert_eq!(s.state().last_sample, AccelerationSample::ZERO);
        assert_eq!(s.state().last_event_ms, None);
        assert!(s.on_sample(sample(20.0, 0.0, 0.0), 1001).is_some());
    }
}
