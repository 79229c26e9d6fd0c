//! Progress Controller: accumulates shake events and triggers one reveal per round.
//!
//! ```text
//! Idle(0) -> Accumulating(1..=99) -> Revealed(100, message) -> [reset] -> Idle
//! ```
//!
//! Progress and reveal live in one struct and are only mutated through
//! `&mut self`, so a reset can never interleave with an event.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::PredictionCatalog;
use crate::constants::{PROGRESS_INCREMENT, PROGRESS_MAX};
use crate::sampler::ShakeEvent;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressState {
    pub progress: u8,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealState {
    pub message: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundPhase {
    Idle,
    Accumulating,
    Revealed,
}

/// What one shake event did to the round.
#[derive(Clone, Debug, PartialEq)]
pub enum ProgressUpdate {
    Advanced { progress: u8 },
    Revealed { message: String },
    /// Round already revealed; nothing changed.
    Saturated,
}

#[derive(Clone, Debug, Default)]
pub struct ProgressController {
    progress: ProgressState,
    reveal: RevealState,
}

impl ProgressController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn progress(&self) -> u8 {
        self.progress.progress
    }

    pub fn message(&self) -> Option<&str> {
        self.reveal.message.as_deref()
    }

    pub fn progress_state(&self) -> ProgressState {
        self.progress
    }

    pub fn reveal_state(&self) -> &RevealState {
        &self.reveal
    }

    pub fn phase(&self) -> RoundPhase {
        match (self.progress.progress, &self.reveal.message) {
            (_, Some(_)) => RoundPhase::Revealed,
            (0, None) => RoundPhase::Idle,
            _ => RoundPhase::Accumulating,
        }
    }

    pub fn is_revealed(&self) -> bool {
        self.reveal.message.is_some()
    }

    /// Advance by a fixed step. Intensity never affects the rate.
    pub fn on_shake_event(
        &mut self,
        _event: &ShakeEvent,
        catalog: &PredictionCatalog,
        rng: &mut impl Rng,
    ) -> ProgressUpdate {
        if self.reveal.message.is_some() {
            return ProgressUpdate::Saturated;
        }

        let next = self
            .progress
            .progress
            .saturating_add(PROGRESS_INCREMENT)
            .min(PROGRESS_MAX);
        self.progress.progress = next;

        if next >= PROGRESS_MAX {
            let message = catalog.pick(rng).to_string();
            self.reveal.message = Some(message.clone());
            return ProgressUpdate::Revealed { message };
        }
        ProgressUpdate::Advanced { progress: next }
    }

    /// Start a new round: progress 0, no message.
    pub fn reset_round(&mut self) {
        self.progress = ProgressState::default();
        self.reveal = RevealState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::ShakeSource;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn event() -> ShakeEvent {
        ShakeEvent {
            intensity: 60.0,
            source: ShakeSource::Motion,
            at_ms: 0,
        }
    }

    #[test]
    fn test_increments_by_step() {
        let mut rng = SmallRng::seed_from_u64(42);
        let catalog = PredictionCatalog::default();
        let mut c = ProgressController::new();
        assert_eq!(c.phase(), RoundPhase::Idle);

        let update = c.on_shake_event(&event(), &catalog, &mut rng);
        assert_eq!(update, ProgressUpdate::Advanced { progress: 8 });
        assert_eq!(c.phase(), RoundPhase::Accumulating);
    }

    #[test]
    fn test_thirteen_events_reveal() {
        let mut rng = SmallRng::seed_from_u64(42);
        let catalog = PredictionCatalog::default();
        let mut c = ProgressController::new();

        for i in 1..=12u8 {
            let update = c.on_shake_event(&event(), &catalog, &mut rng);
            assert_eq!(update, ProgressUpdate::Advanced { progress: i * 8 });
        }
        assert_eq!(c.progress(), 96);
        assert!(!c.is_revealed());

        let update = c.on_shake_event(&event(), &catalog, &mut rng);
        let message = match update {
            ProgressUpdate::Revealed { message } => message,
            other => panic!("13th event should reveal, got {other:?}"),
        };
        assert!(catalog.contains(&message));
        assert_eq!(c.progress(), 100);
        assert_eq!(c.message(), Some(message.as_str()));
        assert_eq!(c.phase(), RoundPhase::Revealed);
    }

    #[test]
    fn test_events_after_reveal_are_noops() {
        let mut rng = SmallRng::seed_from_u64(42);
        let catalog = PredictionCatalog::default();
        let mut c = ProgressController::new();
        for _ in 0..13 {
            c.on_shake_event(&event(), &catalog, &mut rng);
        }
        let message = c.message().map(str::to_string);

        for _ in 0..5 {
            assert_eq!(
                c.on_shake_event(&event(), &catalog, &mut rng),
                ProgressUpdate::Saturated
            );
        }
        assert_eq!(c.progress(), 100);
        assert_eq!(c.message().map(str::to_string), message);
    }

    #[test]
    fn test_reset_round() {
        let mut rng = SmallRng::seed_from_u64(42);
        let catalog = PredictionCatalog::default();
        let mut c = ProgressController::new();
        for _ in 0..20 {
            c.on_shake_event(&event(), &catalog, &mut rng);
        }
        c.reset_round();
        assert_eq!(c.progress(), 0);
        assert_eq!(c.message(), None);
        assert_eq!(c.phase(), RoundPhase::Idle);

        // mid-round reset too
        c.on_shake_event(&event(), &catalog, &mut rng);
        c.reset_round();
        assert_eq!(c.progress_state(), ProgressState::default());
        assert_eq!(c.reveal_state(), &RevealState::default());
    }
}
