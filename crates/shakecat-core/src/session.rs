use rand::Rng;
use uuid::Uuid;

use crate::catalog::PredictionCatalog;
use crate::haptics::{HapticPattern, Haptics};
use crate::permission::{InputMode, PermissionOutcome};
use crate::progress::{ProgressController, ProgressUpdate, RoundPhase};
use crate::sample::AccelerationSample;
use crate::sampler::{MotionSampler, Rejection, SampleOutcome, ShakeEvent};
use crate::share::{ShareOutcome, ShareTarget, ShareTemplate, share_with_fallback};
use crate::wobble::Wobble;

#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub catalog: PredictionCatalog,
    pub share: ShareTemplate,
    /// Apply the motion debounce window to fallback taps.
    pub debounce_taps: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            catalog: PredictionCatalog::default(),
            share: ShareTemplate::default(),
            debounce_taps: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Sensor sample while not in sensor mode, or tap while not in fallback.
    WrongMode,
    /// Tap while a message is already revealed.
    AlreadyRevealed,
}

/// Result of feeding one input into the session.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionUpdate {
    Ignored(IgnoreReason),
    Dropped(Rejection),
    Shake {
        event: ShakeEvent,
        update: ProgressUpdate,
    },
}

impl SessionUpdate {
    pub fn event(&self) -> Option<&ShakeEvent> {
        match self {
            SessionUpdate::Shake { event, .. } => Some(event),
            _ => None,
        }
    }

    pub fn revealed(&self) -> Option<&str> {
        match self {
            SessionUpdate::Shake {
                update: ProgressUpdate::Revealed { message },
                ..
            } => Some(message),
            _ => None,
        }
    }
}

/// One user session: sampler, controller and input mode behind a single
/// `&mut` owner. All inputs are processed synchronously, one at a time.
#[derive(Clone, Debug)]
pub struct ShakeSession {
    id: Uuid,
    mode: InputMode,
    sampler: MotionSampler,
    controller: ProgressController,
    catalog: PredictionCatalog,
    share: ShareTemplate,
    display_intensity: f64,
    accepted_events: u64,
    dropped_samples: u64,
    rounds_revealed: u64,
}

impl ShakeSession {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            mode: InputMode::Pending,
            sampler: MotionSampler::new(config.debounce_taps),
            controller: ProgressController::new(),
            catalog: config.catalog,
            share: config.share,
            display_intensity: 0.0,
            accepted_events: 0,
            dropped_samples: 0,
            rounds_revealed: 0,
        }
    }

    // --- Queries ---

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn progress(&self) -> u8 {
        self.controller.progress()
    }

    pub fn message(&self) -> Option<&str> {
        self.controller.message()
    }

    pub fn phase(&self) -> RoundPhase {
        self.controller.phase()
    }

    pub fn catalog(&self) -> &PredictionCatalog {
        &self.catalog
    }

    pub fn sampler(&self) -> &MotionSampler {
        &self.sampler
    }

    pub fn display_intensity(&self) -> f64 {
        self.display_intensity
    }

    pub fn accepted_events(&self) -> u64 {
        self.accepted_events
    }

    pub fn dropped_samples(&self) -> u64 {
        self.dropped_samples
    }

    pub fn rounds_revealed(&self) -> u64 {
        self.rounds_revealed
    }

    pub fn sensor_suspect(&self) -> bool {
        self.sampler.sensor_suspect()
    }

    // --- Mode ---

    /// Apply the permission gate result. Fallback is sticky for the session.
    pub fn apply_permission(&mut self, outcome: PermissionOutcome) -> InputMode {
        if self.mode != InputMode::Fallback {
            self.mode = outcome.input_mode();
        }
        self.mode
    }

    /// Subscription failed after permission was granted.
    pub fn force_fallback(&mut self) {
        self.mode = InputMode::Fallback;
    }

    // --- Inputs ---

    pub fn on_sample(
        &mut self,
        sample: AccelerationSample,
        now_ms: u64,
        rng: &mut impl Rng,
        haptics: &mut dyn Haptics,
    ) -> SessionUpdate {
        if self.mode != InputMode::Sensor {
            return SessionUpdate::Ignored(IgnoreReason::WrongMode);
        }
        let outcome = self.sampler.classify(sample, now_ms);
        self.accept(outcome, rng, haptics)
    }

    pub fn on_tap(
        &mut self,
        now_ms: u64,
        rng: &mut impl Rng,
        haptics: &mut dyn Haptics,
    ) -> SessionUpdate {
        if self.mode != InputMode::Fallback {
            return SessionUpdate::Ignored(IgnoreReason::WrongMode);
        }
        if self.controller.is_revealed() {
            return SessionUpdate::Ignored(IgnoreReason::AlreadyRevealed);
        }
        let outcome = self.sampler.on_tap(now_ms);
        self.accept(outcome, rng, haptics)
    }

    fn accept(
        &mut self,
        outcome: SampleOutcome,
        rng: &mut impl Rng,
        haptics: &mut dyn Haptics,
    ) -> SessionUpdate {
        let event = match outcome {
            SampleOutcome::Shake(event) => event,
            SampleOutcome::Rejected(rejection) => {
                self.dropped_samples += 1;
                return SessionUpdate::Dropped(rejection);
            }
        };

        self.accepted_events += 1;
        self.display_intensity = event.intensity;
        haptics.vibrate(&HapticPattern::for_shake(event.source));

        let update = self.controller.on_shake_event(&event, &self.catalog, rng);
        if matches!(update, ProgressUpdate::Revealed { .. }) {
            self.rounds_revealed += 1;
            haptics.vibrate(&HapticPattern::reveal());
        }
        SessionUpdate::Shake { event, update }
    }

    /// Decay timer fired. Returns whether there was anything to clear.
    pub fn clear_display_intensity(&mut self) -> bool {
        let had = self.display_intensity > 0.0;
        self.display_intensity = 0.0;
        had
    }

    /// New round: progress, message, sampler memory and display intensity
    /// are cleared together.
    pub fn reset_round(&mut self) {
        self.controller.reset_round();
        self.sampler.reset();
        self.display_intensity = 0.0;
    }

    pub fn wobble(&self, rng: &mut impl Rng) -> Wobble {
        Wobble::sample(self.display_intensity, rng)
    }

    /// Offer the revealed message. Never changes session state.
    pub fn share(
        &self,
        native: &mut dyn ShareTarget,
        clipboard: &mut dyn ShareTarget,
    ) -> ShareOutcome {
        let Some(message) = self.controller.message() else {
            return ShareOutcome::NothingRevealed;
        };
        let request = self.share.render(message);
        share_with_fallback(native, clipboard, &request)
    }

    /// Share text for the current reveal, if any.
    pub fn share_text(&self) -> Option<String> {
        self.controller
            .message()
            .map(|m| self.share.render(m).text)
    }
}
