//! Session driver: permission gate, input subscription, event loop, teardown.
//!
//! Everything that touches the session runs on this one loop, so inputs,
//! decay fires and resets are applied strictly one at a time.

use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use rand::Rng;
use shakecat_core::{
    Haptics, INTENSITY_DECAY_MS, InputMode, MotionCapability, PermissionOutcome, ProgressUpdate,
    PromptAnswer, SessionSnapshot, SessionUpdate, ShakeSession,
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::decay::DecayTimer;
use crate::report::Reporter;
use crate::sensor::{Input, InputSource, Subscription};

const INPUT_BUFFER: usize = 64;

/// Resolve the permission gate for the capability the source reports. The
/// prompt future only runs for gated platforms.
pub async fn request_permission<F>(source: &dyn InputSource, prompt: F) -> PermissionOutcome
where
    F: Future<Output = Result<PromptAnswer, String>>,
{
    let capability = source.capability();
    let answer = match capability {
        MotionCapability::Gated => Some(prompt.await),
        MotionCapability::Ungated | MotionCapability::Unsupported => None,
    };
    PermissionOutcome::resolve(capability, || {
        answer.unwrap_or(Ok(PromptAnswer::Granted))
    })
}

pub struct Driver<R> {
    session: ShakeSession,
    rng: R,
    haptics: Box<dyn Haptics + Send>,
    reporter: Reporter,
    shutdown: CancellationToken,
    warned_suspect: bool,
}

impl<R: Rng + Send> Driver<R> {
    pub fn new(
        session: ShakeSession,
        rng: R,
        haptics: Box<dyn Haptics + Send>,
        reporter: Reporter,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            session,
            rng,
            haptics,
            reporter,
            shutdown,
            warned_suspect: false,
        }
    }

    pub fn session(&self) -> &ShakeSession {
        &self.session
    }

    pub fn reporter(&mut self) -> &mut Reporter {
        &mut self.reporter
    }

    /// Apply a resolved permission and report the resulting mode.
    pub fn start(&mut self, outcome: PermissionOutcome) -> Result<InputMode> {
        let mode = self.session.apply_permission(outcome);
        tracing::info!(
            session = %self.session.id(),
            debounce_taps = self.session.sampler().debounces_taps(),
            "permission {outcome:?} -> {mode:?} input"
        );
        self.reporter.mode(mode)?;
        Ok(mode)
    }

    /// Run until the source ends or shutdown is requested. The source is only
    /// subscribed if it matches the session's input mode.
    pub async fn run(&mut self, source: Box<dyn InputSource>) -> Result<SessionSnapshot> {
        let span = tracing::info_span!("session", id = %self.session.id());
        self.run_inner(source).instrument(span).await
    }

    async fn run_inner(&mut self, source: Box<dyn InputSource>) -> Result<SessionSnapshot> {
        let mode = self.session.mode();
        let subscribed = mode != InputMode::Pending && source.mode() == mode;

        let (tx, mut rx) = mpsc::channel(INPUT_BUFFER);
        let subscription = if subscribed {
            Some(source.subscribe(tx))
        } else {
            tracing::info!("input source not subscribed in {mode:?} mode");
            drop(tx);
            None
        };

        let (mut decay, mut fired) = DecayTimer::new(Duration::from_millis(INTENSITY_DECAY_MS));
        let result = self.event_loop(&mut rx, &mut decay, &mut fired).await;

        self.teardown(subscription, &mut decay).await;
        result?;

        let snapshot = self.session.snapshot();
        self.reporter.summary(&snapshot)?;
        self.reporter.flush()?;
        Ok(snapshot)
    }

    async fn event_loop(
        &mut self,
        rx: &mut mpsc::Receiver<Input>,
        decay: &mut DecayTimer,
        fired: &mut mpsc::UnboundedReceiver<u64>,
    ) -> Result<()> {
        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    tracing::info!("shutdown requested");
                    return Ok(());
                }
                input = rx.recv() => match input {
                    Some(input) => self.handle(input, decay)?,
                    None => return Ok(()),
                },
                Some(generation) = fired.recv() => {
                    if decay.take_fired(generation) && self.session.clear_display_intensity() {
                        tracing::trace!("display intensity decayed");
                    }
                }
            }
        }
    }

    fn handle(&mut self, input: Input, decay: &mut DecayTimer) -> Result<()> {
        let update = match input {
            Input::Sample(reading) => self.session.on_sample(
                reading.sample,
                reading.at_ms,
                &mut self.rng,
                self.haptics.as_mut(),
            ),
            Input::Tap { at_ms } => {
                self.session
                    .on_tap(at_ms, &mut self.rng, self.haptics.as_mut())
            }
            Input::Reset => {
                self.session.reset_round();
                decay.cancel();
                tracing::info!("round reset");
                return self.reporter.reset();
            }
        };

        match &update {
            SessionUpdate::Ignored(reason) => tracing::trace!("input ignored: {reason:?}"),
            SessionUpdate::Dropped(rejection) => tracing::trace!("sample dropped: {rejection:?}"),
            SessionUpdate::Shake { event, update } => {
                decay.arm();
                let progress = self.session.progress();
                tracing::debug!(
                    intensity = event.intensity,
                    progress,
                    "shake from {:?}",
                    event.source
                );
                if !matches!(update, ProgressUpdate::Saturated) {
                    let wobble = self.session.wobble(&mut self.rng);
                    self.reporter.shake(event, progress, wobble)?;
                }
                if let ProgressUpdate::Revealed { message } = update {
                    tracing::info!("revealed: {message}");
                    self.reporter.reveal(message)?;
                }
            }
        }

        if !self.warned_suspect && self.session.sensor_suspect() {
            self.warned_suspect = true;
            tracing::warn!("sensor keeps reporting all-zero acceleration; it may be unsupported");
        }
        Ok(())
    }

    async fn teardown(&mut self, subscription: Option<Subscription>, decay: &mut DecayTimer) {
        if let Some(subscription) = subscription {
            subscription.unsubscribe().await;
        }
        if decay.is_pending() {
            tracing::debug!("cancelling pending intensity decay");
        }
        decay.cancel();
        tracing::info!(
            progress = self.session.progress(),
            events = self.session.accepted_events(),
            "session ended"
        );
    }
}
