//! Cancellable timer that clears the display intensity after an event.
//!
//! Each `arm` cancels the pending timer and starts a new generation. A fire
//! only counts if its generation is still current, so a late message from a
//! cancelled timer is ignored.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

pub struct DecayTimer {
    delay: Duration,
    tx: mpsc::UnboundedSender<u64>,
    pending: Option<CancellationToken>,
    generation: u64,
}

impl DecayTimer {
    /// Fired generations are delivered on the receiver.
    pub fn new(delay: Duration) -> (Self, mpsc::UnboundedReceiver<u64>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let timer = Self {
            delay,
            tx,
            pending: None,
            generation: 0,
        };
        (timer, rx)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn arm(&mut self) -> u64 {
        self.cancel();
        self.generation += 1;

        let token = CancellationToken::new();
        let cancelled = token.clone();
        let tx = self.tx.clone();
        let generation = self.generation;
        let delay = self.delay;
        tokio::spawn(async move {
            tokio::select! {
                _ = cancelled.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    let _ = tx.send(generation);
                }
            }
        });

        self.pending = Some(token);
        generation
    }

    pub fn cancel(&mut self) {
        if let Some(token) = self.pending.take() {
            token.cancel();
        }
    }

    /// Accept a fired generation. False for stale or cancelled timers.
    pub fn take_fired(&mut self, generation: u64) -> bool {
        if self.pending.is_some() && generation == self.generation {
            self.pending = None;
            true
        } else {
            false
        }
    }
}

impl Drop for DecayTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{Instant, timeout};

    const DELAY: Duration = Duration::from_millis(200);

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_delay() {
        let (mut timer, mut rx) = DecayTimer::new(DELAY);
        let start = Instant::now();
        let generation = timer.arm();

        let fired = rx.recv().await.unwrap();
        assert_eq!(fired, generation);
        assert!(start.elapsed() >= DELAY);
        assert!(timer.take_fired(fired));
        assert!(!timer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearm_supersedes_pending() {
        let (mut timer, mut rx) = DecayTimer::new(DELAY);
        let start = Instant::now();
        let first = timer.arm();
        tokio::time::sleep(Duration::from_millis(150)).await;
        let second = timer.arm();
        assert_ne!(first, second);

        let fired = rx.recv().await.unwrap();
        assert_eq!(fired, second);
        assert!(start.elapsed() >= Duration::from_millis(350));
        assert!(!timer.take_fired(first));
        assert!(timer.take_fired(second));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_fire() {
        let (mut timer, mut rx) = DecayTimer::new(DELAY);
        let generation = timer.arm();
        timer.cancel();
        assert!(timeout(Duration::from_secs(1), rx.recv()).await.is_err());
        assert!(!timer.take_fired(generation));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels() {
        let (mut timer, mut rx) = DecayTimer::new(DELAY);
        timer.arm();
        drop(timer);
        // sender dropped with the timer and the task exits without sending
        assert_eq!(rx.recv().await, None);
    }
}
