use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;
use shakecat_core::{InputMode, SessionSnapshot, ShakeEvent, ShakeSource, ShareOutcome, Wobble};

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Record<'a> {
    Mode {
        mode: InputMode,
        prompt: &'static str,
    },
    Shake {
        at_ms: u64,
        source: ShakeSource,
        intensity: f64,
        progress: u8,
        wobble: Wobble,
    },
    Reveal {
        message: &'a str,
    },
    Reset,
    Share {
        #[serde(flatten)]
        outcome: &'a ShareOutcome,
    },
    Summary {
        #[serde(flatten)]
        snapshot: &'a SessionSnapshot,
    },
}

/// Writes session activity as text lines or JSON lines.
pub struct Reporter {
    out: Box<dyn Write + Send>,
    json: bool,
}

impl Reporter {
    pub fn new(out: Box<dyn Write + Send>, json: bool) -> Self {
        Self { out, json }
    }

    pub fn stdout(json: bool) -> Self {
        Self::new(Box::new(std::io::stdout()), json)
    }

    fn emit(&mut self, record: &Record<'_>, text: impl FnOnce() -> String) -> Result<()> {
        let line = if self.json {
            serde_json::to_string(record).context("failed to encode record")?
        } else {
            text()
        };
        writeln!(self.out, "{line}").context("failed to write output")
    }

    pub fn mode(&mut self, mode: InputMode) -> Result<()> {
        let prompt = mode.prompt();
        let label = match mode {
            InputMode::Pending => "pending",
            InputMode::Sensor => "sensor",
            InputMode::Fallback => "fallback",
        };
        self.emit(&Record::Mode { mode, prompt }, || {
            format!("mode: {label} ({prompt})")
        })
    }

    /// The wobble pose only appears in JSON output.
    pub fn shake(&mut self, event: &ShakeEvent, progress: u8, wobble: Wobble) -> Result<()> {
        let record = Record::Shake {
            at_ms: event.at_ms,
            source: event.source,
            intensity: event.intensity,
            progress,
            wobble,
        };
        self.emit(&record, || {
            format!(
                "shake t={}ms intensity={:.1} progress={}%",
                event.at_ms, event.intensity, progress
            )
        })
    }

    pub fn reveal(&mut self, message: &str) -> Result<()> {
        self.emit(&Record::Reveal { message }, || format!("reveal: {message}"))
    }

    pub fn reset(&mut self) -> Result<()> {
        self.emit(&Record::Reset, || "reset: new round".to_string())
    }

    pub fn share(&mut self, outcome: &ShareOutcome) -> Result<()> {
        self.emit(&Record::Share { outcome }, || match outcome {
            ShareOutcome::Shared => "share: shared".to_string(),
            ShareOutcome::Copied => "share: copied".to_string(),
            ShareOutcome::NothingRevealed => "share: nothing revealed".to_string(),
            ShareOutcome::Dropped { .. } => "share: dropped".to_string(),
        })
    }

    pub fn summary(&mut self, snapshot: &SessionSnapshot) -> Result<()> {
        self.emit(&Record::Summary { snapshot }, || {
            format!(
                "progress:   {}%\nevents:     {}\ndropped:    {}\nrevealed:   {}",
                snapshot.progress,
                snapshot.accepted_events,
                snapshot.dropped_samples,
                snapshot.rounds_revealed
            )
        })
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out.flush().context("failed to flush output")
    }
}
