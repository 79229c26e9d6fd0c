//! Platform adapters that feed the session: a line-oriented sensor replay
//! and a scripted tap source. Both deliver through a [`Subscription`]; the
//! session loop never polls them.

use std::fmt;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use shakecat_core::{AccelerationSample, Clock, InputMode, MonotonicClock, MotionCapability};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

static SEPARATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*,\s*|\s+").unwrap());

/// One timestamped sensor reading.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reading {
    pub at_ms: u64,
    pub sample: AccelerationSample,
}

/// Input delivered to the session loop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Input {
    Sample(Reading),
    Tap { at_ms: u64 },
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineError {
    FieldCount(usize),
    Timestamp(String),
    Axis(String),
}

impl fmt::Display for LineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineError::FieldCount(n) => write!(f, "expected 4 fields (t_ms, x, y, z), got {n}"),
            LineError::Timestamp(s) => write!(f, "bad timestamp '{s}'"),
            LineError::Axis(s) => write!(f, "bad axis value '{s}'"),
        }
    }
}

impl std::error::Error for LineError {}

fn parse_axis(field: &str) -> Result<Option<f64>, LineError> {
    match field {
        "" | "-" | "null" | "NaN" => Ok(None),
        s => s
            .parse::<f64>()
            .map(Some)
            .map_err(|_| LineError::Axis(s.to_string())),
    }
}

/// Parse one replay line.
///
/// `Ok(None)` for blank lines and `#` comments. A bare `reset` starts a new
/// round. Otherwise `t_ms, x, y, z` separated by commas and/or whitespace;
/// an axis may be empty, `-` or `null` when the sensor did not report it.
pub fn parse_line(line: &str) -> Result<Option<Input>, LineError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    if line.eq_ignore_ascii_case("reset") {
        return Ok(Some(Input::Reset));
    }

    let fields: Vec<&str> = SEPARATOR.split(line).collect();
    if fields.len() != 4 {
        return Err(LineError::FieldCount(fields.len()));
    }
    let at_ms = fields[0]
        .parse::<u64>()
        .map_err(|_| LineError::Timestamp(fields[0].to_string()))?;
    let sample = AccelerationSample::from_axes(
        parse_axis(fields[1])?,
        parse_axis(fields[2])?,
        parse_axis(fields[3])?,
    );
    Ok(Some(Input::Sample(Reading { at_ms, sample })))
}

/// Live handle on a delivering source. Dropping it does not stop delivery;
/// call [`Subscription::unsubscribe`].
pub struct Subscription {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl Subscription {
    fn spawn<F>(token: CancellationToken, task: F) -> Self
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        Self {
            token,
            handle: tokio::spawn(task),
        }
    }

    /// Stop delivery and wait for the source task to exit.
    pub async fn unsubscribe(self) {
        self.token.cancel();
        if let Err(e) = self.handle.await {
            tracing::warn!("input source task ended abnormally: {e}");
        }
    }
}

/// Something that can push [`Input`] into the session loop.
pub trait InputSource: Send + 'static {
    /// What the platform reports about motion sensing.
    fn capability(&self) -> MotionCapability;
    /// Session mode this source delivers for.
    fn mode(&self) -> InputMode;
    fn subscribe(self: Box<Self>, sink: mpsc::Sender<Input>) -> Subscription;
}

/// Replays readings from a line-oriented reader.
pub struct ReplaySensor<R> {
    reader: R,
    realtime: bool,
    capability: MotionCapability,
}

impl<R> ReplaySensor<R>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    pub fn new(reader: R, capability: MotionCapability) -> Self {
        Self {
            reader,
            realtime: false,
            capability,
        }
    }

    /// Pace delivery by the readings' own timestamps.
    pub fn realtime(mut self, realtime: bool) -> Self {
        self.realtime = realtime;
        self
    }
}

impl<R> InputSource for ReplaySensor<R>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    fn capability(&self) -> MotionCapability {
        self.capability
    }

    fn mode(&self) -> InputMode {
        InputMode::Sensor
    }

    fn subscribe(self: Box<Self>, sink: mpsc::Sender<Input>) -> Subscription {
        let token = CancellationToken::new();
        let cancelled = token.clone();
        let ReplaySensor {
            reader, realtime, ..
        } = *self;

        Subscription::spawn(token, async move {
            let start = tokio::time::Instant::now();
            let mut lines = reader.lines();
            let mut line_no = 0usize;
            loop {
                let line = tokio::select! {
                    _ = cancelled.cancelled() => break,
                    line = lines.next_line() => line,
                };
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        tracing::warn!("replay read failed: {e}");
                        break;
                    }
                };
                line_no += 1;

                let input = match parse_line(&line) {
                    Ok(Some(input)) => input,
                    Ok(None) => continue,
                    Err(e) => {
                        tracing::warn!("skipping replay line {line_no}: {e}");
                        continue;
                    }
                };

                if realtime && let Input::Sample(reading) = input {
                    let due = start.checked_add(Duration::from_millis(reading.at_ms));
                    let Some(due) = due else {
                        tracing::warn!(
                            "skipping replay line {line_no}: timestamp {} out of range",
                            reading.at_ms
                        );
                        continue;
                    };
                    tokio::select! {
                        _ = cancelled.cancelled() => break,
                        _ = tokio::time::sleep_until(due) => {}
                    }
                }

                tokio::select! {
                    _ = cancelled.cancelled() => break,
                    sent = sink.send(input) => if sent.is_err() { break },
                }
            }
            tracing::debug!("replay source finished after {line_no} lines");
        })
    }
}

/// Scripted fallback taps `interval_ms` apart. Synthetic timestamps by
/// default; with `realtime` the taps are paced and stamped on a monotonic
/// clock.
pub struct TapScript {
    pub count: u32,
    pub interval_ms: u64,
    pub realtime: bool,
}

impl InputSource for TapScript {
    fn capability(&self) -> MotionCapability {
        MotionCapability::Unsupported
    }

    fn mode(&self) -> InputMode {
        InputMode::Fallback
    }

    fn subscribe(self: Box<Self>, sink: mpsc::Sender<Input>) -> Subscription {
        let token = CancellationToken::new();
        let cancelled = token.clone();
        Subscription::spawn(token, async move {
            let clock = MonotonicClock::new();
            let interval = Duration::from_millis(self.interval_ms);
            for i in 0..self.count as u64 {
                let at_ms = if self.realtime {
                    if i > 0 {
                        tokio::select! {
                            _ = cancelled.cancelled() => break,
                            _ = tokio::time::sleep(interval) => {}
                        }
                    }
                    clock.now_ms()
                } else {
                    i.saturating_mul(self.interval_ms)
                };
                tokio::select! {
                    _ = cancelled.cancelled() => break,
                    sent = sink.send(Input::Tap { at_ms }) => if sent.is_err() { break },
                }
            }
        })
    }
}
