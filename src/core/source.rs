//! Sensor sources for the command-line driver
//!
//! - `stdin`: one JSON `SensorMessage` per line
//! - `sweep`: a simulated device turning through a range of headings

use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::core::error::{CompassError, Result};
use crate::core::orientation::{OrientationEvent, SensorMessage};

/// Channel depth between a source task and the event loop
pub const SOURCE_CAPACITY: usize = 64;

/// Read sensor messages from any line-oriented reader.
///
/// Lines that do not parse are logged and skipped.
pub fn spawn_reader<R>(reader: R) -> mpsc::Receiver<SensorMessage>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::channel(SOURCE_CAPACITY);
    tokio::spawn(async move {
        let mut lines = reader.lines();
        let mut line_no = 0usize;
        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    log::warn!("sensor input error: {}", e);
                    break;
                }
            };
            line_no += 1;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match SensorMessage::parse_line(line) {
                Ok(message) => {
                    if tx.send(message).await.is_err() {
                        break;
                    }
                }
                Err(e) => log::warn!("skipping line {}: {}", line_no, e),
            }
        }
    });
    rx
}

/// Sensor messages from stdin
pub fn spawn_stdin() -> mpsc::Receiver<SensorMessage> {
    spawn_reader(BufReader::new(tokio::io::stdin()))
}

/// Upper bound on readings in one simulated sweep
pub const MAX_SWEEP_POINTS: f64 = 100_000.0;

/// A simulated turn from `start` to `end` (inclusive) in `step` increments
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sweep {
    pub start: f64,
    pub end: f64,
    pub step: f64,
}

impl Sweep {
    /// Parse `START:END:STEP`, e.g. `0:90:5` or `350:10:-2`
    pub fn parse(spec: &str) -> Result<Self> {
        let parts: Vec<&str> = spec.split(':').collect();
        if parts.len() != 3 {
            return Err(CompassError::invalid_config(format!(
                "sweep must be START:END:STEP, got '{}'",
                spec
            )));
        }
        let number = |s: &str| {
            s.trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| CompassError::invalid_config(format!("not a number: '{}'", s)))
        };
        let sweep = Self {
            start: number(parts[0])?,
            end: number(parts[1])?,
            step: number(parts[2])?,
        };
        if sweep.step == 0.0 {
            return Err(CompassError::invalid_config("sweep step must be non-zero"));
        }
        if (sweep.end - sweep.start) * sweep.step < 0.0 {
            return Err(CompassError::invalid_config(
                "sweep step points away from the end heading",
            ));
        }
        let points = ((sweep.end - sweep.start) / sweep.step).floor() + 1.0;
        if points > MAX_SWEEP_POINTS {
            return Err(CompassError::invalid_config(format!(
                "sweep '{}' would emit more than {} readings",
                spec, MAX_SWEEP_POINTS
            )));
        }
        Ok(sweep)
    }

    /// Raw headings visited by the sweep (not wrapped)
    pub fn headings(&self) -> Vec<f64> {
        let count = ((self.end - self.start) / self.step).floor() as usize;
        (0..=count).map(|i| self.start + self.step * i as f64).collect()
    }

    /// Emit one compass event per heading, `interval` apart
    pub fn spawn(self, interval: Duration) -> mpsc::Receiver<SensorMessage> {
        let (tx, rx) = mpsc::channel(SOURCE_CAPACITY);
        tokio::spawn(async move {
            for degrees in self.headings() {
                let message = SensorMessage::Orientation(OrientationEvent::from_compass(degrees));
                if tx.send(message).await.is_err() {
                    break;
                }
                tokio::time::sleep(interval).await;
            }
        });
        rx
    }
}
