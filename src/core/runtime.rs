//! Single-task event loop
//!
//! One `tokio::select!` multiplexes three things: the next sensor message,
//! the debounce deadline and the single in-flight oracle request. There are
//! no spawned workers and no locks; a newer request simply drops the older
//! future.

use std::future::{pending, Future};
use std::pin::Pin;

use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};

use crate::core::config::CompassConfig;
use crate::core::display::Frame;
use crate::core::orientation::PermissionState;
use crate::core::session::Session;
use crate::vastu::{consult_or_fallback, Consultation, VastuOracle};

type Request<'a> = Pin<Box<dyn Future<Output = Consultation> + Send + 'a>>;

/// Drive a session until `source` closes and all pending work has settled.
///
/// `sink` receives a frame whenever the visible state changes. Returns the
/// final session.
pub async fn run<O, F>(
    mut source: mpsc::Receiver<crate::core::orientation::SensorMessage>,
    oracle: &O,
    config: &CompassConfig,
    initial: PermissionState,
    mut sink: F,
) -> Session
where
    O: VastuOracle,
    F: FnMut(&Frame),
{
    let mut session = Session::new(config).with_permission(initial);
    let mut inflight: Option<(u64, Request<'_>)> = None;
    let mut source_open = true;

    sink(&session.frame());

    loop {
        if !source_open && !session.has_pending() && inflight.is_none() {
            break;
        }
        let deadline = session.deadline();

        tokio::select! {
            message = source.recv(), if source_open => match message {
                Some(message) => {
                    if session.on_message(message, Instant::now().into_std()) {
                        sink(&session.frame());
                    }
                    if inflight.as_ref().is_some_and(|(seq, _)| !session.awaits(*seq)) {
                        inflight = None;
                    }
                }
                None => {
                    log::debug!("sensor source closed");
                    source_open = false;
                }
            },
            _ = wait_until(deadline), if deadline.is_some() => {
                if let Some(next) = session.due(Instant::now().into_std()) {
                    if let Some((stale, _)) = inflight.take() {
                        log::debug!("cancelling request #{}", stale);
                    }
                    let request: Request<'_> =
                        Box::pin(consult_or_fallback(oracle, next.request, &config.fallback_message));
                    inflight = Some((next.seq, request));
                    sink(&session.frame());
                }
            }
            (seq, outcome) = async {
                match inflight.as_mut() {
                    Some((seq, request)) => (*seq, request.await),
                    None => pending().await,
                }
            }, if inflight.is_some() => {
                inflight = None;
                if session.finish_fetch(seq, outcome) {
                    sink(&session.frame());
                }
            }
        }
    }

    session
}

async fn wait_until(deadline: Option<std::time::Instant>) {
    match deadline {
        Some(deadline) => sleep_until(Instant::from_std(deadline)).await,
        None => pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::{CompassError, Result};
    use crate::core::orientation::{OrientationEvent, SensorMessage};
    use crate::core::session::InsightState;
    use crate::vastu::{StaticOracle, VastuInsight, VastuRequest};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Records every request and answers after a fixed delay
    struct SlowOracle {
        delay: Duration,
        seen: Mutex<Vec<f64>>,
    }

    impl SlowOracle {
        fn new(delay_ms: u64) -> Self {
            Self {
                delay: Duration::from_millis(delay_ms),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn seen(&self) -> Vec<f64> {
            self.seen.lock().unwrap().clone()
        }
    }

    impl VastuOracle for SlowOracle {
        fn consult(&self, request: VastuRequest) -> impl Future<Output = Result<VastuInsight>> + Send {
            self.seen.lock().unwrap().push(request.direction);
            let delay = self.delay;
            async move {
                tokio::time::sleep(delay).await;
                Ok(VastuInsight::new(format!("reading for {}", request.direction)))
            }
        }
    }

    struct BrokenOracle;

    impl VastuOracle for BrokenOracle {
        fn consult(&self, _request: VastuRequest) -> impl Future<Output = Result<VastuInsight>> + Send {
            async { Err(CompassError::Api { status: 503, body: "unavailable".to_string() }) }
        }
    }

    fn compass(degrees: f64) -> SensorMessage {
        OrientationEvent::from_compass(degrees).into()
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_settles_into_one_request() {
        let (tx, rx) = mpsc::channel(16);
        let oracle = SlowOracle::new(10);
        let config = CompassConfig::default();

        let feeder = tokio::spawn(async move {
            for degrees in [10.0, 20.0, 30.0] {
                tx.send(compass(degrees)).await.unwrap();
                tokio::time::sleep(Duration::from_millis(200)).await;
            }
        });

        let session = run(rx, &oracle, &config, PermissionState::Granted, |_| {}).await;
        feeder.await.unwrap();

        assert_eq!(oracle.seen(), vec![30.0]);
        assert_eq!(session.insight().text(), Some("reading for 30"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_shows_fallback() {
        let (tx, rx) = mpsc::channel(4);
        tx.send(compass(180.0)).await.unwrap();
        drop(tx);

        let config = CompassConfig::default();
        let session = run(rx, &BrokenOracle, &config, PermissionState::Granted, |_| {}).await;

        assert!(matches!(session.insight(), InsightState::Failed { .. }));
        assert_eq!(session.insight().text(), Some(config.fallback_message.as_str()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_request_cancels_in_flight() {
        let (tx, rx) = mpsc::channel(4);
        let oracle = SlowOracle::new(5_000);
        let config = CompassConfig::default();

        let feeder = tokio::spawn(async move {
            tx.send(compass(90.0)).await.unwrap();
            // first request is in flight after 1s; change heading mid-flight
            tokio::time::sleep(Duration::from_millis(2_000)).await;
            tx.send(compass(100.0)).await.unwrap();
        });

        let session = run(rx, &oracle, &config, PermissionState::Granted, |_| {}).await;
        feeder.await.unwrap();

        assert_eq!(oracle.seen(), vec![90.0, 100.0]);
        assert_eq!(session.insight().text(), Some("reading for 100"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_requests_without_permission() {
        let (tx, rx) = mpsc::channel(4);
        tx.send(compass(45.0)).await.unwrap();
        drop(tx);

        let oracle = SlowOracle::new(1);
        let config = CompassConfig::default();
        let session = run(rx, &oracle, &config, PermissionState::Denied, |_| {}).await;

        assert!(oracle.seen().is_empty());
        assert_eq!(session.insight(), &InsightState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_regrant_fetches_again_for_same_heading() {
        let (tx, rx) = mpsc::channel(8);
        let oracle = SlowOracle::new(10);
        let config = CompassConfig::default();

        let feeder = tokio::spawn(async move {
            tx.send(compass(90.0)).await.unwrap();
            tokio::time::sleep(Duration::from_millis(1_500)).await;
            for permission in [PermissionState::Denied, PermissionState::Granted] {
                tx.send(SensorMessage::Permission { permission }).await.unwrap();
            }
            tx.send(compass(90.0)).await.unwrap();
        });

        let session = run(rx, &oracle, &config, PermissionState::Granted, |_| {}).await;
        feeder.await.unwrap();

        assert_eq!(oracle.seen(), vec![90.0, 90.0]);
        assert_eq!(session.insight().text(), Some("reading for 90"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_frames_emitted_for_each_stage() {
        let (tx, rx) = mpsc::channel(4);
        tx.send(compass(0.0)).await.unwrap();
        drop(tx);

        let config = CompassConfig::default();
        let mut frames = Vec::new();
        run(rx, &StaticOracle, &config, PermissionState::Granted, |frame| {
            frames.push(frame.clone())
        })
        .await;

        let statuses: Vec<_> = frames
            .iter()
            .map(|f| match f.insight {
                InsightState::Idle => "idle",
                InsightState::Loading { .. } => "loading",
                InsightState::Ready { .. } => "ready",
                InsightState::Failed { .. } => "failed",
            })
            .collect();
        assert_eq!(statuses, vec!["idle", "idle", "loading", "ready"]);
        assert_eq!(frames[1].bearing, "0°");
        assert!(frames[3].insight_line().contains("North"));
    }
}
