//! Monitoring session: one tick per frame, strictly sequential

use std::future::Future;
use std::time::Duration;

use alerting::{AlertEvent, AlertGate, AlertStats, AudioSink};
use camera_capture::{CameraError, FrameResult, LandmarkFrame};
use dms::{DmsAlert, DmsAnalysis, DmsModule, DriverStatus};
use face_geometry::LandmarkSource;
use tokio::sync::mpsc;
use tokio::time::{interval, Interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::display::Display;

/// Result of processing one frame
#[derive(Debug, Clone)]
pub struct TickReport {
    pub sequence: u64,
    pub analysis: DmsAnalysis,
    /// Each requested alert with what the gate did with it
    pub alerts: Vec<(DmsAlert, AlertEvent)>,
}

/// Why the loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Quit signal received
    Quit,
    /// Frame source ran out of frames
    SourceExhausted,
}

/// End-of-session totals (logged, never persisted)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub ticks: u64,
    pub neutral_ticks: u64,
    pub blinks: u32,
    pub yawns: u32,
    pub final_status: DriverStatus,
    pub alerts: AlertStats,
}

impl SessionSummary {
    pub fn log(&self) {
        info!(
            ticks = self.ticks,
            neutral_ticks = self.neutral_ticks,
            blinks = self.blinks,
            yawns = self.yawns,
            status = %self.final_status,
            alerts_played = self.alerts.played,
            alerts_suppressed = self.alerts.suppressed,
            alerts_failed = self.alerts.failed,
            "Session finished"
        );
    }
}

/// Detector, alert gate, and display for one monitored subject
pub struct MonitorSession<S: AudioSink> {
    dms: DmsModule,
    gate: AlertGate<S>,
    display: Display,
}

impl<S: AudioSink> MonitorSession<S> {
    pub fn new(dms: DmsModule, gate: AlertGate<S>) -> Self {
        Self {
            dms,
            gate,
            display: Display::default(),
        }
    }

    /// Process one frame: ratios, state machine, alerts, overlay
    pub fn tick(&mut self, frame: &LandmarkFrame) -> TickReport {
        if frame.face_count() > 1 {
            debug!(
                sequence = frame.sequence,
                faces = frame.face_count(),
                "Multiple faces, monitoring the first"
            );
        }

        let face = frame.primary_face().map(|f| f as &dyn LandmarkSource);
        let analysis = self.dms.process(face);

        let alerts = analysis
            .alerts
            .iter()
            .map(|&alert| (alert, self.gate.fire_alert(alert.as_str())))
            .collect();

        self.display.render(&analysis);

        TickReport {
            sequence: frame.sequence,
            analysis,
            alerts,
        }
    }

    pub fn dms(&self) -> &DmsModule {
        &self.dms
    }

    pub fn display(&self) -> &Display {
        &self.display
    }

    pub fn summary(&self) -> SessionSummary {
        let state = self.dms.state();
        SessionSummary {
            ticks: self.dms.ticks(),
            neutral_ticks: self.dms.neutral_ticks(),
            blinks: state.blink_count,
            yawns: state.yawn_count,
            final_status: state.status,
            alerts: self.gate.stats(),
        }
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => tokio::task::yield_now().await,
    }
}

async fn next_frame(
    ticker: &mut Option<Interval>,
    frames: &mut mpsc::Receiver<FrameResult>,
) -> Option<FrameResult> {
    next_tick(ticker).await;
    frames.recv().await
}

/// Consume frames until the channel closes, a source error arrives, or
/// `shutdown` resolves.
///
/// `shutdown` is watched while waiting for a frame, so a stalled source
/// never delays quitting. A source error ends the session and is returned
/// to the caller.
pub async fn run_loop<S, Q>(
    session: &mut MonitorSession<S>,
    frames: &mut mpsc::Receiver<FrameResult>,
    pacing: Option<Duration>,
    shutdown: Q,
) -> Result<StopReason, CameraError>
where
    S: AudioSink,
    Q: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut ticker = pacing.map(|period| {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker
    });

    loop {
        let next = tokio::select! {
            biased;
            _ = &mut shutdown => {
                info!("Quit requested");
                return Ok(StopReason::Quit);
            }
            next = next_frame(&mut ticker, frames) => next,
        };

        match next {
            Some(Ok(frame)) => {
                session.tick(&frame);
            }
            Some(Err(e)) => return Err(e),
            None => {
                info!("Frame source exhausted");
                return Ok(StopReason::SourceExhausted);
            }
        }
    }
}
