use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};

/// Cadence source for a session countdown.
///
/// Each completed `tick` stands for one elapsed second of exam time.
/// Implementations must be cancel safe: the runner drops a pending `tick`
/// whenever a host command arrives first.
#[async_trait]
pub trait Ticker: Send {
    async fn tick(&mut self);
}

/// Ticker backed by a tokio interval.
///
/// The first tick lands one period after construction. Late ticks are
/// delivered in a burst so the countdown does not drift behind wall time.
#[derive(Debug)]
pub struct IntervalTicker {
    interval: Interval,
}

impl IntervalTicker {
    /// # Panics
    ///
    /// Panics if `period` is zero.
    #[must_use]
    pub fn new(period: Duration) -> Self {
        let mut interval = time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Burst);
        Self { interval }
    }

    /// One tick per second.
    #[must_use]
    pub fn every_second() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

#[async_trait]
impl Ticker for IntervalTicker {
    async fn tick(&mut self) {
        self.interval.tick().await;
    }
}

/// Ticker that only advances when told to.
///
/// Each `ManualTickerHandle::advance` queues ticks that the runner consumes in
/// order. Once every handle is gone the ticker never fires again, so a session
/// driven by it waits for commands only.
#[derive(Debug)]
pub struct ManualTicker {
    ticks: mpsc::UnboundedReceiver<()>,
}

/// Feeds ticks to a `ManualTicker`.
#[derive(Debug, Clone)]
pub struct ManualTickerHandle {
    ticks: mpsc::UnboundedSender<()>,
}

impl ManualTicker {
    #[must_use]
    pub fn new() -> (Self, ManualTickerHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { ticks: rx }, ManualTickerHandle { ticks: tx })
    }
}

impl ManualTickerHandle {
    /// Queue `seconds` ticks. Returns `false` if the ticker was dropped.
    pub fn advance(&self, seconds: u32) -> bool {
        (0..seconds).all(|_| self.ticks.send(()).is_ok())
    }
}

#[async_trait]
impl Ticker for ManualTicker {
    async fn tick(&mut self) {
        if self.ticks.recv().await.is_none() {
            std::future::pending::<()>().await;
        }
    }
}
