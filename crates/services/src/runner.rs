//! Async event loop that drives one `ExamSession`.
//!
//! The runner is the single owner of the session. Host input arrives on a
//! bounded command queue, time arrives from a `Ticker`, and both are processed
//! one at a time on the same task. Every change is published as a `Session`
//! snapshot on a watch channel.

use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::debug;

use exam_core::model::QuestionId;

use crate::error::{RunnerConfigError, SessionError};
use crate::sessions::{ExamSession, Session, SessionCommand};
use crate::ticker::{IntervalTicker, Ticker};

//
// ─── CONFIG ────────────────────────────────────────────────────────────────────
//

/// Runtime knobs for an `ExamRunner`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    tick_period: Duration,
    command_buffer: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            tick_period: Duration::from_secs(1),
            command_buffer: 32,
        }
    }
}

impl RunnerConfig {
    /// # Errors
    ///
    /// Returns `RunnerConfigError` if either value is zero.
    pub fn new(tick_period: Duration, command_buffer: usize) -> Result<Self, RunnerConfigError> {
        if tick_period.is_zero() {
            return Err(RunnerConfigError::ZeroTickPeriod);
        }
        if command_buffer == 0 {
            return Err(RunnerConfigError::ZeroCommandBuffer);
        }
        Ok(Self {
            tick_period,
            command_buffer,
        })
    }

    #[must_use]
    pub fn tick_period(&self) -> Duration {
        self.tick_period
    }

    #[must_use]
    pub fn command_buffer(&self) -> usize {
        self.command_buffer
    }
}

//
// ─── HANDLE ────────────────────────────────────────────────────────────────────
//

/// Host side of a running session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<SessionCommand>,
    updates: watch::Receiver<Session>,
}

impl SessionHandle {
    /// Queue a command for the session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Finished` once the runner has stopped.
    pub async fn send(&self, command: SessionCommand) -> Result<(), SessionError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| SessionError::Finished)
    }

    /// # Errors
    ///
    /// Returns `SessionError::Finished` once the runner has stopped.
    pub async fn select_answer(
        &self,
        question_id: QuestionId,
        option_index: usize,
    ) -> Result<(), SessionError> {
        self.send(SessionCommand::SelectAnswer {
            question_id,
            option_index,
        })
        .await
    }

    /// Answer whichever question is current once earlier commands have run.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Finished` once the runner has stopped.
    pub async fn select_current(&self, option_index: usize) -> Result<(), SessionError> {
        self.send(SessionCommand::SelectCurrent { option_index }).await
    }

    /// # Errors
    ///
    /// Returns `SessionError::Finished` once the runner has stopped.
    pub async fn go_to(&self, index: usize) -> Result<(), SessionError> {
        self.send(SessionCommand::GoTo(index)).await
    }

    /// # Errors
    ///
    /// Returns `SessionError::Finished` once the runner has stopped.
    pub async fn next(&self) -> Result<(), SessionError> {
        self.send(SessionCommand::Next).await
    }

    /// # Errors
    ///
    /// Returns `SessionError::Finished` once the runner has stopped.
    pub async fn previous(&self) -> Result<(), SessionError> {
        self.send(SessionCommand::Previous).await
    }

    /// # Errors
    ///
    /// Returns `SessionError::Finished` once the runner has stopped.
    pub async fn submit(&self) -> Result<(), SessionError> {
        self.send(SessionCommand::Submit).await
    }

    /// Latest published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.updates.borrow().clone()
    }

    /// A fresh receiver for snapshot updates.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.updates.clone()
    }

    /// Wait until the session reaches `Completed` or `NotFound`.
    ///
    /// Returns the last snapshot if the runner goes away first.
    pub async fn wait_finished(&self) -> Session {
        let mut updates = self.updates.clone();
        if let Ok(session) = updates.wait_for(|s| s.status.is_terminal()).await {
            return session.clone();
        }
        updates.borrow().clone()
    }
}

//
// ─── RUNNER ────────────────────────────────────────────────────────────────────
//

enum Event {
    Command(Option<SessionCommand>),
    Tick,
}

/// Owns an `ExamSession` and feeds it commands and ticks until it ends.
pub struct ExamRunner<T: Ticker> {
    session: ExamSession,
    ticker: T,
    commands: mpsc::Receiver<SessionCommand>,
    updates: watch::Sender<Session>,
}

impl ExamRunner<IntervalTicker> {
    /// Runner on a tokio interval with the configured period.
    ///
    /// Must be called inside a tokio runtime.
    #[must_use]
    pub fn with_interval(session: ExamSession, config: &RunnerConfig) -> (Self, SessionHandle) {
        Self::new(session, IntervalTicker::new(config.tick_period()), config)
    }
}

impl<T: Ticker> ExamRunner<T> {
    #[must_use]
    pub fn new(session: ExamSession, ticker: T, config: &RunnerConfig) -> (Self, SessionHandle) {
        let (command_tx, command_rx) = mpsc::channel(config.command_buffer().max(1));
        let (update_tx, update_rx) = watch::channel(session.snapshot());
        let runner = Self {
            session,
            ticker,
            commands: command_rx,
            updates: update_tx,
        };
        let handle = SessionHandle {
            commands: command_tx,
            updates: update_rx,
        };
        (runner, handle)
    }

    /// Process events until the session leaves `InProgress`.
    ///
    /// If every handle is dropped the countdown keeps running, so an abandoned
    /// attempt still submits on expiry.
    pub async fn run(mut self) -> ExamSession {
        let mut commands_open = true;

        while self.session.is_in_progress() {
            let event = tokio::select! {
                biased;
                command = self.commands.recv(), if commands_open => Event::Command(command),
                () = self.ticker.tick() => Event::Tick,
            };

            let changed = match event {
                Event::Command(Some(command)) => self.session.apply(command),
                Event::Command(None) => {
                    debug!(exam_id = %self.session.exam_id(), "all session handles dropped");
                    commands_open = false;
                    false
                }
                Event::Tick => self.session.on_tick().is_some(),
            };

            if changed {
                self.publish();
            }
        }

        self.publish();
        debug!(exam_id = %self.session.exam_id(), status = ?self.session.status(), "runner finished");
        self.session
    }

    fn publish(&self) {
        let snapshot = self.session.snapshot();
        self.updates.send_if_modified(|current| {
            if *current == snapshot {
                return false;
            }
            *current = snapshot;
            true
        });
    }
}

/// Spawn a session on a tokio interval ticker.
///
/// The join handle yields the finished session, including its result.
#[must_use]
pub fn spawn_session(
    session: ExamSession,
    config: &RunnerConfig,
) -> (SessionHandle, JoinHandle<ExamSession>) {
    let (runner, handle) = ExamRunner::with_interval(session, config);
    (handle, tokio::spawn(runner.run()))
}
