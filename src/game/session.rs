//! Real-time driver for an engine
//!
//! A `Session` owns one engine and runs it on tokio: commands arrive over a
//! channel, and the engine's virtual clock is kept in step with wall-clock
//! time by sleeping until the next pending timer. When the session ends for
//! any reason the engine is torn down, so no feedback timer can fire against
//! a finished or reset game.

use crate::core::{CardId, PairId};
use crate::game::{EngineView, FlowOutcome, MatchPairEngine, ScreenState};
use crate::history::EngineEvent;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, BufReader, Read};
use std::thread;
use tokio::sync::mpsc;
use tokio::time::Instant;

/// Commands a presentation layer sends to a running session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Select(CardId),
    Advance,
    Back,
    /// Stop the session (screen unmounted)
    Close,
}

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEnd {
    /// Continued past the final screen
    Finished,
    /// Went back from the welcome screen
    Exited,
    /// Closed by the caller or all handles dropped
    Closed,
}

/// Summary returned when a session stops
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionReport {
    pub end: SessionEnd,
    pub screen: ScreenState,
    pub solved: Vec<PairId>,
    pub total_pairs: usize,
    pub selections: usize,
    pub matches: usize,
    pub mismatches: usize,
}

/// Sending side of a session
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    /// Send a command; false if the session has already stopped
    pub async fn send(&self, command: SessionCommand) -> bool {
        self.tx.send(command).await.is_ok()
    }

    pub async fn select(&self, card_id: impl Into<CardId>) -> bool {
        self.send(SessionCommand::Select(card_id.into())).await
    }

    pub async fn advance(&self) -> bool {
        self.send(SessionCommand::Advance).await
    }

    pub async fn back(&self) -> bool {
        self.send(SessionCommand::Back).await
    }

    pub async fn close(&self) -> bool {
        self.send(SessionCommand::Close).await
    }
}

/// Read lines from a blocking source on its own thread
///
/// Lines arrive on the returned receiver, which closes at end of input or
/// on a read error. The thread is detached: a read still blocked when the
/// session ends never holds up runtime shutdown, unlike a read started on
/// tokio's blocking pool.
pub fn spawn_line_reader<R>(reader: R) -> mpsc::Receiver<String>
where
    R: Read + Send + 'static,
{
    let (tx, rx) = mpsc::channel(32);
    thread::spawn(move || {
        for line in BufReader::new(reader).lines() {
            let Ok(line) = line else { break };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}

type ChangeHook = Box<dyn FnMut(&EngineView) + Send>;

/// Engine plus its command channel
pub struct Session {
    engine: MatchPairEngine,
    commands: mpsc::Receiver<SessionCommand>,
    on_change: Option<ChangeHook>,
}

impl Session {
    pub fn new(engine: MatchPairEngine) -> (Session, SessionHandle) {
        let (tx, rx) = mpsc::channel(32);
        let session = Session {
            engine,
            commands: rx,
            on_change: None,
        };
        (session, SessionHandle { tx })
    }

    /// Call `hook` after every command and every fired timer
    pub fn on_change(mut self, hook: impl FnMut(&EngineView) + Send + 'static) -> Self {
        self.on_change = Some(Box::new(hook));
        self
    }

    pub fn engine(&self) -> &MatchPairEngine {
        &self.engine
    }

    /// Run until the flow finishes, exits or the session is closed
    ///
    /// Returns the report together with the torn-down engine for inspection.
    pub async fn run(mut self) -> (SessionReport, MatchPairEngine) {
        let mut last_tick = Instant::now();
        self.notify();

        let end = loop {
            let deadline = self.engine.next_deadline();
            let timer = async move {
                match deadline {
                    Some(wait) => tokio::time::sleep(wait).await,
                    None => std::future::pending::<()>().await,
                }
            };

            tokio::select! {
                command = self.commands.recv() => {
                    self.catch_up(&mut last_tick);
                    let ended = match command {
                        None | Some(SessionCommand::Close) => Some(SessionEnd::Closed),
                        Some(SessionCommand::Select(card_id)) => {
                            self.engine.select_card(&card_id);
                            None
                        }
                        Some(SessionCommand::Advance) => match self.engine.advance() {
                            FlowOutcome::Finished => Some(SessionEnd::Finished),
                            _ => None,
                        },
                        Some(SessionCommand::Back) => match self.engine.go_back() {
                            FlowOutcome::Exit => Some(SessionEnd::Exited),
                            _ => None,
                        },
                    };
                    if let Some(end) = ended {
                        break end;
                    }
                    self.notify();
                }
                _ = timer => {
                    if self.catch_up(&mut last_tick) > 0 {
                        self.notify();
                    }
                }
            }
        };

        self.engine.teardown();
        let report = self.report(end);
        (report, self.engine)
    }

    /// Advance the engine clock by the wall-clock time since the last tick
    fn catch_up(&mut self, last_tick: &mut Instant) -> usize {
        let now = Instant::now();
        let fired = self.engine.advance_time(now.duration_since(*last_tick));
        *last_tick = now;
        fired
    }

    fn notify(&mut self) {
        if let Some(hook) = self.on_change.as_mut() {
            hook(&self.engine.view());
        }
    }

    fn report(&self, end: SessionEnd) -> SessionReport {
        let events = &self.engine.events;
        SessionReport {
            end,
            screen: self.engine.screen(),
            solved: self.engine.solved_ids(),
            total_pairs: self.engine.total_pairs(),
            selections: events.count(|e| matches!(e, EngineEvent::CardSelected { .. })),
            matches: events.count(|e| matches!(e, EngineEvent::PairMatched { .. })),
            mismatches: events.count(|e| matches!(e, EngineEvent::Mismatched { .. })),
        }
    }
}
