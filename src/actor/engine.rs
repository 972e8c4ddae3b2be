//! Engine: threaded shell around a reveal session.
//!
//! The engine spawns two threads: a ticker that paces animation, and a
//! dispatcher that owns the [`RevealSession`] and serializes every
//! mutation onto it. The host talks to the dispatcher over channels
//! only, so deltas can arrive from any thread while the session itself
//! stays single-threaded.

use super::messages::{RevealCommand, RevealEvent};
use super::ticker::{Tick, TickerActor};
use crate::reveal::RevealObserver;
use crate::stream::{RevealSession, SessionConfig};
use crossbeam_channel::{select, unbounded, Receiver, Sender};
use std::io;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Configuration for the engine shell.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Wrap width in columns.
    pub max_columns: u16,
    /// Time between animation ticks.
    pub tick_interval: Duration,
    /// Session configuration (driver timings, tokenizer).
    pub session: SessionConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_columns: 80,
            tick_interval: Duration::from_millis(16),
            session: SessionConfig::default(),
        }
    }
}

/// Handle to the engine threads.
///
/// Dropping the handle signals shutdown and joins both threads.
pub struct RevealEngine {
    /// Command sender into the dispatcher.
    command_tx: Sender<RevealCommand>,
    /// Event receiver from the dispatcher.
    event_rx: Receiver<RevealEvent>,
    /// Dispatcher thread handle.
    dispatcher: Option<JoinHandle<()>>,
    /// Ticker actor handle.
    ticker: Option<TickerActor>,
}

impl RevealEngine {
    /// Spawn the ticker and dispatcher threads.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS fails to spawn the dispatcher thread.
    pub fn spawn(config: EngineConfig) -> io::Result<Self> {
        let (command_tx, command_rx) = unbounded::<RevealCommand>();
        let (event_tx, event_rx) = unbounded::<RevealEvent>();

        let ticker = TickerActor::spawn(config.tick_interval);
        let tick_rx = ticker.receiver().clone();

        let dispatcher = thread::Builder::new()
            .name("cascade-dispatch".to_string())
            .spawn(move || {
                dispatch_loop(&command_rx, &tick_rx, &event_tx, config);
            })?;

        Ok(Self {
            command_tx,
            event_rx,
            dispatcher: Some(dispatcher),
            ticker: Some(ticker),
        })
    }

    /// Queue a delta from the token stream.
    pub fn push_delta(&self, delta: impl Into<String>) {
        let _ = self
            .command_tx
            .send(RevealCommand::PushDelta(delta.into()));
    }

    /// Signal the end of the stream.
    pub fn finish(&self) {
        let _ = self.command_tx.send(RevealCommand::Finish);
    }

    /// Change the wrap width.
    pub fn set_width(&self, max_columns: u16) {
        let _ = self.command_tx.send(RevealCommand::SetWidth(max_columns));
    }

    /// The event receiver, for use with `select!` in host loops.
    #[inline]
    pub const fn events(&self) -> &Receiver<RevealEvent> {
        &self.event_rx
    }

    /// Shut down and join both threads.
    pub fn join(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        let _ = self.command_tx.send(RevealCommand::Shutdown);
        if let Some(handle) = self.dispatcher.take() {
            let _ = handle.join();
        }
        if let Some(ticker) = self.ticker.take() {
            ticker.join();
        }
    }
}

impl Drop for RevealEngine {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Observer that forwards completion onto the event channel.
///
/// Rectangle lifecycle is not forwarded per-callback; the host sees it
/// through per-tick `Frame` events instead.
struct EventSink {
    event_tx: Sender<RevealEvent>,
}

impl RevealObserver for EventSink {
    fn on_complete(&mut self, text_len: usize) {
        let _ = self.event_tx.send(RevealEvent::Complete(text_len));
    }
}

fn dispatch_loop(
    command_rx: &Receiver<RevealCommand>,
    tick_rx: &Receiver<Tick>,
    event_tx: &Sender<RevealEvent>,
    config: EngineConfig,
) {
    let mut session = RevealSession::new(config.max_columns, config.session);
    let mut sink = EventSink {
        event_tx: event_tx.clone(),
    };
    let mut last_elapsed = Duration::ZERO;
    let mut was_active = false;

    loop {
        select! {
            recv(command_rx) -> msg => match msg {
                Ok(RevealCommand::PushDelta(delta)) => {
                    session.push_delta(&delta, &mut sink);
                }
                Ok(RevealCommand::Finish) => session.finish(&mut sink),
                Ok(RevealCommand::SetWidth(cols)) => {
                    session.set_width(cols, &mut sink);
                }
                Ok(RevealCommand::Shutdown) | Err(_) => break,
            },
            recv(tick_rx) -> msg => match msg {
                Ok(tick) => {
                    // Dropped ticks surface as a larger elapsed delta.
                    let dt = tick.elapsed.saturating_sub(last_elapsed);
                    last_elapsed = tick.elapsed;
                    session.tick(dt, &mut sink);

                    let frame = session.snapshot();
                    let active = !frame.is_empty();
                    if active || was_active {
                        let _ = event_tx.send(RevealEvent::Frame(frame));
                    }
                    was_active = active;
                }
                Err(_) => break,
            },
        }
    }
}
