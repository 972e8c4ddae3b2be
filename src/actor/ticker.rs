//! Ticker actor: dedicated thread for animation pacing.
//!
//! Provides the regular "tick" signal the dispatcher advances
//! animations on. The channel is bounded and sends are non-blocking,
//! so a slow consumer drops ticks instead of queuing them; the missed
//! time shows up in the next tick's `elapsed`.

use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// A tick event sent at regular intervals.
#[derive(Debug, Clone, Copy)]
pub struct Tick {
    /// Frame number (monotonically increasing).
    pub frame: u64,
    /// Time elapsed since the ticker was started.
    pub elapsed: Duration,
}

/// Ticker actor that generates regular timing events.
pub struct TickerActor {
    /// Handle to the ticker thread.
    handle: Option<JoinHandle<()>>,
    /// Flag to signal shutdown.
    shutdown: Arc<AtomicBool>,
    /// Receiver for tick events.
    tick_rx: Receiver<Tick>,
}

impl TickerActor {
    /// Spawn a ticker with the given interval (e.g. 16ms for ~60 FPS).
    ///
    /// # Panics
    ///
    /// Panics if the OS fails to spawn the ticker thread.
    #[allow(clippy::missing_panics_doc)]
    pub fn spawn(interval: Duration) -> Self {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        // Small buffer: ticks must not accumulate behind a slow reader.
        let (tick_tx, tick_rx) = bounded(2);

        let handle = thread::Builder::new()
            .name("cascade-ticker".to_string())
            .spawn(move || {
                Self::run_loop(&tick_tx, &shutdown_clone, interval);
            })
            .expect("Failed to spawn ticker thread");

        Self {
            handle: Some(handle),
            shutdown,
            tick_rx,
        }
    }

    /// The tick receiver, for use with `select!` in event loops.
    #[inline]
    pub const fn receiver(&self) -> &Receiver<Tick> {
        &self.tick_rx
    }

    /// Signal the ticker to shutdown.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Wait for the ticker thread to finish.
    pub fn join(mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    fn run_loop(tick_tx: &Sender<Tick>, shutdown: &Arc<AtomicBool>, interval: Duration) {
        let start = Instant::now();
        let mut frame = 0u64;
        let mut deadline = start + interval;

        while !shutdown.load(Ordering::Relaxed) {
            let now = Instant::now();
            if now < deadline {
                // Short sleeps keep shutdown responsive.
                thread::sleep((deadline - now).min(Duration::from_millis(1)));
                continue;
            }

            // Non-blocking: if the buffer is full the consumer is
            // behind, and this tick is dropped rather than queued.
            let _ = tick_tx.try_send(Tick {
                frame,
                elapsed: now - start,
            });
            frame += 1;

            deadline += interval;
            if deadline < now {
                // Fell behind; resynchronize instead of bursting.
                deadline = now + interval;
            }
        }
    }
}

impl Drop for TickerActor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticker_delivers_sequential_frames() {
        let ticker = TickerActor::spawn(Duration::from_millis(10));

        let first = ticker.receiver().recv_timeout(Duration::from_millis(200));
        assert!(first.is_ok());
        assert_eq!(first.unwrap().frame, 0);

        let second = ticker.receiver().recv_timeout(Duration::from_millis(100));
        assert!(second.is_ok());
        assert!(second.unwrap().elapsed >= Duration::from_millis(10));

        ticker.join();
    }

    #[test]
    fn test_ticker_shutdown_stops_thread() {
        let ticker = TickerActor::spawn(Duration::from_millis(50));
        ticker.shutdown();
        ticker.join();
    }
}
