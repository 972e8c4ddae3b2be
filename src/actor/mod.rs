//! Actor shell: message-passing threads around the reveal pipeline.
//!
//! This module wraps a [`crate::stream::RevealSession`] in a simple
//! actor system built on crossbeam channels:
//! - **Ticker thread**: generates regular ticks for animation pacing
//! - **Dispatcher thread**: owns the session, applies commands in
//!   arrival order, advances animations on each tick
//! - **Host**: sends [`RevealCommand`]s, drains [`RevealEvent`]s
//!
//! ```text
//! ┌──────────┐  RevealCommand  ┌────────────────────┐
//! │   Host   │ ──────────────▶ │  Dispatcher Thread │
//! │          │ ◀────────────── │   (RevealSession)  │
//! └──────────┘   RevealEvent   └────────────────────┘
//!                                        ▲
//!                                        │ Tick
//!                               ┌────────────────┐
//!                               │ Ticker Thread  │
//!                               └────────────────┘
//! ```

mod engine;
mod messages;
mod ticker;

pub use engine::{EngineConfig, RevealEngine};
pub use messages::{RevealCommand, RevealEvent};
pub use ticker::{Tick, TickerActor};
