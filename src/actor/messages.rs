//! Message types for the engine shell.
//!
//! These enums define the protocol between the host and the dispatcher
//! thread that owns the reveal session.

use crate::reveal::RectSnapshot;

/// Commands sent from the host to the dispatcher.
///
/// The command channel is unbounded: a bursty token producer never
/// blocks on the animation side, and commands are applied strictly in
/// arrival order.
#[derive(Debug, Clone)]
pub enum RevealCommand {
    /// Append a delta from the token stream.
    PushDelta(String),

    /// End of stream: flush anything the tokenizer is still holding.
    Finish,

    /// Change the wrap width in columns.
    SetWidth(u16),

    /// Stop the dispatcher thread.
    Shutdown,
}

/// Events published by the dispatcher.
#[derive(Debug, Clone)]
pub enum RevealEvent {
    /// A frame of drawable rectangle snapshots, sent once per tick
    /// while any reveal is active.
    ///
    /// One empty frame follows the last active rectangle, so the host
    /// knows to clear its overlay.
    Frame(Vec<RectSnapshot>),

    /// Every character up to the given text length has been revealed.
    Complete(usize),
}
