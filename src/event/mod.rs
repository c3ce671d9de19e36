//! Terminal event types and listener trait.
//!
//! Events flow outward from the terminal state machine to the embedder. The
//! `EventListener` trait decouples `Term<T>` from any specific UI framework
//! — tests use `VoidListener`, a real embedder routes events to a renderer
//! and a PTY writer.

use std::fmt;

use crate::grid::Row;

/// Terminal events that flow outward to the embedder, per `spec.md` §4.8.
///
/// `UPDATE` and `MOVED` carry no payload: the screen and cursor are accessed
/// through `Term::screen`/`Term::cursor` borrow-only accessors rather than a
/// copy riding along with the event.
#[derive(Clone)]
pub enum Event {
    /// Some cell changed during the current `write`.
    Update,
    /// The cursor moved during the current `write`.
    Moved,
    /// BEL (0x07) received.
    Bell,
    /// A reply the embedder should forward to the child (DA, DSR).
    Answer(String),
    /// DECTCEM show (`true`) / hide (`false`), via `CSI ?25 h`/`l`.
    Cursor(bool),
    /// Lines that scrolled off the top of the screen, in top-to-bottom
    /// order as they appeared before the scroll.
    Scroll(Vec<Row>),
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Update => write!(f, "Update"),
            Self::Moved => write!(f, "Moved"),
            Self::Bell => write!(f, "Bell"),
            Self::Answer(s) => write!(f, "Answer({s:?})"),
            Self::Cursor(show) => write!(f, "Cursor({show})"),
            Self::Scroll(lines) => write!(f, "Scroll({} lines)", lines.len()),
        }
    }
}

/// Receives terminal events from `Term<T>`.
///
/// The default implementation is a no-op, so `VoidListener` needs no method
/// body. Events are delivered synchronously and inline during `write`, per
/// `spec.md` §5 — there is no queueing or background delivery.
pub trait EventListener: Send + 'static {
    /// Handle a terminal event. Default: no-op.
    fn send_event(&self, _event: Event) {}
}

/// No-op event listener for tests and headless operation.
pub struct VoidListener;

impl EventListener for VoidListener {}
