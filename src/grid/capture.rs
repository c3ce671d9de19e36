//! Scroll-capture: snapshotting rows before they are overwritten.
//!
//! `spec.md` §3: "a scrollback-capture buffer the same width as the visible
//! screen, used to hand off lines that scroll off the top." Rather than a
//! persistent secondary screen, this crate snapshots departed rows into an
//! owned `Vec<Row>` at the moment they would be lost and hands that vector
//! straight back to the caller (`Grid::scroll_up`, `Grid::erase_display`),
//! which wraps it in `Event::Scroll` — see `SPEC_FULL.md` §0.9. This keeps
//! the capture buffer's lifetime and width trivially tied to the call that
//! produced it, with no separate buffer to keep in sync across resizes.

use super::row::Row;

/// Clone `rows` into an owned, independent snapshot.
pub(crate) fn snapshot(rows: &[Row]) -> Vec<Row> {
    rows.to_vec()
}
