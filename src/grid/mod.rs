//! The terminal screen: a 2D cell grid, cursor, tab stops, and dirty
//! tracking.
//!
//! `spec.md` §3: "Screen — sequence of Lines plus its row/column
//! dimensions." There is exactly one `Grid` per [`crate::term::Term`] (no
//! alternate screen, no scrollback ring; see `SPEC_FULL.md` §0.9-10). Lines
//! that scroll off the top are handed to the caller as an owned `Vec<Row>`
//! capture rather than accumulated anywhere.

pub mod capture;
pub mod cursor;
pub mod dirty;
pub mod editing;
pub mod navigation;
pub mod row;
pub mod scroll;

use crate::attrs::Attrs;
use crate::index::Line;

pub use cursor::{Cursor, CursorStyle};
pub use dirty::DirtyTracker;
pub use editing::EraseMode;
pub use navigation::TabClearMode;
pub use row::Row;

/// The minimum grid dimension accepted by [`Grid::new`]/[`Grid::resize`],
/// per `spec.md` §4.8 ("`nrows >= 2`, `ncols >= 2`").
pub const MIN_DIMENSION: usize = 2;

/// The 2D terminal cell grid: visible rows, cursor, tab stops, and dirty
/// tracking.
#[derive(Debug, Clone)]
pub struct Grid {
    rows: Vec<Row>,
    cols: usize,
    lines: usize,
    cursor: Cursor,
    /// Current SGR attribute record, applied to newly written cells.
    attrs: Attrs,
    /// DECSC/DECRC and SCOSC/SCORC share one saved slot, per `spec.md` §3.
    saved: Option<(Cursor, Attrs)>,
    tab_stops: Vec<bool>,
    dirty: DirtyTracker,
    /// Set whenever a scroll (or full-screen erase) captures departed
    /// lines; cleared by `Term::clean_scroll`.
    scroll_dirty: bool,
}

impl Grid {
    /// Create a new grid. Callers must ensure `lines >= MIN_DIMENSION` and
    /// `cols >= MIN_DIMENSION`; [`crate::term::Term::open`] enforces this.
    pub fn new(lines: usize, cols: usize) -> Self {
        Self {
            rows: (0..lines).map(|_| Row::new(cols)).collect(),
            cols,
            lines,
            cursor: Cursor::origin(),
            attrs: Attrs::default(),
            saved: None,
            tab_stops: Self::default_tab_stops(cols),
            dirty: DirtyTracker::new(lines),
            scroll_dirty: false,
        }
    }

    /// Default tab stops: column 0, every multiple of 8, and the last
    /// column (`spec.md` §3; see `SPEC_FULL.md` §0.7 for the last-column
    /// fix-up when `cols` is not itself a multiple of 8).
    fn default_tab_stops(cols: usize) -> Vec<bool> {
        let mut stops = vec![false; cols];
        for (i, stop) in stops.iter_mut().enumerate() {
            *stop = i % 8 == 0;
        }
        if let Some(last) = stops.last_mut() {
            *last = true;
        }
        stops
    }

    pub fn lines(&self) -> usize {
        self.lines
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn attrs(&self) -> Attrs {
        self.attrs
    }

    pub fn attrs_mut(&mut self) -> &mut Attrs {
        &mut self.attrs
    }

    pub(crate) fn cursor_mut(&mut self) -> &mut Cursor {
        &mut self.cursor
    }

    pub(crate) fn tab_stops(&self) -> &[bool] {
        &self.tab_stops
    }

    pub(crate) fn tab_stops_mut(&mut self) -> &mut [bool] {
        &mut self.tab_stops
    }

    /// Save the current cursor position and attributes (DECSC/SCOSC).
    pub fn save_cursor(&mut self) {
        self.saved = Some((self.cursor, self.attrs));
    }

    /// Restore the last saved cursor position and attributes (DECRC/SCORC).
    /// A no-op if nothing was saved.
    pub fn restore_cursor(&mut self) {
        if let Some((cursor, attrs)) = self.saved {
            self.cursor = cursor;
            self.attrs = attrs;
            self.clamp_cursor();
        }
    }

    /// Clamp the cursor into `[0, lines) x [0, cols)`, per the invariant in
    /// `spec.md` §3.
    pub(crate) fn clamp_cursor(&mut self) {
        let max_line = self.lines.saturating_sub(1);
        let max_col = self.cols.saturating_sub(1);
        if self.cursor.line.0 > max_line {
            self.cursor.line = Line(max_line);
        }
        if self.cursor.column.0 > max_col {
            self.cursor.column = crate::index::Column(max_col);
        }
    }

    pub(crate) fn mark_dirty(&mut self, line: usize) {
        if let Some(row) = self.rows.get_mut(line) {
            row.mark_dirty();
        }
        self.dirty.mark(line);
    }

    pub(crate) fn mark_all_dirty(&mut self) {
        for row in &mut self.rows {
            row.mark_dirty();
        }
        self.dirty.mark_all();
    }

    pub(crate) fn mark_scroll_dirty(&mut self) {
        self.scroll_dirty = true;
    }

    /// Whether any cell changed since the last [`Grid::clean`].
    pub fn is_dirty(&self) -> bool {
        self.dirty.is_any_dirty()
    }

    /// Whether a scroll (or full-screen erase) captured departed lines
    /// since the last [`Grid::clean_scroll`].
    pub fn is_scroll_dirty(&self) -> bool {
        self.scroll_dirty
    }

    /// Clear per-line dirty flags (the `Term::clean` embedder operation).
    pub fn clean(&mut self) {
        self.dirty.clear_all();
        for row in &mut self.rows {
            row.clear_dirty();
        }
    }

    /// Clear the scroll-dirty flag (the `Term::clean_scroll` embedder
    /// operation).
    pub fn clean_scroll(&mut self) {
        self.scroll_dirty = false;
    }

    /// Reset to the post-construction state: default attributes, blank
    /// grid, cursor at the origin, default tab stops, no saved cursor.
    /// Dimensions are preserved (`spec.md` §3 lifecycle).
    pub fn reset(&mut self) {
        for row in &mut self.rows {
            row.clear_range(0, self.cols);
        }
        self.cursor = Cursor::origin();
        self.attrs = Attrs::default();
        self.saved = None;
        self.tab_stops = Self::default_tab_stops(self.cols);
        self.mark_all_dirty();
    }

    /// Resize, preserving the top-left overlap rectangle and clearing
    /// newly-revealed cells. Rebuilds tab stops. Cursor is clamped into the
    /// new bounds. `spec.md` §4.8.
    pub fn resize(&mut self, lines: usize, cols: usize) {
        for row in &mut self.rows {
            row.resize(cols);
        }
        self.rows.resize_with(lines, || Row::new(cols));
        self.cols = cols;
        self.lines = lines;
        self.tab_stops = Self::default_tab_stops(cols);
        self.dirty = DirtyTracker::new(lines);
        self.clamp_cursor();
        self.mark_all_dirty();
    }
}

impl std::ops::Index<Line> for Grid {
    type Output = Row;

    fn index(&self, line: Line) -> &Row {
        &self.rows[line.0]
    }
}

impl std::ops::IndexMut<Line> for Grid {
    fn index_mut(&mut self, line: Line) -> &mut Row {
        &mut self.rows[line.0]
    }
}
