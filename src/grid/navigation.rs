//! Cursor movement and tab-stop management.
//!
//! `spec.md` §4.5's CSI dispatch table (`A B C D E F G d H/f I Z`) and the
//! tab-stop bitmap described in §3. There is no scroll region
//! (`SPEC_FULL.md` §0.1): all vertical movement clamps to `[0, lines)`.

use crate::index::{Column, Line};

use super::Grid;

/// `CSI Ps g` (TBC) clear mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabClearMode {
    /// Clear the tab stop at the current column (`Ps` absent or 0).
    Current,
    /// Clear every tab stop (`Ps == 3`).
    All,
}

impl Grid {
    /// CUU: move up `count` rows, clamped to row 0.
    pub fn move_up(&mut self, count: usize) {
        let line = self.cursor().line.0;
        self.cursor_mut().line = Line(line.saturating_sub(count));
    }

    /// CUD: move down `count` rows, clamped to the last row.
    pub fn move_down(&mut self, count: usize) {
        let line = self.cursor().line.0;
        let max = self.lines().saturating_sub(1);
        self.cursor_mut().line = Line((line + count).min(max));
    }

    /// CUF: move right `count` columns, clamped to the last column.
    pub fn move_forward(&mut self, count: usize) {
        let col = self.cursor().column.0;
        let max = self.cols().saturating_sub(1);
        self.cursor_mut().column = Column((col + count).min(max));
    }

    /// CUB: move left `count` columns, clamped to column 0.
    ///
    /// `SPEC_FULL.md` §0.4: the sane clamp, not the reference underflow
    /// quirk.
    pub fn move_back(&mut self, count: usize) {
        let col = self.cursor().column.0;
        self.cursor_mut().column = Column(col.saturating_sub(count));
    }

    /// CNL: column to 0, row down by `count` (clamped).
    pub fn cursor_next_line(&mut self, count: usize) {
        self.cursor_mut().column = Column(0);
        self.move_down(count);
    }

    /// CPL: column to 0, row up by `count` (clamped).
    pub fn cursor_prev_line(&mut self, count: usize) {
        self.cursor_mut().column = Column(0);
        self.move_up(count);
    }

    /// CHA: set column (0-based), clamped to the last column. Callers
    /// translate the 1-based `Ps` parameter before calling this.
    pub fn set_column(&mut self, col: usize) {
        let max = self.cols().saturating_sub(1);
        self.cursor_mut().column = Column(col.min(max));
    }

    /// VPA: set row (0-based), clamped to the last row. Callers translate
    /// the 1-based `Ps` parameter before calling this.
    pub fn set_line(&mut self, line: usize) {
        let max = self.lines().saturating_sub(1);
        self.cursor_mut().line = Line(line.min(max));
    }

    /// CUP/HVP: set row and column (0-based), both clamped.
    pub fn set_position(&mut self, line: usize, col: usize) {
        self.set_line(line);
        self.set_column(col);
    }

    /// Set a tab stop at `col`.
    pub fn set_tab_stop(&mut self, col: usize) {
        if let Some(stop) = self.tab_stops_mut().get_mut(col) {
            *stop = true;
        }
    }

    /// Clear tab stops per `mode`.
    pub fn clear_tab_stops(&mut self, mode: TabClearMode) {
        match mode {
            TabClearMode::Current => {
                let col = self.cursor().column.0;
                if let Some(stop) = self.tab_stops_mut().get_mut(col) {
                    *stop = false;
                }
            }
            TabClearMode::All => {
                for stop in self.tab_stops_mut() {
                    *stop = false;
                }
            }
        }
    }

    /// HT/CHT: advance to the next tab stop strictly right of `col`, or the
    /// last column if none remains (`spec.md` §4.5).
    pub fn next_tab_stop(&self, col: usize) -> usize {
        let last = self.cols().saturating_sub(1);
        self.tab_stops()[col.min(last) + 1..]
            .iter()
            .position(|&stop| stop)
            .map_or(last, |offset| col + 1 + offset)
    }

    /// CBT: retreat to the previous tab stop strictly left of `col`, or
    /// column 0 if none remains.
    pub fn prev_tab_stop(&self, col: usize) -> usize {
        self.tab_stops()[..col.min(self.cols())]
            .iter()
            .rposition(|&stop| stop)
            .unwrap_or(0)
    }

    /// HT: advance the cursor to the next tab stop (or the last column).
    pub fn tab_forward(&mut self) {
        let target = self.next_tab_stop(self.cursor().column.0);
        self.cursor_mut().column = Column(target);
    }

    /// CBT: retreat the cursor to the previous tab stop (or column 0).
    pub fn tab_backward(&mut self) {
        let target = self.prev_tab_stop(self.cursor().column.0);
        self.cursor_mut().column = Column(target);
    }
}
