//! Terminal state machine: the embedder-facing entry point.
//!
//! `Term<T: EventListener>` owns the grid, the multi-byte decoder, the
//! control-sequence parser, and the ACS toggle. It has no notion of a PTY,
//! a renderer, or a keyboard; it consumes bytes and emits [`Event`]s through
//! its `EventListener`, per `spec.md` §4.8.

use std::error::Error;
use std::fmt;

use crate::acs::AcsTable;
use crate::attrs::apply_sgr;
use crate::cell::WidthClass;
use crate::classify::{is_full_width, mark_category, MarkCategory};
use crate::decode::{DecodeStep, Utf8Decoder};
use crate::event::{Event, EventListener};
use crate::grid::{CursorStyle, EraseMode, Grid, TabClearMode, MIN_DIMENSION};
use crate::index::{Column, Line};
use crate::parser::{Mode, ParserState};

/// Replacement code point substituted for invalid UTF-8 (`spec.md` §4.2).
const REPLACEMENT_CHARACTER: char = '\u{FFFD}';

/// Failure from [`Term::open`]/[`Term::resize`]: the only fallible
/// operations in this crate (`spec.md` §7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermError {
    /// Requested dimensions are below [`MIN_DIMENSION`].
    TooSmall { rows: usize, cols: usize },
}

impl fmt::Display for TermError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooSmall { rows, cols } => {
                write!(f, "terminal size {rows}x{cols} is below the {MIN_DIMENSION}x{MIN_DIMENSION} minimum")
            }
        }
    }
}

impl Error for TermError {}

/// The terminal state machine.
///
/// Owns exactly one grid (`spec.md`'s Non-goals exclude an alternate
/// screen; see `SPEC_FULL.md` §0.10), the multi-byte decoder, the parser
/// state machine, and the ACS toggle/table. Generic over `T: EventListener`
/// so tests can use `VoidListener` while a real embedder routes events to a
/// renderer and a PTY writer.
pub struct Term<T: EventListener> {
    grid: Grid,
    decoder: Utf8Decoder,
    parser: ParserState,
    acs_enabled: bool,
    acs_table: AcsTable,
    cursor_style: CursorStyle,
    listener: T,
}

impl<T: EventListener> fmt::Debug for Term<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Term")
            .field("grid", &self.grid)
            .field("acs_enabled", &self.acs_enabled)
            .field("cursor_style", &self.cursor_style)
            .finish_non_exhaustive()
    }
}

impl<T: EventListener> Term<T> {
    /// Create a new terminal. `rows`/`cols` must each be at least
    /// [`MIN_DIMENSION`]; `acs_table` defaults when `None`.
    pub fn open(
        rows: usize,
        cols: usize,
        listener: T,
        acs_table: Option<AcsTable>,
    ) -> Result<Self, TermError> {
        if rows < MIN_DIMENSION || cols < MIN_DIMENSION {
            log::warn!("rejecting open({rows}, {cols}): below {MIN_DIMENSION}x{MIN_DIMENSION} minimum");
            return Err(TermError::TooSmall { rows, cols });
        }
        Ok(Self {
            grid: Grid::new(rows, cols),
            decoder: Utf8Decoder::new(),
            parser: ParserState::new(),
            acs_enabled: false,
            acs_table: acs_table.unwrap_or_default(),
            cursor_style: None,
            listener,
        })
    }

    /// Borrow the visible screen.
    pub fn screen(&self) -> &Grid {
        &self.grid
    }

    /// The current cursor position.
    pub fn cursor(&self) -> crate::grid::Cursor {
        self.grid.cursor()
    }

    /// The cursor style last set by `CSI <n> SP q`, if any.
    pub fn cursor_style(&self) -> CursorStyle {
        self.cursor_style
    }

    /// Clear per-cell dirty flags (`Term::clean`, `spec.md` §4.8).
    pub fn clean(&mut self) {
        self.grid.clean();
    }

    /// Clear the scroll-dirty flag (`Term::clean_scroll`, `spec.md` §4.8).
    pub fn clean_scroll(&mut self) {
        self.grid.clean_scroll();
    }

    /// Restore default attributes, clear the grid, re-home the cursor, and
    /// clear parser/decoder state. Dimensions and the listener are kept
    /// (`spec.md` §3 lifecycle).
    pub fn reset(&mut self) {
        self.grid.reset();
        self.decoder.reset();
        self.parser.reset();
        self.acs_enabled = false;
        self.cursor_style = None;
    }

    /// Resize, preserving overlap content and clamping the cursor.
    /// `rows`/`cols` must each be at least [`MIN_DIMENSION`].
    pub fn resize(&mut self, rows: usize, cols: usize) -> Result<(), TermError> {
        if rows < MIN_DIMENSION || cols < MIN_DIMENSION {
            log::warn!("rejecting resize({rows}, {cols}): below {MIN_DIMENSION}x{MIN_DIMENSION} minimum");
            return Err(TermError::TooSmall { rows, cols });
        }
        self.grid.resize(rows, cols);
        Ok(())
    }

    /// Feed a chunk of bytes through the parser/writer. Emits `UPDATE` if
    /// any cell is dirty when this call returns, and `MOVED` if the cursor
    /// position changed during this call (`spec.md` §2, §5).
    pub fn write(&mut self, bytes: &[u8]) {
        let cursor_before = self.grid.cursor();

        for &byte in bytes {
            self.process_byte(byte);
        }

        if self.grid.is_dirty() {
            self.listener.send_event(Event::Update);
        }
        if self.grid.cursor() != cursor_before {
            self.listener.send_event(Event::Moved);
        }
    }

    fn process_byte(&mut self, byte: u8) {
        match self.parser.mode() {
            Mode::Ground => self.ground_byte(byte),
            Mode::Esc => self.esc_byte(byte),
            Mode::CsiArg => self.csi_byte(byte),
            Mode::Osc => self.osc_byte(byte),
            Mode::SpIntermediate => self.sp_byte(byte),
        }
    }

    fn ground_byte(&mut self, byte: u8) {
        match byte {
            0x07 => self.listener.send_event(Event::Bell),
            0x08 => self.grid.move_back(1),
            0x09 => self.grid.tab_forward(),
            0x0A => self.linefeed(),
            0x0D => self.grid.set_column(0),
            0x1B => self.parser.enter(Mode::Esc),
            _ if self.acs_enabled => self.place_char(self.acs_table.translate(byte)),
            _ => match self.decoder.push(byte) {
                DecodeStep::Incomplete => {}
                DecodeStep::Complete(ch) => self.place_char(ch),
                DecodeStep::Invalid => self.place_char(REPLACEMENT_CHARACTER),
            },
        }
    }

    fn esc_byte(&mut self, byte: u8) {
        match byte {
            0x1B => {}
            b'H' => {
                let col = self.grid.cursor().column.0;
                self.grid.set_tab_stop(col);
                self.parser.reset();
            }
            b'7' => {
                self.grid.save_cursor();
                self.parser.reset();
            }
            b'8' => {
                self.grid.restore_cursor();
                self.parser.reset();
            }
            b'+' | b'*' | b'(' | b')' => {
                self.parser.set_ignored(true);
                self.parser.enter(Mode::CsiArg);
            }
            b'c' => {
                self.reset();
            }
            b'[' => self.parser.enter(Mode::CsiArg),
            b']' => self.parser.enter(Mode::Osc),
            _ => {
                log::trace!("unrecognised ESC final byte {byte:#04x}");
                self.parser.reset();
            }
        }
    }

    fn csi_byte(&mut self, byte: u8) {
        match byte {
            b'0'..=b'9' => self.parser.push_digit(byte - b'0'),
            b';' => self.parser.push_param(),
            b'?' => {}
            b' ' => self.parser.enter(Mode::SpIntermediate),
            0x1B => self.parser.enter(Mode::Esc),
            final_byte => {
                self.parser.push_param();
                if !self.parser.ignored() {
                    self.dispatch_csi(final_byte);
                }
                self.parser.reset();
            }
        }
    }

    fn osc_byte(&mut self, byte: u8) {
        match byte {
            0x07 => self.parser.reset(),
            0x1B => self.parser.enter(Mode::Esc),
            _ => {
                log::trace!("discarding OSC payload byte {byte:#04x}");
            }
        }
    }

    fn sp_byte(&mut self, byte: u8) {
        match byte {
            b'q' => {
                self.parser.push_param();
                self.cursor_style = Some(self.parser.p0(0));
                self.parser.reset();
            }
            _ => self.parser.reset(),
        }
    }

    #[allow(clippy::too_many_lines)]
    fn dispatch_csi(&mut self, final_byte: u8) {
        match final_byte {
            b'A' => self.grid.move_up(usize::from(self.parser.p1(0))),
            b'B' => self.grid.move_down(usize::from(self.parser.p1(0))),
            b'C' => self.grid.move_forward(usize::from(self.parser.p1(0))),
            b'D' => self.grid.move_back(usize::from(self.parser.p1(0))),
            b'E' => self.grid.cursor_next_line(usize::from(self.parser.p1(0))),
            b'F' => self.grid.cursor_prev_line(usize::from(self.parser.p1(0))),
            b'G' => self.grid.set_column(usize::from(self.parser.p1(0)) - 1),
            b'd' => self.grid.set_line(usize::from(self.parser.p1(0)) - 1),
            b'H' | b'f' => self.grid.set_position(
                usize::from(self.parser.p1(0)) - 1,
                usize::from(self.parser.p1(1)) - 1,
            ),
            b'I' => self.grid.tab_forward(),
            b'Z' => self.grid.tab_backward(),
            b'J' => {
                if let Some(rows) = self.grid.erase_display(erase_mode(self.parser.p0(0))) {
                    self.listener.send_event(Event::Scroll(rows));
                }
            }
            b'K' => self.grid.erase_line(erase_mode(self.parser.p0(0))),
            b'L' => self.grid.insert_lines(usize::from(self.parser.p1(0))),
            b'M' => {
                if let Some(rows) = self.grid.delete_lines(usize::from(self.parser.p1(0))) {
                    self.listener.send_event(Event::Scroll(rows));
                }
            }
            b'P' => self.grid.delete_chars(usize::from(self.parser.p1(0))),
            b'@' => self.grid.insert_chars(usize::from(self.parser.p1(0))),
            b'S' => {
                if let Some(rows) = self.grid.scroll_up(0, usize::from(self.parser.p1(0))) {
                    self.listener.send_event(Event::Scroll(rows));
                }
            }
            b'T' => self.grid.scroll_down(0, usize::from(self.parser.p1(0))),
            b'X' => self.grid.erase_chars(usize::from(self.parser.p1(0))),
            b'b' => {
                let cursor = self.grid.cursor();
                if cursor.column.0 > 0 {
                    let ch = self.grid[cursor.line][Column(cursor.column.0 - 1)].ch;
                    for _ in 0..self.parser.p1(0) {
                        self.place_char(ch);
                    }
                }
            }
            b'c' => self.listener.send_event(Event::Answer("\x1b[?6c".to_string())),
            b'g' => {
                let mode = if self.parser.p0(0) == 3 { TabClearMode::All } else { TabClearMode::Current };
                self.grid.clear_tab_stops(mode);
            }
            b'm' => apply_sgr(self.grid.attrs_mut(), &mut self.acs_enabled, self.parser.params()),
            b'n' => {
                if self.parser.p0(0) == 6 {
                    let cursor = self.grid.cursor();
                    let reply = format!("\x1b[{};{}R", cursor.line.0 + 1, cursor.column.0 + 1);
                    self.listener.send_event(Event::Answer(reply));
                }
            }
            b'h' | b'l' => {
                if self.parser.p0(0) == 25 {
                    self.listener.send_event(Event::Cursor(final_byte == b'h'));
                }
            }
            b's' => self.grid.save_cursor(),
            b'u' => self.grid.restore_cursor(),
            _ => log::trace!("unrecognised CSI final byte {:#04x}", final_byte),
        }
    }

    /// `spec.md` §4.5 GROUND `0x0A`: advance the row, or scroll up by one
    /// at the bottom row.
    fn linefeed(&mut self) {
        let next = self.grid.cursor().line.0 + 1;
        if next >= self.grid.lines() {
            if let Some(rows) = self.grid.scroll_up(0, 1) {
                self.listener.send_event(Event::Scroll(rows));
            }
        } else {
            self.grid.move_down(1);
        }
    }

    /// Cursor wrap used by the writer (`spec.md` §4.6 step 6): column to
    /// 0, row forward by one, scrolling up at the bottom.
    fn wrap_cursor(&mut self) {
        self.grid.cursor_mut().column = Column(0);
        self.linefeed();
    }

    /// The cell immediately left of the cursor, stepping back over an
    /// `Ignored` companion to its base (`spec.md` §4.6 step 2's
    /// parenthetical). `None` at the left edge of the row.
    fn left_of_cursor(&self) -> Option<Column> {
        let col = self.grid.cursor().column.0;
        if col == 0 {
            return None;
        }
        let left = col - 1;
        let line = self.grid.cursor().line;
        if self.grid[line][Column(left)].width_class == WidthClass::Ignored && left > 0 {
            Some(Column(left - 1))
        } else {
            Some(Column(left))
        }
    }

    /// Writer/cursor engine entry point: place one decoded code point,
    /// per `spec.md` §4.6.
    fn place_char(&mut self, w: char) {
        match mark_category(w) {
            MarkCategory::Mark => {
                self.append_mark(w, false);
                return;
            }
            MarkCategory::MarkFullwidth => {
                self.append_mark(w, true);
                return;
            }
            MarkCategory::Format => {
                self.write_ordinary(w, false, true);
                return;
            }
            MarkCategory::NotMark => {}
        }

        if self.try_replace_formatter(w) {
            return;
        }

        self.write_ordinary(w, is_full_width(w), false);
    }

    /// `spec.md` §4.6 steps 2-3: append a combining mark to the cell
    /// holding its base, promoting that base to full-width if `promote`.
    fn append_mark(&mut self, w: char, promote: bool) {
        let Some(col) = self.left_of_cursor() else { return };
        let line = self.grid.cursor().line;
        self.grid[line][col].push_mark(w);
        self.grid.mark_dirty(line.0);

        if promote && self.grid[line][col].width_class == WidthClass::HalfWidth {
            self.promote_to_full_width(line, col);
        }
    }

    /// Promote an existing half-width base cell to full-width, relocating
    /// it (and its marks) to the next row first if it sits in the last
    /// column (`spec.md` §4.6, "Width promotion").
    fn promote_to_full_width(&mut self, line: Line, col: Column) {
        if col.0 + 1 == self.grid.cols() {
            let ch = self.grid[line][col].ch;
            let marks: Vec<char> = self.grid[line][col].marks().to_vec();
            let attrs = self.grid[line][col].attrs;
            self.grid[line][col].reset();
            self.grid.mark_dirty(line.0);

            self.wrap_cursor();
            let new_line = self.grid.cursor().line;
            self.grid[new_line][Column(0)].reset();
            self.grid[new_line][Column(0)].ch = ch;
            self.grid[new_line][Column(0)].attrs = attrs;
            self.grid[new_line][Column(0)].width_class = WidthClass::FullWidth;
            for m in marks {
                self.grid[new_line][Column(0)].push_mark(m);
            }
            self.grid[new_line][Column(1)].make_companion(attrs);
            self.grid.mark_dirty(new_line.0);
            self.grid.cursor_mut().column = Column(2);
        } else {
            let attrs = self.grid[line][col].attrs;
            self.grid[line][col].width_class = WidthClass::FullWidth;
            self.grid[line][Column(col.0 + 1)].make_companion(attrs);
            self.grid.mark_dirty(line.0);
        }
    }

    /// `spec.md` §4.6 step 5: if the cell left of the cursor is a
    /// formatter placeholder, `w` becomes its new base, inheriting its
    /// marks, rather than occupying a fresh cell.
    fn try_replace_formatter(&mut self, w: char) -> bool {
        let Some(col) = self.left_of_cursor() else { return false };
        let line = self.grid.cursor().line;
        if self.grid[line][col].width_class != WidthClass::Formatter {
            return false;
        }

        let marks: Vec<char> = self.grid[line][col].marks().to_vec();
        let full_width = is_full_width(w);

        if full_width && col.0 + 1 >= self.grid.cols() {
            let attrs = self.grid[line][col].attrs;
            self.grid[line][col].reset();
            self.grid.mark_dirty(line.0);
            self.wrap_cursor();
            let new_line = self.grid.cursor().line;
            self.grid[new_line][Column(0)].reset();
            self.grid[new_line][Column(0)].ch = w;
            self.grid[new_line][Column(0)].attrs = attrs;
            self.grid[new_line][Column(0)].width_class = WidthClass::FullWidth;
            for m in marks {
                self.grid[new_line][Column(0)].push_mark(m);
            }
            self.grid[new_line][Column(1)].make_companion(attrs);
            self.grid.mark_dirty(new_line.0);
            self.grid.cursor_mut().column = Column(2);
        } else {
            let cell = &mut self.grid[line][col];
            cell.ch = w;
            cell.width_class = if full_width { WidthClass::FullWidth } else { WidthClass::HalfWidth };
            let attrs = cell.attrs;
            self.grid.mark_dirty(line.0);
            if full_width {
                self.grid[line][Column(col.0 + 1)].make_companion(attrs);
            }
        }
        true
    }

    /// `spec.md` §4.6 steps 4, 6-8: place an ordinary (or formatter)
    /// cell at the cursor, wrapping first if it would not fit, and
    /// advance the cursor by the cell's width.
    fn write_ordinary(&mut self, w: char, full_width: bool, formatter: bool) {
        let use_cols = if full_width { 2 } else { 1 };
        if self.grid.cursor().column.0 + use_cols > self.grid.cols() {
            self.wrap_cursor();
        }

        let line = self.grid.cursor().line;
        let col = self.grid.cursor().column;
        let attrs = self.grid.attrs();

        let cell = &mut self.grid[line][col];
        cell.reset();
        cell.ch = w;
        cell.attrs = attrs;
        cell.width_class = if formatter {
            WidthClass::Formatter
        } else if full_width {
            WidthClass::FullWidth
        } else {
            WidthClass::HalfWidth
        };

        if full_width {
            self.grid[line][Column(col.0 + 1)].make_companion(attrs);
        }
        self.grid.mark_dirty(line.0);
        self.grid.cursor_mut().column = Column(col.0 + use_cols);
    }
}

fn erase_mode(param: u16) -> EraseMode {
    match param {
        1 => EraseMode::ToStart,
        2 => EraseMode::All,
        _ => EraseMode::ToEnd,
    }
}

#[cfg(test)]
mod tests;
