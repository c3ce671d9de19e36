use super::{Term, TermError};
use crate::attrs::{AttrFlags, Color};
use crate::event::VoidListener;
use crate::index::{Column, Line};

fn make_term(rows: usize, cols: usize) -> Term<VoidListener> {
    Term::open(rows, cols, VoidListener, None).expect("valid dimensions")
}

#[test]
fn open_rejects_dimensions_below_minimum() {
    let err = Term::open(1, 80, VoidListener, None).unwrap_err();
    assert_eq!(err, TermError::TooSmall { rows: 1, cols: 80 });
}

#[test]
fn resize_rejects_dimensions_below_minimum() {
    let mut term = make_term(24, 80);
    assert!(term.resize(1, 1).is_err());
    // Original dimensions untouched by the rejected resize.
    assert_eq!(term.screen().lines(), 24);
}

// S1: plain ASCII write lands left to right and advances the cursor.
#[test]
fn plain_write_places_characters_and_advances_cursor() {
    let mut term = make_term(24, 80);
    term.write(b"hi");
    assert_eq!(term.screen()[Line(0)][Column(0)].ch, 'h');
    assert_eq!(term.screen()[Line(0)][Column(1)].ch, 'i');
    assert_eq!(term.cursor().column, Column(2));
}

#[test]
fn write_reports_dirty_and_moved() {
    let mut term = make_term(24, 80);
    term.write(b"x");
    assert!(term.screen().is_dirty());
    term.clean();
    assert!(!term.screen().is_dirty());
}

#[test]
fn carriage_return_and_linefeed() {
    let mut term = make_term(24, 80);
    term.write(b"ab\r\ncd");
    assert_eq!(term.cursor().line, Line(1));
    assert_eq!(term.screen()[Line(1)][Column(0)].ch, 'c');
    assert_eq!(term.screen()[Line(1)][Column(1)].ch, 'd');
}

#[test]
fn bare_linefeed_advances_row_without_resetting_column() {
    let mut term = make_term(24, 80);
    term.write(b"ab\n");
    assert_eq!(term.cursor().line, Line(1));
    assert_eq!(term.cursor().column, Column(2));
}

#[test]
fn linefeed_at_bottom_row_scrolls() {
    let mut term = make_term(2, 10);
    term.write(b"A\r\nB\r\nC");
    assert_eq!(term.screen()[Line(0)][Column(0)].ch, 'B');
    assert_eq!(term.screen()[Line(1)][Column(0)].ch, 'C');
}

// S2: CSI cursor movement.
#[test]
fn csi_cup_moves_cursor_one_based() {
    let mut term = make_term(24, 80);
    term.write(b"\x1b[10;5H");
    assert_eq!(term.cursor().line, Line(9));
    assert_eq!(term.cursor().column, Column(4));
}

#[test]
fn csi_cup_with_no_params_goes_home() {
    let mut term = make_term(24, 80);
    term.write(b"\x1b[10;5H\x1b[H");
    assert_eq!(term.cursor().line, Line(0));
    assert_eq!(term.cursor().column, Column(0));
}

#[test]
fn csi_cuu_cud_cuf_cub_clamp_at_edges() {
    let mut term = make_term(5, 5);
    term.write(b"\x1b[100A");
    assert_eq!(term.cursor().line, Line(0));
    term.write(b"\x1b[100C\x1b[100B");
    assert_eq!(term.cursor().line, Line(4));
    assert_eq!(term.cursor().column, Column(4));
    term.write(b"\x1b[100D");
    assert_eq!(term.cursor().column, Column(0));
}

// S3: SGR color/attribute application.
#[test]
fn csi_sgr_sets_color_and_style_on_written_cells() {
    let mut term = make_term(24, 80);
    term.write(b"\x1b[31;1mX");
    let cell = &term.screen()[Line(0)][Column(0)];
    assert_eq!(cell.ch, 'X');
    assert_eq!(cell.attrs.fg, Color::Indexed(1));
    assert!(cell.attrs.flags.contains(AttrFlags::BOLD));
}

#[test]
fn csi_sgr_reset_clears_prior_attributes() {
    let mut term = make_term(24, 80);
    term.write(b"\x1b[31m\x1b[0mY");
    let cell = &term.screen()[Line(0)][Column(0)];
    assert_eq!(cell.attrs.fg, Color::Default);
}

// S4: full-width CJK glyph occupies two columns with an Ignored companion.
#[test]
fn full_width_glyph_occupies_two_columns() {
    let mut term = make_term(24, 80);
    term.write("\u{3042}".as_bytes()); // あ
    let cell = &term.screen()[Line(0)][Column(0)];
    assert_eq!(cell.ch, '\u{3042}');
    assert_eq!(cell.width_class, crate::cell::WidthClass::FullWidth);
    let companion = &term.screen()[Line(0)][Column(1)];
    assert_eq!(companion.width_class, crate::cell::WidthClass::Ignored);
    assert_eq!(term.cursor().column, Column(2));
}

#[test]
fn full_width_glyph_at_last_column_wraps_whole() {
    let mut term = make_term(24, 4);
    term.write("abc".as_bytes());
    term.write("\u{3042}".as_bytes());
    // Doesn't fit in the last column of row 0; wraps whole to row 1.
    assert_eq!(term.screen()[Line(1)][Column(0)].ch, '\u{3042}');
    assert!(term.screen()[Line(0)][Column(3)].is_empty());
}

// S5: combining mark attaches to the previous cell, not its own cell.
#[test]
fn combining_mark_attaches_to_previous_cell() {
    let mut term = make_term(24, 80);
    term.write("e\u{0301}".as_bytes()); // e + combining acute
    let cell = &term.screen()[Line(0)][Column(0)];
    assert_eq!(cell.ch, 'e');
    assert_eq!(cell.marks(), &['\u{0301}']);
    assert_eq!(term.cursor().column, Column(1));
}

#[test]
fn combining_mark_at_start_of_line_is_dropped() {
    let mut term = make_term(24, 80);
    term.write("\u{0301}".as_bytes());
    assert_eq!(term.cursor().column, Column(0));
}

#[test]
fn vs16_promotes_half_width_base_to_full_width() {
    let mut term = make_term(24, 80);
    term.write(b"#");
    term.write("\u{FE0F}".as_bytes());
    let cell = &term.screen()[Line(0)][Column(0)];
    assert_eq!(cell.width_class, crate::cell::WidthClass::FullWidth);
    assert_eq!(term.screen()[Line(0)][Column(1)].width_class, crate::cell::WidthClass::Ignored);
}

// S6: scrolling emits captured rows.
#[test]
fn csi_su_scrolls_and_captures_top_rows() {
    let mut term = make_term(3, 10);
    term.write(b"A\r\nB\r\nC");
    term.write(b"\x1b[1S");
    assert_eq!(term.screen()[Line(0)][Column(0)].ch, 'B');
    assert_eq!(term.screen()[Line(1)][Column(0)].ch, 'C');
    assert!(term.screen()[Line(2)][Column(0)].is_empty());
}

#[test]
fn csi_il_dl_insert_and_delete_lines_at_cursor() {
    let mut term = make_term(3, 10);
    term.write(b"A\r\nB\r\nC");
    term.write(b"\x1b[1;1H\x1b[1L");
    assert!(term.screen()[Line(0)][Column(0)].is_empty());
    assert_eq!(term.screen()[Line(1)][Column(0)].ch, 'A');
}

// S7: DSR cursor position report is answered through the listener.
#[test]
fn csi_dsr_cursor_position_answers_with_cpr() {
    use crate::event::{Event, EventListener};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<String>>>);
    impl EventListener for Recorder {
        fn send_event(&self, event: Event) {
            if let Event::Answer(s) = event {
                self.0.lock().unwrap().push(s);
            }
        }
    }

    let recorder = Recorder::default();
    let mut term = Term::open(24, 80, recorder.clone(), None).unwrap();
    term.write(b"\x1b[5;9H\x1b[6n");
    assert_eq!(recorder.0.lock().unwrap().as_slice(), &["\x1b[5;9R".to_string()]);
}

#[test]
fn erase_display_all_clears_screen_and_reports_scroll_capture() {
    let mut term = make_term(3, 10);
    term.write(b"A\r\nB\r\nC\x1b[2J");
    assert!(term.screen()[Line(0)][Column(0)].is_empty());
    assert!(term.screen()[Line(1)][Column(0)].is_empty());
    assert!(term.screen().is_scroll_dirty());
}

#[test]
fn reset_restores_defaults_but_keeps_dimensions() {
    let mut term = make_term(24, 80);
    term.write(b"\x1b[31mhello");
    term.reset();
    assert_eq!(term.screen().lines(), 24);
    assert_eq!(term.screen().cols(), 80);
    assert!(term.screen()[Line(0)][Column(0)].is_empty());
    assert_eq!(term.cursor().column, Column(0));
}

#[test]
fn acs_translates_mapped_bytes_only_while_enabled() {
    let mut term = make_term(24, 80);
    // Enter ACS (SGR 11), write a mapped source byte, leave ACS (SGR 10).
    term.write(&[0x1b, b'[', b'1', b'1', b'm', 0o020, 0x1b, b'[', b'1', b'0', b'm']);
    assert_eq!(term.screen()[Line(0)][Column(0)].ch, '>');

    // Once ACS is off, the same byte is decoded as plain UTF-8 (DLE, C0).
    term.write(&[0o020]);
    assert_eq!(term.screen()[Line(0)][Column(1)].ch, '\u{0010}');
}

#[test]
fn horizontal_tab_advances_to_next_stop() {
    let mut term = make_term(24, 80);
    term.write(b"\t");
    assert_eq!(term.cursor().column, Column(8));
}

#[test]
fn backspace_moves_left_without_erasing() {
    let mut term = make_term(24, 80);
    term.write(b"ab\x08");
    assert_eq!(term.cursor().column, Column(1));
    assert_eq!(term.screen()[Line(0)][Column(1)].ch, 'b');
}

#[test]
fn bell_is_forwarded_as_an_event() {
    use crate::event::{Event, EventListener};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<usize>>);
    impl EventListener for Recorder {
        fn send_event(&self, event: Event) {
            if matches!(event, Event::Bell) {
                *self.0.lock().unwrap() += 1;
            }
        }
    }

    let recorder = Recorder::default();
    let mut term = Term::open(24, 80, recorder.clone(), None).unwrap();
    term.write(b"\x07\x07");
    assert_eq!(*recorder.0.lock().unwrap(), 2);
}

#[test]
fn deferred_wrap_does_not_duplicate_last_column_write() {
    let mut term = make_term(2, 3);
    term.write(b"abc");
    assert_eq!(term.screen()[Line(0)][Column(2)].ch, 'c');
    // Cursor is transiently past the last column; the next character must
    // wrap to row 1 rather than overwrite column 2 of row 0.
    term.write(b"d");
    assert_eq!(term.screen()[Line(0)][Column(2)].ch, 'c');
    assert_eq!(term.screen()[Line(1)][Column(0)].ch, 'd');
}

#[test]
fn invalid_utf8_is_replaced() {
    let mut term = make_term(24, 80);
    term.write(&[0x80]);
    assert_eq!(term.screen()[Line(0)][Column(0)].ch, '\u{FFFD}');
}

// REP repeats the actual cell left of the cursor, not the last char placed.
#[test]
fn csi_rep_repeats_cell_left_of_cursor() {
    let mut term = make_term(24, 80);
    term.write(b"A\x1b[3b");
    assert_eq!(term.screen()[Line(0)][Column(1)].ch, 'A');
    assert_eq!(term.screen()[Line(0)][Column(2)].ch, 'A');
    assert_eq!(term.screen()[Line(0)][Column(3)].ch, 'A');
    assert_eq!(term.cursor().column, Column(4));
}

#[test]
fn csi_rep_reads_current_cell_not_stale_last_placed_char() {
    let mut term = make_term(24, 80);
    // Write 'A' at column 0, move to column 3 without writing (cell there
    // is blank), then REP: must repeat the blank cell left of the cursor,
    // not the stale 'A'.
    term.write(b"A\x1b[3C\x1b[b");
    assert_eq!(term.screen()[Line(0)][Column(3)].ch, ' ');
}

#[test]
fn csi_rep_at_column_zero_is_a_no_op() {
    let mut term = make_term(24, 80);
    term.write(b"hello\x1b[H\x1b[5b");
    assert_eq!(term.screen()[Line(0)][Column(0)].ch, 'h');
    assert_eq!(term.cursor().column, Column(0));
}
