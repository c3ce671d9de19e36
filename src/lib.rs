//! Headless, embeddable virtual terminal emulator core.
//!
//! This crate consumes a byte stream produced by an application that
//! believes it is talking to a VT100/VT102/ANSI-family terminal, and
//! maintains an in-memory representation of the screen such a terminal
//! would display. It emits events when the screen changes, the cursor
//! moves, lines scroll off the top, the application rings the bell, or it
//! must answer a device-status query.
//!
//! It owns no PTY, renders no glyphs, and reads no keyboard; those are the
//! embedder's responsibility. [`Term`] is the embedder-facing entry point:
//! construct one with [`Term::open`], feed it bytes with [`Term::write`],
//! and read the result back through [`Term::screen`]/[`Term::cursor`].

#![deny(unsafe_code)]

pub mod acs;
pub mod attrs;
pub mod cell;
pub mod classify;
pub mod decode;
pub mod event;
pub mod grid;
pub mod index;
pub mod parser;
pub mod term;

pub use acs::AcsTable;
pub use attrs::{AttrFlags, Attrs, Color, Rgb};
pub use cell::{Cell, WidthClass, MAX_MARKS};
pub use classify::MarkCategory;
pub use decode::{DecodeStep, Utf8Decoder};
pub use event::{Event, EventListener, VoidListener};
pub use grid::{Cursor, CursorStyle, EraseMode, Grid, Row, TabClearMode};
pub use index::{Column, Line, Point};
pub use term::{Term, TermError};
