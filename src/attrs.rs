//! Attribute record and the SGR (Select Graphic Rendition) engine.
//!
//! Grounded on `tmt.c`'s `sgr()` handler for the parameter table, with one
//! deliberate deviation: the reference gates every boolean toggle on
//! `P0(0) < 20` (the *first* parameter in the whole list) rather than the
//! value of the parameter actually being matched. That breaks the monoid
//! property `spec.md` §8.4 requires (`CSI a;b m` ≡ `CSI a m` then
//! `CSI b m`), so each parameter here is evaluated independently. See
//! `SPEC_FULL.md` §0.8.

use bitflags::bitflags;

/// An RGB triple for the 24-bit SGR color extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// A foreground or background color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    /// The terminal's distinguished default color.
    #[default]
    Default,
    /// One of the 8 standard ANSI colors (0-7).
    Indexed(u8),
    /// One of the 8 "bright" ANSI colors (0-7).
    BrightIndexed(u8),
    /// A direct 24-bit color.
    Rgb(Rgb),
}

bitflags! {
    /// Boolean style flags in the attribute record.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct AttrFlags: u8 {
        const BOLD      = 1 << 0;
        const DIM       = 1 << 1;
        const UNDERLINE = 1 << 2;
        const BLINK     = 1 << 3;
        const REVERSE   = 1 << 4;
        const INVISIBLE = 1 << 5;
    }
}

/// The current (or saved) graphic-rendition state: colors plus style flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Attrs {
    pub fg: Color,
    pub bg: Color,
    pub flags: AttrFlags,
}

/// Apply one CSI `m` (SGR) parameter list to `attrs`, and update `acs` for
/// parameters 10/11 (ACS is parser state, not part of the attribute record
/// itself — see `spec.md` §3).
///
/// An empty parameter list (bare `CSI m`) is equivalent to a single `0`
/// parameter, per `spec.md` §4.4.
pub fn apply_sgr(attrs: &mut Attrs, acs: &mut bool, params: &[u16]) {
    if params.is_empty() {
        *attrs = Attrs::default();
        return;
    }

    let mut i = 0;
    while i < params.len() {
        match params[i] {
            0 => *attrs = Attrs::default(),
            1 => attrs.flags.insert(AttrFlags::BOLD),
            22 => attrs.flags.remove(AttrFlags::BOLD),
            2 => attrs.flags.insert(AttrFlags::DIM),
            23 => attrs.flags.remove(AttrFlags::DIM),
            4 => attrs.flags.insert(AttrFlags::UNDERLINE),
            24 => attrs.flags.remove(AttrFlags::UNDERLINE),
            5 => attrs.flags.insert(AttrFlags::BLINK),
            25 => attrs.flags.remove(AttrFlags::BLINK),
            7 => attrs.flags.insert(AttrFlags::REVERSE),
            27 => attrs.flags.remove(AttrFlags::REVERSE),
            8 => attrs.flags.insert(AttrFlags::INVISIBLE),
            28 => attrs.flags.remove(AttrFlags::INVISIBLE),
            10 => *acs = false,
            11 => *acs = true,
            p @ (30..=37 | 40..=47) => {
                let idx = (p % 10) as u8;
                set_target(attrs, p < 40, Color::Indexed(idx));
            }
            p @ (90..=97 | 100..=107) => {
                let idx = (p % 10) as u8;
                set_target(attrs, p < 100, Color::BrightIndexed(idx));
            }
            p @ (38 | 48) => {
                if params.get(i + 1) == Some(&2) {
                    let r = params.get(i + 2).copied().unwrap_or(0) as u8;
                    let g = params.get(i + 3).copied().unwrap_or(0) as u8;
                    let b = params.get(i + 4).copied().unwrap_or(0) as u8;
                    set_target(attrs, p == 38, Color::Rgb(Rgb { r, g, b }));
                    i += 4;
                }
            }
            39 => attrs.fg = Color::Default,
            49 => attrs.bg = Color::Default,
            _ => {}
        }
        i += 1;
    }
}

fn set_target(attrs: &mut Attrs, is_fg: bool, color: Color) {
    if is_fg {
        attrs.fg = color;
    } else {
        attrs.bg = color;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_clears_everything() {
        let mut attrs = Attrs { fg: Color::Indexed(1), bg: Color::Indexed(2), flags: AttrFlags::BOLD };
        let mut acs = false;
        apply_sgr(&mut attrs, &mut acs, &[0]);
        assert_eq!(attrs, Attrs::default());
    }

    #[test]
    fn empty_param_list_is_reset() {
        let mut attrs = Attrs { flags: AttrFlags::BOLD, ..Attrs::default() };
        let mut acs = false;
        apply_sgr(&mut attrs, &mut acs, &[]);
        assert_eq!(attrs, Attrs::default());
    }

    #[test]
    fn fg_red_bold() {
        let mut attrs = Attrs::default();
        let mut acs = false;
        apply_sgr(&mut attrs, &mut acs, &[31, 1]);
        assert_eq!(attrs.fg, Color::Indexed(1));
        assert!(attrs.flags.contains(AttrFlags::BOLD));
    }

    #[test]
    fn sgr_is_monoidal_under_semicolon() {
        let mut combined = Attrs::default();
        let mut acs1 = false;
        apply_sgr(&mut combined, &mut acs1, &[31, 1]);

        let mut sequential = Attrs::default();
        let mut acs2 = false;
        apply_sgr(&mut sequential, &mut acs2, &[31]);
        apply_sgr(&mut sequential, &mut acs2, &[1]);

        assert_eq!(combined, sequential);
        assert_eq!(acs1, acs2);
    }

    #[test]
    fn rgb_fg() {
        let mut attrs = Attrs::default();
        let mut acs = false;
        apply_sgr(&mut attrs, &mut acs, &[38, 2, 10, 20, 30]);
        assert_eq!(attrs.fg, Color::Rgb(Rgb { r: 10, g: 20, b: 30 }));
    }

    #[test]
    fn bright_bg() {
        let mut attrs = Attrs::default();
        let mut acs = false;
        apply_sgr(&mut attrs, &mut acs, &[104]);
        assert_eq!(attrs.bg, Color::BrightIndexed(4));
    }

    #[test]
    fn acs_toggle() {
        let mut attrs = Attrs::default();
        let mut acs = false;
        apply_sgr(&mut attrs, &mut acs, &[11]);
        assert!(acs);
        apply_sgr(&mut attrs, &mut acs, &[10]);
        assert!(!acs);
    }

    #[test]
    fn default_fg_bg() {
        let mut attrs = Attrs { fg: Color::Indexed(1), bg: Color::Indexed(2), flags: AttrFlags::empty() };
        let mut acs = false;
        apply_sgr(&mut attrs, &mut acs, &[39, 49]);
        assert_eq!(attrs.fg, Color::Default);
        assert_eq!(attrs.bg, Color::Default);
    }
}
