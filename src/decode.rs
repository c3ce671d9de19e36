//! Stateful, byte-at-a-time UTF-8 decoder.
//!
//! Grounded on `examples/original_source/u8mbtowc.c`'s `utf8_to_wc`: a
//! decoder that consumes one byte at a time and reports one of
//! incomplete/complete/invalid, rather than requiring the whole sequence
//! up front. Validation (overlong encodings, out-of-range code points,
//! lone continuation bytes, lone leaders) is delegated to
//! `std::str::from_utf8`, which enforces the same rules the C decoder hand-
//! rolls, more defensively.

/// Bound on the pending-bytes accumulator. A well-formed UTF-8 sequence is
/// never longer than 4 bytes; this guards against a decoder stuck
/// mid-sequence from growing without bound on a pathologically malformed
/// stream, matching `u8mbtowc.c`'s sibling `BUF_MAX` constant in `tmt.c`.
const BUF_MAX: usize = 100;

/// Result of feeding one byte to the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStep {
    /// More bytes are needed before a code point is available.
    Incomplete,
    /// A full code point was decoded; the decoder has reset.
    Complete(char),
    /// The accumulated bytes do not form valid UTF-8; the decoder has
    /// reset. The caller should substitute the Unicode replacement
    /// character.
    Invalid,
}

/// Expected total length of a sequence from its leading byte, or `None` if
/// the byte cannot start a sequence (ASCII is handled separately by the
/// caller before this is consulted).
fn sequence_len(lead: u8) -> Option<usize> {
    match lead {
        0xC2..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        0xF0..=0xF4 => Some(4),
        _ => None,
    }
}

/// Byte-at-a-time UTF-8 decoder.
#[derive(Debug, Clone, Default)]
pub struct Utf8Decoder {
    pending: Vec<u8>,
    expected: usize,
}

impl Utf8Decoder {
    /// Create a decoder with no pending state.
    pub fn new() -> Self {
        Self { pending: Vec::with_capacity(4), expected: 0 }
    }

    /// Reset to the initial state, discarding any partial sequence.
    pub fn reset(&mut self) {
        self.pending.clear();
        self.expected = 0;
    }

    /// Feed one byte. Returns the decoding outcome for the sequence this
    /// byte completes, continues, or breaks.
    pub fn push(&mut self, byte: u8) -> DecodeStep {
        if self.pending.is_empty() {
            if byte < 0x80 {
                return DecodeStep::Complete(byte as char);
            }
            let Some(len) = sequence_len(byte) else {
                // Continuation byte or invalid leader (0x80..=0xC1, 0xF5..=0xFF)
                // in leader position.
                return DecodeStep::Invalid;
            };
            self.pending.push(byte);
            self.expected = len;
            return DecodeStep::Incomplete;
        }

        if !(0x80..=0xBF).contains(&byte) {
            self.reset();
            return DecodeStep::Invalid;
        }

        self.pending.push(byte);

        if self.pending.len() >= BUF_MAX {
            log::debug!("utf-8 decoder accumulator overflowed {BUF_MAX} bytes, flushing");
            self.reset();
            return DecodeStep::Invalid;
        }

        if self.pending.len() < self.expected {
            return DecodeStep::Incomplete;
        }

        let outcome = match std::str::from_utf8(&self.pending) {
            Ok(s) => s.chars().next().map_or(DecodeStep::Invalid, DecodeStep::Complete),
            Err(_) => DecodeStep::Invalid,
        };
        self.reset();
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_all(bytes: &[u8]) -> Vec<DecodeStep> {
        let mut dec = Utf8Decoder::new();
        bytes.iter().map(|&b| dec.push(b)).collect()
    }

    #[test]
    fn ascii_completes_immediately() {
        assert_eq!(decode_all(b"A"), vec![DecodeStep::Complete('A')]);
    }

    #[test]
    fn two_byte_sequence() {
        // U+00E9 'é' = 0xC3 0xA9
        let steps = decode_all(&[0xC3, 0xA9]);
        assert_eq!(steps, vec![DecodeStep::Incomplete, DecodeStep::Complete('\u{E9}')]);
    }

    #[test]
    fn three_byte_cjk_sequence() {
        // U+3042 'あ' = E3 81 82
        let steps = decode_all(&[0xE3, 0x81, 0x82]);
        assert_eq!(
            steps,
            vec![DecodeStep::Incomplete, DecodeStep::Incomplete, DecodeStep::Complete('\u{3042}')]
        );
    }

    #[test]
    fn four_byte_emoji_sequence() {
        // U+1F600 = F0 9F 98 80
        let steps = decode_all(&[0xF0, 0x9F, 0x98, 0x80]);
        assert_eq!(steps.last(), Some(&DecodeStep::Complete('\u{1F600}')));
    }

    #[test]
    fn lone_continuation_byte_is_invalid() {
        assert_eq!(decode_all(&[0x80]), vec![DecodeStep::Invalid]);
    }

    #[test]
    fn overlong_encoding_is_invalid() {
        // Overlong 2-byte encoding of NUL: C0 80.
        let steps = decode_all(&[0xC0]);
        assert_eq!(steps, vec![DecodeStep::Invalid]);
    }

    #[test]
    fn truncated_sequence_followed_by_ascii_recovers() {
        let mut dec = Utf8Decoder::new();
        assert_eq!(dec.push(0xE3), DecodeStep::Incomplete);
        // Breaks the sequence: not a continuation byte.
        assert_eq!(dec.push(b'A'), DecodeStep::Invalid);
        // Decoder has reset and can decode normally again.
        assert_eq!(dec.push(b'B'), DecodeStep::Complete('B'));
    }

    #[test]
    fn decoder_resets_after_invalid() {
        let mut dec = Utf8Decoder::new();
        assert_eq!(dec.push(0x80), DecodeStep::Invalid);
        assert_eq!(dec.push(b'x'), DecodeStep::Complete('x'));
    }
}
