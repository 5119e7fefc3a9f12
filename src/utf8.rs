use std::str;

pub(crate) const MAX_BYTE_COUNT: usize = 4;

const TAG_TWO_B: u8 = 0b1100_0000;
const TAG_THREE_B: u8 = 0b1110_0000;
const TAG_FOUR_B: u8 = 0b1111_0000;
const TAG_FIVE_B: u8 = 0b1111_1000;

/// Width of the sequence a lead byte announces.
///
/// Continuation bytes and bytes that can never lead a UTF-8 sequence report 1,
/// the decoder rejects them on its own.
pub(crate) fn width_from_first_byte(v: u8) -> usize {
    if v < 128 {
        1
    } else if v & TAG_FIVE_B == TAG_FIVE_B {
        1
    } else if v & TAG_FOUR_B == TAG_FOUR_B {
        4
    } else if v & TAG_THREE_B == TAG_THREE_B {
        3
    } else if v & TAG_TWO_B == TAG_TWO_B {
        2
    } else {
        1
    }
}

/// Outcome of decoding the first character of a byte slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Decoded {
    /// A complete character and its encoded width.
    Char(char, usize),
    /// This many bytes can never start valid UTF-8.
    Invalid(usize),
    /// The slice ends before the character does (or is empty).
    Incomplete,
}

pub(crate) fn decode_first(bytes: &[u8]) -> Decoded {
    let head = match bytes.first() {
        Some(&head) => head,
        None => return Decoded::Incomplete,
    };
    if head < 128 {
        return Decoded::Char(head as char, 1);
    }
    let width = width_from_first_byte(head).min(bytes.len());
    match str::from_utf8(&bytes[..width]) {
        Ok(s) => match s.chars().next() {
            Some(ch) => Decoded::Char(ch, width),
            None => Decoded::Incomplete,
        },
        Err(e) => match e.error_len() {
            Some(len) => Decoded::Invalid(len),
            None => Decoded::Incomplete,
        },
    }
}

/// The longest prefix of `bytes` that is valid UTF-8.
pub(crate) fn valid_prefix(bytes: &[u8]) -> &str {
    match str::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => str::from_utf8(&bytes[..e.valid_up_to()]).unwrap_or_default(),
    }
}
