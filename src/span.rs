use std::{fmt, str};

/// How the scanner classified a region of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpanKind {
    /// Text copied to the output unchanged.
    Literal,
    /// A `:name:` token whose name is in the table.
    Alias,
    /// An emoji sequence that is in the table.
    Emoji,
}

/// A contiguous region of a scanned buffer.
///
/// Offsets are byte offsets into the buffer handed to the scanner.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Span<'buf> {
    /// Offset of the first byte.
    pub start: usize,
    /// Offset one past the last byte.
    pub end: usize,
    /// Classification.
    pub kind: SpanKind,
    /// The matched bytes, `buf[start..end]`.
    pub payload: &'buf [u8],
}

impl<'buf> Span<'buf> {
    pub(crate) fn new(buf: &'buf [u8], start: usize, end: usize, kind: SpanKind) -> Self {
        Span {
            start,
            end,
            kind,
            payload: &buf[start..end],
        }
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the span covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The alias name between the colons, for [`SpanKind::Alias`] spans.
    pub fn alias_name(&self) -> Option<&'buf str> {
        match (self.kind, self.payload) {
            (SpanKind::Alias, [b':', name @ .., b':']) => str::from_utf8(name).ok(),
            _ => None,
        }
    }

    /// The payload as text, when it is valid UTF-8.
    pub fn as_str(&self) -> Option<&'buf str> {
        str::from_utf8(self.payload).ok()
    }
}

impl fmt::Debug for Span<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({}..{}, ", self.kind, self.start, self.end)?;
        match self.as_str() {
            Some(text) => write!(f, "{:?}", text)?,
            None => write!(f, "{:?}", self.payload)?,
        }
        write!(f, ")")
    }
}
