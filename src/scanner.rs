//! Finding alias tokens and emoji sequences in a byte buffer.
//!
//! Decoding works on extended grapheme clusters: a table sequence is only
//! matched when it starts and ends on a cluster boundary, and clusters the
//! table does not know are passed over whole.
//!
//! The scanner never guesses about bytes it has not seen: when the end of the
//! buffer cuts a candidate short and more input may follow, iteration stops
//! early and [`Spans::position`] tells the caller where the undecided tail
//! begins. Scanning that tail again with more bytes appended yields the same
//! spans a single pass over the whole input would have.

use crate::{
    alias_table::{is_alias_byte, AliasTable},
    sequence_trie::ROOT,
    span::{Span, SpanKind},
    utf8::{self, Decoded},
};
use smallvec::SmallVec;
use std::str;
use unicode_segmentation::GraphemeCursor;

const VARIATION_SELECTOR_16: char = '\u{FE0F}';

/// Translation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// `:alias:` to emoji.
    Encode,
    /// Emoji to `:alias:`.
    Decode,
}

/// Splits buffers into [`Span`]s for one direction.
#[derive(Debug, Clone, Copy)]
pub struct Scanner<'t> {
    table: &'t AliasTable,
    direction: Direction,
}

impl<'t> Scanner<'t> {
    /// Creates a scanner over `table`.
    pub fn new(table: &'t AliasTable, direction: Direction) -> Self {
        Scanner { table, direction }
    }

    /// The direction this scanner looks for.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Iterates over the spans of `buf`.
    ///
    /// With `eof` unset, iteration stops before any span whose extent depends
    /// on bytes past the end of `buf`.
    pub fn spans<'b>(&self, buf: &'b [u8], eof: bool) -> Spans<'t, 'b> {
        Spans {
            table: self.table,
            direction: self.direction,
            buf,
            pos: 0,
            eof,
            stalled: false,
        }
    }

    /// Upper bound on the undecided tail a stalled scan leaves behind.
    pub fn carry_bound(&self) -> usize {
        match self.direction {
            Direction::Encode => self.table.max_alias_len() + 1,
            Direction::Decode => self.table.max_sequence_len() + 2 * utf8::MAX_BYTE_COUNT,
        }
    }
}

enum Match {
    Found(usize),
    NotFound,
    NeedMore,
}

/// An iterator over the spans of a buffer.
#[derive(Clone)]
pub struct Spans<'t, 'b> {
    table: &'t AliasTable,
    direction: Direction,
    buf: &'b [u8],
    pos: usize,
    eof: bool,
    stalled: bool,
}

impl<'t, 'b> Spans<'t, 'b> {
    /// Offset of the first byte not yet covered by a yielded span.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Whether iteration stopped early to wait for more input.
    pub fn is_stalled(&self) -> bool {
        self.stalled
    }

    /// The bytes no span has covered yet.
    pub fn remainder(&self) -> &'b [u8] {
        &self.buf[self.pos..]
    }

    fn step_encode(&self, rest: &[u8]) -> Option<(usize, SpanKind)> {
        if rest[0] != b':' {
            let run = rest.iter().position(|&b| b == b':').unwrap_or(rest.len());
            return Some((run, SpanKind::Literal));
        }
        let window = self.table.max_alias_len();
        let name = &rest[1..];
        match name.iter().take(window + 1).position(|&b| !is_alias_byte(b)) {
            Some(len) if len > 0 && name[len] == b':' => {
                let known = str::from_utf8(&name[..len])
                    .ok()
                    .map_or(false, |alias| self.table.lookup_alias(alias).is_some());
                if known {
                    Some((len + 2, SpanKind::Alias))
                } else {
                    Some((1, SpanKind::Literal))
                }
            }
            Some(_) => Some((1, SpanKind::Literal)),
            // every byte so far could belong to a name, the closing colon may be next
            None if name.len() <= window && !self.eof => None,
            None => Some((1, SpanKind::Literal)),
        }
    }

    fn step_decode(&self, rest: &[u8]) -> Option<(usize, SpanKind)> {
        match utf8::decode_first(rest) {
            Decoded::Invalid(len) => Some((len, SpanKind::Literal)),
            Decoded::Incomplete if self.eof => Some((rest.len(), SpanKind::Literal)),
            Decoded::Incomplete => None,
            Decoded::Char(ch, _) => {
                if self.table.sequences().child(ROOT, ch).is_some() {
                    match self.longest_match(rest) {
                        Match::Found(len) => return Some((len, SpanKind::Emoji)),
                        Match::NeedMore => return None,
                        Match::NotFound => {}
                    }
                }
                self.literal_clusters(rest).map(|len| (len, SpanKind::Literal))
            }
        }
    }

    /// Length of the leading run of grapheme clusters that is not a table
    /// match, ending where the next cluster could start one. `None` when the
    /// first cluster may continue past the bytes read so far.
    ///
    /// Every decode span starts on a cluster boundary, so a sequence inside
    /// an unknown cluster is never matched on its own. A cluster longer than
    /// [`Scanner::carry_bound`] is cut there.
    fn literal_clusters(&self, rest: &[u8]) -> Option<usize> {
        let trie = self.table.sequences();
        let limit = Scanner::new(self.table, self.direction).carry_bound();
        let text = utf8::valid_prefix(&rest[..rest.len().min(limit)]);
        let mut cursor = GraphemeCursor::new(0, text.len(), true);
        let mut end = 0;
        while let Ok(Some(boundary)) = cursor.next_boundary(text, 0) {
            if boundary == text.len() {
                if self.settled_after(rest, boundary) {
                    end = boundary;
                }
                break;
            }
            end = boundary;
            let starts_sequence = text[boundary..]
                .chars()
                .next()
                .map_or(false, |ch| trie.child(ROOT, ch).is_some());
            if starts_sequence {
                break;
            }
        }
        if end > 0 {
            Some(end)
        } else if rest.len() >= limit {
            Some(text.len())
        } else {
            None
        }
    }

    /// Whether nothing that could extend a cluster follows `rest[..end]`.
    fn settled_after(&self, rest: &[u8], end: usize) -> bool {
        match utf8::decode_first(&rest[end..]) {
            Decoded::Invalid(_) => true,
            Decoded::Incomplete => self.eof,
            Decoded::Char(..) => false,
        }
    }

    fn longest_match(&self, rest: &[u8]) -> Match {
        let trie = self.table.sequences();
        let mut node = ROOT;
        let mut off = 0;
        let mut candidates: SmallVec<[usize; 4]> = SmallVec::new();
        while trie.has_children(node) {
            match utf8::decode_first(&rest[off..]) {
                Decoded::Char(ch, width) => match trie.child(node, ch) {
                    Some(next) => {
                        node = next;
                        off += width;
                        if trie.value(node).is_some() {
                            candidates.push(off);
                        }
                    }
                    None => break,
                },
                Decoded::Incomplete if !self.eof => return Match::NeedMore,
                _ => break,
            }
        }

        for &end in candidates.iter().rev() {
            let end = match self.absorb_variation_selector(rest, end) {
                Some(end) => end,
                None => return Match::NeedMore,
            };
            match self.ends_cluster(rest, end) {
                Some(true) => return Match::Found(end),
                Some(false) => continue,
                None => return Match::NeedMore,
            }
        }
        Match::NotFound
    }

    /// Extends a match over one trailing U+FE0F the table does not spell out.
    fn absorb_variation_selector(&self, rest: &[u8], end: usize) -> Option<usize> {
        if !self.table.lenient_variation_selectors() {
            return Some(end);
        }
        match utf8::decode_first(&rest[end..]) {
            Decoded::Char(VARIATION_SELECTOR_16, width) => Some(end + width),
            Decoded::Incomplete if !self.eof => None,
            _ => Some(end),
        }
    }

    /// Whether `rest[..end]` ends on an extended grapheme cluster boundary,
    /// or `None` when that depends on bytes not yet read.
    fn ends_cluster(&self, rest: &[u8], end: usize) -> Option<bool> {
        let next_width = match utf8::decode_first(&rest[end..]) {
            Decoded::Char(_, width) => width,
            Decoded::Invalid(_) => return Some(true),
            Decoded::Incomplete if self.eof => return Some(true),
            Decoded::Incomplete => return None,
        };
        let text = match str::from_utf8(&rest[..end + next_width]) {
            Ok(text) => text,
            Err(_) => return Some(true),
        };
        let mut cursor = GraphemeCursor::new(end, text.len(), true);
        Some(cursor.is_boundary(text, 0).unwrap_or(true))
    }
}

impl<'t, 'b> Iterator for Spans<'t, 'b> {
    type Item = Span<'b>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = &self.buf[self.pos..];
        if rest.is_empty() {
            return None;
        }
        let step = match self.direction {
            Direction::Encode => self.step_encode(rest),
            Direction::Decode => self.step_decode(rest),
        };
        match step {
            Some((len, kind)) => {
                let span = Span::new(self.buf, self.pos, self.pos + len, kind);
                self.pos += len;
                Some(span)
            }
            None => {
                self.stalled = true;
                None
            }
        }
    }
}

impl std::fmt::Debug for Spans<'_, '_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Spans(")?;
        f.debug_list().entries(self.clone()).finish()?;
        write!(f, ")")
    }
}
