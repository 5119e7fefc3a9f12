use crate::{
    alias_table::AliasTable,
    scanner::Direction,
    span::{Span, SpanKind},
};
use std::borrow::Cow;

/// Resolves spans against an [`AliasTable`] and produces their output text.
///
/// Only an `Alias` span in encode direction or an `Emoji` span in decode
/// direction is ever replaced, and only when the table still resolves it.
/// Everything else comes out as the bytes that went in.
#[derive(Debug, Clone, Copy)]
pub struct Translator<'t> {
    table: &'t AliasTable,
}

impl<'t> Translator<'t> {
    /// Creates a translator over `table`.
    pub fn new(table: &'t AliasTable) -> Self {
        Translator { table }
    }

    /// The output text for `span`.
    pub fn translate<'a, 'b: 'a>(&self, span: &Span<'b>, direction: Direction) -> Cow<'a, [u8]>
    where
        't: 'a,
    {
        match self.replacement(span, direction) {
            Some(Replacement::Emoji(text)) => Cow::Borrowed(text.as_bytes()),
            Some(Replacement::Alias(name)) => Cow::Owned(format!(":{}:", name).into_bytes()),
            None => Cow::Borrowed(span.payload),
        }
    }

    /// Appends the output text for `span` to `out`, returning whether it was
    /// a substitution.
    pub fn translate_into(&self, span: &Span<'_>, direction: Direction, out: &mut Vec<u8>) -> bool {
        match self.replacement(span, direction) {
            Some(Replacement::Emoji(text)) => {
                out.extend_from_slice(text.as_bytes());
                true
            }
            Some(Replacement::Alias(name)) => {
                out.reserve(name.len() + 2);
                out.push(b':');
                out.extend_from_slice(name.as_bytes());
                out.push(b':');
                true
            }
            None => {
                out.extend_from_slice(span.payload);
                false
            }
        }
    }

    fn replacement(&self, span: &Span<'_>, direction: Direction) -> Option<Replacement<'t>> {
        match (span.kind, direction) {
            (SpanKind::Alias, Direction::Encode) => {
                let name = span.alias_name()?;
                self.table.emoji_for_alias(name).map(Replacement::Emoji)
            }
            (SpanKind::Emoji, Direction::Decode) => {
                let text = span.as_str()?;
                self.table.alias_for_emoji(text).map(Replacement::Alias)
            }
            _ => None,
        }
    }
}

enum Replacement<'t> {
    Emoji(&'t str),
    Alias(&'t str),
}
