#![deny(unsafe_code)]
#![deny(missing_docs, missing_debug_implementations)]
//! Translation between emoji aliases and Unicode emoji.
//!
//! Text such as `Hello :grin: world` encodes to `Hello 😁 world`, and decodes
//! back again. Everything that is not a known alias (when encoding) or a
//! known emoji (when decoding) is copied through byte for byte, invalid UTF-8
//! included.
//!
//! The [`AliasTable`] maps every alias to one emoji sequence and every
//! sequence to one canonical alias. It is immutable once built and is passed
//! by reference, so any number of translations may share it across threads.
//!
//! # Streaming
//!
//! [`Pipeline`] reads from any [`std::io::Read`] and writes to any
//! [`std::io::Write`], in chunks of [`Config::chunk_size`] bytes. A match cut
//! in half by a chunk boundary is held back until it can be decided, so the
//! output never depends on how the input was split.
//!
//! ```
//! # fn main() -> emojify::Result<()> {
//! let table = emojify::AliasTable::embedded()?;
//! let mut out = Vec::new();
//! emojify::encode(&table, "ship it :rocket:".as_bytes(), &mut out)?;
//! assert_eq!("ship it 🚀", String::from_utf8_lossy(&out));
//! assert_eq!("ship it :rocket:", emojify::decode_str(&table, "ship it 🚀"));
//! # Ok(())
//! # }
//! ```
//!
//! # Decoding rules
//!
//! Decoding works on extended grapheme clusters. A match is only tried where
//! a cluster starts, the longest sequence in the table wins, and it must end
//! on a cluster boundary too. An emoji followed by a skin tone or joiner
//! sequence the table does not know is therefore left alone instead of being
//! decoded partially, and so is the tail of such a sequence. Flags pair up
//! from the left, so `🇦🇷🇺🇸` is `:argentina::us:`. Skin tone variants that
//! the table does know are entries of their own, such as `:wave_tone1:`.

pub(crate) mod utf8;

pub(crate) mod sequence_store;

pub(crate) mod sequence_trie;

pub(crate) mod error;

pub(crate) mod config;

pub(crate) mod alias_table;

pub(crate) mod span;

pub(crate) mod scanner;

pub(crate) mod translator;

pub(crate) mod pipeline;

pub use error::{Error, IoDirection, Result};

pub use config::{Config, DEFAULT_CHUNK_SIZE};

pub use alias_table::{is_alias_char, AliasEntry, AliasTable, AliasTableBuilder, Sequence};

pub use span::{Span, SpanKind};

pub use scanner::{Direction, Scanner, Spans};

pub use translator::Translator;

pub use pipeline::{decode, decode_str, encode, encode_str, Pipeline, State, Summary, Translation};
