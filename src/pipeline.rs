//! Driving translations over byte streams.

use crate::{
    alias_table::AliasTable,
    config::Config,
    error::{Error, Result},
    scanner::{Direction, Scanner},
    translator::Translator,
};
use std::{
    io::{self, Read, Write},
    mem,
};
use tracing::{debug, trace};

/// Push-based translation of one stream.
///
/// Bytes are fed in chunks of any size; whatever a chunk ends in the middle
/// of is held back until the next chunk or [`Translation::finish`] settles it.
/// The held back tail never exceeds [`Scanner::carry_bound`] bytes.
#[derive(Debug, Clone)]
pub struct Translation<'t> {
    scanner: Scanner<'t>,
    translator: Translator<'t>,
    carry: Vec<u8>,
    substitutions: u64,
}

impl<'t> Translation<'t> {
    /// Starts translating a new stream.
    pub fn new(table: &'t AliasTable, direction: Direction) -> Self {
        let scanner = Scanner::new(table, direction);
        Translation {
            scanner,
            translator: Translator::new(table),
            carry: Vec::with_capacity(scanner.carry_bound()),
            substitutions: 0,
        }
    }

    /// Translates `chunk`, appending all output that is already decided to `out`.
    pub fn feed(&mut self, chunk: &[u8], out: &mut Vec<u8>) {
        if self.carry.is_empty() {
            let consumed = self.scan(chunk, false, out);
            self.carry.extend_from_slice(&chunk[consumed..]);
        } else {
            let mut pending = mem::take(&mut self.carry);
            pending.extend_from_slice(chunk);
            let consumed = self.scan(&pending, false, out);
            pending.drain(..consumed);
            self.carry = pending;
        }
        if !self.carry.is_empty() {
            trace!(held = self.carry.len(), "holding carry-over");
        }
        debug_assert!(self.carry.len() <= self.scanner.carry_bound());
    }

    /// Ends the stream, flushing the carry-over to `out`.
    pub fn finish(&mut self, out: &mut Vec<u8>) {
        let pending = mem::take(&mut self.carry);
        self.scan(&pending, true, out);
    }

    /// Number of bytes currently held back.
    pub fn carried(&self) -> usize {
        self.carry.len()
    }

    /// Number of spans replaced so far.
    pub fn substitutions(&self) -> u64 {
        self.substitutions
    }

    fn scan(&mut self, buf: &[u8], eof: bool, out: &mut Vec<u8>) -> usize {
        let direction = self.scanner.direction();
        let mut spans = self.scanner.spans(buf, eof);
        for span in spans.by_ref() {
            if self.translator.translate_into(&span, direction, out) {
                self.substitutions += 1;
            }
        }
        spans.position()
    }
}

/// Where a [`Pipeline`] is in its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    /// Created, nothing read yet.
    Idle,
    /// Waiting on the reader.
    Reading,
    /// Splitting the last chunk into spans.
    Scanning,
    /// Writing translated output.
    Emitting,
    /// The reader is exhausted; flushing the carry-over.
    Draining,
    /// Everything is written and flushed.
    Closed,
}

/// Totals of a finished pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// Bytes taken from the reader.
    pub bytes_read: u64,
    /// Bytes handed to the writer.
    pub bytes_written: u64,
    /// Aliases or emoji replaced.
    pub substitutions: u64,
}

/// Drives a [`Translation`] from a reader to a writer.
#[derive(Debug)]
pub struct Pipeline<'t> {
    table: &'t AliasTable,
    direction: Direction,
    translation: Translation<'t>,
    chunk_size: usize,
    state: State,
    summary: Summary,
}

impl<'t> Pipeline<'t> {
    /// Creates a pipeline, failing if `config` is not usable.
    pub fn new(table: &'t AliasTable, direction: Direction, config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Pipeline {
            table,
            direction,
            translation: Translation::new(table, direction),
            chunk_size: config.chunk_size,
            state: State::Idle,
            summary: Summary::default(),
        })
    }

    /// The current state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Translates everything `reader` yields into `writer`.
    ///
    /// Returns once the reader reports end of stream and the output is
    /// flushed. I/O errors are not retried, except reads that were
    /// interrupted. Output written before an error stays valid; the
    /// carry-over is dropped. A pipeline that already ran starts over on a
    /// fresh stream.
    pub fn run<R, W>(&mut self, mut reader: R, mut writer: W) -> Result<Summary>
    where
        R: Read,
        W: Write,
    {
        if self.state != State::Idle {
            self.translation = Translation::new(self.table, self.direction);
            self.summary = Summary::default();
            self.transition(State::Idle);
        }

        let mut chunk = vec![0; self.chunk_size];
        let mut out = Vec::with_capacity(self.chunk_size + self.translation.scanner.carry_bound());
        loop {
            self.transition(State::Reading);
            let len = match reader.read(&mut chunk) {
                Ok(0) => break,
                Ok(len) => len,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(Error::read(e)),
            };
            self.summary.bytes_read += len as u64;

            self.transition(State::Scanning);
            self.translation.feed(&chunk[..len], &mut out);

            self.transition(State::Emitting);
            self.emit(&mut writer, &mut out)?;
        }

        self.transition(State::Draining);
        self.translation.finish(&mut out);
        self.emit(&mut writer, &mut out)?;
        writer.flush().map_err(Error::write)?;

        self.summary.substitutions = self.translation.substitutions();
        self.transition(State::Closed);
        debug!(
            direction = ?self.direction,
            bytes_read = self.summary.bytes_read,
            bytes_written = self.summary.bytes_written,
            substitutions = self.summary.substitutions,
            "pipeline closed"
        );
        Ok(self.summary)
    }

    fn emit<W: Write>(&mut self, writer: &mut W, out: &mut Vec<u8>) -> Result<()> {
        if out.is_empty() {
            return Ok(());
        }
        writer.write_all(out).map_err(Error::write)?;
        self.summary.bytes_written += out.len() as u64;
        out.clear();
        Ok(())
    }

    fn transition(&mut self, next: State) {
        trace!(from = ?self.state, to = ?next, "pipeline state");
        self.state = next;
    }
}

/// Replaces every known `:alias:` read from `reader` with its emoji.
pub fn encode<R: Read, W: Write>(table: &AliasTable, reader: R, writer: W) -> Result<Summary> {
    Pipeline::new(table, Direction::Encode, &Config::default())?.run(reader, writer)
}

/// Replaces every known emoji read from `reader` with its canonical `:alias:`.
pub fn decode<R: Read, W: Write>(table: &AliasTable, reader: R, writer: W) -> Result<Summary> {
    Pipeline::new(table, Direction::Decode, &Config::default())?.run(reader, writer)
}

/// [`encode`] over a string.
pub fn encode_str(table: &AliasTable, text: &str) -> String {
    translate_str(table, Direction::Encode, text)
}

/// [`decode`] over a string.
pub fn decode_str(table: &AliasTable, text: &str) -> String {
    translate_str(table, Direction::Decode, text)
}

fn translate_str(table: &AliasTable, direction: Direction, text: &str) -> String {
    let mut translation = Translation::new(table, direction);
    let mut out = Vec::with_capacity(text.len());
    translation.feed(text.as_bytes(), &mut out);
    translation.finish(&mut out);
    // literals are copied from valid UTF-8 and replacements are table text
    String::from_utf8(out).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}
