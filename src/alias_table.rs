use crate::{
    config::Config,
    error::{Error, Result},
    sequence_store::SequenceStore,
    sequence_trie::SequenceTrie,
};
use smallvec::SmallVec;
use std::{collections::HashMap, fmt, str::FromStr};

/// The codepoints of one emoji, modifiers and joiners included.
pub type Sequence = SmallVec<[char; 8]>;

const EMBEDDED_DATA: &str = include_str!("../data/emoji.txt");

const VARIATION_SELECTOR_16: char = '\u{FE0F}';

/// Returns whether `ch` may appear between the colons of an alias.
///
/// Aliases are made of ASCII letters, digits, `_`, `+` and `-`.
pub fn is_alias_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '_' | '+' | '-')
}

pub(crate) fn is_alias_byte(b: u8) -> bool {
    is_alias_char(b as char)
}

/// One emoji and every alias it answers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasEntry {
    aliases: Vec<String>,
    sequence: Sequence,
    preferred: bool,
}

impl AliasEntry {
    /// Creates an entry. The first alias becomes the canonical one, repeated
    /// aliases are dropped.
    pub fn new<S, A>(sequence: S, aliases: A) -> Self
    where
        S: IntoIterator<Item = char>,
        A: IntoIterator,
        A::Item: Into<String>,
    {
        let mut names: Vec<String> = Vec::new();
        for alias in aliases {
            let alias = alias.into();
            if !names.contains(&alias) {
                names.push(alias);
            }
        }
        AliasEntry {
            aliases: names,
            sequence: sequence.into_iter().collect(),
            preferred: false,
        }
    }

    /// Marks this entry as the one decode resolves to when other entries
    /// share its sequence.
    pub fn preferred(mut self) -> Self {
        self.preferred = true;
        self
    }

    /// The alias emitted when decoding this emoji.
    pub fn canonical_name(&self) -> &str {
        self.aliases.first().map(String::as_str).unwrap_or("")
    }

    /// All aliases, canonical first.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// The exact codepoint sequence of the emoji.
    pub fn sequence(&self) -> &[char] {
        &self.sequence
    }

    /// Whether this entry wins decode when its sequence is shared.
    pub fn is_preferred(&self) -> bool {
        self.preferred
    }

    fn validate(&self) -> Result<()> {
        let invalid = |reason| Error::InvalidEntry {
            canonical: self.canonical_name().to_owned(),
            reason,
        };
        if self.sequence.is_empty() {
            return Err(invalid("empty codepoint sequence"));
        }
        if self.aliases.is_empty() {
            return Err(invalid("no aliases"));
        }
        for alias in &self.aliases {
            if alias.is_empty() {
                return Err(invalid("empty alias"));
            }
            if !alias.chars().all(is_alias_char) {
                return Err(invalid("alias contains characters outside [A-Za-z0-9_+-]"));
            }
        }
        Ok(())
    }
}

impl fmt::Display for AliasEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ch in self.sequence.iter() {
            write!(f, "{}", ch)?;
        }
        write!(f, " :{}:", self.canonical_name())
    }
}

fn hex_sequence(seq: &[char]) -> String {
    seq.iter()
        .map(|&ch| format!("{:04X}", ch as u32))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Immutable bidirectional index between aliases and emoji sequences.
///
/// Built once, then shared by reference between any number of scanners and
/// pipelines, on any number of threads.
#[derive(Debug, Clone)]
pub struct AliasTable {
    entries: Vec<AliasEntry>,
    texts: SequenceStore,
    by_alias: HashMap<String, u32>,
    by_sequence: SequenceTrie,
    max_alias_len: usize,
    lenient_variation_selectors: bool,
}

impl AliasTable {
    /// Starts a table from scratch.
    pub fn builder() -> AliasTableBuilder {
        AliasTableBuilder::default()
    }

    /// Loads the table compiled into the crate with the default configuration.
    pub fn embedded() -> Result<Self> {
        Self::embedded_with(&Config::default())
    }

    /// Loads the table compiled into the crate.
    pub fn embedded_with(config: &Config) -> Result<Self> {
        Self::builder()
            .lenient_variation_selectors(config.lenient_variation_selectors)
            .parse(EMBEDDED_DATA)?
            .build()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the entries in the order they were added.
    pub fn entries(&self) -> std::slice::Iter<'_, AliasEntry> {
        self.entries.iter()
    }

    /// Looks up an alias, given without colons.
    pub fn lookup_alias(&self, name: &str) -> Option<&AliasEntry> {
        let id = *self.by_alias.get(name)?;
        self.entries.get(id as usize)
    }

    /// Looks up the entry decode resolves an exact sequence to.
    pub fn lookup_sequence(&self, seq: &[char]) -> Option<&AliasEntry> {
        let id = self.by_sequence.get(seq.iter().copied())?;
        self.entries.get(id as usize)
    }

    /// The emoji text an alias encodes to.
    pub fn emoji_for_alias(&self, name: &str) -> Option<&str> {
        self.by_alias.get(name).map(|&id| self.texts.get(id))
    }

    /// The entry an emoji decodes to.
    ///
    /// With lenient variation selectors, a trailing U+FE0F the table does not
    /// spell out is ignored.
    pub fn resolve_emoji(&self, emoji: &str) -> Option<&AliasEntry> {
        let id = self.by_sequence.get(emoji.chars()).or_else(|| {
            let bare = emoji.strip_suffix(VARIATION_SELECTOR_16)?;
            if self.lenient_variation_selectors {
                self.by_sequence.get(bare.chars())
            } else {
                None
            }
        })?;
        self.entries.get(id as usize)
    }

    /// The canonical alias an emoji decodes to.
    pub fn alias_for_emoji(&self, emoji: &str) -> Option<&str> {
        self.resolve_emoji(emoji).map(AliasEntry::canonical_name)
    }

    /// Whether sequences are matched with or without their U+FE0F.
    pub fn lenient_variation_selectors(&self) -> bool {
        self.lenient_variation_selectors
    }

    /// Length of the longest alias, which bounds how far encode looks for a closing colon.
    pub fn max_alias_len(&self) -> usize {
        self.max_alias_len
    }

    /// Length of the longest emoji sequence, in UTF-8 bytes.
    pub fn max_sequence_len(&self) -> usize {
        self.texts.max_len()
    }

    /// One `"<emoji> :<alias>:"` line per alias, sorted by alias.
    pub fn listing(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.by_alias.len());
        for (id, text) in self.texts.iter() {
            if let Some(entry) = self.entries.get(id as usize) {
                for alias in entry.aliases() {
                    lines.push((alias.as_str(), format!("{} :{}:", text, alias)));
                }
            }
        }
        lines.sort_by(|a, b| a.0.cmp(b.0));
        lines.into_iter().map(|(_, line)| line).collect()
    }

    pub(crate) fn sequences(&self) -> &SequenceTrie {
        &self.by_sequence
    }
}

impl FromStr for AliasTable {
    type Err = Error;

    /// Parses table data in the embedded format:
    /// `<hex codepoints> ; <aliases> [; preferred]` per line, `#` comments.
    fn from_str(data: &str) -> Result<Self> {
        Self::builder().parse(data)?.build()
    }
}

/// Collects entries and checks them into an [`AliasTable`].
#[derive(Debug, Clone)]
pub struct AliasTableBuilder {
    entries: Vec<AliasEntry>,
    lenient_variation_selectors: bool,
}

impl Default for AliasTableBuilder {
    fn default() -> Self {
        AliasTableBuilder {
            entries: Vec::new(),
            lenient_variation_selectors: Config::default().lenient_variation_selectors,
        }
    }
}

impl AliasTableBuilder {
    /// Adds an entry.
    pub fn entry(mut self, entry: AliasEntry) -> Self {
        self.entries.push(entry);
        self
    }

    /// See [`Config::lenient_variation_selectors`].
    pub fn lenient_variation_selectors(mut self, enabled: bool) -> Self {
        self.lenient_variation_selectors = enabled;
        self
    }

    /// Adds every entry described by `data`.
    pub fn parse(mut self, data: &str) -> Result<Self> {
        for (idx, line) in data.lines().enumerate() {
            if let Some(entry) = parse_line(idx + 1, line)? {
                self.entries.push(entry);
            }
        }
        Ok(self)
    }

    /// Checks the invariants and builds the indexes.
    pub fn build(self) -> Result<AliasTable> {
        let AliasTableBuilder {
            entries,
            lenient_variation_selectors,
        } = self;

        let mut by_alias: HashMap<String, u32> = HashMap::new();
        let mut texts = SequenceStore::default();
        let mut groups: Vec<(Sequence, Vec<u32>)> = Vec::new();
        let mut group_of: HashMap<Sequence, usize> = HashMap::new();
        let mut max_alias_len = 0;

        for entry in entries.iter() {
            entry.validate()?;
            let id = texts.push(&entry.sequence);
            for alias in entry.aliases() {
                if let Some(&prev) = by_alias.get(alias.as_str()) {
                    return Err(Error::DuplicateAlias {
                        alias: alias.clone(),
                        first: entries[prev as usize].canonical_name().to_owned(),
                        second: entry.canonical_name().to_owned(),
                    });
                }
                by_alias.insert(alias.clone(), id);
                max_alias_len = max_alias_len.max(alias.len());
            }
            match group_of.get(&entry.sequence) {
                Some(&group) => groups[group].1.push(id),
                None => {
                    group_of.insert(entry.sequence.clone(), groups.len());
                    groups.push((entry.sequence.clone(), vec![id]));
                }
            }
        }

        let mut by_sequence = SequenceTrie::default();
        let mut winners = Vec::with_capacity(groups.len());
        for (seq, ids) in groups.iter() {
            let winner = pick_winner(&entries, seq, ids)?;
            by_sequence.insert(seq, winner);
            winners.push((seq, winner));
        }

        if lenient_variation_selectors {
            for (seq, winner) in winners {
                if !seq.contains(&VARIATION_SELECTOR_16) {
                    continue;
                }
                let stripped = seq
                    .iter()
                    .copied()
                    .filter(|&ch| ch != VARIATION_SELECTOR_16)
                    .collect::<Sequence>();
                let lone_bmp = matches!(stripped[..], [ch] if u32::from(ch) <= 0xFFFF);
                if stripped.is_empty() || lone_bmp {
                    continue;
                }
                if by_sequence.get(stripped.iter().copied()).is_none() {
                    by_sequence.insert(&stripped, winner);
                }
            }
        }

        let table = AliasTable {
            entries,
            texts,
            by_alias,
            by_sequence,
            max_alias_len,
            lenient_variation_selectors,
        };
        tracing::debug!(
            entries = table.len(),
            aliases = table.by_alias.len(),
            sequences = table.by_sequence.len(),
            max_alias_len = table.max_alias_len,
            max_sequence_len = table.max_sequence_len(),
            "alias table built"
        );
        Ok(table)
    }
}

fn pick_winner(entries: &[AliasEntry], seq: &[char], ids: &[u32]) -> Result<u32> {
    let canonical = |id: u32| entries[id as usize].canonical_name().to_owned();
    match ids {
        [] => Err(Error::InvalidEntry {
            canonical: String::new(),
            reason: "sequence group without entries",
        }),
        [only] => Ok(*only),
        [first, second, ..] => {
            let preferred = ids
                .iter()
                .copied()
                .filter(|&id| entries[id as usize].is_preferred())
                .collect::<SmallVec<[u32; 2]>>();
            match preferred[..] {
                [winner] => Ok(winner),
                [a, b, ..] => Err(Error::AmbiguousSequence {
                    sequence: hex_sequence(seq),
                    first: canonical(a),
                    second: canonical(b),
                }),
                [] => Err(Error::AmbiguousSequence {
                    sequence: hex_sequence(seq),
                    first: canonical(*first),
                    second: canonical(*second),
                }),
            }
        }
    }
}

fn parse_line(line_no: usize, line: &str) -> Result<Option<AliasEntry>> {
    let err = |message: String| Error::TableData {
        line: line_no,
        message,
    };
    let line = match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
    .trim();
    if line.is_empty() {
        return Ok(None);
    }

    let mut fields = line.split(';').map(str::trim);
    let codepoints = fields.next().unwrap_or("");
    let aliases = fields
        .next()
        .ok_or_else(|| err("expected '<codepoints> ; <aliases>'".into()))?;
    let preferred = match fields.next() {
        None | Some("") => false,
        Some("preferred") => true,
        Some(other) => return Err(err(format!("unknown flag '{}'", other))),
    };
    if fields.next().is_some() {
        return Err(err("too many fields".into()));
    }

    let mut sequence = Sequence::new();
    for hex in codepoints.split_whitespace() {
        let value = u32::from_str_radix(hex, 16)
            .map_err(|e| err(format!("bad codepoint '{}': {}", hex, e)))?;
        let ch = char::try_from(value)
            .map_err(|_| err(format!("U+{:04X} is not a scalar value", value)))?;
        sequence.push(ch);
    }

    let entry = AliasEntry::new(sequence, aliases.split_whitespace());
    Ok(Some(if preferred { entry.preferred() } else { entry }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grin_smile() -> AliasEntry {
        AliasEntry::new(['\u{1F601}'], ["grin", "smile"])
    }

    #[test]
    fn test_lookup_both_ways() {
        let table = AliasTable::builder().entry(grin_smile()).build().unwrap();
        assert_eq!(Some("😁"), table.emoji_for_alias("grin"));
        assert_eq!(Some("😁"), table.emoji_for_alias("smile"));
        assert_eq!(Some("grin"), table.alias_for_emoji("😁"));
        assert_eq!(
            Some("grin"),
            table
                .lookup_sequence(&['\u{1F601}'])
                .map(AliasEntry::canonical_name)
        );
        assert!(table.lookup_alias("grinning").is_none());
        assert_eq!(5, table.max_alias_len());
        assert_eq!(4, table.max_sequence_len());
    }

    #[test]
    fn test_duplicate_alias_rejected() {
        let result = AliasTable::builder()
            .entry(grin_smile())
            .entry(AliasEntry::new(['\u{1F604}'], ["smile"]))
            .build();
        match result {
            Err(Error::DuplicateAlias {
                alias,
                first,
                second,
            }) => {
                assert_eq!("smile", alias);
                assert_eq!("grin", first);
                assert_eq!("smile", second);
            }
            other => panic!("expected DuplicateAlias, got {:?}", other),
        }
    }

    #[test]
    fn test_shared_sequence_needs_precedence() {
        let ambiguous = AliasTable::builder()
            .entry(AliasEntry::new(['\u{1F44D}'], ["+1"]))
            .entry(AliasEntry::new(['\u{1F44D}'], ["thumbsup"]))
            .build();
        assert!(matches!(ambiguous, Err(Error::AmbiguousSequence { .. })));

        let resolved = AliasTable::builder()
            .entry(AliasEntry::new(['\u{1F44D}'], ["+1"]))
            .entry(AliasEntry::new(['\u{1F44D}'], ["thumbsup"]).preferred())
            .build()
            .unwrap();
        assert_eq!(Some("thumbsup"), resolved.alias_for_emoji("👍"));
        assert_eq!(Some("👍"), resolved.emoji_for_alias("+1"));
    }

    #[test]
    fn test_invalid_entries_rejected() {
        let empty_seq = AliasTable::builder()
            .entry(AliasEntry::new(None, ["nothing"]))
            .build();
        assert!(matches!(empty_seq, Err(Error::InvalidEntry { .. })));

        let bad_alias = AliasTable::builder()
            .entry(AliasEntry::new(['x'], ["has space"]))
            .build();
        assert!(matches!(bad_alias, Err(Error::InvalidEntry { .. })));
    }

    #[test]
    fn test_lenient_variation_selectors() {
        let data = "1F441 FE0F ; eye\n2764 FE0F ; heart\n0023 FE0F 20E3 ; hash\n";
        let table = data.parse::<AliasTable>().unwrap();
        assert_eq!(Some("eye"), table.alias_for_emoji("\u{1F441}\u{FE0F}"));
        assert_eq!(Some("eye"), table.alias_for_emoji("\u{1F441}"));
        assert_eq!(Some("hash"), table.alias_for_emoji("#\u{20E3}"));
        assert_eq!(None, table.alias_for_emoji("\u{2764}"));
        assert_eq!(Some("eye"), table.alias_for_emoji("\u{1F441}\u{FE0F}\u{FE0F}"));
        assert!(table.lenient_variation_selectors());

        let strict = AliasTable::builder()
            .lenient_variation_selectors(false)
            .parse(data)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(None, strict.alias_for_emoji("\u{1F441}"));
        assert_eq!(None, strict.alias_for_emoji("\u{2764}\u{FE0F}\u{FE0F}"));
    }

    #[test]
    fn test_parse_errors_carry_line() {
        let err = "1F601 ; grin\nZZZ ; bad\n".parse::<AliasTable>().unwrap_err();
        assert!(matches!(err, Error::TableData { line: 2, .. }));
        let err = "1F601 grin\n".parse::<AliasTable>().unwrap_err();
        assert!(matches!(err, Error::TableData { line: 1, .. }));
        let err = "1F601 ; grin ; sometimes\n".parse::<AliasTable>().unwrap_err();
        assert!(matches!(err, Error::TableData { line: 1, .. }));
    }

    #[test]
    fn test_parse_comments_and_flags() {
        let data = "# header\n\n1F44D ; +1 thumbsup  # trailing\n1F44D ; like ; preferred\n";
        let table = data.parse::<AliasTable>().unwrap();
        assert_eq!(2, table.len());
        assert_eq!(Some("like"), table.alias_for_emoji("👍"));
    }

    #[test]
    fn test_listing_sorted() {
        let table = AliasTable::builder()
            .entry(grin_smile())
            .entry(AliasEntry::new(['\u{1F4AF}'], ["100"]))
            .build()
            .unwrap();
        assert_eq!(
            vec!["💯 :100:", "😁 :grin:", "😁 :smile:"],
            table.listing()
        );
    }

    #[test]
    fn test_entry_display() {
        assert_eq!("😁 :grin:", grin_smile().to_string());
    }

    #[test]
    fn test_embedded_table_builds() {
        let table = AliasTable::embedded().unwrap();
        assert!(table.len() > 3000);
        assert!(table.listing().len() > 2000);
        assert_eq!(Some("😁"), table.emoji_for_alias("grin"));
        assert_eq!(Some("👍"), table.emoji_for_alias("+1"));
        assert_eq!(
            Some("thumbsup"),
            table
                .lookup_alias("+1")
                .and_then(|e| e.aliases().get(1))
                .map(String::as_str)
        );
        assert_eq!(Some("wave_tone1"), table.alias_for_emoji("👋🏻"));
        assert_eq!(Some("+1_tone1"), table.alias_for_emoji("👍🏻"));
        assert_eq!(Some("🐈\u{200D}⬛"), table.emoji_for_alias("black_cat"));
        assert_eq!(Some("🧑\u{200D}🚒"), table.emoji_for_alias("firefighter"));
        assert_eq!(Some("🇦🇷"), table.emoji_for_alias("argentina"));
        assert!(table.lookup_sequence(&['\u{1F1E6}']).is_none());
    }
}
