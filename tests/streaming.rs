use emojify::{
    decode, decode_str, encode, encode_str, AliasEntry, AliasTable, Config, Direction, Pipeline,
    Translation,
};
use proptest::prelude::*;
use std::{io::Cursor, sync::OnceLock, thread};

fn table() -> &'static AliasTable {
    static TABLE: OnceLock<AliasTable> = OnceLock::new();
    TABLE.get_or_init(|| AliasTable::embedded().expect("embedded table"))
}

fn translate_split(direction: Direction, input: &[u8], at: usize) -> Vec<u8> {
    let mut translation = Translation::new(table(), direction);
    let mut out = Vec::new();
    translation.feed(&input[..at], &mut out);
    translation.feed(&input[at..], &mut out);
    translation.finish(&mut out);
    out
}

fn translate_whole(direction: Direction, input: &[u8]) -> Vec<u8> {
    let mut translation = Translation::new(table(), direction);
    let mut out = Vec::new();
    translation.feed(input, &mut out);
    translation.finish(&mut out);
    out
}

#[test]
fn encode_known_inputs() {
    let cases = [
        ("Hello :grin: world", "Hello 😁 world"),
        (":not_an_emoji:point_right:", ":not_an_emoji👉"),
        ("::::point_right:", ":::👉"),
        ("great :+1::+1::-1:", "great 👍👍👎"),
        ("emojis :grin::grin: :tada:yay:champagne:", "emojis 😁😁 🎉yay🍾"),
        (":smile: :invalid_xyz: :heart:", "😄 :invalid_xyz: ❤\u{FE0F}"),
        ("Incomplete :abc", "Incomplete :abc"),
        (":invalid@emoji:", ":invalid@emoji:"),
        ("Enter the :airplane:!", "Enter the ✈\u{FE0F}!"),
        (":thumbsup: and :+1: agree", "👍 and 👍 agree"),
        ("a :notareal: b", "a :notareal: b"),
        ("", ""),
    ];
    for (input, expected) in cases.iter() {
        assert_eq!(*expected, encode_str(table(), input), "input {:?}", input);
    }
}

#[test]
fn decode_known_inputs() {
    let cases = [
        ("Hello 😁 world", "Hello :grin: world"),
        ("waving 👋🏻", "waving :wave_tone1:"),
        ("emojis 😁😁 🎉", "emojis :grin::grin: :tada:"),
        ("Café 😄 naïve 🚀", "Café :smile: naïve :rocket:"),
        ("👍 means :+1:", ":+1: means :+1:"),
        ("\u{2B50}\u{FE0F} and \u{2B50}", ":star: and :star:"),
        ("\u{1F441} sees", ":eye: sees"),
        ("\u{2764} stays text", "\u{2764} stays text"),
        ("#hashtag", "#hashtag"),
        ("👨\u{200D}💻 at work", ":man_technologist: at work"),
        ("❤\u{FE0F}\u{200D}🔥", ":heart_on_fire:"),
        ("🧑\u{200D}🚒", ":firefighter:"),
        ("🐈\u{200D}⬛ and 🐈", ":black_cat: and :cat2:"),
        ("🐈\u{200D}🔥 is not an emoji", "🐈\u{200D}🔥 is not an emoji"),
        ("👋🏿\u{200D}🔥", "👋🏿\u{200D}🔥"),
        ("🇦🇷🇺🇸", ":argentina::us:"),
        ("🇦🇦🇺🇸", "🇦🇦:us:"),
        ("🇺🇸🇺", ":us:🇺"),
    ];
    for (input, expected) in cases.iter() {
        assert_eq!(*expected, decode_str(table(), input), "input {:?}", input);
    }
}

#[test]
fn canonical_alias_wins_decode() {
    let table = AliasTable::builder()
        .entry(AliasEntry::new(['\u{1F601}'], ["grin", "smile"]))
        .build()
        .unwrap();
    assert_eq!(":grin:", decode_str(&table, "😁"));
    assert_eq!("😁😁", encode_str(&table, ":grin::smile:"));
}

#[test]
fn every_alias_round_trips_to_canonical() {
    for entry in table().entries() {
        let canonical = format!(":{}:", entry.canonical_name());
        for alias in entry.aliases() {
            let encoded = encode_str(table(), &format!(":{}:", alias));
            assert_ne!(format!(":{}:", alias), encoded, "alias {} did not encode", alias);
            assert_eq!(canonical, decode_str(table(), &encoded), "alias {}", alias);
        }
    }
}

#[test]
fn invalid_utf8_passes_through() {
    let input = b"\xFF :grin: \xF0\x9F\x98 \xC0\x80 \xF0\x9F\x98\x81\xF0\x9F";
    let mut out = Vec::new();
    encode(table(), Cursor::new(&input[..]), &mut out).unwrap();
    assert_eq!(&b"\xFF \xF0\x9F\x98\x81 \xF0\x9F\x98 \xC0\x80 \xF0\x9F\x98\x81\xF0\x9F"[..], &out[..]);

    let mut out = Vec::new();
    let summary = decode(table(), Cursor::new(&input[..]), &mut out).unwrap();
    assert_eq!(&b"\xFF :grin: \xF0\x9F\x98 \xC0\x80 :grin:\xF0\x9F"[..], &out[..]);
    assert_eq!(1, summary.substitutions);
}

#[test]
fn small_chunks_match_large_chunks() {
    let text = "Deploy 🚀 :rocket: by 👨\u{200D}💻, :wave_tone1: 👋🏻👋 :+1::-1: done :tada";
    for direction in [Direction::Encode, Direction::Decode] {
        let expected = translate_whole(direction, text.as_bytes());
        for chunk_size in 1..=9 {
            let config = Config {
                chunk_size,
                ..Config::default()
            };
            let mut out = Vec::new();
            Pipeline::new(table(), direction, &config)
                .unwrap()
                .run(text.as_bytes(), &mut out)
                .unwrap();
            assert_eq!(expected, out, "{:?} with chunk size {}", direction, chunk_size);
        }
    }
}

#[test]
fn table_is_shared_across_threads() {
    let inputs = [
        ":grin: one",
        ":wave_tone1: two",
        ":tada::tada: three",
        "four :rocket:",
    ];
    thread::scope(|scope| {
        let handles = inputs
            .iter()
            .map(|input| {
                scope.spawn(move || {
                    let mut encoded = Vec::new();
                    encode(table(), input.as_bytes(), &mut encoded).unwrap();
                    let mut decoded = Vec::new();
                    decode(table(), &encoded[..], &mut decoded).unwrap();
                    decoded
                })
            })
            .collect::<Vec<_>>();
        for (input, handle) in inputs.iter().zip(handles) {
            assert_eq!(input.as_bytes(), &handle.join().unwrap()[..]);
        }
    });
}

fn fragment() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        ":grin:",
        ":wave_tone1:",
        ":wave",
        ":",
        "::",
        ":+1",
        "1:",
        "👋",
        "🏻",
        "👋🏻",
        "😁",
        "\u{FE0F}",
        "\u{2B50}",
        "\u{2764}",
        "\u{200D}",
        "👨",
        "💻",
        "#",
        "\u{20E3}",
        "🇺",
        "🇸",
        "🇦",
        "🇷",
        "🔥",
        "🐈",
        "\u{301}",
        "abc",
        " ",
        "é",
    ])
}

proptest! {
    #[test]
    fn literal_text_is_identity(text in "[a-zA-Z0-9 .,;!?_+#*éñ中-]{0,64}") {
        prop_assert_eq!(&text, &encode_str(table(), &text));
        prop_assert_eq!(&text, &decode_str(table(), &text));
    }

    #[test]
    fn bytes_without_colons_encode_unchanged(
        bytes in prop::collection::vec(any::<u8>().prop_filter("colon", |b| *b != b':'), 0..64),
    ) {
        prop_assert_eq!(&bytes, &translate_whole(Direction::Encode, &bytes));
    }

    #[test]
    fn unknown_alias_degrades(name in "[a-z_]{1,12}") {
        let text = format!("a :nope_{}: b", name);
        prop_assert_eq!(&text, &encode_str(table(), &text));
    }

    #[test]
    fn any_split_gives_same_output(parts in prop::collection::vec(fragment(), 0..12)) {
        let input = parts.concat();
        let bytes = input.as_bytes();
        for direction in [Direction::Encode, Direction::Decode] {
            let whole = translate_whole(direction, bytes);
            for at in 0..=bytes.len() {
                prop_assert_eq!(
                    &whole,
                    &translate_split(direction, bytes, at),
                    "{:?} split at {} of {:?}", direction, at, input
                );
            }
        }
    }
}
