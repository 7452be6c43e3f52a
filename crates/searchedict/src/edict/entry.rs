//! Models and parses a single EDICT line.
//!
//! The lines are formatted `KANJI1;KANJI2 [KANA1;KANA2] /gloss/gloss/EntL1234567X/`,
//! where the reading field is absent for entries written in kana only.

use crate::{furigana, kanjidic::ReadingTable};
use serde::Serialize;
use std::{
    borrow::Cow,
    hash::{Hash, Hasher},
};

/// One dictionary entry, identified by the byte offset of its line in the source file.
#[derive(Debug, Clone, Serialize)]
pub struct DictionaryEntry {
    /// Never empty for parsed entries.
    pub writings: Vec<String>,
    pub readings: Vec<String>,
    pub glosses: String,
    pub line: String,
    pub offset: u64,
}

impl DictionaryEntry {
    /// Parses a decoded line that starts at `offset` in the source file.
    /// Returns `None` for lines that are not entries, such as the header or blank lines.
    pub fn parse(line: &str, offset: u64) -> Option<Self> {
        let (head, rest) = line.split_once(" /")?;
        let glosses = rest.strip_suffix('/')?;
        if glosses.is_empty() {
            return None;
        }

        let (writings, readings) = match head.split_once(" [") {
            Some((writings, readings)) => (writings, Some(readings.strip_suffix(']')?)),
            None => (head, None),
        };
        let writings = split_field(writings);
        if writings.is_empty() {
            return None;
        }
        let readings = readings.map(split_field).unwrap_or_default();
        // keys are written space-separated into the index
        if writings
            .iter()
            .chain(&readings)
            .any(|key| key.contains(char::is_whitespace))
        {
            return None;
        }

        Some(Self {
            writings,
            readings,
            glosses: glosses.to_string(),
            line: line.to_string(),
            offset,
        })
    }

    /// The writings followed by the readings, i.e. every string this entry is indexed under.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.writings
            .iter()
            .chain(&self.readings)
            .map(String::as_str)
    }

    /// The first writing, or an empty string if there is none.
    pub fn kanji(&self) -> &str {
        self.writings.first().map(String::as_str).unwrap_or_default()
    }

    /// The first reading, or the first writing for entries written in kana only.
    pub fn kana(&self) -> &str {
        self.readings
            .first()
            .map(String::as_str)
            .unwrap_or_else(|| self.kanji())
    }

    /// The gloss fields without the sequence marker.
    pub fn meanings(&self) -> Vec<&str> {
        self.glosses
            .split('/')
            .filter(|gloss| !gloss.is_empty() && sequence_marker(gloss).is_none())
            .collect()
    }

    /// The JMdict sequence number from the `EntL` marker, only present in EDICT2 lines.
    pub fn sequence_number(&self) -> Option<u32> {
        self.glosses.split('/').find_map(sequence_marker)
    }

    pub fn furigana<T>(&self, table: &T) -> String
    where
        T: ReadingTable + ?Sized,
    {
        furigana::furigana_from_kanji_kana(self.kanji(), self.kana(), table)
    }
}

// an entry is referenced from the bucket of each of its keys, so identity is the line's position
impl PartialEq for DictionaryEntry {
    fn eq(&self, other: &Self) -> bool {
        self.offset == other.offset
    }
}

impl Eq for DictionaryEntry {}

impl Hash for DictionaryEntry {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.offset.hash(state);
    }
}

fn split_field(field: &str) -> Vec<String> {
    let field = strip_markers(field);
    if field.is_empty() {
        return vec![];
    }
    field.split(';').map(String::from).collect()
}

// removes annotations such as (P), (iK) or (ok)
fn strip_markers(field: &str) -> Cow<'_, str> {
    if !field.contains('(') {
        return Cow::Borrowed(field);
    }

    let mut stripped = String::with_capacity(field.len());
    let mut rest = field;
    while let Some(open) = rest.find('(') {
        let Some(close) = rest[open..].find(')') else {
            break;
        };
        stripped.push_str(&rest[..open]);
        rest = &rest[open + close + 1..];
    }
    stripped.push_str(rest);
    Cow::Owned(stripped)
}

// EntL1234567 or EntL1234567X
fn sequence_marker(gloss: &str) -> Option<u32> {
    let digits = gloss.strip_prefix("EntL")?;
    let digits = digits.strip_suffix('X').unwrap_or(digits);
    digits.parse().ok()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_edict2_line() {
        let line = "日本(P);日本国 [にほん(P);にっぽん] /(n) Japan/(P)/EntL1582710X/";
        let entry = DictionaryEntry::parse(line, 42).unwrap();
        assert_eq!(entry.writings, &["日本", "日本国"]);
        assert_eq!(entry.readings, &["にほん", "にっぽん"]);
        assert_eq!(entry.glosses, "(n) Japan/(P)/EntL1582710X");
        assert_eq!(entry.line, line);
        assert_eq!(entry.offset, 42);
        assert_eq!(entry.sequence_number(), Some(1582710));
        assert_eq!(entry.meanings(), &["(n) Japan", "(P)"]);
        assert_eq!(
            entry.keys().collect::<Vec<_>>(),
            &["日本", "日本国", "にほん", "にっぽん"]
        );
    }

    #[test]
    fn parses_kana_only_line() {
        let entry = DictionaryEntry::parse("あっさり /(adv) easily/EntL1000380X/", 0).unwrap();
        assert_eq!(entry.writings, &["あっさり"]);
        assert!(entry.readings.is_empty());
        assert_eq!(entry.kanji(), "あっさり");
        assert_eq!(entry.kana(), "あっさり");
    }

    #[test]
    fn parses_edict_line_without_sequence_number() {
        let entry = DictionaryEntry::parse("牛肉 [ぎゅうにく] /(n) beef/", 7).unwrap();
        assert_eq!(entry.kanji(), "牛肉");
        assert_eq!(entry.kana(), "ぎゅうにく");
        assert_eq!(entry.sequence_number(), None);
        assert_eq!(entry.meanings(), &["(n) beef"]);
    }

    #[test]
    fn empty_reading_field_has_no_readings() {
        let entry = DictionaryEntry::parse("ＡＢ [(P)] /(n) test/", 0).unwrap();
        assert!(entry.readings.is_empty());
    }

    #[test]
    fn keeps_unmatched_parenthesis() {
        assert_eq!(strip_markers("a(b)c(d"), "ac(d");
        assert_eq!(strip_markers("(P)"), "");
    }

    #[test]
    fn rejects_non_entries() {
        assert!(DictionaryEntry::parse("", 0).is_none());
        assert!(DictionaryEntry::parse("# comment", 0).is_none());
        assert!(DictionaryEntry::parse(
            "　？？？ /EDICT, EDICT_SUB(P), EDICT2 Japanese-English Electronic Dictionary Files/",
            0
        )
        .is_none());
        assert!(DictionaryEntry::parse("日本 [にほん] //", 0).is_none());
        assert!(DictionaryEntry::parse("日本 [にほん /Japan/", 0).is_none());
        assert!(DictionaryEntry::parse("(P) /Japan/", 0).is_none());
    }

    #[test]
    fn entry_without_writings_has_empty_headword() {
        let entry = DictionaryEntry {
            writings: vec![],
            readings: vec![],
            glosses: "(n) test".to_string(),
            line: String::new(),
            offset: 0,
        };
        assert_eq!(entry.kanji(), "");
        assert_eq!(entry.kana(), "");

        let entry = DictionaryEntry {
            readings: vec!["にく".to_string()],
            ..entry
        };
        assert_eq!(entry.kanji(), "");
        assert_eq!(entry.kana(), "にく");
    }

    #[test]
    fn identity_is_offset() {
        let a = DictionaryEntry::parse("牛肉 [ぎゅうにく] /(n) beef/", 7).unwrap();
        let b = DictionaryEntry::parse("牛 [うし] /(n) cow/", 7).unwrap();
        let c = DictionaryEntry::parse("牛肉 [ぎゅうにく] /(n) beef/", 8).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
