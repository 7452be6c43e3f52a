//! Exact-key lookup of dictionary entries through a built index.

use super::{entry::DictionaryEntry, lines};
use crate::error::{SearchedictError, SearchedictResult};
use encoding_rs::Encoding;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// A parsed index file.
#[derive(Debug, Clone, Default)]
pub struct EdictIndex {
    // sorted
    keys: Vec<String>,
    offsets: Vec<Vec<u64>>,
}

impl EdictIndex {
    pub fn open(path: &Path) -> SearchedictResult<Self> {
        let text = fs::read_to_string(path).map_err(SearchedictError::read(path))?;
        Self::parse(&text).map_err(|line| SearchedictError::MalformedIndex {
            path: path.to_path_buf(),
            line,
        })
    }

    /// Parses the contents of an index file.
    /// On failure, returns the number of the first malformed line, starting from 1.
    pub fn parse(text: &str) -> Result<Self, usize> {
        let mut index = Self::default();
        for (idx, line) in text.lines().enumerate() {
            let line_number = idx + 1;
            let (key, offsets) = line.split_once(' ').ok_or(line_number)?;
            if index.keys.last().map(|last| last.as_str() >= key).unwrap_or_default() {
                return Err(line_number);
            }
            let offsets = offsets
                .split(' ')
                .map(str::parse)
                .collect::<Result<Vec<u64>, _>>()
                .map_err(|_| line_number)?;
            index.keys.push(key.to_string());
            index.offsets.push(offsets);
        }
        Ok(index)
    }

    /// The offsets of the lines that contain `key`, ascending.
    pub fn offsets(&self, key: &str) -> &[u64] {
        match self.keys.binary_search_by(|k| k.as_str().cmp(key)) {
            Ok(idx) => &self.offsets[idx],
            Err(_) => &[],
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// The result of looking up the entry for a word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guess {
    NotFound,
    Unique(DictionaryEntry),
    Ambiguous(Vec<DictionaryEntry>),
}

/// A dictionary file together with its index.
#[derive(Debug)]
pub struct Dictionary {
    source: Vec<u8>,
    encoding: &'static Encoding,
    index: EdictIndex,
}

impl Dictionary {
    pub fn open(
        source: &Path,
        index: &Path,
        encoding: &'static Encoding,
    ) -> SearchedictResult<Self> {
        let index = EdictIndex::open(index)?;
        let source = fs::read(source).map_err(SearchedictError::read(source))?;
        Ok(Self::new(source, index, encoding))
    }

    pub fn new(source: Vec<u8>, index: EdictIndex, encoding: &'static Encoding) -> Self {
        Self {
            source,
            encoding,
            index,
        }
    }

    pub fn index(&self) -> &EdictIndex {
        &self.index
    }

    /// Parses the line starting at `offset`.
    pub fn entry_at(&self, offset: u64) -> Option<DictionaryEntry> {
        let start = usize::try_from(offset).ok()?;
        let (_, line) = lines(self.source.get(start..)?).next()?;
        let text = self
            .encoding
            .decode_without_bom_handling_and_without_replacement(line)?;
        DictionaryEntry::parse(&text, offset)
    }

    /// The entries with `key` as a writing or reading.
    pub fn search(&self, key: &str) -> Vec<DictionaryEntry> {
        self.index
            .offsets(key)
            .iter()
            .filter_map(|offset| {
                let entry = self.entry_at(*offset);
                if entry.is_none() {
                    tracing::warn!("index entry {offset} for {key} does not point to an entry");
                }
                entry
            })
            .collect()
    }

    /// Finds the entry with both the given kanji and kana among its writings and readings.
    pub fn guess(&self, kanji: Option<&str>, kana: Option<&str>) -> Guess {
        let Some(key) = kanji.or(kana) else {
            return Guess::NotFound;
        };
        let mut entries = self
            .search(key)
            .into_iter()
            .filter(|entry| {
                [kanji, kana]
                    .into_iter()
                    .flatten()
                    .all(|wanted| entry.keys().any(|k| k == wanted))
            })
            .collect::<Vec<_>>();
        match entries.len() {
            0 => Guess::NotFound,
            1 => Guess::Unique(entries.remove(0)),
            _ => Guess::Ambiguous(entries),
        }
    }
}

/// The default location of the index for the dictionary at `source`, next to it.
pub fn default_index_path(source: &Path) -> PathBuf {
    let mut file_name = source.file_name().unwrap_or_default().to_os_string();
    file_name.push(".index");
    source.with_file_name(file_name)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::edict::index::Edict;
    use encoding_rs::EUC_JP;

    const EDICT: &str = "牛肉 [ぎゅうにく] /(n) beef/(P)/EntL1255620X/
牛 [うし(P);ぎゅう] /(n) (1) cattle/(2) beef/(P)/EntL1255530X/
日本 [にほん] /(n) Japan/EntL1582710X/
二本 [にほん] /(n) two long things/EntL2000000X/
";

    fn dictionary() -> Dictionary {
        let (source, _, _) = EUC_JP.encode(EDICT);
        let edict = Edict::from_bytes(&source, EUC_JP);
        let mut index = vec![];
        edict.write_index(&mut index).unwrap();
        let index = EdictIndex::parse(std::str::from_utf8(&index).unwrap()).unwrap();
        Dictionary::new(source.into_owned(), index, EUC_JP)
    }

    #[test]
    fn finds_entries_by_key() {
        let dictionary = dictionary();
        let beef = dictionary.search("ぎゅう");
        assert_eq!(beef.len(), 1);
        assert_eq!(beef[0].writings, &["牛"]);
        assert_eq!(dictionary.search("にほん").len(), 2);
        assert!(dictionary.search("にく").is_empty());
    }

    #[test]
    fn every_offset_parses_to_an_entry_with_its_key() {
        let dictionary = dictionary();
        for key in dictionary.index().keys() {
            for offset in dictionary.index().offsets(key) {
                let entry = dictionary.entry_at(*offset).unwrap();
                assert!(entry.keys().any(|k| k == key), "{key} {entry:?}");
            }
        }
    }

    #[test]
    fn guesses_unique_entry() {
        let dictionary = dictionary();
        match dictionary.guess(Some("日本"), Some("にほん")) {
            Guess::Unique(entry) => assert_eq!(entry.sequence_number(), Some(1582710)),
            other => panic!("{other:?}"),
        }
        assert!(matches!(
            dictionary.guess(None, Some("にほん")),
            Guess::Ambiguous(entries) if entries.len() == 2
        ));
        assert_eq!(dictionary.guess(Some("日本"), Some("にっぽん")), Guess::NotFound);
        assert_eq!(dictionary.guess(None, None), Guess::NotFound);
    }

    #[test]
    fn entry_at_rejects_out_of_range() {
        let dictionary = dictionary();
        assert!(dictionary.entry_at(u64::MAX).is_none());
        assert!(dictionary.entry_at(EUC_JP.encode(EDICT).0.len() as u64).is_none());
    }

    #[test]
    fn rejects_malformed_index() {
        assert_eq!(EdictIndex::parse("b 1\na 2\n").unwrap_err(), 2);
        assert_eq!(EdictIndex::parse("a 1\na 2\n").unwrap_err(), 2);
        assert_eq!(EdictIndex::parse("a\n").unwrap_err(), 1);
        assert_eq!(EdictIndex::parse("a 1 x\n").unwrap_err(), 1);
        assert!(EdictIndex::parse("").unwrap().is_empty());
    }

    #[test]
    fn looks_up_offsets() {
        let index = EdictIndex::parse("あ 0 10\nい 5\n").unwrap();
        assert_eq!(index.offsets("あ"), &[0, 10]);
        assert_eq!(index.offsets("い"), &[5]);
        assert!(index.offsets("う").is_empty());
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn malformed_index_file_reports_path_and_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edict.index");
        fs::write(&path, "a 1\nb\n").unwrap();
        let err = EdictIndex::open(&path).unwrap_err();
        assert!(
            matches!(&err, SearchedictError::MalformedIndex { line: 2, path: p } if p == &path),
            "{err:?}"
        );
    }

    #[test]
    fn index_path_is_next_to_source() {
        assert_eq!(
            default_index_path(Path::new("data/edict2")),
            Path::new("data/edict2.index")
        );
    }
}
