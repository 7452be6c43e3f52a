//! Kanji to reading lookup, and a parser for the text edition of KANJIDIC.
//! See <https://www.edrdg.org/kanjidic/kanjidic_doc_legacy.html>

use crate::{
    error::{SearchedictError, SearchedictResult},
    is_kana,
};
use encoding_rs::EUC_JP;
use std::{collections::HashMap, fs::File, io::Read, path::Path};
use wana_kana::ConvertJapanese;

/// Maps a single character to its candidate readings, in order of preference.
pub trait ReadingTable {
    fn readings(&self, kanji: char) -> Option<&[String]>;
}

impl ReadingTable for HashMap<char, Vec<String>> {
    fn readings(&self, kanji: char) -> Option<&[String]> {
        self.get(&kanji).map(Vec::as_slice)
    }
}

impl ReadingTable for HashMap<String, Vec<String>> {
    fn readings(&self, kanji: char) -> Option<&[String]> {
        let mut buf = [0; 4];
        self.get(&*kanji.encode_utf8(&mut buf))
            .map(Vec::as_slice)
    }
}

/// The readings of each kanji in KANJIDIC, in hiragana.
#[derive(Debug, Clone, Default)]
pub struct Kanjidic {
    kanji_to_readings: HashMap<char, Vec<String>>,
}

impl Kanjidic {
    pub fn open(path: &Path) -> SearchedictResult<Self> {
        let file = File::open(path).map_err(SearchedictError::read(path))?;
        Self::from(file).map_err(|err| match err {
            SearchedictError::Read { source, .. } => SearchedictError::Read {
                path: path.to_path_buf(),
                source,
            },
            SearchedictError::Encoding { encoding, .. } => SearchedictError::Encoding {
                path: path.to_path_buf(),
                encoding,
            },
            other => other,
        })
    }

    pub fn from<R: Read>(mut r: R) -> SearchedictResult<Self> {
        let mut buf = vec![];
        r.read_to_end(&mut buf)
            .map_err(SearchedictError::read("<kanjidic>"))?;

        // KANJIDIC is EUC-JP encoded
        let text = EUC_JP
            .decode_without_bom_handling_and_without_replacement(&buf)
            .ok_or_else(|| SearchedictError::Encoding {
                path: "<kanjidic>".into(),
                encoding: EUC_JP.name(),
            })?;
        Ok(Self::parse(&text))
    }

    /// Parses the decoded contents of KANJIDIC.
    pub fn parse(text: &str) -> Self {
        let kanji_to_readings = text
            .lines()
            // the header is commented with a full-width ＃
            .filter(|line| !line.starts_with(&['#', '＃'][..]))
            .filter_map(parse_line)
            .collect();
        Self { kanji_to_readings }
    }

    pub fn get(&self, kanji: char) -> Option<&[String]> {
        self.kanji_to_readings.get(&kanji).map(Vec::as_slice)
    }

    pub fn insert(&mut self, kanji: char, readings: Vec<String>) {
        self.kanji_to_readings.insert(kanji, readings);
    }

    pub fn len(&self) -> usize {
        self.kanji_to_readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kanji_to_readings.is_empty()
    }
}

impl ReadingTable for Kanjidic {
    fn readings(&self, kanji: char) -> Option<&[String]> {
        self.get(kanji)
    }
}

impl FromIterator<(char, Vec<String>)> for Kanjidic {
    fn from_iter<I: IntoIterator<Item = (char, Vec<String>)>>(iter: I) -> Self {
        Self {
            kanji_to_readings: iter.into_iter().collect(),
        }
    }
}

// the lines are formatted {kanji} {codes...} {readings...} [T1 {nanori...}] {meanings...}
// e.g. 亜 3021 U4e9c B1 ... ア つ.ぐ T1 や つぐ {Asia} {rank next}
fn parse_line(line: &str) -> Option<(char, Vec<String>)> {
    let mut fields = line.split_whitespace();
    let mut chars = fields.next()?.chars();
    let (Some(kanji), None) = (chars.next(), chars.next()) else {
        return None;
    };

    let mut readings: Vec<String> = vec![];
    for field in fields.take_while(|f| !f.starts_with('{') && !matches!(*f, "T1" | "T2")) {
        let reading = field.trim_matches('-');
        if !reading.starts_with(is_kana) {
            continue;
        }
        // okurigana follows the dot
        let stem = reading.split('.').next().unwrap_or(reading).replace('-', "");
        let hiragana = stem.as_str().to_hiragana();
        if !hiragana.is_empty() && !readings.contains(&hiragana) {
            readings.push(hiragana);
        }
    }
    // kanji without readings read as themselves
    if readings.is_empty() {
        return None;
    }
    Some((kanji, readings))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::furigana::matcher::match_kanji_kana;

    const KANJIDIC: &str = "# KANJIDIC JIS X 0208 Kanji Dictionary File/
亜 3021 U4e9c B1 C7 G8 S7 XJ13D0B F1509 N43 V81 Yya4 Wa ア つ.ぐ T1 や つぐ {Asia} {rank next}
日 467C U65e5 B72 G1 S4 F1 N2097 V2410 Yri4 Wil ニチ ジツ ひ -び -か T1 あ あき いる く くさ {day} {sun}
牛 356D U725b B93 G2 S4 F1202 N2962 V3561 Yniu2 Wu ギュウ うし {cow}
";

    #[test]
    fn parses_readings() {
        let kanjidic = Kanjidic::parse(KANJIDIC);
        assert_eq!(kanjidic.len(), 3);
        assert_eq!(kanjidic.get('亜').unwrap(), &["あ", "つ"]);
        assert_eq!(kanjidic.get('日').unwrap(), &["にち", "じつ", "ひ", "び", "か"]);
        assert_eq!(kanjidic.get('牛').unwrap(), &["ぎゅう", "うし"]);
        assert!(kanjidic.get('肉').is_none());
    }

    #[test]
    fn skips_header_and_kanji_without_readings() {
        let text = "＃ KANJIDIC JIS X 0208 Kanji Dictionary File/
牛 356D U725b B93 {cow}
肉 4179 U8089 B130 ニク {meat}
";
        let kanjidic = Kanjidic::parse(text);
        assert_eq!(kanjidic.len(), 1);
        assert!(kanjidic.readings('＃').is_none());
        assert!(kanjidic.readings('牛').is_none());

        let first = match_kanji_kana("＃肉", "＃にく", &kanjidic).next().unwrap();
        assert!(!first.fallback);
        assert_eq!(first.to_furigana(), "＃ 肉[にく]");
    }

    #[test]
    fn decodes_euc_jp() {
        let (bytes, _, _) = EUC_JP.encode(KANJIDIC);
        let kanjidic = Kanjidic::from(&*bytes).unwrap();
        assert_eq!(kanjidic.readings('牛').unwrap(), &["ぎゅう", "うし"]);
    }

    #[test]
    fn rejects_invalid_encoding() {
        let err = Kanjidic::from(&[0xffu8, 0xff][..]).unwrap_err();
        assert!(matches!(err, SearchedictError::Encoding { .. }), "{err:?}");
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kanjidic");
        let err = Kanjidic::open(&path).unwrap_err();
        assert!(
            matches!(&err, SearchedictError::Read { path: p, .. } if p == &path),
            "{err:?}"
        );
    }

    #[test]
    fn maps_implement_reading_table() {
        let by_char = HashMap::from([('肉', vec!["にく".to_string()])]);
        let by_string = HashMap::from([("肉".to_string(), vec!["にく".to_string()])]);
        assert_eq!(by_char.readings('肉').unwrap(), &["にく"]);
        assert_eq!(by_string.readings('肉').unwrap(), &["にく"]);
        assert!(by_string.readings('牛').is_none());
    }
}
