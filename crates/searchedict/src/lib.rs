//! Indexes EDICT dictionary files for exact-key lookup and aligns kanji with their kana readings
//! to produce Anki-style furigana.

pub mod edict;
pub mod error;
pub mod furigana;
pub mod kanjidic;

pub use edict::{
    entry::DictionaryEntry,
    index::{build_index, build_index_with_progress, BuildOptions, Edict},
    search::{Dictionary, EdictIndex, Guess},
};
pub use error::{SearchedictError, SearchedictResult};
pub use furigana::{
    furigana_from_kanji_kana,
    matcher::{match_kanji_kana, Matches, Segment, Segmentation},
};
pub use kanjidic::{Kanjidic, ReadingTable};

// hiragana and katakana, including the small and voiced forms
fn is_kana(c: char) -> bool {
    ('\u{3041}'..='\u{3096}').contains(&c) || ('\u{30A1}'..='\u{30FA}').contains(&c)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn recognises_kana() {
        assert!(is_kana('え'));
        assert!(is_kana('ギ'));
        assert!(!is_kana('考'));
        assert!(!is_kana('k'));
    }
}
