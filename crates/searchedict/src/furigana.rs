//! Anki-style furigana, e.g. `食[た]べ 物[もの]`.
//!
//! A ruby group is a run of non-space characters directly followed by its reading in brackets.
//! A space before a group separates it from preceding kana and is not part of the text.

pub mod matcher;

use crate::kanjidic::ReadingTable;
use matcher::{match_kanji_kana, Segment};

/// Formats the best alignment of `kanji` with `kana` as furigana.
pub fn furigana_from_kanji_kana<T>(kanji: &str, kana: &str, table: &T) -> String
where
    T: ReadingTable + ?Sized,
{
    match match_kanji_kana(kanji, kana, table).next() {
        Some(segmentation) => segmentation.to_furigana(),
        // the matcher always yields at least the fallback
        None => format(&[Segment::new(kanji, kana)]),
    }
}

/// Formats segments as furigana, e.g. 牛 ぎゅう, 肉 にく as `牛[ぎゅう]肉[にく]`.
pub fn format(segments: &[Segment]) -> String {
    let mut furigana = String::new();
    let mut previous_was_bare = false;
    for segment in segments {
        if segment.is_bare() {
            furigana.push_str(segment.unit);
        } else {
            // keeps the kana from being read as part of the ruby group
            if previous_was_bare {
                furigana.push(' ');
            }
            furigana.push_str(segment.unit);
            furigana.push('[');
            furigana.push_str(segment.reading);
            furigana.push(']');
        }
        previous_was_bare = segment.is_bare();
    }
    furigana
}

/// The text without readings, e.g. `食[た]べ 物[もの]` gives 食べ物.
pub fn kanji(furigana: &str) -> String {
    replace_ruby(furigana, |base, _| base)
}

/// The text with every ruby group replaced by its reading, e.g. `食[た]べ 物[もの]` gives たべもの.
pub fn kana(furigana: &str) -> String {
    replace_ruby(furigana, |_, reading| reading)
}

fn replace_ruby<'a>(furigana: &'a str, replace: impl Fn(&'a str, &'a str) -> &'a str) -> String {
    let mut text = String::with_capacity(furigana.len());
    let mut rest = furigana;
    while let Some(open) = rest.find('[') {
        let Some(close) = rest[open..].find(']').map(|idx| open + idx) else {
            break;
        };
        let before = &rest[..open];
        let reading = &rest[open + 1..close];
        let base_start = before.rfind(' ').map(|idx| idx + 1).unwrap_or(0);
        let base = &before[base_start..];
        if base.is_empty() || reading.is_empty() {
            // not a ruby group
            text.push_str(&rest[..=close]);
        } else {
            let preceding = &before[..base_start];
            text.push_str(preceding.strip_suffix(' ').unwrap_or(preceding));
            text.push_str(replace(base, reading));
        }
        rest = &rest[close + 1..];
    }
    text.push_str(rest);
    text
}
