//! Aligns the characters of a word with its reading.

use crate::kanjidic::ReadingTable;
use serde::Serialize;
use std::collections::VecDeque;

/// Stands for the reading of the preceding kanji, as in 人々.
pub const REPEAT_MARK: char = '々';

/// A unit of the word and the part of the reading that belongs to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Segment<'a> {
    pub unit: &'a str,
    pub reading: &'a str,
}

impl<'a> Segment<'a> {
    pub fn new(unit: &'a str, reading: &'a str) -> Self {
        Self { unit, reading }
    }

    /// Whether the unit stands for itself, i.e. is already kana.
    pub fn is_bare(&self) -> bool {
        self.unit == self.reading
    }
}

/// A way to split a word and its reading into segments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segmentation<'a> {
    pub segments: Vec<Segment<'a>>,
    /// Set for the single segment covering the whole word that is yielded after all real
    /// alignments, whether or not any were found.
    pub fallback: bool,
}

impl Segmentation<'_> {
    pub fn to_furigana(&self) -> String {
        super::format(&self.segments)
    }
}

/// Returns an iterator over every way to align `kanji` with `kana` using the readings in `table`,
/// e.g. 牛肉 and ぎゅうにく give 牛 ぎゅう, 肉 にく.
///
/// Alignments that consume fewer characters are yielded first. The last item is always the
/// fallback segmentation pairing the whole of `kanji` with the whole of `kana`, so the iterator is
/// never empty.
pub fn match_kanji_kana<'a, T>(kanji: &'a str, kana: &'a str, table: &'a T) -> Matches<'a, T>
where
    T: ReadingTable + ?Sized,
{
    Matches {
        kanji,
        kana,
        table,
        queue: VecDeque::from([State {
            segments: vec![],
            kanji,
            kana,
        }]),
        fallback_yielded: false,
    }
}

/// Iterator returned by [`match_kanji_kana`].
#[derive(Debug)]
pub struct Matches<'a, T: ?Sized> {
    kanji: &'a str,
    kana: &'a str,
    table: &'a T,
    queue: VecDeque<State<'a>>,
    fallback_yielded: bool,
}

#[derive(Debug, Clone)]
struct State<'a> {
    segments: Vec<Segment<'a>>,
    // the parts left to align
    kanji: &'a str,
    kana: &'a str,
}

impl<'a, T> Matches<'a, T>
where
    T: ReadingTable + ?Sized,
{
    fn expand(&mut self, state: State<'a>) {
        let Some(c) = state.kanji.chars().next() else {
            return;
        };
        let (unit, remaining_kanji) = state.kanji.split_at(c.len_utf8());
        let table = self.table;

        let candidates: Vec<&str> = match state.segments.last() {
            // TODO: also try the voiced reading, e.g. ひと for 人 in 人々
            Some(previous) if c == REPEAT_MARK => vec![previous.reading],
            _ => match table.readings(c) {
                Some(readings) => readings.iter().map(String::as_str).collect(),
                None => vec![unit],
            },
        };

        for candidate in candidates {
            if let Some(remaining_kana) = state.kana.strip_prefix(candidate) {
                let reading = &state.kana[..candidate.len()];
                tracing::trace!("{unit} can be read as {reading}");
                let mut segments = state.segments.clone();
                segments.push(Segment::new(unit, reading));
                self.queue.push_back(State {
                    segments,
                    kanji: remaining_kanji,
                    kana: remaining_kana,
                });
            }
        }
    }
}

impl<'a, T> Iterator for Matches<'a, T>
where
    T: ReadingTable + ?Sized,
{
    type Item = Segmentation<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(state) = self.queue.pop_front() {
            match (state.kanji.is_empty(), state.kana.is_empty()) {
                (true, true) => {
                    return Some(Segmentation {
                        segments: state.segments,
                        fallback: false,
                    })
                }
                // one side ran out before the other
                (true, false) | (false, true) => continue,
                (false, false) => self.expand(state),
            }
        }

        if self.fallback_yielded {
            return None;
        }
        self.fallback_yielded = true;
        tracing::debug!("yielding fallback alignment of {} with {}", self.kanji, self.kana);
        Some(Segmentation {
            segments: vec![Segment::new(self.kanji, self.kana)],
            fallback: true,
        })
    }
}
