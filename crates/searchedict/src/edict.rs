//! Parses, indexes and searches EDICT-format dictionary files.
//! See <https://www.edrdg.org/jmdict/edict.html>

pub mod entry;
pub mod index;
pub mod search;

use encoding_rs::{Encoding, EUC_JP};

/// The encoding the EDRDG distributes EDICT, EDICT2 and ENAMDICT in.
pub const SOURCE_ENCODING: &Encoding = EUC_JP;

// splits on \n and yields each line with the byte offset of its first byte
// a trailing \r is dropped so that CRLF files parse the same way
pub(crate) fn lines(data: &[u8]) -> impl Iterator<Item = (u64, &[u8])> {
    data.split(|b| *b == b'\n').scan(0, |offset: &mut u64, line| {
        let start = *offset;
        *offset += line.len() as u64 + 1;
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        Some((start, line))
    })
}
