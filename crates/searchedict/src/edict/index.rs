//! Builds the sorted key to byte offset index of an EDICT file.
//!
//! The index is a UTF-8 text file with one line per key, formatted `{key} {offset_1} {offset_2} ...`,
//! with the keys in code point order and the offsets ascending. Each offset points to the start of a
//! line in the source file that contains the key as one of its writings or readings.

use super::{entry::DictionaryEntry, lines, SOURCE_ENCODING};
use crate::error::{SearchedictError, SearchedictResult};
use encoding_rs::Encoding;
use std::{
    collections::{HashMap, HashSet},
    fs,
    io::{self, BufWriter, Write},
    path::Path,
    rc::Rc,
    time::{Duration, Instant},
};

/// 2^-6 seconds.
pub const DEFAULT_PROGRESS_STEP: Duration = Duration::from_micros(15_625);

#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// The encoding of the source dictionary.
    pub encoding: &'static Encoding,
    /// The minimum time between two progress reports.
    pub progress_step: Duration,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            encoding: SOURCE_ENCODING,
            progress_step: DEFAULT_PROGRESS_STEP,
        }
    }
}

/// Builds an index for the dictionary at `source` and writes it to `output`.
pub fn build_index(source: &Path, output: &Path, options: &BuildOptions) -> SearchedictResult<()> {
    build_index_with_progress(source, output, options, |_| {})
}

/// Like [`build_index`], additionally reporting the progress of the build to `progress`
/// as a non-decreasing value from 0.0 to 1.0. The reading pass covers [0.0, 0.5] and the
/// writing pass [0.5, 1.0].
pub fn build_index_with_progress<F>(
    source: &Path,
    output: &Path,
    options: &BuildOptions,
    progress: F,
) -> SearchedictResult<()>
where
    F: FnMut(f64),
{
    let mut reporter = ProgressReporter::new(progress, options.progress_step);

    tracing::info!("reading {}", source.display());
    let data = fs::read(source).map_err(SearchedictError::read(source))?;
    let edict = Edict::accumulate(&data, options.encoding, &mut reporter);

    tracing::info!("writing {} keys to {}", edict.len(), output.display());
    edict.persist(output, &mut reporter)
}

/// All entries of a dictionary, grouped by each of their writings and readings.
#[derive(Debug, Default)]
pub struct Edict {
    entries: HashMap<String, HashSet<Rc<DictionaryEntry>>>,
}

impl Edict {
    /// Reads and parses the dictionary at `path`.
    pub fn load(path: &Path, options: &BuildOptions) -> SearchedictResult<Self> {
        Self::load_with_progress(path, options, |_| {})
    }

    /// Like [`Edict::load`], reporting progress from 0.0 to 0.5.
    pub fn load_with_progress<F>(
        path: &Path,
        options: &BuildOptions,
        progress: F,
    ) -> SearchedictResult<Self>
    where
        F: FnMut(f64),
    {
        let data = fs::read(path).map_err(SearchedictError::read(path))?;
        let mut reporter = ProgressReporter::new(progress, options.progress_step);
        Ok(Self::accumulate(&data, options.encoding, &mut reporter))
    }

    /// Parses the raw bytes of a dictionary.
    pub fn from_bytes(data: &[u8], encoding: &'static Encoding) -> Self {
        let mut reporter = ProgressReporter::new(|_: f64| {}, Duration::MAX);
        Self::accumulate(data, encoding, &mut reporter)
    }

    fn accumulate<F>(
        data: &[u8],
        encoding: &'static Encoding,
        reporter: &mut ProgressReporter<F>,
    ) -> Self
    where
        F: FnMut(f64),
    {
        reporter.force(0.0);

        let mut entries: HashMap<String, HashSet<Rc<DictionaryEntry>>> = HashMap::new();
        let mut skipped = 0usize;
        for (offset, line) in lines(data) {
            match decode_entry(line, offset, encoding) {
                Some(entry) => {
                    let entry = Rc::new(entry);
                    for key in entry.keys() {
                        entries
                            .entry(key.to_string())
                            .or_default()
                            .insert(Rc::clone(&entry));
                    }
                }
                None => skipped += 1,
            }
            reporter.report(fraction(offset, data.len()) / 2.0);
        }
        tracing::debug!("skipped {skipped} lines that were not entries");

        reporter.force(0.5);
        Self { entries }
    }

    /// The number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entries with the given writing or reading, in the order they appear in the source file.
    pub fn get(&self, key: &str) -> Vec<&DictionaryEntry> {
        let mut entries = self
            .entries
            .get(key)
            .into_iter()
            .flatten()
            .map(|entry| &**entry)
            .collect::<Vec<_>>();
        entries.sort_unstable_by_key(|entry| entry.offset);
        entries
    }

    // the distinct offsets of the entries under the key, ascending
    fn offsets(&self, key: &str) -> Vec<u64> {
        let mut offsets = self
            .entries
            .get(key)
            .into_iter()
            .flatten()
            .map(|entry| entry.offset)
            .collect::<Vec<_>>();
        offsets.sort_unstable();
        offsets.dedup();
        offsets
    }

    /// Writes the index to `output`.
    /// The file is only replaced once the whole index has been written.
    pub fn save_index(&self, output: &Path) -> SearchedictResult<()> {
        let mut reporter = ProgressReporter::new(|_: f64| {}, Duration::MAX);
        self.persist(output, &mut reporter)
    }

    /// Writes the index to `w`.
    pub fn write_index<W: Write>(&self, w: W) -> io::Result<()> {
        let mut reporter = ProgressReporter::new(|_: f64| {}, Duration::MAX);
        self.serialize(w, &mut reporter)
    }

    fn persist<F>(&self, output: &Path, reporter: &mut ProgressReporter<F>) -> SearchedictResult<()>
    where
        F: FnMut(f64),
    {
        let dir = match output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut temp =
            tempfile::NamedTempFile::new_in(dir).map_err(SearchedictError::write(output))?;
        self.serialize(BufWriter::new(temp.as_file_mut()), reporter)
            .map_err(SearchedictError::write(output))?;
        // the temporary file is created owner-only
        let permissions = fs::metadata(output)
            .map(|metadata| metadata.permissions())
            .ok()
            .or_else(default_permissions);
        if let Some(permissions) = permissions {
            temp.as_file()
                .set_permissions(permissions)
                .map_err(SearchedictError::write(output))?;
        }
        temp.persist(output)
            .map_err(|err| SearchedictError::write(output)(err.error))?;
        Ok(())
    }

    fn serialize<W, F>(&self, mut w: W, reporter: &mut ProgressReporter<F>) -> io::Result<()>
    where
        W: Write,
        F: FnMut(f64),
    {
        reporter.force(0.5);

        // byte order of UTF-8 strings is code point order
        let mut keys = self.entries.keys().collect::<Vec<_>>();
        keys.sort_unstable();
        let total = keys.len();
        for (idx, key) in keys.into_iter().enumerate() {
            write!(w, "{key}")?;
            for offset in self.offsets(key) {
                write!(w, " {offset}")?;
            }
            writeln!(w)?;
            reporter.report(0.5 + fraction(idx as u64, total) / 2.0);
        }
        w.flush()?;

        reporter.force(1.0);
        Ok(())
    }
}

fn decode_entry(
    line: &[u8],
    offset: u64,
    encoding: &'static Encoding,
) -> Option<DictionaryEntry> {
    let Some(text) = encoding.decode_without_bom_handling_and_without_replacement(line) else {
        tracing::debug!(
            "skipping line at byte {offset} that is not valid {}",
            encoding.name()
        );
        return None;
    };
    DictionaryEntry::parse(&text, offset)
}

// rw-r--r--, as for a plainly created file
#[cfg(unix)]
fn default_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<fs::Permissions> {
    None
}

fn fraction(done: u64, total: usize) -> f64 {
    if total == 0 {
        1.0
    } else {
        done as f64 / total as f64
    }
}

// rate limits calls to the progress callback
struct ProgressReporter<F> {
    callback: F,
    step: Duration,
    last: Instant,
}

impl<F> ProgressReporter<F>
where
    F: FnMut(f64),
{
    fn new(callback: F, step: Duration) -> Self {
        Self {
            callback,
            step,
            last: Instant::now(),
        }
    }

    fn report(&mut self, value: f64) {
        if self.last.elapsed() >= self.step {
            self.force(value);
        }
    }

    fn force(&mut self, value: f64) {
        (self.callback)(value);
        self.last = Instant::now();
    }
}
