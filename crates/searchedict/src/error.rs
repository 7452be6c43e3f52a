//! Error type for searchedict.

use std::{io, path::PathBuf};
use thiserror::Error;

pub type SearchedictResult<T> = Result<T, SearchedictError>;

#[derive(Debug, Error)]
pub enum SearchedictError {
    #[error("Failed to read '{}'", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to write '{}'", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("'{}' is not valid {encoding}", .path.display())]
    Encoding {
        path: PathBuf,
        encoding: &'static str,
    },
    #[error("Malformed index line {line} in '{}'", .path.display())]
    MalformedIndex { path: PathBuf, line: usize },
}

impl SearchedictError {
    pub(crate) fn read(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Self::Read { path, source }
    }

    pub(crate) fn write(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Self::Write { path, source }
    }
}
