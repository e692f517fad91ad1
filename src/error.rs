use std::{io, path::PathBuf};

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unable to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{path} is not a directory")]
    NotADirectory { path: PathBuf },

    #[error("unable to create {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unable to move {from} to {to}: {source}")]
    Move {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The destination already holds a file by the same name.
    #[error("cannot move {from}: {to} already exists\nTry --conflict rename")]
    Collision { from: PathBuf, to: PathBuf },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    pub fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Read {
            path: path.into(),
            source,
        }
    }

    /// Walkdir errors carry the failing path when there is one; otherwise blame the root.
    pub fn walk(root: impl Into<PathBuf>, error: walkdir::Error) -> Self {
        let path = error.path().map(ToOwned::to_owned).unwrap_or_else(|| root.into());
        Error::read(path, error.into())
    }
}
