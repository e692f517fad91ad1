use std::{
    ffi::OsStr,
    fs,
    path::{Path, PathBuf},
    time::SystemTime,
};

use walkdir::{DirEntry, WalkDir};

use crate::{
    date::DateFolders,
    error::{Error, Result},
};

#[cfg(test)]
pub mod memory;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileEntry {
    pub path: PathBuf,
    pub modified: SystemTime,
}

/// How far a scan reaches below the root.
#[derive(Clone, Copy)]
pub struct Walk<'a> {
    pub recurse: bool,
    /// When set, date folders directly under the root are not entered.
    pub skip: Option<&'a DateFolders>,
}

impl Walk<'_> {
    pub fn max_depth(&self) -> usize {
        if self.recurse {
            usize::MAX
        } else {
            1
        }
    }

    /// True for a directory the scan must not enter. Only direct children of the root are
    /// ever destination folders.
    pub fn prunes(&self, depth: usize, name: &OsStr) -> bool {
        depth == 1
            && self
                .skip
                .zip(name.to_str())
                .is_some_and(|(folders, name)| folders.is_match(name))
    }
}

/// Everything the organizer needs from a filesystem.
pub trait FileSystem {
    /// Lists the files under `root`, symlinks to files included, in a stable order.
    fn files(&self, root: &Path, walk: Walk) -> Result<Vec<FileEntry>>;
    fn exists(&self, path: &Path) -> bool;
    fn create_dir_all(&self, path: &Path) -> Result<()>;
    fn rename(&self, from: &Path, to: &Path) -> Result<()>;
}

pub struct LocalFs;

impl FileSystem for LocalFs {
    fn files(&self, root: &Path, walk: Walk) -> Result<Vec<FileEntry>> {
        let entered = |entry: &DirEntry| {
            !(entry.file_type().is_dir() && walk.prunes(entry.depth(), entry.file_name()))
        };

        let entries = WalkDir::new(root)
            .max_depth(walk.max_depth())
            .sort_by_file_name()
            .into_iter()
            .filter_entry(entered);

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Error::walk(root, e))?;
            if entry.depth() == 0 {
                if !entry.file_type().is_dir() {
                    return Err(Error::NotADirectory {
                        path: root.to_owned(),
                    });
                }
                continue;
            }

            let modified = if entry.file_type().is_file() {
                entry
                    .metadata()
                    .map_err(|e| Error::walk(root, e))?
                    .modified()
                    .map_err(|e| Error::read(entry.path(), e))?
            } else if entry.path_is_symlink() {
                // A link is dated by its target but moved as itself. Links to directories are
                // not descended into.
                let target = fs::metadata(entry.path()).map_err(|e| Error::read(entry.path(), e))?;
                if !target.is_file() {
                    continue;
                }
                target
                    .modified()
                    .map_err(|e| Error::read(entry.path(), e))?
            } else {
                continue;
            };

            files.push(FileEntry {
                path: entry.into_path(),
                modified,
            });
        }

        Ok(files)
    }

    fn exists(&self, path: &Path) -> bool {
        // A dangling symlink still occupies the name.
        fs::symlink_metadata(path).is_ok()
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).map_err(|source| Error::CreateDir {
            path: path.to_owned(),
            source,
        })
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        fs::rename(from, to).map_err(|source| Error::Move {
            from: from.to_owned(),
            to: to.to_owned(),
            source,
        })
    }
}
