use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use hashbrown::HashMap;

use crate::{
    config::ConflictPolicy,
    date::{folder_name, local_date, DateFolders},
    error::{Error, Result},
    fs::{FileEntry, FileSystem, Walk},
};

#[derive(Clone, Copy, Debug, Default)]
pub struct Options {
    pub recurse: bool,
    pub skip_dated: bool,
    pub conflict: ConflictPolicy,
}

/// Files sharing a last-modified date, in the order the scan found them.
#[derive(Clone, Debug)]
pub struct Bucket<'a> {
    pub date: NaiveDate,
    pub files: Vec<&'a Path>,
}

impl Bucket<'_> {
    pub fn destination(&self, root: &Path) -> PathBuf {
        root.join(folder_name(self.date))
    }
}

#[derive(Clone, Debug)]
pub struct Plan<'a> {
    root: &'a Path,
    buckets: Vec<Bucket<'a>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Move {
    pub from: PathBuf,
    pub to: PathBuf,
}

#[derive(Clone, Debug, Default)]
pub struct Summary {
    pub moves: Vec<Move>,
    pub folders_created: Vec<PathBuf>,
    /// Files that were already sitting in the right folder.
    pub in_place: usize,
}

/// Moves every file under `root` into a folder named for the day it was last modified.
pub fn organize(fs: &impl FileSystem, root: &Path, options: &Options) -> Result<Summary> {
    let files = scan(fs, root, options)?;
    plan(root, &files).execute(fs, options.conflict)
}

pub fn scan(fs: &impl FileSystem, root: &Path, options: &Options) -> Result<Vec<FileEntry>> {
    let folders = DateFolders::new();
    let walk = Walk {
        recurse: options.recurse,
        skip: options.skip_dated.then_some(&folders),
    };
    fs.files(root, walk)
}

pub fn plan<'a>(root: &'a Path, files: &'a [FileEntry]) -> Plan<'a> {
    let mut by_date: HashMap<NaiveDate, Vec<&Path>> = HashMap::new();
    for file in files {
        by_date
            .entry(local_date(file.modified))
            .or_default()
            .push(&file.path);
    }

    let mut buckets: Vec<_> = by_date
        .into_iter()
        .map(|(date, files)| Bucket { date, files })
        .collect();
    buckets.sort_unstable_by_key(|bucket| bucket.date);

    Plan { root, buckets }
}

impl<'a> Plan<'a> {
    pub fn root(&self) -> &'a Path {
        self.root
    }

    pub fn buckets(&self) -> &[Bucket<'a>] {
        &self.buckets
    }

    pub fn len(&self) -> usize {
        self.buckets.iter().map(|bucket| bucket.files.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Creates the destination folders and moves the files. The first failure ends the run;
    /// whatever was moved before it stays moved.
    pub fn execute(&self, fs: &impl FileSystem, conflict: ConflictPolicy) -> Result<Summary> {
        let mut summary = Summary::default();

        for bucket in &self.buckets {
            let folder = bucket.destination(self.root);
            if !fs.exists(&folder) {
                fs.create_dir_all(&folder)?;
                summary.folders_created.push(folder.clone());
            }

            for &path in &bucket.files {
                let Some(name) = path.file_name() else {
                    continue;
                };

                let target = folder.join(name);
                if target == path {
                    summary.in_place += 1;
                    continue;
                }

                let target = resolve_conflict(fs, path, target, conflict)?;
                fs.rename(path, &target)?;
                summary.moves.push(Move {
                    from: path.to_owned(),
                    to: target,
                });
            }
        }

        Ok(summary)
    }
}

fn resolve_conflict(
    fs: &impl FileSystem,
    from: &Path,
    target: PathBuf,
    conflict: ConflictPolicy,
) -> Result<PathBuf> {
    if !fs.exists(&target) {
        return Ok(target);
    }

    match conflict {
        ConflictPolicy::Fail => Err(Error::Collision {
            from: from.to_owned(),
            to: target,
        }),
        ConflictPolicy::Rename => Ok(free_name(fs, &target)),
    }
}

/// For `file.txt`, the first of `file (1).txt`, `file (2).txt`, ... not yet taken. Names are
/// assembled as OS strings so bytes that are not UTF-8 survive.
fn free_name(fs: &impl FileSystem, target: &Path) -> PathBuf {
    let stem = target.file_stem().unwrap_or_default();
    let extension = target.extension();

    let mut n = 0u64;
    loop {
        n += 1;
        let mut name = OsString::from(stem);
        name.push(format!(" ({n})"));
        if let Some(ext) = extension {
            name.push(".");
            name.push(ext);
        }

        let candidate = target.with_file_name(name);
        if !fs.exists(&candidate) {
            return candidate;
        }
    }
}
