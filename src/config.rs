use std::{error::Error, fmt::Display, str::FromStr};

use clap::Parser;

use crate::organize::Options;

/// Sort the files in a directory into folders named for the day each was last modified.
#[derive(Clone, Debug, Parser)]
#[command(version)]
pub struct Args {
    /// The root path to be organized
    /// Defaults to "."
    path: Option<String>,

    /// Show where files would go without moving anything.
    #[arg(short, long)]
    pub dry_run: bool,

    /// What to do when a file by the same name is already in the destination folder.
    ///
    /// Either 'fail' (the default) or 'rename', which appends " (1)", " (2)" and so on to the
    /// incoming file's name.
    #[arg(short, long)]
    pub conflict: Option<ConflictPolicy>,

    /// Do not recurse into subdirectories
    #[arg(short, long)]
    pub no_recurse: bool,

    /// Leave folders already named for a date alone instead of re-sorting their contents
    #[arg(short, long)]
    pub skip_dated: bool,

    /// List every file moved.
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ConflictPolicy {
    #[default]
    Fail,
    Rename,
}

impl FromStr for ConflictPolicy {
    type Err = ParseConflictPolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_ref() {
            "f" | "fail" => Ok(ConflictPolicy::Fail),
            "r" | "rename" => Ok(ConflictPolicy::Rename),
            _ => Err(ParseConflictPolicyError(s.into())),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ParseConflictPolicyError(String);

impl Display for ParseConflictPolicyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:?} is not a valid conflict policy\nTry one of fail, rename",
            self.0
        )
    }
}

impl Error for ParseConflictPolicyError {}

impl Args {
    pub fn parse() -> Self {
        Parser::parse()
    }

    pub fn path(&self) -> &str {
        self.path.as_deref().unwrap_or(".")
    }

    pub fn options(&self) -> Options {
        Options {
            recurse: !self.no_recurse,
            skip_dated: self.skip_dated,
            conflict: self.conflict.unwrap_or_default(),
        }
    }
}
