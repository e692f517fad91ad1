use std::{
    cell::RefCell,
    collections::{BTreeMap, BTreeSet},
    io,
    path::{Path, PathBuf},
    time::SystemTime,
};

use crate::error::{Error, Result};

use super::{FileEntry, FileSystem, Walk};

#[derive(Clone, Debug, PartialEq, Eq)]
enum Node {
    Dir,
    File {
        modified: SystemTime,
        contents: Vec<u8>,
    },
}

/// A filesystem that lives in a map. Paths should be absolute.
#[derive(Debug, Default)]
pub struct MemoryFs {
    nodes: RefCell<BTreeMap<PathBuf, Node>>,
    failing: RefCell<BTreeSet<PathBuf>>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dir(&self, path: impl AsRef<Path>) -> &Self {
        let mut nodes = self.nodes.borrow_mut();
        for dir in path.as_ref().ancestors() {
            nodes.insert(dir.to_owned(), Node::Dir);
        }
        drop(nodes);
        self
    }

    pub fn file(&self, path: impl AsRef<Path>, modified: SystemTime, contents: &str) -> &Self {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            self.dir(parent);
        }
        self.nodes.borrow_mut().insert(
            path.to_owned(),
            Node::File {
                modified,
                contents: contents.as_bytes().to_vec(),
            },
        );
        self
    }

    /// Moving `path` will fail with a permission error.
    pub fn fail_on(&self, path: impl AsRef<Path>) -> &Self {
        self.failing.borrow_mut().insert(path.as_ref().to_owned());
        self
    }

    pub fn is_dir(&self, path: impl AsRef<Path>) -> bool {
        matches!(self.nodes.borrow().get(path.as_ref()), Some(Node::Dir))
    }

    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        match self.nodes.borrow().get(path.as_ref()) {
            Some(Node::File { contents, .. }) => Some(String::from_utf8_lossy(contents).into()),
            _ => None,
        }
    }

    /// Names of the direct children of `path`, in order.
    pub fn children(&self, path: impl AsRef<Path>) -> Vec<String> {
        let path = path.as_ref();
        self.nodes
            .borrow()
            .keys()
            .filter(|child| child.parent() == Some(path))
            .filter_map(|child| child.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .collect()
    }
}

impl FileSystem for MemoryFs {
    fn files(&self, root: &Path, walk: Walk) -> Result<Vec<FileEntry>> {
        let nodes = self.nodes.borrow();
        match nodes.get(root) {
            Some(Node::Dir) => {}
            Some(Node::File { .. }) => {
                return Err(Error::NotADirectory {
                    path: root.to_owned(),
                })
            }
            None => return Err(Error::read(root, io::ErrorKind::NotFound.into())),
        }

        // Descendants of the root sort directly after it.
        let mut files = Vec::new();
        for (path, node) in nodes.range(root.to_owned()..) {
            let Ok(relative) = path.strip_prefix(root) else {
                break;
            };

            let Node::File { modified, .. } = node else {
                continue;
            };

            let depth = relative.components().count();
            if depth > walk.max_depth() {
                continue;
            }

            let pruned = depth > 1
                && relative
                    .components()
                    .next()
                    .is_some_and(|top| walk.prunes(1, top.as_os_str()));
            if pruned {
                continue;
            }

            files.push(FileEntry {
                path: path.clone(),
                modified: *modified,
            });
        }

        Ok(files)
    }

    fn exists(&self, path: &Path) -> bool {
        self.nodes.borrow().contains_key(path)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        let blocked = path
            .ancestors()
            .any(|dir| matches!(self.nodes.borrow().get(dir), Some(Node::File { .. })));
        if blocked {
            return Err(Error::CreateDir {
                path: path.to_owned(),
                source: io::ErrorKind::AlreadyExists.into(),
            });
        }

        self.dir(path);
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        let fail = |kind: io::ErrorKind| Error::Move {
            from: from.to_owned(),
            to: to.to_owned(),
            source: kind.into(),
        };

        if self.failing.borrow().contains(from) {
            return Err(fail(io::ErrorKind::PermissionDenied));
        }

        let mut nodes = self.nodes.borrow_mut();
        if !matches!(to.parent().and_then(|dir| nodes.get(dir)), Some(Node::Dir)) {
            return Err(fail(io::ErrorKind::NotFound));
        }
        if matches!(nodes.get(to), Some(Node::Dir)) {
            return Err(fail(io::ErrorKind::AlreadyExists));
        }

        match nodes.remove(from) {
            Some(file @ Node::File { .. }) => {
                nodes.insert(to.to_owned(), file);
                Ok(())
            }
            Some(dir) => {
                nodes.insert(from.to_owned(), dir);
                Err(fail(io::ErrorKind::InvalidInput))
            }
            None => Err(fail(io::ErrorKind::NotFound)),
        }
    }
}
