//! Mock implementations for testing.

use std::collections::{BTreeMap, VecDeque};
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use warden_workspace::{EntryKind, PathResolver};

/// Link hops allowed before reporting a loop (Linux uses 40).
const MAX_LINK_HOPS: u32 = 40;

/// Volume reported for directories that never had one assigned.
const DEFAULT_VOLUME: u64 = 1;

#[derive(Debug, Clone)]
enum Node {
    Dir {
        children: BTreeMap<String, Node>,
        readable: bool,
        volume: Option<u64>,
    },
    File,
    Link {
        target: PathBuf,
    },
}

impl Node {
    fn empty_dir() -> Self {
        Self::Dir {
            children: BTreeMap::new(),
            readable: true,
            volume: None,
        }
    }

    fn kind(&self) -> EntryKind {
        match self {
            Self::Dir { .. } => EntryKind::Directory,
            Self::File => EntryKind::File,
            Self::Link { .. } => EntryKind::Link,
        }
    }
}

#[derive(Debug, Clone)]
enum Seg {
    Root,
    Cur,
    Parent,
    Name(String),
}

fn segs(path: &Path) -> io::Result<Vec<Seg>> {
    path.components()
        .map(|c| match c {
            Component::Prefix(_) => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "MockFs does not model path prefixes",
            )),
            Component::RootDir => Ok(Seg::Root),
            Component::CurDir => Ok(Seg::Cur),
            Component::ParentDir => Ok(Seg::Parent),
            Component::Normal(n) => Ok(Seg::Name(n.to_string_lossy().into_owned())),
        })
        .collect()
}

fn names_to_path(names: &[String]) -> PathBuf {
    let mut path = PathBuf::from(Component::RootDir.as_os_str());
    path.extend(names);
    path
}

/// In-memory filesystem implementing [`PathResolver`].
///
/// Models directories, files, symbolic links, directory junctions (which
/// resolve exactly like directory links), unreadable directories, and volume
/// ids. Paths are Unix-style and absolute; relative paths are taken from `/`.
///
/// The tree sits behind a lock so tests can change links between `resolve`
/// calls.
#[derive(Debug)]
pub struct MockFs {
    tree: RwLock<Node>,
    case_insensitive: bool,
}

impl Default for MockFs {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFs {
    /// Create an empty filesystem containing only `/`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tree: RwLock::new(Node::empty_dir()),
            case_insensitive: false,
        }
    }

    /// Look names up ignoring case, returning the stored spelling.
    #[must_use]
    pub fn case_insensitive(mut self) -> Self {
        self.case_insensitive = true;
        self
    }

    /// Add a directory (and any missing parents).
    ///
    /// # Panics
    ///
    /// Panics if a parent component is not a directory.
    #[must_use]
    pub fn dir(self, path: impl AsRef<Path>) -> Self {
        self.ensure_dir(path.as_ref());
        self
    }

    /// Add an empty file.
    ///
    /// # Panics
    ///
    /// Panics if a parent component is not a directory.
    #[must_use]
    pub fn file(self, path: impl AsRef<Path>) -> Self {
        self.insert(path.as_ref(), Node::File);
        self
    }

    /// Add a symbolic link. `target` may be relative to the link's directory
    /// and need not exist.
    ///
    /// # Panics
    ///
    /// Panics if a parent component is not a directory.
    #[must_use]
    pub fn symlink(self, link: impl AsRef<Path>, target: impl Into<PathBuf>) -> Self {
        self.insert(
            link.as_ref(),
            Node::Link {
                target: target.into(),
            },
        );
        self
    }

    /// Add a directory junction.
    ///
    /// # Panics
    ///
    /// Panics if a parent component is not a directory.
    #[must_use]
    pub fn junction(self, link: impl AsRef<Path>, target: impl Into<PathBuf>) -> Self {
        self.symlink(link, target)
    }

    /// Add a directory whose contents cannot be listed or traversed.
    ///
    /// # Panics
    ///
    /// Panics if a parent component is not a directory.
    #[must_use]
    pub fn unreadable(self, path: impl AsRef<Path>) -> Self {
        self.insert(
            path.as_ref(),
            Node::Dir {
                children: BTreeMap::new(),
                readable: false,
                volume: None,
            },
        );
        self
    }

    /// Mount a separate volume at `path` (created as a directory if needed).
    ///
    /// # Panics
    ///
    /// Panics if `path` or one of its parents is not a directory.
    #[must_use]
    pub fn volume(self, path: impl AsRef<Path>, id: u64) -> Self {
        let path = path.as_ref();
        self.ensure_dir(path);
        self.with_node_mut(path, |node| match node {
            Node::Dir { volume, .. } => *volume = Some(id),
            _ => panic!("{} is not a directory", path.display()),
        });
        self
    }

    /// Point an existing or new link somewhere else.
    ///
    /// # Panics
    ///
    /// Panics if a parent component is not a directory.
    pub fn retarget(&self, link: impl AsRef<Path>, target: impl Into<PathBuf>) {
        self.insert(
            link.as_ref(),
            Node::Link {
                target: target.into(),
            },
        );
    }

    /// Remove an entry (and everything below it).
    ///
    /// # Panics
    ///
    /// Panics if a parent component is not a directory.
    pub fn remove(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let Some(name) = path.file_name() else {
            return;
        };
        let name = name.to_string_lossy().into_owned();
        let parent = path.parent().unwrap_or_else(|| Path::new("/"));
        self.with_node_mut(parent, |node| {
            if let Node::Dir { children, .. } = node {
                children.remove(&name);
            }
        });
    }

    fn ensure_dir(&self, path: &Path) {
        let mut tree = self.tree.write().unwrap_or_else(PoisonError::into_inner);
        let mut node = &mut *tree;
        for name in Self::builder_names(path) {
            let Node::Dir { children, .. } = node else {
                panic!("parent of {} is not a directory", path.display());
            };
            node = children.entry(name).or_insert_with(Node::empty_dir);
        }
        assert!(
            matches!(node, Node::Dir { .. }),
            "{} exists and is not a directory",
            path.display()
        );
    }

    fn insert(&self, path: &Path, entry: Node) {
        let Some(name) = path.file_name() else {
            panic!("cannot replace {}", path.display());
        };
        let name = name.to_string_lossy().into_owned();
        let parent = path.parent().unwrap_or_else(|| Path::new("/"));
        self.ensure_dir(parent);
        self.with_node_mut(parent, |node| {
            if let Node::Dir { children, .. } = node {
                children.insert(name, entry);
            }
        });
    }

    fn with_node_mut(&self, path: &Path, f: impl FnOnce(&mut Node)) {
        let mut tree = self.tree.write().unwrap_or_else(PoisonError::into_inner);
        let mut node = &mut *tree;
        for name in Self::builder_names(path) {
            let Node::Dir { children, .. } = node else {
                panic!("{} is not reachable", path.display());
            };
            let Some(child) = children.get_mut(&name) else {
                panic!("{} does not exist", path.display());
            };
            node = child;
        }
        f(node);
    }

    fn builder_names(path: &Path) -> Vec<String> {
        path.components()
            .filter_map(|c| match c {
                Component::Normal(n) => Some(n.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect()
    }

    fn find_child<'a>(
        &self,
        children: &'a BTreeMap<String, Node>,
        name: &str,
    ) -> Option<(&'a String, &'a Node)> {
        children.get_key_value(name).or_else(|| {
            if self.case_insensitive {
                let wanted = name.to_lowercase();
                children.iter().find(|(k, _)| k.to_lowercase() == wanted)
            } else {
                None
            }
        })
    }

    /// Nodes along `names`, starting with `/`. `names` must already be
    /// resolved spellings.
    fn chain<'a>(root: &'a Node, names: &[String]) -> io::Result<Vec<&'a Node>> {
        let mut chain = vec![root];
        let mut node = root;
        for name in names {
            let Node::Dir { children, .. } = node else {
                return Err(not_a_directory());
            };
            node = children
                .get(name)
                .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))?;
            chain.push(node);
        }
        Ok(chain)
    }

    /// Walk `path`, following links. The final link is followed only when
    /// `follow_last` is set.
    fn walk(&self, root: &Node, path: &Path, follow_last: bool) -> io::Result<Vec<String>> {
        let mut queue: VecDeque<Seg> = segs(path)?.into();
        let mut resolved: Vec<String> = Vec::new();
        let mut hops_left = MAX_LINK_HOPS;

        while let Some(seg) = queue.pop_front() {
            match seg {
                Seg::Root => resolved.clear(),
                Seg::Cur => {},
                Seg::Parent => {
                    resolved.pop();
                },
                Seg::Name(name) => {
                    let here = Self::chain(root, &resolved)?;
                    let Some(Node::Dir {
                        children, readable, ..
                    }) = here.last()
                    else {
                        return Err(not_a_directory());
                    };
                    if !readable {
                        return Err(io::Error::from(io::ErrorKind::PermissionDenied));
                    }
                    let (actual, child) = self
                        .find_child(children, &name)
                        .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))?;

                    match child {
                        Node::Link { target } if follow_last || !queue.is_empty() => {
                            hops_left = hops_left.checked_sub(1).ok_or_else(|| {
                                io::Error::other("too many levels of symbolic links")
                            })?;
                            for seg in segs(target)?.into_iter().rev() {
                                queue.push_front(seg);
                            }
                        },
                        _ => resolved.push(actual.clone()),
                    }
                },
            }
        }

        Ok(resolved)
    }
}

fn not_a_directory() -> io::Error {
    io::Error::new(io::ErrorKind::NotADirectory, "not a directory")
}

impl PathResolver for MockFs {
    fn real_path(&self, path: &Path) -> io::Result<PathBuf> {
        let tree = self.tree.read().unwrap_or_else(PoisonError::into_inner);
        let names = self.walk(&tree, path, true)?;
        Ok(names_to_path(&names))
    }

    fn entry_kind(&self, path: &Path) -> io::Result<Option<EntryKind>> {
        let tree = self.tree.read().unwrap_or_else(PoisonError::into_inner);
        let names = match self.walk(&tree, path, false) {
            Ok(names) => names,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };
        let chain = Self::chain(&tree, &names)?;
        Ok(chain.last().map(|node| node.kind()))
    }

    fn volume_id(&self, path: &Path) -> io::Result<Option<u64>> {
        let tree = self.tree.read().unwrap_or_else(PoisonError::into_inner);
        let names = self.walk(&tree, path, true)?;
        let chain = Self::chain(&tree, &names)?;
        let volume = chain
            .iter()
            .rev()
            .find_map(|node| match node {
                Node::Dir { volume, .. } => *volume,
                _ => None,
            })
            .unwrap_or(DEFAULT_VOLUME);
        Ok(Some(volume))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_real_path_follows_links() {
        let fs = MockFs::new()
            .dir("/ws/dir")
            .dir("/outside")
            .symlink("/ws/abs", "/outside")
            .symlink("/ws/rel", "dir");

        assert_eq!(fs.real_path(Path::new("/ws/abs")).unwrap(), Path::new("/outside"));
        assert_eq!(fs.real_path(Path::new("/ws/rel")).unwrap(), Path::new("/ws/dir"));
        assert_eq!(
            fs.real_path(Path::new("/ws/rel/../abs")).unwrap(),
            Path::new("/outside")
        );
    }

    #[test]
    fn test_missing_and_dangling() {
        let fs = MockFs::new().dir("/ws").symlink("/ws/dangling", "/nowhere");

        let err = fs.real_path(Path::new("/ws/missing")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert_eq!(fs.entry_kind(Path::new("/ws/missing")).unwrap(), None);

        let err = fs.real_path(Path::new("/ws/dangling")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert_eq!(
            fs.entry_kind(Path::new("/ws/dangling")).unwrap(),
            Some(EntryKind::Link)
        );
    }

    #[test]
    fn test_loops_and_permissions() {
        let fs = MockFs::new()
            .dir("/ws")
            .symlink("/ws/a", "/ws/b")
            .symlink("/ws/b", "/ws/a")
            .unreadable("/ws/locked");

        assert!(fs.real_path(Path::new("/ws/a")).is_err());
        let err = fs.real_path(Path::new("/ws/locked/file")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
    }

    #[test]
    fn test_file_is_not_a_directory() {
        let fs = MockFs::new().file("/ws/file.txt");
        let err = fs.real_path(Path::new("/ws/file.txt/child")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotADirectory);
    }

    #[test]
    fn test_case_insensitive_lookup() {
        let fs = MockFs::new().dir("/Work/Space").case_insensitive();
        assert_eq!(
            fs.real_path(Path::new("/work/SPACE")).unwrap(),
            Path::new("/Work/Space")
        );
    }

    #[test]
    fn test_volumes() {
        let fs = MockFs::new().dir("/ws/inner").volume("/ws/mnt", 7);
        assert_eq!(fs.volume_id(Path::new("/ws/inner")).unwrap(), Some(1));
        assert_eq!(fs.volume_id(Path::new("/ws/mnt")).unwrap(), Some(7));
    }

    #[test]
    fn test_retarget_and_remove() {
        let fs = MockFs::new().dir("/a").dir("/b").symlink("/ws/link", "/a");
        fs.retarget("/ws/link", "/b");
        assert_eq!(fs.real_path(Path::new("/ws/link")).unwrap(), Path::new("/b"));
        fs.remove("/ws/link");
        assert_eq!(fs.entry_kind(Path::new("/ws/link")).unwrap(), None);
    }
}
