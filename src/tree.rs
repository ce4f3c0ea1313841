//! Project tree access.
//!
//! Files are addressed by root-relative paths such as `res://assets/icon.png`.
//! [`ProjectRoot`] maps those paths to disk and back, and a [`FileIndex`]
//! lists the files and subdirectories of each directory node.

use crate::config::ROOT_MARKER;
use crate::error::{Error, Result};
use crate::normalize::split_file_name;
use std::path::{Component, Path, PathBuf};
use tracing::trace;
use walkdir::WalkDir;

/// File whose presence marks a project root directory.
pub const PROJECT_FILE: &str = "project.godot";

/// A file found during traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Root-relative path, forward-slash separated
    pub path: String,

    /// File name without extension
    pub name: String,

    /// Extension including the leading dot, or empty
    pub extension: String,
}

impl FileEntry {
    /// Derives an entry from a root-relative file path.
    #[must_use]
    pub fn from_path(path: impl Into<String>) -> Self {
        let path = path.into();
        let (name, extension) = split_file_name(file_name_of(&path));
        Self {
            name: name.to_string(),
            extension: extension.to_string(),
            path,
        }
    }

    /// The file name including its extension.
    #[must_use]
    pub fn file_name(&self) -> &str {
        file_name_of(&self.path)
    }

    /// The containing directory, ending with `/`.
    #[must_use]
    pub fn parent(&self) -> &str {
        let file_name = self.file_name();
        &self.path[..self.path.len() - file_name.len()]
    }

    /// Root-relative path of a sibling file with the given name.
    #[must_use]
    pub fn sibling(&self, file_name: &str) -> String {
        format!("{}{}", self.parent(), file_name)
    }
}

fn file_name_of(path: &str) -> &str {
    let path = path.strip_prefix(ROOT_MARKER).unwrap_or(path);
    path.rsplit('/').next().unwrap_or(path)
}

/// The project directory on disk and the mapping of root-relative paths onto it.
#[derive(Debug, Clone)]
pub struct ProjectRoot {
    dir: PathBuf,
}

impl ProjectRoot {
    /// Creates a project root at `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The project directory on disk.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Maps a root-relative path to a disk path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] if the path does not start with the root
    /// marker or tries to leave the project with `..`.
    pub fn globalize(&self, path: &str) -> Result<PathBuf> {
        let rest = path
            .strip_prefix(ROOT_MARKER)
            .ok_or_else(|| Error::invalid_path(path, format!("must start with {ROOT_MARKER}")))?;

        let mut out = self.dir.clone();
        for part in rest.split(['/', '\\']).filter(|p| !p.is_empty() && *p != ".") {
            if part == ".." {
                return Err(Error::invalid_path(path, "parent components are not allowed"));
            }
            out.push(part);
        }
        Ok(out)
    }

    /// Maps a disk path inside the project to a root-relative path.
    ///
    /// Returns `None` for paths outside the project directory.
    #[must_use]
    pub fn localize(&self, path: &Path) -> Option<String> {
        let relative = pathdiff::diff_paths(path, &self.dir)?;
        let mut parts = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
                Component::CurDir => {}
                _ => return None,
            }
        }
        Some(format!("{}{}", ROOT_MARKER, parts.join("/")))
    }

    fn localize_dir(&self, path: &Path) -> Option<String> {
        self.localize(path).map(|mut p| {
            if !p.ends_with('/') {
                p.push('/');
            }
            p
        })
    }
}

/// Read-only view of the project tree, one directory node at a time.
///
/// Directory nodes are identified by their root-relative path ending in `/`;
/// the root node is [`ROOT_MARKER`]. Both listings are returned in the order
/// the traversal should visit them.
pub trait FileIndex {
    /// Root-relative paths of the files directly inside `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be listed.
    fn files(&self, dir: &str) -> Result<Vec<String>>;

    /// Root-relative paths of the subdirectories directly inside `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be listed.
    fn subdirs(&self, dir: &str) -> Result<Vec<String>>;
}

/// [`FileIndex`] backed by the file system under a [`ProjectRoot`].
///
/// Entries are sorted by name. Hidden entries (names starting with `.`) are
/// not listed, and symlinks are not followed.
#[derive(Debug, Clone)]
pub struct FsIndex {
    root: ProjectRoot,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    File,
    Dir,
}

impl FsIndex {
    /// Creates an index over `root`.
    #[must_use]
    pub const fn new(root: ProjectRoot) -> Self {
        Self { root }
    }

    fn list(&self, dir: &str, kind: EntryKind) -> Result<Vec<String>> {
        let disk_dir = self.root.globalize(dir)?;
        let mut out = Vec::new();

        let walker = WalkDir::new(&disk_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(disk_dir.as_path()).to_path_buf();
                match e.into_io_error() {
                    Some(io) => Error::io(path, io),
                    None => Error::io(path, std::io::Error::other("file system loop")),
                }
            })?;

            if is_hidden(entry.path()) {
                trace!("Skipping hidden entry: {}", entry.path().display());
                continue;
            }

            let file_type = entry.file_type();
            let local = match kind {
                EntryKind::File if file_type.is_file() => self.root.localize(entry.path()),
                EntryKind::Dir if file_type.is_dir() => self.root.localize_dir(entry.path()),
                _ => None,
            };
            if let Some(local) = local {
                out.push(local);
            }
        }

        Ok(out)
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}

impl FileIndex for FsIndex {
    fn files(&self, dir: &str) -> Result<Vec<String>> {
        self.list(dir, EntryKind::File)
    }

    fn subdirs(&self, dir: &str) -> Result<Vec<String>> {
        self.list(dir, EntryKind::Dir)
    }
}

/// Finds the project root by searching upward for [`PROJECT_FILE`].
#[must_use]
pub fn find_project_root_from(start: &Path) -> Option<PathBuf> {
    let mut current = start;
    loop {
        if current.join(PROJECT_FILE).is_file() {
            return Some(current.to_path_buf());
        }
        current = current.parent()?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn test_file_entry_from_path() {
        let entry = FileEntry::from_path("res://assets/sub/Icon.PNG");
        assert_eq!(entry.name, "Icon");
        assert_eq!(entry.extension, ".PNG");
        assert_eq!(entry.file_name(), "Icon.PNG");
        assert_eq!(entry.parent(), "res://assets/sub/");
        assert_eq!(entry.sibling("icon.png"), "res://assets/sub/icon.png");
    }

    #[test]
    fn test_file_entry_at_root() {
        let entry = FileEntry::from_path("res://Main Scene.tscn");
        assert_eq!(entry.name, "Main Scene");
        assert_eq!(entry.parent(), "res://");
    }

    #[test]
    fn test_globalize_and_localize() {
        let root = ProjectRoot::new("/project");
        let disk = root.globalize("res://assets/sub/icon.png").unwrap();
        assert_eq!(disk, Path::new("/project").join("assets").join("sub").join("icon.png"));
        assert_eq!(root.localize(&disk).as_deref(), Some("res://assets/sub/icon.png"));
        assert_eq!(root.globalize("res://").unwrap(), Path::new("/project"));
    }

    #[test]
    fn test_globalize_rejects_foreign_paths() {
        let root = ProjectRoot::new("/project");
        assert!(root.globalize("/etc/passwd").is_err());
        assert!(root.globalize("res://../outside.png").is_err());
    }

    #[test]
    fn test_localize_outside_root() {
        let root = ProjectRoot::new("/project/game");
        assert_eq!(root.localize(Path::new("/project/other/x.png")), None);
    }

    #[test]
    fn test_fs_index_lists_sorted_and_skips_hidden() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("b.png").write_str("").unwrap();
        temp.child("a.png").write_str("").unwrap();
        temp.child(".hidden.png").write_str("").unwrap();
        temp.child("zeta/x.png").write_str("").unwrap();
        temp.child("alpha/y.png").write_str("").unwrap();
        temp.child(".godot/cache.bin").write_str("").unwrap();

        let index = FsIndex::new(ProjectRoot::new(temp.path()));
        assert_eq!(index.files("res://").unwrap(), vec!["res://a.png", "res://b.png"]);
        assert_eq!(index.subdirs("res://").unwrap(), vec!["res://alpha/", "res://zeta/"]);
        assert_eq!(index.files("res://zeta/").unwrap(), vec!["res://zeta/x.png"]);
    }

    #[test]
    fn test_fs_index_missing_dir() {
        let temp = assert_fs::TempDir::new().unwrap();
        let index = FsIndex::new(ProjectRoot::new(temp.path()));
        assert!(index.files("res://missing/").unwrap_err().is_io());
    }

    #[test]
    fn test_find_project_root() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child(PROJECT_FILE).write_str("").unwrap();
        temp.child("assets/deep").create_dir_all().unwrap();

        let found = find_project_root_from(&temp.path().join("assets/deep")).unwrap();
        assert_eq!(found, temp.path());
    }
}
