//! Hierarchical listing of the wildcard directory.
//!
//! The listing is built through the [`DirSource`] trait so it can run against the
//! real filesystem ([`FsSource`]) or any in-memory layout.

use super::path::join_relative;
use super::is_wildcard_file;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WildcardNode {
    Folder {
        name: String,
        path: String,
        children: Vec<WildcardNode>,
    },
    File {
        name: String,
        path: String,
    },
}

impl WildcardNode {
    pub fn name(&self) -> &str {
        match self {
            WildcardNode::Folder { name, .. } | WildcardNode::File { name, .. } => name,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            WildcardNode::Folder { path, .. } | WildcardNode::File { path, .. } => path,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntryInfo {
    pub name: String,
    pub is_dir: bool,
}

/// Lists directory entries by `/`-separated path relative to the wildcard root.
/// The root itself is `""`.
pub trait DirSource {
    fn read_dir(&self, relative: &str) -> io::Result<Vec<DirEntryInfo>>;
}

pub struct FsSource {
    pub root: PathBuf,
}

impl DirSource for FsSource {
    fn read_dir(&self, relative: &str) -> io::Result<Vec<DirEntryInfo>> {
        let dir = if relative.is_empty() {
            self.root.clone()
        } else {
            self.root.join(relative)
        };

        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            entries.push(DirEntryInfo {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir: entry.file_type()?.is_dir(),
            });
        }
        Ok(entries)
    }
}

/// Builds the listing: folders first, then `.txt` files, each sorted by name.
/// Folders without any `.txt` descendant are left out.
pub fn build_tree<S: DirSource + ?Sized>(source: &S) -> io::Result<Vec<WildcardNode>> {
    build_level(source, "")
}

fn build_level<S: DirSource + ?Sized>(source: &S, dir: &str) -> io::Result<Vec<WildcardNode>> {
    let mut entries = source.read_dir(dir)?;
    entries.sort_by(|a, b| b.is_dir.cmp(&a.is_dir).then_with(|| a.name.cmp(&b.name)));

    let mut nodes = Vec::new();
    for entry in entries {
        let path = join_relative(dir, &entry.name);

        if entry.is_dir {
            let children = match build_level(source, &path) {
                Ok(children) => children,
                Err(e) => {
                    log::warn!("Skipping unreadable wildcard folder '{}': {}", path, e);
                    continue;
                }
            };
            if !children.is_empty() {
                nodes.push(WildcardNode::Folder {
                    name: entry.name,
                    path,
                    children,
                });
            }
        } else if is_wildcard_file(&entry.name) {
            nodes.push(WildcardNode::File {
                name: entry.name,
                path,
            });
        }
    }

    Ok(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    /// Directory layout keyed by relative directory path.
    #[derive(Default)]
    struct MemorySource {
        dirs: BTreeMap<String, Vec<DirEntryInfo>>,
    }

    impl MemorySource {
        fn with_files(paths: &[&str]) -> Self {
            let mut source = MemorySource::default();
            source.dirs.insert(String::new(), Vec::new());
            for path in paths {
                let mut parent = String::new();
                let parts: Vec<&str> = path.split('/').collect();
                for (i, part) in parts.iter().enumerate() {
                    let is_dir = i + 1 < parts.len() || path.ends_with('/');
                    if part.is_empty() {
                        continue;
                    }
                    let siblings = source.dirs.entry(parent.clone()).or_default();
                    if !siblings.iter().any(|e| e.name == *part) {
                        siblings.push(DirEntryInfo {
                            name: part.to_string(),
                            is_dir,
                        });
                    }
                    parent = join_relative(&parent, part);
                    if is_dir {
                        source.dirs.entry(parent.clone()).or_default();
                    }
                }
            }
            source
        }
    }

    impl DirSource for MemorySource {
        fn read_dir(&self, relative: &str) -> io::Result<Vec<DirEntryInfo>> {
            self.dirs
                .get(relative)
                .cloned()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, relative.to_string()))
        }
    }

    fn file(name: &str, path: &str) -> WildcardNode {
        WildcardNode::File {
            name: name.to_string(),
            path: path.to_string(),
        }
    }

    #[test]
    fn test_build_tree_orders_and_prunes() {
        let source = MemorySource::with_files(&[
            "zeta.txt",
            "alpha.txt",
            "notes.md",
            "hair/colors.txt",
            "hair/styles/long.txt",
            "empty/",
            "images/cat.png",
        ]);

        let tree = build_tree(&source).unwrap();

        assert_eq!(
            tree,
            vec![
                WildcardNode::Folder {
                    name: "hair".to_string(),
                    path: "hair".to_string(),
                    children: vec![
                        WildcardNode::Folder {
                            name: "styles".to_string(),
                            path: "hair/styles".to_string(),
                            children: vec![file("long.txt", "hair/styles/long.txt")],
                        },
                        file("colors.txt", "hair/colors.txt"),
                    ],
                },
                file("alpha.txt", "alpha.txt"),
                file("zeta.txt", "zeta.txt"),
            ]
        );
    }

    #[test]
    fn test_build_tree_empty_root() {
        let source = MemorySource::with_files(&[]);
        assert!(build_tree(&source).unwrap().is_empty());
    }

    #[test]
    fn test_build_tree_missing_root() {
        let source = MemorySource::default();
        assert!(build_tree(&source).is_err());
    }

    #[test]
    fn test_build_tree_skips_unreadable_folder() {
        let mut source = MemorySource::with_files(&["a.txt"]);
        source.dirs.get_mut("").unwrap().push(DirEntryInfo {
            name: "ghost".to_string(),
            is_dir: true,
        });

        let tree = build_tree(&source).unwrap();
        assert_eq!(tree, vec![file("a.txt", "a.txt")]);
    }

    #[test]
    fn test_build_tree_from_filesystem() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("b/c")).unwrap();
        fs::create_dir_all(temp_dir.path().join("empty")).unwrap();
        fs::write(temp_dir.path().join("b/c/deep.txt"), "x").unwrap();
        fs::write(temp_dir.path().join("a.txt"), "x").unwrap();

        let source = FsSource {
            root: temp_dir.path().to_path_buf(),
        };
        let tree = build_tree(&source).unwrap();

        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].path(), "b");
        assert_eq!(tree[1].name(), "a.txt");
        match &tree[0] {
            WildcardNode::Folder { children, .. } => {
                assert_eq!(children[0].path(), "b/c");
            }
            _ => panic!("Expected Folder node"),
        }
    }

    #[test]
    fn test_serialized_shape() {
        let node = WildcardNode::Folder {
            name: "hair".to_string(),
            path: "hair".to_string(),
            children: vec![file("colors.txt", "hair/colors.txt")],
        };

        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "folder");
        assert_eq!(json["children"][0]["type"], "file");
        assert_eq!(json["children"][0]["path"], "hair/colors.txt");
    }
}
