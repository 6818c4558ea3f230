use super::WildcardError;
use std::path::{Component, Path, PathBuf};

/// Resolves a caller-supplied relative path against `root` without touching the
/// filesystem. Absolute paths and `..` components that climb above `root` are
/// rejected.
pub fn resolve_within(root: &Path, relative: &str) -> Result<PathBuf, WildcardError> {
    let mut resolved = root.to_path_buf();
    let mut depth = 0usize;

    for component in Path::new(relative).components() {
        match component {
            Component::Normal(part) => {
                resolved.push(part);
                depth += 1;
            }
            Component::CurDir => {}
            Component::ParentDir if depth > 0 => {
                resolved.pop();
                depth -= 1;
            }
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(WildcardError::InvalidPath(relative.to_string()));
            }
        }
    }

    Ok(resolved)
}

/// `path` relative to `root`, joined with `/`.
pub fn relative_display(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

pub(crate) fn join_relative(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", parent, name)
    }
}
