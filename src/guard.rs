//! Validation of client-supplied file names against the served root.

use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;

/// Why a requested name was refused.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Missing, or not a regular file
    #[error("File not found")]
    NotFound,
    /// Protected, hidden, or outside the root directory
    #[error("Access denied")]
    Forbidden,
}

/// A file name that passed every guard rule.
///
/// Only obtainable through [`PathGuard::validate`]; the resolved path never
/// leaves the crate.
#[derive(Debug, Clone)]
pub struct ValidatedPath {
    path: PathBuf,
    name: String,
}

impl ValidatedPath {
    /// Base name as requested by the client.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }
}

/// Decides which names under the root may be listed or served.
#[derive(Debug, Clone)]
pub struct PathGuard {
    root: PathBuf,
    protected: Vec<String>,
    hide_dotfiles: bool,
}

impl PathGuard {
    /// `root` must already be canonical.
    pub fn new(root: PathBuf, protected: Vec<String>, hide_dotfiles: bool) -> Self {
        Self {
            root,
            protected,
            hide_dotfiles,
        }
    }

    pub fn from_config(root: &Path, config: &Config) -> Self {
        Self::new(
            root.to_path_buf(),
            config.protected_files.clone(),
            config.hide_dotfiles,
        )
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn is_protected(&self, name: &str) -> bool {
        self.protected.iter().any(|p| p.eq_ignore_ascii_case(name))
    }

    fn is_hidden(&self, name: &str) -> bool {
        self.hide_dotfiles && name.starts_with('.')
    }

    /// Check a raw, client-supplied name.
    ///
    /// Rules are applied in order: protected or empty names, hidden names,
    /// anything whose resolved parent is not exactly the root, and finally
    /// anything that is not an existing regular file. Never touches the
    /// filesystem beyond `stat`/`canonicalize`.
    pub fn validate(&self, requested: &str) -> Result<ValidatedPath, Rejection> {
        if requested.contains('\0') {
            warn!("Requested name contains null byte");
            return Err(Rejection::Forbidden);
        }

        let components: Vec<Component<'_>> = Path::new(requested).components().collect();

        let Some(name) = components.iter().rev().find_map(|c| match c {
            Component::Normal(n) => Some(n.to_string_lossy().to_string()),
            _ => None,
        }) else {
            debug!("Rejected empty name: {:?}", requested);
            return Err(Rejection::Forbidden);
        };

        if self.is_protected(&name) {
            warn!("Request for protected file refused: {:?}", requested);
            return Err(Rejection::Forbidden);
        }

        if self.is_hidden(requested) || self.is_hidden(&name) {
            debug!("Request for hidden file refused: {:?}", requested);
            return Err(Rejection::Forbidden);
        }

        let mut relative = PathBuf::new();
        for component in &components {
            match component {
                Component::Normal(part) => relative.push(part),
                Component::CurDir => continue,
                Component::ParentDir => {
                    warn!("Path traversal attempt detected: {:?}", requested);
                    return Err(Rejection::Forbidden);
                }
                Component::RootDir | Component::Prefix(_) => {
                    warn!("Absolute path requested: {:?}", requested);
                    return Err(Rejection::Forbidden);
                }
            }
        }

        // Nested names can never have the root as their parent.
        if relative.components().count() != 1 {
            debug!("Nested path refused: {:?}", requested);
            return Err(Rejection::Forbidden);
        }

        let Ok(resolved) = self.root.join(&relative).canonicalize() else {
            return Err(Rejection::NotFound);
        };

        if resolved.parent() != Some(self.root.as_path()) {
            warn!(
                "Symlink escape attempt: {:?} resolves outside the root",
                requested
            );
            return Err(Rejection::Forbidden);
        }

        // A link inside the root may still point at a protected or hidden sibling.
        if let Some(target) = resolved.file_name().map(|n| n.to_string_lossy()) {
            if self.is_protected(&target) || self.is_hidden(&target) {
                warn!("Link to refused file: {:?}", requested);
                return Err(Rejection::Forbidden);
            }
        }

        match std::fs::metadata(&resolved) {
            Ok(metadata) if metadata.is_file() => Ok(ValidatedPath {
                path: resolved,
                name,
            }),
            _ => Err(Rejection::NotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup(hide_dotfiles: bool) -> (TempDir, PathGuard) {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().canonicalize().unwrap();
        std::fs::write(root.join("a.txt"), "hello").unwrap();
        std::fs::write(root.join(".hidden"), "secret").unwrap();
        std::fs::write(root.join("rootserve"), "binary").unwrap();
        std::fs::create_dir(root.join("sub")).unwrap();
        std::fs::write(root.join("sub/inner.txt"), "inner").unwrap();

        let guard = PathGuard::new(root, vec!["rootserve".to_string()], hide_dotfiles);
        (temp_dir, guard)
    }

    #[test]
    fn test_accepts_plain_file() {
        let (_dir, guard) = setup(true);
        let validated = guard.validate("a.txt").unwrap();
        assert_eq!(validated.name(), "a.txt");
        assert_eq!(validated.path(), guard.root().join("a.txt"));
    }

    #[test]
    fn test_accepts_leading_cur_dir_when_dotfiles_allowed() {
        let (_dir, guard) = setup(false);
        assert!(guard.validate("./a.txt").is_ok());
    }

    #[test]
    fn test_rejects_empty_and_dot_names() {
        let (_dir, guard) = setup(false);
        assert_eq!(guard.validate("").unwrap_err(), Rejection::Forbidden);
        assert_eq!(guard.validate(".").unwrap_err(), Rejection::Forbidden);
        assert_eq!(guard.validate("..").unwrap_err(), Rejection::Forbidden);
        assert_eq!(guard.validate("/").unwrap_err(), Rejection::Forbidden);
    }

    #[test]
    fn test_rejects_parent_traversal() {
        let (_dir, guard) = setup(false);
        for name in ["../secret.txt", "sub/../a.txt", "../../etc/passwd", "a/../../b"] {
            assert_eq!(guard.validate(name).unwrap_err(), Rejection::Forbidden, "{name}");
        }
    }

    #[test]
    fn test_rejects_absolute_paths() {
        let (_dir, guard) = setup(false);
        assert_eq!(guard.validate("/etc/passwd").unwrap_err(), Rejection::Forbidden);

        let absolute = guard.root().join("a.txt");
        assert_eq!(
            guard.validate(absolute.to_str().unwrap()).unwrap_err(),
            Rejection::Forbidden
        );
    }

    #[test]
    fn test_rejects_nested_paths() {
        let (_dir, guard) = setup(false);
        assert_eq!(guard.validate("sub/inner.txt").unwrap_err(), Rejection::Forbidden);
    }

    #[test]
    fn test_rejects_protected_name_any_case_or_prefix() {
        let (_dir, guard) = setup(false);
        for name in ["rootserve", "ROOTSERVE", "RootServe", "./rootserve", "sub/../rootserve"] {
            assert_eq!(guard.validate(name).unwrap_err(), Rejection::Forbidden, "{name}");
        }
    }

    #[test]
    fn test_hidden_files_follow_policy() {
        let (_dir, guard) = setup(true);
        assert_eq!(guard.validate(".hidden").unwrap_err(), Rejection::Forbidden);
        assert_eq!(guard.validate(".ghost").unwrap_err(), Rejection::Forbidden);

        let (_dir, guard) = setup(false);
        assert!(guard.validate(".hidden").is_ok());
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let (_dir, guard) = setup(true);
        assert_eq!(guard.validate("ghost.txt").unwrap_err(), Rejection::NotFound);
    }

    #[test]
    fn test_directory_is_not_found() {
        let (_dir, guard) = setup(true);
        assert_eq!(guard.validate("sub").unwrap_err(), Rejection::NotFound);
    }

    #[test]
    fn test_rejects_null_bytes() {
        let (_dir, guard) = setup(true);
        assert_eq!(guard.validate("a.txt\0").unwrap_err(), Rejection::Forbidden);
    }

    #[cfg(unix)]
    #[test]
    fn test_rejects_symlink_escape() {
        use std::os::unix::fs::symlink;

        let (_dir, guard) = setup(true);
        let outside_dir = TempDir::new().unwrap();
        std::fs::write(outside_dir.path().join("secret.txt"), "secret data").unwrap();
        symlink(
            outside_dir.path().join("secret.txt"),
            guard.root().join("escape.txt"),
        )
        .unwrap();

        assert_eq!(guard.validate("escape.txt").unwrap_err(), Rejection::Forbidden);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_within_root() {
        use std::os::unix::fs::symlink;

        let (_dir, guard) = setup(true);
        symlink(guard.root().join("a.txt"), guard.root().join("alias.txt")).unwrap();
        symlink(guard.root().join("rootserve"), guard.root().join("innocent")).unwrap();
        symlink(guard.root().join("nowhere"), guard.root().join("dangling")).unwrap();

        assert_eq!(guard.validate("alias.txt").unwrap().name(), "alias.txt");
        assert_eq!(guard.validate("innocent").unwrap_err(), Rejection::Forbidden);
        assert_eq!(guard.validate("dangling").unwrap_err(), Rejection::NotFound);
    }
}
