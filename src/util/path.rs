//! Path helpers: `~` expansion and parent resolution.

use std::path::{Path, PathBuf};

/// Expand a leading `~` to `home`.
///
/// Only the first character is considered, so `~/src/x` and `~` expand
/// while `a/~/b` is returned unchanged.
pub fn expand_home(path: &str, home: &Path) -> PathBuf {
    match path.strip_prefix('~') {
        Some("") => home.to_path_buf(),
        Some(rest) => {
            let rest = rest.trim_start_matches(['/', '\\']);
            home.join(rest)
        }
        None => PathBuf::from(path),
    }
}

/// The user's home directory, if one can be determined.
pub fn home_dir() -> Option<PathBuf> {
    dirs::home_dir()
}

/// Directory a clone for `path` must run in.
///
/// The target folder does not exist yet, so the command executes one level up.
/// A bare relative name has the current directory as parent.
pub fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
