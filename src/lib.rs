pub mod backend;
pub mod config;
pub mod error;
pub mod listing;
pub mod navigator;
pub mod player;
pub mod playlist;
pub mod probe;
pub mod remote;
pub mod sequencer;
pub mod track;

pub use config::{Config, Context};
pub use error::{CastError, Result};

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use std::path::Path;

/// Name of the directory (under the platform config dir) holding all persistent state.
pub const APP_DIR_NAME: &str = "cast-playlist";

/// Returns the path to the per-user config directory, e.g. `~/.config/cast-playlist`.
pub fn config_dir() -> Result<Utf8PathBuf> {
    path_from(dirs::config_dir, APP_DIR_NAME)
}

/// Constructs a path by concatenating a `dirs::*` function output and an arbitrary relative path.
///
/// # Examples
/// ```
/// use cast_playlist::path_from;
/// let path = path_from(|| Some("/home/user"), "my_file.txt").unwrap();
/// assert_eq!(path, "/home/user/my_file.txt");
/// ```
pub fn path_from<A: AsRef<Path>, B: AsRef<Path>>(base_dir: impl FnOnce() -> Option<A>, rel_path: B) -> Result<Utf8PathBuf> {
    assert!(rel_path.as_ref().is_relative(), "rel_path must be relative");
    let base = match base_dir() {
        Some(path) => path,
        None => return Err(CastError::Environment("failed to locate base directory".to_string())),
    };
    let mut path = utf8(base.as_ref())?;
    path.push(utf8(rel_path.as_ref())?);
    Ok(path)
}

/// Turns a user-supplied item into the absolute form stored in playlists.
///
/// URLs are kept verbatim. A leading `~/` is expanded to the home directory, relative paths are
/// resolved against the current directory, and `.`/`..` components are folded lexically.
pub fn expand_path(item: &str) -> Result<String> {
    if item.contains("://") {
        return Ok(item.to_string());
    }
    let path = match item.strip_prefix("~/") {
        Some(rest) => path_from(dirs::home_dir, rest)?,
        None if Utf8Path::new(item).is_absolute() => Utf8PathBuf::from(item),
        None => utf8(&std::env::current_dir()?)?.join(item),
    };

    let mut normalized = Utf8PathBuf::new();
    for component in path.components() {
        match component {
            Utf8Component::CurDir => (),
            Utf8Component::ParentDir => { normalized.pop(); },
            other => normalized.push(other.as_str()),
        }
    }
    Ok(normalized.into_string())
}

fn utf8(path: &Path) -> Result<Utf8PathBuf> {
    match path.to_str() {
        Some(str) => Ok(Utf8PathBuf::from(str)),
        None => Err(CastError::Environment(format!("Failed to convert {:?} to UTF-8 (other encodings not supported)", path))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_from_joins_relative_path() {
        let path = path_from(|| Some("/tmp/base"), "cast-playlist").unwrap();
        assert_eq!(path, "/tmp/base/cast-playlist");
    }

    #[test]
    fn path_from_fails_without_base() {
        assert!(path_from(|| None::<&str>, "x").is_err());
    }

    #[test]
    fn expand_path_keeps_urls() {
        assert_eq!(expand_path("http://10.0.0.2:8000/a b.mp4").unwrap(), "http://10.0.0.2:8000/a b.mp4");
    }

    #[test]
    fn expand_path_folds_dot_components() {
        assert_eq!(expand_path("/videos/./season1/../clip.mp4").unwrap(), "/videos/clip.mp4");
    }

    #[test]
    fn expand_path_resolves_relative_against_cwd() {
        let cwd = std::env::current_dir().unwrap();
        let expected = cwd.join("clip.mp4");
        assert_eq!(expand_path("clip.mp4").unwrap(), expected.to_str().unwrap());
    }
}
