//! Lexical path normalization for file locations.
//!
//! Nothing here touches the filesystem: symlinks are preserved and paths
//! need not exist.

use std::env;
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Expand a leading `~` to the home directory.
///
/// `~user` syntax is not supported.
///
/// # Errors
///
/// Returns [`Error::InvalidPath`] if the path is not UTF-8, the home
/// directory is unknown, or the path uses `~user`.
///
/// # Examples
///
/// ```
/// use stratum::path::normalize::expand_tilde;
/// use std::path::Path;
///
/// let expanded = expand_tilde(Path::new("~/conf/app.yaml")).unwrap();
/// assert!(expanded.is_absolute());
/// assert!(expanded.ends_with("conf/app.yaml"));
///
/// assert_eq!(expand_tilde(Path::new("rel/app.yaml")).unwrap(), Path::new("rel/app.yaml"));
/// ```
pub fn expand_tilde(path: &Path) -> Result<PathBuf> {
    let text = path.to_str().ok_or_else(|| Error::InvalidPath {
        path: path.to_path_buf(),
        reason: "path contains invalid UTF-8".to_string(),
    })?;

    let Some(rest) = text.strip_prefix('~') else {
        return Ok(path.to_path_buf());
    };

    let home = home::home_dir().ok_or_else(|| Error::InvalidPath {
        path: path.to_path_buf(),
        reason: "cannot determine home directory".to_string(),
    })?;

    if rest.is_empty() {
        Ok(home)
    } else if let Some(tail) = rest.strip_prefix('/').or_else(|| rest.strip_prefix('\\')) {
        Ok(home.join(tail))
    } else {
        Err(Error::InvalidPath {
            path: path.to_path_buf(),
            reason: "~user syntax is not supported; use ~ or ~/path".to_string(),
        })
    }
}

/// Drop `.` components and fold `..` into the preceding component.
///
/// # Errors
///
/// Returns [`Error::InvalidPath`] when `..` would climb above the root.
///
/// # Examples
///
/// ```
/// use stratum::path::normalize::resolve_components;
/// use std::path::PathBuf;
///
/// let resolved = resolve_components("/conf/./base/../app.yaml".as_ref()).unwrap();
/// assert_eq!(resolved, PathBuf::from("/conf/app.yaml"));
/// ```
pub fn resolve_components(path: &Path) -> Result<PathBuf> {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir | Component::Normal(_) => {
                result.push(component);
            }
            Component::CurDir => {}
            Component::ParentDir => {
                let climbed = matches!(
                    result.components().next_back(),
                    Some(Component::Normal(_))
                ) && result.pop();
                if !climbed {
                    return Err(Error::InvalidPath {
                        path: path.to_path_buf(),
                        reason: "too many '..' components".to_string(),
                    });
                }
            }
        }
    }
    Ok(result)
}

/// Make `path` absolute against `base` and resolve its components.
///
/// # Errors
///
/// Returns [`Error::InvalidPath`] when the joined path climbs above the root.
///
/// # Examples
///
/// ```
/// use stratum::path::normalize::absolutize;
/// use std::path::Path;
///
/// let path = absolutize(Path::new("../shared/app.yaml"), Path::new("/srv/conf")).unwrap();
/// assert_eq!(path, Path::new("/srv/shared/app.yaml"));
/// ```
pub fn absolutize(path: &Path, base: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        resolve_components(path)
    } else {
        resolve_components(&base.join(path))
    }
}

/// Expand `~`, make the path absolute against the working directory and
/// resolve its components.
///
/// # Errors
///
/// Returns [`Error::InvalidPath`] if expansion fails, the working directory
/// is unavailable, or the path climbs above the root.
pub fn normalize(path: &Path) -> Result<PathBuf> {
    let expanded = expand_tilde(path)?;
    if expanded.is_absolute() {
        return resolve_components(&expanded);
    }
    let cwd = env::current_dir().map_err(|e| Error::InvalidPath {
        path: path.to_path_buf(),
        reason: format!("cannot get current directory: {e}"),
    })?;
    absolutize(&expanded, &cwd)
}
