use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::LognormError;

#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) enum RulebasePath {
    File(PathBuf),
    Directory(PathBuf),
}

/// Resolves `path` the way `stat(2)` would, following symlinks.
pub(crate) fn classify(path: &Path) -> Result<RulebasePath, LognormError> {
    let Ok(metadata) = fs::metadata(path) else {
        return Err(LognormError::NotFound {
            path: path.to_path_buf(),
        });
    };

    if metadata.is_file() {
        Ok(RulebasePath::File(path.to_path_buf()))
    } else if metadata.is_dir() {
        Ok(RulebasePath::Directory(path.to_path_buf()))
    } else {
        Err(LognormError::InvalidPath {
            path: path.to_path_buf(),
        })
    }
}

/// Regular files directly inside `dir`, sorted by file name.
///
/// Entries are filtered on their own type, so symlinks and subdirectories are
/// skipped.
pub(crate) fn rulebase_files(dir: &Path) -> Result<Vec<PathBuf>, LognormError> {
    let io_err = |source: std::io::Error| LognormError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let file_type = entry.file_type().map_err(io_err)?;
        if file_type.is_file() {
            files.push(entry.path());
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}
