//! Mirrors static asset directories into the output root.

use std::fmt;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Copies each source directory into `destination` in order, preserving
/// relative paths. Later sources overwrite files from earlier ones, so pass
/// the defaults first and the project's own assets last. Sources that don't
/// exist are skipped.
pub fn copy_assets<P: AsRef<Path>>(sources: &[P], destination: &Path) -> Result<()> {
    for source in sources {
        let source = source.as_ref();
        if !source.is_dir() {
            log::debug!("no static files at {}; skipping", source.display());
            continue;
        }
        copy_dir(source, destination)?;
    }
    Ok(())
}

/// Recursively copies the contents of `source` into `destination`, creating
/// directories as needed.
pub fn copy_dir(source: &Path, destination: &Path) -> Result<()> {
    for result in WalkDir::new(source).sort_by_file_name() {
        let entry = result?;
        // strip_prefix can't fail; every entry is beneath `source`
        let relative = match entry.path().strip_prefix(source) {
            Ok(relative) => relative,
            Err(_) => continue,
        };
        let target = destination.join(relative);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target).map_err(|err| Error::Copy {
                from: entry.path().to_owned(),
                to: target.clone(),
                err,
            })?;
        } else {
            std::fs::copy(entry.path(), &target).map_err(|err| Error::Copy {
                from: entry.path().to_owned(),
                to: target.clone(),
                err,
            })?;
            log::debug!("copied {}", relative.display());
        }
    }
    Ok(())
}

/// The result of a fallible copy operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a problem mirroring static files.
#[derive(Debug)]
pub enum Error {
    /// Returned when a source directory can't be walked.
    Walk(walkdir::Error),

    /// Returned when a file or directory can't be copied.
    Copy {
        from: PathBuf,
        to: PathBuf,
        err: std::io::Error,
    },
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Walk(err) => err.fmt(f),
            Error::Copy { from, to, err } => write!(
                f,
                "copying `{}` to `{}`: {}",
                from.display(),
                to.display(),
                err
            ),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Walk(err) => Some(err),
            Error::Copy { err, .. } => Some(err),
        }
    }
}

impl From<walkdir::Error> for Error {
    /// Converts a [`walkdir::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator while walking source directories.
    fn from(err: walkdir::Error) -> Error {
        Error::Walk(err)
    }
}
