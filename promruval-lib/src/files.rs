//! Expansion of command line path patterns into rule files

use crate::Result;
use camino::Utf8PathBuf;
use ohno::IntoAppError;

const LOG_TARGET: &str = "     files";

/// Expand each pattern in order and concatenate the matches.
///
/// Matches are not deduplicated: a file matched by two patterns is listed twice.
/// A pattern matching nothing contributes nothing. A malformed pattern fails
/// the whole resolution. Matches that cannot be read or whose path is not
/// UTF-8 are skipped.
pub fn resolve<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<Utf8PathBuf>> {
    let mut files = Vec::new();

    for pattern in patterns {
        let pattern = pattern.as_ref();
        let entries = glob::glob(pattern).into_app_err_with(|| format!("invalid path pattern '{pattern}'"))?;

        let before = files.len();
        for entry in entries {
            match entry {
                Ok(path) => match Utf8PathBuf::from_path_buf(path) {
                    Ok(path) => files.push(path),
                    Err(path) => log::debug!(target: LOG_TARGET, "Skipping non UTF-8 path '{}' matched by '{pattern}'", path.display()),
                },
                Err(e) => log::debug!(target: LOG_TARGET, "Skipping unreadable entry while expanding '{pattern}': {e}"),
            }
        }

        log::debug!(target: LOG_TARGET, "Pattern '{pattern}' matched {} files", files.len() - before);
    }

    Ok(files)
}
