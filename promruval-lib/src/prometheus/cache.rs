//! On-disk persistence of query outcomes between runs.

use super::QueryOutcome;
use crate::Result;
use chrono::{DateTime, Utc};
use core::time::Duration;
use ohno::IntoAppError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

const LOG_TARGET: &str = "     cache";

/// The persisted cache envelope.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheDocument {
    /// Backend the outcomes were obtained from
    pub url: String,

    /// When the document was written
    pub timestamp: DateTime<Utc>,

    /// Outcome per query expression
    pub queries: BTreeMap<String, QueryOutcome>,
}

/// Load the cached outcomes if the file exists, parses, was written for `url`, and is younger than `max_age`.
pub fn load_fresh(path: &Path, url: &str, max_age: Duration, now: DateTime<Utc>) -> Option<BTreeMap<String, QueryOutcome>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            log::debug!(target: LOG_TARGET, "No usable query cache at '{}': {e:#}", path.display());
            return None;
        }
    };

    let doc: CacheDocument = match serde_json::from_reader(BufReader::new(file)) {
        Ok(doc) => doc,
        Err(e) => {
            log::debug!(target: LOG_TARGET, "Ignoring unreadable query cache '{}': {e:#}", path.display());
            return None;
        }
    };

    if doc.url != url {
        log::debug!(target: LOG_TARGET, "Ignoring query cache '{}' written for a different backend ({})", path.display(), doc.url);
        return None;
    }

    // Future timestamps come from clock skew, treat them as fresh
    let age = now.signed_duration_since(doc.timestamp).to_std().unwrap_or(Duration::ZERO);
    if age >= max_age {
        log::debug!(target: LOG_TARGET,
            "Query cache '{}' expired (age: {}s, max age: {}s)",
            path.display(),
            age.as_secs(),
            max_age.as_secs()
        );
        return None;
    }

    log::debug!(target: LOG_TARGET, "Loaded {} cached queries from '{}'", doc.queries.len(), path.display());
    Some(doc.queries)
}

/// Write the cache envelope to `path`, creating parent directories as needed.
pub fn save(doc: &CacheDocument, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).into_app_err_with(|| format!("unable to create directory '{}'", parent.display()))?;
    }

    let file = File::create(path).into_app_err_with(|| format!("unable to create cache file '{}'", path.display()))?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, doc).into_app_err_with(|| format!("unable to write cache file '{}'", path.display()))?;
    writer
        .flush()
        .into_app_err_with(|| format!("unable to flush cache file '{}'", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "http://prometheus:9090";

    fn doc(timestamp: DateTime<Utc>) -> CacheDocument {
        let mut queries = BTreeMap::new();
        let _ = queries.insert(
            "up".to_string(),
            QueryOutcome {
                series: 3,
                duration: Duration::from_millis(12),
            },
        );
        CacheDocument {
            url: URL.to_string(),
            timestamp,
            queries,
        }
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_save_and_load_fresh() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("cache.json");

        save(&doc(Utc::now()), &path).unwrap();

        let queries = load_fresh(&path, URL, Duration::from_hours(1), Utc::now()).unwrap();
        assert_eq!(queries.get("up").map(|q| q.series), Some(3));
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_expired_cache_is_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("cache.json");

        save(&doc(Utc::now() - chrono::Duration::hours(2)), &path).unwrap();

        assert!(load_fresh(&path, URL, Duration::from_hours(1), Utc::now()).is_none());
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_future_timestamp_is_fresh() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("cache.json");

        save(&doc(Utc::now() + chrono::Duration::hours(1)), &path).unwrap();

        assert!(load_fresh(&path, URL, Duration::from_hours(1), Utc::now()).is_some());
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_cache_for_other_backend_is_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("cache.json");

        save(&doc(Utc::now()), &path).unwrap();

        assert!(load_fresh(&path, "http://other:9090", Duration::from_hours(1), Utc::now()).is_none());
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_missing_and_invalid_files() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.json");
        assert!(load_fresh(&missing, URL, Duration::from_hours(1), Utc::now()).is_none());

        let invalid = tmp.path().join("invalid.json");
        fs::write(&invalid, "not json").unwrap();
        assert!(load_fresh(&invalid, URL, Duration::from_hours(1), Utc::now()).is_none());
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_save_creates_parent_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("dir").join("cache.json");

        save(&doc(Utc::now()), &path).unwrap();
        assert!(path.exists());
    }
}
