//! Raw byte access to a match source: a local file or an HTTP(S) URL.

use tracing::debug;

use crate::error::{CricError, Result};

/// Returns true when `source` should be fetched over the network.
pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Downloads `url` with the blocking client, failing on non-success statuses.
pub fn fetch_bytes(url: &str) -> Result<Vec<u8>> {
    let not_found = |e: reqwest::Error| CricError::SourceNotFound {
        location: url.to_string(),
        reason: e.to_string(),
    };

    let resp = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(not_found)?;
    Ok(resp.bytes().map_err(not_found)?.to_vec())
}

/// Loads the bytes of a match source from a local path or a URL.
pub fn read_source(source: &str) -> Result<Vec<u8>> {
    let bytes = if is_remote(source) {
        fetch_bytes(source)?
    } else {
        std::fs::read(source).map_err(|e| CricError::SourceNotFound {
            location: source.to_string(),
            reason: e.to_string(),
        })?
    };
    debug!(source, bytes = bytes.len(), "Match source read");
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_remote() {
        assert!(is_remote("https://example.org/0.csv"));
        assert!(is_remote("http://localhost/1.csv"));
        assert!(!is_remote("data/0.csv"));
        assert!(!is_remote("httpdata.csv"));
    }

    #[test]
    fn test_read_missing_local_source() {
        let err = read_source("/definitely/not/here/0.csv").unwrap_err();
        assert!(matches!(err, CricError::SourceNotFound { .. }));
    }
}
