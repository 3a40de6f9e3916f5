use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Latest release as reported by the GitHub releases API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatestRelease {
    #[serde(default)]
    pub name: Option<String>,
    pub tag_name: String,
}

pub fn current_version() -> &'static str {
    VERSION
}

/// Fetch the latest release from a GitHub `releases/latest` endpoint.
pub fn fetch_latest_release(url: &str, timeout: Duration) -> Result<LatestRelease> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(format!("unirename/{}", VERSION))
        .timeout(timeout)
        .build()
        .map_err(|e| Error::internal_io(e.to_string(), Some("create HTTP client".to_string())))?;

    let response = client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(|e| request_error(url, e))?;

    response.json().map_err(|e| request_error(url, e))
}

fn request_error(url: &str, err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::update_check_timeout(url)
    } else {
        Error::update_check_failed(url, err.to_string())
    }
}

/// Parse a release tag into numeric components.
///
/// Strips a leading `v` and any trailing qualifier: `v1.2.3-alpha` → `[1, 2, 3]`.
pub fn parse_version(tag: &str) -> Option<Vec<u64>> {
    let version_pattern = Regex::new(r"^[vV]?((?:\d+\.)*\d+)").ok()?;
    let caps = version_pattern.captures(tag.trim())?;
    caps[1]
        .split('.')
        .map(|part| part.parse::<u64>().ok())
        .collect()
}

/// Component-wise comparison; missing components count as zero.
pub fn version_is_newer(latest: &[u64], current: &[u64]) -> bool {
    let len = latest.len().max(current.len());
    for i in 0..len {
        let l = latest.get(i).copied().unwrap_or(0);
        let c = current.get(i).copied().unwrap_or(0);
        if l != c {
            return l > c;
        }
    }
    false
}

/// Whether `latest_tag` names a newer release than `current`.
///
/// Unparseable tags never report an update.
pub fn is_update_available(latest_tag: &str, current: &str) -> bool {
    match (parse_version(latest_tag), parse_version(current)) {
        (Some(l), Some(c)) => version_is_newer(&l, &c),
        _ => false,
    }
}
