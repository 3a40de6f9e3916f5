//! Update check: tells users when a newer unirename release is available.
//!
//! The result of the last successful check is cached in `update_check.json`.
//! While the cache is younger than `check_frequency_days` (and was written by
//! this same version) it is served as-is; otherwise the releases API is queried
//! once and the cache rewritten. A failed query leaves the cache untouched and
//! is never retried.
//!
//! Disable the startup hint via:
//! - Environment variable: `UNIRENAME_NO_UPDATE_CHECK=1`
//! - Config: `unirename config set /update_check/enabled false`

use crate::defaults::{self, UpdateCheckConfig, DEFAULT_RELEASES_PAGE};
use crate::error::Result;
use crate::paths;
use crate::release::{self, LatestRelease};
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const ENV_VAR_DISABLE: &str = "UNIRENAME_NO_UPDATE_CHECK";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateCheckCache {
    /// Local time of the last successful check, `%Y-%m-%d %H:%M:%S`.
    #[serde(default)]
    pub last_checked_timestamp: String,
    /// Release tag, e.g. `v1.4.0`.
    #[serde(default)]
    pub latest_version: String,
    #[serde(default)]
    pub latest_version_name: String,
    #[serde(default)]
    pub current_version: String,
    #[serde(default)]
    pub update_available: bool,
}

impl UpdateCheckCache {
    /// Cache record for a release fetched at `now`.
    pub fn from_release(release: &LatestRelease, current_version: &str, now: NaiveDateTime) -> Self {
        Self {
            last_checked_timestamp: now.format(TIMESTAMP_FORMAT).to_string(),
            latest_version: release.tag_name.clone(),
            latest_version_name: release.name.clone().unwrap_or_default(),
            current_version: current_version.to_string(),
            update_available: release::is_update_available(&release.tag_name, current_version),
        }
    }

    pub fn last_checked(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.last_checked_timestamp, TIMESTAMP_FORMAT).ok()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateStatus {
    /// True when the cached record was served without a network call.
    pub from_cache: bool,
    #[serde(flatten)]
    pub info: UpdateCheckCache,
    pub releases_url: String,
}

pub fn read_cache(path: &Path) -> Option<UpdateCheckCache> {
    let content = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
}

pub fn write_cache(path: &Path, cache: &UpdateCheckCache) -> Result<()> {
    crate::config::write_json_file(path, cache)
}

/// A cache is fresh when it was written by this version fewer than
/// `frequency_days` whole days before `now`. An unreadable timestamp is stale.
pub fn is_cache_fresh(
    cache: &UpdateCheckCache,
    now: NaiveDateTime,
    frequency_days: u32,
    current_version: &str,
) -> bool {
    let Some(last_checked) = cache.last_checked() else {
        return false;
    };

    let elapsed_days = (now - last_checked).num_days();
    elapsed_days < i64::from(frequency_days) && cache.current_version == current_version
}

/// Run an update check against an explicit cache file and fetcher.
///
/// With `force`, the cooldown is ignored. On fetch failure the error is
/// returned and the cache file is left as it was.
pub fn check_with<F>(
    cache_path: &Path,
    settings: &UpdateCheckConfig,
    force: bool,
    now: NaiveDateTime,
    fetch: F,
) -> Result<UpdateStatus>
where
    F: FnOnce(&str, Duration) -> Result<LatestRelease>,
{
    let current = release::current_version();

    if !force {
        if let Some(cached) = read_cache(cache_path) {
            if is_cache_fresh(&cached, now, settings.check_frequency_days, current) {
                return Ok(UpdateStatus {
                    from_cache: true,
                    info: cached,
                    releases_url: DEFAULT_RELEASES_PAGE.to_string(),
                });
            }
        }
    }

    let latest = fetch(
        &settings.releases_api_url,
        Duration::from_secs(settings.timeout_secs),
    )?;
    let info = UpdateCheckCache::from_release(&latest, current, now);

    if let Err(err) = write_cache(cache_path, &info) {
        log_status!("update", "Could not save update check cache: {}", err);
    }

    Ok(UpdateStatus {
        from_cache: false,
        info,
        releases_url: DEFAULT_RELEASES_PAGE.to_string(),
    })
}

/// Run an update check using the user's config and cache location.
pub fn check(force: bool) -> Result<UpdateStatus> {
    let config = defaults::load_config();
    let cache_path = paths::update_check_cache()?;

    check_with(
        &cache_path,
        &config.update_check,
        force,
        Local::now().naive_local(),
        release::fetch_latest_release,
    )
}

fn is_disabled_by_env() -> bool {
    std::env::var(ENV_VAR_DISABLE)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

fn print_hint(info: &UpdateCheckCache) {
    log_status!(
        "update",
        "unirename {} is available (current: {}). Download it from {}",
        info.latest_version,
        info.current_version,
        DEFAULT_RELEASES_PAGE
    );
}

/// Run the startup update check. Prints a hint to stderr if an update is available.
///
/// Errors are ignored; a failed query falls back to whatever the cache last said.
/// Call this from main.rs after arg parsing, skipping the `update` command itself.
pub fn run_startup_check() {
    if is_disabled_by_env() {
        return;
    }

    let config = defaults::load_config();
    if !config.update_check.enabled {
        return;
    }

    let Ok(cache_path) = paths::update_check_cache() else {
        return;
    };

    let info = match check_with(
        &cache_path,
        &config.update_check,
        false,
        Local::now().naive_local(),
        release::fetch_latest_release,
    ) {
        Ok(status) => Some(status.info),
        Err(_) => read_cache(&cache_path)
            .filter(|cache| cache.current_version == release::current_version()),
    };

    if let Some(info) = info.filter(|info| info.update_available) {
        print_hint(&info);
    }
}
