use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::config;
use crate::paths;
use crate::rename::RenameRule;

pub const DEFAULT_RELEASES_API: &str =
    "https://api.github.com/repos/gusztavj/T1nkR-Blender-Unified-Rename/releases/latest";
pub const DEFAULT_RELEASES_PAGE: &str =
    "https://github.com/gusztavj/T1nkR-Blender-Unified-Rename/releases";

/// Root configuration structure for unirename.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct UnirenameConfig {
    #[serde(default)]
    pub rename: RenameDefaults,

    #[serde(default)]
    pub update_check: UpdateCheckConfig,
}

/// Default rule values used when a rename flag is not given on the command line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameDefaults {
    #[serde(default)]
    pub use_regex: bool,

    #[serde(default = "default_true")]
    pub include_objects: bool,

    #[serde(default = "default_true")]
    pub include_collections: bool,
}

impl Default for RenameDefaults {
    fn default() -> Self {
        Self {
            use_regex: false,
            include_objects: true,
            include_collections: true,
        }
    }
}

impl RenameDefaults {
    /// Build a rule from these defaults. Dry run is never a persisted default.
    pub fn to_rule(&self, pattern: &str, replacement: &str) -> RenameRule {
        RenameRule {
            use_regex: self.use_regex,
            pattern: pattern.to_string(),
            replacement: replacement.to_string(),
            include_objects: self.include_objects,
            include_collections: self.include_collections,
            dry_run: false,
        }
    }

    pub fn from_rule(rule: &RenameRule) -> Self {
        Self {
            use_regex: rule.use_regex,
            include_objects: rule.include_objects,
            include_collections: rule.include_collections,
        }
    }
}

/// Update check settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateCheckConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Serve the cached result until it is this many whole days old
    #[serde(default = "default_check_frequency_days")]
    pub check_frequency_days: u32,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_releases_api_url")]
    pub releases_api_url: String,
}

impl Default for UpdateCheckConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            check_frequency_days: default_check_frequency_days(),
            timeout_secs: default_timeout_secs(),
            releases_api_url: default_releases_api_url(),
        }
    }
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_true() -> bool {
    true
}

fn default_check_frequency_days() -> u32 {
    3
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_releases_api_url() -> String {
    DEFAULT_RELEASES_API.to_string()
}

// =============================================================================
// Loading functions
// =============================================================================

/// Load the full unirename.json config, falling back to defaults on any error.
pub fn load_config() -> UnirenameConfig {
    load_config_from_file().unwrap_or_default()
}

/// Load config, surfacing a broken file instead of silently using defaults.
pub fn load_config_strict() -> crate::Result<UnirenameConfig> {
    let path = paths::unirename_json()?;
    if !path.exists() {
        return Ok(UnirenameConfig::default());
    }
    load_config_at(&path)
}

fn load_config_from_file() -> crate::Result<UnirenameConfig> {
    let path = paths::unirename_json()?;

    if !path.exists() {
        return Err(crate::Error::other("unirename.json not found"));
    }

    load_config_at(&path)
}

/// Read and parse a config file at an explicit path.
pub fn load_config_at(path: &Path) -> crate::Result<UnirenameConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        crate::Error::internal_io(e.to_string(), Some(format!("read {}", path.display())))
    })?;

    serde_json::from_str(&content)
        .map_err(|e| crate::Error::config_invalid_json(path.display().to_string(), e))
}

/// Save config to unirename.json (creates if missing).
pub fn save_config(config: &UnirenameConfig) -> crate::Result<()> {
    let path = paths::unirename_json()?;
    config::write_json_file(&path, config)
}

/// Check if unirename.json file exists
pub fn config_exists() -> bool {
    paths::unirename_json()
        .map(|p| p.exists())
        .unwrap_or(false)
}

/// Delete unirename.json file (reset to defaults)
pub fn reset_config() -> crate::Result<bool> {
    let path = paths::unirename_json()?;

    if path.exists() {
        fs::remove_file(&path).map_err(|e| {
            crate::Error::internal_io(e.to_string(), Some(format!("delete {}", path.display())))
        })?;
        Ok(true)
    } else {
        Ok(false)
    }
}

/// Get the path to unirename.json (for display purposes)
pub fn config_path() -> crate::Result<String> {
    Ok(paths::unirename_json()?.display().to_string())
}

/// Get built-in defaults (ignoring any file config)
pub fn builtin_defaults() -> UnirenameConfig {
    UnirenameConfig::default()
}
