use crate::error::{Error, Result};
use std::env;
use std::path::PathBuf;

/// Base config directory (~/.config/unirename/, %APPDATA%\unirename on Windows)
pub fn unirename() -> Result<PathBuf> {
    #[cfg(windows)]
    {
        let appdata = env::var("APPDATA").map_err(|_| {
            Error::internal_unexpected(
                "APPDATA environment variable not set on Windows".to_string(),
            )
        })?;
        Ok(PathBuf::from(appdata).join("unirename"))
    }

    #[cfg(not(windows))]
    {
        let home = env::var("HOME").map_err(|_| {
            Error::internal_unexpected(
                "HOME environment variable not set on Unix-like system".to_string(),
            )
        })?;
        Ok(PathBuf::from(home).join(".config").join("unirename"))
    }
}

/// Global unirename.json config file path
pub fn unirename_json() -> Result<PathBuf> {
    Ok(unirename()?.join("unirename.json"))
}

/// Cached result of the last successful update check
pub fn update_check_cache() -> Result<PathBuf> {
    Ok(unirename()?.join("update_check.json"))
}
