use clap::{Args, Subcommand};
use serde::Serialize;
use serde_json::Value;

use unirename::config::{remove_json_pointer, set_json_pointer};
use unirename::defaults::{self, UnirenameConfig};

use super::{CmdResult, GlobalArgs};

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the effective settings (unirename.json over built-in defaults)
    Show {
        /// Print the built-in defaults only
        #[arg(long)]
        builtin: bool,
    },
    /// Change one setting, addressed by JSON pointer (e.g. /rename/use_regex true)
    Set {
        pointer: String,
        /// New value as JSON
        value: String,
    },
    /// Drop one setting so its built-in default applies again
    Remove { pointer: String },
    /// Delete unirename.json
    Reset,
    /// Print where unirename.json lives
    Path,
}

#[derive(Debug, Serialize)]
pub struct ConfigOutput {
    action: &'static str,
    path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    settings: Option<UnirenameConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    changed: Option<Change>,
    #[serde(skip_serializing_if = "Option::is_none")]
    file_exists: Option<bool>,
}

#[derive(Debug, Serialize)]
struct Change {
    pointer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<Value>,
}

impl ConfigOutput {
    fn new(action: &'static str) -> unirename::Result<Self> {
        Ok(Self {
            action,
            path: defaults::config_path()?,
            settings: None,
            changed: None,
            file_exists: None,
        })
    }
}

pub fn run(args: ConfigArgs, _global: &GlobalArgs) -> CmdResult<ConfigOutput> {
    let output = match args.command {
        ConfigCommand::Show { builtin } => {
            let settings = if builtin {
                defaults::builtin_defaults()
            } else {
                defaults::load_config_strict()?
            };
            ConfigOutput {
                settings: Some(settings),
                ..ConfigOutput::new("show")?
            }
        }
        ConfigCommand::Set { pointer, value } => {
            let value = parse_value(&value)?;
            let settings = edit_config(|json| set_json_pointer(json, &pointer, value.clone()))?;
            ConfigOutput {
                settings: Some(settings),
                changed: Some(Change {
                    pointer,
                    value: Some(value),
                }),
                ..ConfigOutput::new("set")?
            }
        }
        ConfigCommand::Remove { pointer } => {
            let settings = edit_config(|json| remove_json_pointer(json, &pointer))?;
            ConfigOutput {
                settings: Some(settings),
                changed: Some(Change {
                    pointer,
                    value: None,
                }),
                ..ConfigOutput::new("remove")?
            }
        }
        ConfigCommand::Reset => {
            let deleted = defaults::reset_config()?;
            ConfigOutput {
                settings: Some(defaults::builtin_defaults()),
                file_exists: Some(false),
                ..ConfigOutput::new(if deleted { "reset" } else { "reset.noop" })?
            }
        }
        ConfigCommand::Path => ConfigOutput {
            file_exists: Some(defaults::config_exists()),
            ..ConfigOutput::new("path")?
        },
    };

    Ok((output, 0))
}

fn parse_value(raw: &str) -> unirename::Result<Value> {
    serde_json::from_str(raw).map_err(|e| {
        unirename::Error::validation_invalid_json(
            e,
            Some("parse config value".to_string()),
            Some(raw.chars().take(200).collect()),
        )
    })
}

/// Edit the stored settings as JSON. The result must still deserialize into
/// [`UnirenameConfig`] before it is written.
fn edit_config<F>(edit: F) -> unirename::Result<UnirenameConfig>
where
    F: FnOnce(&mut Value) -> unirename::Result<()>,
{
    let current = defaults::load_config_strict()?;
    let mut json = serde_json::to_value(&current).map_err(|e| {
        unirename::Error::internal_json(e.to_string(), Some("serialize config".to_string()))
    })?;

    edit(&mut json)?;

    let updated: UnirenameConfig = serde_json::from_value(json)
        .map_err(|e| unirename::Error::config_invalid_value("config", None, e.to_string()))?;
    defaults::save_config(&updated)?;
    Ok(updated)
}
