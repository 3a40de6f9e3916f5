use crate::error::{Error, Result};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use std::io::Read;
use std::path::Path;

// ============================================================================
// JSON Parsing Utilities
// ============================================================================

/// Parse JSON string into typed value.
pub(crate) fn from_str<T: DeserializeOwned>(s: &str) -> Result<T> {
    serde_json::from_str(s).map_err(|e| {
        Error::validation_invalid_json(
            e,
            Some("parse json".to_string()),
            Some(s.chars().take(200).collect::<String>()),
        )
    })
}

/// Serialize value to pretty-printed JSON string.
pub(crate) fn to_string_pretty<T: Serialize>(data: &T) -> Result<String> {
    serde_json::to_string_pretty(data)
        .map_err(|e| Error::internal_json(e.to_string(), Some("serialize json".to_string())))
}

/// Read a JSON document from a file path, or from stdin when the path is `-`.
pub fn read_json_source(source: &str) -> Result<String> {
    use std::io::IsTerminal;

    if source.trim() == "-" {
        let mut buf = String::new();
        let mut stdin = std::io::stdin();
        if stdin.is_terminal() {
            return Err(Error::validation_invalid_argument(
                "scene",
                "Cannot read JSON from stdin when stdin is a TTY",
                None,
                None,
            ));
        }
        stdin
            .read_to_string(&mut buf)
            .map_err(|e| Error::internal_io(e.to_string(), Some("read stdin".to_string())))?;
        return Ok(buf);
    }

    let path = source.strip_prefix('@').unwrap_or(source);
    if path.trim().is_empty() {
        return Err(Error::validation_invalid_argument(
            "scene",
            "Missing file path",
            None,
            None,
        ));
    }

    std::fs::read_to_string(Path::new(path))
        .map_err(|e| Error::internal_io(e.to_string(), Some(format!("read {}", path))))
}

/// Write pretty JSON to a file, creating parent directories as needed.
pub(crate) fn write_json_file<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::internal_io(e.to_string(), Some(format!("create {}", parent.display())))
            })?;
        }
    }

    let content = to_string_pretty(data)?;
    std::fs::write(path, content)
        .map_err(|e| Error::internal_io(e.to_string(), Some(format!("write {}", path.display()))))
}

// ============================================================================
// JSON pointer edits
//
// Settings are nested objects, so only object members can be addressed.
// ============================================================================

/// Set the member at `pointer`, creating intermediate objects as needed.
pub fn set_json_pointer(root: &mut Value, pointer: &str, new_value: Value) -> Result<()> {
    let (parents, key) = pointer_tokens(pointer)?;

    let mut current = root;
    for token in parents {
        current = object_mut(current, pointer)?
            .entry(token)
            .or_insert_with(|| Value::Object(Map::new()));
    }

    object_mut(current, pointer)?.insert(key, new_value);
    Ok(())
}

/// Remove the member at `pointer`. A missing member is an error.
pub fn remove_json_pointer(root: &mut Value, pointer: &str) -> Result<()> {
    let (parents, key) = pointer_tokens(pointer)?;

    let mut current = root;
    for token in parents {
        current = object_mut(current, pointer)?
            .get_mut(&token)
            .ok_or_else(|| pointer_not_found(pointer))?;
    }

    object_mut(current, pointer)?
        .remove(&key)
        .map(|_| ())
        .ok_or_else(|| pointer_not_found(pointer))
}

/// Split `/a/b/c` into (`[a, b]`, `c`), unescaping `~1` and `~0`.
fn pointer_tokens(pointer: &str) -> Result<(Vec<String>, String)> {
    let invalid = |problem: String| {
        Error::validation_invalid_argument("pointer", problem, None, None)
            .with_hint("Address a setting like /rename/use_regex")
    };

    let Some(rest) = pointer.strip_prefix('/') else {
        return Err(invalid(format!(
            "JSON pointer must start with '/': '{}'",
            pointer
        )));
    };

    let mut tokens: Vec<String> = rest
        .split('/')
        .map(|t| t.replace("~1", "/").replace("~0", "~"))
        .collect();

    match tokens.pop() {
        Some(key) if !key.is_empty() => Ok((tokens, key)),
        _ => Err(invalid(format!("JSON pointer has no member name: '{}'", pointer))),
    }
}

fn object_mut<'a>(value: &'a mut Value, pointer: &str) -> Result<&'a mut Map<String, Value>> {
    if value.is_null() {
        *value = Value::Object(Map::new());
    }

    match value {
        Value::Object(map) => Ok(map),
        other => Err(Error::config_invalid_value(
            pointer,
            Some(other.to_string()),
            "Only object members can be addressed",
        )),
    }
}

fn pointer_not_found(pointer: &str) -> Error {
    Error::validation_invalid_argument(
        "pointer",
        format!("No setting at '{}'", pointer),
        None,
        None,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn set_creates_missing_objects() {
        let mut root = json!({});
        set_json_pointer(&mut root, "/rename/use_regex", json!(true)).unwrap();
        assert_eq!(root, json!({ "rename": { "use_regex": true } }));
    }

    #[test]
    fn set_overwrites_existing_value() {
        let mut root = json!({ "update_check": { "check_frequency_days": 3 } });
        set_json_pointer(&mut root, "/update_check/check_frequency_days", json!(7)).unwrap();
        assert_eq!(root["update_check"]["check_frequency_days"], 7);
    }

    #[test]
    fn set_rejects_pointer_without_slash() {
        let mut root = json!({});
        assert!(set_json_pointer(&mut root, "rename", json!(1)).is_err());
    }

    #[test]
    fn set_through_scalar_fails() {
        let mut root = json!({ "rename": 5 });
        assert!(set_json_pointer(&mut root, "/rename/use_regex", json!(true)).is_err());
    }

    #[test]
    fn remove_deletes_key() {
        let mut root = json!({ "rename": { "use_regex": true, "include_objects": false } });
        remove_json_pointer(&mut root, "/rename/use_regex").unwrap();
        assert_eq!(root, json!({ "rename": { "include_objects": false } }));
    }

    #[test]
    fn remove_missing_key_fails() {
        let mut root = json!({ "rename": {} });
        assert!(remove_json_pointer(&mut root, "/rename/use_regex").is_err());
        assert!(remove_json_pointer(&mut root, "/nope/use_regex").is_err());
    }

    #[test]
    fn pointer_must_name_a_member() {
        let mut root = json!({});
        let err = set_json_pointer(&mut root, "/", json!(1)).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::ValidationInvalidArgument);
        assert!(remove_json_pointer(&mut root, "").is_err());
    }

    #[test]
    fn escaped_tokens() {
        let mut root = json!({});
        set_json_pointer(&mut root, "/a~1b", json!(1)).unwrap();
        assert_eq!(root, json!({ "a/b": 1 }));
    }

    #[test]
    fn read_json_source_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.json");
        std::fs::write(&path, "{\"items\": []}").unwrap();

        let plain = read_json_source(path.to_str().unwrap()).unwrap();
        let at = read_json_source(&format!("@{}", path.display())).unwrap();

        assert_eq!(plain, "{\"items\": []}");
        assert_eq!(plain, at);
    }

    #[test]
    fn read_json_source_missing_file_is_io_error() {
        let err = read_json_source("/definitely/not/here.json").unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::InternalIoError);
    }
}
