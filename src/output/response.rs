//! JSON envelope written to stdout for every command, plus exit-code mapping.

use serde::Serialize;
use serde_json::Value;
use std::io::{self, Write};
use unirename::error::Hint;
use unirename::{Error, ErrorCode, Result};

/// `{ "success": true, "data": ... }` or `{ "success": false, "error": ... }`
#[derive(Debug, Serialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<Hint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retryable: Option<bool>,
}

impl From<&Error> for ErrorBody {
    fn from(err: &Error) -> Self {
        Self {
            code: err.code.as_str(),
            message: err.message.clone(),
            details: err.details.clone(),
            hints: err.hints.clone(),
            retryable: err.retryable,
        }
    }
}

impl Envelope {
    pub fn from_result(result: Result<Value>) -> Self {
        match result {
            Ok(data) => Self {
                success: true,
                data: Some(data),
                error: None,
            },
            Err(err) => Self {
                success: false,
                data: None,
                error: Some(ErrorBody::from(&err)),
            },
        }
    }

    fn render(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::internal_json(e.to_string(), Some("render envelope".to_string())))
    }
}

/// Serialize a command's output. Errors keep their own exit code mapping.
pub fn map_cmd_result_to_json<T: Serialize>(result: Result<(T, i32)>) -> (Result<Value>, i32) {
    let (data, exit_code) = match result {
        Ok(ok) => ok,
        Err(err) => {
            let exit_code = exit_code_for_error(err.code);
            return (Err(err), exit_code);
        }
    };

    match serde_json::to_value(data) {
        Ok(value) => (Ok(value), exit_code),
        Err(e) => (
            Err(Error::internal_json(e.to_string(), Some("serialize output".to_string()))),
            1,
        ),
    }
}

fn exit_code_for_error(code: ErrorCode) -> i32 {
    match code {
        ErrorCode::UpdateCheckFailed | ErrorCode::UpdateCheckTimeout => 20,

        ErrorCode::InternalIoError | ErrorCode::InternalJsonError | ErrorCode::InternalUnexpected => 1,

        // Bad rules, bad input and bad config are all the caller's to fix
        ErrorCode::RenameEmptyPattern
        | ErrorCode::RenameEmptyScope
        | ErrorCode::RenameInvalidPattern
        | ErrorCode::ConfigInvalidJson
        | ErrorCode::ConfigInvalidValue
        | ErrorCode::ValidationMissingArgument
        | ErrorCode::ValidationInvalidArgument
        | ErrorCode::ValidationInvalidJson => 2,
    }
}

pub fn print_json_result(result: Result<Value>) -> Result<()> {
    let rendered = Envelope::from_result(result).render()?;

    match writeln!(io::stdout().lock(), "{}", rendered) {
        Err(e) if e.kind() != io::ErrorKind::BrokenPipe => Err(Error::internal_io(
            e.to_string(),
            Some("write stdout".to_string()),
        )),
        _ => Ok(()),
    }
}
