//! CLI response formatting and output.
//!
//! Provides the JSON envelope, the human-readable path, and exit code mapping.

use console::style;
use importshift::error::Hint;
use importshift::{Error, ErrorCode, Result};
use serde::Serialize;
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

#[derive(Debug, Serialize)]
pub struct CliResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CliError>,
}

#[derive(Debug, Serialize)]
pub struct CliError {
    pub code: String,
    pub message: String,
    pub details: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hints: Option<Vec<Hint>>,
}

impl<T: Serialize> CliResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            Error::internal_json(e.to_string(), Some("serialize response".to_string()))
        })
    }
}

impl CliResponse<()> {
    pub fn from_error(err: &Error) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(CliError {
                code: err.code.as_str().to_string(),
                message: err.message.clone(),
                details: err.details.clone(),
                hints: if err.hints.is_empty() {
                    None
                } else {
                    Some(err.hints.clone())
                },
            }),
        }
    }
}

fn write_stdout(payload: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = write!(handle, "{}", payload) {
        if e.kind() == io::ErrorKind::BrokenPipe {
            return Ok(()); // Exit gracefully on SIGPIPE
        }
        return Err(Error::internal_io(
            e.to_string(),
            Some("write stdout".to_string()),
        ));
    }
    Ok(())
}

fn print_response<T: Serialize>(response: &CliResponse<T>) -> Result<()> {
    let payload = response.to_json()?;
    write_stdout(&format!("{}\n", payload))
}

fn print_error_human(err: &Error) {
    eprintln!("{} {}", style("error:").red().bold(), style(&err.message).red());
    let reason = err.reason();
    if reason != err.message {
        eprintln!("  {}", reason);
    }
    for hint in &err.hints {
        eprintln!("  {} {}", style("hint:").yellow(), hint.message);
    }
}

/// Print a command result in the requested mode and return the process exit code.
pub fn emit<T, F>(mode: OutputMode, result: Result<(T, i32)>, render: F) -> i32
where
    T: Serialize,
    F: FnOnce(&T) -> String,
{
    let (outcome, exit_code) = match result {
        Ok((data, exit_code)) => {
            let printed = match mode {
                OutputMode::Json => print_response(&CliResponse::success(&data)),
                OutputMode::Human => write_stdout(&render(&data)),
            };
            (printed, exit_code)
        }
        Err(err) => {
            let exit_code = exit_code_for_error(err.code);
            match mode {
                OutputMode::Json => (print_response(&CliResponse::<()>::from_error(&err)), exit_code),
                OutputMode::Human => {
                    print_error_human(&err);
                    (Ok(()), exit_code)
                }
            }
        }
    };

    match outcome {
        Ok(()) => exit_code,
        Err(err) => {
            print_error_human(&err);
            exit_code_for_error(err.code)
        }
    }
}

pub fn exit_code_for_error(code: ErrorCode) -> i32 {
    match code {
        code if code.is_load_time() => 2,
        ErrorCode::DiscoveryRootNotFound => 4,
        _ => 1,
    }
}
