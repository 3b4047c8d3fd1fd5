//! Error types for the jqhtml loader.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::compiler::CompileError;

/// Result type for load hook operations.
pub type PluginResult<T> = Result<T, PluginError>;

/// Failures of the load hook that are not compile errors.
///
/// Compile errors never appear here: they are turned into diagnostics on
/// the load result. These errors escape the hook and reach the build as a
/// generic load failure.
#[derive(Debug, Error)]
pub enum PluginError {
    /// The template file could not be read.
    #[error("Failed to read template {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PluginError {
    /// Returns the underlying I/O error.
    pub fn io_error(&self) -> &std::io::Error {
        match self {
            PluginError::Read { source, .. } => source,
        }
    }
}

/// Result type for subprocess compiler operations.
pub type CommandResult<T> = Result<T, CommandError>;

/// Errors raised while running an external compiler executable.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Compiler executable not found.
    #[error("jqhtml compiler executable not found. Install `jqhtml-compile` on PATH or set the JQHTML_COMPILER environment variable")]
    NotFound,

    /// Failed to spawn the compiler process.
    #[error("Failed to spawn jqhtml compiler {program}: {source}")]
    SpawnFailed {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The compiler did not finish in time.
    #[error("jqhtml compiler timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    /// The compiler exited with a non-zero status.
    #[error("jqhtml compiler exited with status {exit_code}: {stderr}")]
    NonZeroExit { exit_code: i32, stderr: String },

    /// The compiler's stdout was not a valid response.
    #[error("jqhtml compiler returned malformed output: {0}")]
    MalformedOutput(#[source] serde_json::Error),

    /// I/O error while talking to the compiler.
    #[error("I/O error while running jqhtml compiler: {0}")]
    Io(#[from] std::io::Error),
}

impl CommandError {
    /// Creates a new non-zero exit error.
    pub fn non_zero_exit(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self::NonZeroExit {
            exit_code,
            stderr: stderr.into(),
        }
    }
}

impl From<CommandError> for CompileError {
    fn from(err: CommandError) -> Self {
        CompileError::new(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_error_display() {
        let err = PluginError::Read {
            path: PathBuf::from("/src/Missing.jqhtml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.to_string().contains("/src/Missing.jqhtml"));
        assert_eq!(err.io_error().kind(), std::io::ErrorKind::NotFound);
    }

    #[test]
    fn test_command_error_display() {
        let err = CommandError::Timeout {
            timeout: Duration::from_secs(60),
        };
        assert!(err.to_string().ends_with("timed out after 60s"));

        let err = CommandError::Timeout {
            timeout: Duration::from_millis(200),
        };
        assert!(err.to_string().ends_with("timed out after 200ms"));

        let err = CommandError::non_zero_exit(2, "syntax error");
        assert!(err.to_string().contains("status 2"));
        assert!(err.to_string().contains("syntax error"));
    }

    #[test]
    fn test_command_error_becomes_location_free_compile_error() {
        let err: CompileError = CommandError::NotFound.into();
        assert!(err.message.unwrap().contains("not found"));
        assert_eq!(err.line, None);
        assert_eq!(err.context, None);
    }
}
