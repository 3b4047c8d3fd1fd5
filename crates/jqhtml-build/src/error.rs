//! Error types for the build pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Error a load hook may return instead of a result.
///
/// Hooks report expected failures (such as compile errors) through
/// [`OnLoadResult::Errors`](crate::OnLoadResult::Errors). This type is for
/// failures the hook does not classify, such as an unreadable file.
pub type HookError = Box<dyn std::error::Error + Send + Sync>;

/// Result type for build operations.
pub type BuildResult<T> = Result<T, BuildError>;

/// Errors raised by the build while dispatching to plugins.
#[derive(Debug, Error)]
pub enum BuildError {
    /// A load hook failed without producing a result.
    #[error("[plugin {plugin}] failed to load {path}: {source}")]
    Hook {
        plugin: String,
        path: PathBuf,
        #[source]
        source: HookError,
    },

    /// A concurrent load task was cancelled or panicked.
    #[error("load task for {path} did not complete: {message}")]
    TaskFailed { path: PathBuf, message: String },
}

impl BuildError {
    /// Creates a hook error for the given plugin and path.
    pub fn hook(plugin: impl Into<String>, path: impl Into<PathBuf>, source: HookError) -> Self {
        Self::Hook {
            plugin: plugin.into(),
            path: path.into(),
            source,
        }
    }

    /// Returns the path the failing load was for.
    pub fn path(&self) -> &std::path::Path {
        match self {
            BuildError::Hook { path, .. } => path,
            BuildError::TaskFailed { path, .. } => path,
        }
    }
}
