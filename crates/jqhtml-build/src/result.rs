//! Request and result types exchanged between the build and its load hooks.
//!
//! The serialized form of [`OnLoadResult`] matches the object an esbuild
//! `onLoad` callback returns, so results can be handed to a JavaScript host
//! or written out as JSON unchanged.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Namespace assigned to paths that resolve to files on disk.
pub const FILE_NAMESPACE: &str = "file";

/// Arguments passed to a load hook for a single matched module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnLoadArgs {
    /// Resolved (absolute) path of the module.
    pub path: PathBuf,
    /// Namespace the path was resolved in.
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

fn default_namespace() -> String {
    FILE_NAMESPACE.to_string()
}

impl OnLoadArgs {
    /// Creates load arguments for a file in the default namespace.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            namespace: default_namespace(),
        }
    }

    /// Creates load arguments for a path in a custom namespace.
    pub fn with_namespace(path: impl Into<PathBuf>, namespace: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            namespace: namespace.into(),
        }
    }
}

/// How the build should interpret the contents returned by a load hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Loader {
    /// Standard JavaScript module code.
    Js,
    /// JavaScript with JSX.
    Jsx,
    /// TypeScript.
    Ts,
    /// TypeScript with JSX.
    Tsx,
    /// Stylesheet.
    Css,
    /// JSON document.
    Json,
    /// Plain text exported as a string.
    Text,
}

impl Loader {
    /// Returns the loader tag as the host spells it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Loader::Js => "js",
            Loader::Jsx => "jsx",
            Loader::Ts => "ts",
            Loader::Tsx => "tsx",
            Loader::Css => "css",
            Loader::Json => "json",
            Loader::Text => "text",
        }
    }
}

impl std::fmt::Display for Loader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source position attached to a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// File the diagnostic refers to.
    pub file: PathBuf,
    /// 1-based line number.
    pub line: u32,
    /// Column within the line; 0 when unknown.
    pub column: u32,
}

impl Location {
    /// Creates a new location.
    pub fn new(file: impl Into<PathBuf>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

/// A diagnostic reported by a load hook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Human-readable diagnostic text.
    pub text: String,
    /// Where the problem is, if known. Serialized as `null` when absent.
    pub location: Option<Location>,
}

impl Message {
    /// Creates a diagnostic without a location.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            location: None,
        }
    }

    /// Attaches a location to the diagnostic.
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.location {
            Some(ref loc) => write!(
                f,
                "{}:{}:{}: {}",
                loc.file.display(),
                loc.line,
                loc.column,
                self.text
            ),
            None => write!(f, "{}", self.text),
        }
    }
}

/// Outcome of a load hook: either module contents or diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OnLoadResult {
    /// The hook produced module contents.
    Contents {
        /// Module source text.
        contents: String,
        /// How the contents should be interpreted.
        loader: Loader,
    },
    /// The hook failed and reports one or more diagnostics.
    Errors {
        /// Diagnostics to surface to the user.
        errors: Vec<Message>,
    },
}

impl OnLoadResult {
    /// Creates a successful result.
    pub fn contents(contents: impl Into<String>, loader: Loader) -> Self {
        Self::Contents {
            contents: contents.into(),
            loader,
        }
    }

    /// Creates a failed result with a single diagnostic.
    pub fn error(message: Message) -> Self {
        Self::Errors {
            errors: vec![message],
        }
    }

    /// Returns true if the hook produced contents.
    pub fn is_contents(&self) -> bool {
        matches!(self, OnLoadResult::Contents { .. })
    }

    /// Returns true if the hook reported diagnostics.
    pub fn is_errors(&self) -> bool {
        matches!(self, OnLoadResult::Errors { .. })
    }

    /// Returns the module contents, if any.
    pub fn contents_str(&self) -> Option<&str> {
        match self {
            OnLoadResult::Contents { contents, .. } => Some(contents),
            OnLoadResult::Errors { .. } => None,
        }
    }

    /// Returns the loader, if the hook produced contents.
    pub fn loader(&self) -> Option<Loader> {
        match self {
            OnLoadResult::Contents { loader, .. } => Some(*loader),
            OnLoadResult::Errors { .. } => None,
        }
    }

    /// Returns the reported diagnostics (empty for successful results).
    pub fn errors(&self) -> &[Message] {
        match self {
            OnLoadResult::Contents { .. } => &[],
            OnLoadResult::Errors { errors } => errors,
        }
    }

    /// Serializes the result to the host's JSON shape.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
