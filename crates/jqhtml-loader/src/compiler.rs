//! The template compiler contract.
//!
//! Parsing and code generation belong to an external compiler. The plugin
//! talks to it only through [`TemplateCompiler::compile`], which returns a
//! [`CompiledTemplate`] or a structured [`CompileError`].

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::diagnostic;
use crate::options::CompileOptions;

/// Output of a successful compile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledTemplate {
    /// Generated JavaScript module code.
    pub code: String,
    /// Component name derived by the compiler, exported for manual registration.
    pub component_name: String,
}

impl CompiledTemplate {
    /// Creates a compiled template.
    pub fn new(code: impl Into<String>, component_name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            component_name: component_name.into(),
        }
    }
}

/// A structured compile failure.
///
/// Every field is optional; the plugin checks each one for presence when
/// building the diagnostic shown to the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileError {
    /// Human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Excerpt of the template around the failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// How to fix the problem.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// 1-based line of the failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    /// Column of the failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
}

impl CompileError {
    /// Creates an error with just a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Default::default()
        }
    }

    /// Sets the source excerpt.
    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Sets the remediation hint.
    pub fn suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Sets the line, leaving the column unknown.
    pub fn line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    /// Sets line and column.
    pub fn at(mut self, line: u32, column: u32) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&diagnostic::format_message(self))
    }
}

impl std::error::Error for CompileError {}

/// An external template compiler.
///
/// Implementations must not keep per-call state: the plugin may call
/// `compile` for many files at once.
#[async_trait]
pub trait TemplateCompiler: Send + Sync {
    /// Compiles `source`, read from `path`, into a JavaScript module.
    async fn compile(
        &self,
        source: &str,
        path: &Path,
        options: &CompileOptions,
    ) -> Result<CompiledTemplate, CompileError>;
}

#[async_trait]
impl<F> TemplateCompiler for F
where
    F: Fn(&str, &Path, &CompileOptions) -> Result<CompiledTemplate, CompileError> + Send + Sync,
{
    async fn compile(
        &self,
        source: &str,
        path: &Path,
        options: &CompileOptions,
    ) -> Result<CompiledTemplate, CompileError> {
        self(source, path, options)
    }
}
