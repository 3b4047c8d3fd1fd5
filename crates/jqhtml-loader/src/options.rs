//! Plugin and compiler options.

use serde::{Deserialize, Serialize};

/// Options accepted by [`create_plugin`](crate::create_plugin).
///
/// Only `sourcemap` is recognised. When read from JSON, unknown keys are
/// ignored rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginOptions {
    /// Ask the compiler to embed source-mapping metadata.
    pub sourcemap: bool,
}

impl Default for PluginOptions {
    fn default() -> Self {
        Self { sourcemap: true }
    }
}

impl PluginOptions {
    /// Creates the default options (`sourcemap: true`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether source maps are generated.
    pub fn sourcemap(mut self, sourcemap: bool) -> Self {
        self.sourcemap = sourcemap;
        self
    }

    /// Parses options from a JSON object.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Options passed to the compiler for every load.
    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions {
            format: ModuleFormat::Esm,
            sourcemap: self.sourcemap,
        }
    }
}

/// Module format requested from the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleFormat {
    /// ES module (`import`/`export`).
    Esm,
    /// CommonJS (`require`/`module.exports`).
    Cjs,
    /// Immediately-invoked function expression.
    Iife,
}

impl ModuleFormat {
    /// Returns the format name as the compiler expects it.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleFormat::Esm => "esm",
            ModuleFormat::Cjs => "cjs",
            ModuleFormat::Iife => "iife",
        }
    }
}

impl std::fmt::Display for ModuleFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options record handed to the compiler with each template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileOptions {
    /// Output module format.
    pub format: ModuleFormat,
    /// Embed source-mapping metadata.
    pub sourcemap: bool,
}
