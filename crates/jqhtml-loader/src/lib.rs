//! jqhtml Template Loader
//!
//! This crate provides a build plugin that loads `.jqhtml` template files by
//! handing them to an external jqhtml compiler and returning the generated
//! ES module to the build.
//!
//! # Overview
//!
//! For every path matching `\.jqhtml$` the plugin:
//!
//! 1. Reads the file as UTF-8 text
//! 2. Calls the [`TemplateCompiler`] with the source, the path and
//!    `{ format: "esm", sourcemap }`
//! 3. On success, returns the compiled code followed by an
//!    `export const __jqhtml_component_name = "<name>";` line, tagged with the
//!    `js` loader
//! 4. On a compile error, returns a single diagnostic built from the error's
//!    message, context and suggestion, located at its line and column
//!
//! A file that cannot be read is not turned into a diagnostic: the hook
//! fails and the build reports the read error.
//!
//! # Example
//!
//! ```
//! use jqhtml_build::PluginBuild;
//! use jqhtml_loader::{create_plugin, CompileError, CompileOptions, CompiledTemplate, PluginOptions};
//! use std::path::Path;
//!
//! let compiler = |_source: &str, _path: &Path, _options: &CompileOptions| {
//!     Ok::<_, CompileError>(CompiledTemplate::new("export default class Card {}", "Card"))
//! };
//!
//! let plugin = create_plugin(PluginOptions::default(), compiler);
//! let mut build = PluginBuild::new();
//! build.register(&plugin);
//! assert_eq!(build.plugin_names(), &["jqhtml".to_string()]);
//! ```
//!
//! # Compilers
//!
//! Any `Fn(&str, &Path, &CompileOptions) -> Result<CompiledTemplate, CompileError>`
//! closure is a compiler. [`CommandCompiler`] runs an external executable
//! instead; it is found via its config, the `JQHTML_COMPILER` environment
//! variable, or `jqhtml-compile` on `PATH`.
//!
//! # Crate Structure
//!
//! - [`plugin`] - The plugin and its load hook
//! - [`compiler`] - Compiler contract and result types
//! - [`command`] - Subprocess-backed compiler
//! - [`diagnostic`] - Compile error formatting
//! - [`output`] - Generated module text
//! - [`options`] - Plugin and compile options
//! - [`error`] - Error types

pub mod command;
pub mod compiler;
pub mod diagnostic;
pub mod error;
pub mod options;
pub mod output;
pub mod plugin;

// Re-export main types at crate root
pub use command::{CommandCompiler, CommandConfig};
pub use compiler::{CompileError, CompiledTemplate, TemplateCompiler};
pub use error::{CommandError, CommandResult, PluginError, PluginResult};
pub use options::{CompileOptions, ModuleFormat, PluginOptions};
pub use output::COMPONENT_NAME_EXPORT;
pub use plugin::{create_plugin, JqhtmlPlugin, LoadInterceptor, PLUGIN_NAME, TEMPLATE_FILTER};
