//! jqhtml Build Pipeline Contract
//!
//! This crate defines the plugin surface a bundler exposes to load hooks,
//! modelled on esbuild's plugin API.
//!
//! # Overview
//!
//! - A [`Plugin`] has a stable name and a `setup` phase.
//! - During `setup` it calls [`PluginBuild::on_load`] with a regex filter
//!   and an [`OnLoadHandler`].
//! - For every module path, the build calls the first matching handler and
//!   gets back an [`OnLoadResult`]: module contents plus a [`Loader`] tag,
//!   or a list of diagnostic [`Message`]s.
//!
//! # Example
//!
//! ```
//! use async_trait::async_trait;
//! use jqhtml_build::{
//!     HookError, Loader, OnLoadArgs, OnLoadHandler, OnLoadOptions, OnLoadResult, Plugin,
//!     PluginBuild,
//! };
//! use regex::Regex;
//!
//! struct Text;
//!
//! #[async_trait]
//! impl OnLoadHandler for Text {
//!     async fn on_load(&self, args: &OnLoadArgs) -> Result<OnLoadResult, HookError> {
//!         Ok(OnLoadResult::contents(args.path.display().to_string(), Loader::Text))
//!     }
//! }
//!
//! struct TextPlugin;
//!
//! impl Plugin for TextPlugin {
//!     fn name(&self) -> &str {
//!         "text"
//!     }
//!
//!     fn setup(&self, build: &mut PluginBuild) {
//!         build.on_load(OnLoadOptions::new(Regex::new(r"\.txt$").unwrap()), Text);
//!     }
//! }
//!
//! let mut build = PluginBuild::new();
//! build.register(&TextPlugin);
//! assert_eq!(build.plugin_names(), &["text".to_string()]);
//! ```
//!
//! # Modules
//!
//! - [`plugin`]: Plugin trait, registration and dispatch
//! - [`result`]: Load arguments, results and diagnostics
//! - [`error`]: Error types

pub mod error;
pub mod plugin;
pub mod result;

// Re-export commonly used types at the crate root
pub use error::{BuildError, BuildResult, HookError};
pub use plugin::{OnLoadHandler, OnLoadOptions, Plugin, PluginBuild};
pub use result::{Loader, Location, Message, OnLoadArgs, OnLoadResult, FILE_NAMESPACE};
