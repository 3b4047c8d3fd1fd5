//! The jqhtml load hook.
//!
//! Reads `.jqhtml` files, hands them to the compiler and turns the outcome
//! into an [`OnLoadResult`]. Compile errors become diagnostics; read
//! failures are returned as errors for the build to report.

use std::path::Path;
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use jqhtml_build::{
    HookError, Loader, OnLoadArgs, OnLoadHandler, OnLoadOptions, OnLoadResult, Plugin,
    PluginBuild,
};
use regex::Regex;

use crate::compiler::TemplateCompiler;
use crate::diagnostic;
use crate::error::{PluginError, PluginResult};
use crate::options::PluginOptions;
use crate::output::render_module;

/// Name the plugin registers under.
pub const PLUGIN_NAME: &str = "jqhtml";

/// Path filter for template files.
pub const TEMPLATE_FILTER: &str = r"\.jqhtml$";

/// Creates the jqhtml plugin.
///
/// `options` is captured once and shared read-only by every load.
pub fn create_plugin<C>(options: PluginOptions, compiler: C) -> JqhtmlPlugin<C>
where
    C: TemplateCompiler + 'static,
{
    JqhtmlPlugin::new(options, compiler)
}

/// Build plugin that compiles `.jqhtml` templates to ES modules.
pub struct JqhtmlPlugin<C> {
    interceptor: Arc<LoadInterceptor<C>>,
}

impl<C> JqhtmlPlugin<C>
where
    C: TemplateCompiler + 'static,
{
    /// Creates the plugin with the given options and compiler.
    pub fn new(options: PluginOptions, compiler: C) -> Self {
        Self {
            interceptor: Arc::new(LoadInterceptor::new(options, compiler)),
        }
    }

    /// Returns the options captured at construction.
    pub fn options(&self) -> &PluginOptions {
        &self.interceptor.options
    }

    /// Returns the load hook, for driving it without a build.
    pub fn interceptor(&self) -> &LoadInterceptor<C> {
        &self.interceptor
    }
}

impl<C> Plugin for JqhtmlPlugin<C>
where
    C: TemplateCompiler + 'static,
{
    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    fn setup(&self, build: &mut PluginBuild) {
        build.on_load(
            OnLoadOptions::new(template_filter()),
            SharedInterceptor(Arc::clone(&self.interceptor)),
        );
    }
}

static TEMPLATE_REGEX: OnceLock<Regex> = OnceLock::new();

fn template_filter() -> Regex {
    TEMPLATE_REGEX
        .get_or_init(|| Regex::new(TEMPLATE_FILTER).expect("invalid regex pattern"))
        .clone()
}

/// The per-file load hook.
pub struct LoadInterceptor<C> {
    options: PluginOptions,
    compiler: C,
}

impl<C> LoadInterceptor<C>
where
    C: TemplateCompiler,
{
    /// Creates a load hook.
    pub fn new(options: PluginOptions, compiler: C) -> Self {
        Self { options, compiler }
    }

    /// Loads one template file.
    ///
    /// Returns `Err` only if the file cannot be read. Compile failures come
    /// back as `Ok` with a single diagnostic.
    pub async fn load(&self, path: &Path) -> PluginResult<OnLoadResult> {
        log::debug!("loading template {}", path.display());

        let source = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| PluginError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(self.compile(&source, path).await)
    }

    /// Compiles already-read template source as if it came from `path`.
    pub async fn compile(&self, source: &str, path: &Path) -> OnLoadResult {
        let options = self.options.compile_options();
        match self.compiler.compile(source, path, &options).await {
            Ok(compiled) => {
                log::debug!(
                    "compiled {} as component {}",
                    path.display(),
                    compiled.component_name
                );
                OnLoadResult::contents(render_module(&compiled), Loader::Js)
            }
            Err(error) => {
                let message = diagnostic::to_message(&error, path);
                log::debug!("failed to compile {}: {}", path.display(), message.text);
                OnLoadResult::error(message)
            }
        }
    }
}

struct SharedInterceptor<C>(Arc<LoadInterceptor<C>>);

#[async_trait]
impl<C> OnLoadHandler for SharedInterceptor<C>
where
    C: TemplateCompiler + 'static,
{
    async fn on_load(&self, args: &OnLoadArgs) -> Result<OnLoadResult, HookError> {
        self.0.load(&args.path).await.map_err(HookError::from)
    }
}
