//! Plugin registration and load dispatch.
//!
//! A [`Plugin`] registers load hooks on a [`PluginBuild`] during `setup`.
//! The build then routes each module path to the first hook whose filter
//! and namespace match, in registration order.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use regex::Regex;

use crate::error::{BuildError, BuildResult, HookError};
use crate::result::{OnLoadArgs, OnLoadResult, FILE_NAMESPACE};

/// A build plugin.
pub trait Plugin: Send + Sync {
    /// Stable name used to attribute diagnostics and errors.
    fn name(&self) -> &str;

    /// Registers the plugin's hooks on the build.
    fn setup(&self, build: &mut PluginBuild);
}

/// Callback invoked for each module matched by an `on_load` rule.
///
/// Hooks may run concurrently for different paths.
#[async_trait]
pub trait OnLoadHandler: Send + Sync {
    /// Loads the module described by `args`.
    async fn on_load(&self, args: &OnLoadArgs) -> Result<OnLoadResult, HookError>;
}

/// Filter controlling which modules an `on_load` rule receives.
#[derive(Debug, Clone)]
pub struct OnLoadOptions {
    /// Pattern matched against the module path.
    pub filter: Regex,
    /// Namespace restriction; `None` matches only the file namespace.
    pub namespace: Option<String>,
}

impl OnLoadOptions {
    /// Creates options for a filter in the file namespace.
    pub fn new(filter: Regex) -> Self {
        Self {
            filter,
            namespace: None,
        }
    }

    /// Restricts the rule to the given namespace.
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Returns true if this rule applies to `args`.
    pub fn matches(&self, args: &OnLoadArgs) -> bool {
        let namespace = self.namespace.as_deref().unwrap_or(FILE_NAMESPACE);
        namespace == args.namespace && self.filter.is_match(&args.path.to_string_lossy())
    }
}

struct OnLoadRule {
    plugin: String,
    options: OnLoadOptions,
    handler: Arc<dyn OnLoadHandler>,
}

/// The registration surface handed to [`Plugin::setup`], and the dispatcher
/// that routes load requests to registered hooks.
#[derive(Default)]
pub struct PluginBuild {
    plugins: Vec<String>,
    current: Option<String>,
    rules: Vec<Arc<OnLoadRule>>,
}

impl PluginBuild {
    /// Creates an empty build.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs a plugin's `setup` against this build.
    pub fn register(&mut self, plugin: &dyn Plugin) -> &mut Self {
        let name = plugin.name().to_string();
        log::trace!("setting up plugin {}", name);
        self.current = Some(name.clone());
        plugin.setup(self);
        self.current = None;
        self.plugins.push(name);
        self
    }

    /// Registers a load hook.
    ///
    /// Called from within [`Plugin::setup`]; the hook is attributed to the
    /// plugin being set up.
    pub fn on_load(&mut self, options: OnLoadOptions, handler: impl OnLoadHandler + 'static) {
        let plugin = self
            .current
            .clone()
            .unwrap_or_else(|| "<anonymous>".to_string());
        self.rules.push(Arc::new(OnLoadRule {
            plugin,
            options,
            handler: Arc::new(handler),
        }));
    }

    /// Names of registered plugins, in registration order.
    pub fn plugin_names(&self) -> &[String] {
        &self.plugins
    }

    /// Number of registered load hooks.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    fn rule_for(&self, args: &OnLoadArgs) -> Option<Arc<OnLoadRule>> {
        self.rules
            .iter()
            .find(|rule| rule.options.matches(args))
            .cloned()
    }

    /// Loads a file-namespace path through the first matching hook.
    ///
    /// Returns `Ok(None)` if no hook claims the path.
    pub async fn load(&self, path: impl AsRef<Path>) -> BuildResult<Option<OnLoadResult>> {
        self.load_with(OnLoadArgs::file(path.as_ref())).await
    }

    /// Loads a module described by `args` through the first matching hook.
    pub async fn load_with(&self, args: OnLoadArgs) -> BuildResult<Option<OnLoadResult>> {
        match self.rule_for(&args) {
            Some(rule) => dispatch(rule, args).await.map(Some),
            None => {
                log::trace!("no load hook for {}", args.path.display());
                Ok(None)
            }
        }
    }

    /// Loads many paths concurrently, returning results in input order.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn load_all<I, P>(&self, paths: I) -> Vec<BuildResult<Option<OnLoadResult>>>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut tasks = Vec::new();
        for path in paths {
            let args = OnLoadArgs::file(path);
            let rule = self.rule_for(&args);
            let path = args.path.clone();
            let task = tokio::spawn(async move {
                match rule {
                    Some(rule) => dispatch(rule, args).await.map(Some),
                    None => Ok(None),
                }
            });
            tasks.push((path, task));
        }

        let mut results = Vec::with_capacity(tasks.len());
        for (path, task) in tasks {
            let result = match task.await {
                Ok(result) => result,
                Err(e) => Err(BuildError::TaskFailed {
                    path,
                    message: e.to_string(),
                }),
            };
            results.push(result);
        }
        results
    }
}

async fn dispatch(rule: Arc<OnLoadRule>, args: OnLoadArgs) -> BuildResult<OnLoadResult> {
    log::trace!("plugin {} loading {}", rule.plugin, args.path.display());
    rule.handler
        .on_load(&args)
        .await
        .map_err(|source| BuildError::hook(rule.plugin.clone(), args.path.clone(), source))
}
