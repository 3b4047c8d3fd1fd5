//! Compiler backed by an external executable.
//!
//! The executable receives the template source on stdin and these
//! arguments after any configured ones:
//!
//! ```text
//! --path <file> --format <esm|cjs|iife> [--sourcemap]
//! ```
//!
//! It must print a single JSON object on stdout, either
//! `{"code": "...", "componentName": "..."}` on success or
//! `{"error": {"message": "...", "line": 4, ...}}` on failure.
//!
//! A failure response is honoured whatever the exit status. Otherwise a
//! non-zero exit is reported with the compiler's stderr.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::compiler::{CompileError, CompiledTemplate, TemplateCompiler};
use crate::error::{CommandError, CommandResult};
use crate::options::CompileOptions;

/// Default timeout for one compile (1 minute).
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Environment variable naming the compiler executable.
pub const COMPILER_ENV: &str = "JQHTML_COMPILER";

/// Executable looked up on `PATH` when nothing else is configured.
pub const DEFAULT_PROGRAM: &str = "jqhtml-compile";

/// Configuration for [`CommandCompiler`].
#[derive(Debug, Clone)]
pub struct CommandConfig {
    /// Path to the compiler executable.
    pub program: Option<PathBuf>,
    /// Arguments placed before the per-file arguments.
    pub args: Vec<String>,
    /// Timeout for a single compile.
    pub timeout: Duration,
    /// Working directory for the compiler process.
    pub working_dir: Option<PathBuf>,
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            program: None,
            args: Vec::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            working_dir: None,
        }
    }
}

impl CommandConfig {
    /// Creates a config for the given executable.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: Some(program.into()),
            ..Default::default()
        }
    }

    /// Appends an argument passed before the per-file arguments.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Sets the timeout duration.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the timeout in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    /// Sets the working directory.
    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }
}

/// Response printed by the compiler executable.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CompilerResponse {
    Failure { error: CompileError },
    Success(CompiledTemplate),
}

/// A [`TemplateCompiler`] that runs an external executable per template.
#[derive(Debug, Clone)]
pub struct CommandCompiler {
    program: PathBuf,
    config: CommandConfig,
}

impl CommandCompiler {
    /// Locates the compiler executable and creates the compiler.
    ///
    /// Looks at the configured program, then `JQHTML_COMPILER`, then
    /// `jqhtml-compile` on `PATH`. A configured program that is a bare name
    /// is also looked up on `PATH`.
    pub fn discover(config: CommandConfig) -> CommandResult<Self> {
        let program = find_program(config.program.as_deref())?;
        log::debug!("using jqhtml compiler {}", program.display());
        Ok(Self { program, config })
    }

    /// Returns the resolved executable path.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Returns a reference to the configuration.
    pub fn config(&self) -> &CommandConfig {
        &self.config
    }

    fn command(&self, path: &Path, options: &CompileOptions) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.config.args)
            .arg("--path")
            .arg(path)
            .arg("--format")
            .arg(options.format.as_str());
        if options.sourcemap {
            cmd.arg("--sourcemap");
        }
        if let Some(ref dir) = self.config.working_dir {
            cmd.current_dir(dir);
        }
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }

    /// Runs the executable for one template.
    ///
    /// `Ok(Err(_))` is a compile error reported by the compiler itself.
    pub async fn run(
        &self,
        source: &str,
        path: &Path,
        options: &CompileOptions,
    ) -> CommandResult<Result<CompiledTemplate, CompileError>> {
        let mut child = self
            .command(path, options)
            .spawn()
            .map_err(|source| CommandError::SpawnFailed {
                program: self.program.clone(),
                source,
            })?;

        // stdin is written concurrently with draining stdout/stderr.
        let writer = child.stdin.take().map(|mut stdin| {
            let source = source.to_owned();
            tokio::spawn(async move {
                stdin.write_all(source.as_bytes()).await?;
                stdin.shutdown().await
            })
        });

        let output = tokio::time::timeout(self.config.timeout, child.wait_with_output())
            .await
            .map_err(|_| CommandError::Timeout {
                timeout: self.config.timeout,
            })??;

        if let Some(writer) = writer {
            // The compiler may exit without reading all of stdin.
            if let Err(e) = writer.await.map_err(std::io::Error::other)? {
                log::debug!("compiler did not read the whole template: {}", e);
            }
        }

        if !output.status.success() {
            if let Ok(CompilerResponse::Failure { error }) =
                serde_json::from_slice::<CompilerResponse>(&output.stdout)
            {
                return Ok(Err(error));
            }
            let exit_code = output.status.code().unwrap_or(-1);
            return Err(CommandError::non_zero_exit(
                exit_code,
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        let response: CompilerResponse =
            serde_json::from_slice(&output.stdout).map_err(CommandError::MalformedOutput)?;

        Ok(match response {
            CompilerResponse::Success(compiled) => Ok(compiled),
            CompilerResponse::Failure { error } => Err(error),
        })
    }
}

#[async_trait]
impl TemplateCompiler for CommandCompiler {
    async fn compile(
        &self,
        source: &str,
        path: &Path,
        options: &CompileOptions,
    ) -> Result<CompiledTemplate, CompileError> {
        match self.run(source, path, options).await {
            Ok(result) => result,
            Err(e) => Err(e.into()),
        }
    }
}

fn find_program(configured: Option<&Path>) -> CommandResult<PathBuf> {
    // Check config override first
    if let Some(path) = configured {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        if let Ok(path) = which::which(path) {
            return Ok(path);
        }
        log::debug!(
            "configured jqhtml compiler {} not found, falling back to {} and PATH",
            path.display(),
            COMPILER_ENV
        );
    }

    // Check JQHTML_COMPILER environment variable
    if let Ok(path) = std::env::var(COMPILER_ENV) {
        let path = PathBuf::from(path);
        if path.exists() {
            return Ok(path);
        }
    }

    which::which(DEFAULT_PROGRAM).map_err(|_| CommandError::NotFound)
}
