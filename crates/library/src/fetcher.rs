//! External catalog fetching
//!
//! [`ScriptCatalogFetcher`] runs a script through a shell and an
//! interpreter (by default `osascript` driving the Books application),
//! captures everything the process prints and hands the text to
//! [`CatalogParser`]. A fetch never fails: launch, timeout and decode
//! problems are logged and produce an empty result.

use crate::parser::CatalogParser;
use async_trait::async_trait;
use log::{debug, error};
use mediashelf_config::ImportConfig;
use mediashelf_core::{AppError, BookRecord};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Script that lists every book in the Books application as `title||author;;`
pub const BOOKS_SCRIPT: &str = r#"tell application "Books"
    set output to ""
    repeat with b in books
        set output to output & (name of b as string) & "||" & (author of b as string) & ";;"
    end repeat
    return output
end tell"#;

/// Default upper bound on a single fetch
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Source of book records from outside the catalog
#[async_trait]
pub trait CatalogFetcher: Send + Sync {
    /// Returns every record the source currently holds, or nothing on failure
    async fn fetch(&self) -> Vec<BookRecord>;

    /// Short name for logs and reports
    fn name(&self) -> &str;
}

/// How the external script is launched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptInvocation {
    pub shell: String,
    pub shell_flag: String,
    /// Command prefix; the quoted script is appended as its last argument
    pub interpreter: String,
    pub script: String,
    pub timeout: Duration,
}

impl Default for ScriptInvocation {
    fn default() -> Self {
        Self {
            shell: "/bin/bash".to_string(),
            shell_flag: "-c".to_string(),
            interpreter: "osascript -e".to_string(),
            script: BOOKS_SCRIPT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ScriptInvocation {
    /// Builds an invocation of the Books script from import settings
    pub fn from_config(config: &ImportConfig) -> Self {
        Self {
            shell: config.shell.clone(),
            shell_flag: config.shell_flag.clone(),
            interpreter: config.interpreter.clone(),
            script: BOOKS_SCRIPT.to_string(),
            timeout: config.timeout(),
        }
    }

    pub fn with_script(mut self, script: impl Into<String>) -> Self {
        self.script = script.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The string handed to the shell: `<interpreter> "<script>"`
    pub fn command_line(&self) -> String {
        format!("{} \"{}\"", self.interpreter, escape_quotes(&self.script))
    }

    /// Name of the interpreter program, used in error reports
    pub fn program(&self) -> &str {
        self.interpreter
            .split_whitespace()
            .next()
            .unwrap_or(self.shell.as_str())
    }
}

/// Escapes double quotes so the script survives inside a quoted shell word
pub fn escape_quotes(script: &str) -> String {
    script.replace('"', "\\\"")
}

/// Decodes captured process output as UTF-8
pub fn decode_output(program: &str, bytes: Vec<u8>) -> Result<String, AppError> {
    String::from_utf8(bytes).map_err(|e| AppError::OutputDecode {
        program: program.to_string(),
        reason: e.to_string(),
    })
}

/// Fetches records by running a script in a subprocess
#[derive(Debug, Clone, Default)]
pub struct ScriptCatalogFetcher {
    invocation: ScriptInvocation,
}

impl ScriptCatalogFetcher {
    pub fn new(invocation: ScriptInvocation) -> Self {
        Self { invocation }
    }

    pub fn invocation(&self) -> &ScriptInvocation {
        &self.invocation
    }

    /// Runs the process and returns stdout followed by stderr
    async fn capture(&self) -> Result<Vec<u8>, AppError> {
        let invocation = &self.invocation;

        let mut command = Command::new(&invocation.shell);
        command
            .arg(&invocation.shell_flag)
            .arg(invocation.command_line())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match tokio::time::timeout(invocation.timeout, command.output()).await {
            Ok(result) => result.map_err(|e| AppError::external_process(&invocation.shell, e))?,
            Err(_) => {
                return Err(AppError::ExternalProcess {
                    program: invocation.program().to_string(),
                    message: format!("timed out after {}s", invocation.timeout.as_secs_f32()),
                    source: None,
                })
            }
        };

        debug!(
            "{} exited with {} ({} bytes stdout, {} bytes stderr)",
            invocation.program(),
            output.status,
            output.stdout.len(),
            output.stderr.len()
        );

        let mut bytes = output.stdout;
        bytes.extend_from_slice(&output.stderr);
        Ok(bytes)
    }
}

#[async_trait]
impl CatalogFetcher for ScriptCatalogFetcher {
    async fn fetch(&self) -> Vec<BookRecord> {
        let bytes = match self.capture().await {
            Ok(bytes) => bytes,
            Err(e) => {
                error!("Catalog fetch failed: {}", e);
                return Vec::new();
            }
        };

        let program = self.invocation.program().to_string();
        let parsed = tokio::task::spawn_blocking(move || {
            decode_output(&program, bytes).map(|text| CatalogParser::parse(&text))
        })
        .await;

        match parsed {
            Ok(Ok(records)) => {
                debug!("Parsed {} catalog records", records.len());
                records
            }
            Ok(Err(e)) => {
                error!("Catalog fetch failed: {}", e);
                Vec::new()
            }
            Err(e) => {
                error!("Catalog parse task failed: {}", e);
                Vec::new()
            }
        }
    }

    fn name(&self) -> &str {
        "script"
    }
}

/// Serves records from text captured earlier, e.g. a saved script output
#[derive(Debug, Clone)]
pub struct StaticCatalogFetcher {
    name: String,
    raw: String,
}

impl StaticCatalogFetcher {
    pub fn new(name: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            raw: raw.into(),
        }
    }

    /// Reads and decodes a file; undecodable content is an error here
    pub async fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => AppError::FileNotFound {
                path: path.to_path_buf(),
            },
            _ => AppError::IoError {
                message: format!("Failed to read {}", path.display()),
                source: e,
            },
        })?;

        let raw = decode_output(&path.display().to_string(), bytes)?;
        Ok(Self::new(path.display().to_string(), raw))
    }
}

#[async_trait]
impl CatalogFetcher for StaticCatalogFetcher {
    async fn fetch(&self) -> Vec<BookRecord> {
        CatalogParser::parse(&self.raw)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
