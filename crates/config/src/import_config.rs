//! Catalog import configuration section

use crate::validation::{ConfigSection, ValidationError, Validator};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Shortest allowed fetch timeout, in seconds
pub const MIN_TIMEOUT_SECS: u64 = 1;

/// Longest allowed fetch timeout, in seconds
pub const MAX_TIMEOUT_SECS: u64 = 3600;

/// Settings for the external catalog import
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ImportConfig {
    /// Shell used to launch the interpreter
    pub shell: String,

    /// Flag telling the shell to run a command string
    pub shell_flag: String,

    /// Interpreter command prefix; the quoted script is appended to it
    pub interpreter: String,

    /// Upper bound on a single catalog fetch
    pub timeout_secs: u64,

    /// Whether imported items are flagged as present in the app
    pub mark_in_app: bool,
}

impl ImportConfig {
    /// Fetch timeout as a [`Duration`]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            shell: "/bin/bash".to_string(),
            shell_flag: "-c".to_string(),
            interpreter: "osascript -e".to_string(),
            timeout_secs: 60,
            mark_in_app: true,
        }
    }
}

impl ConfigSection for ImportConfig {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        Validator::collect_errors(vec![
            Validator::not_empty(&self.shell, "import.shell"),
            Validator::not_empty(&self.shell_flag, "import.shell_flag"),
            Validator::single_token(&self.shell_flag, "import.shell_flag"),
            Validator::not_empty(&self.interpreter, "import.interpreter"),
            Validator::in_range(
                self.timeout_secs,
                MIN_TIMEOUT_SECS,
                MAX_TIMEOUT_SECS,
                "import.timeout_secs",
            ),
        ])
    }

    fn merge(&mut self, other: Self) {
        self.shell = other.shell;
        self.shell_flag = other.shell_flag;
        self.interpreter = other.interpreter;
        self.timeout_secs = other.timeout_secs;
        self.mark_in_app = other.mark_in_app;
    }

    fn section_name(&self) -> &'static str {
        "import"
    }
}
