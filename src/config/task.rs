//! Task detection
//!
//! npm exposes the argv of the running script as JSON in `npm_config_argv`
//! (`{"original": ["run", "assembly-tests"]}`). The task name is the second
//! element of `original`.

use serde::{Deserialize, Serialize};

use super::options::ConfigError;

/// Environment variable npm fills with the script argv
pub const ARGV_ENV_VAR: &str = "npm_config_argv";

/// Task that rebuilds test bundles
pub const ASSEMBLY_TESTS: &str = "assembly-tests";

/// Task that rebuilds example bundles
pub const ASSEMBLY_EXAMPLE: &str = "assembly-example";

/// Task that assembles the merged bundle
pub const ASSEMBLY_MERGED_BUNDLE: &str = "assembly-mergedBundle";

/// The script arguments the build was started with
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskArgs {
    #[serde(default)]
    pub original: Vec<String>,
}

impl TaskArgs {
    /// Arguments for `npm run <task>`
    pub fn for_task(task: &str) -> Self {
        Self {
            original: vec!["run".to_string(), task.to_string()],
        }
    }

    /// Parse the JSON npm stores in `npm_config_argv`
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(raw)
            .map_err(|e| ConfigError::ParseError(format!("{}: {}", ARGV_ENV_VAR, e)))
    }

    /// Read the task arguments from the environment; unset means no task
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var(ARGV_ENV_VAR) {
            Ok(raw) => Self::parse(&raw),
            Err(_) => Ok(Self::default()),
        }
    }

    /// The running task name, if any
    pub fn task(&self) -> Option<&str> {
        self.original.get(1).map(String::as_str)
    }

    /// Whether the build was started as `task`
    pub fn is_task(&self, task: &str) -> bool {
        self.task() == Some(task)
    }
}
