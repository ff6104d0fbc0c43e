//! Assembly configuration
//!
//! Options are layered:
//! 1. Built-in defaults
//! 2. Project file (.bem/assembly.toml)
//! 3. CLI overrides
//!
//! The running task is read once into an explicit [`TaskArgs`] value.

mod defaults;
mod options;
mod task;

pub use defaults::BuiltinDefaults;
pub use options::{
    AssemblyOptions, ConfigError, ConfigOrigin, ConfigSource, EffectiveOptions, HelperModules,
    DEFAULT_PROJECT_FILE,
};
pub use task::{
    TaskArgs, ARGV_ENV_VAR, ASSEMBLY_EXAMPLE, ASSEMBLY_MERGED_BUNDLE, ASSEMBLY_TESTS,
};
