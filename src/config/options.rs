//! Effective assembly options with provenance
//!
//! Layers are applied in order: built-in defaults, the project file, CLI
//! overrides. `platforms` is assigned key by key, `levels` are appended,
//! `babel` and `helper` are deep-merged and every other key is replaced.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use bem_helper::{extend, push};

use super::defaults::BuiltinDefaults;
use crate::levels::Level;

/// Default project file location, relative to the project root
pub const DEFAULT_PROJECT_FILE: &str = ".bem/assembly.toml";

/// Origin of an options layer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ConfigOrigin {
    Builtin,
    Project,
    Cli,
}

/// A contributing options layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSource {
    pub origin: ConfigOrigin,

    /// File path (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// SHA-256 digest of raw file bytes (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

/// Template helper modules handed to bemhtml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HelperModules {
    /// Server-side CommonJS module path
    pub common_js: String,

    /// Browser-side module system name
    pub ym: String,
}

/// Project assembly options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssemblyOptions {
    /// Platform name -> block level names
    pub platforms: BTreeMap<String, Vec<String>>,

    /// Library levels shared by all platforms
    pub levels: Vec<Level>,

    /// Options passed through to the babel browser-js tech
    #[serde(default)]
    pub babel: Value,

    /// Bundle names excluded from html generation
    pub exceptions: Vec<String>,

    pub tests_bundle_delete: bool,

    pub examples_bundle_delete: bool,

    pub helper: HelperModules,
}

impl AssemblyOptions {
    /// Load options from the built-in defaults only
    pub fn builtin() -> Result<Self, ConfigError> {
        EffectiveOptions::build(None, None).map(|effective| effective.options)
    }

    /// Load options with a project file and CLI overrides
    pub fn load(
        project_path: Option<&Path>,
        cli_overrides: Option<Value>,
    ) -> Result<EffectiveOptions, ConfigError> {
        EffectiveOptions::build(project_path, cli_overrides)
    }

    /// Platform names in iteration order
    pub fn platform_names(&self) -> Vec<String> {
        self.platforms.keys().cloned().collect()
    }

    /// Whether the bundle name is excluded from html generation
    pub fn is_exception(&self, bundle: &str) -> bool {
        self.exceptions.iter().any(|name| name == bundle)
    }
}

/// Merged options plus the layers that produced them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveOptions {
    pub options: AssemblyOptions,

    /// Contributing layers in precedence order
    pub sources: Vec<ConfigSource>,
}

impl EffectiveOptions {
    /// Build effective options from layers
    pub fn build(
        project_path: Option<&Path>,
        cli_overrides: Option<Value>,
    ) -> Result<Self, ConfigError> {
        let mut merged = BuiltinDefaults::default().to_value();
        let mut sources = vec![ConfigSource {
            origin: ConfigOrigin::Builtin,
            path: None,
            digest: None,
        }];

        if let Some(path) = project_path {
            if path.exists() {
                let (value, digest) = load_toml_file(path)?;
                merged = apply_layer(merged, value);
                sources.push(ConfigSource {
                    origin: ConfigOrigin::Project,
                    path: Some(path.to_string_lossy().to_string()),
                    digest: Some(digest),
                });
            } else {
                tracing::debug!("project file {} not found, using defaults", path.display());
            }
        }

        if let Some(cli) = cli_overrides {
            merged = apply_layer(merged, cli);
            sources.push(ConfigSource {
                origin: ConfigOrigin::Cli,
                path: None,
                digest: None,
            });
        }

        let options: AssemblyOptions = serde_json::from_value(merged)
            .map_err(|e| ConfigError::ParseError(format!("Invalid options: {}", e)))?;

        validate(&options)?;

        Ok(Self { options, sources })
    }
}

/// Apply one options layer on top of `base`
fn apply_layer(base: Value, layer: Value) -> Value {
    let Value::Object(mut layer) = layer else {
        tracing::warn!("ignoring non-table options layer");
        return base;
    };

    // Older project files spell the babel key "bable"
    if let Some(legacy) = layer.remove("bable") {
        layer.entry("babel").or_insert(legacy);
    }

    let mut base = match base {
        Value::Object(map) => map,
        _ => Map::new(),
    };

    for (key, value) in layer {
        let current = base.remove(&key);
        let merged = match key.as_str() {
            "platforms" => extend(false, current, [&value]),
            "babel" | "helper" => extend(true, current, [&value]),
            "levels" => {
                let additions = match value {
                    Value::Array(items) => items,
                    other => vec![other],
                };
                additions
                    .into_iter()
                    .map(level_value)
                    .fold(current.unwrap_or_else(|| json!([])), |acc, level| {
                        Value::Array(push(Some(acc), level))
                    })
            }
            _ => value,
        };
        base.insert(key, merged);
    }

    Value::Object(base)
}

/// Levels may be written as a bare path string
fn level_value(value: Value) -> Value {
    match value {
        Value::String(path) => json!({ "path": path }),
        other => other,
    }
}

/// Load and parse a TOML file, returning the value and digest
fn load_toml_file(path: &Path) -> Result<(Value, String), ConfigError> {
    let bytes = fs::read(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    let digest = hex::encode(hasher.finalize());

    let contents = String::from_utf8(bytes)
        .map_err(|e| ConfigError::ParseError(format!("Invalid UTF-8: {}", e)))?;

    let table: toml::Value = toml::from_str(&contents)
        .map_err(|e| ConfigError::ParseError(format!("TOML parse error: {}", e)))?;

    Ok((toml_to_json(table), digest))
}

fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}

fn validate(options: &AssemblyOptions) -> Result<(), ConfigError> {
    if options.platforms.is_empty() {
        return Err(ConfigError::ValidationError(
            "at least one platform is required".to_string(),
        ));
    }

    for (platform, names) in &options.platforms {
        if names.is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "platform {} has no levels",
                platform
            )));
        }
        if names.iter().any(|name| name.trim().is_empty()) {
            return Err(ConfigError::ValidationError(format!(
                "platform {} has an empty level name",
                platform
            )));
        }
    }

    if options.levels.iter().any(|level| level.path.trim().is_empty()) {
        return Err(ConfigError::ValidationError(
            "level path must not be empty".to_string(),
        ));
    }

    Ok(())
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_build_with_defaults_only() {
        let effective = EffectiveOptions::build(None, None).unwrap();

        assert_eq!(effective.sources.len(), 1);
        assert_eq!(effective.sources[0].origin, ConfigOrigin::Builtin);
        assert_eq!(effective.options.platform_names(), vec!["desktop", "touch"]);
        assert!(effective.options.is_exception("merged"));
        assert!(!effective.options.is_exception("index"));
    }

    #[test]
    fn test_platforms_assigned_by_key() {
        let cli = json!({
            "platforms": { "touch": ["common", "touch-phone"], "tv": ["tv"] }
        });
        let options = EffectiveOptions::build(None, Some(cli)).unwrap().options;

        assert_eq!(options.platforms["desktop"], vec!["common", "desktop"]);
        assert_eq!(options.platforms["touch"], vec!["common", "touch-phone"]);
        assert_eq!(options.platforms["tv"], vec!["tv"]);
    }

    #[test]
    fn test_levels_appended() {
        let builtin = AssemblyOptions::builtin().unwrap();
        let cli = json!({ "levels": ["design/common.blocks", { "path": "vendor.blocks", "check": true }] });
        let options = EffectiveOptions::build(None, Some(cli)).unwrap().options;

        assert_eq!(options.levels.len(), builtin.levels.len() + 2);
        assert_eq!(options.levels[builtin.levels.len()], Level::new("design/common.blocks"));
        assert_eq!(options.levels.last().unwrap(), &Level::checked("vendor.blocks"));
    }

    #[test]
    fn test_legacy_babel_key() {
        let cli = json!({ "bable": { "presets": ["@babel/preset-env"] } });
        let options = EffectiveOptions::build(None, Some(cli)).unwrap().options;
        assert_eq!(options.babel, json!({ "presets": ["@babel/preset-env"] }));
    }

    #[test]
    fn test_helper_deep_merged() {
        let cli = json!({ "helper": { "ym": "i-helper" } });
        let options = EffectiveOptions::build(None, Some(cli)).unwrap().options;
        assert_eq!(options.helper.ym, "i-helper");
        assert_eq!(options.helper.common_js, "base.blocks/helper/helper.commonJS");
    }

    #[test]
    fn test_validation_empty_platform() {
        let cli = json!({ "platforms": { "desktop": [] } });
        let err = EffectiveOptions::build(None, Some(cli)).unwrap_err();
        assert!(err.to_string().contains("platform desktop has no levels"));
    }

    #[test]
    fn test_parse_error_bad_type() {
        let cli = json!({ "tests_bundle_delete": "yes" });
        let err = EffectiveOptions::build(None, Some(cli)).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_load_toml_file() {
        let mut temp = NamedTempFile::new().unwrap();
        writeln!(temp, "exceptions = [\"merged\", \"print\"]").unwrap();
        writeln!(temp, "levels = [\"design.blocks\"]").unwrap();
        writeln!(temp, "[platforms]").unwrap();
        writeln!(temp, "desktop = [\"common\", \"desktop\", \"wide\"]").unwrap();
        writeln!(temp, "[bable]").unwrap();
        writeln!(temp, "compact = true").unwrap();

        let effective = EffectiveOptions::build(Some(temp.path()), None).unwrap();
        let options = &effective.options;

        assert_eq!(options.platforms["desktop"].len(), 3);
        assert!(options.platforms.contains_key("touch"));
        assert!(options.is_exception("print"));
        assert_eq!(options.levels.last().unwrap(), &Level::new("design.blocks"));
        assert_eq!(options.babel, json!({ "compact": true }));

        assert_eq!(effective.sources.len(), 2);
        assert_eq!(effective.sources[1].origin, ConfigOrigin::Project);
        assert_eq!(effective.sources[1].digest.as_ref().unwrap().len(), 64);
    }

    #[test]
    fn test_missing_project_file_skipped() {
        let effective =
            EffectiveOptions::build(Some(Path::new("/nonexistent/assembly.toml")), None).unwrap();
        assert_eq!(effective.sources.len(), 1);
    }

    #[test]
    fn test_invalid_toml() {
        let mut temp = NamedTempFile::new().unwrap();
        writeln!(temp, "platforms = [").unwrap();

        let err = EffectiveOptions::build(Some(temp.path()), None).unwrap_err();
        assert!(err.to_string().contains("TOML parse error"));
    }
}
