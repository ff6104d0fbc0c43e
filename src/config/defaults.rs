//! Built-in project defaults (layer 1)
//!
//! Used when no project file or CLI override sets a value.

use serde::{Deserialize, Serialize};
use serde_json::json;

/// Built-in default configuration values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltinDefaults {
    /// Platform name -> block level names, in redefinition order
    pub platforms: Vec<(String, Vec<String>)>,

    /// Library levels placed before every platform's own levels
    pub library_levels: Vec<String>,

    /// Bundles that never get bemjson -> html steps (default: "merged")
    pub exceptions: Vec<String>,

    /// Remove stale test bundles when the tests task runs (default: true)
    pub tests_bundle_delete: bool,

    /// Remove stale example bundles when the examples task runs (default: true)
    pub examples_bundle_delete: bool,

    /// Template helper module required by bemhtml on the server side
    pub helper_common_js: String,

    /// Template helper module name for the browser module system
    pub helper_ym: String,
}

impl Default for BuiltinDefaults {
    fn default() -> Self {
        Self {
            platforms: vec![
                (
                    "desktop".to_string(),
                    vec!["common".to_string(), "desktop".to_string()],
                ),
                (
                    "touch".to_string(),
                    vec!["common".to_string(), "touch".to_string()],
                ),
            ],
            library_levels: vec![
                "node_modules/bem-core/common.blocks".to_string(),
                "node_modules/bem-core/desktop.blocks".to_string(),
            ],
            exceptions: vec!["merged".to_string()],
            tests_bundle_delete: true,
            examples_bundle_delete: true,
            helper_common_js: "base.blocks/helper/helper.commonJS".to_string(),
            helper_ym: "helper".to_string(),
        }
    }
}

impl BuiltinDefaults {
    /// Convert to JSON Value for merging
    pub fn to_value(&self) -> serde_json::Value {
        let platforms: serde_json::Map<String, serde_json::Value> = self
            .platforms
            .iter()
            .map(|(name, levels)| (name.clone(), json!(levels)))
            .collect();

        let levels: Vec<serde_json::Value> = self
            .library_levels
            .iter()
            .map(|path| json!({ "path": path, "check": false }))
            .collect();

        json!({
            "platforms": platforms,
            "levels": levels,
            "babel": {},
            "exceptions": self.exceptions,
            "tests_bundle_delete": self.tests_bundle_delete,
            "examples_bundle_delete": self.examples_bundle_delete,
            "helper": {
                "common_js": self.helper_common_js,
                "ym": self.helper_ym
            }
        })
    }
}
