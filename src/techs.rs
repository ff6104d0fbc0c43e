//! Build steps ("techs") handed to the external build engine
//!
//! Each step names the plugin module that implements it plus the options
//! object for that plugin. The order of steps in a node is significant.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::config::HelperModules;
use crate::levels::Level;

/// PostCSS plugins applied to `?.css`, in order
pub const POSTCSS_PLUGINS: &[&str] = &[
    "postcss-import",
    "postcss-each",
    "postcss-for",
    "postcss-simple-vars",
    "postcss-calc",
    "postcss-nested",
    "rebem-css",
    "postcss-url",
    "autoprefixer",
    "postcss-reporter",
];

/// Build engine plugins used by the assembly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tech {
    FileProvider,
    FileMerge,
    Levels,
    Deps,
    Files,
    ProvideBemdecl,
    MergeBemdecl,
    DepsByTechToBemdecl,
    BemjsonToBemdecl,
    Postcss,
    Bemhtml,
    BemjsonToHtml,
    BrowserJs,
    Borschik,
}

impl Tech {
    /// npm module implementing the tech
    pub fn module(self) -> &'static str {
        match self {
            Tech::FileProvider => "enb/techs/file-provider",
            Tech::FileMerge => "enb/techs/file-merge",
            Tech::Levels => "enb-bem-techs/techs/levels",
            Tech::Deps => "enb-bem-techs/techs/deps",
            Tech::Files => "enb-bem-techs/techs/files",
            Tech::ProvideBemdecl => "enb-bem-techs/techs/provide-bemdecl",
            Tech::MergeBemdecl => "enb-bem-techs/techs/merge-bemdecl",
            Tech::DepsByTechToBemdecl => "enb-bem-techs/techs/deps-by-tech-to-bemdecl",
            Tech::BemjsonToBemdecl => "enb-bem-techs/techs/bemjson-to-bemdecl",
            Tech::Postcss => "enb-postcss/techs/enb-postcss",
            Tech::Bemhtml => "enb-bemxjst/techs/bemhtml",
            Tech::BemjsonToHtml => "enb-bemxjst/techs/bemjson-to-html",
            Tech::BrowserJs => "teach/bable",
            Tech::Borschik => "enb-borschik/techs/borschik",
        }
    }
}

/// One `(tech, options)` pair of a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechStep {
    pub tech: Tech,
    pub module: String,
    pub options: Value,
}

impl TechStep {
    /// Step with options (`Value::Null` for none)
    pub fn new(tech: Tech, options: Value) -> Self {
        Self {
            tech,
            module: tech.module().to_string(),
            options,
        }
    }

    /// Step with default plugin options
    pub fn bare(tech: Tech) -> Self {
        Self::new(tech, Value::Null)
    }
}

fn postcss_plugins() -> Value {
    let plugins: Vec<Value> = POSTCSS_PLUGINS
        .iter()
        .map(|name| match *name {
            "postcss-url" => json!({ "name": name, "options": { "url": "rebase" } }),
            _ => json!({ "name": name }),
        })
        .collect();
    Value::Array(plugins)
}

/// The standard step chain every node is built with
///
/// levels -> deps -> files, css, server bemhtml and html, the client
/// bemhtml chain, babel browser js merged into `?.js`, then minified
/// `?.min.js` and `?.min.css`.
pub fn assembly_techs(levels: &[Level], helper: &HelperModules, babel: &Value) -> Vec<TechStep> {
    vec![
        // essential
        TechStep::new(Tech::Levels, json!({ "levels": levels })),
        TechStep::bare(Tech::Deps),
        TechStep::bare(Tech::Files),
        // css
        TechStep::new(
            Tech::Postcss,
            json!({
                "target": "?.css",
                "oneOfSourceSuffixes": ["post.css", "css"],
                "plugins": postcss_plugins()
            }),
        ),
        // bemhtml
        TechStep::new(
            Tech::Bemhtml,
            json!({
                "sourceSuffixes": ["bemhtml", "bemhtml.js"],
                "forceBaseTemplates": true,
                "engineOptions": {
                    "elemJsInstances": true,
                    "requires": { "helper": { "commonJS": helper.common_js } }
                }
            }),
        ),
        // html
        TechStep::bare(Tech::BemjsonToHtml),
        // client bemhtml
        TechStep::new(
            Tech::DepsByTechToBemdecl,
            json!({
                "target": "?.bemhtml.bemdecl.js",
                "sourceTech": "js",
                "destTech": "bemhtml"
            }),
        ),
        TechStep::new(
            Tech::Deps,
            json!({
                "target": "?.bemhtml.deps.js",
                "bemdeclFile": "?.bemhtml.bemdecl.js"
            }),
        ),
        TechStep::new(
            Tech::Files,
            json!({
                "depsFile": "?.bemhtml.deps.js",
                "filesTarget": "?.bemhtml.files",
                "dirsTarget": "?.bemhtml.dirs"
            }),
        ),
        TechStep::new(
            Tech::Bemhtml,
            json!({
                "target": "?.browser.bemhtml.js",
                "filesTarget": "?.bemhtml.files",
                "sourceSuffixes": ["bemhtml", "bemhtml.js"],
                "engineOptions": {
                    "elemJsInstances": true,
                    "requires": { "helper": { "ym": helper.ym } }
                }
            }),
        ),
        // js
        TechStep::new(
            Tech::BrowserJs,
            json!({ "includeYM": true, "iife": true, "bable": babel }),
        ),
        TechStep::new(
            Tech::FileMerge,
            json!({
                "target": "?.js",
                "sources": ["?.browser.js", "?.browser.bemhtml.js"]
            }),
        ),
        // borschik
        TechStep::new(
            Tech::Borschik,
            json!({
                "source": "?.js",
                "target": "?.min.js",
                "minify": true,
                "freeze": true,
                "techOptions": { "uglify": { "keep_classnames": true } }
            }),
        ),
        TechStep::new(
            Tech::Borschik,
            json!({
                "source": "?.css",
                "target": "?.min.css",
                "minify": true,
                "freeze": true
            }),
        ),
    ]
}
