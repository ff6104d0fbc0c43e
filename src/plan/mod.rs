//! Build plan assembly
//!
//! Maps every platform's bundle, merged, example and test directories to
//! nodes with ordered tech steps. The plan is pure data for the external
//! build engine; [`BuildPlan::apply`] performs the filesystem housekeeping
//! (stale bundle removal, bemjson symlink renames) it records.

mod listing;
mod symlink;

pub use listing::{expand_mask, list_dir};
pub use symlink::{pending_rename, Rename};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::{
    AssemblyOptions, TaskArgs, ASSEMBLY_EXAMPLE, ASSEMBLY_MERGED_BUNDLE, ASSEMBLY_TESTS,
};
use crate::levels::{self, node_test_levels, unique, Level, LevelError};
use crate::node::NodeConfig;
use crate::techs::{assembly_techs, Tech, TechStep};

/// Schema identifier of the serialized plan
pub const SCHEMA_ID: &str = "bem-assembly/build_plan@1";

/// Name of the merged bundle node
pub const MERGED_BUNDLE: &str = "merged";

/// Build engine cache directory inside bundle directories
const ENGINE_CACHE_DIR: &str = ".bem";

/// Example/test bundle generator settings for one platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configurator {
    /// Generator task name
    pub task: String,
    pub dest_path: String,
    pub levels: Vec<Level>,
    pub tech_suffixes: Vec<String>,
    pub file_suffixes: Vec<String>,
}

/// Declarative build graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildPlan {
    pub schema_id: String,

    /// When this plan was assembled
    pub created_at: DateTime<Utc>,

    /// Task the plan was assembled for
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,

    pub platforms: Vec<String>,

    pub nodes: Vec<NodeConfig>,

    pub configurators: Vec<Configurator>,

    /// Stale generated directories to remove before building
    pub removals: Vec<String>,

    /// bemjson symlink files to rename
    pub renames: Vec<Rename>,

    /// Generated node masks (`<dest>/*/*`) the engine expands at build time
    pub node_masks: Vec<String>,
}

/// What [`BuildPlan::apply`] changed on disk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub removed: Vec<PathBuf>,
    pub renamed: Vec<PathBuf>,
}

impl BuildPlan {
    /// Node by its path
    pub fn node(&self, path: &str) -> Option<&NodeConfig> {
        self.nodes.iter().find(|node| node.path == path)
    }

    /// SHA-256 of the canonical JSON plan, ignoring `created_at`
    pub fn digest(&self) -> Result<String, PlanError> {
        let mut value = serde_json::to_value(self)
            .map_err(|e| PlanError::Serialize(e.to_string()))?;
        if let Some(map) = value.as_object_mut() {
            map.remove("created_at");
        }

        let jcs_bytes = serde_json_canonicalizer::to_vec(&value)
            .map_err(|e| PlanError::Serialize(e.to_string()))?;

        let mut hasher = Sha256::new();
        hasher.update(&jcs_bytes);
        Ok(hex::encode(hasher.finalize()))
    }

    /// Serialize to JSON (pretty printed)
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Remove stale bundle directories, then rename pending symlinks
    pub fn apply(&self, root: &Path) -> Result<ApplyReport, PlanError> {
        let mut report = ApplyReport::default();

        for removal in &self.removals {
            let path = root.join(removal);
            if path.exists() {
                fs::remove_dir_all(&path)?;
                tracing::debug!("removed {}", path.display());
                report.removed.push(path);
            }
        }

        for rename in &self.renames {
            if rename.apply(root)? {
                report.renamed.push(root.join(&rename.to));
            }
        }

        Ok(report)
    }
}

/// Errors for plan assembly
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Level error: {0}")]
    Level(#[from] LevelError),

    #[error("Walk error: {0}")]
    WalkError(#[from] walkdir::Error),

    #[error("Glob pattern error: {0}")]
    GlobError(#[from] globset::Error),

    #[error("Path is not within project root: {0}")]
    PathNotInRoot(String),

    #[error("Serialization error: {0}")]
    Serialize(String),
}

/// Generated bundle kinds produced by the examples generator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Generated {
    Examples,
    Tests,
}

impl Generated {
    fn task(self) -> &'static str {
        match self {
            Generated::Examples => ASSEMBLY_EXAMPLE,
            Generated::Tests => ASSEMBLY_TESTS,
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            Generated::Examples => "examples",
            Generated::Tests => "tests",
        }
    }
}

/// Assembles a [`BuildPlan`] for a project root
pub struct Assembler<'a> {
    root: PathBuf,
    options: &'a AssemblyOptions,
    task: &'a TaskArgs,
}

impl<'a> Assembler<'a> {
    pub fn new(root: impl Into<PathBuf>, options: &'a AssemblyOptions, task: &'a TaskArgs) -> Self {
        Self {
            root: root.into(),
            options,
            task,
        }
    }

    /// Assemble bundles, the merged bundle, examples and tests
    pub fn build(&self) -> Result<BuildPlan, PlanError> {
        let mut plan = BuildPlan {
            schema_id: SCHEMA_ID.to_string(),
            created_at: Utc::now(),
            task: self.task.task().map(str::to_string),
            platforms: self.options.platform_names(),
            nodes: Vec::new(),
            configurators: Vec::new(),
            removals: Vec::new(),
            renames: Vec::new(),
            node_masks: Vec::new(),
        };

        self.initialize_bundles(&mut plan)?;
        self.initialize_merged_bundles(&mut plan)?;
        self.initialize_generated(&mut plan, Generated::Examples)?;
        self.initialize_generated(&mut plan, Generated::Tests)?;

        tracing::debug!(
            "assembled {} nodes for {} platforms",
            plan.nodes.len(),
            plan.platforms.len()
        );
        Ok(plan)
    }

    /// Every `bundles/<platform>.bundles/*` node except exception bundles
    fn initialize_bundles(&self, plan: &mut BuildPlan) -> Result<(), PlanError> {
        for platform in &plan.platforms {
            let mask = format!("bundles/{}.bundles/*", platform);
            for path in expand_mask(&self.root, &mask)? {
                let mut node = NodeConfig::new(path, platform.as_str());
                if self.options.is_exception(node.name()) {
                    continue;
                }

                node.add_tech(TechStep::new(
                    Tech::FileProvider,
                    serde_json::json!({ "target": "?.bemjson.js" }),
                ));
                self.assembly_techs(&mut node)?;
                plan.nodes.push(node);
            }
        }
        Ok(())
    }

    /// One merged node per platform combining every sibling bundle's bemdecl
    fn initialize_merged_bundles(&self, plan: &mut BuildPlan) -> Result<(), PlanError> {
        if !self.task.is_task(ASSEMBLY_MERGED_BUNDLE) {
            return Ok(());
        }

        for platform in &plan.platforms {
            let dir = format!("bundles/{}.bundles", platform);
            let merged_path = format!("{}/{}", dir, MERGED_BUNDLE);
            if expand_mask(&self.root, &merged_path)?.is_empty() {
                tracing::debug!("no {} node for platform {}", merged_path, platform);
                continue;
            }

            let bundles: Vec<String> = list_dir(&self.root, &dir)?
                .into_iter()
                .filter(|name| name != MERGED_BUNDLE && name != ENGINE_CACHE_DIR)
                .collect();

            if bundles.is_empty() {
                tracing::warn!("no bundles to merge for platform {}", platform);
                continue;
            }

            let mut node = NodeConfig::new(merged_path, platform.as_str());
            let mut bemdecl_files = Vec::new();

            for bundle in &bundles {
                let bemdecl = format!("{}.bemdecl.js", bundle);
                node.add_tech(TechStep::new(
                    Tech::ProvideBemdecl,
                    serde_json::json!({
                        "node": format!("{}/{}", dir, bundle),
                        "target": bemdecl
                    }),
                ));
                bemdecl_files.push(bemdecl);
            }

            node.add_tech(TechStep::new(
                Tech::MergeBemdecl,
                serde_json::json!({ "sources": bemdecl_files }),
            ));
            self.assembly_techs(&mut node)?;
            plan.nodes.push(node);
        }
        Ok(())
    }

    /// Generator settings plus `<dest>/*/*` nodes for examples or tests
    fn initialize_generated(&self, plan: &mut BuildPlan, kind: Generated) -> Result<(), PlanError> {
        let delete = match kind {
            Generated::Examples => self.options.examples_bundle_delete,
            Generated::Tests => self.options.tests_bundle_delete,
        };
        let remove_stale = delete && self.task.is_task(kind.task());

        for platform in &plan.platforms {
            let dest_path = format!("bundles/{}.{}", platform, kind.suffix());

            if remove_stale {
                plan.removals.push(dest_path.clone());
            }

            plan.configurators.push(Configurator {
                task: kind.task().to_string(),
                dest_path: dest_path.clone(),
                levels: levels::base_levels(self.options, platform)?,
                tech_suffixes: vec![kind.suffix().to_string()],
                file_suffixes: vec!["bemjson.js".to_string(), "title.txt".to_string()],
            });

            // Generated nodes are resolved again by the engine after regeneration
            let mask = format!("{}/*/*", dest_path);
            plan.node_masks.push(mask.clone());

            for path in expand_mask(&self.root, &mask)? {
                if let Some(rename) = pending_rename(&self.root, &path) {
                    plan.renames.push(rename);
                }

                let mut node = NodeConfig::new(path, platform.as_str());
                node.add_tech(TechStep::new(
                    Tech::FileProvider,
                    serde_json::json!({ "target": "?.bemjson.js" }),
                ));
                self.assembly_techs(&mut node)?;
                plan.nodes.push(node);
            }
        }
        Ok(())
    }

    /// Append the standard steps and targets to a node
    fn assembly_techs(&self, node: &mut NodeConfig) -> Result<(), PlanError> {
        let mut node_levels = levels::source_levels(self.options, &node.platform)?;
        node_levels.extend(node_test_levels(&self.root, &node.path));
        let node_levels = unique(node_levels);

        node.add_techs(assembly_techs(&node_levels, &self.options.helper, &self.options.babel));

        if !self.options.is_exception(node.name()) {
            node.add_tech(TechStep::bare(Tech::BemjsonToBemdecl));
            node.add_targets(["?.html"]);
        }

        node.add_targets(["?.min.css", "?.min.js"]);
        Ok(())
    }
}
