//! Block levels
//!
//! A level is a directory of BEM blocks. Every node is built from the
//! library levels, the platform's own `blocks/<name>.blocks` levels and any
//! test levels that exist next to the node.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::config::AssemblyOptions;

/// A block level directory
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Level {
    /// Path relative to the project root
    pub path: String,

    /// Whether the build engine should watch the level for changes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check: Option<bool>,
}

impl Level {
    /// Level without an explicit check flag
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            check: None,
        }
    }

    /// Level the build engine checks for changes
    pub fn checked(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            check: Some(true),
        }
    }
}

/// Errors for level resolution
#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    #[error("Unknown platform: {0}")]
    UnknownPlatform(String),
}

/// Platform levels: `blocks/<name>.blocks` for each of the platform's names
pub fn base_levels(options: &AssemblyOptions, platform: &str) -> Result<Vec<Level>, LevelError> {
    let names = options
        .platforms
        .get(platform)
        .ok_or_else(|| LevelError::UnknownPlatform(platform.to_string()))?;

    Ok(names
        .iter()
        .map(|name| Level::new(format!("blocks/{}.blocks", name)))
        .collect())
}

/// Library levels followed by the platform levels
pub fn source_levels(options: &AssemblyOptions, platform: &str) -> Result<Vec<Level>, LevelError> {
    let mut levels = options.levels.clone();
    levels.extend(base_levels(options, platform)?);
    Ok(levels)
}

/// Test levels for a node, kept only if they exist under `root`
///
/// For node `bundles/desktop.examples/button/10-simple` the candidates are
/// `blocks/test.blocks` and, inside the node, `button.blocks`,
/// `10-simple.blocks` and `blocks`.
pub fn node_test_levels(root: &Path, node_path: &str) -> Vec<Level> {
    let node = node_path.trim_end_matches('/');
    let example_name = basename(node);
    let block_name = basename(dirname(node));

    let candidates = [
        "blocks/test.blocks".to_string(),
        format!("{}/{}.blocks", node, block_name),
        format!("{}/{}.blocks", node, example_name),
        format!("{}/blocks", node),
    ];

    candidates
        .into_iter()
        .filter(|path| root.join(path).exists())
        .map(Level::checked)
        .collect()
}

/// Drop repeated levels, keeping the first occurrence
pub fn unique(levels: Vec<Level>) -> Vec<Level> {
    let mut seen = HashSet::new();
    levels
        .into_iter()
        .filter(|level| seen.insert(level.clone()))
        .collect()
}

fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn dirname(path: &str) -> &str {
    path.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
}
