//! Build nodes
//!
//! A node is one bundle directory the build engine produces targets in.
//! Target names use `?` as a placeholder for the node's basename.

use serde::{Deserialize, Serialize};

use crate::techs::TechStep;

/// Declared node: ordered steps plus requested targets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Node directory relative to the project root
    pub path: String,

    /// Platform the node is built for
    pub platform: String,

    pub techs: Vec<TechStep>,

    pub targets: Vec<String>,
}

impl NodeConfig {
    pub fn new(path: impl Into<String>, platform: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            platform: platform.into(),
            techs: Vec::new(),
            targets: Vec::new(),
        }
    }

    /// Last path segment; substitutes `?` in target names
    pub fn name(&self) -> &str {
        let path = self.path.trim_end_matches('/');
        path.rsplit('/').next().unwrap_or(path)
    }

    pub fn add_tech(&mut self, step: TechStep) {
        self.techs.push(step);
    }

    pub fn add_techs(&mut self, steps: impl IntoIterator<Item = TechStep>) {
        self.techs.extend(steps);
    }

    /// Request targets, skipping ones already requested
    pub fn add_targets<I, S>(&mut self, targets: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for target in targets {
            let target = target.into();
            if !self.targets.contains(&target) {
                self.targets.push(target);
            }
        }
    }

    /// Target names with `?` replaced by the node name
    pub fn resolved_targets(&self) -> Vec<String> {
        let name = self.name();
        self.targets.iter().map(|t| t.replace('?', name)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::techs::Tech;

    #[test]
    fn test_name() {
        assert_eq!(NodeConfig::new("bundles/desktop.bundles/index", "desktop").name(), "index");
        assert_eq!(NodeConfig::new("bundles/desktop.bundles/index/", "desktop").name(), "index");
        assert_eq!(NodeConfig::new("index", "desktop").name(), "index");
    }

    #[test]
    fn test_add_targets_dedup() {
        let mut node = NodeConfig::new("bundles/touch.bundles/index", "touch");
        node.add_targets(["?.html", "?.min.css"]);
        node.add_targets(vec!["?.min.css".to_string(), "?.min.js".to_string()]);
        assert_eq!(node.targets, vec!["?.html", "?.min.css", "?.min.js"]);
        assert_eq!(
            node.resolved_targets(),
            vec!["index.html", "index.min.css", "index.min.js"]
        );
    }

    #[test]
    fn test_add_techs_in_order() {
        let mut node = NodeConfig::new("bundles/touch.bundles/index", "touch");
        node.add_tech(TechStep::bare(Tech::Levels));
        node.add_techs([TechStep::bare(Tech::Deps), TechStep::bare(Tech::Files)]);
        let techs: Vec<Tech> = node.techs.iter().map(|s| s.tech).collect();
        assert_eq!(techs, vec![Tech::Levels, Tech::Deps, Tech::Files]);
    }
}
