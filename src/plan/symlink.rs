//! Example bemjson symlink normalization
//!
//! The examples generator links each example's bemjson as
//! `<name>.bemjson.js.symlink`; the build expects `<name>.bemjson.js`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

/// A pending file rename, relative to the project root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rename {
    pub from: String,
    pub to: String,
}

/// Rename needed for the node's bemjson, if its `.symlink` file exists
pub fn pending_rename(root: &Path, node_path: &str) -> Option<Rename> {
    let node = node_path.trim_end_matches('/');
    let name = node.rsplit('/').next().unwrap_or(node);
    let bemjson = format!("{}/{}.bemjson.js", node, name);
    let symlink = format!("{}.symlink", bemjson);

    if root.join(&symlink).exists() {
        Some(Rename {
            from: symlink,
            to: bemjson,
        })
    } else {
        None
    }
}

impl Rename {
    /// Perform the rename; returns false if the source is gone
    pub fn apply(&self, root: &Path) -> io::Result<bool> {
        let from = root.join(&self.from);
        if !from.exists() {
            return Ok(false);
        }
        fs::rename(from, root.join(&self.to))?;
        Ok(true)
    }
}
