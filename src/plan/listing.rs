//! Node mask expansion
//!
//! Masks such as `bundles/desktop.examples/*/*` are expanded against the
//! directories that exist under the project root. Hidden directories
//! (`.bem` and friends) never match.

use globset::GlobBuilder;
use std::path::Path;
use walkdir::WalkDir;

use super::PlanError;

const GLOB_CHARS: &[char] = &['*', '?', '[', '{'];

/// Directories under `root` matching `mask`, as `/`-separated relative paths
pub fn expand_mask(root: &Path, mask: &str) -> Result<Vec<String>, PlanError> {
    let segments: Vec<&str> = mask.trim_matches('/').split('/').collect();
    let first_glob = segments
        .iter()
        .position(|segment| segment.contains(GLOB_CHARS))
        .unwrap_or(segments.len());

    let base = segments[..first_glob].join("/");
    let depth = segments.len() - first_glob;

    if depth == 0 {
        return Ok(if root.join(&base).is_dir() { vec![base] } else { Vec::new() });
    }

    let base_dir = root.join(&base);
    if !base_dir.is_dir() {
        tracing::debug!("mask {}: {} does not exist", mask, base_dir.display());
        return Ok(Vec::new());
    }

    let matcher = GlobBuilder::new(&segments.join("/"))
        .literal_separator(true)
        .build()?
        .compile_matcher();

    let mut matches = Vec::new();
    let walker = WalkDir::new(&base_dir)
        .min_depth(depth)
        .max_depth(depth)
        .sort_by(|a, b| a.file_name().cmp(b.file_name()))
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'));

    for entry in walker {
        let entry = entry?;
        if !entry.path().is_dir() {
            continue;
        }

        let rel = entry
            .path()
            .strip_prefix(root)
            .map_err(|_| PlanError::PathNotInRoot(entry.path().display().to_string()))?;
        let rel = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");

        if matcher.is_match(&rel) {
            matches.push(rel);
        }
    }

    Ok(matches)
}

/// Names of the visible subdirectories of `dir`, sorted
pub fn list_dir(root: &Path, dir: &str) -> Result<Vec<String>, PlanError> {
    let mask = format!("{}/*", dir.trim_end_matches('/'));
    Ok(expand_mask(root, &mask)?
        .into_iter()
        .filter_map(|path| path.rsplit('/').next().map(str::to_string))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn tree(paths: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for path in paths {
            fs::create_dir_all(dir.path().join(path)).unwrap();
        }
        dir
    }

    #[test]
    fn test_single_level_mask() {
        let dir = tree(&[
            "bundles/desktop.bundles/index",
            "bundles/desktop.bundles/about",
            "bundles/desktop.bundles/.bem",
            "bundles/touch.bundles/index",
        ]);
        fs::write(dir.path().join("bundles/desktop.bundles/readme.md"), "x").unwrap();

        let nodes = expand_mask(dir.path(), "bundles/desktop.bundles/*").unwrap();
        assert_eq!(
            nodes,
            vec!["bundles/desktop.bundles/about", "bundles/desktop.bundles/index"]
        );
    }

    #[test]
    fn test_two_level_mask() {
        let dir = tree(&[
            "bundles/desktop.examples/button/10-simple",
            "bundles/desktop.examples/button/20-disabled",
            "bundles/desktop.examples/link/10-simple",
        ]);

        let nodes = expand_mask(dir.path(), "bundles/desktop.examples/*/*").unwrap();
        assert_eq!(
            nodes,
            vec![
                "bundles/desktop.examples/button/10-simple",
                "bundles/desktop.examples/button/20-disabled",
                "bundles/desktop.examples/link/10-simple",
            ]
        );
    }

    #[test]
    fn test_missing_base() {
        let dir = tree(&[]);
        assert!(expand_mask(dir.path(), "bundles/desktop.bundles/*").unwrap().is_empty());
    }

    #[test]
    fn test_literal_mask() {
        let dir = tree(&["bundles/desktop.bundles/merged"]);
        assert_eq!(
            expand_mask(dir.path(), "bundles/desktop.bundles/merged").unwrap(),
            vec!["bundles/desktop.bundles/merged"]
        );
        assert!(expand_mask(dir.path(), "bundles/touch.bundles/merged").unwrap().is_empty());
    }

    #[test]
    fn test_list_dir() {
        let dir = tree(&["bundles/desktop.bundles/index", "bundles/desktop.bundles/merged"]);
        assert_eq!(
            list_dir(dir.path(), "bundles/desktop.bundles").unwrap(),
            vec!["index", "merged"]
        );
    }
}
