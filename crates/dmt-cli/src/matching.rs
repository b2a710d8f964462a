//! # Matching Subcommands
//!
//! `match` runs the subtree matcher with a node of a pattern tree; `leaves`
//! runs the chain matcher that yields value-log leaf paths. Both take the
//! pattern from a second descriptor file, rooted at `--root` (default: the
//! pattern tree's root).

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use dmt_core::MatchLimits;
use dmt_tree::{NodeRef, Tree};

use crate::load::load_tree;

/// Arguments shared by `match` and `leaves`.
#[derive(Args, Debug)]
pub struct PatternArgs {
    /// Descriptor file of the tree to search.
    pub file: PathBuf,

    /// Descriptor file of the pattern tree.
    #[arg(long)]
    pub pattern: PathBuf,

    /// Name of the pattern node to match with (default: the pattern root).
    #[arg(long)]
    pub root: Option<String>,
}

fn pattern_node<'t>(pattern: &'t Tree, root: Option<&str>) -> Result<NodeRef<'t>> {
    match root {
        Some(name) => pattern
            .get(name)
            .with_context(|| format!("pattern has no node named {name:?}")),
        None => Ok(pattern.root()),
    }
}

/// Run the subtree matcher. Returns 1 when nothing matches.
pub fn run_match(args: &PatternArgs, limits: &MatchLimits) -> Result<u8> {
    let tree = load_tree(&args.file)?;
    let pattern_tree = load_tree(&args.pattern)?;
    let pattern = pattern_node(&pattern_tree, args.root.as_deref())?;

    limits
        .check(
            tree.max_fan_out(),
            pattern.max_fan_out(),
            pattern.subtree_len(),
        )
        .context("refusing to run the subtree matcher")?;

    let matches = tree.find_subtree(pattern);
    if matches.is_empty() {
        eprintln!("no subtree matches pattern node {}", pattern.name());
        return Ok(1);
    }
    for found in &matches {
        let Some(node) = tree.node(found.node) else {
            continue;
        };
        println!("{} jsonPath: {}", node.name(), node.path());
        for mapping in &found.mappings {
            println!(
                "  {}",
                serde_json::to_string(mapping).context("rendering field mapping")?
            );
        }
    }
    Ok(0)
}

/// Run the chain matcher. Returns 1 when no leaf matches.
pub fn run_leaves(args: &PatternArgs) -> Result<u8> {
    let tree = load_tree(&args.file)?;
    let pattern_tree = load_tree(&args.pattern)?;
    let pattern = pattern_node(&pattern_tree, args.root.as_deref())?;

    let paths = tree.matching_leaf_paths(pattern);
    if paths.is_empty() {
        eprintln!("no leaf matches pattern node {}", pattern.name());
        return Ok(1);
    }
    for path in &paths {
        println!(
            "{}",
            serde_json::to_string(path).context("rendering leaf path")?
        );
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn fixtures(dir: &Path) -> (PathBuf, PathBuf) {
        let tree = write(
            dir,
            "tree.json",
            r#"[{"name":"root","type":"object","children":["env","series"]},
                {"name":"env","type":"object","parent":"root","children":["h","t"]},
                {"name":"h","type":"int","parent":"env"},
                {"name":"t","type":"double","parent":"env","unit":"K"},
                {"name":"series","type":"array","parent":"root","children":["s"],"size":4},
                {"name":"s","type":"double","parent":"series"}]"#,
        );
        let pattern = write(
            dir,
            "pattern.yaml",
            "\
- {name: climate, type: object, children: [temperature, humidity]}
- {name: temperature, type: double, parent: climate}
- {name: humidity, type: int, parent: climate}
",
        );
        (tree, pattern)
    }

    #[test]
    fn match_finds_reordered_subtree() {
        let dir = tempfile::tempdir().unwrap();
        let (file, pattern) = fixtures(dir.path());
        let args = PatternArgs {
            file,
            pattern,
            root: None,
        };
        assert_eq!(run_match(&args, &MatchLimits::default()).unwrap(), 0);
    }

    #[test]
    fn match_respects_limits() {
        let dir = tempfile::tempdir().unwrap();
        let (file, pattern) = fixtures(dir.path());
        let args = PatternArgs {
            file,
            pattern,
            root: None,
        };
        let tight = MatchLimits {
            max_fan_out: 1,
            max_pattern_nodes: 32,
        };
        let err = run_match(&args, &tight).unwrap_err();
        assert!(format!("{err:#}").contains("fan-out"));
    }

    #[test]
    fn unknown_pattern_root_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let (file, pattern) = fixtures(dir.path());
        let args = PatternArgs {
            file,
            pattern,
            root: Some("nope".to_string()),
        };
        assert!(run_leaves(&args).is_err());
    }

    #[test]
    fn leaves_by_pattern_node() {
        let dir = tempfile::tempdir().unwrap();
        let (file, pattern) = fixtures(dir.path());
        let doubles = PatternArgs {
            file: file.clone(),
            pattern: pattern.clone(),
            root: Some("temperature".to_string()),
        };
        assert_eq!(run_leaves(&doubles).unwrap(), 0);

        let series = write(
            dir.path(),
            "series.json",
            r#"[{"name":"vis","type":"object","children":["m"]},
                {"name":"m","type":"array","parent":"vis","children":["r"],"size":2},
                {"name":"r","type":"array","parent":"m","children":["x"],"size":2},
                {"name":"x","type":"double","parent":"r"}]"#,
        );
        let two_d = PatternArgs {
            file,
            pattern: series,
            root: Some("m".to_string()),
        };
        assert_eq!(run_leaves(&two_d).unwrap(), 1);
    }
}
