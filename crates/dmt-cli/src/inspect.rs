//! # Inspection Subcommands
//!
//! Read-only views of one built tree: the example message, the path index,
//! a single path lookup and the exported JSON Schema.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::json;

use crate::load::load_tree;

/// Arguments for the `example` subcommand.
#[derive(Args, Debug)]
pub struct ExampleArgs {
    /// Descriptor file.
    pub file: PathBuf,

    /// Pretty-print the message.
    #[arg(long)]
    pub pretty: bool,
}

/// Arguments for the `paths` subcommand.
#[derive(Args, Debug)]
pub struct PathsArgs {
    /// Descriptor file.
    pub file: PathBuf,
}

/// Arguments for the `lookup` subcommand.
#[derive(Args, Debug)]
pub struct LookupArgs {
    /// Descriptor file.
    pub file: PathBuf,

    /// Symbolic path, e.g. `samples[*].value`.
    pub path: String,
}

/// Arguments for the `schema` subcommand.
#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Descriptor file.
    pub file: PathBuf,
}

/// Print the example message of a tree.
pub fn run_example(args: &ExampleArgs) -> Result<u8> {
    let tree = load_tree(&args.file)?;
    if args.pretty {
        let message = json!({ "value": tree.example_document() });
        println!(
            "{}",
            serde_json::to_string_pretty(&message).context("rendering example message")?
        );
    } else {
        println!("{}", tree.example_message());
    }
    Ok(0)
}

/// Print the path index, sorted by path. The root's path is empty.
pub fn run_paths(args: &PathsArgs) -> Result<u8> {
    let tree = load_tree(&args.file)?;
    for (path, _, data_type) in tree.path_index().entries() {
        println!("{path}\t{data_type}");
    }
    Ok(0)
}

/// Print the type at a path. Returns 1 on a miss.
pub fn run_lookup(args: &LookupArgs) -> Result<u8> {
    let tree = load_tree(&args.file)?;
    match tree.lookup(&args.path) {
        Some((_, data_type)) => {
            println!("{data_type}");
            Ok(0)
        }
        None => {
            eprintln!("no node at path {:?}", args.path);
            Ok(1)
        }
    }
}

/// Print the JSON Schema of the tree's messages.
pub fn run_schema(args: &SchemaArgs) -> Result<u8> {
    let tree = load_tree(&args.file)?;
    println!(
        "{}",
        serde_json::to_string_pretty(&tree.json_schema()).context("rendering JSON Schema")?
    );
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn sample(dir: &Path) -> PathBuf {
        let path = dir.join("tree.yaml");
        std::fs::write(
            &path,
            "\
treeNodes:
  - {name: root, type: object, children: [samples]}
  - {name: samples, type: array, parent: root, children: [value], size: 2}
  - {name: value, type: int, parent: samples}
",
        )
        .unwrap();
        path
    }

    #[test]
    fn lookup_hit_and_miss() {
        let dir = tempfile::tempdir().unwrap();
        let file = sample(dir.path());
        let hit = LookupArgs {
            file: file.clone(),
            path: "samples[*]".to_string(),
        };
        assert_eq!(run_lookup(&hit).unwrap(), 0);
        let miss = LookupArgs {
            file,
            path: "samples.value".to_string(),
        };
        assert_eq!(run_lookup(&miss).unwrap(), 1);
    }

    #[test]
    fn example_paths_and_schema_succeed() {
        let dir = tempfile::tempdir().unwrap();
        let file = sample(dir.path());
        assert_eq!(
            run_example(&ExampleArgs {
                file: file.clone(),
                pretty: true
            })
            .unwrap(),
            0
        );
        assert_eq!(run_paths(&PathsArgs { file: file.clone() }).unwrap(), 0);
        assert_eq!(run_schema(&SchemaArgs { file }).unwrap(), 0);
    }

    #[test]
    fn invalid_tree_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("bad.json");
        std::fs::write(&file, r#"[{"name":"root","type":"object"}]"#).unwrap();
        assert!(run_paths(&PathsArgs { file }).is_err());
    }
}
