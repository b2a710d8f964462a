//! # Validate Subcommand
//!
//! Builds every given descriptor file and reports the outcome per file:
//!
//! ```text
//! OK   sensors/weather.json (8 nodes, depth 4)
//! FAIL sensors/broken.yaml
//!   - treeNodes: Node c is an object but has no children.
//! ```

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;

use dmt_tree::Tree;

use crate::load::read_descriptors;

/// Arguments for the `validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Descriptor files to validate.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

/// Execute the validate subcommand. Returns 1 if any file was rejected.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let mut failed = 0usize;
    for file in &args.files {
        if !validate_file(file)? {
            failed += 1;
        }
    }
    tracing::info!(files = args.files.len(), failed, "validation finished");
    Ok(u8::from(failed > 0))
}

fn validate_file(path: &Path) -> Result<bool> {
    let descriptors = read_descriptors(path)?;
    match Tree::build(descriptors) {
        Ok(tree) => {
            println!(
                "OK   {} ({} nodes, depth {})",
                path.display(),
                tree.len(),
                tree.depth()
            );
            Ok(true)
        }
        Err(report) => {
            eprintln!("FAIL {}", path.display());
            for violation in report.violations() {
                eprintln!("  - {violation}");
            }
            Ok(false)
        }
    }
}
