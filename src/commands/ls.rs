//! # Ls Command Implementation
//!
//! This module implements the `ls` subcommand, which lists the template
//! descriptors found under a directory tree (e.g. an installed toolchain's
//! template library or a user template folder).
//!
//! This command is a safe, read-only operation: it only walks the tree and
//! prints paths; descriptors are not decoded.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use template_query::discovery;

/// List template descriptors found under a directory
#[derive(Args, Debug)]
pub struct LsArgs {
    /// The directory (or single descriptor file) to search.
    #[arg(value_name = "ROOT", default_value = ".")]
    pub root: PathBuf,

    /// Show only the total count of descriptors.
    #[arg(long)]
    pub count: bool,
}

/// Execute the `ls` command.
pub fn execute(args: LsArgs, _color_flag: &str) -> Result<()> {
    let descriptors = discovery::descriptors_under(&args.root)?;

    if args.count {
        println!("{}", descriptors.len());
        return Ok(());
    }

    for path in &descriptors {
        println!("{}", path.display());
    }
    Ok(())
}
