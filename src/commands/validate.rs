//! # Validate Command Implementation
//!
//! This module implements the `validate` subcommand, which decodes every
//! template descriptor under a path and reports, per file, whether it is a
//! well-formed descriptor. Decoding is strict — a malformed entry anywhere
//! in a descriptor fails that whole file — so a clean run means every
//! descriptor round-trips through the typed model.
//!
//! This command is a safe, read-only operation that does not modify any
//! files.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use template_query::discovery;
use template_query::output::{emoji, OutputConfig};

/// Decode template descriptors and report any errors
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// A descriptor file or a directory to search for descriptors.
    #[arg(value_name = "PATH", default_value = ".")]
    pub path: PathBuf,

    /// Only print failing descriptors.
    #[arg(short, long)]
    pub quiet: bool,
}

/// Execute the `validate` command.
///
/// Returns an error (and thus a non-zero exit code) if any descriptor fails
/// to decode.
pub fn execute(args: ValidateArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    let descriptors = discovery::descriptors_under(&args.path)?;

    if descriptors.is_empty() {
        println!(
            "{} No template descriptors found under {}",
            emoji(&out, "🤷", "[NONE]"),
            args.path.display()
        );
        return Ok(());
    }

    let mut failures = 0usize;
    for path in &descriptors {
        match discovery::load_template(path) {
            Ok(_) => {
                if !args.quiet {
                    println!("{} {}", emoji(&out, "✅", "[OK]"), path.display());
                }
            }
            Err(err) => {
                failures += 1;
                println!("{} {}: {err}", emoji(&out, "❌", "[ERR]"), path.display());
            }
        }
    }

    if failures > 0 {
        anyhow::bail!(
            "{failures} of {} descriptor(s) failed validation",
            descriptors.len()
        );
    }
    if !args.quiet {
        println!(
            "{} {} descriptor(s) validated",
            emoji(&out, "🎉", "[DONE]"),
            descriptors.len()
        );
    }
    Ok(())
}
