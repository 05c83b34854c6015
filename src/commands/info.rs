//! # Info Command Implementation
//!
//! This module implements the `info` subcommand, which decodes a single
//! template descriptor and prints a human-readable summary: template kind
//! and identity, required platforms, the targets it creates (with their
//! settings, dependencies, and build phases), and its definitions.
//!
//! This command is a safe, read-only operation that does not modify any
//! files.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use template_query::discovery;
use template_query::output::{emoji, OutputConfig};
use template_query::template::Template;

/// Show a summary of one template descriptor
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Path to the template descriptor file.
    #[arg(value_name = "FILE")]
    pub descriptor: PathBuf,
}

/// Execute the `info` command.
pub fn execute(args: InfoArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    let template = discovery::load_template(&args.descriptor)
        .with_context(|| format!("failed to load {}", args.descriptor.display()))?;

    print_summary(&out, &template);
    Ok(())
}

fn print_summary(out: &OutputConfig, template: &Template) {
    let name = template
        .name
        .as_deref()
        .or(template.identifier.as_deref())
        .unwrap_or("(unnamed)");
    println!(
        "{} {} ({} template{})",
        emoji(out, "📦", "[TPL]"),
        name,
        template.kind.label(),
        if template.is_abstract { ", abstract" } else { "" },
    );

    if let Some(identifier) = &template.identifier {
        println!("  identifier: {identifier}");
    }
    if !template.ancestors.is_empty() {
        println!("  ancestors: {}", template.ancestors.join(", "));
    }
    if let Some(summary) = &template.summary {
        println!("  summary: {summary}");
    }
    if !template.platforms.is_empty() {
        let labels: Vec<&str> = template.platforms.iter().map(|p| p.label()).collect();
        println!("  platforms: {}", labels.join(", "));
    }

    for target in &template.targets {
        let target_name = target
            .name
            .as_deref()
            .or(target.identifier.as_deref())
            .unwrap_or("(unnamed)");
        println!("  target: {target_name}");
        if let Some(product) = target.product_type {
            println!("    product: {}", product.raw());
        }
        let shared = target.build.settings.layer(None).map_or(0, |l| l.len());
        let configs = target.build.settings.configurations().count();
        if shared + configs > 0 {
            println!("    settings: {shared} shared, {configs} configuration(s)");
        }
        if !target.build.dependencies.is_empty() {
            println!(
                "    dependencies: {} target(s), {} framework(s)",
                target.build.dependencies.targets.len(),
                target.build.dependencies.frameworks.len()
            );
        }
        for phase in &target.build.phases {
            println!("    phase: {phase}");
        }
    }

    if !template.definitions.is_empty() {
        println!("  definitions:");
        for (def_name, definition) in template.definitions.iter() {
            println!("    {def_name}: {}", definition.variant_name());
        }
    }
}
