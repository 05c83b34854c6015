//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the
//! `template-query` command-line tool. Each subcommand is defined in its own
//! file to keep the logic separated and maintainable.
//!
//! Each command module contains an `Args` struct defining the
//! command-specific arguments (derived with `clap`) and an `execute`
//! function performing the command's logic by calling into the
//! `template_query` library.

pub mod completions;
pub mod info;
pub mod ls;
pub mod validate;
