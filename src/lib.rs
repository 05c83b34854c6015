//! # Template Query Library
//!
//! This library provides the core functionality for reading, querying, and
//! writing Xcode template descriptors. It is designed to be used by the
//! `template-query` command-line tool but can also be integrated into other
//! applications that work with IDE project and file templates.
//!
//! ## Quick Example
//!
//! ```
//! use template_query::template::{Template, TemplateKind};
//!
//! let raw = br#"{
//!     "Kind": "Xcode.Xcode3.ProjectTemplateUnitKind",
//!     "Name": "Command Line Tool",
//!     "Concrete": true
//! }"#;
//!
//! let template = Template::from_slice(raw).unwrap();
//! assert_eq!(template.kind, TemplateKind::Project);
//! assert_eq!(template.name.as_deref(), Some("Command Line Tool"));
//! assert!(!template.is_abstract);
//!
//! // Encoding omits defaulted fields and round-trips losslessly.
//! let bytes = template.to_vec().unwrap();
//! assert_eq!(Template::from_slice(&bytes).unwrap(), template);
//! ```
//!
//! ## Core Concepts
//!
//! - **Descriptor document**: a loosely-typed hierarchical document
//!   (`serde_json::Value`) whose leaves are booleans, integers, floats, and
//!   strings. The original property-list format maps onto it one to one.
//! - **Shape-inferred decoding (`template::definitions`)**: entries of the
//!   `Definitions` mapping carry no type tag; the decoder infers each
//!   entry's variant from which keys are present, via a fixed precedence
//!   cascade.
//! - **Scalar coercion (`value`)**: leaf values tolerate the format's loose
//!   spellings (`"YES"`, `"42"`) and decode into a closed
//!   bool/int/float/string union.
//! - **Invariant-checked collections**: the build-phase plan
//!   (`template::phases`) enforces per-kind uniqueness at every mutation
//!   entry point, and the settings table (`template::settings`) never stores
//!   an empty configuration layer.
//! - **Discovery (`discovery`)**: walks a directory tree for descriptor
//!   files inside `*.xctemplate` packages.
//!
//! Decoding is strict: a malformed entry fails the whole document with a
//! structured [`error::Error`] rather than being skipped, so a
//! read-modify-write cycle never silently drops template data.

pub mod discovery;
pub(crate) mod document;
pub mod error;
pub mod output;
pub mod template;
pub mod value;

pub use error::{Error, Result};
