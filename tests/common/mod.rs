//! Shared test utilities for integration and E2E tests.
//!
//! Provides helpers for laying out template package trees on disk, so each
//! test file does not repeat the `*.xctemplate/TemplateInfo.json` plumbing.

use std::fs;
use std::path::{Path, PathBuf};

/// Minimal valid descriptor snippets for testing.
#[allow(dead_code)]
pub mod descriptors {
    /// A concrete project template with one target.
    pub const PROJECT: &str = r#"{
        "Kind": "Xcode.Xcode3.ProjectTemplateUnitKind",
        "Name": "Command Line Tool",
        "Concrete": true,
        "Platforms": ["com.apple.platform.macosx"],
        "Targets": [
            {
                "ProductType": "com.apple.product-type.tool",
                "SharedSettings": { "PRODUCT_NAME": "Tool" },
                "BuildPhases": [
                    { "Class": "Sources" },
                    { "Class": "Frameworks" }
                ]
            }
        ]
    }"#;

    /// An abstract file template with a raw definition.
    pub const FILE_BASE: &str = r#"{
        "Kind": "Xcode.IDEFoundation.TextSubstitutionFileTemplateKind",
        "Identifier": "com.example.base",
        "Definitions": { "Greeting": "hello" }
    }"#;

    /// Not a descriptor at all: the `Kind` key is missing.
    pub const MISSING_KIND: &str = r#"{ "Name": "Broken" }"#;
}

/// Writes a descriptor into `<root>/<package>.xctemplate/TemplateInfo.json`
/// and returns the descriptor path.
#[allow(dead_code)]
pub fn write_package(root: &Path, package: &str, contents: &str) -> PathBuf {
    let package_dir = root.join(format!("{package}.xctemplate"));
    fs::create_dir_all(&package_dir).unwrap();
    let path = package_dir.join("TemplateInfo.json");
    fs::write(&path, contents).unwrap();
    path
}
