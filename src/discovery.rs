//! # Template Discovery
//!
//! Locates template descriptor files on disk and loads them into the typed
//! model. Template packages are `*.xctemplate` directories carrying a
//! descriptor file at their root; discovery walks a tree, collects every
//! descriptor, and leaves decoding to the caller (or [`load_template`]).
//!
//! Unreadable directory entries are logged and skipped rather than aborting
//! the walk — one broken permission bit should not hide every other template
//! under the root.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::template::{Template, DESCRIPTOR_FILE};

/// Whether the path names a template descriptor file (case-insensitive on
/// the file name, matching how the templating system treats it).
pub fn is_template_descriptor(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.eq_ignore_ascii_case(DESCRIPTOR_FILE))
}

fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

/// Collects every template descriptor under `root`, sorted for
/// deterministic output.
///
/// `root` may also be a descriptor file itself; any other file is a
/// [`Error::Discovery`] failure.
pub fn descriptors_under(root: &Path) -> Result<Vec<PathBuf>> {
    if root.is_file() {
        if is_template_descriptor(root) {
            return Ok(vec![root.to_path_buf()]);
        }
        return Err(Error::Discovery {
            message: format!("{} is not a template descriptor", root.display()),
        });
    }

    let mut descriptors = Vec::new();
    // Depth 0 is the root the caller asked for; the hidden-name rule only
    // applies to entries found during the walk, or a root of "." (or any
    // dot-named directory) would yield nothing.
    let walker = WalkDir::new(root)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("skipping unreadable entry under {}: {err}", root.display());
                continue;
            }
        };
        if entry.file_type().is_file() && is_template_descriptor(entry.path()) {
            descriptors.push(entry.into_path());
        }
    }
    descriptors.sort();
    debug!(
        "found {} template descriptor(s) under {}",
        descriptors.len(),
        root.display()
    );
    Ok(descriptors)
}

/// Reads and decodes one descriptor file.
pub fn load_template(path: &Path) -> Result<Template> {
    let bytes = fs::read(path)?;
    Template::from_slice(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_descriptor(dir: &Path, package: &str, contents: &str) -> PathBuf {
        let package_dir = dir.join(format!("{package}.xctemplate"));
        fs::create_dir_all(&package_dir).unwrap();
        let path = package_dir.join(DESCRIPTOR_FILE);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_is_template_descriptor() {
        assert!(is_template_descriptor(Path::new("a/TemplateInfo.json")));
        assert!(is_template_descriptor(Path::new("a/TEMPLATEINFO.JSON")));
        assert!(!is_template_descriptor(Path::new("a/Info.json")));
        assert!(!is_template_descriptor(Path::new("a/")));
    }

    #[test]
    fn test_descriptors_under_tree() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let a = write_descriptor(&root.join("Project Templates"), "Base", "{}");
        let b = write_descriptor(&root.join("File Templates/Source"), "Swift File", "{}");
        fs::write(root.join("README.md"), "not a template").unwrap();

        let mut expected = vec![a, b];
        expected.sort();
        assert_eq!(descriptors_under(root).unwrap(), expected);
    }

    #[test]
    fn test_hidden_directories_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write_descriptor(&root.join(".hidden"), "Secret", "{}");
        let visible = write_descriptor(root, "Visible", "{}");

        assert_eq!(descriptors_under(root).unwrap(), vec![visible]);
    }

    #[test]
    fn test_hidden_named_root_is_still_walked() {
        // The hidden-name rule must not apply to the root itself: "." and
        // dot-named directories are legitimate search roots.
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join(".templates");
        let descriptor = write_descriptor(&root, "Tool", "{}");
        write_descriptor(&root.join(".nested"), "Secret", "{}");

        assert_eq!(descriptors_under(&root).unwrap(), vec![descriptor]);
    }

    #[test]
    fn test_root_file_handling() {
        let dir = tempfile::tempdir().unwrap();
        let descriptor = write_descriptor(dir.path(), "Base", "{}");
        assert_eq!(
            descriptors_under(&descriptor).unwrap(),
            vec![descriptor.clone()]
        );

        let other = dir.path().join("notes.txt");
        fs::write(&other, "x").unwrap();
        assert!(matches!(
            descriptors_under(&other),
            Err(Error::Discovery { .. })
        ));
    }

    #[test]
    fn test_load_template() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_descriptor(
            dir.path(),
            "Blank",
            r#"{ "Kind": "Xcode.IDEFoundation.TextSubstitutionFileTemplateKind", "Name": "Blank" }"#,
        );
        let template = load_template(&path).unwrap();
        assert_eq!(template.name.as_deref(), Some("Blank"));

        let missing = dir.path().join("absent.json");
        assert!(matches!(load_template(&missing), Err(Error::Io(_))));
    }
}
