//! # Build Phases
//!
//! A target's build pipeline is an ordered list of build phases. The
//! descriptor stores each phase as an object discriminated by its `Class`
//! string; this module decodes that list into a [`BuildPhase`] enum and wraps
//! the sequence in a [`Plan`] that owns the per-kind uniqueness rule.
//!
//! ## Uniqueness rule
//!
//! Four phase kinds — Headers, Sources, Resources, Frameworks — may appear at
//! most once in a plan; CopyFiles and ShellScript phases may repeat. The rule
//! is enforced at the mutation entry points ([`Plan::append`],
//! [`Plan::replace`]): there is no raw insertion path that bypasses the
//! check. Sequence order is semantically significant — it is the on-disk
//! execution order of the phases.

use std::fmt;

use serde_json::Value;

use crate::document::{self, Dict};
use crate::error::{Error, Result};

/// The fixed tag of a build phase, used for decode dispatch and for the
/// plan's uniqueness rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseKind {
    /// Include headers (public, project, or private).
    Headers,
    /// Compile sources.
    Sources,
    /// Copy resources into the product bundle.
    Resources,
    /// Link binary with libraries.
    Frameworks,
    /// Copy files from one place in the file system to another.
    CopyFiles,
    /// Run a shell script.
    RunScript,
}

impl PhaseKind {
    /// The `Class` discriminator stored in the descriptor.
    pub fn class(&self) -> &'static str {
        match self {
            PhaseKind::Headers => "Headers",
            PhaseKind::Sources => "Sources",
            PhaseKind::Resources => "Resources",
            PhaseKind::Frameworks => "Frameworks",
            PhaseKind::CopyFiles => "CopyFiles",
            PhaseKind::RunScript => "ShellScript",
        }
    }

    fn from_class(class: &str) -> Option<Self> {
        match class {
            "Headers" => Some(PhaseKind::Headers),
            "Sources" => Some(PhaseKind::Sources),
            "Resources" => Some(PhaseKind::Resources),
            "Frameworks" => Some(PhaseKind::Frameworks),
            "CopyFiles" => Some(PhaseKind::CopyFiles),
            "ShellScript" => Some(PhaseKind::RunScript),
            _ => None,
        }
    }

    /// Whether this phase kind may appear more than once in a plan.
    fn is_repeatable(&self) -> bool {
        matches!(self, PhaseKind::CopyFiles | PhaseKind::RunScript)
    }
}

/// The logical destination of a CopyFiles phase, stored as an integer code
/// (`DstSubfolderSpec`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    AbsolutePath,
    ProductsDirectory,
    Wrapper,
    Executables,
    Resources,
    JavaResources,
    Frameworks,
    SharedFrameworks,
    SharedSupport,
    PlugIns,
    XpcServices,
}

impl Destination {
    const ALL: [Destination; 11] = [
        Destination::AbsolutePath,
        Destination::ProductsDirectory,
        Destination::Wrapper,
        Destination::Executables,
        Destination::Resources,
        Destination::JavaResources,
        Destination::Frameworks,
        Destination::SharedFrameworks,
        Destination::SharedSupport,
        Destination::PlugIns,
        Destination::XpcServices,
    ];

    /// The integer code stored in the descriptor (0 through 10).
    pub fn code(&self) -> i64 {
        Self::ALL.iter().position(|d| d == self).unwrap() as i64
    }

    pub fn from_code(code: i64) -> Option<Self> {
        usize::try_from(code).ok().and_then(|i| Self::ALL.get(i).copied())
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Destination::AbsolutePath => "Absolute Path",
            Destination::ProductsDirectory => "Products Directory",
            Destination::Wrapper => "Wrapper",
            Destination::Executables => "Executables",
            Destination::Resources => "Resources",
            Destination::JavaResources => "Java Resources",
            Destination::Frameworks => "Frameworks",
            Destination::SharedFrameworks => "Shared Frameworks",
            Destination::SharedSupport => "Shared Support",
            Destination::PlugIns => "Plug-Ins",
            Destination::XpcServices => "XPC Services",
        };
        f.write_str(label)
    }
}

const KEY_CLASS: &str = "Class";
const KEY_DST_SPEC: &str = "DstSubfolderSpec";
const KEY_DST_PATH: &str = "DstPath";
const KEY_INSTALL_ONLY: &str = "RunOnlyForDeploymentPostprocessing";
const KEY_SHELL_PATH: &str = "ShellPath";
const KEY_SHELL_SCRIPT: &str = "ShellScript";

/// Default interpreter for script phases.
pub const DEFAULT_SHELL: &str = "/bin/sh";

/// One step of a target's build pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildPhase {
    Headers,
    Sources,
    Resources,
    Frameworks,
    /// Copy files to a logical destination.
    Files {
        destination: Destination,
        path: String,
        /// Whether the copy only runs when installing
        /// (`RunOnlyForDeploymentPostprocessing`).
        copy_only_when_installing: bool,
    },
    /// Run a shell script.
    Script {
        /// The program in charge of running the script.
        program_path: String,
        /// The content of the shell script.
        script: String,
    },
}

impl BuildPhase {
    /// Convenience constructor for a Files phase with the default
    /// install-only behavior.
    pub fn files(destination: Destination, path: impl Into<String>) -> Self {
        BuildPhase::Files {
            destination,
            path: path.into(),
            copy_only_when_installing: true,
        }
    }

    /// Convenience constructor for a Script phase run by `/bin/sh`.
    pub fn script(script: impl Into<String>) -> Self {
        BuildPhase::Script {
            program_path: DEFAULT_SHELL.to_string(),
            script: script.into(),
        }
    }

    /// The fixed tag of this phase.
    pub fn kind(&self) -> PhaseKind {
        match self {
            BuildPhase::Headers => PhaseKind::Headers,
            BuildPhase::Sources => PhaseKind::Sources,
            BuildPhase::Resources => PhaseKind::Resources,
            BuildPhase::Frameworks => PhaseKind::Frameworks,
            BuildPhase::Files { .. } => PhaseKind::CopyFiles,
            BuildPhase::Script { .. } => PhaseKind::RunScript,
        }
    }

    fn from_value(value: &Value, context: &str) -> Result<Self> {
        let dict = document::as_object(value, context)?;
        let class = document::req_str(dict, KEY_CLASS, context)?;
        let kind = PhaseKind::from_class(&class)
            .ok_or(Error::UnknownPhaseKind { class })?;

        match kind {
            PhaseKind::Headers => Ok(BuildPhase::Headers),
            PhaseKind::Sources => Ok(BuildPhase::Sources),
            PhaseKind::Resources => Ok(BuildPhase::Resources),
            PhaseKind::Frameworks => Ok(BuildPhase::Frameworks),
            PhaseKind::CopyFiles => {
                let code = document::req_i64(dict, KEY_DST_SPEC, context)?;
                let destination = Destination::from_code(code).ok_or_else(|| {
                    Error::mismatch(
                        document::field(context, KEY_DST_SPEC),
                        "destination code 0-10",
                        code.to_string(),
                    )
                })?;
                Ok(BuildPhase::Files {
                    destination,
                    path: document::req_str(dict, KEY_DST_PATH, context)?,
                    copy_only_when_installing: document::bool_or(
                        dict,
                        KEY_INSTALL_ONLY,
                        context,
                        true,
                    )?,
                })
            }
            PhaseKind::RunScript => Ok(BuildPhase::Script {
                program_path: document::opt_str(dict, KEY_SHELL_PATH, context)?
                    .unwrap_or_else(|| DEFAULT_SHELL.to_string()),
                script: document::req_str(dict, KEY_SHELL_SCRIPT, context)?,
            }),
        }
    }

    fn to_value(&self) -> Value {
        let mut dict = Dict::new();
        dict.insert(
            KEY_CLASS.to_string(),
            Value::String(self.kind().class().to_string()),
        );
        match self {
            BuildPhase::Headers
            | BuildPhase::Sources
            | BuildPhase::Resources
            | BuildPhase::Frameworks => {}
            BuildPhase::Files {
                destination,
                path,
                copy_only_when_installing,
            } => {
                dict.insert(KEY_DST_SPEC.to_string(), Value::from(destination.code()));
                dict.insert(KEY_DST_PATH.to_string(), Value::String(path.clone()));
                dict.insert(
                    KEY_INSTALL_ONLY.to_string(),
                    Value::Bool(*copy_only_when_installing),
                );
            }
            BuildPhase::Script {
                program_path,
                script,
            } => {
                dict.insert(
                    KEY_SHELL_PATH.to_string(),
                    Value::String(program_path.clone()),
                );
                dict.insert(KEY_SHELL_SCRIPT.to_string(), Value::String(script.clone()));
            }
        }
        Value::Object(dict)
    }
}

impl fmt::Display for BuildPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildPhase::Headers => f.write_str("Include headers"),
            BuildPhase::Sources => f.write_str("Compile sources"),
            BuildPhase::Resources => f.write_str("Copy resources to bundle"),
            BuildPhase::Frameworks => f.write_str("Link libraries"),
            BuildPhase::Files {
                destination, path, ..
            } => write!(f, "Copy files to {path} ({destination})"),
            BuildPhase::Script { program_path, .. } => {
                write!(f, "Run script with {program_path}")
            }
        }
    }
}

/// The ordered build phases of a target.
///
/// Wraps a plain vector and exposes only invariant-checked mutation: a
/// second Headers/Sources/Resources/Frameworks phase is rejected, CopyFiles
/// and ShellScript phases repeat freely.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Plan {
    phases: Vec<BuildPhase>,
}

impl Plan {
    /// An empty plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a plan from the given phases, or `None` if they contain a
    /// duplicate of a phase kind that must be unique.
    pub fn from_phases(phases: impl IntoIterator<Item = BuildPhase>) -> Option<Self> {
        let mut plan = Plan::new();
        for phase in phases {
            if !plan.append(phase) {
                return None;
            }
        }
        Some(plan)
    }

    /// Appends the phase to the end of the plan.
    ///
    /// Returns whether the phase was stored; a duplicate of a
    /// non-repeatable kind is rejected and the plan left untouched.
    pub fn append(&mut self, phase: BuildPhase) -> bool {
        if !self.can_store(&phase) {
            return false;
        }
        self.phases.push(phase);
        true
    }

    /// Appends every phase in order, skipping the ones the plan rejects.
    pub fn append_all(&mut self, phases: impl IntoIterator<Item = BuildPhase>) {
        for phase in phases {
            self.append(phase);
        }
    }

    /// Replaces the phase at `index`.
    ///
    /// A replacement that would introduce a duplicate of a non-repeatable
    /// kind is discarded and the prior value retained. Replacing a phase
    /// with another of the same kind is always allowed.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds, like indexing a slice.
    pub fn replace(&mut self, index: usize, phase: BuildPhase) {
        let kind = phase.kind();
        let duplicate = !kind.is_repeatable()
            && self
                .phases
                .iter()
                .enumerate()
                .any(|(i, p)| i != index && p.kind() == kind);
        // Touch the slot even when rejecting so an out-of-bounds index is
        // reported identically on both paths.
        let slot = &mut self.phases[index];
        if !duplicate {
            *slot = phase;
        }
    }

    fn can_store(&self, phase: &BuildPhase) -> bool {
        let kind = phase.kind();
        kind.is_repeatable() || !self.phases.iter().any(|p| p.kind() == kind)
    }

    pub fn get(&self, index: usize) -> Option<&BuildPhase> {
        self.phases.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BuildPhase> {
        self.phases.iter()
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    /// Whether the plan already contains a phase of the given kind.
    pub fn contains_kind(&self, kind: PhaseKind) -> bool {
        self.phases.iter().any(|p| p.kind() == kind)
    }

    /// Decodes a plan from the descriptor's ordered phase array.
    ///
    /// The document's order is authoritative and preserved verbatim — decode
    /// does not re-check the uniqueness rule, so a descriptor already
    /// carrying duplicate singleton phases round-trips unchanged instead of
    /// losing data.
    pub(crate) fn from_value(value: &Value, context: &str) -> Result<Self> {
        let array = document::as_array(value, context)?;
        let mut phases = Vec::with_capacity(array.len());
        for (i, item) in array.iter().enumerate() {
            phases.push(BuildPhase::from_value(item, &document::index(context, i))?);
        }
        Ok(Plan { phases })
    }

    /// Encodes the phases in sequence order, each with its `Class`
    /// discriminator and fixed fields.
    pub(crate) fn to_value(&self) -> Value {
        Value::Array(self.phases.iter().map(BuildPhase::to_value).collect())
    }
}

impl std::ops::Index<usize> for Plan {
    type Output = BuildPhase;

    fn index(&self, index: usize) -> &BuildPhase {
        &self.phases[index]
    }
}

impl<'a> IntoIterator for &'a Plan {
    type Item = &'a BuildPhase;
    type IntoIter = std::slice::Iter<'a, BuildPhase>;

    fn into_iter(self) -> Self::IntoIter {
        self.phases.iter()
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.phases.iter().map(|p| p.to_string()).collect();
        write!(f, "[{}]", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_append_rejects_second_singleton() {
        let mut plan = Plan::new();
        assert!(plan.append(BuildPhase::Sources));
        assert!(plan.append(BuildPhase::Headers));

        let before: Vec<PhaseKind> = plan.iter().map(|p| p.kind()).collect();
        assert!(!plan.append(BuildPhase::Sources));
        let after: Vec<PhaseKind> = plan.iter().map(|p| p.kind()).collect();
        assert_eq!(before, after, "rejected append must not mutate the plan");
        assert_eq!(plan.len(), 2);
    }

    #[test]
    fn test_repeatable_phases_append_freely() {
        let mut plan = Plan::new();
        for i in 0..3 {
            assert!(plan.append(BuildPhase::files(
                Destination::Resources,
                format!("dir{i}")
            )));
        }
        assert_eq!(plan.len(), 3);
        // Append order is preserved.
        let paths: Vec<&str> = plan
            .iter()
            .map(|p| match p {
                BuildPhase::Files { path, .. } => path.as_str(),
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(paths, ["dir0", "dir1", "dir2"]);

        assert!(plan.append(BuildPhase::script("echo one")));
        assert!(plan.append(BuildPhase::script("echo two")));
        assert_eq!(plan.len(), 5);
    }

    #[test]
    fn test_replace_keeps_prior_value_on_violation() {
        let mut plan =
            Plan::from_phases([BuildPhase::Sources, BuildPhase::Frameworks]).unwrap();

        // Would duplicate Sources: silently ignored, old value retained.
        plan.replace(1, BuildPhase::Sources);
        assert_eq!(plan[1], BuildPhase::Frameworks);

        // Replacing a phase with one of the same kind is fine.
        plan.replace(0, BuildPhase::Sources);
        assert_eq!(plan[0], BuildPhase::Sources);

        // A repeatable phase can replace a singleton slot.
        plan.replace(1, BuildPhase::script("true"));
        assert!(matches!(plan[1], BuildPhase::Script { .. }));
        // ...after which the freed singleton can be replaced back in.
        plan.replace(1, BuildPhase::Frameworks);
        assert_eq!(plan[1], BuildPhase::Frameworks);
    }

    #[test]
    fn test_from_phases_fails_on_duplicates() {
        assert!(Plan::from_phases([BuildPhase::Headers, BuildPhase::Headers]).is_none());
        let plan = Plan::from_phases([
            BuildPhase::Headers,
            BuildPhase::script("a"),
            BuildPhase::script("b"),
        ])
        .unwrap();
        assert_eq!(plan.len(), 3);
    }

    #[test]
    fn test_decode_dispatches_on_class() {
        let raw = json!([
            { "Class": "Headers" },
            { "Class": "Sources" },
            { "Class": "Resources" },
            { "Class": "Frameworks" },
            { "Class": "CopyFiles", "DstSubfolderSpec": 6, "DstPath": "libs" },
            { "Class": "ShellScript", "ShellScript": "echo hi" }
        ]);
        let plan = Plan::from_value(&raw, "BuildPhases").unwrap();
        assert_eq!(plan.len(), 6);
        assert_eq!(
            plan[4],
            BuildPhase::Files {
                destination: Destination::Frameworks,
                path: "libs".to_string(),
                copy_only_when_installing: true,
            }
        );
        assert_eq!(
            plan[5],
            BuildPhase::Script {
                program_path: "/bin/sh".to_string(),
                script: "echo hi".to_string(),
            }
        );
    }

    #[test]
    fn test_decode_unknown_class() {
        let raw = json!([{ "Class": "LinkEverything" }]);
        let err = Plan::from_value(&raw, "BuildPhases").unwrap_err();
        assert!(matches!(
            err,
            Error::UnknownPhaseKind { class } if class == "LinkEverything"
        ));
    }

    #[test]
    fn test_decode_missing_required_fields() {
        let raw = json!([{ "Class": "ShellScript" }]);
        let err = Plan::from_value(&raw, "BuildPhases").unwrap_err();
        assert!(err.to_string().contains("BuildPhases[0].ShellScript"));

        let raw = json!([{ "Class": "CopyFiles", "DstSubfolderSpec": 99, "DstPath": "x" }]);
        let err = Plan::from_value(&raw, "BuildPhases").unwrap_err();
        assert!(err.to_string().contains("DstSubfolderSpec"));
    }

    #[test]
    fn test_decode_preserves_document_order_even_for_duplicates() {
        // Mutation forbids this shape, but a document that already carries it
        // must round-trip without losing entries.
        let raw = json!([{ "Class": "Sources" }, { "Class": "Sources" }]);
        let plan = Plan::from_value(&raw, "BuildPhases").unwrap();
        assert_eq!(plan.len(), 2);
        assert_eq!(plan.to_value(), raw);
    }

    #[test]
    fn test_roundtrip_every_variant() {
        let plan = Plan::from_phases([
            BuildPhase::Headers,
            BuildPhase::Sources,
            BuildPhase::Resources,
            BuildPhase::Frameworks,
            BuildPhase::Files {
                destination: Destination::AbsolutePath,
                path: "/opt/tools".to_string(),
                copy_only_when_installing: false,
            },
            BuildPhase::Script {
                program_path: "/usr/bin/env bash".to_string(),
                script: "make install".to_string(),
            },
        ])
        .unwrap();

        let encoded = plan.to_value();
        let decoded = Plan::from_value(&encoded, "BuildPhases").unwrap();
        assert_eq!(decoded, plan);
    }

    #[test]
    fn test_destination_codes() {
        assert_eq!(Destination::AbsolutePath.code(), 0);
        assert_eq!(Destination::XpcServices.code(), 10);
        for code in 0..=10 {
            let dest = Destination::from_code(code).unwrap();
            assert_eq!(dest.code(), code);
        }
        assert!(Destination::from_code(11).is_none());
        assert!(Destination::from_code(-1).is_none());
    }
}
