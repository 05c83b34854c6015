//! # Template Descriptor Model
//!
//! This module defines the strongly-typed model of an Xcode template
//! descriptor and its codec. The descriptor on disk is a loosely-typed
//! hierarchical document; decoding walks it top to bottom — scalar fields,
//! then platforms, then targets (each with settings, dependencies, and a
//! build-phase plan), then the definitions mapping — and produces an owned
//! [`Template`] value. Encoding reverses the walk, omitting fields that are
//! empty or carry their default so the output stays minimal.
//!
//! Decoding is forward-compatible at the top level: unrecognized descriptor
//! keys are ignored and never round-tripped.
//!
//! ## Submodules
//!
//! - [`definitions`]: the shape-dispatched `Definitions` mapping.
//! - [`phases`]: the ordered build-phase plan with its uniqueness rule.
//! - [`settings`]: the two-layer build-settings table.
//! - [`target`]: the target aggregate and its build record.

pub mod definitions;
pub mod phases;
pub mod settings;
pub mod target;

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::{self, Dict};
use crate::error::{Error, Result};
use definitions::Definitions;
use target::Target;

/// The file-name extension of template packages.
pub const PACKAGE_EXTENSION: &str = "xctemplate";
/// The name of the descriptor file inside a template package.
pub const DESCRIPTOR_FILE: &str = "TemplateInfo.json";

const KEY_KIND: &str = "Kind";
const KEY_IDENTIFIER: &str = "Identifier";
const KEY_ANCESTORS: &str = "Ancestors";
const KEY_CONCRETE: &str = "Concrete";
const KEY_NAME: &str = "Name";
const KEY_TITLE: &str = "Title";
const KEY_SUMMARY: &str = "Summary";
const KEY_DESCRIPTION: &str = "Description";
const KEY_ICON: &str = "Icon";
const KEY_ORDER: &str = "SortOrder";
const KEY_COMPLETION_NAME: &str = "DefaultCompletionName";
const KEY_MAIN_FILE: &str = "MainTemplateFile";
const KEY_PLATFORMS: &str = "Platforms";
const KEY_TARGETS: &str = "Targets";
const KEY_TARGET_ONLY: &str = "TargetOnly";
const KEY_ALLOWED_TYPES: &str = "AllowedTypes";
const KEY_DEFINITIONS: &str = "Definitions";

/// The type of template, as stored in the required `Kind` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    /// Project templates.
    Project,
    /// Foundation file templates (Swift, Objective-C, etc.).
    File,
    /// Asset templates (SpriteKit/SceneKit scenes, particles, tile sets).
    Asset,
    /// Playground templates.
    Playground,
    /// Core Data templates (NSManagedObject subclass).
    CoreData,
    /// Siri intent templates.
    Siri,
    /// Refactoring templates (new superclass extraction).
    Refactoring,
}

impl TemplateKind {
    const RAWS: [(TemplateKind, &'static str); 7] = [
        (TemplateKind::Project, "Xcode.Xcode3.ProjectTemplateUnitKind"),
        (TemplateKind::File, "Xcode.IDEFoundation.TextSubstitutionFileTemplateKind"),
        (TemplateKind::Asset, "Xcode.IDEKit.TextSubstitutionFileTemplateKind"),
        (
            TemplateKind::Playground,
            "Xcode.IDEFoundation.TextSubstitutionPlaygroundTemplateKind",
        ),
        (
            TemplateKind::CoreData,
            "Xcode.IDECoreDataModeler.ManagedObjectTemplateKind",
        ),
        (TemplateKind::Siri, "Xcode.IDEIntentBuilderEditor.IntentTemplateKind"),
        (
            TemplateKind::Refactoring,
            "Xcode.IDEKit.RefactoringFileTemplateKind.NewSuperclass",
        ),
    ];

    pub fn raw(&self) -> &'static str {
        Self::RAWS.iter().find(|(k, _)| k == self).unwrap().1
    }

    pub fn from_raw(raw: &str) -> Option<Self> {
        Self::RAWS.iter().find(|(_, r)| *r == raw).map(|(k, _)| *k)
    }

    /// A short human-readable label for CLI output.
    pub fn label(&self) -> &'static str {
        match self {
            TemplateKind::Project => "project",
            TemplateKind::File => "file",
            TemplateKind::Asset => "asset",
            TemplateKind::Playground => "playground",
            TemplateKind::CoreData => "core data",
            TemplateKind::Siri => "siri intent",
            TemplateKind::Refactoring => "refactoring",
        }
    }
}

/// A platform a template requires, stored as a `com.apple.platform.*`
/// identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Macos,
    Ios,
    Watchos,
    Tvos,
}

impl Platform {
    pub fn raw(&self) -> &'static str {
        match self {
            Platform::Macos => "com.apple.platform.macosx",
            Platform::Ios => "com.apple.platform.iphoneos",
            Platform::Watchos => "com.apple.platform.watchos",
            Platform::Tvos => "com.apple.platform.appletvos",
        }
    }

    pub fn from_raw(raw: &str) -> Option<Self> {
        match raw {
            "com.apple.platform.macosx" => Some(Platform::Macos),
            "com.apple.platform.iphoneos" => Some(Platform::Ios),
            "com.apple.platform.watchos" => Some(Platform::Watchos),
            // Older descriptors spell tvOS both ways; re-encoding always
            // uses the canonical appletvos identifier.
            "com.apple.platform.appletvos" | "com.apple.platform.tvos" => {
                Some(Platform::Tvos)
            }
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Platform::Macos => "macOS",
            Platform::Ios => "iOS",
            Platform::Watchos => "watchOS",
            Platform::Tvos => "tvOS",
        }
    }
}

/// A file type a template may operate on, identified by UTI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Swift,
    C,
    CHeader,
    CHeaderPrecompiled,
    Cpp,
    CppHeader,
    CppHeaderPrecompiled,
    Objc,
    Objcpp,
    SceneKitScene,
    SceneKitParticles,
    SceneKitAssetCatalog,
    SpriteKitSerialized,
    Playground,
    PlaygroundPage,
}

impl FileType {
    const RAWS: [(FileType, &'static str); 15] = [
        (FileType::Swift, "public.swift-source"),
        (FileType::C, "public.c-source"),
        (FileType::CHeader, "public.c-header"),
        (FileType::CHeaderPrecompiled, "public.precompiled-c-header"),
        (FileType::Cpp, "public.c-plus-plus-source"),
        (FileType::CppHeader, "public.c-plus-plus-header"),
        (FileType::CppHeaderPrecompiled, "public.precompiled-c-plus-plus-header"),
        (FileType::Objc, "public.objective-c-source"),
        (FileType::Objcpp, "public.objective-c-plus-plus-source"),
        (FileType::SceneKitScene, "com.apple.scenekit.scene"),
        (FileType::SceneKitParticles, "com.apple.scenekit.particlesystem"),
        (FileType::SceneKitAssetCatalog, "com.apple.scenekit.assetcatalog"),
        (FileType::SpriteKitSerialized, "com.apple.spritekit.serialized"),
        (FileType::Playground, "com.apple.dt.playground"),
        (FileType::PlaygroundPage, "com.apple.dt.playgroundpage"),
    ];

    pub fn raw(&self) -> &'static str {
        Self::RAWS.iter().find(|(t, _)| t == self).unwrap().1
    }

    pub fn from_raw(raw: &str) -> Option<Self> {
        Self::RAWS.iter().find(|(_, r)| *r == raw).map(|(t, _)| *t)
    }
}

/// A fully decoded template descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub kind: TemplateKind,
    /// Unique identifier, used when other templates subclass this one.
    pub identifier: Option<String>,
    /// Identifiers of the templates this one inherits from.
    pub ancestors: Vec<String>,
    /// Whether the template exists only for subclassing and is hidden from
    /// the chooser. The document stores the negation as `Concrete`,
    /// defaulting to abstract for templates.
    pub is_abstract: bool,
    /// Name shown in the template browser.
    pub name: Option<String>,
    pub title: Option<String>,
    /// A short description of the template.
    pub summary: Option<String>,
    /// A lengthy description of what the template does.
    pub description: Option<String>,
    /// Base name of the icon files shipped next to the descriptor.
    pub icon: Option<String>,
    /// Overrides the alphabetical ordering in the template chooser.
    pub order: Option<i64>,
    /// Default name offered in the save panel.
    pub completion_name: Option<String>,
    /// Name of the main file generated by the template.
    pub main_file_name: Option<String>,
    pub platforms: Vec<Platform>,
    pub targets: Vec<Target>,
    pub is_target_only: bool,
    pub supported_file_types: Vec<FileType>,
    pub definitions: Definitions,
}

impl Template {
    /// A minimal abstract template of the given kind.
    pub fn new(kind: TemplateKind) -> Self {
        Template {
            kind,
            identifier: None,
            ancestors: Vec::new(),
            is_abstract: true,
            name: None,
            title: None,
            summary: None,
            description: None,
            icon: None,
            order: None,
            completion_name: None,
            main_file_name: None,
            platforms: Vec::new(),
            targets: Vec::new(),
            is_target_only: false,
            supported_file_types: Vec::new(),
            definitions: Definitions::new(),
        }
    }

    /// Decodes a descriptor from its raw document form.
    pub fn from_value(value: &Value) -> Result<Self> {
        let dict = document::as_object(value, "template")?;

        let kind_raw = document::req_str(dict, KEY_KIND, "")?;
        let kind = TemplateKind::from_raw(&kind_raw).ok_or_else(|| {
            Error::mismatch(KEY_KIND, "a known template kind", format!("{kind_raw:?}"))
        })?;

        // Templates default to abstract; the document stores the negation.
        let concrete = document::bool_or(dict, KEY_CONCRETE, "", false)?;

        let mut platforms = Vec::new();
        for (i, raw) in document::str_array(dict, KEY_PLATFORMS, "")?.iter().enumerate() {
            platforms.push(Platform::from_raw(raw).ok_or_else(|| {
                Error::mismatch(
                    document::index(KEY_PLATFORMS, i),
                    "a com.apple.platform.* identifier",
                    format!("{raw:?}"),
                )
            })?);
        }

        let mut targets = Vec::new();
        if let Some(raw) = dict.get(KEY_TARGETS) {
            for (i, item) in document::as_array(raw, KEY_TARGETS)?.iter().enumerate() {
                targets.push(Target::from_value(item, &document::index(KEY_TARGETS, i))?);
            }
        }

        let mut supported_file_types = Vec::new();
        for (i, raw) in document::str_array(dict, KEY_ALLOWED_TYPES, "")?.iter().enumerate() {
            supported_file_types.push(FileType::from_raw(raw).ok_or_else(|| {
                Error::mismatch(
                    document::index(KEY_ALLOWED_TYPES, i),
                    "a known file type UTI",
                    format!("{raw:?}"),
                )
            })?);
        }

        let definitions = match dict.get(KEY_DEFINITIONS) {
            Some(raw) => Definitions::from_value(raw)?,
            None => Definitions::new(),
        };

        Ok(Template {
            kind,
            identifier: document::opt_str(dict, KEY_IDENTIFIER, "")?,
            ancestors: document::str_array(dict, KEY_ANCESTORS, "")?,
            is_abstract: !concrete,
            name: document::opt_str(dict, KEY_NAME, "")?,
            title: document::opt_str(dict, KEY_TITLE, "")?,
            summary: document::opt_str(dict, KEY_SUMMARY, "")?,
            description: document::opt_str(dict, KEY_DESCRIPTION, "")?,
            icon: document::opt_str(dict, KEY_ICON, "")?,
            order: document::opt_i64_lenient(dict, KEY_ORDER, "")?,
            completion_name: document::opt_str(dict, KEY_COMPLETION_NAME, "")?,
            main_file_name: document::opt_str(dict, KEY_MAIN_FILE, "")?,
            platforms,
            targets,
            is_target_only: document::bool_or(dict, KEY_TARGET_ONLY, "", false)?,
            supported_file_types,
            definitions,
        })
    }

    /// Encodes the descriptor back into its raw document form, omitting
    /// empty and defaulted fields. `Kind` is always emitted.
    pub fn to_value(&self) -> Value {
        let mut dict = Dict::new();
        dict.insert(
            KEY_KIND.to_string(),
            Value::String(self.kind.raw().to_string()),
        );
        if let Some(identifier) = &self.identifier {
            dict.insert(KEY_IDENTIFIER.to_string(), Value::String(identifier.clone()));
        }
        document::put_str_array(&mut dict, KEY_ANCESTORS, &self.ancestors);
        if !self.is_abstract {
            dict.insert(KEY_CONCRETE.to_string(), Value::Bool(true));
        }
        for (key, field) in [
            (KEY_NAME, &self.name),
            (KEY_TITLE, &self.title),
            (KEY_SUMMARY, &self.summary),
            (KEY_DESCRIPTION, &self.description),
            (KEY_ICON, &self.icon),
        ] {
            if let Some(text) = field {
                dict.insert(key.to_string(), Value::String(text.clone()));
            }
        }
        if let Some(order) = self.order {
            dict.insert(KEY_ORDER.to_string(), Value::from(order));
        }
        if !self.platforms.is_empty() {
            dict.insert(
                KEY_PLATFORMS.to_string(),
                Value::Array(
                    self.platforms
                        .iter()
                        .map(|p| Value::String(p.raw().to_string()))
                        .collect(),
                ),
            );
        }
        if !self.targets.is_empty() {
            dict.insert(
                KEY_TARGETS.to_string(),
                Value::Array(self.targets.iter().map(Target::to_value).collect()),
            );
        }
        if self.is_target_only {
            dict.insert(KEY_TARGET_ONLY.to_string(), Value::Bool(true));
        }
        if let Some(name) = &self.completion_name {
            dict.insert(KEY_COMPLETION_NAME.to_string(), Value::String(name.clone()));
        }
        if let Some(name) = &self.main_file_name {
            dict.insert(KEY_MAIN_FILE.to_string(), Value::String(name.clone()));
        }
        if !self.supported_file_types.is_empty() {
            dict.insert(
                KEY_ALLOWED_TYPES.to_string(),
                Value::Array(
                    self.supported_file_types
                        .iter()
                        .map(|t| Value::String(t.raw().to_string()))
                        .collect(),
                ),
            );
        }
        if !self.definitions.is_empty() {
            dict.insert(KEY_DEFINITIONS.to_string(), self.definitions.to_value());
        }
        Value::Object(dict)
    }

    /// Decodes a descriptor from a byte buffer holding its serialized form.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(bytes)?;
        Self::from_value(&value)
    }

    /// Encodes the descriptor into a pretty-printed byte buffer.
    pub fn to_vec(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(&self.to_value())?)
    }
}

// The serde seam: `Template` serializes through its raw document form, so
// any self-describing serde format with the same data model can carry it.
impl Serialize for Template {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Template {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Template::from_value(&value).map_err(serde::de::Error::custom)
    }
}
