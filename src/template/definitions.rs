//! # Definitions
//!
//! The `Definitions` section of a descriptor maps arbitrary names to
//! shape-polymorphic entries describing substitutable regions and generated
//! artifacts. The document carries no explicit type tag: which variant an
//! entry represents is inferred from which keys are present.
//!
//! ## Shape dispatch
//!
//! Variant selection is an ordered cascade; the order is a deliberate design
//! decision because the shapes overlap in their optional fields, and it must
//! not be rearranged for convenience:
//!
//! 1. **Raw** — the entry is a bare string.
//! 2. **Container** — both `Beginning` and `End` are present.
//! 3. **AssetCatalog** — both `AssetGeneration` and `Path` are present.
//! 4. **File** — `Path` is present (a `Path`-only entry falls through the
//!    asset catalog test to land here).
//! 5. **Custom** — the unconditional fallback.
//!
//! An entry presenting both the container and the asset catalog key sets is
//! rejected as [`AmbiguousDefinition`](crate::error::Error) rather than
//! resolved by precedence: neither reading is obviously right, and silently
//! picking one would change meaning without warning.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use crate::document::{self, Dict};
use crate::error::{Error, Result};
use crate::value::Key;

const KEY_BEGINNING: &str = "Beginning";
const KEY_END: &str = "End";
const KEY_INDENT: &str = "Indent";
const KEY_ORDER: &str = "SortOrder";
const KEY_SUBSTITUTE_MACROS: &str = "SubstituteMacros";
const KEY_PATH: &str = "Path";
const KEY_ASSET_GENERATION: &str = "AssetGeneration";
const KEY_BUILD_ATTRIBUTES: &str = "BuildAttributes";
const KEY_TARGETS: &str = "TargetIdentifiers";

const KEY_ASSET_NAME: &str = "Name";
const KEY_ASSET_KIND: &str = "Kind";
const KEY_ASSET_PLATFORMS: &str = "Platforms";

/// The kind of asset an asset catalog entry generates.
///
/// Open string-backed enum: unrecognized kinds are kept verbatim so they
/// round-trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetKind {
    AppIcon,
    AppIconTv,
    LaunchImage,
    Custom(String),
}

impl AssetKind {
    /// Total: every raw string maps to a kind.
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "appIcon" => AssetKind::AppIcon,
            "appIconTV" => AssetKind::AppIconTv,
            "launchImage" => AssetKind::LaunchImage,
            other => AssetKind::Custom(other.to_string()),
        }
    }

    pub fn raw(&self) -> &str {
        match self {
            AssetKind::AppIcon => "appIcon",
            AssetKind::AppIconTv => "appIconTV",
            AssetKind::LaunchImage => "launchImage",
            AssetKind::Custom(raw) => raw,
        }
    }
}

/// A platform marker attached to a generated asset: one of the four named
/// platforms, or a custom (name, value) pair kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetPlatform {
    Ios,
    Macos,
    Tvos,
    Watchos,
    Custom { name: String, value: String },
}

impl AssetPlatform {
    pub fn name(&self) -> &str {
        match self {
            AssetPlatform::Ios => "iOS",
            AssetPlatform::Macos => "macOS",
            AssetPlatform::Tvos => "tvOS",
            AssetPlatform::Watchos => "watchOS",
            AssetPlatform::Custom { name, .. } => name,
        }
    }

    /// The value stored alongside the name; named markers store an empty
    /// string.
    fn value(&self) -> &str {
        match self {
            AssetPlatform::Custom { value, .. } => value,
            _ => "",
        }
    }

    fn from_entry(name: &str, value: &str) -> Self {
        match (name, value) {
            ("iOS", "") => AssetPlatform::Ios,
            ("macOS", "") => AssetPlatform::Macos,
            ("tvOS", "") => AssetPlatform::Tvos,
            ("watchOS", "") => AssetPlatform::Watchos,
            _ => AssetPlatform::Custom {
                name: name.to_string(),
                value: value.to_string(),
            },
        }
    }
}

/// An ordered set of asset platform markers with unique names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformSet {
    platforms: Vec<AssetPlatform>,
}

impl PlatformSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the marker, rejecting a duplicate platform name.
    pub fn insert(&mut self, platform: AssetPlatform) -> bool {
        if self.contains_name(platform.name()) {
            return false;
        }
        self.platforms.push(platform);
        true
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.platforms.iter().any(|p| p.name() == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AssetPlatform> {
        self.platforms.iter()
    }

    pub fn len(&self) -> usize {
        self.platforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }
}

impl FromIterator<AssetPlatform> for PlatformSet {
    fn from_iter<T: IntoIterator<Item = AssetPlatform>>(iter: T) -> Self {
        let mut set = PlatformSet::new();
        for platform in iter {
            set.insert(platform);
        }
        set
    }
}

/// One generated asset inside an asset catalog definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Asset {
    pub name: String,
    pub kind: AssetKind,
    pub platforms: PlatformSet,
}

impl Asset {
    fn from_value(value: &Value, context: &str) -> Result<Self> {
        let dict = document::as_object(value, context)?;
        let name = document::req_str(dict, KEY_ASSET_NAME, context)?;
        let kind = AssetKind::from_raw(&document::req_str(dict, KEY_ASSET_KIND, context)?);

        let mut platforms = PlatformSet::new();
        if let Some(raw) = dict.get(KEY_ASSET_PLATFORMS) {
            let ctx = document::field(context, KEY_ASSET_PLATFORMS);
            let entries = document::as_object(raw, &ctx)?;
            for (platform_name, platform_value) in entries {
                let value = platform_value.as_str().ok_or_else(|| {
                    Error::mismatch(
                        document::field(&ctx, platform_name),
                        "string",
                        document::kind_name(platform_value),
                    )
                })?;
                // Object keys are unique, so insertion cannot collide here.
                platforms.insert(AssetPlatform::from_entry(platform_name, value));
            }
        }

        Ok(Asset {
            name,
            kind,
            platforms,
        })
    }

    fn to_value(&self) -> Value {
        let mut dict = Dict::new();
        dict.insert(KEY_ASSET_NAME.to_string(), Value::String(self.name.clone()));
        dict.insert(
            KEY_ASSET_KIND.to_string(),
            Value::String(self.kind.raw().to_string()),
        );
        if !self.platforms.is_empty() {
            let mut entries = Dict::new();
            for platform in self.platforms.iter() {
                entries.insert(
                    platform.name().to_string(),
                    Value::String(platform.value().to_string()),
                );
            }
            dict.insert(KEY_ASSET_PLATFORMS.to_string(), Value::Object(entries));
        }
        Value::Object(dict)
    }
}

/// A named, shape-polymorphic entry of the `Definitions` section.
#[derive(Debug, Clone, PartialEq)]
pub enum Definition {
    /// A bare free-text value.
    Raw(String),
    /// A substitutable region delimited by `Beginning`/`End` markers.
    Container {
        beginning: String,
        end: String,
        indent: Option<i64>,
        order: Option<i64>,
        contains_substitution_macros: bool,
    },
    /// A generated asset catalog.
    AssetCatalog {
        path: String,
        assets: Vec<Asset>,
        target_ids: Vec<String>,
        order: Option<i64>,
    },
    /// A file copied into the generated project.
    File {
        path: String,
        order: Option<i64>,
        targets: Vec<String>,
        contains_substitution_macros: bool,
    },
    /// The fallback shape capturing whatever optional fields are present.
    Custom {
        order: Option<i64>,
        targets: Vec<String>,
        end: Option<String>,
        build_attributes: Vec<String>,
    },
}

impl Definition {
    /// Decodes one named entry, inferring the variant from its shape.
    ///
    /// See the module docs for the precedence order. `name` is only used for
    /// error reporting.
    pub fn from_value(name: &str, value: &Value) -> Result<Self> {
        let context = format!("Definitions.{name}");

        // 1. Raw: a bare string, not an object.
        if let Value::String(text) = value {
            return Ok(Definition::Raw(text.clone()));
        }

        let dict = match value {
            Value::Object(dict) => dict,
            other => {
                return Err(Error::MalformedDefinition {
                    name: name.to_string(),
                    message: format!(
                        "only strings and objects are allowed, found {}",
                        document::kind_name(other)
                    ),
                });
            }
        };

        let container_shape = dict.contains_key(KEY_BEGINNING) && dict.contains_key(KEY_END);
        let asset_shape =
            dict.contains_key(KEY_ASSET_GENERATION) && dict.contains_key(KEY_PATH);

        if container_shape && asset_shape {
            return Err(Error::AmbiguousDefinition {
                name: name.to_string(),
            });
        }

        // 2. Container.
        if container_shape {
            return Ok(Definition::Container {
                beginning: document::req_str(dict, KEY_BEGINNING, &context)?,
                end: document::req_str(dict, KEY_END, &context)?,
                indent: document::opt_i64(dict, KEY_INDENT, &context)?,
                order: document::opt_i64_lenient(dict, KEY_ORDER, &context)?,
                contains_substitution_macros: document::bool_or(
                    dict,
                    KEY_SUBSTITUTE_MACROS,
                    &context,
                    false,
                )?,
            });
        }

        // 3. Asset catalog.
        if asset_shape {
            let assets_ctx = document::field(&context, KEY_ASSET_GENERATION);
            let raw_assets = document::as_array(&dict[KEY_ASSET_GENERATION], &assets_ctx)?;
            let mut assets = Vec::with_capacity(raw_assets.len());
            for (i, raw) in raw_assets.iter().enumerate() {
                assets.push(Asset::from_value(raw, &document::index(&assets_ctx, i))?);
            }
            return Ok(Definition::AssetCatalog {
                path: document::req_str(dict, KEY_PATH, &context)?,
                assets,
                target_ids: document::str_array(dict, KEY_TARGETS, &context)?,
                order: document::opt_i64_lenient(dict, KEY_ORDER, &context)?,
            });
        }

        // 4. File: a Path without asset generation.
        if dict.contains_key(KEY_PATH) {
            return Ok(Definition::File {
                path: document::req_str(dict, KEY_PATH, &context)?,
                order: document::opt_i64_lenient(dict, KEY_ORDER, &context)?,
                targets: document::str_array(dict, KEY_TARGETS, &context)?,
                contains_substitution_macros: document::bool_or(
                    dict,
                    KEY_SUBSTITUTE_MACROS,
                    &context,
                    false,
                )?,
            });
        }

        // 5. Custom: the unconditional fallback.
        Ok(Definition::Custom {
            order: document::opt_i64_lenient(dict, KEY_ORDER, &context)?,
            targets: document::str_array(dict, KEY_TARGETS, &context)?,
            end: document::opt_str(dict, KEY_END, &context)?,
            build_attributes: document::str_array(dict, KEY_BUILD_ATTRIBUTES, &context)?,
        })
    }

    /// Encodes the entry by dispatching on the active variant. Required
    /// fields are always emitted; default/empty optionals are omitted.
    pub fn to_value(&self) -> Value {
        let mut dict = Dict::new();
        match self {
            Definition::Raw(text) => return Value::String(text.clone()),
            Definition::Container {
                beginning,
                end,
                indent,
                order,
                contains_substitution_macros,
            } => {
                dict.insert(KEY_BEGINNING.to_string(), Value::String(beginning.clone()));
                dict.insert(KEY_END.to_string(), Value::String(end.clone()));
                if let Some(indent) = indent {
                    dict.insert(KEY_INDENT.to_string(), Value::from(*indent));
                }
                if let Some(order) = order {
                    dict.insert(KEY_ORDER.to_string(), Value::from(*order));
                }
                if *contains_substitution_macros {
                    dict.insert(KEY_SUBSTITUTE_MACROS.to_string(), Value::Bool(true));
                }
            }
            Definition::AssetCatalog {
                path,
                assets,
                target_ids,
                order,
            } => {
                dict.insert(KEY_PATH.to_string(), Value::String(path.clone()));
                dict.insert(
                    KEY_ASSET_GENERATION.to_string(),
                    Value::Array(assets.iter().map(Asset::to_value).collect()),
                );
                document::put_str_array(&mut dict, KEY_TARGETS, target_ids);
                if let Some(order) = order {
                    dict.insert(KEY_ORDER.to_string(), Value::from(*order));
                }
            }
            Definition::File {
                path,
                order,
                targets,
                contains_substitution_macros,
            } => {
                dict.insert(KEY_PATH.to_string(), Value::String(path.clone()));
                if let Some(order) = order {
                    dict.insert(KEY_ORDER.to_string(), Value::from(*order));
                }
                document::put_str_array(&mut dict, KEY_TARGETS, targets);
                if *contains_substitution_macros {
                    dict.insert(KEY_SUBSTITUTE_MACROS.to_string(), Value::Bool(true));
                }
            }
            Definition::Custom {
                order,
                targets,
                end,
                build_attributes,
            } => {
                if let Some(order) = order {
                    dict.insert(KEY_ORDER.to_string(), Value::from(*order));
                }
                document::put_str_array(&mut dict, KEY_TARGETS, targets);
                if let Some(end) = end {
                    dict.insert(KEY_END.to_string(), Value::String(end.clone()));
                }
                document::put_str_array(&mut dict, KEY_BUILD_ATTRIBUTES, build_attributes);
            }
        }
        Value::Object(dict)
    }

    /// A short label for the active variant.
    pub fn variant_name(&self) -> &'static str {
        match self {
            Definition::Raw(_) => "raw",
            Definition::Container { .. } => "container",
            Definition::AssetCatalog { .. } => "asset catalog",
            Definition::File { .. } => "file",
            Definition::Custom { .. } => "custom",
        }
    }
}

/// The `Definitions` mapping: definition name to shape-inferred entry.
///
/// Key uniqueness is required; insertion order carries no meaning, so
/// entries are kept (and encoded) in sorted order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Definitions {
    entries: BTreeMap<Key, Definition>,
}

impl Definitions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, name: &str) -> Option<&Definition> {
        self.entries.get(name)
    }

    /// Inserts an entry, returning the previous one under the same name.
    pub fn insert(&mut self, name: Key, definition: Definition) -> Option<Definition> {
        self.entries.insert(name, definition)
    }

    pub fn remove(&mut self, name: &str) -> Option<Definition> {
        self.entries.remove(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Key, &Definition)> {
        self.entries.iter()
    }

    /// Decodes the whole mapping. An absent mapping is represented by the
    /// caller passing nothing; this function requires an object.
    pub(crate) fn from_value(value: &Value) -> Result<Self> {
        let dict = document::as_object(value, "Definitions")?;
        let mut entries = BTreeMap::new();
        for (name, raw) in dict {
            let key = Key::at(name, "Definitions")?;
            entries.insert(key, Definition::from_value(name, raw)?);
        }
        Ok(Definitions { entries })
    }

    /// Encodes the mapping; the caller omits it entirely when empty.
    pub(crate) fn to_value(&self) -> Value {
        let mut dict = Dict::new();
        for (name, definition) in &self.entries {
            dict.insert(name.as_str().to_string(), definition.to_value());
        }
        Value::Object(dict)
    }
}

impl fmt::Display for Definitions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .entries
            .iter()
            .map(|(name, def)| format!("{name} ({})", def.variant_name()))
            .collect();
        write!(f, "[{}]", parts.join(", "))
    }
}
