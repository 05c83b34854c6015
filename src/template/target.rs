//! # Targets
//!
//! A project template creates one or more targets. Each target object in the
//! descriptor mixes the target's own identity fields with its build record —
//! settings, dependencies, phases, and an optional external build tool — at
//! the same nesting level, so [`Build`] decodes from (and encodes into) the
//! same raw object as [`Target`].
//!
//! One inversion rule lives here: the document stores a `Concrete` flag, the
//! model stores its negation `is_abstract`. Targets default to concrete
//! (omitted `Concrete` means `is_abstract == false`); note this is the
//! opposite default from the template aggregate. Both defaults are computed
//! once at decode time so the decode and fresh-construction paths cannot
//! diverge.

use serde_json::Value;

use crate::document::{self, Dict};
use crate::error::{Error, Result};
use crate::template::phases::Plan;
use crate::template::settings::Settings;

const KEY_IDENTIFIER: &str = "TargetIdentifier";
const KEY_NAME: &str = "Name";
const KEY_TYPE: &str = "TargetType";
const KEY_CONCRETE: &str = "Concrete";
const KEY_PRODUCT_TYPE: &str = "ProductType";
const KEY_TARGET_TO_TEST: &str = "TargetIdentifierToBeTested";

const KEY_PHASES: &str = "BuildPhases";
const KEY_TOOL_PATH: &str = "BuildToolPath";
const KEY_TOOL_ARGS: &str = "BuildToolArgsString";

const KEY_INJECTIONS: &str = "ProductBuildPhaseInjections";
const KEY_INJECTION_TARGET: &str = "TargetIdentifier";
const KEY_FRAMEWORKS: &str = "Frameworks";

/// The type of target being described.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TargetKind {
    #[default]
    Regular,
    Aggregate,
    Legacy,
}

impl TargetKind {
    pub fn raw(&self) -> &'static str {
        match self {
            TargetKind::Regular => "regular",
            TargetKind::Aggregate => "Aggregate",
            TargetKind::Legacy => "Legacy",
        }
    }

    fn from_raw(raw: &str) -> Option<Self> {
        match raw {
            "regular" => Some(TargetKind::Regular),
            "Aggregate" => Some(TargetKind::Aggregate),
            "Legacy" => Some(TargetKind::Legacy),
            _ => None,
        }
    }
}

/// The type of product a target builds, identified by reverse-DNS raws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductType {
    App,
    AppExtension,
    AppWatch,
    WatchKitExtension,
    Bundle,
    BundleUiTesting,
    BundleUnitTest,
    Framework,
    InAppPurchase,
    InstrumentsPackage,
    KernelExtension,
    MetalLibrary,
    Tool,
    XcodeExtension,
    XpcService,
}

impl ProductType {
    const RAWS: [(ProductType, &'static str); 15] = [
        (ProductType::App, "com.apple.product-type.application"),
        (ProductType::AppExtension, "com.apple.product-type.app-extension"),
        (ProductType::AppWatch, "com.apple.product-type.application.watchapp2"),
        (ProductType::WatchKitExtension, "com.apple.product-type.watchkit2-extension"),
        (ProductType::Bundle, "com.apple.product-type.bundle"),
        (ProductType::BundleUiTesting, "com.apple.product-type.bundle.ui-testing"),
        (ProductType::BundleUnitTest, "com.apple.product-type.bundle.unit-test"),
        (ProductType::Framework, "com.apple.product-type.framework"),
        (ProductType::InAppPurchase, "com.apple.product-type.in-app-purchase-content"),
        (ProductType::InstrumentsPackage, "com.apple.product-type.instruments-package"),
        (ProductType::KernelExtension, "com.apple.product-type.kernel-extension"),
        (ProductType::MetalLibrary, "com.apple.product-type.metal-library"),
        (ProductType::Tool, "com.apple.product-type.tool"),
        (ProductType::XcodeExtension, "com.apple.product-type.xcode-extension"),
        (ProductType::XpcService, "com.apple.product-type.xpc-service"),
    ];

    pub fn raw(&self) -> &'static str {
        Self::RAWS.iter().find(|(p, _)| p == self).unwrap().1
    }

    pub fn from_raw(raw: &str) -> Option<Self> {
        Self::RAWS.iter().find(|(_, r)| *r == raw).map(|(p, _)| *p)
    }
}

/// An external tool used to build a legacy target.
#[derive(Debug, Clone, PartialEq)]
pub struct Tool {
    /// The path of the build tool.
    pub path: String,
    /// The argument string passed to the build tool.
    pub args: Option<String>,
}

/// Build dependencies of a target.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dependencies {
    /// Target identifiers injected into this target's product build phase.
    pub targets: Vec<String>,
    /// Framework names the target links against (e.g. `Cocoa`, `Photos`).
    pub frameworks: Vec<String>,
}

impl Dependencies {
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty() && self.frameworks.is_empty()
    }

    fn from_dict(dict: &Dict, context: &str) -> Result<Self> {
        let mut targets = Vec::new();
        if let Some(raw) = dict.get(KEY_INJECTIONS) {
            let ctx = document::field(context, KEY_INJECTIONS);
            for (i, item) in document::as_array(raw, &ctx)?.iter().enumerate() {
                let item_ctx = document::index(&ctx, i);
                let entry = document::as_object(item, &item_ctx)?;
                targets.push(document::req_str(entry, KEY_INJECTION_TARGET, &item_ctx)?);
            }
        }

        Ok(Dependencies {
            targets,
            frameworks: document::str_array(dict, KEY_FRAMEWORKS, context)?,
        })
    }

    fn encode_into(&self, dict: &mut Dict) {
        if !self.targets.is_empty() {
            let injections: Vec<Value> = self
                .targets
                .iter()
                .map(|id| {
                    let mut entry = Dict::new();
                    entry.insert(
                        KEY_INJECTION_TARGET.to_string(),
                        Value::String(id.clone()),
                    );
                    Value::Object(entry)
                })
                .collect();
            dict.insert(KEY_INJECTIONS.to_string(), Value::Array(injections));
        }
        document::put_str_array(dict, KEY_FRAMEWORKS, &self.frameworks);
    }
}

/// Build properties of a target: settings, dependencies, phases, tool.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Build {
    pub settings: Settings,
    pub dependencies: Dependencies,
    pub phases: Plan,
    pub tool: Option<Tool>,
}

impl Build {
    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
            && self.dependencies.is_empty()
            && self.phases.is_empty()
            && self.tool.is_none()
    }

    fn from_dict(dict: &Dict, context: &str) -> Result<Self> {
        let settings = Settings::from_dict(dict, context)?;
        let dependencies = Dependencies::from_dict(dict, context)?;

        let phases = match dict.get(KEY_PHASES) {
            Some(raw) => Plan::from_value(raw, &document::field(context, KEY_PHASES))?,
            None => Plan::new(),
        };

        let tool = match document::opt_str(dict, KEY_TOOL_PATH, context)? {
            Some(path) => Some(Tool {
                path,
                args: document::opt_str(dict, KEY_TOOL_ARGS, context)?,
            }),
            None => None,
        };

        Ok(Build {
            settings,
            dependencies,
            phases,
            tool,
        })
    }

    fn encode_into(&self, dict: &mut Dict) {
        if self.is_empty() {
            return;
        }
        self.settings.encode_into(dict);
        self.dependencies.encode_into(dict);
        if let Some(tool) = &self.tool {
            dict.insert(KEY_TOOL_PATH.to_string(), Value::String(tool.path.clone()));
            if let Some(args) = &tool.args {
                dict.insert(KEY_TOOL_ARGS.to_string(), Value::String(args.clone()));
            }
        }
        if !self.phases.is_empty() {
            dict.insert(KEY_PHASES.to_string(), self.phases.to_value());
        }
    }
}

/// One target created by a template.
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    /// Reverse-DNS identifier for the target.
    pub identifier: Option<String>,
    /// The name displayed in the project navigator.
    pub name: Option<String>,
    pub kind: TargetKind,
    /// Whether the target only serves as a base for other targets.
    pub is_abstract: bool,
    pub product_type: Option<ProductType>,
    /// For testing targets, the identifier of the target under test.
    pub target_id_under_test: Option<String>,
    pub build: Build,
}

impl Target {
    /// A concrete, regular target with the given identifier and product.
    pub fn new(identifier: Option<String>, product_type: Option<ProductType>) -> Self {
        Target {
            identifier,
            name: None,
            kind: TargetKind::Regular,
            is_abstract: false,
            product_type,
            target_id_under_test: None,
            build: Build::default(),
        }
    }

    pub(crate) fn from_value(value: &Value, context: &str) -> Result<Self> {
        let dict = document::as_object(value, context)?;

        let kind = match document::opt_str(dict, KEY_TYPE, context)? {
            Some(raw) => TargetKind::from_raw(&raw).ok_or_else(|| {
                Error::mismatch(
                    document::field(context, KEY_TYPE),
                    "one of regular/Aggregate/Legacy",
                    format!("{raw:?}"),
                )
            })?,
            None => TargetKind::default(),
        };

        let product_type = match document::opt_str(dict, KEY_PRODUCT_TYPE, context)? {
            Some(raw) => Some(ProductType::from_raw(&raw).ok_or_else(|| {
                Error::mismatch(
                    document::field(context, KEY_PRODUCT_TYPE),
                    "a com.apple.product-type.* identifier",
                    format!("{raw:?}"),
                )
            })?),
            None => None,
        };

        // Targets default to concrete; the model stores the negation.
        let concrete = document::bool_or(dict, KEY_CONCRETE, context, true)?;

        Ok(Target {
            identifier: document::opt_str(dict, KEY_IDENTIFIER, context)?,
            name: document::opt_str(dict, KEY_NAME, context)?,
            kind,
            is_abstract: !concrete,
            product_type,
            target_id_under_test: document::opt_str(dict, KEY_TARGET_TO_TEST, context)?,
            build: Build::from_dict(dict, context)?,
        })
    }

    pub(crate) fn to_value(&self) -> Value {
        let mut dict = Dict::new();
        if let Some(identifier) = &self.identifier {
            dict.insert(KEY_IDENTIFIER.to_string(), Value::String(identifier.clone()));
        }
        if let Some(name) = &self.name {
            dict.insert(KEY_NAME.to_string(), Value::String(name.clone()));
        }
        if self.kind != TargetKind::Regular {
            dict.insert(
                KEY_TYPE.to_string(),
                Value::String(self.kind.raw().to_string()),
            );
        }
        if self.is_abstract {
            dict.insert(KEY_CONCRETE.to_string(), Value::Bool(false));
        }
        if let Some(product_type) = self.product_type {
            dict.insert(
                KEY_PRODUCT_TYPE.to_string(),
                Value::String(product_type.raw().to_string()),
            );
        }
        if let Some(id) = &self.target_id_under_test {
            dict.insert(KEY_TARGET_TO_TEST.to_string(), Value::String(id.clone()));
        }
        self.build.encode_into(&mut dict);
        Value::Object(dict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::phases::{BuildPhase, PhaseKind};
    use crate::value::ScalarValue;
    use serde_json::json;

    #[test]
    fn test_target_defaults() {
        let target = Target::from_value(&json!({}), "Targets[0]").unwrap();
        assert_eq!(target.kind, TargetKind::Regular);
        // Omitted Concrete means concrete for targets.
        assert!(!target.is_abstract);
        assert!(target.build.is_empty());
        assert_eq!(target.identifier, None);
        assert_eq!(target.product_type, None);
    }

    #[test]
    fn test_concrete_inversion() {
        let target =
            Target::from_value(&json!({ "Concrete": false }), "Targets[0]").unwrap();
        assert!(target.is_abstract);

        // Abstract targets emit Concrete:false, concrete ones omit it.
        assert_eq!(target.to_value(), json!({ "Concrete": false }));
        assert_eq!(Target::new(None, None).to_value(), json!({}));
    }

    #[test]
    fn test_full_target_decode() {
        let raw = json!({
            "TargetIdentifier": "com.example.app",
            "Name": "App",
            "TargetType": "Aggregate",
            "ProductType": "com.apple.product-type.application",
            "TargetIdentifierToBeTested": "com.example.core",
            "SharedSettings": { "PRODUCT_NAME": "App" },
            "ProductBuildPhaseInjections": [
                { "TargetIdentifier": "com.example.core" }
            ],
            "Frameworks": ["Cocoa", "Photos"],
            "BuildPhases": [
                { "Class": "Sources" },
                { "Class": "Frameworks" }
            ],
            "BuildToolPath": "/usr/bin/make",
            "BuildToolArgsString": "-j4"
        });
        let target = Target::from_value(&raw, "Targets[0]").unwrap();

        assert_eq!(target.identifier.as_deref(), Some("com.example.app"));
        assert_eq!(target.kind, TargetKind::Aggregate);
        assert_eq!(target.product_type, Some(ProductType::App));
        assert_eq!(
            target.build.settings.get(None, "PRODUCT_NAME"),
            Some(&ScalarValue::String("App".to_string()))
        );
        assert_eq!(target.build.dependencies.targets, vec!["com.example.core"]);
        assert_eq!(target.build.dependencies.frameworks, vec!["Cocoa", "Photos"]);
        assert_eq!(target.build.phases.len(), 2);
        assert!(target.build.phases.contains_kind(PhaseKind::Sources));
        assert_eq!(
            target.build.tool,
            Some(Tool {
                path: "/usr/bin/make".to_string(),
                args: Some("-j4".to_string()),
            })
        );

        let decoded = Target::from_value(&target.to_value(), "Targets[0]").unwrap();
        assert_eq!(decoded, target);
    }

    #[test]
    fn test_unknown_kind_and_product_type() {
        let err = Target::from_value(&json!({ "TargetType": "Fancy" }), "t").unwrap_err();
        assert!(err.to_string().contains("TargetType"));

        let err =
            Target::from_value(&json!({ "ProductType": "com.example.unknown" }), "t")
                .unwrap_err();
        assert!(err.to_string().contains("ProductType"));
    }

    #[test]
    fn test_product_type_raws_roundtrip() {
        for (product, raw) in ProductType::RAWS {
            assert_eq!(ProductType::from_raw(raw), Some(product));
            assert_eq!(product.raw(), raw);
        }
        assert_eq!(ProductType::from_raw("com.apple.product-type.nope"), None);
    }

    #[test]
    fn test_dependencies_encode_omits_empty() {
        let mut dict = Dict::new();
        Dependencies::default().encode_into(&mut dict);
        assert!(dict.is_empty());

        let deps = Dependencies {
            targets: vec!["a".to_string()],
            frameworks: Vec::new(),
        };
        let mut dict = Dict::new();
        deps.encode_into(&mut dict);
        assert_eq!(
            dict.get("ProductBuildPhaseInjections"),
            Some(&json!([{ "TargetIdentifier": "a" }]))
        );
        assert!(!dict.contains_key("Frameworks"));
    }

    #[test]
    fn test_build_roundtrip_with_phases() {
        let mut build = Build::default();
        build.phases.append(BuildPhase::Sources);
        build.phases.append(BuildPhase::script("echo done"));
        build
            .settings
            .set(None, "SWIFT_VERSION", Some(ScalarValue::Int(5)));

        let mut dict = Dict::new();
        build.encode_into(&mut dict);
        let decoded = Build::from_dict(&dict, "t").unwrap();
        assert_eq!(decoded, build);
    }
}
