//! # Build Settings
//!
//! A target's build settings form a two-level table: a `SharedSettings` map
//! applying to every build configuration, plus a `Configurations` map keyed
//! by configuration name with per-configuration overrides.
//!
//! Lookups never merge the two layers — asking for a configuration's value
//! returns only that configuration's override layer, and callers wanting the
//! effective value must consult the shared layer themselves. This mirrors
//! what the descriptor stores rather than what a build system would compute.
//!
//! The table holds no empty configuration layers: removing the last key of a
//! configuration removes the configuration entry entirely.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::document::{self, Dict};
use crate::error::{Error, Result};
use crate::value::{Key, ScalarValue};

const KEY_SHARED: &str = "SharedSettings";
const KEY_CONFIGURATIONS: &str = "Configurations";

/// A named build configuration.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Configuration {
    Debug,
    Release,
    /// Any other non-empty configuration name.
    Custom(String),
}

impl Configuration {
    /// Parses a configuration name; only the empty string is invalid.
    pub fn parse(raw: &str) -> Result<Self> {
        Self::parse_at(raw, "configuration parsing")
    }

    /// Same validation as [`Configuration::parse`], but reports the document
    /// location on failure. Used by decoders.
    pub(crate) fn parse_at(raw: &str, context: &str) -> Result<Self> {
        match raw {
            "Debug" => Ok(Configuration::Debug),
            "Release" => Ok(Configuration::Release),
            "" => Err(Error::InvalidConfigurationName {
                context: context.to_string(),
            }),
            other => Ok(Configuration::Custom(other.to_string())),
        }
    }

    /// The name stored in the descriptor.
    pub fn name(&self) -> &str {
        match self {
            Configuration::Debug => "Debug",
            Configuration::Release => "Release",
            Configuration::Custom(name) => name,
        }
    }
}

/// One settings layer: setting name to scalar value.
pub type SettingsLayer = BTreeMap<String, ScalarValue>;

/// Build settings and configurations for one target.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    /// Settings shared among all configurations.
    shared: SettingsLayer,
    /// Per-configuration override layers. Never holds an empty layer.
    configurations: BTreeMap<Configuration, SettingsLayer>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any configuration or setting is defined.
    pub fn is_empty(&self) -> bool {
        self.shared.is_empty() && self.configurations.is_empty()
    }

    /// The settings of one layer: `None` selects the shared layer, a
    /// configuration selects that configuration's override layer (which may
    /// be absent).
    pub fn layer(&self, configuration: Option<&Configuration>) -> Option<&SettingsLayer> {
        match configuration {
            None => Some(&self.shared),
            Some(config) => self.configurations.get(config),
        }
    }

    /// A single setting value from one layer. No merge happens between the
    /// shared layer and a configuration layer.
    pub fn get(&self, configuration: Option<&Configuration>, key: &str) -> Option<&ScalarValue> {
        self.layer(configuration)?.get(key)
    }

    /// Sets or removes one setting in one layer.
    ///
    /// `Some(value)` stores the value; `None` removes the key. A
    /// configuration layer that becomes empty is dropped from the table
    /// entirely.
    pub fn set(
        &mut self,
        configuration: Option<&Configuration>,
        key: impl Into<String>,
        value: Option<ScalarValue>,
    ) {
        let key = key.into();
        match configuration {
            None => match value {
                Some(v) => {
                    self.shared.insert(key, v);
                }
                None => {
                    self.shared.remove(&key);
                }
            },
            Some(config) => match value {
                Some(v) => {
                    self.configurations
                        .entry(config.clone())
                        .or_default()
                        .insert(key, v);
                }
                None => {
                    if let Some(layer) = self.configurations.get_mut(config) {
                        layer.remove(&key);
                        if layer.is_empty() {
                            self.configurations.remove(config);
                        }
                    }
                }
            },
        }
    }

    /// The configurations that carry override layers.
    pub fn configurations(&self) -> impl Iterator<Item = &Configuration> {
        self.configurations.keys()
    }

    fn decode_layer(value: &Value, context: &str) -> Result<SettingsLayer> {
        let dict = document::as_object(value, context)?;
        let mut layer = SettingsLayer::new();
        for (name, raw) in dict {
            // Setting names are dynamic keys and must be non-empty.
            let key = Key::at(name, context)?;
            let ctx = document::field(context, name);
            layer.insert(key.as_str().to_string(), ScalarValue::from_value(raw, &ctx)?);
        }
        Ok(layer)
    }

    fn encode_layer(layer: &SettingsLayer) -> Value {
        let mut dict = Dict::new();
        for (name, value) in layer {
            dict.insert(name.clone(), value.to_value());
        }
        Value::Object(dict)
    }

    /// Decodes the settings embedded in a target object.
    ///
    /// Both layers are optional. A configuration key must be a recognized
    /// configuration name (empty names fail); an empty configuration layer
    /// in the document is dropped rather than stored.
    pub(crate) fn from_dict(dict: &Dict, context: &str) -> Result<Self> {
        let mut settings = Settings::new();

        if let Some(raw) = dict.get(KEY_SHARED) {
            settings.shared = Self::decode_layer(raw, &document::field(context, KEY_SHARED))?;
        }

        if let Some(raw) = dict.get(KEY_CONFIGURATIONS) {
            let ctx = document::field(context, KEY_CONFIGURATIONS);
            let configs = document::as_object(raw, &ctx)?;
            for (name, layer_raw) in configs {
                let configuration = Configuration::parse_at(name, &ctx)?;
                let layer = Self::decode_layer(layer_raw, &document::field(&ctx, name))?;
                if !layer.is_empty() {
                    settings.configurations.insert(configuration, layer);
                }
            }
        }

        Ok(settings)
    }

    /// Encodes the settings into a target object, omitting empty layers
    /// entirely.
    pub(crate) fn encode_into(&self, dict: &mut Dict) {
        if !self.shared.is_empty() {
            dict.insert(KEY_SHARED.to_string(), Self::encode_layer(&self.shared));
        }

        if self.configurations.is_empty() {
            return;
        }
        let mut configs = Dict::new();
        for (configuration, layer) in &self.configurations {
            // Invariant: stored layers are never empty, so every encoded
            // per-configuration sub-object is non-empty.
            configs.insert(
                configuration.name().to_string(),
                Self::encode_layer(layer),
            );
        }
        dict.insert(KEY_CONFIGURATIONS.to_string(), Value::Object(configs));
    }
}
