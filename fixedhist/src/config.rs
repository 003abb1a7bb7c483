// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::collections::BTreeMap;
use std::path::Path;

use fixedhist_core::Escaping;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

fn default_kind() -> String {
    "histogram".to_string()
}

/// The full shape of a histogram: its name, help text, bucket limits and
/// label schema.
///
/// The JSON form uses `type` for [`kind`](HistogramConfig::kind):
///
/// ```
/// # use fixedhist::HistogramConfig;
/// let config = HistogramConfig::from_json_str(r#"{
///     "name": "latency",
///     "help": "request latency",
///     "type": "histogram",
///     "buckets": [10, 50],
///     "labels": { "method": ["GET", "POST"] }
/// }"#).unwrap();
///
/// assert_eq!(config.buckets, vec![10.0, 50.0]);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistogramConfig {
    pub name: String,
    #[serde(default)]
    pub help: String,
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    #[serde(default)]
    pub buckets: Vec<f64>,
    /// Label name to the values it may take.
    #[serde(default)]
    pub labels: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub escaping: Escaping,
}

impl HistogramConfig {
    /// A config with the given name, no buckets and no labels.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            help: String::new(),
            kind: default_kind(),
            buckets: Vec::new(),
            labels: BTreeMap::new(),
            escaping: Escaping::default(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.name.is_empty() {
            return Err(ConfigError::EmptyName);
        }

        if let Some((label, _)) = self.labels.iter().find(|(_, values)| values.is_empty()) {
            return Err(ConfigError::EmptyLabelValues {
                label: label.clone(),
            });
        }

        Ok(())
    }
}
