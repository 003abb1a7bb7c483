// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use fixedhist_core::LayoutError;
use thiserror::Error;

/// Errors that prevent a histogram from being constructed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("histogram name is empty")]
    EmptyName,

    /// The label would expand to zero permutations.
    #[error("label `{label}` has no allowed values")]
    EmptyLabelValues { label: String },

    #[error("invalid buckets: {0}")]
    Layout(#[from] LayoutError),

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
}
