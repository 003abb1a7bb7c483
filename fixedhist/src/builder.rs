// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use fixedhist_core::{DiagnosticSink, Escaping, TracingSink};

use crate::{ConfigError, Histogram, HistogramConfig};

/// Builder for creating a [`Histogram`].
///
/// This is a convenience over filling in a [`HistogramConfig`] by hand. The
/// diagnostic sink defaults to [`TracingSink`].
pub struct HistogramBuilder {
    config: HistogramConfig,
    sink: Box<dyn DiagnosticSink>,
}

impl HistogramBuilder {
    /// Create a new builder, starting with the histogram name.
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_config(HistogramConfig::new(name))
    }

    /// Start from an existing config, e.g. one loaded from a file.
    pub fn from_config(config: HistogramConfig) -> Self {
        Self {
            config,
            sink: Box::new(TracingSink),
        }
    }

    /// Add a description of this histogram.
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.config.help = help.into();
        self
    }

    /// Override the type written on the `# TYPE` line.
    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.config.kind = kind.into();
        self
    }

    /// Append bucket limits. Order does not matter.
    pub fn buckets(mut self, limits: impl IntoIterator<Item = f64>) -> Self {
        self.config.buckets.extend(limits);
        self
    }

    /// Declare a label and every value it may take.
    ///
    /// Declaring the same label again replaces its values.
    pub fn label<V>(mut self, name: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self
    where
        V: Into<String>,
    {
        self.config
            .labels
            .insert(name.into(), values.into_iter().map(Into::into).collect());
        self
    }

    pub fn escaping(mut self, escaping: Escaping) -> Self {
        self.config.escaping = escaping;
        self
    }

    /// Send rejection diagnostics to `sink` instead of `tracing`.
    pub fn diagnostics(mut self, sink: impl DiagnosticSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    pub fn build(self) -> Result<Histogram, ConfigError> {
        Histogram::from_parts(self.config, self.sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_replaces_values() {
        let histogram = HistogramBuilder::new("m")
            .label("method", ["GET"])
            .label("method", ["PUT", "POST"])
            .build()
            .unwrap();

        assert_eq!(histogram.len(), 2);
    }

    #[test]
    fn buckets_accumulate() {
        let histogram = HistogramBuilder::new("m")
            .buckets([5.0])
            .buckets([1.0, 5.0])
            .build()
            .unwrap();

        assert_eq!(histogram.buckets().len(), 2);
    }

    #[test]
    fn nan_bucket_fails() {
        let err = HistogramBuilder::new("m")
            .buckets([f64::NAN])
            .build()
            .unwrap_err();

        assert!(matches!(err, ConfigError::Layout(_)));
    }

    #[test]
    fn from_config() {
        let mut config = HistogramConfig::new("m");
        config.help = "from file".into();

        let histogram = HistogramBuilder::from_config(config)
            .kind("untyped")
            .build()
            .unwrap();

        assert_eq!(histogram.help(), "from file");
        assert_eq!(histogram.kind(), "untyped");
    }
}
