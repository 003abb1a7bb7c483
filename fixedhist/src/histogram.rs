// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::collections::HashMap;
use std::fmt;

use fixedhist_core::text::{write_header, write_series};
use fixedhist_core::*;

// We use parking_lot here since it avoids lock poisoning
use parking_lot::Mutex;

use crate::{ConfigError, HistogramBuilder, HistogramConfig};

/// One batch of observations for a single label combination.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Event {
    labels: LabelSet,
    observations: Vec<f64>,
}

impl Event {
    pub fn new(labels: LabelSet, observations: impl IntoIterator<Item = f64>) -> Self {
        Self {
            labels,
            observations: observations.into_iter().collect(),
        }
    }

    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    pub fn observations(&self) -> &[f64] {
        &self.observations
    }
}

/// The outcome of [`Histogram::record`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Recorded {
    /// The event matched a declared series; holds the number of
    /// observations folded in.
    Accepted(usize),
    /// The event's labels were not declared and it was discarded.
    Rejected,
}

struct Series {
    labels: LabelSet,
    key: PermutationKey,
    aggregate: Mutex<Aggregate>,
}

/// A fixed-bucket histogram over a closed label space.
///
/// Every legal label combination is expanded when the histogram is built
/// and gets its own zeroed series. Recording against a combination that was
/// not declared discards the observations and emits a
/// [`Diagnostic::Rejected`] on the histogram's [`DiagnosticSink`]; it is
/// never an error for the caller.
///
/// # Example
/// ```
/// # use fixedhist::*;
/// let histogram = Histogram::builder("latency")
///     .help("h")
///     .buckets([10.0, 50.0])
///     .label("method", ["GET", "POST"])
///     .build()
///     .unwrap();
///
/// let get = LabelSet::new().with("method", "GET");
/// histogram.record(&Event::new(get.clone(), [5.0, 20.0]));
///
/// let aggregate = histogram.aggregate(&get).unwrap();
/// assert_eq!(aggregate.bucket(10.0), Some(1));
/// assert_eq!(aggregate.bucket(50.0), Some(2));
/// assert_eq!(aggregate.count(), 2);
/// ```
pub struct Histogram {
    name: String,
    help: String,
    kind: String,
    escaping: Escaping,
    layout: Buckets,
    series: Vec<Series>,
    index: HashMap<LabelSet, usize>,
    sink: Box<dyn DiagnosticSink>,
}

impl Histogram {
    /// Build a histogram that logs rejected events through `tracing`.
    pub fn new(config: HistogramConfig) -> Result<Self, ConfigError> {
        Self::with_sink(config, TracingSink)
    }

    /// Build a histogram that sends diagnostics to `sink`.
    pub fn with_sink(
        config: HistogramConfig,
        sink: impl DiagnosticSink + 'static,
    ) -> Result<Self, ConfigError> {
        Self::from_parts(config, Box::new(sink))
    }

    /// Start building a histogram with the given name.
    pub fn builder(name: impl Into<String>) -> HistogramBuilder {
        HistogramBuilder::new(name)
    }

    pub(crate) fn from_parts(
        config: HistogramConfig,
        sink: Box<dyn DiagnosticSink>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let layout = Buckets::new(config.buckets)?;

        let series: Vec<Series> = label_permutations(&config.labels)
            .into_iter()
            .map(|labels| Series {
                key: labels.flatten(),
                aggregate: Mutex::new(Aggregate::new(&layout)),
                labels,
            })
            .collect();

        let index: HashMap<_, _> = series
            .iter()
            .enumerate()
            .map(|(i, series)| (series.labels.clone(), i))
            .collect();

        tracing::debug!(
            metric = %config.name,
            series = series.len(),
            buckets = layout.len(),
            "registered histogram"
        );

        Ok(Self {
            name: config.name,
            help: config.help,
            kind: config.kind,
            escaping: config.escaping,
            layout,
            series,
            index,
            sink,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    /// The metric type written on the `# TYPE` line.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn buckets(&self) -> &Buckets {
        &self.layout
    }

    /// The number of declared label combinations.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// The declared label combinations in render order.
    pub fn keys(&self) -> impl Iterator<Item = &PermutationKey> {
        self.series.iter().map(|series| &series.key)
    }

    /// Fold every observation in `event` into its series.
    ///
    /// The whole event is applied under the series lock, so a concurrent
    /// reader sees either none or all of it.
    pub fn record(&self, event: &Event) -> Recorded {
        // Lookup is by label set, not flattened key, so a value containing
        // `",name="` cannot alias another combination.
        let Some(&i) = self.index.get(&event.labels) else {
            self.sink.emit(&Diagnostic::Rejected {
                metric: self.name.clone(),
                key: event.labels.flatten(),
                observations: event.observations.len(),
            });
            return Recorded::Rejected;
        };

        let mut aggregate = self.series[i].aggregate.lock();
        for value in &event.observations {
            aggregate.observe(&self.layout, *value);
        }

        Recorded::Accepted(event.observations.len())
    }

    /// Record a single observation.
    pub fn observe(&self, labels: &LabelSet, value: f64) -> Recorded {
        self.record(&Event::new(labels.clone(), [value]))
    }

    /// A copy of the current state for `labels`, or `None` if the combination
    /// was not declared.
    pub fn aggregate(&self, labels: &LabelSet) -> Option<AggregateSnapshot> {
        let i = *self.index.get(labels)?;
        Some(self.series[i].aggregate.lock().snapshot(&self.layout))
    }

    /// Copies of every series in render order, paired with their labels.
    pub fn snapshot(&self) -> Vec<(LabelSet, AggregateSnapshot)> {
        self.series
            .iter()
            .map(|series| {
                (
                    series.labels.clone(),
                    series.aggregate.lock().snapshot(&self.layout),
                )
            })
            .collect()
    }

    /// Render the histogram in the text exposition format into `out`.
    pub fn write_report<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        write_header(out, &self.name, &self.help, &self.kind, self.escaping)?;

        for series in &self.series {
            let aggregate = series.aggregate.lock();
            write_series(
                out,
                &self.name,
                &series.labels,
                &series.key,
                &self.layout,
                &aggregate,
                self.escaping,
            )?;
        }

        Ok(())
    }

    /// Render the histogram in the text exposition format.
    ///
    /// Rendering only reads state, so calls without an intervening
    /// [`record`](Histogram::record) return identical text.
    pub fn report(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Histogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_report(f)
    }
}

impl fmt::Debug for Histogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Histogram")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("buckets", &self.layout.len())
            .field("series", &self.series.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn histogram() -> Histogram {
        Histogram::builder("m")
            .buckets([1.0])
            .label("a", ["x", "y"])
            .label("b", ["1", "2", "3"])
            .diagnostics(NullSink)
            .build()
            .unwrap()
    }

    #[test]
    fn one_series_per_permutation() {
        let histogram = histogram();
        assert_eq!(histogram.len(), 6);

        let keys: Vec<&str> = histogram.keys().map(PermutationKey::as_str).collect();
        assert_eq!(keys[0], r#"a="x",b="1""#);
        assert_eq!(keys[5], r#"a="y",b="3""#);
    }

    #[test]
    fn partial_labels_are_rejected() {
        let histogram = histogram();
        let outcome = histogram.observe(&LabelSet::new().with("a", "x"), 0.5);
        assert_eq!(outcome, Recorded::Rejected);
    }

    #[test]
    fn extra_labels_are_rejected() {
        let histogram = histogram();
        let labels = LabelSet::new()
            .with("a", "x")
            .with("b", "1")
            .with("c", "z");
        assert_eq!(histogram.observe(&labels, 0.5), Recorded::Rejected);
    }

    #[test]
    fn embedded_key_syntax_is_rejected() {
        let histogram = Histogram::builder("m")
            .label("a", ["x"])
            .label("b", ["1"])
            .diagnostics(NullSink)
            .build()
            .unwrap();

        let forged = LabelSet::new().with("a", "x\",b=\"1");
        assert_eq!(forged.flatten(), histogram.keys().next().unwrap().clone());

        assert_eq!(histogram.observe(&forged, 0.5), Recorded::Rejected);
        assert!(histogram.aggregate(&forged).is_none());
        assert!(histogram.report().ends_with("m_count{a=\"x\",b=\"1\"} 0"));
    }

    #[test]
    fn empty_event_is_accepted() {
        let histogram = histogram();
        let labels = LabelSet::new().with("a", "x").with("b", "1");
        let outcome = histogram.record(&Event::new(labels.clone(), Vec::new()));
        assert_eq!(outcome, Recorded::Accepted(0));
        assert_eq!(histogram.aggregate(&labels).unwrap().count(), 0);
    }

    #[test]
    fn aggregate_for_undeclared_labels() {
        let histogram = histogram();
        assert!(histogram
            .aggregate(&LabelSet::new().with("a", "z").with("b", "1"))
            .is_none());
    }

    #[test]
    fn debug_is_terse() {
        let debug = format!("{:?}", histogram());
        assert!(debug.starts_with("Histogram { name: \"m\""));
    }
}
