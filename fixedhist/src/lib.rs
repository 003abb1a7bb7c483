// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Fixed-bucket histograms over a closed, pre-declared label space.
//!
//! A [`Histogram`] is built from a [`HistogramConfig`] (or a
//! [`HistogramBuilder`]) that names every label and every value each label
//! may take. All combinations are expanded up front; observations for any
//! other combination are dropped and reported on a [`DiagnosticSink`]
//! instead of failing the caller. [`Histogram::report`] renders the state in
//! the text exposition format scraped by pull-based collectors.
//!
//! ```
//! # use fixedhist::*;
//! let histogram = Histogram::builder("latency")
//!     .help("request latency")
//!     .buckets([0.1, 1.0])
//!     .build()
//!     .unwrap();
//!
//! histogram.observe(&LabelSet::new(), 0.5);
//!
//! assert!(histogram.report().contains("latency_bucket{le=\"1\"} 1"));
//! ```

mod builder;
mod config;
mod error;
mod histogram;

pub use builder::HistogramBuilder;
pub use config::HistogramConfig;
pub use error::ConfigError;
pub use histogram::{Event, Histogram, Recorded};

pub use fixedhist_core::{
    flatten_labels, label_permutations, AggregateSnapshot, BucketLimit, Buckets, Diagnostic,
    DiagnosticSink, Escaping, LabelSet, NullSink, PermutationKey, TracingSink,
};
