// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Building blocks for fixed-bucket histograms over a closed label space.
//!
//! This crate holds the pieces that do not depend on how a histogram is
//! stored or shared: label sets and their canonical keys, bucket layouts,
//! per-series aggregates, diagnostics, and the text rendering primitives.
//! Most users want the `fixedhist` crate instead.

mod aggregate;
mod buckets;
mod diagnostic;
mod error;
pub mod labels;
pub mod text;

pub use aggregate::{Aggregate, AggregateSnapshot};
pub use buckets::{BucketLimit, Buckets, Value};
pub use diagnostic::{Diagnostic, DiagnosticSink, NullSink, TracingSink};
pub use error::LayoutError;
pub use labels::{flatten_labels, label_permutations, LabelSet, PermutationKey};
pub use text::Escaping;
