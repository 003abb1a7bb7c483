// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Bucket limits for fixed-bucket histograms.

use std::fmt;

use crate::LayoutError;

/// A single bucket's inclusive upper limit.
///
/// The display form is computed once so rendering never reformats the limit.
#[derive(Clone, Debug, PartialEq)]
pub struct BucketLimit {
    value: f64,
    label: String,
}

impl BucketLimit {
    fn new(value: f64) -> Self {
        Self {
            value,
            label: Value(value).to_string(),
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// The limit as it appears in the `le` label.
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// The sorted set of configured bucket limits shared by every series of a
/// histogram.
///
/// The implicit `+Inf` bucket is never stored. It is always equal to the
/// series count.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Buckets {
    limits: Vec<BucketLimit>,
}

impl Buckets {
    /// Build a layout from limits in any order.
    ///
    /// Limits are sorted ascending and duplicates are merged. A `+Inf` limit
    /// is dropped since the implicit top bucket already covers it.
    pub fn new(limits: impl IntoIterator<Item = f64>) -> Result<Self, LayoutError> {
        let mut values: Vec<f64> = limits.into_iter().collect();

        if values.iter().any(|v| v.is_nan()) {
            return Err(LayoutError::NanLimit);
        }

        values.retain(|v| *v != f64::INFINITY);
        values.sort_by(f64::total_cmp);
        values.dedup();

        Ok(Self {
            limits: values.into_iter().map(BucketLimit::new).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.limits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.limits.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BucketLimit> {
        self.limits.iter()
    }

    pub fn limits(&self) -> &[BucketLimit] {
        &self.limits
    }
}

impl<'a> IntoIterator for &'a Buckets {
    type Item = &'a BucketLimit;
    type IntoIter = std::slice::Iter<'a, BucketLimit>;

    fn into_iter(self) -> Self::IntoIter {
        self.limits.iter()
    }
}

/// Formats a sample value the way the text exposition format spells it.
///
/// Finite values use the shortest representation that round-trips, so
/// `10.0` renders as `10` and `0.25` as `0.25`. Magnitudes of at least
/// `1e21` or below `1e-7` switch to exponent form, e.g. `1e300`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Value(pub f64);

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_nan() {
            f.write_str("NaN")
        } else if self.0 == f64::INFINITY {
            f.write_str("+Inf")
        } else if self.0 == f64::NEG_INFINITY {
            f.write_str("-Inf")
        } else if self.0 != 0.0 && !(1e-7..1e21).contains(&self.0.abs()) {
            write!(f, "{:e}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}
