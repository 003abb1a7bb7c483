// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::Buckets;

/// The accumulated state of one label permutation.
///
/// Bucket counters are cumulative: each one counts every observation less
/// than or equal to its limit, so counters never decrease as limits grow and
/// none exceeds `count`. The counters are positional and line up with the
/// [`Buckets`] the aggregate was created from.
#[derive(Clone, Debug, PartialEq)]
pub struct Aggregate {
    buckets: Vec<u64>,
    sum: f64,
    count: u64,
}

impl Aggregate {
    /// Create a zeroed aggregate with one counter per limit in `layout`.
    pub fn new(layout: &Buckets) -> Self {
        Self {
            buckets: vec![0; layout.len()],
            sum: 0.0,
            count: 0,
        }
    }

    /// Fold one observation into the aggregate.
    ///
    /// Ties go to the bucket. A value above every limit, or NaN, only
    /// contributes to `sum` and `count`.
    pub fn observe(&mut self, layout: &Buckets, value: f64) {
        debug_assert_eq!(self.buckets.len(), layout.len());

        for (counter, limit) in self.buckets.iter_mut().zip(layout) {
            if value <= limit.value() {
                *counter += 1;
            }
        }

        self.count += 1;
        self.sum += value;
    }

    /// Cumulative bucket counters in ascending limit order.
    pub fn buckets(&self) -> &[u64] {
        &self.buckets
    }

    pub fn sum(&self) -> f64 {
        self.sum
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Copy the current state, pairing each counter with its limit.
    pub fn snapshot(&self, layout: &Buckets) -> AggregateSnapshot {
        AggregateSnapshot {
            buckets: layout
                .iter()
                .map(|limit| limit.value())
                .zip(self.buckets.iter().copied())
                .collect(),
            sum: self.sum,
            count: self.count,
        }
    }
}

/// A point-in-time copy of an [`Aggregate`].
#[derive(Clone, Debug, PartialEq)]
pub struct AggregateSnapshot {
    buckets: Vec<(f64, u64)>,
    sum: f64,
    count: u64,
}

impl AggregateSnapshot {
    /// `(limit, cumulative count)` pairs in ascending limit order, excluding
    /// the implicit `+Inf` bucket.
    pub fn buckets(&self) -> &[(f64, u64)] {
        &self.buckets
    }

    /// The cumulative count for the bucket with exactly this limit.
    pub fn bucket(&self, limit: f64) -> Option<u64> {
        self.buckets
            .iter()
            .find(|(l, _)| *l == limit)
            .map(|(_, count)| *count)
    }

    pub fn sum(&self) -> f64 {
        self.sum
    }

    pub fn count(&self) -> u64 {
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn layout() -> Buckets {
        Buckets::new([1.0, 5.0, 10.0]).unwrap()
    }

    #[test]
    fn zeroed() {
        let layout = layout();
        let aggregate = Aggregate::new(&layout);
        assert_eq!(aggregate.buckets(), &[0, 0, 0]);
        assert_eq!(aggregate.sum(), 0.0);
        assert_eq!(aggregate.count(), 0);
    }

    #[test]
    fn ties_go_to_the_bucket() {
        let layout = layout();
        let mut aggregate = Aggregate::new(&layout);
        aggregate.observe(&layout, 5.0);
        assert_eq!(aggregate.buckets(), &[0, 1, 1]);
        assert_eq!(aggregate.count(), 1);
    }

    #[test]
    fn above_every_limit() {
        let layout = layout();
        let mut aggregate = Aggregate::new(&layout);
        aggregate.observe(&layout, 11.0);
        assert_eq!(aggregate.buckets(), &[0, 0, 0]);
        assert_eq!(aggregate.count(), 1);
        assert_eq!(aggregate.sum(), 11.0);
    }

    #[test]
    fn nan_only_counts() {
        let layout = layout();
        let mut aggregate = Aggregate::new(&layout);
        aggregate.observe(&layout, f64::NAN);
        assert_eq!(aggregate.buckets(), &[0, 0, 0]);
        assert_eq!(aggregate.count(), 1);
        assert!(aggregate.sum().is_nan());
    }

    #[test]
    fn negative_and_infinite() {
        let layout = layout();
        let mut aggregate = Aggregate::new(&layout);
        aggregate.observe(&layout, -3.0);
        aggregate.observe(&layout, f64::NEG_INFINITY);
        aggregate.observe(&layout, f64::INFINITY);
        assert_eq!(aggregate.buckets(), &[2, 2, 2]);
        assert_eq!(aggregate.count(), 3);
    }

    #[test]
    fn snapshot_pairs_limits() {
        let layout = layout();
        let mut aggregate = Aggregate::new(&layout);
        aggregate.observe(&layout, 2.0);
        let snapshot = aggregate.snapshot(&layout);
        assert_eq!(snapshot.buckets(), &[(1.0, 0), (5.0, 1), (10.0, 1)]);
        assert_eq!(snapshot.bucket(5.0), Some(1));
        assert_eq!(snapshot.bucket(7.0), None);
    }

    proptest! {
        #[test]
        fn cumulative_and_bounded(
            limits in proptest::collection::vec(-100.0f64..100.0, 0..8),
            values in proptest::collection::vec(proptest::num::f64::ANY, 0..64),
        ) {
            let layout = Buckets::new(limits).unwrap();
            let mut aggregate = Aggregate::new(&layout);

            for value in &values {
                aggregate.observe(&layout, *value);

                let buckets = aggregate.buckets();
                for pair in buckets.windows(2) {
                    prop_assert!(pair[0] <= pair[1]);
                }
                if let Some(last) = buckets.last() {
                    prop_assert!(*last <= aggregate.count());
                }
            }

            prop_assert_eq!(aggregate.count(), values.len() as u64);
        }
    }
}
