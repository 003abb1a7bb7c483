use crate::*;

/// Produces a snapshot of histogram readings.
pub struct Snapshotter {
    name_filter: fn(&str) -> bool,
}

/// Used to build a new `Snapshotter`.
#[derive(Default)]
pub struct SnapshotterBuilder {
    snapshotter: Snapshotter,
}

impl SnapshotterBuilder {
    /// Construct a new builder. By default no filtering is applied.
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the builder and return a `Snapshotter`.
    pub fn build(self) -> Snapshotter {
        self.snapshotter
    }

    /// Allow a user-supplied filtering function to be applied based on the
    /// histogram name. The function must return true for any histogram that
    /// should be included in the snapshot.
    pub fn name_filter(mut self, filter: fn(&str) -> bool) -> Self {
        self.snapshotter.name_filter = filter;
        self
    }
}

impl Default for Snapshotter {
    fn default() -> Self {
        Self {
            name_filter: |_| true,
        }
    }
}

impl Snapshotter {
    /// Produce a new snapshot of the given histograms.
    pub fn snapshot<'a>(&self, histograms: impl IntoIterator<Item = &'a Histogram>) -> Snapshot {
        let mut snapshot = Snapshot::new();

        for histogram in histograms {
            if !(self.name_filter)(histogram.name()) {
                continue;
            }

            snapshot.histograms.push(HistogramSnapshot::new(histogram));
        }

        snapshot
    }
}
