//! Exposition of fixedhist histograms
//!
//! Provides a standardized struct for a snapshot of histogram readings, a
//! way of producing the snapshots, and a text payload that combines several
//! histograms for a scrape endpoint.

#[cfg(any(feature = "json", feature = "msgpack"))]
mod error;
mod snapshot;
mod snapshotter;
mod text;

#[cfg(any(feature = "json", feature = "msgpack"))]
pub use error::SnapshotError;
pub use snapshot::{HistogramSnapshot, SeriesSnapshot, Snapshot};
pub use snapshotter::{Snapshotter, SnapshotterBuilder};
pub use text::{TextExposition, CONTENT_TYPE};

use chrono::{DateTime, Utc};
use fixedhist::{Histogram, LabelSet, PermutationKey};
