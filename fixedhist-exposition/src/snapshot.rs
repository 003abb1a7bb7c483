use std::collections::BTreeMap;

use crate::*;

/// Contains a snapshot of histogram readings.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    datetime: DateTime<Utc>,
    unix_ns: u128,
    pub(crate) histograms: Vec<HistogramSnapshot>,
}

impl Snapshot {
    pub fn datetime(&self) -> DateTime<Utc> {
        self.datetime
    }

    pub fn unix_ns(&self) -> u128 {
        self.unix_ns
    }

    pub fn histograms(&self) -> &[HistogramSnapshot] {
        &self.histograms
    }

    /// Find a histogram in this snapshot by name.
    pub fn histogram(&self, name: &str) -> Option<&HistogramSnapshot> {
        self.histograms.iter().find(|h| h.name == name)
    }
}

impl Snapshot {
    pub(crate) fn new() -> Self {
        let datetime: DateTime<Utc> = Utc::now();

        let unix_ns = datetime
            .timestamp_nanos_opt()
            .and_then(|ns| u128::try_from(ns).ok())
            .unwrap_or_default();

        Self {
            datetime,
            unix_ns,
            histograms: Vec::new(),
        }
    }
}

#[cfg(feature = "json")]
impl Snapshot {
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(feature = "msgpack")]
impl Snapshot {
    pub fn to_msgpack(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(rmp_serde::to_vec(self)?)
    }

    pub fn from_msgpack(bytes: &[u8]) -> Result<Self, SnapshotError> {
        Ok(rmp_serde::from_slice(bytes)?)
    }
}

/// The readings of one histogram.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HistogramSnapshot {
    pub name: String,
    pub help: String,
    pub kind: String,
    pub series: Vec<SeriesSnapshot>,
}

impl HistogramSnapshot {
    pub(crate) fn new(histogram: &Histogram) -> Self {
        Self {
            name: histogram.name().to_string(),
            help: histogram.help().to_string(),
            kind: histogram.kind().to_string(),
            series: histogram
                .snapshot()
                .into_iter()
                .map(|(labels, aggregate)| SeriesSnapshot {
                    labels: labels
                        .iter()
                        .map(|(k, v)| (k.to_string(), v.to_string()))
                        .collect(),
                    buckets: aggregate.buckets().to_vec(),
                    sum: aggregate.sum(),
                    count: aggregate.count(),
                })
                .collect(),
        }
    }
}

/// The readings of one label combination. `buckets` holds cumulative
/// `(limit, count)` pairs and excludes the `+Inf` bucket, which equals
/// `count`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeriesSnapshot {
    pub labels: BTreeMap<String, String>,
    #[cfg_attr(feature = "serde", serde(with = "float::pairs"))]
    pub buckets: Vec<(f64, u64)>,
    #[cfg_attr(feature = "serde", serde(with = "float"))]
    pub sum: f64,
    pub count: u64,
}

impl SeriesSnapshot {
    /// The canonical key of this series' labels.
    pub fn key(&self) -> PermutationKey {
        LabelSet::from(self.labels.clone()).flatten()
    }
}

/// Serde helpers for floats that may be non-finite.
///
/// JSON has no representation for NaN or infinities, so those are written as
/// the strings `"NaN"`, `"+Inf"` and `"-Inf"`. Finite values stay numbers.
#[cfg(feature = "serde")]
mod float {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    fn encode(value: f64) -> Repr {
        if value.is_nan() {
            Repr::Text("NaN".to_string())
        } else if value == f64::INFINITY {
            Repr::Text("+Inf".to_string())
        } else if value == f64::NEG_INFINITY {
            Repr::Text("-Inf".to_string())
        } else {
            Repr::Number(value)
        }
    }

    fn decode<E: Error>(repr: Repr) -> Result<f64, E> {
        match repr {
            Repr::Number(value) => Ok(value),
            Repr::Text(text) => match text.as_str() {
                "NaN" => Ok(f64::NAN),
                "+Inf" => Ok(f64::INFINITY),
                "-Inf" => Ok(f64::NEG_INFINITY),
                other => Err(E::custom(format!("invalid float `{other}`"))),
            },
        }
    }

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        encode(*value).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        decode(Repr::deserialize(deserializer)?)
    }

    /// The same encoding applied to the limit of `(limit, count)` pairs.
    pub mod pairs {
        use super::*;

        pub fn serialize<S: Serializer>(
            pairs: &[(f64, u64)],
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            serializer.collect_seq(pairs.iter().map(|(limit, count)| (encode(*limit), *count)))
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Vec<(f64, u64)>, D::Error> {
            Vec::<(Repr, u64)>::deserialize(deserializer)?
                .into_iter()
                .map(|(limit, count)| Ok((decode(limit)?, count)))
                .collect()
        }
    }
}
