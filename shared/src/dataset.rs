use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Region id → value snapshot for one render cycle.
///
/// Non-finite values are kept as given but behave as if absent: they never
/// widen the domain and [`Dataset::get`] hides them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset(BTreeMap<String, f64>);

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<f64> {
        self.0.get(id).copied().filter(|v| v.is_finite())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Observed `[min, max]` over finite values, `None` when there are none.
    pub fn domain(&self) -> Option<(f64, f64)> {
        self.0
            .values()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for Dataset {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
