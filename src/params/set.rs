use std::collections::btree_map::{BTreeMap, Iter};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{Algorithm, ParamKey};

/// Parameter values of a single algorithm.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct AlgorithmParams {
    values: BTreeMap<ParamKey, f64>,
}

impl AlgorithmParams {
    pub fn new() -> Self {
        AlgorithmParams::default()
    }

    /// Builds a parameter map from `(key, value)` pairs.
    pub fn from_pairs(pairs: &[(ParamKey, f64)]) -> Self {
        AlgorithmParams {
            values: pairs.iter().copied().collect(),
        }
    }

    pub fn get(&self, key: ParamKey) -> Option<f64> {
        self.values.get(&key).copied()
    }

    pub fn set(&mut self, key: ParamKey, value: f64) {
        self.values.insert(key, value);
    }

    /// Builder style version of [`AlgorithmParams::set`].
    pub fn with(mut self, key: ParamKey, value: f64) -> Self {
        self.set(key, value);
        self
    }

    pub fn contains(&self, key: ParamKey) -> bool {
        self.values.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, ParamKey, f64> {
        self.values.iter()
    }
}

impl FromIterator<(ParamKey, f64)> for AlgorithmParams {
    fn from_iter<I: IntoIterator<Item = (ParamKey, f64)>>(iter: I) -> Self {
        AlgorithmParams {
            values: iter.into_iter().collect(),
        }
    }
}

/// Parameter values of every algorithm.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ParameterSet {
    algorithms: BTreeMap<Algorithm, AlgorithmParams>,
}

impl ParameterSet {
    pub fn new() -> Self {
        ParameterSet::default()
    }

    pub fn get(&self, algorithm: Algorithm) -> Option<&AlgorithmParams> {
        self.algorithms.get(&algorithm)
    }

    pub fn get_mut(&mut self, algorithm: Algorithm) -> Option<&mut AlgorithmParams> {
        self.algorithms.get_mut(&algorithm)
    }

    pub fn insert(&mut self, algorithm: Algorithm, params: AlgorithmParams) {
        self.algorithms.insert(algorithm, params);
    }

    pub fn iter(&self) -> Iter<'_, Algorithm, AlgorithmParams> {
        self.algorithms.iter()
    }
}
