use tracing::debug;

use super::tables::{default_params, default_parameter_set, LimitTable, PresetTable};
use super::{Algorithm, AlgorithmParams, ParamKey, ParameterSet};
use crate::error::{HarnessError, HarnessResult};

/// The current parameter values of every algorithm.
///
/// Every write is clipped into the admissible range of its parameter, so
/// the store always holds executable values. Reads hand out copies.
/// Persist it through [`ParameterStore::snapshot`] and
/// [`ParameterStore::from_snapshot`].
#[derive(Debug, Clone)]
pub struct ParameterStore {
    values: ParameterSet,
    limits: LimitTable,
    presets: PresetTable,
}

impl Default for ParameterStore {
    fn default() -> Self {
        ParameterStore::new()
    }
}

impl ParameterStore {
    /// A store holding the default values, standard limits and presets.
    pub fn new() -> Self {
        ParameterStore::from_tables(LimitTable::standard(), PresetTable::standard())
    }

    pub fn from_tables(limits: LimitTable, presets: PresetTable) -> Self {
        let mut store = ParameterStore {
            values: ParameterSet::new(),
            limits,
            presets,
        };
        for (algorithm, params) in default_parameter_set().iter() {
            store.write_all(*algorithm, params);
        }
        store
    }

    /// Creates a store from previously saved values. Values are clipped
    /// like any other write, keys outside an algorithm's schema are dropped
    /// and missing keys keep their defaults.
    pub fn from_snapshot(snapshot: &ParameterSet) -> Self {
        let mut store = ParameterStore::new();
        for (algorithm, params) in snapshot.iter() {
            store.write_all(*algorithm, params);
        }
        store
    }

    pub fn limits(&self) -> &LimitTable {
        &self.limits
    }

    pub fn presets(&self) -> &PresetTable {
        &self.presets
    }

    /// Returns a copy of the current values of an algorithm.
    pub fn params(&self, algorithm: Algorithm) -> AlgorithmParams {
        self.values
            .get(algorithm)
            .cloned()
            .unwrap_or_else(|| default_params(algorithm))
    }

    /// Returns a copy of all current values.
    pub fn snapshot(&self) -> ParameterSet {
        self.values.clone()
    }

    /// Sets a single parameter and returns the updated values of the algorithm.
    pub fn update_parameter(
        &mut self,
        algorithm: Algorithm,
        key: ParamKey,
        value: f64,
    ) -> HarnessResult<AlgorithmParams> {
        if !algorithm.accepts(key) {
            return Err(HarnessError::validation(format!(
                "{} has no parameter '{}'",
                algorithm, key
            )));
        }
        if !value.is_finite() {
            return Err(HarnessError::validation(format!(
                "{} {} must be finite, got {}",
                algorithm, key, value
            )));
        }
        self.write(algorithm, key, value);
        Ok(self.params(algorithm))
    }

    /// Overlays a named preset and returns the updated values. Only keys
    /// defined by the preset change, keys outside the schema are ignored.
    pub fn apply_preset(&mut self, algorithm: Algorithm, name: &str) -> HarnessResult<AlgorithmParams> {
        let preset = self
            .presets
            .get(algorithm, name)
            .cloned()
            .ok_or_else(|| {
                HarnessError::validation(format!("{} has no preset '{}'", algorithm, name))
            })?;
        debug!(algorithm = %algorithm, preset = name, "applying preset");
        self.write_all(algorithm, &preset.values);
        Ok(self.params(algorithm))
    }

    /// Restores the defaults of an algorithm.
    pub fn reset(&mut self, algorithm: Algorithm) -> AlgorithmParams {
        self.values.insert(algorithm, AlgorithmParams::new());
        self.write_all(algorithm, &default_params(algorithm));
        self.params(algorithm)
    }

    pub fn preset_names(&self, algorithm: Algorithm) -> Vec<&str> {
        self.presets.names(algorithm)
    }

    fn write_all(&mut self, algorithm: Algorithm, params: &AlgorithmParams) {
        for (key, value) in params.iter() {
            if algorithm.accepts(*key) && value.is_finite() {
                self.write(algorithm, *key, *value);
            }
        }
    }

    fn write(&mut self, algorithm: Algorithm, key: ParamKey, value: f64) {
        let mut stored = self.limits.clamp(algorithm, key, value);
        if key.is_integer() {
            stored = stored.round().max(1.0);
        }
        if stored != value {
            debug!(
                algorithm = %algorithm,
                parameter = %key,
                requested = value,
                stored,
                "clamped parameter"
            );
        }
        if self.values.get(algorithm).is_none() {
            self.values.insert(algorithm, AlgorithmParams::new());
        }
        if let Some(params) = self.values.get_mut(algorithm) {
            params.set(key, stored);
        }
    }
}
