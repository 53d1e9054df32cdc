//! Default values, admissible ranges and presets for every algorithm.

use std::collections::BTreeMap;

use super::{Algorithm, AlgorithmParams, ParamKey, ParameterSet};

use Algorithm::*;
use ParamKey::*;

/// Default parameter values, one entry per schema key.
const DEFAULTS: &[(Algorithm, &[(ParamKey, f64)])] = &[
    (Lms, &[(Mu, 0.01)]),
    (Nlms, &[(Mu, 0.8), (Eps, 1e-3)]),
    (Rls, &[(Mu, 0.99), (Eps, 0.1)]),
    (Ap, &[(Mu, 0.05), (Order, 3.0), (Ifc, 1e-3)]),
    (Sslms, &[(Mu, 0.01)]),
    (Nlmf, &[(Mu, 0.1), (Eps, 1.0)]),
    (Llncosh, &[(Mu, 0.01), (Lambd, 0.1)]),
    (Gmcc, &[(Mu, 0.01), (Lambd, 0.05), (Alpha, 2.0)]),
    (Gngd, &[(Mu, 0.01), (Eps, 0.1), (Ro, 1e-4)]),
];

/// Inclusive `(min, max)` ranges.
const LIMITS: &[(Algorithm, &[(ParamKey, f64, f64)])] = &[
    (Lms, &[(Mu, 1e-6, 1.0)]),
    (Nlms, &[(Mu, 1e-6, 1.999), (Eps, 1e-9, 1.0)]),
    (Rls, &[(Mu, 0.90, 1.0), (Eps, 1e-6, 10.0)]),
    (Ap, &[(Mu, 1e-6, 1.0), (Order, 1.0, 64.0), (Ifc, 1e-9, 1.0)]),
    (Sslms, &[(Mu, 1e-6, 0.2)]),
    (Nlmf, &[(Mu, 1e-6, 1.0), (Eps, 1e-9, 10.0)]),
    (Llncosh, &[(Mu, 1e-6, 0.5), (Lambd, 1e-9, 1.0)]),
    (Gmcc, &[(Mu, 1e-6, 0.5), (Lambd, 1e-9, 1.0), (Alpha, 0.5, 5.0)]),
    (Gngd, &[(Mu, 1e-6, 1.0), (Eps, 1e-9, 1.0), (Ro, 1e-9, 1.0)]),
];

type PresetEntry = (&'static str, &'static [(ParamKey, f64)]);

/// Named partial overlays. "Default" restates the defaults.
const PRESETS: &[(Algorithm, &[PresetEntry])] = &[
    (
        Lms,
        &[
            ("Default", &[(Mu, 0.01)]),
            ("Conservative", &[(Mu, 0.003)]),
            ("Fast", &[(Mu, 0.05)]),
        ],
    ),
    (
        Nlms,
        &[
            ("Default", &[(Mu, 0.8), (Eps, 1e-3)]),
            ("Aggressive", &[(Mu, 1.5), (Eps, 1e-3)]),
            ("Robust", &[(Mu, 0.6), (Eps, 1e-2)]),
            ("ANC Quick", &[(Mu, 1.2), (Eps, 1e-3)]),
        ],
    ),
    (
        Rls,
        &[
            ("Default", &[(Mu, 0.99), (Eps, 0.1)]),
            ("Quick", &[(Mu, 0.995), (Eps, 0.1)]),
            ("Very Quick", &[(Mu, 0.998), (Eps, 0.1)]),
            ("Noisy", &[(Mu, 0.98), (Eps, 1.0)]),
        ],
    ),
    (
        Ap,
        &[
            ("Default", &[(Mu, 0.05), (Order, 3.0), (Ifc, 1e-3)]),
            ("Narrowband", &[(Mu, 0.02), (Order, 8.0), (Ifc, 1e-3)]),
            ("Wideband", &[(Mu, 0.08), (Order, 2.0), (Ifc, 1e-3)]),
        ],
    ),
    (
        Sslms,
        &[
            ("Default", &[(Mu, 0.01)]),
            ("Robust", &[(Mu, 0.005)]),
            ("Fast", &[(Mu, 0.05)]),
        ],
    ),
    (
        Nlmf,
        &[
            ("Default", &[(Mu, 0.1), (Eps, 1.0)]),
            ("Conservative", &[(Mu, 0.03), (Eps, 1.0)]),
            ("Fast", &[(Mu, 0.3), (Eps, 1.0)]),
        ],
    ),
    (
        Llncosh,
        &[
            ("Default", &[(Mu, 0.01), (Lambd, 0.1)]),
            ("Sharper", &[(Mu, 0.02), (Lambd, 0.2)]),
            ("Softer", &[(Mu, 0.005), (Lambd, 0.05)]),
        ],
    ),
    (
        Gmcc,
        &[
            ("Default", &[(Mu, 0.01), (Lambd, 0.05), (Alpha, 2.0)]),
            ("Aggressive", &[(Mu, 0.03), (Lambd, 0.1), (Alpha, 2.0)]),
            ("Robust", &[(Mu, 0.008), (Lambd, 0.08), (Alpha, 3.0)]),
        ],
    ),
    (
        Gngd,
        &[
            ("Default", &[(Mu, 0.01), (Eps, 0.1), (Ro, 1e-4)]),
            ("Adaptive", &[(Mu, 0.05), (Eps, 0.05), (Ro, 5e-4)]),
            ("Robust", &[(Mu, 0.008), (Eps, 0.2), (Ro, 1e-4)]),
        ],
    ),
];

fn lookup<T: ?Sized>(table: &'static [(Algorithm, &'static T)], algorithm: Algorithm) -> &'static T {
    table
        .iter()
        .find(|(entry, _)| *entry == algorithm)
        .map(|(_, value)| *value)
        // Every table lists every algorithm, see `test_tables_are_complete`.
        .unwrap_or_else(|| unreachable!("missing table entry for {}", algorithm))
}

/// Returns the default parameters of an algorithm.
pub fn default_params(algorithm: Algorithm) -> AlgorithmParams {
    AlgorithmParams::from_pairs(lookup(DEFAULTS, algorithm))
}

/// Returns the default value of a parameter, if the algorithm has it.
pub fn default_value(algorithm: Algorithm, key: ParamKey) -> Option<f64> {
    lookup(DEFAULTS, algorithm)
        .iter()
        .find(|(entry, _)| *entry == key)
        .map(|(_, value)| *value)
}

/// Returns the default parameters of every algorithm.
pub fn default_parameter_set() -> ParameterSet {
    let mut set = ParameterSet::new();
    for algorithm in Algorithm::ALL.iter() {
        set.insert(*algorithm, default_params(*algorithm));
    }
    set
}

/// An inclusive admissible range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limit {
    pub min: f64,
    pub max: f64,
}

impl Limit {
    pub fn new(min: f64, max: f64) -> Self {
        Limit { min, max }
    }

    /// Clips `value` into the range. NaN maps to `min`, and an empty
    /// range resolves to `max`.
    pub fn clamp(&self, value: f64) -> f64 {
        clip(value, self.min, self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// `min(max(value, lo), hi)`. Unlike `f64::clamp` this never panics.
pub(crate) fn clip(value: f64, lo: f64, hi: f64) -> f64 {
    value.max(lo).min(hi)
}

/// Admissible parameter ranges, keyed by algorithm and parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct LimitTable {
    limits: BTreeMap<(Algorithm, ParamKey), Limit>,
}

impl LimitTable {
    /// A table without any ranges.
    pub fn empty() -> Self {
        LimitTable {
            limits: BTreeMap::new(),
        }
    }

    /// The standard ranges.
    pub fn standard() -> Self {
        let mut table = LimitTable::empty();
        for (algorithm, entries) in LIMITS.iter() {
            for (key, min, max) in entries.iter() {
                table.set(*algorithm, *key, Limit::new(*min, *max));
            }
        }
        table
    }

    pub fn get(&self, algorithm: Algorithm, key: ParamKey) -> Option<Limit> {
        self.limits.get(&(algorithm, key)).copied()
    }

    pub fn set(&mut self, algorithm: Algorithm, key: ParamKey, limit: Limit) {
        self.limits.insert((algorithm, key), limit);
    }

    /// Clips a value into its range, or returns it unchanged if the
    /// table has no range for it.
    pub fn clamp(&self, algorithm: Algorithm, key: ParamKey, value: f64) -> f64 {
        match self.get(algorithm, key) {
            Some(limit) => limit.clamp(value),
            None => value,
        }
    }
}

impl Default for LimitTable {
    fn default() -> Self {
        LimitTable::standard()
    }
}

/// A named partial parameter overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct Preset {
    pub name: String,
    pub values: AlgorithmParams,
}

/// Named presets per algorithm, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct PresetTable {
    presets: BTreeMap<Algorithm, Vec<Preset>>,
}

impl PresetTable {
    pub fn empty() -> Self {
        PresetTable {
            presets: BTreeMap::new(),
        }
    }

    pub fn standard() -> Self {
        let mut table = PresetTable::empty();
        for (algorithm, entries) in PRESETS.iter() {
            for (name, values) in entries.iter() {
                table.add(*algorithm, name, AlgorithmParams::from_pairs(values));
            }
        }
        table
    }

    /// Adds a preset, replacing an existing one with the same name.
    pub fn add(&mut self, algorithm: Algorithm, name: &str, values: AlgorithmParams) {
        let presets = self.presets.entry(algorithm).or_default();
        match presets.iter_mut().find(|preset| preset.name == name) {
            Some(preset) => preset.values = values,
            None => presets.push(Preset {
                name: name.to_string(),
                values,
            }),
        }
    }

    pub fn get(&self, algorithm: Algorithm, name: &str) -> Option<&Preset> {
        self.presets
            .get(&algorithm)?
            .iter()
            .find(|preset| preset.name == name)
    }

    pub fn names(&self, algorithm: Algorithm) -> Vec<&str> {
        self.presets
            .get(&algorithm)
            .map(|presets| presets.iter().map(|preset| preset.name.as_str()).collect())
            .unwrap_or_default()
    }
}

impl Default for PresetTable {
    fn default() -> Self {
        PresetTable::standard()
    }
}
