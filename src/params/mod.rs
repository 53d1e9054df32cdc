//! Algorithm parameters: schemas, admissible ranges, presets, the parameter
//! store and the runtime stability rules.
//!
//! # Examples
//!
//! ```
//! use adafilt::params::{Algorithm, ParamKey, ParameterStore, StabilityEnforcer};
//!
//! let mut store = ParameterStore::new();
//! // Writes are clipped into the admissible range, 1e-6..=1.999 for NLMS.
//! let params = store.update_parameter(Algorithm::Nlms, ParamKey::Mu, 2.5).unwrap();
//! assert_eq!(params.get(ParamKey::Mu), Some(1.999));
//!
//! // The stability rules are applied to a copy just before running.
//! let enforcer = StabilityEnforcer::new(store.limits().clone());
//! let enforced = enforcer.enforce(Algorithm::Nlms, &store.params(Algorithm::Nlms));
//! assert_eq!(enforced.get(ParamKey::Mu), Some(1.95));
//! ```

mod algorithm;
mod set;
mod stability;
mod store;
mod tables;

pub use algorithm::{Algorithm, ParamKey};
pub use set::{AlgorithmParams, ParameterSet};
pub use stability::{
    enforce_stability, StabilityEnforcer, AP_MU_MARGIN, MU_CEILING, MU_FLOOR, NLMS_MU_CEILING,
};
pub use store::ParameterStore;
pub use tables::{
    default_parameter_set, default_params, default_value, Limit, LimitTable, Preset, PresetTable,
};
