//! Runtime stability rules.
//!
//! Applied to a copy of the stored parameters just before every run, on top
//! of the range clipping the store already does. Each algorithm has a rule
//! translating its convergence conditions into hard bounds.

use tracing::debug;

use super::tables::{clip, default_params, LimitTable};
use super::{Algorithm, AlgorithmParams, ParamKey, ParameterSet};

/// Lower bound applied to every step size.
pub const MU_FLOOR: f64 = 1e-12;
/// Upper bound applied to every step size that has no rule of its own.
pub const MU_CEILING: f64 = 1.0;
/// NLMS is mean square stable for step sizes below 2.
pub const NLMS_MU_CEILING: f64 = 1.95;
/// Margin keeping the AP step size strictly below `1 / order`.
pub const AP_MU_MARGIN: f64 = 1e-6;

type Rule = fn(&mut AlgorithmParams, &LimitTable);

struct StabilityRule {
    /// Ceiling of the generic step size clamp.
    mu_ceiling: f64,
    specific: Option<Rule>,
}

fn rule_for(algorithm: Algorithm) -> StabilityRule {
    match algorithm {
        // The NLMS rule replaces the generic ceiling.
        Algorithm::Nlms => StabilityRule {
            mu_ceiling: f64::INFINITY,
            specific: Some(nlms_rule),
        },
        Algorithm::Ap => StabilityRule {
            mu_ceiling: MU_CEILING,
            specific: Some(ap_rule),
        },
        Algorithm::Rls => StabilityRule {
            mu_ceiling: MU_CEILING,
            specific: Some(rls_rule),
        },
        Algorithm::Lms
        | Algorithm::Sslms
        | Algorithm::Nlmf
        | Algorithm::Llncosh
        | Algorithm::Gmcc
        | Algorithm::Gngd => StabilityRule {
            mu_ceiling: MU_CEILING,
            specific: None,
        },
    }
}

fn limited(limits: &LimitTable, algorithm: Algorithm, key: ParamKey) -> (f64, f64) {
    match limits.get(algorithm, key) {
        Some(limit) => (limit.min, limit.max),
        None => (f64::NEG_INFINITY, f64::INFINITY),
    }
}

fn nlms_rule(params: &mut AlgorithmParams, limits: &LimitTable) {
    let (lo, hi) = limited(limits, Algorithm::Nlms, ParamKey::Mu);
    if let Some(mu) = params.get(ParamKey::Mu) {
        params.set(ParamKey::Mu, clip(mu, lo, NLMS_MU_CEILING.min(hi)));
    }
}

fn ap_rule(params: &mut AlgorithmParams, limits: &LimitTable) {
    let (_, order_hi) = limited(limits, Algorithm::Ap, ParamKey::Order);
    let order = params
        .get(ParamKey::Order)
        .unwrap_or(1.0)
        .trunc()
        .min(order_hi.trunc())
        .max(1.0);
    params.set(ParamKey::Order, order);

    let (lo, hi) = limited(limits, Algorithm::Ap, ParamKey::Mu);
    let mu_max = 1.0 / order - AP_MU_MARGIN;
    if let Some(mu) = params.get(ParamKey::Mu) {
        params.set(ParamKey::Mu, clip(mu, lo, hi.min(mu_max)));
    }
}

fn rls_rule(params: &mut AlgorithmParams, limits: &LimitTable) {
    for key in [ParamKey::Mu, ParamKey::Eps].iter().copied() {
        let (lo, hi) = limited(limits, Algorithm::Rls, key);
        if let Some(value) = params.get(key) {
            params.set(key, clip(value, lo, hi));
        }
    }
}

/// Returns a copy of `params` that satisfies the stability rules of
/// `algorithm`. Missing schema keys are filled in with their defaults.
pub fn enforce_stability(
    algorithm: Algorithm,
    params: &AlgorithmParams,
    limits: &LimitTable,
) -> AlgorithmParams {
    let mut enforced = default_params(algorithm);
    for (key, value) in params.iter() {
        enforced.set(*key, *value);
    }

    let rule = rule_for(algorithm);
    if let Some(mu) = enforced.get(ParamKey::Mu) {
        enforced.set(ParamKey::Mu, clip(mu, MU_FLOOR, rule.mu_ceiling));
    }
    if let Some(specific) = rule.specific {
        specific(&mut enforced, limits);
    }

    for (key, value) in enforced.iter() {
        let requested = params.get(*key);
        if requested != Some(*value) {
            debug!(
                algorithm = %algorithm,
                parameter = %key,
                requested = ?requested,
                enforced = *value,
                "stability rule adjusted parameter"
            );
        }
    }
    enforced
}

/// Applies the stability rules using a fixed limit table.
#[derive(Debug, Clone, Default)]
pub struct StabilityEnforcer {
    limits: LimitTable,
}

impl StabilityEnforcer {
    pub fn new(limits: LimitTable) -> Self {
        StabilityEnforcer { limits }
    }

    pub fn limits(&self) -> &LimitTable {
        &self.limits
    }

    pub fn enforce(&self, algorithm: Algorithm, params: &AlgorithmParams) -> AlgorithmParams {
        enforce_stability(algorithm, params, &self.limits)
    }

    /// Enforces every algorithm of a parameter set.
    pub fn enforce_all(&self, set: &ParameterSet) -> ParameterSet {
        let mut enforced = ParameterSet::new();
        for (algorithm, params) in set.iter() {
            enforced.insert(*algorithm, self.enforce(*algorithm, params));
        }
        enforced
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::tables::Limit;

    fn mu(algorithm: Algorithm, value: f64) -> f64 {
        let params = default_params(algorithm).with(ParamKey::Mu, value);
        enforce_stability(algorithm, &params, &LimitTable::standard())
            .get(ParamKey::Mu)
            .unwrap()
    }

    #[test]
    fn test_nlms_ceiling() {
        assert_eq!(mu(Algorithm::Nlms, 2.5), 1.95);
        assert_eq!(mu(Algorithm::Nlms, 1.5), 1.5);
        assert_eq!(mu(Algorithm::Nlms, 0.0), 1e-6);
        for step in 0..=400 {
            let value = step as f64 * 0.01;
            assert!(mu(Algorithm::Nlms, value) <= NLMS_MU_CEILING);
        }
    }

    #[test]
    fn test_nlms_ceiling_respects_tighter_limit() {
        let mut limits = LimitTable::standard();
        limits.set(Algorithm::Nlms, ParamKey::Mu, Limit::new(1e-6, 1.2));
        let params = AlgorithmParams::new().with(ParamKey::Mu, 1.9);
        let enforced = enforce_stability(Algorithm::Nlms, &params, &limits);
        assert_eq!(enforced.get(ParamKey::Mu), Some(1.2));
    }

    #[test]
    fn test_generic_mu_clamp() {
        assert_eq!(mu(Algorithm::Lms, 3.0), 1.0);
        assert_eq!(mu(Algorithm::Lms, -1.0), MU_FLOOR);
        assert_eq!(mu(Algorithm::Gngd, f64::NAN), MU_FLOOR);
        assert_eq!(mu(Algorithm::Sslms, 0.1), 0.1);
    }

    #[test]
    fn test_ap_mu_below_inverse_order() {
        let limits = LimitTable::standard();
        for order in 1..=64 {
            for mu in [1e-6, 0.01, 0.3, 0.99, 1.0, 5.0].iter() {
                let params = AlgorithmParams::new()
                    .with(ParamKey::Mu, *mu)
                    .with(ParamKey::Order, order as f64);
                let enforced = enforce_stability(Algorithm::Ap, &params, &limits);
                let enforced_mu = enforced.get(ParamKey::Mu).unwrap();
                assert!(enforced_mu <= 1.0 / (order as f64) - AP_MU_MARGIN);
                assert!(enforced_mu >= 1e-6);
            }
        }
    }

    #[test]
    fn test_ap_order_coercion() {
        let limits = LimitTable::standard();
        let params = AlgorithmParams::new()
            .with(ParamKey::Mu, 0.9)
            .with(ParamKey::Order, 2.7);
        let enforced = enforce_stability(Algorithm::Ap, &params, &limits);
        assert_eq!(enforced.get(ParamKey::Order), Some(2.0));
        assert_eq!(enforced.get(ParamKey::Mu), Some(0.5 - AP_MU_MARGIN));

        let params = AlgorithmParams::new().with(ParamKey::Order, 0.0);
        let enforced = enforce_stability(Algorithm::Ap, &params, &limits);
        assert_eq!(enforced.get(ParamKey::Order), Some(1.0));
        // Default mu is already below 1 - 1e-6.
        assert_eq!(enforced.get(ParamKey::Mu), Some(0.05));
    }

    #[test]
    fn test_rls_ranges() {
        let limits = LimitTable::standard();
        let params = AlgorithmParams::new()
            .with(ParamKey::Mu, 0.5)
            .with(ParamKey::Eps, 100.0);
        let enforced = enforce_stability(Algorithm::Rls, &params, &limits);
        assert_eq!(enforced.get(ParamKey::Mu), Some(0.90));
        assert_eq!(enforced.get(ParamKey::Eps), Some(10.0));
    }

    #[test]
    fn test_input_is_not_mutated() {
        let params = AlgorithmParams::new().with(ParamKey::Mu, 2.5);
        let enforcer = StabilityEnforcer::default();
        let enforced = enforcer.enforce(Algorithm::Nlms, &params);
        assert_eq!(params.get(ParamKey::Mu), Some(2.5));
        assert_eq!(enforced.get(ParamKey::Mu), Some(1.95));
        assert_eq!(enforced.get(ParamKey::Eps), Some(1e-3));
    }

    #[test]
    fn test_in_range_values_stay_in_range_and_enforcement_is_idempotent() {
        let limits = LimitTable::standard();
        let enforcer = StabilityEnforcer::new(limits.clone());
        for algorithm in Algorithm::ALL.iter().copied() {
            for fraction in [0.0, 0.25, 0.5, 0.75, 1.0].iter() {
                let mut params = AlgorithmParams::new();
                for key in algorithm.schema().iter().copied() {
                    let limit = limits.get(algorithm, key).unwrap();
                    let mut value = limit.min + fraction * (limit.max - limit.min);
                    if key.is_integer() {
                        value = value.round();
                    }
                    params.set(key, value);
                }
                let once = enforcer.enforce(algorithm, &params);
                for (key, value) in once.iter() {
                    let limit = limits.get(algorithm, *key).unwrap();
                    assert!(limit.contains(*value), "{} {} = {}", algorithm, key, value);
                }
                let twice = enforcer.enforce(algorithm, &once);
                assert_eq!(once, twice);
            }
        }
    }

    #[test]
    fn test_enforce_all() {
        let enforcer = StabilityEnforcer::default();
        let mut set = crate::params::default_parameter_set();
        set.get_mut(Algorithm::Nlms)
            .unwrap()
            .set(ParamKey::Mu, 3.0);
        let enforced = enforcer.enforce_all(&set);
        assert_eq!(
            enforced.get(Algorithm::Nlms).unwrap().get(ParamKey::Mu),
            Some(1.95)
        );
        assert_eq!(
            enforced.get(Algorithm::Lms),
            set.get(Algorithm::Lms)
        );
    }
}
