use super::{
    AdaptiveFilter, ApFilter, FilterResult, GmccFilter, GngdFilter, LlncoshFilter, LmsFilter,
    NlmfFilter, NlmsFilter, RlsFilter, SignSignLmsFilter,
};
use crate::error::{HarnessError, HarnessResult};
use crate::params::{default_value, Algorithm, AlgorithmParams, ParamKey};
use crate::signal::HistoryMatrix;

/// Looks up `key`, falling back to the algorithm default.
fn param(algorithm: Algorithm, params: &AlgorithmParams, key: ParamKey) -> f64 {
    params
        .get(key)
        .or_else(|| default_value(algorithm, key))
        .unwrap_or(0.0)
}

/// Creates a zero initialized filter of `taps` weights.
/// Missing parameters take their default values. Values are used as given,
/// run them through [`enforce_stability`](crate::params::enforce_stability) first.
/// The AP projection order is capped at `max_order`, the number of input
/// vectors the filter will see.
pub fn build_filter(
    algorithm: Algorithm,
    taps: usize,
    max_order: usize,
    params: &AlgorithmParams,
) -> Box<dyn AdaptiveFilter> {
    let p = |key| param(algorithm, params, key);
    match algorithm {
        Algorithm::Lms => Box::new(LmsFilter::new(taps, p(ParamKey::Mu))),
        Algorithm::Nlms => Box::new(NlmsFilter::from_options(
            taps,
            p(ParamKey::Mu),
            p(ParamKey::Eps),
        )),
        Algorithm::Rls => Box::new(RlsFilter::new(taps, p(ParamKey::Mu), p(ParamKey::Eps))),
        Algorithm::Ap => Box::new(ApFilter::new(
            taps,
            p(ParamKey::Mu),
            (p(ParamKey::Order).round().max(1.0) as usize).min(max_order.max(1)),
            p(ParamKey::Ifc),
        )),
        Algorithm::Sslms => Box::new(SignSignLmsFilter::new(taps, p(ParamKey::Mu))),
        Algorithm::Nlmf => Box::new(NlmfFilter::new(taps, p(ParamKey::Mu), p(ParamKey::Eps))),
        Algorithm::Llncosh => Box::new(LlncoshFilter::new(
            taps,
            p(ParamKey::Mu),
            p(ParamKey::Lambd),
        )),
        Algorithm::Gmcc => Box::new(GmccFilter::new(
            taps,
            p(ParamKey::Mu),
            p(ParamKey::Lambd),
            p(ParamKey::Alpha),
        )),
        Algorithm::Gngd => Box::new(GngdFilter::new(
            taps,
            p(ParamKey::Mu),
            p(ParamKey::Eps),
            p(ParamKey::Ro),
        )),
    }
}

/// Runs a fresh filter over `history` towards the aligned target `d`.
/// No state survives between calls.
pub fn run_filter(
    algorithm: Algorithm,
    d: &[f64],
    history: &HistoryMatrix,
    params: &AlgorithmParams,
) -> HarnessResult<FilterResult> {
    if d.len() != history.rows() {
        return Err(HarnessError::validation(format!(
            "target length ({}) does not match history rows ({})",
            d.len(),
            history.rows()
        )));
    }
    let mut filter = build_filter(algorithm, history.taps(), history.rows(), params);
    Ok(filter.run(d, history))
}
