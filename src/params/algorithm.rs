use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::HarnessError;

/// The adaptive filter algorithms known to the harness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Algorithm {
    /// Least mean squares.
    #[cfg_attr(feature = "serde", serde(rename = "LMS"))]
    Lms,
    /// Normalized least mean squares.
    #[cfg_attr(feature = "serde", serde(rename = "NLMS"))]
    Nlms,
    /// Recursive least squares.
    #[cfg_attr(feature = "serde", serde(rename = "RLS"))]
    Rls,
    /// Affine projection.
    #[cfg_attr(feature = "serde", serde(rename = "AP"))]
    Ap,
    /// Sign-sign least mean squares.
    #[cfg_attr(feature = "serde", serde(rename = "SSLMS"))]
    Sslms,
    /// Normalized least mean fourth.
    #[cfg_attr(feature = "serde", serde(rename = "NLMF"))]
    Nlmf,
    /// Least lncosh.
    Llncosh,
    /// Generalized maximum correntropy criterion.
    #[cfg_attr(feature = "serde", serde(rename = "GMCC"))]
    Gmcc,
    /// Generalized normalized gradient descent.
    #[cfg_attr(feature = "serde", serde(rename = "GNGD"))]
    Gngd,
}

impl Algorithm {
    pub const ALL: [Algorithm; 9] = [
        Algorithm::Lms,
        Algorithm::Nlms,
        Algorithm::Rls,
        Algorithm::Ap,
        Algorithm::Sslms,
        Algorithm::Nlmf,
        Algorithm::Llncosh,
        Algorithm::Gmcc,
        Algorithm::Gngd,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Lms => "LMS",
            Algorithm::Nlms => "NLMS",
            Algorithm::Rls => "RLS",
            Algorithm::Ap => "AP",
            Algorithm::Sslms => "SSLMS",
            Algorithm::Nlmf => "NLMF",
            Algorithm::Llncosh => "Llncosh",
            Algorithm::Gmcc => "GMCC",
            Algorithm::Gngd => "GNGD",
        }
    }

    /// The parameters recognized by this algorithm.
    pub fn schema(self) -> &'static [ParamKey] {
        use ParamKey::*;
        match self {
            Algorithm::Lms | Algorithm::Sslms => &[Mu],
            Algorithm::Nlms | Algorithm::Rls | Algorithm::Nlmf => &[Mu, Eps],
            Algorithm::Ap => &[Mu, Order, Ifc],
            Algorithm::Llncosh => &[Mu, Lambd],
            Algorithm::Gmcc => &[Mu, Lambd, Alpha],
            Algorithm::Gngd => &[Mu, Eps, Ro],
        }
    }

    pub fn accepts(self, key: ParamKey) -> bool {
        self.schema().contains(&key)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = HarnessError;

    /// Parses an algorithm name, ignoring case.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let trimmed = name.trim();
        Algorithm::ALL
            .iter()
            .copied()
            .find(|algorithm| algorithm.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| HarnessError::UnsupportedAlgorithm(name.to_string()))
    }
}

/// Hyperparameter names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ParamKey {
    /// Step size, or the forgetting factor for RLS.
    Mu,
    /// Regularization constant.
    Eps,
    /// Projection order. Integer valued.
    Order,
    /// Initial regularization of the affine projection inverse.
    Ifc,
    /// Shape parameter of the lncosh and correntropy cost functions.
    Lambd,
    /// Exponent of the generalized Gaussian kernel.
    Alpha,
    /// Adaptation rate of the GNGD regularization term.
    Ro,
}

impl ParamKey {
    pub const ALL: [ParamKey; 7] = [
        ParamKey::Mu,
        ParamKey::Eps,
        ParamKey::Order,
        ParamKey::Ifc,
        ParamKey::Lambd,
        ParamKey::Alpha,
        ParamKey::Ro,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ParamKey::Mu => "mu",
            ParamKey::Eps => "eps",
            ParamKey::Order => "order",
            ParamKey::Ifc => "ifc",
            ParamKey::Lambd => "lambd",
            ParamKey::Alpha => "alpha",
            ParamKey::Ro => "ro",
        }
    }

    /// True for parameters that only take integer values.
    pub fn is_integer(self) -> bool {
        matches!(self, ParamKey::Order)
    }
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ParamKey {
    type Err = HarnessError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let trimmed = name.trim();
        ParamKey::ALL
            .iter()
            .copied()
            .find(|key| key.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| HarnessError::validation(format!("unknown parameter '{}'", name)))
    }
}
