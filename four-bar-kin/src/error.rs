use crate::{FourBarTy, LinkSet};

/// Result type of this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error of the kinematic analysis.
///
/// The variants are split by recovery policy. [`Error::MechanismInvalid`]
/// and [`Error::InvalidParameter`] abort the analysis before any solve,
/// [`Error::SingularConfiguration`] is recovered by the sweep, and
/// [`Error::InsufficientSamples`] means the linkage passed validation but the
/// sweep produced too few frames to differentiate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The linkage fails the Grashof condition, no link can fully rotate.
    #[error("mechanism cannot rotate fully: {ty} ({links})")]
    MechanismInvalid {
        /// Rejected link lengths
        links: LinkSet,
        /// Classification of the rejected linkage
        ty: FourBarTy,
    },
    /// The position solver did not converge at an input angle.
    #[error("solver did not converge at input angle {theta2:.6} rad after {evals} evaluations")]
    SingularConfiguration {
        /// Input angle in radians
        theta2: f64,
        /// Residual evaluations spent
        evals: usize,
    },
    /// Too few samples for the finite differences.
    #[error("insufficient samples: got {len}, need at least {min}")]
    InsufficientSamples {
        /// Number of samples provided
        len: usize,
        /// Minimum number of samples
        min: usize,
    },
    /// A parameter is out of its domain.
    #[error("invalid parameter `{name}`: {value}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Rejected value
        value: f64,
    },
    /// The position and time series have different lengths.
    #[error("series length mismatch: {pos} positions, {time} time samples")]
    LengthMismatch {
        /// Length of the position series
        pos: usize,
        /// Length of the time series
        time: usize,
    },
    /// The time series does not increase at an index.
    #[error("time series is not strictly increasing at index {index}")]
    NonIncreasingTime {
        /// Index of the first offending sample
        index: usize,
    },
    /// CSV serialization failed.
    #[cfg(feature = "csv")]
    #[cfg_attr(doc_cfg, doc(cfg(feature = "csv")))]
    #[error("csv: {0}")]
    Csv(String),
}

impl Error {
    /// Return true if the error only affects a single step of the sweep.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::SingularConfiguration { .. })
    }

    /// Short machine-readable name of the error kind.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::MechanismInvalid { .. } => "mechanism_invalid",
            Self::SingularConfiguration { .. } => "singular_configuration",
            Self::InsufficientSamples { .. } => "insufficient_samples",
            Self::InvalidParameter { .. } => "invalid_parameter",
            Self::LengthMismatch { .. } => "length_mismatch",
            Self::NonIncreasingTime { .. } => "non_increasing_time",
            #[cfg(feature = "csv")]
            Self::Csv(_) => "csv",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let err = Error::InsufficientSamples { len: 1, min: 2 };
        assert_eq!(err.to_string(), "insufficient samples: got 1, need at least 2");
        let err = Error::InvalidParameter { name: "rpm", value: 0. };
        assert_eq!(err.to_string(), "invalid parameter `rpm`: 0");
        let err = Error::MechanismInvalid {
            links: LinkSet::new(1., 5., 1., 1.),
            ty: FourBarTy::Invalid,
        };
        assert!(err.to_string().starts_with("mechanism cannot rotate fully"));
    }

    #[test]
    fn only_singular_is_recoverable() {
        assert!(Error::SingularConfiguration { theta2: 0.1, evals: 200 }.is_recoverable());
        assert!(!Error::InsufficientSamples { len: 0, min: 2 }.is_recoverable());
        let err = Error::MechanismInvalid {
            links: LinkSet::new(1., 5., 1., 1.),
            ty: FourBarTy::Invalid,
        };
        assert!(!err.is_recoverable());
        assert_eq!(err.kind(), "mechanism_invalid");
    }
}
