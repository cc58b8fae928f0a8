// Every public operation validates its arguments before touching any output
// (or any accumulator), so an Error always means "nothing happened".
//
// The `no_std` crate has its own (Copy-able) error enum. We wrap it here
// rather than exposing it, since the public crate can afford to carry owned
// strings & shapes in the error message.

use microstat_nostd_internal::{InternalError, PathMode};
use thiserror::Error as ThisError;

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
}

/// The underlying internal error type
#[non_exhaustive]
#[derive(Clone, Debug, ThisError)]
enum ErrorKind {
    /// inputs disagree on shape or rank
    #[error(transparent)]
    ShapeMismatch(ShapeMismatchError),
    /// the number of axes lies outside of 1 to 3
    #[error(transparent)]
    InvalidDimension(InvalidDimensionError),
    /// an axis is even where an odd length is required
    #[error(transparent)]
    InvalidParity(InvalidParityError),
    /// 2 lengths that must agree don't
    #[error(transparent)]
    LengthMismatch(LengthMismatchError),
    /// an unrecognized path mode
    #[error(transparent)]
    UnknownMode(UnknownModeError),
    /// even-shaped input to an operation that needs a midpoint
    #[error(transparent)]
    DomainViolation(DomainViolationError),
    /// an ensemble received a statistic other than the one it is locked to
    #[error(transparent)]
    StatisticKind(StatisticKindError),
    /// a required builder parameter was never provided
    #[error(transparent)]
    MissingParameter(MissingParameterError),
    /// a shape that holds a zero-length axis
    #[error(transparent)]
    EmptyAxis(EmptyAxisError),
    /// a lattice-helper failure with no dedicated category
    #[error(transparent)]
    Internal(InternalFailureError),
}

// define constructor methods for Error
impl Error {
    /// produce an error indicating that `what` has the wrong shape
    pub(crate) fn shape_mismatch(what: &'static str, expected: &[usize], actual: &[usize]) -> Self {
        Error {
            kind: ErrorKind::ShapeMismatch(ShapeMismatchError {
                what,
                expected: expected.to_vec(),
                actual: actual.to_vec(),
            }),
        }
    }

    pub(crate) fn invalid_dimension(what: &'static str, actual: usize) -> Self {
        Error {
            kind: ErrorKind::InvalidDimension(InvalidDimensionError { what, actual }),
        }
    }

    pub(crate) fn invalid_parity(what: &'static str, axis: usize, actual: usize) -> Self {
        Error {
            kind: ErrorKind::InvalidParity(InvalidParityError { what, axis, actual }),
        }
    }

    pub(crate) fn length_mismatch(what: &'static str, expected: usize, actual: usize) -> Self {
        Error {
            kind: ErrorKind::LengthMismatch(LengthMismatchError {
                what,
                expected,
                actual,
            }),
        }
    }

    /// produce an error indicating that an unknown path-mode name was given
    pub(crate) fn unknown_mode(actual: &str) -> Self {
        Error {
            kind: ErrorKind::UnknownMode(UnknownModeError {
                actual: actual.to_owned(),
                choices: PathMode::NAMES,
            }),
        }
    }

    pub(crate) fn domain_violation(what: &'static str, axis: usize) -> Self {
        Error {
            kind: ErrorKind::DomainViolation(DomainViolationError { what, axis }),
        }
    }

    /// produce an error indicating that an ensemble locked to the `locked`
    /// statistic was handed a `requested` statistic
    pub(crate) fn statistic_kind(locked: &'static str, requested: &'static str) -> Self {
        Error {
            kind: ErrorKind::StatisticKind(StatisticKindError { locked, requested }),
        }
    }

    pub(crate) fn empty_axis(what: &'static str) -> Self {
        Error {
            kind: ErrorKind::EmptyAxis(EmptyAxisError { what }),
        }
    }

    pub(crate) fn missing_parameter(name: &'static str) -> Self {
        Error {
            kind: ErrorKind::MissingParameter(MissingParameterError { name }),
        }
    }

    /// The name of the failure category, e.g. `"ShapeMismatch"`
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            ErrorKind::ShapeMismatch(_) => "ShapeMismatch",
            ErrorKind::InvalidDimension(_) => "InvalidDimension",
            ErrorKind::InvalidParity(_) => "InvalidParity",
            ErrorKind::LengthMismatch(_) => "LengthMismatch",
            ErrorKind::UnknownMode(_) => "UnknownMode",
            ErrorKind::DomainViolation(_) => "DomainViolation",
            ErrorKind::StatisticKind(_) => "StatisticKind",
            ErrorKind::MissingParameter(_) => "MissingParameter",
            ErrorKind::EmptyAxis(_) => "EmptyAxis",
            ErrorKind::Internal(_) => "Internal",
        }
    }
}

impl std::error::Error for Error {}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.kind, f)
    }
}

impl From<InternalError> for Error {
    fn from(err: InternalError) -> Self {
        match err {
            InternalError::Dimension { what, actual } => Error::invalid_dimension(what, actual),
            InternalError::Parity { what, axis, actual } => Error::invalid_parity(what, axis, actual),
            InternalError::Length {
                what,
                expected,
                actual,
            } => Error::length_mismatch(what, expected, actual),
            InternalError::Domain { what, axis } => Error::domain_violation(what, axis),
            // callers that parse names go through `parse_mode`, which knows
            // the offending string
            InternalError::UnknownMode => Error::unknown_mode("<unknown>"),
            InternalError::EmptyAxis { what } => Error::empty_axis(what),
            other => Error {
                kind: ErrorKind::Internal(InternalFailureError { inner: other }),
            },
        }
    }
}

/// parse a path-mode name, reporting the offending name on failure
pub(crate) fn parse_mode(name: &str) -> Result<PathMode, Error> {
    name.parse::<PathMode>()
        .map_err(|_| Error::unknown_mode(name))
}

#[derive(Clone, Debug, ThisError)]
#[error("{what} has shape {actual:?}, expected {expected:?}")]
struct ShapeMismatchError {
    what: &'static str,
    expected: Vec<usize>,
    actual: Vec<usize>,
}

#[derive(Clone, Debug, ThisError)]
#[error("{what} has {actual} axes. Only 1, 2, or 3 axes are supported")]
struct InvalidDimensionError {
    what: &'static str,
    actual: usize,
}

#[derive(Clone, Debug, ThisError)]
#[error("{what} must be odd shaped, but axis {axis} has length {actual}")]
struct InvalidParityError {
    what: &'static str,
    axis: usize,
    actual: usize,
}

#[derive(Clone, Debug, ThisError)]
#[error("{what} has length {actual}, expected {expected}")]
struct LengthMismatchError {
    what: &'static str,
    expected: usize,
    actual: usize,
}

#[derive(Clone, Debug, ThisError)]
#[error("{actual} is not a path mode. Choices include: {choices:?}")]
struct UnknownModeError {
    actual: String,
    choices: &'static [&'static str],
}

#[derive(Clone, Debug, ThisError)]
#[error("{what} has an even length along axis {axis}, so it has no midpoint")]
struct DomainViolationError {
    what: &'static str,
    axis: usize,
}

/// An error that occurs when an ensemble that already holds one statistic
/// is asked to accumulate a different statistic
#[derive(Clone, Debug, ThisError)]
#[error("the ensemble accumulates {locked}, it can't accumulate {requested}")]
struct StatisticKindError {
    locked: &'static str,
    requested: &'static str,
}

#[derive(Clone, Debug, ThisError)]
#[error("the {name} parameter was never specified")]
struct MissingParameterError {
    name: &'static str,
}

#[derive(Clone, Debug, ThisError)]
#[error("{what} must not have a zero-length axis")]
struct EmptyAxisError {
    what: &'static str,
}

#[derive(Clone, Debug, ThisError)]
#[error("internal failure: {inner}")]
struct InternalFailureError {
    inner: InternalError,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_internal() {
        let err: Error = InternalError::Parity {
            what: "roi",
            axis: 2,
            actual: 4,
        }
        .into();
        assert_eq!(err.kind_name(), "InvalidParity");
        assert_eq!(
            err.to_string(),
            "roi must be odd shaped, but axis 2 has length 4"
        );
    }

    #[test]
    fn wrap_every_internal_kind() {
        let cases: [(InternalError, &str); 5] = [
            (InternalError::Dimension { what: "a", actual: 4 }, "InvalidDimension"),
            (InternalError::Length { what: "b", expected: 2, actual: 3 }, "LengthMismatch"),
            (InternalError::Domain { what: "c", axis: 0 }, "DomainViolation"),
            (InternalError::UnknownMode, "UnknownMode"),
            (InternalError::EmptyAxis { what: "shape" }, "EmptyAxis"),
        ];
        for (internal, kind) in cases {
            assert_eq!(Error::from(internal).kind_name(), kind);
        }
        let err = Error::from(InternalError::EmptyAxis { what: "shape" });
        assert_eq!(err.to_string(), "shape must not have a zero-length axis");
    }

    #[test]
    fn mode_names() {
        assert_eq!(parse_mode("FULL").unwrap(), PathMode::Full);
        let err = parse_mode("dda").unwrap_err();
        assert_eq!(err.kind_name(), "UnknownMode");
        assert!(err.to_string().starts_with("dda is not a path mode"));
    }
}
