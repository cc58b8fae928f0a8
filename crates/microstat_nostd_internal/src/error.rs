//! The error type used throughout this crate.
//!
//! We used to return `&'static str` everywhere. The public crate needs to
//! report *which* argument was problematic and *why*, so each failure mode
//! gets its own variant. The public crate wraps these (see
//! `microstat::Error`), which means this type can stay small and `Copy`.

/// Errors produced by the lattice helpers in this crate
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InternalError {
    /// the number of axes lies outside of the supported range (1 to 3)
    Dimension {
        what: &'static str,
        actual: usize,
    },
    /// an axis has an even length where an odd length is required
    Parity {
        what: &'static str,
        axis: usize,
        actual: usize,
    },
    /// two arguments that must have matching lengths don't
    Length {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    /// even-shaped input handed to an operation that needs a midpoint
    Domain { what: &'static str, axis: usize },
    /// an unrecognized path-tracing mode
    UnknownMode,
    /// a shape holding a zero-length axis
    EmptyAxis { what: &'static str },
}

impl core::fmt::Display for InternalError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match *self {
            InternalError::Dimension { what, actual } => write!(
                f,
                "{what} has {actual} axes. Only 1, 2, or 3 axes are supported"
            ),
            InternalError::Parity { what, axis, actual } => write!(
                f,
                "{what} must be odd shaped, but axis {axis} has length {actual}"
            ),
            InternalError::Length {
                what,
                expected,
                actual,
            } => write!(f, "{what} has length {actual}, expected {expected}"),
            InternalError::Domain { what, axis } => write!(
                f,
                "{what} has an even length along axis {axis}, so it has no midpoint"
            ),
            InternalError::UnknownMode => write!(f, "unknown path mode"),
            InternalError::EmptyAxis { what } => write!(f, "{what} must not hold 0"),
        }
    }
}
