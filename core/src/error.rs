use thiserror::Error;

use crate::dump::Format;

pub type Result<T, E = ConvertError> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConvertError {
    #[error("{0} support is not available")]
    LibraryUnavailable(Format),

    #[error("symbols needed for all atypes (atype {atype} has none)")]
    MissingSymbol { atype: usize },

    #[error("atom {atom} has atype {atype}, outside the valid range 1..={ntypes}")]
    AtypeOutOfRange {
        atom: usize,
        atype: usize,
        ntypes: usize,
    },

    #[error("atom {atom} has atype 0, atypes are 1-based")]
    InvalidAtype { atom: usize },

    #[error("expected {expected} {what}, found {found}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("property '{name}' has {found} values, expected one per atom ({expected})")]
    PropertyLength {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("'{0}' is a reserved per-atom property")]
    ReservedProperty(String),

    #[error("unknown element symbol '{0}'")]
    UnknownElement(String),

    #[error("box vectors are linearly dependent")]
    SingularBox,

    #[error("{0}")]
    InvalidParameters(String),

    #[error("axes are not orthogonal")]
    NonOrthogonalAxes,

    #[error("axes are not right-handed")]
    LeftHandedAxes,
}

impl ConvertError {
    pub(crate) fn invalid(details: impl Into<String>) -> Self {
        Self::InvalidParameters(details.into())
    }
}

/// Failure to read or write a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid system: {0}")]
    Invalid(#[from] ConvertError),
}
