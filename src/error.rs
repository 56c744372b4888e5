use num_bigint::BigInt;
use thiserror::Error;

/// Range violations for share values and reconstructed secrets.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("value must be a positive integer, got {0}")]
    NonPositive(BigInt),
    #[error("value exceeds the {bits}-bit range")]
    ExceedsBound { bits: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("failed to decode value {value:?} with base {base}: unsupported base")]
    UnsupportedBase { base: u32, value: String },
    #[error("failed to decode value {value:?} with base {base}: no digits")]
    NoDigits { base: u32, value: String },
    #[error("failed to decode value {value:?} with base {base}: {reason}")]
    OutOfRange {
        base: u32,
        value: String,
        #[source]
        reason: RangeError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid input: n ({n}) must be greater than or equal to k ({k})")]
    ThresholdExceedsTotal { n: u64, k: u64 },
    #[error("invalid input: threshold k must be at least 1")]
    ZeroThreshold,
    #[error("not enough shares provided: need {needed}, got {got}")]
    InsufficientShares { needed: u64, got: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterpolationError {
    #[error("invalid x values: division by zero (x = {0} appears more than once)")]
    DivisionByZero(i64),
    #[error("no points to interpolate")]
    NoPoints,
    #[error("interpolated value {numerator}/{denominator} is not an integer")]
    InexactDivision {
        numerator: BigInt,
        denominator: BigInt,
    },
    #[error("reconstructed secret out of range: {0}")]
    Range(#[from] RangeError),
}

/// Failures turning an identifier into a typed test case.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("document is not a JSON object")]
    NotAnObject,
    #[error("document has no \"keys\" entry")]
    MissingKeys,
    #[error("invalid \"keys\" entry: {0}")]
    InvalidKeys(String),
    #[error("share key {0:?} is not an integer index")]
    InvalidShareIndex(String),
    #[error("invalid share entry {key:?}: {reason}")]
    InvalidShareEntry { key: String, reason: String },
    #[error("no document named {0:?}")]
    NotFound(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("bound width must be between 1 and {max} bits, got {bits}")]
    BoundBits { bits: u32, max: u32 },
}

/// Everything that can go wrong for a single test case.
#[derive(Debug, Error)]
pub enum ReconstructError {
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Interpolation(#[from] InterpolationError),
}

pub type ReconstructResult<T> = Result<T, ReconstructError>;
