use thiserror::Error;

/// Errors raised while building a generator or producing a single query.
///
/// `InvalidInterval`, `IntervalOutOfRange`, `DuplicateScenario`,
/// `RegistryTooLarge` and `EmptyRegistry` can only happen during construction.
/// Every other variant is local to one generation call and leaves the
/// generator usable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GenError {
    #[error("invalid interval: start {start} is not strictly before end {end}")]
    InvalidInterval { start: String, end: String },

    #[error(
        "interval {start} .. {end} is not representable as i64 nanoseconds since the epoch \
         (supported instants lie between 1677-09-21 and 2262-04-11, spans up to ~292 years)"
    )]
    IntervalOutOfRange { start: String, end: String },

    #[error(
        "invalid duration: window of {requested_nanos}ns does not fit in interval of \
         {available_nanos}ns"
    )]
    InvalidDuration {
        requested_nanos: u128,
        available_nanos: i64,
    },

    #[error("invalid sample size: cannot draw {count} hosts from a fleet of {fleet}")]
    InvalidSampleSize { fleet: usize, count: usize },

    #[error("scenario {scenario} needs {needed} distinct hosts but scale is {scale}")]
    InsufficientFleetSize {
        scenario: &'static str,
        needed: usize,
        scale: usize,
    },

    #[error("invalid scale {0}: fleet size must be at least 1")]
    InvalidScale(usize),

    #[error("unknown scenario: {0}")]
    UnknownScenario(String),

    #[error("scenario registered twice: {0}")]
    DuplicateScenario(String),

    #[error("scenario registry holds {0} entries, at most 65536 are addressable")]
    RegistryTooLarge(usize),

    #[error("scenario registry is empty")]
    EmptyRegistry,
}

pub type Result<T, E = GenError> = std::result::Result<T, E>;
