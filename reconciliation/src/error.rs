use thiserror::Error;

/// Invalid parameter combination handed to [`crate::ConfigBuilder`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("base {0} is smaller than 2")]
    BaseTooSmall(u64),

    #[error("hash base {0} is smaller than 2")]
    HashBaseTooSmall(u64),

    #[error("block length must be positive")]
    ZeroBlockLength,

    #[error("number of blocks must be positive")]
    ZeroBlocks,

    #[error("error probability {0} is not in [0, 1]")]
    ErrorProbabilityOutOfRange(f64),

    #[error("success rate {0} is not in (0, 1]")]
    SuccessRateOutOfRange(f64),

    /// Two overrides that each pick the acceptance mode were given together,
    /// or adaptive prefix radii were supplied for an error-free channel.
    #[error("conflicting overrides: {0}")]
    ConflictingOverrides(&'static str),

    #[error("expected {expected} prefix radii, got {got}")]
    PrefixRadiiLength { expected: usize, got: usize },

    #[error("prefix radii decrease at index {0}")]
    PrefixRadiiDecreasing(usize),

    #[error("unknown {kind} strategy {value:?}")]
    UnknownStrategy { kind: &'static str, value: String },

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// A numeric routine was queried outside its domain.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("probability {0} is not in [0, 1]")]
    ProbabilityOutOfRange(f64),

    #[error("base {0} is smaller than 2")]
    BaseTooSmall(u64),

    #[error("cannot apportion over zero bins")]
    ZeroBins,

    #[error("binomial oracle: {0}")]
    Oracle(String),

    #[error("error sampler: {0}")]
    Sampler(String),

    #[error("at least one trial is required")]
    ZeroTrials,

    #[error(transparent)]
    Precondition(#[from] PreconditionViolation),
}

/// An acceptance query broke the calling contract of the predicate engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreconditionViolation {
    #[error("incremental check on an empty candidate")]
    EmptyCandidate,

    #[error("candidate spans {got} blocks but the key has {max}")]
    TooManyBlocks { got: usize, max: usize },

    #[error("block index {index} out of range for {num_blocks} blocks")]
    BlockIndexOutOfRange { index: usize, num_blocks: usize },

    #[error("expected a candidate of {expected} blocks, got {got}")]
    OutOfOrder { expected: usize, got: usize },

    #[error("candidate was already rejected at {0} blocks")]
    AlreadyRejected(usize),
}
