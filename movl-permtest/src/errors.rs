use thiserror::Error;

/// Failure of the weighted random placement machinery.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlacementError {
    /// No permitted free interval can hold a region of the requested length.
    #[error("no free region fits an interval of length {len}")]
    WontFit { len: u32 },
}

/// Statistical precondition failures.
///
/// All variants are local, recoverable conditions: the caller decides how to
/// report them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatsError {
    /// The distribution holds no data at all.
    #[error("distribution has no samples")]
    Empty,

    /// Samples were added but the distribution was never evaluated, or a
    /// later addition invalidated the evaluation.
    #[error("distribution has not been evaluated")]
    NotEvaluated,

    /// The operation needs at least two samples.
    #[error("at least two samples are required")]
    InsufficientData,

    /// No pass ever produced this multiplicity.
    #[error("multiplicity {0} was not seen by any pass")]
    MultiplicityNotFound(u32),
}
