use thiserror::Error;

/// Failures of a single pipeline run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// `max_age` or `resolution` is not a positive integer.
    #[error("invalid configuration: max_age={max_age}, resolution={resolution} (both must be > 0)")]
    InvalidConfiguration { max_age: u32, resolution: u32 },

    /// A stage received a series with no samples.
    #[error("series has no samples")]
    EmptySeries,

    /// The accumulated total cannot be halved meaningfully.
    #[error("degenerate total weight: {total}")]
    DegenerateTotal { total: f64 },
}

pub type ModelResult<T> = std::result::Result<T, ModelError>;
