/// Alias for `Result<T, StateError>`.
pub type StateResult<T> = Result<T, StateError>;

/// Errors that can occur when manipulating player state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    /// The requested memory is not part of the player's memory catalog.
    #[error("memory not found: \"{0}\"")]
    MemoryNotFound(String),

    /// Influence bounds where the minimum exceeds the maximum.
    #[error("invalid influence bounds: min {min} > max {max}")]
    InvalidBounds {
        /// Requested lower bound.
        min: i32,
        /// Requested upper bound.
        max: i32,
    },
}
