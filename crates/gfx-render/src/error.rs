use thiserror::Error;

/// Exceptions the headless context raises, named after their DOM
/// counterparts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeadlessError {
    /// Negative radius, zero-sized image data.
    #[error("IndexSizeError: {0}")]
    IndexSize(String),
    /// Bad `roundRect` radii, oversized image data.
    #[error("RangeError: {0}")]
    Range(String),
    /// Non-finite gradient coordinates.
    #[error("TypeError: {0}")]
    Type(String),
    /// Context lost, or an unusable image source.
    #[error("InvalidStateError: {0}")]
    InvalidState(String),
}
