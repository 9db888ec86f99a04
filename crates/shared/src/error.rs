use thiserror::Error;

/// Reasons a wire pixel record cannot become a board [`crate::domain::Cell`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CellDecodeError {
    #[error("coordinate ({x}, {y}) is outside the board")]
    OutOfBounds { x: i64, y: i64 },
    #[error("invalid hex color {0:?}")]
    InvalidColor(String),
    #[error("pixel ({x}, {y}) has no owner")]
    MissingOwner { x: i64, y: i64 },
}

/// A response body that decoded as JSON but does not carry what the client needs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    #[error("server reported success=false")]
    Rejected,
    #[error("response is missing field `{0}`")]
    MissingField(&'static str),
}
