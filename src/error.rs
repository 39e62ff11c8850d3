use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("unknown isochrone method: {0}")]
    UnknownMethod(String),
    #[error("invalid ranges: {0}")]
    InvalidRanges(String),
    #[error("origin could not be snapped to the road graph")]
    UnreachableOrigin,
    #[error("isochrone computation cancelled")]
    Cancelled,
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether the failure is attributable to the request rather than
    /// the engine. Callers map these to a 4xx-style response.
    pub fn is_bad_request(&self) -> bool {
        matches!(self, Self::UnknownMethod(_) | Self::InvalidRanges(_))
    }
}
