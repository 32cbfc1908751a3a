use thiserror::Error;

/// Errors that can occur while decoding a stored project
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// A kit sound has no track record in the project
    #[error("project has no track for sound `{sound}`")]
    MissingTrack { sound: String },

    /// The record read for a kit sound has a missing or malformed lane
    #[error("track for sound `{sound}` has malformed lanes: {reason}")]
    MalformedTrack { sound: String, reason: String },
}
