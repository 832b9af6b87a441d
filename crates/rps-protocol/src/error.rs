//! Error types for the protocol layer.

/// Errors that can occur while encoding or decoding messages.
///
/// The inner `serde_json::Error` is kept so the log line for a bad frame
/// says exactly which field or byte was wrong.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a message into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed: malformed JSON, an unknown `type` tag,
    /// or a field of the wrong type.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),
}
