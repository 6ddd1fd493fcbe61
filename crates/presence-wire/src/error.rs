use thiserror::Error;

/// Result type alias for codec operations
pub type Result<T> = std::result::Result<T, WireError>;

/// Errors produced while decoding a wire message
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WireError {
	/// A `DATA:` payload did not split into exactly five fields
	#[error("malformed data packet: expected 5 fields, got {fields}")]
	MalformedData { fields: usize },

	/// The payload carried neither a heartbeat nor a data tag
	#[error("unrecognized message")]
	UnrecognizedMessage,
}
