use presence_wire::{Record, DESCRIPTION_MAX_LEN};
use std::{io, net::SocketAddr};
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors surfaced by client operations
#[derive(Debug, Error)]
pub enum ClientError {
	/// The transport could not establish the connection. No retry.
	#[error("failed to connect to {addr}: {source}")]
	Connect { addr: SocketAddr, source: io::Error },

	/// Mid-session I/O failure; the session is torn down.
	#[error("transport error: {0}")]
	Transport(#[from] io::Error),

	/// A send was attempted outside the `Connected` state.
	#[error("not connected to a server")]
	NotConnected,

	/// The record failed validation; the stream was never touched.
	#[error(transparent)]
	Validation(#[from] ValidationError),
}

/// Outbound record checks performed before any encoding or I/O
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
	#[error("surname must not be empty")]
	EmptySurname,

	#[error("phone must not be empty")]
	EmptyPhone,

	#[error("description is too long ({len} characters, maximum {DESCRIPTION_MAX_LEN})")]
	DescriptionTooLong { len: usize },
}

/// Validate a record against the outbound field rules.
///
/// # Errors
/// Returns the first violated rule: empty surname, empty phone or an
/// over-long description.
pub fn validate(record: &Record) -> std::result::Result<(), ValidationError> {
	if record.surname.trim().is_empty() {
		return Err(ValidationError::EmptySurname);
	}
	if record.phone.trim().is_empty() {
		return Err(ValidationError::EmptyPhone);
	}
	let len = record.description.chars().count();
	if len > DESCRIPTION_MAX_LEN {
		return Err(ValidationError::DescriptionTooLong { len });
	}
	Ok(())
}
