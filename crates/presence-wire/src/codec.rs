use crate::error::{Result, WireError};
use crate::record::Record;

/// Literal payload of a keepalive ping.
pub const HEARTBEAT: &str = "HEARTBEAT";

/// Tag prefixing every data record payload.
pub const DATA_PREFIX: &str = "DATA:";

/// Two-character delimiter joining record fields.
pub const FIELD_DELIMITER: &str = "||";

const FIELD_COUNT: usize = 5;

/// A decoded wire message.
///
/// The protocol has exactly two message kinds; anything else on the
/// stream is a decode error, never a partial message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
	Heartbeat,
	Data(Record),
}

impl Message {
	/// Encode a message to its byte payload.
	///
	/// Heartbeats encode to the bare `HEARTBEAT` literal; records encode
	/// to `DATA:` followed by the five fields joined with `||`.
	#[must_use]
	pub fn encode(&self) -> Vec<u8> {
		match self {
			Self::Heartbeat => HEARTBEAT.as_bytes().to_vec(),
			Self::Data(record) => format!(
				"{DATA_PREFIX}{}{FIELD_DELIMITER}{}{FIELD_DELIMITER}{}{FIELD_DELIMITER}{}{FIELD_DELIMITER}{}",
				record.surname, record.phone, record.age, record.spec_code, record.description
			)
			.into_bytes(),
		}
	}

	/// Decode one message from a byte payload.
	///
	/// Surrounding whitespace is trimmed before matching. A `DATA:`
	/// payload must split into exactly five fields; the two integer
	/// fields parse permissively, with non-numeric text becoming 0.
	///
	/// # Errors
	/// Returns [`WireError::MalformedData`] when a `DATA:` payload has
	/// the wrong field count, and [`WireError::UnrecognizedMessage`] for
	/// any payload that carries neither known tag.
	pub fn decode(bytes: &[u8]) -> Result<Self> {
		let text = String::from_utf8_lossy(bytes);
		let text = text.trim();

		if text == HEARTBEAT {
			return Ok(Self::Heartbeat);
		}

		if let Some(body) = text.strip_prefix(DATA_PREFIX) {
			let fields: Vec<&str> = body.split(FIELD_DELIMITER).collect();
			if fields.len() != FIELD_COUNT {
				return Err(WireError::MalformedData { fields: fields.len() });
			}

			return Ok(Self::Data(Record {
				surname: fields[0].to_string(),
				phone: fields[1].to_string(),
				age: parse_int(fields[2]),
				spec_code: parse_int(fields[3]),
				description: fields[4].to_string(),
			}));
		}

		Err(WireError::UnrecognizedMessage)
	}
}

// Permissive by choice: a non-numeric integer field becomes 0 instead of
// failing the whole packet.
fn parse_int(field: &str) -> i64 {
	field.trim().parse().unwrap_or(0)
}
