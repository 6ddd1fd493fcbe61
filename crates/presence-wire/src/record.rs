use std::fmt;

/// Longest description a record may carry, in characters.
pub const DESCRIPTION_MAX_LEN: usize = 255;

/// The five-field informational record a client submits.
///
/// Field order is fixed by the wire format: surname, phone, age,
/// specialization code, free-text description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
	pub surname: String,
	pub phone: String,
	pub age: i64,
	pub spec_code: i64,
	pub description: String,
}

impl Record {
	/// Resolve the specialization code to its display variant.
	#[must_use]
	pub fn specialization(&self) -> Specialization {
		Specialization::from(self.spec_code)
	}
}

/// Closed set of specialization display names. Codes outside {1, 2, 3, 4}
/// resolve to `Unknown` rather than failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Specialization {
	Networks,
	Databases,
	Cybersecurity,
	CloudComputing,
	Unknown,
}

impl From<i64> for Specialization {
	fn from(code: i64) -> Self {
		match code {
			1 => Self::Networks,
			2 => Self::Databases,
			3 => Self::Cybersecurity,
			4 => Self::CloudComputing,
			_ => Self::Unknown,
		}
	}
}

impl fmt::Display for Specialization {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Self::Networks => "Networks",
			Self::Databases => "Databases",
			Self::Cybersecurity => "Cybersecurity",
			Self::CloudComputing => "Cloud Computing",
			Self::Unknown => "Unknown",
		};
		write!(f, "{name}")
	}
}
