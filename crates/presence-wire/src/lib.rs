pub mod codec;
pub mod error;
pub mod record;

pub use codec::Message;
pub use error::WireError;
pub use record::{Record, Specialization, DESCRIPTION_MAX_LEN};
