//! Response envelope module
//!
//! Parses `{stat, response, metadata?}` bodies and maps `stat = FAIL` to
//! [`crate::Error::Api`].

mod decoders;
mod types;

pub use decoders::{decode_envelope, is_fail_body};
pub use types::{Envelope, OffsetMetadata, Stat};

pub(crate) use types::lenient_u64;
