//! Data file decoding.
//!
//! The decoder follows a layered structure:
//! - `layout`: field widths, section sizes and bit masks (source of truth)
//! - `profile`: byte order and string policy, the only axes of variation
//! - `reader`: strict and probing primitive reads over a forward-only source
//! - `sections`: fixed header sections, read field by field in file order
//! - `payload`: record loops that run until the source is exhausted
//! - `dispatch`: type-code driven choice of sections and payload
//! - `error`: explicit, actionable errors
//!
//! Nothing here opens files; callers hand in any `Read`.

pub mod dispatch;
pub mod error;
pub mod layout;
pub mod payload;
pub mod profile;
pub mod reader;
pub mod sections;

pub use dispatch::{Decoder, decode};
pub use error::DecodeError;
pub use payload::{ChannelWord, format_ip_address};
pub use profile::{Endian, FormatProfile, ProfileParseError, StringPolicy};
pub use reader::FieldReader;
