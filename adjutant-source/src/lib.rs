//! Role table sources for the Adjutant cache.
//!
//! [`HttpRoleSource`] fetches the table with a single HTTP GET and parses the
//! JSON body into wire records.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod http;
mod payload;

pub use http::{HttpRoleSource, SourceConfig};
pub use payload::parse_payload;
