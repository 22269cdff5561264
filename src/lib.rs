//! In-place, allocation-free scanning of query strings and JSON for `no_std` programs
//!
//! This crate is aimed at applications that run on resource constrained devices and receive
//! small messages over a network or cellular link. Nothing is copied out of the input: every
//! result is a view into the caller's buffer.
//!
//! # Current features
//!
//! - [`qs`]: split `key=value&key=value` into a fixed capacity [`Dictionary`], overwriting the
//!   delimiters in place, and look values up by key.
//! - [`json`]: locate a named property in a JSON document and classify its value (object,
//!   array, string, boolean, null, integer, float) without parsing the rest of the document.
//! - [`de`]: deserialize a struct from a [`Dictionary`] with `serde`. `&str` fields are zero copy.
//! - [`str`]: substring search, byte replacement and percent-escape decoding on byte slices.
//!
//! Malformed input never panics or fails hard. It degrades to fewer results, and the reason is
//! reported through [`BuildOutcome`], [`Lookup`] and [`JsonKind::NotFound`].
//!
//! # Non-features
//!
//! This is explicitly out of scope
//!
//! - Anything that involves dynamic memory allocation
//! - Validating JSON, decoding JSON string escapes, or parsing numbers beyond plain decimals
//! - Streaming input; the whole message has to be in memory
//! - Serialization
//!
//! # Cargo features
//!
//! - `defmt`: trace logging through `defmt`, and `defmt::Format` on all public result types
//! - `embedded-io`: `Dictionary::lookup_write` into an `embedded_io::Write` sink
//! - `std`: `std::error::Error` impls
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(missing_docs)]

// must come first so the logging macros are visible in the other modules
mod fmt;

mod number;

pub mod de;
pub mod json;
pub mod qs;
pub mod str;

#[doc(inline)]
pub use self::de::from_dictionary;
#[doc(inline)]
pub use self::json::{find_property, JsonKind, JsonProperty};
#[doc(inline)]
pub use self::qs::{BuildOutcome, Dictionary, Entry, Lookup, Truncation, MAX_ENTRIES};
