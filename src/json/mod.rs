//! Locate a named property in a JSON document without parsing it
//!
//! The locator does a substring search for `"name"`, so it finds the first occurrence of the name
//! at any nesting depth, including inside string values. Values are classified by their first
//! byte and measured, not validated.
//!
//! ```
//! use qs_json_core::json::{find_property, JsonKind};
//!
//! let json = br#"{"cmd":"reboot","delay":30,"opts":{"hard":true}}"#;
//!
//! let cmd = find_property(json, "cmd").unwrap();
//! assert_eq!(cmd.kind, JsonKind::Text);
//! assert_eq!(cmd.value, b"reboot");
//!
//! let opts = find_property(json, "opts").unwrap();
//! assert_eq!(opts.kind, JsonKind::Object);
//! assert_eq!(opts.find("hard").unwrap().as_bool(), Some(true));
//! ```

use core::fmt;

use heapless::Vec;

pub use self::block::{block_length, scan_block, BlockSpan};

mod block;
mod value;

/// Longest property name [`find_property`] accepts, in bytes
pub const MAX_NAME_LEN: usize = PATTERN_CAPACITY - 2;

// name plus the surrounding quotes
const PATTERN_CAPACITY: usize = 40;

/// Property lookup result
pub type Result<T> = core::result::Result<T, Error>;

/// This type represents all possible errors that can occur when locating a property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The property name is longer than [`MAX_NAME_LEN`] bytes.
    NameTooLong,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NameTooLong => write!(
                f,
                "Property name is longer than {} bytes.",
                MAX_NAME_LEN
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// What a located value looks like, judging by its first byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum JsonKind {
    /// `{...}`
    Object,
    /// `[...]`
    Array,
    /// `"..."`
    Text,
    /// `true` or `false`
    Bool,
    /// Anything not recognized otherwise, without a `.` past its first byte
    Int,
    /// Anything not recognized otherwise, with a `.` past its first byte
    Float,
    /// `null`
    Null,
    /// The property isn't there.
    NotFound,
}

/// A value located in a JSON buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct JsonProperty<'a> {
    /// The value bytes; for [`JsonKind::Text`] the quotes are excluded, for objects and arrays
    /// the delimiters are included. Empty when not found.
    pub value: &'a [u8],
    /// How the value was classified
    pub kind: JsonKind,
}

impl<'a> JsonProperty<'a> {
    /// The result for a property that isn't there
    pub const NOT_FOUND: JsonProperty<'static> = JsonProperty {
        value: &[],
        kind: JsonKind::NotFound,
    };

    /// Length of the value in bytes
    pub fn len(&self) -> usize {
        self.value.len()
    }

    /// Returns `true` if the value span is empty
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Returns `true` unless the kind is [`JsonKind::NotFound`]
    pub fn is_found(&self) -> bool {
        self.kind != JsonKind::NotFound
    }
}

/// Locates the value of the property `name` in `json`
///
/// `json` is scanned up to its first NUL byte, or to its end. A missing property, a name with no
/// `:` after it, or a `:` followed only by blanks gives [`JsonKind::NotFound`]. The only error is
/// a name longer than [`MAX_NAME_LEN`].
pub fn find_property<'a>(json: &'a [u8], name: &str) -> Result<JsonProperty<'a>> {
    if name.len() > MAX_NAME_LEN {
        debug!("property name too long: {} bytes", name.len());
        return Err(Error::NameTooLong);
    }

    let mut pattern: Vec<u8, PATTERN_CAPACITY> = Vec::new();
    pattern.push(b'"').map_err(|_| Error::NameTooLong)?;
    pattern
        .extend_from_slice(name.as_bytes())
        .map_err(|_| Error::NameTooLong)?;
    pattern.push(b'"').map_err(|_| Error::NameTooLong)?;

    let end = json.iter().position(|&c| c == b'\0').unwrap_or(json.len());
    let json = &json[..end];

    let Some(name_at) = crate::str::find(json, &pattern) else {
        trace!("property {=str} not found", name);
        return Ok(JsonProperty::NOT_FOUND);
    };

    let mut next = name_at + pattern.len();
    let Some(colon) = json[next..].iter().position(|&c| c == b':') else {
        trace!("property {=str} has no value", name);
        return Ok(JsonProperty::NOT_FOUND);
    };
    next += colon + 1;

    while next < json.len() && matches!(json[next], b' ' | b'\t') {
        next += 1;
    }
    let Some(&first) = json.get(next) else {
        trace!("property {=str} has no value", name);
        return Ok(JsonProperty::NOT_FOUND);
    };

    // fixed size literals are cut short at the end of the input
    let literal = |len: usize| next..json.len().min(next + len);

    let (kind, span) = match first {
        b'{' => (
            JsonKind::Object,
            next..next + block_length(json, next, b'{', b'}'),
        ),
        b'[' => (
            JsonKind::Array,
            next..next + block_length(json, next, b'[', b']'),
        ),
        b'"' => {
            let start = next + 1;
            let len = json[start..]
                .iter()
                .position(|&c| c == b'"')
                .unwrap_or(json.len() - start);
            (JsonKind::Text, start..start + len)
        }
        b't' => (JsonKind::Bool, literal(4)),
        b'f' => (JsonKind::Bool, literal(5)),
        b'n' => (JsonKind::Null, literal(4)),
        _ => {
            let len = json[next..]
                .iter()
                .position(|&c| c == b',' || c == b'}')
                .unwrap_or(json.len() - next);
            let span = next..next + len;
            // a leading `.` doesn't count
            let kind = if json[span.clone()].iter().skip(1).any(|&c| c == b'.') {
                JsonKind::Float
            } else {
                JsonKind::Int
            };
            (kind, span)
        }
    };

    let property = JsonProperty {
        value: &json[span],
        kind,
    };
    trace!("property {=str}: {}", name, property);

    Ok(property)
}
