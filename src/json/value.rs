use crate::number;

use super::{find_property, JsonKind, JsonProperty, Result};

impl<'a> JsonProperty<'a> {
    /// The string contents of a [`JsonKind::Text`] value
    ///
    /// Escape sequences are left as they are.
    pub fn as_str(&self) -> Option<&'a str> {
        match self.kind {
            JsonKind::Text => core::str::from_utf8(self.value).ok(),
            _ => None,
        }
    }

    /// The value of a [`JsonKind::Bool`] that reads exactly `true` or `false`
    pub fn as_bool(&self) -> Option<bool> {
        match (self.kind, self.value) {
            (JsonKind::Bool, b"true") => Some(true),
            (JsonKind::Bool, b"false") => Some(false),
            _ => None,
        }
    }

    /// Parses a [`JsonKind::Int`] value; `None` on overflow or stray bytes
    pub fn as_i64(&self) -> Option<i64> {
        match self.kind {
            JsonKind::Int => number::parse_i64(self.value.trim_ascii_end()),
            _ => None,
        }
    }

    /// Parses a non negative [`JsonKind::Int`] value; `None` on overflow or stray bytes
    pub fn as_u64(&self) -> Option<u64> {
        match self.kind {
            JsonKind::Int => number::parse_u64(self.value.trim_ascii_end()),
            _ => None,
        }
    }

    /// Parses a [`JsonKind::Int`] or [`JsonKind::Float`] value
    pub fn as_f64(&self) -> Option<f64> {
        match self.kind {
            JsonKind::Int | JsonKind::Float => core::str::from_utf8(self.value.trim_ascii_end())
                .ok()?
                .parse()
                .ok(),
            _ => None,
        }
    }

    /// Returns `true` for a `null` value
    pub fn is_null(&self) -> bool {
        self.kind == JsonKind::Null
    }

    /// Locates `name` inside this object or array
    ///
    /// Any other kind of value yields [`JsonKind::NotFound`].
    pub fn find(&self, name: &str) -> Result<JsonProperty<'a>> {
        match self.kind {
            JsonKind::Object | JsonKind::Array => find_property(self.value, name),
            _ => Ok(JsonProperty::NOT_FOUND),
        }
    }
}
