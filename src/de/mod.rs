//! Deserialize a Rust data structure from a query string [`Dictionary`]
//!
//! ```
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Settings<'a> {
//!     apn: &'a str,
//!     interval: u16,
//!     verbose: bool,
//!     band: Option<u8>,
//! }
//!
//! let mut buf = *b"apn=iot.example&interval=300&verbose=1";
//! let dict = qs_json_core::qs::build(&mut buf);
//! let settings: Settings<'_> = qs_json_core::from_dictionary(&dict).unwrap();
//!
//! assert_eq!(settings.apn, "iot.example");
//! assert_eq!(settings.interval, 300);
//! assert!(settings.verbose);
//! assert_eq!(settings.band, None);
//! ```

use core::fmt;

use serde::de::{self, Visitor};

use crate::number;
use crate::qs::Dictionary;

use self::map::MapAccess;

mod map;

/// Deserialization result
pub type Result<T> = core::result::Result<T, Error>;

/// This type represents all possible errors that can occur when deserializing a dictionary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum Error {
    /// A key or value isn't valid UTF-8.
    InvalidUtf8,

    /// Invalid number.
    InvalidNumber,

    /// Expected `true`, `false`, `1` or `0`.
    InvalidBool,

    /// Invalid type
    InvalidType,

    /// The value doesn't name a variant of the enum.
    UnknownVariant,

    /// A required field has no key in the dictionary.
    MissingField,

    /// Error with a message from a `Deserialize` implementation; the message is dropped.
    Custom,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Error::InvalidUtf8 => "A key or value isn't valid UTF-8.",
                Error::InvalidNumber => "Invalid number.",
                Error::InvalidBool => {
                    "Expected this value to be one of `true`, `false`, `1` \
                     or `0`."
                }
                Error::InvalidType => "Invalid type",
                Error::UnknownVariant => "Unknown enum variant.",
                Error::MissingField => "Missing field.",
                Error::Custom => "Deserialization failed.",
            }
        )
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl de::Error for Error {
    fn custom<T>(_msg: T) -> Self
    where
        T: fmt::Display,
    {
        Error::Custom
    }

    fn missing_field(_field: &'static str) -> Self {
        Error::MissingField
    }

    fn unknown_variant(_variant: &str, _expected: &'static [&'static str]) -> Self {
        Error::UnknownVariant
    }
}

fn utf8(bytes: &[u8]) -> Result<&str> {
    core::str::from_utf8(bytes).map_err(|_| Error::InvalidUtf8)
}

/// Reads the whole dictionary as a map or struct
pub(crate) struct Deserializer<'de, 'd, const N: usize> {
    dict: &'d Dictionary<'de, N>,
}

impl<'de, 'd, const N: usize> Deserializer<'de, 'd, N> {
    fn new(dict: &'d Dictionary<'de, N>) -> Self {
        Deserializer { dict }
    }
}

impl<'de, 'd, const N: usize> de::Deserializer<'de> for Deserializer<'de, 'd, N> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_map(MapAccess::new(self.dict))
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_map(MapAccess::new(self.dict))
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    serde::forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf option unit unit_struct seq tuple
        tuple_struct map enum identifier ignored_any
    }
}

/// Reads a single value
pub(crate) struct ValueDeserializer<'de> {
    value: &'de [u8],
}

impl<'de> ValueDeserializer<'de> {
    pub(crate) fn new(value: &'de [u8]) -> Self {
        ValueDeserializer { value }
    }

    fn parse_str(&self) -> Result<&'de str> {
        utf8(self.value)
    }
}

macro_rules! deserialize_integer {
    ($deserialize:ident, $parse:ident, $visit:ident) => {
        fn $deserialize<V>(self, visitor: V) -> Result<V::Value>
        where
            V: Visitor<'de>,
        {
            visitor.$visit(number::$parse(self.value).ok_or(Error::InvalidNumber)?)
        }
    };
}

impl<'de> de::Deserializer<'de> for ValueDeserializer<'de> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_borrowed_str(self.parse_str()?)
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            b"true" | b"1" => visitor.visit_bool(true),
            b"false" | b"0" => visitor.visit_bool(false),
            _ => Err(Error::InvalidBool),
        }
    }

    deserialize_integer!(deserialize_i8, parse_i8, visit_i8);
    deserialize_integer!(deserialize_i16, parse_i16, visit_i16);
    deserialize_integer!(deserialize_i32, parse_i32, visit_i32);
    deserialize_integer!(deserialize_i64, parse_i64, visit_i64);
    deserialize_integer!(deserialize_u8, parse_u8, visit_u8);
    deserialize_integer!(deserialize_u16, parse_u16, visit_u16);
    deserialize_integer!(deserialize_u32, parse_u32, visit_u32);
    deserialize_integer!(deserialize_u64, parse_u64, visit_u64);

    fn deserialize_f32<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let v = self.parse_str()?.parse().map_err(|_| Error::InvalidNumber)?;
        visitor.visit_f32(v)
    }

    fn deserialize_f64<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let v = self.parse_str()?.parse().map_err(|_| Error::InvalidNumber)?;
        visitor.visit_f64(v)
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_borrowed_bytes(self.value)
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        de::Deserializer::deserialize_bytes(self, visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        // a present key is always `Some`; absent keys never reach here
        visitor.visit_some(self)
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, _visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        Err(Error::InvalidType)
    }

    fn deserialize_tuple<V>(self, _len: usize, _visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        Err(Error::InvalidType)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        _visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        Err(Error::InvalidType)
    }

    fn deserialize_map<V>(self, _visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        Err(Error::InvalidType)
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        _visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        Err(Error::InvalidType)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_enum(de::value::BorrowedStrDeserializer::new(self.parse_str()?))
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }

    serde::forward_to_deserialize_any! {
        i128 u128 char str string unit_struct identifier
    }
}

/// Deserializes an instance of type `T` from the pairs of a dictionary
///
/// Keys without a matching field are ignored, and when a key repeats only its first value is
/// used. `&str` fields borrow from the dictionary's buffer.
pub fn from_dictionary<'de, T, const N: usize>(dict: &Dictionary<'de, N>) -> Result<T>
where
    T: de::Deserialize<'de>,
{
    T::deserialize(Deserializer::new(dict))
}

#[cfg(test)]
mod tests {
    use serde_derive::Deserialize;

    use super::Error;
    use crate::qs::{build, Dictionary};

    #[derive(Debug, Deserialize, PartialEq)]
    enum Mode {
        #[serde(rename = "lte-m")]
        LteM,
        #[serde(rename = "nb-iot")]
        NbIot,
    }

    #[test]
    fn struct_str() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Device<'a> {
            name: &'a str,
        }

        let mut buf = *b"name=tracker-7";
        let dict = build(&mut buf);
        assert_eq!(
            crate::from_dictionary(&dict),
            Ok(Device {
                name: "tracker-7"
            })
        );
    }

    #[test]
    fn struct_bool() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Led {
            led: bool,
        }

        for (input, expected) in [
            (&b"led=true"[..], true),
            (&b"led=1"[..], true),
            (&b"led=false"[..], false),
            (&b"led=0"[..], false),
        ] {
            let mut buf = [0u8; 16];
            let buf = &mut buf[..input.len()];
            buf.copy_from_slice(input);
            let dict = build(buf);
            assert_eq!(crate::from_dictionary(&dict), Ok(Led { led: expected }));
        }

        // errors
        let mut buf = *b"led=on";
        let dict = build(&mut buf);
        assert_eq!(
            crate::from_dictionary::<Led, 15>(&dict),
            Err(Error::InvalidBool)
        );
    }

    #[test]
    fn struct_integers() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Radio {
            rssi: i8,
            channel: u16,
            uptime: u64,
        }

        let mut buf = *b"rssi=-71&channel=6400&uptime=86400";
        let dict = build(&mut buf);
        assert_eq!(
            crate::from_dictionary(&dict),
            Ok(Radio {
                rssi: -71,
                channel: 6400,
                uptime: 86400
            })
        );

        // out of range
        let mut buf = *b"rssi=-129&channel=1&uptime=1";
        let dict = build(&mut buf);
        assert_eq!(
            crate::from_dictionary::<Radio, 15>(&dict),
            Err(Error::InvalidNumber)
        );

        let mut buf = *b"rssi=1&channel=-1&uptime=1";
        let dict = build(&mut buf);
        assert_eq!(
            crate::from_dictionary::<Radio, 15>(&dict),
            Err(Error::InvalidNumber)
        );
    }

    #[test]
    fn struct_float() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Position {
            lat: f64,
            alt: f32,
        }

        let mut buf = *b"lat=44.5&alt=-3.25";
        let dict = build(&mut buf);
        assert_eq!(
            crate::from_dictionary(&dict),
            Ok(Position {
                lat: 44.5,
                alt: -3.25
            })
        );
    }

    #[test]
    fn struct_option() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Property<'a> {
            #[serde(borrow)]
            description: Option<&'a str>,
            retries: Option<u8>,
        }

        let mut buf = *b"description=ambient&retries=3";
        let dict = build(&mut buf);
        assert_eq!(
            crate::from_dictionary(&dict),
            Ok(Property {
                description: Some("ambient"),
                retries: Some(3),
            })
        );

        let mut buf = *b"other=1";
        let dict = build(&mut buf);
        assert_eq!(
            crate::from_dictionary(&dict),
            Ok(Property {
                description: None,
                retries: None,
            })
        );
    }

    #[test]
    fn enum_clike() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Network {
            mode: Mode,
        }

        let mut buf = *b"mode=nb-iot";
        let dict = build(&mut buf);
        assert_eq!(
            crate::from_dictionary(&dict),
            Ok(Network { mode: Mode::NbIot })
        );

        let mut buf = *b"mode=lte-m";
        let dict = build(&mut buf);
        assert_eq!(
            crate::from_dictionary(&dict),
            Ok(Network { mode: Mode::LteM })
        );

        let mut buf = *b"mode=gsm";
        let dict = build(&mut buf);
        assert_eq!(
            crate::from_dictionary::<Network, 15>(&dict),
            Err(Error::UnknownVariant)
        );
    }

    #[test]
    fn missing_field() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Required {
            id: u32,
        }

        let dict: Dictionary<'_> = Dictionary::new();
        assert_eq!(
            crate::from_dictionary::<Required, 15>(&dict),
            Err(Error::MissingField)
        );
    }

    #[test]
    fn first_duplicate_wins() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Single {
            k: u8,
        }

        let mut buf = *b"k=1&unused=x&k=2";
        let dict = build(&mut buf);
        assert_eq!(crate::from_dictionary(&dict), Ok(Single { k: 1 }));
    }

    #[test]
    fn invalid_utf8() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Device<'a> {
            name: &'a str,
        }

        let mut buf = *b"name=\xff";
        let dict = build(&mut buf);
        assert_eq!(
            crate::from_dictionary::<Device<'_>, 15>(&dict),
            Err(Error::InvalidUtf8)
        );
    }
}
