//! Utilities for searching and unescaping byte strings in place.

use core::fmt;

#[derive(Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// A fragment of a percent-escaped byte string
pub enum Fragment<'a> {
    /// A run of bytes which weren't escaped in the input.
    Plain(&'a [u8]),
    /// A byte which was escaped in the input (`%XX`, or `+` for a space).
    Decoded(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Errors occuring while decoding escaped strings.
pub enum DecodeError {
    /// A `%` was not followed by two hexadecimal digits.
    InvalidEscapeSequence,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::InvalidEscapeSequence => write!(
                f,
                "Failed to decode a byte due to an invalid escape sequence."
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DecodeError {}

fn hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

fn decode_escape(rest: &[u8]) -> Result<u8, DecodeError> {
    match rest {
        [hi, lo, ..] => match (hex_digit(*hi), hex_digit(*lo)) {
            (Some(hi), Some(lo)) => Ok(hi << 4 | lo),
            _ => Err(DecodeError::InvalidEscapeSequence),
        },
        _ => Err(DecodeError::InvalidEscapeSequence),
    }
}

fn next_fragment(escaped: &[u8]) -> Result<(Fragment<'_>, &[u8]), DecodeError> {
    Ok(match escaped.split_first() {
        Some((b'%', rest)) => (Fragment::Decoded(decode_escape(rest)?), &rest[2..]),
        Some((b'+', rest)) => (Fragment::Decoded(b' '), rest),
        _ => {
            let end = escaped
                .iter()
                .position(|&c| c == b'%' || c == b'+')
                .unwrap_or(escaped.len());
            let (plain, rest) = escaped.split_at(end);

            (Fragment::Plain(plain), rest)
        }
    })
}

/// A borrowed percent-escaped byte string, such as a raw query string value.
///
/// ```
/// use qs_json_core::str::{EscapedBytes, Fragment};
///
/// let mut fragments = EscapedBytes(b"on%2Foff").fragments();
/// assert_eq!(fragments.next(), Some(Ok(Fragment::Plain(b"on"))));
/// assert_eq!(fragments.next(), Some(Ok(Fragment::Decoded(b'/'))));
/// assert_eq!(fragments.next(), Some(Ok(Fragment::Plain(b"off"))));
/// assert_eq!(fragments.next(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscapedBytes<'a>(pub &'a [u8]);

impl<'a> EscapedBytes<'a> {
    /// Returns an iterator over the `Fragment`s of an escaped string.
    pub fn fragments(&self) -> FragmentIter<'a> {
        FragmentIter(self.0)
    }
}

/// An iterator over the `Fragment`s of an escaped string.
pub struct FragmentIter<'a>(&'a [u8]);

impl<'a> FragmentIter<'a> {
    /// Views the not yet decoded remainder of the input.
    pub fn as_escaped(&self) -> EscapedBytes<'a> {
        EscapedBytes(self.0)
    }
}

impl<'a> Iterator for FragmentIter<'a> {
    type Item = Result<Fragment<'a>, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.0.is_empty() {
            return None;
        }

        Some(match next_fragment(self.0) {
            Ok((fragment, rest)) => {
                self.0 = rest;
                Ok(fragment)
            }
            Err(e) => {
                // stop after the first error
                self.0 = &[];
                Err(e)
            }
        })
    }
}

/// Decodes `%XX` and `+` escapes in place, returning the decoded length.
///
/// Bytes past the returned length are left as they were. On error the buffer is partially
/// decoded and should be discarded.
pub fn decode_in_place(buf: &mut [u8]) -> Result<usize, DecodeError> {
    let mut read = 0;
    let mut write = 0;

    while read < buf.len() {
        let c = match buf[read] {
            b'%' => {
                let c = decode_escape(&buf[read + 1..])?;
                read += 3;
                c
            }
            b'+' => {
                read += 1;
                b' '
            }
            c => {
                read += 1;
                c
            }
        };

        buf[write] = c;
        write += 1;
    }

    Ok(write)
}

/// Returns the offset of the first occurrence of `needle` in `haystack`.
///
/// An empty needle matches at offset 0.
pub fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }

    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Replaces every `from` byte in `buf` with `to`, returning the number of replacements.
pub fn replace(buf: &mut [u8], from: u8, to: u8) -> usize {
    let mut count = 0;
    for c in buf.iter_mut().filter(|c| **c == from) {
        *c = to;
        count += 1;
    }
    count
}
