//! Split a query string (`key=value&key=value`) into a fixed capacity dictionary, in place
//!
//! The builder takes the buffer by `&mut`, overwrites the `&` and `=` delimiters it splits on with
//! NUL bytes and hands back views into the same storage. The views keep the buffer borrowed, so it
//! can't be reused or freed while the dictionary is alive.
//!
//! ```
//! let mut buf = *b"dev=modem&rssi=-71&ver=2.1";
//! let dict = qs_json_core::qs::build(&mut buf);
//!
//! assert_eq!(dict.len(), 3);
//! assert_eq!(dict.get_str("rssi"), Some("-71"));
//! assert!(!dict.is_truncated());
//! ```

use core::ops::Range;
use core::slice;

use heapless::Vec;

pub use self::lookup::Lookup;

mod lookup;

/// Default number of key/value pairs a [`Dictionary`] can hold
pub const MAX_ENTRIES: usize = 15;

const PAIR_DELIMITER: u8 = b'&';
const KEY_VALUE_SEPARATOR: u8 = b'=';
const TERMINATOR: u8 = b'\0';

/// A single key/value pair borrowed from the source buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Entry<'a> {
    /// Bytes before the first `=` of the segment
    pub key: &'a [u8],
    /// Bytes after the first `=` of the segment
    pub value: &'a [u8],
}

/// Why a dictionary holds fewer pairs than the input contained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Truncation {
    /// The input had more `&` separated segments than the dictionary capacity.
    Capacity,
    /// The segment at this index had no `=`; it and everything after it were dropped.
    MissingSeparator {
        /// Zero based index of the offending segment
        segment: usize,
    },
}

/// Result of building a dictionary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BuildOutcome {
    /// Every segment of the input became an entry.
    Complete,
    /// Some of the input was dropped.
    Truncated(Truncation),
}

/// A fixed capacity, ordered set of key/value views into a query string buffer
///
/// Duplicate keys are kept in input order; lookups return the first one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dictionary<'a, const N: usize = MAX_ENTRIES> {
    entries: Vec<Entry<'a>, N>,
    source_len: usize,
    outcome: BuildOutcome,
}

/// Builds a dictionary with the default capacity. See [`Dictionary::build`].
pub fn build(buf: &mut [u8]) -> Dictionary<'_> {
    Dictionary::build(buf)
}

impl<'a, const N: usize> Dictionary<'a, N> {
    /// An empty dictionary, not backed by any buffer
    pub const fn new() -> Self {
        Dictionary {
            entries: Vec::new(),
            source_len: 0,
            outcome: BuildOutcome::Complete,
        }
    }

    /// Splits `buf` into at most `N` key/value pairs
    ///
    /// Never fails: input beyond the capacity, or from the first segment without a `=` onwards,
    /// is dropped and reported through [`Dictionary::outcome`].
    pub fn build(buf: &'a mut [u8]) -> Self {
        let source_len = buf.len();
        if source_len == 0 {
            return Self::new();
        }

        let mut outcome = BuildOutcome::Complete;

        // 1st pass; cut the buffer into segments at each `&`
        let mut segments: Vec<Range<usize>, N> = Vec::new();
        let mut start = 0;
        loop {
            let delimiter = buf[start..]
                .iter()
                .position(|&c| c == PAIR_DELIMITER)
                .map(|at| start + at);

            if segments
                .push(start..delimiter.unwrap_or(source_len))
                .is_err()
            {
                outcome = BuildOutcome::Truncated(Truncation::Capacity);
                break;
            }

            match delimiter {
                Some(at) => {
                    buf[at] = TERMINATOR;
                    start = at + 1;
                    if segments.is_full() {
                        // a trailing `&` drops nothing
                        if start < source_len {
                            outcome = BuildOutcome::Truncated(Truncation::Capacity);
                        }
                        break;
                    }
                }
                None => break,
            }
        }

        // 2nd pass; split each segment into key and value at its first `=`
        let mut separators: Vec<usize, N> = Vec::new();
        for (index, segment) in segments.iter().enumerate() {
            let separator = buf[segment.clone()]
                .iter()
                .position(|&c| c == KEY_VALUE_SEPARATOR)
                .map(|at| segment.start + at);

            let Some(at) = separator else {
                outcome = BuildOutcome::Truncated(Truncation::MissingSeparator { segment: index });
                break;
            };

            buf[at] = TERMINATOR;
            // one separator per segment, so this can't overflow
            let _ = separators.push(at);
        }

        let buf: &'a [u8] = buf;
        let entries = segments
            .iter()
            .zip(separators.iter())
            .map(|(segment, &at)| Entry {
                key: &buf[segment.start..at],
                value: &buf[at + 1..segment.end],
            })
            .collect();

        if let BuildOutcome::Truncated(truncation) = outcome {
            trace!(
                "query string truncated: {} of {} segments kept ({})",
                separators.len(),
                segments.len(),
                truncation
            );
        }

        Dictionary {
            entries,
            source_len,
            outcome,
        }
    }

    /// Number of key/value pairs
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the dictionary holds no pairs
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of pairs this dictionary can hold
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Length of the buffer the dictionary was built from
    pub fn source_len(&self) -> usize {
        self.source_len
    }

    /// Whether the whole input made it into the dictionary
    pub fn outcome(&self) -> BuildOutcome {
        self.outcome
    }

    /// Returns `true` if part of the input was dropped
    pub fn is_truncated(&self) -> bool {
        self.outcome != BuildOutcome::Complete
    }

    /// The pairs, in input order
    pub fn entries(&self) -> &[Entry<'a>] {
        &self.entries
    }

    /// Iterates over the pairs in input order
    pub fn iter(&self) -> slice::Iter<'_, Entry<'a>> {
        self.entries.iter()
    }

    /// Iterates over the keys in input order
    pub fn keys(&self) -> impl Iterator<Item = &'a [u8]> + '_ {
        self.entries.iter().map(|entry| entry.key)
    }

    /// Iterates over the values in input order
    pub fn values(&self) -> impl Iterator<Item = &'a [u8]> + '_ {
        self.entries.iter().map(|entry| entry.value)
    }

    /// Returns the value of the first pair whose key equals `key`
    ///
    /// Keys are raw bytes; both `"name"` and `b"name"` work.
    pub fn get<K>(&self, key: K) -> Option<&'a [u8]>
    where
        K: AsRef<[u8]>,
    {
        let key = key.as_ref();
        self.entries
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| entry.value)
    }

    /// Like [`Dictionary::get`], but only returns values that are valid UTF-8
    pub fn get_str<K>(&self, key: K) -> Option<&'a str>
    where
        K: AsRef<[u8]>,
    {
        self.get(key)
            .and_then(|value| core::str::from_utf8(value).ok())
    }

    /// Returns `true` if any pair has this key
    pub fn contains_key<K>(&self, key: K) -> bool
    where
        K: AsRef<[u8]>,
    {
        self.get(key).is_some()
    }
}

impl<const N: usize> Default for Dictionary<'_, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'d, 'a, const N: usize> IntoIterator for &'d Dictionary<'a, N> {
    type Item = &'d Entry<'a>;
    type IntoIter = slice::Iter<'d, Entry<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
