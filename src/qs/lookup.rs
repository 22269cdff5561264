use super::Dictionary;

/// Outcome of copying a value out of a [`Dictionary`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Lookup {
    /// The whole value was copied; `len` bytes followed by a NUL.
    Copied {
        /// Number of value bytes written
        len: usize,
    },
    /// The value didn't fit; the first `len` bytes were copied, followed by a NUL.
    Truncated {
        /// Number of value bytes written
        len: usize,
    },
    /// No pair has this key. The output buffer was not touched.
    NotFound,
    /// The dictionary is empty or its first key is empty. The output buffer was not touched.
    Uninitialized,
}

impl Lookup {
    /// Returns `true` if a value was copied, whole or in part
    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Copied { .. } | Lookup::Truncated { .. })
    }

    /// Number of value bytes written to the output buffer
    pub fn len(&self) -> usize {
        match *self {
            Lookup::Copied { len } | Lookup::Truncated { len } => len,
            Lookup::NotFound | Lookup::Uninitialized => 0,
        }
    }

    /// Returns `true` if no value bytes were written
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Writes into a caller provided buffer, always keeping one byte for the NUL terminator
struct TerminatedSlice<'a> {
    buf: &'a mut [u8],
    current_length: usize,
}

impl<'a> TerminatedSlice<'a> {
    fn new(buf: &'a mut [u8]) -> Self {
        TerminatedSlice {
            buf,
            current_length: 0,
        }
    }

    /// Copies as much of `other` as fits, returning `false` if some of it was dropped
    fn extend_from_slice(&mut self, other: &[u8]) -> bool {
        let available = self.buf.len().saturating_sub(self.current_length + 1);
        let take = other.len().min(available);

        self.buf[self.current_length..self.current_length + take].copy_from_slice(&other[..take]);
        self.current_length += take;

        take == other.len()
    }

    /// Writes the terminator and returns the number of bytes before it
    fn finish(self) -> usize {
        if let Some(terminator) = self.buf.get_mut(self.current_length) {
            *terminator = b'\0';
        }
        self.current_length
    }
}

impl<'a, const N: usize> Dictionary<'a, N> {
    /// Copies the value of the first pair whose key equals `key` into `out`
    ///
    /// At most `out.len() - 1` bytes are copied and a NUL is written right after them. When the
    /// key is absent, or the dictionary was never populated, `out` is left untouched, so callers
    /// wanting a "not found" sentinel should initialize it first.
    ///
    /// ```
    /// use qs_json_core::qs::{self, Lookup};
    ///
    /// let mut buf = *b"apn=iot.example&pin=1234";
    /// let dict = qs::build(&mut buf);
    ///
    /// let mut out = [0u8; 4];
    /// assert_eq!(dict.lookup("apn", &mut out), Lookup::Truncated { len: 3 });
    /// assert_eq!(&out, b"iot\0");
    /// ```
    pub fn lookup<K>(&self, key: K, out: &mut [u8]) -> Lookup
    where
        K: AsRef<[u8]>,
    {
        match self.entries.first() {
            Some(first) if !first.key.is_empty() => {}
            _ => return Lookup::Uninitialized,
        }

        let Some(value) = self.get(key) else {
            return Lookup::NotFound;
        };

        let mut slice = TerminatedSlice::new(out);
        let complete = slice.extend_from_slice(value);
        let len = slice.finish();

        if complete {
            Lookup::Copied { len }
        } else {
            trace!("value truncated to {} of {} bytes", len, value.len());
            Lookup::Truncated { len }
        }
    }

    /// Writes the value of the first pair whose key equals `key` to `writer`
    ///
    /// Returns the number of bytes written, or `None` if no pair has this key.
    #[cfg(feature = "embedded-io")]
    pub fn lookup_write<K, W>(&self, key: K, writer: &mut W) -> Result<Option<usize>, W::Error>
    where
        K: AsRef<[u8]>,
        W: embedded_io::Write,
    {
        match self.get(key) {
            Some(value) => {
                writer.write_all(value)?;
                Ok(Some(value.len()))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::qs::{build, Dictionary, Lookup};

    #[test]
    fn copies_value() {
        let mut buf = *b"a=1&name=modem";
        let dict = build(&mut buf);

        let mut out = [0xffu8; 16];
        assert_eq!(dict.lookup("name", &mut out), Lookup::Copied { len: 5 });
        assert_eq!(&out[..6], b"modem\0");
        assert_eq!(out[6], 0xff);
    }

    #[test]
    fn truncates_and_terminates() {
        let mut buf = *b"long=abcdefgh";
        let dict = build(&mut buf);

        let mut out = [0xffu8; 4];
        let found = dict.lookup("long", &mut out);
        assert_eq!(found, Lookup::Truncated { len: 3 });
        assert!(found.is_found());
        assert_eq!(&out, b"abc\0");

        // exact fit leaves room for the terminator
        let mut out = [0xffu8; 9];
        assert_eq!(dict.lookup("long", &mut out), Lookup::Copied { len: 8 });
        assert_eq!(&out, b"abcdefgh\0");

        let mut out = [0xffu8; 1];
        let found = dict.lookup("long", &mut out);
        assert_eq!(found, Lookup::Truncated { len: 0 });
        assert!(found.is_found() && found.is_empty());
        assert_eq!(out, [0]);

        let mut out = [0u8; 0];
        assert_eq!(dict.lookup("long", &mut out), Lookup::Truncated { len: 0 });
    }

    #[test]
    fn missing_key_leaves_output() {
        let mut buf = *b"a=1&b=2";
        let dict = build(&mut buf);

        let mut out = *b"unset";
        let found = dict.lookup("c", &mut out);
        assert_eq!(found, Lookup::NotFound);
        assert!(!found.is_found());
        assert_eq!(found.len(), 0);
        assert!(found.is_empty());
        assert_eq!(&out, b"unset");

        // keys are compared whole
        assert_eq!(dict.lookup("", &mut out), Lookup::NotFound);
        assert_eq!(dict.lookup("a\0", &mut out), Lookup::NotFound);
    }

    #[test]
    fn uninitialized_dictionary() {
        let mut out = *b"unset";

        let dict: Dictionary<'_> = Dictionary::new();
        assert_eq!(dict.lookup("a", &mut out), Lookup::Uninitialized);

        let mut buf = *b"=1&a=2";
        let dict = build(&mut buf);
        assert_eq!(dict.len(), 2);
        assert_eq!(dict.lookup("a", &mut out), Lookup::Uninitialized);
        assert_eq!(&out, b"unset");
    }

    #[test]
    fn first_match_wins() {
        let mut buf = *b"k=1&k=2";
        let dict = build(&mut buf);

        let mut out = [0u8; 8];
        assert_eq!(dict.lookup("k", &mut out), Lookup::Copied { len: 1 });
        assert_eq!(&out[..2], b"1\0");
    }

    #[test]
    fn non_utf8_key() {
        let mut buf = *b"\xfe\xff=raw&k=v";
        let dict = build(&mut buf);

        let mut out = [0u8; 8];
        assert_eq!(dict.lookup(b"\xfe\xff", &mut out), Lookup::Copied { len: 3 });
        assert_eq!(&out[..4], b"raw\0");
        assert_eq!(dict.lookup(&b"k"[..], &mut out), Lookup::Copied { len: 1 });
    }

    #[cfg(feature = "embedded-io")]
    #[test]
    fn writes_to_sink() {
        struct Sink {
            buffer: [u8; 16],
            pos: usize,
        }

        impl embedded_io::ErrorType for Sink {
            type Error = core::convert::Infallible;
        }

        impl embedded_io::Write for Sink {
            fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
                let n = core::cmp::min(self.buffer.len() - self.pos, buf.len());
                self.buffer[self.pos..self.pos + n].copy_from_slice(&buf[..n]);
                self.pos += n;
                Ok(n)
            }

            fn flush(&mut self) -> Result<(), Self::Error> {
                Ok(())
            }
        }

        let mut buf = *b"topic=devices/42";
        let dict = build(&mut buf);

        let mut sink = Sink {
            buffer: [0; 16],
            pos: 0,
        };
        assert_eq!(dict.lookup_write("topic", &mut sink), Ok(Some(10)));
        assert_eq!(&sink.buffer[..sink.pos], b"devices/42");
        assert_eq!(dict.lookup_write("other", &mut sink), Ok(None));
    }
}
