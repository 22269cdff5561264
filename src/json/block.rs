/// Size of a `{...}` or `[...]` block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BlockSpan {
    /// Bytes from the opening delimiter up to and including the matching closing one, or up to
    /// the end of the input when the block is never closed
    pub len: usize,
    /// `false` if the input ended before the block was balanced
    pub closed: bool,
}

/// Measures the block starting at `json[start]`, which must be `open`
///
/// Nested `open`/`close` pairs are counted; nothing else is looked at, so delimiters inside
/// strings count too.
pub fn scan_block(json: &[u8], start: usize, open: u8, close: u8) -> BlockSpan {
    let mut open_pairs: usize = 1;

    for (index, &c) in json.iter().enumerate().skip(start + 1) {
        if c == open {
            open_pairs += 1;
        }
        if c == close {
            open_pairs -= 1;
            if open_pairs == 0 {
                return BlockSpan {
                    len: index - start + 1,
                    closed: true,
                };
            }
        }
    }

    BlockSpan {
        len: json.len().saturating_sub(start),
        closed: false,
    }
}

/// Length of the block starting at `json[start]`, delimiters included
///
/// An unbalanced block runs to the end of `json`; use [`scan_block`] to tell the two apart.
///
/// ```
/// use qs_json_core::json::block_length;
///
/// let json = br#"{"a":{"b":[1,2]},"c":3}"#;
/// assert_eq!(block_length(json, 5, b'{', b'}'), 11);
/// assert_eq!(block_length(json, 10, b'[', b']'), 5);
/// ```
pub fn block_length(json: &[u8], start: usize, open: u8, close: u8) -> usize {
    scan_block(json, start, open, close).len
}
