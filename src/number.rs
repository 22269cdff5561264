//! Checked decimal integer parsing over raw bytes.

// NOTE(parse_*signed) every width gets its own parser instead of going through `u64` and casting
// down, to avoid pulling in 64-bit compiler intrinsics on non 64-bit targets
macro_rules! parse_unsigned {
    ($($name:ident => $uxx:ident),* $(,)?) => {$(
        pub(crate) fn $name(digits: &[u8]) -> Option<$uxx> {
            if digits.is_empty() {
                return None;
            }

            let mut number: $uxx = 0;
            for &c in digits {
                match c {
                    b'0'..=b'9' => {
                        number = number.checked_mul(10)?.checked_add((c - b'0') as $uxx)?;
                    }
                    _ => return None,
                }
            }
            Some(number)
        }
    )*};
}

macro_rules! parse_signed {
    ($($name:ident => $ixx:ident),* $(,)?) => {$(
        pub(crate) fn $name(digits: &[u8]) -> Option<$ixx> {
            let (signed, digits) = match digits {
                [b'-', rest @ ..] => (true, rest),
                _ => (false, digits),
            };
            if digits.is_empty() {
                return None;
            }

            // accumulate on the negative side so `MIN` doesn't overflow
            let mut number: $ixx = 0;
            for &c in digits {
                match c {
                    b'0'..=b'9' => {
                        let digit = (c - b'0') as $ixx;
                        number = number.checked_mul(10)?;
                        number = if signed {
                            number.checked_sub(digit)?
                        } else {
                            number.checked_add(digit)?
                        };
                    }
                    _ => return None,
                }
            }
            Some(number)
        }
    )*};
}

parse_unsigned!(parse_u8 => u8, parse_u16 => u16, parse_u32 => u32, parse_u64 => u64);
parse_signed!(parse_i8 => i8, parse_i16 => i16, parse_i32 => i32, parse_i64 => i64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsigned() {
        assert_eq!(parse_u8(b"0"), Some(0));
        assert_eq!(parse_u8(b"255"), Some(255));
        assert_eq!(parse_u64(b"18446744073709551615"), Some(u64::MAX));

        // errors
        assert_eq!(parse_u8(b"256"), None);
        assert_eq!(parse_u16(b"-1"), None);
        assert_eq!(parse_u32(b""), None);
        assert_eq!(parse_u32(b"12a"), None);
    }

    #[test]
    fn signed() {
        assert_eq!(parse_i8(b"-128"), Some(i8::MIN));
        assert_eq!(parse_i8(b"127"), Some(i8::MAX));
        assert_eq!(parse_i16(b"-0"), Some(0));
        assert_eq!(parse_i64(b"-17"), Some(-17));

        // errors
        assert_eq!(parse_i8(b"128"), None);
        assert_eq!(parse_i8(b"-129"), None);
        assert_eq!(parse_i32(b"-"), None);
        assert_eq!(parse_i32(b"+5"), None);
    }
}
