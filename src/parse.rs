//! Lenient numeric parsing for request headers and symbol names.

/// Parse a decimal integer prefix the way C `atol` does.
///
/// Leading whitespace and one sign are accepted, parsing stops at the first
/// non-digit, and input without digits yields 0. Overflow saturates.
pub(crate) fn leading_integer(bytes: &[u8]) -> i64 {
    let mut rest = bytes;
    while let [first, tail @ ..] = rest {
        if !crate::template::is_space(*first) {
            break;
        }
        rest = tail;
    }

    let negative = match rest.first() {
        Some(b'-') => {
            rest = &rest[1..];
            true
        }
        Some(b'+') => {
            rest = &rest[1..];
            false
        }
        _ => false,
    };

    let mut value: i64 = 0;
    for &byte in rest.iter().take_while(|b| b.is_ascii_digit()) {
        value = value
            .saturating_mul(10)
            .saturating_add(i64::from(byte - b'0'));
    }

    if negative {
        -value
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_integer() {
        assert_eq!(leading_integer(b"42"), 42);
        assert_eq!(leading_integer(b"  17abc"), 17);
        assert_eq!(leading_integer(b"-3"), -3);
        assert_eq!(leading_integer(b"+8"), 8);
        assert_eq!(leading_integer(b"abc"), 0);
        assert_eq!(leading_integer(b""), 0);
        assert_eq!(leading_integer(b"4.5"), 4);
    }
}
