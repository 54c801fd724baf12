//! The base-60 number encoding of the moment-timezone packed format.
//!
//! Whole numbers are written as signed base-60 integers with the digits of
//! [`DIGITS`]. Durations in seconds are written as minutes, followed by a
//! `.` and a single digit holding the remaining seconds when there are any.

use alloc::string::String;

/// The 60 digits of the encoding, in ascending order.
pub const DIGITS: &[u8; 60] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWX";

/// Returns the value of a single base-60 digit.
pub fn digit_value(digit: u8) -> Option<u8> {
    match digit {
        b'0'..=b'9' => Some(digit - b'0'),
        b'a'..=b'z' => Some(digit - b'a' + 10),
        b'A'..=b'X' => Some(digit - b'A' + 36),
        _ => None,
    }
}

fn write_magnitude(out: &mut String, mut n: u64) {
    // u64::MAX has 11 base-60 digits.
    let mut buf = [0u8; 11];
    let mut start = buf.len();
    loop {
        start -= 1;
        buf[start] = DIGITS[(n % 60) as usize];
        n /= 60;
        if n == 0 {
            break;
        }
    }
    out.extend(buf[start..].iter().map(|&d| char::from(d)));
}

/// Encodes `n` as a signed base-60 integer.
///
/// ```rust
/// use moment_packer::base60::encode_base60;
///
/// assert_eq!(encode_base60(0), "0");
/// assert_eq!(encode_base60(61), "11");
/// assert_eq!(encode_base60(-3600), "-100");
/// ```
pub fn encode_base60(n: i64) -> String {
    let mut out = String::new();
    if n < 0 {
        out.push('-');
    }
    write_magnitude(&mut out, n.unsigned_abs());
    out
}

/// Decodes a signed base-60 integer, the inverse of [`encode_base60`].
pub fn decode_base60(s: &str) -> Option<i64> {
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let magnitude = decode_magnitude(digits.as_bytes())?;
    apply_sign(negative, magnitude)
}

fn decode_magnitude(digits: &[u8]) -> Option<u64> {
    if digits.is_empty() {
        return None;
    }
    digits.iter().try_fold(0u64, |acc, &digit| {
        acc.checked_mul(60)?
            .checked_add(u64::from(digit_value(digit)?))
    })
}

fn apply_sign(negative: bool, magnitude: u64) -> Option<i64> {
    if negative {
        0i64.checked_sub_unsigned(magnitude)
    } else {
        i64::try_from(magnitude).ok()
    }
}

/// Encodes a number of seconds as base-60 minutes with a seconds fraction.
///
/// A zero minute part is left out when there is a fraction, so 30 seconds
/// is written `.u`. The sign belongs to the minute part and is dropped
/// along with it, so -30 seconds is written `.u` as well.
///
/// ```rust
/// use moment_packer::base60::pack_seconds;
///
/// assert_eq!(pack_seconds(0), "0");
/// assert_eq!(pack_seconds(-28800), "-80");
/// assert_eq!(pack_seconds(-28378), "-7Q.W");
/// assert_eq!(pack_seconds(10), ".a");
/// ```
pub fn pack_seconds(seconds: i64) -> String {
    let magnitude = seconds.unsigned_abs();
    let (minutes, fraction) = (magnitude / 60, magnitude % 60);
    let mut out = String::new();
    if minutes != 0 || fraction == 0 {
        if seconds < 0 {
            out.push('-');
        }
        write_magnitude(&mut out, minutes);
    }
    if fraction != 0 {
        out.push('.');
        out.push(char::from(DIGITS[fraction as usize]));
    }
    out
}

/// Decodes the output of [`pack_seconds`] back into seconds.
///
/// Values between -60 and 0 seconds do not survive packing, they decode as
/// their positive counterpart.
pub fn unpack_seconds(s: &str) -> Option<i64> {
    let (negative, rest) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let (minutes, fraction) = match rest.split_once('.') {
        Some((minutes, fraction)) => (minutes, Some(fraction)),
        None => (rest, None),
    };
    let minutes = match (minutes.is_empty(), fraction) {
        (true, Some(_)) => 0,
        _ => decode_magnitude(minutes.as_bytes())?,
    };
    let fraction = match fraction.map(str::as_bytes) {
        None => 0,
        Some(&[digit]) => u64::from(digit_value(digit)?),
        Some(_) => return None,
    };
    let magnitude = minutes.checked_mul(60)?.checked_add(fraction)?;
    apply_sign(negative, magnitude)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_are_their_own_values() {
        for (value, &digit) in DIGITS.iter().enumerate() {
            assert_eq!(digit_value(digit), Some(value as u8));
        }
        assert_eq!(digit_value(b'Y'), None);
        assert_eq!(digit_value(b'-'), None);
    }

    #[test]
    fn encode() {
        assert_eq!(encode_base60(1), "1");
        assert_eq!(encode_base60(59), "X");
        assert_eq!(encode_base60(60), "10");
        assert_eq!(encode_base60(-1), "-1");
        assert_eq!(encode_base60(12_345_678), "V9li");
        assert_eq!(encode_base60(-12_345_678), "-V9li");
        assert_eq!(decode_base60(&encode_base60(i64::MIN)), Some(i64::MIN));
        assert_eq!(decode_base60(&encode_base60(i64::MAX)), Some(i64::MAX));
    }

    #[test]
    fn decode_rejects_garbage() {
        assert_eq!(decode_base60(""), None);
        assert_eq!(decode_base60("-"), None);
        assert_eq!(decode_base60("1.0"), None);
        assert_eq!(decode_base60("Z"), None);
        assert_eq!(decode_base60("ZZZZZZZZZZZZZ"), None);
    }

    #[test]
    fn base60_round_trip() {
        let mut n = 1i64;
        while let Some(next) = n.checked_mul(7) {
            for value in [n, -n, n - 1, 1 - n, n + 59] {
                assert_eq!(decode_base60(&encode_base60(value)), Some(value));
            }
            n = next;
        }
    }

    #[test]
    fn pack() {
        assert_eq!(pack_seconds(1), ".1");
        assert_eq!(pack_seconds(59), ".X");
        assert_eq!(pack_seconds(60), "1");
        assert_eq!(pack_seconds(61), "1.1");
        assert_eq!(pack_seconds(3599), "X.X");
        assert_eq!(pack_seconds(3600), "10");
        assert_eq!(pack_seconds(-1), ".1");
        assert_eq!(pack_seconds(-30), ".u");
        assert_eq!(pack_seconds(-90), "-1.u");
        assert_eq!(pack_seconds(-60), "-1");
        assert_eq!(pack_seconds(-61), "-1.1");
        assert_eq!(pack_seconds(-1_633_269_600), "-261q0");
        assert_eq!(pack_seconds(31_536_000), "2q00");
    }

    #[test]
    fn unpack() {
        assert_eq!(unpack_seconds("0"), Some(0));
        assert_eq!(unpack_seconds(".u"), Some(30));
        assert_eq!(unpack_seconds("-2ag2u.h"), Some(-1_688_265_017));
        assert_eq!(unpack_seconds(""), None);
        assert_eq!(unpack_seconds("."), None);
        assert_eq!(unpack_seconds("1.10"), None);
        assert_eq!(unpack_seconds("1."), None);
    }

    #[test]
    fn pack_round_trip() {
        for seconds in (-7200..=-60).chain(0..7200).chain([
            i64::MIN,
            i64::MIN + 1,
            i64::MAX,
            -2_147_483_648,
            2_147_483_647,
        ]) {
            assert_eq!(unpack_seconds(&pack_seconds(seconds)), Some(seconds));
        }
    }

    #[test]
    fn sub_minute_negatives_lose_their_sign() {
        for seconds in -59..0 {
            let packed = pack_seconds(seconds);
            assert!(!packed.starts_with('-'), "{packed}");
            assert_eq!(unpack_seconds(&packed), Some(-seconds));
        }
    }
}
