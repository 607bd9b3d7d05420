//! MSB base-128 variable-length integers
//!
//! Each byte carries seven value bits, most significant group first, and every
//! byte except the last has bit 7 set. One is subtracted from every group but
//! the last, which makes the encoding one-to-one:
//!
//! ```text
//! 0:          [0x00]   256:        [0x81 0x00]
//! 1:          [0x01]   16383:      [0xFE 0x7F]
//! 127:        [0x7F]   16384:      [0xFF 0x00]
//! 128:   [0x80 0x00]   16511:      [0xFF 0x7F]
//! 255:   [0x80 0x7F]   65535: [0x82 0xFE 0x7F]
//! 2^32:           [0x8E 0xFE 0xFE 0xFF 0x00]
//! ```
//!
//! This is unrelated to CompactSize; wire fields pick one or the other.

use super::primitive::read_u8;
use crate::stream::{ReadStream, WriteStream};
use crate::{Error, Result};

/// Longest possible encoding (a `u64`).
const MAX_VARINT_LEN: usize = max_groups(u64::BITS) as usize;

/// Upper bound on groups for an integer of `bits` width.
const fn max_groups(bits: u32) -> u32 {
    (bits + 6) / 7
}

/// Integers that can be carried as a VarInt.
///
/// The scheme is only defined for non-negative values. Signed types are
/// accepted so that fields declared signed can use it, but the caller must
/// keep their values non-negative.
pub trait VarIntInteger: Copy {
    /// Width of the type in bits.
    const BITS: u32;
    /// Largest value of the type, widened.
    const MAX: u64;

    /// Widen a non-negative value.
    fn to_u64(self) -> u64;

    /// Narrow a value already known to be at most [`Self::MAX`].
    fn from_u64(value: u64) -> Self;

    /// Whether the value violates the non-negative precondition.
    fn is_negative(self) -> bool;
}

macro_rules! impl_varint_unsigned {
    ($($ty:ty),*) => {$(
        impl VarIntInteger for $ty {
            const BITS: u32 = <$ty>::BITS;
            const MAX: u64 = <$ty>::MAX as u64;

            #[inline]
            fn to_u64(self) -> u64 {
                self as u64
            }

            #[inline]
            fn from_u64(value: u64) -> Self {
                value as $ty
            }

            #[inline]
            fn is_negative(self) -> bool {
                false
            }
        }
    )*};
}

macro_rules! impl_varint_signed {
    ($($ty:ty),*) => {$(
        impl VarIntInteger for $ty {
            const BITS: u32 = <$ty>::BITS;
            const MAX: u64 = <$ty>::MAX as u64;

            #[inline]
            fn to_u64(self) -> u64 {
                self as u64
            }

            #[inline]
            fn from_u64(value: u64) -> Self {
                value as $ty
            }

            #[inline]
            fn is_negative(self) -> bool {
                self < 0
            }
        }
    )*};
}

impl_varint_unsigned!(u8, u16, u32, u64, usize);
impl_varint_signed!(i8, i16, i32, i64);

/// Number of bytes the VarInt form of `value` occupies.
#[must_use]
pub fn varint_len<I: VarIntInteger>(value: I) -> usize {
    let mut n = value.to_u64();
    let mut len = 1;
    while n > 0x7f {
        n = (n >> 7) - 1;
        len += 1;
    }
    len
}

/// Write `value` as a VarInt.
///
/// # Panics
///
/// In debug builds, if `value` is negative.
pub fn write_varint<S: WriteStream + ?Sized, I: VarIntInteger>(s: &mut S, value: I) -> Result<()> {
    debug_assert!(!value.is_negative(), "VarInt is only defined for non-negative values");

    // Groups are produced least significant first, then written in reverse.
    let mut tmp = [0u8; MAX_VARINT_LEN];
    let mut n = value.to_u64();
    let mut len = 0;
    loop {
        tmp[len] = (n & 0x7f) as u8 | if len == 0 { 0x00 } else { 0x80 };
        if n <= 0x7f {
            break;
        }
        n = (n >> 7) - 1;
        len += 1;
    }
    tmp[..=len].reverse();
    s.write(&tmp[..=len])
}

/// Read a VarInt into an integer of type `I`.
///
/// # Errors
///
/// - [`Error::Underrun`] if the source ends before the terminating byte
/// - [`Error::VarIntOverflow`] if the value does not fit in `I`
/// - [`Error::VarIntMalformed`] if no terminator appears within the group
///   bound for `I`
pub fn read_varint<R: ReadStream + ?Sized, I: VarIntInteger>(s: &mut R) -> Result<I> {
    let overflow = I::MAX >> 7;
    let groups = max_groups(I::BITS);

    let mut n: u64 = 0;
    for _ in 0..groups {
        if n > overflow {
            return Err(Error::VarIntOverflow { bits: I::BITS });
        }
        let byte = read_u8(s)?;
        n = (n << 7) | u64::from(byte & 0x7f);
        if byte & 0x80 == 0 {
            return Ok(I::from_u64(n));
        }
        n = n
            .checked_add(1)
            .ok_or(Error::VarIntOverflow { bits: I::BITS })?;
    }

    Err(Error::VarIntMalformed { groups })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode<I: VarIntInteger>(value: I) -> Vec<u8> {
        let mut out = Vec::new();
        write_varint(&mut out, value).unwrap();
        out
    }

    fn decode<I: VarIntInteger>(mut bytes: &[u8]) -> Result<I> {
        read_varint(&mut bytes)
    }

    #[test]
    fn test_reference_table() {
        let table: [(u64, &[u8]); 11] = [
            (0, &[0x00]),
            (1, &[0x01]),
            (127, &[0x7f]),
            (128, &[0x80, 0x00]),
            (255, &[0x80, 0x7f]),
            (256, &[0x81, 0x00]),
            (16_383, &[0xfe, 0x7f]),
            (16_384, &[0xff, 0x00]),
            (16_511, &[0xff, 0x7f]),
            (65_535, &[0x82, 0xfe, 0x7f]),
            (1 << 32, &[0x8e, 0xfe, 0xfe, 0xff, 0x00]),
        ];

        for (value, bytes) in table {
            assert_eq!(encode(value), bytes, "encoding {value}");
            let decoded: u64 = decode(bytes).unwrap();
            assert_eq!(decoded, value);
            assert_eq!(encode(decoded), bytes, "re-encoding {value}");
            assert_eq!(varint_len(value), bytes.len());
        }
    }

    #[test]
    fn test_encoding_independent_of_width() {
        assert_eq!(encode(300u16), encode(300u64));
        assert_eq!(encode(300i32), encode(300u32));
    }

    #[test]
    fn test_type_extremes() {
        assert_eq!(decode::<u8>(&encode(u8::MAX)).unwrap(), u8::MAX);
        assert_eq!(decode::<u16>(&encode(u16::MAX)).unwrap(), u16::MAX);
        assert_eq!(decode::<u32>(&encode(u32::MAX)).unwrap(), u32::MAX);
        assert_eq!(decode::<i64>(&encode(i64::MAX)).unwrap(), i64::MAX);

        let max = encode(u64::MAX);
        assert_eq!(max.len(), MAX_VARINT_LEN);
        assert_eq!(decode::<u64>(&max).unwrap(), u64::MAX);
    }

    #[test]
    fn test_overflow_for_target_width() {
        // 256 does not fit in a u8.
        assert!(matches!(
            decode::<u8>(&[0x81, 0x00]),
            Err(Error::VarIntOverflow { bits: 8 })
        ));
        // 128 does not fit in an i8.
        assert!(matches!(
            decode::<i8>(&[0x80, 0x00]),
            Err(Error::VarIntOverflow { bits: 8 })
        ));
        // One past u64::MAX: a prefix accumulating 2^57 followed by a zero group.
        let mut past_max = encode((1u64 << 57) - 1);
        for byte in &mut past_max {
            *byte |= 0x80;
        }
        past_max.push(0x00);
        assert!(matches!(
            decode::<u64>(&past_max),
            Err(Error::VarIntOverflow { bits: 64 })
        ));
    }

    #[test]
    fn test_missing_terminator_is_malformed() {
        assert!(matches!(
            decode::<u32>(&[0x80; 5]),
            Err(Error::VarIntMalformed { groups: 5 })
        ));
        assert!(matches!(
            decode::<u8>(&[0x80, 0x80, 0x00]),
            Err(Error::VarIntMalformed { groups: 2 })
        ));
    }

    #[test]
    fn test_truncated_input_underruns() {
        assert!(decode::<u64>(&[]).unwrap_err().is_underrun());
        assert!(decode::<u64>(&[0x82, 0xfe]).unwrap_err().is_underrun());
    }

    #[test]
    fn test_stops_at_terminator() {
        let bytes = [0x80, 0x7f, 0xaa];
        let mut source: &[u8] = &bytes;
        let value: u16 = read_varint(&mut source).unwrap();
        assert_eq!(value, 255);
        assert_eq!(source, &[0xaa]);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_u64_roundtrip(value in any::<u64>()) {
                let bytes = encode(value);
                prop_assert_eq!(bytes.len(), varint_len(value));
                prop_assert_eq!(decode::<u64>(&bytes).unwrap(), value);
            }

            #[test]
            fn prop_non_negative_i32_roundtrip(value in 0..=i32::MAX) {
                prop_assert_eq!(decode::<i32>(&encode(value)).unwrap(), value);
            }

            /// Every byte sequence that decodes has exactly one encoding.
            #[test]
            fn prop_decoded_bytes_are_canonical(bytes in prop::collection::vec(any::<u8>(), 1..12)) {
                let mut source: &[u8] = &bytes;
                if let Ok(value) = read_varint::<_, u64>(&mut source) {
                    let consumed = bytes.len() - source.len();
                    prop_assert_eq!(encode(value), bytes[..consumed].to_vec());
                }
            }
        }
    }
}
