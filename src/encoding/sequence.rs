//! Length-prefixed sequences with chunked, growth-limited decoding
//!
//! A sequence is a CompactSize element count followed by the elements. The
//! count comes straight off the wire, so decoding never trusts it for
//! allocation: the destination grows one chunk at a time, and each chunk is
//! only reserved after the previous one was fully read.

use std::mem;

use tracing::trace;

use super::compact_size::{read_compact_len, write_compact_len};
use super::{CHUNK_GROWTH_RATE, Deserializable, FlatData, STARTING_CHUNK_SIZE, Serializable};
use crate::stream::{ReadStream, WriteStream};
use crate::{Error, Result};

/// Allocation policy for decoding length-prefixed sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChunkPolicy {
    /// Byte budget of the first chunk.
    pub starting_chunk_size: usize,
    /// Factor applied to the budget after every chunk.
    pub growth_rate: usize,
}

impl ChunkPolicy {
    /// Create a policy.
    ///
    /// # Panics
    ///
    /// If either parameter is zero.
    #[must_use]
    pub const fn new(starting_chunk_size: usize, growth_rate: usize) -> Self {
        assert!(starting_chunk_size > 0, "starting_chunk_size must be positive");
        assert!(growth_rate > 0, "growth_rate must be positive");
        Self {
            starting_chunk_size,
            growth_rate,
        }
    }

    /// Elements of `elem_size` bytes admitted by a chunk of `budget` bytes.
    const fn elements_per_chunk(budget: usize, elem_size: usize) -> usize {
        1 + (budget - 1) / elem_size
    }
}

impl Default for ChunkPolicy {
    fn default() -> Self {
        Self::new(STARTING_CHUNK_SIZE, CHUNK_GROWTH_RATE)
    }
}

/// Read `declared` elements into `dest`, growing it chunk by chunk.
///
/// `dest` is cleared first. Each chunk admits as many elements as fit in the
/// current byte budget (at least one), clamped to what is left; the budget is
/// multiplied by the growth rate after every chunk. Flat element types read a
/// chunk as one blob, others element by element.
///
/// On error `dest` is truncated back to the last completed chunk, and its
/// capacity never exceeds one chunk beyond the bytes actually consumed.
pub fn read_chunked<T, R>(
    s: &mut R,
    dest: &mut Vec<T>,
    declared: u64,
    policy: ChunkPolicy,
) -> Result<()>
where
    T: Deserializable,
    R: ReadStream + ?Sized,
{
    dest.clear();
    let total = usize::try_from(declared).map_err(|_| Error::SizeTooLarge {
        size: declared,
        max: usize::MAX as u64,
    })?;
    let elem_size = mem::size_of::<T>().max(1);
    // Fields are public, so a zero built without `new` is clamped here.
    let mut budget = policy.starting_chunk_size.max(1);
    let growth_rate = policy.growth_rate.max(1);

    while dest.len() < total {
        let start = dest.len();
        let count = (total - start).min(ChunkPolicy::elements_per_chunk(budget, elem_size));
        trace!(start, count, total, budget, "reading sequence chunk");
        budget = budget.saturating_mul(growth_rate);

        dest.reserve_exact(count);
        if let Err(err) = T::deserialize_run(s, dest, count) {
            dest.truncate(start);
            return Err(err);
        }
    }

    Ok(())
}

/// Read a CompactSize-prefixed sequence into `dest` using `policy`.
pub fn read_sequence_into<T, R>(s: &mut R, dest: &mut Vec<T>, policy: ChunkPolicy) -> Result<()>
where
    T: Deserializable,
    R: ReadStream + ?Sized,
{
    dest.clear();
    let declared = read_compact_len(s)?;
    read_chunked(s, dest, declared as u64, policy)
}

/// Write `items` as a CompactSize-prefixed sequence.
pub fn write_sequence<T, S>(s: &mut S, items: &[T]) -> Result<()>
where
    T: Serializable,
    S: WriteStream + ?Sized,
{
    write_compact_len(s, items.len())?;
    T::serialize_slice(items, s)
}

impl<T: Serializable> Serializable for [T] {
    fn serialize<S: WriteStream + ?Sized>(&self, s: &mut S) -> Result<()> {
        write_sequence(s, self)
    }
}

impl<T: Serializable> Serializable for Vec<T> {
    fn serialize<S: WriteStream + ?Sized>(&self, s: &mut S) -> Result<()> {
        write_sequence(s, self)
    }
}

impl<T: Deserializable> Deserializable for Vec<T> {
    fn deserialize<R: ReadStream + ?Sized>(s: &mut R) -> Result<Self> {
        let mut items = Vec::new();
        read_sequence_into(s, &mut items, ChunkPolicy::default())?;
        Ok(items)
    }
}

impl Serializable for str {
    fn serialize<S: WriteStream + ?Sized>(&self, s: &mut S) -> Result<()> {
        write_sequence(s, self.as_bytes())
    }
}

impl Serializable for String {
    fn serialize<S: WriteStream + ?Sized>(&self, s: &mut S) -> Result<()> {
        self.as_str().serialize(s)
    }
}

impl Deserializable for String {
    fn deserialize<R: ReadStream + ?Sized>(s: &mut R) -> Result<Self> {
        let bytes = Vec::<u8>::deserialize(s)?;
        Ok(String::from_utf8(bytes)?)
    }
}

// Fixed-size arrays of flat data carry no prefix: the length is part of the type.
impl<T: FlatData, const N: usize> Serializable for [T; N] {
    fn serialize<S: WriteStream + ?Sized>(&self, s: &mut S) -> Result<()> {
        s.write(T::as_wire_bytes(self))
    }

    fn serialize_slice<S: WriteStream + ?Sized>(items: &[Self], s: &mut S) -> Result<()> {
        s.write(T::as_wire_bytes(items.as_flattened()))
    }
}

impl<T: FlatData, const N: usize> Deserializable for [T; N] {
    fn deserialize<R: ReadStream + ?Sized>(s: &mut R) -> Result<Self> {
        let mut out = [T::ZEROED; N];
        T::read_into(s, &mut out)?;
        Ok(out)
    }

    fn deserialize_run<R: ReadStream + ?Sized>(
        s: &mut R,
        dest: &mut Vec<Self>,
        count: usize,
    ) -> Result<()> {
        let start = dest.len();
        dest.resize(start + count, [T::ZEROED; N]);
        if let Err(err) = T::read_into(s, dest[start..].as_flattened_mut()) {
            dest.truncate(start);
            return Err(err);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{deserialize, serialize};

    /// Serializes as two bytes but occupies four in memory, so chunk math
    /// differs from the wire size.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Pair(u16, u16);

    impl Serializable for Pair {
        fn serialize<S: WriteStream + ?Sized>(&self, s: &mut S) -> Result<()> {
            (self.0 as u8).serialize(s)?;
            (self.1 as u8).serialize(s)
        }
    }

    impl Deserializable for Pair {
        fn deserialize<R: ReadStream + ?Sized>(s: &mut R) -> Result<Self> {
            Ok(Self(
                u16::from(u8::deserialize(s)?),
                u16::from(u8::deserialize(s)?),
            ))
        }
    }

    #[test]
    fn test_byte_vector_layout() {
        let bytes = serialize(&vec![0xaau8, 0xbb, 0xcc]).unwrap();
        assert_eq!(bytes, vec![0x03, 0xaa, 0xbb, 0xcc]);
        assert_eq!(deserialize::<Vec<u8>>(&bytes).unwrap(), vec![0xaa, 0xbb, 0xcc]);
    }

    #[test]
    fn test_element_vector_layout() {
        let bytes = serialize(&vec![1u32, 2]).unwrap();
        assert_eq!(bytes, vec![0x02, 1, 0, 0, 0, 2, 0, 0, 0]);
        assert_eq!(deserialize::<Vec<u32>>(&bytes).unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_nested_vectors() {
        let value = vec![vec![1u8], vec![], vec![2, 3]];
        let bytes = serialize(&value).unwrap();
        assert_eq!(bytes, vec![0x03, 0x01, 0x01, 0x00, 0x02, 0x02, 0x03]);
        assert_eq!(deserialize::<Vec<Vec<u8>>>(&bytes).unwrap(), value);
    }

    #[test]
    fn test_long_prefix() {
        let value = vec![7u8; 300];
        let bytes = serialize(&value).unwrap();
        assert_eq!(&bytes[..3], &[0xfd, 0x2c, 0x01]);
        assert_eq!(bytes.len(), 303);
        assert_eq!(deserialize::<Vec<u8>>(&bytes).unwrap(), value);
    }

    #[test]
    fn test_string_roundtrip_and_utf8_check() {
        let bytes = serialize("héllo").unwrap();
        assert_eq!(bytes[0], 6);
        assert_eq!(deserialize::<String>(&bytes).unwrap(), "héllo");

        let result = deserialize::<String>(&[0x02, 0xc3, 0x28]);
        assert!(matches!(result, Err(Error::InvalidUtf8(_))));
    }

    #[test]
    fn test_arrays_have_no_prefix() {
        let hash = [0x11u8; 32];
        let bytes = serialize(&hash).unwrap();
        assert_eq!(bytes, vec![0x11; 32]);
        assert_eq!(deserialize::<[u8; 32]>(&bytes).unwrap(), hash);

        let branch = vec![[1u8; 4], [2u8; 4]];
        let bytes = serialize(&branch).unwrap();
        assert_eq!(bytes, vec![2, 1, 1, 1, 1, 2, 2, 2, 2]);
        assert_eq!(deserialize::<Vec<[u8; 4]>>(&bytes).unwrap(), branch);
    }

    #[test]
    fn test_huge_declared_length_underruns_with_bounded_allocation() {
        let payload = [0u8; 10];
        let mut source: &[u8] = &payload;
        let mut dest: Vec<u8> = Vec::new();

        let result = read_chunked(&mut source, &mut dest, 1 << 40, ChunkPolicy::default());

        assert!(matches!(result, Err(Error::Underrun { .. })));
        assert!(dest.is_empty());
        assert!(dest.capacity() <= STARTING_CHUNK_SIZE);
    }

    #[test]
    fn test_huge_prefix_is_rejected_by_ceiling() {
        // 2^40 encoded canonically as a 9-byte CompactSize.
        let mut bytes = vec![0xff, 0, 0, 0, 0, 0, 1, 0, 0];
        bytes.extend_from_slice(&[0u8; 10]);
        let result = deserialize::<Vec<u8>>(&bytes);
        assert!(matches!(result, Err(Error::SizeTooLarge { .. })));
    }

    #[test]
    fn test_max_prefix_underruns() {
        let mut bytes = vec![0xfe, 0xff, 0xff, 0xff, 0xff];
        bytes.extend_from_slice(&[0u8; 10]);
        let result = deserialize::<Vec<u8>>(&bytes);
        assert!(result.unwrap_err().is_underrun());
    }

    #[test]
    fn test_failure_keeps_only_completed_chunks() {
        // Chunks of 4, then 12, then 36 bytes.
        let policy = ChunkPolicy::new(4, 3);
        let payload: Vec<u8> = (0..10).collect();
        let mut source: &[u8] = &payload;
        let mut dest = Vec::new();

        let result = read_chunked::<u8, _>(&mut source, &mut dest, 20, policy);

        assert!(result.unwrap_err().is_underrun());
        assert_eq!(dest, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_element_wise_failure_drops_partial_chunk() {
        // Pair is four bytes in memory, so a 8-byte budget admits two pairs.
        let policy = ChunkPolicy::new(8, 2);
        let payload = [1u8, 2, 3, 4, 5, 6, 7];
        let mut source: &[u8] = &payload;
        let mut dest = Vec::new();

        let result = read_chunked::<Pair, _>(&mut source, &mut dest, 5, policy);

        assert!(result.unwrap_err().is_underrun());
        assert_eq!(dest, vec![Pair(1, 2), Pair(3, 4)]);
    }

    #[test]
    fn test_chunking_spans_many_chunks() {
        let policy = ChunkPolicy::new(3, 2);
        let payload: Vec<u8> = (0..100).collect();
        let mut source: &[u8] = &payload;
        let mut dest: Vec<u8> = Vec::new();

        read_chunked(&mut source, &mut dest, 100, policy).unwrap();

        assert_eq!(dest, payload);
        assert!(source.is_empty());
    }

    #[test]
    fn test_zero_parameters_are_clamped() {
        let policy = ChunkPolicy {
            starting_chunk_size: 4,
            growth_rate: 0,
        };
        let payload: Vec<u8> = (0..10).collect();
        let mut source: &[u8] = &payload;
        let mut dest: Vec<u8> = Vec::new();

        read_chunked(&mut source, &mut dest, 8, policy).unwrap();
        assert_eq!(dest, payload[..8]);

        let policy = ChunkPolicy {
            starting_chunk_size: 0,
            growth_rate: 0,
        };
        let mut source: &[u8] = &payload;
        let result = read_chunked::<u8, _>(&mut source, &mut dest, 20, policy);
        assert!(result.unwrap_err().is_underrun());
        assert_eq!(dest, payload);
    }

    #[test]
    fn test_read_sequence_into_reuses_destination() {
        let mut dest = vec![9u32; 8];
        let bytes = serialize(&vec![5u32]).unwrap();
        let mut source: &[u8] = &bytes;
        read_sequence_into(&mut source, &mut dest, ChunkPolicy::default()).unwrap();
        assert_eq!(dest, vec![5]);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_byte_vector_roundtrip(value in prop::collection::vec(any::<u8>(), 0..2048)) {
                let bytes = serialize(&value).unwrap();
                prop_assert_eq!(deserialize::<Vec<u8>>(&bytes).unwrap(), value);
            }

            #[test]
            fn prop_small_chunks_match_default(
                value in prop::collection::vec(any::<u16>(), 0..512),
                start in 1usize..64,
                growth in 1usize..4,
            ) {
                let bytes = serialize(&value).unwrap();
                let mut source: &[u8] = &bytes;
                let mut dest: Vec<u16> = Vec::new();
                read_sequence_into(&mut source, &mut dest, ChunkPolicy::new(start, growth)).unwrap();
                prop_assert_eq!(dest, value);
            }

            #[test]
            fn prop_string_roundtrip(value in ".{0,64}") {
                let bytes = serialize(&value).unwrap();
                prop_assert_eq!(deserialize::<String>(&bytes).unwrap(), value);
            }
        }
    }
}
