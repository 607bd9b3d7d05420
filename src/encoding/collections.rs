//! Maps, sets, tuples and pointer types.
//!
//! Maps and sets are a CompactSize count followed by their entries in
//! iteration order. Only ordered containers are supported: the encoding of a
//! hash-ordered container would change from run to run.
//!
//! Decoding inserts entries in wire order and never pre-allocates from the
//! declared count. When the wire repeats a key, the first occurrence wins.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use uuid::Uuid;

use super::compact_size::{read_compact_len, write_compact_len};
use super::{Deserializable, Serializable};
use crate::stream::{ReadStream, WriteStream};
use crate::Result;

impl<K: Serializable, V: Serializable> Serializable for BTreeMap<K, V> {
    fn serialize<S: WriteStream + ?Sized>(&self, s: &mut S) -> Result<()> {
        write_compact_len(s, self.len())?;
        for (key, value) in self {
            key.serialize(s)?;
            value.serialize(s)?;
        }
        Ok(())
    }
}

impl<K, V> Deserializable for BTreeMap<K, V>
where
    K: Deserializable + Ord,
    V: Deserializable,
{
    fn deserialize<R: ReadStream + ?Sized>(s: &mut R) -> Result<Self> {
        let count = read_compact_len(s)?;
        let mut map = BTreeMap::new();
        for _ in 0..count {
            let key = K::deserialize(s)?;
            let value = V::deserialize(s)?;
            map.entry(key).or_insert(value);
        }
        Ok(map)
    }
}

impl<K: Serializable> Serializable for BTreeSet<K> {
    fn serialize<S: WriteStream + ?Sized>(&self, s: &mut S) -> Result<()> {
        write_compact_len(s, self.len())?;
        for key in self {
            key.serialize(s)?;
        }
        Ok(())
    }
}

impl<K: Deserializable + Ord> Deserializable for BTreeSet<K> {
    fn deserialize<R: ReadStream + ?Sized>(s: &mut R) -> Result<Self> {
        let count = read_compact_len(s)?;
        let mut set = BTreeSet::new();
        for _ in 0..count {
            // `insert` keeps the stored key when an equal one is already present.
            set.insert(K::deserialize(s)?);
        }
        Ok(set)
    }
}

macro_rules! impl_tuple {
    ($($name:ident $idx:tt),+) => {
        impl<$($name: Serializable),+> Serializable for ($($name,)+) {
            fn serialize<S: WriteStream + ?Sized>(&self, s: &mut S) -> Result<()> {
                $( self.$idx.serialize(s)?; )+
                Ok(())
            }
        }

        impl<$($name: Deserializable),+> Deserializable for ($($name,)+) {
            fn deserialize<R: ReadStream + ?Sized>(s: &mut R) -> Result<Self> {
                Ok(($( $name::deserialize(s)?, )+))
            }
        }
    };
}

impl_tuple!(A 0);
impl_tuple!(A 0, B 1);
impl_tuple!(A 0, B 1, C 2);
impl_tuple!(A 0, B 1, C 2, D 3);
impl_tuple!(A 0, B 1, C 2, D 3, E 4);
impl_tuple!(A 0, B 1, C 2, D 3, E 4, F 5);

impl<T: Serializable + ?Sized> Serializable for &T {
    #[inline]
    fn serialize<S: WriteStream + ?Sized>(&self, s: &mut S) -> Result<()> {
        (**self).serialize(s)
    }
}

impl<T: Serializable + ?Sized> Serializable for Box<T> {
    fn serialize<S: WriteStream + ?Sized>(&self, s: &mut S) -> Result<()> {
        (**self).serialize(s)
    }
}

impl<T: Deserializable> Deserializable for Box<T> {
    fn deserialize<R: ReadStream + ?Sized>(s: &mut R) -> Result<Self> {
        Ok(Box::new(T::deserialize(s)?))
    }
}

impl<T: Serializable + ?Sized> Serializable for Arc<T> {
    fn serialize<S: WriteStream + ?Sized>(&self, s: &mut S) -> Result<()> {
        (**self).serialize(s)
    }
}

impl<T: Deserializable> Deserializable for Arc<T> {
    fn deserialize<R: ReadStream + ?Sized>(s: &mut R) -> Result<Self> {
        Ok(Arc::new(T::deserialize(s)?))
    }
}

/// Sixteen raw bytes, no prefix.
impl Serializable for Uuid {
    fn serialize<S: WriteStream + ?Sized>(&self, s: &mut S) -> Result<()> {
        s.write(self.as_bytes())
    }
}

impl Deserializable for Uuid {
    fn deserialize<R: ReadStream + ?Sized>(s: &mut R) -> Result<Self> {
        Ok(Uuid::from_bytes(<[u8; 16]>::deserialize(s)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, deserialize, serialize, serialized_size};

    #[test]
    fn test_map_layout() {
        let mut map = BTreeMap::new();
        map.insert(2u8, 0x0bu16);
        map.insert(1u8, 0x0au16);

        let bytes = serialize(&map).unwrap();
        assert_eq!(bytes, vec![0x02, 0x01, 0x0a, 0x00, 0x02, 0x0b, 0x00]);
        assert_eq!(deserialize::<BTreeMap<u8, u16>>(&bytes).unwrap(), map);
    }

    #[test]
    fn test_map_duplicate_key_first_wins() {
        let bytes = [0x03, 0x05, 0xaa, 0x06, 0xbb, 0x05, 0xcc];
        let map: BTreeMap<u8, u8> = deserialize(&bytes).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map[&5], 0xaa);
        assert_eq!(map[&6], 0xbb);
    }

    #[test]
    fn test_set_roundtrip_and_duplicates() {
        let set: BTreeSet<String> = ["b", "a"].into_iter().map(str::to_owned).collect();
        let bytes = serialize(&set).unwrap();
        assert_eq!(bytes, vec![0x02, 0x01, b'a', 0x01, b'b']);
        assert_eq!(deserialize::<BTreeSet<String>>(&bytes).unwrap(), set);

        let repeated = [0x03, 0x07, 0x07, 0x08];
        let decoded: BTreeSet<u8> = deserialize(&repeated).unwrap();
        assert_eq!(decoded.into_iter().collect::<Vec<_>>(), vec![7, 8]);
    }

    #[test]
    fn test_map_count_is_not_trusted_for_allocation() {
        // Declares MAX_SIZE entries but carries one.
        let bytes = [0xfe, 0xff, 0xff, 0xff, 0xff, 0x01, 0x02];
        let result = deserialize::<BTreeMap<u8, u8>>(&bytes);
        assert!(matches!(result, Err(Error::Underrun { .. })));
    }

    #[test]
    fn test_tuples_concatenate_fields() {
        let value = (1u8, 2u16, (true, -1i32));
        let bytes = serialize(&value).unwrap();
        assert_eq!(bytes, vec![0x01, 0x02, 0x00, 0x01, 0xff, 0xff, 0xff, 0xff]);
        assert_eq!(deserialize::<(u8, u16, (bool, i32))>(&bytes).unwrap(), value);
    }

    #[test]
    fn test_pointers_are_transparent() {
        let boxed = Box::new(0x1234u16);
        let shared = Arc::new(vec![1u8, 2]);
        assert_eq!(serialize(&boxed).unwrap(), serialize(&0x1234u16).unwrap());
        assert_eq!(serialize(&shared).unwrap(), vec![0x02, 0x01, 0x02]);

        let decoded: Arc<Vec<u8>> = deserialize(&[0x01, 0x09]).unwrap();
        assert_eq!(*decoded, vec![9]);
        let decoded: Box<u16> = deserialize(&[0x34, 0x12]).unwrap();
        assert_eq!(*decoded, 0x1234);
    }

    #[test]
    fn test_uuid_is_sixteen_raw_bytes() {
        let id = Uuid::from_bytes([
            0x67, 0xe5, 0x50, 0x44, 0x10, 0xb1, 0x42, 0x6f, 0x92, 0x47, 0xbb, 0x68, 0x0e, 0x5f, 0xe0,
            0xc8,
        ]);
        let bytes = serialize(&id).unwrap();
        assert_eq!(bytes.as_slice(), id.as_bytes());
        assert_eq!(serialized_size(&id).unwrap(), 16);
        assert_eq!(deserialize::<Uuid>(&bytes).unwrap(), id);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_map_roundtrip(map in prop::collection::btree_map(any::<u32>(), ".{0,8}", 0..64)) {
                let bytes = serialize(&map).unwrap();
                prop_assert_eq!(serialized_size(&map).unwrap(), bytes.len());
                prop_assert_eq!(deserialize::<BTreeMap<u32, String>>(&bytes).unwrap(), map);
            }

            #[test]
            fn prop_set_roundtrip(set in prop::collection::btree_set(any::<i64>(), 0..64)) {
                let bytes = serialize(&set).unwrap();
                prop_assert_eq!(deserialize::<BTreeSet<i64>>(&bytes).unwrap(), set);
            }
        }
    }
}
