/// Implement [`Serializable`](crate::Serializable) and
/// [`Deserializable`](crate::Deserializable) for a struct by listing its
/// fields in wire order.
///
/// Every listed field must itself implement both traits. Fields are written
/// and read in the order given, with no framing between them.
///
/// ```
/// use svwire::impl_serializable;
///
/// #[derive(Debug, PartialEq)]
/// struct OutPoint {
///     hash: [u8; 32],
///     index: u32,
/// }
///
/// impl_serializable!(OutPoint { hash, index });
///
/// let point = OutPoint { hash: [7; 32], index: 1 };
/// let bytes = svwire::serialize(&point).unwrap();
/// assert_eq!(bytes.len(), 36);
/// assert_eq!(svwire::deserialize::<OutPoint>(&bytes).unwrap(), point);
/// ```
#[macro_export]
macro_rules! impl_serializable {
    ($ty:ty { $($field:ident),+ $(,)? }) => {
        impl $crate::Serializable for $ty {
            fn serialize<S: $crate::stream::WriteStream + ?Sized>(
                &self,
                s: &mut S,
            ) -> $crate::Result<()> {
                $( $crate::Serializable::serialize(&self.$field, s)?; )+
                Ok(())
            }
        }

        impl $crate::Deserializable for $ty {
            fn deserialize<R: $crate::stream::ReadStream + ?Sized>(
                s: &mut R,
            ) -> $crate::Result<Self> {
                Ok(Self {
                    $( $field: $crate::Deserializable::deserialize(s)?, )+
                })
            }
        }
    };
}
