// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::borrow::Cow;

use byteorder::ByteOrder;
use byteorder::LE;

/// A value with a stable byte encoding that can be inserted into a Bloom filter.
///
/// The same logical value must always produce the same bytes, across calls, threads and process
/// restarts. Membership answers for a value whose encoding changes between `add` and
/// `might_contain` are meaningless.
///
/// Strings and byte containers hash their contents directly. Integers are encoded as fixed-width
/// little-endian bytes, so `1_u32` and `1_u64` are different keys.
///
/// # Examples
///
/// ```
/// use std::borrow::Cow;
///
/// use concurrent_bloom::bloom::BloomKey;
///
/// struct AccountId {
///     region: u16,
///     number: u64,
/// }
///
/// impl BloomKey for AccountId {
///     fn key_bytes(&self) -> Cow<'_, [u8]> {
///         let mut bytes = Vec::with_capacity(10);
///         bytes.extend_from_slice(&self.region.key_bytes());
///         bytes.extend_from_slice(&self.number.key_bytes());
///         Cow::Owned(bytes)
///     }
/// }
/// ```
pub trait BloomKey {
    /// Returns the stable byte representation of this value.
    fn key_bytes(&self) -> Cow<'_, [u8]>;
}

impl<T: BloomKey + ?Sized> BloomKey for &T {
    fn key_bytes(&self) -> Cow<'_, [u8]> {
        (**self).key_bytes()
    }
}

impl BloomKey for str {
    fn key_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_bytes())
    }
}

impl BloomKey for String {
    fn key_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_bytes())
    }
}

impl BloomKey for [u8] {
    fn key_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self)
    }
}

impl BloomKey for Vec<u8> {
    fn key_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_slice())
    }
}

impl<const N: usize> BloomKey for [u8; N] {
    fn key_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_slice())
    }
}

impl BloomKey for bool {
    fn key_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Owned(vec![u8::from(*self)])
    }
}

impl BloomKey for char {
    fn key_bytes(&self) -> Cow<'_, [u8]> {
        let mut buf = [0u8; 4];
        Cow::Owned(self.encode_utf8(&mut buf).as_bytes().to_vec())
    }
}

impl BloomKey for u8 {
    fn key_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Owned(vec![*self])
    }
}

impl BloomKey for i8 {
    fn key_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Owned(vec![*self as u8])
    }
}

macro_rules! impl_bloom_key_for_int {
    ($($ty:ty => $write:ident),* $(,)?) => {
        $(
            impl BloomKey for $ty {
                fn key_bytes(&self) -> Cow<'_, [u8]> {
                    let mut buf = vec![0u8; size_of::<$ty>()];
                    LE::$write(&mut buf, *self);
                    Cow::Owned(buf)
                }
            }
        )*
    };
}

impl_bloom_key_for_int! {
    u16 => write_u16,
    u32 => write_u32,
    u64 => write_u64,
    u128 => write_u128,
    i16 => write_i16,
    i32 => write_i32,
    i64 => write_i64,
    i128 => write_i128,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strings_borrow_utf8() {
        let owned = String::from("héllo");
        assert!(matches!("héllo".key_bytes(), Cow::Borrowed(_)));
        assert_eq!(owned.key_bytes(), "héllo".key_bytes());
        assert_eq!("héllo".key_bytes().as_ref(), "héllo".as_bytes());
    }

    #[test]
    fn test_byte_containers_agree() {
        let array = [1u8, 2, 3];
        let vec = vec![1u8, 2, 3];
        assert_eq!(array.key_bytes(), vec.key_bytes());
        assert_eq!(array[..].key_bytes(), vec.key_bytes());
    }

    #[test]
    fn test_integers_are_little_endian() {
        assert_eq!(0x0102_u16.key_bytes().as_ref(), &[0x02, 0x01]);
        assert_eq!(1_u32.key_bytes().as_ref(), &[1, 0, 0, 0]);
        assert_eq!((-1_i64).key_bytes().as_ref(), &[0xff; 8]);
        assert_eq!(1_u128.key_bytes().len(), 16);
        assert_eq!((-2_i8).key_bytes().as_ref(), &[0xfe]);
    }

    #[test]
    fn test_width_distinguishes_keys() {
        assert_ne!(1_u32.key_bytes(), 1_u64.key_bytes());
    }

    #[test]
    fn test_references_forward() {
        let value = 42_u64;
        let reference = &value;
        assert_eq!(reference.key_bytes(), value.key_bytes());
        assert_eq!('é'.key_bytes().as_ref(), "é".as_bytes());
        assert_eq!(true.key_bytes().as_ref(), &[1]);
    }
}
