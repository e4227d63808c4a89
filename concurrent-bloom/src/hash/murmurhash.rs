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

/// Hashes `bytes` with MurmurHash3 x64 128 and returns the two 64-bit lanes `(h1, h2)`.
///
/// `h1` is the low lane and `h2` the high lane of the 128-bit digest, i.e. the first and second
/// little-endian words of the digest's canonical byte form. The function is pure; no hasher state
/// outlives the call.
///
/// # Examples
///
/// ```
/// use concurrent_bloom::hash::hash128;
///
/// let (h1, h2) = hash128(b"The quick brown fox jumps over the lazy dog", 0);
/// assert_eq!(h1, 0xe34bbc7bbc071b6c);
/// assert_eq!(h2, 0x7a433ca9c49a9347);
/// ```
#[inline]
pub fn hash128(bytes: &[u8], seed: u32) -> (u64, u64) {
    mur3::murmurhash3_x64_128(bytes, seed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remainder() {
        // remainder > 8
        let key = "The quick brown fox jumps over the lazy dog";
        let (h1, h2) = hash128(key.as_bytes(), 0);
        assert_eq!(h1, 0xe34bbc7bbc071b6c);
        assert_eq!(h2, 0x7a433ca9c49a9347);

        // change one bit
        let key = "The quick brown fox jumps over the lazy eog";
        let (h1, h2) = hash128(key.as_bytes(), 0);
        assert_eq!(h1, 0x362108102c62d1c9);
        assert_eq!(h2, 0x3285cd100292b305);

        // test a remainder < 8
        let key = "The quick brown fox jumps over the lazy dogdogdog";
        let (h1, h2) = hash128(key.as_bytes(), 0);
        assert_eq!(h1, 0x9c8205300e612fc4);
        assert_eq!(h2, 0xcbc0af6136aa3df9);

        // test a remainder = 8
        let key = "The quick brown fox jumps over the lazy1";
        let (h1, h2) = hash128(key.as_bytes(), 0);
        assert_eq!(h1, 0xe3301a827e5cdfe3);
        assert_eq!(h2, 0xbdbf05f8da0f0392);

        // test a remainder = 0
        let key = "The quick brown fox jumps over t";
        let (h1, h2) = hash128(key.as_bytes(), 0);
        assert_eq!(h1, 0xdf6af91bb29bdacf);
        assert_eq!(h2, 0x91a341c58df1f3a6);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(hash128(&[], 0), (0, 0));
    }

    #[test]
    fn test_seed_changes_lanes() {
        let unseeded = hash128(b"apple", 0);
        let seeded = hash128(b"apple", 9001);
        assert_ne!(unseeded, seeded);
        assert_eq!(seeded, hash128(b"apple", 9001));
    }
}
