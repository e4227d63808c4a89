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

/// How a combined double-hash value is reduced to a bit position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BitIndexing {
    /// `(h1 + i * h2) mod m` over the full unsigned 64-bit range.
    #[default]
    Unsigned,
    /// Clears bit 63 of `h1 + i * h2` before the modulus.
    ///
    /// This drops one bit of hash entropy but reproduces the positions chosen by filters built on
    /// signed 64-bit arithmetic, which is useful when bit patterns must match such a filter.
    SignMasked,
}

impl BitIndexing {
    #[inline]
    fn reduce(self, combined: u64, num_bits: u64) -> u64 {
        match self {
            BitIndexing::Unsigned => combined % num_bits,
            BitIndexing::SignMasked => (combined & i64::MAX as u64) % num_bits,
        }
    }
}

/// Iterator over the `k` bit positions of one value (Kirsch-Mitzenmacher double hashing).
#[derive(Debug, Clone)]
pub(crate) struct BitIndexes {
    h1: u64,
    h2: u64,
    next: u32,
    num_hashes: u32,
    num_bits: u64,
    indexing: BitIndexing,
}

impl BitIndexes {
    pub fn new(h1: u64, h2: u64, num_hashes: u32, num_bits: u64, indexing: BitIndexing) -> Self {
        debug_assert!(num_bits > 0);
        BitIndexes {
            h1,
            h2,
            next: 0,
            num_hashes,
            num_bits,
            indexing,
        }
    }
}

impl Iterator for BitIndexes {
    type Item = u64;

    #[inline]
    fn next(&mut self) -> Option<u64> {
        if self.next >= self.num_hashes {
            return None;
        }
        let combined = self
            .h1
            .wrapping_add(u64::from(self.next).wrapping_mul(self.h2));
        self.next += 1;
        Some(self.indexing.reduce(combined, self.num_bits))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.num_hashes - self.next) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for BitIndexes {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yields_num_hashes_positions() {
        let indexes = BitIndexes::new(7, 11, 5, 1000, BitIndexing::Unsigned);
        assert_eq!(indexes.len(), 5);
        assert_eq!(indexes.collect::<Vec<_>>(), vec![7, 18, 29, 40, 51]);
    }

    #[test]
    fn test_positions_stay_in_range() {
        let indexes = BitIndexes::new(u64::MAX - 3, u64::MAX / 3, 16, 997, BitIndexing::Unsigned);
        assert!(indexes.clone().all(|i| i < 997));

        let masked = BitIndexes::new(u64::MAX - 3, u64::MAX / 3, 16, 997, BitIndexing::SignMasked);
        assert!(masked.clone().all(|i| i < 997));
    }

    #[test]
    fn test_sign_masked_matches_signed_arithmetic() {
        let h1 = 0xe34bbc7bbc071b6c_u64;
        let h2 = 0x7a433ca9c49a9347_u64;
        let num_bits = 9_585_059_u64;

        let expected: Vec<u64> = (0..7_i64)
            .map(|i| {
                let combined = (h1 as i64).wrapping_add(i.wrapping_mul(h2 as i64)) & i64::MAX;
                (combined % num_bits as i64) as u64
            })
            .collect();
        let actual: Vec<u64> =
            BitIndexes::new(h1, h2, 7, num_bits, BitIndexing::SignMasked).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_strategies_differ_only_above_sign_bit() {
        // With h1 below 2^63 and h2 zero, every combined value already has a clear sign bit.
        let unsigned: Vec<u64> = BitIndexes::new(12_345, 0, 4, 101, BitIndexing::Unsigned).collect();
        let masked: Vec<u64> = BitIndexes::new(12_345, 0, 4, 101, BitIndexing::SignMasked).collect();
        assert_eq!(unsigned, masked);

        let unsigned = BitIndexes::new(1 << 63, 0, 1, 3, BitIndexing::Unsigned).next();
        let masked = BitIndexes::new(1 << 63, 0, 1, 3, BitIndexing::SignMasked).next();
        assert_eq!(unsigned, Some((1u64 << 63) % 3));
        assert_eq!(masked, Some(0));
    }
}
