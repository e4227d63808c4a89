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

use std::fmt;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

const WORD_BITS: u64 = 64;

/// Fixed-length bit array packed into 64-bit atomic words.
///
/// Bits are only ever set, never cleared, so every word changes monotonically. Setting a bit is a
/// compare-and-swap loop over the containing word; reading a bit is a single load. Both take
/// `&self` and never block.
pub(crate) struct AtomicBitSet {
    /// Length = ceil(num_bits / 64)
    words: Box<[AtomicU64]>,
    num_bits: u64,
}

impl AtomicBitSet {
    /// Allocates a zeroed bit set holding at least `num_bits` bits.
    pub fn new(num_bits: u64) -> Self {
        let num_words = num_bits.div_ceil(WORD_BITS) as usize;
        let words = (0..num_words).map(|_| AtomicU64::new(0)).collect();
        AtomicBitSet { words, num_bits }
    }

    /// Returns the number of backing 64-bit words.
    pub fn num_words(&self) -> usize {
        self.words.len()
    }

    /// Tests a single bit.
    #[inline]
    pub fn get(&self, index: u64) -> bool {
        let (word, mask) = self.locate(index);
        word.load(Ordering::Acquire) & mask != 0
    }

    /// Sets a single bit and returns whether this call flipped it from 0 to 1.
    ///
    /// Returns `false` without writing when the bit is already observed set. A failed exchange
    /// means another writer changed the word, so the loop retries against the value it observed.
    #[inline]
    pub fn set(&self, index: u64) -> bool {
        let (word, mask) = self.locate(index);
        let mut current = word.load(Ordering::Acquire);
        loop {
            if current & mask != 0 {
                return false;
            }
            match word.compare_exchange_weak(
                current,
                current | mask,
                Ordering::Release,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                Err(observed) => current = observed,
            }
        }
    }

    /// Counts the bits currently set.
    pub fn count_ones(&self) -> u64 {
        self.words
            .iter()
            .map(|word| u64::from(word.load(Ordering::Relaxed).count_ones()))
            .sum()
    }

    #[inline]
    fn locate(&self, index: u64) -> (&AtomicU64, u64) {
        debug_assert!(
            index < self.num_bits,
            "bit index {index} out of range for {} bits",
            self.num_bits
        );
        let word_index = (index / WORD_BITS) as usize;
        let mask = 1u64 << (index % WORD_BITS);
        (&self.words[word_index], mask)
    }
}

impl fmt::Debug for AtomicBitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AtomicBitSet")
            .field("num_bits", &self.num_bits)
            .field("num_words", &self.words.len())
            .field("bits_set", &self.count_ones())
            .finish()
    }
}
