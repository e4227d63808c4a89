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

use super::BitIndexing;
use super::BloomFilterBuilder;
use super::BloomKey;
use super::FilterMetrics;
use super::FilterParams;
use super::advisory::CapacityMonitor;
use super::bitset::AtomicBitSet;
use super::index::BitIndexes;
use crate::error::Error;
use crate::hash::hash128;

/// A Bloom filter that many threads can update and query at once.
///
/// Provides membership queries with:
/// - No false negatives (inserted items always return `true`)
/// - A false positive rate near the configured target while within capacity
/// - Constant space, fixed at construction
///
/// All operations take `&self`. Bits are set with a compare-and-swap loop on 64-bit words and
/// never cleared, so no operation takes a lock and answers are monotonic. Share the filter
/// across threads with `Arc` or scoped borrows.
///
/// # Examples
///
/// ```
/// use concurrent_bloom::bloom::BloomFilter;
///
/// let filter = BloomFilter::new(1_000, 0.01).unwrap();
/// filter.add("hello");
/// filter.add(&42_u64);
///
/// assert!(filter.might_contain("hello"));
/// assert!(filter.might_contain(&42_u64));
/// assert_eq!(filter.inserted_count(), 2);
/// ```
pub struct BloomFilter {
    params: FilterParams,
    seed: u32,
    indexing: BitIndexing,
    bits: AtomicBitSet,
    inserted: AtomicU64,
    monitor: CapacityMonitor,
}

impl BloomFilter {
    /// Creates a filter sized for `expected_insertions` items at false positive probability
    /// `fpp`, with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidParameter`](crate::error::ErrorKind::InvalidParameter) if
    /// `expected_insertions` is zero or `fpp` is outside `(0, 1)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use concurrent_bloom::bloom::BloomFilter;
    /// use concurrent_bloom::error::ErrorKind;
    ///
    /// assert!(BloomFilter::new(100, 0.01).is_ok());
    /// let err = BloomFilter::new(100, 1.5).unwrap_err();
    /// assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    /// ```
    pub fn new(expected_insertions: u64, fpp: f64) -> Result<Self, Error> {
        BloomFilterBuilder::with_accuracy(expected_insertions, fpp).build()
    }

    /// Returns a builder for a filter with non-default settings.
    pub fn builder(expected_insertions: u64, fpp: f64) -> BloomFilterBuilder {
        BloomFilterBuilder::with_accuracy(expected_insertions, fpp)
    }

    pub(crate) fn from_parts(
        params: FilterParams,
        seed: u32,
        indexing: BitIndexing,
        monitor: CapacityMonitor,
    ) -> Self {
        BloomFilter {
            params,
            seed,
            indexing,
            bits: AtomicBitSet::new(params.num_bits()),
            inserted: AtomicU64::new(0),
            monitor,
        }
    }

    // ========================================================================
    // Update Operations
    // ========================================================================

    /// Inserts a value.
    ///
    /// Once this returns, [`might_contain`](Self::might_contain) is `true` for the value on
    /// every thread that observes the return. If the insertion count moves past
    /// `1.2 * expected_insertions`, a capacity advisory goes to the configured sink; the insert
    /// itself always succeeds.
    pub fn add<T: BloomKey + ?Sized>(&self, value: &T) {
        for index in self.bit_indexes(value) {
            self.bits.set(index);
        }
        self.record_insertion();
    }

    /// Inserts a value and returns whether it was possibly present before.
    ///
    /// Returns `false` when this call set at least one bit, i.e. the value was definitely new.
    ///
    /// # Examples
    ///
    /// ```
    /// # use concurrent_bloom::bloom::BloomFilter;
    /// let filter = BloomFilter::new(100, 0.01).unwrap();
    /// assert!(!filter.check_and_add("apple"));
    /// assert!(filter.check_and_add("apple"));
    /// ```
    pub fn check_and_add<T: BloomKey + ?Sized>(&self, value: &T) -> bool {
        let mut was_present = true;
        for index in self.bit_indexes(value) {
            if self.bits.set(index) {
                was_present = false;
            }
        }
        self.record_insertion();
        was_present
    }

    // ========================================================================
    // Query Operations
    // ========================================================================

    /// Tests whether a value is possibly in the set.
    ///
    /// Returns:
    /// - `true`: the value was **possibly** inserted (or this is a false positive)
    /// - `false`: the value was **definitely not** inserted before this call began
    ///
    /// A query racing an unfinished [`add`](Self::add) of the same value may return `false`.
    pub fn might_contain<T: BloomKey + ?Sized>(&self, value: &T) -> bool {
        self.bit_indexes(value).all(|index| self.bits.get(index))
    }

    // ========================================================================
    // Statistics and Properties
    // ========================================================================

    /// Returns the design capacity.
    pub fn expected_insertions(&self) -> u64 {
        self.params.expected_insertions()
    }

    /// Returns the target false positive probability.
    pub fn fpp(&self) -> f64 {
        self.params.fpp()
    }

    /// Returns the total number of bits in the filter.
    pub fn bit_count(&self) -> u64 {
        self.params.num_bits()
    }

    /// Returns the number of hash functions used.
    pub fn num_hashes(&self) -> u32 {
        self.params.num_hashes()
    }

    /// Returns the derived sizing parameters.
    pub fn params(&self) -> &FilterParams {
        &self.params
    }

    /// Returns the hash seed.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Returns how combined hashes are reduced to bit positions.
    pub fn indexing(&self) -> BitIndexing {
        self.indexing
    }

    /// Returns the number of `add` calls so far, duplicates included.
    pub fn inserted_count(&self) -> u64 {
        self.inserted.load(Ordering::Relaxed)
    }

    /// Returns the number of bits set to 1.
    pub fn bits_set(&self) -> u64 {
        self.bits.count_ones()
    }

    /// Returns the fraction of bits set.
    pub fn load_factor(&self) -> f64 {
        self.bits_set() as f64 / self.bit_count() as f64
    }

    /// Estimates the current false positive probability from the bit load: `(bits_set / m)^k`.
    pub fn estimated_fpp(&self) -> f64 {
        self.load_factor().powi(self.num_hashes() as i32)
    }

    /// Returns whether the insertion count is past the capacity threshold.
    pub fn is_over_capacity(&self) -> bool {
        self.inserted_count() > self.monitor.threshold()
    }

    /// Takes a snapshot of the filter's configuration and fill state.
    ///
    /// # Examples
    ///
    /// ```
    /// # use concurrent_bloom::bloom::BloomFilter;
    /// let filter = BloomFilter::new(1_000_000, 0.01).unwrap();
    /// let metrics = filter.metrics();
    /// assert_eq!(metrics.bit_count, 9_585_059);
    /// assert_eq!(metrics.num_hashes, 7);
    /// assert_eq!(metrics.num_words, 149_767);
    /// assert_eq!(metrics.estimated_memory_bytes, 149_767 * 8);
    /// ```
    pub fn metrics(&self) -> FilterMetrics {
        let num_words = self.bits.num_words();
        let bits_set = self.bits_set();
        let load = bits_set as f64 / self.bit_count() as f64;
        FilterMetrics {
            expected_insertions: self.expected_insertions(),
            fpp: self.fpp(),
            bit_count: self.bit_count(),
            num_hashes: self.num_hashes(),
            num_words,
            estimated_memory_bytes: num_words as u64 * 8,
            inserted_count: self.inserted_count(),
            bits_set,
            estimated_fpp: load.powi(self.num_hashes() as i32),
        }
    }

    /// Logs a metrics snapshot as a single `tracing` info event.
    pub fn log_metrics(&self) {
        let metrics = self.metrics();
        tracing::info!(
            expected_insertions = metrics.expected_insertions,
            fpp = metrics.fpp,
            bit_count = metrics.bit_count,
            num_hashes = metrics.num_hashes,
            num_words = metrics.num_words,
            estimated_memory_bytes = metrics.estimated_memory_bytes,
            inserted_count = metrics.inserted_count,
            bits_set = metrics.bits_set,
            estimated_fpp = metrics.estimated_fpp,
            "bloom filter metrics"
        );
    }

    // ========================================================================
    // Internal Helpers
    // ========================================================================

    /// Hashes the value once and expands the two lanes into `k` bit positions.
    fn bit_indexes<T: BloomKey + ?Sized>(&self, value: &T) -> BitIndexes {
        let (h1, h2) = hash128(&value.key_bytes(), self.seed);
        BitIndexes::new(h1, h2, self.num_hashes(), self.bit_count(), self.indexing)
    }

    fn record_insertion(&self) {
        let inserted = self.inserted.fetch_add(1, Ordering::Relaxed) + 1;
        self.monitor.observe(inserted);
    }
}

impl fmt::Debug for BloomFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BloomFilter")
            .field("params", &self.params)
            .field("seed", &self.seed)
            .field("indexing", &self.indexing)
            .field("bits", &self.bits)
            .field("inserted", &self.inserted_count())
            .field("monitor", &self.monitor)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
