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
use std::sync::Arc;

use super::AdvisoryPolicy;
use super::AdvisorySink;
use super::BitIndexing;
use super::BloomFilter;
use super::FilterParams;
use super::TracingSink;
use super::advisory::CapacityMonitor;
use crate::error::Error;
use crate::hash::DEFAULT_SEED;

/// Builder for creating [`BloomFilter`] instances.
///
/// Sizing always comes from a design capacity and a target false positive rate; everything else
/// has a default:
///
/// | Setting | Default |
/// |---|---|
/// | [`seed`](Self::seed) | `0` |
/// | [`indexing`](Self::indexing) | [`BitIndexing::Unsigned`] |
/// | [`advisory_policy`](Self::advisory_policy) | [`AdvisoryPolicy::Once`] |
/// | [`advisory_sink`](Self::advisory_sink) | [`TracingSink`] |
///
/// # Examples
///
/// ```
/// use concurrent_bloom::bloom::AdvisoryPolicy;
/// use concurrent_bloom::bloom::BitIndexing;
/// use concurrent_bloom::bloom::BloomFilterBuilder;
///
/// let filter = BloomFilterBuilder::with_accuracy(10_000, 0.001)
///     .seed(42)
///     .indexing(BitIndexing::SignMasked)
///     .advisory_policy(AdvisoryPolicy::EveryInsertion)
///     .build()
///     .unwrap();
/// assert_eq!(filter.seed(), 42);
/// ```
#[derive(Clone)]
pub struct BloomFilterBuilder {
    expected_insertions: u64,
    fpp: f64,
    seed: u32,
    indexing: BitIndexing,
    advisory_policy: AdvisoryPolicy,
    advisory_sink: Arc<dyn AdvisorySink>,
}

impl BloomFilterBuilder {
    /// Creates a builder for a filter holding `expected_insertions` items at false positive
    /// probability `fpp`.
    ///
    /// Inputs are validated by [`build()`](Self::build).
    pub fn with_accuracy(expected_insertions: u64, fpp: f64) -> Self {
        BloomFilterBuilder {
            expected_insertions,
            fpp,
            seed: DEFAULT_SEED,
            indexing: BitIndexing::default(),
            advisory_policy: AdvisoryPolicy::default(),
            advisory_sink: Arc::new(TracingSink),
        }
    }

    /// Sets the MurmurHash3 seed (default: 0).
    pub fn seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    /// Sets how combined hashes are reduced to bit positions.
    pub fn indexing(mut self, indexing: BitIndexing) -> Self {
        self.indexing = indexing;
        self
    }

    /// Sets when capacity advisories are delivered.
    pub fn advisory_policy(mut self, policy: AdvisoryPolicy) -> Self {
        self.advisory_policy = policy;
        self
    }

    /// Sets the receiver of capacity advisories.
    pub fn advisory_sink(mut self, sink: Arc<dyn AdvisorySink>) -> Self {
        self.advisory_sink = sink;
        self
    }

    /// Validates the configuration and derives the filter parameters without allocating.
    ///
    /// # Errors
    ///
    /// See [`FilterParams::derive`].
    pub fn params(&self) -> Result<FilterParams, Error> {
        FilterParams::derive(self.expected_insertions, self.fpp)
    }

    /// Builds the Bloom filter.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidParameter`](crate::error::ErrorKind::InvalidParameter) if
    /// `expected_insertions` is zero, `fpp` is outside `(0, 1)`, or the filter would be larger
    /// than [`MAX_NUM_BITS`](super::MAX_NUM_BITS). Nothing is allocated on error.
    pub fn build(self) -> Result<BloomFilter, Error> {
        let params = self.params()?;
        Ok(self.build_with(params))
    }

    /// Builds a filter from parameters that were already validated.
    pub(crate) fn build_with(&self, params: FilterParams) -> BloomFilter {
        let monitor = CapacityMonitor::new(
            params.expected_insertions(),
            params.capacity_threshold(),
            self.advisory_policy,
            Arc::clone(&self.advisory_sink),
        );
        BloomFilter::from_parts(params, self.seed, self.indexing, monitor)
    }
}

impl fmt::Debug for BloomFilterBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BloomFilterBuilder")
            .field("expected_insertions", &self.expected_insertions)
            .field("fpp", &self.fpp)
            .field("seed", &self.seed)
            .field("indexing", &self.indexing)
            .field("advisory_policy", &self.advisory_policy)
            .finish_non_exhaustive()
    }
}
