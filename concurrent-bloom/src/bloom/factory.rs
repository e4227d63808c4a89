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

use super::BloomFilter;
use super::BloomFilterBuilder;
use super::BloomKey;
use super::FilterMetrics;
use super::FilterParams;
use crate::error::Error;

/// Design capacity of filters made by [`BloomFilterFactory::default()`].
pub const DEFAULT_EXPECTED_INSERTIONS: u64 = 1_000_000;

/// Target false positive probability of filters made by [`BloomFilterFactory::default()`].
pub const DEFAULT_FPP: f64 = 0.01;

/// The capability set of a probabilistic membership filter over values of type `T`.
///
/// The trait is object safe, so callers that only need membership checks can hold a
/// `Box<dyn MembershipFilter<str> + Send + Sync>` without naming the concrete filter.
pub trait MembershipFilter<T: ?Sized> {
    /// Inserts a value.
    fn add(&self, value: &T);

    /// Returns `false` if the value was definitely never inserted.
    fn might_contain(&self, value: &T) -> bool;

    /// Takes a snapshot of the filter's configuration and fill state.
    fn metrics(&self) -> FilterMetrics;
}

impl<T: BloomKey + ?Sized> MembershipFilter<T> for BloomFilter {
    fn add(&self, value: &T) {
        BloomFilter::add(self, value)
    }

    fn might_contain(&self, value: &T) -> bool {
        BloomFilter::might_contain(self, value)
    }

    fn metrics(&self) -> FilterMetrics {
        BloomFilter::metrics(self)
    }
}

/// Zero-argument construction of filters.
///
/// Any `Fn() -> F` closure is a factory, which lets callers inject construction without naming
/// a factory type.
pub trait FilterFactory {
    /// The filter type produced.
    type Filter;

    /// Creates a fresh, empty filter.
    fn create(&self) -> Self::Filter;
}

impl<F, R> FilterFactory for F
where
    F: Fn() -> R,
{
    type Filter = R;

    fn create(&self) -> R {
        self()
    }
}

/// Factory producing identically configured [`BloomFilter`]s.
///
/// Configuration is validated once, when the factory is made, so [`create`](FilterFactory::create)
/// cannot fail.
///
/// # Examples
///
/// ```
/// use concurrent_bloom::bloom::BloomFilter;
/// use concurrent_bloom::bloom::BloomFilterFactory;
/// use concurrent_bloom::bloom::FilterFactory;
///
/// let factory = BloomFilterFactory::new(BloomFilter::builder(10_000, 0.001)).unwrap();
/// let filter = factory.create();
/// assert_eq!(filter.expected_insertions(), 10_000);
/// ```
#[derive(Debug, Clone)]
pub struct BloomFilterFactory {
    builder: BloomFilterBuilder,
    params: FilterParams,
}

impl BloomFilterFactory {
    /// Creates a factory from a builder.
    ///
    /// # Errors
    ///
    /// Returns the error [`BloomFilterBuilder::build`] would return for this configuration.
    pub fn new(builder: BloomFilterBuilder) -> Result<Self, Error> {
        let params = builder.params()?;
        Ok(BloomFilterFactory { builder, params })
    }

    /// Returns the parameters every created filter uses.
    pub fn params(&self) -> &FilterParams {
        &self.params
    }
}

impl Default for BloomFilterFactory {
    /// A factory for filters holding 1,000,000 insertions at 1% false positive probability.
    fn default() -> Self {
        BloomFilterFactory {
            builder: BloomFilterBuilder::with_accuracy(DEFAULT_EXPECTED_INSERTIONS, DEFAULT_FPP),
            params: FilterParams::compute(DEFAULT_EXPECTED_INSERTIONS, DEFAULT_FPP),
        }
    }
}

impl FilterFactory for BloomFilterFactory {
    type Filter = BloomFilter;

    fn create(&self) -> BloomFilter {
        self.builder.build_with(self.params)
    }
}
