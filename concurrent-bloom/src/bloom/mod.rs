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

//! Concurrent Bloom filter for probabilistic set membership testing.
//!
//! A Bloom filter is a space-efficient probabilistic data structure used to test whether
//! an element is a member of a set. False positive matches are possible, but false negatives
//! are not. In other words, a query returns either "possibly in set" or "definitely not in set".
//! It is typically placed in front of an expensive existence check, such as a storage lookup,
//! so that most misses never reach it.
//!
//! # Properties
//!
//! - **No false negatives**: once `add()` returns, `might_contain()` is `true` for that value
//! - **Possible false positives**: `might_contain()` may return `true` for values never added
//! - **Fixed size**: the bit array is sized once from the design capacity and never resized
//! - **Lock-free**: `add()` and `might_contain()` take `&self` and may run on any number of
//!   threads at once
//!
//! # Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use std::thread;
//!
//! use concurrent_bloom::bloom::BloomFilter;
//!
//! // Create a filter optimized for 1000 items with 1% false positive rate
//! let filter = Arc::new(BloomFilter::new(1000, 0.01).unwrap());
//!
//! let handles: Vec<_> = (0..4_u64)
//!     .map(|t| {
//!         let filter = Arc::clone(&filter);
//!         thread::spawn(move || {
//!             for i in 0..250 {
//!                 filter.add(&(t * 250 + i));
//!             }
//!         })
//!     })
//!     .collect();
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//!
//! assert!((0..1000_u64).all(|i| filter.might_contain(&i)));
//! println!("{}", filter.metrics());
//! ```
//!
//! # Sizing
//!
//! For `n` expected insertions and target false positive probability `p`:
//!
//! - bits: `m = ceil(-n * ln(p) / ln(2)^2)`
//! - hash functions: `k = max(1, round(m / n * ln(2)))`
//!
//! Each value is hashed once with MurmurHash3 x64 128; the two 64-bit halves `h1`, `h2` yield the
//! `k` positions `h1 + i * h2 (mod m)` for `i` in `0..k`.
//!
//! # Capacity
//!
//! Inserting more than `1.2 * n` values does not fail, but the false positive rate climbs above
//! `p`. The filter reports this through an [`AdvisorySink`]; by default a single `tracing`
//! warning is logged. See [`AdvisoryPolicy`].
//!
//! # Keys
//!
//! Values are hashed through their [`BloomKey`] byte encoding, which must be stable. Strings,
//! byte slices and integers are supported out of the box.

mod advisory;
mod bitset;
mod builder;
mod factory;
mod index;
mod key;
mod metrics;
mod params;
mod sketch;

pub use self::advisory::AdvisoryPolicy;
pub use self::advisory::AdvisorySink;
pub use self::advisory::CapacityExceeded;
pub use self::advisory::TracingSink;
pub use self::builder::BloomFilterBuilder;
pub use self::factory::BloomFilterFactory;
pub use self::factory::DEFAULT_EXPECTED_INSERTIONS;
pub use self::factory::DEFAULT_FPP;
pub use self::factory::FilterFactory;
pub use self::factory::MembershipFilter;
pub use self::index::BitIndexing;
pub use self::key::BloomKey;
pub use self::metrics::FilterMetrics;
pub use self::params::FilterParams;
pub use self::params::MAX_NUM_BITS;
pub use self::params::expected_fpp;
pub use self::params::optimal_num_bits;
pub use self::params::optimal_num_hashes;
pub use self::sketch::BloomFilter;
