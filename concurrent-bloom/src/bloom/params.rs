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

use std::f64::consts::LN_2;

use crate::error::Error;

/// Largest bit array a filter may allocate (~4 GiB of words).
pub const MAX_NUM_BITS: u64 = (1u64 << 35) - 64;

/// Sizing of a filter, derived once from its design capacity and target false positive rate.
///
/// # Examples
///
/// ```
/// use concurrent_bloom::bloom::FilterParams;
///
/// let params = FilterParams::derive(1_000_000, 0.01).unwrap();
/// assert_eq!(params.num_bits(), 9_585_059);
/// assert_eq!(params.num_hashes(), 7);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterParams {
    expected_insertions: u64,
    fpp: f64,
    num_bits: u64,
    num_hashes: u32,
}

impl FilterParams {
    /// Validates the inputs and derives the bit count and hash function count.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidParameter`](crate::error::ErrorKind::InvalidParameter) if
    /// `expected_insertions` is zero, `fpp` is not strictly between 0 and 1, or the derived bit
    /// count exceeds [`MAX_NUM_BITS`].
    pub fn derive(expected_insertions: u64, fpp: f64) -> Result<Self, Error> {
        if expected_insertions == 0 {
            return Err(
                Error::invalid_parameter("expected_insertions must be greater than 0")
                    .with_context("expected_insertions", expected_insertions),
            );
        }
        // Negated so that NaN is rejected too.
        if !(fpp > 0.0 && fpp < 1.0) {
            return Err(
                Error::invalid_parameter("fpp must be between 0.0 and 1.0 (exclusive)")
                    .with_context("fpp", fpp),
            );
        }

        let params = Self::compute(expected_insertions, fpp);
        if params.num_bits > MAX_NUM_BITS {
            return Err(Error::invalid_parameter(format!(
                "derived bit count must not exceed {MAX_NUM_BITS}"
            ))
            .with_context("expected_insertions", expected_insertions)
            .with_context("fpp", fpp)
            .with_context("num_bits", params.num_bits));
        }
        Ok(params)
    }

    /// Derives parameters from inputs already known to be in range.
    pub(crate) fn compute(expected_insertions: u64, fpp: f64) -> Self {
        let num_bits = optimal_num_bits(expected_insertions, fpp);
        let num_hashes = optimal_num_hashes(expected_insertions, num_bits);
        FilterParams {
            expected_insertions,
            fpp,
            num_bits,
            num_hashes,
        }
    }

    /// Returns the design capacity.
    pub fn expected_insertions(&self) -> u64 {
        self.expected_insertions
    }

    /// Returns the target false positive probability.
    pub fn fpp(&self) -> f64 {
        self.fpp
    }

    /// Returns the number of bits in the filter (m).
    pub fn num_bits(&self) -> u64 {
        self.num_bits
    }

    /// Returns the number of hash functions (k).
    pub fn num_hashes(&self) -> u32 {
        self.num_hashes
    }

    /// Returns the number of 64-bit words backing the bit array.
    pub fn num_words(&self) -> usize {
        self.num_bits.div_ceil(64) as usize
    }

    /// Returns the insertion count past which the filter reports it is over capacity.
    ///
    /// This is `floor(expected_insertions * 1.2)`, computed in integers.
    pub fn capacity_threshold(&self) -> u64 {
        let threshold = u128::from(self.expected_insertions) * 6 / 5;
        u64::try_from(threshold).unwrap_or(u64::MAX)
    }
}

/// Optimal number of bits for `expected_insertions` items at false positive rate `fpp`.
///
/// Formula: `m = ceil(-n * ln(p) / (ln(2)^2))`
///
/// # Examples
///
/// ```
/// # use concurrent_bloom::bloom::optimal_num_bits;
/// assert_eq!(optimal_num_bits(1000, 0.01), 9586);
/// ```
pub fn optimal_num_bits(expected_insertions: u64, fpp: f64) -> u64 {
    let n = expected_insertions as f64;
    (-n * fpp.ln() / (LN_2 * LN_2)).ceil() as u64
}

/// Optimal number of hash functions for `expected_insertions` items over `num_bits` bits.
///
/// Formula: `k = max(1, round(m / n * ln(2)))`
///
/// # Examples
///
/// ```
/// # use concurrent_bloom::bloom::optimal_num_hashes;
/// assert_eq!(optimal_num_hashes(1000, 9586), 7); // ≈ 6.64
/// assert_eq!(optimal_num_hashes(1000, 100), 1);
/// ```
pub fn optimal_num_hashes(expected_insertions: u64, num_bits: u64) -> u32 {
    let m = num_bits as f64;
    let n = expected_insertions as f64;
    ((m / n * LN_2).round() as u32).max(1)
}

/// Theoretical false positive probability after `insertions` distinct items.
///
/// Formula: `(1 - e^(-k*n/m))^k`
pub fn expected_fpp(num_bits: u64, num_hashes: u32, insertions: u64) -> f64 {
    let m = num_bits as f64;
    let k = f64::from(num_hashes);
    let n = insertions as f64;
    (1.0 - (-k * n / m).exp()).powf(k)
}
