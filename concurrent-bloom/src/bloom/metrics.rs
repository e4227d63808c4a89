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

const MIB: f64 = 1024.0 * 1024.0;

/// Point-in-time snapshot of a filter's configuration and fill state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterMetrics {
    /// Design capacity.
    pub expected_insertions: u64,
    /// Target false positive probability.
    pub fpp: f64,
    /// Number of bits in the filter (m).
    pub bit_count: u64,
    /// Number of hash functions (k).
    pub num_hashes: u32,
    /// Number of 64-bit words backing the bit array.
    pub num_words: usize,
    /// Heap bytes held by the bit array.
    pub estimated_memory_bytes: u64,
    /// Number of `add` calls so far, duplicates included.
    pub inserted_count: u64,
    /// Number of bits currently set.
    pub bits_set: u64,
    /// False positive probability implied by the current bit load: `(bits_set / m)^k`.
    pub estimated_fpp: f64,
}

impl FilterMetrics {
    /// Returns the fraction of bits set.
    pub fn load_factor(&self) -> f64 {
        self.bits_set as f64 / self.bit_count as f64
    }

    /// Returns the bit array size in mebibytes.
    pub fn estimated_memory_mib(&self) -> f64 {
        self.estimated_memory_bytes as f64 / MIB
    }
}

impl fmt::Display for FilterMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "expected insertions: {}", self.expected_insertions)?;
        writeln!(f, "target fpp: {}", self.fpp)?;
        writeln!(f, "bit count: {}", self.bit_count)?;
        writeln!(f, "hash functions: {}", self.num_hashes)?;
        writeln!(f, "bit array words: {}", self.num_words)?;
        writeln!(
            f,
            "memory: {} bytes ({:.2} MiB)",
            self.estimated_memory_bytes,
            self.estimated_memory_mib()
        )?;
        writeln!(f, "inserted: {}", self.inserted_count)?;
        writeln!(f, "bits set: {}", self.bits_set)?;
        write!(f, "estimated fpp: {:.6}", self.estimated_fpp)
    }
}
