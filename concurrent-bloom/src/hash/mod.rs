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

//! Hash functions used to map values onto filter bits.

mod murmurhash;

pub use self::murmurhash::hash128;

/// The seed used when no seed is configured.
///
/// Zero keeps the derived bit positions identical to other MurmurHash3 x64 128 Bloom filters
/// that hash with the unseeded function. Filters only agree on positions when they share the
/// same seed, so changing it invalidates any externally recorded expectations about which bits
/// a value sets.
pub const DEFAULT_SEED: u32 = 0;
