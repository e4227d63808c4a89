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

//! Walkthrough of basic filter usage

use concurrent_bloom::bloom::BloomFilter;
use concurrent_bloom::bloom::BloomFilterFactory;
use concurrent_bloom::bloom::FilterFactory;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("=== Bloom Filter Example ===\n");

    // Example 1: Sizing
    println!("1. Filter sized for 1,000,000 values at 1% false positives:");
    let filter = BloomFilterFactory::default().create();
    println!("{}", filter.metrics());
    filter.log_metrics();
    println!();

    // Example 2: Membership
    println!("2. Insert and query:");
    filter.add("hello");
    filter.add("world");
    for word in ["hello", "world", "namaste"] {
        println!("   might_contain({word:?}) = {}", filter.might_contain(word));
    }
    println!();

    // Example 3: Overfilling a small filter
    println!("3. Overfill a filter sized for 100 values:");
    let small = match BloomFilter::new(100, 0.01) {
        Ok(filter) => filter,
        Err(err) => {
            eprintln!("failed to build filter: {err}");
            std::process::exit(1);
        }
    };
    for i in 0..150_u32 {
        small.add(&i);
    }
    println!("   over capacity: {}", small.is_over_capacity());
    println!("   estimated fpp: {:.4}", small.estimated_fpp());
    println!();

    // Example 4: Invalid configuration
    println!("4. Reject an invalid false positive rate:");
    if let Err(err) = BloomFilter::new(100, 1.5) {
        println!("   {err}");
    }
}
