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

//! Measures the observed false positive rate of a filter
//!
//! Inserts freshly generated values, then queries a second, disjoint batch of generated values
//! that were never inserted. Every positive answer on the second batch is a false positive.

use std::process::ExitCode;
use std::thread;
use std::time::Instant;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use clap::Parser;
use concurrent_bloom::bloom::AdvisoryPolicy;
use concurrent_bloom::bloom::BitIndexing;
use concurrent_bloom::bloom::BloomFilter;
use concurrent_bloom::bloom::expected_fpp;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(about = "Measure the empirical false positive rate of a concurrent Bloom filter")]
struct Args {
    /// Design capacity of the filter.
    #[arg(long, default_value_t = 1_000_000)]
    expected: u64,
    /// Target false positive probability.
    #[arg(long, default_value_t = 0.01)]
    fpp: f64,
    /// Number of values to insert. Values above `expected` overfill the filter.
    #[arg(long, default_value_t = 1_300_000)]
    insertions: u64,
    /// Number of never-inserted values to query.
    #[arg(long, default_value_t = 1_000_000)]
    queries: u64,
    /// Worker threads used for both phases.
    #[arg(long, default_value_t = 4)]
    threads: u64,
    /// Reduce hashes with the sign bit cleared instead of over the full unsigned range.
    #[arg(long)]
    sign_masked: bool,
}

/// A value unlikely to repeat: wall-clock milliseconds plus a random UUID.
fn generate_value() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    format!("{millis}-{}", Uuid::new_v4())
}

/// Splits `total` into `threads` near-equal shares.
fn shares(total: u64, threads: u64) -> impl Iterator<Item = u64> {
    let threads = threads.max(1);
    (0..threads).map(move |t| total / threads + u64::from(t < total % threads))
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let indexing = if args.sign_masked {
        BitIndexing::SignMasked
    } else {
        BitIndexing::Unsigned
    };
    let filter = match BloomFilter::builder(args.expected, args.fpp)
        .indexing(indexing)
        .advisory_policy(AdvisoryPolicy::Once)
        .build()
    {
        Ok(filter) => filter,
        Err(err) => {
            tracing::error!(%err, "invalid filter configuration");
            return ExitCode::FAILURE;
        }
    };
    filter.log_metrics();

    let start = Instant::now();
    thread::scope(|s| {
        for share in shares(args.insertions, args.threads) {
            let filter = &filter;
            s.spawn(move || {
                for _ in 0..share {
                    filter.add(&generate_value());
                }
            });
        }
    });
    tracing::info!(
        insertions = args.insertions,
        threads = args.threads,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "insert phase finished"
    );

    let start = Instant::now();
    let false_positives: u64 = thread::scope(|s| {
        let workers: Vec<_> = shares(args.queries, args.threads)
            .map(|share| {
                let filter = &filter;
                s.spawn(move || {
                    (0..share)
                        .filter(|_| filter.might_contain(&generate_value()))
                        .count() as u64
                })
            })
            .collect();
        workers
            .into_iter()
            .map(|worker| worker.join().unwrap_or(0))
            .sum()
    });
    tracing::info!(
        queries = args.queries,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "query phase finished"
    );

    let observed = false_positives as f64 / args.queries.max(1) as f64;
    let theoretical = expected_fpp(filter.bit_count(), filter.num_hashes(), args.insertions);
    tracing::info!(
        false_positives,
        observed_fpp = observed,
        theoretical_fpp = theoretical,
        target_fpp = args.fpp,
        "false positive check finished"
    );
    if observed < args.fpp {
        tracing::info!("false positives are within the configured target");
    } else {
        tracing::warn!("false positive rate is above the configured target");
    }

    filter.log_metrics();
    ExitCode::SUCCESS
}
