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

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::thread;

use concurrent_bloom::bloom::BloomFilter;
use concurrent_bloom::bloom::FilterFactory;
use concurrent_bloom::bloom::MembershipFilter;
use googletest::assert_that;
use googletest::prelude::eq;
use googletest::prelude::le;

const THREADS: u64 = 8;
const PER_THREAD: u64 = 20_000;

#[test]
fn test_concurrent_adds_and_queries() {
    let filter = BloomFilter::new(THREADS * PER_THREAD, 0.01).unwrap();
    let writers_done = AtomicBool::new(false);

    thread::scope(|s| {
        let filter = &filter;
        let writers_done = &writers_done;

        let writers: Vec<_> = (0..THREADS)
            .map(move |t| {
                s.spawn(move || {
                    for i in 0..PER_THREAD {
                        filter.add(&(t * PER_THREAD + i));
                    }
                })
            })
            .collect();

        for t in 0..THREADS {
            s.spawn(move || {
                // Probe the same key space the writers fill; answers may be either value
                // while inserts are in flight.
                let mut rounds = 0;
                while !writers_done.load(Ordering::Acquire) || rounds == 0 {
                    for i in (t..THREADS * PER_THREAD).step_by(97) {
                        let _ = filter.might_contain(&i);
                    }
                    rounds += 1;
                }
            });
        }

        for writer in writers {
            writer.join().unwrap();
        }
        writers_done.store(true, Ordering::Release);
    });

    assert_that!(filter.inserted_count(), eq(THREADS * PER_THREAD));
    for i in 0..THREADS * PER_THREAD {
        assert!(filter.might_contain(&i), "lost key {i}");
    }
}

#[test]
fn test_completed_add_is_visible_to_other_threads() {
    let filter = Arc::new(BloomFilter::new(10_000, 0.01).unwrap());

    for i in 0..1_000_u64 {
        let writer = Arc::clone(&filter);
        thread::spawn(move || writer.add(&i)).join().unwrap();

        let reader = Arc::clone(&filter);
        let seen = thread::spawn(move || reader.might_contain(&i))
            .join()
            .unwrap();
        assert!(seen, "key {i} not visible after add returned");
    }
}

#[test]
fn test_concurrent_duplicate_adds_converge() {
    let filter = BloomFilter::new(1_000, 0.01).unwrap();
    thread::scope(|s| {
        for _ in 0..THREADS {
            s.spawn(|| {
                for i in 0..1_000_u64 {
                    filter.add(&i);
                }
            });
        }
    });

    let reference = BloomFilter::new(1_000, 0.01).unwrap();
    for i in 0..1_000_u64 {
        reference.add(&i);
    }

    assert_that!(filter.inserted_count(), eq(THREADS * 1_000));
    assert_that!(filter.bits_set(), eq(reference.bits_set()));
}

#[test]
fn test_shared_trait_object_across_threads() {
    let filter: Arc<dyn MembershipFilter<str> + Send + Sync> =
        Arc::new((|| BloomFilter::new(40_000, 0.01).unwrap()).create());

    thread::scope(|s| {
        for t in 0..4 {
            let filter = Arc::clone(&filter);
            s.spawn(move || {
                for i in 0..10_000 {
                    filter.add(&format!("{t}:{i}"));
                }
            });
        }
    });

    let metrics = filter.metrics();
    assert_that!(metrics.inserted_count, eq(40_000));
    assert_that!(metrics.estimated_fpp, le(0.02));
    assert!((0..10_000).all(|i| filter.might_contain(&format!("3:{i}"))));
}
