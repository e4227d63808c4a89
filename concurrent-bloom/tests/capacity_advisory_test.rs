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
use std::sync::Mutex;
use std::thread;

use concurrent_bloom::bloom::AdvisoryPolicy;
use concurrent_bloom::bloom::AdvisorySink;
use concurrent_bloom::bloom::BloomFilter;
use concurrent_bloom::bloom::BloomFilterFactory;
use concurrent_bloom::bloom::CapacityExceeded;
use concurrent_bloom::bloom::FilterFactory;
use googletest::assert_that;
use googletest::prelude::eq;

#[derive(Default)]
struct RecordingSink {
    advisories: Mutex<Vec<CapacityExceeded>>,
}

impl RecordingSink {
    fn counts(&self) -> Vec<u64> {
        self.advisories
            .lock()
            .unwrap()
            .iter()
            .map(|a| a.inserted_count)
            .collect()
    }
}

impl AdvisorySink for RecordingSink {
    fn capacity_exceeded(&self, advisory: &CapacityExceeded) {
        self.advisories.lock().unwrap().push(*advisory);
    }
}

fn recording_filter(policy: AdvisoryPolicy) -> (BloomFilter, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::default());
    let filter = BloomFilter::builder(100, 0.01)
        .advisory_policy(policy)
        .advisory_sink(sink.clone())
        .build()
        .unwrap();
    (filter, sink)
}

#[test]
fn test_advisory_after_threshold_not_before() {
    let (filter, sink) = recording_filter(AdvisoryPolicy::Once);

    for i in 0..120_u32 {
        filter.add(&i);
    }
    assert!(sink.counts().is_empty());
    assert!(!filter.is_over_capacity());

    filter.add(&120_u32);
    assert_eq!(sink.counts(), vec![121]);
    assert!(filter.is_over_capacity());

    let advisory = sink.advisories.lock().unwrap()[0];
    assert_that!(advisory.expected_insertions, eq(100));
    assert_that!(advisory.threshold, eq(120));
}

#[test]
fn test_once_policy_stays_quiet_after_first_advisory() {
    let (filter, sink) = recording_filter(AdvisoryPolicy::Once);
    for i in 0..500_u32 {
        filter.add(&i);
    }
    assert_eq!(sink.counts(), vec![121]);
}

#[test]
fn test_every_insertion_policy() {
    let (filter, sink) = recording_filter(AdvisoryPolicy::EveryInsertion);
    for i in 0..125_u32 {
        filter.add(&i);
    }
    assert_eq!(sink.counts(), vec![121, 122, 123, 124, 125]);
}

#[test]
fn test_duplicates_count_toward_capacity() {
    let (filter, sink) = recording_filter(AdvisoryPolicy::Once);
    for _ in 0..121 {
        filter.add("same value");
    }
    assert_eq!(sink.counts(), vec![121]);
    assert!(filter.might_contain("same value"));
}

#[test]
fn test_once_policy_under_concurrent_crossing() {
    let (filter, sink) = recording_filter(AdvisoryPolicy::Once);
    thread::scope(|s| {
        for t in 0..8_u32 {
            let filter = &filter;
            s.spawn(move || {
                for i in 0..100 {
                    filter.add(&(t * 100 + i));
                }
            });
        }
    });

    assert_that!(filter.inserted_count(), eq(800));
    assert_that!(sink.advisories.lock().unwrap().len(), eq(1));
}

#[test]
fn test_factory_filters_keep_sink() {
    let sink = Arc::new(RecordingSink::default());
    let factory = BloomFilterFactory::new(
        BloomFilter::builder(100, 0.01)
            .advisory_policy(AdvisoryPolicy::EveryInsertion)
            .advisory_sink(sink.clone()),
    )
    .unwrap();

    let first = factory.create();
    let second = factory.create();
    for i in 0..121_u32 {
        first.add(&i);
        second.add(&i);
    }
    assert_eq!(sink.counts(), vec![121, 121]);
}
