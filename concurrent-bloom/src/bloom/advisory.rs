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
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

/// Advisory raised when a filter holds more insertions than it was sized for.
///
/// Past this point the observed false positive rate drifts above the configured target. The
/// filter keeps answering queries; the advisory only tells the owner it should be rebuilt with a
/// larger capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityExceeded {
    /// The design capacity of the filter.
    pub expected_insertions: u64,
    /// The insertion count past which advisories are raised.
    pub threshold: u64,
    /// The insertion count that triggered this advisory.
    pub inserted_count: u64,
}

impl fmt::Display for CapacityExceeded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "bloom filter over capacity: {} insertions for an expected {} (threshold {})",
            self.inserted_count, self.expected_insertions, self.threshold
        )
    }
}

/// Receiver of capacity advisories.
///
/// Sinks are called synchronously from the inserting thread and must not block for long.
pub trait AdvisorySink: Send + Sync {
    /// Called when an insertion pushes the filter past its capacity threshold.
    fn capacity_exceeded(&self, advisory: &CapacityExceeded);
}

/// Default sink: logs each advisory as a `tracing` warning.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl AdvisorySink for TracingSink {
    fn capacity_exceeded(&self, advisory: &CapacityExceeded) {
        tracing::warn!(
            expected_insertions = advisory.expected_insertions,
            threshold = advisory.threshold,
            inserted_count = advisory.inserted_count,
            "bloom filter over capacity, false positive rate likely higher than expected"
        );
    }
}

/// When capacity advisories are delivered to the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AdvisoryPolicy {
    /// Only the first insertion past the threshold is reported.
    #[default]
    Once,
    /// Every insertion past the threshold is reported.
    EveryInsertion,
}

/// Watches the insertion count and hands advisories to the sink according to the policy.
pub(crate) struct CapacityMonitor {
    expected_insertions: u64,
    threshold: u64,
    policy: AdvisoryPolicy,
    raised: AtomicBool,
    sink: Arc<dyn AdvisorySink>,
}

impl CapacityMonitor {
    pub fn new(
        expected_insertions: u64,
        threshold: u64,
        policy: AdvisoryPolicy,
        sink: Arc<dyn AdvisorySink>,
    ) -> Self {
        CapacityMonitor {
            expected_insertions,
            threshold,
            policy,
            raised: AtomicBool::new(false),
            sink,
        }
    }

    pub fn threshold(&self) -> u64 {
        self.threshold
    }

    /// Returns whether at least one advisory has been raised.
    pub fn raised(&self) -> bool {
        self.raised.load(Ordering::Relaxed)
    }

    /// Records the insertion count reached by one `add`.
    #[inline]
    pub fn observe(&self, inserted_count: u64) {
        if inserted_count <= self.threshold {
            return;
        }
        match self.policy {
            AdvisoryPolicy::Once => {
                // Exactly one inserter wins the swap, even when many cross at once.
                if self.raised.load(Ordering::Relaxed) || self.raised.swap(true, Ordering::Relaxed)
                {
                    return;
                }
            }
            AdvisoryPolicy::EveryInsertion => self.raised.store(true, Ordering::Relaxed),
        }
        self.sink.capacity_exceeded(&CapacityExceeded {
            expected_insertions: self.expected_insertions,
            threshold: self.threshold,
            inserted_count,
        });
    }
}

impl fmt::Debug for CapacityMonitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapacityMonitor")
            .field("threshold", &self.threshold)
            .field("policy", &self.policy)
            .field("raised", &self.raised())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<u64>>);

    impl AdvisorySink for Recorder {
        fn capacity_exceeded(&self, advisory: &CapacityExceeded) {
            self.0.lock().unwrap().push(advisory.inserted_count);
        }
    }

    #[test]
    fn test_once_reports_first_crossing_only() {
        let recorder = Arc::new(Recorder::default());
        let monitor = CapacityMonitor::new(100, 120, AdvisoryPolicy::Once, recorder.clone());

        (1..=120).for_each(|n| monitor.observe(n));
        assert!(!monitor.raised());
        assert!(recorder.0.lock().unwrap().is_empty());

        (121..=130).for_each(|n| monitor.observe(n));
        assert!(monitor.raised());
        assert_eq!(*recorder.0.lock().unwrap(), vec![121]);
    }

    #[test]
    fn test_every_insertion_reports_each_crossing() {
        let recorder = Arc::new(Recorder::default());
        let monitor =
            CapacityMonitor::new(100, 120, AdvisoryPolicy::EveryInsertion, recorder.clone());

        (1..=123).for_each(|n| monitor.observe(n));
        assert_eq!(*recorder.0.lock().unwrap(), vec![121, 122, 123]);
    }

    #[test]
    fn test_display() {
        let advisory = CapacityExceeded {
            expected_insertions: 100,
            threshold: 120,
            inserted_count: 121,
        };
        assert_eq!(
            advisory.to_string(),
            "bloom filter over capacity: 121 insertions for an expected 100 (threshold 120)"
        );
    }
}
