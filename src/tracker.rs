// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Per-partition running estimate of on-disk bytes.

use std::collections::HashMap;

use crate::collaborators::{PartitionId, StorageEngine};
use crate::error::{EnforcerError, Result};

/// One partition's running byte estimate.
///
/// The exact on-disk size is expensive to compute on every batch, so this
/// blends cheap incremental accounting (bytes consumed off the log) with a
/// one-time baseline sampled from the storage engine when the entry is
/// created. That baseline is what keeps usage from resetting to zero across
/// a process restart, since the in-memory map itself does not survive one.
#[derive(Debug, Clone, Copy)]
pub struct PartitionUsage {
    bytes: u64,
}

impl PartitionUsage {
    fn new(initial_bytes: u64) -> Self {
        PartitionUsage {
            bytes: initial_bytes,
        }
    }

    /// The current byte estimate.
    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    fn add(&mut self, bytes: u64) {
        self.bytes += bytes;
    }
}

/// Tracks [`PartitionUsage`] for every partition this enforcer has observed.
#[derive(Debug, Default)]
pub struct PartitionUsageTracker {
    usage: HashMap<PartitionId, PartitionUsage>,
}

impl PartitionUsageTracker {
    /// An empty tracker with no partitions observed yet.
    pub fn new() -> Self {
        PartitionUsageTracker {
            usage: HashMap::new(),
        }
    }

    /// Adds `bytes` to `partition`'s running estimate, sampling the storage
    /// engine for an initial baseline on first touch.
    ///
    /// Storage-engine errors while seeding that baseline are fatal to this
    /// call and are not retried here; the caller's next batch will try
    /// again.
    pub fn add(
        &mut self,
        storage_engine: &dyn StorageEngine,
        partition: PartitionId,
        bytes: u64,
    ) -> Result<()> {
        let entry = match self.usage.get_mut(&partition) {
            Some(entry) => entry,
            None => {
                let initial = storage_engine
                    .partition_size_bytes(partition)
                    .map_err(|source| EnforcerError::StorageEngine { partition, source })?;
                self.usage.entry(partition).or_insert(PartitionUsage::new(initial))
            }
        };
        entry.add(bytes);
        Ok(())
    }

    /// The current byte estimate for `partition`, or `0` if it has never
    /// been observed.
    pub fn usage(&self, partition: PartitionId) -> u64 {
        self.usage.get(&partition).map_or(0, PartitionUsage::bytes)
    }
}
