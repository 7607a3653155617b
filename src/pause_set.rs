// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! The set of partitions this enforcer believes it has paused.

use std::collections::HashSet;

use crate::collaborators::PartitionId;

/// Tracks which partitions this enforcer has issued a `pause` for and has
/// not since issued a `resume` for.
///
/// Membership here reflects what *this enforcer* has done, not whether the
/// consumer is actually paused right now -- after a process restart this
/// set starts empty even though the consumer may still honor an earlier
/// pause. That divergence is expected; see the crate's design notes on why
/// pause/resume are re-issued unconditionally rather than gated on this
/// set.
#[derive(Debug, Default)]
pub struct PauseSet {
    paused: HashSet<PartitionId>,
}

impl PauseSet {
    /// An empty pause set.
    pub fn new() -> Self {
        PauseSet {
            paused: HashSet::new(),
        }
    }

    /// Marks `partition` as paused. Idempotent.
    pub fn add(&mut self, partition: PartitionId) {
        self.paused.insert(partition);
    }

    /// Marks `partition` as no longer paused. Idempotent, including for a
    /// partition that was never paused.
    pub fn remove(&mut self, partition: PartitionId) {
        self.paused.remove(&partition);
    }

    /// Whether `partition` is currently believed to be paused.
    pub fn contains(&self, partition: PartitionId) -> bool {
        self.paused.contains(&partition)
    }
}
