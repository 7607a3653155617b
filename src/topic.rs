// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Resolves the topic a partition is actually being consumed from.

use crate::collaborators::{LeaderState, PartitionConsumptionState, PartitionId};

/// Resolves which topic a partition's consumer is actually polling.
///
/// Pause/resume must be addressed to that topic, which differs from the
/// version topic during a leader/follower handoff window: a partition
/// acting as leader may temporarily be consuming a real-time topic instead
/// of the version topic it will settle back to once handoff completes.
#[derive(Debug, Clone)]
pub struct ConsumingTopicResolver {
    version_topic: String,
}

impl ConsumingTopicResolver {
    /// Builds a resolver for the given version topic.
    pub fn new(version_topic: impl Into<String>) -> Self {
        ConsumingTopicResolver {
            version_topic: version_topic.into(),
        }
    }

    /// Returns the topic `partition` is currently being consumed from.
    ///
    /// Returns the version topic unless `consumption_state` reports a
    /// leader role with a non-null leader topic, in which case the leader
    /// topic is returned instead. A partition with no consumption-state
    /// entry resolves to the version topic.
    pub fn consuming_topic(
        &self,
        _partition: PartitionId,
        consumption_state: Option<&dyn PartitionConsumptionState>,
    ) -> String {
        match consumption_state {
            Some(state) if state.leader_state() == LeaderState::Leader => {
                state.leader_topic().unwrap_or_else(|| self.version_topic.clone())
            }
            _ => self.version_topic.clone(),
        }
    }
}
