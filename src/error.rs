// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Errors surfaced by the partition quota enforcer.
//!
//! The enforcer recovers nothing locally: every error defined here is
//! propagated to the caller, which decides whether to fail the owning
//! ingestion task or continue. See the crate's top-level documentation for
//! the full propagation policy.

use thiserror::Error;

use crate::collaborators::PartitionId;

/// The result type returned by all fallible [`crate::controller::EnforcementController`]
/// operations.
pub type Result<T> = std::result::Result<T, EnforcerError>;

/// Errors that can surface from the enforcement controller.
#[derive(Debug, Error)]
pub enum EnforcerError {
    /// The version encoded by this enforcer's version topic is absent from
    /// a store snapshot, either at construction time or on a subsequent
    /// `handle_store_changed` callback.
    #[error("version {version} of store '{store}' is not present in the store snapshot")]
    MissingVersion {
        /// The store this enforcer is bound to.
        store: String,
        /// The version number parsed out of the enforcer's version topic.
        version: i64,
    },

    /// The version topic's name could not be parsed into a version number
    /// by the injected [`crate::collaborators::VersionTopicCodec`].
    #[error("could not parse a version number out of version topic '{version_topic}': {source}")]
    VersionTopicParse {
        /// The version topic that failed to parse.
        version_topic: String,
        /// The underlying error from the codec.
        #[source]
        source: anyhow::Error,
    },

    /// The storage engine failed while sampling a partition's on-disk size,
    /// either to seed a new [`crate::tracker::PartitionUsage`] or during
    /// periodic reconciliation.
    #[error("storage engine error while sampling partition {partition}: {source}")]
    StorageEngine {
        /// The partition being sampled.
        partition: PartitionId,
        /// The underlying error from the storage engine.
        #[source]
        source: anyhow::Error,
    },

    /// A `pause` or `resume` call against a log consumer failed. The
    /// enforcer's own bookkeeping (tracker update, `pausedPartitions`
    /// membership) has already been applied by the time this is raised;
    /// the next batch will re-evaluate and retry the consumer call.
    #[error("consumer control error on topic '{topic}' partition {partition}: {source}")]
    ConsumerControl {
        /// The topic the pause/resume call was addressed to.
        topic: String,
        /// The partition the pause/resume call was addressed to.
        partition: PartitionId,
        /// The underlying error from the consumer.
        #[source]
        source: anyhow::Error,
    },

    /// The notification dispatcher or metrics sink failed to record a
    /// report. Not swallowed; surfaced to the caller like every other
    /// error here.
    #[error("report failed for partition {partition}: {source}")]
    Report {
        /// The partition the report concerned.
        partition: PartitionId,
        /// The underlying error from the dispatcher or metrics sink.
        #[source]
        source: anyhow::Error,
    },
}
