// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Immutable configuration for one [`crate::controller::EnforcementController`].

/// The immutable identity of one enforcer: which store and version topic it
/// is bound to, and how many partitions that version topic has.
///
/// Everything here is fixed for the lifetime of the enforcer; quota values
/// and the version-online flag live in the enforcer's mutable state
/// instead, since those can change out from under it via
/// `handle_store_changed`.
#[derive(Debug, Clone)]
pub struct EnforcerConfig {
    /// The store this enforcer polices.
    pub store_name: String,
    /// The version topic this enforcer's ingestion task is consuming.
    /// Encodes a version number parseable by an injected
    /// [`crate::collaborators::VersionTopicCodec`].
    pub version_topic: String,
    /// The number of partitions in `version_topic`. Must be greater than
    /// zero.
    pub partition_count: u32,
}

impl EnforcerConfig {
    /// Constructs a new config, panicking if `partition_count` is zero.
    ///
    /// `partition_count == 0` is a construction-time programming error in
    /// the embedding ingestion task, not a recoverable runtime condition,
    /// so this follows the teacher's convention of asserting invariants
    /// that can never legitimately arise in production rather than
    /// threading a `Result` through every constructor.
    pub fn new(
        store_name: impl Into<String>,
        version_topic: impl Into<String>,
        partition_count: u32,
    ) -> Self {
        assert!(partition_count > 0, "partition_count must be positive");
        EnforcerConfig {
            store_name: store_name.into(),
            version_topic: version_topic.into(),
            partition_count,
        }
    }
}
