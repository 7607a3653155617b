// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Seams to the collaborators this crate does not implement.
//!
//! Everything in this module is a trait (or a plain data type passed across
//! a trait boundary) rather than a concrete networked client. The log
//! consumer, storage engine, ingestion task, notification dispatcher, and
//! store-metadata bus all live outside this crate; this module is the
//! entire surface the enforcement controller needs from them, matching how
//! `mz-storage`'s `SourceReader` and `mz-compute-client`'s `ComputeClient`
//! are defined as thin traits with test-only implementations alongside the
//! real ones.

use std::fmt;

/// A partition identifier, scoped to one versioned topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PartitionId(pub u32);

impl fmt::Display for PartitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A store's on-disk quota: either a concrete byte ceiling or the
/// distinguished sentinel that disables enforcement entirely.
///
/// The distilled spec represents this as an integer with a magic
/// "UNLIMITED" value; this crate makes the sentinel an explicit variant,
/// since an enum that can't accidentally be compared as a number is the
/// idiomatic Rust rendition and removes an entire class of off-by-the-wrong-
/// sentinel bugs. See DESIGN.md for this Open Question resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quota {
    /// A concrete store-wide byte ceiling.
    Bytes(u64),
    /// Enforcement is disabled for this store.
    Unlimited,
}

/// The lifecycle status of a store version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionStatus {
    /// The version is serving reads in the fleet.
    Online,
    /// Any other status (created, pushing, errored, ...). The enforcer
    /// does not distinguish between these; only the transition into
    /// `Online` matters to it.
    Other,
}

/// A single version's state within a [`StoreSnapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionSnapshot {
    /// The version's current lifecycle status.
    pub status: VersionStatus,
}

/// A read-only view of a store's metadata at a point in time, as delivered
/// by the store-metadata bus.
pub trait StoreSnapshot {
    /// The store name this snapshot describes.
    fn name(&self) -> &str;

    /// The store-wide storage quota.
    fn storage_quota_in_bytes(&self) -> Quota;

    /// Looks up a version by number.
    fn get_version(&self, version_number: i64) -> Option<VersionSnapshot>;
}

/// Parses the version number encoded in a version topic name.
///
/// The exact encoding is owned by the external version registry and is not
/// redefined here; this crate only needs *a* parser, injected so that tests
/// can supply a trivial one without pulling in the real registry's naming
/// scheme.
pub trait VersionTopicCodec: Send + Sync {
    /// Parses the version number out of a version topic name, failing if
    /// the topic does not encode one.
    fn parse_version_number(&self, version_topic: &str) -> anyhow::Result<i64>;
}

/// Read-only access to a partition's on-disk byte size, as reported by the
/// underlying storage engine.
pub trait StorageEngine: Send + Sync {
    /// Returns the current on-disk size, in bytes, of the given partition.
    fn partition_size_bytes(&self, partition: PartitionId) -> anyhow::Result<u64>;
}

/// One of possibly several consumer handles an ingestion task owns. `pause`
/// and `resume` must be idempotent and thread-safe; the enforcer relies on
/// both properties and, by design, re-issues both calls on every matching
/// evaluator transition rather than trying to suppress redundant ones
/// itself (see the crate's top-level design notes).
pub trait LogConsumer: Send + Sync {
    /// Stops delivering records for `(topic, partition)` to this consumer.
    fn pause(&self, topic: &str, partition: PartitionId) -> anyhow::Result<()>;

    /// Resumes delivering records for `(topic, partition)` to this
    /// consumer.
    fn resume(&self, topic: &str, partition: PartitionId) -> anyhow::Result<()>;
}

/// The leader/follower role a partition's consumption state is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaderState {
    /// This partition is being consumed as the leader for its replica.
    Leader,
    /// Any other role (e.g. follower, standby, offline).
    Other,
}

/// Per-partition consumption bookkeeping owned by the ingestion task, read
/// (never written) by this crate. Concurrently updated by the ingestion
/// task outside of this crate's lock; a missing entry for a partition is
/// tolerated everywhere it's consulted.
pub trait PartitionConsumptionState: Send + Sync {
    /// The leader/follower role this partition is currently in.
    fn leader_state(&self) -> LeaderState;

    /// The real-time topic this partition is consuming from while it is
    /// the leader, if any.
    fn leader_topic(&self) -> Option<String>;

    /// Whether a completion report has already been sent for this
    /// partition's current version.
    fn is_completion_reported(&self) -> bool;
}

/// Delivers quota-violation and completion notifications out of the
/// enforcer.
pub trait NotificationDispatcher: Send + Sync {
    /// Signals that a partition has reached the ingestion terminal
    /// condition for this version, independent of whether it has
    /// otherwise finished catching up.
    fn report_completed(&self, partition: PartitionId) -> anyhow::Result<()>;
}

/// The ingestion task this enforcer is embedded in. Exposes just enough for
/// the enforcer to iterate over consumers, check whether metrics emission
/// is enabled, and report quota bookkeeping decisions back out.
pub trait IngestionTask: Send + Sync {
    /// Every consumer handle owned by this ingestion task. One task may own
    /// several; the enforcer must iterate all of them rather than assume a
    /// single consumer.
    fn consumers(&self) -> Vec<&dyn LogConsumer>;

    /// Whether per-partition usage-ratio metrics should be emitted.
    fn metrics_emission_enabled(&self) -> bool;

    /// Bookkeeping callback: this partition was found to exceed its quota
    /// on the batch just processed.
    fn report_quota_violated(&self, partition: PartitionId) -> anyhow::Result<()>;

    /// Bookkeeping callback: this partition was found within quota on the
    /// batch just processed.
    fn report_quota_not_violated(&self, partition: PartitionId) -> anyhow::Result<()>;
}

/// Best-effort, lock-free (from this crate's perspective) read access to the
/// ingestion task's per-partition consumption-state map.
///
/// The map itself is owned and concurrently updated by the ingestion task
/// outside of this crate's control; this crate never takes its own lock
/// around a lookup and tolerates a missing entry for any partition.
pub trait ConsumptionStateLookup: Send + Sync {
    /// Looks up the consumption state for `partition`, if the ingestion
    /// task has one recorded.
    fn get(&self, partition: PartitionId) -> Option<Box<dyn PartitionConsumptionState>>;
}

/// Rate-limits noisy, non-fatal log/notification events to at most one
/// "not redundant" verdict per identifier per minute.
pub trait RedundantLogSuppressor: Send + Sync {
    /// Returns whether an event for `identifier` is redundant right now.
    /// Implementations must guarantee at most one `false` return per
    /// identifier per rolling minute.
    fn is_redundant(&self, identifier: &str) -> bool;
}

/// Callbacks delivered by the store-metadata change bus. Store-created and
/// store-deleted events are no-ops for this enforcer; only
/// `store_changed` does anything.
pub trait StoreChangeListener {
    /// A store was created. No-op for the quota enforcer.
    fn handle_store_created(&self, _store: &str) {}

    /// A store was deleted. No-op for the quota enforcer.
    fn handle_store_deleted(&self, _store: &str) {}

    /// A store's metadata changed; refresh cached quota and version-online
    /// state.
    fn handle_store_changed(&self, snapshot: &dyn StoreSnapshot) -> anyhow::Result<()>;
}
