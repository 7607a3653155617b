// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Per-partition on-disk quota enforcement for a hybrid-store ingestion
//! task.
//!
//! [`controller::EnforcementController`] is the entry point: one instance is
//! bound to a single version topic inside one ingestion task, and is driven
//! from two places -- the consumer hot path, via
//! [`controller::EnforcementController::check_partition_quota`], and the
//! store-metadata bus, via the [`collaborators::StoreChangeListener`] impl
//! on it. Both paths serialize against a single lock; see the module docs
//! on [`controller`] for the concurrency model.
//!
//! Everything this crate needs from the rest of the ingestion stack --
//! the log consumer, the storage engine, the metadata bus, and so on -- is
//! expressed as a trait in [`collaborators`], so the enforcer can be built
//! and tested without a real Kafka cluster or storage engine behind it.

pub mod collaborators;
pub mod config;
pub mod controller;
pub mod error;
pub mod evaluator;
pub mod metrics;
pub mod pause_set;
pub mod suppressor;
pub mod topic;
pub mod tracker;

pub use collaborators::{PartitionId, Quota};
pub use config::EnforcerConfig;
pub use controller::{BatchSizes, EnforcementController};
pub use error::{EnforcerError, Result};
