// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Pure quota-exceeded decision, given a usage estimate and the current
//! per-partition quota.

use crate::collaborators::Quota;

/// Decides whether a single usage value exceeds a single per-partition
/// quota.
///
/// This is intentionally a free function plus a thin stateless wrapper
/// rather than something that owns the usage map itself: the
/// [`crate::controller::EnforcementController`] already holds usage and
/// quota together under its lock, so the evaluator only needs the two
/// numbers it's asked about.
#[derive(Debug, Default, Clone, Copy)]
pub struct QuotaEvaluator;

impl QuotaEvaluator {
    /// Whether `usage` exceeds `quota` for one partition.
    ///
    /// Comparison is `>=`, not `>`: hitting the quota exactly counts as
    /// exceeded. `Quota::Unlimited` always returns `false`, checked before
    /// any arithmetic.
    pub fn is_exceeded(&self, usage: u64, quota: Quota) -> bool {
        match quota {
            Quota::Unlimited => false,
            Quota::Bytes(per_partition_quota_bytes) => usage >= per_partition_quota_bytes,
        }
    }

    /// The usage ratio to report to metrics: `usage / quota`, or `0.0` when
    /// the quota is unlimited or zero.
    pub fn usage_ratio(&self, usage: u64, quota: Quota) -> f64 {
        match quota {
            Quota::Unlimited => 0.0,
            Quota::Bytes(0) => 0.0,
            Quota::Bytes(per_partition_quota_bytes) => {
                usage as f64 / per_partition_quota_bytes as f64
            }
        }
    }
}
