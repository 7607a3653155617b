// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Usage-ratio metrics emitted by the [`crate::evaluator::QuotaEvaluator`].

use once_cell::sync::Lazy;
use prometheus::{register_gauge_vec, GaugeVec};

use crate::collaborators::PartitionId;

/// Receives the per-partition usage ratio computed on every quota
/// evaluation. Implementations are expected to be cheap to call from the
/// consumer hot path; this crate never calls it while the global
/// [`crate::controller::EnforcementController`] lock is held longer than
/// the call itself.
pub trait MetricsSink: Send + Sync {
    /// Records `usage / per_partition_quota_bytes` (or `0.0` if the
    /// denominator was zero) for `store`'s `partition`.
    ///
    /// Fallible like every other collaborator trait in this crate: a
    /// failure here is a `ReportFailure` (spec.md §7) and must be able to
    /// surface to the caller as `EnforcerError::Report`, not be swallowed.
    fn record_storage_quota_used(
        &self,
        store: &str,
        partition: PartitionId,
        ratio: f64,
    ) -> anyhow::Result<()>;
}

static STORAGE_QUOTA_USED_RATIO: Lazy<GaugeVec> = Lazy::new(|| {
    register_gauge_vec!(
        "mz_storage_quota_used_ratio",
        "Fraction of a partition's per-partition storage quota currently in use",
        &["store", "partition"]
    )
    .expect("metric registration never fails for a fixed, valid metric name")
});

/// The default [`MetricsSink`], backed by a process-global Prometheus
/// registry, in the style of `mz-dataflow`'s `SourceMetrics`: one gauge
/// registered once via `once_cell::sync::Lazy`, with per-label-set handles
/// handed out per call.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrometheusMetricsSink;

impl MetricsSink for PrometheusMetricsSink {
    fn record_storage_quota_used(
        &self,
        store: &str,
        partition: PartitionId,
        ratio: f64,
    ) -> anyhow::Result<()> {
        let partition = partition.to_string();
        STORAGE_QUOTA_USED_RATIO
            .get_metric_with_label_values(&[store, &partition])?
            .set(ratio);
        Ok(())
    }
}
