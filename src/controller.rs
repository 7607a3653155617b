// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! The enforcement state machine tying the quota components together.

use std::sync::{Arc, Mutex, Weak};

use tracing::info;

use crate::collaborators::{
    ConsumptionStateLookup, IngestionTask, NotificationDispatcher, PartitionId, Quota,
    RedundantLogSuppressor, StorageEngine, StoreChangeListener, StoreSnapshot, VersionStatus,
    VersionTopicCodec,
};
use crate::config::EnforcerConfig;
use crate::error::{EnforcerError, Result};
use crate::evaluator::QuotaEvaluator;
use crate::metrics::MetricsSink;
use crate::pause_set::PauseSet;
use crate::topic::ConsumingTopicResolver;
use crate::tracker::PartitionUsageTracker;

/// One batch's worth of per-partition byte reports, in the order the
/// ingestion task observed them. Order is preserved (unlike a hash map)
/// because `checkPartitionQuota` is specified to process partitions in the
/// input's iteration order.
pub type BatchSizes = Vec<(PartitionId, u64)>;

fn per_partition_quota_bytes(store_quota: Quota, partition_count: u32) -> u64 {
    match store_quota {
        Quota::Unlimited => 0,
        Quota::Bytes(total) => total / u64::from(partition_count),
    }
}

/// The quota a single partition is actually evaluated against: `Unlimited`
/// passes through unchanged, otherwise the store-wide quota is replaced by
/// this partition's even share of it.
fn per_partition_quota(store_quota: Quota, per_partition_quota_bytes: u64) -> Quota {
    match store_quota {
        Quota::Unlimited => Quota::Unlimited,
        Quota::Bytes(_) => Quota::Bytes(per_partition_quota_bytes),
    }
}

/// Mutable state guarded together by [`EnforcementController`]'s single
/// lock: the quota fields, the version-online latch, the usage tracker,
/// and the pause set all move in lockstep so that `checkPartitionQuota` and
/// `handleStoreChanged` each observe one consistent snapshot.
struct EnforcerState {
    store_quota: Quota,
    per_partition_quota_bytes: u64,
    /// Latches `false -> true` only; never reset once observed online.
    version_online: bool,
    tracker: PartitionUsageTracker,
    paused: PauseSet,
}

/// Ties the quota components together: per every batch consumed off a
/// partitioned log, decides pause, stay-paused, resume, or continue for
/// each partition, and reacts to out-of-band store-metadata changes.
///
/// All state transitions take a single `std::sync::Mutex`, matching how
/// `mz-storage`'s `KafkaSourceReader` guards its own out-of-band state
/// (`partition_info`) with a plain blocking mutex rather than an async one:
/// this type's entry points are synchronous and called from consumer
/// worker threads, not from async tasks.
pub struct EnforcementController {
    config: EnforcerConfig,
    storage_engine: Arc<dyn StorageEngine>,
    /// Non-owning back-reference to the ingestion task that owns this
    /// controller. A strong `Arc` here would form a reference cycle (task
    /// owns controller, controller needs task); see the crate's design
    /// notes.
    ingestion_task: Weak<dyn IngestionTask>,
    consumption_states: Arc<dyn ConsumptionStateLookup>,
    notification_dispatcher: Arc<dyn NotificationDispatcher>,
    metrics_sink: Arc<dyn MetricsSink>,
    suppressor: Arc<dyn RedundantLogSuppressor>,
    version_number: i64,
    topic_resolver: ConsumingTopicResolver,
    evaluator: QuotaEvaluator,
    state: Mutex<EnforcerState>,
}

impl EnforcementController {
    /// Constructs a new controller bound to `config.version_topic`, seeded
    /// from `initial_snapshot`.
    ///
    /// Fails with [`EnforcerError::MissingVersion`] if the version encoded
    /// in `config.version_topic` is absent from `initial_snapshot`. The
    /// pause set and usage map both start empty.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: EnforcerConfig,
        ingestion_task: Weak<dyn IngestionTask>,
        storage_engine: Arc<dyn StorageEngine>,
        consumption_states: Arc<dyn ConsumptionStateLookup>,
        notification_dispatcher: Arc<dyn NotificationDispatcher>,
        metrics_sink: Arc<dyn MetricsSink>,
        suppressor: Arc<dyn RedundantLogSuppressor>,
        version_codec: Arc<dyn VersionTopicCodec>,
        initial_snapshot: &dyn StoreSnapshot,
    ) -> Result<Self> {
        let version_number = version_codec
            .parse_version_number(&config.version_topic)
            .map_err(|source| EnforcerError::VersionTopicParse {
                version_topic: config.version_topic.clone(),
                source,
            })?;
        let version = initial_snapshot.get_version(version_number).ok_or_else(|| {
            EnforcerError::MissingVersion {
                store: config.store_name.clone(),
                version: version_number,
            }
        })?;
        let store_quota = initial_snapshot.storage_quota_in_bytes();
        let topic_resolver = ConsumingTopicResolver::new(config.version_topic.clone());
        Ok(EnforcementController {
            state: Mutex::new(EnforcerState {
                store_quota,
                per_partition_quota_bytes: per_partition_quota_bytes(
                    store_quota,
                    config.partition_count,
                ),
                version_online: version.status == VersionStatus::Online,
                tracker: PartitionUsageTracker::new(),
                paused: PauseSet::new(),
            }),
            config,
            storage_engine,
            ingestion_task,
            consumption_states,
            notification_dispatcher,
            metrics_sink,
            suppressor,
            version_number,
            topic_resolver,
            evaluator: QuotaEvaluator,
        })
    }

    /// The store this controller is enforcing quota for.
    pub fn store_name(&self) -> &str {
        &self.config.store_name
    }

    fn ingestion_task(&self) -> Arc<dyn IngestionTask> {
        self.ingestion_task
            .upgrade()
            .expect("enforcement controller outlives its owning ingestion task")
    }

    /// The consumer hot path: processes one batch of `(partition, bytes)`
    /// reports in order, updating usage, evaluating quota, and issuing
    /// pause/resume as needed.
    pub fn check_partition_quota(&self, batch: &BatchSizes) -> Result<()> {
        let ingestion_task = self.ingestion_task();
        let mut state = self.state.lock().expect("enforcer lock poisoned");

        for &(partition, bytes) in batch {
            state
                .tracker
                .add(&*self.storage_engine, partition, bytes)?;

            let consumption_state = self.consumption_states.get(partition);
            let topic = self
                .topic_resolver
                .consuming_topic(partition, consumption_state.as_deref());
            let suppressor_id = format!("{topic}_{partition}_quota_exceeded");
            let should_log = !self.suppressor.is_redundant(&suppressor_id);

            let usage = state.tracker.usage(partition);
            let quota = per_partition_quota(state.store_quota, state.per_partition_quota_bytes);
            let exceeded = self.evaluator.is_exceeded(usage, quota);

            if ingestion_task.metrics_emission_enabled() {
                let ratio = self.evaluator.usage_ratio(usage, quota);
                self.metrics_sink
                    .record_storage_quota_used(&self.config.store_name, partition, ratio)
                    .map_err(|source| EnforcerError::Report { partition, source })?;
            }

            if exceeded {
                ingestion_task
                    .report_quota_violated(partition)
                    .map_err(|source| EnforcerError::Report { partition, source })?;

                // Completion shortcut: if the version is already online
                // elsewhere in the fleet, don't leave this replica in an
                // error state over a quota violation it can't recover
                // from locally.
                if state.version_online {
                    if let Some(consumption_state) = &consumption_state {
                        if !consumption_state.is_completion_reported() {
                            self.notification_dispatcher
                                .report_completed(partition)
                                .map_err(|source| EnforcerError::Report { partition, source })?;
                        }
                    }
                }

                for consumer in ingestion_task.consumers() {
                    consumer.pause(&topic, partition).map_err(|source| {
                        EnforcerError::ConsumerControl {
                            topic: topic.clone(),
                            partition,
                            source,
                        }
                    })?;
                }
                state.paused.add(partition);

                if should_log {
                    info!(
                        store = %self.config.store_name,
                        %topic,
                        %partition,
                        usage,
                        "pausing partition: storage quota exceeded",
                    );
                }
            } else {
                ingestion_task
                    .report_quota_not_violated(partition)
                    .map_err(|source| EnforcerError::Report { partition, source })?;

                if state.paused.contains(partition) {
                    for consumer in ingestion_task.consumers() {
                        consumer.resume(&topic, partition).map_err(|source| {
                            EnforcerError::ConsumerControl {
                                topic: topic.clone(),
                                partition,
                                source,
                            }
                        })?;
                    }
                    state.paused.remove(partition);
                    info!(
                        store = %self.config.store_name,
                        %topic,
                        %partition,
                        usage,
                        "resuming partition: back within storage quota",
                    );
                }
            }
        }

        Ok(())
    }

    /// Whether this controller has issued `pause` for `partition` and has
    /// not since issued `resume`.
    pub fn is_paused(&self, partition: PartitionId) -> bool {
        self.state
            .lock()
            .expect("enforcer lock poisoned")
            .paused
            .contains(partition)
    }
}

impl StoreChangeListener for EnforcementController {
    fn handle_store_changed(&self, snapshot: &dyn StoreSnapshot) -> anyhow::Result<()> {
        if snapshot.name() != self.config.store_name {
            return Ok(());
        }

        let version = snapshot
            .get_version(self.version_number)
            .ok_or_else(|| EnforcerError::MissingVersion {
                store: self.config.store_name.clone(),
                version: self.version_number,
            })?;

        let mut state = self.state.lock().expect("enforcer lock poisoned");
        if version.status == VersionStatus::Online {
            state.version_online = true;
        }
        state.store_quota = snapshot.storage_quota_in_bytes();
        state.per_partition_quota_bytes =
            per_partition_quota_bytes(state.store_quota, self.config.partition_count);

        info!(
            store = %self.config.store_name,
            version = self.version_number,
            version_online = state.version_online,
            quota = ?state.store_quota,
            "store metadata refreshed",
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{
        LeaderState, LogConsumer, PartitionConsumptionState, VersionSnapshot,
    };
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

    #[derive(Default)]
    struct FakeStorageEngine {
        sizes: Mutex<HashMap<PartitionId, u64>>,
    }

    impl StorageEngine for FakeStorageEngine {
        fn partition_size_bytes(&self, partition: PartitionId) -> anyhow::Result<u64> {
            Ok(*self.sizes.lock().unwrap().get(&partition).unwrap_or(&0))
        }
    }

    #[derive(Default)]
    struct FakeConsumer {
        paused: Mutex<Vec<(String, PartitionId)>>,
        resumed: Mutex<Vec<(String, PartitionId)>>,
    }

    impl LogConsumer for FakeConsumer {
        fn pause(&self, topic: &str, partition: PartitionId) -> anyhow::Result<()> {
            self.paused.lock().unwrap().push((topic.to_string(), partition));
            Ok(())
        }
        fn resume(&self, topic: &str, partition: PartitionId) -> anyhow::Result<()> {
            self.resumed.lock().unwrap().push((topic.to_string(), partition));
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeIngestionTask {
        consumer: FakeConsumer,
        metrics_emission_enabled: AtomicBool,
        violated_calls: Mutex<Vec<PartitionId>>,
        not_violated_calls: Mutex<Vec<PartitionId>>,
    }

    impl IngestionTask for FakeIngestionTask {
        fn consumers(&self) -> Vec<&dyn LogConsumer> {
            vec![&self.consumer]
        }
        fn metrics_emission_enabled(&self) -> bool {
            self.metrics_emission_enabled.load(Ordering::SeqCst)
        }
        fn report_quota_violated(&self, partition: PartitionId) -> anyhow::Result<()> {
            self.violated_calls.lock().unwrap().push(partition);
            Ok(())
        }
        fn report_quota_not_violated(&self, partition: PartitionId) -> anyhow::Result<()> {
            self.not_violated_calls.lock().unwrap().push(partition);
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeDispatcher {
        completed: Mutex<Vec<PartitionId>>,
    }

    impl NotificationDispatcher for FakeDispatcher {
        fn report_completed(&self, partition: PartitionId) -> anyhow::Result<()> {
            self.completed.lock().unwrap().push(partition);
            Ok(())
        }
    }

    #[derive(Default)]
    struct NeverRedundant;

    impl RedundantLogSuppressor for NeverRedundant {
        fn is_redundant(&self, _identifier: &str) -> bool {
            false
        }
    }

    struct FixedVersionCodec(i64);

    impl VersionTopicCodec for FixedVersionCodec {
        fn parse_version_number(&self, _version_topic: &str) -> anyhow::Result<i64> {
            Ok(self.0)
        }
    }

    #[derive(Default)]
    struct NullMetricsSink;

    impl MetricsSink for NullMetricsSink {
        fn record_storage_quota_used(
            &self,
            _store: &str,
            _partition: PartitionId,
            _ratio: f64,
        ) -> anyhow::Result<()> {
            Ok(())
        }
    }

    struct FakeLeaderState {
        leader_state: LeaderState,
        leader_topic: Option<String>,
        completion_reported: AtomicBool,
    }

    impl PartitionConsumptionState for FakeLeaderState {
        fn leader_state(&self) -> LeaderState {
            self.leader_state
        }
        fn leader_topic(&self) -> Option<String> {
            self.leader_topic.clone()
        }
        fn is_completion_reported(&self) -> bool {
            self.completion_reported.load(Ordering::SeqCst)
        }
    }

    #[derive(Default)]
    struct FakeConsumptionStates {
        entries: Mutex<HashMap<PartitionId, (LeaderState, Option<String>, bool)>>,
    }

    impl ConsumptionStateLookup for FakeConsumptionStates {
        fn get(&self, partition: PartitionId) -> Option<Box<dyn PartitionConsumptionState>> {
            self.entries.lock().unwrap().get(&partition).map(|(ls, lt, cr)| {
                Box::new(FakeLeaderState {
                    leader_state: *ls,
                    leader_topic: lt.clone(),
                    completion_reported: AtomicBool::new(*cr),
                }) as Box<dyn PartitionConsumptionState>
            })
        }
    }

    struct Harness {
        controller: EnforcementController,
        task: Arc<FakeIngestionTask>,
        dispatcher: Arc<FakeDispatcher>,
        consumption_states: Arc<FakeConsumptionStates>,
    }

    struct FakeSnapshot {
        name: String,
        quota: Quota,
        version: i64,
        status: VersionStatus,
    }

    impl StoreSnapshot for FakeSnapshot {
        fn name(&self) -> &str {
            &self.name
        }
        fn storage_quota_in_bytes(&self) -> Quota {
            self.quota
        }
        fn get_version(&self, version_number: i64) -> Option<VersionSnapshot> {
            (version_number == self.version).then_some(VersionSnapshot { status: self.status })
        }
    }

    fn harness(partition_count: u32, quota: Quota) -> Harness {
        let task = Arc::new(FakeIngestionTask::default());
        let task_dyn: Arc<dyn IngestionTask> = task.clone();
        let dispatcher = Arc::new(FakeDispatcher::default());
        let consumption_states = Arc::new(FakeConsumptionStates::default());
        let snapshot = FakeSnapshot {
            name: "my_store".to_string(),
            quota,
            version: 3,
            status: VersionStatus::Other,
        };
        let controller = EnforcementController::new(
            EnforcerConfig::new("my_store", "t_v3", partition_count),
            Arc::downgrade(&task_dyn),
            Arc::new(FakeStorageEngine::default()),
            consumption_states.clone(),
            dispatcher.clone(),
            Arc::new(NullMetricsSink),
            Arc::new(NeverRedundant),
            Arc::new(FixedVersionCodec(3)),
            &snapshot,
        )
        .unwrap();
        Harness {
            controller,
            task,
            dispatcher,
            consumption_states,
        }
    }

    #[test]
    fn missing_version_fails_construction() {
        let task: Arc<dyn IngestionTask> = Arc::new(FakeIngestionTask::default());
        let snapshot = FakeSnapshot {
            name: "my_store".to_string(),
            quota: Quota::Bytes(400),
            version: 7,
            status: VersionStatus::Other,
        };
        let err = EnforcementController::new(
            EnforcerConfig::new("my_store", "t_v3", 4),
            Arc::downgrade(&task),
            Arc::new(FakeStorageEngine::default()),
            Arc::new(FakeConsumptionStates::default()),
            Arc::new(FakeDispatcher::default()),
            Arc::new(NullMetricsSink),
            Arc::new(NeverRedundant),
            Arc::new(FixedVersionCodec(3)),
            &snapshot,
        )
        .unwrap_err();
        assert!(matches!(err, EnforcerError::MissingVersion { .. }));
    }

    /// S1: a batch within quota on both partitions pauses nothing and
    /// reports `reportQuotaNotViolated` for each.
    #[test]
    fn s1_within_quota_reports_not_violated() {
        let h = harness(4, Quota::Bytes(400));
        h.controller
            .check_partition_quota(&vec![(PartitionId(0), 40), (PartitionId(1), 40)])
            .unwrap();

        assert!(!h.controller.is_paused(PartitionId(0)));
        assert!(!h.controller.is_paused(PartitionId(1)));
        assert_eq!(
            *h.task.not_violated_calls.lock().unwrap(),
            vec![PartitionId(0), PartitionId(1)]
        );
        assert!(h.task.consumer.paused.lock().unwrap().is_empty());
    }

    /// S2: after S1, a further batch pushes partition 0 to exactly the
    /// quota, which pauses it and reports the violation.
    #[test]
    fn s2_crossing_quota_pauses_and_reports_violated() {
        let h = harness(4, Quota::Bytes(400));
        h.controller
            .check_partition_quota(&vec![(PartitionId(0), 40), (PartitionId(1), 40)])
            .unwrap();
        h.controller
            .check_partition_quota(&vec![(PartitionId(0), 70)])
            .unwrap();

        assert!(h.controller.is_paused(PartitionId(0)));
        assert_eq!(
            *h.task.violated_calls.lock().unwrap(),
            vec![PartitionId(0)]
        );
        assert_eq!(
            h.task.consumer.paused.lock().unwrap().as_slice(),
            &[("t_v3".to_string(), PartitionId(0))]
        );
    }

    /// S3: after pausing, a metadata change to UNLIMITED resumes the
    /// partition on the next batch, issuing resume exactly once.
    #[test]
    fn s3_unlimited_quota_resumes_paused_partition() {
        let h = harness(4, Quota::Bytes(400));
        h.controller
            .check_partition_quota(&vec![(PartitionId(0), 40), (PartitionId(1), 40)])
            .unwrap();
        h.controller
            .check_partition_quota(&vec![(PartitionId(0), 70)])
            .unwrap();
        assert!(h.controller.is_paused(PartitionId(0)));

        let unlimited_snapshot = FakeSnapshot {
            name: "my_store".to_string(),
            quota: Quota::Unlimited,
            version: 3,
            status: VersionStatus::Other,
        };
        h.controller.handle_store_changed(&unlimited_snapshot).unwrap();

        h.controller
            .check_partition_quota(&vec![(PartitionId(0), 1)])
            .unwrap();

        assert!(!h.controller.is_paused(PartitionId(0)));
        assert_eq!(
            h.task.consumer.resumed.lock().unwrap().as_slice(),
            &[("t_v3".to_string(), PartitionId(0))]
        );
    }

    /// S4: doubling the quota brings a previously-exceeding partition back
    /// within bounds and resumes it.
    #[test]
    fn s4_quota_increase_resumes_partition() {
        let h = harness(4, Quota::Bytes(400));
        h.controller
            .check_partition_quota(&vec![(PartitionId(0), 111)])
            .unwrap();
        assert!(h.controller.is_paused(PartitionId(0)));

        let doubled_snapshot = FakeSnapshot {
            name: "my_store".to_string(),
            quota: Quota::Bytes(800),
            version: 3,
            status: VersionStatus::Other,
        };
        h.controller.handle_store_changed(&doubled_snapshot).unwrap();

        h.controller
            .check_partition_quota(&vec![(PartitionId(0), 1)])
            .unwrap();

        assert!(!h.controller.is_paused(PartitionId(0)));
    }

    /// S5: a leader-role partition with a recorded leader topic pauses
    /// against the leader topic, not the version topic.
    #[test]
    fn s5_leader_partition_pauses_leader_topic() {
        let h = harness(4, Quota::Bytes(400));
        h.consumption_states.entries.lock().unwrap().insert(
            PartitionId(2),
            (LeaderState::Leader, Some("rt_stream".to_string()), false),
        );

        h.controller
            .check_partition_quota(&vec![(PartitionId(2), 200)])
            .unwrap();

        assert_eq!(
            h.task.consumer.paused.lock().unwrap().as_slice(),
            &[("rt_stream".to_string(), PartitionId(2))]
        );
    }

    /// S6: once the version is latched online, an exceeding partition with
    /// an unreported completion gets `reportCompleted` before it's paused.
    #[test]
    fn s6_completion_shortcut_fires_before_pause_once_online() {
        let h = harness(4, Quota::Bytes(400));
        h.consumption_states.entries.lock().unwrap().insert(
            PartitionId(3),
            (LeaderState::Other, None, false),
        );

        let online_snapshot = FakeSnapshot {
            name: "my_store".to_string(),
            quota: Quota::Bytes(400),
            version: 3,
            status: VersionStatus::Online,
        };
        h.controller.handle_store_changed(&online_snapshot).unwrap();

        h.controller
            .check_partition_quota(&vec![(PartitionId(3), 500)])
            .unwrap();

        assert_eq!(*h.dispatcher.completed.lock().unwrap(), vec![PartitionId(3)]);
        assert!(h.controller.is_paused(PartitionId(3)));
    }

    #[test]
    fn version_online_latch_never_resets() {
        let h = harness(4, Quota::Bytes(400));
        let online = FakeSnapshot {
            name: "my_store".to_string(),
            quota: Quota::Bytes(400),
            version: 3,
            status: VersionStatus::Online,
        };
        h.controller.handle_store_changed(&online).unwrap();

        // A later snapshot with a non-online status must not un-latch it.
        let regressed = FakeSnapshot {
            name: "my_store".to_string(),
            quota: Quota::Bytes(400),
            version: 3,
            status: VersionStatus::Other,
        };
        h.controller.handle_store_changed(&regressed).unwrap();

        h.consumption_states.entries.lock().unwrap().insert(
            PartitionId(0),
            (LeaderState::Other, None, false),
        );
        h.controller
            .check_partition_quota(&vec![(PartitionId(0), 500)])
            .unwrap();
        assert_eq!(*h.dispatcher.completed.lock().unwrap(), vec![PartitionId(0)]);
    }

    #[test]
    fn store_changed_for_a_different_store_is_a_no_op() {
        let h = harness(4, Quota::Bytes(400));
        let other_store = FakeSnapshot {
            name: "someone_elses_store".to_string(),
            quota: Quota::Unlimited,
            version: 3,
            status: VersionStatus::Online,
        };
        h.controller.handle_store_changed(&other_store).unwrap();

        // Quota is unchanged, so partition 0 still pauses on the old,
        // bounded quota.
        h.controller
            .check_partition_quota(&vec![(PartitionId(0), 500)])
            .unwrap();
        assert!(h.controller.is_paused(PartitionId(0)));
    }

    #[test]
    fn repeated_batches_reissue_pause_idempotently() {
        let h = harness(4, Quota::Bytes(400));
        h.controller
            .check_partition_quota(&vec![(PartitionId(0), 500)])
            .unwrap();
        h.controller
            .check_partition_quota(&vec![(PartitionId(0), 1)])
            .unwrap();

        // Pause is re-issued on the second batch too: the design
        // deliberately does not suppress a redundant pause call just
        // because the in-memory set already agrees.
        assert_eq!(h.task.consumer.paused.lock().unwrap().len(), 2);
    }

    #[test]
    fn metrics_are_only_recorded_when_emission_is_enabled() {
        let recorded = Arc::new(AtomicU64::new(0));
        struct CountingSink(Arc<AtomicU64>);
        impl MetricsSink for CountingSink {
            fn record_storage_quota_used(
                &self,
                _s: &str,
                _p: PartitionId,
                _r: f64,
            ) -> anyhow::Result<()> {
                self.0.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        }

        let task = Arc::new(FakeIngestionTask::default());
        let task_dyn: Arc<dyn IngestionTask> = task.clone();
        let snapshot = FakeSnapshot {
            name: "my_store".to_string(),
            quota: Quota::Bytes(400),
            version: 3,
            status: VersionStatus::Other,
        };
        let controller = EnforcementController::new(
            EnforcerConfig::new("my_store", "t_v3", 4),
            Arc::downgrade(&task_dyn),
            Arc::new(FakeStorageEngine::default()),
            Arc::new(FakeConsumptionStates::default()),
            Arc::new(FakeDispatcher::default()),
            Arc::new(CountingSink(recorded.clone())),
            Arc::new(NeverRedundant),
            Arc::new(FixedVersionCodec(3)),
            &snapshot,
        )
        .unwrap();

        controller
            .check_partition_quota(&vec![(PartitionId(0), 10)])
            .unwrap();
        assert_eq!(recorded.load(Ordering::SeqCst), 0);

        task.metrics_emission_enabled.store(true, Ordering::SeqCst);
        controller
            .check_partition_quota(&vec![(PartitionId(0), 10)])
            .unwrap();
        assert_eq!(recorded.load(Ordering::SeqCst), 1);
    }
}
