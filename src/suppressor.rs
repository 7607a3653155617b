// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Default rate-limiter for noisy, non-fatal quota-exceeded log lines.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::collaborators::RedundantLogSuppressor;

const WINDOW: Duration = Duration::from_secs(60);

/// A [`RedundantLogSuppressor`] that allows at most one `false` ("not
/// redundant") verdict per identifier per rolling minute.
///
/// This is an injected collaborator, not a process-global singleton: the
/// crate's design notes call out sharing a suppressor across a whole task
/// as a global-state smell to be tolerated at the embedding layer, not
/// baked into this type.
#[derive(Debug, Default)]
pub struct TimeBucketedSuppressor {
    last_seen: Mutex<HashMap<String, Instant>>,
}

impl TimeBucketedSuppressor {
    /// A suppressor with no identifiers seen yet.
    pub fn new() -> Self {
        TimeBucketedSuppressor {
            last_seen: Mutex::new(HashMap::new()),
        }
    }
}

impl RedundantLogSuppressor for TimeBucketedSuppressor {
    fn is_redundant(&self, identifier: &str) -> bool {
        let now = Instant::now();
        let mut last_seen = self.last_seen.lock().expect("suppressor lock poisoned");
        match last_seen.get(identifier) {
            Some(&seen_at) if now.duration_since(seen_at) < WINDOW => true,
            _ => {
                last_seen.insert(identifier.to_string(), now);
                false
            }
        }
    }
}
