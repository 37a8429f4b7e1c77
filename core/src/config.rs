// Copyright 2025 HEM Sp. z o.o.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::definitions::{seconds_to_ticks, Ticks, DEFAULT_MAX_SKIP_SECS};

/// Runtime settings of the watcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WatcherConfig {
    /// How far back, in seconds, a rewind may reach before the watcher ignores it or gives up an
    /// active period. Negative values (`-1`) remove the limit.
    pub max_skip_secs: i32,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self { max_skip_secs: DEFAULT_MAX_SKIP_SECS }
    }
}

impl WatcherConfig {
    pub fn with_max_skip_secs(max_skip_secs: i32) -> Self {
        Self { max_skip_secs }
    }

    /// Rewind tolerance in ticks, `None` when unlimited.
    pub fn max_skip_ticks(&self) -> Option<Ticks> {
        if self.max_skip_secs < 0 {
            None
        } else {
            Some(seconds_to_ticks(self.max_skip_secs as i64))
        }
    }
}

/// Shared, swappable configuration snapshot.
///
/// Readers take a copy with [`ConfigHandle::current`] at the top of a tick, writers replace the
/// whole snapshot at once, so a tick never sees a half-applied update.
#[derive(Debug, Clone)]
pub struct ConfigHandle {
    tx: Arc<watch::Sender<WatcherConfig>>,
}

impl ConfigHandle {
    pub fn new(config: WatcherConfig) -> Self {
        let (tx, _rx) = watch::channel(config);
        Self { tx: Arc::new(tx) }
    }

    pub fn current(&self) -> WatcherConfig {
        *self.tx.borrow()
    }

    /// Replaces the snapshot. Returns `true` if the value changed.
    pub fn update(&self, config: WatcherConfig) -> bool {
        self.tx.send_if_modified(|current| {
            if *current == config {
                return false;
            }
            *current = config;
            true
        })
    }

    pub fn subscribe(&self) -> watch::Receiver<WatcherConfig> {
        self.tx.subscribe()
    }
}

impl Default for ConfigHandle {
    fn default() -> Self {
        Self::new(WatcherConfig::default())
    }
}
