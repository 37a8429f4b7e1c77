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

use log::{debug, error, info, warn};

use crate::config::ConfigHandle;
use crate::host::Host;
use crate::poll_scheduler::run_seek_watch;
use crate::service::ServiceHandle;

/// Start/stop lifecycle of the seek watch, as exposed to the process hosting it.
pub struct SeekWatchService {
    host: Host,
    config: ConfigHandle,
    seek_watch_handle: Option<ServiceHandle>,
}

impl SeekWatchService {
    pub fn new(host: Host, config: ConfigHandle) -> Self {
        Self {
            host,
            config,
            seek_watch_handle: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.seek_watch_handle.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Starts the watch. Calling it while already running keeps the running watch and its state.
    pub fn start(&mut self) {
        if self.is_running() {
            warn!("Seek watch is already running");
            return;
        }
        info!("Starting seek watch (max skip {}s)", self.config.current().max_skip_secs);
        self.seek_watch_handle = Some(run_seek_watch(self.host.clone(), self.config.clone()));
    }

    /// Stops the watch and waits for the tick in flight, if any, to complete.
    pub async fn stop(&mut self) {
        let Some(handle) = self.seek_watch_handle.take() else {
            debug!("Seek watch is not running");
            return;
        };
        info!("Stopping seek watch");
        match handle.shutdown().await {
            Ok(()) => {}
            Err(e) if e.is_cancelled() => {
                debug!("Seek watch task was cancelled during shutdown");
            }
            Err(e) if e.is_panic() => {
                error!("Seek watch task panicked during shutdown: {}", e);
                std::panic::resume_unwind(e.into_panic());
            }
            Err(e) => {
                error!("Error shutting down seek watch: {}", e);
            }
        }
    }
}
