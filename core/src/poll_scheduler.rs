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

use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures::FutureExt;
use log::{error, info};
use tokio::select;
use tokio::time::MissedTickBehavior;

use crate::config::ConfigHandle;
use crate::definitions::POLL_INTERVAL;
use crate::host::Host;
use crate::service::{spawn_service, ServiceHandle};
use crate::session_reconciler::SessionReconciler;

/// Start reconciling the host's sessions once per [`POLL_INTERVAL`].
///
/// The first pass runs right away. Passes never overlap: a slow pass delays the next one. Dropping
/// or shutting down the returned handle stops the loop after the pass in flight has finished.
pub fn run_seek_watch(host: Host, config: ConfigHandle) -> ServiceHandle {
    run_reconciler(SessionReconciler::new(host, config), POLL_INTERVAL)
}

pub(crate) fn run_reconciler(mut reconciler: SessionReconciler, period: Duration) -> ServiceHandle {
    spawn_service(move |mut stop_handle| async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!("Seek watch started");
        loop {
            select! {
                biased;
                _ = stop_handle.signaled() => {
                    info!("Seek watch shutdown requested");
                    break;
                }
                _ = interval.tick() => {
                    run_tick(&mut reconciler).await;
                }
            }
        }
        info!("Seek watch stopped ({} sessions were tracked)", reconciler.watched_session_count());
    })
}

// A failing or panicking pass is reported and the loop carries on with the next interval.
async fn run_tick(reconciler: &mut SessionReconciler) {
    match AssertUnwindSafe(reconciler.tick()).catch_unwind().await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!("Seek watch tick failed: {}", e),
        Err(panic) => {
            let reason = panic.downcast_ref::<&str>().copied()
                .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
                .unwrap_or("unknown panic");
            error!("Seek watch tick panicked: {}", reason);
        }
    }
}
