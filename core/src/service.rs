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

use std::future::Future;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Lets a background task observe a stop request.
pub struct StopHandle {
    shutdown_rx: oneshot::Receiver<()>,
}

impl StopHandle {
    fn new(shutdown_rx: oneshot::Receiver<()>) -> Self { Self { shutdown_rx } }

    /// Resolves once a stop was requested, or once the owning [`ServiceHandle`] was dropped.
    ///
    /// Meant to be polled from a `select!` loop; the future can be recreated on every iteration.
    ///
    /// # Example
    /// ```rust
    /// use dejavu_core::spawn_service;
    ///
    /// async fn run() {
    ///     let handle = spawn_service(move |mut stop_handle| async move {
    ///         stop_handle.signaled().await;
    ///     });
    ///     handle.shutdown().await.unwrap();
    /// }
    /// ```
    pub async fn signaled(&mut self) {
        (&mut self.shutdown_rx).await.unwrap_or_default();
    }
}

/// Handle to a background service task supporting cooperative shutdown.
pub struct ServiceHandle {
    join: JoinHandle<()>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl ServiceHandle {
    pub fn new(join: JoinHandle<()>, shutdown_tx: oneshot::Sender<()>) -> Self {
        Self { join, shutdown_tx: Some(shutdown_tx) }
    }

    /// Request cooperative shutdown without awaiting task completion.
    pub fn request_shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Request cooperative shutdown and wait until the task has returned.
    pub async fn shutdown(mut self) -> Result<(), tokio::task::JoinError> {
        self.request_shutdown();
        self.join.await
    }
}

/// Spawn a background service task on Tokio with a standard stop mechanism.
pub fn spawn_service<Fut, Func>(f: Func) -> ServiceHandle
where
    Fut: Future<Output=()> + Send + 'static,
    Func: FnOnce(StopHandle) -> Fut + Send + 'static,
{
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let stop = StopHandle::new(shutdown_rx);
    let join = tokio::spawn(async move {
        f(stop).await;
    });
    ServiceHandle::new(join, shutdown_tx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn shutdown_waits_for_the_task_to_return() {
        let finished = Arc::new(AtomicBool::new(false));
        let flag = finished.clone();
        let handle = spawn_service(move |mut stop_handle| async move {
            stop_handle.signaled().await;
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            flag.store(true, Ordering::SeqCst);
        });
        handle.shutdown().await.unwrap();
        assert!(finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn dropping_the_handle_signals_the_task() {
        let (done_tx, done_rx) = oneshot::channel();
        let handle = spawn_service(move |mut stop_handle| async move {
            stop_handle.signaled().await;
            let _ = done_tx.send(());
        });
        drop(handle);
        done_rx.await.unwrap();
    }
}
