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

use async_trait::async_trait;
use thiserror::Error;

use crate::definitions::SubtitleCommand;
use crate::session::SessionSample;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HostError {
    #[error("Feature not supported")]
    FeatureNotSupported,

    #[error("User {0} not found")]
    UserNotFound(String),

    #[error("Request to {url} failed with status {status}")]
    Status { url: String, status: u16 },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Failed to decode host response: {0}")]
    Decode(String),

    #[error("Invalid host address: {0}")]
    InvalidAddress(String),
}

/// The media server the watcher observes and controls.
///
/// Every method defaults to [`HostError::FeatureNotSupported`] so partial hosts (for example a
/// read-only registry used in diagnostics) only implement what they can serve.
#[async_trait]
pub trait MediaHost: Send + Sync {
    /// Snapshot of every session currently known to the server, paused ones included.
    async fn list_live_sessions(&self) -> Result<Vec<SessionSample>, HostError> {
        Err(HostError::FeatureNotSupported)
    }

    /// Preferred subtitle language of a user; `Ok(None)` when the user has no preference.
    async fn user_language_preference(&self, _user_id: &str) -> Result<Option<String>, HostError> {
        Err(HostError::FeatureNotSupported)
    }

    async fn send_set_subtitle_track(&self, _session_id: &str, _command: SubtitleCommand)
        -> Result<(), HostError> {
        Err(HostError::FeatureNotSupported)
    }
}

#[derive(Clone)]
pub struct Host {
    host_impl: Arc<dyn MediaHost>,
}

impl Host {
    pub fn new(host_impl: Arc<dyn MediaHost>) -> Self {
        Self { host_impl }
    }
}

#[async_trait]
impl MediaHost for Host {
    async fn list_live_sessions(&self) -> Result<Vec<SessionSample>, HostError> {
        self.host_impl.list_live_sessions().await
    }

    async fn user_language_preference(&self, user_id: &str) -> Result<Option<String>, HostError> {
        self.host_impl.user_language_preference(user_id).await
    }

    async fn send_set_subtitle_track(&self, session_id: &str, command: SubtitleCommand)
        -> Result<(), HostError> {
        self.host_impl.send_set_subtitle_track(session_id, command).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RegistryOnlyHost;

    #[async_trait]
    impl MediaHost for RegistryOnlyHost {
        async fn list_live_sessions(&self) -> Result<Vec<SessionSample>, HostError> {
            Ok(vec![SessionSample { id: "s1".into(), ..Default::default() }])
        }
    }

    #[tokio::test]
    async fn host_delegates_and_reports_missing_features() {
        let host = Host::new(Arc::new(RegistryOnlyHost));
        let sessions = host.list_live_sessions().await.unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(
            host.send_set_subtitle_track("s1", SubtitleCommand::Disable).await,
            Err(HostError::FeatureNotSupported)
        );
        assert_eq!(
            host.user_language_preference("u1").await,
            Err(HostError::FeatureNotSupported)
        );
    }
}
