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

pub mod config;
pub mod definitions;
pub mod host;
pub mod session;
pub mod subtitle_selector;

mod poll_scheduler;
mod seek_watch_service;
mod service;
mod session_reconciler;

pub use config::{ConfigHandle, WatcherConfig};
pub use definitions::SubtitleCommand;
pub use host::{Host, HostError, MediaHost};
pub use poll_scheduler::run_seek_watch;
pub use seek_watch_service::SeekWatchService;
pub use service::{spawn_service, ServiceHandle, StopHandle};
pub use session::{SessionSample, SubtitleTrack};
pub use session_reconciler::{ActivePeriod, SessionReconciler, WatchedSession, WatcherError};
