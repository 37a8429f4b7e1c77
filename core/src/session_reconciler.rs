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

use std::collections::{HashMap, HashSet};

use log::{debug, error, trace, warn};
use thiserror::Error;

use crate::config::{ConfigHandle, WatcherConfig};
use crate::definitions::{ticks_to_seconds, SessionId, SubtitleCommand, Ticks};
use crate::host::{Host, HostError, MediaHost};
use crate::session::SessionSample;
use crate::subtitle_selector::{select_subtitle_track, LanguagePreference, TrackSelection};

#[derive(Error, Debug)]
pub enum WatcherError {
    #[error("Failed to list live sessions: {0}")]
    SessionRegistry(#[source] HostError),
}

/// What the watcher remembers about a session between two ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WatchedSession {
    pub last_position: Option<Ticks>,
    /// Most recent subtitle track the viewer had on, restored on the next rewind.
    pub last_known_subtitle_index: Option<i32>,
}

impl WatchedSession {
    fn first_sighting(session: &SessionSample) -> Self {
        Self {
            last_position: session.position_ticks,
            last_known_subtitle_index: session.subtitle_index,
        }
    }

    fn advance(&mut self, session: &SessionSample) {
        self.last_position = session.position_ticks;
        if let Some(index) = session.subtitle_index {
            self.last_known_subtitle_index = Some(index);
        }
    }
}

/// Subtitles the watcher turned on and will turn off again once playback reaches `end_position`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivePeriod {
    pub track_index: i32,
    pub end_position: Ticks,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PeriodEnd {
    CaughtUp,
    RewoundTooFar,
}

/// Returns the position the viewer rewound from, if this sample is a seek-back the watcher should act on.
fn detect_seek_back(last_position: Option<Ticks>,
                    session: &SessionSample,
                    has_active_period: bool,
                    max_skip_ticks: Option<Ticks>) -> Option<Ticks> {
    let (Some(position), Some(last_position)) = (session.position_ticks, last_position) else {
        return None;
    };
    if position >= last_position || session.subtitles_enabled() || has_active_period {
        return None;
    }
    match max_skip_ticks {
        Some(max_skip) if last_position - position > max_skip => None,
        _ => Some(last_position),
    }
}

fn evaluate_period(period: &ActivePeriod, position: Ticks, max_skip_ticks: Option<Ticks>) -> Option<PeriodEnd> {
    if position >= period.end_position {
        return Some(PeriodEnd::CaughtUp);
    }
    match max_skip_ticks {
        Some(max_skip) if period.end_position - position > max_skip => Some(PeriodEnd::RewoundTooFar),
        _ => None,
    }
}

// A viewer who picked some other track while the period ran keeps it; turning subtitles off by hand
// does not count as a different choice.
fn command_at_period_end(current_index: Option<i32>, period: &ActivePeriod) -> Option<SubtitleCommand> {
    match current_index {
        Some(index) if index != period.track_index => None,
        _ => Some(SubtitleCommand::Disable),
    }
}

/// Per-session state machine driven once per tick.
///
/// Both tables are owned by the reconciler and only touched from [`SessionReconciler::tick`], so a
/// session's detection, state advance and period evaluation always land together.
pub struct SessionReconciler {
    host: Host,
    config: ConfigHandle,
    watched_sessions: HashMap<SessionId, WatchedSession>,
    active_periods: HashMap<SessionId, ActivePeriod>,
}

impl SessionReconciler {
    pub fn new(host: Host, config: ConfigHandle) -> Self {
        Self {
            host,
            config,
            watched_sessions: HashMap::new(),
            active_periods: HashMap::new(),
        }
    }

    pub fn watched_session(&self, session_id: &str) -> Option<&WatchedSession> {
        self.watched_sessions.get(session_id)
    }

    pub fn active_period(&self, session_id: &str) -> Option<&ActivePeriod> {
        self.active_periods.get(session_id)
    }

    pub fn watched_session_count(&self) -> usize {
        self.watched_sessions.len()
    }

    /// One reconciliation pass over every live session, followed by cleanup of vanished ones.
    pub async fn tick(&mut self) -> Result<(), WatcherError> {
        let config = self.config.current();
        let sessions = self.host.list_live_sessions().await.map_err(WatcherError::SessionRegistry)?;

        for session in sessions.iter().filter(|session| !session.is_paused) {
            self.reconcile_session(session, &config).await;
        }

        self.forget_vanished_sessions(&sessions);
        Ok(())
    }

    async fn reconcile_session(&mut self, session: &SessionSample, config: &WatcherConfig) {
        trace!("Session {} tick ({:?}, {:?})", session.id, session.subtitle_index, session.position_ticks);
        let max_skip_ticks = config.max_skip_ticks();
        let has_active_period = self.active_periods.contains_key(&session.id);

        let watched = self.watched_sessions
            .entry(session.id.clone())
            .or_insert_with(|| WatchedSession::first_sighting(session));
        let rewound_from = detect_seek_back(watched.last_position, session, has_active_period, max_skip_ticks);
        let last_known_subtitle_index = watched.last_known_subtitle_index;
        watched.advance(session);

        if let Some(rewound_from) = rewound_from {
            self.enable_temporary_subtitles(session, rewound_from, last_known_subtitle_index).await;
        }

        self.evaluate_active_period(session, max_skip_ticks).await;
    }

    async fn enable_temporary_subtitles(&mut self,
                                        session: &SessionSample,
                                        rewound_from: Ticks,
                                        last_known_subtitle_index: Option<i32>) {
        let setting = self.language_setting(session).await;
        let preference = match &setting {
            Some(setting) => LanguagePreference::from_setting(setting.as_deref()),
            None => LanguagePreference::Unknown,
        };

        match select_subtitle_track(&session.subtitle_tracks, last_known_subtitle_index, preference) {
            TrackSelection::Track(index) => {
                debug!("Found subtitles for {} on track {}, enabling until {}", session.id, index, rewound_from);
                self.active_periods.insert(session.id.clone(), ActivePeriod {
                    track_index: index,
                    end_position: rewound_from,
                });
                self.dispatch(&session.id, SubtitleCommand::Enable(index)).await;
            }
            TrackSelection::Unavailable => {
                error!("Failed to find subtitles for {}", session.id);
            }
        }
    }

    // Outer `None` means the user record could not be read.
    async fn language_setting(&self, session: &SessionSample) -> Option<Option<String>> {
        let Some(user_id) = session.user_id.as_deref() else {
            warn!("Session {} has no owning user, ignoring language preference", session.id);
            return None;
        };
        match self.host.user_language_preference(user_id).await {
            Ok(setting) => Some(setting),
            Err(e) => {
                warn!("Failed to read language preference of user {}: {}", user_id, e);
                None
            }
        }
    }

    async fn evaluate_active_period(&mut self, session: &SessionSample, max_skip_ticks: Option<Ticks>) {
        let Some(position) = session.position_ticks else {
            return;
        };
        let Some(period) = self.active_periods.get(&session.id).copied() else {
            return;
        };
        let Some(end) = evaluate_period(&period, position, max_skip_ticks) else {
            return;
        };

        self.active_periods.remove(&session.id);
        if end == PeriodEnd::RewoundTooFar {
            debug!("Session {} rewound {:.1}s behind the subtitle period end, giving it up",
                   session.id, ticks_to_seconds(period.end_position - position));
        }

        match command_at_period_end(session.subtitle_index, &period) {
            Some(command) => {
                debug!("Disabling subtitles for session {}", session.id);
                self.dispatch(&session.id, command).await;
            }
            None => {
                debug!("User changed subtitles during the period for session {} ({:?} != {}), skipping",
                       session.id, session.subtitle_index, period.track_index);
            }
        }
    }

    async fn dispatch(&self, session_id: &str, command: SubtitleCommand) {
        if let Err(e) = self.host.send_set_subtitle_track(session_id, command).await {
            error!("Failed to {} for session {}: {}", command, session_id, e);
        }
    }

    fn forget_vanished_sessions(&mut self, sessions: &[SessionSample]) {
        let live: HashSet<&str> = sessions.iter().map(|session| session.id.as_str()).collect();
        self.watched_sessions.retain(|session_id, _| {
            let is_live = live.contains(session_id.as_str());
            if !is_live {
                debug!("Session {} is gone, forgetting it", session_id);
            }
            is_live
        });
        self.active_periods.retain(|session_id, _| live.contains(session_id.as_str()));
    }
}
