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

use crate::definitions::{SessionId, Ticks, UserId, SUBTITLES_DISABLED_INDEX};

/// Subtitle stream attached to the item a session is playing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubtitleTrack {
    pub index: i32,
    pub language: Option<String>,
    pub is_default: bool,
}

impl SubtitleTrack {
    pub fn new(index: i32, language: Option<&str>, is_default: bool) -> Self {
        Self {
            index,
            language: language.map(str::to_string),
            is_default,
        }
    }
}

/// Snapshot of one live playback session, read from the host every tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSample {
    pub id: SessionId,
    pub user_id: Option<UserId>,
    pub is_paused: bool,
    pub position_ticks: Option<Ticks>,
    /// Active subtitle stream, `None` when subtitles are off.
    pub subtitle_index: Option<i32>,
    pub subtitle_tracks: Vec<SubtitleTrack>,
}

impl SessionSample {
    pub fn subtitles_enabled(&self) -> bool {
        self.subtitle_index.is_some()
    }

    /// Normalizes a raw host stream index where `-1` means "off".
    pub fn subtitle_index_from_raw(raw: Option<i32>) -> Option<i32> {
        raw.filter(|index| *index != SUBTITLES_DISABLED_INDEX && *index >= 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_minus_one_and_missing_index_both_mean_off() {
        assert_eq!(SessionSample::subtitle_index_from_raw(Some(-1)), None);
        assert_eq!(SessionSample::subtitle_index_from_raw(None), None);
        assert_eq!(SessionSample::subtitle_index_from_raw(Some(0)), Some(0));
        assert_eq!(SessionSample::subtitle_index_from_raw(Some(4)), Some(4));
    }
}
