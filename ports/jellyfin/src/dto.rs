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

use std::collections::HashMap;

use dejavu_core::{SessionSample, SubtitleCommand, SubtitleTrack};
use serde::{Deserialize, Serialize};

const SUBTITLE_STREAM_TYPE: &str = "Subtitle";
const SET_SUBTITLE_STREAM_INDEX: &str = "SetSubtitleStreamIndex";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SessionInfoDto {
    pub id: String,
    pub user_id: Option<String>,
    #[serde(default)]
    pub play_state: Option<PlayStateDto>,
    #[serde(default)]
    pub now_playing_item: Option<NowPlayingItemDto>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PlayStateDto {
    #[serde(default)]
    pub is_paused: bool,
    pub position_ticks: Option<i64>,
    pub subtitle_stream_index: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NowPlayingItemDto {
    #[serde(default)]
    pub media_streams: Vec<MediaStreamDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MediaStreamDto {
    #[serde(rename = "Type")]
    pub stream_type: Option<String>,
    pub index: i32,
    pub language: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserDto {
    pub configuration: Option<UserConfigurationDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserConfigurationDto {
    pub subtitle_language_preference: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GeneralCommandDto {
    pub name: &'static str,
    pub arguments: HashMap<&'static str, String>,
}

impl GeneralCommandDto {
    pub fn set_subtitle_stream_index(command: SubtitleCommand) -> Self {
        Self {
            name: SET_SUBTITLE_STREAM_INDEX,
            arguments: HashMap::from([("Index", command.stream_index().to_string())]),
        }
    }
}

impl From<SessionInfoDto> for SessionSample {
    fn from(session: SessionInfoDto) -> Self {
        let play_state = session.play_state.unwrap_or_default();
        let subtitle_tracks = session.now_playing_item
            .map(|item| item.media_streams)
            .unwrap_or_default()
            .into_iter()
            .filter(|stream| stream.stream_type.as_deref() == Some(SUBTITLE_STREAM_TYPE))
            .map(|stream| SubtitleTrack {
                index: stream.index,
                language: stream.language,
                is_default: stream.is_default,
            })
            .collect();

        SessionSample {
            id: session.id,
            user_id: session.user_id.filter(|user_id| !user_id.is_empty()),
            is_paused: play_state.is_paused,
            position_ticks: play_state.position_ticks,
            subtitle_index: SessionSample::subtitle_index_from_raw(play_state.subtitle_stream_index),
            subtitle_tracks,
        }
    }
}

impl UserDto {
    pub fn subtitle_language_preference(self) -> Option<String> {
        self.configuration.and_then(|configuration| configuration.subtitle_language_preference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SESSIONS: &str = r#"[
        {
            "Id": "a1b2",
            "UserId": "u1",
            "Client": "Jellyfin Web",
            "PlayState": { "IsPaused": false, "PositionTicks": 1234500000, "SubtitleStreamIndex": -1, "CanSeek": true },
            "NowPlayingItem": {
                "Name": "Pilot",
                "MediaStreams": [
                    { "Type": "Video", "Index": 0, "IsDefault": true },
                    { "Type": "Audio", "Index": 1, "Language": "eng", "IsDefault": true },
                    { "Type": "Subtitle", "Index": 2, "Language": "eng", "IsDefault": false },
                    { "Type": "Subtitle", "Index": 3, "Language": "fre", "IsDefault": true }
                ]
            }
        },
        { "Id": "idle", "UserId": "u2", "PlayState": { "CanSeek": false } }
    ]"#;

    #[test]
    fn sessions_map_to_samples_with_subtitle_tracks_only() {
        let sessions: Vec<SessionInfoDto> = serde_json::from_str(SESSIONS).unwrap();
        let samples: Vec<SessionSample> = sessions.into_iter().map(SessionSample::from).collect();

        assert_eq!(samples[0].id, "a1b2");
        assert_eq!(samples[0].user_id.as_deref(), Some("u1"));
        assert_eq!(samples[0].position_ticks, Some(1_234_500_000));
        assert_eq!(samples[0].subtitle_index, None);
        assert_eq!(samples[0].subtitle_tracks, vec![
            SubtitleTrack::new(2, Some("eng"), false),
            SubtitleTrack::new(3, Some("fre"), true),
        ]);

        assert_eq!(samples[1].id, "idle");
        assert!(!samples[1].is_paused);
        assert_eq!(samples[1].position_ticks, None);
        assert!(samples[1].subtitle_tracks.is_empty());
    }

    #[test]
    fn user_configuration_exposes_language_preference() {
        let user: UserDto = serde_json::from_str(
            r#"{ "Name": "alice", "Configuration": { "SubtitleLanguagePreference": "eng", "SubtitleMode": "Default" } }"#
        ).unwrap();
        assert_eq!(user.subtitle_language_preference().as_deref(), Some("eng"));

        let user: UserDto = serde_json::from_str(r#"{ "Name": "bob" }"#).unwrap();
        assert_eq!(user.subtitle_language_preference(), None);
    }

    #[test]
    fn general_command_body_matches_server_format() {
        let body = serde_json::to_value(GeneralCommandDto::set_subtitle_stream_index(SubtitleCommand::Disable)).unwrap();
        assert_eq!(body, serde_json::json!({ "Name": "SetSubtitleStreamIndex", "Arguments": { "Index": "-1" } }));

        let body = serde_json::to_value(GeneralCommandDto::set_subtitle_stream_index(SubtitleCommand::Enable(3))).unwrap();
        assert_eq!(body["Arguments"]["Index"], "3");
    }
}
