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

use crate::session::SubtitleTrack;

/// Outcome of a subtitle track lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackSelection {
    Track(i32),
    Unavailable,
}

/// Viewer's subtitle language setting as far as the selector is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguagePreference<'a> {
    /// No preference set: any track is acceptable.
    Any,
    Language(&'a str),
    /// The user record could not be read; the language rule is skipped.
    Unknown,
}

impl<'a> LanguagePreference<'a> {
    pub fn from_setting(setting: Option<&'a str>) -> Self {
        match setting.map(str::trim) {
            Some(language) if !language.is_empty() => Self::Language(language),
            _ => Self::Any,
        }
    }
}

type TrackRule<'a> = Box<dyn Fn(&SubtitleTrack) -> bool + 'a>;

// Ordered by precedence: the track the viewer last used, the item's default track, then language.
fn selection_rules<'a>(last_known_index: Option<i32>, preference: LanguagePreference<'a>) -> Vec<TrackRule<'a>> {
    let mut rules: Vec<TrackRule<'a>> = Vec::with_capacity(3);
    if let Some(last_known_index) = last_known_index {
        rules.push(Box::new(move |track: &SubtitleTrack| track.index == last_known_index));
    }
    rules.push(Box::new(|track: &SubtitleTrack| track.is_default));
    match preference {
        LanguagePreference::Any => rules.push(Box::new(|_: &SubtitleTrack| true)),
        LanguagePreference::Language(language) => rules.push(Box::new(move |track: &SubtitleTrack| {
            track.language.as_deref()
                .is_some_and(|track_language| track_language.eq_ignore_ascii_case(language))
        })),
        LanguagePreference::Unknown => {}
    }
    rules
}

/// Picks the subtitle track to turn on for a viewer who just rewound.
///
/// Rules are tried in order and each scans the tracks in server order; the first track matched by
/// the first matching rule wins. Tracks with a negative index are never addressable and are ignored.
pub fn select_subtitle_track(tracks: &[SubtitleTrack],
                             last_known_index: Option<i32>,
                             preference: LanguagePreference<'_>) -> TrackSelection {
    selection_rules(last_known_index, preference)
        .iter()
        .find_map(|rule| tracks.iter().filter(|track| track.index >= 0).find(|track| rule(*track)))
        .map(|track| TrackSelection::Track(track.index))
        .unwrap_or(TrackSelection::Unavailable)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracks() -> Vec<SubtitleTrack> {
        vec![
            SubtitleTrack::new(0, Some("en"), false),
            SubtitleTrack::new(1, Some("fr"), true),
            SubtitleTrack::new(2, Some("en"), false),
        ]
    }

    #[test]
    fn last_known_track_wins_over_default_and_language() {
        let selection = select_subtitle_track(&tracks(), Some(2), LanguagePreference::Language("en"));
        assert_eq!(selection, TrackSelection::Track(2));
    }

    #[test]
    fn default_track_wins_over_language_match() {
        let selection = select_subtitle_track(&tracks(), None, LanguagePreference::Language("en"));
        assert_eq!(selection, TrackSelection::Track(1));
    }

    #[test]
    fn stale_last_known_index_falls_through_to_default() {
        let selection = select_subtitle_track(&tracks(), Some(7), LanguagePreference::Any);
        assert_eq!(selection, TrackSelection::Track(1));
    }

    #[test]
    fn language_match_picks_first_matching_track_in_server_order() {
        let tracks = vec![
            SubtitleTrack::new(3, Some("de"), false),
            SubtitleTrack::new(4, Some("eng"), false),
            SubtitleTrack::new(5, Some("eng"), false),
        ];
        let selection = select_subtitle_track(&tracks, None, LanguagePreference::Language("ENG"));
        assert_eq!(selection, TrackSelection::Track(4));
    }

    #[test]
    fn blank_preference_matches_first_track() {
        let tracks = vec![
            SubtitleTrack::new(3, Some("de"), false),
            SubtitleTrack::new(4, None, false),
        ];
        let preference = LanguagePreference::from_setting(Some("  "));
        assert_eq!(preference, LanguagePreference::Any);
        assert_eq!(select_subtitle_track(&tracks, None, preference), TrackSelection::Track(3));
    }

    #[test]
    fn unmatched_language_reports_unavailable() {
        let tracks = vec![SubtitleTrack::new(3, Some("de"), false)];
        let selection = select_subtitle_track(&tracks, None, LanguagePreference::Language("en"));
        assert_eq!(selection, TrackSelection::Unavailable);
    }

    #[test]
    fn unknown_user_skips_only_the_language_rule() {
        let plain = vec![SubtitleTrack::new(3, Some("de"), false)];
        assert_eq!(select_subtitle_track(&plain, None, LanguagePreference::Unknown), TrackSelection::Unavailable);
        assert_eq!(select_subtitle_track(&plain, Some(3), LanguagePreference::Unknown), TrackSelection::Track(3));
        assert_eq!(select_subtitle_track(&tracks(), None, LanguagePreference::Unknown), TrackSelection::Track(1));
    }

    #[test]
    fn no_tracks_reports_unavailable() {
        assert_eq!(select_subtitle_track(&[], Some(0), LanguagePreference::Any), TrackSelection::Unavailable);
    }
}
