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

use std::fmt;
use std::time::Duration;

/// Media server position ticks: 100 ns units, as reported in session play state.
pub type Ticks = i64;

pub type SessionId = String;
pub type UserId = String;

pub const TICKS_PER_SECOND: Ticks = 10_000_000;

/// Interval between two reconciliation passes.
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

pub const DEFAULT_MAX_SKIP_SECS: i32 = 60;

/// `max_skip_secs` value that disables the rewind tolerance.
pub const UNLIMITED_SKIP_SECS: i32 = -1;

/// Subtitle stream index the host uses for "subtitles off".
pub const SUBTITLES_DISABLED_INDEX: i32 = -1;

pub fn seconds_to_ticks(seconds: i64) -> Ticks {
    seconds.saturating_mul(TICKS_PER_SECOND)
}

pub fn ticks_to_seconds(ticks: Ticks) -> f64 {
    ticks as f64 / TICKS_PER_SECOND as f64
}

/// Outbound "set subtitle track" instruction for a single session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubtitleCommand {
    Enable(i32),
    Disable,
}

impl SubtitleCommand {
    /// Stream index as sent to the host, `-1` for [`SubtitleCommand::Disable`].
    pub fn stream_index(&self) -> i32 {
        match self {
            Self::Enable(index) => *index,
            Self::Disable => SUBTITLES_DISABLED_INDEX,
        }
    }
}

impl fmt::Display for SubtitleCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enable(index) => write!(f, "enable subtitle track {}", index),
            Self::Disable => write!(f, "disable subtitles"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disable_command_is_sent_as_minus_one() {
        assert_eq!(SubtitleCommand::Disable.stream_index(), -1);
        assert_eq!(SubtitleCommand::Enable(3).stream_index(), 3);
    }

    #[test]
    fn ticks_and_seconds_convert_both_ways() {
        assert_eq!(seconds_to_ticks(30), 300_000_000);
        assert_eq!(ticks_to_seconds(15_000_000), 1.5);
    }
}
