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

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> LevelFilter {
        match self {
            LogLevel::Trace => LevelFilter::Trace,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Error => LevelFilter::Error,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Jellyfin server address
    #[arg(long, env = "DEJAVU_SERVER_URL", default_value = "http://localhost:8096/")]
    pub server_url: String,

    /// Jellyfin API key
    #[arg(long, env = "DEJAVU_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// JSON configuration file, re-read whenever it changes
    #[arg(short, long, env = "DEJAVU_CONFIG")]
    pub config: Option<PathBuf>,

    /// Maximum rewind in seconds that turns subtitles on (-1 for no limit); overrides the file
    #[arg(long, allow_negative_numbers = true)]
    pub max_skip_secs: Option<i32>,

    /// Set the log level
    #[arg(short, long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Write logs to this file instead of only stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// With --log-file, do not also log to the console
    #[arg(short, long)]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_overrides_and_negative_skip() {
        let cli = Cli::try_parse_from([
            "dejavu_service", "--api-key", "k", "--max-skip-secs", "-1", "--log-level", "debug",
        ]).unwrap();
        assert_eq!(cli.api_key, "k");
        assert_eq!(cli.max_skip_secs, Some(-1));
        assert_eq!(cli.log_level, LogLevel::Debug);
        assert_eq!(cli.log_level.to_level_filter(), LevelFilter::Debug);
        assert!(cli.config.is_none());
        assert!(!cli.quiet);
    }

    #[test]
    fn log_level_displays_lowercase() {
        assert_eq!(LogLevel::Warn.to_string(), "warn");
    }
}
