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

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use anyhow::Context;
use dejavu_core::{spawn_service, ConfigHandle, ServiceHandle, WatcherConfig};
use log::{debug, info, warn};
use tokio::select;

pub const RELOAD_INTERVAL: Duration = Duration::from_secs(5);

/// Settings given on the command line, applied on top of every file read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub max_skip_secs: Option<i32>,
}

impl ConfigOverrides {
    pub fn apply(&self, mut config: WatcherConfig) -> WatcherConfig {
        if let Some(max_skip_secs) = self.max_skip_secs {
            config.max_skip_secs = max_skip_secs;
        }
        config
    }
}

pub fn load_config_file(path: &Path) -> anyhow::Result<WatcherConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse config file {}", path.display()))
}

/// Initial configuration: defaults, then the file if one is given, then the overrides.
pub fn resolve_config(path: Option<&Path>, overrides: ConfigOverrides) -> anyhow::Result<WatcherConfig> {
    let config = match path {
        Some(path) if path.exists() => load_config_file(path)?,
        Some(path) => {
            warn!("Config file {} does not exist, using defaults", path.display());
            WatcherConfig::default()
        }
        None => WatcherConfig::default(),
    };
    Ok(overrides.apply(config))
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|metadata| metadata.modified()).ok()
}

/// Re-reads the file into `handle` whenever its modification time changes.
///
/// A file that is missing or does not parse leaves the current configuration in place.
pub fn run_config_reload(path: PathBuf,
                         overrides: ConfigOverrides,
                         handle: ConfigHandle,
                         period: Duration) -> ServiceHandle {
    spawn_service(move |mut stop_handle| async move {
        let mut last_modified = modified_time(&path);
        let mut interval = tokio::time::interval(period);
        interval.tick().await;
        loop {
            select! {
                biased;
                _ = stop_handle.signaled() => {
                    debug!("Config reload shutdown requested");
                    break;
                }
                _ = interval.tick() => {
                    let modified = modified_time(&path);
                    if modified.is_none() || modified == last_modified {
                        continue;
                    }
                    last_modified = modified;
                    match load_config_file(&path) {
                        Ok(config) => {
                            if handle.update(overrides.apply(config)) {
                                info!("Configuration reloaded from {}: {:?}", path.display(), handle.current());
                            }
                        }
                        Err(e) => warn!("Keeping previous configuration: {:#}", e),
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    // Written aside and renamed so the watcher never reads a half-written file.
    fn write_config(path: &Path, body: &str) {
        let staging = path.with_extension("tmp");
        let mut file = std::fs::File::create(&staging).unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file.sync_all().unwrap();
        std::fs::rename(&staging, path).unwrap();
    }

    #[test]
    fn resolve_uses_file_then_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dejavu.json");
        write_config(&path, r#"{ "maxSkipSecs": 30 }"#);

        let config = resolve_config(Some(&path), ConfigOverrides::default()).unwrap();
        assert_eq!(config.max_skip_secs, 30);

        let config = resolve_config(Some(&path), ConfigOverrides { max_skip_secs: Some(-1) }).unwrap();
        assert_eq!(config.max_skip_secs, -1);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = resolve_config(Some(&dir.path().join("absent.json")), ConfigOverrides::default()).unwrap();
        assert_eq!(config, WatcherConfig::default());
    }

    #[test]
    fn malformed_file_is_an_error_at_startup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dejavu.json");
        write_config(&path, "{ maxSkipSecs: ");
        assert!(resolve_config(Some(&path), ConfigOverrides::default()).is_err());
    }

    #[tokio::test]
    async fn changed_file_is_applied_and_broken_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dejavu.json");
        write_config(&path, r#"{ "maxSkipSecs": 30 }"#);
        let handle = ConfigHandle::new(resolve_config(Some(&path), ConfigOverrides::default()).unwrap());
        let mut changes = handle.subscribe();

        let reload = run_config_reload(path.clone(), ConfigOverrides::default(), handle.clone(), Duration::from_millis(20));

        // Coarse filesystem timestamps need a visible gap between writes.
        tokio::time::sleep(Duration::from_millis(1100)).await;
        write_config(&path, r#"{ "maxSkipSecs": 10 }"#);
        tokio::time::timeout(Duration::from_secs(2), changes.changed()).await.unwrap().unwrap();
        assert_eq!(handle.current().max_skip_secs, 10);

        tokio::time::sleep(Duration::from_millis(1100)).await;
        write_config(&path, "not json");
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(handle.current().max_skip_secs, 10);

        reload.shutdown().await.unwrap();
    }
}
