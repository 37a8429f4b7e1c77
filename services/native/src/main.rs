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

use anyhow::Context;
use clap::Parser;
use dejavu_core::{ConfigHandle, SeekWatchService};
use dejavu_jellyfin_port::create_rest_api_jellyfin_host;
use dejavu_service::cli::Cli;
use dejavu_service::config_file::{resolve_config, run_config_reload, ConfigOverrides, RELOAD_INTERVAL};
use dejavu_service::logger::init_logger;
use log::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logger(cli.log_level, cli.log_file.as_deref(), cli.quiet)?;

    let overrides = ConfigOverrides { max_skip_secs: cli.max_skip_secs };
    let config = ConfigHandle::new(resolve_config(cli.config.as_deref(), overrides)?);
    let host = create_rest_api_jellyfin_host(&cli.server_url, &cli.api_key).await?;

    let mut seek_watch = SeekWatchService::new(host, config.clone());
    seek_watch.start();
    let config_reload = cli.config
        .map(|path| run_config_reload(path, overrides, config.clone(), RELOAD_INTERVAL));

    tokio::signal::ctrl_c().await.context("Failed to listen for Ctrl+C signal")?;
    info!("Exiting...");

    if let Some(config_reload) = config_reload {
        config_reload.shutdown().await?;
    }
    seek_watch.stop().await;
    Ok(())
}
