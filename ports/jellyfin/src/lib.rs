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

use dejavu_core::{Host, HostError};
use log::info;

mod device_id;
mod dto;
mod rest_api;

pub use rest_api::{RestApiJellyfinHost, CLIENT_NAME};

pub async fn create_rest_api_jellyfin_host(url: &str, api_key: &str) -> Result<Host, HostError> {
    let rest_api_host = RestApiJellyfinHost::new(url, api_key).await?;
    info!("Using Jellyfin server at {}", url);
    Ok(Host::new(Arc::new(rest_api_host)))
}
