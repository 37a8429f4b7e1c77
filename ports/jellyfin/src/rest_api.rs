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

use async_trait::async_trait;
use dejavu_core::{HostError, MediaHost, SessionSample, SubtitleCommand};
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::device_id::{calculate_device_id, local_host_name};
use crate::dto::{GeneralCommandDto, SessionInfoDto, UserDto};

pub const CLIENT_NAME: &str = "DejaVu";
const AUTHORIZATION_HEADER: &str = "X-Emby-Authorization";

pub struct RestApiJellyfinHost {
    client: Client,
    url: Url,
}

fn transport_error(e: reqwest::Error) -> HostError {
    HostError::Transport(e.to_string())
}

fn authorization_value(api_key: &str, host_name: &str) -> String {
    let device_id = calculate_device_id(CLIENT_NAME, host_name);
    format!(
        "MediaBrowser Client=\"{CLIENT_NAME}\", Device=\"{host_name}\", DeviceId=\"{}\", Version=\"{}\", Token=\"{api_key}\"",
        device_id.simple(),
        env!("CARGO_PKG_VERSION"),
    )
}

/// Base address with a trailing slash, so relative endpoints join below it instead of replacing
/// its last path segment.
fn normalize_base_url(url: &str) -> Result<Url, HostError> {
    let mut url = Url::parse(url).map_err(|e| HostError::InvalidAddress(format!("{url}: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(HostError::InvalidAddress(url.to_string()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

impl RestApiJellyfinHost {
    pub async fn new(url: &str, api_key: &str) -> Result<Self, HostError> {
        let url = normalize_base_url(url)?;
        let authorization = authorization_value(api_key, &local_host_name());
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION_HEADER,
            HeaderValue::from_str(&authorization).map_err(|e| HostError::InvalidAddress(e.to_string()))?,
        );
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(transport_error)?;
        Ok(RestApiJellyfinHost { client, url })
    }

    fn endpoint(&self, path: &str) -> Result<Url, HostError> {
        self.url.join(path).map_err(|e| HostError::InvalidAddress(format!("{path}: {e}")))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, HostError> {
        let url = self.endpoint(path)?;
        let response = self.client.get(url).send().await.map_err(transport_error)?;
        let response = check_status(response)?;
        let response_text = response.text().await.map_err(transport_error)?;
        serde_json::from_str(&response_text).map_err(|e| HostError::Decode(e.to_string()))
    }
}

fn check_status(response: Response) -> Result<Response, HostError> {
    if response.status().is_success() {
        return Ok(response);
    }
    Err(HostError::Status {
        url: response.url().to_string(),
        status: response.status().as_u16(),
    })
}

#[async_trait]
impl MediaHost for RestApiJellyfinHost {
    async fn list_live_sessions(&self) -> Result<Vec<SessionSample>, HostError> {
        let sessions: Vec<SessionInfoDto> = self.get_json("Sessions").await?;
        Ok(sessions.into_iter().map(SessionSample::from).collect())
    }

    async fn user_language_preference(&self, user_id: &str) -> Result<Option<String>, HostError> {
        match self.get_json::<UserDto>(&format!("Users/{user_id}")).await {
            Ok(user) => Ok(user.subtitle_language_preference()),
            Err(HostError::Status { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                Err(HostError::UserNotFound(user_id.to_string()))
            }
            Err(e) => Err(e),
        }
    }

    async fn send_set_subtitle_track(&self, session_id: &str, command: SubtitleCommand) -> Result<(), HostError> {
        let url = self.endpoint(&format!("Sessions/{session_id}/Command"))?;
        let body = serde_json::to_string(&GeneralCommandDto::set_subtitle_stream_index(command))
            .map_err(|e| HostError::Decode(e.to_string()))?;
        debug!("Sending {} to session {}", command, session_id);
        let response = self.client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(transport_error)?;
        check_status(response)?;
        Ok(())
    }
}
