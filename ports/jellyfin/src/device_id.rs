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

use sysinfo::System;
use uuid::Uuid;

const ROOT_UUID: Uuid = Uuid::from_u128(0x6f0c_2a7e_9d3b_4c51_8e2f_a4b7_c9d1_e305);

/// Stable device id announced to the server, derived from the client name and the machine name.
///
/// The server keys its device list on this value, so restarts of the same client on the same
/// machine must produce the same id.
pub fn calculate_device_id(client: &str, host_name: &str) -> Uuid {
    let client_uuid = Uuid::new_v5(&ROOT_UUID, client.as_bytes());
    Uuid::new_v5(&client_uuid, host_name.as_bytes())
}

const FALLBACK_HOST_NAME: &str = "localhost";

/// Machine name as reported by the operating system.
pub fn local_host_name() -> String {
    host_name_or_fallback(System::host_name())
}

fn host_name_or_fallback(host_name: Option<String>) -> String {
    host_name
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| FALLBACK_HOST_NAME.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLIENT: &str = "DejaVu";
    const HOST: &str = "media-box";

    #[test]
    fn calculate_device_id_executed_two_times_with_the_same_arguments_should_return_the_same_uuid() {
        assert_eq!(calculate_device_id(CLIENT, HOST), calculate_device_id(CLIENT, HOST));
    }

    #[test]
    fn calculate_device_id_with_one_changed_argument_should_return_different_uuid() {
        let reference = calculate_device_id(CLIENT, HOST);
        assert_ne!(reference, calculate_device_id("Other", HOST));
        assert_ne!(reference, calculate_device_id(CLIENT, "other-box"));
    }

    #[test]
    fn host_name_reported_by_the_system_is_used_as_is() {
        assert_eq!(host_name_or_fallback(Some("media-box".to_string())), "media-box");
        assert_eq!(host_name_or_fallback(Some(" media-box\n".to_string())), "media-box");
    }

    #[test]
    fn missing_or_blank_host_name_falls_back_to_localhost() {
        assert_eq!(host_name_or_fallback(None), "localhost");
        assert_eq!(host_name_or_fallback(Some("  ".to_string())), "localhost");
    }

    #[test]
    fn local_host_name_matches_the_system_host_name() {
        let expected = host_name_or_fallback(System::host_name());
        assert_eq!(local_host_name(), expected);
        assert!(!local_host_name().is_empty());
    }
}
