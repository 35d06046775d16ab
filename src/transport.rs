// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 U.S. Federal Government (in countries where recognized)
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


//! HTTP transport construction.
//!
//! Builds the `reqwest` client behind a [`PetStoreClient`](crate::PetStoreClient)
//! and turns configured plus per-call headers into a `HeaderMap`.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::config::HarnessConfig;
use crate::error::{HarnessError, Result};

/// Build a reqwest Client for the given configuration.
///
/// No timeout is applied unless one is configured.
pub fn build_http_client(config: &HarnessConfig) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder()
        .user_agent(crate::USER_AGENT)
        .use_rustls_tls();

    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }

    builder.build().map_err(HarnessError::Transport)
}

/// Merge default headers with per-call headers.
///
/// Later entries replace earlier ones of the same name, compared
/// case-insensitively, so a per-call header overrides a default.
pub fn merge_headers<'a, I>(headers: I) -> Result<HeaderMap>
where
    I: IntoIterator<Item = &'a (String, String)>,
{
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let name = HeaderName::try_from(name.as_str())
            .map_err(|e| HarnessError::invalid_header(format!("{name}: {e}")))?;
        let value = HeaderValue::try_from(value.as_str())
            .map_err(|e| HarnessError::invalid_header(format!("{name}: {e}")))?;
        map.insert(name, value);
    }
    Ok(map)
}
