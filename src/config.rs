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

//! Configuration types for the Pet Store harness.
//!
//! The endpoint configuration is immutable for the life of a client. It can
//! be built programmatically, parsed from a TOML document, or assembled from
//! the environment:
//!
//! ```toml
//! [petstore]
//! base_url = "http://localhost:8080"
//! timeout_secs = 10
//! username_prefix = "ft"
//!
//! [petstore.headers]
//! X-Test-Run = "nightly"
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::error::{HarnessError, Result};

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Default `Accept` header value.
pub const DEFAULT_ACCEPT: &str = "application/json, text/plain";

/// Default `Content-Type` header value.
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// Environment variable naming a TOML configuration file.
pub const ENV_CONFIG_PATH: &str = "PETSTORE_CONFIG";

/// Environment variable overriding the base URL.
pub const ENV_BASE_URL: &str = "PETSTORE_BASE_URL";

/// Environment variable overriding the request timeout, in seconds.
pub const ENV_TIMEOUT_SECS: &str = "PETSTORE_TIMEOUT_SECS";

const DEFAULT_USERNAME_PREFIX: &str = "ft";
const DEFAULT_ACTOR_PASSWORD: &str = "wickofyourwit";

/// Configuration for a Pet Store client.
#[derive(Clone)]
pub struct HarnessConfig {
    /// Server base URL (e.g., "http://localhost:8080").
    pub base_url: Url,

    /// Request timeout.
    ///
    /// `None` leaves the transport's own behaviour in place.
    pub timeout: Option<Duration>,

    /// Headers sent on every request unless a call overrides them.
    pub default_headers: Vec<(String, String)>,

    /// Prefix for generated actor usernames.
    pub username_prefix: String,

    /// Password given to every generated actor.
    pub actor_password: String,
}

impl std::fmt::Debug for HarnessConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HarnessConfig")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("default_headers", &self.default_headers)
            .field("username_prefix", &self.username_prefix)
            .finish()
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("valid default URL"),
            timeout: None,
            default_headers: default_headers(),
            username_prefix: DEFAULT_USERNAME_PREFIX.to_string(),
            actor_password: DEFAULT_ACTOR_PASSWORD.to_string(),
        }
    }
}

fn default_headers() -> Vec<(String, String)> {
    vec![
        ("Accept".to_string(), DEFAULT_ACCEPT.to_string()),
        ("Content-Type".to_string(), DEFAULT_CONTENT_TYPE.to_string()),
    ]
}

impl HarnessConfig {
    /// Create a new configuration builder.
    pub fn builder() -> HarnessConfigBuilder {
        HarnessConfigBuilder::new()
    }

    /// Build the URL for a route path.
    ///
    /// The path is appended to whatever path the base URL already carries,
    /// so `http://host/api` + `/pets` yields `http://host/api/pets`.
    pub fn build_url(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        let base_path = self.base_url.path().trim_end_matches('/');
        let path = if path.starts_with('/') {
            format!("{}{}", base_path, path)
        } else {
            format!("{}/{}", base_path, path)
        };

        url.set_path(&path);
        url.set_query(None);
        url
    }

    /// Parse a configuration from a TOML document with a `[petstore]` table.
    ///
    /// Missing keys fall back to the defaults.
    pub fn from_toml(content: &str) -> Result<Self> {
        let file: ConfigFile =
            toml::from_str(content).map_err(|e| HarnessError::config(e.to_string()))?;
        let section = file.petstore.unwrap_or_default();

        let mut builder = Self::builder();
        if let Some(url) = section.base_url {
            builder = builder.base_url(url)?;
        }
        if let Some(secs) = section.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(prefix) = section.username_prefix {
            builder = builder.username_prefix(prefix);
        }
        if let Some(password) = section.actor_password {
            builder = builder.actor_password(password);
        }
        for (name, value) in section.headers {
            builder = builder.header(name, value);
        }

        builder.build()
    }

    /// Load a configuration file from disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            HarnessError::config(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Assemble a configuration from the environment.
    ///
    /// `PETSTORE_CONFIG` names an optional TOML file used as the starting
    /// point; `PETSTORE_BASE_URL` and `PETSTORE_TIMEOUT_SECS` override it.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup(ENV_CONFIG_PATH) {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Some(url) = lookup(ENV_BASE_URL) {
            config.base_url = checked_base_url(Url::parse(&url)?)?;
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                HarnessError::config(format!("{ENV_TIMEOUT_SECS} is not a number: {secs}"))
            })?;
            config.timeout = Some(Duration::from_secs(secs));
        }

        Ok(config)
    }
}

/// Builder for [`HarnessConfig`].
#[derive(Default)]
pub struct HarnessConfigBuilder {
    base_url: Option<Url>,
    timeout: Option<Duration>,
    headers: Vec<(String, String)>,
    username_prefix: Option<String>,
    actor_password: Option<String>,
}

impl HarnessConfigBuilder {
    /// Create a new configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the server base URL.
    pub fn base_url(mut self, url: impl AsRef<str>) -> std::result::Result<Self, url::ParseError> {
        self.base_url = Some(Url::parse(url.as_ref())?);
        Ok(self)
    }

    /// Set the server base URL from a pre-parsed URL.
    pub fn base_url_parsed(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Add a default header, replacing a default of the same name.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set the prefix for generated actor usernames.
    pub fn username_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.username_prefix = Some(prefix.into());
        self
    }

    /// Set the password given to generated actors.
    pub fn actor_password(mut self, password: impl Into<String>) -> Self {
        self.actor_password = Some(password.into());
        self
    }

    /// Build the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot carry a path (e.g. `mailto:`).
    pub fn build(self) -> Result<HarnessConfig> {
        let defaults = HarnessConfig::default();
        let base_url = checked_base_url(self.base_url.unwrap_or(defaults.base_url))?;

        let mut default_headers = defaults.default_headers;
        for (name, value) in self.headers {
            default_headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(&name));
            default_headers.push((name, value));
        }

        Ok(HarnessConfig {
            base_url,
            timeout: self.timeout,
            default_headers,
            username_prefix: self.username_prefix.unwrap_or(defaults.username_prefix),
            actor_password: self.actor_password.unwrap_or(defaults.actor_password),
        })
    }
}

fn checked_base_url(url: Url) -> Result<Url> {
    if url.cannot_be_a_base() {
        return Err(HarnessError::config(format!(
            "{url} cannot be used as a base URL"
        )));
    }
    Ok(url)
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    petstore: Option<ConfigSection>,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigSection {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
    username_prefix: Option<String>,
    actor_password: Option<String>,
    #[serde(default)]
    headers: BTreeMap<String, String>,
}
