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

//! Bearer token state for one client instance.
//!
//! The server hands out a token in the `Authorization` header of a login
//! response. [`SessionState`] keeps the most recent one and puts it back on
//! every outbound request. There is exactly one slot: a new login replaces
//! the previous token.

use std::sync::{Mutex, MutexGuard};

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};

/// The current bearer token of a client.
#[derive(Default)]
pub struct SessionState {
    token: Mutex<Option<String>>,
}

impl std::fmt::Debug for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionState")
            .field("token", &self.slot().is_some())
            .finish()
    }
}

impl SessionState {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> MutexGuard<'_, Option<String>> {
        // The slot is only ever replaced whole, so a poisoned lock still holds a valid value.
        self.token.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Current token, if a response has supplied one.
    pub fn read(&self) -> Option<String> {
        self.slot().clone()
    }

    /// Capture the token from response headers.
    ///
    /// Returns `true` when the headers carried an `Authorization` entry and
    /// the stored token was replaced. Without one the state is unchanged.
    pub fn update(&self, headers: &HeaderMap) -> bool {
        let Some(value) = headers.get(AUTHORIZATION) else {
            return false;
        };

        match value.to_str() {
            Ok(token) => {
                *self.slot() = Some(token.to_string());
                tracing::debug!("Captured authorization token from response");
                true
            }
            Err(_) => {
                tracing::warn!("Ignoring non-ASCII Authorization response header");
                false
            }
        }
    }

    /// Put the current token on outbound headers.
    ///
    /// Any caller-supplied `Authorization` value is replaced. With no token
    /// stored, the header is removed so the session stays the only source of
    /// identity.
    pub fn decorate(&self, mut headers: HeaderMap) -> HeaderMap {
        headers.remove(AUTHORIZATION);

        if let Some(token) = self.slot().as_deref() {
            match HeaderValue::from_str(token) {
                Ok(mut value) => {
                    value.set_sensitive(true);
                    headers.insert(AUTHORIZATION, value);
                }
                Err(_) => tracing::warn!("Stored token is not a valid header value"),
            }
        }

        headers
    }

    /// Store a token directly.
    ///
    /// Mostly useful for tests that need a known identity without a login.
    pub fn replace(&self, token: impl Into<String>) {
        *self.slot() = Some(token.into());
    }
}
