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

//! Error types for the Pet Store harness.
//!
//! The client itself is status-transparent: a non-2xx response is returned
//! as an [`ApiResponse`](crate::ApiResponse), not as an error. The
//! status-derived variants below are produced only when a caller opts in via
//! [`ApiResponse::error_for_status`](crate::ApiResponse::error_for_status),
//! or by the actor manager when signup or login cannot proceed.

use thiserror::Error;

/// Result type alias using [`HarnessError`].
pub type Result<T> = std::result::Result<T, HarnessError>;

/// Errors that can occur while driving the Pet Store API.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Connection, DNS, timeout or body read failure.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Server answered with a non-2xx status not covered by a narrower variant.
    #[error("Server returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, if any.
        message: String,
    },

    /// Server reported a conflict (HTTP 409), e.g. a username already in use.
    #[error("Conflict: {message}")]
    Conflict {
        /// Response body, if any.
        message: String,
    },

    /// Server could not find the addressed resource (HTTP 404).
    #[error("Not found: {message}")]
    NotFound {
        /// Response body, if any.
        message: String,
    },

    /// Server refused the current identity (HTTP 401 or 403).
    #[error("Unauthorized ({status}): {message}")]
    Unauthorized {
        /// HTTP status code.
        status: u16,
        /// Response body, if any.
        message: String,
    },

    /// Payload could not be serialized or a body could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// A header name or value could not be put on the wire.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// A payload lacks a field the route needs (e.g. `id` for an update).
    #[error("Payload is missing required field '{0}'")]
    MissingField(&'static str),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HarnessError {
    /// Create the error matching an HTTP status code.
    ///
    /// 409, 404 and 401/403 map onto their dedicated variants; every other
    /// code becomes [`HarnessError::Status`].
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            409 => Self::Conflict { message },
            404 => Self::NotFound { message },
            401 | 403 => Self::Unauthorized { status, message },
            _ => Self::Status { status, message },
        }
    }

    /// Create a generic status error.
    pub fn status_error(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Create a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create an unauthorized error.
    pub fn unauthorized(status: u16, message: impl Into<String>) -> Self {
        Self::Unauthorized {
            status,
            message: message.into(),
        }
    }

    /// Create an invalid header error.
    pub fn invalid_header(msg: impl Into<String>) -> Self {
        Self::InvalidHeader(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Returns the HTTP status code for status-derived errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } | Self::Unauthorized { status, .. } => Some(*status),
            Self::Conflict { .. } => Some(409),
            Self::NotFound { .. } => Some(404),
            _ => None,
        }
    }

    /// Returns true if the request never produced a response.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
