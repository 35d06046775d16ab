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

//! Outbound request description.
//!
//! An [`ApiRequest`] names a method, a route path, query parameters, an
//! optional JSON body and per-call headers. The client resolves it against
//! the configured base URL. Query parameters come in two shapes:
//!
//! - [`Query::Params`], a list of key/value pairs (pagination), and
//! - [`Query::Encoded`], a pre-rendered string such as the one produced by
//!   [`repeated_key_query`] for multi-value filters.
//!
//! Neither shape merges repeated keys.

use reqwest::Method;
use serde::Serialize;
use url::form_urlencoded;
use url::Url;

use crate::error::Result;

/// Query parameters attached to a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Query {
    /// No query string.
    #[default]
    None,
    /// Key/value pairs, appended in order.
    Params(Vec<(String, String)>),
    /// A query string that is already encoded, without the leading `?`.
    Encoded(String),
}

impl Query {
    /// Render to an encoded query string, or `None` when there is nothing to send.
    pub fn render(&self) -> Option<String> {
        match self {
            Self::None => None,
            Self::Params(pairs) if pairs.is_empty() => None,
            Self::Params(pairs) => {
                let mut serializer = form_urlencoded::Serializer::new(String::new());
                for (key, value) in pairs {
                    serializer.append_pair(key, value);
                }
                Some(serializer.finish())
            }
            Self::Encoded(query) if query.is_empty() => None,
            Self::Encoded(query) => Some(query.clone()),
        }
    }

    /// Apply this query to a URL, replacing any existing query.
    pub fn apply(&self, url: &mut Url) {
        url.set_query(self.render().as_deref());
    }
}

/// Render `key=v1&key=v2&...`, one pair per value, in input order.
///
/// Values are form-encoded but otherwise passed through untouched; empty
/// strings produce `key=` and duplicates are kept.
pub fn repeated_key_query<I, S>(key: &str, values: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for value in values {
        serializer.append_pair(key, value.as_ref());
    }
    serializer.finish()
}

/// A single request against the Pet Store API.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) query: Query,
    pub(crate) body: Option<Vec<u8>>,
    pub(crate) headers: Vec<(String, String)>,
}

impl ApiRequest {
    /// Create a request with the given method and route path.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Query::None,
            body: None,
            headers: Vec::new(),
        }
    }

    /// `GET path`.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// `POST path`.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// `PUT path`.
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// `DELETE path`.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Serialize `body` as JSON and attach it.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        self.body = Some(serde_json::to_vec(body)?);
        Ok(self)
    }

    /// Attach query parameters as key/value pairs.
    pub fn params<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query = Query::Params(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    /// Attach a pre-encoded query string.
    pub fn encoded_query(mut self, query: impl Into<String>) -> Self {
        self.query = Query::Encoded(query.into());
        self
    }

    /// Add a per-call header. It overrides a default header of the same name.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Route path, without base URL or query.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Query parameters.
    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Serialized body, if any.
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// Per-call headers.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }
}
