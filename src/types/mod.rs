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


//! Pet Store resource payloads.
//!
//! Payloads are plain records: every field is optional and validation is
//! left to the server. Field names on the wire are camelCase exactly as the
//! server uses them (`userName`, `photoUrls`, `petId`, `shipDate`). Fields
//! this crate does not model are kept in `extra` and sent back unchanged.

mod order;
mod pet;
mod user;

pub use order::Order;
pub use pet::Pet;
pub use user::{Credentials, Role, User};

/// Pagination parameters for list endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pagination {
    /// Maximum number of records to return (`pageSize`).
    pub page_size: Option<u32>,
    /// Number of records to skip (`offset`).
    pub offset: Option<u32>,
}

impl Pagination {
    /// No pagination parameters.
    pub fn none() -> Self {
        Self::default()
    }

    /// Set the page size.
    pub fn page_size(mut self, size: u32) -> Self {
        self.page_size = Some(size);
        self
    }

    /// Set the offset.
    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Query pairs for the parameters that are set, `pageSize` first.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(size) = self.page_size {
            params.push(("pageSize".to_string(), size.to_string()));
        }
        if let Some(offset) = self.offset {
            params.push(("offset".to_string(), offset.to_string()));
        }
        params
    }
}
