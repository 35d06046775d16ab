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


//! # petstore-harness
//!
//! An authenticated API test client and fixture lifecycle for end-to-end
//! functional tests against the Pet Store REST API (pets, orders, users).
//!
//! ## Features
//!
//! - **Status-transparent client**: one method per resource action, each
//!   returning the raw response; only transport failures are errors
//! - **Bearer token capture**: an `Authorization` response header becomes
//!   the identity of every later request from the same client
//! - **Actors with roles**: sign up, log in and re-authenticate test users to
//!   switch identity mid-test
//! - **Repeated-key filters**: `status=a&status=b` and `tags=...` queries
//!   that keep every value, in order, empty strings included
//! - **Scoped teardown**: cleanup actions run newest-first at scope exit,
//!   even when the test body panics
//!
//! ## Quick Start
//!
//! ```no_run
//! use petstore_harness::{Harness, HarnessConfig, Order, Pet, Role};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let harness = Harness::new(HarnessConfig::from_env()?)?;
//!
//!     harness
//!         .run_test(|scope| async move {
//!             scope.actor(Role::Admin).await?;
//!             let pet = scope.pet(&Pet::new("Harry").with_category("Cat")).await?;
//!
//!             scope.actor(Role::Customer).await?;
//!             let placed = scope
//!                 .client()
//!                 .place_order(&Order::placed(pet.id.unwrap_or_default()))
//!                 .await?;
//!             assert_eq!(placed.status_code(), 200);
//!             Ok::<_, petstore_harness::HarnessError>(())
//!         })
//!         .await?;
//!
//!     harness.finish().await;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod actor;
pub mod client;
pub mod config;
pub mod error;
pub mod fixture;
pub mod logging;
pub mod request;
pub mod response;
pub mod session;
pub mod transport;
pub mod types;

// Re-export main types at crate root for convenience
pub use actor::{Actor, ActorProfile, ActorSpec, ActorState, DeleteActor};
pub use client::PetStoreClient;
pub use config::{HarnessConfig, HarnessConfigBuilder};
pub use error::{HarnessError, Result};
pub use fixture::{
    DeleteOrder, DeletePet, FixtureScope, Harness, Lifetime, Owner, Teardown, TeardownReport,
    TeardownStack,
};
pub use request::{repeated_key_query, ApiRequest, Query};
pub use response::{ApiResponse, StatusClass};
pub use session::SessionState;
pub use types::{Credentials, Order, Pagination, Pet, Role, User};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// User-Agent string for HTTP requests.
pub const USER_AGENT: &str = concat!("petstore-harness/", env!("CARGO_PKG_VERSION"));
