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

//! Test actors: users created for a test, with a role and a login.
//!
//! An actor moves through
//! `Unregistered -> SignedUp -> Authenticated -> (re-Authenticated)* -> Deleted`.
//! Signing up registers a [`DeleteActor`] teardown on the owning
//! [`TeardownStack`], so the user is removed when the scope ends whatever the
//! test outcome. [`Actor::reauthenticate`] logs in again with the stored
//! credentials, which is how a test switches identity on a shared client.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::client::PetStoreClient;
use crate::config::HarnessConfig;
use crate::error::{HarnessError, Result};
use crate::fixture::{Teardown, TeardownStack};
use crate::types::{Credentials, Role, User};

/// Lifecycle state of an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorState {
    /// Not yet known to the server.
    Unregistered,
    /// Signup accepted, not logged in yet.
    SignedUp,
    /// Logged in; the client carries this actor's token (until another login).
    Authenticated,
    /// Removed from the server by teardown.
    Deleted,
}

/// Profile fields every generated actor shares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorProfile {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone number.
    pub phone: String,
}

impl Default for ActorProfile {
    fn default() -> Self {
        Self {
            first_name: "John".to_string(),
            last_name: "Wick".to_string(),
            email: "wheresmycar@gmail.com".to_string(),
            phone: "215-789-0123".to_string(),
        }
    }
}

/// Everything needed to sign an actor up.
#[derive(Debug, Clone)]
pub struct ActorSpec {
    /// Role requested at signup.
    pub role: Role,
    /// Login name and password.
    pub credentials: Credentials,
    /// Fixed profile fields.
    pub profile: ActorProfile,
}

impl ActorSpec {
    /// An actor with a generated, unique username.
    pub fn generated(role: Role, config: &HarnessConfig) -> Self {
        Self {
            role,
            credentials: Credentials::new(
                generate_username(&config.username_prefix, role),
                config.actor_password.clone(),
            ),
            profile: ActorProfile::default(),
        }
    }

    /// An actor with a caller-chosen username.
    pub fn named(role: Role, user_name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            role,
            credentials: Credentials::new(user_name, password),
            profile: ActorProfile::default(),
        }
    }

    /// Replace the profile fields.
    pub fn with_profile(mut self, profile: ActorProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Signup payload.
    pub fn to_user(&self) -> User {
        User {
            user_name: Some(self.credentials.user_name.clone()),
            first_name: Some(self.profile.first_name.clone()),
            last_name: Some(self.profile.last_name.clone()),
            email: Some(self.profile.email.clone()),
            password: Some(self.credentials.password.clone()),
            phone: Some(self.profile.phone.clone()),
            role: Some(self.role),
            ..Default::default()
        }
    }
}

/// `<prefix>-<role>-<8 hex chars>`, lowercase.
pub fn generate_username(prefix: &str, role: Role) -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!(
        "{}-{}-{}",
        prefix,
        role.as_str().to_lowercase(),
        &suffix[..8]
    )
}

type SharedState = Arc<Mutex<ActorState>>;

fn lock(state: &SharedState) -> MutexGuard<'_, ActorState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A signed-up, logged-in test user.
///
/// Holds its own credentials and a handle on the client, so
/// [`reauthenticate`](Actor::reauthenticate) takes no arguments.
#[derive(Debug, Clone)]
pub struct Actor {
    client: Arc<PetStoreClient>,
    role: Role,
    credentials: Credentials,
    user: User,
    state: SharedState,
}

impl Actor {
    /// Sign up, register deletion, and log in.
    ///
    /// # Errors
    ///
    /// - [`HarnessError::Conflict`] if the username is taken. Nothing is
    ///   registered for teardown, since the existing user is not ours.
    /// - [`HarnessError::Status`] for any other rejected signup, whatever
    ///   its status.
    /// - [`HarnessError::Json`] if an accepted signup does not return a user
    ///   record.
    /// - [`HarnessError::Unauthorized`] if the login after signup is refused.
    ///
    /// The delete teardown is registered as soon as signup is accepted, so
    /// the last two still clean up.
    /// - [`HarnessError::Transport`] if the server cannot be reached.
    pub async fn establish(
        client: Arc<PetStoreClient>,
        spec: ActorSpec,
        teardown: &TeardownStack,
    ) -> Result<Self> {
        let user_name = spec.credentials.user_name.clone();
        let state: SharedState = Arc::new(Mutex::new(ActorState::Unregistered));

        let response = client.signup_user(&spec.to_user()).await?;
        if response.status() == StatusCode::CONFLICT {
            tracing::info!(user = %user_name, "signup conflict, username already in use");
            return Err(HarnessError::conflict(response.text()));
        }
        if !response.is_success() {
            return Err(HarnessError::status_error(
                response.status_code(),
                response.text(),
            ));
        }

        *lock(&state) = ActorState::SignedUp;
        teardown.push(DeleteActor::new(spec.credentials.clone(), state.clone()));
        tracing::info!(user = %user_name, role = %spec.role, "actor signed up");

        let user: User = response.json().map_err(|e| {
            tracing::warn!(user = %user_name, error = %e, "signup returned no user record");
            e
        })?;
        if user.id.is_none() {
            tracing::warn!(user = %user_name, "signup response carries no id");
        }

        let actor = Self {
            client,
            role: spec.role,
            credentials: spec.credentials,
            user,
            state,
        };
        actor.reauthenticate().await?;

        Ok(actor)
    }

    /// Log in again as this actor, making it the client's identity.
    ///
    /// Calling it repeatedly leaves the session as a single call would.
    pub async fn reauthenticate(&self) -> Result<()> {
        let response = self.client.login_user(&self.credentials).await?;
        if !response.is_success() {
            return Err(HarnessError::unauthorized(
                response.status_code(),
                response.text(),
            ));
        }

        *lock(&self.state) = ActorState::Authenticated;
        tracing::info!(user = %self.credentials.user_name, role = %self.role, "authenticated");
        Ok(())
    }

    /// Login name.
    pub fn user_name(&self) -> &str {
        &self.credentials.user_name
    }

    /// Role given at signup.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Login credentials.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// User record as returned by signup.
    pub fn user(&self) -> &User {
        &self.user
    }

    /// Server-assigned identifier, if signup returned one.
    pub fn id(&self) -> Option<i64> {
        self.user.id
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ActorState {
        *lock(&self.state)
    }

    /// The client this actor drives.
    pub fn client(&self) -> &PetStoreClient {
        &self.client
    }
}

/// Teardown action removing an actor's user.
///
/// Deletes with the client's current identity first. If that identity is
/// refused (401/403), logs in as the actor itself and deletes once more.
#[derive(Debug)]
pub struct DeleteActor {
    credentials: Credentials,
    state: SharedState,
}

impl DeleteActor {
    fn new(credentials: Credentials, state: SharedState) -> Self {
        Self { credentials, state }
    }
}

#[async_trait]
impl Teardown for DeleteActor {
    fn describe(&self) -> String {
        format!("delete user {}", self.credentials.user_name)
    }

    async fn run(&self, client: &PetStoreClient) -> Result<()> {
        let user_name = &self.credentials.user_name;
        let mut response = client.delete_user_by_username(user_name).await?;

        if matches!(
            response.status(),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            tracing::debug!(user = %user_name, "delete refused, retrying as the actor");
            client.login_user(&self.credentials).await?;
            response = client.delete_user_by_username(user_name).await?;
        }

        response.error_for_status()?;
        *lock(&self.state) = ActorState::Deleted;
        Ok(())
    }
}
