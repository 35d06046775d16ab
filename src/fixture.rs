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

//! Fixture scopes and deferred cleanup.
//!
//! A [`Harness`] owns one long-lived client for the whole run plus a
//! run-scoped [`FixtureScope`]. Each test gets its own scope through
//! [`Harness::run_test`]. Every fixture that creates server-side state
//! (actors, pets, orders) pushes a [`Teardown`] onto its scope's
//! [`TeardownStack`]; the stack is unwound newest-first when the scope ends,
//! including when the test body panics.
//!
//! # Example
//!
//! ```no_run
//! use petstore_harness::{Harness, HarnessConfig, Pet, Role};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let harness = Harness::new(HarnessConfig::default())?;
//!
//! harness
//!     .run_test(|scope| async move {
//!         let admin = scope.actor(Role::Admin).await?;
//!         let pet = scope.pet(&Pet::new("Harry")).await?;
//!
//!         let customer = scope.actor(Role::Customer).await?;
//!         let denied = scope.client().delete_pet(pet.id.unwrap()).await?;
//!         assert_eq!(denied.status_code(), 401);
//!
//!         admin.reauthenticate().await?;
//!         let _ = customer;
//!         Ok::<_, petstore_harness::HarnessError>(())
//!     })
//!     .await?;
//!
//! harness.finish().await;
//! # Ok(())
//! # }
//! ```

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use futures::FutureExt;

use crate::actor::{Actor, ActorSpec};
use crate::client::PetStoreClient;
use crate::config::HarnessConfig;
use crate::error::{HarnessError, Result};
use crate::response::{ApiResponse, StatusClass};
use crate::types::{Order, Pet, Role};

/// How long a fixture lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifetime {
    /// Created once, torn down by [`Harness::finish`].
    Run,
    /// Created per test, torn down when the test ends.
    Test,
}

/// A deferred cleanup action.
#[async_trait]
pub trait Teardown: Send + Sync {
    /// Short description for logs.
    fn describe(&self) -> String;

    /// Undo the server-side effect.
    async fn run(&self, client: &PetStoreClient) -> Result<()>;
}

/// Token of the identity that created a fixture.
#[derive(Clone, Default)]
pub struct Owner(Option<String>);

impl Owner {
    /// Whoever `client` is logged in as right now.
    pub fn current(client: &PetStoreClient) -> Self {
        Self(client.token())
    }

    /// No recorded identity; cleanup uses the client as it is.
    pub fn none() -> Self {
        Self(None)
    }
}

impl std::fmt::Debug for Owner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Owner").field(&self.0.is_some()).finish()
    }
}

/// Send a delete with the current identity; if refused, again as `owner`.
async fn delete_as_owner<F, Fut>(client: &PetStoreClient, owner: &Owner, send: F) -> Result<()>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<ApiResponse>>,
{
    let mut response = send().await?;

    if let (StatusClass::Unauthorized, Some(token)) = (response.class(), owner.0.as_deref()) {
        tracing::debug!("delete refused, retrying as the fixture owner");
        client.session().replace(token);
        response = send().await?;
    }

    response.error_for_status()?;
    Ok(())
}

/// Deletes a pet.
#[derive(Debug, Clone)]
pub struct DeletePet {
    /// Pet identifier.
    pub id: i64,
    /// Identity that created the pet.
    pub owner: Owner,
}

impl DeletePet {
    /// Delete pet `id` with whatever identity the client has at teardown.
    pub fn new(id: i64) -> Self {
        Self {
            id,
            owner: Owner::none(),
        }
    }

    /// Fall back to `owner` if the client's identity at teardown is refused.
    pub fn owned_by(mut self, owner: Owner) -> Self {
        self.owner = owner;
        self
    }
}

#[async_trait]
impl Teardown for DeletePet {
    fn describe(&self) -> String {
        format!("delete pet {}", self.id)
    }

    async fn run(&self, client: &PetStoreClient) -> Result<()> {
        delete_as_owner(client, &self.owner, move || client.delete_pet(self.id)).await
    }
}

/// Deletes an order.
#[derive(Debug, Clone)]
pub struct DeleteOrder {
    /// Order identifier.
    pub id: i64,
    /// Identity that placed the order.
    pub owner: Owner,
}

impl DeleteOrder {
    /// Delete order `id` with whatever identity the client has at teardown.
    pub fn new(id: i64) -> Self {
        Self {
            id,
            owner: Owner::none(),
        }
    }

    /// Fall back to `owner` if the client's identity at teardown is refused.
    pub fn owned_by(mut self, owner: Owner) -> Self {
        self.owner = owner;
        self
    }
}

#[async_trait]
impl Teardown for DeleteOrder {
    fn describe(&self) -> String {
        format!("delete order {}", self.id)
    }

    async fn run(&self, client: &PetStoreClient) -> Result<()> {
        delete_as_owner(client, &self.owner, move || client.delete_order(self.id)).await
    }
}

/// A teardown that failed.
#[derive(Debug)]
pub struct TeardownFailure {
    /// What the action was.
    pub action: String,
    /// Why it failed.
    pub error: HarnessError,
}

/// Outcome of unwinding a [`TeardownStack`].
#[derive(Debug, Default)]
pub struct TeardownReport {
    /// Actions that succeeded, in execution order.
    pub completed: Vec<String>,
    /// Actions that failed, in execution order.
    pub failures: Vec<TeardownFailure>,
}

impl TeardownReport {
    /// True if every action succeeded.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of actions executed.
    pub fn executed(&self) -> usize {
        self.completed.len() + self.failures.len()
    }

    /// Write failures as warnings.
    pub fn log(&self) {
        for failure in &self.failures {
            tracing::warn!(action = %failure.action, error = %failure.error, "teardown failed");
        }
        tracing::debug!(
            completed = self.completed.len(),
            failed = self.failures.len(),
            "teardown finished"
        );
    }
}

/// LIFO stack of cleanup actions.
#[derive(Default)]
pub struct TeardownStack {
    actions: Mutex<Vec<Box<dyn Teardown>>>,
}

impl std::fmt::Debug for TeardownStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TeardownStack")
            .field("pending", &self.len())
            .finish()
    }
}

impl TeardownStack {
    /// Create an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    fn actions(&self) -> MutexGuard<'_, Vec<Box<dyn Teardown>>> {
        self.actions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register an action; it runs before everything registered earlier.
    pub fn push(&self, action: impl Teardown + 'static) {
        self.push_boxed(Box::new(action));
    }

    /// Register a boxed action.
    pub fn push_boxed(&self, action: Box<dyn Teardown>) {
        tracing::debug!(action = %action.describe(), "teardown registered");
        self.actions().push(action);
    }

    /// Number of pending actions.
    pub fn len(&self) -> usize {
        self.actions().len()
    }

    /// True if nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run every pending action once, newest first.
    ///
    /// Failures are collected, never raised. Actions registered while
    /// unwinding run as well.
    pub async fn unwind(&self, client: &PetStoreClient) -> TeardownReport {
        let mut report = TeardownReport::default();

        loop {
            let Some(action) = self.actions().pop() else {
                break;
            };

            let description = action.describe();
            match action.run(client).await {
                Ok(()) => report.completed.push(description),
                Err(error) => report.failures.push(TeardownFailure {
                    action: description,
                    error,
                }),
            }
        }

        report
    }
}

struct ScopeInner {
    lifetime: Lifetime,
    client: Arc<PetStoreClient>,
    teardown: TeardownStack,
}

/// A fixture scope: a client plus the cleanup owed when the scope ends.
///
/// Cloning is cheap and every clone shares the same stack.
#[derive(Clone)]
pub struct FixtureScope {
    inner: Arc<ScopeInner>,
}

impl std::fmt::Debug for FixtureScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixtureScope")
            .field("lifetime", &self.inner.lifetime)
            .field("teardown", &self.inner.teardown)
            .finish()
    }
}

impl FixtureScope {
    /// Open a scope on `client`.
    pub fn new(lifetime: Lifetime, client: Arc<PetStoreClient>) -> Self {
        Self {
            inner: Arc::new(ScopeInner {
                lifetime,
                client,
                teardown: TeardownStack::new(),
            }),
        }
    }

    /// Lifetime of this scope.
    pub fn lifetime(&self) -> Lifetime {
        self.inner.lifetime
    }

    /// The scope's client.
    pub fn client(&self) -> &PetStoreClient {
        &self.inner.client
    }

    /// Shared handle on the scope's client.
    pub fn client_handle(&self) -> Arc<PetStoreClient> {
        Arc::clone(&self.inner.client)
    }

    /// Cleanup registered on this scope.
    pub fn teardown_stack(&self) -> &TeardownStack {
        &self.inner.teardown
    }

    /// Register a cleanup action.
    pub fn defer(&self, action: impl Teardown + 'static) {
        self.inner.teardown.push(action);
    }

    /// Sign up and log in a fresh actor with a generated username.
    ///
    /// The client is authenticated as this actor on return.
    pub async fn actor(&self, role: Role) -> Result<Actor> {
        let spec = ActorSpec::generated(role, self.client().config());
        self.actor_from(spec).await
    }

    /// Sign up and log in an actor from an explicit spec.
    pub async fn actor_from(&self, spec: ActorSpec) -> Result<Actor> {
        Actor::establish(self.client_handle(), spec, &self.inner.teardown).await
    }

    /// Create a pet and register its deletion. Returns the stored pet.
    ///
    /// The deletion falls back to the identity that created the pet.
    pub async fn pet(&self, pet: &Pet) -> Result<Pet> {
        let saved: Pet = self
            .client()
            .create_pet(pet)
            .await?
            .error_for_status()?
            .json()?;
        let id = saved.id.ok_or(HarnessError::MissingField("id"))?;

        self.defer(DeletePet::new(id).owned_by(Owner::current(self.client())));
        Ok(saved)
    }

    /// Place an order and register its deletion. Returns the stored order.
    ///
    /// The deletion falls back to the identity that placed the order.
    pub async fn order(&self, order: &Order) -> Result<Order> {
        let saved: Order = self
            .client()
            .place_order(order)
            .await?
            .error_for_status()?
            .json()?;
        let id = saved.id.ok_or(HarnessError::MissingField("id"))?;

        self.defer(DeleteOrder::new(id).owned_by(Owner::current(self.client())));
        Ok(saved)
    }

    /// Unwind this scope's cleanup.
    pub async fn teardown(&self) -> TeardownReport {
        let report = self.inner.teardown.unwind(&self.inner.client).await;
        report.log();
        report
    }
}

/// One test run: a long-lived client, a run scope, and per-test scopes.
#[derive(Debug)]
pub struct Harness {
    client: Arc<PetStoreClient>,
    run_scope: FixtureScope,
}

impl Harness {
    /// Build a harness and its client.
    pub fn new(config: HarnessConfig) -> Result<Self> {
        let client = Arc::new(PetStoreClient::new(config)?);
        let run_scope = FixtureScope::new(Lifetime::Run, Arc::clone(&client));
        Ok(Self { client, run_scope })
    }

    /// Build a harness from the environment (see [`HarnessConfig::from_env`]).
    pub fn from_env() -> Result<Self> {
        Self::new(HarnessConfig::from_env()?)
    }

    /// The run-wide client.
    pub fn client(&self) -> &PetStoreClient {
        &self.client
    }

    /// Fixtures living for the whole run.
    pub fn run_scope(&self) -> &FixtureScope {
        &self.run_scope
    }

    /// Open a fresh per-test scope on the run-wide client.
    pub fn test_scope(&self) -> FixtureScope {
        FixtureScope::new(Lifetime::Test, Arc::clone(&self.client))
    }

    /// Run a test body in its own scope.
    ///
    /// The scope is torn down after the body, whether it returned or
    /// panicked. Teardown failures are logged and never change the result:
    /// the body's value is returned, or its panic resumed.
    pub async fn run_test<F, Fut, T>(&self, body: F) -> T
    where
        F: FnOnce(FixtureScope) -> Fut,
        Fut: Future<Output = T>,
    {
        let scope = self.test_scope();
        let body_scope = scope.clone();

        let outcome = AssertUnwindSafe(async move { body(body_scope).await })
            .catch_unwind()
            .await;

        scope.teardown().await;

        match outcome {
            Ok(value) => value,
            Err(panic) => std::panic::resume_unwind(panic),
        }
    }

    /// Tear down run-scoped fixtures.
    pub async fn finish(&self) -> TeardownReport {
        self.run_scope.teardown().await
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        let pending = self.run_scope.teardown_stack().len();
        if pending > 0 {
            tracing::warn!(pending, "harness dropped with run-scoped teardown pending");
        }
    }
}
