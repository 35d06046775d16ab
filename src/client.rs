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

//! Pet Store API client.
//!
//! This module provides the main `PetStoreClient` struct, one method per
//! resource action for pets, orders and users.

use crate::config::HarnessConfig;
use crate::error::{HarnessError, Result};
use crate::request::{repeated_key_query, ApiRequest};
use crate::response::ApiResponse;
use crate::session::SessionState;
use crate::transport::{build_http_client, merge_headers};
use crate::types::{Credentials, Order, Pagination, Pet, User};

/// Route paths of the Pet Store API.
pub mod routes {
    /// Pet collection.
    pub const PETS: &str = "/pets";
    /// Status filter.
    pub const PETS_BY_STATUS: &str = "/pets/findByStatus";
    /// Tag filter.
    pub const PETS_BY_TAGS: &str = "/pets/findByTags";
    /// Order collection.
    pub const ORDERS: &str = "/orders";
    /// User collection.
    pub const USERS: &str = "/users";
    /// Login.
    pub const LOGIN: &str = "/users/login";

    /// `/pets/{id}`
    pub fn pet(id: i64) -> String {
        format!("{}/{}", PETS, id)
    }

    /// `/orders/{id}`
    pub fn order(id: i64) -> String {
        format!("{}/{}", ORDERS, id)
    }

    /// `/users/{userName}`
    pub fn user(user_name: &str) -> String {
        format!("{}/{}", USERS, user_name)
    }
}

/// Query key for the status filter.
const STATUS_KEY: &str = "status";

/// Query key for the tag filter.
const TAGS_KEY: &str = "tags";

/// Authenticated client for the Pet Store API.
///
/// Every operation returns the raw [`ApiResponse`] whatever its status;
/// only transport failures are errors. A token found in the `Authorization`
/// header of any response is kept and sent with every later request from
/// this instance, until another response replaces it.
///
/// # Example
///
/// ```no_run
/// use petstore_harness::{Credentials, HarnessConfig, PetStoreClient};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = HarnessConfig::builder()
///     .base_url("http://localhost:8080")?
///     .build()?;
///
/// let client = PetStoreClient::new(config)?;
///
/// let login = client
///     .login_user(&Credentials::new("jwick200", "wickofyourwit"))
///     .await?;
/// assert_eq!(login.status_code(), 200);
///
/// // Authenticated with the token from the login response.
/// let pets = client.list_pets(Default::default()).await?;
/// println!("{}", pets.text());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct PetStoreClient {
    config: HarnessConfig,
    http: reqwest::Client,
    session: SessionState,
}

impl PetStoreClient {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP transport cannot be built.
    pub fn new(config: HarnessConfig) -> Result<Self> {
        let http = build_http_client(&config)?;

        Ok(Self {
            config,
            http,
            session: SessionState::new(),
        })
    }

    /// Get the client configuration.
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Session state shared by all requests of this client.
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Current bearer token.
    pub fn token(&self) -> Option<String> {
        self.session.read()
    }

    /// Send one request and receive its response.
    ///
    /// Headers are the configured defaults, overridden by the request's own
    /// headers, with `Authorization` taken from the session. The session is
    /// updated from the response before it is returned.
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let mut url = self.config.build_url(request.path());
        request.query().apply(&mut url);

        let headers = merge_headers(
            self.config
                .default_headers
                .iter()
                .chain(request.headers().iter()),
        )?;
        let headers = self.session.decorate(headers);

        tracing::debug!("{} {}", request.method(), url);

        let mut builder = self
            .http
            .request(request.method().clone(), url)
            .headers(headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let response = ApiResponse::receive(response).await?;

        tracing::debug!(status = response.status_code(), "response received");
        self.session.update(response.headers());

        Ok(response)
    }

    // =========================================================================
    // Pets
    // =========================================================================

    /// Create a pet (`POST /pets`).
    pub async fn create_pet(&self, pet: &Pet) -> Result<ApiResponse> {
        self.send(ApiRequest::post(routes::PETS).json(pet)?).await
    }

    /// Replace a pet (`PUT /pets/{id}`). The pet must carry its `id`.
    pub async fn update_pet(&self, pet: &Pet) -> Result<ApiResponse> {
        let id = pet.id.ok_or(HarnessError::MissingField("id"))?;
        self.send(ApiRequest::put(routes::pet(id)).json(pet)?).await
    }

    /// Fetch a pet (`GET /pets/{id}`).
    pub async fn get_pet(&self, pet_id: i64) -> Result<ApiResponse> {
        self.send(ApiRequest::get(routes::pet(pet_id))).await
    }

    /// List pets (`GET /pets?pageSize=&offset=`).
    pub async fn list_pets(&self, page: Pagination) -> Result<ApiResponse> {
        self.send(ApiRequest::get(routes::PETS).params(page.to_params()))
            .await
    }

    /// Pets whose status is any of `statuses`
    /// (`GET /pets/findByStatus?status=a&status=b`).
    pub async fn find_pets_by_status<I, S>(&self, statuses: I) -> Result<ApiResponse>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let query = repeated_key_query(STATUS_KEY, statuses);
        self.send(ApiRequest::get(routes::PETS_BY_STATUS).encoded_query(query))
            .await
    }

    /// Pets matching any of `tags` (`GET /pets/findByTags?tags=a&tags=b`).
    ///
    /// The server matches by substring against the comma-joined tag list of
    /// each pet, so a value such as `"o,b"` matches a pet tagged `foo` and
    /// `bar`, and `""` matches every pet. Values are sent exactly as given.
    pub async fn find_pets_by_tags<I, S>(&self, tags: I) -> Result<ApiResponse>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let query = repeated_key_query(TAGS_KEY, tags);
        self.send(ApiRequest::get(routes::PETS_BY_TAGS).encoded_query(query))
            .await
    }

    /// Delete a pet (`DELETE /pets/{id}`).
    pub async fn delete_pet(&self, pet_id: i64) -> Result<ApiResponse> {
        self.send(ApiRequest::delete(routes::pet(pet_id))).await
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Place an order (`POST /orders`).
    pub async fn place_order(&self, order: &Order) -> Result<ApiResponse> {
        self.send(ApiRequest::post(routes::ORDERS).json(order)?).await
    }

    /// Fetch an order (`GET /orders/{id}`).
    pub async fn get_order(&self, order_id: i64) -> Result<ApiResponse> {
        self.send(ApiRequest::get(routes::order(order_id))).await
    }

    /// Delete an order (`DELETE /orders/{id}`).
    pub async fn delete_order(&self, order_id: i64) -> Result<ApiResponse> {
        self.send(ApiRequest::delete(routes::order(order_id))).await
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Sign up a new user (`POST /users`).
    pub async fn signup_user(&self, user: &User) -> Result<ApiResponse> {
        self.send(ApiRequest::post(routes::USERS).json(user)?).await
    }

    /// Log in (`POST /users/login`).
    ///
    /// On success the server's `Authorization` response header becomes this
    /// client's identity.
    pub async fn login_user(&self, credentials: &Credentials) -> Result<ApiResponse> {
        self.send(ApiRequest::post(routes::LOGIN).json(credentials)?)
            .await
    }

    /// Replace a user (`PUT /users/{userName}`). The user must carry `userName`.
    pub async fn update_user(&self, user: &User) -> Result<ApiResponse> {
        let user_name = user
            .user_name
            .as_deref()
            .ok_or(HarnessError::MissingField("userName"))?;
        self.send(ApiRequest::put(routes::user(user_name)).json(user)?)
            .await
    }

    /// List users (`GET /users`).
    pub async fn list_users(&self, page: Pagination) -> Result<ApiResponse> {
        self.send(ApiRequest::get(routes::USERS).params(page.to_params()))
            .await
    }

    /// Fetch a user by login name (`GET /users/{userName}`).
    pub async fn find_user_by_name(&self, user_name: &str) -> Result<ApiResponse> {
        self.send(ApiRequest::get(routes::user(user_name))).await
    }

    /// Delete a user by login name (`DELETE /users/{userName}`).
    pub async fn delete_user_by_username(&self, user_name: &str) -> Result<ApiResponse> {
        self.send(ApiRequest::delete(routes::user(user_name))).await
    }
}
