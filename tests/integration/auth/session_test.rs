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


//! Integration tests for bearer token capture and propagation

use crate::integration::{authorization, MockPetStore, ADMIN_TOKEN, CUSTOMER_TOKEN};
use petstore_harness::{ApiRequest, Credentials, Pagination};
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

async fn mock_pets(mock: &MockPetStore) {
    Mock::given(method("GET"))
        .and(path("/pets"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .mount(mock.inner())
        .await;
}

#[tokio::test]
async fn test_no_authorization_before_login() {
    let mock = MockPetStore::start().await;
    mock_pets(&mock).await;

    let client = mock.client();
    client.list_pets(Pagination::none()).await.unwrap();

    let requests = mock.requests().await;
    assert_eq!(authorization(&requests[0]), None);
    assert_eq!(client.token(), None);
}

#[tokio::test]
async fn test_login_token_sent_on_every_later_request() {
    let mock = MockPetStore::start().await;
    mock.mock_login("admin", ADMIN_TOKEN).await;
    mock_pets(&mock).await;

    let client = mock.client();
    client
        .login_user(&Credentials::new("admin", "pw"))
        .await
        .unwrap();
    assert_eq!(client.token().as_deref(), Some(ADMIN_TOKEN));

    for _ in 0..3 {
        client.list_pets(Pagination::none()).await.unwrap();
    }

    let requests = mock.requests().await;
    assert_eq!(requests.len(), 4);
    for request in &requests[1..] {
        assert_eq!(authorization(request).as_deref(), Some(ADMIN_TOKEN));
    }
}

#[tokio::test]
async fn test_response_without_header_keeps_token() {
    let mock = MockPetStore::start().await;
    mock.mock_login("admin", ADMIN_TOKEN).await;
    mock_pets(&mock).await;

    let client = mock.client();
    client
        .login_user(&Credentials::new("admin", "pw"))
        .await
        .unwrap();
    client.list_pets(Pagination::none()).await.unwrap();

    assert_eq!(client.token().as_deref(), Some(ADMIN_TOKEN));
}

#[tokio::test]
async fn test_later_login_overwrites_token() {
    let mock = MockPetStore::start().await;
    mock.mock_login("admin", ADMIN_TOKEN).await;
    mock.mock_login("customer", CUSTOMER_TOKEN).await;
    mock_pets(&mock).await;

    let client = mock.client();
    client
        .login_user(&Credentials::new("admin", "pw"))
        .await
        .unwrap();
    client
        .login_user(&Credentials::new("customer", "pw"))
        .await
        .unwrap();
    client.list_pets(Pagination::none()).await.unwrap();

    let requests = mock.requests().await;
    assert_eq!(authorization(&requests[1]).as_deref(), Some(ADMIN_TOKEN));
    assert_eq!(authorization(&requests[2]).as_deref(), Some(CUSTOMER_TOKEN));
}

#[tokio::test]
async fn test_clients_do_not_share_tokens() {
    let mock = MockPetStore::start().await;
    mock.mock_login("admin", ADMIN_TOKEN).await;
    mock_pets(&mock).await;

    let admin_client = mock.client();
    let anonymous_client = mock.client();
    admin_client
        .login_user(&Credentials::new("admin", "pw"))
        .await
        .unwrap();
    anonymous_client.list_pets(Pagination::none()).await.unwrap();

    let requests = mock.requests().await;
    assert_eq!(authorization(&requests[1]), None);
    assert_eq!(anonymous_client.token(), None);
}

#[tokio::test]
async fn test_session_overrides_caller_authorization() {
    let mock = MockPetStore::start().await;
    mock.mock_login("admin", ADMIN_TOKEN).await;
    mock_pets(&mock).await;

    let client = mock.client();
    client
        .login_user(&Credentials::new("admin", "pw"))
        .await
        .unwrap();
    client
        .send(ApiRequest::get("/pets").header("Authorization", "Bearer forged"))
        .await
        .unwrap();

    let requests = mock.requests().await;
    assert_eq!(authorization(&requests[1]).as_deref(), Some(ADMIN_TOKEN));
}

#[tokio::test]
async fn test_call_headers_override_defaults() {
    let mock = MockPetStore::start().await;
    mock_pets(&mock).await;

    mock.client()
        .send(ApiRequest::get("/pets").header("Accept", "text/plain"))
        .await
        .unwrap();

    let requests = mock.requests().await;
    assert_eq!(requests[0].headers.get("accept").unwrap(), "text/plain");
}
