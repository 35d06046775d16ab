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

//! Fixture scope integration tests: teardown order, panics and run scope

use std::panic::AssertUnwindSafe;

use crate::integration::{authorization, MockPetStore, ADMIN_TOKEN, CUSTOMER_TOKEN};
use futures::FutureExt;
use petstore_harness::{
    ActorSpec, Credentials, FixtureScope, Harness, HarnessError, Lifetime, Order, Pet, Role,
};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

async fn mock_delete(mock: &MockPetStore, route: &str, status: u16) {
    Mock::given(method("DELETE"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status))
        .expect(1)
        .mount(mock.inner())
        .await;
}

fn harness(mock: &MockPetStore) -> Harness {
    Harness::new(mock.config()).expect("Harness creation failed")
}

#[tokio::test]
async fn test_actor_deleted_after_test_body_panics() {
    let mock = MockPetStore::start().await;
    mock.mock_actor("boss", 11, ADMIN_TOKEN).await;
    mock_delete(&mock, "/users/boss", 200).await;

    let harness = harness(&mock);
    let result = AssertUnwindSafe(harness.run_test(|scope| async move {
        scope
            .actor_from(ActorSpec::named(Role::Admin, "boss", "pw"))
            .await
            .unwrap();
        panic!("assertion failed in test body");
    }))
    .catch_unwind()
    .await;

    assert!(result.is_err());
    assert_eq!(
        mock.request_lines().await.last().map(String::as_str),
        Some("DELETE /users/boss")
    );
}

#[tokio::test]
async fn test_teardown_runs_newest_first() {
    let mock = MockPetStore::start().await;
    mock.mock_actor("boss", 11, ADMIN_TOKEN).await;
    mock.mock_create_pet(42).await;
    mock_delete(&mock, "/pets/42", 200).await;
    mock_delete(&mock, "/users/boss", 200).await;

    let harness = harness(&mock);
    let pet = harness
        .run_test(|scope| async move {
            scope
                .actor_from(ActorSpec::named(Role::Admin, "boss", "pw"))
                .await?;
            scope.pet(&Pet::new("Harry").with_category("Cat")).await
        })
        .await
        .unwrap();

    assert_eq!(pet.id, Some(42));
    assert_eq!(pet.name.as_deref(), Some("Harry"));

    let lines = mock.request_lines().await;
    assert_eq!(
        lines[lines.len() - 2..],
        ["DELETE /pets/42", "DELETE /users/boss"]
    );
}

#[tokio::test]
async fn test_teardown_failure_keeps_test_result() {
    let mock = MockPetStore::start().await;
    mock.mock_actor("boss", 11, ADMIN_TOKEN).await;
    mock_delete(&mock, "/users/boss", 500).await;

    let harness = harness(&mock);
    let value = harness
        .run_test(|scope| async move {
            scope
                .actor_from(ActorSpec::named(Role::Admin, "boss", "pw"))
                .await
                .map(|actor| actor.id())
        })
        .await;

    assert_eq!(value.unwrap(), Some(11));
}

#[tokio::test]
async fn test_run_scope_torn_down_by_finish() {
    let mock = MockPetStore::start().await;
    mock.mock_actor("boss", 11, ADMIN_TOKEN).await;
    mock_delete(&mock, "/users/boss", 200).await;

    let harness = harness(&mock);
    harness
        .run_scope()
        .actor_from(ActorSpec::named(Role::Admin, "boss", "pw"))
        .await
        .unwrap();

    // A test in between leaves run fixtures alone.
    harness.run_test(|_scope| async {}).await;
    assert_eq!(harness.run_scope().teardown_stack().len(), 1);

    let report = harness.finish().await;
    assert!(report.is_clean());
    assert_eq!(report.completed, vec!["delete user boss"]);
    assert!(harness.run_scope().teardown_stack().is_empty());
}

#[tokio::test]
async fn test_order_fixture_registers_delete() {
    let mock = MockPetStore::start().await;
    Mock::given(method("POST"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 3,
            "petId": 42,
            "quantity": 1,
            "status": "placed",
            "complete": false
        })))
        .mount(mock.inner())
        .await;
    mock_delete(&mock, "/orders/3", 200).await;

    let harness = harness(&mock);
    let scope = harness.test_scope();
    let order = scope.order(&Order::placed(42)).await.unwrap();
    assert_eq!(order.id, Some(3));
    assert_eq!(order.pet_id, Some(42));

    let report = scope.teardown().await;
    assert_eq!(report.completed, vec!["delete order 3"]);
}

#[tokio::test]
async fn test_rejected_pet_registers_nothing() {
    let mock = MockPetStore::start().await;
    Mock::given(method("POST"))
        .and(path("/pets"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(mock.inner())
        .await;

    let harness = harness(&mock);
    let scope = harness.test_scope();
    let err = scope.pet(&Pet::new("Harry")).await.unwrap_err();

    assert!(matches!(err, HarnessError::Unauthorized { status: 401, .. }));
    assert!(scope.teardown_stack().is_empty());
}

#[tokio::test]
async fn test_pet_deleted_as_its_creator_after_role_switch() {
    let mock = MockPetStore::start().await;
    mock.mock_actor("boss", 11, ADMIN_TOKEN).await;
    mock.mock_actor("shopper", 12, CUSTOMER_TOKEN).await;
    mock.mock_create_pet(42).await;
    mock.mock_admin_only("DELETE", "/pets/42").await;
    mock.mock_delete_user("boss", 200).await;
    mock.mock_delete_user("shopper", 200).await;

    let harness = harness(&mock);
    let scope = harness.test_scope();
    scope
        .actor_from(ActorSpec::named(Role::Admin, "boss", "pw"))
        .await
        .unwrap();
    scope.pet(&Pet::new("Harry")).await.unwrap();
    scope
        .actor_from(ActorSpec::named(Role::Customer, "shopper", "pw"))
        .await
        .unwrap();

    let report = scope.teardown().await;
    assert!(report.is_clean(), "teardown failed: {:?}", report.failures);
    assert_eq!(
        report.completed,
        vec!["delete user shopper", "delete pet 42", "delete user boss"]
    );

    let pet_deletes: Vec<_> = mock
        .requests()
        .await
        .iter()
        .filter(|r| r.method.as_str() == "DELETE" && r.url.path() == "/pets/42")
        .map(authorization)
        .collect();
    assert_eq!(
        pet_deletes,
        vec![Some(CUSTOMER_TOKEN.to_string()), Some(ADMIN_TOKEN.to_string())]
    );
}

#[tokio::test]
async fn test_order_deleted_as_its_creator_after_role_switch() {
    let mock = MockPetStore::start().await;
    mock.mock_actor("shopper", 12, CUSTOMER_TOKEN).await;
    mock.mock_actor("boss", 11, ADMIN_TOKEN).await;
    Mock::given(method("POST"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 3, "petId": 42 })))
        .mount(mock.inner())
        .await;
    // Only the buyer may cancel this order.
    Mock::given(method("DELETE"))
        .and(path("/orders/3"))
        .and(header("Authorization", CUSTOMER_TOKEN))
        .respond_with(ResponseTemplate::new(200))
        .with_priority(1)
        .expect(1)
        .mount(mock.inner())
        .await;
    Mock::given(method("DELETE"))
        .and(path("/orders/3"))
        .respond_with(ResponseTemplate::new(403))
        .with_priority(10)
        .mount(mock.inner())
        .await;
    mock.mock_delete_user("shopper", 200).await;

    let client = mock.shared_client();
    let scope = FixtureScope::new(Lifetime::Test, client.clone());
    scope
        .actor_from(ActorSpec::named(Role::Customer, "shopper", "pw"))
        .await
        .unwrap();
    scope.order(&Order::placed(42)).await.unwrap();
    client
        .login_user(&Credentials::new("boss", "pw"))
        .await
        .unwrap();

    let report = scope.teardown().await;
    assert!(report.is_clean(), "teardown failed: {:?}", report.failures);
    assert_eq!(report.completed, vec!["delete order 3", "delete user shopper"]);
}
