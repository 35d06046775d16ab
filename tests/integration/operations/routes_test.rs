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


//! Integration tests for the route table

use crate::integration::MockPetStore;
use petstore_harness::{Credentials, Order, Pagination, Pet, User};
use wiremock::matchers::any;
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_every_operation_hits_its_route() {
    let mock = MockPetStore::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .mount(mock.inner())
        .await;

    let client = mock.client();
    let mut pet = Pet::new("Harry");
    pet.id = Some(4);
    let user = User::named("jwick200");

    client.create_pet(&pet).await.unwrap();
    client.update_pet(&pet).await.unwrap();
    client.get_pet(4).await.unwrap();
    client.list_pets(Pagination::none().page_size(5)).await.unwrap();
    client.find_pets_by_status(["Available"]).await.unwrap();
    client.find_pets_by_tags(["Green"]).await.unwrap();
    client.delete_pet(4).await.unwrap();
    client.place_order(&Order::placed(4)).await.unwrap();
    client.get_order(9).await.unwrap();
    client.delete_order(9).await.unwrap();
    client.signup_user(&user).await.unwrap();
    client
        .login_user(&Credentials::new("jwick200", "pw"))
        .await
        .unwrap();
    client.update_user(&user).await.unwrap();
    client.list_users(Pagination::none()).await.unwrap();
    client.find_user_by_name("jwick200").await.unwrap();
    client.delete_user_by_username("jwick200").await.unwrap();

    assert_eq!(
        mock.request_lines().await,
        vec![
            "POST /pets",
            "PUT /pets/4",
            "GET /pets/4",
            "GET /pets",
            "GET /pets/findByStatus",
            "GET /pets/findByTags",
            "DELETE /pets/4",
            "POST /orders",
            "GET /orders/9",
            "DELETE /orders/9",
            "POST /users",
            "POST /users/login",
            "PUT /users/jwick200",
            "GET /users",
            "GET /users/jwick200",
            "DELETE /users/jwick200",
        ]
    );
}

#[tokio::test]
async fn test_base_url_path_prefix_is_kept() {
    let mock = MockPetStore::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .mount(mock.inner())
        .await;

    let config = petstore_harness::HarnessConfig::builder()
        .base_url(format!("{}/api/", mock.url()))
        .expect("Valid URL")
        .build()
        .expect("Valid config");
    let client = petstore_harness::PetStoreClient::new(config).unwrap();

    client.get_pet(1).await.unwrap();
    assert_eq!(mock.request_lines().await, vec!["GET /api/pets/1"]);
}
