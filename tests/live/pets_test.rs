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

//! Pet scenarios: tag filtering and role-gated mutations

use crate::live::{expect_status, harness, harry};
use petstore_harness::{HarnessError, Pagination, Pet, Result, Role};

#[tokio::test]
#[ignore = "requires a running Pet Store server"]
async fn test_get_and_list_pet() -> Result<()> {
    let harness = harness();

    harness
        .run_test(|scope| async move {
            scope.actor(Role::Admin).await?;
            let saved = scope.pet(&harry()).await?;

            let fetched: Pet = scope
                .client()
                .get_pet(saved.id.unwrap_or_default())
                .await?
                .error_for_status()?
                .json()?;
            assert_eq!(fetched.name.as_deref(), Some("Harry"));
            assert_eq!(fetched.category.as_deref(), Some("Cat"));
            assert_eq!(fetched.bio.as_deref(), Some("I am fuzzy"));
            assert_eq!(fetched.id, saved.id);

            let pets: Vec<Pet> = scope
                .client()
                .list_pets(Pagination::none())
                .await?
                .error_for_status()?
                .json()?;
            assert_eq!(pets.len(), 1);
            assert_eq!(pets[0].name.as_deref(), Some("Harry"));
            Ok::<_, HarnessError>(())
        })
        .await
}

#[tokio::test]
#[ignore = "requires a running Pet Store server"]
async fn test_find_pets_by_tags() -> Result<()> {
    let harness = harness();

    harness
        .run_test(|scope| async move {
            scope.actor(Role::Admin).await?;
            scope
                .pet(&Pet::new("Kermit").with_tags(["Green", "Amphibian", "Croaker"]))
                .await?;
            scope.pet(&harry().with_tags(["Fuzzy"])).await?;

            scope.actor(Role::Customer).await?;
            let client = scope.client();

            let matches: Vec<Pet> = client
                .find_pets_by_tags(["Amphibian"])
                .await?
                .error_for_status()?
                .json()?;
            assert_eq!(matches.len(), 1);
            assert_eq!(matches[0].name.as_deref(), Some("Kermit"));

            let all: Vec<Pet> = client.list_pets(Pagination::none()).await?.json()?;
            let every: Vec<Pet> = client.find_pets_by_tags([""]).await?.json()?;
            assert_eq!(every.len(), all.len());
            Ok::<_, HarnessError>(())
        })
        .await
}

#[tokio::test]
#[ignore = "requires a running Pet Store server"]
async fn test_only_admin_mutates_pets() -> Result<()> {
    let harness = harness();

    harness
        .run_test(|scope| async move {
            let admin = scope.actor(Role::Admin).await?;
            let mut pet = scope.pet(&harry()).await?;
            let id = pet.id.unwrap_or_default();

            scope.actor(Role::Customer).await?;
            pet.bio = Some("I am grumpy".to_string());
            let denied = scope.client().update_pet(&pet).await?;
            expect_status(denied.status_code(), 401, "customer updates pet")?;
            let denied = scope.client().delete_pet(id).await?;
            expect_status(denied.status_code(), 401, "customer deletes pet")?;

            admin.reauthenticate().await?;
            let allowed = scope.client().update_pet(&pet).await?;
            expect_status(allowed.status_code(), 200, "admin updates pet")?;

            let doomed = scope.client().create_pet(&Pet::new("Doomed")).await?;
            let doomed: Pet = doomed.error_for_status()?.json()?;
            let allowed = scope
                .client()
                .delete_pet(doomed.id.unwrap_or_default())
                .await?;
            expect_status(allowed.status_code(), 200, "admin deletes pet")
        })
        .await
}
