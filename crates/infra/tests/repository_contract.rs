//! Repository behaviour shared by every document backend.
//!
//! Each test runs the same scenario against the in-memory and the SQLite
//! store so the two stay interchangeable.

mod support;

use play_core::{Filter, Repository};
use play_domain::{InventoryItem, Item, PlayError};
use play_infra::database::{StoredDocument, UpdateMode};
use support::TestStore;
use uuid::Uuid;

#[tokio::test(flavor = "multi_thread")]
async fn created_entities_can_be_read_back() {
    for (backend, harness) in TestStore::all() {
        let items = harness.store.repository::<Item>("items").await.unwrap();
        let potion = Item::new("Potion", "Restores a small amount of HP", 5.0);

        items.create(potion.clone()).await.unwrap();

        assert_eq!(items.get(&potion.id).await.unwrap(), Some(potion.clone()), "{backend}");
        assert_eq!(items.get_all().await.unwrap(), vec![potion], "{backend}");
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn remove_deletes_and_is_idempotent() {
    for (backend, harness) in TestStore::all() {
        let items = harness.store.repository::<Item>("items").await.unwrap();
        let potion = Item::new("Potion", "Restores a small amount of HP", 5.0);
        items.create(potion.clone()).await.unwrap();

        items.remove(&potion.id).await.unwrap();
        assert_eq!(items.get(&potion.id).await.unwrap(), None, "{backend}");

        items.remove(&potion.id).await.unwrap();
        assert!(items.get_all().await.unwrap().is_empty(), "{backend}");
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn update_replaces_the_stored_entity() {
    for (backend, harness) in TestStore::all() {
        let items = harness.store.repository::<Item>("items").await.unwrap();
        let mut potion = Item::new("Potion", "Restores a small amount of HP", 5.0);
        items.create(potion.clone()).await.unwrap();

        potion.price = 7.5;
        potion.description = "Restores a medium amount of HP".into();
        items.update(potion.clone()).await.unwrap();

        assert_eq!(items.get(&potion.id).await.unwrap(), Some(potion), "{backend}");
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn update_of_missing_id_stores_nothing() {
    for (backend, harness) in TestStore::all() {
        let items = harness.store.repository::<Item>("items").await.unwrap();
        let ghost = Item::new("Ghost", "Never created", 1.0);

        items.update(ghost.clone()).await.unwrap();

        assert_eq!(items.get(&ghost.id).await.unwrap(), None, "{backend}");
        assert!(items.get_all().await.unwrap().is_empty(), "{backend}");
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn strict_update_of_missing_id_is_not_found() {
    for (backend, harness) in TestStore::all() {
        let items = harness
            .store
            .repository::<Item>("items")
            .await
            .unwrap()
            .with_update_mode(UpdateMode::Strict);

        let err = items.update(Item::new("Ghost", "Never created", 1.0)).await.unwrap_err();

        assert!(matches!(err, PlayError::NotFound(_)), "{backend}: {err:?}");
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn absent_entities_are_rejected() {
    for (backend, harness) in TestStore::all() {
        let items = harness.store.repository::<Item>("items").await.unwrap();
        let mut nameless = Item::new("Nameless", "Has no id", 1.0);
        nameless.id = Uuid::nil();

        let create = items.create(nameless.clone()).await.unwrap_err();
        let update = items.update(nameless).await.unwrap_err();

        assert!(matches!(create, PlayError::Validation(_)), "{backend}: {create:?}");
        assert!(matches!(update, PlayError::Validation(_)), "{backend}: {update:?}");
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn duplicate_ids_are_persistence_errors() {
    for (backend, harness) in TestStore::all() {
        let items = harness.store.repository::<Item>("items").await.unwrap();
        let potion = Item::new("Potion", "Restores a small amount of HP", 5.0);
        items.create(potion.clone()).await.unwrap();

        let err = items.create(potion).await.unwrap_err();

        assert!(
            matches!(&err, PlayError::Persistence(msg) if msg.contains("duplicate key")),
            "{backend}: {err:?}"
        );
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn filters_select_matching_entities_in_insertion_order() {
    for (backend, harness) in TestStore::all() {
        let inventory =
            harness.store.repository::<InventoryItem>("inventoryitems").await.unwrap();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let sword = Uuid::new_v4();
        let shield = Uuid::new_v4();

        let first = InventoryItem::granted(alice, sword, 1);
        let other = InventoryItem::granted(bob, sword, 4);
        let second = InventoryItem::granted(alice, shield, 2);
        for row in [&first, &other, &second] {
            inventory.create(row.clone()).await.unwrap();
        }

        let owned_by_alice = Filter::labelled("user_id", move |row: &InventoryItem| row.user_id == alice);
        assert_eq!(
            inventory.get_all_matching(&owned_by_alice).await.unwrap(),
            vec![first.clone(), second.clone()],
            "{backend}"
        );

        let sword_rows = Filter::labelled("catalog_item_id", move |row: &InventoryItem| {
            row.catalog_item_id == sword
        });
        assert_eq!(inventory.find(&sword_rows).await.unwrap(), Some(first.clone()), "{backend}");
        assert_eq!(
            inventory.find(&owned_by_alice.and(sword_rows)).await.unwrap(),
            Some(first),
            "{backend}"
        );

        let nobody = Filter::labelled("user_id", |row: &InventoryItem| row.user_id.is_nil());
        assert_eq!(inventory.find(&nobody).await.unwrap(), None, "{backend}");
        assert!(inventory.get_all_matching(&nobody).await.unwrap().is_empty(), "{backend}");
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn collections_are_isolated() {
    for (backend, harness) in TestStore::all() {
        let items = harness.store.repository::<Item>("items").await.unwrap();
        let archive = harness.store.repository::<Item>("archived_items").await.unwrap();
        let potion = Item::new("Potion", "Restores a small amount of HP", 5.0);

        items.create(potion.clone()).await.unwrap();

        assert!(archive.get_all().await.unwrap().is_empty(), "{backend}");
        assert_eq!(archive.get(&potion.id).await.unwrap(), None, "{backend}");
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn get_by_id_is_unaffected_by_a_corrupt_neighbour() {
    for (backend, harness) in TestStore::all() {
        let items = harness.store.repository::<Item>("items").await.unwrap();
        let potion = Item::new("Potion", "Restores a small amount of HP", 5.0);
        items.create(potion.clone()).await.unwrap();

        let broken = Uuid::new_v4();
        harness
            .backend
            .insert("items", StoredDocument { key: broken.to_string(), body: "{\"id\":".into() })
            .await
            .unwrap();

        assert_eq!(items.get(&potion.id).await.unwrap(), Some(potion), "{backend}");
        assert_eq!(items.get(&Uuid::new_v4()).await.unwrap(), None, "{backend}");

        let err = items.get(&broken).await.unwrap_err();
        assert!(matches!(err, PlayError::Persistence(_)), "{backend}: {err:?}");
        assert!(matches!(items.get_all().await, Err(PlayError::Persistence(_))), "{backend}");
    }
}
