//! Inventory service scenarios against recording doubles.

mod support;

use std::sync::Arc;

use play_core::InventoryService;
use play_domain::{CatalogItemDto, GrantItemsDto, InventoryItem, PlayError};
use support::remote::StubRemoteClient;
use support::repositories::{RecordingRepository, RepoCall};
use uuid::Uuid;

fn catalog_item(id: Uuid, name: &str) -> CatalogItemDto {
    CatalogItemDto { id, name: name.to_string(), description: format!("{name} description") }
}

fn service(
    repo: Arc<RecordingRepository<InventoryItem>>,
    catalog: Vec<CatalogItemDto>,
) -> InventoryService {
    InventoryService::new(repo, Arc::new(StubRemoteClient::returning(catalog)))
}

#[tokio::test]
async fn grant_of_owned_item_updates_quantity() {
    let user = Uuid::new_v4();
    let item = Uuid::new_v4();
    let existing = InventoryItem::granted(user, item, 2);
    let repo = RecordingRepository::seeded(vec![existing.clone()]);

    service(repo.clone(), vec![])
        .grant(GrantItemsDto { user_id: user, catalog_item_id: item, quantity: 3 })
        .await
        .unwrap();

    let updated = repo.updated();
    assert_eq!(updated.len(), 1, "exactly one update");
    assert_eq!(updated[0].id, existing.id);
    assert_eq!(updated[0].quantity, 5);
    assert_eq!(updated[0].acquired_date, existing.acquired_date);
    assert!(repo.created().is_empty(), "no create for an owned item");
}

#[tokio::test]
async fn grant_of_new_item_creates_row() {
    let user = Uuid::new_v4();
    let item = Uuid::new_v4();
    let repo = RecordingRepository::<InventoryItem>::new();

    service(repo.clone(), vec![])
        .grant(GrantItemsDto { user_id: user, catalog_item_id: item, quantity: 4 })
        .await
        .unwrap();

    let created = repo.created();
    assert_eq!(created.len(), 1, "exactly one create");
    assert!(!created[0].id.is_nil());
    assert_eq!(created[0].user_id, user);
    assert_eq!(created[0].catalog_item_id, item);
    assert_eq!(created[0].quantity, 4);
    assert!(repo.updated().is_empty(), "no update for a new item");
}

#[tokio::test]
async fn grant_matches_on_user_and_item_together() {
    let user = Uuid::new_v4();
    let other_user = Uuid::new_v4();
    let item = Uuid::new_v4();
    let repo = RecordingRepository::seeded(vec![InventoryItem::granted(other_user, item, 7)]);

    service(repo.clone(), vec![])
        .grant(GrantItemsDto { user_id: user, catalog_item_id: item, quantity: 1 })
        .await
        .unwrap();

    assert_eq!(repo.created().len(), 1);
    assert!(repo.updated().is_empty());
    assert_eq!(repo.stored().len(), 2);
}

#[tokio::test]
async fn items_for_user_joins_catalog_data() {
    let user = Uuid::new_v4();
    let potion = Uuid::new_v4();
    let antidote = Uuid::new_v4();
    let repo = RecordingRepository::seeded(vec![
        InventoryItem::granted(user, potion, 2),
        InventoryItem::granted(Uuid::new_v4(), antidote, 9),
    ]);
    let catalog = Arc::new(StubRemoteClient::returning(vec![
        catalog_item(potion, "Potion"),
        catalog_item(antidote, "Antidote"),
    ]));
    let service = InventoryService::new(repo.clone(), catalog.clone());

    let items = service.items_for_user(user).await.unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].catalog_item_id, potion);
    assert_eq!(items[0].name, "Potion");
    assert_eq!(items[0].description, "Potion description");
    assert_eq!(items[0].quantity, 2);
    assert_eq!(catalog.routes(), vec!["items".to_string()]);
    assert!(repo.calls().contains(&RepoCall::GetAllMatching));
}

#[tokio::test]
async fn items_for_user_with_empty_inventory() {
    let catalog = vec![catalog_item(Uuid::new_v4(), "Potion")];
    let service = service(RecordingRepository::new(), catalog);
    assert!(service.items_for_user(Uuid::new_v4()).await.unwrap().is_empty());
}

#[tokio::test]
async fn nil_user_is_rejected_before_any_call() {
    let repo = RecordingRepository::<InventoryItem>::new();
    let catalog = Arc::new(StubRemoteClient::<CatalogItemDto>::returning(vec![]));
    let service = InventoryService::new(repo.clone(), catalog.clone());

    let err = service.items_for_user(Uuid::nil()).await.unwrap_err();

    assert!(matches!(err, PlayError::Validation(_)));
    assert!(catalog.routes().is_empty());
    assert!(repo.calls().is_empty());
}

#[tokio::test]
async fn remote_failures_are_surfaced_unchanged() {
    for error in [
        PlayError::CircuitOpen("catalog".into()),
        PlayError::RemoteCallFailed { attempts: 6, reason: "HTTP 500".into() },
    ] {
        let service = InventoryService::new(
            RecordingRepository::<InventoryItem>::new(),
            Arc::new(StubRemoteClient::<CatalogItemDto>::failing(error.clone())),
        );
        assert_eq!(service.items_for_user(Uuid::new_v4()).await.unwrap_err(), error);
    }
}

#[tokio::test]
async fn owned_item_missing_from_catalog_is_internal_error() {
    let user = Uuid::new_v4();
    let missing = Uuid::new_v4();
    let repo = RecordingRepository::seeded(vec![InventoryItem::granted(user, missing, 1)]);

    let err = service(repo, vec![]).items_for_user(user).await.unwrap_err();

    match err {
        PlayError::Internal(message) => assert!(message.contains(&missing.to_string())),
        other => panic!("expected internal error, got {other:?}"),
    }
}
