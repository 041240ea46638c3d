//! Tests for NetworkService over the in-memory store

use std::sync::Arc;

use partynet::application::services::NetworkService;
use partynet::application::{ApplicationError, ErrorKind};
use partynet::domain::{
    validate_draft, DomainError, Level, Unit, UnitDraft, UnitId, UnitPatch, ValidUnit,
};
use partynet::infrastructure::{MemoryStore, StoreError, StoreResult, UnitStore};
use partynet::util::testing::{init_test_setup, seed_chain};

fn service() -> (Arc<MemoryStore>, NetworkService) {
    init_test_setup();
    let store = Arc::new(MemoryStore::new());
    let service = NetworkService::new(store.clone());
    (store, service)
}

// ============================================================
// Scenario tests
// ============================================================

#[test]
fn given_four_level_chain_when_listing_then_returns_nested_tree() {
    let (_, service) = service();
    seed_chain(&service, "Alpha");

    let forest = service.list_tree().unwrap();

    assert_eq!(forest.unions().len(), 1);
    let union = &forest.unions()[0];
    assert_eq!(union.unit.name_label, "Alpha");
    assert_eq!(union.villages.len(), 1);
    assert_eq!(union.villages[0].unit.name_label, "Alpha-V");
    assert_eq!(union.villages[0].wards.len(), 1);
    assert_eq!(union.villages[0].wards[0].unit.name_label, "Alpha-W");
    assert_eq!(union.villages[0].wards[0].booths.len(), 1);
    assert_eq!(union.villages[0].wards[0].booths[0].name_label, "Alpha-B");
}

#[test]
fn given_chain_when_deleting_village_then_removes_ward_and_booth_too() {
    let (store, service) = service();
    let chain = seed_chain(&service, "Alpha");

    let outcome = service
        .delete_unit(&UnitId::new(&chain.village.id))
        .unwrap();

    assert_eq!(outcome.removed.len(), 3);
    assert_eq!(
        outcome.descendants(),
        &[UnitId::new(&chain.ward.id), UnitId::new(&chain.booth.id)]
    );
    let forest = service.list_tree().unwrap();
    assert_eq!(forest.unions().len(), 1);
    assert!(forest.unions()[0].villages.is_empty());
    assert_eq!(store.list().unwrap().len(), 1);
}

#[test]
fn given_booth_without_parent_when_creating_then_fails_with_missing_parent() {
    let (store, service) = service();

    let err = service
        .create_unit(UnitDraft::new("booth", "B9"))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::MissingParent);
    assert!(store.list().unwrap().is_empty());
}

#[test]
fn given_unknown_id_when_deleting_then_fails_with_not_found_and_changes_nothing() {
    let (store, service) = service();
    seed_chain(&service, "Alpha");
    let before = store.list().unwrap();

    let err = service
        .delete_unit(&UnitId::new("nonexistent-id"))
        .unwrap_err();

    assert!(matches!(err, ApplicationError::NotFound(ref id) if id.as_str() == "nonexistent-id"));
    assert_eq!(store.list().unwrap(), before);
}

// ============================================================
// Create
// ============================================================

#[test]
fn given_union_with_parent_id_when_creating_then_parent_is_dropped() {
    let (_, service) = service();

    let node = service
        .create_unit(UnitDraft::new("union", "Alpha").with_parent("whatever"))
        .unwrap();

    assert_eq!(node.level, Level::Union);
    assert_eq!(node.parent_id, None);
}

#[test]
fn given_village_with_missing_parent_unit_when_creating_then_fails_with_invalid_parent() {
    let (store, service) = service();

    let err = service
        .create_unit(UnitDraft::new("village", "V").with_parent("ghost"))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidParent);
    assert!(store.list().unwrap().is_empty());
}

#[test]
fn given_booth_under_village_when_creating_then_fails_with_invalid_parent() {
    let (_, service) = service();
    let chain = seed_chain(&service, "Alpha");

    let err = service
        .create_unit(UnitDraft::new("booth", "B2").with_parent(&chain.village.id))
        .unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::InvalidParent {
            level: Level::Booth,
            ..
        })
    ));
}

#[test]
fn given_mixed_case_level_and_padded_fields_when_creating_then_normalizes() {
    let (_, service) = service();

    let node = service
        .create_unit(
            UnitDraft::new(" UNION ", "  Alpha  ")
                .with_person(" Ravi ")
                .with_role(" Secretary")
                .with_phone("98400 ")
                .with_photo("https://cdn.example.org/ravi.jpg"),
        )
        .unwrap();

    assert_eq!(node.level, Level::Union);
    assert_eq!(node.name_label, "Alpha");
    assert_eq!(node.person_name, "Ravi");
    assert_eq!(node.role_label, "Secretary");
    assert_eq!(node.phone, "98400");
    assert_eq!(node.photo, "https://cdn.example.org/ravi.jpg");
    assert!(!node.id.is_empty());
}

#[test]
fn given_blank_name_when_creating_then_fails_with_missing_name() {
    let (_, service) = service();

    let err = service.create_unit(UnitDraft::new("union", "   ")).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::MissingName);
    assert_eq!(err.report().kind, ErrorKind::MissingName);
    assert!(!err.report().message.is_empty());
}

#[test]
fn given_unknown_level_when_creating_then_fails_with_invalid_level() {
    let (_, service) = service();

    let err = service
        .create_unit(UnitDraft::new("district", "D1"))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidLevel);
}

// ============================================================
// Update
// ============================================================

#[test]
fn given_unit_when_updating_phone_then_only_phone_changes() {
    let (store, service) = service();
    let union = service
        .create_unit(
            UnitDraft::new("union", "Alpha")
                .with_person("Ravi")
                .with_role("President")
                .with_phone("555"),
        )
        .unwrap();
    let id = UnitId::new(&union.id);
    let before = store.get(&id).unwrap().unwrap();

    let updated = service
        .update_unit(&id, UnitPatch::new().with_phone("123"))
        .unwrap();

    assert_eq!(updated.phone, "123");
    assert_eq!(updated.name_label, "Alpha");
    assert_eq!(updated.person_name, "Ravi");
    assert_eq!(updated.role_label, "President");
    assert_eq!(updated.photo, "");
    assert_eq!(updated.level, Level::Union);

    let after = store.get(&id).unwrap().unwrap();
    assert_eq!(after.created_at, before.created_at);
    assert!(after.updated_at >= before.updated_at);
}

#[test]
fn given_unit_when_updating_name_then_level_and_parent_stay() {
    let (_, service) = service();
    let chain = seed_chain(&service, "Alpha");

    let updated = service
        .update_unit(
            &UnitId::new(&chain.ward.id),
            UnitPatch::new().with_name("Ward 7"),
        )
        .unwrap();

    assert_eq!(updated.name_label, "Ward 7");
    assert_eq!(updated.level, Level::Ward);
    assert_eq!(updated.parent_id, chain.ward.parent_id);
}

#[test]
fn given_unknown_id_when_updating_then_fails_with_not_found() {
    let (_, service) = service();

    let err = service
        .update_unit(&UnitId::new("missing"), UnitPatch::new().with_phone("1"))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn given_unknown_id_when_applying_empty_patch_then_fails_with_not_found() {
    let (_, service) = service();

    let err = service
        .update_unit(&UnitId::new("missing"), UnitPatch::new())
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn given_blank_name_when_updating_then_fails_and_keeps_old_name() {
    let (_, service) = service();
    let union = service.create_unit(UnitDraft::new("union", "Alpha")).unwrap();
    let id = UnitId::new(&union.id);

    let err = service
        .update_unit(&id, UnitPatch::new().with_name(" "))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::MissingName);
    assert_eq!(service.get_unit(&id).unwrap().name_label, "Alpha");
}

// ============================================================
// Delete
// ============================================================

#[test]
fn given_two_unions_when_deleting_one_then_other_tree_is_untouched() {
    let (_, service) = service();
    let alpha = seed_chain(&service, "Alpha");
    let beta = seed_chain(&service, "Beta");

    let outcome = service
        .delete_unit(&UnitId::new(&alpha.union.id))
        .unwrap();

    assert_eq!(outcome.removed.to_vec(), alpha.ids().to_vec());
    let forest = service.list_tree().unwrap();
    assert_eq!(forest.unions().len(), 1);
    assert_eq!(forest.unions()[0].unit.id, beta.union.id);
    assert_eq!(forest.stats().total(), 4);
}

#[test]
fn given_leaf_booth_when_deleting_then_only_booth_is_removed() {
    let (store, service) = service();
    let chain = seed_chain(&service, "Alpha");

    let outcome = service.delete_unit(&UnitId::new(&chain.booth.id)).unwrap();

    assert!(outcome.descendants().is_empty());
    assert_eq!(store.list().unwrap().len(), 3);
}

// ============================================================
// Children
// ============================================================

#[test]
fn given_village_with_wards_when_listing_children_then_returns_store_order() {
    let (_, service) = service();
    let chain = seed_chain(&service, "Alpha");
    let second = service
        .create_unit(UnitDraft::new("ward", "Alpha-W2").with_parent(&chain.village.id))
        .unwrap();

    let children = service
        .list_children(&UnitId::new(&chain.village.id))
        .unwrap();

    let names: Vec<_> = children.iter().map(|c| c.name_label.as_str()).collect();
    assert_eq!(names, ["Alpha-W", "Alpha-W2"]);
    assert_eq!(children[1].id, second.id);
}

// ============================================================
// Store failures
// ============================================================

/// Store whose writes always fail; reads go to an inner memory store.
struct ReadOnlyStore {
    inner: MemoryStore,
}

fn offline() -> StoreError {
    StoreError::unavailable(
        "write units",
        std::io::Error::new(std::io::ErrorKind::TimedOut, "store timed out"),
    )
}

impl UnitStore for ReadOnlyStore {
    fn list(&self) -> StoreResult<Vec<Unit>> {
        self.inner.list()
    }

    fn get(&self, id: &UnitId) -> StoreResult<Option<Unit>> {
        self.inner.get(id)
    }

    fn find_by_parent(&self, parent: &UnitId) -> StoreResult<Vec<Unit>> {
        self.inner.find_by_parent(parent)
    }

    fn insert(&self, _unit: ValidUnit) -> StoreResult<Unit> {
        Err(offline())
    }

    fn update(&self, _id: &UnitId, _patch: &UnitPatch) -> StoreResult<Option<Unit>> {
        Err(offline())
    }

    fn delete_many(&self, _ids: &[UnitId]) -> StoreResult<usize> {
        Err(offline())
    }
}

#[test]
fn given_failing_store_when_deleting_then_reports_store_unavailable_and_keeps_units() {
    init_test_setup();
    let seeded = MemoryStore::new();
    let union = seeded
        .insert(validate_draft(UnitDraft::new("union", "Alpha")).unwrap())
        .unwrap();
    let store = Arc::new(ReadOnlyStore { inner: seeded });
    let service = NetworkService::new(store.clone());

    let err = service.delete_unit(&union.id).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::StoreUnavailable);
    assert_eq!(store.list().unwrap().len(), 1);
}

#[test]
fn given_failing_store_when_creating_then_reports_store_unavailable() {
    init_test_setup();
    let service = NetworkService::new(Arc::new(ReadOnlyStore {
        inner: MemoryStore::new(),
    }));

    let err = service.create_unit(UnitDraft::new("union", "Alpha")).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::StoreUnavailable);
    assert!(err.to_string().contains("insert unit"));
}

#[test]
fn given_failing_store_when_creating_invalid_unit_then_validation_error_wins() {
    init_test_setup();
    let service = NetworkService::new(Arc::new(ReadOnlyStore {
        inner: MemoryStore::new(),
    }));

    let err = service.create_unit(UnitDraft::new("ward", "W")).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::MissingParent);
}
