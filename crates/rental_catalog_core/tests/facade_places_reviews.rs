use rental_catalog_core::{
    CatalogFacade, Entity, EntityId, ErrorKind, NewAmenity, NewPlace, NewReview, NewUser,
    PlacePatch, ReviewPatch, StorageConfig,
};
use serde_json::json;
use uuid::Uuid;

fn facades() -> Vec<(&'static str, CatalogFacade)> {
    vec![
        ("memory", CatalogFacade::in_memory()),
        (
            "sqlite",
            CatalogFacade::from_config(&StorageConfig::SqliteMemory).unwrap(),
        ),
    ]
}

fn create_user(facade: &CatalogFacade, email: &str) -> EntityId {
    facade
        .create_user(NewUser {
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            email: email.to_string(),
            ..NewUser::default()
        })
        .unwrap()
        .id()
}

fn villa(owner_id: EntityId) -> NewPlace {
    serde_json::from_value(json!({
        "title": "Villa",
        "price": 500.0,
        "latitude": 34.05,
        "longitude": -118.24,
        "owner_id": owner_id
    }))
    .unwrap()
}

fn review(place_id: EntityId, user_id: EntityId, rating: i64) -> NewReview {
    NewReview {
        text: "ok".to_string(),
        rating,
        place_id,
        user_id,
    }
}

fn create_amenity(facade: &CatalogFacade, name: &str) -> EntityId {
    facade
        .create_amenity(NewAmenity {
            name: name.to_string(),
        })
        .unwrap()
        .id()
}

#[test]
fn place_with_unknown_owner_is_referential_error() {
    for (backend, facade) in facades() {
        let err = facade.create_place(villa(Uuid::new_v4())).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Referential, "{backend}");
        assert!(facade.get_all_places().unwrap().is_empty(), "{backend}");
    }
}

#[test]
fn place_field_rules_are_validation_errors() {
    for (backend, facade) in facades() {
        let owner = create_user(&facade, "owner@example.com");
        let cases = [
            (0.0, 0.0, 0.0),
            (-5.0, 0.0, 0.0),
            (1.0, 91.0, 0.0),
            (1.0, 0.0, 181.0),
        ];
        for (price, latitude, longitude) in cases {
            let input = NewPlace {
                price,
                latitude,
                longitude,
                ..villa(owner)
            };
            let err = facade.create_place(input).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation, "{backend}: {err}");
        }
    }
}

#[test]
fn place_roundtrip_and_owner_lookup() {
    for (backend, facade) in facades() {
        let owner = create_user(&facade, "owner@example.com");
        let place = facade.create_place(villa(owner)).unwrap();

        assert_eq!(facade.get_place(place.id()).unwrap(), Some(place.clone()), "{backend}");
        assert_eq!(
            facade.get_places_by_owner(owner).unwrap(),
            vec![place],
            "{backend}"
        );
        let err = facade.get_places_by_owner(Uuid::new_v4()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound, "{backend}");
    }
}

#[test]
fn update_place_rechecks_changed_owner() {
    for (backend, facade) in facades() {
        let owner = create_user(&facade, "owner@example.com");
        let other = create_user(&facade, "other@example.com");
        let place = facade.create_place(villa(owner)).unwrap();

        let err = facade
            .update_place(
                place.id(),
                PlacePatch {
                    owner_id: Some(Uuid::new_v4()),
                    ..PlacePatch::default()
                },
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Referential, "{backend}");

        let err = facade
            .update_place(
                place.id(),
                PlacePatch {
                    latitude: Some(-91.0),
                    ..PlacePatch::default()
                },
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation, "{backend}");
        assert_eq!(facade.get_place(place.id()).unwrap(), Some(place.clone()), "{backend}");

        let moved = facade
            .update_place(
                place.id(),
                PlacePatch {
                    owner_id: Some(other),
                    price: Some(650.0),
                    ..PlacePatch::default()
                },
            )
            .unwrap();
        assert_eq!(moved.owner_id(), other, "{backend}");
        assert_eq!(moved.price(), 650.0, "{backend}");
        assert_eq!(moved.title(), "Villa", "{backend}");
    }
}

#[test]
fn review_rating_and_pair_uniqueness() {
    for (backend, facade) in facades() {
        let owner = create_user(&facade, "owner@example.com");
        let guest = create_user(&facade, "guest@example.com");
        let place = facade.create_place(villa(owner)).unwrap().id();
        let other_place = facade.create_place(villa(owner)).unwrap().id();

        let err = facade.create_review(review(place, guest, 6)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation, "{backend}");

        facade.create_review(review(place, guest, 5)).unwrap();
        let err = facade.create_review(review(place, guest, 5)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict, "{backend}");

        facade.create_review(review(other_place, guest, 3)).unwrap();
        facade.create_review(review(place, owner, 4)).unwrap();
        assert_eq!(facade.get_all_reviews().unwrap().len(), 3, "{backend}");
        assert_eq!(facade.get_reviews_by_user(guest).unwrap().len(), 2, "{backend}");
        assert_eq!(facade.get_reviews_by_place(place).unwrap().len(), 2, "{backend}");
    }
}

#[test]
fn review_references_must_resolve() {
    for (backend, facade) in facades() {
        let owner = create_user(&facade, "owner@example.com");
        let place = facade.create_place(villa(owner)).unwrap().id();

        let err = facade
            .create_review(review(Uuid::new_v4(), owner, 4))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Referential, "{backend}");

        let err = facade
            .create_review(review(place, Uuid::new_v4(), 4))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Referential, "{backend}");
    }
}

#[test]
fn update_review_changes_text_and_rating_only() {
    for (backend, facade) in facades() {
        let owner = create_user(&facade, "owner@example.com");
        let place = facade.create_place(villa(owner)).unwrap().id();
        let created = facade.create_review(review(place, owner, 2)).unwrap();

        let patch: ReviewPatch = serde_json::from_value(json!({ "rating": 4 })).unwrap();
        let updated = facade.update_review(created.id(), patch).unwrap();
        assert_eq!(updated.rating(), 4, "{backend}");
        assert_eq!(updated.text(), "ok", "{backend}");
        assert_eq!(updated.place_id(), place, "{backend}");

        let err = facade
            .update_review(
                created.id(),
                ReviewPatch {
                    rating: Some(0),
                    ..ReviewPatch::default()
                },
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation, "{backend}");

        let err = facade
            .update_review(Uuid::new_v4(), ReviewPatch::default())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound, "{backend}");
    }
}

#[test]
fn average_rating_rounds_to_two_decimals() {
    for (backend, facade) in facades() {
        let owner = create_user(&facade, "owner@example.com");
        let guest = create_user(&facade, "guest@example.com");
        let third = create_user(&facade, "third@example.com");
        let place = facade.create_place(villa(owner)).unwrap().id();

        assert_eq!(facade.average_rating(place).unwrap(), 0.0, "{backend}");

        facade.create_review(review(place, owner, 5)).unwrap();
        facade.create_review(review(place, guest, 4)).unwrap();
        facade.create_review(review(place, third, 4)).unwrap();
        assert_eq!(facade.average_rating(place).unwrap(), 4.33, "{backend}");

        let err = facade.average_rating(Uuid::new_v4()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound, "{backend}");
    }
}

#[test]
fn delete_place_removes_its_reviews_and_is_idempotent() {
    for (backend, facade) in facades() {
        let owner = create_user(&facade, "owner@example.com");
        let place = facade.create_place(villa(owner)).unwrap().id();
        let kept_place = facade.create_place(villa(owner)).unwrap().id();
        let removed = facade.create_review(review(place, owner, 5)).unwrap().id();
        let kept = facade.create_review(review(kept_place, owner, 3)).unwrap().id();

        assert!(facade.delete_place(place).unwrap(), "{backend}");
        assert!(!facade.delete_place(place).unwrap(), "{backend}");

        assert_eq!(facade.get_review(removed).unwrap(), None, "{backend}");
        assert!(facade.get_review(kept).unwrap().is_some(), "{backend}");

        assert!(facade.delete_review(kept).unwrap(), "{backend}");
        assert!(!facade.delete_review(kept).unwrap(), "{backend}");
    }
}

#[test]
fn amenity_names_are_unique_after_trimming() {
    for (backend, facade) in facades() {
        let wifi = create_amenity(&facade, "WiFi");

        let err = facade
            .create_amenity(NewAmenity {
                name: " WiFi ".to_string(),
            })
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict, "{backend}");

        create_amenity(&facade, "wifi");
        let found = facade.get_amenity_by_name("WiFi").unwrap().map(|a| a.id());
        assert_eq!(found, Some(wifi), "{backend}");

        let err = facade
            .create_amenity(NewAmenity {
                name: "n".repeat(51),
            })
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation, "{backend}");
    }
}

#[test]
fn place_amenity_links_follow_amenity_lifecycle() {
    for (backend, facade) in facades() {
        let owner = create_user(&facade, "owner@example.com");
        let wifi = create_amenity(&facade, "WiFi");
        let pool = create_amenity(&facade, "Pool");

        let err = facade
            .create_place(NewPlace {
                amenity_ids: vec![Uuid::new_v4()],
                ..villa(owner)
            })
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Referential, "{backend}");

        let place = facade
            .create_place(NewPlace {
                amenity_ids: vec![wifi, wifi],
                ..villa(owner)
            })
            .unwrap();
        assert_eq!(place.amenity_ids(), [wifi], "{backend}");

        let linked = facade.add_place_amenity(place.id(), pool).unwrap();
        assert_eq!(linked.amenity_ids(), [wifi, pool], "{backend}");
        let again = facade.add_place_amenity(place.id(), pool).unwrap();
        assert_eq!(again.amenity_ids(), [wifi, pool], "{backend}");

        let err = facade
            .add_place_amenity(place.id(), Uuid::new_v4())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Referential, "{backend}");

        let names: Vec<String> = facade
            .get_place_amenities(place.id())
            .unwrap()
            .iter()
            .map(|amenity| amenity.name().to_string())
            .collect();
        assert_eq!(names, ["WiFi", "Pool"], "{backend}");

        let unlinked = facade.remove_place_amenity(place.id(), wifi).unwrap();
        assert_eq!(unlinked.amenity_ids(), [pool], "{backend}");

        assert!(facade.delete_amenity(pool).unwrap(), "{backend}");
        assert!(!facade.delete_amenity(pool).unwrap(), "{backend}");
        let place = facade.get_place(place.id()).unwrap().unwrap();
        assert!(place.amenity_ids().is_empty(), "{backend}");
    }
}

#[test]
fn summary_counts_every_entity() {
    for (backend, facade) in facades() {
        let owner = create_user(&facade, "owner@example.com");
        let place = facade.create_place(villa(owner)).unwrap().id();
        facade.create_review(review(place, owner, 5)).unwrap();
        create_amenity(&facade, "WiFi");

        let summary = facade.summary().unwrap();
        assert_eq!(
            (summary.users, summary.places, summary.reviews, summary.amenities),
            (1, 1, 1, 1),
            "{backend}"
        );
    }
}
