use rental_catalog_core::model::place::PlaceLookup;
use rental_catalog_core::{
    Amenity, Entity, NewAmenity, NewPlace, NewReview, NewUser, Place, PlacePatch, Review,
    Sha256CredentialHasher, User, UserUpdate, ValidationError,
};
use serde_json::json;
use uuid::Uuid;

fn decode<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> T {
    serde_json::from_value(value).unwrap()
}

#[test]
fn user_field_map_decodes_and_lowercases_email() {
    let input: NewUser = decode(json!({
        "first_name": "John",
        "last_name": "Doe",
        "email": "John.Doe@Example.com",
        "password": "secret-pass"
    }));

    let user = User::from_input(input, &Sha256CredentialHasher).unwrap();
    assert_eq!(user.email(), "john.doe@example.com");
    assert!(!user.is_admin());
    assert!(user.credential_hash().unwrap().starts_with("sha256$"));
    assert_eq!(user.created_at(), user.updated_at());
}

#[test]
fn field_maps_reject_server_assigned_fields() {
    let err = serde_json::from_value::<NewUser>(json!({
        "id": Uuid::new_v4(),
        "first_name": "John",
        "last_name": "Doe",
        "email": "john@example.com"
    }))
    .unwrap_err();
    assert!(err.to_string().contains("unknown field"));

    assert!(serde_json::from_value::<PlacePatch>(json!({ "created_at": 1 })).is_err());
}

#[test]
fn short_password_is_a_validation_error() {
    let input: NewUser = decode(json!({
        "first_name": "John",
        "last_name": "Doe",
        "email": "john@example.com",
        "password": "12345"
    }));

    let err = User::from_input(input, &Sha256CredentialHasher).unwrap_err();
    assert_eq!(err, ValidationError::PasswordTooShort { min_chars: 6 });
}

#[test]
fn user_projection_never_contains_credential_hash() {
    let input: NewUser = decode(json!({
        "first_name": "John",
        "last_name": "Doe",
        "email": "john@example.com",
        "password": "secret-pass"
    }));
    let user = User::from_input(input, &Sha256CredentialHasher).unwrap();

    let fields = user.to_fields();
    assert!(!fields.contains_key("credential_hash"));
    assert!(!fields.contains_key("password"));
    assert_eq!(fields["email"], json!("john@example.com"));
    assert_eq!(fields["id"], json!(user.id().to_string()));
}

#[test]
fn password_update_is_rehashed_not_stored() {
    let mut user = User::new("John", "Doe", "john@example.com", None, false).unwrap();
    let update: UserUpdate = decode(json!({ "password": "new-secret" }));

    let patch = update.into_patch(&Sha256CredentialHasher).unwrap();
    user.apply_update(&patch).unwrap();

    assert!(user.verify_password("new-secret", &Sha256CredentialHasher));
    assert_ne!(user.credential_hash(), Some("new-secret"));
}

#[test]
fn place_field_map_accepts_optional_description_and_amenities() {
    let owner_id = Uuid::new_v4();
    let wifi = Uuid::new_v4();
    let input: NewPlace = decode(json!({
        "title": "Villa",
        "price": 500.0,
        "latitude": 34.05,
        "longitude": -118.24,
        "owner_id": owner_id,
        "amenity_ids": [wifi, wifi]
    }));

    let place = Place::new(input).unwrap();
    assert_eq!(place.description(), None);
    assert_eq!(place.amenity_ids(), [wifi]);
    assert!(place.matches(&PlaceLookup::Owner(owner_id)));
    assert!(place.matches(&PlaceLookup::Amenity(wifi)));
}

#[test]
fn place_rules_reject_price_and_coordinates() {
    let base = json!({
        "title": "Villa",
        "price": 500.0,
        "latitude": 34.05,
        "longitude": -118.24,
        "owner_id": Uuid::new_v4()
    });
    let with = |field: &str, value: serde_json::Value| {
        let mut fields = base.clone();
        fields[field] = value;
        Place::new(decode(fields)).unwrap_err()
    };

    assert!(matches!(with("price", json!(0.0)), ValidationError::NonPositivePrice(_)));
    assert!(matches!(with("price", json!(-1.0)), ValidationError::NonPositivePrice(_)));
    assert!(matches!(
        with("latitude", json!(90.5)),
        ValidationError::LatitudeOutOfRange(_)
    ));
    assert!(matches!(
        with("longitude", json!(-180.5)),
        ValidationError::LongitudeOutOfRange(_)
    ));
    assert!(matches!(
        with("title", json!("x".repeat(101))),
        ValidationError::FieldTooLong { field: "title", .. }
    ));
}

#[test]
fn review_rating_outside_range_fails() {
    let input: NewReview = decode(json!({
        "text": "ok",
        "rating": 6,
        "place_id": Uuid::new_v4(),
        "user_id": Uuid::new_v4()
    }));
    assert_eq!(
        Review::new(input).unwrap_err(),
        ValidationError::RatingOutOfRange(6)
    );
}

#[test]
fn failed_update_leaves_entity_and_timestamp_unchanged() {
    let mut amenity = Amenity::new(NewAmenity {
        name: "WiFi".to_string(),
    })
    .unwrap();
    let before = amenity.clone();

    let patch = decode(json!({ "name": "n".repeat(51) }));
    assert!(amenity.apply_update(&patch).is_err());
    assert_eq!(amenity, before);

    let patch = decode(json!({ "name": "Fast WiFi" }));
    amenity.apply_update(&patch).unwrap();
    assert_eq!(amenity.name(), "Fast WiFi");
    assert!(amenity.updated_at() > before.updated_at());
    assert_eq!(amenity.created_at(), before.created_at());
}
