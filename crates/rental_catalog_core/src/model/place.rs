//! Place (listing) domain model.
//!
//! # Responsibility
//! - Validate listing title, price and coordinates.
//! - Hold owner and amenity links as ids only.
//!
//! # Invariants
//! - `title` is non-blank and at most 100 characters.
//! - `price` is finite and strictly positive.
//! - `latitude` in [-90, 90], `longitude` in [-180, 180], both finite.
//! - `amenity_ids` carries no duplicates and keeps first-seen order.
//! - Existence of `owner_id` / `amenity_ids` targets is checked by the
//!   service layer, not here.

use super::{
    fields_of, now_epoch_ms, validate_identity, validate_text, Entity, EntityId, EntityKind,
    ValidationError,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

pub const TITLE_MAX_CHARS: usize = 100;

/// Rentable listing owned by one user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Place {
    pub(crate) id: EntityId,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) price: f64,
    pub(crate) latitude: f64,
    pub(crate) longitude: f64,
    pub(crate) owner_id: EntityId,
    pub(crate) amenity_ids: Vec<EntityId>,
    pub(crate) created_at: i64,
    pub(crate) updated_at: i64,
}

/// Raw field map accepted when creating a place.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewPlace {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub owner_id: EntityId,
    #[serde(default)]
    pub amenity_ids: Vec<EntityId>,
}

/// Partial field map accepted when updating a place.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlacePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub owner_id: Option<EntityId>,
    /// Replaces the whole amenity set when present.
    pub amenity_ids: Option<Vec<EntityId>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceLookup {
    Owner(EntityId),
    Amenity(EntityId),
}

impl Place {
    /// Builds a validated place with a generated id.
    pub fn new(input: NewPlace) -> Result<Self, ValidationError> {
        let now = now_epoch_ms();
        let place = Self {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            price: input.price,
            latitude: input.latitude,
            longitude: input.longitude,
            owner_id: input.owner_id,
            amenity_ids: dedup_ids(&input.amenity_ids),
            created_at: now,
            updated_at: now,
        };
        place.validate()?;
        Ok(place)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn owner_id(&self) -> EntityId {
        self.owner_id
    }

    pub fn amenity_ids(&self) -> &[EntityId] {
        &self.amenity_ids
    }

    pub fn has_amenity(&self, amenity_id: EntityId) -> bool {
        self.amenity_ids.contains(&amenity_id)
    }

    pub fn to_fields(&self) -> Map<String, Value> {
        fields_of(self)
    }
}

impl Entity for Place {
    type Patch = PlacePatch;
    type Lookup = PlaceLookup;

    const KIND: EntityKind = EntityKind::Place;

    fn id(&self) -> EntityId {
        self.id
    }

    fn created_at(&self) -> i64 {
        self.created_at
    }

    fn updated_at(&self) -> i64 {
        self.updated_at
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validate_identity(self.id, self.created_at, self.updated_at)?;
        validate_text("title", &self.title, Some(TITLE_MAX_CHARS))?;
        // `!(x > 0.0)` also rejects NaN.
        if !(self.price > 0.0) || !self.price.is_finite() {
            return Err(ValidationError::NonPositivePrice(self.price));
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(ValidationError::LatitudeOutOfRange(self.latitude));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(ValidationError::LongitudeOutOfRange(self.longitude));
        }
        if self.owner_id.is_nil() {
            return Err(ValidationError::NilId);
        }
        Ok(())
    }

    fn matches(&self, lookup: &PlaceLookup) -> bool {
        match lookup {
            PlaceLookup::Owner(owner_id) => self.owner_id == *owner_id,
            PlaceLookup::Amenity(amenity_id) => self.has_amenity(*amenity_id),
        }
    }

    fn merge(&mut self, patch: &PlacePatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = Some(description.clone());
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(latitude) = patch.latitude {
            self.latitude = latitude;
        }
        if let Some(longitude) = patch.longitude {
            self.longitude = longitude;
        }
        if let Some(owner_id) = patch.owner_id {
            self.owner_id = owner_id;
        }
        if let Some(amenity_ids) = &patch.amenity_ids {
            self.amenity_ids = dedup_ids(amenity_ids);
        }
    }

    fn touch(&mut self, updated_at: i64) {
        self.updated_at = updated_at;
    }
}

fn dedup_ids(ids: &[EntityId]) -> Vec<EntityId> {
    let mut unique = Vec::with_capacity(ids.len());
    for id in ids {
        if !unique.contains(id) {
            unique.push(*id);
        }
    }
    unique
}
