//! Amenity domain model.
//!
//! Amenities are shared by places through a many-to-many link with no
//! ownership direction. Names are trimmed, at most 50 characters, and unique
//! (exact match) across the catalog.

use super::{
    fields_of, now_epoch_ms, validate_identity, validate_text, Entity, EntityId, EntityKind,
    ValidationError,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

pub const NAME_MAX_CHARS: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Amenity {
    pub(crate) id: EntityId,
    pub(crate) name: String,
    pub(crate) created_at: i64,
    pub(crate) updated_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewAmenity {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AmenityPatch {
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AmenityLookup {
    Name(String),
}

impl Amenity {
    pub fn new(input: NewAmenity) -> Result<Self, ValidationError> {
        let now = now_epoch_ms();
        let amenity = Self {
            id: Uuid::new_v4(),
            name: normalize_amenity_name(&input.name),
            created_at: now,
            updated_at: now,
        };
        amenity.validate()?;
        Ok(amenity)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn to_fields(&self) -> Map<String, Value> {
        fields_of(self)
    }
}

impl Entity for Amenity {
    type Patch = AmenityPatch;
    type Lookup = AmenityLookup;

    const KIND: EntityKind = EntityKind::Amenity;

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
        validate_text("name", &self.name, Some(NAME_MAX_CHARS))
    }

    fn matches(&self, lookup: &AmenityLookup) -> bool {
        match lookup {
            AmenityLookup::Name(name) => self.name == normalize_amenity_name(name),
        }
    }

    fn merge(&mut self, patch: &AmenityPatch) {
        if let Some(name) = &patch.name {
            self.name = normalize_amenity_name(name);
        }
    }

    fn touch(&mut self, updated_at: i64) {
        self.updated_at = updated_at;
    }
}

/// Canonical stored form of an amenity name.
pub fn normalize_amenity_name(name: &str) -> String {
    name.trim().to_string()
}
