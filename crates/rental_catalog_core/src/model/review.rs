//! Review domain model.
//!
//! # Invariants
//! - `text` is non-blank after trimming.
//! - `rating` is an integer in [1, 5].
//! - `place_id` / `user_id` are fixed at creation; the one-review-per-pair
//!   rule is enforced by the service layer and the storage unique index.

use super::{
    fields_of, now_epoch_ms, validate_identity, validate_text, Entity, EntityId, EntityKind,
    ValidationError,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

pub const RATING_MIN: i64 = 1;
pub const RATING_MAX: i64 = 5;

/// One user's review of one place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Review {
    pub(crate) id: EntityId,
    pub(crate) text: String,
    pub(crate) rating: i64,
    pub(crate) place_id: EntityId,
    pub(crate) user_id: EntityId,
    pub(crate) created_at: i64,
    pub(crate) updated_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewReview {
    pub text: String,
    pub rating: i64,
    pub place_id: EntityId,
    pub user_id: EntityId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReviewPatch {
    pub text: Option<String>,
    pub rating: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewLookup {
    Place(EntityId),
    User(EntityId),
    PlaceAndUser {
        place_id: EntityId,
        user_id: EntityId,
    },
}

impl Review {
    pub fn new(input: NewReview) -> Result<Self, ValidationError> {
        let now = now_epoch_ms();
        let review = Self {
            id: Uuid::new_v4(),
            text: input.text,
            rating: input.rating,
            place_id: input.place_id,
            user_id: input.user_id,
            created_at: now,
            updated_at: now,
        };
        review.validate()?;
        Ok(review)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn rating(&self) -> i64 {
        self.rating
    }

    pub fn place_id(&self) -> EntityId {
        self.place_id
    }

    pub fn user_id(&self) -> EntityId {
        self.user_id
    }

    pub fn to_fields(&self) -> Map<String, Value> {
        fields_of(self)
    }
}

impl Entity for Review {
    type Patch = ReviewPatch;
    type Lookup = ReviewLookup;

    const KIND: EntityKind = EntityKind::Review;

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
        validate_text("text", &self.text, None)?;
        if !(RATING_MIN..=RATING_MAX).contains(&self.rating) {
            return Err(ValidationError::RatingOutOfRange(self.rating));
        }
        if self.place_id.is_nil() || self.user_id.is_nil() {
            return Err(ValidationError::NilId);
        }
        Ok(())
    }

    fn matches(&self, lookup: &ReviewLookup) -> bool {
        match *lookup {
            ReviewLookup::Place(place_id) => self.place_id == place_id,
            ReviewLookup::User(user_id) => self.user_id == user_id,
            ReviewLookup::PlaceAndUser { place_id, user_id } => {
                self.place_id == place_id && self.user_id == user_id
            }
        }
    }

    fn merge(&mut self, patch: &ReviewPatch) {
        if let Some(text) = &patch.text {
            self.text = text.clone();
        }
        if let Some(rating) = patch.rating {
            self.rating = rating;
        }
    }

    fn touch(&mut self, updated_at: i64) {
        self.updated_at = updated_at;
    }
}

#[cfg(test)]
mod tests {
    use super::{NewReview, Review, ReviewPatch};
    use crate::model::{Entity, ValidationError};
    use uuid::Uuid;

    fn input(rating: i64, text: &str) -> NewReview {
        NewReview {
            text: text.to_string(),
            rating,
            place_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
        }
    }

    #[test]
    fn rating_must_be_within_one_to_five() {
        assert!(Review::new(input(1, "fine")).is_ok());
        assert!(Review::new(input(5, "great")).is_ok());
        assert_eq!(
            Review::new(input(6, "ok")).unwrap_err(),
            ValidationError::RatingOutOfRange(6)
        );
        assert_eq!(
            Review::new(input(0, "ok")).unwrap_err(),
            ValidationError::RatingOutOfRange(0)
        );
    }

    #[test]
    fn blank_text_is_rejected() {
        assert_eq!(
            Review::new(input(4, "  \t ")).unwrap_err(),
            ValidationError::EmptyField { field: "text" }
        );
    }

    #[test]
    fn update_keeps_links_and_bumps_timestamp() {
        let mut review = Review::new(input(3, "decent")).unwrap();
        let before = review.clone();

        review
            .apply_update(&ReviewPatch {
                rating: Some(4),
                ..ReviewPatch::default()
            })
            .unwrap();

        assert_eq!(review.rating(), 4);
        assert_eq!(review.text(), "decent");
        assert_eq!(review.place_id(), before.place_id());
        assert_eq!(review.user_id(), before.user_id());
        assert!(review.updated_at() > before.updated_at());
    }
}
