//! Domain model for the rental catalog.
//!
//! # Responsibility
//! - Define the four catalog records (user, place, review, amenity).
//! - Own every field-level validation rule; nothing else may build an
//!   entity that violates them.
//!
//! # Invariants
//! - Every entity is identified by a non-nil `EntityId` assigned at creation.
//! - Entities reference each other by id only, never by embedded records.
//! - `updated_at >= created_at`, and `updated_at` strictly increases on every
//!   successful update.
//! - A failed update leaves the entity untouched.

pub mod amenity;
pub mod place;
pub mod review;
pub mod user;

use chrono::Utc;
use serde::Serialize;
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier shared by all catalog entities.
pub type EntityId = Uuid;

/// Entity category, used in errors and log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    User,
    Place,
    Review,
    Amenity,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Place => "place",
            Self::Review => "review",
            Self::Amenity => "amenity",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field-level rule violation raised by entity construction or update.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    NilId,
    EmptyField {
        field: &'static str,
    },
    FieldTooLong {
        field: &'static str,
        max_chars: usize,
        actual_chars: usize,
    },
    InvalidEmail(String),
    PasswordTooShort {
        min_chars: usize,
    },
    NonPositivePrice(f64),
    LatitudeOutOfRange(f64),
    LongitudeOutOfRange(f64),
    RatingOutOfRange(i64),
    InvalidTimestamps {
        created_at: i64,
        updated_at: i64,
    },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "entity id must not be nil"),
            Self::EmptyField { field } => write!(f, "{field} must not be empty"),
            Self::FieldTooLong {
                field,
                max_chars,
                actual_chars,
            } => write!(
                f,
                "{field} must be at most {max_chars} characters, got {actual_chars}"
            ),
            Self::InvalidEmail(value) => write!(f, "invalid email address `{value}`"),
            Self::PasswordTooShort { min_chars } => {
                write!(f, "password must be at least {min_chars} characters")
            }
            Self::NonPositivePrice(value) => {
                write!(f, "price must be strictly positive, got {value}")
            }
            Self::LatitudeOutOfRange(value) => {
                write!(f, "latitude must be within [-90, 90], got {value}")
            }
            Self::LongitudeOutOfRange(value) => {
                write!(f, "longitude must be within [-180, 180], got {value}")
            }
            Self::RatingOutOfRange(value) => {
                write!(f, "rating must be an integer within [1, 5], got {value}")
            }
            Self::InvalidTimestamps {
                created_at,
                updated_at,
            } => write!(
                f,
                "updated_at ({updated_at}) must be >= created_at ({created_at})"
            ),
        }
    }
}

impl Error for ValidationError {}

/// Shared contract for validated, identifiable catalog records.
///
/// `Patch` carries the partial field set accepted by `apply_update`;
/// `Lookup` names the secondary attributes a repository can search by.
pub trait Entity: Clone + Send + Sync + 'static {
    type Patch;
    type Lookup;

    const KIND: EntityKind;

    fn id(&self) -> EntityId;
    fn created_at(&self) -> i64;
    fn updated_at(&self) -> i64;

    /// Checks the whole record against its rule table, failing on the first
    /// violated rule.
    fn validate(&self) -> Result<(), ValidationError>;

    /// Whether this record satisfies an equality lookup.
    fn matches(&self, lookup: &Self::Lookup) -> bool;

    /// Overwrites the fields present in `patch`, without validating.
    fn merge(&mut self, patch: &Self::Patch);

    /// Sets `updated_at`.
    fn touch(&mut self, updated_at: i64);

    /// Merges `patch`, re-validates the resulting record and refreshes
    /// `updated_at`.
    ///
    /// # Invariants
    /// - On error `self` is left exactly as it was.
    fn apply_update(&mut self, patch: &Self::Patch) -> Result<(), ValidationError> {
        let mut next = self.clone();
        next.merge(patch);
        next.validate()?;
        next.touch(next_updated_at(self.updated_at()));
        *self = next;
        Ok(())
    }
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Returns an update timestamp strictly greater than `previous`.
pub(crate) fn next_updated_at(previous: i64) -> i64 {
    now_epoch_ms().max(previous.saturating_add(1))
}

pub(crate) fn validate_identity(
    id: EntityId,
    created_at: i64,
    updated_at: i64,
) -> Result<(), ValidationError> {
    if id.is_nil() {
        return Err(ValidationError::NilId);
    }
    if updated_at < created_at {
        return Err(ValidationError::InvalidTimestamps {
            created_at,
            updated_at,
        });
    }
    Ok(())
}

/// Requires non-blank text of at most `max_chars` characters.
pub(crate) fn validate_text(
    field: &'static str,
    value: &str,
    max_chars: Option<usize>,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField { field });
    }
    if let Some(max_chars) = max_chars {
        let actual_chars = value.chars().count();
        if actual_chars > max_chars {
            return Err(ValidationError::FieldTooLong {
                field,
                max_chars,
                actual_chars,
            });
        }
    }
    Ok(())
}

pub(crate) fn fields_of<T: Serialize>(value: &T) -> Map<String, Value> {
    match serde_json::to_value(value) {
        Ok(Value::Object(fields)) => fields,
        // Entity structs always serialize to JSON objects.
        _ => Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::{next_updated_at, validate_identity, validate_text, ValidationError};
    use uuid::Uuid;

    #[test]
    fn next_updated_at_is_strictly_increasing() {
        let far_future = i64::MAX - 10;
        assert_eq!(next_updated_at(far_future), far_future + 1);
        assert!(next_updated_at(0) > 0);
    }

    #[test]
    fn validate_text_counts_characters_not_bytes() {
        let accented = "é".repeat(50);
        assert!(validate_text("first_name", &accented, Some(50)).is_ok());

        let err = validate_text("first_name", &"a".repeat(51), Some(50)).unwrap_err();
        assert_eq!(
            err,
            ValidationError::FieldTooLong {
                field: "first_name",
                max_chars: 50,
                actual_chars: 51,
            }
        );
    }

    #[test]
    fn validate_text_rejects_whitespace_only() {
        let err = validate_text("text", "   \n", None).unwrap_err();
        assert_eq!(err, ValidationError::EmptyField { field: "text" });
    }

    #[test]
    fn validate_identity_rejects_nil_and_reversed_timestamps() {
        assert_eq!(
            validate_identity(Uuid::nil(), 1, 1).unwrap_err(),
            ValidationError::NilId
        );
        assert!(matches!(
            validate_identity(Uuid::new_v4(), 10, 5).unwrap_err(),
            ValidationError::InvalidTimestamps { .. }
        ));
    }
}
