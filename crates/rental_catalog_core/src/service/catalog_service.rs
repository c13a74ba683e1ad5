//! Catalog facade use-cases.
//!
//! # Responsibility
//! - Be the only component that touches more than one repository.
//! - Enforce cross-entity rules before a mutation is committed: e-mail and
//!   amenity-name uniqueness, one review per user/place pair, and existence
//!   of referenced owners, places, users and amenities.
//! - Sequence cascading deletes (children first, then parent).
//!
//! # Invariants
//! - Field-level rules stay in the model; this layer only sequences calls.
//! - Update paths re-check uniqueness/references only for changed fields.
//! - Deletes are idempotent: an absent id returns `Ok(false)`.
//! - No locking around check-then-act sequences. The SQLite backend closes
//!   the race with unique indexes; the in-memory backend does not.
//! - Log events carry ids and outcome kinds only, never e-mail or hashes.

use crate::config::StorageConfig;
use crate::credential::{CredentialHasher, Sha256CredentialHasher};
use crate::db::{open_shared, open_shared_in_memory, DbError, SharedConnection};
use crate::model::amenity::{
    normalize_amenity_name, Amenity, AmenityLookup, AmenityPatch, NewAmenity,
};
use crate::model::place::{NewPlace, Place, PlaceLookup, PlacePatch};
use crate::model::review::{NewReview, Review, ReviewLookup, ReviewPatch};
use crate::model::user::{normalize_email, NewUser, User, UserLookup, UserUpdate};
use crate::model::{Entity, EntityId, EntityKind, ValidationError};
use crate::repo::{InMemoryRepository, RepoError, Repository, SqliteRepository};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Failure kind exposed to the request layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Referential,
    Conflict,
    Storage,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::Referential => "referential",
            Self::Conflict => "conflict",
            Self::Storage => "storage",
        }
    }
}

/// Facade error taxonomy.
#[derive(Debug)]
pub enum CatalogError {
    /// A field value violates the entity rule table.
    Validation(ValidationError),
    /// The operation targets an id that does not resolve.
    NotFound { kind: EntityKind, id: EntityId },
    /// A referenced owner/place/user/amenity does not exist.
    Referential(String),
    /// A uniqueness rule was violated.
    Conflict(String),
    /// Backend failure unrelated to catalog rules.
    Storage(RepoError),
}

impl CatalogError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Referential(_) => ErrorKind::Referential,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::Storage(_) => ErrorKind::Storage,
        }
    }

    fn missing_reference(kind: EntityKind, id: EntityId) -> Self {
        Self::Referential(format!("{kind} does not exist: {id}"))
    }
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::Referential(message) => write!(f, "invalid reference: {message}"),
            Self::Conflict(message) => write!(f, "conflict: {message}"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CatalogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for CatalogError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for CatalogError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::NotFound { kind, id } => Self::NotFound { kind, id },
            RepoError::Conflict(message) => Self::Conflict(message),
            RepoError::ForeignKey(message) => Self::Referential(message),
            other => Self::Storage(other),
        }
    }
}

impl From<DbError> for CatalogError {
    fn from(value: DbError) -> Self {
        Self::from(RepoError::from(value))
    }
}

/// Entity counts, used by health probes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogSummary {
    pub users: usize,
    pub places: usize,
    pub reviews: usize,
    pub amenities: usize,
}

/// Cross-entity orchestration over one repository per entity type.
pub struct CatalogFacade {
    users: Box<dyn Repository<User>>,
    places: Box<dyn Repository<Place>>,
    reviews: Box<dyn Repository<Review>>,
    amenities: Box<dyn Repository<Amenity>>,
    hasher: Box<dyn CredentialHasher>,
    backend: &'static str,
}

impl CatalogFacade {
    /// Assembles a facade from explicit repositories.
    pub fn new(
        users: Box<dyn Repository<User>>,
        places: Box<dyn Repository<Place>>,
        reviews: Box<dyn Repository<Review>>,
        amenities: Box<dyn Repository<Amenity>>,
    ) -> Self {
        Self {
            users,
            places,
            reviews,
            amenities,
            hasher: Box::new(Sha256CredentialHasher),
            backend: "custom",
        }
    }

    /// Transient backend; data lives as long as the facade.
    pub fn in_memory() -> Self {
        let mut facade = Self::new(
            Box::new(InMemoryRepository::<User>::new()),
            Box::new(InMemoryRepository::<Place>::new()),
            Box::new(InMemoryRepository::<Review>::new()),
            Box::new(InMemoryRepository::<Amenity>::new()),
        );
        facade.backend = "memory";
        facade
    }

    /// Durable backend over one migrated connection.
    ///
    /// # Errors
    /// - `Storage` when the connection is not migrated to the latest schema.
    pub fn sqlite(conn: SharedConnection) -> CatalogResult<Self> {
        let mut facade = Self::new(
            Box::new(SqliteRepository::<User>::try_new(conn.clone())?),
            Box::new(SqliteRepository::<Place>::try_new(conn.clone())?),
            Box::new(SqliteRepository::<Review>::try_new(conn.clone())?),
            Box::new(SqliteRepository::<Amenity>::try_new(conn)?),
        );
        facade.backend = "sqlite";
        Ok(facade)
    }

    /// Opens the backend selected by `config`.
    pub fn from_config(config: &StorageConfig) -> CatalogResult<Self> {
        let mut facade = match config {
            StorageConfig::Memory => Self::in_memory(),
            StorageConfig::SqliteMemory => Self::sqlite(open_shared_in_memory()?)?,
            StorageConfig::Sqlite { path } => Self::sqlite(open_shared(path)?)?,
        };
        facade.backend = config.backend_name();
        info!(
            "event=catalog_open module=catalog status=ok backend={}",
            facade.backend
        );
        Ok(facade)
    }

    /// Replaces the credential hashing collaborator.
    pub fn with_hasher(mut self, hasher: impl CredentialHasher + 'static) -> Self {
        self.hasher = Box::new(hasher);
        self
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend
    }

    // ---- users -------------------------------------------------------

    /// Registers a user; the e-mail must not be taken (case-insensitive).
    pub fn create_user(&self, input: NewUser) -> CatalogResult<User> {
        let result = (|| -> CatalogResult<User> {
            let user = User::from_input(input, self.hasher.as_ref())?;
            self.ensure_email_free(user.email(), None)?;
            self.users.add(&user)?;
            Ok(user)
        })();
        self.finish("user_create", created_id(&result), result)
    }

    pub fn get_user(&self, id: EntityId) -> CatalogResult<Option<User>> {
        Ok(self.users.get(id)?)
    }

    pub fn get_all_users(&self) -> CatalogResult<Vec<User>> {
        Ok(self.users.get_all()?)
    }

    pub fn get_user_by_email(&self, email: &str) -> CatalogResult<Option<User>> {
        Ok(self
            .users
            .get_by_attribute(&UserLookup::Email(email.to_string()))?)
    }

    /// Partially updates a user. A new password is re-hashed.
    pub fn update_user(&self, id: EntityId, update: UserUpdate) -> CatalogResult<User> {
        let result = (|| -> CatalogResult<User> {
            let current = self.require_user(id)?;
            let patch = update.into_patch(self.hasher.as_ref())?;
            if let Some(email) = patch.email.as_deref() {
                let email = normalize_email(email);
                if email != current.email() {
                    self.ensure_email_free(&email, Some(id))?;
                }
            }
            Ok(self.users.update(id, &patch)?)
        })();
        self.finish("user_update", Some(id), result)
    }

    /// Deletes a user with every review they wrote and every place they own
    /// (including the reviews of those places).
    pub fn delete_user(&self, id: EntityId) -> CatalogResult<bool> {
        let result = (|| -> CatalogResult<bool> {
            if self.users.get(id)?.is_none() {
                return Ok(false);
            }
            for review in self.reviews.list_by_attribute(&ReviewLookup::User(id))? {
                self.reviews.delete(review.id())?;
            }
            for place in self.places.list_by_attribute(&PlaceLookup::Owner(id))? {
                self.remove_place(place.id())?;
            }
            self.users.delete(id)?;
            Ok(true)
        })();
        self.finish("user_delete", Some(id), result)
    }

    /// Returns the user whose stored password matches, if any.
    pub fn authenticate(&self, email: &str, password: &str) -> CatalogResult<Option<User>> {
        let user = self
            .get_user_by_email(email)?
            .filter(|user| user.verify_password(password, self.hasher.as_ref()));
        match &user {
            Some(user) => info!(
                "event=user_authenticate module=catalog status=ok id={}",
                user.id()
            ),
            None => warn!("event=user_authenticate module=catalog status=rejected"),
        }
        Ok(user)
    }

    // ---- places ------------------------------------------------------

    /// Creates a place for an existing owner with existing amenities.
    pub fn create_place(&self, input: NewPlace) -> CatalogResult<Place> {
        let result = (|| -> CatalogResult<Place> {
            let place = Place::new(input)?;
            self.ensure_user_exists(place.owner_id())?;
            self.ensure_amenities_exist(place.amenity_ids())?;
            self.places.add(&place)?;
            Ok(place)
        })();
        self.finish("place_create", created_id(&result), result)
    }

    pub fn get_place(&self, id: EntityId) -> CatalogResult<Option<Place>> {
        Ok(self.places.get(id)?)
    }

    pub fn get_all_places(&self) -> CatalogResult<Vec<Place>> {
        Ok(self.places.get_all()?)
    }

    /// Places owned by an existing user.
    pub fn get_places_by_owner(&self, owner_id: EntityId) -> CatalogResult<Vec<Place>> {
        self.require_user(owner_id)?;
        Ok(self.places.list_by_attribute(&PlaceLookup::Owner(owner_id))?)
    }

    /// Partially updates a place. A changed owner or newly linked amenities
    /// must exist.
    pub fn update_place(&self, id: EntityId, patch: PlacePatch) -> CatalogResult<Place> {
        let result = (|| -> CatalogResult<Place> {
            let current = self.require_place(id)?;
            if let Some(owner_id) = patch.owner_id {
                if owner_id != current.owner_id() {
                    self.ensure_user_exists(owner_id)?;
                }
            }
            if let Some(amenity_ids) = patch.amenity_ids.as_deref() {
                let added: Vec<EntityId> = amenity_ids
                    .iter()
                    .copied()
                    .filter(|amenity_id| !current.has_amenity(*amenity_id))
                    .collect();
                self.ensure_amenities_exist(&added)?;
            }
            Ok(self.places.update(id, &patch)?)
        })();
        self.finish("place_update", Some(id), result)
    }

    /// Deletes a place and its reviews.
    pub fn delete_place(&self, id: EntityId) -> CatalogResult<bool> {
        let result = (|| -> CatalogResult<bool> {
            if self.places.get(id)?.is_none() {
                return Ok(false);
            }
            self.remove_place(id)?;
            Ok(true)
        })();
        self.finish("place_delete", Some(id), result)
    }

    /// Mean rating of a place's reviews, rounded to two decimals.
    /// Returns `0.0` when the place has no reviews.
    pub fn average_rating(&self, place_id: EntityId) -> CatalogResult<f64> {
        let reviews = self.get_reviews_by_place(place_id)?;
        if reviews.is_empty() {
            return Ok(0.0);
        }
        let total: i64 = reviews.iter().map(Review::rating).sum();
        let mean = total as f64 / reviews.len() as f64;
        Ok((mean * 100.0).round() / 100.0)
    }

    // ---- place amenities -----------------------------------------------

    /// Links an existing amenity to a place. Linking twice is a no-op.
    pub fn add_place_amenity(
        &self,
        place_id: EntityId,
        amenity_id: EntityId,
    ) -> CatalogResult<Place> {
        let result = (|| -> CatalogResult<Place> {
            let place = self.require_place(place_id)?;
            self.ensure_amenities_exist(&[amenity_id])?;
            if place.has_amenity(amenity_id) {
                return Ok(place);
            }
            let mut amenity_ids = place.amenity_ids().to_vec();
            amenity_ids.push(amenity_id);
            self.replace_amenities(place_id, amenity_ids)
        })();
        self.finish("place_amenity_add", Some(place_id), result)
    }

    /// Unlinks an amenity from a place. Unlinking a missing link is a no-op.
    pub fn remove_place_amenity(
        &self,
        place_id: EntityId,
        amenity_id: EntityId,
    ) -> CatalogResult<Place> {
        let result = (|| -> CatalogResult<Place> {
            let place = self.require_place(place_id)?;
            if !place.has_amenity(amenity_id) {
                return Ok(place);
            }
            self.replace_amenities(place_id, without(place.amenity_ids(), amenity_id))
        })();
        self.finish("place_amenity_remove", Some(place_id), result)
    }

    /// Amenities linked to a place, in link order.
    pub fn get_place_amenities(&self, place_id: EntityId) -> CatalogResult<Vec<Amenity>> {
        let place = self.require_place(place_id)?;
        let mut amenities = Vec::with_capacity(place.amenity_ids().len());
        for amenity_id in place.amenity_ids() {
            if let Some(amenity) = self.amenities.get(*amenity_id)? {
                amenities.push(amenity);
            }
        }
        Ok(amenities)
    }

    // ---- reviews -----------------------------------------------------

    /// Creates a review; place and author must exist and the author must
    /// not have reviewed this place before.
    pub fn create_review(&self, input: NewReview) -> CatalogResult<Review> {
        let result = (|| -> CatalogResult<Review> {
            let review = Review::new(input)?;
            if self.places.get(review.place_id())?.is_none() {
                return Err(CatalogError::missing_reference(
                    EntityKind::Place,
                    review.place_id(),
                ));
            }
            self.ensure_user_exists(review.user_id())?;

            let pair = ReviewLookup::PlaceAndUser {
                place_id: review.place_id(),
                user_id: review.user_id(),
            };
            if self.reviews.get_by_attribute(&pair)?.is_some() {
                return Err(CatalogError::Conflict(format!(
                    "user {} already reviewed place {}",
                    review.user_id(),
                    review.place_id()
                )));
            }
            self.reviews.add(&review)?;
            Ok(review)
        })();
        self.finish("review_create", created_id(&result), result)
    }

    pub fn get_review(&self, id: EntityId) -> CatalogResult<Option<Review>> {
        Ok(self.reviews.get(id)?)
    }

    pub fn get_all_reviews(&self) -> CatalogResult<Vec<Review>> {
        Ok(self.reviews.get_all()?)
    }

    /// Reviews of an existing place.
    pub fn get_reviews_by_place(&self, place_id: EntityId) -> CatalogResult<Vec<Review>> {
        self.require_place(place_id)?;
        Ok(self
            .reviews
            .list_by_attribute(&ReviewLookup::Place(place_id))?)
    }

    /// Reviews written by an existing user.
    pub fn get_reviews_by_user(&self, user_id: EntityId) -> CatalogResult<Vec<Review>> {
        self.require_user(user_id)?;
        Ok(self
            .reviews
            .list_by_attribute(&ReviewLookup::User(user_id))?)
    }

    /// Updates review text and/or rating; links are fixed at creation.
    pub fn update_review(&self, id: EntityId, patch: ReviewPatch) -> CatalogResult<Review> {
        let result = self.reviews.update(id, &patch).map_err(CatalogError::from);
        self.finish("review_update", Some(id), result)
    }

    pub fn delete_review(&self, id: EntityId) -> CatalogResult<bool> {
        let result = (|| -> CatalogResult<bool> {
            if self.reviews.get(id)?.is_none() {
                return Ok(false);
            }
            self.reviews.delete(id)?;
            Ok(true)
        })();
        self.finish("review_delete", Some(id), result)
    }

    // ---- amenities ---------------------------------------------------

    /// Creates an amenity; names are unique after trimming.
    pub fn create_amenity(&self, input: NewAmenity) -> CatalogResult<Amenity> {
        let result = (|| -> CatalogResult<Amenity> {
            let amenity = Amenity::new(input)?;
            self.ensure_amenity_name_free(amenity.name(), None)?;
            self.amenities.add(&amenity)?;
            Ok(amenity)
        })();
        self.finish("amenity_create", created_id(&result), result)
    }

    pub fn get_amenity(&self, id: EntityId) -> CatalogResult<Option<Amenity>> {
        Ok(self.amenities.get(id)?)
    }

    pub fn get_all_amenities(&self) -> CatalogResult<Vec<Amenity>> {
        Ok(self.amenities.get_all()?)
    }

    pub fn get_amenity_by_name(&self, name: &str) -> CatalogResult<Option<Amenity>> {
        Ok(self
            .amenities
            .get_by_attribute(&AmenityLookup::Name(name.to_string()))?)
    }

    pub fn update_amenity(&self, id: EntityId, patch: AmenityPatch) -> CatalogResult<Amenity> {
        let result = (|| -> CatalogResult<Amenity> {
            let current = self.require_amenity(id)?;
            if let Some(name) = patch.name.as_deref() {
                let name = normalize_amenity_name(name);
                if name != current.name() {
                    self.ensure_amenity_name_free(&name, Some(id))?;
                }
            }
            Ok(self.amenities.update(id, &patch)?)
        })();
        self.finish("amenity_update", Some(id), result)
    }

    /// Unlinks the amenity from every place, then deletes it.
    pub fn delete_amenity(&self, id: EntityId) -> CatalogResult<bool> {
        let result = (|| -> CatalogResult<bool> {
            if self.amenities.get(id)?.is_none() {
                return Ok(false);
            }
            for place in self.places.list_by_attribute(&PlaceLookup::Amenity(id))? {
                self.replace_amenities(place.id(), without(place.amenity_ids(), id))?;
            }
            self.amenities.delete(id)?;
            Ok(true)
        })();
        self.finish("amenity_delete", Some(id), result)
    }

    /// Entity counts across all four repositories.
    pub fn summary(&self) -> CatalogResult<CatalogSummary> {
        Ok(CatalogSummary {
            users: self.users.get_all()?.len(),
            places: self.places.get_all()?.len(),
            reviews: self.reviews.get_all()?.len(),
            amenities: self.amenities.get_all()?.len(),
        })
    }

    // ---- helpers -----------------------------------------------------

    fn require_user(&self, id: EntityId) -> CatalogResult<User> {
        self.users.get(id)?.ok_or(CatalogError::NotFound {
            kind: EntityKind::User,
            id,
        })
    }

    fn require_place(&self, id: EntityId) -> CatalogResult<Place> {
        self.places.get(id)?.ok_or(CatalogError::NotFound {
            kind: EntityKind::Place,
            id,
        })
    }

    fn require_amenity(&self, id: EntityId) -> CatalogResult<Amenity> {
        self.amenities.get(id)?.ok_or(CatalogError::NotFound {
            kind: EntityKind::Amenity,
            id,
        })
    }

    fn ensure_user_exists(&self, id: EntityId) -> CatalogResult<()> {
        match self.users.get(id)? {
            Some(_) => Ok(()),
            None => Err(CatalogError::missing_reference(EntityKind::User, id)),
        }
    }

    fn ensure_amenities_exist(&self, amenity_ids: &[EntityId]) -> CatalogResult<()> {
        for amenity_id in amenity_ids {
            if self.amenities.get(*amenity_id)?.is_none() {
                return Err(CatalogError::missing_reference(
                    EntityKind::Amenity,
                    *amenity_id,
                ));
            }
        }
        Ok(())
    }

    fn ensure_email_free(&self, email: &str, owner: Option<EntityId>) -> CatalogResult<()> {
        let existing = self
            .users
            .get_by_attribute(&UserLookup::Email(email.to_string()))?;
        match existing {
            Some(user) if Some(user.id()) != owner => Err(CatalogError::Conflict(
                "email is already registered".to_string(),
            )),
            _ => Ok(()),
        }
    }

    fn ensure_amenity_name_free(&self, name: &str, owner: Option<EntityId>) -> CatalogResult<()> {
        let existing = self
            .amenities
            .get_by_attribute(&AmenityLookup::Name(name.to_string()))?;
        match existing {
            Some(amenity) if Some(amenity.id()) != owner => Err(CatalogError::Conflict(format!(
                "amenity name already exists: {name}"
            ))),
            _ => Ok(()),
        }
    }

    /// Deletes a place's reviews, then the place itself.
    fn remove_place(&self, place_id: EntityId) -> CatalogResult<()> {
        for review in self
            .reviews
            .list_by_attribute(&ReviewLookup::Place(place_id))?
        {
            self.reviews.delete(review.id())?;
        }
        self.places.delete(place_id)?;
        Ok(())
    }

    fn replace_amenities(
        &self,
        place_id: EntityId,
        amenity_ids: Vec<EntityId>,
    ) -> CatalogResult<Place> {
        let patch = PlacePatch {
            amenity_ids: Some(amenity_ids),
            ..PlacePatch::default()
        };
        Ok(self.places.update(place_id, &patch)?)
    }

    fn finish<T>(
        &self,
        event: &'static str,
        id: Option<EntityId>,
        result: CatalogResult<T>,
    ) -> CatalogResult<T> {
        let id = id.map_or_else(|| "-".to_string(), |id| id.to_string());
        match &result {
            Ok(_) => info!(
                "event={event} module=catalog status=ok backend={} id={id}",
                self.backend
            ),
            Err(CatalogError::Storage(err)) => error!(
                "event={event} module=catalog status=error backend={} id={id} error_kind=storage error={err}",
                self.backend
            ),
            Err(err) => warn!(
                "event={event} module=catalog status=rejected backend={} id={id} error_kind={}",
                self.backend,
                err.kind().as_str()
            ),
        }
        result
    }
}

fn created_id<E: Entity>(result: &CatalogResult<E>) -> Option<EntityId> {
    result.as_ref().ok().map(Entity::id)
}

fn without(ids: &[EntityId], removed: EntityId) -> Vec<EntityId> {
    ids.iter().copied().filter(|id| *id != removed).collect()
}

#[cfg(test)]
mod tests {
    use super::{CatalogError, CatalogFacade, ErrorKind};
    use crate::model::amenity::NewAmenity;
    use crate::model::user::NewUser;
    use crate::model::{Entity, EntityId, EntityKind, ValidationError};
    use crate::repo::RepoError;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: email.to_string(),
            ..NewUser::default()
        }
    }

    #[test]
    fn repo_errors_map_to_catalog_kinds() {
        let id = EntityId::new_v4();
        let cases = [
            (
                RepoError::NotFound {
                    kind: EntityKind::Place,
                    id,
                },
                ErrorKind::NotFound,
            ),
            (RepoError::Conflict("dup".to_string()), ErrorKind::Conflict),
            (
                RepoError::ForeignKey("FOREIGN KEY constraint failed".to_string()),
                ErrorKind::Referential,
            ),
            (
                RepoError::Validation(ValidationError::NilId),
                ErrorKind::Validation,
            ),
            (
                RepoError::InvalidData("bad row".to_string()),
                ErrorKind::Storage,
            ),
        ];
        for (repo_error, expected) in cases {
            assert_eq!(CatalogError::from(repo_error).kind(), expected);
        }
    }

    #[test]
    fn update_keeping_own_email_is_not_a_conflict() {
        let facade = CatalogFacade::in_memory();
        let user = facade.create_user(new_user("ada@example.com")).unwrap();

        let updated = facade
            .update_user(
                user.id(),
                crate::model::user::UserUpdate {
                    email: Some("ADA@example.com".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.email(), "ada@example.com");
        assert!(updated.updated_at() > user.updated_at());
    }

    #[test]
    fn renaming_amenity_to_taken_name_conflicts() {
        let facade = CatalogFacade::in_memory();
        facade
            .create_amenity(NewAmenity {
                name: "WiFi".to_string(),
            })
            .unwrap();
        let pool = facade
            .create_amenity(NewAmenity {
                name: "Pool".to_string(),
            })
            .unwrap();

        let err = facade
            .update_amenity(
                pool.id(),
                crate::model::amenity::AmenityPatch {
                    name: Some(" WiFi ".to_string()),
                },
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn backend_names_follow_constructor() {
        assert_eq!(CatalogFacade::in_memory().backend_name(), "memory");
    }
}
