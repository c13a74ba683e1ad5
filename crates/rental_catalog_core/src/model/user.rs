//! User domain model.
//!
//! # Responsibility
//! - Validate names and e-mail, and keep the e-mail case-folded.
//! - Hold only an opaque credential hash, never a plaintext password.
//!
//! # Invariants
//! - `first_name` / `last_name` are non-blank and at most 50 characters.
//! - `email` is trimmed, lowercased and matches `EMAIL_RE`.
//! - E-mail uniqueness is enforced above this layer (service + storage).

use super::{
    fields_of, now_epoch_ms, validate_identity, validate_text, Entity, EntityId, EntityKind,
    ValidationError,
};
use crate::credential::CredentialHasher;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

pub const NAME_MAX_CHARS: usize = 50;
pub const PASSWORD_MIN_CHARS: usize = 6;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("valid email regex")
});

/// Registered catalog user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub(crate) id: EntityId,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) email: String,
    #[serde(skip_serializing)]
    pub(crate) credential_hash: Option<String>,
    pub(crate) is_admin: bool,
    pub(crate) created_at: i64,
    pub(crate) updated_at: i64,
}

/// Raw field map accepted when registering a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

/// Raw partial field map accepted when updating a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub is_admin: Option<bool>,
}

/// Entity-level partial update; the password is already hashed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub credential_hash: Option<String>,
    pub is_admin: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserLookup {
    /// Matched after case-folding.
    Email(String),
}

impl User {
    /// Builds a validated user with a generated id.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: &str,
        credential_hash: Option<String>,
        is_admin: bool,
    ) -> Result<Self, ValidationError> {
        let now = now_epoch_ms();
        let user = Self {
            id: Uuid::new_v4(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: normalize_email(email),
            credential_hash,
            is_admin,
            created_at: now,
            updated_at: now,
        };
        user.validate()?;
        Ok(user)
    }

    /// Builds a user from a registration field map, hashing the password
    /// through `hasher` when one is supplied.
    pub fn from_input(
        input: NewUser,
        hasher: &dyn CredentialHasher,
    ) -> Result<Self, ValidationError> {
        let mut user = Self::new(
            input.first_name,
            input.last_name,
            &input.email,
            None,
            input.is_admin,
        )?;
        if let Some(password) = input.password.as_deref() {
            validate_password(password)?;
            user.credential_hash = Some(hasher.hash(password));
        }
        Ok(user)
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn credential_hash(&self) -> Option<&str> {
        self.credential_hash.as_deref()
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    /// Returns `false` when the user has no password set.
    pub fn verify_password(&self, password: &str, hasher: &dyn CredentialHasher) -> bool {
        self.credential_hash
            .as_deref()
            .is_some_and(|hash| hasher.verify(hash, password))
    }

    /// Response projection. Never includes the credential hash.
    pub fn to_fields(&self) -> Map<String, Value> {
        fields_of(self)
    }
}

impl Entity for User {
    type Patch = UserPatch;
    type Lookup = UserLookup;

    const KIND: EntityKind = EntityKind::User;

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
        validate_text("first_name", &self.first_name, Some(NAME_MAX_CHARS))?;
        validate_text("last_name", &self.last_name, Some(NAME_MAX_CHARS))?;
        if !EMAIL_RE.is_match(&self.email) {
            return Err(ValidationError::InvalidEmail(self.email.clone()));
        }
        Ok(())
    }

    fn matches(&self, lookup: &UserLookup) -> bool {
        match lookup {
            UserLookup::Email(email) => self.email == normalize_email(email),
        }
    }

    fn merge(&mut self, patch: &UserPatch) {
        if let Some(first_name) = &patch.first_name {
            self.first_name = first_name.clone();
        }
        if let Some(last_name) = &patch.last_name {
            self.last_name = last_name.clone();
        }
        if let Some(email) = &patch.email {
            self.email = normalize_email(email);
        }
        if let Some(credential_hash) = &patch.credential_hash {
            self.credential_hash = Some(credential_hash.clone());
        }
        if let Some(is_admin) = patch.is_admin {
            self.is_admin = is_admin;
        }
    }

    fn touch(&mut self, updated_at: i64) {
        self.updated_at = updated_at;
    }
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Converts request input into an entity patch, hashing a new password.
    pub fn into_patch(self, hasher: &dyn CredentialHasher) -> Result<UserPatch, ValidationError> {
        let credential_hash = match self.password.as_deref() {
            Some(password) => {
                validate_password(password)?;
                Some(hasher.hash(password))
            }
            None => None,
        };

        Ok(UserPatch {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            credential_hash,
            is_admin: self.is_admin,
        })
    }
}

/// Canonical stored form of an e-mail address.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < PASSWORD_MIN_CHARS {
        return Err(ValidationError::PasswordTooShort {
            min_chars: PASSWORD_MIN_CHARS,
        });
    }
    Ok(())
}
