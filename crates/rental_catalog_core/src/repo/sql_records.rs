//! Table mappings for the four catalog entities.

use super::sqlite_repo::{bool_to_int, parse_id, SqlRecord};
use super::{RepoError, RepoResult};
use crate::model::amenity::{normalize_amenity_name, Amenity, AmenityLookup};
use crate::model::place::{Place, PlaceLookup};
use crate::model::review::{Review, ReviewLookup};
use crate::model::user::{normalize_email, User, UserLookup};
use crate::model::{Entity, EntityId};
use rusqlite::types::Value;
use rusqlite::{params, Connection, Row, Transaction};

fn text(value: &str) -> Value {
    Value::Text(value.to_string())
}

fn id_value(id: EntityId) -> Value {
    Value::Text(id.to_string())
}

fn read_id(row: &Row<'_>, column: &str, table: &str) -> RepoResult<EntityId> {
    let value: String = row.get(column)?;
    parse_id(&value, &format!("{table}.{column}"))
}

/// Runs the entity's own rule table over a freshly decoded row.
fn checked<E: Entity>(entity: E) -> RepoResult<E> {
    entity.validate().map_err(|err| {
        RepoError::InvalidData(format!("{} {}: {err}", E::KIND, entity.id()))
    })?;
    Ok(entity)
}

impl SqlRecord for User {
    const TABLE: &'static str = "users";
    const SELECT_SQL: &'static str = "SELECT
        id,
        first_name,
        last_name,
        email,
        credential_hash,
        is_admin,
        created_at,
        updated_at
    FROM users";
    const INSERT_SQL: &'static str = "INSERT INTO users (
        id,
        first_name,
        last_name,
        email,
        credential_hash,
        is_admin,
        created_at,
        updated_at
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);";
    const UPDATE_SQL: &'static str = "UPDATE users
    SET
        first_name = ?1,
        last_name = ?2,
        email = ?3,
        credential_hash = ?4,
        is_admin = ?5,
        updated_at = ?6
    WHERE id = ?7;";

    fn insert_values(&self) -> Vec<Value> {
        vec![
            id_value(self.id),
            text(&self.first_name),
            text(&self.last_name),
            text(&self.email),
            self.credential_hash.as_deref().map_or(Value::Null, text),
            Value::Integer(bool_to_int(self.is_admin)),
            Value::Integer(self.created_at),
            Value::Integer(self.updated_at),
        ]
    }

    fn update_values(&self) -> Vec<Value> {
        vec![
            text(&self.first_name),
            text(&self.last_name),
            text(&self.email),
            self.credential_hash.as_deref().map_or(Value::Null, text),
            Value::Integer(bool_to_int(self.is_admin)),
            Value::Integer(self.updated_at),
            id_value(self.id),
        ]
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        let is_admin = match row.get::<_, i64>("is_admin")? {
            0 => false,
            1 => true,
            other => {
                return Err(RepoError::InvalidData(format!(
                    "invalid is_admin value `{other}` in users.is_admin"
                )));
            }
        };

        checked(User {
            id: read_id(row, "id", Self::TABLE)?,
            first_name: row.get("first_name")?,
            last_name: row.get("last_name")?,
            email: row.get("email")?,
            credential_hash: row.get("credential_hash")?,
            is_admin,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    fn lookup_filter(lookup: &UserLookup) -> (&'static str, Vec<Value>) {
        match lookup {
            UserLookup::Email(email) => ("WHERE email = ?1", vec![text(&normalize_email(email))]),
        }
    }
}

impl SqlRecord for Place {
    const TABLE: &'static str = "places";
    const SELECT_SQL: &'static str = "SELECT
        id,
        title,
        description,
        price,
        latitude,
        longitude,
        owner_id,
        created_at,
        updated_at
    FROM places";
    const INSERT_SQL: &'static str = "INSERT INTO places (
        id,
        title,
        description,
        price,
        latitude,
        longitude,
        owner_id,
        created_at,
        updated_at
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);";
    const UPDATE_SQL: &'static str = "UPDATE places
    SET
        title = ?1,
        description = ?2,
        price = ?3,
        latitude = ?4,
        longitude = ?5,
        owner_id = ?6,
        updated_at = ?7
    WHERE id = ?8;";

    fn insert_values(&self) -> Vec<Value> {
        vec![
            id_value(self.id),
            text(&self.title),
            self.description.as_deref().map_or(Value::Null, text),
            Value::Real(self.price),
            Value::Real(self.latitude),
            Value::Real(self.longitude),
            id_value(self.owner_id),
            Value::Integer(self.created_at),
            Value::Integer(self.updated_at),
        ]
    }

    fn update_values(&self) -> Vec<Value> {
        vec![
            text(&self.title),
            self.description.as_deref().map_or(Value::Null, text),
            Value::Real(self.price),
            Value::Real(self.latitude),
            Value::Real(self.longitude),
            id_value(self.owner_id),
            Value::Integer(self.updated_at),
            id_value(self.id),
        ]
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        checked(Place {
            id: read_id(row, "id", Self::TABLE)?,
            title: row.get("title")?,
            description: row.get("description")?,
            price: row.get("price")?,
            latitude: row.get("latitude")?,
            longitude: row.get("longitude")?,
            owner_id: read_id(row, "owner_id", Self::TABLE)?,
            amenity_ids: Vec::new(),
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    fn lookup_filter(lookup: &PlaceLookup) -> (&'static str, Vec<Value>) {
        match *lookup {
            PlaceLookup::Owner(owner_id) => ("WHERE owner_id = ?1", vec![id_value(owner_id)]),
            PlaceLookup::Amenity(amenity_id) => (
                "WHERE id IN (
                    SELECT place_id
                    FROM place_amenities
                    WHERE amenity_id = ?1
                )",
                vec![id_value(amenity_id)],
            ),
        }
    }

    fn load_links(&mut self, conn: &Connection) -> RepoResult<()> {
        let mut stmt = conn.prepare(
            "SELECT amenity_id
             FROM place_amenities
             WHERE place_id = ?1
             ORDER BY position ASC;",
        )?;
        let mut rows = stmt.query([self.id.to_string()])?;
        let mut amenity_ids = Vec::new();
        while let Some(row) = rows.next()? {
            amenity_ids.push(read_id(row, "amenity_id", "place_amenities")?);
        }
        self.amenity_ids = amenity_ids;
        Ok(())
    }

    fn store_links(&self, tx: &Transaction<'_>) -> RepoResult<()> {
        let place_id = self.id.to_string();
        tx.execute(
            "DELETE FROM place_amenities WHERE place_id = ?1;",
            [place_id.as_str()],
        )?;
        for (position, amenity_id) in (0_i64..).zip(&self.amenity_ids) {
            tx.execute(
                "INSERT INTO place_amenities (place_id, amenity_id, position)
                 VALUES (?1, ?2, ?3);",
                params![place_id.as_str(), amenity_id.to_string(), position],
            )?;
        }
        Ok(())
    }
}

impl SqlRecord for Review {
    const TABLE: &'static str = "reviews";
    const SELECT_SQL: &'static str = "SELECT
        id,
        text,
        rating,
        place_id,
        user_id,
        created_at,
        updated_at
    FROM reviews";
    const INSERT_SQL: &'static str = "INSERT INTO reviews (
        id,
        text,
        rating,
        place_id,
        user_id,
        created_at,
        updated_at
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);";
    const UPDATE_SQL: &'static str = "UPDATE reviews
    SET
        text = ?1,
        rating = ?2,
        updated_at = ?3
    WHERE id = ?4;";

    fn insert_values(&self) -> Vec<Value> {
        vec![
            id_value(self.id),
            text(&self.text),
            Value::Integer(self.rating),
            id_value(self.place_id),
            id_value(self.user_id),
            Value::Integer(self.created_at),
            Value::Integer(self.updated_at),
        ]
    }

    fn update_values(&self) -> Vec<Value> {
        vec![
            text(&self.text),
            Value::Integer(self.rating),
            Value::Integer(self.updated_at),
            id_value(self.id),
        ]
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        checked(Review {
            id: read_id(row, "id", Self::TABLE)?,
            text: row.get("text")?,
            rating: row.get("rating")?,
            place_id: read_id(row, "place_id", Self::TABLE)?,
            user_id: read_id(row, "user_id", Self::TABLE)?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    fn lookup_filter(lookup: &ReviewLookup) -> (&'static str, Vec<Value>) {
        match *lookup {
            ReviewLookup::Place(place_id) => ("WHERE place_id = ?1", vec![id_value(place_id)]),
            ReviewLookup::User(user_id) => ("WHERE user_id = ?1", vec![id_value(user_id)]),
            ReviewLookup::PlaceAndUser { place_id, user_id } => (
                "WHERE place_id = ?1 AND user_id = ?2",
                vec![id_value(place_id), id_value(user_id)],
            ),
        }
    }
}

impl SqlRecord for Amenity {
    const TABLE: &'static str = "amenities";
    const SELECT_SQL: &'static str = "SELECT
        id,
        name,
        created_at,
        updated_at
    FROM amenities";
    const INSERT_SQL: &'static str = "INSERT INTO amenities (
        id,
        name,
        created_at,
        updated_at
    ) VALUES (?1, ?2, ?3, ?4);";
    const UPDATE_SQL: &'static str = "UPDATE amenities
    SET
        name = ?1,
        updated_at = ?2
    WHERE id = ?3;";

    fn insert_values(&self) -> Vec<Value> {
        vec![
            id_value(self.id),
            text(&self.name),
            Value::Integer(self.created_at),
            Value::Integer(self.updated_at),
        ]
    }

    fn update_values(&self) -> Vec<Value> {
        vec![
            text(&self.name),
            Value::Integer(self.updated_at),
            id_value(self.id),
        ]
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        checked(Amenity {
            id: read_id(row, "id", Self::TABLE)?,
            name: row.get("name")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    fn lookup_filter(lookup: &AmenityLookup) -> (&'static str, Vec<Value>) {
        match lookup {
            AmenityLookup::Name(name) => {
                ("WHERE name = ?1", vec![text(&normalize_amenity_name(name))])
            }
        }
    }
}
