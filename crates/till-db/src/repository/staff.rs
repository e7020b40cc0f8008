//! # Staff Repository
//!
//! Staff credentials. The password is stored as an Argon2 PHC string and
//! hashing happens in the API layer; this repository never sees plaintext.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use till_core::Staff;

/// Repository for staff database operations.
#[derive(Debug, Clone)]
pub struct StaffRepository {
    pool: SqlitePool,
}

impl StaffRepository {
    /// Creates a new StaffRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StaffRepository { pool }
    }

    /// Inserts a new staff member.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - Phone number already registered
    pub async fn insert(&self, staff: &Staff) -> DbResult<()> {
        debug!(id = %staff.id, "Inserting staff");

        sqlx::query(
            r#"
            INSERT INTO staff (id, phone_number, name, password_hash, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&staff.id)
        .bind(&staff.phone_number)
        .bind(&staff.name)
        .bind(&staff.password_hash)
        .bind(staff.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from(e).with_value(&staff.phone_number))?;

        Ok(())
    }

    pub async fn get_by_phone(&self, phone_number: &str) -> DbResult<Option<Staff>> {
        let staff = sqlx::query_as::<_, Staff>(
            "SELECT id, phone_number, name, password_hash, created_at FROM staff WHERE phone_number = ?1",
        )
        .bind(phone_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(staff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::{database, timestamp};

    fn staff(phone: &str) -> Staff {
        Staff {
            id: uuid::Uuid::new_v4().to_string(),
            phone_number: phone.to_string(),
            name: "Siti Aminah".to_string(),
            password_hash: "$argon2id$v=19$stub".to_string(),
            created_at: timestamp(0),
        }
    }

    #[tokio::test]
    async fn test_insert_and_get_by_phone() {
        let db = database().await;
        let siti = staff("+628123456789");
        db.staff().insert(&siti).await.unwrap();

        let loaded = db.staff().get_by_phone("+628123456789").await.unwrap();
        assert_eq!(loaded, Some(siti));
        assert!(db.staff().get_by_phone("+628000").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_phone() {
        let db = database().await;
        db.staff().insert(&staff("+628123456789")).await.unwrap();

        let err = db.staff().insert(&staff("+628123456789")).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { ref field, .. } if field == "staff.phone_number"));
    }
}
