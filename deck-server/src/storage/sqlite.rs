//! SQLite storage backend for swipedeck-server.

use super::{ActionOutcome, NewPerson, PeopleStorage, PersonPage, StoredPerson};
use crate::error::StorageError;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};
use swipedeck_types::{DeviceId, PersonId, Photo, SwipeAction};

/// Listing filter: the device has no like/dislike row for the person.
const UNSEEN: &str =
    "NOT EXISTS (SELECT 1 FROM likes l WHERE l.people_id = p.id AND l.device_id = ?1)";

/// Listing filter: the device's row for the person is a like.
const LIKED: &str = "EXISTS (SELECT 1 FROM likes l \
     WHERE l.people_id = p.id AND l.device_id = ?1 AND l.action = 'like')";

/// SQLite-based people storage.
///
/// Uses WAL mode for concurrent reads/writes.
#[derive(Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl std::fmt::Debug for SqliteStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStorage").finish_non_exhaustive()
    }
}

impl SqliteStorage {
    /// Create a new SQLite storage from a database path.
    ///
    /// Creates the database file if it doesn't exist.
    pub async fn new(path: &Path) -> Result<Self, StorageError> {
        let location = path.to_str().ok_or_else(|| StorageError::InvalidPath {
            path: path.to_path_buf(),
        })?;
        let options = SqliteConnectOptions::from_str(location)
            .map_err(StorageError::Database)?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            .busy_timeout(std::time::Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(10)
            .connect_with(options)
            .await
            .map_err(StorageError::Database)?;

        let storage = Self { pool };
        storage.run_migrations().await?;
        Ok(storage)
    }

    /// Create an in-memory SQLite storage (for testing).
    pub async fn in_memory() -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str(":memory:")
            .map_err(StorageError::Database)?
            .foreign_keys(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(StorageError::Database)?;

        let storage = Self { pool };
        storage.run_migrations().await?;
        Ok(storage)
    }

    /// Run database migrations.
    async fn run_migrations(&self) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS people (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                age INTEGER NOT NULL,
                location TEXT,
                latitude REAL,
                longitude REAL,
                bio TEXT NOT NULL DEFAULT '',
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL,
                deleted_at INTEGER
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(StorageError::Database)?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS pictures (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                people_id INTEGER NOT NULL REFERENCES people(id) ON DELETE CASCADE,
                url TEXT NOT NULL,
                "order" INTEGER NOT NULL DEFAULT 0,
                created_at INTEGER NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(StorageError::Database)?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS likes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                people_id INTEGER NOT NULL REFERENCES people(id) ON DELETE CASCADE,
                device_id TEXT NOT NULL,
                action TEXT NOT NULL CHECK (action IN ('like', 'dislike')),
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL,
                UNIQUE(people_id, device_id)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(StorageError::Database)?;

        // Create indexes
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_pictures_people ON pictures(people_id)")
            .execute(&self.pool)
            .await
            .map_err(StorageError::Database)?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_likes_device ON likes(device_id, action)")
            .execute(&self.pool)
            .await
            .map_err(StorageError::Database)?;

        Ok(())
    }

    fn current_timestamp() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0)
    }

    /// Pictures of one person, ordered by `order`.
    async fn photos_of(&self, people_id: i64) -> Result<Vec<Photo>, StorageError> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT url, "order" FROM pictures
            WHERE people_id = ?1
            ORDER BY "order" ASC, id ASC
            "#,
        )
        .bind(people_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Database)?;

        rows.into_iter()
            .map(|(url, order)| {
                let order = i32::try_from(order)
                    .map_err(|_| StorageError::InvalidRow(format!("picture order {}", order)))?;
                Ok(Photo { url, order })
            })
            .collect()
    }

    /// One page of visible people matching `condition`, which may refer to
    /// the device id as `?1`.
    async fn page_where(
        &self,
        condition: &str,
        device: &DeviceId,
        offset: u64,
        limit: u32,
    ) -> Result<PersonPage, StorageError> {
        let count_sql = format!(
            "SELECT COUNT(*) FROM people p WHERE p.deleted_at IS NULL AND {}",
            condition
        );
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(device.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::Database)?;

        let list_sql = format!(
            "SELECT p.id, p.name, p.age, p.location, p.latitude, p.longitude, p.bio \
             FROM people p WHERE p.deleted_at IS NULL AND {} \
             ORDER BY p.id ASC LIMIT ?2 OFFSET ?3",
            condition
        );
        let rows = sqlx::query_as::<_, PersonRow>(&list_sql)
            .bind(device.as_str())
            .bind(i64::from(limit))
            .bind(i64::try_from(offset).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Database)?;

        let mut people = Vec::with_capacity(rows.len());
        for row in rows {
            let photos = self.photos_of(row.id).await?;
            people.push(row.into_person(photos)?);
        }

        Ok(PersonPage {
            people,
            total: total.max(0) as u64,
        })
    }
}

#[async_trait]
impl PeopleStorage for SqliteStorage {
    async fn insert_person(&self, person: NewPerson) -> Result<PersonId, StorageError> {
        let now = Self::current_timestamp();
        let mut tx = self.pool.begin().await.map_err(StorageError::Database)?;

        let id = sqlx::query(
            r#"
            INSERT INTO people
                (name, age, location, latitude, longitude, bio, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
            "#,
        )
        .bind(&person.name)
        .bind(i64::from(person.age))
        .bind(&person.location)
        .bind(person.latitude)
        .bind(person.longitude)
        .bind(&person.bio)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(StorageError::Database)?
        .last_insert_rowid();

        for photo in &person.photos {
            sqlx::query(
                r#"
                INSERT INTO pictures (people_id, url, "order", created_at)
                VALUES (?1, ?2, ?3, ?4)
                "#,
            )
            .bind(id)
            .bind(&photo.url)
            .bind(photo.order)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(StorageError::Database)?;
        }

        tx.commit().await.map_err(StorageError::Database)?;
        Ok(PersonId::new(id))
    }

    async fn soft_delete_person(&self, id: PersonId) -> Result<bool, StorageError> {
        let result = sqlx::query(
            r#"
            UPDATE people SET deleted_at = ?1, updated_at = ?1
            WHERE id = ?2 AND deleted_at IS NULL
            "#,
        )
        .bind(Self::current_timestamp())
        .bind(id.value())
        .execute(&self.pool)
        .await
        .map_err(StorageError::Database)?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_people(&self) -> Result<u64, StorageError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM people WHERE deleted_at IS NULL")
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::Database)?;

        Ok(count.max(0) as u64)
    }

    async fn unseen_people(
        &self,
        device: &DeviceId,
        offset: u64,
        limit: u32,
    ) -> Result<PersonPage, StorageError> {
        self.page_where(UNSEEN, device, offset, limit).await
    }

    async fn liked_people(
        &self,
        device: &DeviceId,
        offset: u64,
        limit: u32,
    ) -> Result<PersonPage, StorageError> {
        self.page_where(LIKED, device, offset, limit).await
    }

    async fn record_action(
        &self,
        id: PersonId,
        device: &DeviceId,
        action: SwipeAction,
    ) -> Result<ActionOutcome, StorageError> {
        let mut tx = self.pool.begin().await.map_err(StorageError::Database)?;

        let visible: Option<i64> =
            sqlx::query_scalar("SELECT id FROM people WHERE id = ?1 AND deleted_at IS NULL")
                .bind(id.value())
                .fetch_optional(&mut *tx)
                .await
                .map_err(StorageError::Database)?;
        if visible.is_none() {
            return Ok(ActionOutcome::NotFound);
        }

        let existing: Option<String> =
            sqlx::query_scalar("SELECT action FROM likes WHERE people_id = ?1 AND device_id = ?2")
                .bind(id.value())
                .bind(device.as_str())
                .fetch_optional(&mut *tx)
                .await
                .map_err(StorageError::Database)?;
        let previous = existing
            .map(|raw| raw.parse::<SwipeAction>())
            .transpose()
            .map_err(|e| StorageError::InvalidRow(e.to_string()))?;

        if previous == Some(action) {
            return Ok(ActionOutcome::AlreadySet);
        }

        let now = Self::current_timestamp();
        sqlx::query(
            r#"
            INSERT INTO likes (people_id, device_id, action, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?4)
            ON CONFLICT(people_id, device_id)
            DO UPDATE SET action = excluded.action, updated_at = excluded.updated_at
            "#,
        )
        .bind(id.value())
        .bind(device.as_str())
        .bind(action.as_str())
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(StorageError::Database)?;

        tx.commit().await.map_err(StorageError::Database)?;
        Ok(ActionOutcome::Recorded { previous })
    }

    async fn like_count(&self, id: PersonId) -> Result<u64, StorageError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM likes WHERE people_id = ?1 AND action = 'like'",
        )
        .bind(id.value())
        .fetch_one(&self.pool)
        .await
        .map_err(StorageError::Database)?;

        Ok(count.max(0) as u64)
    }
}

/// Internal row type for SQLite queries.
#[derive(sqlx::FromRow)]
struct PersonRow {
    id: i64,
    name: String,
    age: i64,
    location: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    bio: String,
}

impl PersonRow {
    fn into_person(self, photos: Vec<Photo>) -> Result<StoredPerson, StorageError> {
        let age = u32::try_from(self.age).map_err(|_| {
            StorageError::InvalidRow(format!("age {} for person {}", self.age, self.id))
        })?;
        Ok(StoredPerson {
            id: PersonId::new(self.id),
            name: self.name,
            age,
            bio: self.bio,
            location: self.location,
            latitude: self.latitude,
            longitude: self.longitude,
            photos,
        })
    }
}
