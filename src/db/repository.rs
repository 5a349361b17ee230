//! Database repository for users and places.
//!
//! Uses prepared statements; the place insert runs in one transaction.

use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{CreatePlaceRequest, Level, PlaceListing, PlaceReceipt, User};

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ==================== USER OPERATIONS ====================

    /// Insert the user unless the Telegram id is already known.
    ///
    /// An existing row is left untouched, username included. Returns whether a
    /// row was created.
    pub async fn upsert_user(&self, telegram_id: i64, username: &str) -> Result<bool, AppError> {
        let result = sqlx::query("INSERT OR IGNORE INTO users (telegram_id, username) VALUES (?, ?)")
            .bind(telegram_id)
            .bind(username)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Get a user by Telegram id.
    pub async fn get_user(&self, telegram_id: i64) -> Result<Option<User>, AppError> {
        let row = sqlx::query(
            "SELECT telegram_id, username, places_count, level FROM users WHERE telegram_id = ?",
        )
        .bind(telegram_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(user_from_row).transpose()?)
    }

    // ==================== PLACE OPERATIONS ====================

    /// Store a place and bump its author's count and level atomically.
    ///
    /// An unknown author yields [`AppError::NotFound`]; the transaction is rolled
    /// back on drop, so neither the place nor any counter change is stored.
    pub async fn insert_place(&self, place: &CreatePlaceRequest) -> Result<PlaceReceipt, AppError> {
        let mut tx = self.pool.begin().await?;

        // Counter first: the transaction holds the write lock from its first statement.
        let places_count: Option<i64> = sqlx::query_scalar(
            "UPDATE users SET places_count = places_count + 1 WHERE telegram_id = ? RETURNING places_count",
        )
        .bind(place.user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(places_count) = places_count else {
            return Err(AppError::NotFound(format!("User {} not found", place.user_id)));
        };

        let result = sqlx::query(
            "INSERT INTO places (name, category, lat, lon, photo_url, review, user_id) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&place.name)
        .bind(&place.category)
        .bind(place.lat)
        .bind(place.lon)
        .bind(&place.photo_url)
        .bind(&place.review)
        .bind(place.user_id)
        .execute(&mut *tx)
        .await?;

        let level = Level::for_places_count(places_count);
        sqlx::query("UPDATE users SET level = ? WHERE telegram_id = ?")
            .bind(level.as_str())
            .bind(place.user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(PlaceReceipt {
            place_id: result.last_insert_rowid(),
            places_count,
            level,
        })
    }

    /// List all places with their author's username.
    pub async fn list_places(&self) -> Result<Vec<PlaceListing>, AppError> {
        let rows = sqlx::query(
            r#"SELECT p.id, p.name, p.category, p.lat, p.lon, p.photo_url, p.review, u.username
            FROM places p
            JOIN users u ON p.user_id = u.telegram_id
            ORDER BY p.id"#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(place_from_row)
            .collect::<Result<Vec<_>, _>>()?)
    }
}

// Helper functions for row conversion

fn user_from_row(row: &SqliteRow) -> Result<User, sqlx::Error> {
    let level: String = row.try_get("level")?;
    Ok(User {
        telegram_id: row.try_get("telegram_id")?,
        username: row.try_get("username")?,
        places_count: row.try_get("places_count")?,
        level: Level::parse(&level).unwrap_or_default(),
    })
}

fn place_from_row(row: &SqliteRow) -> Result<PlaceListing, sqlx::Error> {
    Ok(PlaceListing {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        category: row.try_get("category")?,
        lat: row.try_get("lat")?,
        lon: row.try_get("lon")?,
        photo_url: row.try_get("photo_url")?,
        review: row.try_get("review")?,
        username: row.try_get("username")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_database;
    use tempfile::TempDir;

    async fn repo() -> (Repository, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let pool = init_database(&temp_dir.path().join("test.db"))
            .await
            .expect("Failed to init DB");
        (Repository::new(pool), temp_dir)
    }

    fn place(user_id: i64, name: &str) -> CreatePlaceRequest {
        CreatePlaceRequest {
            name: name.to_string(),
            category: "coffee".to_string(),
            lat: 55.75,
            lon: 37.61,
            photo_url: None,
            review: "good stop".to_string(),
            user_id,
        }
    }

    async fn user_rows(repo: &Repository, telegram_id: i64) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE telegram_id = ?")
            .bind(telegram_id)
            .fetch_one(&repo.pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_upsert_user_is_idempotent() {
        let (repo, _dir) = repo().await;

        assert!(repo.upsert_user(1, "alice").await.unwrap());
        assert!(!repo.upsert_user(1, "alice").await.unwrap());
        assert_eq!(user_rows(&repo, 1).await, 1);
    }

    #[tokio::test]
    async fn test_upsert_keeps_original_username() {
        let (repo, _dir) = repo().await;

        repo.upsert_user(1, "alice").await.unwrap();
        repo.upsert_user(1, "alice_renamed").await.unwrap();

        let user = repo.get_user(1).await.unwrap().unwrap();
        assert_eq!(user.username.as_deref(), Some("alice"));
        assert_eq!(user.places_count, 0);
        assert_eq!(user.level, Level::Novice);
    }

    #[tokio::test]
    async fn test_get_unknown_user() {
        let (repo, _dir) = repo().await;
        assert!(repo.get_user(404).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_place_updates_count_and_level() {
        let (repo, _dir) = repo().await;
        repo.upsert_user(42, "rover").await.unwrap();

        for i in 0..10 {
            let receipt = repo.insert_place(&place(42, &format!("Stop {}", i))).await.unwrap();
            assert_eq!(receipt.level, Level::Novice);
        }

        let receipt = repo.insert_place(&place(42, "Stop 10")).await.unwrap();
        assert_eq!(receipt.places_count, 11);
        assert_eq!(receipt.level, Level::Seeker);

        let user = repo.get_user(42).await.unwrap().unwrap();
        assert_eq!(user.places_count, 11);
        assert_eq!(user.level, Level::Seeker);
    }

    #[tokio::test]
    async fn test_insert_place_for_unknown_user_stores_nothing() {
        let (repo, _dir) = repo().await;

        let err = repo.insert_place(&place(7, "Ghost diner")).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(repo.list_places().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_places_joins_username() {
        let (repo, _dir) = repo().await;
        assert!(repo.list_places().await.unwrap().is_empty());

        repo.upsert_user(1, "alice").await.unwrap();
        repo.upsert_user(2, "bob").await.unwrap();
        let mut with_photo = place(2, "Barber Y");
        with_photo.photo_url = Some("https://img.example.com/y.jpg".to_string());
        repo.insert_place(&place(1, "Cafe X")).await.unwrap();
        repo.insert_place(&with_photo).await.unwrap();

        let places = repo.list_places().await.unwrap();
        assert_eq!(places.len(), 2);
        assert_eq!(places[0].name, "Cafe X");
        assert_eq!(places[0].username.as_deref(), Some("alice"));
        assert_eq!(places[0].photo_url, None);
        assert_eq!(places[1].username.as_deref(), Some("bob"));
        assert_eq!(
            places[1].photo_url.as_deref(),
            Some("https://img.example.com/y.jpg")
        );
    }

    #[tokio::test]
    async fn test_concurrent_inserts_do_not_lose_updates() {
        let (repo, _dir) = repo().await;
        repo.upsert_user(5, "busy").await.unwrap();

        let mut handles = Vec::new();
        for i in 0..40 {
            let repo = repo.clone();
            handles.push(tokio::spawn(async move {
                repo.insert_place(&place(5, &format!("Spot {}", i))).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let user = repo.get_user(5).await.unwrap().unwrap();
        assert_eq!(user.places_count, 40);
        assert_eq!(user.level, Level::TopCurator);
        assert_eq!(repo.list_places().await.unwrap().len(), 40);
    }
}
