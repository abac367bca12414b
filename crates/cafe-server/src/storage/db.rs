//! SQLite database layer (embedded, no external dependencies)

use anyhow::{Context, Result};
use cafe_types::{Cafe, NewCafe};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::sync::Arc;

const CAFE_COLUMNS: &str = "id, name, map_url, img_url, location, seats, \
     has_toilet, has_wifi, has_sockets, can_take_calls, coffee_price";

pub struct Database {
    pool: Arc<SqlitePool>,
}

impl Database {
    pub async fn new(database_path: &str, max_connections: u32) -> Result<Self> {
        tracing::info!("Opening SQLite database at: {}", database_path);

        // Create parent directory if needed
        if let Some(parent) = std::path::Path::new(database_path)
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
        {
            tokio::fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create database directory: {}", parent.display())
            })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(database_path)
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .with_context(|| {
                format!("Failed to connect to SQLite database at: {}", database_path)
            })?;

        Self::from_pool(pool).await
    }

    /// Private in-memory database, used by tests
    #[cfg(test)]
    pub async fn in_memory() -> Result<Self> {
        // Every connection to :memory: is a separate database, so keep exactly one
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .context("Failed to open in-memory SQLite database")?;

        Self::from_pool(pool).await
    }

    /// Close every pooled connection; later queries fail
    #[cfg(test)]
    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn from_pool(pool: SqlitePool) -> Result<Self> {
        tracing::info!("SQLite connection established, creating schema...");

        Self::run_migrations(&pool)
            .await
            .context("Failed to create database schema")?;

        tracing::info!("Database initialization complete");

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    async fn run_migrations(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS cafe (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name VARCHAR(250) UNIQUE NOT NULL,
                map_url VARCHAR(500) NOT NULL,
                img_url VARCHAR(500) NOT NULL,
                location VARCHAR(250) NOT NULL,
                seats VARCHAR(250) NOT NULL,
                has_toilet BOOLEAN NOT NULL,
                has_wifi BOOLEAN NOT NULL,
                has_sockets BOOLEAN NOT NULL,
                can_take_calls BOOLEAN NOT NULL,
                coffee_price VARCHAR(250)
            )
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn ping(&self) -> sqlx::Result<()> {
        sqlx::query("SELECT 1").execute(&*self.pool).await?;
        Ok(())
    }

    pub async fn list_cafes(&self) -> sqlx::Result<Vec<Cafe>> {
        let rows: Vec<CafeRow> = sqlx::query_as(&format!(
            "SELECT {} FROM cafe ORDER BY name ASC",
            CAFE_COLUMNS
        ))
        .fetch_all(&*self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    pub async fn find_by_location(&self, location: &str) -> sqlx::Result<Vec<Cafe>> {
        let rows: Vec<CafeRow> = sqlx::query_as(&format!(
            "SELECT {} FROM cafe WHERE location = ?1 ORDER BY name ASC",
            CAFE_COLUMNS
        ))
        .bind(location)
        .fetch_all(&*self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    pub async fn get_cafe(&self, id: i64) -> sqlx::Result<Option<Cafe>> {
        let row: Option<CafeRow> =
            sqlx::query_as(&format!("SELECT {} FROM cafe WHERE id = ?1", CAFE_COLUMNS))
                .bind(id)
                .fetch_optional(&*self.pool)
                .await?;

        Ok(row.map(|r| r.into()))
    }

    pub async fn insert_cafe(&self, cafe: &NewCafe) -> sqlx::Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO cafe (name, map_url, img_url, location, seats,
                              has_toilet, has_wifi, has_sockets, can_take_calls, coffee_price)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&cafe.name)
        .bind(&cafe.map_url)
        .bind(&cafe.img_url)
        .bind(&cafe.location)
        .bind(&cafe.seats)
        .bind(cafe.has_toilet)
        .bind(cafe.has_wifi)
        .bind(cafe.has_sockets)
        .bind(cafe.can_take_calls)
        .bind(&cafe.coffee_price)
        .execute(&*self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Returns false when no cafe has this id
    pub async fn update_coffee_price(&self, id: i64, price: &str) -> sqlx::Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE cafe SET coffee_price = ?1 WHERE id = ?2
            "#,
        )
        .bind(price)
        .bind(id)
        .execute(&*self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Returns false when no cafe has this id
    pub async fn delete_cafe(&self, id: i64) -> sqlx::Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM cafe WHERE id = ?1
            "#,
        )
        .bind(id)
        .execute(&*self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

// Helper struct for sqlx query_as
#[derive(sqlx::FromRow)]
struct CafeRow {
    id: i64,
    name: String,
    map_url: String,
    img_url: String,
    location: String,
    seats: String,
    has_toilet: bool,
    has_wifi: bool,
    has_sockets: bool,
    can_take_calls: bool,
    coffee_price: Option<String>,
}

impl From<CafeRow> for Cafe {
    fn from(r: CafeRow) -> Self {
        Cafe {
            id: r.id,
            name: r.name,
            map_url: r.map_url,
            img_url: r.img_url,
            location: r.location,
            seats: r.seats,
            has_toilet: r.has_toilet,
            has_wifi: r.has_wifi,
            has_sockets: r.has_sockets,
            can_take_calls: r.can_take_calls,
            coffee_price: r.coffee_price,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn new_cafe(name: &str, location: &str) -> NewCafe {
        NewCafe {
            name: name.to_string(),
            map_url: format!("https://maps.example.com/{}", name),
            img_url: format!("https://img.example.com/{}.jpg", name),
            location: location.to_string(),
            seats: "20-30".to_string(),
            has_toilet: true,
            has_wifi: true,
            has_sockets: false,
            can_take_calls: false,
            coffee_price: Some("£2.40".to_string()),
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() -> Result<()> {
        let db = Database::in_memory().await?;

        let cafe = new_cafe("Mare Street Market", "Hackney");
        let id = db.insert_cafe(&cafe).await?;

        let stored = db.get_cafe(id).await?.expect("cafe should exist");
        assert_eq!(stored, cafe.with_id(id));
        assert!(db.get_cafe(id + 1).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_list_is_sorted_by_name() -> Result<()> {
        let db = Database::in_memory().await?;
        for name in ["Social - Holborn", "Barbican Kitchen", "Mare Street Market"] {
            db.insert_cafe(&new_cafe(name, "London")).await?;
        }

        let names: Vec<String> = db.list_cafes().await?.into_iter().map(|c| c.name).collect();
        assert_eq!(
            names,
            vec!["Barbican Kitchen", "Mare Street Market", "Social - Holborn"]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_find_by_location_is_exact() -> Result<()> {
        let db = Database::in_memory().await?;
        db.insert_cafe(&new_cafe("A", "Peckham")).await?;
        db.insert_cafe(&new_cafe("B", "peckham")).await?;
        db.insert_cafe(&new_cafe("C", "Peckham Rye")).await?;

        let found = db.find_by_location("Peckham").await?;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "A");
        assert!(db.find_by_location("Shoreditch").await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_name_is_unique_violation() -> Result<()> {
        let db = Database::in_memory().await?;
        db.insert_cafe(&new_cafe("Dup", "Peckham")).await?;

        let err = db
            .insert_cafe(&new_cafe("Dup", "Bermondsey"))
            .await
            .expect_err("duplicate name must fail");
        let is_unique = err
            .as_database_error()
            .map(|e| e.is_unique_violation())
            .unwrap_or(false);
        assert!(is_unique);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_price_only_touches_price() -> Result<()> {
        let db = Database::in_memory().await?;
        let id = db.insert_cafe(&new_cafe("Priced", "Peckham")).await?;
        let before = db.get_cafe(id).await?.expect("cafe should exist");

        assert!(db.update_coffee_price(id, "£3.10").await?);
        let after = db.get_cafe(id).await?.expect("cafe should exist");

        assert_eq!(after.coffee_price.as_deref(), Some("£3.10"));
        assert_eq!(
            Cafe {
                coffee_price: before.coffee_price.clone(),
                ..after
            },
            before
        );
        assert!(!db.update_coffee_price(id + 100, "£1.00").await?);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete() -> Result<()> {
        let db = Database::in_memory().await?;
        let id = db.insert_cafe(&new_cafe("Closing", "Peckham")).await?;

        assert!(db.delete_cafe(id).await?);
        assert!(db.get_cafe(id).await?.is_none());
        assert!(!db.delete_cafe(id).await?);
        Ok(())
    }
}
