use std::str::FromStr;

use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};
use sqlx_migrator::{Migrate, Plan};
use temp_dir::TempDir;

async fn migrated_pool(dir: &TempDir) -> anyhow::Result<SqlitePool> {
    let path = dir.child("db.sqlite3");
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.to_str().unwrap()))?
        .create_if_missing(true);
    let pool = SqlitePool::connect_with(opts).await?;
    let mut conn = pool.acquire().await?;
    hearth_db::migrator::<sqlx::Sqlite>()?
        .run(&mut conn, &Plan::apply_all())
        .await?;

    Ok(pool)
}

#[tokio::test]
async fn test_migrations_create_tables() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let pool = migrated_pool(&dir).await?;

    let tables: Vec<(String,)> =
        sqlx::query_as("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .fetch_all(&pool)
            .await?;
    let tables: Vec<String> = tables.into_iter().map(|(name,)| name).collect();

    for table in ["recipe", "shopping_item", "shopping_list"] {
        assert!(tables.contains(&table.to_owned()), "missing table {table}");
    }

    Ok(())
}

#[tokio::test]
async fn test_household_title_is_unique() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let pool = migrated_pool(&dir).await?;

    let insert = "INSERT INTO shopping_list (id, household_id, title, created_at) VALUES (?, ?, ?, 0)";
    sqlx::query(insert)
        .bind("01JLIST00000000000000000001")
        .bind("house-1")
        .bind("Groceries")
        .execute(&pool)
        .await?;

    let duplicate = sqlx::query(insert)
        .bind("01JLIST00000000000000000002")
        .bind("house-1")
        .bind("Groceries")
        .execute(&pool)
        .await;

    assert!(duplicate.is_err());

    Ok(())
}
