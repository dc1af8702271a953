use hearth_db::table;
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::ShoppingItem;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("quantity `{quantity}` is not accepted by the item store")]
    QuantityType { quantity: String },

    #[error("item {0} not found")]
    NotFound(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl From<StoreError> for hearth_shared::Error {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound(id) => hearth_shared::Error::NotFound(format!("item {id} not found")),
            other => hearth_shared::Error::Unknown(other.into()),
        }
    }
}

/// How the quantity column is typed by the backing store.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum QuantityMode {
    #[default]
    Text,
    Numeric,
}

/// Quantity written on the single retry after a type mismatch. It satisfies
/// every [`QuantityMode`].
pub const DEFAULT_QUANTITY: &str = "1";

impl QuantityMode {
    fn accepts(&self, quantity: Option<&str>) -> bool {
        match (self, quantity) {
            (QuantityMode::Text, _) | (QuantityMode::Numeric, None) => true,
            (QuantityMode::Numeric, Some(q)) => q.trim().parse::<f64>().is_ok_and(f64::is_finite),
        }
    }
}

/// Row-level writes the reconciliation engine needs from storage.
#[async_trait::async_trait]
pub trait ItemStore: Send + Sync {
    async fn insert_item(&self, item: &ShoppingItem) -> Result<(), StoreError>;

    /// Persists `quantity`, `pending_confirmation` and `auto_added_at`.
    async fn update_item(&self, item: &ShoppingItem) -> Result<(), StoreError>;
}

#[derive(Clone)]
pub struct SqliteItemStore {
    pool: SqlitePool,
    mode: QuantityMode,
}

impl SqliteItemStore {
    pub fn new(pool: SqlitePool, mode: QuantityMode) -> Self {
        Self { pool, mode }
    }

    fn check_quantity(&self, item: &ShoppingItem) -> Result<(), StoreError> {
        if self.mode.accepts(item.quantity.as_deref()) {
            return Ok(());
        }

        Err(StoreError::QuantityType {
            quantity: item.quantity.to_owned().unwrap_or_default(),
        })
    }
}

#[async_trait::async_trait]
impl ItemStore for SqliteItemStore {
    async fn insert_item(&self, item: &ShoppingItem) -> Result<(), StoreError> {
        self.check_quantity(item)?;

        let statement = Query::insert()
            .into_table(table::ShoppingItem::Table)
            .columns([
                table::ShoppingItem::Id,
                table::ShoppingItem::ListId,
                table::ShoppingItem::Name,
                table::ShoppingItem::Quantity,
                table::ShoppingItem::IsComplete,
                table::ShoppingItem::AutoAdded,
                table::ShoppingItem::PendingConfirmation,
                table::ShoppingItem::SourceRecipeId,
                table::ShoppingItem::AutoAddedAt,
                table::ShoppingItem::CreatedBy,
                table::ShoppingItem::CreatedAt,
            ])
            .values_panic([
                item.id.to_owned().into(),
                item.list_id.to_owned().into(),
                item.name.to_owned().into(),
                item.quantity.to_owned().into(),
                item.is_complete.into(),
                item.auto_added.into(),
                item.pending_confirmation.into(),
                item.source_recipe_id.to_owned().into(),
                item.auto_added_at.into(),
                item.created_by.to_owned().into(),
                item.created_at.into(),
            ])
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&self.pool).await?;

        Ok(())
    }

    async fn update_item(&self, item: &ShoppingItem) -> Result<(), StoreError> {
        self.check_quantity(item)?;

        let statement = Query::update()
            .table(table::ShoppingItem::Table)
            .values([
                (table::ShoppingItem::Quantity, item.quantity.to_owned().into()),
                (
                    table::ShoppingItem::PendingConfirmation,
                    item.pending_confirmation.into(),
                ),
                (table::ShoppingItem::AutoAddedAt, item.auto_added_at.into()),
            ])
            .and_where(Expr::col(table::ShoppingItem::Id).eq(&item.id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values).execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(item.id.to_owned()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_mode_accepts_plain_numbers_only() {
        assert!(QuantityMode::Numeric.accepts(Some("2")));
        assert!(QuantityMode::Numeric.accepts(Some(" 1.5 ")));
        assert!(QuantityMode::Numeric.accepts(None));
        assert!(!QuantityMode::Numeric.accepts(Some("2 cups")));
        assert!(!QuantityMode::Numeric.accepts(Some("2 + a pinch")));
        assert!(QuantityMode::Text.accepts(Some("2 cups + a pinch")));
    }

    #[test]
    fn test_quantity_mode_parses_from_config() {
        assert_eq!("numeric".parse::<QuantityMode>().ok(), Some(QuantityMode::Numeric));
        assert_eq!(QuantityMode::Text.to_string(), "text");
    }
}
