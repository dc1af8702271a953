use hearth_db::table;
use sea_query::{Expr, ExprTrait, Order, Query as SqlQuery, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::SqlitePool;

use crate::{ListCounts, Recipe, ShoppingItem, ShoppingList, model::RecipeRow};

const ITEM_COLUMNS: [table::ShoppingItem; 11] = [
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
];

const LIST_COLUMNS: [table::ShoppingList; 7] = [
    table::ShoppingList::Id,
    table::ShoppingList::HouseholdId,
    table::ShoppingList::Title,
    table::ShoppingList::TotalItems,
    table::ShoppingList::CompletedItems,
    table::ShoppingList::CreatedAt,
    table::ShoppingList::UpdatedAt,
];

/// Read side over the replica pool.
#[derive(Clone)]
pub struct Query(pub SqlitePool);

impl Query {
    pub async fn find_list(&self, id: impl Into<String>) -> hearth_shared::Result<Option<ShoppingList>> {
        find_list(&self.0, &id.into()).await
    }

    pub async fn find_recipe(&self, id: impl Into<String>) -> hearth_shared::Result<Option<Recipe>> {
        find_recipe(&self.0, &id.into()).await
    }

    pub async fn list_items(&self, list_id: impl Into<String>) -> hearth_shared::Result<Vec<ShoppingItem>> {
        list_items(&self.0, &list_id.into()).await
    }

    /// Auto-added items still awaiting a decision, most recent first.
    pub async fn pending_items(&self, list_id: impl Into<String>) -> hearth_shared::Result<Vec<ShoppingItem>> {
        let statement = SqlQuery::select()
            .columns(ITEM_COLUMNS)
            .from(table::ShoppingItem::Table)
            .and_where(Expr::col(table::ShoppingItem::ListId).eq(list_id.into()))
            .and_where(Expr::col(table::ShoppingItem::AutoAdded).eq(true))
            .and_where(Expr::col(table::ShoppingItem::PendingConfirmation).eq(true))
            .order_by(table::ShoppingItem::AutoAddedAt, Order::Desc)
            .order_by_expr(Expr::cust("rowid"), Order::Desc)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, ShoppingItem, _>(&sql, values)
            .fetch_all(&self.0)
            .await?)
    }

    /// Counts straight from the item table, bypassing the list's stored columns.
    pub async fn count_items(&self, list_id: impl Into<String>) -> hearth_shared::Result<ListCounts> {
        count_items(&self.0, &list_id.into()).await
    }
}

pub(crate) async fn find_list(pool: &SqlitePool, id: &str) -> hearth_shared::Result<Option<ShoppingList>> {
    let statement = SqlQuery::select()
        .columns(LIST_COLUMNS)
        .from(table::ShoppingList::Table)
        .and_where(Expr::col(table::ShoppingList::Id).eq(id))
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, ShoppingList, _>(&sql, values)
        .fetch_optional(pool)
        .await?)
}

pub(crate) async fn find_list_by_title(
    pool: &SqlitePool,
    household_id: &str,
    title: &str,
) -> hearth_shared::Result<Option<ShoppingList>> {
    let statement = SqlQuery::select()
        .columns(LIST_COLUMNS)
        .from(table::ShoppingList::Table)
        .and_where(Expr::col(table::ShoppingList::HouseholdId).eq(household_id))
        .and_where(Expr::col(table::ShoppingList::Title).eq(title))
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, ShoppingList, _>(&sql, values)
        .fetch_optional(pool)
        .await?)
}

pub(crate) async fn find_recipe(pool: &SqlitePool, id: &str) -> hearth_shared::Result<Option<Recipe>> {
    let statement = SqlQuery::select()
        .columns([
            table::Recipe::Id,
            table::Recipe::HouseholdId,
            table::Recipe::Title,
            table::Recipe::Ingredients,
            table::Recipe::CreatedAt,
        ])
        .from(table::Recipe::Table)
        .and_where(Expr::col(table::Recipe::Id).eq(id))
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, RecipeRow, _>(&sql, values)
        .fetch_optional(pool)
        .await?
        .map(Recipe::from))
}

/// Every item of a list in creation order; rows created in the same second
/// keep their insertion order.
pub(crate) async fn list_items(pool: &SqlitePool, list_id: &str) -> hearth_shared::Result<Vec<ShoppingItem>> {
    let statement = SqlQuery::select()
        .columns(ITEM_COLUMNS)
        .from(table::ShoppingItem::Table)
        .and_where(Expr::col(table::ShoppingItem::ListId).eq(list_id))
        .order_by(table::ShoppingItem::CreatedAt, Order::Asc)
        .order_by_expr(Expr::cust("rowid"), Order::Asc)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, ShoppingItem, _>(&sql, values)
        .fetch_all(pool)
        .await?)
}

pub(crate) async fn items_by_ids(pool: &SqlitePool, ids: &[String]) -> hearth_shared::Result<Vec<ShoppingItem>> {
    if ids.is_empty() {
        return Ok(vec![]);
    }

    let statement = SqlQuery::select()
        .columns(ITEM_COLUMNS)
        .from(table::ShoppingItem::Table)
        .and_where(Expr::col(table::ShoppingItem::Id).is_in(ids.iter().cloned()))
        .order_by(table::ShoppingItem::CreatedAt, Order::Asc)
        .order_by_expr(Expr::cust("rowid"), Order::Asc)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, ShoppingItem, _>(&sql, values)
        .fetch_all(pool)
        .await?)
}

pub(crate) async fn count_items(pool: &SqlitePool, list_id: &str) -> hearth_shared::Result<ListCounts> {
    Ok(sqlx::query_as::<_, ListCounts>(
        r#"
        SELECT
            COUNT(*) AS total_items,
            COALESCE(SUM(CASE WHEN is_complete THEN 1 ELSE 0 END), 0) AS completed_items
        FROM shopping_item
        WHERE list_id = ?
        "#,
    )
    .bind(list_id)
    .fetch_one(pool)
    .await?)
}
