use hearth_db::table;
use sea_query::{Expr, ExprTrait, OnConflict, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::Deserialize;
use ulid::Ulid;
use validator::Validate;

use crate::{Ingredient, ItemStore, ListCounts, ShoppingItem, ShoppingList, StoreError, query};

#[derive(Debug, Clone, Validate, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemInput {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 100))]
    pub quantity: Option<String>,
}

#[derive(Debug, Clone, Validate, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecipeInput {
    #[validate(length(min = 1, max = 64))]
    pub household_id: String,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
}

impl super::Command {
    /// The household's default list, created on first use.
    #[tracing::instrument(skip(self))]
    pub async fn default_list(&self, household_id: &str) -> hearth_shared::Result<ShoppingList> {
        let title = self.settings.default_list_title.as_str();

        if let Some(list) = query::find_list_by_title(&self.write_db, household_id, title).await? {
            return Ok(list);
        }

        let statement = Query::insert()
            .into_table(table::ShoppingList::Table)
            .columns([
                table::ShoppingList::Id,
                table::ShoppingList::HouseholdId,
                table::ShoppingList::Title,
                table::ShoppingList::CreatedAt,
            ])
            .values_panic([
                Ulid::new().to_string().into(),
                household_id.into(),
                title.into(),
                hearth_shared::now().into(),
            ])
            .on_conflict(
                OnConflict::columns([table::ShoppingList::HouseholdId, table::ShoppingList::Title])
                    .do_nothing()
                    .to_owned(),
            )
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&self.write_db).await?;

        // a concurrent caller may have won the insert
        match query::find_list_by_title(&self.write_db, household_id, title).await? {
            Some(list) => {
                tracing::info!(list_id = %list.id, "default list ready");
                Ok(list)
            }
            None => hearth_shared::bail!("default list for household {household_id} is missing"),
        }
    }

    /// Manual entry: the item is confirmed immediately and never deduplicated.
    #[tracing::instrument(skip(self, input))]
    pub async fn add_item(
        &self,
        list_id: &str,
        input: AddItemInput,
        acting_user: &str,
    ) -> hearth_shared::Result<ShoppingItem> {
        input.validate()?;

        let name = input.name.trim();
        if name.is_empty() {
            hearth_shared::user!("item name must not be empty");
        }

        if query::find_list(&self.write_db, list_id).await?.is_none() {
            hearth_shared::not_found!("shopping list {list_id} not found");
        }

        let _guard = self.locks.acquire(list_id).await;
        let now = hearth_shared::now();
        let item = ShoppingItem {
            id: Ulid::new().to_string(),
            list_id: list_id.to_owned(),
            name: name.to_owned(),
            quantity: input
                .quantity
                .map(|q| q.trim().to_owned())
                .filter(|q| !q.is_empty()),
            is_complete: false,
            auto_added: false,
            pending_confirmation: false,
            source_recipe_id: None,
            auto_added_at: None,
            created_by: acting_user.to_owned(),
            created_at: now,
        };

        match self.item_store().insert_item(&item).await {
            Ok(()) => {}
            Err(StoreError::QuantityType { quantity }) => {
                hearth_shared::user!("quantity `{quantity}` must be a number");
            }
            Err(err) => return Err(err.into()),
        }

        recompute_counts(&self.write_db, list_id).await?;

        Ok(item)
    }

    /// Marks an item purchased or not.
    #[tracing::instrument(skip(self))]
    pub async fn set_item_complete(
        &self,
        item_id: &str,
        is_complete: bool,
    ) -> hearth_shared::Result<ShoppingItem> {
        let Some(mut item) = query::items_by_ids(&self.write_db, &[item_id.to_owned()])
            .await?
            .pop()
        else {
            hearth_shared::not_found!("item {item_id} not found");
        };

        let _guard = self.locks.acquire(&item.list_id).await;

        let statement = Query::update()
            .table(table::ShoppingItem::Table)
            .values([(table::ShoppingItem::IsComplete, is_complete.into())])
            .and_where(Expr::col(table::ShoppingItem::Id).eq(item_id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&self.write_db).await?;

        recompute_counts(&self.write_db, &item.list_id).await?;
        item.is_complete = is_complete;

        Ok(item)
    }

    #[tracing::instrument(skip(self, input), fields(household_id = %input.household_id))]
    pub async fn create_recipe(&self, input: CreateRecipeInput) -> hearth_shared::Result<String> {
        input.validate()?;

        let id = Ulid::new().to_string();
        let statement = Query::insert()
            .into_table(table::Recipe::Table)
            .columns([
                table::Recipe::Id,
                table::Recipe::HouseholdId,
                table::Recipe::Title,
                table::Recipe::Ingredients,
                table::Recipe::CreatedAt,
            ])
            .values_panic([
                id.to_owned().into(),
                input.household_id.into(),
                input.title.into(),
                serde_json::to_string(&input.ingredients)?.into(),
                hearth_shared::now().into(),
            ])
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&self.write_db).await?;

        Ok(id)
    }
}

/// Rewrites a list's counters from its item rows. The stored columns are never
/// adjusted any other way.
pub(crate) async fn recompute_counts<'e, E>(executor: E, list_id: &str) -> hearth_shared::Result<ListCounts>
where
    E: sqlx::SqliteExecutor<'e>,
{
    let counts = sqlx::query_as::<_, ListCounts>(
        r#"
        UPDATE shopping_list SET
            total_items = (SELECT COUNT(*) FROM shopping_item WHERE list_id = ?1),
            completed_items = (
                SELECT COUNT(*) FROM shopping_item WHERE list_id = ?1 AND is_complete = 1
            ),
            updated_at = ?2
        WHERE id = ?1
        RETURNING total_items, completed_items
        "#,
    )
    .bind(list_id)
    .bind(hearth_shared::now())
    .fetch_optional(executor)
    .await?;

    match counts {
        Some(counts) => Ok(counts),
        None => hearth_shared::not_found!("shopping list {list_id} not found"),
    }
}

pub(crate) struct QuantityUpdate<'a> {
    pub id: &'a str,
    pub quantity: Option<String>,
    pub confirm: bool,
    pub auto_added_at: Option<i64>,
}

pub(crate) async fn update_quantity<'e, E>(executor: E, update: QuantityUpdate<'_>) -> hearth_shared::Result<()>
where
    E: sqlx::SqliteExecutor<'e>,
{
    let mut statement = Query::update()
        .table(table::ShoppingItem::Table)
        .value(table::ShoppingItem::Quantity, update.quantity)
        .and_where(Expr::col(table::ShoppingItem::Id).eq(update.id))
        .to_owned();

    if update.confirm {
        statement.value(table::ShoppingItem::PendingConfirmation, false);
    }

    if let Some(auto_added_at) = update.auto_added_at {
        statement.value(table::ShoppingItem::AutoAddedAt, auto_added_at);
    }

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let result = sqlx::query_with(&sql, values).execute(executor).await?;

    if result.rows_affected() == 0 {
        hearth_shared::not_found!("item {} not found", update.id);
    }

    Ok(())
}

/// Deletes the given items. With `pending_only` set, rows that are no longer
/// awaiting confirmation are left untouched.
pub(crate) async fn delete_items<'e, E>(executor: E, ids: &[String], pending_only: bool) -> hearth_shared::Result<u64>
where
    E: sqlx::SqliteExecutor<'e>,
{
    if ids.is_empty() {
        return Ok(0);
    }

    let mut statement = Query::delete()
        .from_table(table::ShoppingItem::Table)
        .and_where(Expr::col(table::ShoppingItem::Id).is_in(ids.iter().cloned()))
        .to_owned();

    if pending_only {
        statement
            .and_where(Expr::col(table::ShoppingItem::AutoAdded).eq(true))
            .and_where(Expr::col(table::ShoppingItem::PendingConfirmation).eq(true));
    }

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let result = sqlx::query_with(&sql, values).execute(executor).await?;

    Ok(result.rows_affected())
}
