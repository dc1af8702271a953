use std::{path::PathBuf, str::FromStr};

use hearth_shared::State;
use hearth_shopping::{
    Command, CreateRecipeInput, Ingredient, ItemStore, QuantityMode, Settings, ShoppingItem,
    SqliteItemStore,
};
use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};
use sqlx_migrator::{Migrate, Plan};

pub const HOUSEHOLD: &str = "household-1";

pub async fn setup_test_state(path: PathBuf) -> anyhow::Result<State> {
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.to_str().unwrap()))?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePool::connect_with(opts).await?;
    let mut conn = pool.acquire().await?;
    hearth_db::migrator::<sqlx::Sqlite>()?
        .run(&mut conn, &Plan::apply_all())
        .await?;

    Ok(State::new(pool))
}

#[allow(dead_code)]
pub fn command(state: &State) -> Command {
    Command::new(state.clone(), Settings::default())
}

#[allow(dead_code)]
pub fn numeric_command(state: &State) -> Command {
    Command::new(
        state.clone(),
        Settings {
            quantity_mode: QuantityMode::Numeric,
            ..Default::default()
        },
    )
}

#[allow(dead_code)]
pub async fn create_recipe(
    cmd: &Command,
    ingredients: impl IntoIterator<Item = Ingredient>,
) -> anyhow::Result<String> {
    Ok(cmd
        .create_recipe(CreateRecipeInput {
            household_id: HOUSEHOLD.to_owned(),
            title: "Test recipe".to_owned(),
            ingredients: ingredients.into_iter().collect(),
        })
        .await?)
}

#[allow(dead_code)]
pub fn text(value: &str) -> Ingredient {
    Ingredient::Text(value.to_owned())
}

/// An item as a recipe import leaves it before confirmation.
#[allow(dead_code)]
pub fn pending_item(list_id: &str, id: &str, name: &str, quantity: &str, created_at: i64) -> ShoppingItem {
    ShoppingItem {
        id: id.to_owned(),
        list_id: list_id.to_owned(),
        name: name.to_owned(),
        quantity: Some(quantity.to_owned()),
        is_complete: false,
        auto_added: true,
        pending_confirmation: true,
        source_recipe_id: Some("recipe-0".to_owned()),
        auto_added_at: Some(created_at),
        created_by: "tester".to_owned(),
        created_at,
    }
}

/// A confirmed, user-entered item.
#[allow(dead_code)]
pub fn manual_item(list_id: &str, id: &str, name: &str, quantity: &str, created_at: i64) -> ShoppingItem {
    ShoppingItem {
        auto_added: false,
        pending_confirmation: false,
        source_recipe_id: None,
        auto_added_at: None,
        ..pending_item(list_id, id, name, quantity, created_at)
    }
}

#[allow(dead_code)]
pub async fn seed_items(
    state: &State,
    items: impl IntoIterator<Item = ShoppingItem>,
) -> anyhow::Result<()> {
    let store = SqliteItemStore::new(state.write_db.clone(), QuantityMode::Text);
    for item in items {
        store.insert_item(&item).await?;
    }

    Ok(())
}

#[allow(dead_code)]
pub async fn stored_counts(state: &State, list_id: &str) -> anyhow::Result<(i64, i64)> {
    Ok(sqlx::query_as::<_, (i64, i64)>(
        "SELECT total_items, completed_items FROM shopping_list WHERE id = ?",
    )
    .bind(list_id)
    .fetch_one(&state.read_db)
    .await?)
}

/// Makes every quantity update on items named `name` fail inside SQLite.
#[allow(dead_code)]
pub async fn lock_quantity(state: &State, name: &str) -> anyhow::Result<()> {
    let trigger = format!(
        "CREATE TRIGGER lock_{table} BEFORE UPDATE OF quantity ON shopping_item \
         WHEN NEW.name = '{name}' BEGIN SELECT RAISE(ABORT, '{name} is locked'); END",
        table = name.to_lowercase(),
    );
    sqlx::query(&trigger).execute(&state.write_db).await?;

    Ok(())
}
