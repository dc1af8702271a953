mod recipe_create_table;
mod shopping_item_create_list_idx;
mod shopping_item_create_table;
mod shopping_list_create_household_title_idx;
mod shopping_list_create_table;

use sqlx_migrator::vec_box;

pub struct M0_1;

sqlx_migrator::sqlite_migration!(
    M0_1,
    "main",
    "m0_1",
    vec_box![],
    vec_box![
        recipe_create_table::Operation,
        shopping_list_create_table::Operation,
        shopping_list_create_household_title_idx::Operation,
        shopping_item_create_table::Operation,
        shopping_item_create_list_idx::Operation
    ]
);
