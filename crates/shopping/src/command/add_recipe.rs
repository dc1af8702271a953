use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    IngredientFailure, OnUnparsable, ReconcileOptions, ShoppingItem, query, reconcile,
};

use super::list::recompute_counts;

#[derive(Debug, Clone, Validate, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddRecipeInput {
    #[serde(default)]
    pub recipe_id: String,
    #[validate(length(min = 1, max = 64))]
    pub household_id: String,
    pub list_id: Option<String>,
    #[serde(default)]
    pub auto_confirm: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddRecipeOutcome {
    pub list_id: String,
    pub added: Vec<ShoppingItem>,
    pub updated: Vec<ShoppingItem>,
    pub failed: Vec<IngredientFailure>,
    pub message: String,
}

impl super::Command {
    /// Imports a recipe's ingredients into a list, defaulting to the
    /// household's default list.
    #[tracing::instrument(skip(self, input), fields(recipe_id = %input.recipe_id, household_id = %input.household_id))]
    pub async fn add_recipe(
        &self,
        input: AddRecipeInput,
        acting_user: &str,
    ) -> hearth_shared::Result<AddRecipeOutcome> {
        input.validate()?;

        let recipe = match query::find_recipe(&self.write_db, &input.recipe_id).await? {
            Some(recipe) if recipe.household_id == input.household_id => recipe,
            _ => hearth_shared::not_found!("recipe {} not found", input.recipe_id),
        };

        let list = match input.list_id.as_deref().map(str::trim).filter(|id| !id.is_empty()) {
            Some(list_id) => match query::find_list(&self.write_db, list_id).await? {
                Some(list) if list.household_id == input.household_id => list,
                _ => hearth_shared::not_found!("shopping list {list_id} not found"),
            },
            None => self.default_list(&input.household_id).await?,
        };

        let _guard = self.locks.acquire(&list.id).await;

        let existing = query::list_items(&self.write_db, &list.id).await?;
        let options = ReconcileOptions {
            list_id: list.id.to_owned(),
            auto_confirm: input.auto_confirm,
            source_recipe_id: recipe.id.to_owned(),
            acting_user: acting_user.to_owned(),
            on_unparsable: OnUnparsable::DefaultOne,
        };

        let outcome = reconcile(
            &self.item_store(),
            &self.settings.normalizer,
            existing,
            &recipe.ingredients,
            &options,
        )
        .await;

        recompute_counts(&self.write_db, &list.id).await?;

        let message = outcome.summary();
        tracing::info!(list_id = %list.id, %message, "recipe added to list");

        Ok(AddRecipeOutcome {
            list_id: list.id,
            added: outcome.inserted,
            updated: outcome.updated,
            failed: outcome.failed,
            message,
        })
    }
}
