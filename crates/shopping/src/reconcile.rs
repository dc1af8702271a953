use serde::Serialize;
use ulid::Ulid;

use crate::{
    DEFAULT_QUANTITY, Ingredient, ItemStore, NameNormalizer, OnUnparsable, ShoppingItem,
    StoreError, merge_quantities, parse_quantity,
};

#[derive(Debug, Clone)]
pub struct ReconcileOptions {
    pub list_id: String,
    pub auto_confirm: bool,
    pub source_recipe_id: String,
    pub acting_user: String,
    pub on_unparsable: OnUnparsable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientFailure {
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileOutcome {
    pub inserted: Vec<ShoppingItem>,
    pub updated: Vec<ShoppingItem>,
    pub failed: Vec<IngredientFailure>,
}

impl ReconcileOutcome {
    pub fn summary(&self) -> String {
        let mut message = format!("{} added, {} updated", self.inserted.len(), self.updated.len());
        if !self.failed.is_empty() {
            message.push_str(&format!(", {} failed", self.failed.len()));
        }

        message
    }

    fn record_inserted(&mut self, item: ShoppingItem) {
        self.inserted.push(item);
    }

    fn record_updated(&mut self, item: ShoppingItem) {
        // an item inserted earlier in the batch stays an insert
        if let Some(existing) = self.inserted.iter_mut().find(|i| i.id == item.id) {
            *existing = item;
            return;
        }

        match self.updated.iter_mut().find(|i| i.id == item.id) {
            Some(existing) => *existing = item,
            None => self.updated.push(item),
        }
    }
}

struct Candidate {
    key: String,
    item: ShoppingItem,
}

/// Folds a recipe's ingredients into a list's existing items.
///
/// Ingredients are handled in order and independently: a failed write is
/// recorded in [`ReconcileOutcome::failed`] and never stops its siblings.
/// Completed items are never merge targets. Items inserted earlier in the same
/// call are, so a recipe listing "tomato" twice yields one row.
#[tracing::instrument(
    skip_all,
    fields(list_id = %options.list_id, recipe_id = %options.source_recipe_id, ingredients = ingredients.len())
)]
pub async fn reconcile<S: ItemStore + ?Sized>(
    store: &S,
    normalizer: &NameNormalizer,
    existing: Vec<ShoppingItem>,
    ingredients: &[Ingredient],
    options: &ReconcileOptions,
) -> ReconcileOutcome {
    let mut outcome = ReconcileOutcome::default();
    let mut candidates: Vec<Candidate> = existing
        .into_iter()
        .filter(|item| !item.is_complete)
        .map(|item| Candidate {
            key: normalizer.normalize(&item.name),
            item,
        })
        .collect();

    for ingredient in ingredients {
        let parsed = parse_quantity(ingredient, options.on_unparsable);
        let key = normalizer.normalize(&parsed.name);

        if key.is_empty() {
            tracing::warn!(ingredient = ?ingredient, "ingredient has no usable name");
            outcome.failed.push(IngredientFailure {
                name: parsed.name,
                reason: "ingredient has no name".to_owned(),
            });
            continue;
        }

        let now = hearth_shared::now();

        match candidates.iter().position(|c| c.key == key) {
            Some(idx) => {
                let mut item = candidates[idx].item.clone();
                item.quantity = merge_quantities(item.quantity.as_deref(), &parsed);

                if item.is_pending() {
                    item.auto_added_at = Some(now);
                    item.pending_confirmation = !options.auto_confirm;
                }

                match write(store, &mut item, Write::Update).await {
                    Ok(()) => {
                        candidates[idx].item = item.clone();
                        outcome.record_updated(item);
                    }
                    Err(err) => outcome.failed.push(IngredientFailure {
                        name: parsed.name,
                        reason: err.to_string(),
                    }),
                }
            }
            None => {
                let mut item = ShoppingItem {
                    id: Ulid::new().to_string(),
                    list_id: options.list_id.to_owned(),
                    name: parsed.name.to_owned(),
                    quantity: parsed.stored_quantity(),
                    is_complete: false,
                    auto_added: true,
                    pending_confirmation: !options.auto_confirm,
                    source_recipe_id: Some(options.source_recipe_id.to_owned()),
                    auto_added_at: Some(now),
                    created_by: options.acting_user.to_owned(),
                    created_at: now,
                };

                match write(store, &mut item, Write::Insert).await {
                    Ok(()) => {
                        candidates.push(Candidate {
                            key,
                            item: item.clone(),
                        });
                        outcome.record_inserted(item);
                    }
                    Err(err) => outcome.failed.push(IngredientFailure {
                        name: parsed.name,
                        reason: err.to_string(),
                    }),
                }
            }
        }
    }

    tracing::info!(
        inserted = outcome.inserted.len(),
        updated = outcome.updated.len(),
        failed = outcome.failed.len(),
        "ingredients reconciled"
    );

    outcome
}

#[derive(Clone, Copy)]
enum Write {
    Insert,
    Update,
}

/// One write with a single retry at the default quantity when the store
/// rejects the quantity's type.
async fn write<S: ItemStore + ?Sized>(
    store: &S,
    item: &mut ShoppingItem,
    kind: Write,
) -> Result<(), StoreError> {
    let result = match kind {
        Write::Insert => store.insert_item(item).await,
        Write::Update => store.update_item(item).await,
    };

    let quantity = match result {
        Ok(()) => return Ok(()),
        Err(StoreError::QuantityType { quantity }) => quantity,
        Err(err) => {
            tracing::warn!(item_id = %item.id, list_id = %item.list_id, error = %err, "item write failed");
            return Err(err);
        }
    };

    tracing::warn!(
        item_id = %item.id,
        list_id = %item.list_id,
        quantity = %quantity,
        "quantity rejected, retrying with default"
    );

    item.quantity = Some(DEFAULT_QUANTITY.to_owned());

    let retry = match kind {
        Write::Insert => store.insert_item(item).await,
        Write::Update => store.update_item(item).await,
    };

    if let Err(err) = &retry {
        tracing::warn!(item_id = %item.id, list_id = %item.list_id, error = %err, "item write failed after retry");
    }

    retry
}
