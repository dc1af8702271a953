use serde::Serialize;

use crate::{ShoppingItem, query, sum_quantities};

use super::list::{QuantityUpdate, delete_items, recompute_counts, update_quantity};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeOutcome {
    pub ok: bool,
    #[serde(rename = "mergedItems")]
    pub merged_count: usize,
    pub total_items: i64,
    pub message: String,
    pub errors: Vec<String>,
}

impl super::Command {
    /// Collapses items whose names differ only by case or surrounding
    /// whitespace. The earliest open item of each group survives with the
    /// summed quantity, or the earliest item when all are completed. Pending
    /// and completion flags play no part in the grouping.
    #[tracing::instrument(skip(self))]
    pub async fn merge_duplicates(&self, list_id: &str) -> hearth_shared::Result<MergeOutcome> {
        if query::find_list(&self.write_db, list_id).await?.is_none() {
            hearth_shared::not_found!("shopping list {list_id} not found");
        }

        let _guard = self.locks.acquire(list_id).await;

        let mut groups: Vec<(String, Vec<ShoppingItem>)> = vec![];
        for item in query::list_items(&self.write_db, list_id).await? {
            let key = item.name.trim().to_lowercase();
            match groups.iter_mut().find(|(name, _)| *name == key) {
                Some((_, items)) => items.push(item),
                None => groups.push((key, vec![item])),
            }
        }

        let mut outcome = MergeOutcome::default();

        for (name, items) in groups.into_iter().filter(|(_, items)| items.len() > 1) {
            match self.merge_group(&items).await {
                Ok(()) => outcome.merged_count += items.len() - 1,
                Err(err) => {
                    tracing::error!(%list_id, %name, error = %err, "failed to merge duplicates");
                    outcome.errors.push(format!("{name}: {err}"));
                }
            }
        }

        let counts = recompute_counts(&self.write_db, list_id).await?;

        outcome.total_items = counts.total_items;
        outcome.ok = outcome.errors.is_empty();
        outcome.message = if outcome.merged_count == 0 && outcome.ok {
            "No duplicates found".to_owned()
        } else {
            format!("Merged {} duplicate item(s)", outcome.merged_count)
        };

        if !outcome.ok {
            outcome.message = format!(
                "{}; {} failure(s): {}",
                outcome.message,
                outcome.errors.len(),
                outcome.errors.join("; ")
            );
        }

        tracing::info!(
            merged = outcome.merged_count,
            total_items = outcome.total_items,
            "duplicates merged"
        );

        Ok(outcome)
    }

    /// `items` is in creation order. An open need is never folded into a
    /// row that was already bought.
    async fn merge_group(&self, items: &[ShoppingItem]) -> hearth_shared::Result<()> {
        let Some(keep) = items.iter().find(|i| !i.is_complete).or_else(|| items.first()) else {
            return Ok(());
        };

        let quantity = sum_quantities(items.iter().map(|i| i.quantity.as_deref()));
        let ids: Vec<String> = items
            .iter()
            .filter(|i| i.id != keep.id)
            .map(|i| i.id.to_owned())
            .collect();

        let mut tx = self.write_db.begin().await?;

        update_quantity(
            &mut *tx,
            QuantityUpdate {
                id: &keep.id,
                quantity,
                confirm: false,
                auto_added_at: None,
            },
        )
        .await?;

        delete_items(&mut *tx, &ids, false).await?;

        tx.commit().await?;

        Ok(())
    }
}
