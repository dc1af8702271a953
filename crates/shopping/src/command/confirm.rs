use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{ShoppingItem, query, sum_quantities};

use super::list::{QuantityUpdate, delete_items, recompute_counts, update_quantity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ConfirmAction {
    Confirm,
    Reject,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmOutcome {
    pub ok: bool,
    pub confirmed: usize,
    pub removed: usize,
    pub message: String,
    pub errors: Vec<String>,
}

/// Pending items sharing a list and a case-insensitive name.
struct Group {
    list_id: String,
    name: String,
    items: Vec<ShoppingItem>,
}

fn lexical_key(name: &str) -> String {
    name.trim().to_lowercase()
}

impl super::Command {
    /// Resolves auto-added items awaiting confirmation.
    ///
    /// Only ids that are still auto-added and pending take part; anything else
    /// is skipped silently. Groups are processed one by one, each in its own
    /// transaction, and a failing group does not undo the others.
    #[tracing::instrument(skip(self, item_ids), fields(items = item_ids.len()))]
    pub async fn resolve(
        &self,
        item_ids: Vec<String>,
        action: ConfirmAction,
    ) -> hearth_shared::Result<ConfirmOutcome> {
        if item_ids.is_empty() {
            hearth_shared::user!("itemIds must not be empty");
        }

        let mut item_ids = item_ids;
        item_ids.sort_unstable();
        item_ids.dedup();

        let mut list_ids: Vec<String> = query::items_by_ids(&self.write_db, &item_ids)
            .await?
            .into_iter()
            .map(|item| item.list_id)
            .collect();
        list_ids.sort_unstable();
        list_ids.dedup();

        let _guard = self.locks.acquire_many(list_ids.iter().map(String::as_str)).await;

        // reread under the lock, a concurrent resolve may have won
        let items: Vec<ShoppingItem> = query::items_by_ids(&self.write_db, &item_ids)
            .await?
            .into_iter()
            .filter(ShoppingItem::is_pending)
            .collect();

        let mut outcome = match action {
            ConfirmAction::Reject => self.reject(items).await,
            ConfirmAction::Confirm => self.confirm(items).await,
        };

        for list_id in &list_ids {
            if let Err(err) = recompute_counts(&self.write_db, list_id).await {
                tracing::error!(%list_id, error = %err, "failed to recompute list counts");
                outcome.errors.push(format!("list {list_id}: {err}"));
            }
        }

        outcome.ok = outcome.errors.is_empty();
        outcome.message = match action {
            ConfirmAction::Confirm => format!("Confirmed {} item(s)", outcome.confirmed),
            ConfirmAction::Reject => format!("Removed {} item(s)", outcome.removed),
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
            %action,
            confirmed = outcome.confirmed,
            removed = outcome.removed,
            errors = outcome.errors.len(),
            "pending items resolved"
        );

        Ok(outcome)
    }

    async fn reject(&self, items: Vec<ShoppingItem>) -> ConfirmOutcome {
        let mut outcome = ConfirmOutcome::default();
        let mut by_list: HashMap<String, Vec<String>> = HashMap::new();
        for item in items {
            by_list.entry(item.list_id).or_default().push(item.id);
        }

        for (list_id, ids) in by_list {
            match delete_items(&self.write_db, &ids, true).await {
                Ok(removed) => outcome.removed += removed as usize,
                Err(err) => {
                    tracing::error!(%list_id, error = %err, "failed to reject items");
                    outcome.errors.push(format!("list {list_id}: {err}"));
                }
            }
        }

        outcome
    }

    async fn confirm(&self, items: Vec<ShoppingItem>) -> ConfirmOutcome {
        let mut outcome = ConfirmOutcome::default();
        let mut groups: Vec<Group> = vec![];

        for item in items {
            let name = lexical_key(&item.name);
            match groups
                .iter_mut()
                .find(|g| g.list_id == item.list_id && g.name == name)
            {
                Some(group) => group.items.push(item),
                None => groups.push(Group {
                    list_id: item.list_id.to_owned(),
                    name,
                    items: vec![item],
                }),
            }
        }

        let mut list_items: HashMap<String, Vec<ShoppingItem>> = HashMap::new();

        for group in groups {
            if !list_items.contains_key(&group.list_id) {
                match query::list_items(&self.write_db, &group.list_id).await {
                    Ok(items) => {
                        list_items.insert(group.list_id.to_owned(), items);
                    }
                    Err(err) => {
                        outcome.errors.push(format!("{}: {err}", group.name));
                        continue;
                    }
                }
            }

            let siblings = list_items.get(&group.list_id).map(Vec::as_slice).unwrap_or_default();
            match self.confirm_group(&group, siblings).await {
                Ok(()) => outcome.confirmed += group.items.len(),
                Err(err) => {
                    tracing::error!(list_id = %group.list_id, name = %group.name, error = %err, "failed to confirm group");
                    outcome.errors.push(format!("{}: {err}", group.name));
                }
            }
        }

        outcome
    }

    async fn confirm_group(&self, group: &Group, siblings: &[ShoppingItem]) -> hearth_shared::Result<()> {
        let group_ids: Vec<String> = group.items.iter().map(|i| i.id.to_owned()).collect();

        // an open, already confirmed item of the same name absorbs the group
        let target = siblings
            .iter()
            .filter(|i| !i.is_pending() && !i.is_complete)
            .filter(|i| !group_ids.contains(&i.id))
            .filter(|i| lexical_key(&i.name) == group.name)
            .min_by(|a, b| (a.created_at, &a.id).cmp(&(b.created_at, &b.id)));

        let mut tx = self.write_db.begin().await?;

        match target {
            Some(target) => {
                let quantity = sum_quantities(
                    std::iter::once(target.quantity.as_deref())
                        .chain(group.items.iter().map(|i| i.quantity.as_deref())),
                );

                update_quantity(
                    &mut *tx,
                    QuantityUpdate {
                        id: &target.id,
                        quantity,
                        confirm: false,
                        auto_added_at: Some(hearth_shared::now()),
                    },
                )
                .await?;

                delete_items(&mut *tx, &group_ids, true).await?;
            }
            None => {
                let Some((first, rest)) = group.items.split_first() else {
                    return Ok(());
                };

                let quantity = sum_quantities(group.items.iter().map(|i| i.quantity.as_deref()));
                update_quantity(
                    &mut *tx,
                    QuantityUpdate {
                        id: &first.id,
                        quantity,
                        confirm: true,
                        auto_added_at: None,
                    },
                )
                .await?;

                let duplicates: Vec<String> = rest.iter().map(|i| i.id.to_owned()).collect();
                delete_items(&mut *tx, &duplicates, true).await?;
            }
        }

        tx.commit().await?;

        Ok(())
    }
}
