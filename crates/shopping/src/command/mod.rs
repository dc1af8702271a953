use std::{ops::Deref, sync::Arc};

use hearth_shared::State;

use crate::{ListLocks, NameNormalizer, QuantityMode, SqliteItemStore};

mod add_recipe;
mod confirm;
mod list;
mod merge_duplicates;

pub use add_recipe::{AddRecipeInput, AddRecipeOutcome};
pub use confirm::{ConfirmAction, ConfirmOutcome};
pub use list::{AddItemInput, CreateRecipeInput};
pub use merge_duplicates::MergeOutcome;

pub const DEFAULT_LIST_TITLE: &str = "Groceries";

#[derive(Debug, Clone)]
pub struct Settings {
    pub default_list_title: String,
    pub quantity_mode: QuantityMode,
    pub normalizer: NameNormalizer,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_list_title: DEFAULT_LIST_TITLE.to_owned(),
            quantity_mode: QuantityMode::default(),
            normalizer: NameNormalizer::default(),
        }
    }
}

/// Write side of the shopping domain.
#[derive(Clone)]
pub struct Command {
    state: State,
    settings: Arc<Settings>,
    locks: ListLocks,
}

impl Deref for Command {
    type Target = State;

    fn deref(&self) -> &Self::Target {
        &self.state
    }
}

impl Command {
    pub fn new(state: State, settings: Settings) -> Self {
        Self {
            state,
            settings: Arc::new(settings),
            locks: ListLocks::default(),
        }
    }

    fn item_store(&self) -> SqliteItemStore {
        SqliteItemStore::new(self.write_db.clone(), self.settings.quantity_mode)
    }
}
