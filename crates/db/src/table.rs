use sea_query::Iden;

#[derive(Iden, Clone)]
pub enum Recipe {
    Table,
    Id,
    HouseholdId,
    Title,
    Ingredients,
    CreatedAt,
}

#[derive(Iden, Clone)]
pub enum ShoppingList {
    Table,
    Id,
    HouseholdId,
    Title,
    TotalItems,
    CompletedItems,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden, Clone)]
pub enum ShoppingItem {
    Table,
    Id,
    ListId,
    Name,
    Quantity,
    IsComplete,
    AutoAdded,
    PendingConfirmation,
    SourceRecipeId,
    AutoAddedAt,
    CreatedBy,
    CreatedAt,
}
