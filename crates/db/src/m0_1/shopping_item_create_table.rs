use sea_query::{
    ColumnDef, ForeignKey, ForeignKeyAction, Table, TableCreateStatement, TableDropStatement,
};

use crate::table::{ShoppingItem, ShoppingList};

pub struct Operation;

fn up_statement() -> TableCreateStatement {
    Table::create()
        .table(ShoppingItem::Table)
        .col(
            ColumnDef::new(ShoppingItem::Id)
                .string()
                .not_null()
                .string_len(26)
                .primary_key(),
        )
        .col(
            ColumnDef::new(ShoppingItem::ListId)
                .string()
                .not_null()
                .string_len(26),
        )
        .col(ColumnDef::new(ShoppingItem::Name).string().not_null())
        .col(ColumnDef::new(ShoppingItem::Quantity).string().null())
        .col(
            ColumnDef::new(ShoppingItem::IsComplete)
                .boolean()
                .not_null()
                .default(false),
        )
        .col(
            ColumnDef::new(ShoppingItem::AutoAdded)
                .boolean()
                .not_null()
                .default(false),
        )
        .col(
            ColumnDef::new(ShoppingItem::PendingConfirmation)
                .boolean()
                .not_null()
                .default(false),
        )
        .col(
            ColumnDef::new(ShoppingItem::SourceRecipeId)
                .string()
                .null()
                .string_len(26),
        )
        .col(ColumnDef::new(ShoppingItem::AutoAddedAt).big_integer().null())
        .col(
            ColumnDef::new(ShoppingItem::CreatedBy)
                .string()
                .not_null()
                .string_len(64),
        )
        .col(
            ColumnDef::new(ShoppingItem::CreatedAt)
                .big_integer()
                .not_null(),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_shopping_item_list")
                .from(ShoppingItem::Table, ShoppingItem::ListId)
                .to(ShoppingList::Table, ShoppingList::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_owned()
}

fn down_statement() -> TableDropStatement {
    Table::drop().table(ShoppingItem::Table).to_owned()
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for Operation {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = up_statement().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = down_statement().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }
}
