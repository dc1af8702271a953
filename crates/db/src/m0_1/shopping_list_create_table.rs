use sea_query::{ColumnDef, Table, TableCreateStatement, TableDropStatement};

use crate::table::ShoppingList;

pub struct Operation;

fn up_statement() -> TableCreateStatement {
    Table::create()
        .table(ShoppingList::Table)
        .col(
            ColumnDef::new(ShoppingList::Id)
                .string()
                .not_null()
                .string_len(26)
                .primary_key(),
        )
        .col(
            ColumnDef::new(ShoppingList::HouseholdId)
                .string()
                .not_null()
                .string_len(64),
        )
        .col(ColumnDef::new(ShoppingList::Title).string().not_null())
        .col(
            ColumnDef::new(ShoppingList::TotalItems)
                .integer()
                .not_null()
                .default(0),
        )
        .col(
            ColumnDef::new(ShoppingList::CompletedItems)
                .integer()
                .not_null()
                .default(0),
        )
        .col(
            ColumnDef::new(ShoppingList::CreatedAt)
                .big_integer()
                .not_null(),
        )
        .col(ColumnDef::new(ShoppingList::UpdatedAt).big_integer().null())
        .to_owned()
}

fn down_statement() -> TableDropStatement {
    Table::drop().table(ShoppingList::Table).to_owned()
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
