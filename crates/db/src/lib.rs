use sqlx_migrator::{Info, Migrator};

mod m0_1;
pub mod table;

pub fn migrator<DB: sqlx::Database>() -> Result<Migrator<DB>, sqlx_migrator::Error>
where
    m0_1::M0_1: sqlx_migrator::Migration<DB>,
{
    let mut migrator = Migrator::default();
    migrator.add_migrations(vec![Box::new(m0_1::M0_1)])?;

    Ok(migrator)
}
