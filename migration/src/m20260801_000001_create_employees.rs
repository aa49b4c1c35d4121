use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Employees {
    Table,
    Id,
    FirstName,
    LastName,
    Email,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Employees::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Employees::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Employees::FirstName)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Employees::LastName)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Employees::Email).string_len(320).not_null())
                    .to_owned(),
            )
            .await?;

        // The service's duplicate check is check-then-insert; this index is
        // the invariant that makes the losing writer fail.
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .unique()
                    .name("ux_employees_email")
                    .table(Employees::Table)
                    .col(Employees::Email)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Employees::Table).to_owned())
            .await
    }
}
