use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_catalog_tables::Migration),
            Box::new(m20240301_000002_create_product_variants_table::Migration),
        ]
    }
}

mod m20240301_000001_create_catalog_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000001_create_catalog_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Teams::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Teams::Id).uuid().not_null().primary_key())
                        .col(ColumnDef::new(Teams::Title).string_len(255).not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Designs::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Designs::Id).uuid().not_null().primary_key())
                        .col(ColumnDef::new(Designs::Title).string_len(255).not_null())
                        .col(ColumnDef::new(Designs::TeamId).uuid().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_designs_team_id")
                                .from(Designs::Table, Designs::TeamId)
                                .to(Teams::Table, Teams::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Collections::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Collections::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Collections::Title).string_len(255).not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(CollectionDesigns::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(CollectionDesigns::CollectionId)
                                .uuid()
                                .not_null(),
                        )
                        .col(ColumnDef::new(CollectionDesigns::DesignId).uuid().not_null())
                        .primary_key(
                            Index::create()
                                .col(CollectionDesigns::CollectionId)
                                .col(CollectionDesigns::DesignId),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_collection_designs_collection_id")
                                .from(CollectionDesigns::Table, CollectionDesigns::CollectionId)
                                .to(Collections::Table, Collections::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_collection_designs_design_id")
                                .from(CollectionDesigns::Table, CollectionDesigns::DesignId)
                                .to(Designs::Table, Designs::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(CollectionDesigns::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Collections::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Designs::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Teams::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Teams {
        Table,
        Id,
        Title,
    }

    #[derive(DeriveIden)]
    pub enum Designs {
        Table,
        Id,
        Title,
        TeamId,
    }

    #[derive(DeriveIden)]
    enum Collections {
        Table,
        Id,
        Title,
    }

    #[derive(DeriveIden)]
    enum CollectionDesigns {
        Table,
        CollectionId,
        DesignId,
    }
}

mod m20240301_000002_create_product_variants_table {
    use super::m20240301_000001_create_catalog_tables::Designs;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000002_create_product_variants_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ProductVariants::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ProductVariants::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(ProductVariants::DesignId).uuid().not_null())
                        .col(ColumnDef::new(ProductVariants::ColorName).string_len(255).null())
                        .col(ColumnDef::new(ProductVariants::SizeName).string_len(255).null())
                        // Not unique: legacy codes are kept as-is even when they collide
                        .col(ColumnDef::new(ProductVariants::Code).string_len(100).null())
                        .col(
                            ColumnDef::new(ProductVariants::UniversalProductCode)
                                .string_len(12)
                                .null(),
                        )
                        .col(
                            ColumnDef::new(ProductVariants::Position)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(ProductVariants::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .col(
                            ColumnDef::new(ProductVariants::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_product_variants_design_id")
                                .from(ProductVariants::Table, ProductVariants::DesignId)
                                .to(Designs::Table, Designs::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_product_variants_design_id")
                        .table(ProductVariants::Table)
                        .col(ProductVariants::DesignId)
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_product_variants_code")
                        .table(ProductVariants::Table)
                        .col(ProductVariants::Code)
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_product_variants_universal_product_code")
                        .table(ProductVariants::Table)
                        .col(ProductVariants::UniversalProductCode)
                        .if_not_exists()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ProductVariants::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum ProductVariants {
        Table,
        Id,
        DesignId,
        ColorName,
        SizeName,
        Code,
        UniversalProductCode,
        Position,
        CreatedAt,
        UpdatedAt,
    }
}
