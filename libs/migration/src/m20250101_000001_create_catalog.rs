use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Brand::Table)
                    .if_not_exists()
                    .col(pk_auto(Brand::Id))
                    .col(string(Brand::Name))
                    .col(string_null(Brand::Country))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Category::Table)
                    .if_not_exists()
                    .col(pk_auto(Category::Id))
                    .col(string(Category::Name))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Product::Table)
                    .if_not_exists()
                    .col(pk_auto(Product::Id))
                    .col(string_len(Product::Name, 255))
                    .col(boolean(Product::IsFeatured).default(false))
                    .col(timestamp_with_time_zone_null(Product::ExpirationDate))
                    .col(integer(Product::ItemsInStock).default(0))
                    .col(timestamp_with_time_zone_null(Product::ReceiptDate))
                    .col(double(Product::Rating).default(0.0))
                    .col(integer(Product::BrandId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_brand")
                            .from(Product::Table, Product::BrandId)
                            .to(Brand::Table, Brand::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CategoryProduct::Table)
                    .if_not_exists()
                    .col(integer(CategoryProduct::ProductId))
                    .col(integer(CategoryProduct::CategoryId))
                    .primary_key(
                        Index::create()
                            .col(CategoryProduct::ProductId)
                            .col(CategoryProduct::CategoryId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_r_product_category")
                            .from(CategoryProduct::Table, CategoryProduct::ProductId)
                            .to(Product::Table, Product::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_r_category_product")
                            .from(CategoryProduct::Table, CategoryProduct::CategoryId)
                            .to(Category::Table, Category::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_product_brand_id")
                    .table(Product::Table)
                    .col(Product::BrandId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_category_product_category_id")
                    .table(CategoryProduct::Table)
                    .col(CategoryProduct::CategoryId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CategoryProduct::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Product::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Category::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Brand::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Brand {
    Table,
    Id,
    Name,
    Country,
}

#[derive(DeriveIden)]
enum Category {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Product {
    Table,
    Id,
    Name,
    IsFeatured,
    ExpirationDate,
    ItemsInStock,
    ReceiptDate,
    Rating,
    BrandId,
}

#[derive(DeriveIden)]
enum CategoryProduct {
    Table,
    ProductId,
    CategoryId,
}
