use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_orders_table::Orders;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // No ON DELETE / ON UPDATE action: the engine default (restrict) applies.
        manager
            .create_table(
                Table::create()
                    .table(OrderItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OrderItems::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(OrderItems::CustomerName)
                            .string_len(100)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(OrderItems::CustomerEmail)
                            .string_len(100)
                            .null(),
                    )
                    .col(ColumnDef::new(OrderItems::OrderId).integer().not_null())
                    .col(ColumnDef::new(OrderItems::Category).string_len(50).null())
                    .col(ColumnDef::new(OrderItems::ItemName).string_len(100).null())
                    .col(
                        ColumnDef::new(OrderItems::UnitPrice)
                            .decimal_len(5, 2)
                            .null(),
                    )
                    .col(ColumnDef::new(OrderItems::Quantity).integer().null())
                    .col(
                        ColumnDef::new(OrderItems::Subtotal)
                            .decimal_len(7, 2)
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_items_order_id")
                            .from(OrderItems::Table, OrderItems::OrderId)
                            .to(Orders::Table, Orders::Id),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OrderItems::Table).if_exists().to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum OrderItems {
    Table,
    Id,
    CustomerName,
    CustomerEmail,
    OrderId,
    Category,
    ItemName,
    UnitPrice,
    Quantity,
    Subtotal,
}
