pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_orders_table;
mod m20240101_000002_create_order_items_table;

pub use m20240101_000001_create_orders_table::Orders;
pub use m20240101_000002_create_order_items_table::OrderItems;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_orders_table::Migration),
            Box::new(m20240101_000002_create_order_items_table::Migration),
        ]
    }
}
