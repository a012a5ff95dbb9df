//! sea-orm entities for the `cafe_orders` schema.

pub mod order;
pub mod order_item;
