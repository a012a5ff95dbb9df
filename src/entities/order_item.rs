use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One purchased line within an order.
///
/// Purchaser contact fields live on each line rather than on the order, so
/// nothing stops two lines of the same order from disagreeing about them.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "order_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "String(StringLen::N(100))", nullable)]
    pub customer_name: Option<String>,
    #[sea_orm(column_type = "String(StringLen::N(100))", nullable)]
    pub customer_email: Option<String>,
    pub order_id: i32,
    #[sea_orm(column_type = "String(StringLen::N(50))", nullable)]
    pub category: Option<String>,
    #[sea_orm(column_type = "String(StringLen::N(100))", nullable)]
    pub item_name: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))", nullable)]
    pub unit_price: Option<Decimal>,
    pub quantity: Option<i32>,
    #[sea_orm(column_type = "Decimal(Some((7, 2)))", nullable)]
    pub subtotal: Option<Decimal>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::order::Entity",
        from = "Column::OrderId",
        to = "super::order::Column::Id"
    )]
    Order,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
