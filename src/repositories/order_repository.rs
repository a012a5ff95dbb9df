use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;
use tracing::debug;

use crate::entities::order::{
    ActiveModel as OrderActiveModel, Column as OrderColumn, Entity as Order, Model as OrderModel,
};
use crate::entities::order_item::{
    ActiveModel as OrderItemActiveModel, Column as OrderItemColumn, Entity as OrderItem,
    Model as OrderItemModel,
};
use crate::errors::ServiceError;
use crate::repositories::Repository;

use super::BaseRepository;

/// Column values for a new `order_items` row. Everything except the order is optional.
#[derive(Debug, Clone, Default)]
pub struct NewOrderItem {
    pub order_id: i32,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub category: Option<String>,
    pub item_name: Option<String>,
    pub unit_price: Option<Decimal>,
    pub quantity: Option<i32>,
    pub subtotal: Option<Decimal>,
}

impl From<NewOrderItem> for OrderItemActiveModel {
    fn from(item: NewOrderItem) -> Self {
        OrderItemActiveModel {
            order_id: Set(item.order_id),
            customer_name: Set(item.customer_name),
            customer_email: Set(item.customer_email),
            category: Set(item.category),
            item_name: Set(item.item_name),
            unit_price: Set(item.unit_price),
            quantity: Set(item.quantity),
            subtotal: Set(item.subtotal),
            ..Default::default()
        }
    }
}

/// Create/read access to `orders` and `order_items`.
///
/// Rows are immutable once written, so there is no update or delete here.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Inserts an order on any connection, including an open transaction.
    pub async fn insert_order<C: ConnectionTrait>(
        conn: &C,
        order_time: NaiveDateTime,
        total_amount: Decimal,
    ) -> Result<OrderModel, ServiceError> {
        let order = OrderActiveModel {
            order_time: Set(order_time),
            total_amount: Set(total_amount),
            ..Default::default()
        }
        .insert(conn)
        .await?;

        debug!(order_id = order.id, "Inserted order");
        Ok(order)
    }

    /// Inserts an order item on any connection, including an open transaction.
    pub async fn insert_item<C: ConnectionTrait>(
        conn: &C,
        item: NewOrderItem,
    ) -> Result<OrderItemModel, ServiceError> {
        let order_id = item.order_id;
        let model = OrderItemActiveModel::from(item).insert(conn).await?;

        debug!(order_id, item_id = model.id, "Inserted order item");
        Ok(model)
    }

    /// Create a new order
    pub async fn create_order(
        &self,
        order_time: NaiveDateTime,
        total_amount: Decimal,
    ) -> Result<OrderModel, ServiceError> {
        Self::insert_order(self.base.get_db(), order_time, total_amount).await
    }

    /// Add a line item to an existing order
    pub async fn add_item(&self, item: NewOrderItem) -> Result<OrderItemModel, ServiceError> {
        Self::insert_item(self.base.get_db(), item).await
    }

    /// Find an order by ID
    pub async fn find_by_id(&self, id: i32) -> Result<Option<OrderModel>, ServiceError> {
        Ok(Order::find_by_id(id).one(self.base.get_db()).await?)
    }

    /// Line items of an order, in insertion order
    pub async fn items_for_order(
        &self,
        order_id: i32,
    ) -> Result<Vec<OrderItemModel>, ServiceError> {
        Ok(OrderItem::find()
            .filter(OrderItemColumn::OrderId.eq(order_id))
            .order_by_asc(OrderItemColumn::Id)
            .all(self.base.get_db())
            .await?)
    }

    /// Find an order together with its line items
    pub async fn find_with_items(
        &self,
        id: i32,
    ) -> Result<Option<(OrderModel, Vec<OrderItemModel>)>, ServiceError> {
        let Some(order) = self.find_by_id(id).await? else {
            return Ok(None);
        };
        let items = self.items_for_order(order.id).await?;
        Ok(Some((order, items)))
    }

    /// Most recent orders first. `page` is 1-based.
    pub async fn list_recent(
        &self,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<OrderModel>, u64), ServiceError> {
        let paginator = Order::find()
            .order_by_desc(OrderColumn::Id)
            .paginate(self.base.get_db(), page_size.max(1));

        let total = paginator.num_items().await?;
        let orders = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((orders, total))
    }

    /// Number of stored orders
    pub async fn count_orders(&self) -> Result<u64, ServiceError> {
        Ok(Order::find().count(self.base.get_db()).await?)
    }
}
