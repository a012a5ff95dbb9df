use crate::{
    db::DbPool,
    entities::{order::Model as OrderModel, order_item::Model as OrderItemModel},
    errors::ServiceError,
    menu::{quantity_key, Selection},
    notifications::{ConfirmationLine, Mailer, OrderConfirmation},
    repositories::{NewOrderItem, OrderRepository},
};
use chrono::Utc;
use metrics::counter;
use rust_decimal::Decimal;
use sea_orm::TransactionTrait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use validator::Validate;

/// Form field listing the selected items (one selection token per value).
pub const ORDER_ITEMS_FIELD: &str = "order_items";

/// `DECIMAL(5,2)`: at most three integer digits.
const MAX_UNIT_PRICE_DIGITS: u32 = 3;
/// `DECIMAL(7,2)`: at most five integer digits.
const MAX_AMOUNT_DIGITS: u32 = 5;
const CURRENCY_SCALE: u32 = 2;

/// One requested line: what was picked, at which price, how many.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderLine {
    #[validate(length(min = 1, max = 50, message = "Category must be between 1 and 50 characters"))]
    pub category: String,
    #[validate(length(
        min = 1,
        max = 100,
        message = "Item name must be between 1 and 100 characters"
    ))]
    pub item_name: String,
    pub unit_price: Decimal,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
}

impl OrderLine {
    pub fn from_selection(selection: Selection, quantity: i32) -> Self {
        Self {
            category: selection.category,
            item_name: selection.name,
            unit_price: selection.price,
            quantity,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct PlaceOrderRequest {
    #[validate(length(max = 100, message = "Customer name must be at most 100 characters"))]
    pub customer_name: Option<String>,
    #[validate(length(max = 100, message = "Customer email must be at most 100 characters"))]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderLine>,
}

impl PlaceOrderRequest {
    /// Builds a request from ordering-form fields.
    ///
    /// Every `order_items` value is a selection token; the quantity of each
    /// selection comes from its `qty_<Item_Name>` field and defaults to 1.
    pub fn from_form(fields: &[(String, String)]) -> Result<Self, ServiceError> {
        let field = |key: &str| {
            fields
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.trim())
                .filter(|v| !v.is_empty())
        };

        let mut items = Vec::new();
        for (_, token) in fields.iter().filter(|(k, _)| k == ORDER_ITEMS_FIELD) {
            let selection: Selection = token.parse()?;
            let key = quantity_key(&selection.name);
            let quantity = match field(key.as_str()) {
                Some(raw) => raw.parse::<i32>().map_err(|_| {
                    ServiceError::InvalidInput(format!("{} must be a whole number", key))
                })?,
                None => 1,
            };
            items.push(OrderLine::from_selection(selection, quantity));
        }

        Ok(Self {
            customer_name: field("customer_name").map(str::to_string),
            customer_email: field("customer_email").map(str::to_string),
            items,
        })
    }
}

/// A line with its computed subtotal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricedLine {
    pub category: String,
    pub item_name: String,
    pub unit_price: Decimal,
    pub quantity: i32,
    pub subtotal: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricedOrder {
    pub lines: Vec<PricedLine>,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDetails {
    pub order: OrderModel,
    pub items: Vec<OrderItemModel>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OrderListResponse {
    pub orders: Vec<OrderModel>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

fn fits_digits(amount: Decimal, integer_digits: u32) -> bool {
    amount.abs() < Decimal::from(10i64.pow(integer_digits))
}

/// Computes `subtotal = unit_price * quantity` per line and the order total.
///
/// Amounts are rounded to cents and must fit their columns.
pub fn price_lines(lines: &[OrderLine]) -> Result<PricedOrder, ServiceError> {
    if lines.is_empty() {
        return Err(ServiceError::ValidationError(
            "Please select at least one item".to_string(),
        ));
    }

    let mut priced = Vec::with_capacity(lines.len());
    let mut total = Decimal::ZERO;

    for line in lines {
        line.validate()?;
        if line.unit_price < Decimal::ZERO {
            return Err(ServiceError::ValidationError(format!(
                "Unit price of {} must not be negative",
                line.item_name
            )));
        }

        let unit_price = line.unit_price.round_dp(CURRENCY_SCALE);
        if !fits_digits(unit_price, MAX_UNIT_PRICE_DIGITS) {
            return Err(ServiceError::ValidationError(format!(
                "Unit price of {} exceeds 999.99",
                line.item_name
            )));
        }

        let subtotal = (unit_price * Decimal::from(line.quantity)).round_dp(CURRENCY_SCALE);
        if !fits_digits(subtotal, MAX_AMOUNT_DIGITS) {
            return Err(ServiceError::ValidationError(format!(
                "Subtotal of {} exceeds 99999.99",
                line.item_name
            )));
        }

        total += subtotal;
        priced.push(PricedLine {
            category: line.category.clone(),
            item_name: line.item_name.clone(),
            unit_price,
            quantity: line.quantity,
            subtotal,
        });
    }

    if !fits_digits(total, MAX_AMOUNT_DIGITS) {
        return Err(ServiceError::ValidationError(
            "Order total exceeds 99999.99".to_string(),
        ));
    }

    Ok(PricedOrder {
        lines: priced,
        total,
    })
}

/// Places and reads café orders
#[derive(Clone)]
pub struct OrderService {
    db_pool: Arc<DbPool>,
    repository: OrderRepository,
    mailer: Arc<dyn Mailer>,
    cafe_name: String,
}

impl OrderService {
    pub fn new(
        db_pool: Arc<DbPool>,
        mailer: Arc<dyn Mailer>,
        cafe_name: impl Into<String>,
    ) -> Self {
        Self {
            repository: OrderRepository::new(db_pool.clone()),
            db_pool,
            mailer,
            cafe_name: cafe_name.into(),
        }
    }

    pub fn repository(&self) -> &OrderRepository {
        &self.repository
    }

    /// Stores the order and its items in one transaction, then sends the confirmation.
    ///
    /// Every item carries the request's customer name and email.
    #[instrument(skip(self, request), fields(items = request.items.len()))]
    pub async fn place_order(
        &self,
        request: PlaceOrderRequest,
    ) -> Result<OrderDetails, ServiceError> {
        request.validate()?;
        let priced = price_lines(&request.items)?;

        let order_time = Utc::now().naive_utc();
        let txn = self.db_pool.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start transaction for order placement");
            ServiceError::from(e)
        })?;

        let order = OrderRepository::insert_order(&txn, order_time, priced.total).await?;

        let mut items = Vec::with_capacity(priced.lines.len());
        for line in &priced.lines {
            let item = OrderRepository::insert_item(
                &txn,
                NewOrderItem {
                    order_id: order.id,
                    customer_name: request.customer_name.clone(),
                    customer_email: request.customer_email.clone(),
                    category: Some(line.category.clone()),
                    item_name: Some(line.item_name.clone()),
                    unit_price: Some(line.unit_price),
                    quantity: Some(line.quantity),
                    subtotal: Some(line.subtotal),
                },
            )
            .await?;
            items.push(item);
        }

        txn.commit().await.map_err(|e| {
            error!(error = %e, order_id = order.id, "Failed to commit order placement");
            ServiceError::from(e)
        })?;

        counter!("cafe_orders.orders_placed", 1);
        info!(order_id = order.id, total = %priced.total, "Order placed");

        if let Some(email) = request
            .customer_email
            .as_deref()
            .filter(|e| !e.trim().is_empty())
        {
            let lines: Vec<ConfirmationLine> = priced
                .lines
                .iter()
                .map(|line| ConfirmationLine {
                    item_name: line.item_name.clone(),
                    quantity: line.quantity,
                    unit_price: line.unit_price,
                    subtotal: line.subtotal,
                })
                .collect();
            let confirmation = OrderConfirmation::new(
                &self.cafe_name,
                request.customer_name.as_deref(),
                email,
                order.id,
                &lines,
                priced.total,
            );
            if let Err(e) = self.mailer.send(&confirmation).await {
                warn!(error = %e, order_id = order.id, "Failed to send order confirmation");
            }
        }

        Ok(OrderDetails { order, items })
    }

    /// Retrieves an order with its items
    #[instrument(skip(self))]
    pub async fn get_order(&self, order_id: i32) -> Result<OrderDetails, ServiceError> {
        match self.repository.find_with_items(order_id).await? {
            Some((order, items)) => Ok(OrderDetails { order, items }),
            None => Err(ServiceError::NotFound(format!(
                "Order with ID {} not found",
                order_id
            ))),
        }
    }

    /// Lists orders newest first
    #[instrument(skip(self))]
    pub async fn list_orders(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<OrderListResponse, ServiceError> {
        let page = page.max(1);
        let per_page = per_page.clamp(1, 100);
        let (orders, total) = self.repository.list_recent(page, per_page).await?;

        Ok(OrderListResponse {
            orders,
            total,
            page,
            per_page,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn line(name: &str, price: Decimal, quantity: i32) -> OrderLine {
        OrderLine {
            category: "Coffee".into(),
            item_name: name.into(),
            unit_price: price,
            quantity,
        }
    }

    fn pairs(fields: &[(&str, &str)]) -> Vec<(String, String)> {
        fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn total_is_the_sum_of_subtotals() {
        let priced = price_lines(&[line("Mocha", dec!(4.50), 2), line("Hazelnut", dec!(4), 1)])
            .unwrap();
        assert_eq!(priced.lines[0].subtotal, dec!(9.00));
        assert_eq!(priced.lines[1].subtotal, dec!(4.00));
        assert_eq!(priced.total, dec!(13.00));
    }

    #[test]
    fn empty_order_is_rejected() {
        let err = price_lines(&[]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation error: Please select at least one item"
        );
    }

    #[test]
    fn zero_quantity_is_rejected() {
        assert!(matches!(
            price_lines(&[line("Mocha", dec!(4.50), 0)]),
            Err(ServiceError::ValidationError(_))
        ));
    }

    #[test]
    fn negative_unit_price_is_rejected() {
        let err = price_lines(&[line("Mocha", dec!(-4.50), 2)]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation error: Unit price of Mocha must not be negative"
        );
        assert!(price_lines(&[line("Water", dec!(0.00), 1)]).is_ok());
    }

    #[test]
    fn prices_beyond_column_precision_are_rejected() {
        assert!(price_lines(&[line("Gold Latte", dec!(1000.00), 1)]).is_err());
        assert!(price_lines(&[line("Mocha", dec!(999.99), 101)]).is_err());
        assert!(price_lines(&[line("Mocha", dec!(999.99), 100)]).is_ok());
    }

    #[test]
    fn form_fields_become_order_lines() {
        let request = PlaceOrderRequest::from_form(&pairs(&[
            ("customer_name", "Ada"),
            ("customer_email", "ada@example.com"),
            ("order_items", "Coffee||Caramel Macchiato||3.75"),
            ("order_items", "Dessert||Donut||1.50"),
            ("qty_Caramel_Macchiato", "2"),
        ]))
        .unwrap();

        assert_eq!(request.customer_name.as_deref(), Some("Ada"));
        assert_eq!(request.items.len(), 2);
        assert_eq!(request.items[0].quantity, 2);
        assert_eq!(request.items[0].unit_price, dec!(3.75));
        assert_eq!(request.items[1].category, "Dessert");
        assert_eq!(request.items[1].quantity, 1);
    }

    #[test]
    fn non_numeric_quantity_is_invalid_input() {
        let err = PlaceOrderRequest::from_form(&pairs(&[
            ("order_items", "Coffee||Mocha||4.50"),
            ("qty_Mocha", "lots"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[test]
    fn blank_contact_fields_are_absent() {
        let request = PlaceOrderRequest::from_form(&pairs(&[
            ("customer_name", " "),
            ("order_items", "Coffee||Mocha||4.50"),
        ]))
        .unwrap();
        assert!(request.customer_name.is_none());
        assert!(request.customer_email.is_none());
    }
}
