use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, instrument};

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("Delivery failed: {0}")]
    Delivery(String),
}

/// One line of the order summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationLine {
    pub item_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
}

/// Order confirmation addressed to the customer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderConfirmation {
    pub order_id: i32,
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl OrderConfirmation {
    pub fn new(
        cafe_name: &str,
        customer_name: Option<&str>,
        to: &str,
        order_id: i32,
        lines: &[ConfirmationLine],
        total: Decimal,
    ) -> Self {
        let mut summary = String::new();
        for line in lines {
            let _ = writeln!(
                summary,
                "- {} ({} x ${:.2}) = ${:.2}",
                line.item_name, line.quantity, line.unit_price, line.subtotal
            );
        }

        let greeting = customer_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or("there");

        let body = format!(
            "Hi {greeting},\n\n\
             Thank you for your order at {cafe_name}!\n\n\
             Here is your order summary:\n\
             {summary}\n\
             Total: ${total:.2}\n\n\
             We hope to serve you again soon!\n\n\
             Best regards,\n\
             {cafe_name}\n"
        );

        Self {
            order_id,
            to: to.to_string(),
            subject: format!("{} - Order Confirmation", cafe_name),
            body,
        }
    }
}

/// Delivers order confirmations
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &OrderConfirmation) -> Result<(), NotificationError>;
}

/// Writes confirmations to the log instead of a mail server.
#[derive(Debug, Clone)]
pub struct LogMailer {
    sender: String,
}

impl LogMailer {
    pub fn new(sender: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
        }
    }
}

#[async_trait]
impl Mailer for LogMailer {
    #[instrument(skip(self, message), fields(order_id = message.order_id))]
    async fn send(&self, message: &OrderConfirmation) -> Result<(), NotificationError> {
        info!(
            from = %self.sender,
            to = %message.to,
            subject = %message.subject,
            body = %message.body,
            "Order confirmation"
        );
        Ok(())
    }
}

/// Keeps confirmations in memory.
#[derive(Debug, Default)]
pub struct MemoryMailer {
    sent: Mutex<Vec<OrderConfirmation>>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sent(&self) -> Vec<OrderConfirmation> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, message: &OrderConfirmation) -> Result<(), NotificationError> {
        self.sent.lock().await.push(message.clone());
        Ok(())
    }
}
