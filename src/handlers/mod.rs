pub mod health;
pub mod menu;
pub mod orders;

use std::sync::Arc;

use crate::{db::DbPool, menu::Menu, notifications::Mailer, services::OrderService};

/// Services shared by the HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub order: Arc<OrderService>,
    pub menu: Arc<Menu>,
}

impl AppServices {
    pub fn new(db: Arc<DbPool>, mailer: Arc<dyn Mailer>, cafe_name: &str, menu: Menu) -> Self {
        Self {
            order: Arc::new(OrderService::new(db, mailer, cafe_name)),
            menu: Arc::new(menu),
        }
    }
}
