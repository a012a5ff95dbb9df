//! The café menu and the selection tokens the ordering form submits.

use crate::errors::ServiceError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// Separator between the fields of a selection token.
pub const SELECTION_SEPARATOR: &str = "||";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Category {
    Coffee,
    Dessert,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub category: Category,
    pub name: String,
    pub price: Decimal,
}

impl MenuItem {
    fn new(category: Category, name: &str, price: Decimal) -> Self {
        Self {
            category,
            name: name.to_string(),
            price,
        }
    }

    /// Token the ordering form posts for this item.
    pub fn selection_token(&self) -> String {
        format!(
            "{}{sep}{}{sep}{:.2}",
            self.category,
            self.name,
            self.price,
            sep = SELECTION_SEPARATOR
        )
    }

    /// Form field carrying this item's quantity.
    pub fn quantity_key(&self) -> String {
        quantity_key(&self.name)
    }
}

/// Items the café serves, grouped by category in insertion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Menu {
    items: Vec<MenuItem>,
}

impl Menu {
    pub fn new(items: Vec<MenuItem>) -> Self {
        Self { items }
    }

    pub fn cafe_default() -> Self {
        use Category::{Coffee, Dessert};

        Self::new(vec![
            MenuItem::new(Coffee, "French Vanilla", dec!(3.00)),
            MenuItem::new(Coffee, "Caramel Macchiato", dec!(3.75)),
            MenuItem::new(Coffee, "Pumpkin Spice", dec!(3.50)),
            MenuItem::new(Coffee, "Hazelnut", dec!(4.00)),
            MenuItem::new(Coffee, "Mocha", dec!(4.50)),
            MenuItem::new(Dessert, "Donut", dec!(1.50)),
            MenuItem::new(Dessert, "Cherry Pie", dec!(2.75)),
            MenuItem::new(Dessert, "Cheesecake", dec!(3.00)),
            MenuItem::new(Dessert, "Cinnamon Roll", dec!(2.50)),
        ])
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn in_category(&self, category: Category) -> impl Iterator<Item = &MenuItem> + '_ {
        self.items
            .iter()
            .filter(move |item| item.category == category)
    }

    pub fn find(&self, name: &str) -> Option<&MenuItem> {
        self.items
            .iter()
            .find(|item| item.name.eq_ignore_ascii_case(name))
    }

    /// Menu as `(category, items)` sections, in category declaration order.
    pub fn sections(&self) -> Vec<MenuSection> {
        Category::iter()
            .map(|category| MenuSection {
                category,
                items: self.in_category(category).cloned().collect(),
            })
            .collect()
    }
}

impl Default for Menu {
    fn default() -> Self {
        Self::cafe_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuSection {
    pub category: Category,
    pub items: Vec<MenuItem>,
}

/// One item picked on the ordering form: `<category>||<name>||<price>`.
///
/// The category stays free text; the stored column is not restricted to the
/// menu's categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub category: String,
    pub name: String,
    pub price: Decimal,
}

impl FromStr for Selection {
    type Err = ServiceError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = token.split(SELECTION_SEPARATOR).collect();
        let [category, name, price] = parts.as_slice() else {
            return Err(ServiceError::InvalidInput(format!(
                "selection '{}' must have the form category||name||price",
                token
            )));
        };

        let price = Decimal::from_str(price.trim()).map_err(|_| {
            ServiceError::InvalidInput(format!("selection '{}' has an invalid price", token))
        })?;

        Ok(Self {
            category: category.trim().to_string(),
            name: name.trim().to_string(),
            price,
        })
    }
}

/// Form field name holding the quantity for `item_name`.
pub fn quantity_key(item_name: &str) -> String {
    format!("qty_{}", item_name.replace(' ', "_"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_menu_lists_coffees_then_desserts() {
        let menu = Menu::cafe_default();
        let sections = menu.sections();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].category, Category::Coffee);
        assert_eq!(sections[0].items.len(), 5);
        assert_eq!(sections[1].category, Category::Dessert);
        assert_eq!(sections[1].items.len(), 4);
    }

    #[test]
    fn find_ignores_case() {
        let menu = Menu::cafe_default();
        let item = menu.find("caramel macchiato").expect("on the menu");
        assert_eq!(item.price, dec!(3.75));
        assert!(menu.find("Espresso").is_none());
    }

    #[test]
    fn selection_token_parses_back() {
        let menu = Menu::cafe_default();
        let pie = menu.find("Cherry Pie").unwrap();
        assert_eq!(pie.selection_token(), "Dessert||Cherry Pie||2.75");

        let selection: Selection = pie.selection_token().parse().unwrap();
        assert_eq!(selection.category, "Dessert");
        assert_eq!(selection.name, "Cherry Pie");
        assert_eq!(selection.price, dec!(2.75));
    }

    #[test]
    fn malformed_selections_are_rejected() {
        assert!(matches!(
            "Coffee||Mocha".parse::<Selection>(),
            Err(ServiceError::InvalidInput(_))
        ));
        assert!(matches!(
            "Coffee||Mocha||cheap".parse::<Selection>(),
            Err(ServiceError::InvalidInput(_))
        ));
        assert!(matches!(
            "Coffee||Mocha||4.50||extra".parse::<Selection>(),
            Err(ServiceError::InvalidInput(_))
        ));
    }

    #[test]
    fn quantity_key_replaces_spaces() {
        assert_eq!(quantity_key("Cinnamon Roll"), "qty_Cinnamon_Roll");
        assert_eq!(quantity_key("Mocha"), "qty_Mocha");
    }

    #[test]
    fn category_parses_case_insensitively() {
        assert_eq!("coffee".parse::<Category>().unwrap(), Category::Coffee);
        assert_eq!(Category::Dessert.to_string(), "Dessert");
    }
}
