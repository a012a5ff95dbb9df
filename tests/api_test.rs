mod common;

use std::str::FromStr;

use common::TestApp;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

fn decimal(value: &Value) -> Decimal {
    match value {
        Value::String(s) => Decimal::from_str(s).expect("decimal string"),
        Value::Number(n) => Decimal::from_str(&n.to_string()).expect("decimal number"),
        other => panic!("not a decimal: {other}"),
    }
}

fn mocha_order() -> Value {
    json!({
        "customer_name": "Ada",
        "customer_email": "ada@example.com",
        "items": [
            { "category": "Coffee", "item_name": "Mocha", "unit_price": "4.50", "quantity": 3 },
            { "category": "Dessert", "item_name": "Cherry Pie", "unit_price": "2.75", "quantity": 1 }
        ]
    })
}

#[tokio::test]
async fn health_reports_the_database_up() {
    let app = TestApp::new().await;
    let (status, body) = app.get("/health").await;

    assert_eq!(status, 200);
    assert_eq!(body["status"], "up");
    assert_eq!(body["environment"], "development");
}

#[tokio::test]
async fn menu_lists_both_categories() {
    let app = TestApp::new().await;
    let (status, body) = app.get("/api/v1/menu").await;

    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    let sections = body["data"].as_array().expect("sections");
    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0]["category"], "Coffee");
    assert_eq!(sections[0]["items"].as_array().unwrap().len(), 5);
    assert_eq!(sections[1]["category"], "Dessert");
    assert_eq!(sections[1]["items"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn json_order_is_created_and_readable() {
    let app = TestApp::new().await;

    let (status, body) = app.post_json("/api/v1/orders", mocha_order()).await;
    assert_eq!(status, 201);
    assert_eq!(body["message"], "Order placed successfully");
    let order_id = body["data"]["order"]["id"].as_i64().expect("order id");
    assert_eq!(decimal(&body["data"]["order"]["total_amount"]), dec!(16.25));

    let (status, body) = app.get(&format!("/api/v1/orders/{order_id}")).await;
    assert_eq!(status, 200);
    let items = body["data"]["items"].as_array().expect("items");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["item_name"], "Mocha");
    assert_eq!(items[0]["customer_email"], "ada@example.com");
    assert_eq!(decimal(&items[0]["subtotal"]), dec!(13.50));

    assert_eq!(app.mailer.sent().await.len(), 1);
}

#[tokio::test]
async fn unknown_order_is_404() {
    let app = TestApp::new().await;
    let (status, body) = app.get("/api/v1/orders/404").await;

    assert_eq!(status, 404);
    assert_eq!(body["error"], "Not Found");
}

#[tokio::test]
async fn empty_order_is_400() {
    let app = TestApp::new().await;
    let (status, body) = app
        .post_json("/api/v1/orders", json!({ "customer_name": "Ada", "items": [] }))
        .await;

    assert_eq!(status, 400);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("Please select at least one item"));
}

#[tokio::test]
async fn ordering_form_places_an_order() {
    let app = TestApp::new().await;
    let form = "customer_name=Grace\
        &order_items=Coffee%7C%7CCaramel+Macchiato%7C%7C3.75\
        &order_items=Dessert%7C%7CDonut%7C%7C1.50\
        &qty_Caramel_Macchiato=3";

    let (status, body) = app.post_form("/order", form).await;

    assert_eq!(status, 201);
    assert_eq!(decimal(&body["data"]["order"]["total_amount"]), dec!(12.75));
    let items = body["data"]["items"].as_array().unwrap();
    assert_eq!(items[0]["item_name"], "Caramel Macchiato");
    assert_eq!(items[0]["quantity"], 3);
    assert_eq!(items[1]["customer_name"], "Grace");
    assert!(items[1]["customer_email"].is_null());
    assert!(app.mailer.sent().await.is_empty());
}

#[tokio::test]
async fn malformed_selection_is_400() {
    let app = TestApp::new().await;
    let (status, _) = app
        .post_form("/order", "order_items=Coffee%7C%7CMocha")
        .await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn negative_unit_price_is_400_and_stores_nothing() {
    let app = TestApp::new().await;
    let order = json!({
        "customer_name": "Ada",
        "items": [
            { "category": "Coffee", "item_name": "Mocha", "unit_price": "-4.50", "quantity": 2 }
        ]
    });

    let (status, body) = app.post_json("/api/v1/orders", order).await;
    assert_eq!(status, 400);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("must not be negative"));

    let (status, _) = app
        .post_form("/order", "order_items=Coffee%7C%7CMocha%7C%7C-4.50")
        .await;
    assert_eq!(status, 400);

    let (_, listing) = app.get("/api/v1/orders").await;
    assert_eq!(listing["data"]["total"], 0);
}

#[tokio::test]
async fn orders_are_listed_newest_first() {
    let app = TestApp::new().await;
    app.post_json("/api/v1/orders", mocha_order()).await;
    let (_, second) = app.post_json("/api/v1/orders", mocha_order()).await;

    let (status, body) = app.get("/api/v1/orders?page=1&per_page=5").await;

    assert_eq!(status, 200);
    assert_eq!(body["data"]["total"], 2);
    assert_eq!(body["data"]["per_page"], 5);
    assert_eq!(
        body["data"]["orders"][0]["id"],
        second["data"]["order"]["id"]
    );
}
