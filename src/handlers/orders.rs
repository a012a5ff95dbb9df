use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Form,
};
use serde::Deserialize;

use crate::{
    errors::ServiceError,
    services::orders::{OrderDetails, OrderListResponse, PlaceOrderRequest},
    ApiResponse, AppState,
};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

/// Place an order from a JSON body
pub async fn place_order(
    State(state): State<AppState>,
    Json(request): Json<PlaceOrderRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let placed = state.services.order.place_order(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(placed, "Order placed successfully")),
    ))
}

/// Place an order from the ordering form (`order_items` tokens plus `qty_*` fields)
pub async fn place_order_form(
    State(state): State<AppState>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Result<impl IntoResponse, ServiceError> {
    let request = PlaceOrderRequest::from_form(&fields)?;
    let placed = state.services.order.place_order(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(placed, "Order placed successfully")),
    ))
}

/// Get an order with its items
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<OrderDetails>>, ServiceError> {
    let details = state.services.order.get_order(id).await?;
    Ok(Json(ApiResponse::success(details)))
}

/// List orders, newest first
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<OrderListResponse>>, ServiceError> {
    let listing = state
        .services
        .order
        .list_orders(query.page.unwrap_or(1), query.per_page.unwrap_or(20))
        .await?;
    Ok(Json(ApiResponse::success(listing)))
}
