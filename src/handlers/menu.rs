use axum::{extract::State, response::Json};

use crate::{menu::MenuSection, ApiResponse, AppState};

/// The menu grouped by category
pub async fn get_menu(State(state): State<AppState>) -> Json<ApiResponse<Vec<MenuSection>>> {
    Json(ApiResponse::success(state.services.menu.sections()))
}
