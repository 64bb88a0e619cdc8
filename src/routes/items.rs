use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::items::ItemList,
    error::AppResult,
    services::item_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/items", get(list_items))
}

#[utoipa::path(
    get,
    path = "/items",
    responses(
        (status = 200, description = "Full item catalog", body = ItemList),
        (status = 500, description = "Database failure"),
    ),
    tag = "Items"
)]
pub async fn list_items(State(state): State<AppState>) -> AppResult<Json<ItemList>> {
    let items = item_service::list_items(&state.orm).await?;
    Ok(Json(ItemList { items }))
}
