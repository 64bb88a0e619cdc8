use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    routing::{get, post, put},
};

use crate::{
    dto::cart::{CartItemRequest, CartItemResponse, CartResponse},
    error::AppResult,
    routes::params::non_zero_id,
    services::cart_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        // `GET /cart/item` is a cart lookup with a non-numeric user id, not a 405.
        .route("/item", post(add_cart_item).get(get_cart))
        .route("/item/{id}", put(update_cart_item).delete(delete_cart_item))
        .route("/{user_id}", get(get_cart))
}

#[utoipa::path(
    post,
    path = "/cart/item",
    request_body = CartItemRequest,
    responses(
        (status = 201, description = "Item added, or count incremented if already in the cart", body = CartItemResponse),
        (status = 400, description = "Malformed body, failed validation or unknown item"),
        (status = 500, description = "Database failure"),
    ),
    tag = "Cart"
)]
pub async fn add_cart_item(
    State(state): State<AppState>,
    payload: Result<Json<CartItemRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<CartItemResponse>)> {
    let Json(req) = payload?;
    let cart_item = cart_service::add_cart_item(&state.pool, &req).await?;
    Ok((StatusCode::CREATED, Json(CartItemResponse { cart_item })))
}

#[utoipa::path(
    get,
    path = "/cart/{user_id}",
    params(
        ("user_id" = i64, Path, description = "User whose cart is listed")
    ),
    responses(
        (status = 200, description = "Cart contents, possibly empty", body = CartResponse),
        (status = 400, description = "Non-numeric or zero user id"),
    ),
    tag = "Cart"
)]
pub async fn get_cart(
    State(state): State<AppState>,
    user_id: Result<Path<i64>, PathRejection>,
) -> AppResult<Json<CartResponse>> {
    let user_id = non_zero_id(user_id, "userId")?;
    let cart_items = cart_service::list_cart_items(&state.pool, user_id).await?;
    Ok(Json(CartResponse { cart_items }))
}

#[utoipa::path(
    put,
    path = "/cart/item/{id}",
    params(
        ("id" = i64, Path, description = "Cart item id")
    ),
    request_body = CartItemRequest,
    responses(
        (status = 200, description = "Cart item replaced", body = CartItemResponse),
        (status = 400, description = "Bad id, malformed body or failed validation"),
        (status = 404, description = "Cart item not found"),
        (status = 409, description = "Another cart item already holds this user and item"),
    ),
    tag = "Cart"
)]
pub async fn update_cart_item(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<CartItemRequest>, JsonRejection>,
) -> AppResult<Json<CartItemResponse>> {
    let id = non_zero_id(id, "id")?;
    let Json(req) = payload?;
    let cart_item = cart_service::replace_cart_item(&state.pool, id, &req).await?;
    Ok(Json(CartItemResponse { cart_item }))
}

#[utoipa::path(
    delete,
    path = "/cart/item/{id}",
    params(
        ("id" = i64, Path, description = "Cart item id")
    ),
    responses(
        (status = 200, description = "Deleted"),
        (status = 400, description = "Non-numeric or zero id"),
        (status = 404, description = "Cart item not found"),
    ),
    tag = "Cart"
)]
pub async fn delete_cart_item(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> AppResult<StatusCode> {
    let id = non_zero_id(id, "id")?;
    cart_service::remove_cart_item(&state.pool, id).await?;
    Ok(StatusCode::OK)
}
