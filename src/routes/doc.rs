use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        cart::{CartItemRequest, CartItemResponse, CartResponse},
        items::ItemList,
    },
    models::{CartItemView, Item},
    routes::{cart, health, items},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        cart::add_cart_item,
        cart::get_cart,
        cart::update_cart_item,
        cart::delete_cart_item,
        items::list_items
    ),
    components(
        schemas(
            Item,
            CartItemView,
            CartItemRequest,
            CartItemResponse,
            CartResponse,
            ItemList,
            health::HealthData
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Cart", description = "Shopping cart endpoints"),
        (name = "Items", description = "Item catalog endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
