use axum::{
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode},
};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};
use shopping_cart_api::{
    app::create_app,
    config::AppConfig,
    db::run_migrations,
    dto::cart::{CartItemRequest, CartItemResponse, CartResponse},
    entity::{
        cart::{self, Entity as Cart},
        items::ActiveModel as ItemActive,
    },
    error::AppError,
    services::cart_service,
    state::AppState,
};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

// Flow tests against a real Postgres. Each test inserts its own item and
// derives user ids from it, so runs never collide and nothing is truncated.

async fn setup_state() -> anyhow::Result<Option<AppState>> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run cart flow tests."
            );
            return Ok(None);
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await?;
    run_migrations(&pool).await?;
    Ok(Some(AppState::new(pool)))
}

async fn create_item(state: &AppState, name: &str) -> anyhow::Result<i64> {
    let item = ItemActive {
        id: NotSet,
        name: Set(name.to_string()),
        description: Set(format!("{name} for testing")),
        price: Set(Decimal::new(1050, 2)),
    }
    .insert(&state.orm)
    .await?;
    Ok(item.id)
}

fn user_for(item_id: i64, offset: i64) -> i64 {
    1_000_000 + item_id * 10 + offset
}

async fn rows_for(state: &AppState, user_id: i64, item_id: i64) -> anyhow::Result<u64> {
    let count = Cart::find()
        .filter(cart::Column::UserId.eq(user_id))
        .filter(cart::Column::ItemId.eq(item_id))
        .count(&state.orm)
        .await?;
    Ok(count)
}

fn request(item_id: i64, user_id: i64, count: i32) -> CartItemRequest {
    CartItemRequest {
        item_id,
        user_id,
        count,
    }
}

#[tokio::test]
async fn first_add_creates_a_single_row() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let item_id = create_item(&state, "Widget").await?;
    let user_id = user_for(item_id, 0);

    let view = cart_service::add_cart_item(&state.pool, &request(item_id, user_id, 3)).await?;
    assert_eq!(view.count, 3);
    assert_eq!(view.item.id, item_id);
    assert_eq!(view.item.name, "Widget");
    assert_eq!(view.item.price, Decimal::new(1050, 2));
    assert_eq!(rows_for(&state, user_id, item_id).await?, 1);
    Ok(())
}

#[tokio::test]
async fn repeated_add_increments_the_same_row() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let item_id = create_item(&state, "Gadget").await?;
    let user_id = user_for(item_id, 0);

    let first = cart_service::add_cart_item(&state.pool, &request(item_id, user_id, 2)).await?;
    let second = cart_service::add_cart_item(&state.pool, &request(item_id, user_id, 5)).await?;

    assert_eq!(first.id, second.id);
    assert_eq!(second.count, 7);
    assert_eq!(rows_for(&state, user_id, item_id).await?, 1);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_adds_never_duplicate_a_pair() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let item_id = create_item(&state, "Contended").await?;
    let user_id = user_for(item_id, 0);

    let mut handles = Vec::new();
    for _ in 0..8 {
        let pool = state.pool.clone();
        handles.push(tokio::spawn(async move {
            cart_service::add_cart_item(&pool, &request(item_id, user_id, 1)).await
        }));
    }
    for handle in handles {
        handle.await??;
    }

    assert_eq!(rows_for(&state, user_id, item_id).await?, 1);
    let cart = cart_service::list_cart_items(&state.pool, user_id).await?;
    assert_eq!(cart.len(), 1);
    assert_eq!(cart[0].count, 8);
    Ok(())
}

#[tokio::test]
async fn list_returns_exactly_the_users_rows() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let first_item = create_item(&state, "Listed A").await?;
    let second_item = create_item(&state, "Listed B").await?;
    let user_id = user_for(first_item, 1);
    let other_user = user_for(first_item, 2);

    assert!(cart_service::list_cart_items(&state.pool, user_id).await?.is_empty());

    let a = cart_service::add_cart_item(&state.pool, &request(first_item, user_id, 1)).await?;
    let b = cart_service::add_cart_item(&state.pool, &request(second_item, user_id, 4)).await?;
    cart_service::add_cart_item(&state.pool, &request(first_item, other_user, 9)).await?;

    let mut ids: Vec<i64> = cart_service::list_cart_items(&state.pool, user_id)
        .await?
        .into_iter()
        .map(|view| view.id)
        .collect();
    ids.sort_unstable();
    let mut expected = vec![a.id, b.id];
    expected.sort_unstable();
    assert_eq!(ids, expected);
    Ok(())
}

#[tokio::test]
async fn update_replaces_fields_and_reports_missing_rows() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let item_id = create_item(&state, "Replaced").await?;
    let user_id = user_for(item_id, 0);

    let created = cart_service::add_cart_item(&state.pool, &request(item_id, user_id, 4)).await?;
    let updated =
        cart_service::replace_cart_item(&state.pool, created.id, &request(item_id, user_id, 6))
            .await?;
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.count, 6);

    let fetched = cart_service::find_cart_item(&state.pool, created.id).await?;
    assert_eq!(fetched, updated);

    let missing =
        cart_service::replace_cart_item(&state.pool, i64::MAX, &request(item_id, user_id, 1))
            .await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));
    Ok(())
}

#[tokio::test]
async fn delete_removes_the_row() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let item_id = create_item(&state, "Deleted").await?;
    let user_id = user_for(item_id, 0);

    let created = cart_service::add_cart_item(&state.pool, &request(item_id, user_id, 1)).await?;
    cart_service::remove_cart_item(&state.pool, created.id).await?;

    let gone = cart_service::find_cart_item(&state.pool, created.id).await;
    assert!(matches!(gone, Err(AppError::NotFound(_))));

    let again = cart_service::remove_cart_item(&state.pool, created.id).await;
    assert!(matches!(again, Err(AppError::NotFound(_))));
    Ok(())
}

#[tokio::test]
async fn adding_an_unknown_item_is_a_client_error() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let item_id = create_item(&state, "Anchor").await?;
    let user_id = user_for(item_id, 0);

    let err = cart_service::add_cart_item(&state.pool, &request(i64::MAX, user_id, 1))
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn moving_a_row_onto_a_held_pair_conflicts() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let first_item = create_item(&state, "Held A").await?;
    let second_item = create_item(&state, "Held B").await?;
    let user_id = user_for(first_item, 0);

    let moved = cart_service::add_cart_item(&state.pool, &request(first_item, user_id, 1)).await?;
    cart_service::add_cart_item(&state.pool, &request(second_item, user_id, 1)).await?;

    let put_body = format!(r#"{{"itemId":{second_item},"userId":{user_id},"count":3}}"#);
    let (status, bytes) = call(
        &state,
        Method::PUT,
        &format!("/cart/item/{}", moved.id),
        Some(put_body),
    )
    .await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(bytes, b"cart item already exists for this user and item");

    let unchanged = cart_service::find_cart_item(&state.pool, moved.id).await?;
    assert_eq!(unchanged.item.id, first_item);
    assert_eq!(unchanged.count, 1);
    Ok(())
}

#[tokio::test]
async fn increment_past_the_count_limit_is_rejected() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let item_id = create_item(&state, "Hoarded").await?;
    let user_id = user_for(item_id, 0);

    let full =
        cart_service::add_cart_item(&state.pool, &request(item_id, user_id, i32::MAX)).await?;
    let body = format!(r#"{{"itemId":{item_id},"userId":{user_id},"count":1}}"#);
    let (status, bytes) = call(&state, Method::POST, "/cart/item", Some(body)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        String::from_utf8(bytes)?,
        format!("count overflow for cart item {}", full.id)
    );

    let kept = cart_service::find_cart_item(&state.pool, full.id).await?;
    assert_eq!(kept.count, i32::MAX);
    Ok(())
}

async fn call(
    state: &AppState,
    method: Method,
    uri: &str,
    body: Option<String>,
) -> anyhow::Result<(StatusCode, Vec<u8>)> {
    let config = AppConfig::from_lookup(|_| None)?;
    let app = create_app(state.clone(), &config);

    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json)
        }
        None => Body::empty(),
    };
    let response = app.oneshot(builder.body(body)?).await?;
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    Ok((status, bytes.to_vec()))
}

#[tokio::test]
async fn http_flow_posts_twice_then_reads_updates_and_deletes() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let item_id = create_item(&state, "Http Widget").await?;
    let user_id = user_for(item_id, 0);
    let body = format!(r#"{{"itemId":{item_id},"userId":{user_id},"count":1}}"#);

    let (status, _) = call(&state, Method::GET, &format!("/cart/{user_id}"), None).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, bytes) = call(&state, Method::POST, "/cart/item", Some(body.clone())).await?;
    assert_eq!(status, StatusCode::CREATED);
    let first: CartItemResponse = serde_json::from_slice(&bytes)?;
    assert_eq!(first.cart_item.count, 1);

    let (status, bytes) = call(&state, Method::POST, "/cart/item", Some(body)).await?;
    assert_eq!(status, StatusCode::CREATED);
    let second: CartItemResponse = serde_json::from_slice(&bytes)?;
    assert_eq!(second.cart_item.id, first.cart_item.id);
    assert_eq!(second.cart_item.count, 2);

    let (status, bytes) = call(&state, Method::GET, &format!("/cart/{user_id}"), None).await?;
    assert_eq!(status, StatusCode::OK);
    let cart: CartResponse = serde_json::from_slice(&bytes)?;
    assert_eq!(cart.cart_items.len(), 1);
    let raw: serde_json::Value = serde_json::from_slice(&bytes)?;
    assert_eq!(raw["cartItems"][0]["item"]["price"], serde_json::json!(10.5));

    let id = first.cart_item.id;
    let put_body = format!(r#"{{"itemId":{item_id},"userId":{user_id},"count":6}}"#);
    let (status, bytes) =
        call(&state, Method::PUT, &format!("/cart/item/{id}"), Some(put_body)).await?;
    assert_eq!(status, StatusCode::OK);
    let replaced: CartItemResponse = serde_json::from_slice(&bytes)?;
    assert_eq!(replaced.cart_item.count, 6);

    let (status, bytes) = call(&state, Method::DELETE, &format!("/cart/item/{id}"), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(bytes.is_empty());

    let (status, _) = call(&state, Method::DELETE, &format!("/cart/item/{id}"), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, bytes) = call(&state, Method::GET, &format!("/cart/{user_id}"), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bytes, br#"{"cartItems":[]}"#);
    Ok(())
}

#[tokio::test]
async fn catalog_lists_seeded_items() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let item_id = create_item(&state, "Catalog Entry").await?;

    let (status, bytes) = call(&state, Method::GET, "/items", None).await?;
    assert_eq!(status, StatusCode::OK);
    let raw: serde_json::Value = serde_json::from_slice(&bytes)?;
    let items = raw["items"].as_array().cloned().unwrap_or_default();
    assert!(items.iter().any(|item| item["id"] == serde_json::json!(item_id)));
    Ok(())
}
