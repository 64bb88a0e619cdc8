//! Cart rows and the add-to-cart merge.
//!
//! Every function takes the executor it should run on, so the same statements
//! work against the pool or inside a transaction. Dropping the returned future
//! (client disconnect, request timeout) cancels the statement in flight.

use rust_decimal::Decimal;
use sqlx::{FromRow, PgConnection, PgExecutor};

use crate::{
    db::DbPool,
    dto::cart::CartItemRequest,
    error::{AppError, AppResult, DbResultExt},
    models::{CartItemRelation, CartItemView, Item},
};

#[derive(FromRow)]
struct CartItemRow {
    id: i64,
    count: i32,
    item_id: i64,
    name: String,
    description: String,
    price: Decimal,
}

impl From<CartItemRow> for CartItemView {
    fn from(row: CartItemRow) -> Self {
        CartItemView {
            id: row.id,
            count: row.count,
            item: Item {
                id: row.item_id,
                name: row.name,
                description: row.description,
                price: row.price,
            },
        }
    }
}

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("cart item {id}"))
}

/// All cart rows for `user_id`, joined with their items. Empty when the user
/// has nothing in the cart.
pub async fn list_cart_items(
    db: impl PgExecutor<'_>,
    user_id: i64,
) -> AppResult<Vec<CartItemView>> {
    let rows = sqlx::query_as::<_, CartItemRow>(
        r#"
        SELECT c.id, c.count, i.id AS item_id, i.name, i.description, i.price
        FROM cart c
        JOIN item i ON i.id = c.item_id
        WHERE c.user_id = $1
        ORDER BY c.id
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
    .db_op(|| format!("list_cart_items user_id={user_id}"))?;

    Ok(rows.into_iter().map(CartItemView::from).collect())
}

pub async fn find_cart_item(db: impl PgExecutor<'_>, id: i64) -> AppResult<CartItemView> {
    let row = sqlx::query_as::<_, CartItemRow>(
        r#"
        SELECT c.id, c.count, i.id AS item_id, i.name, i.description, i.price
        FROM cart c
        JOIN item i ON i.id = c.item_id
        WHERE c.id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
    .db_op(|| format!("find_cart_item id={id}"))?;

    row.map(CartItemView::from).ok_or_else(|| not_found(id))
}

/// Point lookup on the (item_id, user_id) unique key. Inside a transaction
/// the matching row stays locked until commit.
pub async fn find_relation_id(
    db: impl PgExecutor<'_>,
    user_id: i64,
    item_id: i64,
) -> AppResult<Option<i64>> {
    let id: Option<(i64,)> = sqlx::query_as(
        "SELECT id FROM cart WHERE item_id = $1 AND user_id = $2 FOR UPDATE",
    )
    .bind(item_id)
    .bind(user_id)
    .fetch_optional(db)
    .await
    .db_op(|| format!("find_relation_id user_id={user_id} item_id={item_id}"))?;

    Ok(id.map(|(id,)| id))
}

/// Insert a cart row and return its id. If the (item, user) pair was created
/// concurrently, that row's count is incremented instead of failing.
pub async fn create_relation(db: impl PgExecutor<'_>, rel: CartItemRelation) -> AppResult<i64> {
    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO cart (item_id, user_id, count)
        VALUES ($1, $2, $3)
        ON CONFLICT (item_id, user_id)
        DO UPDATE SET count = cart.count + EXCLUDED.count
        RETURNING id
        "#,
    )
    .bind(rel.item_id)
    .bind(rel.user_id)
    .bind(rel.count)
    .fetch_one(db)
    .await
    .db_op(|| {
        format!(
            "create_relation item_id={} user_id={} count={}",
            rel.item_id, rel.user_id, rel.count
        )
    })?;

    Ok(id)
}

/// Replace item, user and count of row `id`. A row that no longer exists is
/// reported as not found rather than silently ignored.
pub async fn update_relation(
    db: impl PgExecutor<'_>,
    id: i64,
    rel: CartItemRelation,
) -> AppResult<()> {
    let result = sqlx::query(
        r#"
        UPDATE cart
        SET item_id = $1, user_id = $2, count = $3
        WHERE id = $4
        "#,
    )
    .bind(rel.item_id)
    .bind(rel.user_id)
    .bind(rel.count)
    .bind(id)
    .execute(db)
    .await
    .db_op(|| {
        format!(
            "update_relation id={id} item_id={} user_id={} count={}",
            rel.item_id, rel.user_id, rel.count
        )
    })?;

    if result.rows_affected() == 0 {
        return Err(not_found(id));
    }
    Ok(())
}

/// Delete row `id`, failing with not found if it does not exist.
pub async fn delete_cart_item(conn: &mut PgConnection, id: i64) -> AppResult<()> {
    find_cart_item(&mut *conn, id).await?;

    sqlx::query("DELETE FROM cart WHERE id = $1")
        .bind(id)
        .execute(&mut *conn)
        .await
        .db_op(|| format!("delete_cart_item id={id}"))?;

    Ok(())
}

/// Add `count` units of an item to a user's cart. An existing row for the
/// pair is incremented; otherwise a new row is created. Returns the row as
/// stored after the write.
pub async fn add_cart_item(pool: &DbPool, req: &CartItemRequest) -> AppResult<CartItemView> {
    req.validate()?;

    let mut tx = pool
        .begin()
        .await
        .db_op(|| "add_cart_item begin".to_string())?;

    let id = match find_relation_id(&mut *tx, req.user_id, req.item_id).await? {
        Some(id) => {
            let existing = find_cart_item(&mut *tx, id).await?;
            let count = existing.count.checked_add(req.count).ok_or_else(|| {
                AppError::BadRequest(format!("count overflow for cart item {id}"))
            })?;
            update_relation(&mut *tx, id, CartItemRelation { count, ..req.relation() }).await?;
            tracing::debug!(cart_item_id = id, count, "incremented cart item");
            id
        }
        None => {
            let id = create_relation(&mut *tx, req.relation()).await?;
            tracing::debug!(cart_item_id = id, count = req.count, "created cart item");
            id
        }
    };

    tx.commit()
        .await
        .db_op(|| format!("add_cart_item commit id={id}"))?;

    find_cart_item(pool, id).await
}

/// Fully replace row `id` with the request's fields. Unlike
/// [`add_cart_item`], the count is overwritten, not incremented.
pub async fn replace_cart_item(
    pool: &DbPool,
    id: i64,
    req: &CartItemRequest,
) -> AppResult<CartItemView> {
    req.validate()?;
    update_relation(pool, id, req.relation()).await?;
    find_cart_item(pool, id).await
}

/// Acquire a connection and delete row `id`.
pub async fn remove_cart_item(pool: &DbPool, id: i64) -> AppResult<()> {
    let mut conn = pool
        .acquire()
        .await
        .db_op(|| format!("remove_cart_item acquire id={id}"))?;
    delete_cart_item(&mut conn, id).await
}
