use sea_orm::{EntityTrait, QueryOrder};

use crate::{
    db::OrmConn,
    entity::items::{Column, Entity as Items, Model as ItemModel},
    error::AppResult,
    models::Item,
};

/// The whole catalog, ordered by id.
pub async fn list_items(orm: &OrmConn) -> AppResult<Vec<Item>> {
    let items = Items::find()
        .order_by_asc(Column::Id)
        .all(orm)
        .await?
        .into_iter()
        .map(item_from_entity)
        .collect();
    Ok(items)
}

fn item_from_entity(model: ItemModel) -> Item {
    Item {
        id: model.id,
        name: model.name,
        description: model.description,
        price: model.price,
    }
}
