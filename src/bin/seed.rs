use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, EntityTrait, PaginatorTrait, Set};
use shopping_cart_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
    entity::items::{ActiveModel as ItemActive, Entity as Items},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config).await?;
    run_migrations(&pool).await?;
    let orm = create_orm_conn(pool.clone());

    let existing = Items::find().count(&orm).await?;
    if existing > 0 {
        println!("Catalog already has {existing} items, nothing to seed");
        return Ok(());
    }

    let items = [
        ("Ferris Plush", "Soft crab for your desk", Decimal::new(1999, 2)),
        ("Rust Mug", "Holds 350ml of coffee", Decimal::new(1250, 2)),
        ("Sticker Pack", "Ten vinyl stickers", Decimal::new(499, 2)),
        ("Async Book", "A guide to async Rust", Decimal::new(3900, 2)),
    ];

    for (name, description, price) in items {
        ItemActive {
            id: NotSet,
            name: Set(name.to_string()),
            description: Set(description.to_string()),
            price: Set(price),
        }
        .insert(&orm)
        .await?;
    }

    println!("Seeded {} items", items.len());
    pool.close().await;
    Ok(())
}
