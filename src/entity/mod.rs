pub mod cart;
pub mod items;

pub use cart::Entity as Cart;
pub use items::Entity as Items;
