pub mod cart_service;
pub mod item_service;
