pub mod cart;
pub mod favorite;
pub mod password;
pub mod recipe;
pub mod reference;
pub mod shopping_list;
pub mod subscription;
pub mod token;
pub mod user;
