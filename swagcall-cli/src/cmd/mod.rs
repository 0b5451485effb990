pub mod call;
pub mod health;
pub mod info;
pub mod list;
