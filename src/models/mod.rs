pub mod auth;
pub mod cat;
pub mod favorite;
pub mod user;
