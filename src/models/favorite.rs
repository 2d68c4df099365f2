use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Favorite {
    pub id: i32,
    pub user_id: i32,
    pub cat_id: i32,
}

/// Catalog entry as listed in a user's favorites.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct FavoriteCat {
    pub id: i32,
    pub breed: String,
    pub image_path: String,
}

/// Body of `POST`/`DELETE /auth/favorites`. The user comes from the token.
#[derive(Debug, Deserialize)]
pub struct FavoriteRequest {
    pub cat_id: i32,
}
