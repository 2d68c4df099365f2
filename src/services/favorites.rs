use sqlx::PgPool;

use crate::models::favorite::{Favorite, FavoriteCat};

pub struct FavoriteService;

impl FavoriteService {
    pub async fn list(pool: &PgPool, user_id: i32) -> anyhow::Result<Vec<FavoriteCat>> {
        let cats = sqlx::query_as::<_, FavoriteCat>(
            "SELECT cats.id, cats.breed, cats.image_path
             FROM favorites
             JOIN cats ON favorites.cat_id = cats.id
             WHERE favorites.user_id = $1
             ORDER BY favorites.id",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;
        Ok(cats)
    }

    /// Returns `None` if the pair is already present.
    pub async fn add(pool: &PgPool, user_id: i32, cat_id: i32) -> anyhow::Result<Option<Favorite>> {
        let favorite = sqlx::query_as::<_, Favorite>(
            "INSERT INTO favorites (user_id, cat_id)
             VALUES ($1, $2)
             ON CONFLICT (user_id, cat_id) DO NOTHING
             RETURNING id, user_id, cat_id",
        )
        .bind(user_id)
        .bind(cat_id)
        .fetch_optional(pool)
        .await?;
        Ok(favorite)
    }

    /// Returns `false` if the cat was not in the user's favorites.
    pub async fn remove(pool: &PgPool, user_id: i32, cat_id: i32) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND cat_id = $2")
            .bind(user_id)
            .bind(cat_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
