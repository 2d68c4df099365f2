use std::path::PathBuf;

use axum::extract::Multipart;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::cat::{Cat, NewCat, UpdateCatRequest, CARE_COMPLEXITY_RANGE};

/// URL prefix under which stored images are served.
pub const IMAGES_ROUTE: &str = "/images";

/// Why a `POST /cat` form was refused.
#[derive(Debug, thiserror::Error)]
pub enum CatFormError {
    #[error("failed to retrieve file")]
    MissingImage,

    #[error("only JPEG images are allowed")]
    NotJpeg,

    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("care_complexity must be an integer between 1 and 5")]
    InvalidCareComplexity,

    #[error("invalid multipart body")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    #[error("failed to save file")]
    Io(#[from] std::io::Error),
}

pub struct CatService;

impl CatService {
    /// Read the `POST /cat` form, store the image and return the row to insert.
    /// Nothing is written to disk unless every field is valid.
    pub async fn read_form(
        upload_dir: &str,
        mut multipart: Multipart,
    ) -> Result<NewCat, CatFormError> {
        let mut image: Option<Vec<u8>> = None;
        let mut breed = None;
        let mut fur = None;
        let mut temper = None;
        let mut care_complexity = None;

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or("").to_string();
            match name.as_str() {
                "image" => {
                    if field.content_type() != Some(mime::IMAGE_JPEG.as_ref()) {
                        return Err(CatFormError::NotJpeg);
                    }
                    image = Some(field.bytes().await?.to_vec());
                }
                "breed" => breed = Some(field.text().await?),
                "fur" => fur = Some(field.text().await?),
                "temper" => temper = Some(field.text().await?),
                "care_complexity" => care_complexity = Some(field.text().await?),
                _ => {}
            }
        }

        let image = image.ok_or(CatFormError::MissingImage)?;
        let breed = non_empty(breed).ok_or(CatFormError::MissingField("breed"))?;
        let fur = non_empty(fur).ok_or(CatFormError::MissingField("fur"))?;
        let temper = non_empty(temper).ok_or(CatFormError::MissingField("temper"))?;
        let care_complexity = care_complexity
            .ok_or(CatFormError::MissingField("care_complexity"))
            .and_then(|v| parse_care_complexity(&v))?;

        let image_path = Self::store_image(upload_dir, &image).await?;

        Ok(NewCat {
            breed,
            fur,
            temper,
            care_complexity,
            image_path,
        })
    }

    /// Write the JPEG under a generated name and return its public path.
    async fn store_image(upload_dir: &str, bytes: &[u8]) -> std::io::Result<String> {
        let dir = PathBuf::from(upload_dir);
        tokio::fs::create_dir_all(&dir).await?;
        let filename = format!("{}.jpg", Uuid::new_v4());
        tokio::fs::write(dir.join(&filename), bytes).await?;
        Ok(format!("{IMAGES_ROUTE}/{filename}"))
    }

    /// Best-effort removal of a stored image.
    pub async fn discard_image(upload_dir: &str, image_path: &str) {
        let Some(filename) = image_path.strip_prefix(&format!("{IMAGES_ROUTE}/")) else {
            return;
        };
        if let Err(e) = tokio::fs::remove_file(PathBuf::from(upload_dir).join(filename)).await {
            tracing::warn!("failed to remove image {filename}: {e}");
        }
    }

    pub async fn breed_exists(pool: &PgPool, breed: &str) -> anyhow::Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM cats WHERE breed = $1)")
            .bind(breed)
            .fetch_one(pool)
            .await?;
        Ok(exists)
    }

    pub async fn exists(pool: &PgPool, id: i32) -> anyhow::Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM cats WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await?;
        Ok(exists)
    }

    pub async fn create(pool: &PgPool, cat: &NewCat) -> anyhow::Result<Cat> {
        let cat = sqlx::query_as::<_, Cat>(
            "INSERT INTO cats (breed, fur, temper, care_complexity, image_path)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(&cat.breed)
        .bind(&cat.fur)
        .bind(&cat.temper)
        .bind(cat.care_complexity)
        .bind(&cat.image_path)
        .fetch_one(pool)
        .await?;
        Ok(cat)
    }

    pub async fn update(pool: &PgPool, req: &UpdateCatRequest) -> anyhow::Result<Option<Cat>> {
        let cat = sqlx::query_as::<_, Cat>(
            "UPDATE cats
             SET breed = $1, fur = $2, temper = $3, care_complexity = $4
             WHERE id = $5
             RETURNING *",
        )
        .bind(&req.breed)
        .bind(&req.fur)
        .bind(&req.temper)
        .bind(req.care_complexity)
        .bind(req.id)
        .fetch_optional(pool)
        .await?;
        Ok(cat)
    }

    /// Delete the row and return its image path, or `None` if no cat had that id.
    pub async fn delete(pool: &PgPool, id: i32) -> anyhow::Result<Option<String>> {
        let image_path: Option<String> =
            sqlx::query_scalar("DELETE FROM cats WHERE id = $1 RETURNING image_path")
                .bind(id)
                .fetch_optional(pool)
                .await?;
        Ok(image_path)
    }

    pub async fn get(pool: &PgPool, id: i32) -> anyhow::Result<Option<Cat>> {
        let cat = sqlx::query_as::<_, Cat>("SELECT * FROM cats WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(cat)
    }

    pub async fn list(pool: &PgPool) -> anyhow::Result<Vec<Cat>> {
        let cats = sqlx::query_as::<_, Cat>("SELECT * FROM cats ORDER BY id")
            .fetch_all(pool)
            .await?;
        Ok(cats)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Same field rules as the `POST /cat` form.
pub fn validate_update(req: &UpdateCatRequest) -> Result<(), CatFormError> {
    for (name, value) in [
        ("breed", &req.breed),
        ("fur", &req.fur),
        ("temper", &req.temper),
    ] {
        if value.trim().is_empty() {
            return Err(CatFormError::MissingField(name));
        }
    }
    if !CARE_COMPLEXITY_RANGE.contains(&req.care_complexity) {
        return Err(CatFormError::InvalidCareComplexity);
    }
    Ok(())
}

pub fn parse_care_complexity(value: &str) -> Result<i32, CatFormError> {
    value
        .trim()
        .parse::<i32>()
        .ok()
        .filter(|v| CARE_COMPLEXITY_RANGE.contains(v))
        .ok_or(CatFormError::InvalidCareComplexity)
}
