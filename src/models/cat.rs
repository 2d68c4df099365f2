use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Allowed range for `care_complexity`.
pub const CARE_COMPLEXITY_RANGE: std::ops::RangeInclusive<i32> = 1..=5;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Cat {
    pub id: i32,
    pub breed: String,
    pub fur: String,
    pub temper: String,
    pub care_complexity: i32,
    pub image_path: String,
}

/// Fields collected from the multipart form of `POST /cat`.
#[derive(Debug, Clone)]
pub struct NewCat {
    pub breed: String,
    pub fur: String,
    pub temper: String,
    pub care_complexity: i32,
    pub image_path: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCatRequest {
    pub id: i32,
    pub breed: String,
    pub fur: String,
    pub temper: String,
    pub care_complexity: i32,
}
