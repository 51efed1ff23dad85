pub mod form;
pub mod health;
pub mod recipes;

use crate::error::ApiError;

pub async fn not_found() -> ApiError {
    ApiError::NotFound("route not found".to_string())
}
