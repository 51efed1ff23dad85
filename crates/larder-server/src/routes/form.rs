//! Request body shared by create and update.
//!
//! Browsers send `multipart/form-data` (with `ingredients` as JSON text and
//! an optional `image` file); scripted clients may send plain JSON.

use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::{StatusCode, header};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

use larder_core::models::ingredient::{Ingredient, parse_ingredients};

use crate::error::ApiError;

/// An uploaded image, not yet stored.
#[derive(Debug)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Default)]
pub struct RecipeForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub ingredients: Option<Vec<Ingredient>>,
    pub image: Option<ImageUpload>,
}

#[derive(Deserialize)]
struct RecipeBody {
    title: Option<String>,
    description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_present_ingredients")]
    ingredients: Option<Vec<Ingredient>>,
}

/// Clients send ingredients either as a list or as the same JSON text a
/// multipart form carries. Both are parsed strictly; `null` clears the list.
#[derive(Deserialize)]
#[serde(untagged)]
enum IngredientsInput {
    List(Vec<Ingredient>),
    Encoded(String),
}

fn deserialize_present_ingredients<'de, D>(deserializer: D) -> Result<Option<Vec<Ingredient>>, D::Error>
where
    D: Deserializer<'de>,
{
    let ingredients = match Option::<IngredientsInput>::deserialize(deserializer)? {
        Some(IngredientsInput::List(list)) => list,
        Some(IngredientsInput::Encoded(text)) => parse_ingredients(&text).map_err(D::Error::custom)?,
        None => Vec::new(),
    };
    Ok(Some(ingredients))
}

impl From<RecipeBody> for RecipeForm {
    fn from(body: RecipeBody) -> Self {
        Self {
            title: body.title,
            description: body.description,
            ingredients: body.ingredients,
            image: None,
        }
    }
}

impl<S> FromRequest<S> for RecipeForm
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));

        if is_multipart {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| rejection(e.status(), e.body_text()))?;
            read_multipart(multipart).await
        } else {
            let Json(body) = Json::<RecipeBody>::from_request(req, state)
                .await
                .map_err(|e| rejection(e.status(), e.body_text()))?;
            Ok(body.into())
        }
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<RecipeForm, ApiError> {
    let mut form = RecipeForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "title" => form.title = Some(field.text().await.map_err(multipart_error)?),
            "description" => form.description = Some(field.text().await.map_err(multipart_error)?),
            "ingredients" => {
                let text = field.text().await.map_err(multipart_error)?;
                form.ingredients = Some(parse_ingredients(&text)?);
            }
            "image" => {
                let file_name = field.file_name().unwrap_or("image").to_string();
                let is_image = field
                    .content_type()
                    .is_some_and(|ct| ct.starts_with("image/"));
                let bytes = field.bytes().await.map_err(multipart_error)?;
                if bytes.is_empty() {
                    continue;
                }
                if !is_image {
                    return Err(ApiError::BadRequest(
                        "Only image files can be uploaded".to_string(),
                    ));
                }
                form.image = Some(ImageUpload {
                    file_name,
                    bytes: bytes.to_vec(),
                });
            }
            other => tracing::debug!(field = other, "ignoring unknown form field"),
        }
    }

    Ok(form)
}

fn multipart_error(e: MultipartError) -> ApiError {
    rejection(e.status(), e.body_text())
}

/// Body limit hits stay 413; every other malformed body is a 400.
fn rejection(status: StatusCode, message: String) -> ApiError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(message)
    } else {
        ApiError::BadRequest(message)
    }
}
