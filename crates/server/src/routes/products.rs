//! Product catalog route handlers.
//!
//! Create and update accept multipart form data so the mobile client can
//! attach an image alongside the product fields.

use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use rust_decimal::Decimal;

use cartwheel_core::{ProductCategory, ProductId};

use crate::db::products::{ProductPatch, ProductRepository};
use crate::error::{AppError, Result};
use crate::middleware::{CurrentUser, RequireAdmin};
use crate::models::Product;
use crate::services::images;
use crate::state::AppState;

/// An image part lifted out of the multipart stream.
struct UploadedImage {
    file_name: Option<String>,
    content_type: Option<String>,
    data: Vec<u8>,
}

/// Product fields parsed from a multipart request. Everything is optional
/// here; create and update decide what is required.
#[derive(Default)]
struct ProductForm {
    name: Option<String>,
    price: Option<Decimal>,
    description: Option<String>,
    category: Option<ProductCategory>,
    image: Option<UploadedImage>,
}

/// Drain a multipart stream into a [`ProductForm`], validating field syntax
/// as it goes. Unknown fields are ignored.
async fn read_form(mut multipart: Multipart) -> Result<ProductForm> {
    let mut form = ProductForm::default();

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().map(ToOwned::to_owned);
        match field_name.as_deref() {
            Some("name") => form.name = Some(field.text().await?),
            Some("description") => form.description = Some(field.text().await?),
            Some("price") => {
                let raw = field.text().await?;
                let price = raw
                    .trim()
                    .parse::<Decimal>()
                    .map_err(|_| AppError::Validation(format!("invalid price: {raw}")))?;
                if price < Decimal::ZERO {
                    return Err(AppError::Validation(
                        "price must be non-negative".to_owned(),
                    ));
                }
                form.price = Some(price);
            }
            Some("category") => {
                let raw = field.text().await?;
                form.category = Some(raw.trim().parse().map_err(AppError::Validation)?);
            }
            Some("image") => {
                let file_name = field.file_name().map(ToOwned::to_owned);
                let content_type = field.content_type().map(ToOwned::to_owned);
                let data = field.bytes().await?.to_vec();
                form.image = Some(UploadedImage {
                    file_name,
                    content_type,
                    data,
                });
            }
            _ => {}
        }
    }

    Ok(form)
}

/// Store the form's image, if any, and return its web path.
async fn store_image(state: &AppState, image: Option<UploadedImage>) -> Result<Option<String>> {
    let Some(image) = image else {
        return Ok(None);
    };

    let path = images::save_product_image(
        &state.config().upload_dir,
        image.file_name.as_deref(),
        image.content_type.as_deref(),
        &image.data,
    )
    .await?;

    Ok(Some(path))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

fn required(value: Option<String>, field: &str) -> Result<String> {
    non_blank(value).ok_or_else(|| AppError::Validation(format!("{field} is required")))
}

// =============================================================================
// Handlers
// =============================================================================

/// List the whole catalog.
pub async fn index(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.pool()).list().await?;
    Ok(Json(products))
}

/// Get one product.
pub async fn show(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<Json<Product>> {
    let product = ProductRepository::new(state.pool())
        .get(ProductId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("product not found".to_owned()))?;

    Ok(Json(product))
}

/// Create a product (admin). Multipart; name, price, and description are
/// required, category defaults, image is optional.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Product>)> {
    let form = read_form(multipart).await?;

    let name = required(form.name, "name")?;
    let description = required(form.description, "description")?;
    let price = form
        .price
        .ok_or_else(|| AppError::Validation("price is required".to_owned()))?;
    let category = form.category.unwrap_or_default();
    let image = store_image(&state, form.image).await?;

    let product = ProductRepository::new(state.pool())
        .create(&name, price, &description, category, image.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(product)))
}

/// Update a product in place (admin). Any subset of fields may be supplied;
/// absent fields are left unchanged.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> Result<Json<Product>> {
    let form = read_form(multipart).await?;
    let image = store_image(&state, form.image).await?;

    // Blank text fields are treated as absent, like any unsupplied field
    let patch = ProductPatch {
        name: non_blank(form.name),
        price: form.price,
        description: non_blank(form.description),
        category: form.category,
        image,
    };

    let product = ProductRepository::new(state.pool())
        .update(ProductId::new(id), patch)
        .await?
        .ok_or_else(|| AppError::NotFound("product not found".to_owned()))?;

    Ok(Json(product))
}

/// Delete a product (admin).
pub async fn destroy(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    let deleted = ProductRepository::new(state.pool())
        .delete(ProductId::new(id))
        .await?;

    if !deleted {
        return Err(AppError::NotFound("product not found".to_owned()));
    }

    Ok(StatusCode::NO_CONTENT)
}
