//! Item API Handlers

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use shared::models::{Item, ItemCategory, ItemCreate, ItemUpdate, Variation};

use crate::api::DeleteResponse;
use crate::core::ServerState;
use crate::db::repository::item;
use crate::images::{ITEM_FOLDER, validate_image};
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text, validate_variations};
use crate::utils::{AppError, AppResult, ErrorCode};

/// Multipart form as received, before validation
#[derive(Default)]
struct ItemForm {
    name: Option<String>,
    category: Option<String>,
    variations: Option<String>,
    replace_images: bool,
    /// `(filename, bytes)` of every `images` part
    files: Vec<(Option<String>, Vec<u8>)>,
}

fn multipart_error(e: impl std::fmt::Display) -> AppError {
    AppError::invalid_request(format!("Multipart error: {e}"))
}

async fn read_form(mut multipart: Multipart) -> AppResult<ItemForm> {
    let mut form = ItemForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "images" => {
                let filename = field.file_name().map(|s| s.to_string());
                let data = field.bytes().await.map_err(multipart_error)?.to_vec();
                // Browsers send an empty part when no file was picked
                if data.is_empty() && filename.as_deref().is_none_or(str::is_empty) {
                    continue;
                }
                form.files.push((filename, data));
            }
            "name" => form.name = Some(field.text().await.map_err(multipart_error)?),
            "category" => form.category = Some(field.text().await.map_err(multipart_error)?),
            "variations" => form.variations = Some(field.text().await.map_err(multipart_error)?),
            "replaceImages" => {
                let value = field.text().await.map_err(multipart_error)?;
                form.replace_images = matches!(value.trim(), "true" | "1" | "on");
            }
            other => tracing::debug!(field = %other, "Ignoring unknown item form field"),
        }
    }

    Ok(form)
}

fn parse_category(value: &str) -> AppResult<ItemCategory> {
    value.parse().map_err(AppError::invalid_format)
}

fn parse_variations(value: &str) -> AppResult<Vec<Variation>> {
    let variations: Vec<Variation> = serde_json::from_str(value)
        .map_err(|_| AppError::invalid_format("Invalid variations format. Must be valid JSON."))?;
    validate_variations(&variations)?;
    Ok(variations)
}

/// Validate every file, then upload them in order
///
/// Any failure aborts before the caller writes anything.
async fn upload_images(
    state: &ServerState,
    files: Vec<(Option<String>, Vec<u8>)>,
) -> AppResult<Vec<String>> {
    for (filename, data) in &files {
        validate_image(data, filename.as_deref())?;
    }

    let mut urls = Vec::with_capacity(files.len());
    for (filename, data) in files {
        let filename = filename.unwrap_or_default();
        let size = data.len();
        let url = state
            .image_host
            .upload(data, &filename, ITEM_FOLDER)
            .await
            .map_err(|e| {
                tracing::error!(%filename, size, error = %e, "Image upload failed");
                AppError::from(e)
            })?;
        urls.push(url);
    }
    Ok(urls)
}

/// GET /api/items - newest first
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Item>>> {
    let items = item::find_all(&state.pool).await?;
    Ok(Json(items))
}

/// GET /api/items/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Item>> {
    let item = item::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::with_message(ErrorCode::ItemNotFound, "Item not found"))?;
    Ok(Json(item))
}

/// POST /api/items
pub async fn create(
    State(state): State<ServerState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<Item>)> {
    let form = read_form(multipart).await?;

    let name = form.name.unwrap_or_default();
    validate_required_text(&name, "name", MAX_NAME_LEN)?;
    let category = form
        .category
        .ok_or_else(|| AppError::with_message(ErrorCode::RequiredField, "category is required"))
        .and_then(|c| parse_category(&c))?;
    let variations = match form.variations.as_deref() {
        Some(v) => parse_variations(v)?,
        None => Vec::new(),
    };

    let images = upload_images(&state, form.files).await?;

    let created = item::create(
        &state.pool,
        ItemCreate {
            name,
            category,
            variations,
            images,
        },
    )
    .await?;

    tracing::info!(
        item_id = created.id,
        name = %created.name,
        variations = created.variations.len(),
        images = created.images.len(),
        "Item created"
    );
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/items/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> AppResult<Json<Item>> {
    let form = read_form(multipart).await?;

    if let Some(name) = &form.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    let category = form.category.as_deref().map(parse_category).transpose()?;
    let variations = form.variations.as_deref().map(parse_variations).transpose()?;

    // Unknown ids fail before anything is uploaded
    if item::find_by_id(&state.pool, id).await?.is_none() {
        return Err(AppError::with_message(ErrorCode::ItemNotFound, "Item not found"));
    }

    let images = upload_images(&state, form.files).await?;

    let updated = item::update(
        &state.pool,
        id,
        ItemUpdate {
            name: form.name,
            category,
            variations,
            images,
            replace_images: form.replace_images,
        },
    )
    .await
    .map_err(|e| e.into_app_error(ErrorCode::ItemNotFound))?;

    tracing::info!(item_id = id, images = updated.images.len(), "Item updated");
    Ok(Json(updated))
}

/// DELETE /api/items/{id}
///
/// Orders keep their snapshots of the deleted item.
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<DeleteResponse>> {
    if !item::delete(&state.pool, id).await? {
        return Err(AppError::with_message(ErrorCode::ItemNotFound, "Item not found"));
    }
    tracing::info!(item_id = id, "Item deleted");
    Ok(DeleteResponse::ok())
}
