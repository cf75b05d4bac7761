// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Portrait generation routes.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Generation, PetType};
use crate::services::ledger::NewGeneration;
use crate::services::portrait::portrait_prompt;
use crate::AppState;
use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

/// Uploaded photos are capped at 10 MiB.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/portrait/generate",
            post(generate_portrait).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/portrait/{id}", get(get_generation))
        .route("/portrait", get(list_generations))
}

/// Parsed multipart form for a generation request.
struct GenerateForm {
    photo: Vec<u8>,
    photo_filename: String,
    pet_name: Option<String>,
    pet_type: Option<String>,
    style: Option<String>,
}

async fn read_form(mut multipart: Multipart) -> Result<GenerateForm> {
    let mut form = GenerateForm {
        photo: Vec::new(),
        photo_filename: String::new(),
        pet_name: None,
        pet_type: None,
        style: None,
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("invalid multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "petPhoto" => {
                form.photo_filename = field.file_name().unwrap_or("photo").to_string();
                form.photo = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("invalid photo upload: {}", e)))?
                    .to_vec();
            }
            "petName" => {
                form.pet_name = Some(read_text_field(field).await?);
            }
            "petType" => {
                form.pet_type = Some(read_text_field(field).await?);
            }
            "style" => {
                form.style = Some(read_text_field(field).await?);
            }
            _ => {}
        }
    }

    Ok(form)
}

async fn read_text_field(field: axum::extract::multipart::Field<'_>) -> Result<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(format!("invalid form field: {}", e)))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub success: bool,
    pub generation_id: String,
    pub portrait_url: String,
    pub pet_name: String,
    pub pet_type: PetType,
}

/// Upload a pet photo and render a stylized portrait.
async fn generate_portrait(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    multipart: Multipart,
) -> Result<Json<GenerateResponse>> {
    let form = read_form(multipart).await?;

    if form.photo.is_empty() {
        return Err(AppError::BadRequest("pet photo required".to_string()));
    }

    let pet_type = form
        .pet_type
        .as_deref()
        .and_then(PetType::parse)
        .ok_or_else(|| AppError::BadRequest("valid pet type required".to_string()))?;

    let pet_name = form
        .pet_name
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "Unnamed Pet".to_string());
    let style = form
        .style
        .filter(|style| !style.is_empty())
        .unwrap_or_else(|| "renaissance".to_string());

    // Persist the upload so the generator input is on disk while we work
    let upload_dir = std::path::Path::new(&state.config.upload_dir);
    tokio::fs::create_dir_all(upload_dir)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("upload dir: {}", e)))?;

    let now_millis = chrono::Utc::now().timestamp_millis();
    let upload_path = upload_dir.join(format!("{}-{}", now_millis, form.photo_filename));
    tokio::fs::write(&upload_path, &form.photo)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("saving upload: {}", e)))?;

    tracing::info!(pet_type = pet_type.as_str(), "Generating portrait");

    let prompt = portrait_prompt(pet_type, &pet_name, &style);
    let portrait_url = state.images.generate(&prompt).await?;

    // Keep a local copy of the rendered portrait
    let portrait_bytes = state.images.download(&portrait_url).await?;
    let portrait_path = upload_dir.join(format!("portrait-{}.png", now_millis));
    tokio::fs::write(&portrait_path, &portrait_bytes)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("saving portrait: {}", e)))?;

    let generation = state
        .generations
        .record(
            &user.email,
            NewGeneration {
                pet_name,
                pet_type,
                style,
                uploaded_image_path: upload_path.to_string_lossy().into_owned(),
                portrait_url: portrait_url.clone(),
                portrait_path: portrait_path.to_string_lossy().into_owned(),
            },
        )
        .await?;

    // The source photo is no longer needed once the portrait exists.
    // Deletion failure is not a correctness issue, so it is only logged.
    if let Err(e) = tokio::fs::remove_file(&upload_path).await {
        tracing::warn!(error = %e, path = %upload_path.display(), "Failed to delete uploaded photo");
    }

    Ok(Json(GenerateResponse {
        success: true,
        generation_id: generation.id,
        portrait_url,
        pet_name: generation.pet_name,
        pet_type,
    }))
}

/// Get one generation (ownership-scoped).
async fn get_generation(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Generation>> {
    let generation = state.generations.get(&id, &user.email).await?;
    Ok(Json(generation))
}

/// List the caller's generations, newest first.
async fn list_generations(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Generation>>> {
    let generations = state.generations.list(&user.email).await?;
    Ok(Json(generations))
}
