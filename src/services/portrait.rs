// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Portrait rendering via the OpenAI images API.
//!
//! Handles:
//! - Renaissance-style prompt construction
//! - Image generation (dall-e-3)
//! - Downloading the rendered result for local storage

use crate::error::AppError;
use crate::models::PetType;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// Generation is the slowest provider call in the system.
const GENERATE_TIMEOUT: Duration = Duration::from_secs(30);
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Image generation capability.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Render a portrait for the prompt and return the provider URL.
    async fn generate(&self, prompt: &str) -> Result<String, AppError>;

    /// Download a rendered portrait for local storage.
    async fn download(&self, url: &str) -> Result<Vec<u8>, AppError>;
}

/// OpenAI images API client.
pub struct OpenAiImageClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Deserialize)]
struct ImagesResponse {
    data: Vec<ImageData>,
}

#[derive(Deserialize)]
struct ImageData {
    url: String,
}

impl OpenAiImageClient {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            api_key,
        }
    }
}

#[async_trait]
impl ImageGenerator for OpenAiImageClient {
    async fn generate(&self, prompt: &str) -> Result<String, AppError> {
        let body = serde_json::json!({
            "model": "dall-e-3",
            "prompt": prompt,
            "n": 1,
            "size": "1024x1024",
            "quality": "hd",
        });

        let response = self
            .http
            .post(format!("{}/images/generations", self.base_url))
            .bearer_auth(&self.api_key)
            .timeout(GENERATE_TIMEOUT)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Provider(format!("image generation request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::Provider(format!(
                "image API returned {}: {}",
                status, text
            )));
        }

        let images: ImagesResponse = response
            .json()
            .await
            .map_err(|e| AppError::Provider(format!("invalid image API response: {}", e)))?;

        images
            .data
            .into_iter()
            .next()
            .map(|image| image.url)
            .ok_or_else(|| AppError::Provider("image API returned no images".to_string()))
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, AppError> {
        let response = self
            .http
            .get(url)
            .timeout(DOWNLOAD_TIMEOUT)
            .send()
            .await
            .map_err(|e| AppError::Provider(format!("portrait download failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Provider(format!(
                "portrait download returned {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::Provider(format!("portrait download failed: {}", e)))?;
        Ok(bytes.to_vec())
    }
}

/// Build the rendering prompt for a pet portrait.
pub fn portrait_prompt(pet_type: PetType, pet_name: &str, style: &str) -> String {
    format!(
        "Create a stunning {style}-style painted portrait of {pet_type} {pet_name}.\n\
         \n\
         Style guidelines:\n\
         - Renaissance oil painting style with classical technique\n\
         - Rich, warm color palette typical of 16th-17th century portraits\n\
         - Detailed brushwork and texture\n\
         - Pet as the main subject, positioned as a noble portrait subject\n\
         - Ornate background or elegant drapes\n\
         - Golden/amber lighting reminiscent of Renaissance masters\n\
         - High quality, museum-worthy appearance\n\
         - Realistic facial features with artistic interpretation\n\
         - Professional composition and framing\n\
         \n\
         The painting should be a dignified, artistic interpretation of the \
         pet as if commissioned by a Renaissance patron.",
        style = style,
        pet_type = pet_type.as_str(),
        pet_name = pet_name,
    )
}
