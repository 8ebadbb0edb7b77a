// SPDX-License-Identifier: MPL-2.0
//! Runware task-envelope adapter implementing the [`ImageProvider`] trait.
//!
//! The API consumes a JSON array of task objects over one POST endpoint:
//!
//! - `imageUpload` carries a data-URL payload and answers with an
//!   `imageUUID` other tasks reference
//! - `imageInference` performs text-to-image, img2img and masked
//!   inpainting depending on which of `seedImage`/`maskImage` are set
//! - `imageBackgroundRemoval` cuts the subject out of an uploaded image
//!
//! Responses arrive as `{ "data": [task results], "errors": [...] }`.
//! Strict models (the Flux Ultra/Fill and P-Image families) reject the
//! common tuning fields, so those are withheld for them.
//!
//! [`ImageProvider`]: crate::application::port::ImageProvider

use crate::application::port::{
    GenerationParams, ImageProvider, ProviderError, ProviderResult,
};
use crate::config::ProviderConfig;
use crate::domain::media::EncodedRaster;
use crate::media::codec;
use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Models that reject `steps`, `CFGScale`, `negativePrompt` and
/// `strength`.
const STRICT_MODELS: [&str; 5] = [
    "bfl:2@2",
    "runware:102@1",
    "p-image",
    "p-image-edit",
    "prunaai:2@1",
];

/// Minimum accepted `positivePrompt` length.
const MIN_PROMPT_LEN: usize = 2;

fn is_strict_model(model: &str) -> bool {
    let name = model.trim().to_lowercase();
    STRICT_MODELS
        .iter()
        .any(|strict| name == *strict || name.starts_with(&format!("{strict}:")))
}

// =============================================================================
// Wire DTOs
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadTask {
    task_type: &'static str,
    #[serde(rename = "taskUUID")]
    task_uuid: String,
    /// Data-URL payload; the upload task is the only one taking inline
    /// image bytes.
    image: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InferenceTask<'a> {
    task_type: &'static str,
    #[serde(rename = "taskUUID")]
    task_uuid: String,
    positive_prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    negative_prompt: Option<&'a str>,
    model: &'a str,
    width: u32,
    height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    steps: Option<u32>,
    #[serde(rename = "CFGScale", skip_serializing_if = "Option::is_none")]
    cfg_scale: Option<f32>,
    output_format: &'a str,
    output_type: &'static str,
    number_results: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed_image: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mask_image: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    strength: Option<f32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BackgroundRemovalTask<'a> {
    task_type: &'static str,
    #[serde(rename = "taskUUID")]
    task_uuid: String,
    input_image: &'a str,
    /// PNG is forced so the transparent background survives.
    output_format: &'static str,
    output_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct TaskEnvelope {
    #[serde(default)]
    data: Vec<TaskResult>,
    #[serde(default)]
    errors: Vec<ApiError>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct TaskResult {
    task_type: String,
    #[serde(rename = "imageUUID")]
    image_uuid: Option<String>,
    image_base64_data: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct ApiError {
    #[serde(default)]
    message: String,
}

// =============================================================================
// RunwareClient
// =============================================================================

/// HTTP adapter for the Runware generation API.
///
/// All three port operations funnel through the same task envelope:
/// rasters are uploaded first, then referenced by UUID from the
/// inference or background-removal task.
///
/// # Thread Safety
///
/// `Send + Sync`; the underlying `reqwest::Client` is cheaply cloneable
/// and internally pooled.
///
/// # Example
///
/// ```ignore
/// use lasso_patch::infrastructure::{build_http_client, RunwareClient};
///
/// let http = build_http_client()?;
/// let client = RunwareClient::new(http, config.provider.clone());
/// let edited = client.inpaint(&image, &mask, "add a red hat", &params).await?;
/// ```
pub struct RunwareClient {
    http: reqwest::Client,
    config: ProviderConfig,
}

impl RunwareClient {
    #[must_use]
    pub fn new(http: reqwest::Client, config: ProviderConfig) -> Self {
        Self { http, config }
    }

    /// Whether an API key is present.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.config.api_key.trim().is_empty()
    }

    /// API key redacted to its first and last characters, for log lines.
    #[must_use]
    pub fn masked_key(&self) -> String {
        let key = self.config.api_key.trim();
        if key.is_empty() {
            return "not configured".to_string();
        }
        if key.len() > 10 {
            if let (Some(head), Some(tail)) = (key.get(..6), key.get(key.len() - 4..)) {
                return format!("{head}...{tail}");
            }
        }
        "*".repeat(key.chars().count())
    }

    fn ensure_configured(&self) -> ProviderResult<()> {
        if self.is_configured() {
            Ok(())
        } else {
            Err(ProviderError::Unconfigured)
        }
    }

    /// Model used for masked inpainting. The default text model cannot
    /// fill masks, so it is swapped for the fill-capable one unless the
    /// configuration pins something else.
    fn inpaint_model(&self) -> &str {
        match &self.config.inpaint_model {
            Some(model) => model,
            None if self.config.model == crate::config::defaults::DEFAULT_MODEL => {
                crate::config::defaults::DEFAULT_INPAINT_MODEL
            }
            None => &self.config.model,
        }
    }

    fn require_prompt(prompt: &str) -> ProviderResult<&str> {
        let trimmed = prompt.trim();
        if trimmed.len() < MIN_PROMPT_LEN {
            return Err(ProviderError::Payload(format!(
                "prompt must be at least {MIN_PROMPT_LEN} characters"
            )));
        }
        Ok(trimmed)
    }

    async fn post_task<T: Serialize>(&self, task: &T) -> ProviderResult<TaskEnvelope> {
        let response = self
            .http
            .post(&self.config.endpoint)
            .bearer_auth(self.config.api_key.trim())
            .json(&[task])
            .send()
            .await
            .map_err(|err| ProviderError::Request(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                code: status.as_u16(),
                body,
            });
        }

        let envelope: TaskEnvelope = response
            .json()
            .await
            .map_err(|err| ProviderError::Schema(err.to_string()))?;
        if let Some(error) = envelope.errors.first() {
            return Err(ProviderError::Request(error.message.clone()));
        }
        Ok(envelope)
    }

    /// Uploads a raster and returns the UUID other tasks reference.
    async fn upload(&self, raster: &EncodedRaster) -> ProviderResult<String> {
        let task = UploadTask {
            task_type: "imageUpload",
            task_uuid: Uuid::new_v4().to_string(),
            image: codec::to_data_url(raster),
        };
        let envelope = self.post_task(&task).await?;
        envelope
            .data
            .into_iter()
            .find(|result| result.task_type == "imageUpload")
            .and_then(|result| result.image_uuid)
            .ok_or_else(|| ProviderError::Schema("upload response carried no imageUUID".to_string()))
    }

    fn extract_image(envelope: TaskEnvelope, mime_type: &str) -> ProviderResult<EncodedRaster> {
        envelope
            .data
            .into_iter()
            .find_map(|result| result.image_base64_data)
            .map(|data| EncodedRaster::new(mime_type, data))
            .ok_or_else(|| ProviderError::Schema("response carried no image data".to_string()))
    }

    async fn inpaint_impl(
        &self,
        image: &EncodedRaster,
        mask: &EncodedRaster,
        prompt: &str,
        params: &GenerationParams,
    ) -> ProviderResult<EncodedRaster> {
        self.ensure_configured()?;
        let prompt = Self::require_prompt(prompt)?;

        let seed_uuid = self.upload(image).await?;
        let mask_uuid = self.upload(mask).await?;

        let model = self.inpaint_model();
        let strict = is_strict_model(model);
        let task = InferenceTask {
            task_type: "imageInference",
            task_uuid: Uuid::new_v4().to_string(),
            positive_prompt: prompt,
            negative_prompt: (!strict).then_some(self.config.negative_prompt.as_str()),
            model,
            width: params.width,
            height: params.height,
            steps: (!strict).then_some(params.steps),
            cfg_scale: (!strict).then_some(self.config.cfg_scale),
            output_format: self.config.output_format.as_str(),
            output_type: "base64Data",
            number_results: 1,
            seed_image: Some(&seed_uuid),
            mask_image: Some(&mask_uuid),
            strength: (!strict).then_some(params.strength.value()),
        };

        let envelope = self.post_task(&task).await?;
        Self::extract_image(envelope, self.config.output_format.mime())
    }

    async fn generate_impl(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> ProviderResult<EncodedRaster> {
        self.ensure_configured()?;
        let prompt = Self::require_prompt(prompt)?;

        let model = self.config.model.as_str();
        let strict = is_strict_model(model);
        let task = InferenceTask {
            task_type: "imageInference",
            task_uuid: Uuid::new_v4().to_string(),
            positive_prompt: prompt,
            negative_prompt: (!strict).then_some(self.config.negative_prompt.as_str()),
            model,
            width: params.width,
            height: params.height,
            steps: (!strict).then_some(params.steps),
            cfg_scale: (!strict).then_some(self.config.cfg_scale),
            output_format: self.config.output_format.as_str(),
            output_type: "base64Data",
            number_results: 1,
            seed_image: None,
            mask_image: None,
            strength: None,
        };

        let envelope = self.post_task(&task).await?;
        Self::extract_image(envelope, self.config.output_format.mime())
    }

    async fn remove_background_impl(
        &self,
        image: &EncodedRaster,
    ) -> ProviderResult<EncodedRaster> {
        self.ensure_configured()?;
        let input_uuid = self.upload(image).await?;

        let task = BackgroundRemovalTask {
            task_type: "imageBackgroundRemoval",
            task_uuid: Uuid::new_v4().to_string(),
            input_image: &input_uuid,
            output_format: "PNG",
            output_type: "base64Data",
        };

        let envelope = self.post_task(&task).await?;
        Self::extract_image(envelope, "image/png")
    }
}

impl ImageProvider for RunwareClient {
    fn inpaint<'a>(
        &'a self,
        image: &'a EncodedRaster,
        mask: &'a EncodedRaster,
        prompt: &'a str,
        params: &'a GenerationParams,
    ) -> BoxFuture<'a, ProviderResult<EncodedRaster>> {
        Box::pin(async move { self.inpaint_impl(image, mask, prompt, params).await })
    }

    fn remove_background<'a>(
        &'a self,
        image: &'a EncodedRaster,
    ) -> BoxFuture<'a, ProviderResult<EncodedRaster>> {
        Box::pin(async move { self.remove_background_impl(image).await })
    }

    fn generate<'a>(
        &'a self,
        prompt: &'a str,
        params: &'a GenerationParams,
    ) -> BoxFuture<'a, ProviderResult<EncodedRaster>> {
        Box::pin(async move { self.generate_impl(prompt, params).await })
    }
}
