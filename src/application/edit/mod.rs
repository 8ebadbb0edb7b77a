// SPDX-License-Identifier: MPL-2.0
//! Edit orchestration.
//!
//! [`EditOrchestrator`] drives one edit request from raw instruction to
//! committed pixels: validate the session, rasterize the mask, analyze
//! the region, translate and enrich the prompt, dispatch a strategy to
//! the provider, then composite the response into the working image.
//!
//! The request is split around the async boundary:
//!
//! 1. [`EditOrchestrator::prepare`] validates against the session and
//!    captures an immutable [`EditRequest`] snapshot (including the
//!    session version).
//! 2. [`EditOrchestrator::execute`] performs the network round trips and
//!    compositing, yielding an [`EditCandidate`].
//! 3. [`EditSession::commit_edit`] applies the candidate, unless the
//!    session has moved to a different image in the meantime.
//!
//! At most one request runs at a time; the observable [`EditPhase`]
//! doubles as the in-flight guard.

pub mod prompt;

use crate::application::port::{GenerationParams, ImageProvider, ProviderError, Translator};
use crate::domain::editing::{CorrectionFactor, DilationWidth, FeatherRadius, Strength};
use crate::domain::media::{EncodedRaster, Mask, RawImage};
use crate::domain::region::{self, RegionDescriptor, RegionError};
use crate::domain::selection::Selection;
use crate::media::codec;
use crate::media::composite::{self, CompositeOptions, ShadowParams};
use crate::media::mask::{self, MaskError, MaskOptions};
use crate::session::{EditSession, SessionError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Strength forced onto the background-replacement inference so the
/// transparent area is actually repainted.
pub const BACKGROUND_SWAP_STRENGTH: f32 = 0.9;

// ============================================================================
// Errors
// ============================================================================

/// Errors surfaced by the edit pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    /// No image has been loaded into the session.
    MissingImage,

    /// The selection holds no committed paths.
    EmptySelection,

    /// The instruction text is empty after trimming.
    MissingInstruction,

    /// Another edit request is already running.
    RequestInFlight,

    /// The provider call failed.
    Provider(ProviderError),

    /// The session moved to a different image while the request was in
    /// flight; the result was discarded.
    StaleResponseDiscarded,
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditError::MissingImage => write!(f, "no image loaded to edit"),
            EditError::EmptySelection => write!(f, "draw a selection area first"),
            EditError::MissingInstruction => write!(f, "enter an edit instruction first"),
            EditError::RequestInFlight => write!(f, "an edit request is already running"),
            EditError::Provider(err) => write!(f, "{err}"),
            EditError::StaleResponseDiscarded => {
                write!(f, "the image changed while the edit was running; result discarded")
            }
        }
    }
}

impl std::error::Error for EditError {}

impl From<ProviderError> for EditError {
    fn from(err: ProviderError) -> Self {
        EditError::Provider(err)
    }
}

impl From<RegionError> for EditError {
    fn from(_: RegionError) -> Self {
        EditError::EmptySelection
    }
}

impl From<MaskError> for EditError {
    fn from(_: MaskError) -> Self {
        // Zero-sized canvases only occur before an image is loaded.
        EditError::MissingImage
    }
}

impl From<SessionError> for EditError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::StaleResponse { .. } => EditError::StaleResponseDiscarded,
            SessionError::NoImage => EditError::MissingImage,
        }
    }
}

// ============================================================================
// Strategy and phase
// ============================================================================

/// How provider calls are arranged to produce the edited raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EditStrategy {
    /// One masked inpainting call against the working image.
    #[default]
    DirectInpaint,

    /// Cut the subject out first, then repaint around it. Used to swap
    /// the background while keeping the subject intact.
    RemoveBackgroundFirst,

    /// Synthesize fresh content from the prompt alone, cut its
    /// background away and drop the subject into the selection.
    GenerateThenPlace,
}

impl EditStrategy {
    /// Parses the kebab-case strategy name used by config files and CLI
    /// flags.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "direct-inpaint" => Some(EditStrategy::DirectInpaint),
            "remove-background-first" => Some(EditStrategy::RemoveBackgroundFirst),
            "generate-then-place" => Some(EditStrategy::GenerateThenPlace),
            _ => None,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            EditStrategy::DirectInpaint => "direct-inpaint",
            EditStrategy::RemoveBackgroundFirst => "remove-background-first",
            EditStrategy::GenerateThenPlace => "generate-then-place",
        }
    }
}

/// Observable progress of the current edit request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditPhase {
    #[default]
    Idle,
    Validating,
    Translating,
    Dispatching,
    Compositing,
}

// ============================================================================
// Options
// ============================================================================

/// Per-request tuning for the edit pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditOptions {
    pub strategy: EditStrategy,
    /// How far the provider may drift from the seed image.
    pub strength: Strength,
    /// Diffusion step count passed to the provider.
    pub steps: u32,
    /// Mask stroke dilation in pixels.
    pub dilation: DilationWidth,
    /// Mask feather radius in pixels.
    pub feather: FeatherRadius,
    /// Edits everything outside the selection instead.
    pub invert_mask: bool,
    /// Color-matches the patch against the surrounding original.
    pub color_match: bool,
    /// Fraction of the measured color offset applied.
    pub correction: CorrectionFactor,
    /// Synthesizes a contact shadow beneath the patch.
    pub shadow: bool,
}

impl Default for EditOptions {
    fn default() -> Self {
        Self {
            strategy: EditStrategy::default(),
            strength: Strength::default(),
            steps: crate::config::defaults::DEFAULT_STEPS,
            dilation: DilationWidth::default(),
            feather: FeatherRadius::default(),
            invert_mask: false,
            color_match: true,
            correction: CorrectionFactor::default(),
            shadow: false,
        }
    }
}

impl EditOptions {
    /// Builds options from loaded configuration, clamping raw values
    /// into their domain ranges.
    #[must_use]
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self {
            strategy: config.edit.strategy,
            strength: Strength::new(config.edit.strength),
            steps: config.provider.steps,
            dilation: DilationWidth::new(config.edit.dilation),
            feather: FeatherRadius::new(config.edit.feather),
            invert_mask: config.edit.invert_mask,
            color_match: config.edit.color_match,
            correction: CorrectionFactor::default(),
            shadow: config.edit.shadow,
        }
    }
}

// ============================================================================
// Request / candidate / outcome
// ============================================================================

/// Immutable snapshot of everything one edit request needs.
///
/// Captured by [`EditOrchestrator::prepare`] so the session can keep
/// changing while the request is in flight.
#[derive(Debug, Clone)]
pub struct EditRequest {
    image: RawImage,
    mask: Mask,
    instruction: String,
    region: RegionDescriptor,
    version: u64,
}

impl EditRequest {
    /// Session version this request was prepared against.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    #[must_use]
    pub fn mask(&self) -> &Mask {
        &self.mask
    }
}

/// A composited result waiting for its version check.
#[derive(Debug, Clone)]
pub struct EditCandidate {
    image: RawImage,
    prompt: String,
    elapsed: Duration,
    version: u64,
}

impl EditCandidate {
    #[must_use]
    pub fn image(&self) -> &RawImage {
        &self.image
    }

    /// The enriched prompt actually sent to the provider.
    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }
}

/// Result of a fully committed edit.
#[derive(Debug, Clone)]
pub struct EditOutcome {
    /// The new working image.
    pub image: RawImage,
    /// The enriched prompt actually sent to the provider.
    pub prompt: String,
    /// Wall time from dispatch to commit.
    pub elapsed: Duration,
}

// ============================================================================
// Orchestrator
// ============================================================================

/// Drives edit requests against a provider and an optional translator.
pub struct EditOrchestrator {
    provider: Arc<dyn ImageProvider>,
    translator: Option<Arc<dyn Translator>>,
    options: EditOptions,
    phase: EditPhase,
}

impl EditOrchestrator {
    #[must_use]
    pub fn new(provider: Arc<dyn ImageProvider>, options: EditOptions) -> Self {
        Self {
            provider,
            translator: None,
            options,
            phase: EditPhase::Idle,
        }
    }

    /// Routes instructions through `translator` before prompt assembly.
    #[must_use]
    pub fn with_translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = Some(translator);
        self
    }

    #[must_use]
    pub fn phase(&self) -> EditPhase {
        self.phase
    }

    #[must_use]
    pub fn options(&self) -> &EditOptions {
        &self.options
    }

    /// Validates the session and captures an [`EditRequest`] snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::RequestInFlight`] while another request is
    /// running, or a validation error when the session has no image, no
    /// selection or no usable instruction.
    pub fn prepare(
        &mut self,
        session: &EditSession,
        instruction: &str,
    ) -> Result<EditRequest, EditError> {
        if self.phase != EditPhase::Idle {
            return Err(EditError::RequestInFlight);
        }
        self.phase = EditPhase::Validating;
        let result = Self::build_request(session, instruction, &self.options);
        self.phase = EditPhase::Idle;
        result
    }

    fn build_request(
        session: &EditSession,
        instruction: &str,
        options: &EditOptions,
    ) -> Result<EditRequest, EditError> {
        let image = session
            .working_image()
            .cloned()
            .ok_or(EditError::MissingImage)?;
        if session.selection().is_empty() {
            return Err(EditError::EmptySelection);
        }
        let instruction = instruction.trim();
        if instruction.len() < prompt::MIN_INSTRUCTION_LEN {
            return Err(EditError::MissingInstruction);
        }

        let region = region::analyze(session.selection(), image.width(), image.height())?;
        let mask_options = MaskOptions {
            dilation: options.dilation,
            feather: options.feather,
            invert: options.invert_mask,
        };
        let mask = mask::rasterize(
            session.selection(),
            image.width(),
            image.height(),
            &mask_options,
        )?;

        Ok(EditRequest {
            image,
            mask,
            instruction: instruction.to_string(),
            region,
            version: session.version(),
        })
    }

    /// Rasterizes the mask the next edit request would use, without
    /// dispatching anything.
    ///
    /// # Errors
    ///
    /// Same validation errors as [`EditOrchestrator::prepare`].
    pub fn preview_mask(&self, selection: &Selection, image: &RawImage) -> Result<Mask, EditError> {
        let mask_options = MaskOptions {
            dilation: self.options.dilation,
            feather: self.options.feather,
            invert: self.options.invert_mask,
        };
        Ok(mask::rasterize(
            selection,
            image.width(),
            image.height(),
            &mask_options,
        )?)
    }

    /// Runs the provider round trips and composites the result.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::RequestInFlight`] while another request is
    /// running, or [`EditError::Provider`] when the provider fails. The
    /// phase returns to idle either way.
    pub async fn execute(&mut self, request: EditRequest) -> Result<EditCandidate, EditError> {
        if self.phase != EditPhase::Idle {
            return Err(EditError::RequestInFlight);
        }
        let started = Instant::now();

        self.phase = EditPhase::Translating;
        let instruction = match &self.translator {
            Some(translator) => translator.translate_to_english(&request.instruction).await,
            None => request.instruction.clone(),
        };
        let prompt = prompt::sanitize(&prompt::enrich(&instruction, &request.region));

        self.phase = EditPhase::Dispatching;
        let dispatched = self.dispatch(&request, &prompt).await;
        let raster = match dispatched {
            Ok(raster) => raster,
            Err(err) => {
                self.phase = EditPhase::Idle;
                return Err(err);
            }
        };

        self.phase = EditPhase::Compositing;
        let composited = Self::composite(&request, &raster, &self.options);
        self.phase = EditPhase::Idle;

        Ok(EditCandidate {
            image: composited?,
            prompt,
            elapsed: started.elapsed(),
            version: request.version,
        })
    }

    async fn dispatch(
        &self,
        request: &EditRequest,
        prompt: &str,
    ) -> Result<EncodedRaster, EditError> {
        let params = GenerationParams::new(
            request.image.width(),
            request.image.height(),
            self.options.strength,
            self.options.steps,
        );

        match self.options.strategy {
            EditStrategy::DirectInpaint => {
                let image = codec::encode_png(&request.image).map_err(payload_error)?;
                let mask = codec::encode_mask(&request.mask).map_err(payload_error)?;
                Ok(self.provider.inpaint(&image, &mask, prompt, &params).await?)
            }
            EditStrategy::RemoveBackgroundFirst => {
                let image = codec::encode_png(&request.image).map_err(payload_error)?;
                let cutout = self.provider.remove_background(&image).await?;
                let mask = codec::encode_mask(&request.mask).map_err(payload_error)?;
                let wrapped = format!("subject with transparent background on {prompt}");
                let params = GenerationParams {
                    strength: Strength::new(BACKGROUND_SWAP_STRENGTH),
                    ..params
                };
                Ok(self
                    .provider
                    .inpaint(&cutout, &mask, &wrapped, &params)
                    .await?)
            }
            EditStrategy::GenerateThenPlace => {
                let generated = self.provider.generate(prompt, &params).await?;
                Ok(self.provider.remove_background(&generated).await?)
            }
        }
    }

    fn composite(
        request: &EditRequest,
        raster: &EncodedRaster,
        options: &EditOptions,
    ) -> Result<RawImage, EditError> {
        let decoded = codec::decode(raster).map_err(payload_error)?;
        let edited = if (decoded.width(), decoded.height())
            == (request.image.width(), request.image.height())
        {
            decoded
        } else {
            codec::resample(&decoded, request.image.width(), request.image.height())
                .map_err(payload_error)?
        };

        let composite_options = CompositeOptions {
            color_match: options.color_match,
            correction: options.correction,
            shadow: options.shadow.then(ShadowParams::default),
            ..CompositeOptions::default()
        };
        Ok(composite::composite_edit(
            &request.image,
            &edited,
            &request.mask,
            &composite_options,
        ))
    }

    /// Runs one full edit request end to end and commits the result.
    ///
    /// # Errors
    ///
    /// Any [`EditError`] from validation, dispatch or the stale-response
    /// guard. On error the session is left untouched.
    pub async fn run(
        &mut self,
        session: &mut EditSession,
        instruction: &str,
    ) -> Result<EditOutcome, EditError> {
        let request = self.prepare(session, instruction)?;
        let candidate = self.execute(request).await?;
        session.commit_edit(candidate.version, candidate.image.clone())?;
        Ok(EditOutcome {
            image: candidate.image,
            prompt: candidate.prompt,
            elapsed: candidate.elapsed,
        })
    }

    /// Cuts the subject out of `image` without touching the session.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::RequestInFlight`] while another request is
    /// running, or [`EditError::Provider`] when the provider fails.
    pub async fn remove_background(&mut self, image: &RawImage) -> Result<RawImage, EditError> {
        if self.phase != EditPhase::Idle {
            return Err(EditError::RequestInFlight);
        }
        self.phase = EditPhase::Dispatching;
        let result = self.remove_background_inner(image).await;
        self.phase = EditPhase::Idle;
        result
    }

    async fn remove_background_inner(&self, image: &RawImage) -> Result<RawImage, EditError> {
        let encoded = codec::encode_png(image).map_err(payload_error)?;
        let cutout = self.provider.remove_background(&encoded).await?;
        codec::decode(&cutout).map_err(payload_error)
    }
}

fn payload_error(err: crate::error::Error) -> EditError {
    EditError::Provider(ProviderError::Payload(err.to_string()))
}
