// SPDX-License-Identifier: MPL-2.0
//! Domain layer - Core business logic with ZERO external dependencies.
//!
//! This module contains pure domain types, value objects, and business rules.
//! It has no dependencies on external crates (except `std`) to ensure
//! testability and architectural purity.
//!
//! # Modules
//!
//! - [`editing`]: Edit pipeline value objects ([`Strength`](editing::Strength),
//!   [`DilationWidth`](editing::DilationWidth), [`FeatherRadius`](editing::FeatherRadius),
//!   [`CorrectionFactor`](editing::CorrectionFactor), [`StrengthPreset`](editing::StrengthPreset))
//! - [`geometry`]: Plane primitives ([`Point`](geometry::Point),
//!   [`BoundingBox`](geometry::BoundingBox))
//! - [`media`]: Raster types ([`RawImage`](media::RawImage), [`Mask`](media::Mask),
//!   [`EncodedRaster`](media::EncodedRaster))
//! - [`region`]: Selection placement analysis ([`RegionDescriptor`](region::RegionDescriptor),
//!   [`SizeBucket`](region::SizeBucket))
//! - [`selection`]: Lasso capture ([`Selection`](selection::Selection),
//!   [`LassoPath`](selection::LassoPath), [`StrokeRecorder`](selection::StrokeRecorder),
//!   [`DisplayMapping`](selection::DisplayMapping))

pub mod editing;
pub mod geometry;
pub mod media;
pub mod region;
pub mod selection;
