// SPDX-License-Identifier: MPL-2.0
//! `lasso_patch` is a freehand-selection AI image editing engine.
//!
//! A session owns a working raster; the user lassoes a region, the
//! selection is rasterized into a dilated (optionally feathered) mask,
//! and a remote generation provider repaints the masked area from a text
//! instruction. The provider's frame is blended back onto the original
//! with mask-weighted compositing, optional color matching and an
//! optional synthetic contact shadow.
//!
//! The crate is layered: pure types in [`domain`], pixel algorithms in
//! [`media`], orchestration and ports in [`application`], HTTP adapters
//! in [`infrastructure`], and the mutable canvas/history store in
//! [`session`].

#![doc(html_root_url = "https://docs.rs/lasso_patch/0.1.0")]

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod media;
pub mod session;

#[cfg(test)]
pub mod test_utils;
