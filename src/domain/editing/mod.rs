// SPDX-License-Identifier: MPL-2.0
//! Editing domain types.
//!
//! This module provides pure domain types for the edit pipeline:
//! - [`Strength`]: denoising strength for image-to-image generation
//! - [`DilationWidth`]: mask outline growth in pixels
//! - [`FeatherRadius`]: mask edge softening in pixels
//! - [`CorrectionFactor`]: color-match offset weighting
//! - [`StrengthPreset`]: named strength levels for quick selection

pub mod newtypes;

pub use newtypes::{CorrectionFactor, DilationWidth, FeatherRadius, Strength};

/// Named strength levels, ordered from closest-to-source to freest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrengthPreset {
    /// Keeps the source composition almost intact (0.75).
    #[default]
    Subtle,
    /// Balances fidelity and creative freedom (0.90).
    Balanced,
    /// Lets the model repaint the area almost freely (0.95).
    Strong,
}

impl StrengthPreset {
    /// All presets, in increasing strength order.
    pub const ALL: [StrengthPreset; 3] = [
        StrengthPreset::Subtle,
        StrengthPreset::Balanced,
        StrengthPreset::Strong,
    ];

    /// The strength value this preset stands for.
    #[must_use]
    pub fn strength(self) -> Strength {
        match self {
            StrengthPreset::Subtle => Strength::new(0.75),
            StrengthPreset::Balanced => Strength::new(0.90),
            StrengthPreset::Strong => Strength::new(0.95),
        }
    }

    /// Parses a preset from its lowercase name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "subtle" => Some(StrengthPreset::Subtle),
            "balanced" => Some(StrengthPreset::Balanced),
            "strong" => Some(StrengthPreset::Strong),
            _ => None,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            StrengthPreset::Subtle => "subtle",
            StrengthPreset::Balanced => "balanced",
            StrengthPreset::Strong => "strong",
        }
    }
}

impl std::fmt::Display for StrengthPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_increase_in_strength() {
        let values: Vec<f32> = StrengthPreset::ALL
            .iter()
            .map(|preset| preset.strength().value())
            .collect();
        assert!(values[0] < values[1]);
        assert!(values[1] < values[2]);
    }

    #[test]
    fn preset_names_round_trip() {
        for preset in StrengthPreset::ALL {
            assert_eq!(StrengthPreset::from_name(preset.name()), Some(preset));
        }
        assert_eq!(StrengthPreset::from_name("extreme"), None);
    }

    #[test]
    fn default_preset_is_subtle() {
        assert_eq!(StrengthPreset::default(), StrengthPreset::Subtle);
    }
}
