// SPDX-License-Identifier: MPL-2.0
//! Prompt assembly for edit requests.
//!
//! Raw instructions are short and context-free ("remove the lamp").
//! Providers do noticeably better when the prompt also tells them where
//! the region sits, how big it is and that the result must blend in, so
//! every instruction is wrapped with the region descriptors before
//! dispatch.

use crate::domain::region::RegionDescriptor;

/// Instructions shorter than this are rejected before dispatch.
pub const MIN_INSTRUCTION_LEN: usize = 2;

/// Prompts are cut off here; providers reject unbounded text fields.
pub const MAX_PROMPT_LEN: usize = 3000;

/// Wraps `instruction` with the region's position and size descriptors
/// plus style-matching directives.
#[must_use]
pub fn enrich(instruction: &str, region: &RegionDescriptor) -> String {
    format!(
        "In the {} area, {}, {}, rendered realistically, matching the surrounding lighting and style",
        region.position_label(),
        instruction,
        region.size_label(),
    )
}

/// Normalizes whitespace and bounds the prompt length.
///
/// Runs of whitespace (including newlines) collapse to single spaces and
/// the result is trimmed. Prompts longer than [`MAX_PROMPT_LEN`] are
/// truncated with a warning.
#[must_use]
pub fn sanitize(prompt: &str) -> String {
    let mut out = String::with_capacity(prompt.len());
    for word in prompt.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }

    if out.len() > MAX_PROMPT_LEN {
        eprintln!(
            "Prompt truncated from {} to {MAX_PROMPT_LEN} bytes",
            out.len()
        );
        let mut cut = MAX_PROMPT_LEN;
        while !out.is_char_boundary(cut) {
            cut -= 1;
        }
        out.truncate(cut);
    }
    out
}
