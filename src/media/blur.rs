// SPDX-License-Identifier: MPL-2.0
//! Separable box blur for single-channel buffers.
//!
//! Used to feather mask edges and soften synthesized shadows. The blur
//! runs as a horizontal pass followed by a vertical pass; windows are
//! clamped at the buffer edges so border pixels average over the samples
//! that exist.

/// Blurs a row-major single-channel buffer in place.
///
/// `radius` is the window half-width in pixels; a radius of zero leaves
/// the buffer untouched.
///
/// # Panics
///
/// Panics if `channel.len()` doesn't match `width * height`.
#[allow(
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)] // Window coordinates fit i32 and sums stay small enough for f32.
pub fn box_blur(channel: &mut [u8], width: usize, height: usize, radius: usize) {
    assert_eq!(
        channel.len(),
        width * height,
        "channel length mismatch: expected {}, got {}",
        width * height,
        channel.len()
    );
    if radius == 0 || width == 0 || height == 0 {
        return;
    }

    let radius = radius as i32;
    let mut scratch = vec![0u8; channel.len()];

    // Horizontal pass: channel -> scratch.
    for y in 0..height {
        let row_start = y * width;
        for x in 0..width {
            let mut sum = 0.0f32;
            let mut count = 0.0f32;
            for dx in -radius..=radius {
                let sample_x = (x as i32 + dx).clamp(0, width as i32 - 1) as usize;
                sum += f32::from(channel[row_start + sample_x]);
                count += 1.0;
            }
            scratch[row_start + x] = (sum / count).round() as u8;
        }
    }

    // Vertical pass: scratch -> channel.
    for y in 0..height {
        for x in 0..width {
            let mut sum = 0.0f32;
            let mut count = 0.0f32;
            for dy in -radius..=radius {
                let sample_y = (y as i32 + dy).clamp(0, height as i32 - 1) as usize;
                sum += f32::from(scratch[sample_y * width + x]);
                count += 1.0;
            }
            channel[y * width + x] = (sum / count).round() as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_radius_leaves_buffer_untouched() {
        let mut channel = vec![0u8, 50, 100, 150, 200, 250];
        let original = channel.clone();
        box_blur(&mut channel, 3, 2, 0);
        assert_eq!(channel, original);
    }

    #[test]
    fn uniform_buffer_stays_uniform() {
        let mut channel = vec![180u8; 8 * 8];
        box_blur(&mut channel, 8, 8, 3);
        assert!(channel.iter().all(|&value| value == 180));
    }

    #[test]
    fn impulse_spreads_into_a_symmetric_block() {
        let mut channel = vec![0u8; 5 * 5];
        channel[2 * 5 + 2] = 255;
        box_blur(&mut channel, 5, 5, 1);

        // A radius-1 box blur turns an impulse into a flat 3x3 block.
        for y in 1..=3 {
            for x in 1..=3 {
                assert_eq!(channel[y * 5 + x], 28, "at ({x}, {y})");
            }
        }
        assert_eq!(channel[0], 0);
        assert_eq!(channel[2 * 5], 0);
        assert_eq!(channel[4 * 5 + 4], 0);
    }

    #[test]
    fn edges_average_over_clamped_windows() {
        // A left-edge column of white bleeds right but never darkens itself
        // below the window average.
        let mut channel = vec![0u8; 4 * 4];
        for y in 0..4 {
            channel[y * 4] = 255;
        }
        box_blur(&mut channel, 4, 4, 1);

        for y in 0..4 {
            // Window {x-1 clamped to 0, 0, 1} sees white twice.
            assert_eq!(channel[y * 4], 170);
            assert_eq!(channel[y * 4 + 1], 85);
            assert_eq!(channel[y * 4 + 2], 0);
        }
    }

    #[test]
    #[should_panic(expected = "channel length mismatch")]
    fn mismatched_dimensions_panic() {
        let mut channel = vec![0u8; 10];
        box_blur(&mut channel, 4, 4, 1);
    }
}
