use image::{Rgb, RgbImage};

use crate::mask::Mask;

/// Fill color used when a mask covers the whole frame and no surrounding
/// content exists to sample from
const NEUTRAL_FILL: Rgb<u8> = Rgb([128, 128, 128]);

/// Reconstruct masked pixels from surrounding content.
///
/// Masked pixels are filled inward from the mask boundary: every pass
/// assigns each still-masked pixel the channel-wise average of the known
/// pixels inside its Chebyshev window of the given radius, computed from the
/// previous pass's state so the result is deterministic. An all-zero mask
/// returns a pixel-identical copy of the input. A mask covering the entire
/// frame falls back to a neutral fill rather than failing.
pub fn inpaint(frame: &RgbImage, mask: &Mask, radius: u32) -> RgbImage {
    let mut output = frame.clone();
    if mask.is_empty() {
        return output;
    }

    let width = frame.width();
    let height = frame.height();
    let radius = radius.max(1) as i64;

    let mut known: Vec<bool> = Vec::with_capacity((width * height) as usize);
    for y in 0..height {
        for x in 0..width {
            known.push(!mask.is_set(x, y));
        }
    }

    let mut remaining: Vec<(u32, u32)> = (0..height)
        .flat_map(|y| (0..width).map(move |x| (x, y)))
        .filter(|&(x, y)| mask.is_set(x, y))
        .collect();

    while !remaining.is_empty() {
        let snapshot = output.clone();
        let known_snapshot = known.clone();
        let mut still_masked = Vec::new();
        let mut progressed = false;

        for &(x, y) in &remaining {
            let mut sums = [0u64; 3];
            let mut count = 0u64;

            for dy in -radius..=radius {
                for dx in -radius..=radius {
                    let nx = x as i64 + dx;
                    let ny = y as i64 + dy;
                    if nx < 0 || ny < 0 || nx >= width as i64 || ny >= height as i64 {
                        continue;
                    }
                    if !known_snapshot[(ny as u32 * width + nx as u32) as usize] {
                        continue;
                    }
                    let pixel = snapshot.get_pixel(nx as u32, ny as u32);
                    sums[0] += u64::from(pixel.0[0]);
                    sums[1] += u64::from(pixel.0[1]);
                    sums[2] += u64::from(pixel.0[2]);
                    count += 1;
                }
            }

            if count > 0 {
                let filled = Rgb([
                    (sums[0] / count) as u8,
                    (sums[1] / count) as u8,
                    (sums[2] / count) as u8,
                ]);
                output.put_pixel(x, y, filled);
                known[(y * width + x) as usize] = true;
                progressed = true;
            } else {
                still_masked.push((x, y));
            }
        }

        if !progressed {
            // No known pixel anywhere in the frame: best-effort fill.
            for &(x, y) in &still_masked {
                output.put_pixel(x, y, NEUTRAL_FILL);
            }
            break;
        }

        remaining = still_masked;
    }

    output
}
