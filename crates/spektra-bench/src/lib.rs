//! Inputs shared by the Spektra benchmarks.

use spektra_core::PixelBuffer;
use spektra_ops::{Adjustments, Field};

/// Preview-sized frame, the viewport box used while dragging sliders.
pub const PREVIEW: (u32, u32) = (800, 600);

/// Export-sized frame (12 MP).
pub const EXPORT: (u32, u32) = (4000, 3000);

/// Deterministic photo-like test frame with gradients and fine detail.
pub fn test_frame(width: u32, height: u32) -> PixelBuffer {
    PixelBuffer::from_fn(width, height, |x, y| {
        let fx = x as f32 / width.max(1) as f32;
        let fy = y as f32 / height.max(1) as f32;
        let noise = ((x.wrapping_mul(73) ^ y.wrapping_mul(151)) % 32) as f32;
        [
            (fx * 220.0 + noise) as u8,
            (fy * 200.0 + noise) as u8,
            ((1.0 - fx) * 180.0 + noise) as u8,
            255,
        ]
    })
}

/// Tone and color only; the detail stage is skipped.
pub fn tone_only() -> Adjustments {
    Adjustments::identity()
        .with(Field::Exposure, 25.0)
        .with(Field::Contrast, 20.0)
        .with(Field::Highlights, -30.0)
        .with(Field::Shadows, 40.0)
        .with(Field::Temperature, 15.0)
        .with(Field::Saturation, 10.0)
}

/// Every adjustment non-zero.
pub fn full() -> Adjustments {
    tone_only()
        .with(Field::Whites, 10.0)
        .with(Field::Blacks, -10.0)
        .with(Field::Tint, 5.0)
        .with(Field::Clarity, 30.0)
        .with(Field::Dehaze, 20.0)
        .with(Field::Texture, 25.0)
}
