//! The adjustment engine.
//!
//! Maps a source [`PixelBuffer`] and an [`Adjustments`] vector to an output
//! buffer of the same size: tone stage first, spatial detail stage second.
//! Deterministic and resolution-agnostic, so the same call serves the
//! preview and the full-resolution export.
//!
//! # Neighbor sampling
//!
//! The detail stage reads neighborhoods. Where those reads land is
//! selected by [`NeighborSampling`]:
//!
//! | Mode       | Neighbors behind in scan order | Neighbors ahead | Center   |
//! |------------|--------------------------------|-----------------|----------|
//! | `InPlace`  | detail-filtered                | tone output     | tone     |
//! | `Snapshot` | tone output                    | tone output     | tone     |
//! | `Fused`    | detail-filtered                | source          | source   |
//!
//! `InPlace` is the default and keeps the legacy scan-order aliasing.
//! `Snapshot` is the double-buffered, order-independent variant. `Fused`
//! evaluates both stages in a single scan over one buffer, keeping the
//! tone result in float until the final store. Its pass order matches the
//! legacy single-loop editor; arithmetic is `f32` rather than `f64`, so a
//! value landing within rounding error of a .5 tie may quantize one level
//! apart from an `f64` implementation.
//!
//! # Example
//!
//! ```rust
//! use spektra_core::PixelBuffer;
//! use spektra_ops::{Adjustments, Engine, Field, NeighborSampling};
//!
//! let src = PixelBuffer::filled(8, 8, [120, 100, 80, 255]);
//! let adj = Adjustments::identity().with(Field::Exposure, 50.0);
//!
//! let mut engine = Engine::with_sampling(NeighborSampling::Snapshot);
//! let out = engine.process(&src, &adj).unwrap();
//! assert!(out.pixel(0, 0)[0] > 120);
//! ```

use std::fmt;
use std::str::FromStr;

use spektra_core::{PixelBuffer, CHANNELS};
#[allow(unused_imports)]
use tracing::{debug, trace};

use crate::detail::DetailParams;
use crate::tone::{apply_tone_stage, quantize, sample_lightness, ToneParams};
use crate::{Adjustments, OpsError, OpsResult};

/// Which buffer the detail stage samples neighborhoods from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum NeighborSampling {
    /// Read and write the output buffer in scan order.
    #[default]
    InPlace,
    /// Read a frozen copy of the tone-stage output.
    Snapshot,
    /// Single scan over both stages against one buffer. The clarity blur
    /// sees the unadjusted center and any unprocessed neighbors.
    Fused,
}

impl NeighborSampling {
    /// All modes.
    pub const ALL: [NeighborSampling; 3] = [
        NeighborSampling::InPlace,
        NeighborSampling::Snapshot,
        NeighborSampling::Fused,
    ];

    /// Kebab-case name.
    pub fn name(self) -> &'static str {
        match self {
            NeighborSampling::InPlace => "in-place",
            NeighborSampling::Snapshot => "snapshot",
            NeighborSampling::Fused => "fused",
        }
    }
}

impl fmt::Display for NeighborSampling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NeighborSampling {
    type Err = OpsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                OpsError::InvalidParameter(format!(
                    "unknown sampling mode '{s}' (expected in-place, snapshot or fused)"
                ))
            })
    }
}

/// Reusable engine instance.
///
/// Holds the sampling mode and a scratch buffer that `Snapshot` mode
/// reuses across calls of the same size.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    sampling: NeighborSampling,
    scratch: Option<PixelBuffer>,
}

impl Engine {
    /// Creates an engine with the default [`NeighborSampling::InPlace`] mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine with the given sampling mode.
    pub fn with_sampling(sampling: NeighborSampling) -> Self {
        Self {
            sampling,
            scratch: None,
        }
    }

    /// Current sampling mode.
    pub fn sampling(&self) -> NeighborSampling {
        self.sampling
    }

    /// Changes the sampling mode.
    pub fn set_sampling(&mut self, sampling: NeighborSampling) {
        self.sampling = sampling;
    }

    /// Processes `src` into a newly allocated buffer.
    ///
    /// # Errors
    ///
    /// [`OpsError::OutOfRange`] if any adjustment is outside [-100, 100].
    pub fn process(&mut self, src: &PixelBuffer, adj: &Adjustments) -> OpsResult<PixelBuffer> {
        let mut dst = PixelBuffer::new(src.width(), src.height());
        self.process_into(src, &mut dst, adj)?;
        Ok(dst)
    }

    /// Processes `src` into `dst`, which must have the same dimensions.
    ///
    /// On error `dst` is left untouched.
    ///
    /// # Errors
    ///
    /// - [`OpsError::OutOfRange`] if any adjustment is outside [-100, 100]
    /// - [`OpsError::SizeMismatch`] if `dst` differs in size from `src`
    pub fn process_into(
        &mut self,
        src: &PixelBuffer,
        dst: &mut PixelBuffer,
        adj: &Adjustments,
    ) -> OpsResult<()> {
        trace!(
            width = src.width(),
            height = src.height(),
            sampling = %self.sampling,
            "engine::process"
        );

        adj.validate()?;
        if !src.same_dimensions(dst) {
            return Err(OpsError::SizeMismatch(format!(
                "source is {}x{}, destination is {}x{}",
                src.width(),
                src.height(),
                dst.width(),
                dst.height()
            )));
        }

        let detail = DetailParams::new(adj);
        if detail.is_noop() {
            debug!("detail stage skipped: clarity, dehaze and texture are zero");
        }

        match self.sampling {
            NeighborSampling::InPlace => run_in_place(src, dst, adj, &detail),
            NeighborSampling::Snapshot => {
                let scratch = self.scratch.get_or_insert_with(|| PixelBuffer::new(0, 0));
                run_snapshot(src, dst, scratch, adj, &detail)
            }
            NeighborSampling::Fused => run_fused(src, dst, adj, &detail),
        }
    }
}

/// Processes `src` with a default engine.
///
/// ```rust
/// use spektra_core::PixelBuffer;
/// use spektra_ops::{process, Adjustments};
///
/// let src = PixelBuffer::filled(4, 4, [10, 200, 30, 255]);
/// assert_eq!(process(&src, &Adjustments::identity()).unwrap(), src);
/// ```
pub fn process(src: &PixelBuffer, adj: &Adjustments) -> OpsResult<PixelBuffer> {
    Engine::new().process(src, adj)
}

#[inline]
fn rgb_f32(px: &[u8]) -> [f32; 3] {
    [px[0] as f32, px[1] as f32, px[2] as f32]
}

#[inline]
fn store(dst: &mut PixelBuffer, i: usize, rgb: [f32; 3]) {
    let data = dst.as_raw_mut();
    data[i] = quantize(rgb[0]);
    data[i + 1] = quantize(rgb[1]);
    data[i + 2] = quantize(rgb[2]);
}

fn run_in_place(
    src: &PixelBuffer,
    dst: &mut PixelBuffer,
    adj: &Adjustments,
    detail: &DetailParams,
) -> OpsResult<()> {
    apply_tone_stage(src, dst, adj)?;
    if detail.is_noop() {
        return Ok(());
    }

    for y in 0..src.height() {
        for x in 0..src.width() {
            let i = src.index(x, y);
            let l = sample_lightness(&src.as_raw()[i..i + CHANNELS]);
            let c = rgb_f32(&dst.as_raw()[i..i + CHANNELS]);
            let out = detail.apply(c, l, dst, x, y);
            store(dst, i, out);
        }
    }
    Ok(())
}

fn run_snapshot(
    src: &PixelBuffer,
    dst: &mut PixelBuffer,
    scratch: &mut PixelBuffer,
    adj: &Adjustments,
    detail: &DetailParams,
) -> OpsResult<()> {
    apply_tone_stage(src, dst, adj)?;
    if detail.is_noop() {
        return Ok(());
    }

    if scratch.same_dimensions(dst) {
        scratch.copy_from(dst)?;
    } else {
        trace!(width = dst.width(), height = dst.height(), "reallocating snapshot");
        *scratch = dst.clone();
    }

    for y in 0..src.height() {
        for x in 0..src.width() {
            let i = src.index(x, y);
            let l = sample_lightness(&src.as_raw()[i..i + CHANNELS]);
            let c = rgb_f32(&scratch.as_raw()[i..i + CHANNELS]);
            let out = detail.apply(c, l, scratch, x, y);
            store(dst, i, out);
        }
    }
    Ok(())
}

fn run_fused(
    src: &PixelBuffer,
    dst: &mut PixelBuffer,
    adj: &Adjustments,
    detail: &DetailParams,
) -> OpsResult<()> {
    dst.copy_from(src)?;
    let tone = ToneParams::new(adj);

    for y in 0..src.height() {
        for x in 0..src.width() {
            let i = src.index(x, y);
            let px = &src.as_raw()[i..i + CHANNELS];
            let l = sample_lightness(px);
            let mut c = tone.apply(rgb_f32(px), l);
            if !detail.is_noop() {
                c = detail.apply(c, l, dst, x, y);
            }
            store(dst, i, c);
        }
    }
    Ok(())
}
