//! Detail recombination and IPT colorfulness.

use crate::TmoResult;
use crate::layers::enhanced_detail;
use crate::response::fl;
use hdrtone_color::TripletConvert;
use hdrtone_core::{Color, Image};
use hdrtone_ops::TileExecutor;
use tracing::debug;

/// Multiplies the tone-compressed image by the enhanced detail layer,
/// channel-wise, in place.
pub fn combine_detail(
    exec: &TileExecutor,
    mut tone_compressed: Image,
    normalized: &Image,
    base: &Image,
) -> TmoResult<Image> {
    tone_compressed.ensure_same_size(normalized)?;
    tone_compressed.ensure_same_size(base)?;
    debug!("Combining detail layer");
    exec.update_image(&mut tone_compressed, |x, y, tc| {
        let detail = enhanced_detail(normalized.color_at(x, y), base.color_at(x, y));
        let tc = tc.to_xyz();
        Color::from_xyz([0, 1, 2].map(|i| tc[i] * detail[i]))
    });
    Ok(tone_compressed)
}

/// Hunt-effect chroma scale for chroma `c` at adaptation factor `f_l`.
#[inline]
pub fn chroma_scale(f_l: f64, c: f64) -> f64 {
    let c2 = c * c;
    (f_l + 1.0).powf(0.2) * (1.29 * c2 - 0.27 * c + 0.42) / (c2 - 0.31 * c + 0.42)
}

/// Applies the colorfulness boost to one pixel.
///
/// The image goes to IPT, P and T are scaled by [`chroma_scale`] with
/// `FL(0.2·Y_base)`, and the result comes back to XYZ. The surround
/// exponent is 1.0, so I is left alone.
pub fn colorfulness(xyz: [f64; 3], base_y: f64) -> [f64; 3] {
    let [i, p, t] = xyz.xyz_to_ipt();
    let scale = chroma_scale(fl(0.2 * base_y), p.hypot(t));
    [i, p * scale, t * scale].ipt_to_xyz()
}

/// Runs [`colorfulness`] over the detail-combined image, in place.
pub fn render_appearance(
    exec: &TileExecutor,
    mut combined: Image,
    base: &Image,
) -> TmoResult<Image> {
    combined.ensure_same_size(base)?;
    debug!("Rendering IPT appearance");
    exec.update_image(&mut combined, |x, y, c| {
        Color::from_xyz(colorfulness(c.to_xyz(), base.color_at(x, y).luminance()))
    });
    Ok(combined)
}
