//! Cone and rod tone compression.
//!
//! Runs per pixel on the base layer, adapted to the local white. The white
//! image is consumed: its storage is overwritten in place with the
//! compressed result, each pixel reading only its own white value first.

use crate::adaptation::adapt;
use crate::response::{compress, fl};
use hdrtone_color::{hpe_to_xyz, xyz_to_hpe};
use hdrtone_core::{Color, Image};
use hdrtone_ops::TileExecutor;
use tracing::debug;

/// Cone response with noise floor.
#[inline]
fn cone(f_l: f64, c: f64, yw: f64, contrast: f64) -> f64 {
    compress((f_l * c / yw).powf(contrast)) + 0.1
}

/// Rod response for adapting luminance `la`, pixel luminance `s` and global
/// white scale `sw`.
#[inline]
pub fn rod_response(la: f64, s: f64, sw: f64, contrast: f64) -> f64 {
    let lls = 5.0 * la;
    let j = 1e-5 / (lls + 1e-5);
    let j2 = j * j;
    let fls = 3800.0 * j2 * lls + 0.2 * (1.0 - j2).powi(4) * lls.powf(1.0 / 6.0);
    let st = s / sw;
    let bs = 0.5 / (1.0 + 0.3 * (lls * st).powf(0.3)) + 0.5 / (1.0 + 5.0 * lls);
    3.05 * bs * compress((fls * st).powf(contrast)) + 0.3
}

/// Tone-compresses one pixel: `base` XYZ under local white `white` XYZ.
pub fn compress_pixel(base: [f64; 3], white: [f64; 3], sw: f64, contrast: f64) -> [f64; 3] {
    let yw = white[1];
    let la = 0.2 * yw;
    let f_l = fl(la);

    let adapted = adapt(base, white);
    let [l, m, s] = xyz_to_hpe(adapted).map(|c| cone(f_l, c, yw, contrast));
    let a = rod_response(la, adapted[1].abs(), sw, contrast);
    hpe_to_xyz([l + a, m + a, s + a])
}

/// Compresses `base` against `white`, reusing the white image's storage for
/// the output.
pub fn tone_compress(
    exec: &TileExecutor,
    base: &Image,
    mut white: Image,
    contrast: f64,
) -> crate::TmoResult<Image> {
    white.ensure_same_size(base)?;
    let sw = exec.reduce_max(&white, |c| c.luminance());
    debug!(sw, contrast, "Compressing tone");
    exec.update_image(&mut white, |x, y, w| {
        Color::from_xyz(compress_pixel(
            base.color_at(x, y).to_xyz(),
            w.to_xyz(),
            sw,
            contrast,
        ))
    });
    Ok(white)
}
