//! Translucent overlay of the base image onto the assembled mosaic

use crate::io::error::{Result, invalid_parameter};
use image::{Rgba, RgbaImage};

/// Copy of `base` with every alpha scaled by `opacity` and truncated
pub fn build_overlay(base: &RgbaImage, opacity: f64) -> RgbaImage {
    let opacity = opacity.clamp(0.0, 1.0);
    let mut overlay = base.clone();
    for pixel in overlay.pixels_mut() {
        pixel.0[3] = (f64::from(pixel.0[3]) * opacity) as u8;
    }
    overlay
}

/// Porter-Duff "over": composite `source` onto `destination` in place
///
/// For an opaque destination this reduces to `dst * (1 - a) + src * a` per channel.
///
/// # Errors
///
/// Returns an error if the two images differ in size
pub fn alpha_composite(destination: &mut RgbaImage, source: &RgbaImage) -> Result<()> {
    if destination.dimensions() != source.dimensions() {
        return Err(invalid_parameter(
            "overlay",
            &format!("{}x{}", source.width(), source.height()),
            &format!(
                "must match the mosaic size {}x{}",
                destination.width(),
                destination.height()
            ),
        ));
    }

    for (dst, src) in destination.pixels_mut().zip(source.pixels()) {
        *dst = over(*dst, *src);
    }
    Ok(())
}

fn over(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    let [sr, sg, sb, sa] = src.0;
    if sa == 0 {
        return dst;
    }
    if sa == u8::MAX {
        return src;
    }

    let [dr, dg, db, da] = dst.0;
    let src_alpha = f32::from(sa) / 255.0;
    let dst_alpha = f32::from(da) / 255.0;
    let out_alpha = dst_alpha.mul_add(1.0 - src_alpha, src_alpha);

    let channel = |s: u8, d: u8| -> u8 {
        let blended = (f32::from(s) * src_alpha
            + f32::from(d) * dst_alpha * (1.0 - src_alpha))
            / out_alpha;
        blended.round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        channel(sr, dr),
        channel(sg, dg),
        channel(sb, db),
        (out_alpha * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}
