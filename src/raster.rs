//! Pixel helpers for the in-memory host.
//!
//! Selection shapes are rasterized with tiny-skia (re-exported by resvg).
//! Resampling goes through `image::imageops` on premultiplied pixels.

use image::imageops::{self, FilterType};
use image::{GrayImage, Luma, Rgba, Rgba32FImage, RgbaImage};
use resvg::tiny_skia::{FillRule, Paint, Path, PathBuilder, Pixmap, Transform};

use crate::document::RectPx;
use crate::pdb::ChannelOps;

/// Bezier control point factor for a quarter ellipse.
const KAPPA: f32 = 0.552_284_8;

/// Filter used for all image scaling.
pub const SCALE_FILTER: FilterType = FilterType::CatmullRom;

// ============================================================================
// Shapes
// ============================================================================

/// Builds a rounded rectangle path with elliptical corners.
///
/// Radii are clamped to half the rectangle's width and height.
pub fn rounded_rect_path(rect: RectPx, radius_x: f32, radius_y: f32) -> Option<Path> {
    let x = rect.x as f32;
    let y = rect.y as f32;
    let w = rect.width as f32;
    let h = rect.height as f32;
    let rx = radius_x.clamp(0.0, w / 2.0);
    let ry = radius_y.clamp(0.0, h / 2.0);
    let kx = rx * KAPPA;
    let ky = ry * KAPPA;
    let right = x + w;
    let bottom = y + h;

    let mut pb = PathBuilder::new();
    pb.move_to(x + rx, y);
    pb.line_to(right - rx, y);
    pb.cubic_to(right - rx + kx, y, right, y + ry - ky, right, y + ry);
    pb.line_to(right, bottom - ry);
    pb.cubic_to(right, bottom - ry + ky, right - rx + kx, bottom, right - rx, bottom);
    pb.line_to(x + rx, bottom);
    pb.cubic_to(x + rx - kx, bottom, x, bottom - ry + ky, x, bottom - ry);
    pb.line_to(x, y + ry);
    pb.cubic_to(x, y + ry - ky, x + rx - kx, y, x + rx, y);
    pb.close();
    pb.finish()
}

/// Rasterizes a path into an anti-aliased coverage channel.
pub fn coverage(path: &Path, width: u32, height: u32) -> Option<GrayImage> {
    let mut pixmap = Pixmap::new(width, height)?;
    let mut paint = Paint::default();
    paint.set_color_rgba8(255, 255, 255, 255);
    paint.anti_alias = true;

    pixmap.fill_path(path, &paint, FillRule::Winding, Transform::identity(), None);

    let alphas = pixmap.pixels().iter().map(|p| p.alpha()).collect();
    GrayImage::from_raw(width, height, alphas)
}

/// Rasterizes a rounded rectangle onto a `width x height` coverage channel.
pub fn rounded_rect_coverage(
    width: u32,
    height: u32,
    rect: RectPx,
    radius_x: f32,
    radius_y: f32,
) -> Option<GrayImage> {
    let path = rounded_rect_path(rect, radius_x, radius_y)?;
    coverage(&path, width, height)
}

/// Combines a new shape with an existing selection channel.
pub fn combine(current: &mut GrayImage, shape: &GrayImage, op: ChannelOps) {
    for (dst, src) in current.pixels_mut().zip(shape.pixels()) {
        let (d, s) = (dst[0], src[0]);
        dst[0] = match op {
            ChannelOps::Replace => s,
            ChannelOps::Add => d.max(s),
            ChannelOps::Subtract => mul(d, 255 - s),
            ChannelOps::Intersect => d.min(s),
        };
    }
}

/// Inverts a coverage channel in place.
pub fn invert(channel: &mut GrayImage) {
    for p in channel.pixels_mut() {
        p[0] = 255 - p[0];
    }
}

// ============================================================================
// Blending
// ============================================================================

/// Multiplies two 8-bit fractions, rounding to nearest.
pub fn mul(a: u8, b: u8) -> u8 {
    ((a as u32 * b as u32 + 127) / 255) as u8
}

/// Moves `from` toward `to` by `weight / 255`.
pub fn mix(from: u8, to: u8, weight: u8) -> u8 {
    let w = weight as f32 / 255.0;
    (from as f32 + (to as f32 - from as f32) * w).round() as u8
}

/// Mixes every channel of an RGBA pixel toward `to`.
pub fn mix_rgba(from: Rgba<u8>, to: Rgba<u8>, weight: u8) -> Rgba<u8> {
    Rgba([
        mix(from[0], to[0], weight),
        mix(from[1], to[1], weight),
        mix(from[2], to[2], weight),
        mix(from[3], to[3], weight),
    ])
}

// ============================================================================
// Scaling
// ============================================================================

/// Resizes an RGBA image, resampling in premultiplied space.
///
/// Fully transparent pixels contribute no color to the result.
pub fn scale_rgba(src: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    let premultiplied = Rgba32FImage::from_fn(src.width(), src.height(), |x, y| {
        let [r, g, b, a] = src.get_pixel(x, y).0;
        let a = a as f32 / 255.0;
        Rgba([
            r as f32 / 255.0 * a,
            g as f32 / 255.0 * a,
            b as f32 / 255.0 * a,
            a,
        ])
    });

    let resized = imageops::resize(&premultiplied, width, height, SCALE_FILTER);

    RgbaImage::from_fn(width, height, |x, y| {
        let [r, g, b, a] = resized.get_pixel(x, y).0;
        unpremultiply(r, g, b, a)
    })
}

/// Resizes a grayscale channel.
pub fn scale_gray(src: &GrayImage, width: u32, height: u32) -> GrayImage {
    imageops::resize(src, width, height, SCALE_FILTER)
}

/// Converts a premultiplied float pixel back to straight 8-bit RGBA.
fn unpremultiply(r: f32, g: f32, b: f32, a: f32) -> Rgba<u8> {
    let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    if a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }
    Rgba([to_u8(r / a), to_u8(g / a), to_u8(b / a), to_u8(a)])
}

/// Grayscale value of an opaque color, as used when filling masks.
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    use image::Pixel;
    let Luma([l]) = Rgba([r, g, b, 255]).to_luma();
    l
}

// ============================================================================
// Tests
// ============================================================================
