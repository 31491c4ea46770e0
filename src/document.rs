//! Host-side document model.
//!
//! An [`Image`] owns a stack of [`Layer`]s, a [`Selection`] channel and the
//! color context used by fill operations. The plug-in never touches these
//! directly; it only sees [`ImageId`] and [`LayerId`] handles and goes through
//! the [`ProcedureDatabase`](crate::pdb::ProcedureDatabase).

use std::fmt;

use image::{GrayImage, Luma, Rgba, RgbaImage};
use palette::Srgb;

// ============================================================================
// Handles
// ============================================================================

/// Handle to an image owned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageId(pub u32);

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle to a layer owned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(pub u32);

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ============================================================================
// Geometry
// ============================================================================

/// A rectangle defined in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RectPx {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl RectPx {
    /// Creates a rectangle starting at origin (0, 0) with the given dimensions.
    pub fn from_size(width: u32, height: u32) -> Self {
        Self { x: 0, y: 0, width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A 2D size in pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizePx {
    pub width: u32,
    pub height: u32,
}

impl SizePx {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns true if width equals height.
    pub fn is_square(&self) -> bool {
        self.width == self.height
    }
}

impl fmt::Display for SizePx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

// ============================================================================
// Layer Mask
// ============================================================================

/// A grayscale surface that modulates its layer's alpha when applied.
///
/// 255 keeps a pixel fully opaque, 0 makes it fully transparent.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerMask {
    pub data: GrayImage,
}

impl LayerMask {
    /// Creates a mask of the given size with every pixel set to `value`.
    pub fn filled(width: u32, height: u32, value: u8) -> Self {
        Self {
            data: GrayImage::from_pixel(width, height, Luma([value])),
        }
    }

    pub fn from_gray(data: GrayImage) -> Self {
        Self { data }
    }

    pub fn size(&self) -> SizePx {
        SizePx::new(self.data.width(), self.data.height())
    }
}

// ============================================================================
// Layer
// ============================================================================

/// A paintable surface within an image.
///
/// Pixels are always stored as RGBA. A layer without an alpha channel keeps
/// every alpha value at 255 until [`Layer::add_alpha`] is called.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub id: LayerId,
    pub name: String,
    pub pixels: RgbaImage,
    pub has_alpha: bool,
    pub mask: Option<LayerMask>,
}

impl Layer {
    /// Creates a layer without an alpha channel. Incoming alpha is discarded.
    pub fn opaque(id: LayerId, name: impl Into<String>, mut pixels: RgbaImage) -> Self {
        for pixel in pixels.pixels_mut() {
            pixel[3] = 255;
        }
        Self {
            id,
            name: name.into(),
            pixels,
            has_alpha: false,
            mask: None,
        }
    }

    /// Creates a layer that already carries an alpha channel.
    pub fn with_alpha(id: LayerId, name: impl Into<String>, pixels: RgbaImage) -> Self {
        Self {
            id,
            name: name.into(),
            pixels,
            has_alpha: true,
            mask: None,
        }
    }

    pub fn size(&self) -> SizePx {
        SizePx::new(self.pixels.width(), self.pixels.height())
    }

    /// Adds an alpha channel. Returns false if the layer already had one.
    pub fn add_alpha(&mut self) -> bool {
        if self.has_alpha {
            return false;
        }
        self.has_alpha = true;
        true
    }

    /// Returns a copy of the layer's alpha values as a grayscale surface.
    pub fn alpha_channel(&self) -> GrayImage {
        GrayImage::from_fn(self.pixels.width(), self.pixels.height(), |x, y| {
            Luma([self.pixels.get_pixel(x, y)[3]])
        })
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.pixels.get_pixel(x, y)
    }
}

// ============================================================================
// Selection
// ============================================================================

/// Per-pixel selection coverage for an image.
///
/// 0 means unselected, 255 fully selected; values in between come from
/// anti-aliased edges. A channel with no non-zero pixel is empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub channel: GrayImage,
}

impl Selection {
    /// Creates an empty selection.
    pub fn none(width: u32, height: u32) -> Self {
        Self {
            channel: GrayImage::new(width, height),
        }
    }

    /// Creates a selection covering the whole canvas.
    pub fn all(width: u32, height: u32) -> Self {
        Self {
            channel: GrayImage::from_pixel(width, height, Luma([255])),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.channel.pixels().all(|p| p[0] == 0)
    }

    /// Coverage at a canvas position. Positions off the canvas are unselected.
    pub fn coverage(&self, x: u32, y: u32) -> u8 {
        self.channel.get_pixel_checked(x, y).map_or(0, |p| p[0])
    }
}

// ============================================================================
// Color Context
// ============================================================================

/// Foreground and background colors used by fill and clear operations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorContext {
    pub foreground: Srgb<u8>,
    pub background: Srgb<u8>,
}

impl Default for ColorContext {
    fn default() -> Self {
        Self {
            foreground: Srgb::new(0, 0, 0),
            background: Srgb::new(255, 255, 255),
        }
    }
}

// ============================================================================
// Image
// ============================================================================

/// An open canvas: layers, selection and color context.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub id: ImageId,
    pub width: u32,
    pub height: u32,
    pub layers: Vec<Layer>,
    pub selection: Selection,
    pub colors: ColorContext,
}

impl Image {
    /// Creates an image with no layers and an empty selection.
    pub fn new(id: ImageId, width: u32, height: u32) -> Self {
        Self {
            id,
            width,
            height,
            layers: Vec::new(),
            selection: Selection::none(width, height),
            colors: ColorContext::default(),
        }
    }

    pub fn size(&self) -> SizePx {
        SizePx::new(self.width, self.height)
    }

    /// Places a layer on top of the stack.
    pub fn push_layer(&mut self, layer: Layer) {
        self.layers.push(layer);
    }

    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub fn layer_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_px_is_empty() {
        assert!(!RectPx::from_size(3, 5).is_empty());
        assert!(RectPx::from_size(0, 5).is_empty());
        assert!(RectPx::from_size(5, 0).is_empty());
    }

    #[test]
    fn opaque_layer_forces_full_alpha() {
        let pixels = RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 40]));
        let layer = Layer::opaque(LayerId(1), "Background", pixels);

        assert!(!layer.has_alpha);
        assert_eq!(layer.pixel(2, 2).0, [10, 20, 30, 255]);
    }

    #[test]
    fn add_alpha_is_idempotent() {
        let mut layer = Layer::opaque(LayerId(1), "Background", RgbaImage::new(2, 2));
        assert!(layer.add_alpha());
        assert!(!layer.add_alpha());
        assert!(layer.has_alpha);
    }

    #[test]
    fn selection_coverage_off_canvas_is_zero() {
        let mut selection = Selection::none(4, 4);
        assert!(selection.is_empty());

        selection.channel.put_pixel(3, 3, Luma([200]));
        assert!(!selection.is_empty());
        assert_eq!(selection.coverage(3, 3), 200);
        assert_eq!(selection.coverage(4, 3), 0);
        assert_eq!(selection.coverage(0, 100), 0);
        assert_eq!(Selection::all(4, 4).coverage(9, 9), 0);
    }

    #[test]
    fn image_layer_lookup() {
        let mut image = Image::new(ImageId(0), 8, 8);
        image.push_layer(Layer::opaque(LayerId(3), "a", RgbaImage::new(8, 8)));

        assert!(image.layer(LayerId(3)).is_some());
        assert!(image.layer(LayerId(4)).is_none());
        assert!(image.selection.is_empty());
        assert!(image.size().is_square());
    }
}
