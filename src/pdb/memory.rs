//! In-memory host implementing the procedure database.
//!
//! `MemoryHost` owns a set of images and performs every procedure directly on
//! their pixel buffers. It also keeps what a real host would show the user:
//! an undo history per image, a record of every procedure call, and a count
//! of display flushes.

use image::{Rgba, RgbaImage};
use log::{debug, trace};

use super::{
    AddMaskType, ChannelOps, Drawable, FillType, MaskApplyMode, PdbError, Procedure,
    ProcedureDatabase,
};
use crate::document::{Image, ImageId, Layer, LayerId, LayerMask, RectPx, Selection};
use crate::raster;

// ============================================================================
// Undo History
// ============================================================================

/// Undo bookkeeping for one image.
///
/// The outermost [`start`](Self::start) snapshots the image; the matching
/// [`end`](Self::end) turns that snapshot into a single undo step.
#[derive(Debug, Default)]
struct UndoHistory {
    depth: u32,
    pending: Option<Image>,
    steps: Vec<Image>,
}

impl UndoHistory {
    fn start(&mut self, image: &Image) {
        if self.depth == 0 {
            self.pending = Some(image.clone());
        }
        self.depth += 1;
    }

    fn end(&mut self, id: ImageId) -> Result<(), PdbError> {
        if self.depth == 0 {
            return Err(PdbError::UndoGroupNotOpen(id));
        }
        self.depth -= 1;
        if self.depth == 0 {
            if let Some(snapshot) = self.pending.take() {
                self.steps.push(snapshot);
            }
        }
        Ok(())
    }
}

struct Slot {
    image: Image,
    undo: UndoHistory,
}

// ============================================================================
// MemoryHost
// ============================================================================

/// A self-contained host that keeps its images in memory.
#[derive(Default)]
pub struct MemoryHost {
    slots: Vec<Slot>,
    next_layer: u32,
    history: Vec<Procedure>,
    flushes: usize,
}

impl MemoryHost {
    /// Creates a host with no open images.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens an image with a single layer built from `pixels`.
    ///
    /// When `has_alpha` is false the layer starts without an alpha channel and
    /// any alpha in `pixels` is discarded.
    pub fn open_image(&mut self, pixels: RgbaImage, has_alpha: bool) -> (ImageId, LayerId) {
        let id = ImageId(self.slots.len() as u32);
        let layer_id = self.allocate_layer_id();
        let mut image = Image::new(id, pixels.width(), pixels.height());

        let layer = if has_alpha {
            Layer::with_alpha(layer_id, "Background", pixels)
        } else {
            Layer::opaque(layer_id, "Background", pixels)
        };
        image.push_layer(layer);

        debug!("opened image {} ({}) with layer {}", id, image.size(), layer_id);
        self.slots.push(Slot {
            image,
            undo: UndoHistory::default(),
        });
        (id, layer_id)
    }

    /// Returns the image with the given handle.
    pub fn image(&self, id: ImageId) -> Option<&Image> {
        self.slots.get(id.0 as usize).map(|s| &s.image)
    }

    /// Returns the image with the given handle for direct editing.
    ///
    /// Edits made here bypass the undo history.
    pub fn image_mut(&mut self, id: ImageId) -> Option<&mut Image> {
        self.slots.get_mut(id.0 as usize).map(|s| &mut s.image)
    }

    /// Every procedure called so far, in order.
    pub fn history(&self) -> &[Procedure] {
        &self.history
    }

    /// Number of times [`displays_flush`](ProcedureDatabase::displays_flush) ran.
    pub fn flush_count(&self) -> usize {
        self.flushes
    }

    /// Number of undo steps recorded for the image.
    pub fn undo_steps(&self, id: ImageId) -> usize {
        self.slots
            .get(id.0 as usize)
            .map_or(0, |s| s.undo.steps.len())
    }

    /// Reverts the most recent undo step. Returns false if there was none.
    pub fn undo(&mut self, id: ImageId) -> Result<bool, PdbError> {
        let slot = self.slot_mut(id)?;
        match slot.undo.steps.pop() {
            Some(snapshot) => {
                trace!("undo on image {}", id);
                slot.image = snapshot;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn allocate_layer_id(&mut self) -> LayerId {
        let id = LayerId(self.next_layer);
        self.next_layer += 1;
        id
    }

    fn record(&mut self, procedure: Procedure) {
        trace!("pdb call {}", procedure);
        self.history.push(procedure);
    }

    fn slot_mut(&mut self, id: ImageId) -> Result<&mut Slot, PdbError> {
        self.slots
            .get_mut(id.0 as usize)
            .ok_or(PdbError::InvalidImage(id))
    }

    fn image_checked(&mut self, id: ImageId) -> Result<&mut Image, PdbError> {
        Ok(&mut self.slot_mut(id)?.image)
    }

    /// Finds the image that owns a layer.
    fn owner_of(&mut self, layer: LayerId) -> Result<&mut Image, PdbError> {
        self.slots
            .iter_mut()
            .map(|s| &mut s.image)
            .find(|img| img.layer(layer).is_some())
            .ok_or(PdbError::InvalidLayer(layer))
    }
}

/// Looks up a layer inside an image that is known to own it.
fn layer_in(image: &mut Image, id: LayerId) -> Result<&mut Layer, PdbError> {
    image.layer_mut(id).ok_or(PdbError::InvalidLayer(id))
}

impl ProcedureDatabase for MemoryHost {
    fn image_width(&mut self, image: ImageId) -> Result<u32, PdbError> {
        self.record(Procedure::ImageWidth);
        Ok(self.image_checked(image)?.width)
    }

    fn image_undo_group_start(&mut self, image: ImageId) -> Result<(), PdbError> {
        self.record(Procedure::ImageUndoGroupStart);
        let slot = self.slot_mut(image)?;
        slot.undo.start(&slot.image);
        Ok(())
    }

    fn image_undo_group_end(&mut self, image: ImageId) -> Result<(), PdbError> {
        self.record(Procedure::ImageUndoGroupEnd);
        self.slot_mut(image)?.undo.end(image)?;
        trace!("undo steps on image {}: {}", image, self.undo_steps(image));
        Ok(())
    }

    fn layer_add_alpha(&mut self, layer: LayerId) -> Result<(), PdbError> {
        self.record(Procedure::LayerAddAlpha);
        let image = self.owner_of(layer)?;
        layer_in(image, layer)?.add_alpha();
        Ok(())
    }

    fn layer_create_mask(
        &mut self,
        layer: LayerId,
        mask_type: AddMaskType,
    ) -> Result<LayerMask, PdbError> {
        self.record(Procedure::LayerCreateMask);
        let image = self.owner_of(layer)?;
        let selection = image.selection.channel.clone();
        let target = layer_in(image, layer)?;
        let size = target.size();

        let mask = match mask_type {
            AddMaskType::White => LayerMask::filled(size.width, size.height, 255),
            AddMaskType::Black => LayerMask::filled(size.width, size.height, 0),
            AddMaskType::Alpha => LayerMask::from_gray(target.alpha_channel()),
            AddMaskType::Selection => LayerMask::from_gray(selection),
        };
        Ok(mask)
    }

    fn layer_add_mask(&mut self, layer: LayerId, mask: LayerMask) -> Result<(), PdbError> {
        self.record(Procedure::LayerAddMask);
        let image = self.owner_of(layer)?;
        let target = layer_in(image, layer)?;

        if target.mask.is_some() {
            return Err(PdbError::MaskExists(layer));
        }
        if mask.size() != target.size() {
            return Err(PdbError::MaskSize {
                mask: mask.size(),
                layer: target.size(),
            });
        }
        target.mask = Some(mask);
        Ok(())
    }

    fn selection_is_empty(&mut self, image: ImageId) -> Result<bool, PdbError> {
        self.record(Procedure::SelectionIsEmpty);
        Ok(self.image_checked(image)?.selection.is_empty())
    }

    fn drawable_edit_fill(&mut self, drawable: Drawable, fill: FillType) -> Result<(), PdbError> {
        self.record(Procedure::DrawableEditFill);
        let image = self.owner_of(drawable.layer_id())?;
        let selection = selection_or_all(&image.selection);
        let colors = image.colors;
        let target = layer_in(image, drawable.layer_id())?;

        let (fr, fg, fb) = colors.foreground.into_components();
        let (br, bg, bb) = colors.background.into_components();
        let color = match fill {
            FillType::Foreground => Rgba([fr, fg, fb, 255]),
            FillType::Background => Rgba([br, bg, bb, 255]),
            FillType::White => Rgba([255, 255, 255, 255]),
            FillType::Transparent if target.has_alpha => Rgba([0, 0, 0, 0]),
            FillType::Transparent => Rgba([br, bg, bb, 255]),
        };

        match drawable {
            Drawable::Layer(id) => {
                for (x, y, pixel) in target.pixels.enumerate_pixels_mut() {
                    *pixel = raster::mix_rgba(*pixel, color, selection.coverage(x, y));
                }
                debug!("filled layer {} with {:?}", id, fill);
            }
            Drawable::Mask(id) => {
                let mask = target.mask.as_mut().ok_or(PdbError::NoMask(id))?;
                let value = if color[3] == 0 {
                    0
                } else {
                    raster::luma(color[0], color[1], color[2])
                };
                for (x, y, pixel) in mask.data.enumerate_pixels_mut() {
                    pixel[0] = raster::mix(pixel[0], value, selection.coverage(x, y));
                }
                debug!("filled mask of layer {} with {:?}", id, fill);
            }
        }
        Ok(())
    }

    fn layer_remove_mask(&mut self, layer: LayerId, mode: MaskApplyMode) -> Result<(), PdbError> {
        self.record(Procedure::LayerRemoveMask);
        let image = self.owner_of(layer)?;
        let target = layer_in(image, layer)?;
        let mask = target.mask.take().ok_or(PdbError::NoMask(layer))?;

        if mode == MaskApplyMode::Apply {
            target.add_alpha();
            for (pixel, m) in target.pixels.pixels_mut().zip(mask.data.pixels()) {
                pixel[3] = raster::mul(pixel[3], m[0]);
            }
        }
        Ok(())
    }

    fn image_select_round_rectangle(
        &mut self,
        image: ImageId,
        operation: ChannelOps,
        rect: RectPx,
        corner_radius_x: f64,
        corner_radius_y: f64,
    ) -> Result<(), PdbError> {
        self.record(Procedure::ImageSelectRoundRectangle);
        if rect.is_empty() {
            return Err(PdbError::InvalidSize {
                width: rect.width,
                height: rect.height,
            });
        }

        let target = self.image_checked(image)?;
        let shape = raster::rounded_rect_coverage(
            target.width,
            target.height,
            rect,
            corner_radius_x as f32,
            corner_radius_y as f32,
        )
        .ok_or(PdbError::Raster)?;

        raster::combine(&mut target.selection.channel, &shape, operation);
        debug!(
            "round rectangle {:?} radii ({}, {}) with {:?}",
            rect, corner_radius_x, corner_radius_y, operation
        );
        Ok(())
    }

    fn selection_invert(&mut self, image: ImageId) -> Result<(), PdbError> {
        self.record(Procedure::SelectionInvert);
        raster::invert(&mut self.image_checked(image)?.selection.channel);
        Ok(())
    }

    fn drawable_edit_clear(&mut self, drawable: Drawable) -> Result<(), PdbError> {
        self.record(Procedure::DrawableEditClear);
        let image = self.owner_of(drawable.layer_id())?;
        let selection = selection_or_all(&image.selection);
        let (br, bg, bb) = image.colors.background.into_components();
        let target = layer_in(image, drawable.layer_id())?;

        match drawable {
            Drawable::Layer(_) if target.has_alpha => {
                for (x, y, pixel) in target.pixels.enumerate_pixels_mut() {
                    pixel[3] = raster::mix(pixel[3], 0, selection.coverage(x, y));
                }
            }
            Drawable::Layer(_) => {
                let background = Rgba([br, bg, bb, 255]);
                for (x, y, pixel) in target.pixels.enumerate_pixels_mut() {
                    *pixel = raster::mix_rgba(*pixel, background, selection.coverage(x, y));
                }
            }
            Drawable::Mask(id) => {
                let mask = target.mask.as_mut().ok_or(PdbError::NoMask(id))?;
                for (x, y, pixel) in mask.data.enumerate_pixels_mut() {
                    pixel[0] = raster::mix(pixel[0], 0, selection.coverage(x, y));
                }
            }
        }
        Ok(())
    }

    fn image_scale(
        &mut self,
        image: ImageId,
        new_width: u32,
        new_height: u32,
    ) -> Result<(), PdbError> {
        self.record(Procedure::ImageScale);
        if new_width == 0 || new_height == 0 {
            return Err(PdbError::InvalidSize {
                width: new_width,
                height: new_height,
            });
        }

        let target = self.image_checked(image)?;
        debug!(
            "scaling image {} from {} to {}x{}",
            image,
            target.size(),
            new_width,
            new_height
        );

        for layer in &mut target.layers {
            layer.pixels = raster::scale_rgba(&layer.pixels, new_width, new_height);
            if let Some(mask) = layer.mask.as_mut() {
                mask.data = raster::scale_gray(&mask.data, new_width, new_height);
            }
        }
        target.selection.channel =
            raster::scale_gray(&target.selection.channel, new_width, new_height);
        target.width = new_width;
        target.height = new_height;
        Ok(())
    }

    fn displays_flush(&mut self) {
        self.record(Procedure::DisplaysFlush);
        self.flushes += 1;
    }
}

/// The selection to restrict an edit to: the current one, or everything when
/// nothing is selected.
fn selection_or_all(selection: &Selection) -> Selection {
    if selection.is_empty() {
        Selection::all(selection.channel.width(), selection.channel.height())
    } else {
        selection.clone()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;
    use palette::Srgb;

    fn opaque_image(host: &mut MemoryHost, size: u32) -> (ImageId, LayerId) {
        host.open_image(
            RgbaImage::from_pixel(size, size, Rgba([200, 100, 50, 255])),
            false,
        )
    }

    #[test]
    fn open_image_assigns_handles() {
        let mut host = MemoryHost::new();
        let (a, la) = opaque_image(&mut host, 4);
        let (b, lb) = opaque_image(&mut host, 4);

        assert_ne!(a, b);
        assert_ne!(la, lb);
        assert!(host.image(a).unwrap().layer(la).is_some());
        assert!(host.image(b).unwrap().layer(la).is_none());
    }

    #[test]
    fn unknown_handles_are_errors() {
        let mut host = MemoryHost::new();
        assert_eq!(
            host.image_width(ImageId(9)),
            Err(PdbError::InvalidImage(ImageId(9)))
        );
        assert_eq!(
            host.layer_add_alpha(LayerId(9)),
            Err(PdbError::InvalidLayer(LayerId(9)))
        );
    }

    #[test]
    fn add_alpha_sets_flag() {
        let mut host = MemoryHost::new();
        let (img, layer) = opaque_image(&mut host, 4);

        host.layer_add_alpha(layer).unwrap();
        host.layer_add_alpha(layer).unwrap();

        let layer = host.image(img).unwrap().layer(layer).unwrap();
        assert!(layer.has_alpha);
        assert_eq!(layer.pixel(0, 0)[3], 255);
    }

    #[test]
    fn mask_types() {
        let mut host = MemoryHost::new();
        let (img, layer) = opaque_image(&mut host, 4);
        host.image_mut(img)
            .unwrap()
            .selection
            .channel
            .put_pixel(1, 1, Luma([255]));

        let white = host.layer_create_mask(layer, AddMaskType::White).unwrap();
        let black = host.layer_create_mask(layer, AddMaskType::Black).unwrap();
        let alpha = host.layer_create_mask(layer, AddMaskType::Alpha).unwrap();
        let sel = host.layer_create_mask(layer, AddMaskType::Selection).unwrap();

        assert!(white.data.pixels().all(|p| p[0] == 255));
        assert!(black.data.pixels().all(|p| p[0] == 0));
        assert!(alpha.data.pixels().all(|p| p[0] == 255));
        assert_eq!(sel.data.get_pixel(1, 1)[0], 255);
        assert_eq!(sel.data.get_pixel(0, 0)[0], 0);
    }

    #[test]
    fn second_mask_is_rejected() {
        let mut host = MemoryHost::new();
        let (_, layer) = opaque_image(&mut host, 4);

        let mask = host.layer_create_mask(layer, AddMaskType::White).unwrap();
        host.layer_add_mask(layer, mask.clone()).unwrap();
        assert_eq!(
            host.layer_add_mask(layer, mask),
            Err(PdbError::MaskExists(layer))
        );
    }

    #[test]
    fn mismatched_mask_is_rejected() {
        let mut host = MemoryHost::new();
        let (_, layer) = opaque_image(&mut host, 4);

        let result = host.layer_add_mask(layer, LayerMask::filled(3, 3, 255));
        assert!(matches!(result, Err(PdbError::MaskSize { .. })));
    }

    #[test]
    fn fill_mask_with_foreground_inside_selection() {
        let mut host = MemoryHost::new();
        let (img, layer) = opaque_image(&mut host, 4);
        host.image_mut(img)
            .unwrap()
            .selection
            .channel
            .put_pixel(2, 2, Luma([255]));

        let mask = host.layer_create_mask(layer, AddMaskType::White).unwrap();
        host.layer_add_mask(layer, mask).unwrap();
        host.drawable_edit_fill(Drawable::Mask(layer), FillType::Foreground)
            .unwrap();

        let mask = host
            .image(img)
            .unwrap()
            .layer(layer)
            .unwrap()
            .mask
            .clone()
            .unwrap();
        assert_eq!(mask.data.get_pixel(2, 2)[0], 0);
        assert_eq!(mask.data.get_pixel(0, 0)[0], 255);
    }

    #[test]
    fn fill_without_selection_covers_everything() {
        let mut host = MemoryHost::new();
        let (img, layer) = opaque_image(&mut host, 4);
        host.image_mut(img).unwrap().colors.foreground = Srgb::new(1, 2, 3);

        host.drawable_edit_fill(Drawable::Layer(layer), FillType::Foreground)
            .unwrap();

        let layer = host.image(img).unwrap().layer(layer).unwrap();
        assert!(layer.pixels.pixels().all(|p| p.0 == [1, 2, 3, 255]));
    }

    #[test]
    fn fill_mask_requires_mask() {
        let mut host = MemoryHost::new();
        let (_, layer) = opaque_image(&mut host, 4);
        assert_eq!(
            host.drawable_edit_fill(Drawable::Mask(layer), FillType::White),
            Err(PdbError::NoMask(layer))
        );
    }

    #[test]
    fn apply_mask_multiplies_alpha() {
        let mut host = MemoryHost::new();
        let (img, layer) = opaque_image(&mut host, 2);

        let mut mask = host.layer_create_mask(layer, AddMaskType::White).unwrap();
        mask.data.put_pixel(0, 0, Luma([0]));
        mask.data.put_pixel(1, 0, Luma([128]));
        host.layer_add_mask(layer, mask).unwrap();
        host.layer_remove_mask(layer, MaskApplyMode::Apply).unwrap();

        let layer = host.image(img).unwrap().layer(layer).unwrap();
        assert!(layer.has_alpha);
        assert!(layer.mask.is_none());
        assert_eq!(layer.pixel(0, 0)[3], 0);
        assert_eq!(layer.pixel(1, 0)[3], 128);
        assert_eq!(layer.pixel(0, 1)[3], 255);
    }

    #[test]
    fn discard_mask_leaves_pixels() {
        let mut host = MemoryHost::new();
        let (img, layer) = opaque_image(&mut host, 2);

        let mask = host.layer_create_mask(layer, AddMaskType::Black).unwrap();
        host.layer_add_mask(layer, mask).unwrap();
        host.layer_remove_mask(layer, MaskApplyMode::Discard).unwrap();

        let layer = host.image(img).unwrap().layer(layer).unwrap();
        assert!(!layer.has_alpha);
        assert_eq!(layer.pixel(0, 0)[3], 255);
        assert_eq!(
            host.history(),
            &[
                Procedure::LayerCreateMask,
                Procedure::LayerAddMask,
                Procedure::LayerRemoveMask
            ]
        );
    }

    #[test]
    fn select_invert_clear() {
        let mut host = MemoryHost::new();
        let (img, layer) = opaque_image(&mut host, 40);
        host.layer_add_alpha(layer).unwrap();

        host.image_select_round_rectangle(
            img,
            ChannelOps::Replace,
            RectPx::from_size(40, 40),
            10.0,
            10.0,
        )
        .unwrap();
        host.selection_invert(img).unwrap();
        host.drawable_edit_clear(Drawable::Layer(layer)).unwrap();

        let layer = host.image(img).unwrap().layer(layer).unwrap();
        assert_eq!(layer.pixel(0, 0)[3], 0);
        assert_eq!(layer.pixel(39, 0)[3], 0);
        assert_eq!(layer.pixel(20, 20)[3], 255);
        assert_eq!(&layer.pixel(20, 20).0[..3], &[200u8, 100, 50]);
    }

    #[test]
    fn clear_without_alpha_uses_background() {
        let mut host = MemoryHost::new();
        let (img, layer) = opaque_image(&mut host, 4);

        host.drawable_edit_clear(Drawable::Layer(layer)).unwrap();

        let layer = host.image(img).unwrap().layer(layer).unwrap();
        assert_eq!(layer.pixel(1, 1).0, [255, 255, 255, 255]);
    }

    #[test]
    fn empty_round_rectangle_is_rejected() {
        let mut host = MemoryHost::new();
        let (img, _) = opaque_image(&mut host, 4);
        let result =
            host.image_select_round_rectangle(img, ChannelOps::Replace, RectPx::default(), 1.0, 1.0);
        assert_eq!(result, Err(PdbError::InvalidSize { width: 0, height: 0 }));
    }

    #[test]
    fn scale_resizes_layers_and_selection() {
        let mut host = MemoryHost::new();
        let (img, layer) = opaque_image(&mut host, 32);

        host.image_scale(img, 16, 8).unwrap();

        let image = host.image(img).unwrap();
        assert_eq!((image.width, image.height), (16, 8));
        assert_eq!(image.selection.channel.dimensions(), (16, 8));
        assert_eq!(image.layer(layer).unwrap().pixels.dimensions(), (16, 8));
        assert_eq!(
            host.image_scale(img, 0, 8),
            Err(PdbError::InvalidSize { width: 0, height: 8 })
        );
    }

    #[test]
    fn undo_group_records_one_step() {
        let mut host = MemoryHost::new();
        let (img, layer) = opaque_image(&mut host, 8);
        let before = host.image(img).unwrap().clone();

        host.image_undo_group_start(img).unwrap();
        host.image_undo_group_start(img).unwrap();
        host.layer_add_alpha(layer).unwrap();
        host.image_undo_group_end(img).unwrap();
        host.image_scale(img, 4, 4).unwrap();
        host.image_undo_group_end(img).unwrap();

        assert_eq!(host.undo_steps(img), 1);
        assert!(host.undo(img).unwrap());
        assert_eq!(host.image(img).unwrap(), &before);
        assert!(!host.undo(img).unwrap());
    }

    #[test]
    fn unbalanced_undo_end_is_error() {
        let mut host = MemoryHost::new();
        let (img, _) = opaque_image(&mut host, 2);
        assert_eq!(
            host.image_undo_group_end(img),
            Err(PdbError::UndoGroupNotOpen(img))
        );
    }

    #[test]
    fn history_and_flush() {
        let mut host = MemoryHost::new();
        let (img, _) = opaque_image(&mut host, 2);

        host.selection_is_empty(img).unwrap();
        host.displays_flush();

        assert_eq!(
            host.history(),
            &[Procedure::SelectionIsEmpty, Procedure::DisplaysFlush]
        );
        assert_eq!(host.flush_count(), 1);
    }

    #[test]
    fn layer_larger_than_canvas_is_edited_only_on_canvas() {
        let mut host = MemoryHost::new();
        let (img, _) = opaque_image(&mut host, 4);
        let big = LayerId(500);
        host.image_mut(img).unwrap().push_layer(Layer::with_alpha(
            big,
            "oversized",
            RgbaImage::from_pixel(8, 8, Rgba([10, 20, 30, 255])),
        ));

        host.drawable_edit_fill(Drawable::Layer(big), FillType::White)
            .unwrap();
        let layer = host.image(img).unwrap().layer(big).unwrap();
        assert_eq!(layer.pixel(3, 3).0, [255, 255, 255, 255]);
        assert_eq!(layer.pixel(4, 4).0, [10, 20, 30, 255]);
        assert_eq!(layer.pixel(7, 0).0, [10, 20, 30, 255]);

        host.drawable_edit_clear(Drawable::Layer(big)).unwrap();
        let layer = host.image(img).unwrap().layer(big).unwrap();
        assert_eq!(layer.pixel(0, 0)[3], 0);
        assert_eq!(layer.pixel(7, 7)[3], 255);
    }
}
