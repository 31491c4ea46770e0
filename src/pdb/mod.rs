//! Typed procedure database.
//!
//! The host exposes its image operations as named procedures. Instead of
//! looking procedures up by string and setting properties on a generic config
//! object, each procedure the plug-in needs is a method on
//! [`ProcedureDatabase`] with typed arguments. [`Procedure`] keeps the stable
//! procedure names for logging and call history.

pub mod memory;

pub use memory::MemoryHost;

use std::fmt;

use thiserror::Error;

use crate::document::{ImageId, LayerId, LayerMask, RectPx, SizePx};

// ============================================================================
// Procedure Names
// ============================================================================

/// The procedures a plug-in can call on the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Procedure {
    ImageWidth,
    ImageUndoGroupStart,
    ImageUndoGroupEnd,
    LayerAddAlpha,
    LayerCreateMask,
    LayerAddMask,
    SelectionIsEmpty,
    DrawableEditFill,
    LayerRemoveMask,
    ImageSelectRoundRectangle,
    SelectionInvert,
    DrawableEditClear,
    ImageScale,
    DisplaysFlush,
}

impl Procedure {
    /// The name the procedure is registered under in the host.
    pub fn name(self) -> &'static str {
        match self {
            Self::ImageWidth => "gimp-image-get-width",
            Self::ImageUndoGroupStart => "gimp-image-undo-group-start",
            Self::ImageUndoGroupEnd => "gimp-image-undo-group-end",
            Self::LayerAddAlpha => "gimp-layer-add-alpha",
            Self::LayerCreateMask => "gimp-layer-create-mask",
            Self::LayerAddMask => "gimp-layer-add-mask",
            Self::SelectionIsEmpty => "gimp-selection-is-empty",
            Self::DrawableEditFill => "gimp-drawable-edit-fill",
            Self::LayerRemoveMask => "gimp-layer-remove-mask",
            Self::ImageSelectRoundRectangle => "gimp-image-select-round-rectangle",
            Self::SelectionInvert => "gimp-selection-invert",
            Self::DrawableEditClear => "gimp-drawable-edit-clear",
            Self::ImageScale => "gimp-image-scale",
            Self::DisplaysFlush => "gimp-displays-flush",
        }
    }
}

impl fmt::Display for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Argument Enums
// ============================================================================

/// Initial contents of a newly created layer mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddMaskType {
    /// Fully opaque.
    White,
    /// Fully transparent.
    Black,
    /// Copy of the layer's alpha channel.
    Alpha,
    /// Copy of the image selection.
    Selection,
}

/// What a fill operation paints with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillType {
    Foreground,
    Background,
    White,
    Transparent,
}

/// How a new selection shape combines with the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelOps {
    Add,
    Subtract,
    Replace,
    Intersect,
}

/// What happens to a layer mask when it is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MaskApplyMode {
    /// Multiply the mask into the layer's alpha.
    Apply = 0,
    /// Drop the mask without touching the layer.
    Discard = 1,
}

/// A drawable a fill or clear can target.
///
/// Masks are addressed through the layer that owns them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Drawable {
    Layer(LayerId),
    Mask(LayerId),
}

impl Drawable {
    pub fn layer_id(self) -> LayerId {
        match self {
            Self::Layer(id) | Self::Mask(id) => id,
        }
    }
}

// ============================================================================
// Status and Errors
// ============================================================================

/// Outcome of running a registered procedure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PdbStatus {
    Success,
    Cancel,
    CallingError(String),
    ExecutionError(String),
}

impl PdbStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// The error message, if the status carries one.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::CallingError(msg) | Self::ExecutionError(msg) => Some(msg),
            Self::Success | Self::Cancel => None,
        }
    }
}

/// Errors raised by host procedures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PdbError {
    #[error("image {0} does not exist")]
    InvalidImage(ImageId),

    #[error("layer {0} does not exist")]
    InvalidLayer(LayerId),

    #[error("layer {0} already has a mask")]
    MaskExists(LayerId),

    #[error("layer {0} has no mask")]
    NoMask(LayerId),

    #[error("mask size {mask} does not match layer size {layer}")]
    MaskSize { mask: SizePx, layer: SizePx },

    #[error("invalid size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    #[error("no undo group is open on image {0}")]
    UndoGroupNotOpen(ImageId),

    #[error("failed to rasterize selection shape")]
    Raster,
}

// ============================================================================
// ProcedureDatabase
// ============================================================================

/// The host operations available to plug-ins.
///
/// Every method corresponds to one [`Procedure`]. Implementations own all
/// pixel work; callers only sequence the calls.
pub trait ProcedureDatabase {
    /// Returns the width of the image in pixels.
    fn image_width(&mut self, image: ImageId) -> Result<u32, PdbError>;

    /// Opens an undo group. Groups nest; only the outermost pair records a step.
    fn image_undo_group_start(&mut self, image: ImageId) -> Result<(), PdbError>;

    /// Closes the innermost open undo group.
    fn image_undo_group_end(&mut self, image: ImageId) -> Result<(), PdbError>;

    /// Adds an alpha channel to the layer. No-op if it already has one.
    fn layer_add_alpha(&mut self, layer: LayerId) -> Result<(), PdbError>;

    /// Creates a mask sized to the layer. The mask is not attached yet.
    fn layer_create_mask(
        &mut self,
        layer: LayerId,
        mask_type: AddMaskType,
    ) -> Result<LayerMask, PdbError>;

    /// Attaches a mask created by [`layer_create_mask`](Self::layer_create_mask).
    fn layer_add_mask(&mut self, layer: LayerId, mask: LayerMask) -> Result<(), PdbError>;

    /// Returns true if nothing is selected in the image.
    fn selection_is_empty(&mut self, image: ImageId) -> Result<bool, PdbError>;

    /// Fills the drawable, restricted to the selection when there is one.
    fn drawable_edit_fill(&mut self, drawable: Drawable, fill: FillType) -> Result<(), PdbError>;

    /// Removes the layer's mask, applying or discarding it.
    fn layer_remove_mask(&mut self, layer: LayerId, mode: MaskApplyMode) -> Result<(), PdbError>;

    /// Combines a rounded rectangle with the current selection.
    fn image_select_round_rectangle(
        &mut self,
        image: ImageId,
        operation: ChannelOps,
        rect: RectPx,
        corner_radius_x: f64,
        corner_radius_y: f64,
    ) -> Result<(), PdbError>;

    /// Inverts the selection.
    fn selection_invert(&mut self, image: ImageId) -> Result<(), PdbError>;

    /// Erases the drawable within the selection, or everywhere if there is none.
    fn drawable_edit_clear(&mut self, drawable: Drawable) -> Result<(), PdbError>;

    /// Scales the image and everything in it to the new size.
    fn image_scale(&mut self, image: ImageId, new_width: u32, new_height: u32)
    -> Result<(), PdbError>;

    /// Asks the host to redraw its displays.
    fn displays_flush(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn procedure_names_are_host_names() {
        assert_eq!(Procedure::LayerAddAlpha.name(), "gimp-layer-add-alpha");
        assert_eq!(
            Procedure::ImageSelectRoundRectangle.to_string(),
            "gimp-image-select-round-rectangle"
        );
    }

    #[test]
    fn mask_apply_mode_values() {
        assert_eq!(MaskApplyMode::Apply as u8, 0);
        assert_eq!(MaskApplyMode::Discard as u8, 1);
    }

    #[test]
    fn status_message() {
        assert_eq!(PdbStatus::Success.message(), None);
        assert_eq!(
            PdbStatus::CallingError("bad".into()).message(),
            Some("bad")
        );
        assert!(!PdbStatus::Cancel.is_success());
    }
}
