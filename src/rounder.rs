//! The rounded icon procedure.
//!
//! Turns a square image into an icon: the first drawable gets an alpha
//! channel, everything outside a rounded rectangle is cleared, and the image
//! is scaled to the requested size. All pixel work happens in the host; this
//! module only decides what to call and with which arguments.

use log::{debug, info, warn};

use crate::config::RoundedIconConfig;
use crate::document::{ImageId, LayerId, RectPx};
use crate::pdb::{
    AddMaskType, ChannelOps, Drawable, FillType, MaskApplyMode, PdbError, PdbStatus,
    ProcedureDatabase,
};
use crate::plugin::{ImageProcedure, Invocation, RunMode};

/// Message returned when the procedure is called without a drawable.
pub const NO_DRAWABLE_MESSAGE: &str = "Needs at least one drawable (layer)";

/// Rounds the corners of `layer` and scales `image` to an icon.
///
/// The corner radius is derived from the width before scaling. All steps run
/// inside one undo group, which is closed even when a step fails so that the
/// partial result can be undone in one go. Host errors are returned as-is.
pub fn round_icon<P>(
    pdb: &mut P,
    image: ImageId,
    layer: LayerId,
    config: &RoundedIconConfig,
) -> Result<(), PdbError>
where
    P: ProcedureDatabase + ?Sized,
{
    let width = pdb.image_width(image)?;
    let radius = config.corner_radius(width);
    debug!(
        "rounding image {}: width {}, ratio {}, radius {}, icon size {}",
        image, width, config.corner_ratio, radius, config.icon_size
    );

    pdb.image_undo_group_start(image)?;
    let applied = apply(pdb, image, layer, width, radius, config.icon_size);
    let closed = pdb.image_undo_group_end(image);
    applied?;
    closed?;

    pdb.displays_flush();
    Ok(())
}

fn apply<P>(
    pdb: &mut P,
    image: ImageId,
    layer: LayerId,
    width: u32,
    radius: u32,
    icon_size: u32,
) -> Result<(), PdbError>
where
    P: ProcedureDatabase + ?Sized,
{
    debug!("adding alpha and applying selection mask to layer {}", layer);
    pdb.layer_add_alpha(layer)?;

    // Bake any existing selection into the layer alpha.
    let mask = pdb.layer_create_mask(layer, AddMaskType::White)?;
    pdb.layer_add_mask(layer, mask)?;
    if !pdb.selection_is_empty(image)? {
        pdb.drawable_edit_fill(Drawable::Mask(layer), FillType::Foreground)?;
    }
    pdb.layer_remove_mask(layer, MaskApplyMode::Apply)?;

    debug!("clearing outside a {}px rounded square, radius {}", width, radius);
    pdb.image_select_round_rectangle(
        image,
        ChannelOps::Replace,
        RectPx::from_size(width, width),
        radius as f64,
        radius as f64,
    )?;
    pdb.selection_invert(image)?;
    pdb.drawable_edit_clear(Drawable::Layer(layer))?;

    debug!("scaling to {}x{}", icon_size, icon_size);
    pdb.image_scale(image, icon_size, icon_size)
}

/// Run function registered for `python-fu-rounded-icon`.
///
/// Interactive runs show the dialog first; cancelling it returns
/// [`PdbStatus::Cancel`] without touching the image.
pub fn run(procedure: &ImageProcedure, inv: Invocation<'_>) -> PdbStatus {
    let Some(&layer) = inv.drawables.first() else {
        warn!("{} called without a drawable", procedure.name());
        return PdbStatus::CallingError(NO_DRAWABLE_MESSAGE.to_string());
    };

    if inv.run_mode == RunMode::Interactive && !inv.dialog.run(procedure, inv.config) {
        info!("{} cancelled", procedure.name());
        return PdbStatus::Cancel;
    }

    let config = match RoundedIconConfig::from_procedure_config(inv.config) {
        Ok(config) => config,
        Err(err) => return PdbStatus::CallingError(err.to_string()),
    };

    match round_icon(inv.pdb, inv.image, layer, &config) {
        Ok(()) => PdbStatus::Success,
        Err(err) => {
            warn!("{} failed: {}", procedure.name(), err);
            PdbStatus::ExecutionError(err.to_string())
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
