//! rounded-iconify: rounded-corner icon plug-in for an image editor host
//!
//! The plug-in registers one procedure, `python-fu-rounded-icon`, which turns
//! a square image into an icon: it adds an alpha channel to the first
//! drawable, clears everything outside a rounded rectangle and scales the
//! image down to the requested size. The corner radius is
//! `max(1, width / corner_ratio)`.
//!
//! Every pixel operation is delegated to the host through the typed
//! [`ProcedureDatabase`] trait. [`MemoryHost`] is an in-memory implementation
//! of that trait for tools, tests and the optional CLI.
//!
//! # Example
//!
//! ```
//! use image::{Rgba, RgbaImage};
//! use rounded_iconify::{round_icon, MemoryHost, RoundedIconConfig};
//!
//! let mut host = MemoryHost::new();
//! let square = RgbaImage::from_pixel(200, 200, Rgba([255, 128, 0, 255]));
//! let (image, layer) = host.open_image(square, false);
//!
//! round_icon(&mut host, image, layer, &RoundedIconConfig::new(4, 64)).unwrap();
//!
//! let icon = host.image(image).unwrap();
//! assert_eq!((icon.width, icon.height), (64, 64));
//! assert_eq!(icon.layers[0].pixel(0, 0)[3], 0);
//! ```

mod config;
mod document;
mod logging;
mod pdb;
mod plugin;
mod raster;
mod rounder;

pub use config::{
    corner_radius, ConfigError, IntArgument, ProcedureConfig, RoundedIconConfig, ARGUMENTS,
    CORNER_RATIO, ICON_SIZE,
};
pub use document::{
    ColorContext, Image, ImageId, Layer, LayerId, LayerMask, RectPx, Selection, SizePx,
};
pub use logging::{init_logging, LoggingConfig};
pub use pdb::{
    AddMaskType, ChannelOps, Drawable, FillType, MaskApplyMode, MemoryHost, PdbError, PdbStatus,
    Procedure, ProcedureDatabase,
};
pub use plugin::{
    Attribution, ConfigDialog, Documentation, ImageProcedure, Invocation, PlugIn, ProcType,
    Registry, RoundedIcon, RunFn, RunMode, SensitivityMask, Unattended, PROCEDURE_NAME,
};
pub use rounder::{round_icon, NO_DRAWABLE_MESSAGE};
