//! Plug-in registration.
//!
//! A [`PlugIn`] names the procedures it provides and builds an
//! [`ImageProcedure`] for each: menu placement, documentation, argument
//! schema and the function to run. The host builds a [`Registry`] from a
//! plug-in once at startup and dispatches runs by procedure name.
//!
//! # Example
//!
//! ```
//! use image::{Rgba, RgbaImage};
//! use rounded_iconify::{
//!     Invocation, MemoryHost, PdbStatus, Registry, RoundedIcon, RunMode, Unattended,
//!     PROCEDURE_NAME,
//! };
//!
//! let registry = Registry::load(&RoundedIcon);
//! let mut host = MemoryHost::new();
//! let (image, layer) = host.open_image(RgbaImage::from_pixel(96, 96, Rgba([0, 0, 0, 255])), false);
//!
//! let mut config = registry.procedure(PROCEDURE_NAME).unwrap().create_config();
//! config.set_property("icon-size", 48).unwrap();
//!
//! let status = registry.run(
//!     PROCEDURE_NAME,
//!     Invocation {
//!         run_mode: RunMode::NonInteractive,
//!         pdb: &mut host,
//!         image,
//!         drawables: &[layer],
//!         config: &mut config,
//!         dialog: &mut Unattended,
//!     },
//! );
//! assert_eq!(status, PdbStatus::Success);
//! ```

use log::{debug, info};

use crate::config::{IntArgument, ProcedureConfig, ARGUMENTS};
use crate::document::{ImageId, LayerId};
use crate::pdb::{PdbStatus, ProcedureDatabase};
use crate::rounder;

/// Name the rounded icon procedure is registered under.
pub const PROCEDURE_NAME: &str = "python-fu-rounded-icon";

// ============================================================================
// Run Inputs
// ============================================================================

/// How a procedure was invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Started by the user; a dialog may be shown.
    Interactive,
    /// Started by a script or another plug-in with all arguments supplied.
    NonInteractive,
}

/// Asks the user to confirm or edit a procedure's arguments.
pub trait ConfigDialog {
    /// Shows the dialog. Returns false if the user cancelled.
    fn run(&mut self, procedure: &ImageProcedure, config: &mut ProcedureConfig) -> bool;
}

impl<F> ConfigDialog for F
where
    F: FnMut(&ImageProcedure, &mut ProcedureConfig) -> bool,
{
    fn run(&mut self, procedure: &ImageProcedure, config: &mut ProcedureConfig) -> bool {
        self(procedure, config)
    }
}

/// A dialog that confirms the current values without asking.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unattended;

impl ConfigDialog for Unattended {
    fn run(&mut self, _procedure: &ImageProcedure, _config: &mut ProcedureConfig) -> bool {
        true
    }
}

/// Everything a run function receives.
pub struct Invocation<'a> {
    pub run_mode: RunMode,
    pub pdb: &'a mut dyn ProcedureDatabase,
    pub image: ImageId,
    /// The selected drawables. Only the first is used.
    pub drawables: &'a [LayerId],
    pub config: &'a mut ProcedureConfig,
    pub dialog: &'a mut dyn ConfigDialog,
}

/// Signature of a procedure's run function.
pub type RunFn = fn(&ImageProcedure, Invocation<'_>) -> PdbStatus;

// ============================================================================
// ImageProcedure
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcType {
    Plugin,
}

/// When the procedure's menu entry is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensitivityMask {
    /// Exactly one drawable is selected.
    Drawable,
    /// One or more drawables are selected.
    Drawables,
    /// Always enabled.
    Always,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribution {
    pub authors: String,
    pub copyright: String,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Documentation {
    pub blurb: String,
    pub help: String,
}

/// A procedure definition as registered with the host.
#[derive(Debug, Clone)]
pub struct ImageProcedure {
    name: String,
    proc_type: ProcType,
    image_types: String,
    sensitivity: SensitivityMask,
    menu_label: Option<String>,
    menu_paths: Vec<String>,
    attribution: Option<Attribution>,
    documentation: Option<Documentation>,
    arguments: Vec<IntArgument>,
    run: RunFn,
}

impl ImageProcedure {
    pub fn new(name: impl Into<String>, proc_type: ProcType, run: RunFn) -> Self {
        Self {
            name: name.into(),
            proc_type,
            image_types: String::new(),
            sensitivity: SensitivityMask::Always,
            menu_label: None,
            menu_paths: Vec::new(),
            attribution: None,
            documentation: None,
            arguments: Vec::new(),
            run,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn proc_type(&self) -> ProcType {
        self.proc_type
    }

    pub fn image_types(&self) -> &str {
        &self.image_types
    }

    pub fn sensitivity(&self) -> SensitivityMask {
        self.sensitivity
    }

    pub fn menu_label(&self) -> Option<&str> {
        self.menu_label.as_deref()
    }

    pub fn menu_paths(&self) -> &[String] {
        &self.menu_paths
    }

    pub fn attribution(&self) -> Option<&Attribution> {
        self.attribution.as_ref()
    }

    pub fn documentation(&self) -> Option<&Documentation> {
        self.documentation.as_ref()
    }

    pub fn arguments(&self) -> &[IntArgument] {
        &self.arguments
    }

    pub fn set_image_types(&mut self, types: impl Into<String>) {
        self.image_types = types.into();
    }

    pub fn set_sensitivity_mask(&mut self, mask: SensitivityMask) {
        self.sensitivity = mask;
    }

    pub fn set_menu_label(&mut self, label: impl Into<String>) {
        self.menu_label = Some(label.into());
    }

    pub fn add_menu_path(&mut self, path: impl Into<String>) {
        self.menu_paths.push(path.into());
    }

    pub fn set_attribution(
        &mut self,
        authors: impl Into<String>,
        copyright: impl Into<String>,
        date: impl Into<String>,
    ) {
        self.attribution = Some(Attribution {
            authors: authors.into(),
            copyright: copyright.into(),
            date: date.into(),
        });
    }

    pub fn set_documentation(&mut self, blurb: impl Into<String>, help: impl Into<String>) {
        self.documentation = Some(Documentation {
            blurb: blurb.into(),
            help: help.into(),
        });
    }

    pub fn add_int_argument(&mut self, argument: IntArgument) {
        self.arguments.push(argument);
    }

    /// Creates a config holding the default of every argument.
    pub fn create_config(&self) -> ProcedureConfig {
        ProcedureConfig::new(&self.arguments)
    }

    /// Runs the procedure.
    pub fn run(&self, invocation: Invocation<'_>) -> PdbStatus {
        debug!("running {} ({:?})", self.name, invocation.run_mode);
        (self.run)(self, invocation)
    }
}

// ============================================================================
// PlugIn
// ============================================================================

/// A plug-in that provides procedures to the host.
pub trait PlugIn {
    /// Names of the procedures this plug-in provides.
    fn query_procedures(&self) -> Vec<&'static str>;

    /// Builds the definition for one of the names from
    /// [`query_procedures`](Self::query_procedures).
    fn create_procedure(&self, name: &str) -> Option<ImageProcedure>;
}

/// The rounded icon plug-in.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoundedIcon;

impl PlugIn for RoundedIcon {
    fn query_procedures(&self) -> Vec<&'static str> {
        vec![PROCEDURE_NAME]
    }

    fn create_procedure(&self, name: &str) -> Option<ImageProcedure> {
        if name != PROCEDURE_NAME {
            return None;
        }

        let mut procedure = ImageProcedure::new(name, ProcType::Plugin, rounder::run);
        procedure.set_image_types("*");
        procedure.set_sensitivity_mask(SensitivityMask::Drawable);
        procedure.set_menu_label("Rounded Iconify");
        procedure.add_menu_path("<Image>/Python-Fu");
        procedure.set_attribution("Aki Kareha", "Kareha Lab", "2025");
        procedure.set_documentation(
            "Make a rounded-corner square icon",
            "Adds alpha, applies mask, rounds corners, clears outside and scales to icon size.",
        );
        for argument in ARGUMENTS {
            procedure.add_int_argument(argument);
        }
        Some(procedure)
    }
}

// ============================================================================
// Registry
// ============================================================================

/// The procedures registered by a plug-in, looked up by name.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    procedures: Vec<ImageProcedure>,
}

impl Registry {
    /// Queries a plug-in and registers every procedure it creates.
    pub fn load(plugin: &dyn PlugIn) -> Self {
        let procedures: Vec<_> = plugin
            .query_procedures()
            .into_iter()
            .filter_map(|name| plugin.create_procedure(name))
            .collect();

        for procedure in &procedures {
            info!(
                "registered {} at {:?}",
                procedure.name(),
                procedure.menu_paths()
            );
        }
        Self { procedures }
    }

    pub fn procedure(&self, name: &str) -> Option<&ImageProcedure> {
        self.procedures.iter().find(|p| p.name() == name)
    }

    pub fn procedures(&self) -> &[ImageProcedure] {
        &self.procedures
    }

    /// Menu entries as `(path, label)` pairs.
    pub fn menu_entries(&self) -> Vec<(String, String)> {
        self.procedures
            .iter()
            .filter_map(|p| p.menu_label().map(|label| (p, label)))
            .flat_map(|(p, label)| {
                p.menu_paths()
                    .iter()
                    .map(move |path| (path.clone(), label.to_string()))
            })
            .collect()
    }

    /// Runs a registered procedure by name.
    pub fn run(&self, name: &str, invocation: Invocation<'_>) -> PdbStatus {
        match self.procedure(name) {
            Some(procedure) => procedure.run(invocation),
            None => PdbStatus::CallingError(format!("Procedure {name} not found")),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdb::MemoryHost;
    use image::RgbaImage;

    #[test]
    fn rounded_icon_definition() {
        let procedure = RoundedIcon.create_procedure(PROCEDURE_NAME).unwrap();

        assert_eq!(procedure.name(), "python-fu-rounded-icon");
        assert_eq!(procedure.proc_type(), ProcType::Plugin);
        assert_eq!(procedure.image_types(), "*");
        assert_eq!(procedure.sensitivity(), SensitivityMask::Drawable);
        assert_eq!(procedure.menu_label(), Some("Rounded Iconify"));
        assert_eq!(procedure.menu_paths(), &["<Image>/Python-Fu".to_string()]);
        assert_eq!(procedure.attribution().unwrap().date, "2025");
        assert_eq!(
            procedure.documentation().unwrap().blurb,
            "Make a rounded-corner square icon"
        );
    }

    #[test]
    fn argument_schema() {
        let procedure = RoundedIcon.create_procedure(PROCEDURE_NAME).unwrap();
        let args = procedure.arguments();

        assert_eq!(args.len(), 2);
        assert_eq!(
            (args[0].name, args[0].min, args[0].max, args[0].default),
            ("corner-ratio", 1, 50, 6)
        );
        assert_eq!(
            (args[1].name, args[1].min, args[1].max, args[1].default),
            ("icon-size", 16, 2048, 128)
        );
    }

    #[test]
    fn unknown_procedure_name() {
        assert!(RoundedIcon.create_procedure("python-fu-other").is_none());
    }

    #[test]
    fn registry_loads_plugin() {
        let registry = Registry::load(&RoundedIcon);

        assert_eq!(registry.procedures().len(), 1);
        assert!(registry.procedure(PROCEDURE_NAME).is_some());
        assert_eq!(
            registry.menu_entries(),
            vec![(
                "<Image>/Python-Fu".to_string(),
                "Rounded Iconify".to_string()
            )]
        );
    }

    #[test]
    fn registry_rejects_unknown_name() {
        let registry = Registry::load(&RoundedIcon);
        let mut host = MemoryHost::new();
        let (image, layer) = host.open_image(RgbaImage::new(16, 16), false);
        let mut config = ProcedureConfig::new(&ARGUMENTS);

        let status = registry.run(
            "gimp-nothing",
            Invocation {
                run_mode: RunMode::NonInteractive,
                pdb: &mut host,
                image,
                drawables: &[layer],
                config: &mut config,
                dialog: &mut Unattended,
            },
        );

        assert_eq!(
            status,
            PdbStatus::CallingError("Procedure gimp-nothing not found".to_string())
        );
        assert!(host.history().is_empty());
    }

    #[test]
    fn closure_dialog() {
        let procedure = RoundedIcon.create_procedure(PROCEDURE_NAME).unwrap();
        let mut config = procedure.create_config();
        let mut dialog = |p: &ImageProcedure, c: &mut ProcedureConfig| {
            c.set_property("corner-ratio", 3).is_ok() && p.name() == PROCEDURE_NAME
        };

        assert!(ConfigDialog::run(&mut dialog, &procedure, &mut config));
        assert_eq!(config.get_property("corner-ratio"), Some(3));
        assert!(Unattended.run(&procedure, &mut config));
    }
}
