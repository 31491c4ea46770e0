//! Standalone host for the rounded icon procedure.
//!
//! Loads an image, runs `python-fu-rounded-icon` on it through an in-memory
//! host and writes the result.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info, warn};
use thiserror::Error;

use rounded_iconify::{
    init_logging, ConfigDialog, ConfigError, ImageProcedure, Invocation, LoggingConfig,
    MemoryHost, PdbStatus, ProcedureConfig, Registry, RoundedIcon, RoundedIconConfig, RunMode,
    SizePx, Unattended, PROCEDURE_NAME,
};

#[derive(Debug, Parser)]
#[command(name = "rounded-iconify", about = "Make a rounded-corner square icon")]
struct Cli {
    /// Image to round (any format the `image` crate can decode).
    input: PathBuf,

    /// Where to write the icon. The format follows the extension.
    #[arg(short, long)]
    output: PathBuf,

    /// Corner radius as divisor of width (1-50).
    #[arg(long)]
    corner_ratio: Option<u32>,

    /// Final square icon size in pixels (16-2048).
    #[arg(long)]
    icon_size: Option<u32>,

    /// JSON file with `corner-ratio` and `icon-size`. Flags take precedence.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Ask for the values on the terminal before running.
    #[arg(short, long)]
    interactive: bool,

    /// Log filter, e.g. `debug` or `rounded_iconify=trace`.
    #[arg(long)]
    log: Option<String>,
}

#[derive(Debug, Error)]
enum HostError {
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Procedure(String),
}

/// Prompts for each argument on stdin, then asks for confirmation.
struct TerminalDialog;

impl TerminalDialog {
    fn prompt(&self, question: &str) -> io::Result<String> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "{question}")?;
        stdout.flush()?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line.trim().to_string())
    }

    fn ask(&self, procedure: &ImageProcedure, config: &mut ProcedureConfig) -> io::Result<bool> {
        if let Some(label) = procedure.menu_label() {
            println!("{label}");
        }

        for arg in procedure.arguments() {
            let current = config.get_property(arg.name).unwrap_or(arg.default);
            loop {
                let answer = self.prompt(&format!(
                    "{} [{}..{}] ({current}): ",
                    arg.nick, arg.min, arg.max
                ))?;
                if answer.is_empty() {
                    break;
                }
                match answer.parse::<i64>() {
                    Ok(value) => match config.set_property(arg.name, value) {
                        Ok(()) => break,
                        Err(err) => println!("{err}"),
                    },
                    Err(_) => println!("not a number: {answer}"),
                }
            }
        }

        let confirm = self.prompt("Apply? [Y/n] ")?;
        Ok(!confirm.eq_ignore_ascii_case("n"))
    }
}

impl ConfigDialog for TerminalDialog {
    fn run(&mut self, procedure: &ImageProcedure, config: &mut ProcedureConfig) -> bool {
        match self.ask(procedure, config) {
            Ok(confirmed) => confirmed,
            Err(err) => {
                error!("dialog failed: {err}");
                false
            }
        }
    }
}

/// Merges the JSON file and flags into one config.
fn load_settings(cli: &Cli) -> Result<RoundedIconConfig, HostError> {
    let mut settings = match &cli.config {
        Some(path) => RoundedIconConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => RoundedIconConfig::default(),
    };
    if let Some(ratio) = cli.corner_ratio {
        settings.corner_ratio = ratio;
    }
    if let Some(size) = cli.icon_size {
        settings.icon_size = size;
    }
    settings.validate()?;
    Ok(settings)
}

fn run(cli: &Cli) -> Result<PdbStatus, HostError> {
    let registry = Registry::load(&RoundedIcon);
    let procedure = registry
        .procedure(PROCEDURE_NAME)
        .ok_or_else(|| HostError::Procedure(format!("{PROCEDURE_NAME} is not registered")))?;

    let mut config = procedure.create_config();
    load_settings(cli)?.apply_to(&mut config)?;

    let pixels = image::open(&cli.input)?.to_rgba8();
    let size = SizePx::new(pixels.width(), pixels.height());
    info!("loaded {} ({size})", cli.input.display());
    if !size.is_square() {
        warn!("{size} is not square; the corners follow the width and the icon will be stretched");
    }

    let mut host = MemoryHost::new();
    let (image, layer) = host.open_image(pixels, true);

    let (run_mode, mut dialog): (RunMode, Box<dyn ConfigDialog>) = if cli.interactive {
        (RunMode::Interactive, Box::new(TerminalDialog))
    } else {
        (RunMode::NonInteractive, Box::new(Unattended))
    };

    let status = registry.run(
        PROCEDURE_NAME,
        Invocation {
            run_mode,
            pdb: &mut host,
            image,
            drawables: &[layer],
            config: &mut config,
            dialog: dialog.as_mut(),
        },
    );

    if status.is_success() {
        let icon = host
            .image(image)
            .and_then(|img| img.layer(layer))
            .ok_or_else(|| HostError::Procedure("layer vanished".to_string()))?;
        icon.pixels.save(&cli.output)?;
        info!("wrote {}", cli.output.display());
    }
    Ok(status)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(match &cli.log {
        Some(filter) => LoggingConfig::with_filter(filter.as_str()),
        None => LoggingConfig::default(),
    });

    match run(&cli) {
        Ok(PdbStatus::Success) => ExitCode::SUCCESS,
        Ok(PdbStatus::Cancel) => {
            info!("cancelled");
            ExitCode::from(1)
        }
        Ok(status) => {
            error!("{}", status.message().unwrap_or("procedure failed"));
            ExitCode::from(2)
        }
        Err(err) => {
            error!("{err}");
            ExitCode::from(2)
        }
    }
}
