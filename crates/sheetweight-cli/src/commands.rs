//! Command handlers

use crate::cli::{Cli, Commands};
use crate::output::{output_materials, output_report};
use sheetweight_app::app::{build_estimator, ImageRequest, RegularRequest, WeightService};
use sheetweight_app::config::Config;
use sheetweight_app::constants::density_table;
use sheetweight_domain::{Length, LengthUnit, MassUnit, Material, Shape};
use sheetweight_types::{OutputFormat, Result};
use sheetweight_vision::{BoxPolicy, Polarity, ReferencePolicy};
use std::path::PathBuf;
use tracing::debug;

/// Per-invocation settings resolved from config and global flags
struct Context {
    config: Config,
    material: Material,
    unit: LengthUnit,
    output_format: OutputFormat,
}

impl Context {
    fn service(&self) -> Result<WeightService> {
        Ok(WeightService::new(density_table()?, self.config.mass_unit))
    }
}

/// Execute CLI command
pub fn execute(cli: Cli) -> Result<()> {
    let Cli {
        command,
        material,
        unit,
        mass_unit,
        format,
        ..
    } = cli;

    // Deferred so `config --reset` still works when the stored file is broken
    let load_context = || -> Result<Context> {
        let mut config = Config::load()?;

        // Override from CLI args
        if let Some(mass_unit) = mass_unit {
            config.mass_unit = mass_unit;
        }

        Ok(Context {
            material: material.unwrap_or(config.material),
            unit: unit.unwrap_or(config.unit),
            output_format: format.unwrap_or(config.output_format),
            config,
        })
    };

    match command {
        Commands::Rectangle {
            length,
            width,
            thickness,
        } => cmd_regular(&load_context()?, Shape::Rectangle { length, width }, thickness),

        Commands::Square { side, thickness } => {
            cmd_regular(&load_context()?, Shape::Square { side }, thickness)
        }

        Commands::Circle { radius, thickness } => {
            cmd_regular(&load_context()?, Shape::Circle { radius }, thickness)
        }

        Commands::Image {
            image,
            thickness,
            reference_width,
            scale,
            policy,
            threshold,
            polarity,
            detector,
        } => {
            let mut ctx = load_context()?;
            if let Some(threshold) = threshold {
                ctx.config.threshold = threshold;
            }
            if let Some(polarity) = polarity {
                ctx.config.polarity = polarity;
            }
            if detector.is_some() {
                ctx.config.detector_command = detector;
            }
            // An explicit scale means the user wants fixed-scale unless told otherwise
            let policy = match (policy, scale) {
                (Some(policy), _) => policy,
                (None, Some(_)) => ReferencePolicy::FixedScale,
                (None, None) => ctx.config.reference_policy,
            };
            cmd_image(&ctx, image, thickness, reference_width, scale, policy)
        }

        Commands::Materials => cmd_materials(&load_context()?),

        Commands::Config {
            show,
            set_material,
            set_unit,
            set_mass_unit,
            set_output,
            set_threshold,
            set_polarity,
            set_policy,
            set_scale,
            set_detector_cmd,
            set_detector_min_conf,
            set_reference_label,
            set_box_policy,
            reset,
        } => cmd_config(ConfigUpdate {
            show,
            set_material,
            set_unit,
            set_mass_unit,
            set_output,
            set_threshold,
            set_polarity,
            set_policy,
            set_scale,
            set_detector_cmd,
            set_detector_min_conf,
            set_reference_label,
            set_box_policy,
            reset,
        }),
    }
}

fn cmd_regular(ctx: &Context, shape: Shape, thickness: f64) -> Result<()> {
    let request = RegularRequest {
        material: ctx.material,
        thickness: Length::new(thickness, ctx.unit),
        shape,
        unit: ctx.unit,
    };

    let report = ctx.service()?.compute_regular(&request)?;
    output_report(ctx.output_format, &report)
}

fn cmd_image(
    ctx: &Context,
    image: PathBuf,
    thickness: f64,
    reference_width: Option<f64>,
    scale: Option<f64>,
    policy: ReferencePolicy,
) -> Result<()> {
    debug!(image = %image.display(), policy = %policy, "image command");

    let request = ImageRequest {
        material: ctx.material,
        thickness: Length::new(thickness, ctx.unit),
        image,
        policy,
        reference_width: reference_width.map(|w| Length::new(w, ctx.unit)),
        scale_cm_per_px: Some(scale.unwrap_or(ctx.config.fixed_scale_cm_per_px)),
    };

    let estimator = build_estimator(&ctx.config, policy)?;
    let report = ctx.service()?.compute_image(&request, estimator.as_ref())?;
    output_report(ctx.output_format, &report)
}

fn cmd_materials(ctx: &Context) -> Result<()> {
    let specs = ctx.service()?.material_specs();
    output_materials(ctx.output_format, &specs)
}

struct ConfigUpdate {
    show: bool,
    set_material: Option<Material>,
    set_unit: Option<LengthUnit>,
    set_mass_unit: Option<MassUnit>,
    set_output: Option<OutputFormat>,
    set_threshold: Option<u8>,
    set_polarity: Option<Polarity>,
    set_policy: Option<ReferencePolicy>,
    set_scale: Option<f64>,
    set_detector_cmd: Option<String>,
    set_detector_min_conf: Option<f64>,
    set_reference_label: Option<String>,
    set_box_policy: Option<BoxPolicy>,
    reset: bool,
}

fn cmd_config(update: ConfigUpdate) -> Result<()> {
    if update.reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        return Ok(());
    }

    let mut config = Config::load()?;
    let mut modified = false;

    if let Some(material) = update.set_material {
        config.material = material;
        modified = true;
    }
    if let Some(unit) = update.set_unit {
        config.unit = unit;
        modified = true;
    }
    if let Some(mass_unit) = update.set_mass_unit {
        config.mass_unit = mass_unit;
        modified = true;
    }
    if let Some(output) = update.set_output {
        config.output_format = output;
        modified = true;
    }
    if let Some(threshold) = update.set_threshold {
        config.threshold = threshold;
        modified = true;
    }
    if let Some(polarity) = update.set_polarity {
        config.polarity = polarity;
        modified = true;
    }
    if let Some(policy) = update.set_policy {
        config.reference_policy = policy;
        modified = true;
    }
    if let Some(scale) = update.set_scale {
        config.fixed_scale_cm_per_px = scale;
        modified = true;
    }
    if let Some(cmd) = update.set_detector_cmd {
        config.detector_command = if cmd.trim().is_empty() { None } else { Some(cmd) };
        modified = true;
    }
    if let Some(min_conf) = update.set_detector_min_conf {
        config.detector_min_conf = min_conf;
        modified = true;
    }
    if let Some(label) = update.set_reference_label {
        config.reference_label = label;
        modified = true;
    }
    if let Some(box_policy) = update.set_box_policy {
        config.box_policy = box_policy;
        modified = true;
    }

    if modified {
        config.save()?;
        println!("Configuration updated");
    }

    if update.show || !modified {
        println!("{}", config);
    }

    Ok(())
}
