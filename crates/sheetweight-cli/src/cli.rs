//! CLI definition using clap

use clap::{Parser, Subcommand};
use sheetweight_domain::{LengthUnit, MassUnit, Material};
use sheetweight_types::OutputFormat;
use sheetweight_vision::{BoxPolicy, Polarity, ReferencePolicy};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sheetweight")]
#[command(author = "yuuji")]
#[command(version)]
#[command(about = "Weight estimation for flat mild/stainless steel sheets")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Sheet material (ms, ss). Uses config value if not specified.
    #[arg(long, short = 'm', global = true, ignore_case = true)]
    pub material: Option<Material>,

    /// Unit for thickness, dimensions and reference width (mm, cm, in)
    #[arg(long, short = 'u', global = true, ignore_case = true)]
    pub unit: Option<LengthUnit>,

    /// Unit for the reported weight (g, kg)
    #[arg(long, global = true, ignore_case = true)]
    pub mass_unit: Option<MassUnit>,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rectangular sheet
    Rectangle {
        #[arg(long, short = 'l', allow_negative_numbers = true)]
        length: f64,

        #[arg(long, short = 'w', allow_negative_numbers = true)]
        width: f64,

        #[arg(long, short = 't', allow_negative_numbers = true)]
        thickness: f64,
    },

    /// Square sheet
    Square {
        #[arg(long, short = 's', allow_negative_numbers = true)]
        side: f64,

        #[arg(long, short = 't', allow_negative_numbers = true)]
        thickness: f64,
    },

    /// Circular sheet
    Circle {
        #[arg(long, short = 'r', allow_negative_numbers = true)]
        radius: f64,

        #[arg(long, short = 't', allow_negative_numbers = true)]
        thickness: f64,
    },

    /// Irregular sheet measured from a photo (jpg, png)
    Image {
        /// Path to image file
        image: PathBuf,

        #[arg(long, short = 't', allow_negative_numbers = true)]
        thickness: f64,

        /// Real width of the reference object in the photo
        #[arg(long, short = 'r', allow_negative_numbers = true)]
        reference_width: Option<f64>,

        /// Fixed scale in cm per pixel (implies --policy fixed-scale)
        #[arg(long)]
        scale: Option<f64>,

        /// Reference policy. Uses config value if not specified.
        #[arg(long)]
        policy: Option<ReferencePolicy>,

        /// Grayscale threshold (0-255)
        #[arg(long)]
        threshold: Option<u8>,

        /// Foreground polarity (bright, dark)
        #[arg(long)]
        polarity: Option<Polarity>,

        /// Detector command override
        #[arg(long)]
        detector: Option<String>,
    },

    /// List materials and densities
    Materials,

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set default material
        #[arg(long, ignore_case = true)]
        set_material: Option<Material>,

        /// Set default length unit
        #[arg(long, ignore_case = true)]
        set_unit: Option<LengthUnit>,

        /// Set default mass unit
        #[arg(long, ignore_case = true)]
        set_mass_unit: Option<MassUnit>,

        /// Set default output format
        #[arg(long)]
        set_output: Option<OutputFormat>,

        /// Set grayscale threshold (0-255)
        #[arg(long)]
        set_threshold: Option<u8>,

        /// Set foreground polarity
        #[arg(long)]
        set_polarity: Option<Polarity>,

        /// Set reference policy
        #[arg(long)]
        set_policy: Option<ReferencePolicy>,

        /// Set fixed scale in cm per pixel
        #[arg(long)]
        set_scale: Option<f64>,

        /// Set detector command
        #[arg(long)]
        set_detector_cmd: Option<String>,

        /// Set detector minimum confidence (0.0-1.0)
        #[arg(long)]
        set_detector_min_conf: Option<f64>,

        /// Set detector label of the reference marker
        #[arg(long)]
        set_reference_label: Option<String>,

        /// Set how detector sheet boxes are combined
        #[arg(long)]
        set_box_policy: Option<BoxPolicy>,

        /// Reset to defaults
        #[arg(long)]
        reset: bool,
    },
}
