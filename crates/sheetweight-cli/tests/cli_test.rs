//! End-to-end tests for the sheetweight binary
//!
//! Each test runs the binary with HOME / XDG_CONFIG_HOME pointed at a temp
//! directory so the user's real config is never read or written.

use approx::assert_relative_eq;
use image::{Rgb, RgbImage};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

struct Sandbox {
    home: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            home: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    fn path(&self) -> &Path {
        self.home.path()
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_sheetweight"))
            .args(args)
            .env("HOME", self.path())
            .env("XDG_CONFIG_HOME", self.path().join(".config"))
            .env_remove("RUST_LOG")
            .output()
            .expect("Failed to run sheetweight")
    }

    fn run_json(&self, args: &[&str]) -> Value {
        let mut full = vec!["--format", "json"];
        full.extend_from_slice(args);
        let output = self.run(&full);
        assert!(
            output.status.success(),
            "command failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
    }

    /// Black canvas with white filled rectangles (x, y, w, h)
    fn write_image(&self, name: &str, rects: &[(u32, u32, u32, u32)]) -> PathBuf {
        let mut img = RgbImage::from_pixel(240, 160, Rgb([0, 0, 0]));
        for &(x0, y0, w, h) in rects {
            for y in y0..y0 + h {
                for x in x0..x0 + w {
                    img.put_pixel(x, y, Rgb([255, 255, 255]));
                }
            }
        }
        let path = self.path().join(name);
        img.save(&path).expect("Failed to save test image");
        path
    }
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn test_rectangle_json_in_grams() {
    let sandbox = Sandbox::new();
    let json = sandbox.run_json(&[
        "--mass-unit", "g", "rectangle", "--length", "10", "--width", "10", "--thickness", "0.2",
    ]);

    assert_eq!(json["method"], "regular");
    assert_eq!(json["material"], "mild-steel");
    assert_relative_eq!(json["area_cm2"].as_f64().unwrap(), 100.0);
    assert_relative_eq!(json["weight"].as_f64().unwrap(), 157.0, epsilon = 1e-9);
    assert_eq!(json["mass_unit"], "g");
}

#[test]
fn test_square_in_millimeters_stainless() {
    let sandbox = Sandbox::new();
    let json = sandbox.run_json(&[
        "-m", "ss", "-u", "mm", "square", "--side", "100", "--thickness", "10",
    ]);

    // 10cm x 10cm x 1cm x 8.00 = 800g = 0.8kg
    assert_eq!(json["material"], "stainless-steel");
    assert_relative_eq!(json["weight"].as_f64().unwrap(), 0.8, epsilon = 1e-9);
    assert_eq!(json["mass_unit"], "kg");
}

#[test]
fn test_circle_table_output() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["--mass-unit", "g", "circle", "--radius", "3", "--thickness", "1"]);
    assert!(output.status.success(), "{}", stderr(&output));

    let stdout = String::from_utf8_lossy(&output.stdout);
    // π x 9 x 1 x 7.85 = 221.95g
    assert!(stdout.contains("Area:            28.27 cm²"), "{}", stdout);
    assert!(stdout.contains("Weight:          221.95 g"), "{}", stdout);
}

#[test]
fn test_negative_thickness_rejected() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["square", "--side", "4", "--thickness", "-1"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Invalid dimension"));
}

#[test]
fn test_zero_dimension_gives_zero_weight() {
    let sandbox = Sandbox::new();
    let json = sandbox.run_json(&["rectangle", "--length", "0", "--width", "5", "--thickness", "1"]);
    assert_eq!(json["weight"].as_f64().unwrap(), 0.0);
}

#[test]
fn test_image_with_reference_object() {
    let sandbox = Sandbox::new();
    // sheet 100x50 → 5000px²; reference 26px wide
    let image = sandbox.write_image("sheet.png", &[(10, 10, 100, 50), (150, 20, 26, 26)]);

    let json = sandbox.run_json(&[
        "--mass-unit", "g",
        "image", image.to_str().unwrap(),
        "--thickness", "0.2",
        "--reference-width", "2.6",
    ]);

    assert_eq!(json["method"], "image");
    assert_eq!(json["calibration"]["policy"], "second-largest");
    assert_eq!(json["calibration"]["reference_pixel_width"].as_f64().unwrap(), 26.0);
    assert_relative_eq!(json["area_cm2"].as_f64().unwrap(), 50.0, epsilon = 1e-9);
    assert_relative_eq!(json["weight"].as_f64().unwrap(), 78.5, epsilon = 1e-9);
}

#[test]
fn test_image_reference_width_in_mm() {
    let sandbox = Sandbox::new();
    let image = sandbox.write_image("sheet.png", &[(10, 10, 100, 50), (150, 20, 26, 26)]);

    let json = sandbox.run_json(&[
        "-u", "mm",
        "image", image.to_str().unwrap(),
        "--thickness", "2",
        "--reference-width", "26",
    ]);

    assert_relative_eq!(json["area_cm2"].as_f64().unwrap(), 50.0, epsilon = 1e-9);
    assert_relative_eq!(json["thickness_cm"].as_f64().unwrap(), 0.2, epsilon = 1e-12);
}

#[test]
fn test_image_fixed_scale() {
    let sandbox = Sandbox::new();
    let image = sandbox.write_image("sheet.png", &[(10, 10, 100, 100)]);

    let json = sandbox.run_json(&[
        "--mass-unit", "g",
        "image", image.to_str().unwrap(),
        "--thickness", "0.2",
        "--scale", "0.1",
    ]);

    assert_eq!(json["calibration"]["policy"], "fixed-scale");
    assert_relative_eq!(json["area_cm2"].as_f64().unwrap(), 100.0, epsilon = 1e-9);
    assert_relative_eq!(json["weight"].as_f64().unwrap(), 157.0, epsilon = 1e-9);
}

#[test]
fn test_blank_image_region_not_found() {
    let sandbox = Sandbox::new();
    let image = sandbox.write_image("blank.png", &[]);

    let output = sandbox.run(&[
        "image", image.to_str().unwrap(), "--thickness", "0.2", "--reference-width", "5",
    ]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Could not detect a sheet"));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_image_without_reference_object() {
    let sandbox = Sandbox::new();
    let image = sandbox.write_image("single.png", &[(10, 10, 100, 50)]);

    let output = sandbox.run(&[
        "image", image.to_str().unwrap(), "--thickness", "0.2", "--reference-width", "5",
    ]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Invalid calibration"));
}

#[test]
fn test_image_zero_reference_width() {
    let sandbox = Sandbox::new();
    let image = sandbox.write_image("sheet.png", &[(10, 10, 100, 50), (150, 20, 26, 26)]);

    let output = sandbox.run(&[
        "image", image.to_str().unwrap(), "--thickness", "0.2", "--reference-width", "0",
    ]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Invalid calibration"));
}

#[test]
fn test_unsupported_image_extension() {
    let sandbox = Sandbox::new();
    let path = sandbox.path().join("sheet.gif");
    std::fs::write(&path, b"GIF89a").unwrap();

    let output = sandbox.run(&["image", path.to_str().unwrap(), "--thickness", "0.2"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Invalid image format"));
}

#[test]
fn test_detector_policy_without_command() {
    let sandbox = Sandbox::new();
    let image = sandbox.write_image("sheet.png", &[(10, 10, 100, 50)]);

    let output = sandbox.run(&[
        "image", image.to_str().unwrap(),
        "--thickness", "0.2",
        "--reference-width", "5",
        "--policy", "detector",
    ]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("External detection failed"));
}

#[test]
fn test_materials_listing() {
    let sandbox = Sandbox::new();
    let json = sandbox.run_json(&["materials"]);
    let specs = json.as_array().unwrap();
    assert_eq!(specs.len(), 2);
    assert_eq!(specs[0]["material"], "mild-steel");
    assert_relative_eq!(specs[0]["density"].as_f64().unwrap(), 7.85);
    assert_relative_eq!(specs[1]["density"].as_f64().unwrap(), 8.00);
}

#[cfg(target_os = "linux")]
#[test]
fn test_config_persists_defaults() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["config", "--set-material", "ss", "--set-mass-unit", "g"]);
    assert!(output.status.success(), "{}", stderr(&output));

    let config_path = sandbox.path().join(".config").join("sheetweight").join("config.json");
    assert!(config_path.exists());

    let json = sandbox.run_json(&["square", "--side", "10", "--thickness", "1"]);
    assert_eq!(json["material"], "stainless-steel");
    assert_eq!(json["mass_unit"], "g");
    assert_relative_eq!(json["weight"].as_f64().unwrap(), 800.0, epsilon = 1e-9);

    let output = sandbox.run(&["config", "--reset"]);
    assert!(output.status.success());
    let json = sandbox.run_json(&["square", "--side", "10", "--thickness", "1"]);
    assert_eq!(json["material"], "mild-steel");
}

#[cfg(target_os = "linux")]
#[test]
fn test_density_override_file() {
    let sandbox = Sandbox::new();
    let dir = sandbox.path().join(".config").join("sheetweight");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("densities.toml"), "[densities]\nms = 10.0\n").unwrap();

    let json = sandbox.run_json(&[
        "--mass-unit", "g", "square", "--side", "1", "--thickness", "1",
    ]);
    assert_relative_eq!(json["weight"].as_f64().unwrap(), 10.0);
}

#[cfg(target_os = "linux")]
#[test]
fn test_config_reset_recovers_invalid_file() {
    let sandbox = Sandbox::new();
    let dir = sandbox.path().join(".config").join("sheetweight");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.json"), r#"{"fixed_scale_cm_per_px": 0}"#).unwrap();

    let output = sandbox.run(&["square", "--side", "10", "--thickness", "1"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("fixed_scale_cm_per_px"));

    let output = sandbox.run(&["config", "--reset"]);
    assert!(output.status.success(), "{}", stderr(&output));

    let json = sandbox.run_json(&["square", "--side", "10", "--thickness", "1"]);
    assert_eq!(json["material"], "mild-steel");
}

#[test]
fn test_image_sheet_touching_edge() {
    let sandbox = Sandbox::new();
    // sheet runs off the left edge of the photo
    let image = sandbox.write_image("edge.png", &[(0, 10, 100, 50), (150, 20, 26, 26)]);

    let json = sandbox.run_json(&[
        "--mass-unit", "g",
        "image", image.to_str().unwrap(),
        "--thickness", "0.2",
        "--reference-width", "2.6",
    ]);
    assert_relative_eq!(json["area_cm2"].as_f64().unwrap(), 50.0, epsilon = 1e-9);
}
