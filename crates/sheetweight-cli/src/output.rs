//! Output formatting module

use sheetweight_app::app::WeightReport;
use sheetweight_domain::{MaterialSpec, Shape};
use sheetweight_types::{OutputFormat, Result};

pub fn output_report(output_format: OutputFormat, report: &WeightReport) -> Result<()> {
    if output_format == OutputFormat::Json {
        let content = serde_json::to_string_pretty(report)?;
        println!("{}", content);
        return Ok(());
    }

    println!("\nWeight Result");
    println!("=============");
    println!("Material:        {} ({:.2} g/cm³)", report.material, report.density);

    if let Some(shape) = report.shape {
        match shape {
            Shape::Rectangle { length, width } => {
                println!("Shape:           rectangle {} x {}", length, width)
            }
            Shape::Square { side } => println!("Shape:           square {}", side),
            Shape::Circle { radius } => println!("Shape:           circle r={}", radius),
        }
    }

    if let Some(ref calibration) = report.calibration {
        println!("\n--- Calibration ---");
        println!("Policy:          {}", calibration.policy);
        println!("Sheet area:      {:.0} px²", calibration.sheet_pixel_area);
        if let Some(px) = calibration.reference_pixel_width {
            println!("Reference:       {:.0} px", px);
        }
        if let Some(cm) = calibration.reference_width_cm {
            println!("Reference width: {:.2} cm", cm);
        }
        println!("Scale:           {:.4} cm/px", calibration.cm_per_px);
        println!("-------------------");
    }

    println!("Thickness:       {:.3} cm", report.thickness_cm);
    println!("Area:            {:.2} cm²", report.area_cm2);
    println!("Weight:          {}", report.weight_label());

    Ok(())
}

pub fn output_materials(output_format: OutputFormat, specs: &[MaterialSpec]) -> Result<()> {
    if output_format == OutputFormat::Json {
        let content = serde_json::to_string_pretty(specs)?;
        println!("{}", content);
        return Ok(());
    }

    println!("{:<6} {:<18} {}", "Code", "Material", "Density (g/cm³)");
    for spec in specs {
        println!("{:<6} {:<18} {:.2}", spec.material.code(), spec.name, spec.density);
    }

    Ok(())
}
