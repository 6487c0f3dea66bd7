//! External contour extraction and ranking

use image::GrayImage;
use imageproc::contours::{find_contours, BorderType};
use imageproc::point::Point;
use sheetweight_domain::DetectedRegion;

/// Area of a closed polygon using the shoelace formula
pub fn polygon_area(points: &[Point<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }

    let n = points.len();
    let mut twice_area: i64 = 0;

    for i in 0..n {
        let j = (i + 1) % n;
        twice_area += i64::from(points[i].x) * i64::from(points[j].y);
        twice_area -= i64::from(points[j].x) * i64::from(points[i].y);
    }

    twice_area.abs() as f64 / 2.0
}

/// Area enclosed by a traced pixel border, counted in whole pixels.
///
/// The traced polygon runs through boundary pixel centers, so the shoelace
/// area misses half a pixel along every border step plus one pixel for the
/// corners (Pick's theorem). Adding that back puts the area on the same
/// pixel-edge scale as the inclusive width and height.
pub fn border_pixel_area(points: &[Point<i32>]) -> f64 {
    if points.is_empty() {
        return 0.0;
    }
    let steps = if points.len() > 1 { points.len() } else { 0 };
    polygon_area(points) + steps as f64 / 2.0 + 1.0
}

fn region_from_points(points: &[Point<i32>]) -> Option<DetectedRegion> {
    let min_x = points.iter().map(|p| p.x).min()?;
    let max_x = points.iter().map(|p| p.x).max()?;
    let min_y = points.iter().map(|p| p.y).min()?;
    let max_y = points.iter().map(|p| p.y).max()?;

    Some(DetectedRegion::new(
        border_pixel_area(points),
        f64::from(max_x - min_x + 1),
        f64::from(max_y - min_y + 1),
    ))
}

/// Copy of the mask with a 1 px background frame.
///
/// Border following only reports a region as an outer border when it starts
/// on background, so regions touching the image edge need the frame.
fn padded(mask: &GrayImage) -> GrayImage {
    let mut out = GrayImage::new(mask.width() + 2, mask.height() + 2);
    image::imageops::replace(&mut out, mask, 1, 1);
    out
}

/// Outermost foreground regions of a binary mask, largest area first.
///
/// Holes and anything nested inside another region are skipped. Equal areas
/// keep discovery order.
pub fn external_regions(mask: &GrayImage) -> Vec<DetectedRegion> {
    let mut regions: Vec<DetectedRegion> = find_contours::<i32>(&padded(mask))
        .into_iter()
        .filter(|c| matches!(c.border_type, BorderType::Outer) && c.parent.is_none())
        .filter_map(|c| {
            let points: Vec<Point<i32>> =
                c.points.iter().map(|p| Point::new(p.x - 1, p.y - 1)).collect();
            region_from_points(&points)
        })
        .collect();

    regions.sort_by(|a, b| b.pixel_area.total_cmp(&a.pixel_area));
    regions
}
