//! External object detector invoked as a subprocess.
//!
//! The command receives `--image <path> --min-conf <c>` and must print JSON:
//!
//! ```json
//! {"detections": [{"label": "sheet", "confidence": 0.93, "bbox": [x, y, w, h]}]}
//! ```

use crate::RegionEstimator;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use sheetweight_domain::{DetectedRegion, RegionSet};
use sheetweight_types::{Error, Result};
use std::path::Path;
use std::process::Command;
use tracing::{debug, warn};

pub const DEFAULT_REFERENCE_LABEL: &str = "reference";

/// How sheet boxes are reduced to one area
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BoxPolicy {
    /// Box with the highest confidence; ties go to the larger box, then the first
    #[default]
    HighestConfidence,
    /// Sum of all sheet box areas
    Sum,
}

impl std::fmt::Display for BoxPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoxPolicy::HighestConfidence => write!(f, "highest-confidence"),
            BoxPolicy::Sum => write!(f, "sum"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Detection {
    #[serde(default)]
    pub label: String,
    pub confidence: f64,
    /// x, y, width, height in px
    pub bbox: [f64; 4],
}

impl Detection {
    /// Reject boxes no image could have produced
    fn validate(&self) -> Result<()> {
        if !self.confidence.is_finite() || self.bbox.iter().any(|v| !v.is_finite()) {
            return Err(Error::ExternalDetectionFailure(format!(
                "non-finite detection values for '{}': {:?}",
                self.label, self.bbox
            )));
        }
        if self.bbox[2] < 0.0 || self.bbox[3] < 0.0 {
            return Err(Error::ExternalDetectionFailure(format!(
                "negative box size for '{}': {} x {}",
                self.label, self.bbox[2], self.bbox[3]
            )));
        }
        Ok(())
    }

    fn width(&self) -> f64 {
        self.bbox[2].max(0.0)
    }

    fn height(&self) -> f64 {
        self.bbox[3].max(0.0)
    }

    fn area(&self) -> f64 {
        self.width() * self.height()
    }

    fn to_region(&self) -> DetectedRegion {
        DetectedRegion::new(self.area(), self.width(), self.height())
            .with_confidence(self.confidence)
    }
}

#[derive(Debug, Deserialize)]
struct DetectorOutput {
    #[serde(default)]
    detections: Vec<Detection>,
    #[serde(default)]
    error: Option<String>,
}

/// Pull the JSON object out of detector stdout (tolerates code fences and chatter)
fn extract_json(output: &str) -> &str {
    let output = output.trim();
    match (output.find('{'), output.rfind('}')) {
        (Some(start), Some(end)) if start < end => &output[start..=end],
        _ => output,
    }
}

/// Parse detector stdout into detections
pub fn parse_detections(stdout: &str) -> Result<Vec<Detection>> {
    let json_str = extract_json(stdout);
    let parsed: DetectorOutput = serde_json::from_str(json_str).map_err(|e| {
        let truncated: String = stdout.chars().take(200).collect();
        Error::ExternalDetectionFailure(format!(
            "unreadable detector output: {}. Output: {}",
            e, truncated
        ))
    })?;

    if let Some(message) = parsed.error {
        return Err(Error::ExternalDetectionFailure(message));
    }

    for detection in &parsed.detections {
        detection.validate()?;
    }

    Ok(parsed.detections)
}

fn pick_best<'a, I>(boxes: I) -> Option<&'a Detection>
where
    I: IntoIterator<Item = &'a Detection>,
{
    let mut best: Option<&Detection> = None;
    for candidate in boxes {
        best = match best {
            None => Some(candidate),
            Some(current) => {
                let better = candidate.confidence > current.confidence
                    || (candidate.confidence == current.confidence
                        && candidate.area() > current.area());
                if better {
                    Some(candidate)
                } else {
                    Some(current)
                }
            }
        };
    }
    best
}

/// Runs an external detection command
#[derive(Debug, Clone)]
pub struct CommandDetector {
    pub command: String,
    pub min_confidence: f64,
    pub reference_label: String,
    pub box_policy: BoxPolicy,
}

impl CommandDetector {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            min_confidence: 0.25,
            reference_label: DEFAULT_REFERENCE_LABEL.to_string(),
            box_policy: BoxPolicy::default(),
        }
    }

    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    pub fn with_reference_label(mut self, label: impl Into<String>) -> Self {
        self.reference_label = label.into();
        self
    }

    pub fn with_box_policy(mut self, policy: BoxPolicy) -> Self {
        self.box_policy = policy;
        self
    }

    /// Reduce detections to the sheet region and optional reference region.
    ///
    /// Deterministic for a given detection list.
    pub fn select_regions(&self, detections: &[Detection]) -> Result<RegionSet> {
        let kept: Vec<&Detection> = detections
            .iter()
            .filter(|d| d.confidence >= self.min_confidence)
            .collect();

        let (references, sheets): (Vec<&Detection>, Vec<&Detection>) = kept
            .into_iter()
            .partition(|d| d.label.eq_ignore_ascii_case(&self.reference_label));

        let sheet = match self.box_policy {
            BoxPolicy::HighestConfidence => pick_best(sheets.iter().copied())
                .map(Detection::to_region)
                .ok_or(Error::RegionNotFound)?,
            BoxPolicy::Sum => {
                if sheets.is_empty() {
                    return Err(Error::RegionNotFound);
                }
                let area: f64 = sheets.iter().map(|d| d.area()).sum();
                let width = sheets.iter().map(|d| d.width()).fold(0.0, f64::max);
                let height = sheets.iter().map(|d| d.height()).fold(0.0, f64::max);
                let confidence = sheets.iter().map(|d| d.confidence).fold(0.0, f64::max);
                DetectedRegion::new(area, width, height).with_confidence(confidence)
            }
        };

        if sheet.pixel_area <= 0.0 {
            return Err(Error::RegionNotFound);
        }

        let mut set = RegionSet::sheet_only(sheet);
        if let Some(reference) = pick_best(references.iter().copied()) {
            set = set.with_reference(reference.to_region());
        }

        Ok(set)
    }

    fn run(&self, image_path: &Path) -> Result<String> {
        let mut parts = shell_words::split(&self.command).map_err(|e| {
            Error::ExternalDetectionFailure(format!(
                "invalid detector command '{}': {}",
                self.command, e
            ))
        })?;
        if parts.is_empty() {
            return Err(Error::ExternalDetectionFailure(
                "detector command is empty".to_string(),
            ));
        }

        let program = parts.remove(0);
        let mut cmd = Command::new(&program);
        cmd.args(&parts);
        cmd.arg("--image");
        cmd.arg(image_path);
        cmd.arg("--min-conf");
        cmd.arg(format!("{}", self.min_confidence));

        debug!(program = %program, args = ?parts, image = %image_path.display(), "running detector");

        let output = cmd.output().map_err(|e| {
            Error::ExternalDetectionFailure(format!("failed to run '{}': {}", program, e))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(status = %output.status, "detector exited with failure");
            return Err(Error::ExternalDetectionFailure(format!(
                "detector exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl RegionEstimator for CommandDetector {
    fn estimate(&self, image_path: &Path) -> Result<RegionSet> {
        let stdout = self.run(image_path)?;
        let detections = parse_detections(&stdout)?;
        debug!(count = detections.len(), "detector returned boxes");
        self.select_regions(&detections)
    }
}
