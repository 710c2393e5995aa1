//! Prediction providers.
//!
//! There is no trained model yet. `MockPredictionProvider` produces random
//! diagnoses and random saliency maps with the same shapes a real model
//! would return; a real implementation only has to implement
//! `PredictionProvider` for the hosts to pick it up.

use crate::config::PredictionConfig;
use crate::diagnosis::{Condition, DiagnosisContext};
use crate::error::{NeuroError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::path::Path;
use std::sync::Mutex;
use tracing::debug;

/// Side length of every generated map
pub const MAP_SIZE: usize = 256;

/// Months of simulated disease progression
pub const PROGRESSION_MONTHS: usize = 36;

/// Accepted scan extensions (NIfTI, DICOM)
pub const SCAN_EXTENSIONS: &[&str] = &["nii", "dcm"];

/// An uploaded scan
#[derive(Debug, Clone)]
pub struct ScanInput {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ScanInput {
    /// Validates the extension and that the payload is non-empty
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self> {
        let file_name = file_name.into();
        let ext = Path::new(&file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext {
            Some(ref e) if SCAN_EXTENSIONS.contains(&e.as_str()) => {}
            _ => return Err(NeuroError::UnsupportedScan(file_name)),
        }

        if bytes.is_empty() {
            return Err(NeuroError::InvalidInput(format!("scan '{}' is empty", file_name)));
        }

        Ok(Self { file_name, bytes })
    }
}

/// Row-major 8-bit image
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heatmap {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
    pub pixels: Vec<u8>,
}

impl Heatmap {
    pub fn mean_intensity(&self) -> f64 {
        if self.pixels.is_empty() {
            return 0.0;
        }
        let sum: u64 = self.pixels.iter().map(|&p| p as u64).sum();
        sum as f64 / self.pixels.len() as f64
    }
}

/// Everything a model run produces for one scan
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub context: DiagnosisContext,
    /// Grad-CAM, single channel
    pub heatmap: Heatmap,
    /// SHAP attribution, RGB
    pub shap: Heatmap,
    /// LIME superpixels, RGB
    pub lime: Heatmap,
    /// Predicted decline score per month, never negative
    pub progression: Vec<f64>,
}

pub trait PredictionProvider: Send + Sync {
    fn predict(&self, scan: &ScanInput) -> Result<Prediction>;
}

pub struct MockPredictionProvider {
    rng: Mutex<StdRng>,
    min_confidence: f64,
    max_confidence: f64,
}

impl MockPredictionProvider {
    /// Rejects an inverted or out-of-range confidence interval with
    /// `NeuroError::Config`
    pub fn new(config: &PredictionConfig) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            rng: Mutex::new(rng),
            min_confidence: config.min_confidence,
            max_confidence: config.max_confidence,
        })
    }

    /// Default confidence range with a fixed seed
    pub fn seeded(seed: u64) -> Self {
        let defaults = PredictionConfig::default();
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            min_confidence: defaults.min_confidence,
            max_confidence: defaults.max_confidence,
        }
    }
}

impl PredictionProvider for MockPredictionProvider {
    fn predict(&self, scan: &ScanInput) -> Result<Prediction> {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        let label = Condition::ALL[rng.gen_range(0..Condition::ALL.len())];
        let raw = rng.gen_range(self.min_confidence..=self.max_confidence);
        let confidence = ((raw * 100.0).round() / 100.0).clamp(0.0, 1.0);
        let context = DiagnosisContext::new(label, confidence)?;

        let heatmap = gradcam_map(&mut *rng);
        let shap = rgb_map(&mut *rng, |r| (r.gen::<f64>() * 255.0) as u8);
        let lime = rgb_map(&mut *rng, |r| r.gen_range(0..255u8));
        let progression = progression(&mut *rng);

        debug!(
            scan = %scan.file_name,
            bytes = scan.bytes.len(),
            diagnosis = label.code(),
            confidence,
            "Mock prediction"
        );

        Ok(Prediction {
            context,
            heatmap,
            shap,
            lime,
            progression,
        })
    }
}

/// Standard normal sample (Box-Muller)
fn standard_normal<R: Rng>(rng: &mut R) -> f64 {
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = rng.gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

/// N(0,1) * 255 clipped to [0, 255]; roughly half the pixels are black
fn gradcam_map<R: Rng>(rng: &mut R) -> Heatmap {
    let pixels = (0..MAP_SIZE * MAP_SIZE)
        .map(|_| (standard_normal(rng) * 255.0).clamp(0.0, 255.0) as u8)
        .collect();
    Heatmap {
        width: MAP_SIZE,
        height: MAP_SIZE,
        channels: 1,
        pixels,
    }
}

fn rgb_map<R: Rng>(rng: &mut R, mut sample: impl FnMut(&mut R) -> u8) -> Heatmap {
    let pixels = (0..MAP_SIZE * MAP_SIZE * 3).map(|_| sample(rng)).collect();
    Heatmap {
        width: MAP_SIZE,
        height: MAP_SIZE,
        channels: 3,
        pixels,
    }
}

/// Random walk, with negative points clamped to zero
fn progression<R: Rng>(rng: &mut R) -> Vec<f64> {
    let mut total = 0.0;
    (0..PROGRESSION_MONTHS)
        .map(|_| {
            total += standard_normal(rng);
            total.max(0.0)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan() -> ScanInput {
        ScanInput::new("brain.nii", vec![1, 2, 3]).unwrap()
    }

    #[test]
    fn test_scan_extensions() {
        assert!(ScanInput::new("a.NII", vec![0]).is_ok());
        assert!(ScanInput::new("dir/b.dcm", vec![0]).is_ok());
        assert!(matches!(
            ScanInput::new("photo.png", vec![0]),
            Err(NeuroError::UnsupportedScan(_))
        ));
        assert!(matches!(
            ScanInput::new("noext", vec![0]),
            Err(NeuroError::UnsupportedScan(_))
        ));
        assert!(matches!(
            ScanInput::new("empty.nii", vec![]),
            Err(NeuroError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_mock_shapes() {
        let prediction = MockPredictionProvider::seeded(1).predict(&scan()).unwrap();
        assert_eq!(prediction.heatmap.pixels.len(), MAP_SIZE * MAP_SIZE);
        assert_eq!(prediction.heatmap.channels, 1);
        assert_eq!(prediction.shap.pixels.len(), MAP_SIZE * MAP_SIZE * 3);
        assert_eq!(prediction.lime.pixels.len(), MAP_SIZE * MAP_SIZE * 3);
        assert_eq!(prediction.progression.len(), PROGRESSION_MONTHS);
    }

    #[test]
    fn test_mock_confidence_range() {
        let provider = MockPredictionProvider::seeded(99);
        for _ in 0..50 {
            let c = provider.predict(&scan()).unwrap().context.confidence();
            assert!((0.7..=0.99).contains(&c), "confidence {} out of range", c);
            // Two decimals
            assert!(((c * 100.0).round() - c * 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_mock_is_deterministic_with_seed() {
        let a = MockPredictionProvider::seeded(42).predict(&scan()).unwrap();
        let b = MockPredictionProvider::seeded(42).predict(&scan()).unwrap();
        assert_eq!(a.context, b.context);
        assert_eq!(a.heatmap, b.heatmap);
        assert_eq!(a.progression, b.progression);
    }

    #[test]
    fn test_progression_never_negative() {
        let provider = MockPredictionProvider::seeded(5);
        for _ in 0..20 {
            let p = provider.predict(&scan()).unwrap();
            assert!(p.progression.iter().all(|v| *v >= 0.0));
        }
    }

    #[test]
    fn test_lime_never_hits_255() {
        let p = MockPredictionProvider::seeded(3).predict(&scan()).unwrap();
        assert!(p.lime.pixels.iter().all(|&v| v < 255));
    }

    #[test]
    fn test_new_rejects_bad_confidence_range() {
        let inverted = PredictionConfig {
            seed: Some(1),
            min_confidence: 0.9,
            max_confidence: 0.5,
        };
        assert!(matches!(
            MockPredictionProvider::new(&inverted),
            Err(NeuroError::Config(_))
        ));

        let nan = PredictionConfig {
            min_confidence: f64::NAN,
            ..PredictionConfig::default()
        };
        assert!(matches!(MockPredictionProvider::new(&nan), Err(NeuroError::Config(_))));

        let above_one = PredictionConfig {
            max_confidence: 1.5,
            ..PredictionConfig::default()
        };
        assert!(matches!(
            MockPredictionProvider::new(&above_one),
            Err(NeuroError::Config(_))
        ));
    }

    #[test]
    fn test_new_accepts_single_point_range() {
        let config = PredictionConfig {
            seed: Some(4),
            min_confidence: 0.8,
            max_confidence: 0.8,
        };
        let provider = MockPredictionProvider::new(&config).unwrap();
        assert_eq!(provider.predict(&scan()).unwrap().context.confidence(), 0.8);
    }

    #[test]
    fn test_mean_intensity() {
        let map = Heatmap {
            width: 2,
            height: 1,
            channels: 1,
            pixels: vec![0, 200],
        };
        assert_eq!(map.mean_intensity(), 100.0);
    }
}
