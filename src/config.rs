use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

/// Point-feature tracker tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    pub max_features: usize,
    pub detect_threshold: f64,
    pub nonmax_radius: u32,
    /// Pyramid scale factors, finest first.
    pub pyramid_scales: Vec<u32>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            max_features: 150,
            detect_threshold: 40.0,
            nonmax_radius: 3,
            pyramid_scales: vec![1, 2, 4],
        }
    }
}

/// Robust 2D affine motion-model fitting tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotionConfig {
    pub max_iterations: usize,
    pub refine_tolerance: f64,
    /// Model-validation passes over the track set.
    pub prune_passes: usize,
    pub min_track_length: usize,
    /// Fraction of tracks that must be inliers for a fit to be accepted.
    pub inlier_fraction: f64,
    /// Fraction of prior outliers allowed back in after refinement.
    pub outlier_reaccept_fraction: f64,
    pub reset_on_failure: bool,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            refine_tolerance: 1.5,
            prune_passes: 2,
            min_track_length: 40,
            inlier_fraction: 0.5,
            outlier_reaccept_fraction: 0.6,
            reset_on_failure: false,
        }
    }
}

/// Stitching wrapper tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StitchConfig {
    /// Fraction of surviving tracks below which the tracker is respawned.
    pub respawn_fraction: f64,
    /// Corners drifting closer than this to the canvas edge trigger a
    /// re-anchor of the mosaic origin.
    pub reanchor_margin_px: f64,
}

impl Default for StitchConfig {
    fn default() -> Self {
        Self {
            respawn_fraction: 0.2,
            reanchor_margin_px: 5.0,
        }
    }
}

/// Full tuning handed to a stitching-engine builder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StabilizationConfig {
    pub tracker: TrackerConfig,
    pub motion: MotionConfig,
    pub stitch: StitchConfig,
}

impl StabilizationConfig {
    /// Rejects misconfiguration at construction time. Engines may assume a
    /// validated config.
    pub fn validate(&self) -> Result<()> {
        if self.tracker.max_features == 0 {
            bail!("max_features must be positive");
        }
        if self.tracker.pyramid_scales.is_empty() {
            bail!("pyramid_scales must not be empty");
        }
        if !(0.0..=1.0).contains(&self.motion.inlier_fraction) {
            bail!(
                "inlier_fraction {} outside [0, 1]",
                self.motion.inlier_fraction
            );
        }
        if !(0.0..=1.0).contains(&self.motion.outlier_reaccept_fraction) {
            bail!(
                "outlier_reaccept_fraction {} outside [0, 1]",
                self.motion.outlier_reaccept_fraction
            );
        }
        if !(0.0..=1.0).contains(&self.stitch.respawn_fraction) {
            bail!(
                "respawn_fraction {} outside [0, 1]",
                self.stitch.respawn_fraction
            );
        }
        if self.stitch.reanchor_margin_px < 0.0 {
            bail!("reanchor_margin_px must not be negative");
        }
        Ok(())
    }
}
