//! Tunable constants for isochrone construction.
//!
//! Defaults are chosen for road networks at city scale; callers may
//! deserialize overrides from their own configuration layer.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IsochroneConfig {
    /// Maximum distance in meters between the requested origin and the
    /// nearest graph node for snapping to succeed.
    pub snap_tolerance_m: f64,
    /// Buffer radius cap as a fraction of the band's full range distance.
    pub buffer_fraction: f64,
    /// Radius in meters below which buffer circles degenerate to the
    /// sample point itself.
    pub min_buffer_m: f64,
    /// Points emitted per buffer circle.
    pub circle_samples: usize,
    /// Lower bound on the sampling step along an edge, in meters.
    pub min_sample_step_m: f64,
    /// Interior holes smaller than this are treated as sampling artifacts
    /// and dropped.
    pub min_hole_area_m2: f64,
    /// Cells per grid axis when no explicit cell size is requested.
    pub grid_resolution: usize,
    /// Inverse-distance-weighting search radius, in cell widths.
    pub idw_radius_cells: f64,
    /// Default simplification tolerance is the band's range distance
    /// divided by this value.
    pub smoothing_divisor: f64,
}

impl Default for IsochroneConfig {
    fn default() -> Self {
        Self {
            snap_tolerance_m: 400.0,
            buffer_fraction: 0.15,
            min_buffer_m: 10.0,
            circle_samples: 8,
            min_sample_step_m: 20.0,
            min_hole_area_m2: 5_000.0,
            grid_resolution: 200,
            idw_radius_cells: 3.0,
            smoothing_divisor: 150.0,
        }
    }
}
