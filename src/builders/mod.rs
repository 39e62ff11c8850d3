//! Isochrone map builders and their dispatch factory.

pub mod concave_balls;
pub mod grid;

use geo::{BooleanOps, MultiPolygon, Polygon};
use serde::{Deserialize, Serialize};

use crate::config::IsochroneConfig;
use crate::geom::{drop_small_holes, meters_per_degree, polygon_area_m2, simplify_polygon};
use crate::model::{IsochroneMap, IsochroneSearchParameters, RouteSearchContext};
use crate::Error;

pub use concave_balls::ConcaveBallsIsochroneMapBuilder;
pub use grid::GridBasedIsochroneMapBuilder;

/// Resolved construction strategy, echoed on the output map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuilderMethod {
    ConcaveBalls,
    Grid,
}

impl BuilderMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ConcaveBalls => "concaveballs",
            Self::Grid => "grid",
        }
    }
}

/// Closed set of builder strategies. A builder is constructed per request
/// against one immutable context; `compute` may run repeatedly without
/// accumulating state.
pub enum IsochroneMapBuilder<'a> {
    ConcaveBalls(ConcaveBallsIsochroneMapBuilder<'a>),
    Grid(GridBasedIsochroneMapBuilder<'a>),
}

impl<'a> IsochroneMapBuilder<'a> {
    pub fn compute(&self, parameters: &IsochroneSearchParameters) -> Result<IsochroneMap, Error> {
        match self {
            Self::ConcaveBalls(builder) => builder.compute(parameters),
            Self::Grid(builder) => builder.compute(parameters),
        }
    }
}

/// Builder registry: resolves a method name to a strategy and runs it.
pub struct IsochroneMapBuilderFactory<'a> {
    context: &'a RouteSearchContext,
    config: IsochroneConfig,
}

impl<'a> IsochroneMapBuilderFactory<'a> {
    pub fn new(context: &'a RouteSearchContext) -> Self {
        Self::with_config(context, IsochroneConfig::default())
    }

    pub fn with_config(context: &'a RouteSearchContext, config: IsochroneConfig) -> Self {
        Self { context, config }
    }

    /// Resolves `method` case-insensitively. The empty string,
    /// `"default"` and `"concaveballs"` select the concave-hull builder;
    /// `"grid"` selects the grid builder.
    pub fn create(&self, method: &str) -> Result<IsochroneMapBuilder<'a>, Error> {
        match method.to_ascii_lowercase().as_str() {
            "" | "default" | "concaveballs" => Ok(IsochroneMapBuilder::ConcaveBalls(
                ConcaveBallsIsochroneMapBuilder::new(self.context, self.config.clone()),
            )),
            "grid" => Ok(IsochroneMapBuilder::Grid(GridBasedIsochroneMapBuilder::new(
                self.context,
                self.config.clone(),
            ))),
            // Echo the token as the caller sent it, not lowercased.
            _ => Err(Error::UnknownMethod(method.to_string())),
        }
    }

    /// Public entry point: selects a builder from the parameters and
    /// computes the map.
    pub fn build_map(&self, parameters: &IsochroneSearchParameters) -> Result<IsochroneMap, Error> {
        let builder = self.create(&parameters.method)?;
        builder.compute(parameters)
    }
}

/// Shared band post-processing: hole filtering, simplification and the
/// corrective union that keeps successive bands nested even when the
/// boundary algorithm misbehaves on a superset of inputs.
pub(crate) fn finish_band(
    bands: MultiPolygon<f64>,
    previous: &mut MultiPolygon<f64>,
    range_dist_m: f64,
    ref_lat: f64,
    parameters: &IsochroneSearchParameters,
    config: &IsochroneConfig,
) -> MultiPolygon<f64> {
    let (_, lat_scale) = meters_per_degree(ref_lat);
    let epsilon_m = parameters
        .smoothing_m
        .unwrap_or(range_dist_m / config.smoothing_divisor);
    let epsilon_deg = (epsilon_m / lat_scale).max(0.0);

    let polygons: Vec<Polygon<f64>> = bands
        .0
        .iter()
        .map(|polygon| {
            let filtered = drop_small_holes(polygon, config.min_hole_area_m2, ref_lat);
            simplify_polygon(&filtered, epsilon_deg)
        })
        .collect();
    let mut bands = MultiPolygon::new(polygons);

    if !previous.0.is_empty() {
        bands = if bands.0.is_empty() {
            previous.clone()
        } else {
            bands.union(previous)
        };
    }
    *previous = bands.clone();
    bands
}

/// Area and reach factor for one band, when requested.
pub(crate) fn band_statistics(
    bands: &MultiPolygon<f64>,
    range_dist_m: f64,
    ref_lat: f64,
    parameters: &IsochroneSearchParameters,
) -> (Option<f64>, Option<f64>) {
    if !parameters.include_area && !parameters.include_reach_factor {
        return (None, None);
    }
    let area_m2: f64 = bands
        .0
        .iter()
        .map(|polygon| polygon_area_m2(polygon, ref_lat))
        .sum();
    let area = parameters.include_area.then_some(area_m2);
    let reach = (parameters.include_reach_factor && range_dist_m > 0.0).then(|| {
        let full_circle = std::f64::consts::PI * range_dist_m * range_dist_m;
        area_m2 / full_circle
    });
    (area, reach)
}
