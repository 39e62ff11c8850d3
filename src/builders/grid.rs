//! Grid-based isochrone construction.
//!
//! Rasterizes the traversal output into a cost surface and extracts
//! iso-contours per range. Coarser than the concave-hull strategy but
//! roughly linear in the number of grid cells, which makes it the fast
//! fallback for large ranges.

use geo::{Coord, MultiPolygon, Rect};
use log::{debug, info};
use rayon::prelude::*;
use rstar::{primitives::GeomWithData, RTree};

use crate::builders::{band_statistics, BuilderMethod};
use crate::config::IsochroneConfig;
use crate::geom::contour::{contour_polygons, CostGrid};
use crate::geom::sampling::EdgeWalk;
use crate::geom::meters_per_degree;
use crate::model::{Isochrone, IsochroneMap, IsochroneSearchParameters, RouteSearchContext};
use crate::traversal::{GraphTraversalEngine, TraversalResult};
use crate::Error;

/// Cost sample in a local metric frame (meters east/north of the grid
/// origin).
type CostSample = GeomWithData<[f64; 2], f64>;

pub struct GridBasedIsochroneMapBuilder<'a> {
    context: &'a RouteSearchContext,
    config: IsochroneConfig,
}

impl<'a> GridBasedIsochroneMapBuilder<'a> {
    pub fn new(context: &'a RouteSearchContext, config: IsochroneConfig) -> Self {
        Self { context, config }
    }

    pub fn compute(&self, parameters: &IsochroneSearchParameters) -> Result<IsochroneMap, Error> {
        let unit = parameters.ranges.unit();
        let origin = self
            .context
            .snap_origin(parameters.origin, self.config.snap_tolerance_m)?;
        let engine = GraphTraversalEngine::new(self.context);
        let traversal = engine.traverse(
            origin,
            parameters.ranges.max(),
            unit,
            &parameters.cancellation,
        )?;

        let dist_per_cost = self.context.cost_to_distance(unit);
        let ref_lat = parameters.origin.y();
        let mut previous = MultiPolygon::new(Vec::new());
        let mut isochrones = Vec::with_capacity(parameters.ranges.values().len());

        let surface = if traversal.is_empty() {
            None
        } else {
            Some(self.rasterize(&traversal, ref_lat, parameters)?)
        };

        for &range in parameters.ranges.values() {
            parameters.cancellation.check()?;
            let range_dist_m = range * dist_per_cost;
            let bands = match &surface {
                Some(grid) if range > 0.0 => {
                    MultiPolygon::new(contour_polygons(grid, range))
                }
                _ => MultiPolygon::new(Vec::new()),
            };
            let bands = super::finish_band(
                bands,
                &mut previous,
                range_dist_m,
                ref_lat,
                parameters,
                &self.config,
            );
            let (area_m2, reach_factor) = band_statistics(&bands, range_dist_m, ref_lat, parameters);
            isochrones.push(Isochrone {
                value: range,
                unit,
                polygons: bands.0,
                area_m2,
                reach_factor,
            });
        }

        Ok(IsochroneMap::new(
            parameters.origin,
            BuilderMethod::Grid,
            isochrones,
        ))
    }

    /// Builds the cost surface: bounding box from the traversal extent
    /// expanded by one cell, inverse-distance-weighted cost per cell
    /// centre from samples along the retained edges.
    fn rasterize(
        &self,
        traversal: &TraversalResult,
        ref_lat: f64,
        parameters: &IsochroneSearchParameters,
    ) -> Result<CostGrid, Error> {
        let extent = traversal
            .extent
            .ok_or_else(|| Error::Internal("traversal produced records but no extent".to_string()))?;
        let (lon_scale, lat_scale) = meters_per_degree(ref_lat);

        let width_m = (extent.width() * lon_scale).max(1.0);
        let height_m = (extent.height() * lat_scale).max(1.0);
        let resolution = self.config.grid_resolution.max(2) as f64;
        let cell_m = (width_m.max(height_m) / resolution).max(1.0);
        let dx = cell_m / lon_scale;
        let dy = cell_m / lat_scale;

        // Expand by one cell so the outermost contours never clip.
        let min = Coord {
            x: extent.min().x - dx,
            y: extent.min().y - dy,
        };
        let max = Coord {
            x: extent.max().x + dx,
            y: extent.max().y + dy,
        };
        let bbox = Rect::new(min, max);
        let cols = ((bbox.width() / dx).ceil() as usize).max(1);
        let rows = ((bbox.height() / dy).ceil() as usize).max(1);
        info!("grid: {cols}x{rows} cells of {cell_m:.1} m");

        let samples = self.collect_samples(traversal, cell_m, bbox, ref_lat, parameters)?;
        debug!("grid: {} cost samples", samples.size());

        let unreached = traversal.max_cost * 2.0 + 1.0;
        let radius_m = self.config.idw_radius_cells * cell_m;
        let radius_sq = radius_m * radius_m;
        let cancelled = &parameters.cancellation;

        let values: Vec<f64> = (0..rows)
            .into_par_iter()
            .flat_map_iter(|j| {
                let samples = &samples;
                (0..cols).map(move |i| {
                    if cancelled.is_cancelled() {
                        return unreached;
                    }
                    let cx = (i as f64 + 0.5) * cell_m;
                    let cy = (j as f64 + 0.5) * cell_m;
                    idw_cost(samples, [cx, cy], radius_sq, unreached)
                })
            })
            .collect();
        cancelled.check()?;

        Ok(CostGrid {
            x0: bbox.min().x + dx / 2.0,
            y0: bbox.min().y + dy / 2.0,
            dx,
            dy,
            cols,
            rows,
            values,
            unreached,
        })
    }

    /// Walks every retained edge and drops a cost sample roughly every
    /// half cell, stopping at the reachability frontier.
    fn collect_samples(
        &self,
        traversal: &TraversalResult,
        cell_m: f64,
        bbox: Rect<f64>,
        ref_lat: f64,
        parameters: &IsochroneSearchParameters,
    ) -> Result<RTree<CostSample>, Error> {
        let graph = self.context.graph();
        let (lon_scale, lat_scale) = meters_per_degree(ref_lat);
        let step = (cell_m / 2.0).max(1.0);
        let max_cost = traversal.max_cost;

        let mut samples: Vec<CostSample> = Vec::new();
        for (idx, record) in traversal.records.iter().enumerate() {
            if idx % 512 == 0 {
                parameters.cancellation.check()?;
            }
            let Some(edge) = graph.edge_weight(record.edge) else {
                continue;
            };
            let Some(walk) = EdgeWalk::new(&edge.geometry, ref_lat) else {
                continue;
            };
            let total_len = walk.length_m();
            let reach_len = if record.end_cost <= max_cost || record.end_cost <= record.start_cost {
                total_len
            } else {
                total_len * ((max_cost - record.start_cost) / (record.end_cost - record.start_cost))
            };
            let mut distance: f64 = 0.0;
            loop {
                let d = distance.min(reach_len);
                let cost = if total_len > 0.0 {
                    record.start_cost + (record.end_cost - record.start_cost) * (d / total_len)
                } else {
                    record.start_cost
                };
                let position = walk.point_at(d);
                samples.push(GeomWithData::new(
                    [
                        (position.x - bbox.min().x) * lon_scale,
                        (position.y - bbox.min().y) * lat_scale,
                    ],
                    cost,
                ));
                if distance >= reach_len {
                    break;
                }
                distance += step;
            }
        }
        Ok(RTree::bulk_load(samples))
    }
}

/// Inverse-distance-weighted cost at a cell centre from samples within
/// the capped radius. No sample in radius marks the cell unreachable.
fn idw_cost(samples: &RTree<CostSample>, center: [f64; 2], radius_sq: f64, unreached: f64) -> f64 {
    let mut weight_sum = 0.0;
    let mut cost_sum = 0.0;
    for sample in samples.locate_within_distance(center, radius_sq) {
        let dx = sample.geom()[0] - center[0];
        let dy = sample.geom()[1] - center[1];
        let dist_sq = (dx * dx + dy * dy).max(1e-6);
        let weight = 1.0 / dist_sq;
        weight_sum += weight;
        cost_sum += weight * sample.data;
    }
    if weight_sum > 0.0 {
        cost_sum / weight_sum
    } else {
        unreached
    }
}
