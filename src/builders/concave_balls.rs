//! Concave-hull ("concave balls") isochrone construction.
//!
//! Buffers every reachable edge into a point cloud and derives each
//! band's boundary as a concave hull over the cumulative cloud, so the
//! hull of a larger range always sees every point of the smaller ones.

use geo::{Coord, MultiPolygon};
use log::{debug, info};

use crate::config::IsochroneConfig;
use crate::geom::hull::concave_hull_of;
use crate::geom::sampling::edge_buffer_points;
use crate::model::{Isochrone, IsochroneMap, IsochroneSearchParameters, RouteSearchContext};
use crate::traversal::{GraphTraversalEngine, TraversalResult};
use crate::builders::{band_statistics, BuilderMethod};
use crate::Error;

/// Edges processed between cancellation checks while sampling.
const CANCELLATION_STRIDE: usize = 256;

pub struct ConcaveBallsIsochroneMapBuilder<'a> {
    context: &'a RouteSearchContext,
    config: IsochroneConfig,
}

impl<'a> ConcaveBallsIsochroneMapBuilder<'a> {
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
        info!(
            "concave balls: {} edge records within cost {}",
            traversal.records.len(),
            traversal.max_cost
        );

        let dist_per_cost = self.context.cost_to_distance(unit);
        let ref_lat = parameters.origin.y();
        let mut cloud: Vec<Coord<f64>> = Vec::new();
        let mut previous = MultiPolygon::new(Vec::new());
        let mut isochrones = Vec::with_capacity(parameters.ranges.values().len());

        for &range in parameters.ranges.values() {
            parameters.cancellation.check()?;
            if range <= 0.0 {
                isochrones.push(Isochrone::empty(range, unit));
                continue;
            }

            self.extend_cloud(&traversal, range, dist_per_cost, parameters, &mut cloud)?;
            debug!("band {range}: {} buffer points", cloud.len());

            let range_dist_m = range * dist_per_cost;
            let bands = match concave_hull_of(&cloud, range_dist_m, ref_lat, &self.config) {
                None => MultiPolygon::new(Vec::new()),
                Some(hull) => MultiPolygon::new(vec![hull]),
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
            BuilderMethod::ConcaveBalls,
            isochrones,
        ))
    }

    /// Adds this band's buffer points for every edge reachable within
    /// `range` to the cumulative cloud.
    fn extend_cloud(
        &self,
        traversal: &TraversalResult,
        range: f64,
        dist_per_cost: f64,
        parameters: &IsochroneSearchParameters,
        cloud: &mut Vec<Coord<f64>>,
    ) -> Result<(), Error> {
        let graph = self.context.graph();
        let ref_lat = parameters.origin.y();
        for (idx, record) in traversal.records.iter().enumerate() {
            if idx % CANCELLATION_STRIDE == 0 {
                parameters.cancellation.check()?;
            }
            if record.start_cost > range {
                continue;
            }
            let Some(edge) = graph.edge_weight(record.edge) else {
                continue;
            };
            edge_buffer_points(
                &edge.geometry,
                record.start_cost,
                record.end_cost,
                range,
                dist_per_cost,
                &self.config,
                ref_lat,
                cloud,
            );
        }
        Ok(())
    }
}
