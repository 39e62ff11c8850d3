//! Read-only search context shared by every builder of one request.

use geo::Point;
use petgraph::graph::NodeIndex;
use rstar::{RTree, primitives::GeomWithData};

use crate::geom::planar_distance_m;
use crate::model::graph::{RoadEdge, RoadGraph};
use crate::model::range::RangeUnit;
use crate::Error;

type SnapPoint = GeomWithData<[f64; 2], usize>;

/// Edge-cost model. Time costs derive from per-edge speeds where present,
/// otherwise from the default travel speed.
#[derive(Debug, Clone, Copy)]
pub struct CostModel {
    /// Fallback travel speed in m/s. The default corresponds to 50 km/h.
    pub default_speed_mps: f64,
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            default_speed_mps: 13.89,
        }
    }
}

/// Immutable handle to the road graph, its cost function and origin
/// snapping. Built once per request by the routing subsystem and only
/// ever read by the isochrone core, so sharing it across concurrent
/// computations is safe.
#[derive(Debug)]
pub struct RouteSearchContext {
    graph: RoadGraph,
    cost_model: CostModel,
    index: RTree<SnapPoint>,
}

impl RouteSearchContext {
    pub fn new(graph: RoadGraph, cost_model: CostModel) -> Self {
        let points: Vec<SnapPoint> = graph
            .node_indices()
            .map(|node| {
                let point = graph[node].geometry;
                GeomWithData::new([point.x(), point.y()], node.index())
            })
            .collect();
        Self {
            graph,
            cost_model,
            index: RTree::bulk_load(points),
        }
    }

    pub fn graph(&self) -> &RoadGraph {
        &self.graph
    }

    pub fn cost_model(&self) -> CostModel {
        self.cost_model
    }

    pub fn node_point(&self, node: NodeIndex) -> Point<f64> {
        self.graph[node].geometry
    }

    /// Cost of traversing `edge` in the requested unit.
    pub fn edge_cost(&self, edge: &RoadEdge, unit: RangeUnit) -> f64 {
        match unit {
            RangeUnit::Meters => edge.length_m,
            RangeUnit::Seconds => {
                let speed = edge
                    .speed_mps
                    .unwrap_or(self.cost_model.default_speed_mps);
                edge.length_m / speed
            }
        }
    }

    /// Meters of travel per unit of cost: the conversion between residual
    /// cost and buffer distance.
    pub fn cost_to_distance(&self, unit: RangeUnit) -> f64 {
        match unit {
            RangeUnit::Meters => 1.0,
            RangeUnit::Seconds => self.cost_model.default_speed_mps,
        }
    }

    /// Snaps the origin to the nearest graph node within `tolerance_m`.
    pub fn snap_origin(&self, origin: Point<f64>, tolerance_m: f64) -> Result<NodeIndex, Error> {
        let nearest = self
            .index
            .nearest_neighbor(&[origin.x(), origin.y()])
            .ok_or(Error::UnreachableOrigin)?;
        let candidate = Point::new(nearest.geom()[0], nearest.geom()[1]);
        let distance = planar_distance_m(origin.into(), candidate.into(), origin.y());
        if distance > tolerance_m {
            return Err(Error::UnreachableOrigin);
        }
        Ok(NodeIndex::new(nearest.data))
    }
}
