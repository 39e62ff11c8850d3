//! Road network components - nodes, edges, and the graph builder.

use geo::{LineString, Point};
use petgraph::graph::{DiGraph, NodeIndex};

/// Road graph node.
#[derive(Debug, Clone)]
pub struct RoadNode {
    /// External identifier of the node (e.g. an OSM id).
    pub id: u64,
    /// Node coordinates, WGS84 lon/lat.
    pub geometry: Point<f64>,
}

/// Road graph edge (street segment).
#[derive(Debug, Clone)]
pub struct RoadEdge {
    /// Segment length in meters.
    pub length_m: f64,
    /// Travel speed in m/s; falls back to the context's default speed.
    pub speed_mps: Option<f64>,
    /// Edge geometry for buffering and rasterization.
    pub geometry: LineString<f64>,
}

pub type RoadGraph = DiGraph<RoadNode, RoadEdge>;

/// Assembles a [`RoadGraph`] without exposing the underlying graph
/// representation to callers.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    graph: RoadGraph,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, id: u64, lon: f64, lat: f64) -> NodeIndex {
        self.graph.add_node(RoadNode {
            id,
            geometry: Point::new(lon, lat),
        })
    }

    /// Adds a directed edge with a straight-line geometry between the
    /// endpoint nodes.
    pub fn add_edge(&mut self, from: NodeIndex, to: NodeIndex, length_m: f64, speed_mps: Option<f64>) {
        let geometry = self.straight_line(from, to);
        self.graph.add_edge(
            from,
            to,
            RoadEdge {
                length_m,
                speed_mps,
                geometry,
            },
        );
    }

    /// Adds a directed edge with an explicit geometry.
    pub fn add_edge_with_geometry(
        &mut self,
        from: NodeIndex,
        to: NodeIndex,
        length_m: f64,
        speed_mps: Option<f64>,
        geometry: LineString<f64>,
    ) {
        self.graph.add_edge(
            from,
            to,
            RoadEdge {
                length_m,
                speed_mps,
                geometry,
            },
        );
    }

    /// Adds straight edges in both directions.
    pub fn add_two_way_edge(
        &mut self,
        a: NodeIndex,
        b: NodeIndex,
        length_m: f64,
        speed_mps: Option<f64>,
    ) {
        self.add_edge(a, b, length_m, speed_mps);
        self.add_edge(b, a, length_m, speed_mps);
    }

    pub fn build(self) -> RoadGraph {
        self.graph
    }

    fn straight_line(&self, from: NodeIndex, to: NodeIndex) -> LineString<f64> {
        let a = self.graph[from].geometry;
        let b = self.graph[to].geometry;
        LineString::from(vec![(a.x(), a.y()), (b.x(), b.y())])
    }
}
