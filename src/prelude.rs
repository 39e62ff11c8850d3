// Re-export key components

pub use crate::builders::{
    BuilderMethod, ConcaveBallsIsochroneMapBuilder, GridBasedIsochroneMapBuilder,
    IsochroneMapBuilder, IsochroneMapBuilderFactory,
};
pub use crate::config::IsochroneConfig;
pub use crate::error::Error;
pub use crate::model::{
    CancellationToken, CostModel, GraphBuilder, Isochrone, IsochroneMap,
    IsochroneSearchParameters, RangeSpec, RangeUnit, RoadEdge, RoadGraph, RoadNode,
    RouteSearchContext,
};
pub use crate::traversal::{EdgeCostRecord, GraphTraversalEngine, TraversalResult};
