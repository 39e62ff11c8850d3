//! Data model for isochrone computation
//!
//! Contains the road graph representation, the per-request search
//! context, range specifications and the output types.

pub mod context;
pub mod graph;
pub mod isochrone;
pub mod parameters;
pub mod range;

pub use context::{CostModel, RouteSearchContext};
pub use graph::{GraphBuilder, RoadEdge, RoadGraph, RoadNode};
pub use isochrone::{Isochrone, IsochroneMap};
pub use parameters::{CancellationToken, IsochroneSearchParameters};
pub use range::{RangeSpec, RangeUnit};
